use std::f64::consts::PI;

/// Spherical-mercator major radius in metres.
pub const R_MAJOR: f64 = 6_378_137.0;

/// Projects decimal-degree latitude/longitude onto planar mercator
/// coordinates.
///
/// A longitude of exactly 0 makes the scale term 0/0, so `y` comes back
/// NaN while `x` is 0. No bay station sits on the prime meridian, and the
/// value is passed through rather than special-cased. Latitudes of ±90
/// likewise propagate a non-finite `y`.
pub fn to_mercator(lat: f64, lon: f64) -> (f64, f64) {
    let x = R_MAJOR * lon.to_radians();
    let scale = x / lon;
    let y = 180.0 / PI * (PI / 4.0 + lat.to_radians() / 2.0).tan().ln() * scale;
    (x, y)
}
