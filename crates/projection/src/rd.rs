//! Rijksdriehoek (RD New, EPSG:28992) projection.
//!
//! Approximates the WGS84 -> RD transformation with the published
//! polynomial series. Accuracy is in the order of a meter inside the
//! Netherlands; outside the Benelux the result is numerically defined but
//! meaningless.
//!
//! The series works on scaled offsets from the Amersfoort reference point:
//! - dφ = 0.36 · (φ − φ0), dλ = 0.36 · (λ − λ0) (degrees → 10⁴ arc seconds)
//! - x = x0 + Σ R[p,q] · dφ^p · dλ^q
//! - y = y0 + Σ S[p,q] · dφ^p · dλ^q

use stookwijzer_common::{GeoPoint, ProjectedPoint};

/// False easting of the RD origin (meters).
pub const X0: f64 = 155000.0;
/// False northing of the RD origin (meters).
pub const Y0: f64 = 463000.0;
/// Latitude of the Amersfoort reference point (degrees).
pub const PHI0: f64 = 52.15517440;
/// Longitude of the Amersfoort reference point (degrees).
pub const LAMBDA0: f64 = 5.38720621;

/// (p, q, coefficient) terms of the x series.
const R_TERMS: [(i32, i32, f64); 9] = [
    (0, 1, 190094.945),
    (1, 1, -11832.228),
    (2, 1, -114.221),
    (0, 3, -32.391),
    (1, 0, -0.705),
    (3, 1, -2.34),
    (1, 3, -0.608),
    (0, 2, -0.008),
    (2, 3, 0.148),
];

/// (p, q, coefficient) terms of the y series.
const S_TERMS: [(i32, i32, f64); 10] = [
    (1, 0, 309056.544),
    (0, 2, 3638.893),
    (2, 0, 73.077),
    (1, 2, -157.984),
    (3, 0, 59.788),
    (0, 1, 0.433),
    (2, 2, -6.439),
    (1, 1, -0.032),
    (0, 4, 0.092),
    (1, 4, -0.054),
];

/// The RD New projection.
#[derive(Debug, Clone, Copy, Default)]
pub struct RdNew;

impl RdNew {
    /// Project a WGS84 point onto the RD grid.
    pub fn project(&self, point: GeoPoint) -> ProjectedPoint {
        let (x, y) = wgs84_to_rd(point.latitude, point.longitude);
        ProjectedPoint::new(x, y)
    }
}

/// Convert WGS84 latitude/longitude (degrees) to RD x/y (meters).
///
/// Returns (x, y). No rounding is applied.
pub fn wgs84_to_rd(latitude: f64, longitude: f64) -> (f64, f64) {
    let d_phi = 0.36 * (latitude - PHI0);
    let d_lambda = 0.36 * (longitude - LAMBDA0);

    let series = |terms: &[(i32, i32, f64)]| -> f64 {
        terms
            .iter()
            .map(|&(p, q, c)| c * d_phi.powi(p) * d_lambda.powi(q))
            .sum()
    };

    (X0 + series(&R_TERMS), Y0 + series(&S_TERMS))
}
