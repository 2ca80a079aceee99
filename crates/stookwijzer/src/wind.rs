//! Wind speed conversions.

/// Lower bound (m/s) of Beaufort force 1 through 12.
const BEAUFORT_LOWER_BOUNDS: [f64; 12] = [
    0.3, 1.6, 3.4, 5.5, 8.0, 10.8, 13.9, 17.2, 20.8, 24.5, 28.5, 32.7,
];

/// Highest force on the scale.
pub const MAX_BEAUFORT: u8 = 12;

/// Beaufort force for a wind speed in m/s. Negative or NaN speeds are force 0.
pub fn beaufort_from_ms(speed_ms: f64) -> u8 {
    BEAUFORT_LOWER_BOUNDS
        .iter()
        .take_while(|&&bound| speed_ms >= bound)
        .count() as u8
}

/// Round to one decimal, as the wind speed is presented.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
