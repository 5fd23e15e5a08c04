//! Time value utilities
//!
//! All temporal values are decimal seconds held as `f64`. Values are rounded to
//! a fixed number of decimal places when read from and written to TextGrid text
//! so that repeated load/save cycles are stable.

/// Decimal places used by the TextGrid codec
pub const DEFAULT_DECIMALS: u32 = 3;

/// Fractional digits written for every time value
pub const OUTPUT_FRACTION_DIGITS: usize = 6;

/// Round `seconds` to `decimals` decimal places (half away from zero)
///
/// Non-finite values are returned unchanged.
pub fn round_to(seconds: f64, decimals: u32) -> f64 {
    if !seconds.is_finite() {
        return seconds;
    }
    let scale = 10f64.powi(decimals as i32);
    let scaled = seconds * scale;
    if !scaled.is_finite() {
        return seconds;
    }
    let rounded = scaled.round() / scale;
    // Avoid writing "-0.000000"
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// Round to milliseconds
pub fn round3(seconds: f64) -> f64 {
    round_to(seconds, DEFAULT_DECIMALS)
}

/// Format a time value the way TextGrid files carry it
pub fn format_seconds(seconds: f64, decimals: u32) -> String {
    format!("{:.*}", OUTPUT_FRACTION_DIGITS, round_to(seconds, decimals))
}
