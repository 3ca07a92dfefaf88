//! Rounding policy for insulin doses.
//!
//! Doses are administered in half-unit increments, so every raw dose is
//! quantized to the nearest 0.5 U before it is reported or persisted.

/// Quantize a raw dose to the nearest clinically usable half unit.
///
/// The integer part is taken with truncation toward zero, not floor. The
/// remainder of a negative value never exceeds 0.25, so a negative raw dose
/// always lands on its integer part: -0.2 becomes 0.0 and -1.6 becomes -1.0.
///
/// Half units are exact in binary floating point, so the result carries at
/// most one decimal digit.
pub fn round_to_half_unit(value: f64) -> f64 {
    let whole = value.trunc();
    let remainder = value - whole;

    let quantized = if remainder <= 0.25 {
        whole
    } else if remainder <= 0.75 {
        whole + 0.5
    } else {
        whole + 1.0
    };

    // trunc() yields -0.0 for inputs in (-1.0, 0.0); normalize it away.
    if quantized == 0.0 {
        0.0
    } else {
        quantized
    }
}

/// Round to two decimal places (line-item carbs, recommended ratios).
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Render a dose with exactly one decimal digit, e.g. `7.5`.
pub fn format_units(value: f64) -> String {
    format!("{value:.1}")
}

/// Render a carb-to-insulin ratio with exactly two decimal digits, e.g. `8.96`.
pub fn format_ratio(value: f64) -> String {
    format!("{value:.2}")
}
