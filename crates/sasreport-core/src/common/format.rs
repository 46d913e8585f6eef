//! Numeric-to-text conversion shared by every table and caption builder.
//!
//! Values are shown fixed-point inside a magnitude window derived from the
//! requested precision and switch to scientific notation outside it, so a
//! column mixing `24.97` and `0.0000124` stays readable.

/// Renders `value` rounded to `round_to` decimal places.
///
/// Fixed-point output keeps a trailing `.0` for integral results
/// (`25.0`, not `25`). Outside the window `[10^-round_to, high]` the
/// value is rendered as `m.mmme[+-]d` scientific notation with the
/// mantissa trimmed to significant digits, e.g. `1.2345e-4`.
pub fn text_round(value: f64, round_to: i32) -> String {
    let low_bound = 1.0 / 10f64.powi(round_to);
    let high_bound = if round_to > 1 {
        1000.0 / 10f64.powi(round_to - 1)
    } else {
        1000.0
    };

    if value < low_bound || value > high_bound {
        format_scientific(value, round_to)
    } else {
        float_repr(round_decimals(value, round_to))
    }
}

/// `"{value} +/- {error}"` with both parts passed through [`text_round`].
pub fn value_with_error(value: f64, error: f64, round_to: i32) -> String {
    format!(
        "{} +/- {}",
        text_round(value, round_to),
        text_round(error, round_to)
    )
}

/// Rounds to `decimals` decimal places, ties to even.
pub fn round_decimals(value: f64, decimals: i32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let scale = 10f64.powi(decimals);
    (value * scale).round_ties_even() / scale
}

/// Decimal repr with a guaranteed fractional digit: integral values keep
/// one (`25.0`), everything else uses the shortest round-tripping form.
pub fn float_repr(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value == f64::INFINITY {
        "inf".to_string()
    } else if value == f64::NEG_INFINITY {
        "-inf".to_string()
    } else if value == value.trunc() && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// Compact repr for free-form numeric metadata: integral values drop the
/// fractional part entirely (`95`, not `95.0`).
pub fn trimmed_number(value: f64) -> String {
    if value.is_finite() && value == value.trunc() && value.abs() < 1e16 {
        format!("{value:.0}")
    } else {
        float_repr(value)
    }
}

fn format_scientific(value: f64, round_to: i32) -> String {
    if !value.is_finite() {
        return float_repr(value);
    }

    let precision = round_to.max(0) as usize;
    let formatted = format!("{value:.precision$e}");
    let (mantissa, exponent) = match formatted.split_once('e') {
        Some(parts) => parts,
        None => (formatted.as_str(), "0"),
    };

    // Trim trailing zeros but keep at least one fractional digit.
    let mantissa = if let Some(stripped) = mantissa.find('.').map(|_| mantissa.trim_end_matches('0'))
    {
        if stripped.ends_with('.') {
            format!("{stripped}0")
        } else {
            stripped.to_string()
        }
    } else {
        format!("{mantissa}.0")
    };

    let exponent = match exponent.strip_prefix('-') {
        Some(digits) => format!("-{digits}"),
        None => format!("+{exponent}"),
    };

    format!("{mantissa}e{exponent}")
}
