//! Validation of raw amount input.

use super::error::ValidationRejected;

/// Parses the raw text of an amount field.
///
/// Accepts only ASCII digits with at most one `.`; an empty field (or a lone `.`)
/// reads as 0, so clearing the field still converts.
pub fn parse_edit(raw: &str) -> Result<f64, ValidationRejected> {
    let raw = raw.trim();
    if !raw.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Err(ValidationRejected);
    }
    if raw.matches('.').count() > 1 {
        return Err(ValidationRejected);
    }

    let digits = raw.trim_end_matches('.');
    if digits.is_empty() {
        return Ok(0.0);
    }
    let normalized = if digits.starts_with('.') {
        format!("0{digits}")
    } else {
        digits.to_string()
    };
    match normalized.parse::<f64>() {
        Ok(amount) if amount.is_finite() => Ok(amount),
        _ => Err(ValidationRejected),
    }
}
