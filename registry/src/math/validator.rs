use crate::model::error::DomainError;

// Anything outside this set (e.g. "NaN", "inf", "0x1F") is not a decimal literal even
// if `f64::from_str` would accept it.
const NUMERIC_CHARS: &str = "0123456789+-.eE";

/// Commas are accepted as decimal separators, "1,5" reads as 1.5
fn normalize(s: &str) -> String {
    s.replace(',', ".")
}

/// Returns true if `s` is a decimal or scientific notation literal.
pub fn is_numeric(s: &str) -> bool {
    let normalized = normalize(s);

    if normalized.is_empty() || !normalized.chars().all(|c| NUMERIC_CHARS.contains(c)) {
        return false;
    }

    normalized.parse::<f64>().is_ok()
}

/// Converts a string that has already passed [`is_numeric`]. Non-numeric input yields NaN.
pub fn to_double(s: &str) -> f64 {
    normalize(s).parse::<f64>().unwrap_or(f64::NAN)
}

pub fn parse_numeric(s: &str) -> Result<f64, DomainError> {
    if !is_numeric(s) {
        return Err(DomainError::InvalidNumericInput(s.to_string()));
    }

    Ok(to_double(s))
}
