use crate::utils::error::{LedgerError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Canonical comparison key for a player name.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Parses a submitted score. Sign is checked separately so that a negative
/// value and garbage text report different reasons.
pub fn parse_score(field_name: &str, text: &str) -> Result<i64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(LedgerError::invalid_input(field_name, "score is missing"));
    }
    trimmed.parse::<i64>().map_err(|_| {
        LedgerError::invalid_input(field_name, format!("'{}' is not a whole number", trimmed))
    })
}

pub fn ensure_non_negative(field_name: &str, value: i64) -> Result<()> {
    if value < 0 {
        return Err(LedgerError::invalid_input(
            field_name,
            "scores must be zero or positive",
        ));
    }
    Ok(())
}

pub fn validate_non_negative(field_name: &str, value: i64) -> Result<u32> {
    ensure_non_negative(field_name, value)?;
    u32::try_from(value)
        .map_err(|_| LedgerError::invalid_input(field_name, format!("{} is too large", value)))
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(LedgerError::ConfigError {
            field: field_name.to_string(),
            message: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_ordered<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    low: T,
    high: T,
) -> Result<()> {
    if low > high {
        return Err(LedgerError::ConfigError {
            field: field_name.to_string(),
            message: format!("lower bound {} exceeds upper bound {}", low, high),
        });
    }
    Ok(())
}
