//! Exact decimal ↔ base-unit conversion.
//!
//! Amounts never pass through floating point. A value that needs more
//! fractional digits than the unit supports is rejected, not rounded.

use alloy::primitives::U256;
use thiserror::Error;

/// Fractional digits of the chain's native unit (wei per ether).
pub const ETHER_DECIMALS: u8 = 18;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("amount is empty")]
    Empty,

    #[error("amount '{0}' is not a plain non-negative decimal number")]
    Malformed(String),

    #[error("amount '{value}' has more than {decimals} fractional digits")]
    TooPrecise { value: String, decimals: u8 },

    #[error("amount '{0}' is too large")]
    Overflow(String),
}

/// Convert a decimal string into base units with `decimals` fractional digits.
pub fn parse_units(value: &str, decimals: u8) -> Result<U256, AmountError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AmountError::Empty);
    }

    let (int_part, frac_part) = trimmed.split_once('.').unwrap_or((trimmed, ""));
    let all_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (int_part.is_empty() && frac_part.is_empty()) || !all_digits(int_part) || !all_digits(frac_part) {
        return Err(AmountError::Malformed(trimmed.to_string()));
    }

    let frac_significant = frac_part.trim_end_matches('0');
    if frac_significant.len() > decimals as usize {
        return Err(AmountError::TooPrecise {
            value: trimmed.to_string(),
            decimals,
        });
    }

    let mut digits = String::with_capacity(int_part.len() + decimals as usize);
    digits.push_str(int_part);
    digits.push_str(frac_significant);
    digits.extend(std::iter::repeat('0').take(decimals as usize - frac_significant.len()));

    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(U256::ZERO);
    }
    U256::from_str_radix(digits, 10).map_err(|_| AmountError::Overflow(trimmed.to_string()))
}

/// Convert an ether amount ("1.5") into wei.
pub fn parse_ether(value: &str) -> Result<U256, AmountError> {
    parse_units(value, ETHER_DECIMALS)
}

/// Render base units as a canonical decimal string ("10.0", "1.5").
pub fn format_units(value: U256, decimals: u8) -> String {
    let raw = value.to_string();
    let decimals = decimals as usize;
    let padded = if raw.len() <= decimals {
        format!("{}{}", "0".repeat(decimals - raw.len() + 1), raw)
    } else {
        raw
    };

    let (int_part, frac_part) = padded.split_at(padded.len() - decimals);
    let frac_part = frac_part.trim_end_matches('0');
    if frac_part.is_empty() {
        format!("{}.0", int_part)
    } else {
        format!("{}.{}", int_part, frac_part)
    }
}

pub fn format_ether(value: U256) -> String {
    format_units(value, ETHER_DECIMALS)
}
