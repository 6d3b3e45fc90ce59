//! Input classification and domain-name syntax.
//!
//! Everything here is pure: no input is ever sent to the network before it
//! has been classified and, for names, syntax-checked.

use alloy::primitives::{keccak256, Address, B256};
use thiserror::Error;

/// Label separator in domain names.
pub const SEPARATOR: char = '.';

/// What an input string looks like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// A well-formed address literal. Needs no lookup.
    Address(Address),
    /// Looks like a domain name (trimmed input, not yet syntax-checked).
    DomainName(String),
    Invalid,
}

/// Why a domain-like input was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainNameError {
    #[error("empty domain name")]
    Empty,

    #[error("domain name must contain at least two labels")]
    MissingSeparator,

    #[error("domain name cannot start with '.'")]
    LeadingSeparator,

    #[error("domain name cannot end with '.'")]
    TrailingSeparator,

    #[error("domain name cannot contain consecutive '.'")]
    ConsecutiveSeparators,

    #[error("label '{0}' may only contain letters, digits and hyphens")]
    InvalidLabel(String),
}

/// Classify an input. Total: every string maps to exactly one variant.
pub fn classify(input: &str) -> Classification {
    let trimmed = input.trim();
    if let Some(address) = parse_address(trimmed) {
        return Classification::Address(address);
    }

    let non_empty_labels = trimmed.split(SEPARATOR).filter(|l| !l.is_empty()).count();
    if trimmed.contains(SEPARATOR) && non_empty_labels >= 2 {
        Classification::DomainName(trimmed.to_string())
    } else {
        Classification::Invalid
    }
}

/// Parse a `0x`-prefixed 20-byte hex address.
///
/// Mixed-case input must carry a valid EIP-55 checksum; all-lower or
/// all-upper input is accepted as is.
pub fn parse_address(input: &str) -> Option<Address> {
    let hex = input.strip_prefix("0x")?;
    if hex.len() != 40 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let has_upper = hex.chars().any(|c| c.is_ascii_uppercase());
    let has_lower = hex.chars().any(|c| c.is_ascii_lowercase());
    if has_upper && has_lower {
        Address::parse_checksummed(input, None).ok()
    } else {
        input.parse().ok()
    }
}

/// Normalize and syntax-check a domain name.
///
/// Returns the lowercased name on success.
pub fn validate_domain_name(input: &str) -> Result<String, DomainNameError> {
    let name = input.trim().to_lowercase();

    if name.is_empty() {
        return Err(DomainNameError::Empty);
    }
    if name.starts_with(SEPARATOR) {
        return Err(DomainNameError::LeadingSeparator);
    }
    if name.ends_with(SEPARATOR) {
        return Err(DomainNameError::TrailingSeparator);
    }
    if name.contains("..") {
        return Err(DomainNameError::ConsecutiveSeparators);
    }
    if !name.contains(SEPARATOR) {
        return Err(DomainNameError::MissingSeparator);
    }

    for label in name.split(SEPARATOR) {
        let allowed = label
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');
        if label.is_empty() || !allowed {
            return Err(DomainNameError::InvalidLabel(label.to_string()));
        }
    }

    Ok(name)
}

/// EIP-137 namehash of a normalized name.
pub fn namehash(name: &str) -> B256 {
    let mut node = B256::ZERO;
    if name.is_empty() {
        return node;
    }
    for label in name.rsplit(SEPARATOR) {
        let label_hash = keccak256(label.as_bytes());
        let mut buf = [0u8; 64];
        buf[..32].copy_from_slice(node.as_slice());
        buf[32..].copy_from_slice(label_hash.as_slice());
        node = keccak256(buf);
    }
    node
}
