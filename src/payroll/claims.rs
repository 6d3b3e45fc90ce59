//! Read-only claim schedule queries.

use alloy::primitives::U256;
use async_trait::async_trait;
use thiserror::Error;

use crate::blockchain::types::{BlockchainError, BlockchainResult, ErrorKind};

pub const MONTH_RANGE: std::ops::RangeInclusive<u32> = 1..=12;
/// Years the contract's calendar math accepts.
pub const YEAR_RANGE: std::ops::RangeInclusive<u32> = 1970..=9999;

#[async_trait]
pub trait ClaimSchedule: Send + Sync {
    async fn is_month_claimable(&self, payroll_id: U256, month: U256, year: U256) -> BlockchainResult<bool>;
}

#[derive(Debug, Error)]
pub enum ClaimQueryError {
    #[error("month {0} is outside 1-12")]
    Month(u32),

    #[error("year {0} is out of range")]
    Year(u32),

    #[error(transparent)]
    Chain(#[from] BlockchainError),
}

impl ClaimQueryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClaimQueryError::Month(_) | ClaimQueryError::Year(_) => ErrorKind::Validation,
            ClaimQueryError::Chain(e) => e.kind(),
        }
    }
}

/// Whether `month`/`year` can currently be claimed from `payroll_id`.
pub async fn check_claimable<S: ClaimSchedule + ?Sized>(
    schedule: &S,
    payroll_id: U256,
    month: u32,
    year: u32,
) -> Result<bool, ClaimQueryError> {
    if !MONTH_RANGE.contains(&month) {
        return Err(ClaimQueryError::Month(month));
    }
    if !YEAR_RANGE.contains(&year) {
        return Err(ClaimQueryError::Year(year));
    }

    let claimable = schedule
        .is_month_claimable(payroll_id, U256::from(month), U256::from(year))
        .await?;
    tracing::debug!(payroll_id = %payroll_id, month, year, claimable, "Claim schedule queried");
    Ok(claimable)
}
