//! Payroll request and result types.

use alloy::primitives::{Address, TxHash, U256};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::value::RawValue;
use uuid::Uuid;

use crate::payroll::amount::parse_ether;
use crate::payroll::error::RequestError;
use crate::resolver::classify::parse_address;

pub const PAYMENT_DAY_RANGE: std::ops::RangeInclusive<u32> = 1..=31;
pub const DURATION_MONTHS_RANGE: std::ops::RangeInclusive<u32> = 1..=60;

/// One payee.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub name: String,
    /// Informational only; never sent on-chain.
    #[serde(default)]
    pub email: Option<String>,
    /// Address literal, or a domain name until resolved.
    pub wallet_address: String,
    /// Per-period pay in ether, kept as decimal text.
    #[serde(deserialize_with = "decimal_text")]
    pub amount: String,
}

/// An employer's request to set up a payroll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollRequest {
    #[serde(default)]
    pub payment_day: u32,
    /// Months.
    #[serde(default)]
    pub duration: u32,
    #[serde(deserialize_with = "decimal_text")]
    pub expected_total_amount: String,
    #[serde(default)]
    pub employer_address: Option<String>,
    #[serde(default)]
    pub employees: Vec<Employee>,
}

/// A request whose every field has been checked and converted to chain units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedPayroll {
    pub payment_day: U256,
    pub duration: U256,
    pub expected_total_wei: U256,
    pub employer: Address,
    pub employees: Vec<PreparedEmployee>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedEmployee {
    pub name: String,
    pub wallet: Address,
    pub monthly_wei: U256,
}

impl PayrollRequest {
    /// Check bounds, addresses and amounts without touching the chain.
    pub fn prepare(&self) -> Result<PreparedPayroll, RequestError> {
        if self.employees.is_empty() {
            return Err(RequestError::NoEmployees);
        }

        let employer_raw = self
            .employer_address
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or(RequestError::MissingEmployer)?;
        let employer = parse_address(employer_raw)
            .ok_or_else(|| RequestError::InvalidEmployer(employer_raw.to_string()))?;

        if !PAYMENT_DAY_RANGE.contains(&self.payment_day) {
            return Err(RequestError::PaymentDay(self.payment_day));
        }
        if !DURATION_MONTHS_RANGE.contains(&self.duration) {
            return Err(RequestError::Duration(self.duration));
        }

        let expected_total_wei =
            parse_ether(&self.expected_total_amount).map_err(RequestError::TotalAmount)?;

        let employees = self
            .employees
            .iter()
            .enumerate()
            .map(|(index, employee)| employee.prepare(index))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PreparedPayroll {
            payment_day: U256::from(self.payment_day),
            duration: U256::from(self.duration),
            expected_total_wei,
            employer,
            employees,
        })
    }
}

impl Employee {
    fn prepare(&self, index: usize) -> Result<PreparedEmployee, RequestError> {
        let wallet = parse_address(self.wallet_address.trim()).ok_or_else(|| {
            RequestError::UnresolvedWallet {
                index,
                name: self.name.clone(),
                wallet: self.wallet_address.clone(),
            }
        })?;

        let monthly_wei = parse_ether(&self.amount).map_err(|source| RequestError::EmployeeAmount {
            index,
            name: self.name.clone(),
            source,
        })?;
        if monthly_wei.is_zero() {
            return Err(RequestError::ZeroAmount {
                index,
                name: self.name.clone(),
            });
        }

        Ok(PreparedEmployee {
            name: self.name.clone(),
            wallet,
            monthly_wei,
        })
    }
}

/// Where the payroll id came from.
///
/// `FallbackUsed` is the weaker path: it assumes nobody else created a
/// payroll between this transaction and the counter read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum PayrollIdSource {
    EventFound {
        #[serde(serialize_with = "u256_decimal")]
        id: U256,
    },
    FallbackUsed {
        #[serde(serialize_with = "u256_decimal")]
        id: U256,
    },
}

impl PayrollIdSource {
    pub fn id(&self) -> U256 {
        match self {
            PayrollIdSource::EventFound { id } | PayrollIdSource::FallbackUsed { id } => *id,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, PayrollIdSource::FallbackUsed { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            PayrollIdSource::EventFound { .. } => "event",
            PayrollIdSource::FallbackUsed { .. } => "counter_fallback",
        }
    }
}

/// Outcome of a fully confirmed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayrollResult {
    pub run_id: Uuid,
    /// Hash of the payroll creation transaction.
    pub tx_hash: TxHash,
    #[serde(serialize_with = "u256_decimal")]
    pub payroll_id: U256,
    pub id_source: PayrollIdSource,
    /// One per employee, in request order.
    pub employee_tx_hashes: Vec<TxHash>,
}

fn u256_decimal<S: Serializer>(value: &U256, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_string())
}

/// Accept `1.5` or `"1.5"`; keep the literal decimal text so no float
/// rounding happens before conversion. Requests are read as JSON only.
fn decimal_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let raw = Box::<RawValue>::deserialize(deserializer)?;
    let text = raw.get();
    match text.chars().next() {
        Some('"') => serde_json::from_str::<String>(text).map_err(D::Error::custom),
        // Numbers stay verbatim; exponents and signs are rejected at conversion.
        Some(c) if c == '-' || c.is_ascii_digit() => Ok(text.to_string()),
        _ => Err(D::Error::custom(format!("expected a decimal amount, found {text}"))),
    }
}
