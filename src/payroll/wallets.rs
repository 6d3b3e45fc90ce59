//! Pre-flight wallet resolution for payroll requests.

use thiserror::Error;

use crate::blockchain::types::ErrorKind;
use crate::payroll::types::Employee;
use crate::resolver::{classify, resolve_all, validate_domain_name, Classification, NameResolver};

#[derive(Debug, Error)]
pub enum WalletResolutionError {
    /// Neither an address nor a well-formed domain name.
    #[error("employee #{index} ({name}): invalid wallet '{wallet}': {reason}")]
    Invalid {
        index: usize,
        name: String,
        wallet: String,
        reason: String,
    },

    /// A domain name that did not resolve, or whose lookup failed.
    #[error("employee #{index} ({name}): domain '{wallet}' could not be resolved")]
    Unresolved {
        index: usize,
        name: String,
        wallet: String,
    },
}

impl WalletResolutionError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Validation
    }
}

/// Replace every domain-name wallet with the address it resolves to.
///
/// All wallets are syntax-checked before any lookup. Names are looked up
/// together through [`resolve_all`]. Returns the number of wallets that were
/// rewritten. On error `employees` is left untouched.
pub async fn resolve_wallets(
    resolver: &NameResolver,
    employees: &mut [Employee],
) -> Result<usize, WalletResolutionError> {
    let mut pending = Vec::new();

    for (index, employee) in employees.iter().enumerate() {
        match classify(&employee.wallet_address) {
            Classification::Address(_) => {}
            Classification::DomainName(name) => {
                let normalized =
                    validate_domain_name(&name).map_err(|e| WalletResolutionError::Invalid {
                        index,
                        name: employee.name.clone(),
                        wallet: employee.wallet_address.clone(),
                        reason: e.to_string(),
                    })?;
                pending.push((index, normalized));
            }
            Classification::Invalid => {
                return Err(WalletResolutionError::Invalid {
                    index,
                    name: employee.name.clone(),
                    wallet: employee.wallet_address.clone(),
                    reason: "not an address or domain name".to_string(),
                })
            }
        }
    }

    if pending.is_empty() {
        return Ok(0);
    }

    let resolved = resolve_all(resolver, pending.iter().map(|(_, name)| name.clone())).await;

    let mut updates = Vec::with_capacity(pending.len());
    for (index, name) in &pending {
        match resolved.get(name).copied().flatten() {
            Some(address) => updates.push((*index, address)),
            None => {
                let employee = &employees[*index];
                return Err(WalletResolutionError::Unresolved {
                    index: *index,
                    name: employee.name.clone(),
                    wallet: employee.wallet_address.clone(),
                });
            }
        }
    }

    for (index, address) in &updates {
        tracing::info!(
            employee = %employees[*index].name,
            domain = %employees[*index].wallet_address,
            address = %address,
            "Wallet resolved"
        );
        employees[*index].wallet_address = address.to_checksum(None);
    }

    Ok(updates.len())
}
