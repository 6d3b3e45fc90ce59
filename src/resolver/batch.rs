//! Concurrent resolution of many names.

use alloy::primitives::Address;
use std::collections::{BTreeSet, HashMap};
use tokio::task::JoinSet;

use crate::resolver::name_resolver::NameResolver;

/// Resolve every distinct input concurrently.
///
/// The result has exactly one entry per distinct input. Each lookup runs in
/// its own task, so a failing or panicking lookup only turns its own entry
/// into `None`.
pub async fn resolve_all<I, S>(resolver: &NameResolver, names: I) -> HashMap<String, Option<Address>>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let distinct: BTreeSet<String> = names.into_iter().map(Into::into).collect();
    let mut resolved: HashMap<String, Option<Address>> =
        distinct.iter().map(|name| (name.clone(), None)).collect();

    let mut tasks = JoinSet::new();
    for name in distinct {
        let resolver = resolver.clone();
        tasks.spawn(async move {
            let outcome = resolver.resolve(&name).await;
            (name, outcome)
        });
    }

    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((name, Ok(resolution))) => {
                resolved.insert(name, resolution.address());
            }
            Ok((name, Err(e))) => {
                tracing::warn!(name = %name, error = %e, "Name resolution failed");
            }
            Err(e) => {
                tracing::error!(error = %e, "Name resolution task aborted");
            }
        }
    }

    tracing::debug!(
        total = resolved.len(),
        resolved = resolved.values().filter(|a| a.is_some()).count(),
        "Batch resolution complete"
    );

    resolved
}
