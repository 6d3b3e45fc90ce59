//! Address resolution against an in-memory name registry.

use std::time::Duration;

use payroll_chain::blockchain::types::ErrorKind;
use payroll_chain::payroll::{resolve_wallets, WalletResolutionError};
use payroll_chain::resolver::{
    resolve_all, validate_and_resolve, LookupStage, Resolution, ResolveError,
};

mod common;
use common::*;

#[tokio::test]
async fn test_literal_address_needs_no_lookup() {
    let (resolver, lookup) = resolver_with(FakeNameLookup::new());

    let resolved = resolver.resolve(&format!("  {}  ", BOB.to_checksum(None))).await.unwrap();
    assert_eq!(resolved, Resolution::Found(BOB));

    let lower = format!("{:#x}", ALICE);
    assert_eq!(resolver.resolve(&lower).await.unwrap(), Resolution::Found(ALICE));
    assert_eq!(lookup.calls(), 0);
}

#[tokio::test]
async fn test_registered_name_resolves_case_insensitively() {
    let (resolver, lookup) = resolver_with(FakeNameLookup::new().with_name("alice.eth", ALICE));

    assert_eq!(resolver.resolve("Alice.ETH").await.unwrap(), Resolution::Found(ALICE));
    assert_eq!(lookup.calls(), 2);
}

#[tokio::test]
async fn test_unregistered_name_is_not_found() {
    let (resolver, lookup) = resolver_with(FakeNameLookup::new());

    assert_eq!(resolver.resolve("nobody.eth").await.unwrap(), Resolution::NotFound);
    // No resolver, so the second hop is skipped.
    assert_eq!(lookup.calls(), 1);
}

#[tokio::test]
async fn test_name_without_address_record_is_not_found() {
    let (resolver, lookup) = resolver_with(FakeNameLookup::new().with_unbound_name("parked.eth"));

    assert_eq!(resolver.resolve("parked.eth").await.unwrap(), Resolution::NotFound);
    assert_eq!(lookup.calls(), 2);
}

#[tokio::test]
async fn test_malformed_input_is_invalid_without_lookup() {
    let (resolver, lookup) = resolver_with(FakeNameLookup::new());

    for input in ["alice..eth", ".eth.", "al ice.eth", "al_ice.eth", "hello", "0x1234", ""] {
        let err = resolver.resolve(input).await.unwrap_err();
        assert!(matches!(err, ResolveError::Invalid { .. }), "{input}: {err:?}");
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
    assert_eq!(lookup.calls(), 0);
}

#[tokio::test]
async fn test_lookup_failure_is_distinct_from_not_found() {
    let (resolver, _lookup) = resolver_with(FakeNameLookup::new().with_failing_name("broken.eth"));

    match resolver.resolve("broken.eth").await {
        Err(ResolveError::Lookup(e)) => {
            assert_eq!(e.name, "broken.eth");
            assert_eq!(e.stage, LookupStage::Registry);
            assert_eq!(e.kind(), ErrorKind::Resolution);
            // Masked endpoint survives into the message.
            assert!(e.to_string().contains("/v2/***"));
        }
        other => panic!("expected lookup error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_validate_and_resolve_outcomes() {
    let (resolver, _lookup) = resolver_with(
        FakeNameLookup::new()
            .with_name("alice.eth", ALICE)
            .with_failing_name("broken.eth"),
    );

    let found = validate_and_resolve("alice.eth", Some(&resolver)).await.unwrap();
    assert!(found.is_valid && found.is_domain_name);
    assert_eq!(found.address, Some(ALICE));

    let missing = validate_and_resolve("nobody.eth", Some(&resolver)).await.unwrap();
    assert!(!missing.is_valid);
    assert_eq!(missing.error.as_deref(), Some("Domain not found or not resolvable"));

    let no_client = validate_and_resolve("alice.eth", None).await.unwrap();
    assert_eq!(no_client.error.as_deref(), Some("Name resolution client not available"));

    let literal = validate_and_resolve(&BOB.to_checksum(None), None).await.unwrap();
    assert!(literal.is_valid && !literal.is_domain_name);

    assert!(validate_and_resolve("broken.eth", Some(&resolver)).await.is_err());
}

#[tokio::test]
async fn test_resolve_all_isolates_failures() {
    let (resolver, _lookup) = resolver_with(
        FakeNameLookup::new()
            .with_name("a.eth", ALICE)
            .with_failing_name("b.eth")
            .with_name("c.eth", CAROL),
    );

    let resolved = resolve_all(&resolver, ["a.eth", "b.eth", "c.eth"]).await;

    assert_eq!(resolved.len(), 3);
    assert_eq!(resolved["a.eth"], Some(ALICE));
    assert_eq!(resolved["b.eth"], None);
    assert_eq!(resolved["c.eth"], Some(CAROL));
}

#[tokio::test]
async fn test_resolve_all_looks_up_names_concurrently() {
    // Each registry lookup waits for the other two, so a sequential
    // resolver would never finish.
    let (resolver, lookup) = resolver_with(
        FakeNameLookup::new()
            .with_name("a.eth", ALICE)
            .with_name("b.eth", BOB)
            .with_name("c.eth", CAROL)
            .with_rendezvous(3),
    );

    let resolved = tokio::time::timeout(
        Duration::from_secs(5),
        resolve_all(&resolver, ["a.eth", "b.eth", "c.eth"]),
    )
    .await
    .expect("lookups did not run concurrently");

    assert_eq!(resolved["a.eth"], Some(ALICE));
    assert_eq!(resolved["b.eth"], Some(BOB));
    assert_eq!(resolved["c.eth"], Some(CAROL));
    assert_eq!(lookup.calls(), 6);
}

#[tokio::test]
async fn test_resolve_all_survives_panicking_lookup() {
    let (resolver, _lookup) = resolver_with(
        FakeNameLookup::new()
            .with_name("a.eth", ALICE)
            .with_panicking_name("boom.eth"),
    );

    let resolved = resolve_all(&resolver, vec!["a.eth".to_string(), "boom.eth".to_string()]).await;

    assert_eq!(resolved.len(), 2);
    assert_eq!(resolved["a.eth"], Some(ALICE));
    assert_eq!(resolved["boom.eth"], None);
}

#[tokio::test]
async fn test_resolve_all_collapses_duplicates() {
    let (resolver, lookup) = resolver_with(FakeNameLookup::new().with_name("a.eth", ALICE));

    let resolved = resolve_all(&resolver, ["a.eth", "a.eth", "missing.eth", "a.eth"]).await;

    assert_eq!(resolved.len(), 2);
    assert_eq!(resolved["a.eth"], Some(ALICE));
    assert_eq!(resolved["missing.eth"], None);
    // a.eth: two hops once; missing.eth: registry only.
    assert_eq!(lookup.calls(), 3);
}

#[tokio::test]
async fn test_resolve_all_mixes_addresses_and_invalid_input() {
    let (resolver, lookup) = resolver_with(FakeNameLookup::new());
    let bob = BOB.to_checksum(None);

    let resolved = resolve_all(&resolver, [bob.as_str(), "not a name"]).await;

    assert_eq!(resolved[bob.as_str()], Some(BOB));
    assert_eq!(resolved["not a name"], None);
    assert_eq!(lookup.calls(), 0);
}

#[tokio::test]
async fn test_resolve_wallets_rewrites_names_only() {
    let (resolver, lookup) = resolver_with(FakeNameLookup::new().with_name("alice.eth", ALICE));
    let bob = BOB.to_checksum(None);
    let mut employees = vec![
        employee("Bob", &bob, "1.5"),
        employee("Alice", "alice.eth", "2.0"),
        employee("Alice again", "ALICE.eth", "1.0"),
    ];

    let rewritten = resolve_wallets(&resolver, &mut employees).await.unwrap();

    assert_eq!(rewritten, 2);
    assert_eq!(employees[0].wallet_address, bob);
    assert_eq!(employees[1].wallet_address, ALICE.to_checksum(None));
    assert_eq!(employees[2].wallet_address, ALICE.to_checksum(None));
    // Both spellings normalize to one lookup.
    assert_eq!(lookup.calls(), 2);
    assert!(lookup.was_looked_up("alice.eth"));
}

#[tokio::test]
async fn test_resolve_wallets_rejects_before_lookup() {
    let (resolver, lookup) = resolver_with(FakeNameLookup::new().with_name("alice.eth", ALICE));
    let mut employees = vec![
        employee("Alice", "alice.eth", "2.0"),
        employee("Mallory", "mallory..eth", "1.0"),
    ];

    let err = resolve_wallets(&resolver, &mut employees).await.unwrap_err();

    assert!(matches!(err, WalletResolutionError::Invalid { index: 1, .. }));
    assert_eq!(err.kind(), ErrorKind::Validation);
    assert_eq!(lookup.calls(), 0);
    assert_eq!(employees[0].wallet_address, "alice.eth");
}

#[tokio::test]
async fn test_resolve_wallets_unresolved_name_leaves_input_untouched() {
    let (resolver, _lookup) = resolver_with(
        FakeNameLookup::new()
            .with_name("alice.eth", ALICE)
            .with_failing_name("broken.eth"),
    );
    let mut employees = vec![
        employee("Alice", "alice.eth", "2.0"),
        employee("Dave", "broken.eth", "1.0"),
    ];

    let err = resolve_wallets(&resolver, &mut employees).await.unwrap_err();

    match err {
        WalletResolutionError::Unresolved { index, name, wallet } => {
            assert_eq!(index, 1);
            assert_eq!(name, "Dave");
            assert_eq!(wallet, "broken.eth");
        }
        other => panic!("expected unresolved error, got {other:?}"),
    }
    assert_eq!(employees[0].wallet_address, "alice.eth");
}
