//! Fallback chain tests

use std::sync::Arc;

use vpm_domain::error::Error;
use vpm_domain::value_objects::{Operation, OperationContext, VectorData};
use vpm_domain::{VectorProvider, VectorProviderAdmin};
use vpm_infrastructure::routing::{FallbackChain, FallbackPolicy};

use crate::test_utils::MockProvider;

fn mocks(names: &[&str]) -> Vec<Arc<MockProvider>> {
    names.iter().map(|name| MockProvider::new(name).shared()).collect()
}

fn chain(members: &[Arc<MockProvider>]) -> FallbackChain {
    FallbackChain::new(
        members
            .iter()
            .map(|m| Arc::clone(m) as Arc<dyn VectorProvider>)
            .collect(),
    )
}

fn item(id: &str) -> Vec<VectorData> {
    vec![VectorData::new(id, vec![1.0, 0.0])]
}

// ============================================================================
// Ratchet policy
// ============================================================================

#[tokio::test]
async fn test_first_healthy_member_serves() {
    let members = mocks(&["a", "b"]);
    let chain = chain(&members);
    let ctx = OperationContext::new();

    chain.store(&ctx, &item("v1")).await.unwrap();

    assert_eq!(members[0].call_count(), 1);
    assert_eq!(members[1].call_count(), 0);
    assert_eq!(chain.current_index(), 0);
    assert!(chain.history().is_empty());
}

#[tokio::test]
async fn test_ratchet_skips_failed_members_on_later_calls() {
    let members = mocks(&["a", "b", "c"]);
    members[0].set_failing(true);
    members[1].set_failing(true);
    let chain = chain(&members);
    let ctx = OperationContext::new();

    chain.store(&ctx, &item("v1")).await.unwrap();
    assert_eq!(chain.current_index(), 2);
    assert_eq!(members[2].call_count(), 1);

    // Recovered members are not retried
    members[0].set_failing(false);
    members[1].set_failing(false);
    chain.store(&ctx, &item("v2")).await.unwrap();

    assert_eq!(members[0].call_count(), 1);
    assert_eq!(members[1].call_count(), 1);
    assert_eq!(members[2].call_count(), 2);
}

#[tokio::test]
async fn test_reset_rewinds_to_first_member() {
    let members = mocks(&["a", "b"]);
    members[0].set_failing(true);
    let chain = chain(&members);
    let ctx = OperationContext::new();

    chain.store(&ctx, &item("v1")).await.unwrap();
    assert_eq!(chain.current_index(), 1);

    members[0].set_failing(false);
    chain.reset();
    chain.store(&ctx, &item("v2")).await.unwrap();

    assert_eq!(chain.current_index(), 0);
    assert_eq!(members[0].call_count(), 2);
}

#[tokio::test]
async fn test_exhaustion_enumerates_every_error() {
    let members = mocks(&["a", "b", "c"]);
    for member in &members {
        member.set_failing(true);
    }
    let chain = chain(&members);
    let ctx = OperationContext::new();

    let err = chain.store(&ctx, &item("v1")).await.unwrap_err();
    match &err {
        Error::AllProvidersExhausted { operation, errors } => {
            assert_eq!(operation, "store");
            let names: Vec<_> = errors.iter().map(|(name, _)| name.as_str()).collect();
            assert_eq!(names, vec!["a", "b", "c"]);
        }
        other => panic!("unexpected error: {other}"),
    }
    let message = err.to_string();
    for name in ["a:", "b:", "c:"] {
        assert!(message.contains(name), "{message}");
    }

    // Exhausted until reset
    assert_eq!(chain.current_index(), 3);
    let again = chain.store(&ctx, &item("v2")).await.unwrap_err();
    assert!(matches!(again, Error::AllProvidersExhausted { ref errors, .. } if errors.is_empty()));
}

// ============================================================================
// Retry-from-start policy
// ============================================================================

#[tokio::test]
async fn test_retry_from_start_retries_recovered_members() {
    let members = mocks(&["a", "b"]);
    members[0].set_failing(true);
    let chain = chain(&members).with_policy(FallbackPolicy::RetryFromStart);
    let ctx = OperationContext::new();

    chain.store(&ctx, &item("v1")).await.unwrap();
    assert_eq!(chain.current_index(), 1);

    members[0].set_failing(false);
    chain.store(&ctx, &item("v2")).await.unwrap();

    assert_eq!(members[0].call_count(), 2);
    assert_eq!(members[1].call_count(), 1);
    assert_eq!(chain.current_index(), 0);
}

// ============================================================================
// History
// ============================================================================

#[tokio::test]
async fn test_history_records_fallbacks() {
    let members = mocks(&["a", "b"]);
    members[0].set_failing(true);
    let chain = chain(&members);
    let ctx = OperationContext::new();

    chain.store(&ctx, &item("v1")).await.unwrap();

    let history = chain.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].operation, Operation::Store);
    assert_eq!(history[0].candidates, vec!["a", "b"]);
    assert_eq!(history[0].succeeded.as_deref(), Some("b"));
    assert_eq!(history[0].errors.len(), 1);
}

#[tokio::test]
async fn test_history_is_capped() {
    let members = mocks(&["a", "b"]);
    members[0].set_failing(true);
    let chain = chain(&members)
        .with_policy(FallbackPolicy::RetryFromStart)
        .with_history_limit(3);
    let ctx = OperationContext::new();

    for i in 0..5 {
        chain.store(&ctx, &item(&format!("v{i}"))).await.unwrap();
    }

    assert_eq!(chain.history().len(), 3);
}

// ============================================================================
// Coverage of the contract
// ============================================================================

#[tokio::test]
async fn test_lifecycle_reaches_every_member() {
    let members = mocks(&["a", "b"]);
    let chain = chain(&members);
    let ctx = OperationContext::new();

    chain.stop(&ctx).await.unwrap();

    assert!(members.iter().all(|m| m.stop_count() == 1));
}

#[tokio::test]
async fn test_lifecycle_stops_at_first_failure() {
    let members = mocks(&["a", "b"]);
    members[0].set_failing(true);
    let chain = chain(&members);
    let ctx = OperationContext::new();

    let err = chain.optimize(&ctx).await.unwrap_err();

    assert_eq!(err.provider(), Some("a"));
    assert_eq!(members[1].call_count(), 0);
}

#[tokio::test]
async fn test_descriptive_metadata() {
    let members = vec![
        MockProvider::new("a").shared(),
        MockProvider::new("b").cloud().shared(),
    ];
    members[0].set_failing(true);
    let chain = chain(&members);
    let ctx = OperationContext::new();

    assert_eq!(chain.name(), "provider_chain");
    assert_eq!(chain.provider_type(), "chain");
    assert_eq!(chain.capabilities(), vec!["a", "b", "vector_storage"]);
    assert!(!chain.is_cloud());

    chain.store(&ctx, &item("v1")).await.unwrap();

    // Answers from the member now serving
    assert!(chain.is_cloud());
    assert_eq!(
        chain.configuration().get("name").and_then(|v| v.as_str()),
        Some("b")
    );
}

#[tokio::test]
async fn test_cancellation_does_not_advance() {
    let members = vec![
        Arc::new(vpm_providers::InMemoryVectorProvider::new()) as Arc<dyn VectorProvider>,
        Arc::new(vpm_providers::InMemoryVectorProvider::new()) as Arc<dyn VectorProvider>,
    ];
    let chain = FallbackChain::new(members);
    let ctx = OperationContext::new();
    ctx.cancel();

    let err = chain.store(&ctx, &item("v1")).await.unwrap_err();

    assert!(matches!(err.root(), Error::Cancelled { .. }));
    assert_eq!(chain.current_index(), 0);
}

#[tokio::test]
async fn test_empty_chain() {
    let chain = FallbackChain::new(Vec::new());
    let ctx = OperationContext::new();

    assert!(chain.is_empty());
    assert!(matches!(
        chain.store(&ctx, &item("v1")).await,
        Err(Error::AllProvidersExhausted { .. })
    ));
    assert!(!chain.health(&ctx).await.unwrap().is_healthy());
    assert!(chain.configuration().is_empty());
}
