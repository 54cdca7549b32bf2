//! Hybrid router tests

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use vpm_domain::error::Error;
use vpm_domain::value_objects::{
    CostInfo, HealthState, Operation, OperationContext, VectorData, VectorQuery,
};
use vpm_domain::{VectorProvider, VectorProviderAdmin};
use vpm_infrastructure::routing::{HybridRouter, HybridStrategy};

use crate::test_utils::MockProvider;

fn members(mocks: &[(&str, &Arc<MockProvider>)]) -> BTreeMap<String, Arc<dyn VectorProvider>> {
    mocks
        .iter()
        .map(|(role, mock)| (role.to_string(), Arc::clone(mock) as Arc<dyn VectorProvider>))
        .collect()
}

fn item(id: &str) -> Vec<VectorData> {
    vec![VectorData::new(id, vec![1.0, 0.0])]
}

// ============================================================================
// Strategies
// ============================================================================

#[tokio::test]
async fn test_round_robin_visits_members_evenly() {
    let mocks: Vec<_> = ["a", "b", "c"]
        .iter()
        .map(|name| MockProvider::new(name).shared())
        .collect();
    let router = HybridRouter::new(
        members(&[("one", &mocks[0]), ("two", &mocks[1]), ("three", &mocks[2])]),
        HybridStrategy::RoundRobin,
        HashMap::new(),
    )
    .unwrap();
    let ctx = OperationContext::new();

    for i in 0..7 {
        router.store(&ctx, &item(&format!("v{i}"))).await.unwrap();
    }

    let mut counts: Vec<_> = mocks.iter().map(|m| m.call_count()).collect();
    counts.sort_unstable();
    assert_eq!(counts, vec![2, 2, 3]);
}

#[tokio::test]
async fn test_load_balance_is_round_robin() {
    let a = MockProvider::new("a").shared();
    let b = MockProvider::new("b").shared();
    let router = HybridRouter::new(
        members(&[("a", &a), ("b", &b)]),
        HybridStrategy::LoadBalance,
        HashMap::new(),
    )
    .unwrap();
    let ctx = OperationContext::new();

    for i in 0..4 {
        router.store(&ctx, &item(&format!("v{i}"))).await.unwrap();
    }

    assert_eq!(a.call_count(), 2);
    assert_eq!(b.call_count(), 2);
}

#[tokio::test]
async fn test_failover_always_uses_first_role() {
    let a = MockProvider::new("a").shared();
    let b = MockProvider::new("b").shared();
    a.set_failing(true);
    let router = HybridRouter::new(
        members(&[("primary", &a), ("secondary", &b)]),
        HybridStrategy::Failover,
        HashMap::new(),
    )
    .unwrap();
    let ctx = OperationContext::new();

    // Selection never retries elsewhere
    let err = router.store(&ctx, &item("v1")).await.unwrap_err();
    assert_eq!(err.provider(), Some("a"));
    assert_eq!(b.call_count(), 0);
}

#[tokio::test]
async fn test_operation_based_routing() {
    let fast = MockProvider::new("fast").shared();
    let durable = MockProvider::new("durable").shared();
    let router = HybridRouter::new(
        members(&[("search", &fast), ("store", &durable)]),
        HybridStrategy::OperationBased,
        HashMap::from([
            (Operation::Store, "store".to_string()),
            (Operation::Search, "search".to_string()),
        ]),
    )
    .unwrap();
    let ctx = OperationContext::new();

    router.store(&ctx, &item("v1")).await.unwrap();
    assert_eq!(durable.call_count(), 1);
    assert_eq!(fast.call_count(), 0);

    router
        .search(&ctx, &VectorQuery::new(vec![1.0, 0.0]))
        .await
        .unwrap();
    assert_eq!(fast.call_count(), 1);

    // Unmapped operations use the first role ("search" sorts first)
    router.retrieve(&ctx, &["v1".to_string()]).await.unwrap();
    assert_eq!(fast.call_count(), 2);
    assert_eq!(router.select(Operation::Delete).0, "search");
    assert_eq!(router.select(Operation::Store).0, "store");
}

#[test]
fn test_route_to_unknown_role_is_rejected() {
    let a = MockProvider::new("a").shared();
    let result = HybridRouter::new(
        members(&[("a", &a)]),
        HybridStrategy::OperationBased,
        HashMap::from([(Operation::Store, "missing".to_string())]),
    );

    assert!(matches!(result, Err(Error::ConfigurationInvalid { .. })));
}

#[test]
fn test_router_needs_members() {
    let result = HybridRouter::new(BTreeMap::new(), HybridStrategy::Failover, HashMap::new());

    assert!(matches!(result, Err(Error::ConfigurationInvalid { .. })));
}

// ============================================================================
// Aggregation
// ============================================================================

#[tokio::test]
async fn test_health_aggregates_members() {
    let a = MockProvider::new("a").shared();
    let b = MockProvider::new("b").shared();
    let router = HybridRouter::new(
        members(&[("read", &a), ("write", &b)]),
        HybridStrategy::Failover,
        HashMap::new(),
    )
    .unwrap();
    let ctx = OperationContext::new();

    let healthy = router.health(&ctx).await.unwrap();
    assert!(healthy.is_healthy());
    assert_eq!(healthy.message, "All providers healthy");

    b.set_health(HealthState::Degraded);
    a.set_health_error(true);
    let degraded = router.health(&ctx).await.unwrap();
    assert_eq!(degraded.state, HealthState::Degraded);
    assert!(degraded.message.starts_with("read: unhealthy ("));
    assert!(degraded.message.contains("; write: unhealthy ("));
}

#[tokio::test]
async fn test_lifecycle_collects_all_errors() {
    let a = MockProvider::new("a").shared();
    let b = MockProvider::new("b").shared();
    a.set_fail_start(true);
    b.set_fail_start(true);
    let router = HybridRouter::new(
        members(&[("a", &a), ("b", &b)]),
        HybridStrategy::Failover,
        HashMap::new(),
    )
    .unwrap();
    let ctx = OperationContext::new();

    let err = router.start(&ctx).await.unwrap_err();
    let message = err.to_string();
    assert!(matches!(err, Error::Lifecycle { .. }));
    assert!(message.contains("a: "));
    assert!(message.contains("; b: "));

    router.stop(&ctx).await.unwrap();
    assert_eq!(a.stop_count(), 1);
    assert_eq!(b.stop_count(), 1);
}

#[test]
fn test_descriptive_aggregation() {
    let local = MockProvider::new("local")
        .with_cost(CostInfo::monthly(5.0))
        .shared();
    let remote = MockProvider::new("remote")
        .cloud()
        .with_cost(CostInfo::monthly(20.0))
        .shared();
    let router = HybridRouter::new(
        members(&[("local", &local), ("remote", &remote)]),
        HybridStrategy::RoundRobin,
        HashMap::new(),
    )
    .unwrap();

    assert_eq!(router.name(), "Hybrid(round_robin)");
    assert_eq!(router.provider_type(), "hybrid");
    assert!(router.is_cloud());
    assert!((router.cost_info().total_cost - 25.0).abs() < f64::EPSILON);
    assert_eq!(router.cost_info().currency, "USD");
    assert_eq!(
        router.capabilities(),
        vec!["local", "remote", "vector_storage"]
    );

    let config = router.configuration();
    assert_eq!(config.get("strategy").and_then(|v| v.as_str()), Some("round_robin"));
    assert!(config["providers"].get("remote").is_some());
}
