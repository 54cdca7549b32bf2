//! Provider manager tests
//!
//! Managers are built over [`mock_registry`]; each configured instance
//! name selects the mock with the same name.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

use vpm_domain::VectorProviderAdmin;
use vpm_domain::error::Error;
use vpm_domain::value_objects::{HealthState, OperationContext, VectorData};
use vpm_domain::VectorProvider;
use vpm_infrastructure::config::{
    FactoryConfig, FallbackConfig, HealthCheckConfig, HybridConfig, ManagerConfig, ProviderConfig,
};
use vpm_infrastructure::manager::{ManagerPhase, ProviderManager};
use vpm_infrastructure::routing::HybridStrategy;

use crate::test_utils::{MOCK_TYPE, MockProvider, mock_registry};

fn config_for(names: &[&str]) -> ManagerConfig {
    ManagerConfig {
        providers: names
            .iter()
            .map(|name| (name.to_string(), ProviderConfig::new(MOCK_TYPE)))
            .collect(),
        health: HealthCheckConfig {
            enabled: false,
            ..HealthCheckConfig::default()
        },
        ..ManagerConfig::default()
    }
}

fn manager(config: ManagerConfig, mocks: &[Arc<MockProvider>]) -> ProviderManager {
    ProviderManager::new(config, mock_registry(mocks))
}

async fn ready(mocks: &[Arc<MockProvider>]) -> ProviderManager {
    let names: Vec<&str> = mocks.iter().map(|mock| mock.name()).collect();
    let manager = manager(config_for(&names), mocks);
    manager.initialize(&OperationContext::new()).await.unwrap();
    manager
}

fn item(id: &str) -> Vec<VectorData> {
    vec![VectorData::new(id, vec![1.0, 0.0])]
}

// ============================================================================
// Initialization
// ============================================================================

#[tokio::test]
async fn test_initialize_prefers_healthy_local_instance() {
    let a = MockProvider::new("a").with_health(HealthState::Degraded).shared();
    let b = MockProvider::new("b").cloud().shared();
    let c = MockProvider::new("c").shared();

    let manager = ready(&[a, b, c]).await;

    assert_eq!(manager.phase(), ManagerPhase::Ready);
    assert_eq!(manager.active_provider_name().await.as_deref(), Some("c"));
}

#[tokio::test]
async fn test_initialize_falls_back_to_cloud() {
    let local = MockProvider::new("local").with_health(HealthState::Degraded).shared();
    let remote = MockProvider::new("remote").cloud().shared();

    let manager = ready(&[local, remote]).await;

    assert_eq!(manager.active_provider_name().await.as_deref(), Some("remote"));
}

#[tokio::test]
async fn test_initialize_without_healthy_instance_uses_first() {
    let a = MockProvider::new("a").with_health(HealthState::Degraded).shared();
    let b = MockProvider::new("b").with_health(HealthState::Unreachable).shared();

    let manager = ready(&[a, b]).await;

    assert_eq!(manager.active_provider_name().await.as_deref(), Some("a"));
}

#[tokio::test]
async fn test_initialize_uses_configured_active_provider() {
    let a = MockProvider::new("a").shared();
    let b = MockProvider::new("b").shared();
    let mut config = config_for(&["a", "b"]);
    config.active_provider = Some("b".to_string());

    let manager = manager(config, &[a, b]);
    manager.initialize(&OperationContext::new()).await.unwrap();

    assert_eq!(manager.active_provider_name().await.as_deref(), Some("b"));
}

#[tokio::test]
async fn test_initialize_twice_is_rejected() {
    let manager = ready(&[MockProvider::new("a").shared()]).await;

    let err = manager.initialize(&OperationContext::new()).await.unwrap_err();

    assert!(matches!(err, Error::Lifecycle { .. }));
    assert_eq!(manager.phase(), ManagerPhase::Ready);
}

#[tokio::test]
async fn test_initialize_without_instances_fails() {
    let manager = manager(config_for(&[]), &[]);

    let err = manager.initialize(&OperationContext::new()).await.unwrap_err();

    assert!(matches!(err, Error::NoActiveProvider));
    assert_eq!(manager.phase(), ManagerPhase::Uninitialized);
}

#[tokio::test]
async fn test_failed_start_rolls_back() {
    let a = MockProvider::new("a").shared();
    let b = MockProvider::new("b").shared();
    b.set_fail_start(true);
    let manager = manager(config_for(&["a", "b"]), &[Arc::clone(&a), Arc::clone(&b)]);

    let err = manager.initialize(&OperationContext::new()).await.unwrap_err();

    assert_eq!(err.provider(), Some("b"));
    assert_eq!(manager.phase(), ManagerPhase::Uninitialized);
    assert!(manager.list_providers().await.is_empty());
    assert_eq!(a.stop_count(), 1);
    assert_eq!(b.stop_count(), 1);
}

#[tokio::test]
async fn test_failed_start_skipped_without_fail_fast() {
    let a = MockProvider::new("a").shared();
    let b = MockProvider::new("b").shared();
    b.set_fail_start(true);
    let config = ManagerConfig {
        factory: FactoryConfig {
            fail_fast: false,
            ..FactoryConfig::default()
        },
        ..config_for(&["a", "b"])
    };

    let manager = manager(config, &[a, b]);
    manager.initialize(&OperationContext::new()).await.unwrap();

    let listed = manager.list_providers().await;
    assert_eq!(listed.len(), 1);
    assert!(listed.contains_key("a"));
}

#[tokio::test]
async fn test_hybrid_member_skipped_without_fail_fast() {
    let a = MockProvider::new("a").shared();
    let b = MockProvider::new("b").shared();
    b.set_fail_start(true);
    let config = ManagerConfig {
        factory: FactoryConfig {
            fail_fast: false,
            ..FactoryConfig::default()
        },
        hybrid: Some(HybridConfig {
            strategy: HybridStrategy::OperationBased,
            members: BTreeMap::from([("store".into(), "a".into()), ("search".into(), "b".into())]),
            routes: HashMap::from([
                ("store".into(), "store".into()),
                ("similar".into(), "search".into()),
            ]),
        }),
        ..config_for(&["a", "b"])
    };
    let manager = manager(config, &[Arc::clone(&a), b]);
    manager.initialize(&OperationContext::new()).await.unwrap();

    let router = manager.hybrid_router().unwrap();
    let ctx = OperationContext::new();
    router.store(&ctx, &item("v1")).await.unwrap();
    router.find_similar(&ctx, &[1.0, 0.0], 1, &Default::default()).await.unwrap();

    assert_eq!(manager.phase(), ManagerPhase::Ready);
    assert!(!router.capabilities().contains(&"b".to_string()));
    assert_eq!(a.call_count(), 2);
}

#[tokio::test]
async fn test_hybrid_without_running_members_fails() {
    let a = MockProvider::new("a").shared();
    let b = MockProvider::new("b").shared();
    b.set_fail_start(true);
    let config = ManagerConfig {
        factory: FactoryConfig {
            fail_fast: false,
            ..FactoryConfig::default()
        },
        hybrid: Some(HybridConfig {
            members: BTreeMap::from([("search".into(), "b".into())]),
            ..HybridConfig::default()
        }),
        ..config_for(&["a", "b"])
    };
    let manager = manager(config, &[Arc::clone(&a), b]);

    let err = manager.initialize(&OperationContext::new()).await.unwrap_err();

    assert!(matches!(err, Error::ConfigurationInvalid { .. }));
    assert_eq!(manager.phase(), ManagerPhase::Uninitialized);
    assert_eq!(a.stop_count(), 1);
}

// ============================================================================
// Switching
// ============================================================================

#[tokio::test]
async fn test_switch_provider() {
    let a = MockProvider::new("a").shared();
    let b = MockProvider::new("b").shared();
    let manager = ready(&[a, Arc::clone(&b)]).await;
    let ctx = OperationContext::new();

    manager.switch_provider(&ctx, "b").await.unwrap();
    manager.store(&ctx, &item("v1")).await.unwrap();

    assert_eq!(manager.active_provider_name().await.as_deref(), Some("b"));
    assert_eq!(manager.phase(), ManagerPhase::Ready);
    assert_eq!(b.call_count(), 1);
}

#[tokio::test]
async fn test_switch_to_unhealthy_keeps_active() {
    let a = MockProvider::new("a").shared();
    let b = MockProvider::new("b").shared();
    let manager = ready(&[a, Arc::clone(&b)]).await;
    let ctx = OperationContext::new();

    b.set_health(HealthState::Degraded);
    let err = manager.switch_provider(&ctx, "b").await.unwrap_err();
    assert!(matches!(err, Error::ProviderUnhealthy { ref name, .. } if name == "b"));

    b.set_health(HealthState::Healthy);
    b.set_health_error(true);
    let err = manager.switch_provider(&ctx, "b").await.unwrap_err();
    assert!(matches!(err, Error::ProviderUnhealthy { .. }));

    assert_eq!(manager.active_provider_name().await.as_deref(), Some("a"));
}

#[tokio::test]
async fn test_switch_to_unknown_provider() {
    let manager = ready(&[MockProvider::new("a").shared()]).await;

    let err = manager
        .switch_provider(&OperationContext::new(), "ghost")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::ProviderNotFound { ref name } if name == "ghost"));
    assert_eq!(manager.active_provider_name().await.as_deref(), Some("a"));
}

// ============================================================================
// Request path
// ============================================================================

#[tokio::test]
async fn test_requests_reach_active_instance() {
    let manager = ready(&[MockProvider::new("a").shared()]).await;
    let ctx = OperationContext::new();

    manager.store(&ctx, &item("v1")).await.unwrap();
    let found = manager.retrieve(&ctx, &["v1".to_string()]).await.unwrap();
    let neighbours = manager
        .find_similar(&ctx, &[1.0, 0.0], 1, &Default::default())
        .await
        .unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(neighbours[0].id, "v1");

    let performance = manager.get_provider_performance();
    let record = &performance["a"];
    assert_eq!(record.total_operations, 3);
    assert_eq!(record.successful_operations, 3);
    assert_eq!(record.operations.get("store"), Some(&1));
}

#[tokio::test]
async fn test_request_errors_are_tagged_and_counted() {
    let a = MockProvider::new("a").shared();
    let manager = ready(&[Arc::clone(&a)]).await;

    a.set_failing(true);
    let err = manager
        .store(&OperationContext::new(), &item("v1"))
        .await
        .unwrap_err();

    assert_eq!(err.provider(), Some("a"));
    assert!(matches!(err.root(), Error::VectorDb { .. }));
    assert_eq!(manager.get_provider_performance()["a"].failed_operations, 1);
}

#[tokio::test]
async fn test_stats_backup_and_restore_use_active_instance() {
    let a = MockProvider::new("a").shared();
    let b = MockProvider::new("b").shared();
    let manager = ready(&[a, Arc::clone(&b)]).await;
    let ctx = OperationContext::new();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.json");

    manager.store(&ctx, &item("v1")).await.unwrap();
    assert_eq!(manager.get_stats(&ctx).await.unwrap().total_vectors, 1);
    manager.backup(&ctx, &path).await.unwrap();

    manager.switch_provider(&ctx, "b").await.unwrap();
    manager.restore(&ctx, &path).await.unwrap();
    assert_eq!(manager.get_stats(&ctx).await.unwrap().total_vectors, 1);

    b.set_failing(true);
    let err = manager.backup(&ctx, &path).await.unwrap_err();
    assert_eq!(err.provider(), Some("b"));

    let performance = manager.get_provider_performance();
    assert_eq!(performance["a"].operations.get("backup"), Some(&1));
    assert_eq!(performance["b"].operations.get("restore"), Some(&1));
    assert_eq!(performance["b"].failed_operations, 1);
}

#[tokio::test]
async fn test_optimize_providers_records_each_instance() {
    let a = MockProvider::new("a").shared();
    let b = MockProvider::new("b").shared();
    let manager = ready(&[Arc::clone(&a), b]).await;

    a.set_failing(true);
    manager.optimize_providers(&OperationContext::new()).await;

    let performance = manager.get_provider_performance();
    assert_eq!(performance["a"].failed_operations, 1);
    assert_eq!(performance["b"].successful_operations, 1);
}

// ============================================================================
// Administration
// ============================================================================

#[tokio::test]
async fn test_list_providers() {
    let a = MockProvider::new("a").shared();
    let b = MockProvider::new("b").cloud().with_health(HealthState::Degraded).shared();
    let manager = ready(&[a, b]).await;

    let listed = manager.list_providers().await;

    assert!(listed["a"].is_active);
    assert!(listed["a"].is_healthy);
    assert!(!listed["b"].is_active);
    assert!(!listed["b"].is_healthy);
    assert!(listed["b"].is_cloud);
    assert_eq!(listed["b"].provider_type, MOCK_TYPE);
}

#[tokio::test]
async fn test_get_provider_health_marks_probe_errors() {
    let a = MockProvider::new("a").shared();
    let b = MockProvider::new("b").shared();
    let manager = ready(&[a, Arc::clone(&b)]).await;

    b.set_health_error(true);
    let health = manager.get_provider_health(&OperationContext::new()).await;

    assert!(health["a"].is_healthy);
    assert_eq!(health["b"].state, HealthState::Unreachable);
    assert_eq!(health["b"].error_count, 1);
    assert!(health["b"].last_error.is_some());
    assert!(health["b"].last_check.is_some());
}

#[tokio::test]
async fn test_add_and_remove_provider() {
    let a = MockProvider::new("a").shared();
    let manager = ready(&[Arc::clone(&a)]).await;
    let ctx = OperationContext::new();
    let extra = MockProvider::new("extra").shared();

    manager
        .add_provider("extra", Arc::clone(&extra) as Arc<dyn VectorProvider>)
        .await
        .unwrap();
    let duplicate = manager
        .add_provider("extra", extra as Arc<dyn VectorProvider>)
        .await
        .unwrap_err();
    assert!(matches!(duplicate, Error::InvalidArgument { .. }));
    assert_eq!(manager.get_provider("extra").await.unwrap().name(), "extra");

    manager.remove_provider(&ctx, "a").await.unwrap();
    assert_eq!(a.stop_count(), 1);
    assert!(matches!(
        manager.active_provider().await,
        Err(Error::NoActiveProvider)
    ));
    assert!(matches!(
        manager.store(&ctx, &item("v1")).await,
        Err(Error::NoActiveProvider)
    ));
    assert!(matches!(
        manager.remove_provider(&ctx, "a").await,
        Err(Error::ProviderNotFound { .. })
    ));

    manager.switch_provider(&ctx, "extra").await.unwrap();
    manager.store(&ctx, &item("v1")).await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_removed_provider_leaves_no_health_record() {
    let manager = Arc::new(ready(&[MockProvider::new("a").shared()]).await);
    let ctx = OperationContext::new();
    let slow = MockProvider::new("slow")
        .with_health_latency(Duration::from_millis(200))
        .shared();
    manager
        .add_provider("slow", slow as Arc<dyn VectorProvider>)
        .await
        .unwrap();

    let probing = {
        let manager = Arc::clone(&manager);
        tokio::spawn(async move { manager.get_provider_health(&OperationContext::new()).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    manager.remove_provider(&ctx, "slow").await.unwrap();

    let during = probing.await.unwrap();
    assert!(!during.contains_key("slow"));
    let after = manager.get_provider_health(&ctx).await;
    let mut names: Vec<_> = after.keys().cloned().collect();
    names.sort();
    assert_eq!(names, vec!["a"]);
}

#[tokio::test]
async fn test_shutdown_is_idempotent() {
    let a = MockProvider::new("a").shared();
    let manager = ready(&[Arc::clone(&a)]).await;
    let ctx = OperationContext::new();

    manager.shutdown(&ctx).await.unwrap();
    manager.shutdown(&ctx).await.unwrap();

    assert_eq!(manager.phase(), ManagerPhase::ShutDown);
    assert_eq!(a.stop_count(), 1);
    assert!(manager.list_providers().await.is_empty());
    assert!(manager.active_provider_name().await.is_none());
    assert!(matches!(
        manager.switch_provider(&ctx, "a").await,
        Err(Error::Lifecycle { .. })
    ));
}

// ============================================================================
// Composites and background health
// ============================================================================

#[tokio::test]
async fn test_fallback_chain_from_config() {
    let a = MockProvider::new("a").shared();
    let b = MockProvider::new("b").shared();
    let config = ManagerConfig {
        fallback: FallbackConfig {
            providers: vec!["a".into(), "b".into()],
            history_limit: 10,
            ..FallbackConfig::default()
        },
        ..config_for(&["a", "b"])
    };
    let manager = manager(config, &[Arc::clone(&a), Arc::clone(&b)]);
    manager.initialize(&OperationContext::new()).await.unwrap();

    a.set_failing(true);
    let chain = manager.fallback_chain().unwrap();
    chain
        .store(&OperationContext::new(), &item("v1"))
        .await
        .unwrap();

    assert_eq!(chain.len(), 2);
    assert_eq!(b.call_count(), 1);
    let history = manager.fallback_history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].succeeded.as_deref(), Some("b"));
}

#[tokio::test]
async fn test_hybrid_router_from_config() {
    let a = MockProvider::new("a").shared();
    let b = MockProvider::new("b").shared();
    let config = ManagerConfig {
        hybrid: Some(HybridConfig {
            strategy: HybridStrategy::OperationBased,
            members: BTreeMap::from([("fast".into(), "a".into()), ("slow".into(), "b".into())]),
            routes: HashMap::from([("store".into(), "slow".into())]),
        }),
        ..config_for(&["a", "b"])
    };
    let manager = manager(config, &[Arc::clone(&a), Arc::clone(&b)]);
    manager.initialize(&OperationContext::new()).await.unwrap();

    let router = manager.hybrid_router().unwrap();
    router
        .store(&OperationContext::new(), &item("v1"))
        .await
        .unwrap();

    assert_eq!(router.name(), "Hybrid(operation_based)");
    assert_eq!(b.call_count(), 1);
    assert_eq!(a.call_count(), 0);
    assert!(manager.fallback_chain().is_none());
}

#[tokio::test]
async fn test_invalid_hybrid_route_rolls_back() {
    let a = MockProvider::new("a").shared();
    let config = ManagerConfig {
        hybrid: Some(HybridConfig {
            members: BTreeMap::from([("fast".into(), "a".into())]),
            routes: HashMap::from([("compact".into(), "fast".into())]),
            ..HybridConfig::default()
        }),
        ..config_for(&["a"])
    };
    let manager = manager(config, &[Arc::clone(&a)]);

    let err = manager.initialize(&OperationContext::new()).await.unwrap_err();

    assert!(matches!(err, Error::ConfigurationInvalid { .. }));
    assert_eq!(manager.phase(), ManagerPhase::Uninitialized);
    assert_eq!(a.stop_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_background_health_checks_update_table() {
    let a = MockProvider::new("a").shared();
    let b = MockProvider::new("b").shared();
    let config = ManagerConfig {
        health: HealthCheckConfig {
            enabled: true,
            interval_secs: 1,
        },
        ..config_for(&["a", "b"])
    };
    let manager = manager(config, &[Arc::clone(&a), Arc::clone(&b)]);
    let ctx = OperationContext::new();
    manager.initialize(&ctx).await.unwrap();
    assert!(manager.list_providers().await["b"].is_healthy);

    b.set_health(HealthState::Degraded);
    tokio::time::sleep(Duration::from_millis(2500)).await;

    assert!(!manager.list_providers().await["b"].is_healthy);

    manager.shutdown(&ctx).await.unwrap();
    b.set_health(HealthState::Healthy);
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert!(manager.list_providers().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_zero_health_interval_uses_default() {
    let a = MockProvider::new("a").shared();
    let config = ManagerConfig {
        health: HealthCheckConfig {
            enabled: true,
            interval_secs: 0,
        },
        ..config_for(&["a"])
    };
    let manager = manager(config, &[Arc::clone(&a)]);
    let ctx = OperationContext::new();
    manager.initialize(&ctx).await.unwrap();

    a.set_health(HealthState::Degraded);
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(manager.list_providers().await["a"].is_healthy);

    tokio::time::sleep(Duration::from_secs(25)).await;
    assert!(!manager.list_providers().await["a"].is_healthy);

    manager.shutdown(&ctx).await.unwrap();
}
