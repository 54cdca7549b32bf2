//! Monitoring decorator tests

use std::sync::Arc;
use std::time::Duration;

use vpm_domain::value_objects::{OperationContext, VectorData};
use vpm_domain::{VectorProvider, VectorProviderAdmin};
use vpm_infrastructure::monitoring::{MonitoredProvider, ProviderMetrics};

use crate::test_utils::MockProvider;

#[tokio::test]
async fn test_records_success_and_failure() {
    let mock = MockProvider::new("a")
        .with_latency(Duration::from_millis(2))
        .shared();
    let monitored = MonitoredProvider::new(Arc::clone(&mock) as Arc<dyn VectorProvider>);
    let ctx = OperationContext::new();

    monitored
        .store(&ctx, &[VectorData::new("v1", vec![1.0])])
        .await
        .unwrap();
    mock.set_failing(true);
    assert!(monitored.retrieve(&ctx, &["v1".to_string()]).await.is_err());

    let metrics = monitored.metrics();
    assert_eq!(metrics.total_operations, 2);
    assert_eq!(metrics.successful_operations, 1);
    assert_eq!(metrics.failed_operations, 1);
    assert!(metrics.min_latency > Duration::ZERO);
    assert!(metrics.max_latency >= metrics.min_latency);
    assert!((metrics.error_rate() - 0.5).abs() < f64::EPSILON);
    assert!(metrics.last_operation.is_some());
}

#[test]
fn test_descriptive_calls_are_not_recorded() {
    let monitored = MonitoredProvider::new(MockProvider::new("a").cloud().shared());

    assert_eq!(monitored.name(), "a");
    assert_eq!(monitored.provider_type(), "mock");
    assert!(monitored.is_cloud());
    let _ = monitored.capabilities();
    let _ = monitored.configuration();

    assert_eq!(monitored.metrics(), ProviderMetrics::default());
}

#[tokio::test]
async fn test_snapshot_is_a_copy() {
    let monitored = MonitoredProvider::new(MockProvider::new("a").shared());
    let ctx = OperationContext::new();

    let before = monitored.metrics();
    monitored.health(&ctx).await.unwrap();

    assert_eq!(before.total_operations, 0);
    assert_eq!(monitored.metrics().total_operations, 1);
    assert_eq!(monitored.inner().name(), "a");
}

#[test]
fn test_average_latency() {
    let mut metrics = ProviderMetrics::default();
    assert_eq!(metrics.average_latency(), Duration::ZERO);
    assert!(metrics.error_rate().abs() < f64::EPSILON);

    metrics.record(Duration::from_millis(10), true);
    metrics.record(Duration::from_millis(30), true);

    assert_eq!(metrics.average_latency(), Duration::from_millis(20));
    assert_eq!(metrics.min_latency, Duration::from_millis(10));
    assert_eq!(metrics.max_latency, Duration::from_millis(30));
}
