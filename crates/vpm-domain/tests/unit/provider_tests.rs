//! Unit tests for cost, health and provider descriptors

use vpm_domain::value_objects::{CostInfo, HealthState, HealthStatus};

#[test]
fn test_cost_info_sum() {
    let total: CostInfo = vec![CostInfo::monthly(10.0), CostInfo::monthly(2.5), CostInfo::free()]
        .into_iter()
        .sum();

    assert_eq!(total.currency, "USD");
    assert_eq!(total.billing_period, "monthly");
    assert!((total.total_cost - 12.5).abs() < f64::EPSILON);
    assert!((total.compute_cost - 12.5).abs() < f64::EPSILON);
}

#[test]
fn test_health_state_predicates() {
    assert!(HealthState::Healthy.is_healthy());
    assert!(HealthState::Degraded.is_operational());
    assert!(!HealthState::Degraded.is_healthy());
    assert!(!HealthState::Unreachable.is_operational());
    assert_eq!(HealthState::default(), HealthState::NotInitialized);
}

#[test]
fn test_health_status_constructors() {
    let healthy = HealthStatus::healthy().with_response_time(4);
    assert!(healthy.is_healthy());
    assert_eq!(healthy.response_time_ms, 4);

    let degraded = HealthStatus::degraded("replica lag").with_detail("lag_ms", 250);
    assert_eq!(degraded.state, HealthState::Degraded);
    assert_eq!(degraded.message, "replica lag");
    assert_eq!(degraded.details.get("lag_ms"), Some(&serde_json::json!(250)));
}

#[test]
fn test_health_state_serializes_snake_case() {
    let json = serde_json::to_string(&HealthState::NotStarted).unwrap();
    assert_eq!(json, "\"not_started\"");
}
