//! Health report types for the application context
//!
//! A report is a list of per-component probes plus an aggregate score.
//! Nothing here touches the components themselves; `AppContext` runs the
//! probes and hands the results over.

use std::time::SystemTime;

use serde::Serialize;

/// Minimum score still considered healthy.
const HEALTHY_SCORE: f64 = 0.8;

/// Aggregate health report over all application components
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub is_healthy: bool,
    /// Fraction of healthy components, 0.0 to 1.0.
    pub score: f64,
    pub components: Vec<ComponentHealth>,
    /// Unix timestamp of the probe run.
    pub checked_at: i64,
}

impl HealthStatus {
    /// Scores a finished probe run. An empty run counts as healthy.
    pub fn from_components(components: Vec<ComponentHealth>) -> Self {
        let score = if components.is_empty() {
            1.0
        } else {
            let healthy = components.iter().filter(|c| c.is_healthy).count();
            healthy as f64 / components.len() as f64
        };
        Self { is_healthy: score >= HEALTHY_SCORE, score, components, checked_at: now_epoch() }
    }
}

/// Outcome of probing one component
#[derive(Debug, Clone, Serialize)]
pub struct ComponentHealth {
    /// Component identifier (e.g. "database", "quote_service")
    pub name: String,
    pub is_healthy: bool,
    /// Failure detail, absent when healthy.
    pub detail: Option<String>,
}

impl ComponentHealth {
    pub fn healthy(name: impl Into<String>) -> Self {
        Self { name: name.into(), is_healthy: true, detail: None }
    }

    pub fn unhealthy(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self { name: name.into(), is_healthy: false, detail: Some(detail.into()) }
    }
}

fn now_epoch() -> i64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|dur| dur.as_secs() as i64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_run_counts_as_healthy() {
        let status = HealthStatus::from_components(Vec::new());
        assert!(status.is_healthy);
        assert_eq!(status.score, 1.0);
        assert!(status.checked_at > 0);
    }

    #[test]
    fn score_is_the_healthy_fraction() {
        let status = HealthStatus::from_components(vec![
            ComponentHealth::healthy("database"),
            ComponentHealth::unhealthy("renderer", "fonts missing"),
        ]);
        assert_eq!(status.score, 0.5);
        assert!(!status.is_healthy);
    }

    #[test]
    fn threshold_is_inclusive() {
        let mut components: Vec<_> =
            ["a", "b", "c", "d"].into_iter().map(ComponentHealth::healthy).collect();
        components.push(ComponentHealth::unhealthy("e", "down"));

        let status = HealthStatus::from_components(components);
        assert_eq!(status.score, 0.8);
        assert!(status.is_healthy);
    }

    #[test]
    fn constructors_carry_the_detail() {
        let healthy = ComponentHealth::healthy("database");
        assert!(healthy.is_healthy);
        assert!(healthy.detail.is_none());

        let unhealthy = ComponentHealth::unhealthy("database", "query failed");
        assert!(!unhealthy.is_healthy);
        assert_eq!(unhealthy.detail.as_deref(), Some("query failed"));
    }
}
