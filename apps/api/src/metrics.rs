//! Per-request metrics.
//!
//! `MetricsSink` is a seam: the default sink emits a structured tracing event
//! per request, and tests swap in a recording stub. Outcome labels use a
//! fixed vocabulary so downstream log queries stay stable.

use std::time::Duration;

use uuid::Uuid;

use crate::generation::validator::ValidationOutcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    Validated,
    Repaired,
    Fallback,
    Error,
}

impl RequestOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestOutcome::Validated => "validated",
            RequestOutcome::Repaired => "repaired",
            RequestOutcome::Fallback => "fallback",
            RequestOutcome::Error => "error",
        }
    }
}

impl From<ValidationOutcome> for RequestOutcome {
    fn from(outcome: ValidationOutcome) -> Self {
        match outcome {
            ValidationOutcome::Validated => RequestOutcome::Validated,
            ValidationOutcome::Repaired => RequestOutcome::Repaired,
            ValidationOutcome::Fallback => RequestOutcome::Fallback,
        }
    }
}

#[derive(Debug)]
pub struct RequestMetrics {
    pub request_id: Uuid,
    pub template_type: &'static str,
    pub duration: Duration,
    pub outcome: RequestOutcome,
}

pub trait MetricsSink: Send + Sync {
    fn record(&self, metrics: &RequestMetrics);
}

/// Default sink: one structured log event per completed request.
pub struct TracingMetrics;

impl MetricsSink for TracingMetrics {
    fn record(&self, metrics: &RequestMetrics) {
        tracing::info!(
            request_id = %metrics.request_id,
            template_type = metrics.template_type,
            duration_ms = metrics.duration.as_millis() as u64,
            outcome = metrics.outcome.as_str(),
            "script request completed"
        );
    }
}
