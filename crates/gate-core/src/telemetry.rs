// crates/gate-core/src/telemetry.rs
// ============================================================================
// Module: Gate Telemetry
// Description: Observability hooks for gate stage outcomes and latencies.
// Purpose: Provide metric events without a hard dependency on a logging crate.
// Dependencies: none
// ============================================================================

//! ## Overview
//! This module exposes a thin metrics interface for per-stage counters and
//! latency histograms. It is intentionally dependency-light so downstream
//! deployments can plug in Prometheus or OpenTelemetry without redesign; no
//! `tracing`/`log` dependency is introduced anywhere in this workspace.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default latency buckets in milliseconds for gate stage histograms.
pub const GATE_LATENCY_BUCKETS_MS: &[u64] = &[1, 2, 5, 10, 25, 50, 100, 150, 200, 500, 1_000];

// ============================================================================
// SECTION: Metric Labels
// ============================================================================

/// Pipeline stage classification for telemetry labeling.
///
/// # Invariants
/// - Variants are stable for telemetry labeling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateStage {
    /// Ontology health probe.
    Health,
    /// Semantic authority check.
    Semantic,
    /// Parallel validator dispatch.
    Validators,
    /// Verdict aggregation.
    Aggregate,
    /// Verdict signing.
    Sign,
    /// Ledger persist.
    Persist,
}

impl GateStage {
    /// Returns a stable label for the stage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Health => "health",
            Self::Semantic => "semantic",
            Self::Validators => "validators",
            Self::Aggregate => "aggregate",
            Self::Sign => "sign",
            Self::Persist => "persist",
        }
    }
}

/// Outcome classification for a completed gate request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    /// The request completed with an `Allow` decision.
    Allow,
    /// The request completed with a `Deny` decision.
    Deny,
    /// The request completed with an `Escalate` decision.
    Escalate,
}

impl GateOutcome {
    /// Returns a stable label for the outcome.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Allow => "allow",
            Self::Deny => "deny",
            Self::Escalate => "escalate",
        }
    }
}

/// Metric event for a completed gate request.
#[derive(Debug, Clone)]
pub struct GateRequestEvent {
    /// Final decision outcome.
    pub outcome: GateOutcome,
    /// Named reason attached to the decision (e.g. `SEMANTIC_TIMEOUT`).
    pub reason: &'static str,
    /// Whether the verdict was certifiable.
    pub certifiable: bool,
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Metrics sink for gate requests and per-stage latencies.
pub trait GateMetrics: Send + Sync {
    /// Records a completed-request counter event.
    fn record_request(&self, event: GateRequestEvent);
    /// Records a latency observation for one pipeline stage.
    fn record_stage_latency(&self, stage: GateStage, latency: Duration);
}

/// No-op metrics sink.
///
/// # Invariants
/// - Metrics are intentionally discarded.
pub struct NoopMetrics;

impl GateMetrics for NoopMetrics {
    fn record_request(&self, _event: GateRequestEvent) {}

    fn record_stage_latency(&self, _stage: GateStage, _latency: Duration) {}
}
