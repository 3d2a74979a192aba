// crates/gate/src/timeouts.rs
// ============================================================================
// Module: Gate Timeouts
// Description: Per-stage deadlines enforced by the orchestrator.
// Purpose: Keep the orchestrator's own notion of its timing budget decoupled
//          from gate-config, which is an external collaborator's concern.
// Dependencies: none
// ============================================================================

//! ## Overview
//! `gate-service` is responsible for translating a loaded `gate_config::
//! TimeoutsConfig` into a [`GateTimeouts`]; this crate never depends on
//! `gate-config` directly so the orchestrator stays usable standalone (as
//! every test in this crate does, with defaults or hand-picked values).

// ============================================================================
// SECTION: Timeouts
// ============================================================================

/// Per-stage and total deadlines for one gate evaluation, all in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateTimeouts {
    /// Total governance latency budget for the whole pipeline.
    pub t_total_ms: u64,
    /// Semantic authority check deadline.
    pub t_sem_ms: u64,
    /// Per-validator call deadline.
    pub t_val_ms: u64,
    /// Ledger append deadline.
    pub t_persist_ms: u64,
    /// Health probe cache lifetime.
    pub t_cache_ms: u64,
}

impl Default for GateTimeouts {
    fn default() -> Self {
        Self { t_total_ms: 200, t_sem_ms: 500, t_val_ms: 150, t_persist_ms: 50, t_cache_ms: 30_000 }
    }
}
