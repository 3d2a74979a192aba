// crates/gate-service/src/state.rs
// ============================================================================
// Module: App State
// Description: Shared handles the HTTP handlers close over.
// Purpose: Give axum one cheap-to-clone value per request instead of
//          threading the gate and ontology client through handler arguments.
// Dependencies: axum, gate, gate-core
// ============================================================================

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use gate::ValidationGate;
use gate_core::OntologyClient;

// ============================================================================
// SECTION: App State
// ============================================================================

/// Shared state for the `gate-service` router.
#[derive(Clone)]
pub struct AppState {
    /// The composed Validation Gate orchestrator.
    pub gate: Arc<ValidationGate>,
    /// Direct handle to the ontology client, for `GET /health` only; the
    /// gate's own cached health probe is internal to its pipeline and is
    /// not reused here since `/health` should reflect live reachability.
    pub ontology: Arc<dyn OntologyClient>,
    /// Mirrors [`gate_config::GateConfig::complete_fail_closed`]: when true,
    /// a `LEDGER_ERROR` verdict is surfaced as a `503` instead of the default
    /// fail-closed-but-`200` response.
    pub complete_fail_closed: bool,
}
