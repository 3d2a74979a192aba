// crates/gate-service/src/routes.rs
// ============================================================================
// Module: Routes
// Description: HTTP handlers for POST /validate and GET /health.
// Purpose: Translate wire requests into gate calls and back, per spec.md §6 —
//          /validate always answers 200, DENY is not an HTTP error; 5xx is
//          reserved for total gate unavailability, which must not happen by
//          design.
// Dependencies: axum, gate-core, serde
// ============================================================================

// ============================================================================
// SECTION: Imports
// ============================================================================

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use gate_core::ActionPrimitive;
use gate_core::AgentContext;
use gate_core::OntologyClient;
use gate_core::Verdict;
use serde::Deserialize;
use serde::Serialize;

use crate::state::AppState;

// ============================================================================
// SECTION: Request/Response Bodies
// ============================================================================

/// Body of `POST /validate`.
#[derive(Debug, Deserialize)]
pub struct ValidateRequest {
    /// The proposed agent action.
    pub action: ActionPrimitive,
    /// The requesting agent's context.
    pub agent: AgentContext,
}

/// Response body of `POST /validate`.
#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    /// The signed, persisted verdict.
    pub verdict: Verdict,
}

/// Response body of `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Coarse liveness indicator; always `"ok"` if this handler runs at all.
    pub status: &'static str,
    /// Live ontology reachability, not the gate's own cached probe.
    pub ontology_reachable: bool,
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Handles `POST /validate`.
///
/// Returns `200` with the verdict in almost every case: DENY is not an HTTP
/// error. The one exception is `LEDGER_ERROR` under
/// [`AppState::complete_fail_closed`], where the operator has opted into
/// surfacing an audit-persistence failure as a `503` rather than a silent
/// fail-closed DENY, per `spec.md` §6's `COMPLETE_FAIL_CLOSED` option.
pub async fn validate(State(state): State<AppState>, Json(request): Json<ValidateRequest>) -> Response {
    let verdict = state.gate.evaluate(request.action, request.agent).await;
    let status = if state.complete_fail_closed && verdict.reason == gate::LEDGER_ERROR {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };
    (status, Json(ValidateResponse { verdict })).into_response()
}

/// Handles `GET /health`.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let ontology_reachable = state.ontology.ping().await;
    Json(HealthResponse { status: "ok", ontology_reachable })
}

/// Builds the service router over the given shared state.
#[must_use]
pub fn router(state: AppState) -> axum::Router {
    axum::Router::new()
        .route("/validate", axum::routing::post(validate))
        .route("/health", axum::routing::get(health))
        .with_state(state)
}
