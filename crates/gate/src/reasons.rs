// crates/gate/src/reasons.rs
// ============================================================================
// Module: Deny Reasons
// Description: Named DENY reason strings emitted by the pipeline stages.
// Purpose: Keep the fixed vocabulary of fail-closed reasons in one place so
//          every stage and every test references the same literals.
// ============================================================================

/// Health probe found the ontology session unreachable.
pub const VALIDATOR_UNHEALTHY: &str = "VALIDATOR_UNHEALTHY";
/// Semantic check exceeded its per-stage deadline.
pub const SEMANTIC_TIMEOUT: &str = "SEMANTIC_TIMEOUT";
/// Semantic check raised an error other than a timeout.
pub const SEMANTIC_ERROR: &str = "SEMANTIC_ERROR";
/// No validator chain is registered for the action's `(domain, verb)`.
pub const NO_VALIDATORS: &str = "NO_VALIDATORS";
/// Signing the verdict failed.
pub const SIGNATURE_ERROR: &str = "SIGNATURE_ERROR";
/// Persisting the verdict to the ledger failed.
pub const LEDGER_ERROR: &str = "LEDGER_ERROR";
/// The request exceeded its total governance latency budget.
pub const GATE_TIMEOUT: &str = "GATE_TIMEOUT";
/// An unclassified internal failure, the outer fail-closed catch-all.
pub const GATE_INTERNAL_ERROR: &str = "GATE_INTERNAL_ERROR";
/// Inbound request rate exceeded the configured concurrency bound.
pub const OVERLOAD: &str = "OVERLOAD";
/// Coarse metrics label for a validator-vetoed DENY (the full citation and
/// rationale remain in the persisted verdict's `reason` field).
pub const VALIDATOR_VETO: &str = "VALIDATOR_VETO";
/// Coarse metrics label for a validator-driven ESCALATE.
pub const VALIDATOR_ESCALATION: &str = "VALIDATOR_ESCALATION";
