// crates/gate-core/src/interfaces.rs
// ============================================================================
// Module: Gate Collaborator Interfaces
// Description: Trait boundaries between the orchestrator and its collaborators.
// Purpose: Let the orchestrator be generic over ontology/signer/ledger/
//          validator implementations, matching the fail-closed contract.
// Dependencies: async-trait, thiserror
// ============================================================================

//! ## Overview
//! Every collaborator the orchestrator depends on is expressed here as a
//! trait plus a paired `thiserror` error enum, never as a concrete type.
//! This is the seam that lets `gate-ontology`, `gate-signer`, and
//! `gate-ledger` be swapped for networked or test-double implementations
//! without touching the pipeline in the `gate` crate.

// ============================================================================
// SECTION: Imports
// ============================================================================

use async_trait::async_trait;
use thiserror::Error;

use crate::identifiers::MaturityLevel;
use crate::identifiers::RuleId;
use crate::identifiers::ValidatorName;
use crate::model::ActionPrimitive;
use crate::model::AgentContext;
use crate::model::SemanticVerdict;
use crate::model::ValidatorVerdict;
use crate::model::Verdict;

// ============================================================================
// SECTION: Ontology Client
// ============================================================================

/// Errors raised by the semantic authority check.
///
/// # Invariants
/// - Variants are stable for programmatic handling; the orchestrator maps
///   each to a named `DENY` reason per `spec.md` §7.
#[derive(Debug, Error)]
pub enum OntologyError {
    /// The ontology session could not be reached.
    #[error("ontology unreachable: {0}")]
    Unreachable(String),
    /// The query itself failed after a successful connection.
    #[error("ontology query failed: {0}")]
    Query(String),
}

/// Read-only semantic authority lookups against a domain ontology.
///
/// # Invariants
/// - Implementations must be safe for concurrent read queries: the session is
///   a process-wide shared resource per `spec.md` §5.
/// - A reconnect is attempted at most once per call; further failure
///   propagates as [`OntologyError::Unreachable`].
#[async_trait]
pub trait OntologyClient: Send + Sync {
    /// Evaluates whether `action` is semantically authorized for an agent at
    /// `maturity_level`.
    ///
    /// # Errors
    ///
    /// Returns [`OntologyError`] when the ontology cannot be reached or the
    /// query fails. Does not itself enforce a timeout; the caller wraps this
    /// call in a deadline.
    async fn validate_semantic_authority(
        &self,
        action: &ActionPrimitive,
        maturity_level: MaturityLevel,
    ) -> Result<SemanticVerdict, OntologyError>;

    /// Non-blocking liveness probe used by the gate's cached health check.
    async fn ping(&self) -> bool;
}

// ============================================================================
// SECTION: Validator
// ============================================================================

/// A deterministic domain rule evaluator bound to one regulatory citation.
///
/// # Invariants
/// - `validate` is a pure function of `(action, context)`: no shared mutable
///   state, no I/O to the ledger or ontology, infallible by contract.
/// - Implementations that cannot compute a result return `Escalate` with
///   reason `INSUFFICIENT_CONTEXT` rather than panicking; a panic is still
///   tolerated by the orchestrator's isolation boundary but is not the
///   intended path for missing parameters.
pub trait Validator: Send + Sync {
    /// Stable validator identity used for registry ordering and audit rows.
    fn name(&self) -> ValidatorName;

    /// Declared per-call timeout, in milliseconds.
    fn timeout_ms(&self) -> u64;

    /// Regulatory citation this validator enforces.
    fn rule_id(&self) -> RuleId;

    /// Evaluates the action and returns a verdict. `latency_ms` is filled in
    /// by the caller, not by the validator itself.
    fn validate(&self, action: &ActionPrimitive, context: &AgentContext) -> ValidatorVerdict;
}

// ============================================================================
// SECTION: Signer
// ============================================================================

/// Errors raised while signing a verdict.
#[derive(Debug, Error)]
pub enum SignerError {
    /// The signing secret was unavailable at signing time (e.g. rotated out).
    #[error("signing secret unavailable")]
    SecretUnavailable,
    /// The verdict's signed fields could not be canonicalized.
    #[error("failed to canonicalize signed fields: {0}")]
    Canonicalization(String),
}

/// Computes and verifies the keyed MAC over a verdict's signed fields.
///
/// # Invariants
/// - The signing key is loaded once at startup and never reassigned; absence
///   at startup is a fatal configuration error, not a [`SignerError`].
pub trait Signer: Send + Sync {
    /// Computes a hex-encoded keyed MAC over `verdict`'s signed fields.
    ///
    /// # Errors
    ///
    /// Returns [`SignerError`] when the secret is unavailable or
    /// canonicalization fails.
    fn sign(&self, verdict: &Verdict) -> Result<String, SignerError>;

    /// Returns whether `signature` matches the MAC this signer would compute
    /// for `verdict`'s signed fields, in constant time.
    fn verify(&self, verdict: &Verdict, signature: &str) -> bool;
}

// ============================================================================
// SECTION: Audit Ledger
// ============================================================================

/// Errors raised while appending to the audit ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Underlying storage I/O failed.
    #[error("ledger io error: {0}")]
    Io(String),
    /// The storage engine rejected the write.
    #[error("ledger store error: {0}")]
    Store(String),
}

/// Append-only, time-partitioned write path for signed verdicts.
///
/// # Invariants
/// - `append` never updates or deletes existing rows.
/// - Implementations are safe for concurrent callers.
#[async_trait]
pub trait AuditLedger: Send + Sync {
    /// Appends `verdict` to the ledger.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] when the write fails.
    async fn append(&self, verdict: &Verdict) -> Result<(), LedgerError>;
}
