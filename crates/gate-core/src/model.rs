// crates/gate-core/src/model.rs
// ============================================================================
// Module: Gate Data Model
// Description: Action, context, and verdict types exchanged by every stage.
// Purpose: Provide the wire-stable shapes the orchestrator threads through
//          the semantic check, validator dispatch, signer, and ledger.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! `ActionPrimitive` and `AgentContext` are the inbound request; `Verdict` is
//! the outbound response. Everything in between (`SemanticVerdict`,
//! `ValidatorVerdict`) is an intermediate artifact folded into the final
//! verdict by [`crate::aggregate::aggregate`].
//!
//! Invariants:
//! - `ActionPrimitive` is immutable once constructed.
//! - `Verdict::decision` is `Deny` whenever any collaborator contributing to
//!   it failed, timed out, raised, or was skipped.
//! - `Verdict::certifiable` is `true` only when every validator returned
//!   within its declared timeout, the semantic check succeeded, and
//!   `signature` is non-empty.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;

use crate::identifiers::AgentId;
use crate::identifiers::Domain;
use crate::identifiers::MaturityLevel;
use crate::identifiers::RuleId;
use crate::identifiers::TraceId;
use crate::identifiers::ValidatorName;
use crate::identifiers::Verb;

// ============================================================================
// SECTION: Decision
// ============================================================================

/// Three-way verdict outcome.
///
/// # Invariants
/// - Ordered `Deny > Escalate > Allow` for conservative-veto comparisons; see
///   [`Decision::severity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// The action may proceed.
    Allow,
    /// The action is blocked.
    Deny,
    /// The action requires human review before proceeding.
    Escalate,
}

impl Decision {
    /// Returns a severity rank where higher values dominate lower ones under
    /// the conservative-veto rule (`Deny` > `Escalate` > `Allow`).
    #[must_use]
    pub const fn severity(self) -> u8 {
        match self {
            Self::Allow => 0,
            Self::Escalate => 1,
            Self::Deny => 2,
        }
    }
}

// ============================================================================
// SECTION: Action Primitive
// ============================================================================

/// A structured agent-proposed action, immutable once accepted by the gate.
///
/// # Invariants
/// - Not mutated after construction or after being accepted by the gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionPrimitive {
    /// Verb of the proposed action (e.g. `reroute_flight`).
    pub verb: Verb,
    /// Resource the action targets.
    pub resource: String,
    /// Regulated domain the action belongs to.
    pub domain: Domain,
    /// Opaque action parameters.
    #[serde(default)]
    pub parameters: BTreeMap<String, Value>,
}

impl ActionPrimitive {
    /// Returns the named parameter, if present.
    #[must_use]
    pub fn parameter(&self, key: &str) -> Option<&Value> {
        self.parameters.get(key)
    }
}

// ============================================================================
// SECTION: Agent Context
// ============================================================================

/// Caller-supplied context describing the requesting agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentContext {
    /// Opaque identifier of the requesting agent, when known.
    #[serde(default)]
    pub agent_id: Option<AgentId>,
    /// Agent autonomy/maturity level.
    pub maturity_level: MaturityLevel,
    /// Caller-provided unique trace identifier.
    pub trace_id: TraceId,
    /// Unix-millisecond timestamp of submission, as reported by the caller.
    pub submission_time: i64,
}

// ============================================================================
// SECTION: Semantic Verdict
// ============================================================================

/// Result of the ontology client's semantic authority check.
///
/// # Invariants
/// - `coverage` is within `[0.0, 1.0]`.
/// - `decision` is `Allow` or `Deny` only; `Escalate` is never produced here
///   (low coverage is signalled via `coverage`, and promoted to `Escalate` by
///   the aggregator, not by the ontology client).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticVerdict {
    /// Semantic authority decision.
    pub decision: Decision,
    /// Whether the verb/domain pair was recognized by the ontology.
    pub ontology_match: bool,
    /// Whether the agent's maturity level satisfies the action's requirement.
    pub maturity_authorized: bool,
    /// Fraction of action parameters recognized as governed, in `[0.0, 1.0]`.
    pub coverage: f64,
    /// Citation-style reason string.
    pub reason: String,
    /// Whether the ontology classifies this verb as requiring a validator
    /// chain. An informational verb (`false`) with no registered chain is an
    /// implicit allow at the pipeline's validator-dispatch stage; a governed
    /// verb (`true`) with no registered chain is a fail-closed policy gap.
    pub requires_validation: bool,
}

// ============================================================================
// SECTION: Validator Verdict
// ============================================================================

/// Confidence value every validator reports, fixed by contract.
pub const VALIDATOR_CONFIDENCE: f64 = 1.0;

/// Result of a single domain validator's evaluation.
///
/// # Invariants
/// - `confidence` is always [`VALIDATOR_CONFIDENCE`]: validators are
///   deterministic, not probabilistic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatorVerdict {
    /// Validator identity that produced this verdict.
    pub validator_name: ValidatorName,
    /// Validator decision.
    pub decision: Decision,
    /// Regulatory citation backing the decision.
    pub rule_id: RuleId,
    /// Human-readable explanation of the decision.
    pub rationale: String,
    /// Elapsed wall time of the validator call, in milliseconds.
    pub latency_ms: u64,
    /// Fixed confidence value; see [`VALIDATOR_CONFIDENCE`].
    pub confidence: f64,
}

impl ValidatorVerdict {
    /// Builds a validator verdict with the contractually fixed confidence.
    #[must_use]
    pub fn new(
        validator_name: ValidatorName,
        decision: Decision,
        rule_id: RuleId,
        rationale: impl Into<String>,
        latency_ms: u64,
    ) -> Self {
        Self {
            validator_name,
            decision,
            rule_id,
            rationale: rationale.into(),
            latency_ms,
            confidence: VALIDATOR_CONFIDENCE,
        }
    }

    /// Builds the synthetic verdict recorded when a validator exceeds its
    /// declared timeout.
    #[must_use]
    pub fn timeout(validator_name: ValidatorName, timeout_ms: u64) -> Self {
        Self::new(
            validator_name.clone(),
            Decision::Deny,
            RuleId::new("TIMEOUT"),
            format!("{validator_name} exceeded {timeout_ms} ms"),
            timeout_ms,
        )
    }

    /// Builds the synthetic verdict recorded when a validator panics.
    #[must_use]
    pub fn exception(validator_name: ValidatorName, message: impl Into<String>) -> Self {
        Self::new(validator_name, Decision::Deny, RuleId::new("EXCEPTION"), message, 0)
    }
}

// ============================================================================
// SECTION: Component Timings
// ============================================================================

/// Per-stage elapsed wall time, in milliseconds, for one gate evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentTimings {
    /// Health probe stage latency.
    pub health_ms: u64,
    /// Semantic check stage latency.
    pub semantic_ms: u64,
    /// Validator dispatch stage latency (wall time of the parallel join).
    pub validators_ms: u64,
    /// Signing stage latency.
    pub sign_ms: u64,
    /// Persist stage latency.
    pub persist_ms: u64,
}

impl ComponentTimings {
    /// Sums every recorded stage, matching `governance_latency_ms`.
    #[must_use]
    pub const fn total_ms(&self) -> u64 {
        self.health_ms + self.semantic_ms + self.validators_ms + self.sign_ms + self.persist_ms
    }
}

// ============================================================================
// SECTION: Verdict
// ============================================================================

/// The final, signed result of one gate evaluation.
///
/// # Invariants
/// 1. `decision = Deny` whenever any collaborator contributing to it failed,
///    timed out, raised, or was skipped.
/// 2. `certifiable = true` only if every validator returned within its
///    declared timeout, the semantic check succeeded, and `signature` is
///    non-empty.
/// 3. `signature` is computed over the canonical serialization of
///    `{decision, reason, trace_id, validator_name: "gate"}`, sorted key
///    order, using a process-wide secret loaded at startup.
/// 4. Once emitted, the verdict is immutable; any downstream mutation breaks
///    signature verification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    /// Caller-provided trace identifier, echoed back.
    pub trace_id: TraceId,
    /// Final decision after aggregation.
    pub decision: Decision,
    /// Reason string for the final decision.
    pub reason: String,
    /// The action this verdict evaluates.
    pub action: ActionPrimitive,
    /// Opaque identifier of the requesting agent, echoed from `AgentContext`.
    #[serde(default)]
    pub agent_id: Option<AgentId>,
    /// Agent maturity level at evaluation time.
    pub agent_maturity: MaturityLevel,
    /// Semantic authority check result.
    pub semantic: SemanticVerdict,
    /// Validator results, ordered by validator registry order.
    pub validator_results: Vec<ValidatorVerdict>,
    /// Total governance latency in milliseconds, sum of executed stages.
    pub governance_latency_ms: u64,
    /// Per-stage elapsed wall time.
    pub component_timings: ComponentTimings,
    /// Whether every stage ran under its deadline and the signature verifies.
    pub certifiable: bool,
    /// Hex-encoded keyed MAC, or empty when signing failed.
    pub signature: String,
    /// Reserved for future key-rotation metadata; unused by the default signer.
    #[serde(default)]
    pub key_version: Option<u32>,
    /// Unix-millisecond emission timestamp.
    pub emitted_at: i64,
}

/// Fields of [`Verdict`] included in the signature's canonical representation.
///
/// # Invariants
/// - `validator_name` is always the literal `"gate"`, matching `spec.md` §4.5.
#[derive(Debug, Clone, Serialize)]
pub struct SignedFields<'a> {
    /// Final decision.
    pub decision: Decision,
    /// Final reason string.
    pub reason: &'a str,
    /// Caller trace identifier.
    pub trace_id: &'a TraceId,
    /// Literal `"gate"`, included so the signature scheme can be shared with
    /// per-validator signing in future revisions without a field rename.
    pub validator_name: &'static str,
}

impl Verdict {
    /// Returns the fixed subset of fields covered by the signature.
    #[must_use]
    pub fn signed_fields(&self) -> SignedFields<'_> {
        SignedFields {
            decision: self.decision,
            reason: &self.reason,
            trace_id: &self.trace_id,
            validator_name: "gate",
        }
    }
}
