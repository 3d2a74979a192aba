// crates/gate-ontology/src/store.rs
// ============================================================================
// Module: In-Process Ontology Store
// Description: Arena-of-nodes ontology client implementing semantic authority
//              lookups with a fault-injection surface for testing.
// Purpose: Reference OntologyClient backing the Validation Gate's semantic
//          check stage.
// Dependencies: async-trait, gate-core, tokio (dev-only for tests)
// ============================================================================

//! ## Overview
//! [`InProcessOntologyClient`] stores [`ActionNode`]s in a `Vec` arena and
//! indexes them by `(domain, verb)` in a `BTreeMap`. Coverage is computed by
//! comparing an action's parameter keys against the node's declared governed
//! parameter set.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use gate_core::ActionPrimitive;
use gate_core::Decision;
use gate_core::Domain;
use gate_core::MaturityLevel;
use gate_core::OntologyClient;
use gate_core::OntologyError;
use gate_core::SemanticVerdict;
use gate_core::Verb;

// ============================================================================
// SECTION: Action Node
// ============================================================================

/// One entry in the ontology arena: a known `(domain, verb)` pair and the
/// regulatory metadata governing it.
#[derive(Debug, Clone)]
pub struct ActionNode {
    /// Regulated domain this action belongs to.
    pub domain: Domain,
    /// Verb identifying this action.
    pub verb: Verb,
    /// Minimum agent maturity level required to invoke this action.
    pub required_maturity: MaturityLevel,
    /// Parameter keys the ontology recognizes as governed, for coverage.
    pub governed_parameters: Vec<String>,
    /// Whether this verb requires a registered validator chain. `false` marks
    /// an informational verb, for which an empty chain is an implicit allow.
    pub requires_validation: bool,
}

impl ActionNode {
    /// Builds a new ontology node.
    #[must_use]
    pub fn new(
        domain: impl Into<Domain>,
        verb: impl Into<Verb>,
        required_maturity: MaturityLevel,
        governed_parameters: Vec<String>,
        requires_validation: bool,
    ) -> Self {
        Self {
            domain: domain.into(),
            verb: verb.into(),
            required_maturity,
            governed_parameters,
            requires_validation,
        }
    }
}

// ============================================================================
// SECTION: In-Process Client
// ============================================================================

/// In-process, arena-backed [`OntologyClient`] with a fault-injection surface.
///
/// # Invariants
/// - The arena and index are built once at construction and never mutated;
///   only the fault-injection flags (`healthy`, `delay_ms`, `fail_query`) are
///   interior-mutable, matching a real client's mutable connection-health
///   state without touching the seed data.
pub struct InProcessOntologyClient {
    /// Backing arena of known action nodes.
    nodes: Vec<ActionNode>,
    /// Index from `(domain, verb)` to position in `nodes`.
    index: BTreeMap<(Domain, Verb), usize>,
    /// Health-probe flag; flipped by tests to simulate an unreachable session.
    healthy: AtomicBool,
    /// Artificial per-query delay, in milliseconds, for timeout testing.
    delay_ms: AtomicU64,
    /// When set, every query fails with [`OntologyError::Query`].
    fail_query: AtomicBool,
}

impl InProcessOntologyClient {
    /// Builds a client from a pre-populated arena.
    #[must_use]
    pub fn new(nodes: Vec<ActionNode>) -> Self {
        let mut index = BTreeMap::new();
        for (position, node) in nodes.iter().enumerate() {
            index.insert((node.domain.clone(), node.verb.clone()), position);
        }
        Self {
            nodes,
            index,
            healthy: AtomicBool::new(true),
            delay_ms: AtomicU64::new(0),
            fail_query: AtomicBool::new(false),
        }
    }

    /// Builds a client seeded with the built-in aviation and fintech actions.
    #[must_use]
    pub fn builtin() -> Self {
        Self::new(crate::seed::builtin_nodes())
    }

    /// Flips the health-probe flag, for fault-injection tests.
    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    /// Sets an artificial per-query delay, for timeout-injection tests.
    pub fn set_delay_ms(&self, delay_ms: u64) {
        self.delay_ms.store(delay_ms, Ordering::SeqCst);
    }

    /// Forces every subsequent query to fail, for error-injection tests.
    pub fn set_fail_query(&self, fail: bool) {
        self.fail_query.store(fail, Ordering::SeqCst);
    }

    /// Computes the fraction of `action`'s parameters the node recognizes as
    /// governed; `1.0` when the action declares no parameters.
    fn coverage(node: &ActionNode, action: &ActionPrimitive) -> f64 {
        if action.parameters.is_empty() {
            return 1.0;
        }
        let governed = action
            .parameters
            .keys()
            .filter(|key| node.governed_parameters.iter().any(|governed| governed == *key))
            .count();
        #[allow(clippy::cast_precision_loss, reason = "parameter counts are small")]
        let coverage = governed as f64 / action.parameters.len() as f64;
        coverage
    }
}

#[async_trait]
impl OntologyClient for InProcessOntologyClient {
    async fn validate_semantic_authority(
        &self,
        action: &ActionPrimitive,
        maturity_level: MaturityLevel,
    ) -> Result<SemanticVerdict, OntologyError> {
        let delay_ms = self.delay_ms.load(Ordering::SeqCst);
        if delay_ms > 0 {
            tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;
        }
        if self.fail_query.load(Ordering::SeqCst) {
            return Err(OntologyError::Query("simulated ontology query failure".to_string()));
        }

        let Some(&position) = self.index.get(&(action.domain.clone(), action.verb.clone())) else {
            return Ok(SemanticVerdict {
                decision: Decision::Deny,
                ontology_match: false,
                maturity_authorized: false,
                coverage: 0.0,
                reason: "UNKNOWN_VERB".to_string(),
                requires_validation: true,
            });
        };
        let node = &self.nodes[position];

        if maturity_level < node.required_maturity {
            return Ok(SemanticVerdict {
                decision: Decision::Deny,
                ontology_match: true,
                maturity_authorized: false,
                coverage: 0.0,
                reason: format!(
                    "AMM_VIOLATION: requires L{}",
                    node.required_maturity.get()
                ),
                requires_validation: node.requires_validation,
            });
        }

        let coverage = Self::coverage(node, action);
        Ok(SemanticVerdict {
            decision: Decision::Allow,
            ontology_match: true,
            maturity_authorized: true,
            coverage,
            reason: "SEMANTIC_OK".to_string(),
            requires_validation: node.requires_validation,
        })
    }

    async fn ping(&self) -> bool {
        self.healthy.load(Ordering::SeqCst)
    }
}
