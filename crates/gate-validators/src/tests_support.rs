// crates/gate-validators/src/tests_support.rs
// ============================================================================
// Module: Validator Test Support
// Description: Shared fixtures for per-validator unit tests.
// Purpose: Avoid repeating AgentContext/ActionPrimitive boilerplate per test.
// Dependencies: gate-core, serde_json
// ============================================================================

#![allow(clippy::expect_used, reason = "Test fixtures use expect for setup clarity.")]

use std::collections::BTreeMap;

use gate_core::ActionPrimitive;
use gate_core::AgentContext;
use gate_core::Domain;
use gate_core::MaturityLevel;
use gate_core::TraceId;
use gate_core::Verb;

/// Builds an [`AgentContext`] at the given maturity level with a fixed trace id.
#[must_use]
pub fn agent_context(maturity: u8) -> AgentContext {
    AgentContext {
        agent_id: None,
        maturity_level: MaturityLevel::new(maturity).expect("test maturity level in range"),
        trace_id: TraceId::new("trace-test"),
        submission_time: 0,
    }
}

/// Builds an [`ActionPrimitive`] with the given domain, verb, and parameters.
#[must_use]
pub fn build_action(
    domain: &str,
    verb: &str,
    params: &[(&str, serde_json::Value)],
) -> ActionPrimitive {
    let mut parameters = BTreeMap::new();
    for (key, value) in params {
        parameters.insert((*key).to_string(), value.clone());
    }
    ActionPrimitive {
        verb: Verb::new(verb),
        resource: "test-resource".to_string(),
        domain: Domain::new(domain),
        parameters,
    }
}
