// crates/gate-ontology/src/seed.rs
// ============================================================================
// Module: Ontology Seed Data
// Description: Built-in aviation and fintech action nodes.
// Purpose: Give the reference ontology client a deterministic default arena.
// Dependencies: gate-core
// ============================================================================

// ============================================================================
// SECTION: Imports
// ============================================================================

use gate_core::MaturityLevel;

use crate::store::ActionNode;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default coverage floor applied by the aggregator when escalating on low
/// semantic coverage; shipped here so callers without their own config have
/// a sensible default to pass through.
pub const DEFAULT_COVERAGE_FLOOR: f64 = 0.8;

// ============================================================================
// SECTION: Seed
// ============================================================================

/// Builds the built-in set of known `(domain, verb)` action nodes.
#[must_use]
pub fn builtin_nodes() -> Vec<ActionNode> {
    #![allow(clippy::expect_used, reason = "Maturity levels here are fixed literals in 1..=5.")]
    let l3 = MaturityLevel::new(3).expect("3 is a valid maturity level");

    vec![
        ActionNode::new(
            "aviation",
            "reroute_flight",
            l3,
            vec![
                "current_fuel".to_string(),
                "route_distance".to_string(),
                "burn_rate".to_string(),
                "burn_rate_per_min".to_string(),
                "night".to_string(),
                "current_duty_minutes".to_string(),
                "proposed_flight_minutes".to_string(),
                "altitude_ft".to_string(),
                "terrain_type".to_string(),
                "restricted_zone".to_string(),
            ],
            true,
        ),
        ActionNode::new(
            "aviation",
            "file_flight_plan",
            l3,
            vec!["route_distance".to_string(), "altitude_ft".to_string()],
            true,
        ),
        ActionNode::new(
            "fintech",
            "initiate_payment",
            l3,
            vec!["amount".to_string(), "sca_completed".to_string(), "risk_profile".to_string()],
            true,
        ),
        ActionNode::new(
            "fintech",
            "authorize_transfer",
            l3,
            vec!["amount".to_string(), "risk_profile".to_string()],
            true,
        ),
        ActionNode::new(
            "aviation",
            "request_weather_briefing",
            l3,
            vec!["route_distance".to_string()],
            false,
        ),
    ]
}
