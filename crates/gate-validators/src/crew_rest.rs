// crates/gate-validators/src/crew_rest.rs
// ============================================================================
// Module: Crew Rest Validator
// Description: Aviation flight/duty time limit rule, 14 CFR §121.471.
// Purpose: Deny actions that would push a crew beyond its duty-time ceiling.
// Dependencies: gate-core
// ============================================================================

//! ## Overview
//! `Deny`s when `current_duty_minutes + proposed_flight_minutes > 540`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use gate_core::ActionPrimitive;
use gate_core::AgentContext;
use gate_core::Decision;
use gate_core::RuleId;
use gate_core::Validator;
use gate_core::ValidatorName;
use gate_core::ValidatorVerdict;

use crate::params::get_f64;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum combined duty + flight minutes before the rule denies.
const MAX_DUTY_MINUTES: f64 = 540.0;

// ============================================================================
// SECTION: Validator
// ============================================================================

/// Crew-rest validator (`14 CFR §121.471`).
#[derive(Debug, Default, Clone, Copy)]
pub struct CrewRestValidator;

impl Validator for CrewRestValidator {
    fn name(&self) -> ValidatorName {
        ValidatorName::new("crew-rest")
    }

    fn timeout_ms(&self) -> u64 {
        150
    }

    fn rule_id(&self) -> RuleId {
        RuleId::new("14 CFR §121.471")
    }

    fn validate(&self, action: &ActionPrimitive, _context: &AgentContext) -> ValidatorVerdict {
        let name = self.name();
        let rule_id = self.rule_id();
        let (Some(current_duty_minutes), Some(proposed_flight_minutes)) = (
            get_f64(action, "current_duty_minutes"),
            get_f64(action, "proposed_flight_minutes"),
        ) else {
            return ValidatorVerdict::new(
                name,
                Decision::Escalate,
                rule_id,
                "INSUFFICIENT_CONTEXT",
                0,
            );
        };
        let total = current_duty_minutes + proposed_flight_minutes;
        if total > MAX_DUTY_MINUTES {
            return ValidatorVerdict::new(
                name,
                Decision::Deny,
                rule_id,
                format!(
                    "combined duty time {total} minutes exceeds ceiling of \
                     {MAX_DUTY_MINUTES} minutes"
                ),
                1,
            );
        }
        ValidatorVerdict::new(name, Decision::Allow, rule_id, "duty time within limits", 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests_support::agent_context;
    use crate::tests_support::build_action;

    #[test]
    fn denies_when_duty_time_exceeds_ceiling() {
        let action = build_action(
            "aviation",
            "reroute_flight",
            &[
                ("current_duty_minutes", serde_json::json!(520)),
                ("proposed_flight_minutes", serde_json::json!(60)),
            ],
        );
        let verdict = CrewRestValidator.validate(&action, &agent_context(3));
        assert_eq!(verdict.decision, Decision::Deny);
        assert!(verdict.rule_id.as_str().contains("121.471"));
    }

    #[test]
    fn allows_when_duty_time_within_ceiling() {
        let action = build_action(
            "aviation",
            "reroute_flight",
            &[
                ("current_duty_minutes", serde_json::json!(400)),
                ("proposed_flight_minutes", serde_json::json!(60)),
            ],
        );
        let verdict = CrewRestValidator.validate(&action, &agent_context(3));
        assert_eq!(verdict.decision, Decision::Allow);
    }
}
