// crates/gate-validators/src/aml_threshold.rs
// ============================================================================
// Module: AML Threshold Validator
// Description: Fintech anti-money-laundering escalation rule, EU 2015/849 Art.13.
// Purpose: Escalate (not deny) large payments lacking enhanced due diligence.
// Dependencies: bigdecimal, gate-core
// ============================================================================

//! ## Overview
//! `Escalate`s (never `Deny`s) when `amount >= 10,000 EUR` unless the risk
//! profile already records `enhanced_due_diligence_passed`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use bigdecimal::BigDecimal;
use gate_core::ActionPrimitive;
use gate_core::AgentContext;
use gate_core::Decision;
use gate_core::RuleId;
use gate_core::Validator;
use gate_core::ValidatorName;
use gate_core::ValidatorVerdict;

use crate::params::get_decimal;
use crate::params::get_str;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Amount, in EUR, at or above which enhanced due diligence is required.
fn aml_escalation_floor() -> BigDecimal {
    BigDecimal::from(10_000)
}

/// Risk profile value that exempts a payment from escalation.
const ENHANCED_DUE_DILIGENCE_PASSED: &str = "enhanced_due_diligence_passed";

// ============================================================================
// SECTION: Validator
// ============================================================================

/// AML-threshold validator (`EU 2015/849 Art.13`).
#[derive(Debug, Default, Clone, Copy)]
pub struct AmlThresholdValidator;

impl Validator for AmlThresholdValidator {
    fn name(&self) -> ValidatorName {
        ValidatorName::new("aml-threshold")
    }

    fn timeout_ms(&self) -> u64 {
        150
    }

    fn rule_id(&self) -> RuleId {
        RuleId::new("EU 2015/849 Art.13")
    }

    fn validate(&self, action: &ActionPrimitive, _context: &AgentContext) -> ValidatorVerdict {
        let name = self.name();
        let rule_id = self.rule_id();
        let Some(amount) = get_decimal(action, "amount") else {
            return ValidatorVerdict::new(
                name,
                Decision::Escalate,
                rule_id,
                "INSUFFICIENT_CONTEXT",
                0,
            );
        };
        let risk_profile = get_str(action, "risk_profile").unwrap_or("");
        if amount >= aml_escalation_floor() && risk_profile != ENHANCED_DUE_DILIGENCE_PASSED {
            return ValidatorVerdict::new(
                name,
                Decision::Escalate,
                rule_id,
                format!(
                    "amount {amount} EUR meets AML escalation floor without enhanced due \
                     diligence"
                ),
                1,
            );
        }
        ValidatorVerdict::new(name, Decision::Allow, rule_id, "below AML escalation floor", 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests_support::agent_context;
    use crate::tests_support::build_action;

    #[test]
    fn escalates_large_payment_without_due_diligence() {
        let action = build_action("fintech", "initiate_payment", &[("amount", serde_json::json!(15_000))]);
        let verdict = AmlThresholdValidator.validate(&action, &agent_context(3));
        assert_eq!(verdict.decision, Decision::Escalate);
    }

    #[test]
    fn allows_large_payment_with_due_diligence_passed() {
        let action = build_action(
            "fintech",
            "initiate_payment",
            &[
                ("amount", serde_json::json!(15_000)),
                ("risk_profile", serde_json::json!("enhanced_due_diligence_passed")),
            ],
        );
        let verdict = AmlThresholdValidator.validate(&action, &agent_context(3));
        assert_eq!(verdict.decision, Decision::Allow);
    }

    #[test]
    fn allows_small_payment() {
        let action = build_action("fintech", "initiate_payment", &[("amount", serde_json::json!(50))]);
        let verdict = AmlThresholdValidator.validate(&action, &agent_context(3));
        assert_eq!(verdict.decision, Decision::Allow);
    }
}
