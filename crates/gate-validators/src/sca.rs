// crates/gate-validators/src/sca.rs
// ============================================================================
// Module: Strong Customer Authentication Validator
// Description: Fintech payment-authentication rule, PSD2 RTS 2018/389.
// Purpose: Deny payments above the SCA exemption floor without completed SCA.
// Dependencies: bigdecimal, gate-core
// ============================================================================

//! ## Overview
//! `Deny`s when `amount > 30 EUR` and `sca_completed` is false. Amounts are
//! compared as [`bigdecimal::BigDecimal`] to avoid floating-point error near
//! the threshold.

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

use crate::params::get_bool_or;
use crate::params::get_decimal;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Amount, in EUR, above which strong customer authentication is required.
fn sca_exemption_floor() -> BigDecimal {
    BigDecimal::from(30)
}

// ============================================================================
// SECTION: Validator
// ============================================================================

/// Strong-customer-authentication validator (`PSD2 RTS 2018/389`).
#[derive(Debug, Default, Clone, Copy)]
pub struct ScaValidator;

impl Validator for ScaValidator {
    fn name(&self) -> ValidatorName {
        ValidatorName::new("strong-customer-authentication")
    }

    fn timeout_ms(&self) -> u64 {
        150
    }

    fn rule_id(&self) -> RuleId {
        RuleId::new("PSD2 RTS 2018/389")
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
        let sca_completed = get_bool_or(action, "sca_completed", false);
        if amount > sca_exemption_floor() && !sca_completed {
            return ValidatorVerdict::new(
                name,
                Decision::Deny,
                rule_id,
                format!("amount {amount} EUR exceeds SCA exemption floor without completed SCA"),
                1,
            );
        }
        ValidatorVerdict::new(name, Decision::Allow, rule_id, "sca requirement satisfied", 1)
    }
}
