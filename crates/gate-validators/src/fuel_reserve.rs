// crates/gate-validators/src/fuel_reserve.rs
// ============================================================================
// Module: Fuel Reserve Validator
// Description: Aviation fuel-reserve rule, FAA 14 CFR §91.151.
// Purpose: Deny actions that leave an aircraft below its required reserve.
// Dependencies: gate-core
// ============================================================================

//! ## Overview
//! `required = route_distance * burn_rate + reserve_minutes * burn_rate_per_min`,
//! where `reserve_minutes` is 45 at night and 30 otherwise. `Deny`s when
//! `current_fuel < required`.

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

use crate::params::get_bool_or;
use crate::params::get_f64;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Reserve minutes required for a night departure.
const NIGHT_RESERVE_MINUTES: f64 = 45.0;
/// Reserve minutes required for a day departure.
const DAY_RESERVE_MINUTES: f64 = 30.0;

// ============================================================================
// SECTION: Validator
// ============================================================================

/// Fuel-reserve validator (`FAA 14 CFR §91.151`).
#[derive(Debug, Default, Clone, Copy)]
pub struct FuelReserveValidator;

impl Validator for FuelReserveValidator {
    fn name(&self) -> ValidatorName {
        ValidatorName::new("fuel-reserve")
    }

    fn timeout_ms(&self) -> u64 {
        150
    }

    fn rule_id(&self) -> RuleId {
        RuleId::new("FAA 14 CFR §91.151")
    }

    fn validate(&self, action: &ActionPrimitive, _context: &AgentContext) -> ValidatorVerdict {
        let name = self.name();
        let rule_id = self.rule_id();
        let (Some(current_fuel), Some(route_distance), Some(burn_rate), Some(burn_rate_per_min)) = (
            get_f64(action, "current_fuel"),
            get_f64(action, "route_distance"),
            get_f64(action, "burn_rate"),
            get_f64(action, "burn_rate_per_min"),
        ) else {
            return ValidatorVerdict::new(
                name,
                Decision::Escalate,
                rule_id,
                "INSUFFICIENT_CONTEXT",
                0,
            );
        };
        let night = get_bool_or(action, "night", false);
        let reserve_minutes = if night { NIGHT_RESERVE_MINUTES } else { DAY_RESERVE_MINUTES };
        let required = route_distance * burn_rate + reserve_minutes * burn_rate_per_min;
        if current_fuel < required {
            return ValidatorVerdict::new(
                name,
                Decision::Deny,
                rule_id,
                format!(
                    "current_fuel {current_fuel} below required reserve {required} \
                     (route {route_distance} x burn_rate {burn_rate} + {reserve_minutes}min \
                     reserve)"
                ),
                1,
            );
        }
        ValidatorVerdict::new(name, Decision::Allow, rule_id, "fuel reserve satisfied", 1)
    }
}
