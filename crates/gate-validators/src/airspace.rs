// crates/gate-validators/src/airspace.rs
// ============================================================================
// Module: Airspace Validator
// Description: Minimum safe altitude and restricted-zone rule, 14 CFR §91.119.
// Purpose: Deny actions that fly below the terrain-appropriate floor or enter
//          restricted airspace.
// Dependencies: gate-core
// ============================================================================

//! ## Overview
//! `Deny`s when the requested altitude is below `min_safe_altitude(terrain_type)`
//! or when the route intersects a restricted zone. Restricted-zone intrusion
//! cites `14 CFR §91.133`; altitude floor violations cite `14 CFR §91.119`.

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
use crate::params::get_str;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Minimum safe altitude, in feet, over flat terrain.
const MIN_SAFE_ALTITUDE_FLAT_FT: f64 = 1_000.0;
/// Minimum safe altitude, in feet, over urban/congested terrain.
const MIN_SAFE_ALTITUDE_URBAN_FT: f64 = 3_000.0;
/// Minimum safe altitude, in feet, over mountainous terrain.
const MIN_SAFE_ALTITUDE_MOUNTAINOUS_FT: f64 = 6_000.0;

/// Returns the minimum safe altitude for a terrain classification.
fn min_safe_altitude_ft(terrain_type: &str) -> f64 {
    match terrain_type {
        "urban" => MIN_SAFE_ALTITUDE_URBAN_FT,
        "mountainous" => MIN_SAFE_ALTITUDE_MOUNTAINOUS_FT,
        _ => MIN_SAFE_ALTITUDE_FLAT_FT,
    }
}

// ============================================================================
// SECTION: Validator
// ============================================================================

/// Airspace validator (`14 CFR §91.119` / `14 CFR §91.133`).
#[derive(Debug, Default, Clone, Copy)]
pub struct AirspaceValidator;

impl Validator for AirspaceValidator {
    fn name(&self) -> ValidatorName {
        ValidatorName::new("airspace")
    }

    fn timeout_ms(&self) -> u64 {
        150
    }

    fn rule_id(&self) -> RuleId {
        RuleId::new("14 CFR §91.119")
    }

    fn validate(&self, action: &ActionPrimitive, _context: &AgentContext) -> ValidatorVerdict {
        let name = self.name();
        let Some(altitude_ft) = get_f64(action, "altitude_ft") else {
            return ValidatorVerdict::new(
                name,
                Decision::Escalate,
                self.rule_id(),
                "INSUFFICIENT_CONTEXT",
                0,
            );
        };
        let restricted_zone = get_bool_or(action, "restricted_zone", false);
        if restricted_zone {
            return ValidatorVerdict::new(
                name,
                Decision::Deny,
                RuleId::new("14 CFR §91.133"),
                "route intersects restricted airspace",
                1,
            );
        }
        let terrain_type = get_str(action, "terrain_type").unwrap_or("flat");
        let floor = min_safe_altitude_ft(terrain_type);
        if altitude_ft < floor {
            return ValidatorVerdict::new(
                name,
                Decision::Deny,
                self.rule_id(),
                format!(
                    "altitude {altitude_ft}ft below minimum safe altitude {floor}ft over \
                     {terrain_type} terrain"
                ),
                1,
            );
        }
        ValidatorVerdict::new(name, Decision::Allow, self.rule_id(), "altitude within limits", 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests_support::agent_context;
    use crate::tests_support::build_action;

    #[test]
    fn denies_restricted_zone_regardless_of_altitude() {
        let action = build_action(
            "aviation",
            "reroute_flight",
            &[
                ("altitude_ft", serde_json::json!(10_000)),
                ("restricted_zone", serde_json::json!(true)),
            ],
        );
        let verdict = AirspaceValidator.validate(&action, &agent_context(3));
        assert_eq!(verdict.decision, Decision::Deny);
        assert!(verdict.rule_id.as_str().contains("91.133"));
    }

    #[test]
    fn denies_below_terrain_floor() {
        let action = build_action(
            "aviation",
            "reroute_flight",
            &[
                ("altitude_ft", serde_json::json!(2_000)),
                ("terrain_type", serde_json::json!("mountainous")),
            ],
        );
        let verdict = AirspaceValidator.validate(&action, &agent_context(3));
        assert_eq!(verdict.decision, Decision::Deny);
        assert!(verdict.rule_id.as_str().contains("91.119"));
    }

    #[test]
    fn allows_above_floor_outside_restricted_zone() {
        let action =
            build_action("aviation", "reroute_flight", &[("altitude_ft", serde_json::json!(5_000))]);
        let verdict = AirspaceValidator.validate(&action, &agent_context(3));
        assert_eq!(verdict.decision, Decision::Allow);
    }
}
