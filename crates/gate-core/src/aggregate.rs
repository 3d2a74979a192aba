// crates/gate-core/src/aggregate.rs
// ============================================================================
// Module: Verdict Aggregator
// Description: Conservative-veto aggregation of semantic and validator results.
// Purpose: Produce the single (decision, reason) pair the gate signs.
// Dependencies: none beyond the core data model
// ============================================================================

//! ## Overview
//! [`aggregate`] is a pure function with no I/O and no fallible paths: every
//! input it receives has already been through the gate's fail-closed
//! wrapping, so by the time a [`SemanticVerdict`] and the ordered
//! [`ValidatorVerdict`] list reach this module, they are trusted data.
//!
//! Invariants:
//! - If `semantic.decision = Deny`, the result is `Deny` regardless of
//!   validators.
//! - If any validator denies, the result is `Deny`.
//! - If no validator denies but any escalates, the result is `Escalate`.
//! - If semantic coverage is below `coverage_floor`, the result is
//!   `Escalate`.
//! - Otherwise the result is `Allow`.
//! - `Deny` dominates `Escalate` dominates `Allow`; the surfaced reason is
//!   the first offender in registry order, independent of completion order.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::model::Decision;
use crate::model::SemanticVerdict;
use crate::model::ValidatorVerdict;

// ============================================================================
// SECTION: Aggregation
// ============================================================================

/// Reason surfaced when every validator passed and coverage met the floor.
pub const REASON_ALL_VALIDATORS_PASSED: &str = "ALL_VALIDATORS_PASSED";
/// Reason surfaced when semantic coverage fell below the configured floor.
pub const REASON_LOW_SEMANTIC_COVERAGE: &str = "LOW_SEMANTIC_COVERAGE";

/// Applies the conservative-veto algorithm over a semantic verdict and an
/// ordered list of validator verdicts.
///
/// `validator_results` must already be in validator-registry order, not
/// completion order: the first offender found by this function is the first
/// in that order, which is what makes the surfaced reason deterministic.
#[must_use]
pub fn aggregate(
    semantic: &SemanticVerdict,
    validator_results: &[ValidatorVerdict],
    coverage_floor: f64,
) -> (Decision, String) {
    if semantic.decision == Decision::Deny {
        return (Decision::Deny, semantic.reason.clone());
    }
    if let Some(offender) = validator_results.iter().find(|v| v.decision == Decision::Deny) {
        return (Decision::Deny, format!("{}: {}", offender.rule_id, offender.rationale));
    }
    if let Some(offender) = validator_results.iter().find(|v| v.decision == Decision::Escalate) {
        return (Decision::Escalate, format!("{}: {}", offender.rule_id, offender.rationale));
    }
    if semantic.coverage < coverage_floor {
        return (Decision::Escalate, REASON_LOW_SEMANTIC_COVERAGE.to_string());
    }
    (Decision::Allow, REASON_ALL_VALIDATORS_PASSED.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifiers::RuleId;
    use crate::identifiers::ValidatorName;

    fn semantic_allow(coverage: f64) -> SemanticVerdict {
        SemanticVerdict {
            decision: Decision::Allow,
            ontology_match: true,
            maturity_authorized: true,
            coverage,
            reason: "SEMANTIC_OK".to_string(),
            requires_validation: true,
        }
    }

    fn verdict(name: &str, decision: Decision) -> ValidatorVerdict {
        ValidatorVerdict::new(
            ValidatorName::new(name),
            decision,
            RuleId::new("CITATION"),
            "rationale",
            1,
        )
    }

    #[test]
    fn semantic_deny_dominates_everything() {
        let mut semantic = semantic_allow(1.0);
        semantic.decision = Decision::Deny;
        semantic.reason = "UNKNOWN_VERB".to_string();
        let results = vec![verdict("a", Decision::Allow)];
        let (decision, reason) = aggregate(&semantic, &results, 0.8);
        assert_eq!(decision, Decision::Deny);
        assert_eq!(reason, "UNKNOWN_VERB");
    }

    #[test]
    fn first_denying_validator_in_order_wins() {
        let semantic = semantic_allow(1.0);
        let results = vec![
            verdict("first", Decision::Allow),
            verdict("second", Decision::Deny),
            verdict("third", Decision::Deny),
        ];
        let (decision, reason) = aggregate(&semantic, &results, 0.8);
        assert_eq!(decision, Decision::Deny);
        assert!(reason.starts_with("CITATION:"));
        assert!(reason.contains("rationale"));
        // the second validator, not the third, supplies the reason
        let expected = format!("{}: {}", RuleId::new("CITATION"), "rationale");
        assert_eq!(reason, expected);
    }

    #[test]
    fn escalate_dominates_allow() {
        let semantic = semantic_allow(1.0);
        let results = vec![verdict("a", Decision::Allow), verdict("b", Decision::Escalate)];
        let (decision, _) = aggregate(&semantic, &results, 0.8);
        assert_eq!(decision, Decision::Escalate);
    }

    #[test]
    fn low_coverage_escalates_when_otherwise_clean() {
        let semantic = semantic_allow(0.5);
        let results = vec![verdict("a", Decision::Allow)];
        let (decision, reason) = aggregate(&semantic, &results, 0.8);
        assert_eq!(decision, Decision::Escalate);
        assert_eq!(reason, REASON_LOW_SEMANTIC_COVERAGE);
    }

    #[test]
    fn all_pass_and_coverage_met_allows() {
        let semantic = semantic_allow(0.9);
        let results = vec![verdict("a", Decision::Allow), verdict("b", Decision::Allow)];
        let (decision, reason) = aggregate(&semantic, &results, 0.8);
        assert_eq!(decision, Decision::Allow);
        assert_eq!(reason, REASON_ALL_VALIDATORS_PASSED);
    }

    #[test]
    fn empty_validator_list_with_full_coverage_allows() {
        let semantic = semantic_allow(1.0);
        let (decision, reason) = aggregate(&semantic, &[], 0.8);
        assert_eq!(decision, Decision::Allow);
        assert_eq!(reason, REASON_ALL_VALIDATORS_PASSED);
    }

    proptest::proptest! {
        /// Deny dominates Escalate dominates Allow, for any mix of validator
        /// decisions and any semantic coverage, regardless of how the
        /// validator decisions are ordered in the input slice.
        #[test]
        fn deny_dominates_escalate_dominates_allow(
            decisions in proptest::collection::vec(0u8..3, 0..8),
            coverage in 0f64..1.0,
        ) {
            let semantic = semantic_allow(coverage);
            let results: Vec<ValidatorVerdict> = decisions
                .iter()
                .enumerate()
                .map(|(index, code)| {
                    let decision = match code {
                        0 => Decision::Allow,
                        1 => Decision::Escalate,
                        _ => Decision::Deny,
                    };
                    verdict(&format!("v{index}"), decision)
                })
                .collect();
            let (decision, _reason) = aggregate(&semantic, &results, 0.8);

            let any_deny = results.iter().any(|v| v.decision == Decision::Deny);
            let any_escalate = results.iter().any(|v| v.decision == Decision::Escalate);
            if any_deny {
                proptest::prop_assert_eq!(decision, Decision::Deny);
            } else if any_escalate {
                proptest::prop_assert_eq!(decision, Decision::Escalate);
            } else if coverage < 0.8 {
                proptest::prop_assert_eq!(decision, Decision::Escalate);
            } else {
                proptest::prop_assert_eq!(decision, Decision::Allow);
            }
        }

        /// A semantic deny always wins, no matter what the validators say.
        #[test]
        fn semantic_deny_always_wins(
            decisions in proptest::collection::vec(0u8..3, 0..8),
        ) {
            let mut semantic = semantic_allow(1.0);
            semantic.decision = Decision::Deny;
            semantic.reason = "UNKNOWN_VERB".to_string();
            let results: Vec<ValidatorVerdict> = decisions
                .iter()
                .enumerate()
                .map(|(index, code)| {
                    let decision = match code {
                        0 => Decision::Allow,
                        1 => Decision::Escalate,
                        _ => Decision::Deny,
                    };
                    verdict(&format!("v{index}"), decision)
                })
                .collect();
            let (decision, reason) = aggregate(&semantic, &results, 0.8);
            proptest::prop_assert_eq!(decision, Decision::Deny);
            proptest::prop_assert_eq!(reason, "UNKNOWN_VERB");
        }
    }
}
