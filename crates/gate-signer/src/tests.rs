// crates/gate-signer/src/tests.rs
// ============================================================================
// Module: Gate Signer Tests
// Description: Unit tests for HMAC signing and verification.
// Purpose: Confirm the sign/verify round-trip and tamper-detection property.
// ============================================================================

#![allow(clippy::expect_used, reason = "Unit tests use expect for setup clarity.")]

use gate_core::ActionPrimitive;
use gate_core::ComponentTimings;
use gate_core::Decision;
use gate_core::Domain;
use gate_core::MaturityLevel;
use gate_core::SemanticVerdict;
use gate_core::TraceId;
use gate_core::Verb;
use gate_core::Verdict;

use super::HmacSigner;
use super::Signer;

fn sample_verdict() -> Verdict {
    Verdict {
        trace_id: TraceId::new("trace-1"),
        decision: Decision::Allow,
        reason: "ALL_VALIDATORS_PASSED".to_string(),
        action: ActionPrimitive {
            verb: Verb::new("reroute_flight"),
            resource: "flight-42".to_string(),
            domain: Domain::new("aviation"),
            parameters: std::collections::BTreeMap::new(),
        },
        agent_id: None,
        agent_maturity: MaturityLevel::new(3).expect("valid level"),
        semantic: SemanticVerdict {
            decision: Decision::Allow,
            ontology_match: true,
            maturity_authorized: true,
            coverage: 1.0,
            reason: "SEMANTIC_OK".to_string(),
            requires_validation: true,
        },
        validator_results: Vec::new(),
        governance_latency_ms: 10,
        component_timings: ComponentTimings::default(),
        certifiable: true,
        signature: String::new(),
        key_version: None,
        emitted_at: 0,
    }
}

#[test]
fn rejects_empty_secret() {
    assert!(HmacSigner::new(Vec::new()).is_err());
}

#[test]
fn sign_then_verify_round_trips() {
    let signer = HmacSigner::new(b"top-secret-signing-key".to_vec()).expect("valid secret");
    let verdict = sample_verdict();
    let signature = signer.sign(&verdict).expect("signing succeeds");
    assert!(!signature.is_empty());
    assert!(signer.verify(&verdict, &signature));
}

#[test]
fn verify_rejects_tampered_reason() {
    let signer = HmacSigner::new(b"top-secret-signing-key".to_vec()).expect("valid secret");
    let mut verdict = sample_verdict();
    let signature = signer.sign(&verdict).expect("signing succeeds");
    verdict.reason = "TAMPERED".to_string();
    assert!(!signer.verify(&verdict, &signature));
}

#[test]
fn verify_rejects_malformed_hex() {
    let signer = HmacSigner::new(b"top-secret-signing-key".to_vec()).expect("valid secret");
    let verdict = sample_verdict();
    assert!(!signer.verify(&verdict, "not-hex"));
}

#[test]
fn different_secrets_produce_different_signatures() {
    let signer_a = HmacSigner::new(b"secret-a".to_vec()).expect("valid secret");
    let signer_b = HmacSigner::new(b"secret-b".to_vec()).expect("valid secret");
    let verdict = sample_verdict();
    assert_ne!(
        signer_a.sign(&verdict).expect("signing succeeds"),
        signer_b.sign(&verdict).expect("signing succeeds")
    );
}

