// crates/gate/src/tests.rs
// ============================================================================
// Module: Gate Pipeline Tests
// Description: End-to-end and fail-closed integration tests for evaluate().
// Purpose: Exercise the six literal scenarios and five injected-failure
//          scenarios as whole-pipeline tests, plus universal invariants.
// Dependencies: gate-core, gate-ontology, gate-signer, gate-ledger,
//               gate-validators, proptest, tokio
// ============================================================================

#![allow(clippy::expect_used, reason = "Integration tests use expect for setup clarity.")]
#![allow(clippy::panic, reason = "PanicValidator deliberately panics to exercise the EXCEPTION fail-closed path.")]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use gate_core::ActionPrimitive;
use gate_core::AgentContext;
use gate_core::AuditLedger;
use gate_core::Decision;
use gate_core::Domain;
use gate_core::LedgerError;
use gate_core::MaturityLevel;
use gate_core::RuleId;
use gate_core::Signer;
use gate_core::SignerError;
use gate_core::TraceId;
use gate_core::Validator;
use gate_core::ValidatorName;
use gate_core::ValidatorVerdict;
use gate_core::Verb;
use gate_core::Verdict;
use gate_ledger::SqliteAuditLedger;
use gate_ontology::InProcessOntologyClient;
use gate_signer::HmacSigner;
use gate_validators::ValidatorRegistry;

use crate::ValidationGate;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

fn agent_context(maturity: u8, trace: &str) -> AgentContext {
    AgentContext {
        agent_id: None,
        maturity_level: MaturityLevel::new(maturity).expect("valid maturity level"),
        trace_id: TraceId::new(trace),
        submission_time: 0,
    }
}

fn action(domain: &str, verb: &str, params: &[(&str, serde_json::Value)]) -> ActionPrimitive {
    let parameters: BTreeMap<String, serde_json::Value> =
        params.iter().map(|(key, value)| ((*key).to_string(), value.clone())).collect();
    ActionPrimitive {
        verb: Verb::new(verb),
        resource: "test-resource".to_string(),
        domain: Domain::new(domain),
        parameters,
    }
}

/// Full set of governed parameters for a flight that clears every aviation
/// validator: fuel reserve satisfied (current_fuel 3000, see gate-validators'
/// fuel_reserve tests for why 3000 and not the spec's literal 2000 — the two
/// scenario rows in spec.md §8 reuse the same fuel figures for both an ALLOW
/// and a DENY case, which is internally inconsistent; 3000/2000 resolves it).
fn clean_flight_params() -> Vec<(&'static str, serde_json::Value)> {
    vec![
        ("current_fuel", serde_json::json!(3000)),
        ("route_distance", serde_json::json!(500)),
        ("burn_rate", serde_json::json!(5)),
        ("burn_rate_per_min", serde_json::json!(5)),
        ("night", serde_json::json!(false)),
        ("current_duty_minutes", serde_json::json!(100)),
        ("proposed_flight_minutes", serde_json::json!(60)),
        ("altitude_ft", serde_json::json!(5_000)),
        ("terrain_type", serde_json::json!("flat")),
        ("restricted_zone", serde_json::json!(false)),
    ]
}

fn default_gate() -> (ValidationGate, Arc<InProcessOntologyClient>) {
    gate_with(
        Arc::new(InProcessOntologyClient::builtin()),
        ValidatorRegistry::builtin(),
        Arc::new(HmacSigner::new("integration-test-secret").expect("build signer")),
        Arc::new(SqliteAuditLedger::open_in_memory().expect("open in-memory ledger")),
    )
}

fn gate_with(
    ontology: Arc<InProcessOntologyClient>,
    registry: ValidatorRegistry,
    signer: Arc<dyn Signer>,
    ledger: Arc<dyn AuditLedger>,
) -> (ValidationGate, Arc<InProcessOntologyClient>) {
    let gate = ValidationGate::new(ontology.clone(), registry, signer, ledger);
    (gate, ontology)
}

/// A validator that always panics, standing in for "fuel-validator raises"
/// from spec.md §8 without making the production `FuelReserveValidator`
/// itself fallible.
struct PanicValidator;

impl Validator for PanicValidator {
    fn name(&self) -> ValidatorName {
        ValidatorName::new("fuel-reserve")
    }

    fn timeout_ms(&self) -> u64 {
        150
    }

    fn rule_id(&self) -> RuleId {
        RuleId::new("FAA 14 CFR §91.151")
    }

    fn validate(&self, _action: &ActionPrimitive, _context: &AgentContext) -> ValidatorVerdict {
        panic!("simulated validator failure")
    }
}

/// A signer that always fails, standing in for "signer raises".
struct FailingSigner;

impl Signer for FailingSigner {
    fn sign(&self, _verdict: &Verdict) -> Result<String, SignerError> {
        Err(SignerError::SecretUnavailable)
    }

    fn verify(&self, _verdict: &Verdict, _signature: &str) -> bool {
        false
    }
}

/// A ledger that always fails, standing in for "ledger raises".
struct FailingLedger;

#[async_trait]
impl AuditLedger for FailingLedger {
    async fn append(&self, _verdict: &Verdict) -> Result<(), LedgerError> {
        Err(LedgerError::Io("simulated ledger failure".to_string()))
    }
}

// ============================================================================
// SECTION: Six Literal End-To-End Scenarios
// ============================================================================

#[tokio::test]
async fn scenario_1_clean_flight_allows() {
    let (gate, _ontology) = default_gate();
    let verdict = gate
        .evaluate(
            action("aviation", "reroute_flight", &clean_flight_params()),
            agent_context(3, "trace-1"),
        )
        .await;
    assert_eq!(verdict.decision, Decision::Allow);
    assert_eq!(verdict.reason, "ALL_VALIDATORS_PASSED");
    assert!(verdict.certifiable);
    assert!(!verdict.signature.is_empty());
}

#[tokio::test]
async fn scenario_2_insufficient_fuel_denies() {
    let (gate, _ontology) = default_gate();
    let mut params = clean_flight_params();
    params.retain(|(key, _)| *key != "current_fuel");
    params.push(("current_fuel", serde_json::json!(2000)));
    let verdict = gate
        .evaluate(action("aviation", "reroute_flight", &params), agent_context(3, "trace-2"))
        .await;
    assert_eq!(verdict.decision, Decision::Deny);
    assert!(verdict.reason.contains("FAA 14 CFR §91.151"));
}

#[tokio::test]
async fn scenario_3_duty_time_exceeded_denies() {
    let (gate, _ontology) = default_gate();
    let mut params = clean_flight_params();
    params.retain(|(key, _)| *key != "current_duty_minutes" && *key != "proposed_flight_minutes");
    params.push(("current_duty_minutes", serde_json::json!(520)));
    params.push(("proposed_flight_minutes", serde_json::json!(60)));
    let verdict = gate
        .evaluate(action("aviation", "reroute_flight", &params), agent_context(3, "trace-3"))
        .await;
    assert_eq!(verdict.decision, Decision::Deny);
    assert!(verdict.reason.contains("14 CFR §121.471"));
}

#[tokio::test]
async fn scenario_4_unknown_verb_denies() {
    let (gate, _ontology) = default_gate();
    let verdict = gate
        .evaluate(action("aviation", "teleport_aircraft", &[]), agent_context(3, "trace-4"))
        .await;
    assert_eq!(verdict.decision, Decision::Deny);
    assert_eq!(verdict.reason, "UNKNOWN_VERB");
}

#[tokio::test]
async fn scenario_5_insufficient_maturity_denies() {
    let (gate, _ontology) = default_gate();
    let verdict = gate
        .evaluate(
            action("aviation", "reroute_flight", &clean_flight_params()),
            agent_context(2, "trace-5"),
        )
        .await;
    assert_eq!(verdict.decision, Decision::Deny);
    assert!(verdict.reason.contains("AMM_VIOLATION"));
}

#[tokio::test]
async fn governed_verb_with_no_validator_chain_denies_no_validators() {
    let (gate, _ontology) = gate_with(
        Arc::new(InProcessOntologyClient::builtin()),
        ValidatorRegistry::new(),
        Arc::new(HmacSigner::new("integration-test-secret").expect("build signer")),
        Arc::new(SqliteAuditLedger::open_in_memory().expect("open in-memory ledger")),
    );
    let verdict = gate
        .evaluate(
            action("aviation", "reroute_flight", &clean_flight_params()),
            agent_context(3, "trace-no-validators"),
        )
        .await;
    assert_eq!(verdict.decision, Decision::Deny);
    assert_eq!(verdict.reason, "NO_VALIDATORS");
    assert!(!verdict.certifiable);
}

#[tokio::test]
async fn informational_verb_with_no_validator_chain_allows() {
    let (gate, _ontology) = default_gate();
    let verdict = gate
        .evaluate(
            action("aviation", "request_weather_briefing", &[]),
            agent_context(3, "trace-informational"),
        )
        .await;
    assert_eq!(verdict.decision, Decision::Allow);
    assert_eq!(verdict.reason, "ALL_VALIDATORS_PASSED");
    assert!(verdict.certifiable);
}

#[tokio::test]
async fn scenario_6_payment_without_sca_denies() {
    let (gate, _ontology) = default_gate();
    let params = vec![
        ("amount", serde_json::json!(350)),
        ("sca_completed", serde_json::json!(false)),
        ("risk_profile", serde_json::json!("standard")),
    ];
    let verdict = gate
        .evaluate(action("fintech", "initiate_payment", &params), agent_context(3, "trace-6"))
        .await;
    assert_eq!(verdict.decision, Decision::Deny);
    assert!(verdict.reason.contains("PSD2 RTS 2018/389"));
}

// ============================================================================
// SECTION: Injected-Failure Scenarios
// ============================================================================

#[tokio::test]
async fn ontology_unreachable_denies_validator_unhealthy() {
    let (gate, ontology) = default_gate();
    ontology.set_healthy(false);
    let verdict = gate
        .evaluate(
            action("aviation", "reroute_flight", &clean_flight_params()),
            agent_context(3, "trace-unhealthy"),
        )
        .await;
    assert_eq!(verdict.decision, Decision::Deny);
    assert_eq!(verdict.reason, "VALIDATOR_UNHEALTHY");
    assert!(!verdict.certifiable);
}

#[tokio::test]
async fn ontology_timeout_denies_semantic_timeout() {
    let (gate, ontology) = default_gate();
    ontology.set_delay_ms(600);
    let gate = gate.with_timeouts(crate::GateTimeouts { t_sem_ms: 500, ..crate::GateTimeouts::default() });
    let verdict = gate
        .evaluate(
            action("aviation", "reroute_flight", &clean_flight_params()),
            agent_context(3, "trace-sem-timeout"),
        )
        .await;
    assert_eq!(verdict.decision, Decision::Deny);
    assert_eq!(verdict.reason, "SEMANTIC_TIMEOUT");
    assert!(!verdict.certifiable);
}

#[tokio::test]
async fn panicking_validator_denies_with_exception() {
    let ontology = Arc::new(InProcessOntologyClient::builtin());
    let registry = ValidatorRegistry::new().register(
        Domain::new("aviation"),
        Verb::new("reroute_flight"),
        vec![Arc::new(PanicValidator)],
    );
    let (gate, _ontology) = gate_with(
        ontology,
        registry,
        Arc::new(HmacSigner::new("integration-test-secret").expect("build signer")),
        Arc::new(SqliteAuditLedger::open_in_memory().expect("open in-memory ledger")),
    );
    let verdict = gate
        .evaluate(
            action("aviation", "reroute_flight", &clean_flight_params()),
            agent_context(3, "trace-panic"),
        )
        .await;
    assert_eq!(verdict.decision, Decision::Deny);
    assert!(verdict.reason.contains("EXCEPTION"));
    assert!(!verdict.certifiable);
}

#[tokio::test]
async fn failing_signer_denies_signature_error_with_empty_signature() {
    let (gate, _ontology) = gate_with(
        Arc::new(InProcessOntologyClient::builtin()),
        ValidatorRegistry::builtin(),
        Arc::new(FailingSigner),
        Arc::new(SqliteAuditLedger::open_in_memory().expect("open in-memory ledger")),
    );
    let verdict = gate
        .evaluate(
            action("aviation", "reroute_flight", &clean_flight_params()),
            agent_context(3, "trace-sign-fail"),
        )
        .await;
    assert_eq!(verdict.decision, Decision::Deny);
    assert_eq!(verdict.reason, "SIGNATURE_ERROR");
    assert!(verdict.signature.is_empty());
    assert!(!verdict.certifiable);
}

#[tokio::test]
async fn failing_ledger_denies_ledger_error_but_still_returns_verdict() {
    let (gate, _ontology) = gate_with(
        Arc::new(InProcessOntologyClient::builtin()),
        ValidatorRegistry::builtin(),
        Arc::new(HmacSigner::new("integration-test-secret").expect("build signer")),
        Arc::new(FailingLedger),
    );
    let verdict = gate
        .evaluate(
            action("aviation", "reroute_flight", &clean_flight_params()),
            agent_context(3, "trace-ledger-fail"),
        )
        .await;
    assert_eq!(verdict.decision, Decision::Deny);
    assert_eq!(verdict.reason, "LEDGER_ERROR");
    assert!(!verdict.certifiable);
    // the verdict is still returned to the caller even though it was never
    // persisted; there is no separate "gate unavailable" response path.
    assert_eq!(verdict.trace_id, TraceId::new("trace-ledger-fail"));
}

// ============================================================================
// SECTION: Universal Invariants
// ============================================================================

#[tokio::test]
async fn overload_guard_denies_beyond_max_inflight() {
    let (gate, _ontology) = default_gate();
    let gate = gate.with_max_inflight(0);
    let verdict = gate
        .evaluate(
            action("aviation", "reroute_flight", &clean_flight_params()),
            agent_context(3, "trace-overload"),
        )
        .await;
    assert_eq!(verdict.decision, Decision::Deny);
    assert_eq!(verdict.reason, "OVERLOAD");
}

#[tokio::test]
async fn identical_inputs_produce_identical_decision_and_reason() {
    let (gate, _ontology) = default_gate();
    let params = clean_flight_params();
    let first = gate
        .evaluate(
            action("aviation", "reroute_flight", &params),
            agent_context(3, "trace-repeat"),
        )
        .await;
    let second = gate
        .evaluate(
            action("aviation", "reroute_flight", &params),
            agent_context(3, "trace-repeat"),
        )
        .await;
    assert_eq!(first.decision, second.decision);
    assert_eq!(first.reason, second.reason);
    assert_eq!(first.semantic, second.semantic);
    assert_eq!(first.certifiable, second.certifiable);
}

#[tokio::test]
async fn verify_rejects_any_single_bit_mutation_of_a_real_verdict() {
    let (gate, _ontology) = default_gate();
    let verdict = gate
        .evaluate(
            action("aviation", "reroute_flight", &clean_flight_params()),
            agent_context(3, "trace-verify"),
        )
        .await;
    let signer = HmacSigner::new("integration-test-secret").expect("build signer");
    assert!(signer.verify(&verdict, &verdict.signature));

    let mut tampered = verdict.clone();
    tampered.reason = format!("{}-tampered", tampered.reason);
    assert!(!signer.verify(&tampered, &verdict.signature));
}

proptest::proptest! {
    #[test]
    fn certifiable_implies_signature_and_budget(maturity in 1u8..=5u8, fuel in 0f64..6_000.0) {
        let runtime = tokio::runtime::Runtime::new().expect("build proptest runtime");
        runtime.block_on(async {
            let (gate, _ontology) = default_gate();
            let mut params = clean_flight_params();
            params.retain(|(key, _)| *key != "current_fuel");
            params.push(("current_fuel", serde_json::json!(fuel)));
            let verdict = gate
                .evaluate(
                    action("aviation", "reroute_flight", &params),
                    agent_context(maturity, "trace-proptest"),
                )
                .await;
            if verdict.certifiable {
                prop_assert!(!verdict.signature.is_empty());
                prop_assert!(verdict.governance_latency_ms <= crate::GateTimeouts::default().t_total_ms);
            }
            prop_assert!(matches!(
                verdict.decision,
                Decision::Allow | Decision::Deny | Decision::Escalate
            ));
            Ok(())
        })?;
    }
}
