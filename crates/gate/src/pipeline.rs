// crates/gate/src/pipeline.rs
// ============================================================================
// Module: Validation Gate Pipeline
// Description: The seven-stage evaluate() pipeline, fail-closed end to end.
// Purpose: Turn an ActionPrimitive + AgentContext into a signed, persisted
//          Verdict under a bounded total latency budget.
// Dependencies: gate-core, gate-validators, tokio, time
// ============================================================================

//! ## Overview
//! [`ValidationGate::evaluate`] is the orchestrator's sole public contract:
//! `evaluate(action, agent_context) -> Verdict`, never failing and never
//! blocking past `T_total`. Internally it runs the seven stages from
//! `spec.md` §4.1 — health probe, semantic check, validator-chain lookup,
//! parallel validator dispatch, aggregation, signing, persist — each under
//! its own deadline, and wraps the whole thing in an outer timeout plus a
//! semaphore-backed overload guard.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use gate_core::ActionPrimitive;
use gate_core::AgentContext;
use gate_core::AuditLedger;
use gate_core::ComponentTimings;
use gate_core::Decision;
use gate_core::GateMetrics;
use gate_core::GateOutcome;
use gate_core::GateRequestEvent;
use gate_core::GateStage;
use gate_core::NoopMetrics;
use gate_core::OntologyClient;
use gate_core::SemanticVerdict;
use gate_core::Signer;
use gate_core::ValidatorVerdict;
use gate_core::Verdict;
use gate_core::aggregate;
use gate_core::aggregate::REASON_ALL_VALIDATORS_PASSED;
use gate_core::aggregate::REASON_LOW_SEMANTIC_COVERAGE;
use gate_validators::ValidatorRegistry;
use tokio::sync::Semaphore;

use crate::health::HealthCache;
use crate::reasons;
use crate::timeouts::GateTimeouts;

/// Default floor below which an otherwise-clean request is escalated rather
/// than allowed; mirrors `gate_config::DEFAULT_COVERAGE_FLOOR` and
/// `gate_ontology::seed::DEFAULT_COVERAGE_FLOOR`, duplicated here so this
/// crate stays independent of the configuration-loading collaborator.
pub const DEFAULT_COVERAGE_FLOOR: f64 = 0.8;

/// Default bound on concurrently in-flight evaluations before the gate
/// starts shedding load with `OVERLOAD`.
const DEFAULT_MAX_INFLIGHT: usize = 64;

// ============================================================================
// SECTION: Validation Gate
// ============================================================================

/// The Validation Gate orchestrator.
///
/// # Invariants
/// - Cloning shares the same collaborators, health cache, and overload
///   semaphore; it is cheap and intended for per-request use.
#[derive(Clone)]
pub struct ValidationGate {
    ontology: Arc<dyn OntologyClient>,
    registry: Arc<ValidatorRegistry>,
    signer: Arc<dyn Signer>,
    ledger: Arc<dyn AuditLedger>,
    metrics: Arc<dyn GateMetrics>,
    health: Arc<HealthCache>,
    inflight: Arc<Semaphore>,
    timeouts: GateTimeouts,
    coverage_floor: f64,
}

impl ValidationGate {
    /// Builds a gate with explicit collaborators, default timeouts and
    /// coverage floor, a no-op metrics sink, and a concurrency bound of 64
    /// in-flight requests.
    #[must_use]
    pub fn new(
        ontology: Arc<dyn OntologyClient>,
        registry: ValidatorRegistry,
        signer: Arc<dyn Signer>,
        ledger: Arc<dyn AuditLedger>,
    ) -> Self {
        Self {
            ontology,
            registry: Arc::new(registry),
            signer,
            ledger,
            metrics: Arc::new(NoopMetrics),
            health: Arc::new(HealthCache::new()),
            inflight: Arc::new(Semaphore::new(DEFAULT_MAX_INFLIGHT)),
            timeouts: GateTimeouts::default(),
            coverage_floor: DEFAULT_COVERAGE_FLOOR,
        }
    }

    /// Overrides the per-stage timeouts.
    #[must_use]
    pub const fn with_timeouts(mut self, timeouts: GateTimeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Overrides the semantic-coverage floor below which otherwise-clean
    /// requests are escalated rather than allowed.
    #[must_use]
    pub const fn with_coverage_floor(mut self, coverage_floor: f64) -> Self {
        self.coverage_floor = coverage_floor;
        self
    }

    /// Overrides the metrics sink.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Arc<dyn GateMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Overrides the maximum number of concurrently in-flight evaluations;
    /// requests beyond the bound are denied with reason `OVERLOAD`.
    #[must_use]
    pub fn with_max_inflight(mut self, max_inflight: usize) -> Self {
        self.inflight = Arc::new(Semaphore::new(max_inflight));
        self
    }

    /// Evaluates one action end to end. Never panics across this boundary:
    /// an internal panic anywhere in the pipeline is converted into a DENY
    /// `GATE_INTERNAL_ERROR` verdict, and an overrun of `T_total` is
    /// converted into a DENY `GATE_TIMEOUT` verdict.
    pub async fn evaluate(&self, action: ActionPrimitive, context: AgentContext) -> Verdict {
        let Ok(_permit) = Arc::clone(&self.inflight).try_acquire_owned() else {
            return self.immediate_deny(&action, &context, reasons::OVERLOAD);
        };

        let this = self.clone();
        let spawned_action = action.clone();
        let spawned_context = context.clone();
        let total_ms = self.timeouts.t_total_ms;

        let outcome = tokio::time::timeout(
            Duration::from_millis(total_ms),
            tokio::spawn(async move { this.run_pipeline(spawned_action, spawned_context).await }),
        )
        .await;

        match outcome {
            Ok(Ok(verdict)) => verdict,
            Ok(Err(_join_error)) => {
                self.immediate_deny(&action, &context, reasons::GATE_INTERNAL_ERROR)
            }
            Err(_elapsed) => self.immediate_deny(&action, &context, reasons::GATE_TIMEOUT),
        }
    }

    /// Runs the seven pipeline stages, always producing a signed (or
    /// signature-empty, DENY-marked) verdict.
    async fn run_pipeline(&self, action: ActionPrimitive, context: AgentContext) -> Verdict {
        let mut timings = ComponentTimings::default();
        let mut semantic = blank_semantic();
        let mut validator_results: Vec<ValidatorVerdict> = Vec::new();
        let mut all_validators_timely = true;
        let mut pipeline_integrity_ok = true;

        let (decision, reason) = 'pipeline: {
            // Stage 1: health probe, cached for T_cache.
            let stage_start = Instant::now();
            let healthy = self.health.probe(self.ontology.as_ref(), self.timeouts.t_cache_ms).await;
            timings.health_ms = elapsed_ms(stage_start);
            self.metrics.record_stage_latency(GateStage::Health, stage_start.elapsed());
            if !healthy {
                pipeline_integrity_ok = false;
                break 'pipeline (Decision::Deny, reasons::VALIDATOR_UNHEALTHY.to_string());
            }

            // Stage 2: semantic authority check, under T_sem.
            let stage_start = Instant::now();
            let semantic_outcome = tokio::time::timeout(
                Duration::from_millis(self.timeouts.t_sem_ms),
                self.ontology.validate_semantic_authority(&action, context.maturity_level),
            )
            .await;
            timings.semantic_ms = elapsed_ms(stage_start);
            self.metrics.record_stage_latency(GateStage::Semantic, stage_start.elapsed());
            semantic = match semantic_outcome {
                Err(_elapsed) => {
                    pipeline_integrity_ok = false;
                    break 'pipeline (Decision::Deny, reasons::SEMANTIC_TIMEOUT.to_string());
                }
                Ok(Err(_error)) => {
                    pipeline_integrity_ok = false;
                    break 'pipeline (Decision::Deny, reasons::SEMANTIC_ERROR.to_string());
                }
                Ok(Ok(verdict)) => verdict,
            };
            if semantic.decision == Decision::Deny {
                break 'pipeline (Decision::Deny, semantic.reason.clone());
            }

            // Stage 3: validator-chain lookup. An absent or empty chain is
            // policy-defined by the ontology's classification of the verb:
            // informational verbs implicitly allow, governed verbs fail
            // closed with NO_VALIDATORS.
            let registered = self.registry.chain_for(&action.domain, &action.verb);
            let chain: &[Arc<dyn gate_core::Validator>] = match registered {
                Some(chain) if !chain.is_empty() => chain,
                _ if !semantic.requires_validation => &[],
                _ => {
                    pipeline_integrity_ok = false;
                    break 'pipeline (Decision::Deny, reasons::NO_VALIDATORS.to_string());
                }
            };

            // Stage 4: parallel validator evaluation, each under T_val,
            // panic-isolated via spawn, re-sorted back to registry order.
            let stage_start = Instant::now();
            let mut handles = Vec::with_capacity(chain.len());
            for validator in chain {
                let validator = Arc::clone(validator);
                let call_start = Instant::now();
                let name = validator.name();
                let timeout_ms = validator.timeout_ms();
                let action = action.clone();
                let context = context.clone();
                let handle = tokio::spawn(async move { validator.validate(&action, &context) });
                handles.push((name, timeout_ms, call_start, handle));
            }
            for (name, timeout_ms, call_start, handle) in handles {
                let joined = tokio::time::timeout(Duration::from_millis(timeout_ms), handle).await;
                let elapsed = elapsed_ms(call_start);
                let verdict = match joined {
                    Err(_elapsed) => {
                        all_validators_timely = false;
                        ValidatorVerdict::timeout(name, timeout_ms)
                    }
                    Ok(Err(join_error)) => {
                        all_validators_timely = false;
                        ValidatorVerdict::exception(name, join_error.to_string())
                    }
                    Ok(Ok(mut verdict)) => {
                        verdict.latency_ms = elapsed;
                        verdict
                    }
                };
                validator_results.push(verdict);
            }
            timings.validators_ms = elapsed_ms(stage_start);
            self.metrics.record_stage_latency(GateStage::Validators, stage_start.elapsed());

            // Stage 5: conservative-veto aggregation.
            let aggregate_start = Instant::now();
            let outcome = aggregate(&semantic, &validator_results, self.coverage_floor);
            self.metrics.record_stage_latency(GateStage::Aggregate, aggregate_start.elapsed());
            outcome
        };

        self.finalize(FinalizeInput {
            context,
            action,
            decision,
            reason,
            semantic,
            validator_results,
            timings,
            all_validators_timely,
            pipeline_integrity_ok,
        })
        .await
    }

    /// Stages 6 and 7: sign, then persist. Always returns a verdict, even
    /// when signing or persisting fails.
    async fn finalize(&self, input: FinalizeInput) -> Verdict {
        let FinalizeInput {
            context,
            action,
            mut decision,
            mut reason,
            semantic,
            validator_results,
            mut timings,
            all_validators_timely,
            pipeline_integrity_ok,
        } = input;

        let mut verdict = Verdict {
            trace_id: context.trace_id,
            decision,
            reason: reason.clone(),
            action,
            agent_id: context.agent_id,
            agent_maturity: context.maturity_level,
            semantic,
            validator_results,
            governance_latency_ms: 0,
            component_timings: timings,
            certifiable: false,
            signature: String::new(),
            key_version: None,
            emitted_at: unix_millis_now(),
        };

        // Stage 6: sign.
        let stage_start = Instant::now();
        match self.signer.sign(&verdict) {
            Ok(signature) => verdict.signature = signature,
            Err(_error) => {
                decision = Decision::Deny;
                reason = reasons::SIGNATURE_ERROR.to_string();
                verdict.decision = decision;
                verdict.reason = reason.clone();
            }
        }
        timings.sign_ms = elapsed_ms(stage_start);
        self.metrics.record_stage_latency(GateStage::Sign, stage_start.elapsed());

        // Stage 7: persist, under T_persist.
        let stage_start = Instant::now();
        let persisted = tokio::time::timeout(
            Duration::from_millis(self.timeouts.t_persist_ms),
            self.ledger.append(&verdict),
        )
        .await;
        timings.persist_ms = elapsed_ms(stage_start);
        self.metrics.record_stage_latency(GateStage::Persist, stage_start.elapsed());
        let persist_ok = matches!(persisted, Ok(Ok(())));
        if !persist_ok {
            decision = Decision::Deny;
            reason = reasons::LEDGER_ERROR.to_string();
            verdict.decision = decision;
            verdict.reason = reason;
        }

        verdict.component_timings = timings;
        verdict.governance_latency_ms = timings.total_ms();
        verdict.certifiable = all_validators_timely
            && pipeline_integrity_ok
            && !verdict.signature.is_empty()
            && persist_ok;

        self.metrics.record_request(GateRequestEvent {
            outcome: outcome_of(verdict.decision),
            reason: metrics_label(verdict.decision, &verdict.reason),
            certifiable: verdict.certifiable,
        });

        verdict
    }

    /// Builds a best-effort signed DENY verdict for the outer catch-all
    /// paths (overload, total-budget timeout, internal panic) where the
    /// normal pipeline never reached the persist stage. These are not
    /// appended to the ledger: by construction the normal path already
    /// exhausted (or never had) its latency budget, and attempting another
    /// I/O call here would only compound the failure.
    fn immediate_deny(&self, action: &ActionPrimitive, context: &AgentContext, reason: &str) -> Verdict {
        let mut verdict = Verdict {
            trace_id: context.trace_id.clone(),
            decision: Decision::Deny,
            reason: reason.to_string(),
            action: action.clone(),
            agent_id: context.agent_id.clone(),
            agent_maturity: context.maturity_level,
            semantic: blank_semantic(),
            validator_results: Vec::new(),
            governance_latency_ms: 0,
            component_timings: ComponentTimings::default(),
            certifiable: false,
            signature: String::new(),
            key_version: None,
            emitted_at: unix_millis_now(),
        };
        if let Ok(signature) = self.signer.sign(&verdict) {
            verdict.signature = signature;
        }
        self.metrics.record_request(GateRequestEvent {
            outcome: GateOutcome::Deny,
            reason: metrics_label(Decision::Deny, &verdict.reason),
            certifiable: false,
        });
        verdict
    }
}

/// Bundles the outputs of the pre-signing stages for the one `finalize` call
/// site; avoids an unwieldy positional-argument list across stages 6 and 7.
struct FinalizeInput {
    context: AgentContext,
    action: ActionPrimitive,
    decision: Decision,
    reason: String,
    semantic: SemanticVerdict,
    validator_results: Vec<ValidatorVerdict>,
    timings: ComponentTimings,
    all_validators_timely: bool,
    pipeline_integrity_ok: bool,
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn blank_semantic() -> SemanticVerdict {
    SemanticVerdict {
        decision: Decision::Deny,
        ontology_match: false,
        maturity_authorized: false,
        coverage: 0.0,
        reason: String::new(),
        requires_validation: true,
    }
}

fn elapsed_ms(start: Instant) -> u64 {
    u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX)
}

fn unix_millis_now() -> i64 {
    let now = time::OffsetDateTime::now_utc();
    i64::try_from(now.unix_timestamp_nanos() / 1_000_000).unwrap_or(i64::MAX)
}

const fn outcome_of(decision: Decision) -> GateOutcome {
    match decision {
        Decision::Allow => GateOutcome::Allow,
        Decision::Deny => GateOutcome::Deny,
        Decision::Escalate => GateOutcome::Escalate,
    }
}

/// Coarsens a verdict's free-text `reason` into the small, fixed vocabulary
/// metrics backends expect as a label. The full reason (citation and
/// rationale included) is preserved verbatim in the persisted `Verdict`;
/// only the telemetry label is classified.
fn metrics_label(decision: Decision, reason: &str) -> &'static str {
    match reason {
        reasons::VALIDATOR_UNHEALTHY => reasons::VALIDATOR_UNHEALTHY,
        reasons::SEMANTIC_TIMEOUT => reasons::SEMANTIC_TIMEOUT,
        reasons::SEMANTIC_ERROR => reasons::SEMANTIC_ERROR,
        reasons::NO_VALIDATORS => reasons::NO_VALIDATORS,
        reasons::SIGNATURE_ERROR => reasons::SIGNATURE_ERROR,
        reasons::LEDGER_ERROR => reasons::LEDGER_ERROR,
        reasons::GATE_TIMEOUT => reasons::GATE_TIMEOUT,
        reasons::GATE_INTERNAL_ERROR => reasons::GATE_INTERNAL_ERROR,
        reasons::OVERLOAD => reasons::OVERLOAD,
        "UNKNOWN_VERB" => "UNKNOWN_VERB",
        REASON_ALL_VALIDATORS_PASSED => REASON_ALL_VALIDATORS_PASSED,
        REASON_LOW_SEMANTIC_COVERAGE => REASON_LOW_SEMANTIC_COVERAGE,
        _ if reason.starts_with("AMM_VIOLATION") => "AMM_VIOLATION",
        _ => match decision {
            Decision::Deny => reasons::VALIDATOR_VETO,
            Decision::Escalate => reasons::VALIDATOR_ESCALATION,
            Decision::Allow => REASON_ALL_VALIDATORS_PASSED,
        },
    }
}
