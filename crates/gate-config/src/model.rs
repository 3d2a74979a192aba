// crates/gate-config/src/model.rs
// ============================================================================
// Module: Gate Config Model
// Description: Nested configuration structs for every stage deadline and
//              collaborator connection the gate needs at startup.
// Purpose: Give gate-service a single validated object to build the
//          orchestrator and its collaborators from.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Every field here maps one-to-one to an option the gate's configuration
//! surface names: `SIGNATURE_SECRET`, `ONTOLOGY_URL`/`ONTOLOGY_USER`/
//! `ONTOLOGY_PASSWORD`, `LEDGER_URL`, the five stage deadlines, `COVERAGE_FLOOR`,
//! and `COMPLETE_FAIL_CLOSED`. Defaults match the stage-deadline defaults
//! named alongside the pipeline stages themselves.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default total governance latency budget, in milliseconds.
pub const DEFAULT_T_TOTAL_MS: u64 = 200;
/// Default semantic-check stage deadline, in milliseconds.
pub const DEFAULT_T_SEM_MS: u64 = 500;
/// Default per-validator stage deadline, in milliseconds.
pub const DEFAULT_T_VAL_MS: u64 = 150;
/// Default persist-stage deadline, in milliseconds.
pub const DEFAULT_T_PERSIST_MS: u64 = 50;
/// Default health-probe cache lifetime, in milliseconds.
pub const DEFAULT_T_CACHE_MS: u64 = 30_000;
/// Default semantic coverage floor below which ALLOW becomes ESCALATE.
pub const DEFAULT_COVERAGE_FLOOR: f64 = 0.8;

// ============================================================================
// SECTION: Top-Level Config
// ============================================================================

/// Complete, validated Validation Gate configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateConfig {
    /// Signing secret configuration.
    pub signer: SignerConfig,
    /// Ontology client connection configuration.
    #[serde(default)]
    pub ontology: OntologyConfig,
    /// Audit ledger connection configuration.
    #[serde(default)]
    pub ledger: LedgerConfig,
    /// Per-stage timeout configuration.
    #[serde(default)]
    pub timeouts: TimeoutsConfig,
    /// Semantic coverage floor below which ALLOW becomes ESCALATE.
    #[serde(default = "default_coverage_floor")]
    pub coverage_floor: f64,
    /// If true, a ledger-write failure escalates to a 5xx at the HTTP layer
    /// instead of the default fail-closed-but-200 behavior.
    #[serde(default)]
    pub complete_fail_closed: bool,
}

/// Default value for [`GateConfig::coverage_floor`].
const fn default_coverage_floor() -> f64 {
    DEFAULT_COVERAGE_FLOOR
}

// ============================================================================
// SECTION: Signer Config
// ============================================================================

/// Signing-secret configuration.
///
/// # Invariants
/// - `secret` must be non-empty; absence at startup is fatal per `spec.md` §4.5.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignerConfig {
    /// Keying material for the verdict MAC.
    pub secret: String,
}

// ============================================================================
// SECTION: Ontology Config
// ============================================================================

/// Ontology client connection configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OntologyConfig {
    /// Graph-store connection URL.
    #[serde(default)]
    pub url: Option<String>,
    /// Graph-store connection username.
    #[serde(default)]
    pub user: Option<String>,
    /// Graph-store connection password.
    #[serde(default)]
    pub password: Option<String>,
}

// ============================================================================
// SECTION: Ledger Config
// ============================================================================

/// Audit ledger connection configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Append-only time-partitioned store location.
    #[serde(default)]
    pub url: Option<String>,
}

// ============================================================================
// SECTION: Timeouts Config
// ============================================================================

/// Per-stage deadline configuration, all in milliseconds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TimeoutsConfig {
    /// Total governance latency budget.
    #[serde(default = "default_t_total")]
    pub t_total_ms: u64,
    /// Semantic-check stage deadline.
    #[serde(default = "default_t_sem")]
    pub t_sem_ms: u64,
    /// Per-validator stage deadline.
    #[serde(default = "default_t_val")]
    pub t_val_ms: u64,
    /// Persist-stage deadline.
    #[serde(default = "default_t_persist")]
    pub t_persist_ms: u64,
    /// Health-probe cache lifetime.
    #[serde(default = "default_t_cache")]
    pub t_cache_ms: u64,
}

/// Default value for [`TimeoutsConfig::t_total_ms`].
const fn default_t_total() -> u64 {
    DEFAULT_T_TOTAL_MS
}
/// Default value for [`TimeoutsConfig::t_sem_ms`].
const fn default_t_sem() -> u64 {
    DEFAULT_T_SEM_MS
}
/// Default value for [`TimeoutsConfig::t_val_ms`].
const fn default_t_val() -> u64 {
    DEFAULT_T_VAL_MS
}
/// Default value for [`TimeoutsConfig::t_persist_ms`].
const fn default_t_persist() -> u64 {
    DEFAULT_T_PERSIST_MS
}
/// Default value for [`TimeoutsConfig::t_cache_ms`].
const fn default_t_cache() -> u64 {
    DEFAULT_T_CACHE_MS
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            t_total_ms: DEFAULT_T_TOTAL_MS,
            t_sem_ms: DEFAULT_T_SEM_MS,
            t_val_ms: DEFAULT_T_VAL_MS,
            t_persist_ms: DEFAULT_T_PERSIST_MS,
            t_cache_ms: DEFAULT_T_CACHE_MS,
        }
    }
}
