// crates/gate-config/src/load.rs
// ============================================================================
// Module: Config Loading
// Description: TOML-file plus environment-variable cascade and validation.
// Purpose: Give gate-service one entry point that fails fast on a missing
//          signing secret, a missing ontology endpoint, or an out-of-range
//          coverage floor.
// Dependencies: serde, toml
// ============================================================================

//! ## Overview
//! [`load`] reads a TOML file (if given), then lets `GATE_*` environment
//! variables override individual fields, then runs [`validate`]. Environment
//! overrides are applied narrowly (one field at a time) rather than by
//! re-deserializing the whole structure, so a partially-set environment
//! cannot silently blank out unrelated fields.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;

use crate::error::ConfigError;
use crate::model::GateConfig;
use crate::model::LedgerConfig;
use crate::model::OntologyConfig;
use crate::model::SignerConfig;
use crate::model::TimeoutsConfig;

// ============================================================================
// SECTION: Load
// ============================================================================

/// Loads configuration from `path` (if `Some`), applies `GATE_*` environment
/// overrides, and validates the result.
///
/// # Errors
///
/// Returns [`ConfigError::Read`] or [`ConfigError::Parse`] when the file
/// cannot be read or parsed, and [`ConfigError::MissingSignatureSecret`] or
/// [`ConfigError::InvalidCoverageFloor`] when validation fails.
pub fn load(path: Option<&Path>) -> Result<GateConfig, ConfigError> {
    let mut config = match path {
        Some(path) => load_file(path)?,
        None => GateConfig {
            signer: SignerConfig { secret: String::new() },
            ontology: OntologyConfig::default(),
            ledger: LedgerConfig::default(),
            timeouts: TimeoutsConfig::default(),
            coverage_floor: crate::model::DEFAULT_COVERAGE_FLOOR,
            complete_fail_closed: false,
        },
    };
    apply_env_overrides(&mut config);
    validate(&config)?;
    Ok(config)
}

/// Reads and parses a TOML config file.
fn load_file(path: &Path) -> Result<GateConfig, ConfigError> {
    let text = std::fs::read_to_string(path)
        .map_err(|source| ConfigError::Read { path: path.display().to_string(), source })?;
    toml::from_str(&text)
        .map_err(|source| ConfigError::Parse { path: path.display().to_string(), source })
}

/// Applies `GATE_*` environment variable overrides in place.
fn apply_env_overrides(config: &mut GateConfig) {
    if let Ok(secret) = std::env::var("SIGNATURE_SECRET") {
        config.signer.secret = secret;
    }
    if let Ok(url) = std::env::var("ONTOLOGY_URL") {
        config.ontology.url = Some(url);
    }
    if let Ok(user) = std::env::var("ONTOLOGY_USER") {
        config.ontology.user = Some(user);
    }
    if let Ok(password) = std::env::var("ONTOLOGY_PASSWORD") {
        config.ontology.password = Some(password);
    }
    if let Ok(url) = std::env::var("LEDGER_URL") {
        config.ledger.url = Some(url);
    }
    if let Some(value) = parsed_env("T_TOTAL") {
        config.timeouts.t_total_ms = value;
    }
    if let Some(value) = parsed_env("T_SEM") {
        config.timeouts.t_sem_ms = value;
    }
    if let Some(value) = parsed_env("T_VAL") {
        config.timeouts.t_val_ms = value;
    }
    if let Some(value) = parsed_env("T_PERSIST") {
        config.timeouts.t_persist_ms = value;
    }
    if let Some(value) = parsed_env("T_CACHE") {
        config.timeouts.t_cache_ms = value;
    }
    if let Some(value) = parsed_env::<f64>("COVERAGE_FLOOR") {
        config.coverage_floor = value;
    }
    if let Ok(raw) = std::env::var("COMPLETE_FAIL_CLOSED") {
        config.complete_fail_closed = raw == "true" || raw == "1";
    }
}

/// Reads and parses an environment variable, discarding malformed values.
fn parsed_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|raw| raw.parse().ok())
}

// ============================================================================
// SECTION: Validate
// ============================================================================

/// Validates a fully-assembled configuration.
///
/// # Errors
///
/// Returns [`ConfigError::MissingSignatureSecret`] when the signing secret is
/// empty, [`ConfigError::MissingOntologyEndpoint`] when the ontology URL is
/// absent, and [`ConfigError::InvalidCoverageFloor`] when the coverage floor
/// falls outside `[0.0, 1.0]`.
pub fn validate(config: &GateConfig) -> Result<(), ConfigError> {
    if config.signer.secret.is_empty() {
        return Err(ConfigError::MissingSignatureSecret);
    }
    if config.ontology.url.is_none() {
        return Err(ConfigError::MissingOntologyEndpoint);
    }
    if !(0.0..=1.0).contains(&config.coverage_floor) {
        return Err(ConfigError::InvalidCoverageFloor(config.coverage_floor));
    }
    Ok(())
}
