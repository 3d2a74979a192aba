// crates/gate-config/src/error.rs
// ============================================================================
// Module: Config Errors
// Description: Errors raised while loading or validating gate configuration.
// Purpose: Distinguish a malformed file from the two fatal-at-startup cases
//          spec.md calls out: a missing signing secret, a missing ontology
//          endpoint.
// Dependencies: thiserror
// ============================================================================

use thiserror::Error;

/// Errors raised while loading or validating [`crate::GateConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read from disk.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// Path that could not be read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The configuration file's contents were not valid TOML.
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        /// Path that failed to parse.
        path: String,
        /// Underlying TOML error.
        #[source]
        source: toml::de::Error,
    },
    /// `SIGNATURE_SECRET` was empty or absent; startup must refuse to proceed.
    #[error("SIGNATURE_SECRET is required and must be non-empty")]
    MissingSignatureSecret,
    /// `ONTOLOGY_URL` was empty or absent; startup must refuse to proceed.
    #[error("ONTOLOGY_URL is required and must be non-empty")]
    MissingOntologyEndpoint,
    /// `COVERAGE_FLOOR` was outside the valid `[0.0, 1.0]` range.
    #[error("COVERAGE_FLOOR must be within [0.0, 1.0], got {0}")]
    InvalidCoverageFloor(f64),
}
