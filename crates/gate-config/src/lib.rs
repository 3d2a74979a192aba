// crates/gate-config/src/lib.rs
// ============================================================================
// Module: Gate Config
// Description: Configuration model, TOML/env loading cascade, and validation.
// Purpose: Give gate-service a single validated GateConfig to build the
//          orchestrator and its collaborators from.
// Dependencies: serde, thiserror, toml
// ============================================================================

//! ## Overview
//! Loading is explicitly out of the Validation Gate orchestrator's own
//! contract (`spec.md` §1 lists "configuration loading" as an external
//! collaborator concern); this crate is that collaborator.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod error;
mod load;
mod model;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use error::ConfigError;
pub use load::load;
pub use load::validate;
pub use model::GateConfig;
pub use model::LedgerConfig;
pub use model::OntologyConfig;
pub use model::SignerConfig;
pub use model::TimeoutsConfig;
pub use model::DEFAULT_COVERAGE_FLOOR;
pub use model::DEFAULT_T_CACHE_MS;
pub use model::DEFAULT_T_PERSIST_MS;
pub use model::DEFAULT_T_SEM_MS;
pub use model::DEFAULT_T_TOTAL_MS;
pub use model::DEFAULT_T_VAL_MS;
