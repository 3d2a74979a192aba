// crates/gate-core/src/lib.rs
// ============================================================================
// Module: Gate Core
// Description: Data model, canonical hashing, and collaborator traits shared
//              by every Validation Gate crate.
// Purpose: Give the orchestrator, validators, and storage crates one vocabulary.
// Dependencies: serde, serde_json, serde_jcs, sha2, thiserror, async-trait
// ============================================================================

//! ## Overview
//! This crate defines the action/verdict data model, the identifier newtypes,
//! the canonical-JSON hashing helpers used by the signer, the conservative-veto
//! aggregator, and the trait boundaries (`OntologyClient`, `Validator`,
//! `Signer`, `AuditLedger`) that the orchestrator crate composes. It has no
//! I/O of its own.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod aggregate;
pub mod hashing;
pub mod identifiers;
pub mod interfaces;
pub mod model;
pub mod telemetry;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use aggregate::aggregate;
pub use identifiers::AgentId;
pub use identifiers::Domain;
pub use identifiers::MaturityLevel;
pub use identifiers::RuleId;
pub use identifiers::TraceId;
pub use identifiers::ValidatorName;
pub use identifiers::Verb;
pub use interfaces::AuditLedger;
pub use interfaces::LedgerError;
pub use interfaces::OntologyClient;
pub use interfaces::OntologyError;
pub use interfaces::Signer;
pub use interfaces::SignerError;
pub use interfaces::Validator;
pub use model::ActionPrimitive;
pub use model::AgentContext;
pub use model::ComponentTimings;
pub use model::Decision;
pub use model::SemanticVerdict;
pub use model::ValidatorVerdict;
pub use model::Verdict;
