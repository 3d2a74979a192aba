// crates/gate-validators/src/lib.rs
// ============================================================================
// Module: Gate Validators
// Description: Built-in deterministic domain validators and their registry.
// Purpose: Provide the fixed set of regulatory rule checks the orchestrator
//          dispatches per (domain, verb) pair.
// Dependencies: gate-core, bigdecimal, serde_json
// ============================================================================

//! ## Overview
//! Each validator is a zero-sized type implementing [`gate_core::Validator`],
//! pure and synchronous by contract. [`registry::ValidatorRegistry`] wires
//! them to `(domain, verb)` pairs at startup.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod aml_threshold;
mod airspace;
mod crew_rest;
mod fuel_reserve;
mod params;
mod registry;
mod sca;

#[cfg(test)]
mod tests_support;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use aml_threshold::AmlThresholdValidator;
pub use airspace::AirspaceValidator;
pub use crew_rest::CrewRestValidator;
pub use fuel_reserve::FuelReserveValidator;
pub use registry::ValidatorRegistry;
pub use sca::ScaValidator;
