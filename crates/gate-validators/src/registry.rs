// crates/gate-validators/src/registry.rs
// ============================================================================
// Module: Validator Registry
// Description: Static (domain, verb) -> validator-chain lookup table.
// Purpose: Give the orchestrator a fixed, startup-built dispatch table; no
//          runtime plugin discovery.
// Dependencies: gate-core
// ============================================================================

//! ## Overview
//! The registry is built once, at process startup, from a fixed list of
//! validators per `(domain, verb)` pair. Validator order within a chain is
//! the order [`ValidatorRegistry::builtin`] lists them in, and is the order
//! [`gate_core::aggregate::aggregate`] uses to break ties between multiple
//! denying or escalating validators.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use gate_core::Domain;
use gate_core::Validator;
use gate_core::Verb;

use crate::airspace::AirspaceValidator;
use crate::aml_threshold::AmlThresholdValidator;
use crate::crew_rest::CrewRestValidator;
use crate::fuel_reserve::FuelReserveValidator;
use crate::sca::ScaValidator;

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Fixed `(domain, verb)` to validator-chain dispatch table.
///
/// # Invariants
/// - Built once at startup; never mutated afterward.
/// - Chains are looked up by exact `(domain, verb)` match; there is no
///   wildcard or fallback chain.
#[derive(Clone)]
pub struct ValidatorRegistry {
    chains: BTreeMap<(Domain, Verb), Vec<Arc<dyn Validator>>>,
}

impl ValidatorRegistry {
    /// Builds an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { chains: BTreeMap::new() }
    }

    /// Registers a validator chain for `(domain, verb)`, replacing any prior
    /// chain for the same pair.
    #[must_use]
    pub fn register(mut self, domain: Domain, verb: Verb, chain: Vec<Arc<dyn Validator>>) -> Self {
        self.chains.insert((domain, verb), chain);
        self
    }

    /// Returns the validator chain registered for `(domain, verb)`, if any.
    #[must_use]
    pub fn chain_for(&self, domain: &Domain, verb: &Verb) -> Option<&[Arc<dyn Validator>]> {
        self.chains.get(&(domain.clone(), verb.clone())).map(Vec::as_slice)
    }

    /// Builds the registry covering the built-in aviation and fintech rules.
    #[must_use]
    pub fn builtin() -> Self {
        let aviation_chain: Vec<Arc<dyn Validator>> = vec![
            Arc::new(FuelReserveValidator),
            Arc::new(CrewRestValidator),
            Arc::new(AirspaceValidator),
        ];
        let fintech_chain: Vec<Arc<dyn Validator>> =
            vec![Arc::new(ScaValidator), Arc::new(AmlThresholdValidator)];

        Self::new()
            .register(Domain::new("aviation"), Verb::new("reroute_flight"), aviation_chain.clone())
            .register(Domain::new("aviation"), Verb::new("file_flight_plan"), aviation_chain)
            .register(
                Domain::new("fintech"),
                Verb::new("initiate_payment"),
                fintech_chain.clone(),
            )
            .register(Domain::new("fintech"), Verb::new("authorize_transfer"), fintech_chain)
    }
}

impl Default for ValidatorRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registry_resolves_known_pairs() {
        let registry = ValidatorRegistry::builtin();
        let chain = registry
            .chain_for(&Domain::new("aviation"), &Verb::new("reroute_flight"))
            .expect("aviation reroute_flight chain registered");
        assert_eq!(chain.len(), 3);
    }

    #[test]
    fn unknown_pair_returns_none() {
        let registry = ValidatorRegistry::builtin();
        assert!(registry.chain_for(&Domain::new("healthcare"), &Verb::new("prescribe")).is_none());
    }
}
