// crates/gate-core/src/identifiers.rs
// ============================================================================
// Module: Gate Identifiers
// Description: Opaque newtype identifiers shared across Validation Gate crates.
// Purpose: Prevent accidental mixing of domain/verb/trace/agent strings.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Every identifier that crosses a crate boundary is a distinct newtype rather
//! than a bare `String`, so a `Verb` cannot be passed where a `Domain` is
//! expected. All identifiers serialize as plain strings on the wire via
//! `#[serde(transparent)]`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Macro
// ============================================================================

macro_rules! string_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Builds a new identifier from any string-like value.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self::new(value)
            }
        }
    };
}

string_identifier!(
    /// Caller-supplied unique request identifier.
    ///
    /// # Invariants
    /// - Unique per inbound action, per `spec.md` §3.
    TraceId
);

string_identifier!(
    /// Opaque identifier of the agent that proposed the action.
    AgentId
);

string_identifier!(
    /// Regulated domain an action belongs to (e.g. `aviation`, `fintech`).
    Domain
);

string_identifier!(
    /// Verb of a proposed action (e.g. `reroute_flight`).
    Verb
);

string_identifier!(
    /// Static validator identity, stable across process restarts.
    ValidatorName
);

string_identifier!(
    /// Regulatory citation attached to a validator's verdict (e.g. `FAA 14 CFR §91.151`).
    RuleId
);

// ============================================================================
// SECTION: Maturity Level
// ============================================================================

/// Agent maturity level, 1 (least autonomous) through 5 (most autonomous).
///
/// # Invariants
/// - Always within `1..=5`; construction outside that range is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct MaturityLevel(u8);

/// Lowest valid maturity level.
const MIN_MATURITY_LEVEL: u8 = 1;
/// Highest valid maturity level.
const MAX_MATURITY_LEVEL: u8 = 5;

impl MaturityLevel {
    /// Builds a maturity level, rejecting values outside `1..=5`.
    ///
    /// # Errors
    ///
    /// Returns an error describing the out-of-range value.
    pub fn new(value: u8) -> Result<Self, MaturityLevelError> {
        if (MIN_MATURITY_LEVEL ..= MAX_MATURITY_LEVEL).contains(&value) {
            Ok(Self(value))
        } else {
            Err(MaturityLevelError::OutOfRange(value))
        }
    }

    /// Returns the raw level value.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for MaturityLevel {
    type Error = MaturityLevelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<MaturityLevel> for u8 {
    fn from(value: MaturityLevel) -> Self {
        value.0
    }
}

impl fmt::Display for MaturityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// Error returned when a maturity level is out of the valid `1..=5` range.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MaturityLevelError {
    /// Supplied level is outside `1..=5`.
    #[error("maturity level {0} is out of range (expected 1..=5)")]
    OutOfRange(u8),
}
