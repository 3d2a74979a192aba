// crates/gate-validators/src/params.rs
// ============================================================================
// Module: Validator Parameter Extraction
// Description: Typed accessors over an action's opaque parameter map.
// Purpose: Give every validator a uniform, fallible way to read its inputs.
// Dependencies: bigdecimal, serde_json, gate-core
// ============================================================================

//! ## Overview
//! Validators receive an [`gate_core::ActionPrimitive`] whose `parameters`
//! field is an opaque `serde_json::Value` map. This module centralizes
//! extraction so every validator reports missing or malformed parameters the
//! same way, via `None`, letting the caller decide between `Escalate
//! INSUFFICIENT_CONTEXT` and a hard failure.

// ============================================================================
// SECTION: Imports
// ============================================================================

use bigdecimal::BigDecimal;
use gate_core::ActionPrimitive;

// ============================================================================
// SECTION: Accessors
// ============================================================================

/// Reads a floating-point parameter.
#[must_use]
pub fn get_f64(action: &ActionPrimitive, key: &str) -> Option<f64> {
    action.parameter(key).and_then(serde_json::Value::as_f64)
}

/// Reads a boolean parameter, defaulting to `false` when absent.
#[must_use]
pub fn get_bool_or(action: &ActionPrimitive, key: &str, default: bool) -> bool {
    action.parameter(key).and_then(serde_json::Value::as_bool).unwrap_or(default)
}

/// Reads a string parameter.
#[must_use]
pub fn get_str<'a>(action: &'a ActionPrimitive, key: &str) -> Option<&'a str> {
    action.parameter(key).and_then(serde_json::Value::as_str)
}

/// Reads a monetary/decimal parameter without floating-point imprecision.
///
/// Accepts either a JSON number or a JSON string encoding a decimal.
#[must_use]
pub fn get_decimal(action: &ActionPrimitive, key: &str) -> Option<BigDecimal> {
    let value = action.parameter(key)?;
    if let Some(text) = value.as_str() {
        return text.parse::<BigDecimal>().ok();
    }
    if let Some(number) = value.as_f64() {
        return BigDecimal::try_from(number).ok();
    }
    None
}
