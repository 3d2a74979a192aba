// crates/gate-ledger/src/lib.rs
// ============================================================================
// Module: Gate Ledger
// Description: Append-only SQLite audit trail for signed verdicts.
// Purpose: Implement gate-core's AuditLedger trait with a write path sized
//          for one row per gate decision.
// Dependencies: async-trait, gate-core, rusqlite, serde_json, time, tokio
// ============================================================================

//! ## Overview
//! See [`store::SqliteAuditLedger`] for the write path and the read-only
//! analytical query methods (not part of the `AuditLedger` trait contract).

// ============================================================================
// SECTION: Modules
// ============================================================================

mod schema;
mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::SqliteAuditLedger;
