// crates/gate-ledger/src/schema.rs
// ============================================================================
// Module: Ledger Schema
// Description: DDL and pragmas for the append-only verdict table.
// Purpose: Keep the wire-stable row shape in one place, separate from the
//          connection and write-path machinery.
// Dependencies: rusqlite
// ============================================================================

//! ## Overview
//! `id` is a rowid-aliased `INTEGER PRIMARY KEY AUTOINCREMENT` rather than a
//! literal composite `(timestamp, id)` primary key, because SQLite only
//! autoincrements a lone `INTEGER PRIMARY KEY`. A covering index on
//! `(timestamp_ms, id)` still gives the ordering guarantee the ledger
//! contract requires; `id` alone is already monotonic.

use rusqlite::Connection;

/// Creates the ledger table and its ordering index if absent.
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS ledger_rows (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            timestamp_ms INTEGER NOT NULL,
            trace_id TEXT NOT NULL,
            decision TEXT NOT NULL,
            reason TEXT NOT NULL,
            agent_id TEXT,
            maturity_level INTEGER NOT NULL,
            action_verb TEXT NOT NULL,
            action_resource TEXT NOT NULL,
            action_domain TEXT NOT NULL,
            action_parameters TEXT NOT NULL,
            semantic_ontology_match INTEGER NOT NULL,
            semantic_maturity_authorized INTEGER NOT NULL,
            semantic_coverage REAL NOT NULL,
            validator_results TEXT NOT NULL,
            total_latency_ms REAL NOT NULL,
            certifiable INTEGER NOT NULL,
            signature TEXT,
            metadata TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_ledger_rows_timestamp ON ledger_rows(timestamp_ms, id);",
    )
}

/// Applies the pragmas the ledger relies on: WAL journaling so one writer
/// does not block concurrent readers, and a busy timeout so a momentarily
/// contended writer waits instead of failing immediately.
pub fn configure_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.pragma_update_and_check(None, "journal_mode", "WAL", |_row| Ok(()))?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;
    conn.busy_timeout(std::time::Duration::from_millis(1_000))
}
