// crates/gate-ledger/src/store.rs
// ============================================================================
// Module: SQLite Audit Ledger
// Description: Single-writer, WAL-mode append-only store for signed verdicts.
// Purpose: Implement the AuditLedger contract with a write path sized for
//          one row per gate decision, not bulk batching.
// Dependencies: async-trait, gate-core, rusqlite, serde_json, time, tokio
// ============================================================================

//! ## Overview
//! One row per [`Verdict`] is written under a `std::sync::Mutex<Connection>`
//! and relayed through `tokio::task::spawn_blocking`, since `rusqlite` is
//! synchronous. A request here is a single `INSERT`, not a batch, so there is
//! no writer queue or histogram: that machinery pays for itself only at
//! higher write volumes than one row per gate decision. A small pool of
//! read-only connections serves the analytical query path so reads never
//! contend with the writer's lock.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use async_trait::async_trait;
use gate_core::AuditLedger;
use gate_core::Decision;
use gate_core::LedgerError;
use gate_core::Verdict;
use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::params;

use crate::schema;

/// Number of read-only connections kept in the analytical-query pool.
const READ_POOL_SIZE: usize = 4;

// ============================================================================
// SECTION: Store
// ============================================================================

/// SQLite-backed [`AuditLedger`].
///
/// # Invariants
/// - `append` only ever issues `INSERT` statements; no `UPDATE`/`DELETE`.
/// - The writer connection is serialized behind a blocking mutex; readers use
///   a separate round-robin pool and never block on the writer.
pub struct SqliteAuditLedger {
    /// Single writer connection, WAL mode.
    writer: Arc<Mutex<Connection>>,
    /// Read-only connection pool for analytical queries.
    readers: Vec<Arc<Mutex<Connection>>>,
    /// Round-robin cursor into `readers`.
    next_reader: AtomicUsize,
}

impl SqliteAuditLedger {
    /// Opens (creating if absent) a ledger database at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Io`] when the database file cannot be opened or
    /// the schema cannot be created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LedgerError> {
        let path = path.as_ref();
        let writer = Connection::open(path).map_err(|error| LedgerError::Io(error.to_string()))?;
        schema::configure_connection(&writer).map_err(|error| LedgerError::Io(error.to_string()))?;
        schema::ensure_schema(&writer).map_err(|error| LedgerError::Io(error.to_string()))?;

        let mut readers = Vec::with_capacity(READ_POOL_SIZE);
        for _ in 0..READ_POOL_SIZE {
            let reader = Connection::open_with_flags(
                path,
                OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )
            .map_err(|error| LedgerError::Io(error.to_string()))?;
            readers.push(Arc::new(Mutex::new(reader)));
        }

        Ok(Self { writer: Arc::new(Mutex::new(writer)), readers, next_reader: AtomicUsize::new(0) })
    }

    /// Opens an in-memory ledger, for tests.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Io`] when the in-memory database cannot be
    /// initialized.
    pub fn open_in_memory() -> Result<Self, LedgerError> {
        let writer =
            Connection::open_in_memory().map_err(|error| LedgerError::Io(error.to_string()))?;
        schema::ensure_schema(&writer).map_err(|error| LedgerError::Io(error.to_string()))?;
        Ok(Self { writer: Arc::new(Mutex::new(writer)), readers: Vec::new(), next_reader: AtomicUsize::new(0) })
    }

    /// Returns the next reader connection in round-robin order, falling back
    /// to the writer connection when no read pool was configured (in-memory
    /// ledgers used only in tests).
    fn next_reader(&self) -> Arc<Mutex<Connection>> {
        if self.readers.is_empty() {
            return Arc::clone(&self.writer);
        }
        let index = self.next_reader.fetch_add(1, Ordering::Relaxed) % self.readers.len();
        Arc::clone(&self.readers[index])
    }

    /// Returns the total number of rows matching `decision`.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Store`] when the query fails.
    pub async fn count_by_decision(&self, decision: Decision) -> Result<i64, LedgerError> {
        let reader = self.next_reader();
        let label = decision_label(decision);
        tokio::task::spawn_blocking(move || {
            let conn = reader.lock().map_err(|_| poison_error())?;
            conn.query_row(
                "SELECT COUNT(*) FROM ledger_rows WHERE decision = ?1",
                params![label],
                |row| row.get(0),
            )
            .map_err(|error| LedgerError::Store(error.to_string()))
        })
        .await
        .map_err(|error| LedgerError::Store(error.to_string()))?
    }

    /// Returns the fraction of rows with `decision = DENY` out of all rows,
    /// or `0.0` if the ledger is empty.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Store`] when the query fails.
    pub async fn deny_rate(&self) -> Result<f64, LedgerError> {
        let reader = self.next_reader();
        tokio::task::spawn_blocking(move || {
            let conn = reader.lock().map_err(|_| poison_error())?;
            let total: i64 = conn
                .query_row("SELECT COUNT(*) FROM ledger_rows", [], |row| row.get(0))
                .map_err(|error| LedgerError::Store(error.to_string()))?;
            if total == 0 {
                return Ok(0.0);
            }
            let denied: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM ledger_rows WHERE decision = 'deny'",
                    [],
                    |row| row.get(0),
                )
                .map_err(|error| LedgerError::Store(error.to_string()))?;
            #[allow(clippy::cast_precision_loss, reason = "row counts fit comfortably in f64")]
            let rate = denied as f64 / total as f64;
            Ok(rate)
        })
        .await
        .map_err(|error| LedgerError::Store(error.to_string()))?
    }

    /// Returns the average `total_latency_ms` across all rows, or `0.0` if
    /// the ledger is empty.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::Store`] when the query fails.
    pub async fn average_latency_ms(&self) -> Result<f64, LedgerError> {
        let reader = self.next_reader();
        tokio::task::spawn_blocking(move || {
            let conn = reader.lock().map_err(|_| poison_error())?;
            conn.query_row(
                "SELECT COALESCE(AVG(total_latency_ms), 0.0) FROM ledger_rows",
                [],
                |row| row.get(0),
            )
            .map_err(|error| LedgerError::Store(error.to_string()))
        })
        .await
        .map_err(|error| LedgerError::Store(error.to_string()))?
    }
}

#[async_trait]
impl AuditLedger for SqliteAuditLedger {
    async fn append(&self, verdict: &Verdict) -> Result<(), LedgerError> {
        let writer = Arc::clone(&self.writer);
        let row = LedgerRow::from_verdict(verdict)?;
        tokio::task::spawn_blocking(move || {
            let conn = writer.lock().map_err(|_| poison_error())?;
            conn.execute(
                "INSERT INTO ledger_rows (
                    timestamp_ms, trace_id, decision, reason, agent_id, maturity_level,
                    action_verb, action_resource, action_domain, action_parameters,
                    semantic_ontology_match, semantic_maturity_authorized, semantic_coverage,
                    validator_results, total_latency_ms, certifiable, signature, metadata
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)",
                params![
                    row.timestamp_ms,
                    row.trace_id,
                    row.decision,
                    row.reason,
                    row.agent_id,
                    row.maturity_level,
                    row.action_verb,
                    row.action_resource,
                    row.action_domain,
                    row.action_parameters,
                    row.semantic_ontology_match,
                    row.semantic_maturity_authorized,
                    row.semantic_coverage,
                    row.validator_results,
                    row.total_latency_ms,
                    row.certifiable,
                    row.signature,
                    row.metadata,
                ],
            )
            .map(|_rows_affected| ())
            .map_err(|error| LedgerError::Store(error.to_string()))
        })
        .await
        .map_err(|error| LedgerError::Store(error.to_string()))?
    }
}

/// Returns a [`LedgerError`] for a poisoned mutex; a writer or reader thread
/// panicking mid-transaction must not be silently ignored.
fn poison_error() -> LedgerError {
    LedgerError::Store("ledger connection mutex poisoned".to_string())
}

/// Returns the lowercase wire label for a [`Decision`], matching the
/// `#[serde(rename_all = "snake_case")]` representation used elsewhere.
fn decision_label(decision: Decision) -> &'static str {
    match decision {
        Decision::Allow => "allow",
        Decision::Deny => "deny",
        Decision::Escalate => "escalate",
    }
}

// ============================================================================
// SECTION: Row Mapping
// ============================================================================

/// Flattened row representation ready for parameter binding.
struct LedgerRow {
    /// Unix-millisecond emission timestamp.
    timestamp_ms: i64,
    /// Caller trace identifier.
    trace_id: String,
    /// Final decision, lowercase.
    decision: &'static str,
    /// Final reason string.
    reason: String,
    /// Agent identifier, if known.
    agent_id: Option<String>,
    /// Agent maturity level.
    maturity_level: i64,
    /// Action verb.
    action_verb: String,
    /// Action resource.
    action_resource: String,
    /// Action domain.
    action_domain: String,
    /// Action parameters, JSON-encoded.
    action_parameters: String,
    /// Semantic ontology match flag.
    semantic_ontology_match: bool,
    /// Semantic maturity-authorized flag.
    semantic_maturity_authorized: bool,
    /// Semantic coverage fraction.
    semantic_coverage: f64,
    /// Validator results, JSON-encoded.
    validator_results: String,
    /// Total governance latency, in milliseconds.
    total_latency_ms: f64,
    /// Whether the verdict is certifiable.
    certifiable: bool,
    /// Hex-encoded signature, empty when signing failed.
    signature: Option<String>,
    /// Reserved metadata column; unused by the default gate.
    metadata: Option<String>,
}

impl LedgerRow {
    /// Builds a row from a [`Verdict`], JSON-encoding the nested fields.
    fn from_verdict(verdict: &Verdict) -> Result<Self, LedgerError> {
        let action_parameters = serde_json::to_string(&verdict.action.parameters)
            .map_err(|error| LedgerError::Store(error.to_string()))?;
        let validator_results = serde_json::to_string(&verdict.validator_results)
            .map_err(|error| LedgerError::Store(error.to_string()))?;

        #[allow(clippy::cast_precision_loss, reason = "latency values fit comfortably in f64")]
        let total_latency_ms = verdict.governance_latency_ms as f64;

        Ok(Self {
            timestamp_ms: verdict.emitted_at,
            trace_id: verdict.trace_id.as_str().to_string(),
            decision: decision_label(verdict.decision),
            reason: verdict.reason.clone(),
            agent_id: verdict.agent_id.as_ref().map(|id| id.as_str().to_string()),
            maturity_level: i64::from(verdict.agent_maturity.get()),
            action_verb: verdict.action.verb.as_str().to_string(),
            action_resource: verdict.action.resource.clone(),
            action_domain: verdict.action.domain.as_str().to_string(),
            action_parameters,
            semantic_ontology_match: verdict.semantic.ontology_match,
            semantic_maturity_authorized: verdict.semantic.maturity_authorized,
            semantic_coverage: verdict.semantic.coverage,
            validator_results,
            total_latency_ms,
            certifiable: verdict.certifiable,
            signature: if verdict.signature.is_empty() { None } else { Some(verdict.signature.clone()) },
            metadata: None,
        })
    }
}
