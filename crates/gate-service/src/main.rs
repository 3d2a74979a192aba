// crates/gate-service/src/main.rs
// ============================================================================
// Module: Gate Service
// Description: HTTP binary exposing the Validation Gate over POST /validate
//              and GET /health.
// Purpose: Wire the configuration loader into the orchestrator's concrete
//          collaborators and serve the one-operation API spec.md §6 names.
// Dependencies: axum, gate, gate-config, gate-core, gate-ledger,
//               gate-ontology, gate-signer, gate-validators, tokio
// ============================================================================

//! ## Overview
//! This binary owns nothing but wiring: it loads [`gate_config::GateConfig`],
//! builds the in-process ontology client, HMAC signer, SQLite ledger, and
//! built-in validator registry, composes them into a [`gate::ValidationGate`],
//! and serves it behind `axum`. There is no networked `OntologyClient`
//! implementation in this workspace, so `ontology.url`/`user`/`password` are
//! accepted by the config loader (per spec.md §6) but presently unused here;
//! a real deployment would swap [`gate_ontology::InProcessOntologyClient`]
//! for a networked client behind the same trait without touching this file's
//! shape.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod routes;
mod state;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::process::ExitCode;
use std::sync::Arc;

use gate::GateTimeouts;
use gate::ValidationGate;
use gate_config::GateConfig;
use gate_config::TimeoutsConfig;
use gate_ledger::SqliteAuditLedger;
use gate_ontology::InProcessOntologyClient;
use gate_signer::HmacSigner;
use gate_validators::ValidatorRegistry;

use crate::state::AppState;

/// Default bind address when `GATE_SERVICE_ADDR` is unset.
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";

// ============================================================================
// SECTION: Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(_error) => ExitCode::FAILURE,
    }
}

/// Builds the gate and serves it until the process receives a shutdown signal.
async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_path = std::env::var("GATE_CONFIG_PATH").ok();
    let config = gate_config::load(config_path.as_deref().map(std::path::Path::new))?;

    let (gate, ontology) = build_gate(&config)?;
    let state = AppState { ontology, gate: Arc::new(gate), complete_fail_closed: config.complete_fail_closed };

    let addr = std::env::var("GATE_SERVICE_ADDR").unwrap_or_else(|_error| DEFAULT_BIND_ADDR.to_owned());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let router = routes::router(state);

    axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;
    Ok(())
}

/// Composes the configured collaborators into a [`ValidationGate`], and
/// returns the ontology client alongside it so `GET /health` can probe the
/// same instance the pipeline itself uses.
///
/// The ontology client is always [`InProcessOntologyClient::builtin`]: this
/// workspace has no networked `OntologyClient` implementation, so
/// `config.ontology` is accepted for configuration-surface completeness but
/// not yet consulted.
fn build_gate(
    config: &GateConfig,
) -> Result<(ValidationGate, Arc<dyn gate_core::OntologyClient>), Box<dyn std::error::Error>> {
    let ontology: Arc<dyn gate_core::OntologyClient> = Arc::new(InProcessOntologyClient::builtin());
    let signer = Arc::new(HmacSigner::new(config.signer.secret.as_bytes().to_vec())?);
    let ledger: Arc<dyn gate_core::AuditLedger> = match &config.ledger.url {
        Some(path) => Arc::new(SqliteAuditLedger::open(path)?),
        None => Arc::new(SqliteAuditLedger::open_in_memory()?),
    };
    let registry = ValidatorRegistry::builtin();

    let gate = ValidationGate::new(Arc::clone(&ontology), registry, signer, ledger)
        .with_timeouts(timeouts_from_config(config.timeouts))
        .with_coverage_floor(config.coverage_floor);
    Ok((gate, ontology))
}

/// Translates the config crate's `TimeoutsConfig` into the orchestrator's
/// own `GateTimeouts`, keeping the `gate` crate decoupled from `gate-config`.
const fn timeouts_from_config(timeouts: TimeoutsConfig) -> GateTimeouts {
    GateTimeouts {
        t_total_ms: timeouts.t_total_ms,
        t_sem_ms: timeouts.t_sem_ms,
        t_val_ms: timeouts.t_val_ms,
        t_persist_ms: timeouts.t_persist_ms,
        t_cache_ms: timeouts.t_cache_ms,
    }
}

/// Resolves once the process receives `SIGINT` (or, on Unix, `SIGTERM`).
async fn shutdown_signal() {
    let ctrl_c = async {
        let _ignored = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        let Ok(mut signal) =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
        else {
            return;
        };
        let _ignored = signal.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
