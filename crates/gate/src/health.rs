// crates/gate/src/health.rs
// ============================================================================
// Module: Health Cache
// Description: Cached ontology liveness probe.
// Purpose: Amortize the cost of probing ontology health across requests, per
//          spec.md §4.1 stage 1 (cached for T_cache, default 30 s).
// Dependencies: tokio
// ============================================================================

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;
use std::time::Instant;

use gate_core::OntologyClient;
use tokio::sync::Mutex;

// ============================================================================
// SECTION: Health Cache
// ============================================================================

/// Caches the ontology client's liveness result for `ttl`.
///
/// # Invariants
/// - A fresh probe is only issued once the cached result is older than `ttl`;
///   concurrent callers during that window observe the same cached value.
pub struct HealthCache {
    state: Mutex<Option<(bool, Instant)>>,
}

impl HealthCache {
    /// Builds an empty cache; the first `probe` call always queries live.
    #[must_use]
    pub fn new() -> Self {
        Self { state: Mutex::new(None) }
    }

    /// Returns the cached liveness result, refreshing it if older than
    /// `ttl_ms`.
    pub async fn probe(&self, client: &dyn OntologyClient, ttl_ms: u64) -> bool {
        let ttl = Duration::from_millis(ttl_ms);
        let mut state = self.state.lock().await;
        if let Some((healthy, observed_at)) = *state {
            if observed_at.elapsed() < ttl {
                return healthy;
            }
        }
        let healthy = client.ping().await;
        *state = Some((healthy, Instant::now()));
        healthy
    }
}

impl Default for HealthCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, reason = "Unit tests use expect for setup clarity.")]
mod tests {
    use std::sync::atomic::AtomicBool;
    use std::sync::atomic::Ordering;

    use async_trait::async_trait;
    use gate_core::ActionPrimitive;
    use gate_core::AgentContext;
    use gate_core::MaturityLevel;
    use gate_core::OntologyError;
    use gate_core::SemanticVerdict;

    use super::*;

    struct CountingClient {
        healthy: AtomicBool,
        calls: AtomicBool,
    }

    #[async_trait]
    impl OntologyClient for CountingClient {
        async fn validate_semantic_authority(
            &self,
            _action: &ActionPrimitive,
            _maturity_level: MaturityLevel,
        ) -> Result<SemanticVerdict, OntologyError> {
            unreachable!("health cache tests do not exercise semantic checks")
        }

        async fn ping(&self) -> bool {
            self.calls.store(true, Ordering::SeqCst);
            self.healthy.load(Ordering::SeqCst)
        }
    }

    #[tokio::test]
    async fn caches_result_within_ttl() {
        let client = CountingClient { healthy: AtomicBool::new(true), calls: AtomicBool::new(false) };
        let cache = HealthCache::new();
        assert!(cache.probe(&client, 30_000).await);
        client.calls.store(false, Ordering::SeqCst);
        client.healthy.store(false, Ordering::SeqCst);
        // still within ttl: cached `true` is returned, live client is not re-queried.
        assert!(cache.probe(&client, 30_000).await);
        assert!(!client.calls.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn refreshes_after_ttl_expires() {
        let client = CountingClient { healthy: AtomicBool::new(true), calls: AtomicBool::new(false) };
        let cache = HealthCache::new();
        assert!(cache.probe(&client, 0).await);
        client.healthy.store(false, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert!(!cache.probe(&client, 0).await);
    }
}
