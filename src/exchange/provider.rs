//! Lazily-initialised upstream client handles.
//!
//! A `ClientProvider` owns a connector (build the client and ping it) and the
//! cached handle it produced. The slot is guarded by an async mutex held for
//! the whole connect, so concurrent requests never initialise the same
//! upstream twice; late arrivals wait and reuse the fresh handle.

use futures_util::future::{self, BoxFuture};
use futures_util::FutureExt;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use super::traits::Upstream;
use crate::market::MarketDataError;

/// Builds a connected client, or fails if the upstream is unreachable.
pub type Connector<T> = Box<dyn Fn() -> BoxFuture<'static, anyhow::Result<Arc<T>>> + Send + Sync>;

/// When a provider is allowed to (re)connect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconnectPolicy {
    /// Connect once; a failed first attempt leaves the upstream unavailable.
    Never,
    /// Connect on demand while no handle exists.
    #[default]
    OnDemand,
    /// As `OnDemand`, and also drop the handle after a failed upstream call.
    OnError,
}

/// Shared, lazily-connected handle to an upstream client.
pub struct ClientProvider<T: ?Sized> {
    upstream: Upstream,
    policy: ReconnectPolicy,
    connector: Connector<T>,
    slot: Mutex<Option<Arc<T>>>,
    /// Mirrors `slot.is_some()`; only written while the slot is locked.
    cached: AtomicBool,
    attempted: AtomicBool,
}

impl<T: ?Sized + Send + Sync> ClientProvider<T> {
    pub fn new(upstream: Upstream, policy: ReconnectPolicy, connector: Connector<T>) -> Self {
        Self {
            upstream,
            policy,
            connector,
            slot: Mutex::new(None),
            cached: AtomicBool::new(false),
            attempted: AtomicBool::new(false),
        }
    }

    /// Provider around an already-built client.
    pub fn ready(upstream: Upstream, client: Arc<T>) -> Self
    where
        T: 'static,
    {
        let cached = Arc::clone(&client);
        Self {
            upstream,
            policy: ReconnectPolicy::OnDemand,
            connector: Box::new(move || {
                future::ready(Ok::<_, anyhow::Error>(Arc::clone(&cached))).boxed()
            }),
            slot: Mutex::new(Some(client)),
            cached: AtomicBool::new(true),
            attempted: AtomicBool::new(true),
        }
    }

    pub fn upstream(&self) -> Upstream {
        self.upstream
    }

    /// Return the cached client, connecting first if there is none.
    pub async fn get(&self) -> Result<Arc<T>, MarketDataError> {
        let mut slot = self.slot.lock().await;
        if let Some(client) = slot.as_ref() {
            return Ok(Arc::clone(client));
        }

        if self.policy == ReconnectPolicy::Never && self.attempted.load(Ordering::SeqCst) {
            return Err(MarketDataError::UpstreamUnavailable {
                source_name: self.upstream.name(),
                reason: "initial connection failed and reconnects are disabled".to_string(),
            });
        }
        self.attempted.store(true, Ordering::SeqCst);

        match (self.connector)().await {
            Ok(client) => {
                info!(upstream = %self.upstream, "Upstream client initialized");
                *slot = Some(Arc::clone(&client));
                self.cached.store(true, Ordering::SeqCst);
                Ok(client)
            }
            Err(e) => {
                error!(upstream = %self.upstream, "Failed to initialize upstream client: {:#}", e);
                Err(MarketDataError::UpstreamUnavailable {
                    source_name: self.upstream.name(),
                    reason: format!("{:#}", e),
                })
            }
        }
    }

    /// Connect eagerly at startup. Failure is logged; requests retry per policy.
    pub async fn warm_up(&self) -> bool {
        self.get().await.is_ok()
    }

    /// Record a failed call made through the current handle.
    pub async fn report_failure(&self) {
        if self.policy != ReconnectPolicy::OnError {
            return;
        }

        let mut slot = self.slot.lock().await;
        if slot.take().is_some() {
            self.cached.store(false, Ordering::SeqCst);
            warn!(upstream = %self.upstream, "Dropping upstream client after failed call");
        }
    }

    /// Whether a connected handle is cached. Never waits on the slot lock.
    pub fn is_ready(&self) -> bool {
        self.cached.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    struct Dummy;

    /// Connector that fails the first `failures` attempts and counts calls.
    fn counting_connector(calls: Arc<AtomicUsize>, failures: usize) -> Connector<Dummy> {
        Box::new(move || {
            let calls = Arc::clone(&calls);
            async move {
                tokio::time::sleep(Duration::from_millis(20)).await;
                let attempt = calls.fetch_add(1, Ordering::SeqCst);
                if attempt < failures {
                    anyhow::bail!("connection refused");
                }
                Ok(Arc::new(Dummy))
            }
            .boxed()
        })
    }

    #[tokio::test]
    async fn test_connects_lazily_and_caches() {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = ClientProvider::new(
            Upstream::Hyperliquid,
            ReconnectPolicy::OnDemand,
            counting_connector(calls.clone(), 0),
        );

        assert!(!provider.is_ready());
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let first = provider.get().await.unwrap();
        let second = provider.get().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(provider.is_ready());
    }

    #[tokio::test]
    async fn test_concurrent_get_connects_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = ClientProvider::new(
            Upstream::CoinGecko,
            ReconnectPolicy::OnDemand,
            counting_connector(calls.clone(), 0),
        );

        let (a, b, c) = tokio::join!(provider.get(), provider.get(), provider.get());
        assert!(a.is_ok() && b.is_ok() && c.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_on_demand_retries_after_failed_init() {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = ClientProvider::new(
            Upstream::Hyperliquid,
            ReconnectPolicy::OnDemand,
            counting_connector(calls.clone(), 1),
        );

        assert!(!provider.warm_up().await);
        assert!(provider.get().await.is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_never_policy_does_not_retry() {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = ClientProvider::new(
            Upstream::Hyperliquid,
            ReconnectPolicy::Never,
            counting_connector(calls.clone(), 1),
        );

        assert!(provider.get().await.is_err());
        let err = provider.get().await.err().unwrap();
        assert!(matches!(err, MarketDataError::UpstreamUnavailable { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_report_failure_respects_policy() {
        let calls = Arc::new(AtomicUsize::new(0));
        let keep = ClientProvider::new(
            Upstream::Hyperliquid,
            ReconnectPolicy::OnDemand,
            counting_connector(calls.clone(), 0),
        );
        keep.get().await.unwrap();
        keep.report_failure().await;
        assert!(keep.is_ready());

        let drop_on_error = ClientProvider::new(
            Upstream::Hyperliquid,
            ReconnectPolicy::OnError,
            counting_connector(calls.clone(), 0),
        );
        drop_on_error.get().await.unwrap();
        drop_on_error.report_failure().await;
        assert!(!drop_on_error.is_ready());

        drop_on_error.get().await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_is_ready_while_slot_is_locked() {
        let calls = Arc::new(AtomicUsize::new(0));
        let provider = ClientProvider::new(
            Upstream::Hyperliquid,
            ReconnectPolicy::OnError,
            counting_connector(calls.clone(), 0),
        );

        {
            let _busy = provider.slot.lock().await;
            assert!(!provider.is_ready());
        }

        provider.get().await.unwrap();
        {
            let _busy = provider.slot.lock().await;
            assert!(provider.is_ready());
        }

        provider.report_failure().await;
        assert!(!provider.is_ready());
    }

    #[tokio::test]
    async fn test_ready_provider_skips_connect() {
        let provider = ClientProvider::ready(Upstream::CoinGecko, Arc::new(Dummy));
        assert!(provider.is_ready());
        assert!(provider.get().await.is_ok());
    }

    #[test]
    fn test_policy_deserialization() {
        let policy: ReconnectPolicy = serde_json::from_str(r#""on_error""#).unwrap();
        assert_eq!(policy, ReconnectPolicy::OnError);
        assert_eq!(ReconnectPolicy::default(), ReconnectPolicy::OnDemand);
    }
}
