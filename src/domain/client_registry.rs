//! Per-client rate-limiter state and its stale-entry evictor.
//!
//! Every client identifier (normally the peer IP address) owns one direct
//! `governor` limiter plus the time it was last seen. Request handlers and the
//! evictor share a single exclusive lock over the whole map, so an entry is
//! never observed half-updated and at most one entry exists per identifier.

use std::collections::HashMap;
use std::num::NonZeroU32;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use governor::clock::{Clock, DefaultClock, Reference};
use governor::middleware::NoOpMiddleware;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

/// How often the evictor wakes up.
pub const EVICTION_INTERVAL: Duration = Duration::from_secs(60);

/// Clients not seen for longer than this are dropped by the evictor.
pub const STALE_AFTER: Duration = Duration::from_secs(3 * 60);

/// Process-wide limiter parameters applied to every new client.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimiterSettings {
    pub requests_per_second: f64,
    pub burst: u32,
}

impl LimiterSettings {
    /// Quota replenishing one cell every `1 / requests_per_second` seconds,
    /// with `burst` cells available up front.
    ///
    /// `None` when the burst is zero or the rate is not a positive finite number.
    pub fn quota(&self) -> Option<Quota> {
        let burst = NonZeroU32::new(self.burst)?;
        if !self.requests_per_second.is_finite() || self.requests_per_second <= 0.0 {
            return None;
        }

        let period = Duration::try_from_secs_f64(1.0 / self.requests_per_second).ok()?;
        Quota::with_period(period).map(|quota| quota.allow_burst(burst))
    }
}

type ClientLimiter<C> = RateLimiter<NotKeyed, InMemoryState, C, NoOpMiddleware<<C as Clock>::Instant>>;

struct ClientEntry<C: Clock> {
    limiter: ClientLimiter<C>,
    last_seen: C::Instant,
}

/// Concurrency-safe map from client identifier to rate-limiter state.
///
/// Shared as `Arc<ClientRegistry>` between the rate-limit middleware and the
/// background evictor ([`run_client_evictor`]). Settings that cannot form a
/// [`Quota`] reject every request; `Config::validate` refuses them at startup.
pub struct ClientRegistry<C: Clock = DefaultClock> {
    settings: LimiterSettings,
    quota: Option<Quota>,
    clock: C,
    clients: Mutex<HashMap<String, ClientEntry<C>>>,
}

impl ClientRegistry {
    pub fn new(settings: LimiterSettings) -> Self {
        Self::with_clock(settings, DefaultClock::default())
    }
}

impl<C: Clock> ClientRegistry<C> {
    /// Registry whose limiters and idle tracking read time from `clock`.
    pub fn with_clock(settings: LimiterSettings, clock: C) -> Self {
        Self {
            settings,
            quota: settings.quota(),
            clock,
            clients: Mutex::new(HashMap::new()),
        }
    }

    pub fn settings(&self) -> LimiterSettings {
        self.settings
    }

    /// Admits or rejects one request from `identifier`.
    ///
    /// Creates a limiter with its full burst on first sight, refreshes
    /// `last_seen` on every call and consumes one cell. A rejected request
    /// consumes nothing.
    pub fn admit(&self, identifier: &str) -> bool
    where
        C: Clone,
    {
        let Some(quota) = self.quota else {
            return false;
        };

        let now = self.clock.now();
        let mut clients = self.lock();

        let entry = clients
            .entry(identifier.to_owned())
            .or_insert_with(|| ClientEntry {
                limiter: RateLimiter::direct_with_clock(quota, self.clock.clone()),
                last_seen: now,
            });
        entry.last_seen = now;

        entry.limiter.check().is_ok()
    }

    /// Removes every client idle for longer than [`STALE_AFTER`].
    ///
    /// Returns the number of removed entries.
    pub fn evict_stale(&self) -> usize {
        let now = self.clock.now();
        let mut clients = self.lock();
        let before = clients.len();

        clients.retain(|_, entry| Duration::from(now.duration_since(entry.last_seen)) <= STALE_AFTER);

        before - clients.len()
    }

    /// Number of tracked clients.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.lock().contains_key(identifier)
    }

    // A panic while holding the lock cannot leave an entry half-written:
    // every mutation is a single assignment or a whole-entry insert/remove.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, ClientEntry<C>>> {
        self.clients.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<C: Clock> std::fmt::Debug for ClientRegistry<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientRegistry")
            .field("settings", &self.settings)
            .field("clients", &self.len())
            .finish()
    }
}

/// Evicts stale clients every [`EVICTION_INTERVAL`] until `shutdown` flips
/// to `true` or its sender is dropped.
///
/// # Example
///
/// ```rust,ignore
/// let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
/// let evictor = tokio::spawn(run_client_evictor(registry.clone(), shutdown_rx));
/// // ...
/// shutdown_tx.send(true)?;
/// evictor.await?;
/// ```
pub async fn run_client_evictor<C>(registry: Arc<ClientRegistry<C>>, mut shutdown: watch::Receiver<bool>)
where
    C: Clock + Send + Sync,
{
    let mut ticker = tokio::time::interval_at(
        tokio::time::Instant::now() + EVICTION_INTERVAL,
        EVICTION_INTERVAL,
    );
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    if *shutdown.borrow() {
        return;
    }

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let removed = registry.evict_stale();
                if removed > 0 {
                    tracing::debug!(removed, remaining = registry.len(), "Evicted stale rate-limit clients");
                }
            }
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }

    tracing::info!("Rate limiter evictor stopped");
}
