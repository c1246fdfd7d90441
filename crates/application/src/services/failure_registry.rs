//! Failure Registry - single-slot, time-bounded home of the active failure

use std::sync::Arc;

use domain::{Failure, Lifespan};
use tracing::{debug, info, instrument};

use crate::{
    error::ApplicationError,
    ports::{CachePort, CachePortExt, ClockPort},
};

/// Key under which the active failure is stored
pub const CURRENT_FAILURE_KEY: &str = "faultline:current_failure";

/// Holds at most one simulated failure
///
/// Durability and expiry are delegated to the backing [`CachePort`]. Stored
/// failures whose expiration instant has passed are treated as absent even if
/// the store has not evicted them yet.
///
/// `create` checks and then writes in two separate store calls. Two
/// concurrent creates can both see an empty slot and both write; the last
/// write wins.
#[derive(Clone)]
pub struct FailureRegistry {
    store: Arc<dyn CachePort>,
    clock: Arc<dyn ClockPort>,
}

impl std::fmt::Debug for FailureRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FailureRegistry")
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

impl FailureRegistry {
    /// Create a registry over a backing store and clock
    pub fn new(store: Arc<dyn CachePort>, clock: Arc<dyn ClockPort>) -> Self {
        Self { store, clock }
    }

    /// The backing store, for diagnostics
    pub fn store(&self) -> &Arc<dyn CachePort> {
        &self.store
    }

    /// The active failure, if any
    #[instrument(skip(self), level = "debug")]
    pub async fn current(&self) -> Result<Option<Failure>, ApplicationError> {
        let Some(failure) = self.store.get::<Failure>(CURRENT_FAILURE_KEY).await? else {
            return Ok(None);
        };

        if failure.is_expired_at(self.clock.now()) {
            debug!(failure = %failure, "Stored failure has expired");
            return Ok(None);
        }

        Ok(Some(failure))
    }

    /// Store `candidate` for `lifespan`, unless a failure is already active
    #[instrument(skip(self, candidate), fields(pattern = %candidate.pattern(), minutes = %lifespan))]
    pub async fn create(
        &self,
        candidate: Failure,
        lifespan: Lifespan,
    ) -> Result<Failure, ApplicationError> {
        if let Some(active) = self.current().await? {
            return Err(ApplicationError::AlreadyActive {
                failure: active.to_string(),
            });
        }

        let failure = candidate.expiring_at(self.clock.now() + lifespan.as_time_delta());
        self.store
            .set(CURRENT_FAILURE_KEY, &failure, lifespan.as_duration())
            .await?;

        info!(failure = %failure, mode = %failure.mode(), "Simulated failure stored");
        Ok(failure)
    }

    /// Remove the active failure, if any
    #[instrument(skip(self), level = "debug")]
    pub async fn clear(&self) -> Result<(), ApplicationError> {
        self.store.invalidate(CURRENT_FAILURE_KEY).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::{collections::HashMap, time::Duration};

    use async_trait::async_trait;
    use chrono::{DateTime, TimeDelta, TimeZone, Utc};
    use domain::{DependencyPattern, FailureMode};
    use parking_lot::Mutex;

    use super::*;
    use crate::ports::{CacheStats, MockCachePort};

    /// Clock that only moves when told to
    #[derive(Debug)]
    pub(crate) struct TestClock(Mutex<DateTime<Utc>>);

    impl TestClock {
        pub(crate) fn new() -> Self {
            Self(Mutex::new(Utc.with_ymd_and_hms(2026, 1, 1, 9, 0, 0).unwrap()))
        }

        pub(crate) fn advance(&self, by: TimeDelta) {
            *self.0.lock() += by;
        }
    }

    impl ClockPort for TestClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock()
        }
    }

    /// Map-backed store that never evicts on its own
    #[derive(Debug, Default)]
    pub(crate) struct MapStore(Mutex<HashMap<String, Vec<u8>>>);

    #[async_trait]
    impl CachePort for MapStore {
        async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, ApplicationError> {
            Ok(self.0.lock().get(key).cloned())
        }

        async fn set_bytes(
            &self,
            key: &str,
            value: Vec<u8>,
            _ttl: Duration,
        ) -> Result<(), ApplicationError> {
            self.0.lock().insert(key.to_string(), value);
            Ok(())
        }

        async fn invalidate(&self, key: &str) -> Result<(), ApplicationError> {
            self.0.lock().remove(key);
            Ok(())
        }

        fn stats(&self) -> CacheStats {
            CacheStats::default()
        }
    }

    pub(crate) fn registry() -> (FailureRegistry, Arc<TestClock>) {
        let clock = Arc::new(TestClock::new());
        let registry = FailureRegistry::new(Arc::new(MapStore::default()), clock.clone());
        (registry, clock)
    }

    fn failure(pattern: &str) -> Failure {
        Failure::new(DependencyPattern::new(pattern).unwrap(), FailureMode::Status(503))
    }

    fn minutes(n: u32) -> Lifespan {
        Lifespan::from_minutes(n).unwrap()
    }

    #[tokio::test]
    async fn starts_empty() {
        let (registry, _) = registry();
        assert!(registry.current().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn create_stamps_expiration() {
        let (registry, clock) = registry();
        let created = registry.create(failure("example"), minutes(10)).await.unwrap();

        assert_eq!(created.expires_at(), Some(clock.now() + TimeDelta::minutes(10)));
        assert_eq!(registry.current().await.unwrap(), Some(created));
    }

    #[tokio::test]
    async fn second_create_is_rejected_and_keeps_the_first() {
        let (registry, _) = registry();
        let first = registry.create(failure("example"), minutes(60)).await.unwrap();

        let err = registry
            .create(failure("other"), minutes(5))
            .await
            .unwrap_err();

        let ApplicationError::AlreadyActive { failure } = &err else {
            unreachable!("expected AlreadyActive, got {err:?}");
        };
        assert!(failure.starts_with("Failure on /example/ ending at approximately "));
        assert!(
            err.to_string()
                .starts_with("A failure is already in progress (Failure on /example/")
        );
        assert_eq!(registry.current().await.unwrap(), Some(first));
    }

    #[tokio::test]
    async fn failure_expires_after_lifespan() {
        let (registry, clock) = registry();
        registry.create(failure("example"), minutes(10)).await.unwrap();

        clock.advance(TimeDelta::minutes(6));
        assert!(registry.current().await.unwrap().is_some());

        clock.advance(TimeDelta::minutes(14));
        assert!(registry.current().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn create_succeeds_once_previous_failure_expired() {
        let (registry, clock) = registry();
        registry.create(failure("old"), minutes(1)).await.unwrap();
        clock.advance(TimeDelta::minutes(1));

        let replacement = registry.create(failure("new"), minutes(5)).await.unwrap();
        assert_eq!(registry.current().await.unwrap(), Some(replacement));
    }

    #[tokio::test]
    async fn clear_empties_the_slot() {
        let (registry, _) = registry();
        registry.create(failure("example"), minutes(5)).await.unwrap();

        registry.clear().await.unwrap();
        assert!(registry.current().await.unwrap().is_none());

        registry.clear().await.unwrap();
        registry.create(failure("again"), minutes(5)).await.unwrap();
    }

    #[tokio::test]
    async fn create_writes_with_lifespan_ttl() {
        let mut store = MockCachePort::new();
        store.expect_get_bytes().returning(|_| Ok(None));
        store
            .expect_set_bytes()
            .withf(|key, _, ttl| key == CURRENT_FAILURE_KEY && *ttl == Duration::from_secs(600))
            .times(1)
            .returning(|_, _, _| Ok(()));

        let registry = FailureRegistry::new(Arc::new(store), Arc::new(TestClock::new()));
        registry.create(failure("example"), minutes(10)).await.unwrap();
    }

    /// Releases reads only once the gate has filled
    struct GatedStore {
        inner: MapStore,
        gate: tokio::sync::Barrier,
    }

    #[async_trait]
    impl CachePort for GatedStore {
        async fn get_bytes(&self, key: &str) -> Result<Option<Vec<u8>>, ApplicationError> {
            let value = self.inner.get_bytes(key).await?;
            self.gate.wait().await;
            Ok(value)
        }

        async fn set_bytes(
            &self,
            key: &str,
            value: Vec<u8>,
            ttl: Duration,
        ) -> Result<(), ApplicationError> {
            self.inner.set_bytes(key, value, ttl).await
        }

        async fn invalidate(&self, key: &str) -> Result<(), ApplicationError> {
            self.inner.invalidate(key).await
        }

        fn stats(&self) -> CacheStats {
            CacheStats::default()
        }
    }

    #[tokio::test]
    async fn concurrent_creates_can_both_succeed() {
        let store = Arc::new(GatedStore {
            inner: MapStore::default(),
            gate: tokio::sync::Barrier::new(2),
        });
        let registry = FailureRegistry::new(store.clone(), Arc::new(TestClock::new()));

        let (first, second) = tokio::join!(
            registry.create(failure("first"), minutes(5)),
            registry.create(failure("second"), minutes(5)),
        );
        let (first, second) = (first.unwrap(), second.unwrap());

        let stored = store.inner.get_bytes(CURRENT_FAILURE_KEY).await.unwrap();
        let stored: Failure = serde_json::from_slice(&stored.unwrap()).unwrap();
        assert!(stored == first || stored == second);
    }

    #[tokio::test]
    async fn store_errors_propagate() {
        let mut store = MockCachePort::new();
        store
            .expect_get_bytes()
            .returning(|_| Err(ApplicationError::Unexpected("Out of cheese".to_string())));

        let registry = FailureRegistry::new(Arc::new(store), Arc::new(TestClock::new()));
        let err = registry.current().await.unwrap_err();
        assert_eq!(err.to_string(), "Out of cheese");
    }
}
