//! Shared fixtures for tag store integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use regtag_core::RepositoryName;
use regtag_driver::{DriverError, InMemoryDriver, StorageDriver};
use regtag_store::{TagStore, TagStoreConfig};

/// How `get_content` should misbehave.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GetFailure {
    None,
    NotFound,
    Backend,
}

/// An in-memory driver that can inject failures into every operation,
/// delay reads, and records how many reads were in flight at once.
pub struct MockDriver {
    inner: InMemoryDriver,
    get_failure: Mutex<GetFailure>,
    /// Puts still allowed to succeed; `None` is unlimited.
    put_budget: Mutex<Option<usize>>,
    fail_lists: AtomicBool,
    fail_deletes: AtomicBool,
    read_delay: Mutex<Option<Duration>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    get_calls: AtomicUsize,
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl MockDriver {
    pub fn new() -> Self {
        Self {
            inner: InMemoryDriver::new(),
            get_failure: Mutex::new(GetFailure::None),
            put_budget: Mutex::new(None),
            fail_lists: AtomicBool::new(false),
            fail_deletes: AtomicBool::new(false),
            read_delay: Mutex::new(None),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
            get_calls: AtomicUsize::new(0),
        }
    }

    pub fn fail_gets(&self, failure: GetFailure) {
        *self.get_failure.lock().unwrap() = failure;
    }

    /// Let the next `successes` puts through, then fail every put.
    pub fn fail_puts_after(&self, successes: usize) {
        *self.put_budget.lock().unwrap() = Some(successes);
    }

    pub fn fail_lists(&self, fail: bool) {
        self.fail_lists.store(fail, Ordering::SeqCst);
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    pub fn delay_gets(&self, delay: Duration) {
        *self.read_delay.lock().unwrap() = Some(delay);
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    pub fn get_calls(&self) -> usize {
        self.get_calls.load(Ordering::SeqCst)
    }

    pub fn reset_counters(&self) {
        self.peak_in_flight.store(0, Ordering::SeqCst);
        self.get_calls.store(0, Ordering::SeqCst);
    }
}

#[async_trait]
impl StorageDriver for MockDriver {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn get_content(&self, path: &str) -> Result<Vec<u8>, DriverError> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        let _guard = InFlight(&self.in_flight);
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = *self.read_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let failure = *self.get_failure.lock().unwrap();
        match failure {
            GetFailure::None => self.inner.get_content(path).await,
            GetFailure::NotFound => Err(DriverError::PathNotFound {
                path: path.to_string(),
            }),
            GetFailure::Backend => Err(DriverError::Backend("lookup failure".into())),
        }
    }

    async fn put_content(&self, path: &str, content: &[u8]) -> Result<(), DriverError> {
        let allowed = match self.put_budget.lock().unwrap().as_mut() {
            None => true,
            Some(0) => false,
            Some(remaining) => {
                *remaining -= 1;
                true
            }
        };
        if !allowed {
            return Err(DriverError::Backend("put failure".into()));
        }
        self.inner.put_content(path, content).await
    }

    async fn list(&self, path: &str) -> Result<Vec<String>, DriverError> {
        if self.fail_lists.load(Ordering::SeqCst) {
            return Err(DriverError::Backend("list failure".into()));
        }
        self.inner.list(path).await
    }

    async fn delete(&self, path: &str) -> Result<(), DriverError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(DriverError::Backend("delete failure".into()));
        }
        self.inner.delete(path).await
    }
}

pub fn repository() -> RepositoryName {
    RepositoryName::new("a/b").unwrap()
}

/// A tag store over a fresh mock driver.
pub fn tag_store(config: TagStoreConfig) -> (TagStore, Arc<MockDriver>) {
    let driver = Arc::new(MockDriver::new());
    let store = TagStore::new(repository(), driver.clone(), config);
    (store, driver)
}

/// `sha256:` followed by 64 copies of `c`.
pub fn digest_of(c: char) -> regtag_core::Digest {
    regtag_core::Digest::new(format!("sha256:{}", c.to_string().repeat(64)))
}
