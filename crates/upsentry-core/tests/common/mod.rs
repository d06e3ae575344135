// Shared in-memory transport for integration tests.
#![allow(dead_code, clippy::unwrap_used)]

use std::collections::VecDeque;
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use upsentry_api::{Error, ObjectId, RawResult, RawValue, SetResponse, Transport};

#[derive(Default)]
struct Inner {
    scalars: Mutex<RawResult>,
    rows: Mutex<Vec<(ObjectId, RawValue)>>,
    get_failures: Mutex<VecDeque<Error>>,
    set_results: Mutex<VecDeque<Result<SetResponse, Error>>>,
    sets: Mutex<Vec<Vec<(ObjectId, RawValue)>>>,
    delay: Mutex<Option<Duration>>,
    gets: AtomicUsize,
    walks: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

/// Scripted agent. Clones share state so a test can keep a handle after
/// moving one into a `Monitor`.
#[derive(Clone, Default)]
pub struct StubTransport {
    inner: Arc<Inner>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scalar(self, oid: ObjectId, value: RawValue) -> Self {
        self.inner.scalars.lock().unwrap().insert(oid, value);
        self
    }

    pub fn with_rows(self, rows: Vec<(ObjectId, RawValue)>) -> Self {
        *self.inner.rows.lock().unwrap() = rows;
        self
    }

    /// Every `get` sleeps this long before answering.
    pub fn with_delay(self, delay: Duration) -> Self {
        *self.inner.delay.lock().unwrap() = Some(delay);
        self
    }

    /// The next `get` fails with `error`.
    pub fn fail_next_get(&self, error: Error) {
        self.inner.get_failures.lock().unwrap().push_back(error);
    }

    /// Queue the result of the next `set`. Unscripted sets are accepted.
    pub fn push_set_result(&self, result: Result<SetResponse, Error>) {
        self.inner.set_results.lock().unwrap().push_back(result);
    }

    pub fn gets(&self) -> usize {
        self.inner.gets.load(Ordering::SeqCst)
    }

    pub fn walks(&self) -> usize {
        self.inner.walks.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.inner.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn sets(&self) -> Vec<Vec<(ObjectId, RawValue)>> {
        self.inner.sets.lock().unwrap().clone()
    }
}

impl Transport for StubTransport {
    async fn get(&self, identifiers: &[ObjectId]) -> Result<RawResult, Error> {
        let inner = &self.inner;
        inner.gets.fetch_add(1, Ordering::SeqCst);
        let now = inner.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        inner.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let delay = *inner.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        inner.in_flight.fetch_sub(1, Ordering::SeqCst);

        let failure = inner.get_failures.lock().unwrap().pop_front();
        if let Some(error) = failure {
            return Err(error);
        }

        let scalars = inner.scalars.lock().unwrap();
        Ok(identifiers
            .iter()
            .filter_map(|oid| scalars.get(oid).map(|v| (oid.clone(), v.clone())))
            .collect())
    }

    async fn walk(&self, _root: &ObjectId) -> Result<Vec<(ObjectId, RawValue)>, Error> {
        self.inner.walks.fetch_add(1, Ordering::SeqCst);
        Ok(self.inner.rows.lock().unwrap().clone())
    }

    async fn set(&self, values: &[(ObjectId, RawValue)]) -> Result<SetResponse, Error> {
        self.inner.sets.lock().unwrap().push(values.to_vec());
        let scripted = self.inner.set_results.lock().unwrap().pop_front();
        scripted.unwrap_or_else(|| Ok(accepted(values)))
    }
}

pub fn accepted(values: &[(ObjectId, RawValue)]) -> SetResponse {
    SetResponse {
        error_status: 0,
        error_index: 0,
        varbinds: values.to_vec(),
    }
}

pub fn rejected(status: u32, index: u32) -> SetResponse {
    SetResponse {
        error_status: status,
        error_index: index,
        varbinds: Vec::new(),
    }
}

pub fn timeout() -> Error {
    Error::Timeout { timeout_ms: 1000 }
}

pub const NEW_ADDRESS: Ipv4Addr = Ipv4Addr::new(192, 168, 10, 40);
