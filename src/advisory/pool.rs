//! Explicitly owned advisory worker pool.
//!
//! Constructed once at process start and passed by handle to every routing
//! call; the in-flight counters live here, never in ambient module state.
//! Selection and release use atomics only, so concurrent evaluations can
//! dispatch in parallel without a lock around the network call.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::config::{LlmEndpoint, LlmSettings};

pub struct AdvisoryWorker {
    /// Identity: "{baseUrl}||{model}". Survives settings edits that keep
    /// the same address and model.
    key: String,
    name: String,
    base_url: String,
    api_key: String,
    model: String,
    timeout: Duration,
    max_concurrency: AtomicUsize,
    inflight: AtomicUsize,
}

impl AdvisoryWorker {
    fn from_endpoint(endpoint: &LlmEndpoint) -> Self {
        Self {
            key: endpoint.worker_key(),
            name: endpoint.name.clone(),
            base_url: endpoint.base_url.trim_end_matches('/').to_string(),
            api_key: endpoint.api_key.clone(),
            model: endpoint.model.clone(),
            timeout: Duration::from_millis(endpoint.timeout_ms),
            max_concurrency: AtomicUsize::new(endpoint.max_concurrency),
            inflight: AtomicUsize::new(0),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn inflight(&self) -> usize {
        self.inflight.load(Ordering::Acquire)
    }

    pub fn max_concurrency(&self) -> usize {
        self.max_concurrency.load(Ordering::Acquire)
    }

    /// Increment in-flight iff the ceiling allows it. CAS loop: two racing
    /// acquires can never push the counter past the ceiling.
    fn try_acquire(&self) -> bool {
        self.inflight
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < self.max_concurrency()).then_some(n + 1)
            })
            .is_ok()
    }

    fn release(&self) {
        self.inflight.fetch_sub(1, Ordering::AcqRel);
    }
}

/// Capacity lease on one worker. Dropping the lease releases the slot, so
/// every exit path (success, parse failure, transport failure, timeout)
/// decrements exactly once.
pub struct WorkerLease {
    worker: Arc<AdvisoryWorker>,
}

impl WorkerLease {
    pub fn worker(&self) -> &Arc<AdvisoryWorker> {
        &self.worker
    }
}

impl Drop for WorkerLease {
    fn drop(&mut self) {
        self.worker.release();
    }
}

#[derive(Default)]
pub struct WorkerPool {
    workers: RwLock<Vec<Arc<AdvisoryWorker>>>,
}

impl WorkerPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconcile the pool with the configured endpoint list. Workers whose
    /// key survives keep their in-flight count (outstanding leases stay
    /// valid); ceilings are re-read from the settings either way.
    pub async fn sync_with(&self, llm: &LlmSettings) {
        let mut workers = self.workers.write().await;
        let next = llm
            .endpoints
            .iter()
            .map(|endpoint| {
                let key = endpoint.worker_key();
                match workers.iter().find(|w| w.key == key) {
                    Some(existing) => {
                        existing
                            .max_concurrency
                            .store(endpoint.max_concurrency, Ordering::Release);
                        existing.clone()
                    }
                    None => Arc::new(AdvisoryWorker::from_endpoint(endpoint)),
                }
            })
            .collect();
        *workers = next;
    }

    /// Pick the least-loaded worker with spare capacity, ties broken by
    /// list order. A full pool is `None`, not an error; the hard decision
    /// simply stands unadvised.
    pub async fn acquire(&self) -> Option<WorkerLease> {
        let workers = self.workers.read().await;
        loop {
            let candidate = workers
                .iter()
                .filter(|w| w.inflight() < w.max_concurrency())
                .min_by_key(|w| w.inflight())?;
            // The snapshot may be stale by the time we commit; retry the
            // selection if this worker filled up in between.
            if candidate.try_acquire() {
                return Some(WorkerLease {
                    worker: candidate.clone(),
                });
            }
        }
    }

    pub async fn workers(&self) -> Vec<Arc<AdvisoryWorker>> {
        self.workers.read().await.clone()
    }
}
