//! Concurrency gate bounding simultaneous external build invocations.

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Counting gate: at most `max_local_builds` invocations run at once.
///
/// Cloning shares the underlying permit pool. Acquisition blocks the calling
/// task until a slot frees; the returned [`BuildPermit`] releases its slot on
/// drop, on every exit path.
#[derive(Clone)]
pub struct BuildGate {
    permits: Arc<Semaphore>,
}

/// RAII permit for one build invocation.
pub struct BuildPermit {
    _permit: OwnedSemaphorePermit,
}

impl BuildGate {
    /// Create a gate with `max_local_builds` slots.
    pub fn new(max_local_builds: usize) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(max_local_builds)),
        }
    }

    /// Acquire a slot, waiting until one is free.
    pub async fn acquire(&self) -> BuildPermit {
        // The gate never closes its semaphore, so acquisition cannot fail.
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .expect("build gate semaphore is never closed");
        BuildPermit { _permit: permit }
    }

    /// Currently free slots.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }
}
