//! Resource management

use crate::error::SummaristError;

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// [crate::resource_manager::ResourceManager] provides a simple way to allocate worker
/// resources to tasks. Resource management is performed using a Tokio Semaphore.
///
/// Permits are owned so they can move into spawned tasks and release when the
/// task drops them.
#[derive(Debug)]
pub struct ResourceManager {
    /// Optional semaphore for concurrent reduction and filter tasks.
    tasks: Option<Arc<Semaphore>>,
}

impl ResourceManager {
    /// Returns a new ResourceManager object.
    pub fn new(task_limit: Option<usize>) -> Self {
        Self {
            tasks: task_limit.map(|limit| Arc::new(Semaphore::new(limit))),
        }
    }

    /// Acquire a task resource.
    pub async fn task(&self) -> Result<Option<OwnedSemaphorePermit>, SummaristError> {
        optional_acquire(&self.tasks).await
    }
}

/// Acquire a permit on an optional Semaphore, if present.
async fn optional_acquire(
    sem: &Option<Arc<Semaphore>>,
) -> Result<Option<OwnedSemaphorePermit>, SummaristError> {
    if let Some(sem) = sem {
        sem.clone()
            .acquire_owned()
            .await
            .map(Some)
            .map_err(|err| err.into())
    } else {
        Ok(None)
    }
}
