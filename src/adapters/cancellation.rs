//! Shared cancellation flag.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::ports::CancellationProbe;

/// Cloneable flag; every clone observes the same state.
///
/// # Example
///
/// ```ignore
/// let flag = CancellationFlag::new();
/// let orchestrator = orchestrator.with_cancellation(Arc::new(flag.clone()));
///
/// tokio::spawn(async move {
///     tokio::signal::ctrl_c().await.ok();
///     flag.cancel();
/// });
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_set(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CancellationProbe for CancellationFlag {
    async fn is_cancelled(&self) -> bool {
        self.is_set()
    }
}
