//! Cancellation Probe Port - polled at every iteration boundary.

use async_trait::async_trait;

#[async_trait]
pub trait CancellationProbe: Send + Sync {
    /// True once the run should stop.
    async fn is_cancelled(&self) -> bool;
}

/// Probe that never cancels.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverCancel;

#[async_trait]
impl CancellationProbe for NeverCancel {
    async fn is_cancelled(&self) -> bool {
        false
    }
}
