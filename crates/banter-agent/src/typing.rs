//! Composing indicator — refreshes the platform "typing" signal until stopped.
//!
//! Discord's typing status expires after roughly ten seconds, so the loop
//! refreshes every 8s. The handle aborts its task on `stop()` and again on
//! drop, so the indicator is released on every exit path.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::platform::ChatPlatform;

const REFRESH_INTERVAL: Duration = Duration::from_secs(8);

/// Handle to a background composing-indicator task.
pub struct ComposingHandle(tokio::task::JoinHandle<()>);

impl ComposingHandle {
    /// Spawn the refresh loop for `channel_id`. Signals immediately, then
    /// every [`REFRESH_INTERVAL`].
    pub fn start(platform: Arc<dyn ChatPlatform>, channel_id: u64) -> Self {
        let handle = tokio::spawn(async move {
            loop {
                if let Err(e) = platform.notify_composing(channel_id).await {
                    debug!(channel_id, error = %e, "composing indicator refresh failed");
                }
                tokio::time::sleep(REFRESH_INTERVAL).await;
            }
        });
        ComposingHandle(handle)
    }

    /// Release the indicator.
    pub fn stop(self) {
        self.0.abort();
    }
}

impl Drop for ComposingHandle {
    fn drop(&mut self) {
        self.0.abort();
    }
}
