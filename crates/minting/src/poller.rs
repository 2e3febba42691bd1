//! Mint status polling
//!
//! Keeps a `MintRecord` fresh while its mint is in flight. `MintTracker`
//! owns the record for one mint id; `MintStatusPoller` refreshes it on a
//! fixed interval until the mint completes or the owning context drops
//! the handle.
//!
//! Checks are serialized per mint id through the record lock: a manual
//! `refresh()` holds the lock for the duration of its fetch-and-merge,
//! and a scheduled check that finds the lock taken skips its tick
//! instead of running concurrently.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::{MintError, MintRecord, MintStatus, MintingApi};

/// Fixed delay between scheduled status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Holds the canonical record of one in-flight mint. The mint id is
/// assigned at construction and never changes; every check targets it.
pub struct MintTracker {
    api: Arc<dyn MintingApi>,
    minting_id: String,
    record: Mutex<MintRecord>,
}

impl MintTracker {
    pub fn new(api: Arc<dyn MintingApi>, record: MintRecord) -> Self {
        Self {
            api,
            minting_id: record.minting_id.clone(),
            record: Mutex::new(record),
        }
    }

    pub fn minting_id(&self) -> &str {
        &self.minting_id
    }

    /// Snapshot of the current record.
    pub async fn record(&self) -> MintRecord {
        self.record.lock().await.clone()
    }

    /// User-triggered status check: fetch the latest status and merge it
    /// into the record. Holds the record lock across the fetch so no
    /// scheduled check can run concurrently for this mint.
    pub async fn refresh(&self) -> Result<MintRecord, MintError> {
        let mut record = self.record.lock().await;
        let update = self.api.check_status(&self.minting_id).await?;
        record.merge(update);
        Ok(record.clone())
    }
}

/// Spawns the background refresh loop for a tracker.
pub struct MintStatusPoller;

impl MintStatusPoller {
    /// Schedule status checks for `tracker` every `interval` until the
    /// mint completes. Individual check failures are logged and the
    /// schedule continues; transient backend errors must not abandon
    /// polling. The returned handle aborts the loop on drop, so no
    /// check fires after the owning context is torn down.
    pub fn spawn(tracker: Arc<MintTracker>, interval: Duration) -> PollerHandle {
        let task = tokio::spawn(async move {
            if tracker.record.lock().await.status == MintStatus::Completed {
                return;
            }

            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick resolves immediately; the first check runs
            // one full interval after spawn.
            ticker.tick().await;

            loop {
                ticker.tick().await;

                let mut record = match tracker.record.try_lock() {
                    Ok(record) => record,
                    Err(_) => {
                        tracing::debug!(
                            minting_id = %tracker.minting_id,
                            "Skipping scheduled check; a manual check is outstanding"
                        );
                        continue;
                    }
                };

                if record.status == MintStatus::Completed {
                    break;
                }

                match tracker.api.check_status(&tracker.minting_id).await {
                    Ok(update) => {
                        record.merge(update);
                        if record.status == MintStatus::Completed {
                            tracing::info!(
                                minting_id = %tracker.minting_id,
                                "Mint completed, stopping status checks"
                            );
                            break;
                        }
                    }
                    Err(err) => {
                        tracing::warn!(
                            error = %err,
                            minting_id = %tracker.minting_id,
                            "Status check failed, keeping schedule"
                        );
                    }
                }
            }
        });

        PollerHandle { task }
    }
}

/// Handle to a polling loop. Aborts the loop on drop so timers cannot
/// accumulate across repeated mounts of the owning screen.
pub struct PollerHandle {
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Stop polling. No check fires after cancellation.
    pub fn cancel(self) {
        self.task.abort();
    }

    /// Whether the loop has ended (mint completed or task aborted).
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
