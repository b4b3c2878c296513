//! # View Accounting
//!
//! Every render of a pitch detail reads the current view count, shows that
//! pre-increment number, and queues `count + 1` to be written after the
//! response is out the door.
//!
//! The increment is a read-then-write on a snapshot, not an atomic counter.
//! Two overlapping renders can read the same base and both write `base + 1`,
//! so one view is lost. The write runs on the deferred worker; if it fails
//! the viewer never hears about it.
use crate::{
    deferred::{DeferredQueue, DeferredTask},
    store::{ContentStore, PitchRecord, ReadMode, StoreError},
};

/// Read the pitch for rendering and queue the deferred increment. The
/// returned record carries the pre-increment view count. `None` means the
/// pitch does not exist and nothing was queued.
pub async fn record_view(
    store: &dyn ContentStore,
    queue: &DeferredQueue,
    pitch_id: &str,
) -> Result<Option<PitchRecord>, StoreError> {
    // The counter base must come from the backing document, not a cache.
    let Some(record) = store.fetch_pitch(pitch_id, ReadMode::BypassCache).await? else {
        return Ok(None);
    };

    queue.enqueue(DeferredTask::WriteViews {
        pitch_id: pitch_id.to_string(),
        views: record.views + 1,
    });

    Ok(Some(record))
}
