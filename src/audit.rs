//! Append-only audit event stream.
//!
//! Every terminal state of the generation pipeline, plus the deletion and
//! favorite flows, emits exactly one structured event here. Events go to
//! the `audit` log target with an `event_type` field so they can be
//! filtered out of the ordinary service logs.

use serde_json::Value;
use tracing::{info, warn};

/// Records an informational audit event.
pub fn record(event_type: &str, user_id: &str, message: &str, metadata: Value) {
    info!(
        target: "audit",
        event_type,
        user_id,
        metadata = %metadata,
        "{message}"
    );
}

/// Records a warning-severity audit event (limit denials, degraded cleanup).
pub fn record_warn(event_type: &str, user_id: &str, message: &str, metadata: Value) {
    warn!(
        target: "audit",
        event_type,
        user_id,
        metadata = %metadata,
        "{message}"
    );
}

/// Records a failure audit event with the underlying error detail.
pub fn record_failure(
    event_type: &str,
    user_id: &str,
    message: &str,
    error: &str,
    metadata: Value,
) {
    tracing::error!(
        target: "audit",
        event_type,
        user_id,
        error,
        metadata = %metadata,
        "{message}"
    );
}
