//! Inbound frame dispatch.

use crate::protocol::SubmissionMessage;
use crate::state::AppState;
use std::sync::Arc;

/// Decode one text frame from connection `id` and act on it.
///
/// Malformed frames are diagnostic-logged and dropped: no broadcast goes
/// out and the connection stays up. Decoded submissions are handed to the
/// coordinator for judging.
pub async fn route_frame(state: &Arc<AppState>, id: &str, text: &str) {
    match serde_json::from_str::<SubmissionMessage>(text) {
        Ok(submission) => {
            tracing::debug!(
                connection = %id,
                username = %submission.username,
                "submission received"
            );
            state
                .handle_submission(id, submission.username, submission.puzzle)
                .await;
        }
        Err(e) => {
            tracing::debug!(connection = %id, "ignoring malformed frame: {e}");
        }
    }
}
