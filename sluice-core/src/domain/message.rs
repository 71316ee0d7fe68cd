//! Queue message domain types

use serde::{Deserialize, Serialize};

/// A message received from the durable queue
///
/// The body is the opaque notification envelope text. The receipt handle is
/// required to delete the message after the work it describes has been
/// safely submitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueueMessage {
    pub message_id: String,
    pub receipt_handle: String,
    pub body: String,
}
