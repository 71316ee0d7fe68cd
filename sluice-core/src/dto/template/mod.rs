//! Template DTOs for the admin surface

use serde::{Deserialize, Serialize};

/// Request to remove the first registered template with this pattern text
///
/// Matching is string equality on the pattern source, not regex equivalence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveTemplate {
    pub pattern: String,
}
