use thiserror::Error;

use crate::backend::BackendId;
use crate::scene::{NodeId, ViewerId};

/// Errors reported by viewer lifecycle operations.
///
/// Every error is synchronous, local, and recoverable: a viewer stays usable
/// after a failed `configure` or `set_scene`. The one deferred-detection case
/// is a capture view that goes stale *after* a successful configure; that is
/// only observable at the next `draw` and surfaces as [`InvalidState`].
///
/// [`InvalidState`]: ViewerError::InvalidState
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViewerError {
    /// The requested backend identifier is unknown, or names a backend the
    /// host environment does not support.
    #[error("unknown or unavailable backend {id}")]
    InvalidBackend {
        /// The raw identifier as supplied by the caller.
        id: BackendId,
    },

    /// The configuration is internally inconsistent (bad dimensions,
    /// undersized capture buffer, missing window handle, ...).
    #[error("invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    /// A node reachable from the requested scene root is already bound to a
    /// different viewer context.
    #[error("{node} is already owned by {owner}")]
    OwnershipConflict { node: NodeId, owner: ViewerId },

    /// The call was made from the wrong lifecycle state (`draw` before
    /// `configure`, `set_scene` on an unconfigured viewer, draw through a
    /// released capture buffer, ...).
    #[error("invalid state: {reason}")]
    InvalidState { reason: &'static str },
}

impl ViewerError {
    /// Stable negative code for embedders speaking the zero-on-success
    /// integer contract.
    ///
    /// Rust callers should match on the variant instead; only the sign of
    /// these values is portable.
    pub const fn code(&self) -> i32 {
        match self {
            Self::InvalidBackend { .. } => -1,
            Self::InvalidConfiguration { .. } => -2,
            Self::OwnershipConflict { .. } => -3,
            Self::InvalidState { .. } => -4,
        }
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, ViewerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_negative_and_distinct() {
        let errors = [
            ViewerError::InvalidBackend { id: BackendId(0x1234) },
            ViewerError::InvalidConfiguration { reason: "x".into() },
            ViewerError::OwnershipConflict {
                node: NodeId::from_index(0),
                owner: ViewerId::from_raw(1),
            },
            ViewerError::InvalidState { reason: "x" },
        ];
        let codes: Vec<i32> = errors.iter().map(ViewerError::code).collect();
        assert!(codes.iter().all(|&c| c < 0));
        let mut dedup = codes.clone();
        dedup.sort_unstable();
        dedup.dedup();
        assert_eq!(dedup.len(), codes.len());
    }
}
