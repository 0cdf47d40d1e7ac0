//! Core types for the read adapter.

use crate::error::ReadFailure;

/// Name of the event broadcast on the caller's scope for every progress
/// firing of a read operation.
///
/// The payload is the [`Progress`] tuple taken verbatim from the host
/// reader's notification.
pub const FILE_PROGRESS: &str = "fileProgress";

/// Terminal value of a read operation.
///
/// On success, the host reader's result field (a data-URL string, decoded
/// text, or raw binary string depending on the read mode). On failure,
/// a [`ReadFailure`] carrying whatever the result field held at error time.
pub type ReadOutcome = Result<String, ReadFailure>;

/// Progress notification for an in-flight read.
///
/// Emitted zero or more times per operation, never after settlement.
/// Values are relayed verbatim from the host reader; the adapter does not
/// derive, clamp, or accumulate them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Progress {
    /// Total number of bytes the host expects to read.
    pub total: u64,
    /// Number of bytes read so far.
    pub loaded: u64,
}

impl Progress {
    /// Create a progress tuple.
    #[inline]
    pub const fn new(total: u64, loaded: u64) -> Self {
        Self { total, loaded }
    }

    /// Returns `true` once `loaded` has reached `total`.
    #[inline]
    pub const fn is_complete(&self) -> bool {
        self.loaded >= self.total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_completion() {
        assert!(!Progress::new(70, 30).is_complete());
        assert!(Progress::new(70, 70).is_complete());
    }
}
