use crate::access::Access;
use std::{io, path::PathBuf};
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failures reported by container operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid container path '{}': {reason}", .path.display())]
    InvalidPath { path: PathBuf, reason: String },
    #[error("I/O failure: {0}")]
    Io(#[from] io::Error),
    #[error("corrupt container: {reason}")]
    CorruptContainer { reason: String },
    #[error("unsupported container version {found}, expected {expected}")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("corrupt slot {index}: {reason}")]
    CorruptSlot { index: u64, reason: String },
    #[error("index {index} is out of range for {count} records")]
    IndexOutOfRange { index: u64, count: u64 },
    #[error("{operation} is not permitted on a handle opened with {access:?} access")]
    AccessDenied {
        operation: &'static str,
        access: Access,
    },
    #[error("container '{}' is already opened by a writer", .path.display())]
    AlreadyLocked { path: PathBuf },
    #[error("image path has {len} UTF-16 units, exceeding the maximum of {max}")]
    StringTooLong { len: usize, max: usize },
}

impl Error {
    pub(crate) fn corrupt_container(reason: impl ToString) -> Self {
        Self::CorruptContainer {
            reason: reason.to_string(),
        }
    }

    pub(crate) fn corrupt_slot(index: u64, reason: impl ToString) -> Self {
        Self::CorruptSlot {
            index,
            reason: reason.to_string(),
        }
    }

    /// Format-level failures. The container content cannot be trusted.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::CorruptContainer { .. } | Self::UnsupportedVersion { .. } | Self::CorruptSlot { .. }
        )
    }

    /// Failures that may go away when the caller tries again later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::AlreadyLocked { .. } | Self::Io(_))
    }
}
