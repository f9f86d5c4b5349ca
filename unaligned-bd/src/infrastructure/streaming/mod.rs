//! Streaming cursor over the unaligned layer.
//!
//! This module provides stream I/O on top of [`UnalignedBlockDevice`],
//! implementing the blocking `embedded_io` and the async `embedded_io_async`
//! Read/Write/Seek traits for integration with file systems and other I/O
//! frameworks.
//!
//! [`UnalignedBlockDevice`]: crate::UnalignedBlockDevice

mod unaligned_stream;
mod embedded_io_impl;

pub use unaligned_stream::UnalignedStream;

use crate::domain::UnalignedError;
use core::fmt;
use embedded_io::ErrorKind;

/// Unified I/O error type for streaming operations.
#[derive(Debug)]
pub enum StreamError<E> {
    /// Error from the unaligned layer or the device under it.
    Storage(UnalignedError<E>),
    /// Write at or past the end of the device.
    OutOfBounds,
    /// Seek to a negative or unrepresentable position.
    InvalidSeek,
}

impl<E> From<UnalignedError<E>> for StreamError<E> {
    fn from(error: UnalignedError<E>) -> Self {
        Self::Storage(error)
    }
}

impl<E: fmt::Display> fmt::Display for StreamError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Storage(e) => write!(f, "Storage error: {}", e),
            Self::OutOfBounds => write!(f, "Operation would exceed storage bounds"),
            Self::InvalidSeek => write!(f, "Invalid seek position"),
        }
    }
}

impl<E: core::error::Error + 'static> core::error::Error for StreamError<E> {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Storage(e) => Some(e),
            _ => None,
        }
    }
}

// embedded_io_async re-exports this trait, so one impl serves both
impl<E: core::error::Error + 'static> embedded_io::Error for StreamError<E> {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::Storage(UnalignedError::NoMemory) => ErrorKind::OutOfMemory,
            Self::Storage(UnalignedError::InvalidPageSize(_)) => ErrorKind::InvalidData,
            Self::Storage(_) => ErrorKind::Other,
            Self::OutOfBounds => ErrorKind::InvalidInput,
            Self::InvalidSeek => ErrorKind::InvalidInput,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RamDeviceError;
    use embedded_io::Error as _;

    #[test]
    fn test_error_kinds() {
        let error: StreamError<RamDeviceError> = StreamError::OutOfBounds;
        assert_eq!(error.kind(), ErrorKind::InvalidInput);

        let error: StreamError<RamDeviceError> = UnalignedError::NoMemory.into();
        assert_eq!(error.kind(), ErrorKind::OutOfMemory);

        let error: StreamError<RamDeviceError> =
            UnalignedError::Device(RamDeviceError::NotInitialized).into();
        assert_eq!(error.kind(), ErrorKind::Other);
        assert!(format!("{}", error).contains("not initialized"));
    }
}
