//! Errors returned by the unaligned access layer.
//!
//! The layer adds three failures of its own (not initialized, out of memory,
//! unusable page size) and otherwise hands back whatever the device returned.

use crate::domain::value_objects::GeometryError;
use core::fmt;

/// Errors that can occur when accessing the device through the layer.
#[derive(Debug)]
#[non_exhaustive]
pub enum UnalignedError<E> {
    /// The layer has no page buffer: `init` was never called or did not
    /// succeed. The device was not touched.
    NotInitialized,

    /// The page buffer could not be allocated during `init`.
    NoMemory,

    /// The device reported a page size the layer cannot work with.
    InvalidPageSize(GeometryError),

    /// Error from the underlying device, passed through unmodified.
    ///
    /// When this comes out of a multi-page operation, the pages handled
    /// before the failing one stay written.
    Device(E),
}

impl<E> UnalignedError<E> {
    /// Get the device error, if this is one.
    pub fn device_error(&self) -> Option<&E> {
        match self {
            Self::Device(e) => Some(e),
            _ => None,
        }
    }

    /// Consume the error and return the device error, if this is one.
    pub fn into_device_error(self) -> Option<E> {
        match self {
            Self::Device(e) => Some(e),
            _ => None,
        }
    }
}

impl<E: fmt::Display> fmt::Display for UnalignedError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotInitialized => write!(f, "Unaligned block device is not initialized"),
            Self::NoMemory => write!(f, "Out of memory allocating the page buffer"),
            Self::InvalidPageSize(e) => write!(f, "Invalid page size: {}", e),
            Self::Device(e) => write!(f, "Device error: {}", e),
        }
    }
}

impl<E: core::error::Error + 'static> core::error::Error for UnalignedError<E> {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::InvalidPageSize(e) => Some(e),
            Self::Device(e) => Some(e),
            _ => None,
        }
    }
}

// Note: no blanket From<E>, the device error type is generic and would
// collide with the other variants. Use UnalignedError::Device or map_err.
