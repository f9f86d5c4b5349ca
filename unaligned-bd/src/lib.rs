//! Byte-granular access to page-only block devices.
//!
//! Many storage devices (DataFlash, NOR flash, EEPROM arrays) can only read
//! and program whole pages at page-aligned addresses, and some have no
//! native erase. This crate puts a thin layer on top of such a device that
//! accepts reads, programs and erases at any byte address and of any length,
//! doing read-modify-write through a single cached page.
//!
//! # Architecture
//!
//! The crate is organized into three layers:
//!
//! ## Domain Layer (`domain`)
//! Pure page arithmetic and the access logic:
//! - **Entities**: `PageCache`, the one-page buffer and the page it holds
//! - **Value Objects**: `PageNumber`, `PageGeometry`, `PageSpan`, `PageRange`
//! - **Services**: `UnalignedBlockDevice`
//! - **Ports**: `PageDevice`, what a device driver has to provide
//!
//! ## Adapter Layer (`adapters`)
//! Concrete devices for the port:
//! - **`RamDevice`**: Heap-backed page device for hosts and tests
//! - **`NorFlashDevice`**: `embedded-storage` NOR flash, one page per sector
//! - `embedded_storage::{ReadStorage, Storage}` for `UnalignedBlockDevice`
//!
//! ## Infrastructure Layer (`infrastructure`)
//! - **`UnalignedStream`**: cursor implementing `embedded_io` and
//!   `embedded_io_async` Read/Write/Seek
//!
//! # Quick Start
//!
//! ```
//! use unaligned_bd::{RamDevice, UnalignedBlockDevice, ERASE_VALUE};
//!
//! // 4 pages of 528 bytes, like an AT45 DataFlash
//! let mut bd = UnalignedBlockDevice::new(RamDevice::new(528, 4));
//! bd.init().unwrap();
//!
//! bd.program(100, &[0xAB; 600]).unwrap();
//!
//! let mut out = [0u8; 600];
//! bd.read(100, &mut out).unwrap();
//! assert_eq!(out, [0xAB; 600]);
//!
//! bd.erase(0, 528).unwrap();
//! let mut first = [0u8; 4];
//! bd.read(100, &mut first).unwrap();
//! assert_eq!(first, [ERASE_VALUE; 4]);
//! ```
//!
//! # Features
//!
//! - `embedded-storage` (default): `NorFlashDevice` and the byte storage
//!   trait impls
//! - `std`: Enable standard library features of `embedded-io`
//! - `log`: Enable logging support
//! - `defmt`: Enable defmt logging for embedded

#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]

extern crate alloc;

// This mod MUST go first, so that the others see its macros.
#[macro_use]
mod fmt;

// Core layers
pub mod domain;
pub mod adapters;
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use domain::{
    GeometryError, PageCache, PageDevice, PageGeometry, PageNumber, PageRange, PageSpan,
    UnalignedBlockDevice, UnalignedError, ERASE_VALUE,
};

pub use adapters::{RamDevice, RamDeviceError};

#[cfg(feature = "embedded-storage")]
pub use adapters::{NorFlashDevice, NorFlashError, NorFlashRegion};

// Infrastructure layer exports
pub use infrastructure::streaming::{StreamError, UnalignedStream};

// Re-export the I/O trait crates for convenience
pub use embedded_io;
pub use embedded_io_async;

#[cfg(feature = "embedded-storage")]
pub use embedded_storage;
