//! Adapter layer - Concrete devices plugged into the domain's port.
//!
//! This layer contains adapters that implement the domain's `PageDevice`
//! port on top of actual storage, plus the glue that exposes the layer
//! through the `embedded-storage` byte storage traits.
//!
//! # Hexagonal Architecture
//!
//! ```text
//!     ┌──────────────────────────────────┐
//!     │      Domain Layer                │
//!     │  - UnalignedBlockDevice          │
//!     │  - PageDevice (port)             │
//!     └────────────┬─────────────────────┘
//!                  │
//!                  │ implements
//!                  ▼
//!     ┌──────────────────────────────────┐
//!     │      Adapter Layer               │  ◄── This module
//!     │  - RamDevice                     │
//!     │  - NorFlashDevice                │
//!     └────────────┬─────────────────────┘
//!                  │
//!                  │ uses
//!                  ▼
//!     ┌──────────────────────────────────┐
//!     │  Infrastructure (RAM, NorFlash)  │
//!     └──────────────────────────────────┘
//! ```
//!
//! # Available Adapters
//!
//! - **`RamDevice`**: Heap-backed page device for hosts and tests
//! - **`NorFlashDevice`**: Any `embedded-storage` NOR flash, one page per
//!   erase sector (requires `embedded-storage`)

mod ram_device;

#[cfg(feature = "embedded-storage")]
mod nor_flash_device;

#[cfg(feature = "embedded-storage")]
mod storage;

pub use ram_device::{RamDevice, RamDeviceError};

#[cfg(feature = "embedded-storage")]
pub use nor_flash_device::{NorFlashDevice, NorFlashError, NorFlashRegion};
