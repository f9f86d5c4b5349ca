//! NOR flash page device for embedded-storage traits
//!
//! This module provides a `PageDevice` that wraps types implementing the
//! `embedded-storage` NOR flash traits. One page is one erase sector, so
//! programming a page erases the sector and writes it in full.
//!
//! # Example
//!
//! ```ignore
//! use esp_storage::FlashStorage as EspFlash;
//! use unaligned_bd::{NorFlashDevice, NorFlashRegion, UnalignedBlockDevice};
//!
//! let flash = EspFlash::new();
//! let device = NorFlashDevice::new(flash, NorFlashRegion::default_4mb());
//!
//! let mut bd = UnalignedBlockDevice::new(device);
//! bd.init()?;
//! bd.program(10, b"settings")?;
//! ```

use embedded_storage::nor_flash::{NorFlash, NorFlashError as _, NorFlashErrorKind, ReadNorFlash};

use crate::domain::PageDevice;

/// Flash region used as the page device.
///
/// Defines where in flash the device starts and how many erase sectors it
/// spans.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NorFlashRegion {
    /// Start offset in flash, must be aligned to the flash erase size
    pub start_offset: u32,
    /// Number of erase sectors (pages) in the region
    pub page_count: u32,
}

impl NorFlashRegion {
    /// Create a new region
    ///
    /// Alignment and fit are checked against the flash by
    /// [`NorFlashDevice::init`].
    pub const fn new(start_offset: u32, page_count: u32) -> Self {
        Self {
            start_offset,
            page_count,
        }
    }

    /// Last 256KB of a 4MB flash with 4KB sectors
    ///
    /// Places the region at offset 0x3C0000 (3.75MB) with 64 pages.
    pub const fn default_4mb() -> Self {
        Self::new(0x3C_0000, 64)
    }

    /// Last 1MB of a 16MB flash with 4KB sectors
    ///
    /// Places the region at offset 0xF00000 (15MB) with 256 pages.
    pub const fn default_16mb() -> Self {
        Self::new(0xF0_0000, 256)
    }
}

impl Default for NorFlashRegion {
    fn default() -> Self {
        Self::default_4mb()
    }
}

/// Error type for NOR flash page device operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NorFlashError {
    /// The flash driver failed.
    Flash(NorFlashErrorKind),
    /// The region is not sector aligned or does not fit in the flash.
    InvalidRegion,
    /// Access that is not exactly one page at a page boundary inside the region.
    InvalidAccess {
        /// Requested address, relative to the region start.
        addr: u64,
        /// Requested length.
        len: usize,
    },
}

impl core::fmt::Display for NorFlashError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Flash(kind) => write!(f, "NOR flash error: {:?}", kind),
            Self::InvalidRegion => write!(f, "NOR flash region is misaligned or too large"),
            Self::InvalidAccess { addr, len } => {
                write!(f, "Invalid NOR flash page access: addr={}, len={}", addr, len)
            }
        }
    }
}

impl core::error::Error for NorFlashError {}

/// Page device backed by an embedded-storage NOR flash region
///
/// Works with ESP32 internal flash, external SPI flash, or any other
/// `embedded-storage` compatible flash. The page size is the flash's
/// `ERASE_SIZE`.
pub struct NorFlashDevice<F> {
    flash: F,
    region: NorFlashRegion,
}

impl<F: NorFlash> NorFlashDevice<F> {
    /// Create a new NOR flash page device
    pub const fn new(flash: F, region: NorFlashRegion) -> Self {
        Self { flash, region }
    }

    /// Get the configured region
    pub fn region(&self) -> &NorFlashRegion {
        &self.region
    }

    /// Consume the device and return the underlying flash
    pub fn into_inner(self) -> F {
        self.flash
    }

    /// Translate a region-relative page access into an absolute flash offset
    fn flash_offset(&self, addr: u64, len: usize) -> Result<u32, NorFlashError> {
        let invalid = NorFlashError::InvalidAccess { addr, len };

        if len != F::ERASE_SIZE || addr % F::ERASE_SIZE as u64 != 0 {
            return Err(invalid);
        }
        addr.checked_add(len as u64)
            .filter(|&end| end <= self.total_size())
            .ok_or(invalid)?;

        u32::try_from(addr)
            .ok()
            .and_then(|addr| self.region.start_offset.checked_add(addr))
            .ok_or(invalid)
    }
}

impl<F: NorFlash> PageDevice for NorFlashDevice<F> {
    type Error = NorFlashError;

    fn init(&mut self) -> Result<(), Self::Error> {
        let start = self.region.start_offset as u64;
        let end = start.saturating_add(self.total_size());

        if start % F::ERASE_SIZE as u64 != 0 || end > self.flash.capacity() as u64 {
            warn!(
                "flash region {}+{} pages does not fit the flash",
                self.region.start_offset,
                self.region.page_count
            );
            return Err(NorFlashError::InvalidRegion);
        }

        Ok(())
    }

    fn page_size(&self) -> usize {
        F::ERASE_SIZE
    }

    fn total_size(&self) -> u64 {
        (self.region.page_count as u64).saturating_mul(F::ERASE_SIZE as u64)
    }

    fn read(&mut self, addr: u64, dest: &mut [u8]) -> Result<(), Self::Error> {
        let offset = self.flash_offset(addr, dest.len())?;
        self.flash
            .read(offset, dest)
            .map_err(|e| NorFlashError::Flash(e.kind()))
    }

    fn program(&mut self, addr: u64, src: &[u8]) -> Result<(), Self::Error> {
        let offset = self.flash_offset(addr, src.len())?;

        // Erase before write (required for NOR flash)
        self.flash
            .erase(offset, offset + F::ERASE_SIZE as u32)
            .map_err(|e| NorFlashError::Flash(e.kind()))?;

        self.flash
            .write(offset, src)
            .map_err(|e| NorFlashError::Flash(e.kind()))
    }
}
