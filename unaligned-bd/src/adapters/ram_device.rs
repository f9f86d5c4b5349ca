//! RAM-backed page device.
//!
//! Keeps the whole device in a heap buffer and enforces the same rules a
//! real page device would: `init` first, page-aligned addresses, whole-page
//! transfers. Useful for host-side tests and simulations.

use crate::domain::{PageDevice, ERASE_VALUE};

use alloc::vec;
use alloc::vec::Vec;

/// Errors returned by [`RamDevice`].
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RamDeviceError {
    /// Read or program before `init`.
    NotInitialized,
    /// Address not on a page boundary or length not one page.
    Misaligned {
        /// Requested address.
        addr: u64,
        /// Requested length.
        len: usize,
    },
    /// Access past the end of the device.
    OutOfBounds {
        /// Requested address.
        addr: u64,
        /// Requested length.
        len: usize,
    },
}

impl core::fmt::Display for RamDeviceError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotInitialized => write!(f, "RAM device is not initialized"),
            Self::Misaligned { addr, len } => {
                write!(f, "Misaligned page access: addr={}, len={}", addr, len)
            }
            Self::OutOfBounds { addr, len } => {
                write!(f, "Access out of bounds: addr={}, len={}", addr, len)
            }
        }
    }
}

impl core::error::Error for RamDeviceError {}

/// Page device kept entirely in RAM.
///
/// Starts out erased (every byte [`ERASE_VALUE`]).
///
/// # Example
///
/// ```
/// use unaligned_bd::{PageDevice, RamDevice};
///
/// let mut device = RamDevice::new(512, 8);
/// device.init().unwrap();
///
/// device.program(512, &[0u8; 512]).unwrap();
/// assert_eq!(device.memory()[512], 0);
/// assert_eq!(device.memory()[0], 0xFF);
/// ```
#[derive(Debug, Clone)]
pub struct RamDevice {
    memory: Vec<u8>,
    page_size: usize,
    initialized: bool,
}

impl RamDevice {
    /// Create an erased device of `page_count` pages of `page_size` bytes.
    pub fn new(page_size: usize, page_count: usize) -> Self {
        Self {
            memory: vec![ERASE_VALUE; page_size.saturating_mul(page_count)],
            page_size,
            initialized: false,
        }
    }

    /// Whether `init` has been called.
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// The raw device contents.
    pub fn memory(&self) -> &[u8] {
        &self.memory
    }

    /// Mutable raw device contents, bypassing the page rules.
    pub fn memory_mut(&mut self) -> &mut [u8] {
        &mut self.memory
    }

    fn check(&self, addr: u64, len: usize) -> Result<usize, RamDeviceError> {
        if !self.initialized {
            return Err(RamDeviceError::NotInitialized);
        }
        if self.page_size == 0 || addr % self.page_size as u64 != 0 || len != self.page_size {
            return Err(RamDeviceError::Misaligned { addr, len });
        }

        let start = usize::try_from(addr).map_err(|_| RamDeviceError::OutOfBounds { addr, len })?;
        match start.checked_add(len) {
            Some(end) if end <= self.memory.len() => Ok(start),
            _ => Err(RamDeviceError::OutOfBounds { addr, len }),
        }
    }
}

impl PageDevice for RamDevice {
    type Error = RamDeviceError;

    fn init(&mut self) -> Result<(), Self::Error> {
        self.initialized = true;
        Ok(())
    }

    fn page_size(&self) -> usize {
        self.page_size
    }

    fn total_size(&self) -> u64 {
        self.memory.len() as u64
    }

    fn read(&mut self, addr: u64, dest: &mut [u8]) -> Result<(), Self::Error> {
        let start = self.check(addr, dest.len())?;
        dest.copy_from_slice(&self.memory[start..start + dest.len()]);
        Ok(())
    }

    fn program(&mut self, addr: u64, src: &[u8]) -> Result<(), Self::Error> {
        let start = self.check(addr, src.len())?;
        self.memory[start..start + src.len()].copy_from_slice(src);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_erased() {
        let device = RamDevice::new(16, 4);

        assert_eq!(device.total_size(), 64);
        assert_eq!(device.page_size(), 16);
        assert!(device.memory().iter().all(|&b| b == ERASE_VALUE));
    }

    #[test]
    fn test_requires_init() {
        let mut device = RamDevice::new(16, 4);

        assert_eq!(
            device.read(0, &mut [0u8; 16]),
            Err(RamDeviceError::NotInitialized)
        );

        device.init().unwrap();
        assert!(device.is_initialized());
        assert!(device.read(0, &mut [0u8; 16]).is_ok());
    }

    #[test]
    fn test_rejects_misaligned_access() {
        let mut device = RamDevice::new(16, 4);
        device.init().unwrap();

        assert_eq!(
            device.program(8, &[0u8; 16]),
            Err(RamDeviceError::Misaligned { addr: 8, len: 16 })
        );
        assert_eq!(
            device.read(16, &mut [0u8; 4]),
            Err(RamDeviceError::Misaligned { addr: 16, len: 4 })
        );
    }

    #[test]
    fn test_rejects_out_of_bounds() {
        let mut device = RamDevice::new(16, 4);
        device.init().unwrap();

        assert_eq!(
            device.read(64, &mut [0u8; 16]),
            Err(RamDeviceError::OutOfBounds { addr: 64, len: 16 })
        );
    }

    #[test]
    fn test_program_then_read() {
        let mut device = RamDevice::new(16, 4);
        device.init().unwrap();

        device.program(32, &[7u8; 16]).unwrap();

        let mut out = [0u8; 16];
        device.read(32, &mut out).unwrap();
        assert_eq!(out, [7u8; 16]);
        assert_eq!(device.memory()[31], ERASE_VALUE);
    }
}
