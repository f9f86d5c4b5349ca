//! PageDevice port - Secondary (driven) port for page-granular device I/O.
//!
//! This port defines what the unaligned access layer needs from the device
//! driver underneath it. Drivers implement this trait to plug into the layer.

use core::error::Error;

/// Port for devices that can only read and program whole pages.
///
/// This is a **secondary (driven) port** in hexagonal architecture terms.
/// [`UnalignedBlockDevice`](crate::UnalignedBlockDevice) depends on this
/// abstraction, and the adapter layer provides concrete implementations.
///
/// ```text
/// ┌──────────────────────────┐
/// │   Domain Layer           │
/// │ (UnalignedBlockDevice)   │
/// └────────────┬─────────────┘
///              │ depends on
///              ▼
/// ┌──────────────────────────┐
/// │   PageDevice Port        │  ◄── This trait
/// └────────────┬─────────────┘
///              │ implemented by
///              ▼
/// ┌──────────────────────────┐
/// │   Adapter Layer          │
/// │ (RamDevice, NorFlash...) │
/// └──────────────────────────┘
/// ```
///
/// # Alignment
///
/// When called by the unaligned access layer, `read` and `program` always
/// receive a page-aligned `addr` and a buffer of exactly `page_size()` bytes.
/// Implementations may reject anything else.
///
/// The port is also implemented for `&mut T`, so a caller can lend a device
/// to the layer and keep ownership of it.
pub trait PageDevice {
    /// The error type for device operations.
    ///
    /// Errors are passed through the layer to the caller unmodified.
    type Error: Error + 'static;

    /// Prepare the device for I/O.
    ///
    /// Not required to be idempotent, but must accept being called again
    /// when the layer is re-initialized.
    fn init(&mut self) -> Result<(), Self::Error>;

    /// Size in bytes of one page. Must be positive once `init` succeeded.
    fn page_size(&self) -> usize;

    /// Total addressable size of the device in bytes.
    fn total_size(&self) -> u64;

    /// Read `dest.len()` bytes starting at byte address `addr`.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails (I/O error, out of bounds, ...).
    fn read(&mut self, addr: u64, dest: &mut [u8]) -> Result<(), Self::Error>;

    /// Program `src.len()` bytes starting at byte address `addr`.
    ///
    /// # Errors
    ///
    /// Returns an error if the program fails (I/O error, out of bounds, ...).
    fn program(&mut self, addr: u64, src: &[u8]) -> Result<(), Self::Error>;
}

impl<T: PageDevice + ?Sized> PageDevice for &mut T {
    type Error = T::Error;

    #[inline]
    fn init(&mut self) -> Result<(), Self::Error> {
        (**self).init()
    }

    #[inline]
    fn page_size(&self) -> usize {
        (**self).page_size()
    }

    #[inline]
    fn total_size(&self) -> u64 {
        (**self).total_size()
    }

    #[inline]
    fn read(&mut self, addr: u64, dest: &mut [u8]) -> Result<(), Self::Error> {
        (**self).read(addr, dest)
    }

    #[inline]
    fn program(&mut self, addr: u64, src: &[u8]) -> Result<(), Self::Error> {
        (**self).program(addr, src)
    }
}
