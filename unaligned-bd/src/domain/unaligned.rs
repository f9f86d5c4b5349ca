//! UnalignedBlockDevice domain service - byte-granular access over page I/O.
//!
//! This module contains the `UnalignedBlockDevice` service which turns reads,
//! programs and erases at arbitrary byte addresses into whole-page device
//! operations, staged through a single page buffer.

use crate::domain::{
    entities::PageCache,
    error::UnalignedError,
    ports::PageDevice,
    value_objects::{PageGeometry, PageNumber},
};

/// Value every byte of an erased page reads back as.
pub const ERASE_VALUE: u8 = 0xFF;

/// Byte-addressable access to a device that only reads and programs pages.
///
/// `UnalignedBlockDevice` is the core domain service. It:
/// - splits every request into per-page spans
/// - reads, patches and programs back whole pages (read-modify-write)
/// - emulates erase by programming pages full of [`ERASE_VALUE`]
/// - remembers which page its buffer holds, so consecutive accesses to the
///   same page skip the device read
///
/// The page buffer is allocated by [`init`](Self::init) and released on
/// re-initialization and on drop. Until `init` succeeds, every data operation
/// fails with [`UnalignedError::NotInitialized`] without touching the device.
///
/// # Concurrency
///
/// All operations take `&mut self` and run to completion on the calling
/// thread. There is no internal locking: callers sharing one instance
/// between threads must serialize access themselves, e.g. with a mutex
/// around the whole layer.
///
/// # Failures
///
/// Device errors are returned as [`UnalignedError::Device`] at the first
/// failing page. Pages already programmed or erased by the same call stay
/// that way; nothing is rolled back or retried.
///
/// # Examples
///
/// ```
/// use unaligned_bd::{RamDevice, UnalignedBlockDevice};
///
/// let mut bd = UnalignedBlockDevice::new(RamDevice::new(528, 4));
/// bd.init().unwrap();
///
/// // Crosses from page 0 into page 1
/// bd.program(500, b"straddling the boundary").unwrap();
///
/// let mut out = [0u8; 23];
/// bd.read(500, &mut out).unwrap();
/// assert_eq!(&out, b"straddling the boundary");
/// ```
pub struct UnalignedBlockDevice<D: PageDevice> {
    device: D,
    state: Option<Ready>,
}

// Present exactly while the layer is initialized
struct Ready {
    geometry: PageGeometry,
    cache: PageCache,
}

impl<D: PageDevice> UnalignedBlockDevice<D> {
    /// Wrap a device. Nothing is allocated and the device is not touched
    /// until [`init`](Self::init) is called.
    pub const fn new(device: D) -> Self {
        Self {
            device,
            state: None,
        }
    }

    /// Initialize the device and allocate the page buffer.
    ///
    /// Any buffer from a previous `init` is released first. The device's own
    /// `init` runs next; only if it succeeds are the page size and total size
    /// queried and a buffer of one page allocated, with no page cached.
    ///
    /// # Errors
    ///
    /// - [`UnalignedError::Device`] with the device's init error, unchanged
    /// - [`UnalignedError::InvalidPageSize`] if the device reports a zero page size
    /// - [`UnalignedError::NoMemory`] if the buffer cannot be allocated
    ///
    /// On error the layer is left uninitialized.
    pub fn init(&mut self) -> Result<(), UnalignedError<D::Error>> {
        // Release first, the device may come back with another page size
        self.state = None;

        self.device.init().map_err(|e| {
            warn!("device init failed");
            UnalignedError::Device(e)
        })?;

        let geometry = PageGeometry::new(self.device.page_size(), self.device.total_size())
            .map_err(UnalignedError::InvalidPageSize)?;

        let cache = PageCache::try_new(geometry.page_size()).map_err(|_| {
            warn!("cannot allocate {} byte page buffer", geometry.page_size());
            UnalignedError::NoMemory
        })?;

        debug!(
            "initialized: page_size={} total_size={}",
            geometry.page_size(),
            geometry.total_size()
        );

        self.state = Some(Ready { geometry, cache });
        Ok(())
    }

    /// Read `dest.len()` bytes starting at byte address `addr`.
    ///
    /// Each page the range touches is read from the device unless it is the
    /// cached page. Read never programs the device. An empty `dest` is a
    /// no-op. Ranges past the end of the device are not checked here and
    /// surface as device errors.
    ///
    /// # Errors
    ///
    /// Returns [`UnalignedError::NotInitialized`] before a successful `init`,
    /// or the first device read error. Bytes of `dest` belonging to pages
    /// before the failing one are already filled in.
    pub fn read(&mut self, addr: u64, dest: &mut [u8]) -> Result<(), UnalignedError<D::Error>> {
        let Ready { geometry, cache } = self.state.as_mut().ok_or(UnalignedError::NotInitialized)?;

        trace!("read addr={} size={}", addr, dest.len());

        let mut done = 0;
        for span in geometry.spans(addr, dest.len()) {
            trace!("reading from {} offset={} len={}", span.page, span.offset, span.len);

            load_page(&mut self.device, geometry, cache, span.page)?;
            let copied = cache.copy_out(span.offset, &mut dest[done..done + span.len]);
            debug_assert_eq!(copied, span.len);

            done += span.len;
        }

        Ok(())
    }

    /// Program `src` starting at byte address `addr`.
    ///
    /// Every page the range touches is brought into the buffer (from the
    /// cache when possible), patched with its share of `src` and programmed
    /// back as a whole page, so bytes outside the range keep their value. An
    /// empty `src` is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`UnalignedError::NotInitialized`] before a successful `init`,
    /// or the first device read or program error. Pages programmed before
    /// the failing one keep their new contents.
    pub fn program(&mut self, addr: u64, src: &[u8]) -> Result<(), UnalignedError<D::Error>> {
        let Ready { geometry, cache } = self.state.as_mut().ok_or(UnalignedError::NotInitialized)?;

        trace!("program addr={} size={}", addr, src.len());

        let mut done = 0;
        for span in geometry.spans(addr, src.len()) {
            trace!("writing to {} offset={} len={}", span.page, span.offset, span.len);

            load_page(&mut self.device, geometry, cache, span.page)?;
            let copied = cache.copy_in(span.offset, &src[done..done + span.len]);
            debug_assert_eq!(copied, span.len);

            // The buffer is ahead of the device until the program lands
            cache.invalidate();
            self.device
                .program(geometry.page_address(span.page), cache.data())
                .map_err(|e| {
                    warn!("device program failed at {}", span.page);
                    UnalignedError::Device(e)
                })?;
            cache.mark_cached(span.page);

            done += span.len;
        }

        Ok(())
    }

    /// Erase the pages covering `[addr, addr + size)`.
    ///
    /// Every byte of each covered page is programmed to [`ERASE_VALUE`],
    /// including bytes of partially covered first and last pages. The pages
    /// are `addr / page_size` up to and including the page holding byte
    /// `addr + size - 1`; a zero `size` erases nothing.
    ///
    /// The page buffer is used for the fill pattern, so the cached page is
    /// forgotten whenever at least one page gets erased.
    ///
    /// # Errors
    ///
    /// Returns [`UnalignedError::NotInitialized`] before a successful `init`,
    /// or the first device program error. Pages erased before the failing
    /// one stay erased.
    pub fn erase(&mut self, addr: u64, size: u64) -> Result<(), UnalignedError<D::Error>> {
        let Ready { geometry, cache } = self.state.as_mut().ok_or(UnalignedError::NotInitialized)?;

        let range = geometry.erase_range(addr, size);
        debug!(
            "erase addr={} size={} pages {}..{}",
            addr,
            size,
            range.start(),
            range.end()
        );

        if range.is_empty() {
            return Ok(());
        }

        cache.fill(ERASE_VALUE);
        for page in range.pages() {
            self.device
                .program(geometry.page_address(page), cache.data())
                .map_err(|e| {
                    warn!("device program failed erasing {}", page);
                    UnalignedError::Device(e)
                })?;
        }

        Ok(())
    }

    /// Check whether `init` has succeeded and the page buffer exists.
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.state.is_some()
    }

    /// Page layout picked up by the last successful `init`.
    pub fn geometry(&self) -> Option<PageGeometry> {
        self.state.as_ref().map(|ready| ready.geometry)
    }

    /// Page size in bytes, or `None` while uninitialized.
    pub fn page_size(&self) -> Option<usize> {
        self.geometry().map(|g| g.page_size())
    }

    /// Total device size in bytes, or `None` while uninitialized.
    pub fn total_size(&self) -> Option<u64> {
        self.geometry().map(|g| g.total_size())
    }

    /// The page whose contents the buffer currently holds, if any.
    pub fn cached_page(&self) -> Option<PageNumber> {
        self.state.as_ref().and_then(|ready| ready.cache.cached_page())
    }

    /// Forget the cached page, forcing the next access to re-read it.
    ///
    /// Needed after the device was changed behind the layer's back, e.g.
    /// through [`device_mut`](Self::device_mut).
    pub fn invalidate_cache(&mut self) {
        if let Some(ready) = self.state.as_mut() {
            ready.cache.invalidate();
        }
    }

    /// Get a reference to the underlying device.
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Get a mutable reference to the underlying device.
    ///
    /// I/O done through this reference bypasses the page cache; call
    /// [`invalidate_cache`](Self::invalidate_cache) afterwards if it touched
    /// the data region.
    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    /// Release the page buffer and return the underlying device.
    pub fn into_inner(self) -> D {
        self.device
    }
}

/// Bring `page` into the buffer unless it is already there.
fn load_page<D: PageDevice>(
    device: &mut D,
    geometry: &PageGeometry,
    cache: &mut PageCache,
    page: PageNumber,
) -> Result<(), UnalignedError<D::Error>> {
    if cache.holds(page) {
        return Ok(());
    }

    // A failed read may leave the buffer half overwritten
    cache.invalidate();
    device
        .read(geometry.page_address(page), cache.data_mut())
        .map_err(|e| {
            warn!("device read failed at {}", page);
            UnalignedError::Device(e)
        })?;
    cache.mark_cached(page);

    Ok(())
}
