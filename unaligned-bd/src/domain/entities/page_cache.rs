//! PageCache entity - the single page-sized scratch buffer of the layer.

use crate::domain::value_objects::PageNumber;

use alloc::collections::TryReserveError;
use alloc::vec::Vec;

/// A one-page buffer together with the page whose contents it holds.
///
/// The buffer is used both as a read cache and as the staging area for
/// read-modify-write programs and erase fills, so it can be in one of two
/// states:
/// - holding the true device contents of a page (`cached_page()` is `Some`)
/// - holding something else, like a fill pattern or a half-applied update
///   (`cached_page()` is `None`)
///
/// The buffer length is fixed at construction and never changes.
pub struct PageCache {
    data: Vec<u8>,
    page: Option<PageNumber>,
}

impl PageCache {
    /// Allocate a zeroed buffer of `page_size` bytes holding no page.
    ///
    /// # Errors
    ///
    /// Returns the allocator's error if the memory cannot be reserved.
    ///
    /// # Examples
    ///
    /// ```
    /// use unaligned_bd::domain::PageCache;
    ///
    /// let cache = PageCache::try_new(528).unwrap();
    /// assert_eq!(cache.len(), 528);
    /// assert!(cache.cached_page().is_none());
    /// ```
    pub fn try_new(page_size: usize) -> Result<Self, TryReserveError> {
        let mut data = Vec::new();
        data.try_reserve_exact(page_size)?;
        data.resize(page_size, 0);

        Ok(Self { data, page: None })
    }

    /// The page whose device contents the buffer currently holds, if any.
    #[inline]
    pub const fn cached_page(&self) -> Option<PageNumber> {
        self.page
    }

    /// Check whether the buffer holds the contents of `page`.
    #[inline]
    pub fn holds(&self, page: PageNumber) -> bool {
        self.page == Some(page)
    }

    /// Record that the buffer now matches the device contents of `page`.
    ///
    /// Only call this once the buffer and the device agree, e.g. after a
    /// successful full-page read or program.
    #[inline]
    pub fn mark_cached(&mut self, page: PageNumber) {
        self.page = Some(page);
    }

    /// Forget which page the buffer holds.
    #[inline]
    pub fn invalidate(&mut self) {
        self.page = None;
    }

    /// Overwrite the whole buffer with `value`.
    ///
    /// The buffer no longer holds any page afterwards.
    pub fn fill(&mut self, value: u8) {
        self.page = None;
        self.data.fill(value);
    }

    /// Get immutable access to the buffer.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Get mutable access to the buffer.
    ///
    /// Callers mutating the buffer are responsible for keeping
    /// `cached_page()` truthful, see [`PageCache::invalidate`].
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Buffer size in bytes, equal to the device page size.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the buffer has zero length.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Copy `source` into the buffer at `offset`.
    ///
    /// Returns the number of bytes copied, which is `source.len()` clipped to
    /// the end of the buffer.
    pub fn copy_in(&mut self, offset: usize, source: &[u8]) -> usize {
        let offset = offset.min(self.data.len());
        let len = source.len().min(self.data.len() - offset);
        self.data[offset..offset + len].copy_from_slice(&source[..len]);
        len
    }

    /// Copy bytes out of the buffer starting at `offset` into `dest`.
    ///
    /// Returns the number of bytes copied, which is `dest.len()` clipped to
    /// the end of the buffer.
    pub fn copy_out(&self, offset: usize, dest: &mut [u8]) -> usize {
        let offset = offset.min(self.data.len());
        let len = dest.len().min(self.data.len() - offset);
        dest[..len].copy_from_slice(&self.data[offset..offset + len]);
        len
    }
}

impl core::fmt::Debug for PageCache {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PageCache")
            .field("len", &self.data.len())
            .field("page", &self.page)
            .finish()
    }
}
