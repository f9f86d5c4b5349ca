//! Page geometry value object and the address arithmetic built on it.

use super::PageNumber;

/// Page layout reported by the underlying device.
///
/// Holds the page size and the total addressable size, and translates byte
/// addresses into pages:
/// - `locate` splits an address into page and in-page offset
/// - `spans` splits a byte range into per-page pieces
/// - `erase_range` picks the pages an erase request covers
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageGeometry {
    page_size: usize,
    total_size: u64,
}

impl PageGeometry {
    /// Create a geometry from the device's page size and total size.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroPageSize`] if `page_size` is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use unaligned_bd::domain::PageGeometry;
    ///
    /// let geometry = PageGeometry::new(528, 2112).unwrap();
    /// assert_eq!(geometry.page_count(), 4);
    /// ```
    pub const fn new(page_size: usize, total_size: u64) -> Result<Self, GeometryError> {
        if page_size == 0 {
            return Err(GeometryError::ZeroPageSize);
        }

        Ok(Self {
            page_size,
            total_size,
        })
    }

    /// Get the page size in bytes.
    #[inline]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Get the total device size in bytes.
    #[inline]
    pub const fn total_size(&self) -> u64 {
        self.total_size
    }

    /// Number of whole pages on the device.
    #[inline]
    pub const fn page_count(&self) -> u64 {
        self.total_size / self.page_size as u64
    }

    /// Split a byte address into its page and the offset inside that page.
    ///
    /// # Examples
    ///
    /// ```
    /// use unaligned_bd::domain::PageGeometry;
    ///
    /// let geometry = PageGeometry::new(528, 2112).unwrap();
    /// let (page, offset) = geometry.locate(600);
    /// assert_eq!(page.value(), 1);
    /// assert_eq!(offset, 72);
    /// ```
    #[inline]
    pub const fn locate(&self, addr: u64) -> (PageNumber, usize) {
        split_address(addr, self.page_size)
    }

    /// Byte address of the first byte of `page`.
    #[inline]
    pub const fn page_address(&self, page: PageNumber) -> u64 {
        page.value().saturating_mul(self.page_size as u64)
    }

    /// Split `[addr, addr + len)` into per-page spans, in address order.
    pub const fn spans(&self, addr: u64, len: usize) -> PageSpans {
        PageSpans {
            page_size: self.page_size,
            addr,
            remaining: len,
        }
    }

    /// Pages touched by an erase of `[addr, addr + len)`.
    ///
    /// The range is half-open: it starts at the page containing `addr` and
    /// ends after the page containing the last byte of the request. A zero
    /// length touches no page.
    ///
    /// # Examples
    ///
    /// ```
    /// use unaligned_bd::domain::PageGeometry;
    ///
    /// let geometry = PageGeometry::new(528, 2112).unwrap();
    /// assert_eq!(geometry.erase_range(0, 528).len(), 1);
    /// assert_eq!(geometry.erase_range(100, 600).len(), 2);
    /// assert!(geometry.erase_range(100, 0).is_empty());
    /// ```
    pub const fn erase_range(&self, addr: u64, len: u64) -> PageRange {
        let start = addr / self.page_size as u64;
        if len == 0 {
            return PageRange { start, end: start };
        }

        let end = addr.saturating_add(len).div_ceil(self.page_size as u64);
        PageRange { start, end }
    }
}

// page_size is non-zero, PageGeometry::new guarantees it
const fn split_address(addr: u64, page_size: usize) -> (PageNumber, usize) {
    let page = addr / page_size as u64;
    let offset = (addr % page_size as u64) as usize;
    (PageNumber::new(page), offset)
}

/// Errors that can occur when creating a [`PageGeometry`].
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryError {
    /// The device reported a page size of zero.
    ZeroPageSize,
}

impl core::fmt::Display for GeometryError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ZeroPageSize => write!(f, "Page size cannot be zero"),
        }
    }
}

impl core::error::Error for GeometryError {}

/// The part of a byte range that falls inside a single page.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSpan {
    /// Page holding this span.
    pub page: PageNumber,
    /// Offset of the first byte inside the page.
    pub offset: usize,
    /// Number of bytes in the span, never more than `page_size - offset`.
    pub len: usize,
}

/// Iterator over the [`PageSpan`]s of a byte range.
///
/// Created by [`PageGeometry::spans`].
#[derive(Debug, Clone)]
pub struct PageSpans {
    page_size: usize,
    addr: u64,
    remaining: usize,
}

impl Iterator for PageSpans {
    type Item = PageSpan;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }

        let (page, offset) = split_address(self.addr, self.page_size);
        let len = (self.page_size - offset).min(self.remaining);

        self.addr = self.addr.saturating_add(len as u64);
        self.remaining -= len;

        Some(PageSpan { page, offset, len })
    }
}

/// A half-open range of pages, `start..end`.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    start: u64,
    end: u64,
}

impl PageRange {
    /// First page of the range.
    #[inline]
    pub const fn start(&self) -> PageNumber {
        PageNumber::new(self.start)
    }

    /// One past the last page of the range.
    #[inline]
    pub const fn end(&self) -> PageNumber {
        PageNumber::new(self.end)
    }

    /// Number of pages in the range.
    #[inline]
    pub const fn len(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }

    /// Whether the range covers no page.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Iterate over the pages in the range.
    pub fn pages(&self) -> impl Iterator<Item = PageNumber> + use<> {
        (self.start..self.end).map(PageNumber::new)
    }
}
