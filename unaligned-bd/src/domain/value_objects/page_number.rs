//! Type-safe page index value object.

use core::fmt;

/// Index of a page on the underlying device.
///
/// Page `n` covers the bytes `n * page_size .. (n + 1) * page_size`. Keeping
/// it distinct from byte addresses stops the two from being mixed up in the
/// translation arithmetic.
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageNumber(u64);

impl PageNumber {
    /// Create a new page number.
    ///
    /// # Examples
    ///
    /// ```
    /// use unaligned_bd::domain::PageNumber;
    ///
    /// let page = PageNumber::new(3);
    /// assert_eq!(page.value(), 3);
    /// ```
    #[inline]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Get the underlying index.
    #[inline]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PageNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Page({})", self.0)
    }
}

impl From<u64> for PageNumber {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl From<PageNumber> for u64 {
    fn from(page: PageNumber) -> Self {
        page.value()
    }
}
