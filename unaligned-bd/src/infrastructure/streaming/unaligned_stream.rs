//! Byte cursor over an [`UnalignedBlockDevice`].

use crate::{
    domain::{PageDevice, UnalignedBlockDevice, UnalignedError},
    infrastructure::streaming::StreamError,
};
use embedded_io::SeekFrom;

/// Stream over the whole device, with a current position.
///
/// Every write goes straight through to the layer, so `flush` has nothing
/// to do. The stream ends at the device's total size: reads there return 0
/// and writes fail with [`StreamError::OutOfBounds`]. Seeking past the end
/// is allowed.
///
/// Use it through the `embedded_io` or `embedded_io_async` Read, Write and
/// Seek traits.
///
/// # Examples
///
/// ```
/// use embedded_io::{Read, Seek, SeekFrom, Write};
/// use unaligned_bd::{RamDevice, UnalignedBlockDevice, UnalignedStream};
///
/// let mut bd = UnalignedBlockDevice::new(RamDevice::new(528, 4));
/// bd.init().unwrap();
///
/// let mut stream = UnalignedStream::new(bd);
/// stream.write_all(b"log entry").unwrap();
/// stream.seek(SeekFrom::Start(0)).unwrap();
///
/// let mut out = [0u8; 9];
/// stream.read_exact(&mut out).unwrap();
/// assert_eq!(&out, b"log entry");
/// ```
pub struct UnalignedStream<D: PageDevice> {
    device: UnalignedBlockDevice<D>,
    position: u64,
}

impl<D: PageDevice> UnalignedStream<D> {
    /// Create a stream positioned at the start of the device.
    ///
    /// The layer should already be initialized; I/O on an uninitialized
    /// layer fails with [`UnalignedError::NotInitialized`].
    pub const fn new(device: UnalignedBlockDevice<D>) -> Self {
        Self {
            device,
            position: 0,
        }
    }

    /// Read from the current position, stopping at the end of the device.
    ///
    /// Note: This method is internal. Users should use the `Read` traits.
    pub(crate) fn read_at_position(&mut self, buf: &mut [u8]) -> Result<usize, StreamError<D::Error>> {
        if buf.is_empty() {
            return Ok(0);
        }

        let size = self.size()?;
        if self.position >= size {
            return Ok(0);
        }

        let len = clamp_len(buf.len(), size - self.position);
        self.device.read(self.position, &mut buf[..len])?;
        self.position += len as u64;

        Ok(len)
    }

    /// Write at the current position, stopping at the end of the device.
    ///
    /// Note: This method is internal. Users should use the `Write` traits.
    pub(crate) fn write_at_position(&mut self, buf: &[u8]) -> Result<usize, StreamError<D::Error>> {
        if buf.is_empty() {
            return Ok(0);
        }

        let size = self.size()?;
        if self.position >= size {
            debug!("stream write at {} past end {}", self.position, size);
            return Err(StreamError::OutOfBounds);
        }

        let len = clamp_len(buf.len(), size - self.position);
        self.device.program(self.position, &buf[..len])?;
        self.position += len as u64;

        Ok(len)
    }

    /// Move the cursor.
    ///
    /// Note: This method is internal. Users should use the `Seek` traits.
    pub(crate) fn seek_position(&mut self, pos: SeekFrom) -> Result<u64, StreamError<D::Error>> {
        let new_pos = match pos {
            SeekFrom::Start(offset) => Some(offset),
            SeekFrom::Current(offset) => self.position.checked_add_signed(offset),
            SeekFrom::End(offset) => self.size()?.checked_add_signed(offset),
        };

        self.position = new_pos.ok_or(StreamError::InvalidSeek)?;
        Ok(self.position)
    }

    /// Get the current position in the stream.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Get the size of the underlying device in bytes.
    pub fn size(&self) -> Result<u64, StreamError<D::Error>> {
        self.device
            .total_size()
            .ok_or(StreamError::Storage(UnalignedError::NotInitialized))
    }

    /// Get a reference to the wrapped layer.
    pub fn get_ref(&self) -> &UnalignedBlockDevice<D> {
        &self.device
    }

    /// Get a mutable reference to the wrapped layer.
    pub fn get_mut(&mut self) -> &mut UnalignedBlockDevice<D> {
        &mut self.device
    }

    /// Consume the stream and return the wrapped layer.
    pub fn into_inner(self) -> UnalignedBlockDevice<D> {
        self.device
    }
}

fn clamp_len(want: usize, remaining: u64) -> usize {
    usize::try_from(remaining).map_or(want, |remaining| want.min(remaining))
}
