//! Implementations of embedded_io and embedded_io_async traits for the stream.
//!
//! The layer underneath is synchronous, so the async impls complete without
//! ever yielding.

use crate::{
    domain::PageDevice,
    infrastructure::streaming::{StreamError, UnalignedStream},
};
use embedded_io::{ErrorType, SeekFrom};

// Shared by both trait families, embedded_io_async re-exports ErrorType
impl<D: PageDevice> ErrorType for UnalignedStream<D> {
    type Error = StreamError<D::Error>;
}

impl<D: PageDevice> embedded_io::Read for UnalignedStream<D> {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.read_at_position(buf)
    }
}

impl<D: PageDevice> embedded_io::Write for UnalignedStream<D> {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.write_at_position(buf)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl<D: PageDevice> embedded_io::Seek for UnalignedStream<D> {
    fn seek(&mut self, pos: SeekFrom) -> Result<u64, Self::Error> {
        self.seek_position(pos)
    }
}

impl<D: PageDevice> embedded_io_async::Read for UnalignedStream<D> {
    async fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        self.read_at_position(buf)
    }
}

impl<D: PageDevice> embedded_io_async::Write for UnalignedStream<D> {
    async fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.write_at_position(buf)
    }

    async fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl<D: PageDevice> embedded_io_async::Seek for UnalignedStream<D> {
    async fn seek(&mut self, pos: SeekFrom) -> Result<u64, Self::Error> {
        self.seek_position(pos)
    }
}
