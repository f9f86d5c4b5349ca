//! `embedded-storage` byte storage traits for the unaligned layer.
//!
//! The layer already reads and programs at arbitrary byte offsets, with the
//! read-modify-write behavior `Storage::write` asks for, so it can stand in
//! wherever `ReadStorage` / `Storage` are expected.

use embedded_storage::{ReadStorage, Storage};

use crate::domain::{PageDevice, UnalignedBlockDevice, UnalignedError};

impl<D: PageDevice> ReadStorage for UnalignedBlockDevice<D> {
    type Error = UnalignedError<D::Error>;

    fn read(&mut self, offset: u32, bytes: &mut [u8]) -> Result<(), Self::Error> {
        UnalignedBlockDevice::read(self, offset as u64, bytes)
    }

    /// Total device size, or 0 while the layer is not initialized.
    fn capacity(&self) -> usize {
        self.total_size()
            .map(|size| usize::try_from(size).unwrap_or(usize::MAX))
            .unwrap_or(0)
    }
}

impl<D: PageDevice> Storage for UnalignedBlockDevice<D> {
    fn write(&mut self, offset: u32, bytes: &[u8]) -> Result<(), Self::Error> {
        self.program(offset as u64, bytes)
    }
}
