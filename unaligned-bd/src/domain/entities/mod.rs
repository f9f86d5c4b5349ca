//! Domain entities for the unaligned access layer.
//!
//! Entities are objects that have identity and lifecycle. In this domain,
//! the only entity is the `PageCache`, the one-page buffer that lives as
//! long as the layer stays initialized.

mod page_cache;

pub use page_cache::PageCache;
