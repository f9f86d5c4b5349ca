//! Value objects for the domain layer.
//!
//! Value objects are immutable, validated data types that represent
//! concepts in the domain model. They provide type safety and encapsulate
//! the address arithmetic.

mod page_number;
mod page_geometry;

pub use page_number::PageNumber;
pub use page_geometry::{GeometryError, PageGeometry, PageRange, PageSpan, PageSpans};
