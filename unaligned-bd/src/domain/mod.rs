//! Domain layer - Pure page arithmetic and the unaligned access service.
//!
//! This is the core of the hexagonal architecture. The domain layer contains:
//! - **Entities**: Objects with identity (`PageCache`)
//! - **Value Objects**: Immutable validated data (`PageNumber`, `PageGeometry`)
//! - **Domain Services**: Business logic (`UnalignedBlockDevice`)
//! - **Ports**: Interfaces to the outside world (`PageDevice`)
//! - **Domain Errors**: What the layer itself can fail with (`UnalignedError`)
//!
//! # Hexagonal Architecture
//!
//! ```text
//!     ┌──────────────────────────────────┐
//!     │      Domain Layer (Core)         │
//!     │                                  │
//!     │  ┌────────────────────────────┐  │
//!     │  │  Entities & Value Objects  │  │
//!     │  │  - PageCache, PageGeometry │  │
//!     │  └────────────────────────────┘  │
//!     │              ▲                   │
//!     │              │                   │
//!     │  ┌────────────────────────────┐  │
//!     │  │    Domain Services         │  │
//!     │  │    - UnalignedBlockDevice  │  │
//!     │  └────────────────────────────┘  │
//!     │              │                   │
//!     │              ▼                   │
//!     │  ┌────────────────────────────┐  │
//!     │  │    Ports (Interfaces)      │  │
//!     │  │    - PageDevice            │  │
//!     │  └────────────────────────────┘  │
//!     └──────────────────────────────────┘
//!                    ▲
//!                    │ implemented by
//!                    │
//!     ┌──────────────────────────────────┐
//!     │      Adapter Layer               │
//!     │  - RamDevice                     │
//!     │  - NorFlashDevice                │
//!     └──────────────────────────────────┘
//! ```
//!
//! # Examples
//!
//! ```
//! use unaligned_bd::domain::{PageGeometry, PageNumber};
//!
//! let geometry = PageGeometry::new(528, 2112).unwrap();
//! let pages: Vec<PageNumber> = geometry.spans(100, 600).map(|span| span.page).collect();
//! assert_eq!(pages, [PageNumber::new(0), PageNumber::new(1)]);
//! ```

pub mod entities;
pub mod value_objects;
pub mod ports;
pub mod error;

mod unaligned;

// Re-export commonly used types
pub use entities::PageCache;
pub use value_objects::{GeometryError, PageGeometry, PageNumber, PageRange, PageSpan, PageSpans};
pub use ports::PageDevice;
pub use error::UnalignedError;
pub use unaligned::{UnalignedBlockDevice, ERASE_VALUE};
