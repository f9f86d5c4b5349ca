//! Infrastructure layer - high-level I/O utilities built on the domain.
//!
//! This module provides a streaming wrapper around the unaligned layer,
//! adding Read/Write/Seek capabilities (blocking and async) for integration
//! with higher-level file systems and I/O frameworks.

pub mod streaming;
