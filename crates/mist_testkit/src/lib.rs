//! # mist testkit
//!
//! Test utilities for the import splitter.
//!
//! This crate provides:
//! - Source archive fixtures built in temporary directories
//! - Readers that open output segments for assertions
//! - Record builders and property-based generators
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mist_testkit::prelude::*;
//!
//! #[test]
//! fn splits_three_records() {
//!     let fixture = SplitFixture::new(
//!         SourceArchiveBuilder::new()
//!             .record(user_record("a"))
//!             .attachment("a.png", b"png"),
//!     );
//!     // ... run the splitter with fixture.source() and fixture.prefix()
//!     let segments = fixture.read_outputs();
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
}

pub use fixtures::*;
pub use generators::*;
