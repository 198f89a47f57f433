//! CLI command implementations.

pub mod inspect;
pub mod size;
pub mod split;
