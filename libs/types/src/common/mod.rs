//! Shared building blocks: layout errors and the byte-range value type.

pub mod errors;
pub mod range;
