//! # Layout Model
//!
//! Declarative description of fixed-width and delimited records:
//!
//! - [`field`]: one column (`FieldSpec` for fixed-width, `ColumnSpec` for delimited)
//! - [`family`]: sibling record layouts (header/detail/trailer) and eligibility layouts
//! - [`client`]: per-client account-code rules

pub mod client;
pub mod family;
pub mod field;
