//! # Layout-Driven Validation
//!
//! ## Purpose
//!
//! Turns decoded lines plus a resolved layout into ordered diagnostics.
//!
//! ## Architecture
//!
//! ```text
//! Layout::FixedWidth  → StructureValidator → classify → field rules → file checks
//! Layout::Eligibility → ISA first line?    → yes: EDI 834 member loops
//!                                          → no:  tab-delimited rows
//! ```
//!
//! All validators accumulate; none stops at the first finding except where a
//! later check would be meaningless (a wrong delimited header row, a line of
//! the wrong fixed width).

pub mod content;
pub mod delimited;
pub mod edi834;
pub mod field;
pub mod structure;

pub use content::{check_value, is_numeric, is_signed_decimal, matches_date, Violation};
pub use delimited::validate_delimited;
pub use edi834::{is_edi, validate_edi};
pub use field::{check_account, validate_fields};
pub use structure::{LineClasses, StructureValidator};
