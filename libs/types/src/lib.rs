//! # RxFeed Types Library
//!
//! Pure data model for layout-driven validation of pharmacy-benefit data files
//! (claims, accumulators, eligibility).
//!
//! ## Design Philosophy
//!
//! - **Immutable Layouts**: Field and record layouts are built once when the
//!   registry loads and never change afterwards
//! - **Centralized Offsets**: 1-based inclusive positions from vendor layout
//!   documents are converted to 0-based [`ByteRange`] values in exactly one place
//! - **Tagged Types**: Field types are enums, never free-text tags compared by prefix
//! - **Derived Validity**: [`ValidationResult::is_valid`] is computed from the
//!   error list and cannot be set independently
//!
//! ## Architecture Role
//!
//! ```text
//! libs/types → libs/config → libs/codec → services/validator
//!     ↑             ↓             ↓              ↓
//! Pure Data    Layout Registry  Validation     CLI / calling layer
//! FieldSpec    TOML loading     Correction     Persistence
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use rxfeed_types::{ByteRange, ValidationResult};
//!
//! let account = ByteRange::from_positions(82, 111).unwrap();
//! assert_eq!(account.len(), 30);
//! assert_eq!(account.to_string(), "82-111");
//!
//! let result = ValidationResult::from_errors(Vec::new());
//! assert!(result.is_valid());
//! ```

pub mod common;
pub mod layout;
pub mod result;

pub use common::errors::LayoutError;
pub use common::range::ByteRange;
pub use layout::client::{AccountMatch, ClientRules};
pub use layout::family::{
    EdiRules, EligibilityLayout, FileCategory, FilenameToken, Layout, LayoutFamily,
    RecordLayout, RecordType,
};
pub use layout::field::{ColumnSpec, DateFormat, FieldRules, FieldSpec, LogicalType, NumericMode};
pub use result::{CorrectionResult, ValidationResult};
