//! # RxFeed Codec - Layout-Driven Validation Engine
//!
//! ## Purpose
//!
//! This crate contains the "Rules" layer of the RxFeed system:
//! - Record classification by record-type tag
//! - Per-field type, date and enumeration checks
//! - File-level structure (header/trailer placement, control counts, filename tokens)
//! - Tab-delimited and EDI 834 eligibility validation
//! - Automatic correction of known-corrupt characters in detail records
//!
//! ## Integration Points
//!
//! - **Layout Registry**: Every check is driven by data resolved from
//!   [`rxfeed_config::LayoutRegistry`]; no position or field name is hard-coded
//! - **Calling Layer**: [`FileValidator`] returns serializable
//!   [`ValidationResult`](rxfeed_types::ValidationResult) and
//!   [`CorrectionResult`](rxfeed_types::CorrectionResult) values
//!
//! ## Architecture Role
//!
//! ```text
//! libs/types → libs/config → [codec] → services/validator
//!     ↑             ↓            ↓              ↓
//! Pure Data    Layout Registry  Rules        CLI / persistence
//! FieldSpec    TOML documents   Diagnostics  JSON reports
//! ```
//!
//! ## What This Crate Contains
//! - **FileValidator**: Entry point binding content, client and category
//! - **StructureValidator**: Fixed-width line and file checks
//! - **Diagnostic**: Typed findings with stable message texts
//! - **Corrector**: Width-preserving special character replacement
//!
//! ## What This Crate Does NOT Contain
//! - Layout definitions (belong in libs/config)
//! - Storage, upload or notification plumbing
//!
//! ## Failure Model
//!
//! Malformed content accumulates [`Diagnostic`]s and never aborts a pass.
//! Configuration problems (unknown client or category) surface as a
//! single-error result, or as an [`EngineError`] from the `try_` entry points.
//!
//! ## Quick Start
//!
//! ```rust
//! use rxfeed_codec::FileValidator;
//! use rxfeed_config::LayoutRegistry;
//!
//! let registry = LayoutRegistry::bundled().unwrap();
//! let validator = FileValidator::new(&registry);
//!
//! let result = validator.validate(b"", "UMR", "accumulator");
//! assert_eq!(result.errors(), ["File is empty."]);
//!
//! let result = validator.validate(b"H", "NOBODY", "claims");
//! assert!(!result.is_valid());
//! ```

pub mod classifier;
pub mod corrector;
pub mod decode;
pub mod diagnostic;
pub mod engine;
pub mod error;
pub mod validation;

pub use classifier::{classify_record, select_layout, ClassificationError};
pub use corrector::{correct_lines, persist_corrected, Correction};
pub use decode::decode_lines;
pub use diagnostic::{render, Diagnostic};
pub use engine::{date_from_filename, FileValidator, ValidationRequest};
pub use error::{EngineError, EngineResult};
pub use validation::StructureValidator;
