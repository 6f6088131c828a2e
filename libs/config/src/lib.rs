//! # RxFeed Layout Registry and Settings
//!
//! Declarative layout documents and the registry that serves them. Layouts
//! live as TOML under `layouts/`, are embedded into the binary at build time,
//! and can be replaced at runtime by pointing the engine at a directory.
//!
//! ## Features
//!
//! - **Layout Registry**: `(client, category)` to layout resolution
//! - **Load-time Invariants**: ranges, widths, tags and bindings are checked once
//! - **Engine Settings**: TOML file plus `RXFEED_*` environment overrides
//!
//! ## Usage
//!
//! ```rust
//! use rxfeed_config::LayoutRegistry;
//! use rxfeed_types::FileCategory;
//!
//! let registry = LayoutRegistry::bundled().unwrap();
//! let layout = registry.resolve("UMR", FileCategory::Accumulator).unwrap();
//! assert_eq!(layout.name(), "umr_accumulator");
//! ```

pub mod bundled;
pub mod error;
pub mod registry;
pub mod schema;
pub mod settings;

pub use error::RegistryError;
pub use registry::{Binding, LayoutRegistry};
pub use settings::{load_settings, EngineSettings};
