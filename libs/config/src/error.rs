//! Registry load and lookup errors

use std::path::PathBuf;

use rxfeed_types::{FileCategory, LayoutError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Failed to read layout file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse layout document {origin}: {message}")]
    Parse { origin: String, message: String },

    #[error("Layout '{layout}' is invalid: {source}")]
    Field {
        layout: String,
        #[source]
        source: LayoutError,
    },

    #[error("Layout '{layout}' is invalid: {reason}")]
    Invalid { layout: String, reason: String },

    #[error("Layout '{0}' is defined more than once")]
    DuplicateLayout(String),

    #[error("Layout set has no clients.toml")]
    MissingClients,

    #[error("Client {client} binds unknown category '{category}'")]
    UnknownCategory { client: String, category: String },

    #[error("Client {client} binds {category} to unknown layout '{layout}'")]
    UnknownLayout {
        client: String,
        category: FileCategory,
        layout: String,
    },

    #[error("No validation layout defined for client '{client}' and category '{category}'.")]
    NotRegistered {
        client: String,
        category: FileCategory,
    },

    #[error("Layout '{layout}' for client '{client}' is not a fixed-width layout.")]
    NotFixedWidth { client: String, layout: String },
}
