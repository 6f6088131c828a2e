//! Result rendering and output locations for the CLI

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rxfeed_config::{Binding, LayoutRegistry};
use rxfeed_types::FileCategory;
use serde::Serialize;

/// Print `value` as one JSON document on stdout
pub fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    write_json(&mut handle, value, pretty)
}

pub fn write_json<W: Write, T: Serialize>(writer: &mut W, value: &T, pretty: bool) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *writer, value)
    } else {
        serde_json::to_writer(&mut *writer, value)
    }
    .context("Failed to serialize result")?;
    writeln!(writer).context("Failed to write result")?;
    Ok(())
}

/// Where corrected content goes: explicit path, else `<output_dir>/<stem>_corrected.<ext>`
pub fn corrected_path(
    explicit: Option<&Path>,
    output_dir: Option<&Path>,
    input: &Path,
) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    let dir = output_dir?;
    let stem = input.file_stem()?.to_string_lossy();
    let name = match input.extension() {
        Some(ext) => format!("{}_corrected.{}", stem, ext.to_string_lossy()),
        None => format!("{}_corrected", stem),
    };
    Some(dir.join(name))
}

/// Clients bound to one category
#[derive(Debug, Serialize)]
pub struct CategoryClients {
    pub category: FileCategory,
    pub clients: Vec<String>,
}

/// Registry contents as shown by the `layouts` command
#[derive(Debug, Serialize)]
pub struct LayoutListing {
    pub source: String,
    pub layouts: usize,
    /// Every known category, including those no client is bound to
    pub categories: Vec<CategoryClients>,
    pub bindings: Vec<Binding>,
}

impl LayoutListing {
    pub fn from_registry(registry: &LayoutRegistry) -> Self {
        let bindings = registry.bindings();
        let categories = FileCategory::ALL
            .iter()
            .map(|&category| CategoryClients {
                category,
                clients: bindings
                    .iter()
                    .filter(|b| b.category == category)
                    .map(|b| b.client.clone())
                    .collect(),
            })
            .collect();
        Self {
            source: registry.source().to_string(),
            layouts: registry.layout_count(),
            categories,
            bindings,
        }
    }
}
