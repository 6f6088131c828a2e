//! # Layout Registry
//!
//! Resolves a `(client, category)` pair to the layout that governs it.
//!
//! ## Architecture Role
//!
//! ```text
//! layouts/*.toml ──► schema (parse + invariants) ──► LayoutRegistry
//!                                                        │
//!                          FileValidator::validate ◄─────┘ resolve(client, category)
//! ```
//!
//! The registry is built once and passed to the engine by reference. It is
//! immutable after construction, so it can be shared across threads freely.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use rxfeed_types::{ClientRules, FileCategory, Layout, LayoutFamily};
use serde::Serialize;
use tracing::{debug, info};

use crate::bundled::{BUNDLED_SOURCES, CLIENTS_DOCUMENT};
use crate::error::RegistryError;
use crate::schema::{ClientsFile, LayoutFile};

/// One `(client, category) -> layout` entry, for listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Binding {
    pub client: String,
    pub category: FileCategory,
    pub layout: String,
    pub version: u32,
}

/// Immutable collection of layouts and the client bindings that select them
#[derive(Debug, Clone)]
pub struct LayoutRegistry {
    layouts: HashMap<String, Layout>,
    bindings: HashMap<(String, FileCategory), String>,
    clients: BTreeMap<String, ClientRules>,
    /// Where the documents came from (directory path or `bundled`)
    source: String,
}

impl LayoutRegistry {
    /// Registry built from the layout documents compiled into the binary
    pub fn bundled() -> Result<Self, RegistryError> {
        let mut registry = Self::from_sources(BUNDLED_SOURCES.iter().copied())?;
        registry.source = "bundled".to_string();
        Ok(registry)
    }

    /// Load every `*.toml` in `dir`; `clients.toml` holds the bindings
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, RegistryError> {
        let dir = dir.as_ref();
        let entries = fs::read_dir(dir).map_err(|source| RegistryError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut paths: Vec<PathBuf> = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| RegistryError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("toml") {
                paths.push(path);
            }
        }
        paths.sort();

        let mut documents = Vec::with_capacity(paths.len());
        for path in paths {
            let text = fs::read_to_string(&path).map_err(|source| RegistryError::Io {
                path: path.clone(),
                source,
            })?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            documents.push((name, text));
        }

        let mut registry =
            Self::from_sources(documents.iter().map(|(n, t)| (n.as_str(), t.as_str())))?;
        registry.source = dir.display().to_string();
        Ok(registry)
    }

    /// Build from `(document name, TOML text)` pairs
    pub fn from_sources<'a, I>(sources: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut layouts = HashMap::new();
        let mut clients_file = None;

        for (origin, text) in sources {
            if origin == CLIENTS_DOCUMENT {
                clients_file = Some(ClientsFile::from_toml(origin, text)?);
                continue;
            }
            let layout = LayoutFile::from_toml(origin, text)?.into_layout()?;
            debug!("Loaded layout {} v{} from {}", layout.name(), layout.version(), origin);
            let name = layout.name().to_string();
            if layouts.insert(name.clone(), layout).is_some() {
                return Err(RegistryError::DuplicateLayout(name));
            }
        }

        let clients_file = clients_file.ok_or(RegistryError::MissingClients)?;
        let mut bindings = HashMap::new();
        let mut clients = BTreeMap::new();

        for (client, def) in clients_file.clients {
            for (category_name, layout_name) in &def.layouts {
                let category: FileCategory =
                    category_name
                        .parse()
                        .map_err(|_| RegistryError::UnknownCategory {
                            client: client.clone(),
                            category: category_name.clone(),
                        })?;
                if !layouts.contains_key(layout_name) {
                    return Err(RegistryError::UnknownLayout {
                        client: client.clone(),
                        category,
                        layout: layout_name.clone(),
                    });
                }
                bindings.insert((client.clone(), category), layout_name.clone());
            }
            clients.insert(
                client.clone(),
                ClientRules {
                    name: client,
                    account_prefix: def.account_prefix,
                    eligibility_filename_pattern: def.eligibility_filename_pattern,
                },
            );
        }

        info!(
            "📐 Layout registry ready: {} layouts, {} bindings, {} clients",
            layouts.len(),
            bindings.len(),
            clients.len()
        );

        Ok(Self {
            layouts,
            bindings,
            clients,
            source: "inline".to_string(),
        })
    }

    /// Layout bound to `(client, category)`; client names match exactly
    pub fn resolve(&self, client: &str, category: FileCategory) -> Result<&Layout, RegistryError> {
        self.bindings
            .get(&(client.to_string(), category))
            .and_then(|name| self.layouts.get(name))
            .ok_or_else(|| RegistryError::NotRegistered {
                client: client.to_string(),
                category,
            })
    }

    /// Like [`resolve`](Self::resolve) but requires a fixed-width family
    pub fn resolve_family(
        &self,
        client: &str,
        category: FileCategory,
    ) -> Result<&LayoutFamily, RegistryError> {
        match self.resolve(client, category)? {
            Layout::FixedWidth(family) => Ok(family),
            Layout::Eligibility(layout) => Err(RegistryError::NotFixedWidth {
                client: client.to_string(),
                layout: layout.name.clone(),
            }),
        }
    }

    pub fn layout(&self, name: &str) -> Option<&Layout> {
        self.layouts.get(name)
    }

    pub fn client(&self, name: &str) -> Option<&ClientRules> {
        self.clients.get(name)
    }

    pub fn clients(&self) -> impl Iterator<Item = &ClientRules> {
        self.clients.values()
    }

    /// All bindings, sorted by client then category
    pub fn bindings(&self) -> Vec<Binding> {
        let mut out: Vec<Binding> = self
            .bindings
            .iter()
            .filter_map(|((client, category), name)| {
                self.layouts.get(name).map(|layout| Binding {
                    client: client.clone(),
                    category: *category,
                    layout: name.clone(),
                    version: layout.version(),
                })
            })
            .collect();
        out.sort_by(|a, b| (&a.client, a.category).cmp(&(&b.client, b.category)));
        out
    }

    pub fn layout_count(&self) -> usize {
        self.layouts.len()
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rxfeed_types::{AccountMatch, RecordType};
    use std::fs;
    use tempfile::tempdir;

    const FLAT: &str = r#"
name = "flat"
format = "fixed"
account_field = "account"
[[records]]
type = "detail"
fields = [
    { name = "id", type = "N", from = 1, to = 3, length = 3 },
    { name = "account", type = "A/N", from = 4, to = 8, length = 5 },
]
"#;

    const CLIENTS: &str = r#"
[clients.ACME]
account_prefix = "AC"
[clients.ACME.layouts]
claims = "flat"
"#;

    #[test]
    fn test_bundled_registry_loads() {
        let registry = LayoutRegistry::bundled().unwrap();
        assert_eq!(registry.source(), "bundled");
        assert_eq!(registry.layout_count(), 6);

        let claims = registry.resolve_family("ALLIED", FileCategory::Claims).unwrap();
        assert_eq!(claims.name, "trx_claims");
        assert_eq!(claims.record_length, Some(1251));

        let umr = registry.resolve_family("UMR", FileCategory::Accumulator).unwrap();
        assert!(umr.is_tagged());
        assert_eq!(umr.detail_width(), 500);
        assert_eq!(umr.layout_for_tag("3").unwrap().record_type, RecordType::Trailer);

        let night = registry.resolve_family("UMR", FileCategory::Accumulator10pm).unwrap();
        assert_eq!(night.name, "umr_accumulator");

        let asr = registry.resolve_family("ASR", FileCategory::Accumulator10pm).unwrap();
        assert_eq!(asr.account_match, Some(AccountMatch::Exact));

        assert!(matches!(
            registry.resolve("ALLIED", FileCategory::Eligibility).unwrap(),
            Layout::Eligibility(_)
        ));
    }

    #[test]
    fn test_unknown_pair_is_not_registered() {
        let registry = LayoutRegistry::bundled().unwrap();
        let err = registry.resolve("LUCENT", FileCategory::Accumulator).unwrap_err();
        assert_eq!(
            err.to_string(),
            "No validation layout defined for client 'LUCENT' and category 'accumulator'."
        );
        assert!(registry.resolve("allied", FileCategory::Claims).is_err());
    }

    #[test]
    fn test_eligibility_is_not_a_family() {
        let registry = LayoutRegistry::bundled().unwrap();
        assert!(matches!(
            registry.resolve_family("ASR", FileCategory::Eligibility),
            Err(RegistryError::NotFixedWidth { .. })
        ));
    }

    #[test]
    fn test_bindings_listing_sorted() {
        let registry = LayoutRegistry::bundled().unwrap();
        let bindings = registry.bindings();
        assert_eq!(bindings.len(), 11);
        assert_eq!(bindings[0].client, "ALLIED");
        assert_eq!(bindings[0].category, FileCategory::Claims);
        assert!(bindings
            .iter()
            .any(|b| b.client == "UMR" && b.layout == "umr_accumulator" && b.version == 3));
    }

    #[test]
    fn test_client_rules_exposed() {
        let registry = LayoutRegistry::bundled().unwrap();
        let umr = registry.client("UMR").unwrap();
        assert_eq!(umr.allowed_accounts().len(), 3);
        assert_eq!(registry.clients().count(), 4);
    }

    #[test]
    fn test_from_dir() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("flat.toml"), FLAT).unwrap();
        fs::write(dir.path().join("clients.toml"), CLIENTS).unwrap();
        fs::write(dir.path().join("README.md"), "ignored").unwrap();

        let registry = LayoutRegistry::from_dir(dir.path()).unwrap();
        assert_eq!(registry.layout_count(), 1);
        assert_eq!(registry.resolve("ACME", FileCategory::Claims).unwrap().name(), "flat");
    }

    #[test]
    fn test_missing_dir_is_io_error() {
        let dir = tempdir().unwrap();
        let err = LayoutRegistry::from_dir(dir.path().join("absent")).unwrap_err();
        assert!(matches!(err, RegistryError::Io { .. }));
    }

    #[test]
    fn test_binding_to_unknown_layout_rejected() {
        let clients = CLIENTS.replace("claims = \"flat\"", "claims = \"missing\"");
        let sources = [("flat.toml", FLAT), ("clients.toml", clients.as_str())];
        let err = LayoutRegistry::from_sources(sources).unwrap_err();
        assert!(matches!(err, RegistryError::UnknownLayout { .. }));
    }

    #[test]
    fn test_duplicate_layout_rejected() {
        let err = LayoutRegistry::from_sources([
            ("a.toml", FLAT),
            ("b.toml", FLAT),
            ("clients.toml", CLIENTS),
        ])
        .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateLayout(name) if name == "flat"));
    }

    #[test]
    fn test_unknown_category_rejected() {
        let clients = CLIENTS.replace("claims = \"flat\"", "remittance = \"flat\"");
        let sources = [("flat.toml", FLAT), ("clients.toml", clients.as_str())];
        let err = LayoutRegistry::from_sources(sources).unwrap_err();
        assert!(matches!(err, RegistryError::UnknownCategory { .. }));
    }

    #[test]
    fn test_missing_clients_document() {
        let err = LayoutRegistry::from_sources([("flat.toml", FLAT)]).unwrap_err();
        assert!(matches!(err, RegistryError::MissingClients));
    }
}
