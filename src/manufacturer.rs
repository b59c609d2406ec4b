// src/manufacturer.rs
//! IC manufacturer codes (ISO/IEC 7816-6) to vendor names.
//!
//! The table is keyed by the decimal form of the code. A code that is not in
//! the table, or a table that failed to load, resolves to that decimal string.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use lazy_static::lazy_static;
use log::{debug, warn};

const BUNDLED_TABLE: &str = include_str!("../assets/manufacturer_codes.json");

lazy_static! {
    static ref BUNDLED: ManufacturerRegistry = ManufacturerRegistry::from_json(BUNDLED_TABLE);
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManufacturerRegistry {
    names: HashMap<String, String>,
}

impl ManufacturerRegistry {
    /// The table shipped with the binary.
    pub fn bundled() -> &'static ManufacturerRegistry {
        &BUNDLED
    }

    /// Loads an override table from disk, or clones the bundled one when no
    /// path is given. Read or parse failures yield an empty registry.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::bundled().clone();
        };

        match fs::read_to_string(path) {
            Ok(contents) => Self::from_json(&contents),
            Err(err) => {
                warn!(
                    "Could not read manufacturer table {}: {}",
                    path.display(),
                    err
                );
                Self::default()
            }
        }
    }

    pub fn from_json(contents: &str) -> Self {
        match serde_json::from_str::<HashMap<String, String>>(contents) {
            Ok(names) => {
                debug!("Loaded {} manufacturer names", names.len());
                Self { names }
            }
            Err(err) => {
                warn!("Ignoring malformed manufacturer table: {}", err);
                Self::default()
            }
        }
    }

    pub fn resolve(&self, code: u32) -> String {
        let key = code.to_string();
        match self.names.get(&key) {
            Some(name) => name.clone(),
            None => key,
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn bundled_table_resolves_known_vendors() {
        let registry = ManufacturerRegistry::bundled();
        assert!(!registry.is_empty());
        assert_eq!(registry.resolve(4), "NXP Semiconductors");
        assert_eq!(registry.resolve(7), "Texas Instruments");
    }

    #[test]
    fn unknown_code_falls_back_to_decimal() {
        let registry = ManufacturerRegistry::bundled();
        assert_eq!(registry.resolve(9999), "9999");
        assert_eq!(registry.resolve(0), "0");
    }

    #[test]
    fn malformed_table_is_tolerated() {
        let registry = ManufacturerRegistry::from_json("{ not json");
        assert!(registry.is_empty());
        assert_eq!(registry.resolve(4), "4");
    }

    #[test]
    fn missing_file_is_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let registry = ManufacturerRegistry::load(Some(&dir.path().join("missing.json")));
        assert!(registry.is_empty());
        assert_eq!(registry.resolve(2), "2");
    }

    #[test]
    fn override_table_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"4": "Acme Silicon", "200": "Example Chips"}}"#).unwrap();

        let registry = ManufacturerRegistry::load(Some(file.path()));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.resolve(4), "Acme Silicon");
        assert_eq!(registry.resolve(200), "Example Chips");
        assert_eq!(registry.resolve(2), "2");
    }

    #[test]
    fn no_path_uses_bundled() {
        let registry = ManufacturerRegistry::load(None);
        assert_eq!(&registry, ManufacturerRegistry::bundled());
    }
}
