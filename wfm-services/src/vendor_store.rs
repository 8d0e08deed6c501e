//! Vendor Store
//!
//! Loads vendor catalogs, one vendor per JSON file shaped
//! `{"name": ..., "items": [{"name", "type", "standing"}]}`.

use std::collections::HashSet;
use std::path::PathBuf;

use tracing::{debug, info};
use wfm_core::Vendor;

/// Catalogs compiled into the binary
const BUNDLED_VENDORS: &[(&str, &str)] = &[
    (
        "arbiters_of_hexis.json",
        include_str!("../vendors/arbiters_of_hexis.json"),
    ),
    (
        "cephalon_suda.json",
        include_str!("../vendors/cephalon_suda.json"),
    ),
];

/// Source of vendor catalogs
pub trait VendorStore: Send + Sync {
    /// Load every vendor, sorted by name
    fn load_all(&self) -> Result<Vec<Vendor>, VendorStoreError>;
}

/// Reads every `*.json` file directly inside a directory
#[derive(Debug, Clone)]
pub struct DirectoryVendorStore {
    dir: PathBuf,
}

impl DirectoryVendorStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl VendorStore for DirectoryVendorStore {
    fn load_all(&self) -> Result<Vec<Vendor>, VendorStoreError> {
        let entries = std::fs::read_dir(&self.dir).map_err(|source| VendorStoreError::ReadDir {
            path: self.dir.clone(),
            source,
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| VendorStoreError::ReadDir {
                path: self.dir.clone(),
                source,
            })?;
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
        files.sort();

        let mut parsed = Vec::with_capacity(files.len());
        for path in files {
            let data = std::fs::read_to_string(&path).map_err(|source| VendorStoreError::ReadFile {
                path: path.clone(),
                source,
            })?;
            let file = path
                .file_name()
                .map(|f| f.to_string_lossy().into_owned())
                .unwrap_or_default();
            debug!("Loading vendor catalog {}", path.display());
            parsed.push((file, data));
        }

        let vendors = parse_catalogs(parsed.iter().map(|(f, d)| (f.as_str(), d.as_str())))?;
        info!("Loaded {} vendors from {}", vendors.len(), self.dir.display());
        Ok(vendors)
    }
}

/// Serves the catalogs bundled with the binary
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledVendorStore;

impl VendorStore for BundledVendorStore {
    fn load_all(&self) -> Result<Vec<Vendor>, VendorStoreError> {
        let vendors = parse_catalogs(BUNDLED_VENDORS.iter().copied())?;
        debug!("Loaded {} bundled vendors", vendors.len());
        Ok(vendors)
    }
}

/// Parse `(file name, contents)` pairs into vendors sorted by name
fn parse_catalogs<'a>(
    catalogs: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Result<Vec<Vendor>, VendorStoreError> {
    let mut vendors: Vec<Vendor> = Vec::new();
    let mut names = HashSet::new();

    for (file, data) in catalogs {
        let vendor: Vendor = serde_json::from_str(data).map_err(|source| VendorStoreError::Parse {
            file: file.to_string(),
            source,
        })?;

        let mut item_names = HashSet::new();
        for item in &vendor.items {
            if !item_names.insert(item.name.as_str()) {
                return Err(VendorStoreError::DuplicateItem {
                    vendor: vendor.name.clone(),
                    item: item.name.clone(),
                });
            }
        }

        if !names.insert(vendor.name.clone()) {
            return Err(VendorStoreError::DuplicateVendor {
                name: vendor.name.clone(),
                file: file.to_string(),
            });
        }

        vendors.push(vendor);
    }

    vendors.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(vendors)
}

/// Errors that can occur while loading vendor catalogs
#[derive(Debug, thiserror::Error)]
pub enum VendorStoreError {
    #[error("Failed to read vendor directory {}: {source}", path.display())]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to read vendor file {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid vendor file {file}: {source}")]
    Parse {
        file: String,
        source: serde_json::Error,
    },

    #[error("Vendor {name} in {file} is already defined")]
    DuplicateVendor { name: String, file: String },

    #[error("Vendor {vendor} lists {item} more than once")]
    DuplicateItem { vendor: String, item: String },
}
