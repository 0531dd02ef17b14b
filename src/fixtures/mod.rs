//! Fixtures

use std::{
    fs,
    path::{Path, PathBuf},
};

use thiserror::Error;

use crate::{
    cart::Selection,
    catalog::{Catalog, CatalogError},
    fixtures::{catalog::CatalogFixture, selection::SelectionsFixture},
};

pub mod catalog;
pub mod selection;

pub use selection::parse_selection;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Price in a currency other than the catalog's
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// Selection not in the form `NAME[=VISITS][@MONTHS]`
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// Catalog failed validation
    #[error("Invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
}

/// Named fixture sets under a base directory.
///
/// Catalogs live in `<base>/catalogs/<name>.yml` and selections in
/// `<base>/selections/<name>.yml`.
#[derive(Debug, Clone)]
pub struct Fixture {
    base_path: PathBuf,
}

impl Fixture {
    /// Fixtures under `./fixtures`
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Fixtures under a custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Load a named catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if the
    /// catalog is invalid.
    pub fn catalog(&self, name: &str) -> Result<Catalog<'static>, FixtureError> {
        load_catalog(self.path("catalogs", name))
    }

    /// Load a named list of selections.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn selections(&self, name: &str) -> Result<Vec<Selection>, FixtureError> {
        let contents = fs::read_to_string(self.path("selections", name))?;

        Ok(SelectionsFixture::from_yaml(&contents)?.into_selections())
    }

    fn path(&self, category: &str, name: &str) -> PathBuf {
        self.base_path.join(category).join(format!("{name}.yml"))
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Load a catalog from a YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if the catalog
/// is invalid.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<Catalog<'static>, FixtureError> {
    let contents = fs::read_to_string(path)?;

    CatalogFixture::from_yaml(&contents)?.try_into_catalog()
}
