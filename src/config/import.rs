//! Import configuration loading from import.toml
//!
//! Lists the CSV exports of the five source spreadsheets and how their values
//! should be interpreted.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration structure representing the entire import.toml file
#[derive(Debug, Deserialize, Clone)]
pub struct ImportConfig {
    /// Source file locations
    pub sources: SourceFiles,
    /// Whether loss values are whole percentages (5 = 5%) rather than fractions
    #[serde(default)]
    pub loss_percent_is_percentage: bool,
    /// Directory for the normalized CSV output, if any
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

/// Paths to the CSV export of each source spreadsheet
#[derive(Debug, Deserialize, Clone)]
pub struct SourceFiles {
    /// Material types with their loss percent
    pub material_types: PathBuf,
    /// Product types with their coefficient
    pub product_types: PathBuf,
    /// Workshops
    pub workshops: PathBuf,
    /// Products
    pub products: PathBuf,
    /// Manufacturing hours per product and workshop
    pub product_workshops: PathBuf,
}

impl ImportConfig {
    /// Resolves relative source paths against `base`, normally the config file's directory.
    #[must_use]
    pub fn relative_to(mut self, base: &Path) -> Self {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        resolve(&mut self.sources.material_types);
        resolve(&mut self.sources.product_types);
        resolve(&mut self.sources.workshops);
        resolve(&mut self.sources.products);
        resolve(&mut self.sources.product_workshops);
        if let Some(dir) = self.output_dir.as_mut() {
            resolve(dir);
        }
        self
    }
}

/// Loads import configuration from a TOML file
///
/// Relative paths inside the file are resolved against the file's directory.
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ImportConfig> {
    let path = path.as_ref();
    tracing::debug!("Loading import configuration from {:?}", path);
    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path.display()),
    })?;

    let config: ImportConfig = toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path.display()),
    })?;

    let base = path.parent().unwrap_or_else(|| Path::new("."));
    Ok(config.relative_to(base))
}
