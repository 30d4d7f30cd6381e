//! TOML job files
//!
//! A job file collects the clumping and relabelling settings that would
//! otherwise be given on the command line:
//!
//! ```toml
//! [clump]
//! no_data = 0
//! tolerance = 1
//! thematic = true
//! in_memory = false
//! expected_clumps = 120
//! attributes = "clumps.csv"
//! progress = true
//!
//! [relabel]
//! in_place = true
//! ```
//!
//! Every key is optional. Command-line flags override file values.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::raster::{RasterError, RasterResult};
use crate::segment::{ClumpOptions, NoData, Similarity};

const CLUMP_KEYS: &[&str] = &[
    "no_data",
    "band_no_data",
    "tolerance",
    "thematic",
    "in_memory",
    "expected_clumps",
    "attributes",
    "progress",
];
const RELABEL_KEYS: &[&str] = &["in_place"];

/// Settings from the `[clump]` table
#[derive(Debug, Clone, PartialEq)]
pub struct ClumpConfig {
    /// One no-data value for every band
    pub no_data: Option<u32>,
    /// Use each band's declared no-data value
    pub band_no_data: bool,
    /// Largest per-band difference still counted as the same category
    pub tolerance: Option<u32>,
    pub thematic: bool,
    pub in_memory: bool,
    pub expected_clumps: Option<usize>,
    /// Where to write the per-clump category table
    pub attributes: Option<PathBuf>,
    pub progress: bool,
}

impl Default for ClumpConfig {
    fn default() -> Self {
        ClumpConfig {
            no_data: None,
            band_no_data: false,
            tolerance: None,
            thematic: true,
            in_memory: false,
            expected_clumps: None,
            attributes: None,
            progress: false,
        }
    }
}

impl ClumpConfig {
    /// No-data handling described by these settings
    pub fn no_data_mode(&self) -> NoData {
        match (self.no_data, self.band_no_data) {
            (Some(value), _) => NoData::Value(value),
            (None, true) => NoData::FromBands,
            (None, false) => NoData::Ignore,
        }
    }

    pub fn similarity(&self) -> Similarity {
        match self.tolerance {
            None | Some(0) => Similarity::Exact,
            Some(tolerance) => Similarity::Within(tolerance),
        }
    }

    /// Options for the clumper
    pub fn clump_options(&self) -> ClumpOptions {
        ClumpOptions {
            no_data: self.no_data_mode(),
            expected_clumps: self.expected_clumps,
            thematic: self.thematic,
            show_progress: self.progress,
        }
    }
}

/// Settings from the `[relabel]` table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelabelConfig {
    pub in_place: bool,
}

/// A complete job file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobConfig {
    pub clump: ClumpConfig,
    pub relabel: RelabelConfig,
}

impl JobConfig {
    /// Load a job file from disk
    pub fn from_file<P: AsRef<Path>>(path: P) -> RasterResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        debug!("Loading job configuration from {}", path.display());
        Self::from_str(&content)
    }

    /// Parse a job file
    ///
    /// # Arguments
    /// * `content` - TOML text
    ///
    /// # Returns
    /// The parsed configuration, or a configuration error naming the bad key
    pub fn from_str(content: &str) -> RasterResult<Self> {
        let document: toml::Table = content.parse()
            .map_err(|e| RasterError::ConfigError(format!("Failed to parse TOML: {}", e)))?;

        let mut config = JobConfig::default();

        if let Some(table) = section(&document, "clump")? {
            warn_unknown_keys("clump", table, CLUMP_KEYS);
            let clump = &mut config.clump;

            clump.no_data = get_u32(table, "no_data")?;
            clump.band_no_data = get_bool(table, "band_no_data")?.unwrap_or(false);
            clump.tolerance = get_u32(table, "tolerance")?;
            clump.thematic = get_bool(table, "thematic")?.unwrap_or(true);
            clump.in_memory = get_bool(table, "in_memory")?.unwrap_or(false);
            clump.expected_clumps = get_u32(table, "expected_clumps")?.map(|n| n as usize);
            clump.attributes = get_str(table, "attributes")?.map(PathBuf::from);
            clump.progress = get_bool(table, "progress")?.unwrap_or(false);

            if clump.no_data.is_some() && clump.band_no_data {
                return Err(RasterError::ConfigError(
                    "clump.no_data and clump.band_no_data cannot both be set".to_string(),
                ));
            }
        }

        if let Some(table) = section(&document, "relabel")? {
            warn_unknown_keys("relabel", table, RELABEL_KEYS);
            config.relabel.in_place = get_bool(table, "in_place")?.unwrap_or(false);
        }

        for key in document.keys() {
            if key != "clump" && key != "relabel" {
                warn!("Ignoring unknown section [{}] in job configuration", key);
            }
        }

        Ok(config)
    }
}

fn section<'a>(document: &'a toml::Table, name: &str) -> RasterResult<Option<&'a toml::Table>> {
    match document.get(name) {
        None => Ok(None),
        Some(toml::Value::Table(table)) => Ok(Some(table)),
        Some(_) => Err(RasterError::ConfigError(format!("[{}] must be a table", name))),
    }
}

fn warn_unknown_keys(section: &str, table: &toml::Table, known: &[&str]) {
    for key in table.keys() {
        if !known.contains(&key.as_str()) {
            warn!("Ignoring unknown key {}.{} in job configuration", section, key);
        }
    }
}

fn get_u32(table: &toml::Table, key: &str) -> RasterResult<Option<u32>> {
    match table.get(key) {
        None => Ok(None),
        Some(toml::Value::Integer(value)) => u32::try_from(*value)
            .map(Some)
            .map_err(|_| RasterError::ConfigError(format!("{} must be between 0 and {}, got {}", key, u32::MAX, value))),
        Some(other) => Err(RasterError::ConfigError(format!("{} must be an integer, got {}", key, other))),
    }
}

fn get_bool(table: &toml::Table, key: &str) -> RasterResult<Option<bool>> {
    match table.get(key) {
        None => Ok(None),
        Some(value) => value.as_bool()
            .map(Some)
            .ok_or_else(|| RasterError::ConfigError(format!("{} must be true or false, got {}", key, value))),
    }
}

fn get_str<'a>(table: &'a toml::Table, key: &str) -> RasterResult<Option<&'a str>> {
    match table.get(key) {
        None => Ok(None),
        Some(value) => value.as_str()
            .map(Some)
            .ok_or_else(|| RasterError::ConfigError(format!("{} must be a string, got {}", key, value))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = JobConfig::from_str("").unwrap();
        assert_eq!(config, JobConfig::default());
        assert!(config.clump.thematic);
        assert_eq!(config.clump.no_data_mode(), NoData::Ignore);
        assert_eq!(config.clump.similarity(), Similarity::Exact);
    }

    #[test]
    fn test_full_clump_section() {
        let config = JobConfig::from_str(
            r#"
            [clump]
            no_data = 0
            tolerance = 2
            thematic = false
            in_memory = true
            expected_clumps = 12
            attributes = "out.csv"
            progress = true

            [relabel]
            in_place = true
            "#,
        ).unwrap();

        let clump = &config.clump;
        assert_eq!(clump.no_data_mode(), NoData::Value(0));
        assert_eq!(clump.similarity(), Similarity::Within(2));
        assert!(clump.in_memory);
        assert_eq!(clump.attributes, Some(PathBuf::from("out.csv")));
        assert!(config.relabel.in_place);

        let options = clump.clump_options();
        assert_eq!(options.expected_clumps, Some(12));
        assert!(!options.thematic);
        assert!(options.show_progress);
    }

    #[test]
    fn test_band_no_data() {
        let config = JobConfig::from_str("[clump]\nband_no_data = true\n").unwrap();
        assert_eq!(config.clump.no_data_mode(), NoData::FromBands);
    }

    #[test]
    fn test_conflicting_no_data_settings() {
        let result = JobConfig::from_str("[clump]\nno_data = 3\nband_no_data = true\n");
        assert!(matches!(result, Err(RasterError::ConfigError(_))));
    }

    #[test]
    fn test_wrong_types_are_rejected() {
        assert!(JobConfig::from_str("[clump]\nno_data = \"zero\"\n").is_err());
        assert!(JobConfig::from_str("[clump]\nno_data = -1\n").is_err());
        assert!(JobConfig::from_str("[clump]\nthematic = 1\n").is_err());
        assert!(JobConfig::from_str("clump = 5\n").is_err());
        assert!(JobConfig::from_str("[clump\n").is_err());
    }

    #[test]
    fn test_zero_tolerance_is_exact() {
        let config = JobConfig::from_str("[clump]\ntolerance = 0\n").unwrap();
        assert_eq!(config.clump.similarity(), Similarity::Exact);
    }
}
