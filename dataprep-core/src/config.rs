//! Pipeline configuration.
//!
//! Every field has a default, so an empty TOML document (or no file at all)
//! describes the stock housing dataset pipeline.

use crate::split::{
    Blake3Hasher, HashSplitter, IdHasher, Md5Hasher, RandomSplitter, StratifiedSplitter,
    DEFAULT_SEED, DEFAULT_TEST_RATIO,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const HOUSING_URL: &str =
    "https://raw.githubusercontent.com/ageron/handson-ml/master/datasets/housing/housing.tgz";
pub const HOUSING_PATH: &str = "datasets/housing";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize config TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Where the dataset comes from and where it is cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub url: String,
    pub local_path: PathBuf,
    pub archive_name: String,
    pub csv_name: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: HOUSING_URL.to_string(),
            local_path: PathBuf::from(HOUSING_PATH),
            archive_name: "housing.tgz".to_string(),
            csv_name: "housing.csv".to_string(),
        }
    }
}

/// Identifier hash for the hash-stable split.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdHash {
    #[default]
    Md5,
    Blake3,
}

impl IdHash {
    pub fn hasher(self) -> Box<dyn IdHasher> {
        match self {
            IdHash::Md5 => Box::new(Md5Hasher),
            IdHash::Blake3 => Box::new(Blake3Hasher),
        }
    }
}

/// Parameters shared by the splitters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitConfig {
    pub test_ratio: f64,
    pub seed: u64,
    /// Identifier column for the hash split. Added as a positional row index
    /// when the dataset does not already have it.
    pub id_column: String,
    pub hash: IdHash,
    pub stratify_column: String,
    pub stratify_cap: i64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_ratio: DEFAULT_TEST_RATIO,
            seed: DEFAULT_SEED,
            id_column: "index".to_string(),
            hash: IdHash::Md5,
            stratify_column: "median_income".to_string(),
            stratify_cap: 5,
        }
    }
}

impl SplitConfig {
    pub fn random_splitter(&self) -> RandomSplitter {
        RandomSplitter::new(self.test_ratio, self.seed)
    }

    pub fn hash_splitter(&self) -> HashSplitter {
        HashSplitter::with_hasher(self.test_ratio, self.id_column.clone(), self.hash.hasher())
    }

    /// The stratified splitter always uses the default 0.2 test ratio and
    /// seed; only the column and cap are configurable.
    pub fn stratified_splitter(&self) -> StratifiedSplitter {
        StratifiedSplitter::new(self.stratify_column.clone(), self.stratify_cap)
    }
}

/// Full pipeline configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrepConfig {
    pub source: SourceConfig,
    pub split: SplitConfig,
}

impl PrepConfig {
    /// Load a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let ratio = self.split.test_ratio;
        if !(ratio > 0.0 && ratio < 1.0) {
            return Err(ConfigError::Invalid(format!(
                "split.test_ratio must be strictly between 0 and 1, got {ratio}"
            )));
        }
        if self.source.url.is_empty() {
            return Err(ConfigError::Invalid("source.url is empty".into()));
        }
        if self.source.csv_name.is_empty() {
            return Err(ConfigError::Invalid("source.csv_name is empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_the_housing_pipeline() {
        let config = PrepConfig::from_toml("").unwrap();
        assert_eq!(config, PrepConfig::default());
        assert_eq!(config.source.local_path, PathBuf::from("datasets/housing"));
        assert_eq!(config.split.stratify_cap, 5);
        assert_eq!(config.split.hash, IdHash::Md5);
    }

    #[test]
    fn partial_toml_overrides_fields() {
        let config = PrepConfig::from_toml(
            r#"
            [source]
            local_path = "/tmp/prices"

            [split]
            hash = "blake3"
            seed = 7
            "#,
        )
        .unwrap();
        assert_eq!(config.source.local_path, PathBuf::from("/tmp/prices"));
        assert_eq!(config.source.csv_name, "housing.csv");
        assert_eq!(config.split.seed, 7);
        assert_eq!(config.split.hash_splitter().hasher().name(), "blake3");
    }

    #[test]
    fn out_of_range_ratio_is_rejected() {
        let err = PrepConfig::from_toml("[split]\ntest_ratio = 1.0\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn unknown_hash_is_a_parse_error() {
        let err = PrepConfig::from_toml("[split]\nhash = \"sha1\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn toml_roundtrip() {
        let config = PrepConfig::default();
        let text = config.to_toml().unwrap();
        assert_eq!(PrepConfig::from_toml(&text).unwrap(), config);
    }
}
