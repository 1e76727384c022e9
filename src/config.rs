//! Configuration for a docgroup run
//!
//! Reads configuration from:
//! - `.docgrouprc.yaml` / `.docgrouprc.json` / `docgroup.yaml` (project-level)
//! - the same names in the home directory (user-level)

use crate::diagnostic::Severity;
use crate::vocabulary::{VocabularyCache, DEFAULT_PROPERTY_NAME, DEFAULT_SOURCE};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration file names, in lookup order
pub const CONFIG_NAMES: &[&str] = &[
    ".docgrouprc.yaml",
    ".docgrouprc.yml",
    ".docgrouprc.json",
    "docgroup.yaml",
    "docgroup.yml",
    "docgroup.json",
];

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Enable parallel processing
    pub parallel: bool,

    /// Number of parallel jobs (0 = auto-detect)
    pub jobs: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            jobs: 0,
        }
    }
}

/// Output settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format
    pub format: OutputFormat,

    /// Color mode
    pub color: ColorMode,

    /// Verbose output
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Compact,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "compact" => Ok(OutputFormat::Compact),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Color mode options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

/// File handling settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    /// Include patterns
    pub include: Vec<String>,

    /// Exclude patterns
    pub exclude: Vec<String>,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            include: vec!["**/*.test.{js,jsx,ts,tsx,mjs,cjs}".to_string()],
            exclude: vec!["**/node_modules/**".to_string()],
        }
    }
}

/// Rule configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Disabled rules
    pub disabled: Vec<String>,

    /// Severity overrides (rule_id -> severity)
    pub severity: HashMap<String, Severity>,
}

/// Where the group vocabulary comes from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupsConfig {
    /// JSON manifest holding the vocabulary
    pub source: PathBuf,

    /// Manifest property holding the vocabulary
    #[serde(alias = "propertyName")]
    pub property_name: String,
}

impl Default for GroupsConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from(DEFAULT_SOURCE),
            property_name: DEFAULT_PROPERTY_NAME.to_string(),
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Engine settings
    pub engine: EngineConfig,

    /// Output settings
    pub output: OutputConfig,

    /// File handling settings
    pub files: FilesConfig,

    /// Rule configuration
    pub rules: RulesConfig,

    /// Vocabulary source
    pub groups: GroupsConfig,
}

impl Config {
    /// Create default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let config: Self = match ext {
            "yaml" | "yml" => serde_yaml::from_str(&content)?,
            "json" => serde_json::from_str(&content)?,
            _ => {
                return Err(ConfigError::Invalid(format!(
                    "Unknown config file format: {}",
                    ext
                )))
            }
        };

        config.validate()?;
        log::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Reject values that deserialize but cannot be used
    fn validate(&self) -> Result<(), ConfigError> {
        if self.groups.property_name.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "groups.property_name must not be empty".to_string(),
            ));
        }
        if self.files.include.is_empty() {
            return Err(ConfigError::Invalid(
                "files.include must list at least one pattern".to_string(),
            ));
        }
        Ok(())
    }

    /// First configuration file found in `dir`
    pub fn find_in(dir: &Path) -> Option<PathBuf> {
        CONFIG_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|path| path.exists())
    }

    /// Load configuration from default locations
    pub fn load_default() -> Result<Self, ConfigError> {
        // Check current directory
        if let Some(path) = Self::find_in(Path::new(".")) {
            return Self::load(&path);
        }

        // Check home directory
        if let Some(path) = dirs::home_dir().and_then(|home| Self::find_in(&home)) {
            return Self::load(&path);
        }

        // Return default config
        Ok(Self::default())
    }

    /// Merge CLI arguments into configuration
    pub fn merge_cli(
        &mut self,
        format: Option<OutputFormat>,
        verbose: Option<bool>,
        jobs: Option<usize>,
        disabled_rules: Option<Vec<String>>,
        property_name: Option<String>,
        groups_file: Option<PathBuf>,
    ) {
        if let Some(f) = format {
            self.output.format = f;
        }
        if let Some(v) = verbose {
            self.output.verbose = v;
        }
        if let Some(j) = jobs {
            self.engine.jobs = j;
        }
        if let Some(disabled) = disabled_rules {
            self.rules.disabled.extend(disabled);
        }
        if let Some(name) = property_name {
            self.groups.property_name = name;
        }
        if let Some(file) = groups_file {
            self.groups.source = file;
        }
    }

    /// Check if a rule is enabled
    pub fn is_rule_enabled(&self, rule_id: &str) -> bool {
        !self.rules.disabled.iter().any(|r| r == rule_id)
    }

    /// Get severity override for a rule
    pub fn get_severity_override(&self, rule_id: &str) -> Option<Severity> {
        self.rules.severity.get(rule_id).copied()
    }

    /// A fresh, not yet loaded vocabulary cache for this configuration
    pub fn vocabulary_cache(&self) -> VocabularyCache {
        VocabularyCache::new(&self.groups.source, &self.groups.property_name)
    }
}
