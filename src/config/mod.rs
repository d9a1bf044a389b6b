//! Engine settings and the optional `quire.toml` project file.
//!
//! # Sections
//!
//! | Section              | Purpose                                          |
//! |----------------------|--------------------------------------------------|
//! | `[assets]`           | Search paths, public asset root, fingerprinting  |
//! | `[processors.<tag>]` | External compiler bound to a filter tag          |
//! | `[serve]`            | HTTP front end (interface, port)                 |
//!
//! # Example
//!
//! ```toml
//! [assets]
//! paths = ["assets", "vendor/assets"]
//! root = "/assets/"
//! fingerprint = true
//!
//! [processors.coffee]
//! command = ["coffee", "-s", "-c"]
//! ```

mod error;

pub use error::ConfigError;

use crate::error::AssetResult;
use crate::log;
use crate::processor::{ExternalProcessor, ProcessorRegistry, TEMPLATE_TAG, TemplateProcessor};
use crate::utils::path::{expand_tilde, normalize_path};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};

/// Default public prefix for asset URLs.
pub const DEFAULT_ASSET_ROOT: &str = "/assets/";

/// Default project file name.
pub const CONFIG_FILE: &str = "quire.toml";

// ============================================================================
// Engine configuration
// ============================================================================

/// Settings read while processing assets. Fixed for the duration of a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Splice content fingerprints into `url()` results.
    pub fingerprint: bool,
    /// Public prefix prepended to `url()` results.
    pub asset_root: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fingerprint: false,
            asset_root: DEFAULT_ASSET_ROOT.to_string(),
        }
    }
}

impl EngineConfig {
    /// Public URL for a path relative to the asset root.
    pub fn public_url(&self, relative: &str) -> String {
        let relative = relative.trim_start_matches('/');
        match self.asset_root.as_str() {
            "" => relative.to_string(),
            root if root.ends_with('/') => format!("{root}{relative}"),
            root => format!("{root}/{relative}"),
        }
    }
}

// ============================================================================
// Project file
// ============================================================================

/// `[assets]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsSection {
    /// Search paths, relative to the config file's directory.
    pub paths: Vec<PathBuf>,
    pub root: String,
    pub fingerprint: bool,
}

impl Default for AssetsSection {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            root: DEFAULT_ASSET_ROOT.to_string(),
            fingerprint: false,
        }
    }
}

/// `[processors.<tag>]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessorSection {
    /// Program and arguments; content is piped to stdin.
    pub command: Vec<String>,
}

/// `[serve]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeSection {
    pub interface: IpAddr,
    pub port: u16,
}

impl Default for ServeSection {
    fn default() -> Self {
        Self {
            interface: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 8080,
        }
    }
}

/// Root structure of `quire.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Directory containing the config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    pub assets: AssetsSection,

    /// External compilers. When absent, `coffee` and `less` are used.
    pub processors: Option<BTreeMap<String, ProcessorSection>>,

    pub serve: ServeSection,
}

impl ProjectConfig {
    /// Load `path`, falling back to defaults rooted at the current directory
    /// when the file does not exist and was not asked for explicitly.
    pub fn load(path: &Path, explicit: bool) -> Result<Self, ConfigError> {
        let path = normalize_path(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;

        if !explicit && !path.exists() {
            let root = path.parent().map(Path::to_path_buf).unwrap_or_default();
            return Ok(Self {
                root,
                ..Self::default()
            });
        }

        let content = fs::read_to_string(&path).map_err(|err| ConfigError::Io(path.clone(), err))?;
        let (mut config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, &path);
        }

        config.root = path.parent().map(Path::to_path_buf).unwrap_or_default();
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        log!("warning"; "unknown fields in {}, ignoring:", path.display());
        for field in fields {
            eprintln!("- {field}");
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let Some(processors) = &self.processors else {
            return Ok(());
        };
        for (tag, section) in processors {
            if tag == TEMPLATE_TAG {
                return Err(ConfigError::Validation(format!(
                    "[processors.{tag}] is reserved for the built-in template filter"
                )));
            }
            if tag.is_empty() || tag.contains('.') {
                return Err(ConfigError::Validation(format!(
                    "invalid filter tag `{tag}`"
                )));
            }
            if section.command.is_empty() || section.command[0].is_empty() {
                return Err(ConfigError::Validation(format!(
                    "[processors.{tag}] command must not be empty"
                )));
            }
        }
        Ok(())
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            fingerprint: self.assets.fingerprint,
            asset_root: self.assets.root.clone(),
        }
    }

    /// Configured search paths, resolved against the config file's directory.
    pub fn search_paths(&self) -> Vec<PathBuf> {
        self.assets
            .paths
            .iter()
            .map(|path| {
                let path = expand_tilde(path);
                if path.is_relative() {
                    self.root.join(path)
                } else {
                    path
                }
            })
            .collect()
    }

    /// Registry with the template filter plus the configured external
    /// compilers, or [`ProcessorRegistry::builtin`] when no `[processors]`
    /// table is present. Fails when a compiler binary cannot be found.
    pub fn build_registry(&self) -> AssetResult<ProcessorRegistry> {
        let Some(processors) = &self.processors else {
            return ProcessorRegistry::builtin();
        };

        let mut registry = ProcessorRegistry::new();
        registry.register(TEMPLATE_TAG, TemplateProcessor)?;
        for (tag, section) in processors {
            registry.register(tag, ExternalProcessor::new(&section.command))?;
        }

        Ok(registry)
    }
}
