use anyhow::{Context, Result};
use customitems_core::key::DEFAULT_NAMESPACE_ALIASES;
use customitems_core::NamespaceAliases;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, path::PathBuf};
use tracing::warn;

/// Default location of the engine config.
pub const DEFAULT_CONFIG_PATH: &str = "config/customitems.toml";
const DEFAULT_DEFINITIONS_PATH: &str = "config/items.json";

/// Engine settings read from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Custom item definition pack (JSON).
    pub definitions: PathBuf,
    /// Native item catalog (JSON). Without one only custom items resolve.
    pub natives: Option<PathBuf>,
    /// Namespace prefixes stripped from free-text ids.
    pub namespace_aliases: Vec<String>,
    /// Refuse to start when any definition is invalid or duplicated.
    pub strict: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            definitions: PathBuf::from(DEFAULT_DEFINITIONS_PATH),
            natives: None,
            namespace_aliases: DEFAULT_NAMESPACE_ALIASES
                .iter()
                .map(|alias| alias.to_string())
                .collect(),
            strict: false,
        }
    }
}

impl EngineConfig {
    /// Load configuration from the default path.
    pub fn load() -> Self {
        Self::load_from_path(Path::new(DEFAULT_CONFIG_PATH))
    }

    /// Load configuration from an explicit path, falling back to defaults on errors.
    pub fn load_from_path(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(contents) => match toml::from_str::<EngineConfig>(&contents) {
                Ok(cfg) => cfg,
                Err(err) => {
                    warn!("Failed to parse {}: {err}. Using defaults", path.display());
                    EngineConfig::default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                warn!("Engine config not found at {}. Using defaults", path.display());
                EngineConfig::default()
            }
            Err(err) => {
                warn!("Failed to read {}: {err}. Using defaults", path.display());
                EngineConfig::default()
            }
        }
    }

    /// Save configuration to an explicit path.
    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        let toml = toml::to_string_pretty(self).context("Failed to serialize engine config")?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(path, toml).with_context(|| format!("Failed to write {}", path.display()))
    }

    /// Namespace aliases as the core expects them.
    pub fn aliases(&self) -> NamespaceAliases {
        NamespaceAliases::new(self.namespace_aliases.iter().map(String::as_str))
    }
}
