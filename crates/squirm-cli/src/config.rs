//! Configuration management for the Squirm CLI.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use squirm::prelude::*;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the project config file.
pub const CONFIG_FILE: &str = "squirm.toml";

/// Squirm project configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub world: WorldConfig,
    #[serde(default)]
    pub chemistry: ChemistryConfig,
}

/// Which reactions to load.
///
/// A missing `[chemistry]` section means the replicator preset. Inside
/// the section, leaving out `preset` means only `rules` are used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChemistryConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<Preset>,
    /// Extra rules in notation form, tried after the preset.
    #[serde(default)]
    pub rules: Vec<String>,
}

impl Default for ChemistryConfig {
    fn default() -> Self {
        Self {
            preset: Some(Preset::Replicator),
            rules: Vec::new(),
        }
    }
}

impl Config {
    /// Load config from squirm.toml in the current or parent directories.
    pub fn load() -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to read current directory")?;
        match find_config_file(&cwd) {
            Some(path) => Self::load_from(&path),
            None => {
                debug!("no {CONFIG_FILE} found, using defaults");
                Ok(Config::default())
            }
        }
    }

    /// Load config from a specific file.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config: {}", path.display()))?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Save config to the specified path.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// A world builder carrying this configuration.
    pub fn builder(&self) -> WorldBuilder {
        let mut builder = WorldBuilder::new().with_config(self.world.clone());
        if let Some(preset) = self.chemistry.preset {
            builder = builder.preset(preset);
        }
        for rule in &self.chemistry.rules {
            builder = builder.rule_text(rule.clone());
        }
        builder
    }
}

/// Find squirm.toml in `start` or its parent directories.
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        let config_path = dir.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);

        let mut config = Config::default();
        config.world.width = 64;
        config.world.rng_seed = Some(9);
        config.world.movement = MovementPolicy::Momentum;
        config.chemistry.rules.push("e8 e0 => e4-e3".to_string());
        config.save(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[world]\nwidth = 80\nflood_enabled = true\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.world.width, 80);
        assert_eq!(config.world.height, 50);
        assert!(config.world.flood_enabled);
        assert_eq!(config.chemistry.preset, Some(Preset::Replicator));
    }

    #[test]
    fn chemistry_section_without_preset_uses_rules_only() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(
            &path,
            "[world]\nseed_polymer = false\ninitial_quota = 0\n\n[chemistry]\nrules = [\"a1 b1 => a2-b2\"]\n",
        )
        .unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.chemistry.preset, None);
        let world = config.builder().build().unwrap();
        assert_eq!(world.chemistry().len(), 1);
        assert!(world.population().is_empty());
    }

    #[test]
    fn bad_rule_in_config_fails_the_build() {
        let mut config = Config::default();
        config.chemistry.rules.push("q1 b1 => q2-b2".to_string());
        assert!(config.builder().build().is_err());
    }

    #[test]
    fn malformed_toml_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        std::fs::write(&path, "[world\nwidth = ").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));
    }

    #[test]
    fn config_is_found_in_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        Config::default().save(&dir.path().join(CONFIG_FILE)).unwrap();

        let found = find_config_file(&nested).unwrap();
        assert_eq!(found, dir.path().join(CONFIG_FILE));
    }
}
