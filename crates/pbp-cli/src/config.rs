//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Root directory for parsed output.
    pub data_dir: PathBuf,

    /// Subdirectory for possession files.
    pub possessions_dir: String,

    /// Subdirectory for halfgame files.
    pub halfgames_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            data_dir,
            possessions_dir: "possessions".to_owned(),
            halfgames_dir: "halfgames".to_owned(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (PBP_*)
        figment = figment.merge(Env::prefixed("PBP_"));

        figment.extract()
    }

    /// Default possessions output file.
    #[must_use]
    pub fn possessions_path(&self) -> PathBuf {
        self.data_dir
            .join(&self.possessions_dir)
            .join("possessions.jsonl")
    }

    /// Default halfgames output file.
    #[must_use]
    pub fn halfgames_path(&self) -> PathBuf {
        self.data_dir
            .join(&self.halfgames_dir)
            .join("halfgames.jsonl")
    }
}

/// Returns the platform-specific config directory for pbp.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("pbp"))
}

/// Returns the platform-specific data directory for pbp.
///
/// On Linux: `~/.local/share/pbp`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("pbp"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dirs_data_path_ends_with_pbp() {
        let path = dirs_data_path().unwrap();
        assert_eq!(path.file_name().unwrap(), "pbp");
    }

    #[test]
    fn default_output_paths_nest_under_data_dir() {
        let config = Config {
            data_dir: PathBuf::from("/data"),
            ..Config::default()
        };
        assert_eq!(
            config.possessions_path(),
            PathBuf::from("/data/possessions/possessions.jsonl")
        );
        assert_eq!(
            config.halfgames_path(),
            PathBuf::from("/data/halfgames/halfgames.jsonl")
        );
    }
}
