//! Tool configuration from `tinct.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # [output], [preview], [isolate]
//! ├── types/         # ConfigError, ConfigDiagnostics, FieldPath
//! ├── util           # config file lookup
//! └── mod.rs         # TinctConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section     | Purpose                                        |
//! |-------------|------------------------------------------------|
//! | `[output]`  | Hex style used when writing colors back        |
//! | `[preview]` | Dim opacities, click transition, pulse timing  |
//! | `[isolate]` | Opacity of stops hidden by stop isolation      |
//! | `[log]`     | Verbose diagnostics                            |
//!
//! A missing file means defaults. Command-line flags override the file.

pub mod section;
pub mod types;
mod util;

pub use section::{IsolateConfig, OutputConfig, PreviewConfig};
pub use types::{ConfigDiagnostic, ConfigDiagnostics, ConfigError, FieldPath};

use util::find_config_file;

use crate::{cli::Cli, log};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Default config file name, searched upward from the working directory.
pub const CONFIG_FILE: &str = "tinct.toml";

// ============================================================================
// root configuration
// ============================================================================

/// `[log]` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub verbose: bool,
}

/// Root configuration structure representing tinct.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TinctConfig {
    /// File the config was read from; `None` when running on defaults.
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    pub output: OutputConfig,

    pub preview: PreviewConfig,

    pub isolate: IsolateConfig,

    pub log: LogConfig,
}

impl TinctConfig {
    /// Load configuration for a command line.
    ///
    /// The default file name is searched upward from the working directory;
    /// an explicitly named file must exist.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut config = match Self::resolve_config_path(&cli.config)? {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.config_path = Some(path);
                config
            }
            None => Self::default(),
        };

        config.apply_cli(cli);
        config.validate()?;
        crate::logger::set_verbose(config.log.verbose);
        Ok(config)
    }

    fn resolve_config_path(name: &Path) -> Result<Option<PathBuf>> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        if let Some(path) = find_config_file(&cwd, name) {
            return Ok(Some(path));
        }
        if name != Path::new(CONFIG_FILE) {
            let path = cwd.join(name);
            let err = std::io::Error::new(std::io::ErrorKind::NotFound, "config file not found");
            return Err(ConfigError::Io(path, err).into());
        }
        Ok(None)
    }

    /// Load configuration from file path with unknown field detection.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }
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
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Command-line flags win over the file.
    fn apply_cli(&mut self, cli: &Cli) {
        if cli.verbose {
            self.log.verbose = true;
        }
        if let Some(hex) = cli.hex {
            self.output.hex = hex.into();
        }
    }

    /// Check every section, reporting all problems at once.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();
        self.preview.validate(&mut diag);
        self.isolate.validate(&mut diag);
        diag.into_result().map_err(ConfigError::Diagnostics)
    }
}

/// Parse a config snippet for section tests, failing on unknown fields.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> TinctConfig {
    let (parsed, ignored) = TinctConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
