//! Errors raised while loading `tinct.toml`.

use super::FieldPath;
use owo_colors::OwoColorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("config file is not valid TOML")]
    Toml(#[from] toml::de::Error),

    // No #[from]: a source() would print every diagnostic twice
    #[error("{0}")]
    Diagnostics(ConfigDiagnostics),
}

// ============================================================================
// Diagnostics
// ============================================================================

/// One out-of-range setting.
#[derive(Debug, Clone)]
pub struct ConfigDiagnostic {
    pub field: FieldPath,
    pub message: String,
    pub hint: Option<&'static str>,
}

impl fmt::Display for ConfigDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  {} {}", self.field.as_str().cyan(), self.message)?;
        if let Some(hint) = self.hint {
            write!(f, " {}", format!("({hint})").dimmed())?;
        }
        Ok(())
    }
}

/// Every invalid setting of one config, reported together.
#[derive(Debug, Default)]
pub struct ConfigDiagnostics {
    errors: Vec<ConfigDiagnostic>,
}

impl ConfigDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, field: FieldPath, message: String, hint: Option<&'static str>) {
        self.errors.push(ConfigDiagnostic {
            field,
            message,
            hint,
        });
    }

    /// Opacity multipliers must lie in `[0, 1]`.
    pub fn check_unit(&mut self, field: FieldPath, value: f64) {
        if !(0.0..=1.0).contains(&value) {
            self.push(
                field,
                format!("opacity {value} is out of range"),
                Some("use a value between 0 and 1"),
            );
        }
    }

    pub fn check_positive(&mut self, field: FieldPath, value: u64) {
        if value == 0 {
            self.push(field, "must be greater than 0".to_string(), None);
        }
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[ConfigDiagnostic] {
        &self.errors
    }

    pub fn into_result(self) -> Result<(), Self> {
        if self.errors.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ConfigDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = if self.errors.len() == 1 { "setting" } else { "settings" };
        write!(
            f,
            "{}",
            format!("{} invalid {noun} in config:", self.errors.len()).red().bold()
        )?;
        for err in &self.errors {
            write!(f, "\n{err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigDiagnostics {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_io_error_names_file() {
        let err = ConfigError::Io(
            PathBuf::from("tinct.toml"),
            Error::new(ErrorKind::NotFound, "file not found"),
        );
        assert_eq!(err.to_string(), "cannot read config file `tinct.toml`");
    }

    #[test]
    fn test_diagnostics_collect_all() {
        let mut diag = ConfigDiagnostics::new();
        diag.check_unit(FieldPath::new("preview.hover_opacity"), 0.3);
        diag.check_unit(FieldPath::new("preview.click_opacity"), 1.5);
        diag.check_unit(FieldPath::new("isolate.dim_opacity"), -0.1);
        diag.check_positive(FieldPath::new("preview.pulse_interval_ms"), 0);
        assert_eq!(diag.len(), 3);
        assert_eq!(diag.errors()[0].field.as_str(), "preview.click_opacity");
        assert!(diag.errors()[0].hint.is_some());
        assert!(diag.errors()[2].hint.is_none());

        let shown = ConfigError::Diagnostics(diag).to_string();
        assert!(shown.contains("3 invalid settings in config:"), "{shown}");
        assert!(shown.contains("isolate.dim_opacity"), "{shown}");
        assert!(shown.contains("opacity -0.1 is out of range"), "{shown}");

        assert!(ConfigDiagnostics::new().into_result().is_ok());
    }
}
