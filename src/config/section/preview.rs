//! `[preview]` and `[isolate]` section configuration.
//!
//! # Example
//!
//! ```toml
//! [preview]
//! hover_opacity = 0.3       # opacity multiplier for dimmed shapes on hover
//! click_opacity = 0.3       # opacity multiplier on click
//! transition_ms = 150       # transition attached to click previews
//! pulse_half_cycles = 4     # steps of an affected-pulse
//! pulse_interval_ms = 250   # time between pulse steps
//!
//! [isolate]
//! dim_opacity = 0.1         # stop-opacity of the stops not being isolated
//! ```

use serde::{Deserialize, Serialize};

use crate::config::{ConfigDiagnostics, FieldPath};

/// Preview dimming settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub hover_opacity: f64,
    pub click_opacity: f64,
    pub transition_ms: u64,
    pub pulse_half_cycles: u32,
    pub pulse_interval_ms: u64,
}

impl PreviewConfig {
    pub const HOVER_OPACITY: FieldPath = FieldPath::new("preview.hover_opacity");
    pub const CLICK_OPACITY: FieldPath = FieldPath::new("preview.click_opacity");
    pub const PULSE_HALF_CYCLES: FieldPath = FieldPath::new("preview.pulse_half_cycles");
    pub const PULSE_INTERVAL_MS: FieldPath = FieldPath::new("preview.pulse_interval_ms");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        diag.check_unit(Self::HOVER_OPACITY, self.hover_opacity);
        diag.check_unit(Self::CLICK_OPACITY, self.click_opacity);
        diag.check_positive(Self::PULSE_HALF_CYCLES, u64::from(self.pulse_half_cycles));
        diag.check_positive(Self::PULSE_INTERVAL_MS, self.pulse_interval_ms);
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            hover_opacity: 0.3,
            click_opacity: 0.3,
            transition_ms: 150,
            pulse_half_cycles: 4,
            pulse_interval_ms: 250,
        }
    }
}

/// Gradient stop isolation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IsolateConfig {
    pub dim_opacity: f64,
}

impl IsolateConfig {
    pub const DIM_OPACITY: FieldPath = FieldPath::new("isolate.dim_opacity");

    pub fn validate(&self, diag: &mut ConfigDiagnostics) {
        diag.check_unit(Self::DIM_OPACITY, self.dim_opacity);
    }
}

impl Default for IsolateConfig {
    fn default() -> Self {
        Self { dim_opacity: 0.1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_parse_config;

    #[test]
    fn test_preview_config() {
        let config = test_parse_config(
            "[preview]\nhover_opacity = 0.5\ntransition_ms = 0\npulse_half_cycles = 6\n[isolate]\ndim_opacity = 0.2",
        );
        assert_eq!(config.preview.hover_opacity, 0.5);
        assert_eq!(config.preview.click_opacity, 0.3);
        assert_eq!(config.preview.transition_ms, 0);
        assert_eq!(config.preview.pulse_half_cycles, 6);
        assert_eq!(config.isolate.dim_opacity, 0.2);
    }

    #[test]
    fn test_preview_config_defaults() {
        let config = test_parse_config("");
        assert_eq!(config.preview, PreviewConfig::default());
        assert_eq!(config.isolate.dim_opacity, 0.1);
    }

    #[test]
    fn test_preview_validation() {
        let preview = PreviewConfig {
            hover_opacity: 2.0,
            pulse_half_cycles: 0,
            ..PreviewConfig::default()
        };
        let mut diag = ConfigDiagnostics::new();
        preview.validate(&mut diag);
        IsolateConfig { dim_opacity: 0.5 }.validate(&mut diag);

        let fields: Vec<_> = diag.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["preview.hover_opacity", "preview.pulse_half_cycles"]);
    }
}
