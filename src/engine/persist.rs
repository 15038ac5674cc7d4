//! Persisted color configuration stored alongside a badge or template.
//!
//! ```json
//! { "type": "svg-color-map", "version": 1, "mappings": { … }, "gradients": { … } }
//! ```

use serde::{Deserialize, Serialize};

use crate::color::HexStyle;
use crate::error::{EngineError, Result};

use super::map::{ColorState, ElementColorMap, GradientDefinitions};
use super::transform::transform_with;

pub const CONFIGURATION_TYPE: &str = "svg-color-map";
pub const CONFIGURATION_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorConfiguration {
    #[serde(rename = "type")]
    pub kind: String,
    pub version: u32,
    pub mappings: ElementColorMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradients: Option<GradientDefinitions>,
}

impl ColorConfiguration {
    pub fn new(state: &ColorState) -> Self {
        Self {
            kind: CONFIGURATION_TYPE.to_string(),
            version: CONFIGURATION_VERSION,
            mappings: state.element_color_map.clone(),
            gradients: (!state.gradient_definitions.is_empty())
                .then(|| state.gradient_definitions.clone()),
        }
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }

    /// Parse and check the type tag and version.
    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        if config.kind != CONFIGURATION_TYPE {
            return Err(EngineError::UnknownConfigurationType(config.kind));
        }
        if config.version != CONFIGURATION_VERSION {
            return Err(EngineError::UnsupportedVersion(config.version));
        }
        Ok(config)
    }

    /// Render the configuration onto `svg`.
    pub fn apply(&self, svg: &str, style: HexStyle) -> String {
        transform_with(svg, &self.mappings, self.gradients.as_ref(), style)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Hex8;
    use crate::engine::builder::build;
    use crate::engine::map::Channel;

    #[test]
    fn test_json_roundtrip_and_apply() {
        let svg = r#"<svg><path fill="red"/></svg>"#;
        let mut state = build(svg).unwrap().unwrap();
        state
            .entry_mut("path[0]", Channel::Fill)
            .unwrap()
            .set_color(Hex8::opaque(0, 0, 255));

        let config = ColorConfiguration::new(&state);
        assert!(config.gradients.is_none());
        let json = config.to_json(false).unwrap();
        assert!(json.starts_with(r#"{"type":"svg-color-map","version":1,"mappings":{"path[0]""#), "{json}");

        let loaded = ColorConfiguration::from_json(&json).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.apply(svg, HexStyle::Auto), r##"<svg><path fill="#0000FF"/></svg>"##);
    }

    #[test]
    fn test_rejects_unknown_type_and_version() {
        let wrong_type = r#"{"type":"png-map","version":1,"mappings":{}}"#;
        assert!(matches!(
            ColorConfiguration::from_json(wrong_type),
            Err(EngineError::UnknownConfigurationType(kind)) if kind == "png-map"
        ));

        let wrong_version = r#"{"type":"svg-color-map","version":2,"mappings":{}}"#;
        assert!(matches!(
            ColorConfiguration::from_json(wrong_version),
            Err(EngineError::UnsupportedVersion(2))
        ));

        assert!(matches!(
            ColorConfiguration::from_json("{"),
            Err(EngineError::Json(_))
        ));
    }
}
