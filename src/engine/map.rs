//! Color state of one document: per-element entries and gradient definitions.
//!
//! Everything here serializes to the JSON shape stored with a persisted
//! configuration (`elementColorMap`, `gradientDefinitions`, camelCase keys).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::{GradientRef, Hex8, NormalizedColor};
use crate::svg::ElementPath;

/// Paint channel of an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Fill,
    Stroke,
}

impl Channel {
    pub const ALL: [Self; 2] = [Self::Fill, Self::Stroke];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fill => "fill",
            Self::Stroke => "stroke",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "fill" => Some(Self::Fill),
            "stroke" => Some(Self::Stroke),
            _ => None,
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Paint values
// ============================================================================

/// Color a channel had when the document was loaded. Never changes.
///
/// Serialized as `#RRGGBBAA`, `UNSPECIFIED` or `GRADIENT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OriginalColor {
    Solid(Hex8),
    Unspecified,
    Gradient,
}

impl OriginalColor {
    pub fn solid(self) -> Option<Hex8> {
        match self {
            Self::Solid(color) => Some(color),
            _ => None,
        }
    }
}

impl fmt::Display for OriginalColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Solid(color) => color.fmt(f),
            Self::Unspecified => f.write_str("UNSPECIFIED"),
            Self::Gradient => f.write_str("GRADIENT"),
        }
    }
}

impl TryFrom<String> for OriginalColor {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.as_str() {
            "UNSPECIFIED" => Ok(Self::Unspecified),
            "GRADIENT" => Ok(Self::Gradient),
            other => other.parse().map(Self::Solid).map_err(|e| e.to_string()),
        }
    }
}

impl From<OriginalColor> for String {
    fn from(value: OriginalColor) -> Self {
        value.to_string()
    }
}

/// Renderable value of a channel: a solid color or a `url(…)` reference.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Paint {
    Solid(Hex8),
    /// Raw `url(…)` value.
    Url(String),
}

impl Paint {
    pub fn gradient(id: &str) -> Self {
        Self::Url(format!("url(#{id})"))
    }

    pub fn solid(&self) -> Option<Hex8> {
        match self {
            Self::Solid(color) => Some(*color),
            Self::Url(_) => None,
        }
    }

    /// Local gradient id this paint references.
    pub fn gradient_id(&self) -> Option<String> {
        match self {
            Self::Url(raw) => match crate::color::parse_url(raw) {
                GradientRef::Id(id) => Some(id),
                GradientRef::Uncustomizable(_) => None,
            },
            Self::Solid(_) => None,
        }
    }
}

impl fmt::Display for Paint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Solid(color) => color.fmt(f),
            Self::Url(raw) => f.write_str(raw),
        }
    }
}

impl TryFrom<String> for Paint {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.trim_start().to_ascii_lowercase().starts_with("url(") {
            return Ok(Self::Url(value));
        }
        value.parse().map(Self::Solid).map_err(|e| e.to_string())
    }
}

impl From<Paint> for String {
    fn from(value: Paint) -> Self {
        value.to_string()
    }
}

// ============================================================================
// Entries
// ============================================================================

/// Normalized original/current color pair for one paint channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorEntry {
    original: OriginalColor,
    pub current: Paint,
    pub is_gradient: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient_id: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub cannot_customize: bool,
    /// Set once the channel is explicitly recolored; cleared by reset.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    edited: bool,
}

impl ColorEntry {
    pub fn solid(color: Hex8) -> Self {
        Self {
            original: OriginalColor::Solid(color),
            current: Paint::Solid(color),
            is_gradient: false,
            gradient_id: None,
            cannot_customize: false,
            edited: false,
        }
    }

    /// Placeholder for a channel with no color; renders black.
    pub fn unspecified() -> Self {
        Self {
            original: OriginalColor::Unspecified,
            current: Paint::Solid(Hex8::BLACK),
            is_gradient: false,
            gradient_id: None,
            cannot_customize: false,
            edited: false,
        }
    }

    pub fn gradient(id: &str) -> Self {
        Self {
            original: OriginalColor::Gradient,
            current: Paint::gradient(id),
            is_gradient: true,
            gradient_id: Some(id.to_string()),
            cannot_customize: false,
            edited: false,
        }
    }

    /// `url(…)` paint that does not name a local gradient (pattern, external
    /// resource). Kept as written.
    pub fn uncustomizable(raw: &str) -> Self {
        Self {
            original: OriginalColor::Gradient,
            current: Paint::Url(raw.to_string()),
            is_gradient: true,
            gradient_id: None,
            cannot_customize: true,
            edited: false,
        }
    }

    pub fn from_normalized(color: NormalizedColor) -> Self {
        match color {
            NormalizedColor::Hex(hex) => Self::solid(hex),
            NormalizedColor::Unspecified => Self::unspecified(),
            NormalizedColor::Gradient(GradientRef::Id(id)) => Self::gradient(&id),
            NormalizedColor::Gradient(GradientRef::Uncustomizable(raw)) => {
                Self::uncustomizable(&raw)
            }
        }
    }

    pub fn original(&self) -> OriginalColor {
        self.original
    }

    /// Placeholder nobody has recolored yet. An explicit edit to black is
    /// not untouched: `none` and unstroked lines must then be written.
    pub fn is_untouched_placeholder(&self) -> bool {
        self.original == OriginalColor::Unspecified && !self.edited
    }

    pub fn is_edited(&self) -> bool {
        self.edited
    }

    /// Value `current` had right after loading.
    pub fn baseline_paint(&self) -> Paint {
        match (self.original, &self.gradient_id) {
            (OriginalColor::Solid(color), _) => Paint::Solid(color),
            (OriginalColor::Unspecified, _) => Paint::Solid(Hex8::BLACK),
            (OriginalColor::Gradient, Some(id)) => Paint::gradient(id),
            (OriginalColor::Gradient, None) => self.current.clone(),
        }
    }

    /// Set `current` to a solid color. No-op on uncustomizable entries.
    pub fn set_color(&mut self, color: Hex8) -> bool {
        if self.cannot_customize {
            return false;
        }
        self.current = Paint::Solid(color);
        self.edited = true;
        true
    }

    pub fn reset(&mut self) {
        self.current = self.baseline_paint();
        self.edited = false;
    }
}

/// Fill/stroke entries of one element, plus the declarations class rules
/// gave it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementColors {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<ColorEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<ColorEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css_properties: Option<BTreeMap<String, String>>,
}

impl ElementColors {
    pub fn channel(&self, channel: Channel) -> Option<&ColorEntry> {
        match channel {
            Channel::Fill => self.fill.as_ref(),
            Channel::Stroke => self.stroke.as_ref(),
        }
    }

    pub fn channel_mut(&mut self, channel: Channel) -> Option<&mut ColorEntry> {
        match channel {
            Channel::Fill => self.fill.as_mut(),
            Channel::Stroke => self.stroke.as_mut(),
        }
    }

    pub fn set_channel(&mut self, channel: Channel, entry: ColorEntry) {
        match channel {
            Channel::Fill => self.fill = Some(entry),
            Channel::Stroke => self.stroke = Some(entry),
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = (Channel, &ColorEntry)> {
        Channel::ALL
            .into_iter()
            .filter_map(|channel| self.channel(channel).map(|entry| (channel, entry)))
    }

    pub fn is_empty(&self) -> bool {
        self.fill.is_none() && self.stroke.is_none()
    }

    /// Whether any channel currently paints with gradient `id`.
    pub fn references(&self, id: &str) -> bool {
        self.entries()
            .any(|(_, entry)| entry.current.gradient_id().as_deref() == Some(id))
    }
}

/// Per-path color state of a document.
pub type ElementColorMap = BTreeMap<ElementPath, ElementColors>;

// ============================================================================
// Gradients
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientKind {
    LinearGradient,
    RadialGradient,
}

impl GradientKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "lineargradient" => Some(Self::LinearGradient),
            "radialgradient" => Some(Self::RadialGradient),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradientStop {
    pub offset: String,
    pub color: Hex8,
    pub opacity: String,
}

/// Stop list and geometry of one gradient, keyed by its document id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradientDefinition {
    #[serde(rename = "type")]
    pub kind: GradientKind,
    pub stops: Vec<GradientStop>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient_units: Option<String>,
    /// `x1`/`y1`/`x2`/`y2`, `cx`/`cy`/`r`, `gradientTransform`, …
    #[serde(flatten)]
    pub geometry: BTreeMap<String, String>,
}

pub type GradientDefinitions = BTreeMap<String, GradientDefinition>;

/// Everything the builder extracts from a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorState {
    pub element_color_map: ElementColorMap,
    pub gradient_definitions: GradientDefinitions,
}

impl ColorState {
    pub fn entry(&self, path: &str, channel: Channel) -> Option<&ColorEntry> {
        self.element_color_map.get(path)?.channel(channel)
    }

    pub fn entry_mut(&mut self, path: &str, channel: Channel) -> Option<&mut ColorEntry> {
        self.element_color_map.get_mut(path)?.channel_mut(channel)
    }

    pub fn stop(&self, gradient_id: &str, index: usize) -> Option<&GradientStop> {
        self.gradient_definitions.get(gradient_id)?.stops.get(index)
    }

    pub fn stop_mut(&mut self, gradient_id: &str, index: usize) -> Option<&mut GradientStop> {
        self.gradient_definitions
            .get_mut(gradient_id)?
            .stops
            .get_mut(index)
    }
}
