//! Transient render hints: which elements an interaction touches, and a
//! dimmed copy of the document that highlights them.
//!
//! Nothing here writes to the color state. Hints are layered on a freshly
//! parsed copy of the document and thrown away after display.

mod handle;
mod isolate;

use std::collections::BTreeSet;

use serde::Serialize;

pub use handle::{DisplaySlot, ResourceSink};
pub use isolate::isolate_gradient_stop;

use crate::color::{NormalizedColor, normalize};
use crate::debug;
use crate::svg::style::{inline_property, set_inline_property};
use crate::svg::{self, Document, ElementPath};

use super::group::MemberKey;
use super::map::{ElementColorMap, GradientDefinitions, OriginalColor};
use super::slots::ImplicitKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PreviewMode {
    Hover,
    Click,
    AffectedPulse,
}

/// Side of the affected set that gets its opacity multiplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DimTarget {
    Affected,
    Rest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StopPreview {
    pub gradient_id: String,
    pub stop_index: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewState {
    pub active: bool,
    pub mode: Option<PreviewMode>,
    pub affected_paths: BTreeSet<ElementPath>,
    pub opacity: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gradient_stop_preview: Option<StopPreview>,
}

impl PreviewState {
    fn active(mode: PreviewMode, affected_paths: BTreeSet<ElementPath>, opacity: f64) -> Self {
        Self {
            active: true,
            mode: Some(mode),
            affected_paths,
            opacity,
            duration_ms: None,
            gradient_stop_preview: None,
        }
    }

    pub fn hover(affected_paths: BTreeSet<ElementPath>, opacity: f64) -> Self {
        Self::active(PreviewMode::Hover, affected_paths, opacity)
    }

    pub fn click(affected_paths: BTreeSet<ElementPath>, opacity: f64, duration_ms: u64) -> Self {
        Self {
            duration_ms: Some(duration_ms),
            ..Self::active(PreviewMode::Click, affected_paths, opacity)
        }
    }

    pub fn pulse(affected_paths: BTreeSet<ElementPath>, opacity: f64, interval_ms: u64) -> Self {
        Self {
            duration_ms: Some(interval_ms),
            ..Self::active(PreviewMode::AffectedPulse, affected_paths, opacity)
        }
    }

    /// Hover over a single gradient stop: highlight the elements painted with
    /// its gradient and remember which stop to isolate.
    pub fn stop(
        gradient_id: &str,
        stop_index: usize,
        affected_paths: BTreeSet<ElementPath>,
        opacity: f64,
    ) -> Self {
        Self {
            gradient_stop_preview: Some(StopPreview {
                gradient_id: gradient_id.to_string(),
                stop_index,
            }),
            ..Self::hover(affected_paths, opacity)
        }
    }

    /// Interaction ended.
    pub fn clear() -> Self {
        Self {
            opacity: 1.0,
            ..Self::default()
        }
    }

    /// Side dimmed by a still preview. Hover highlights what it touches;
    /// click flashes it.
    pub fn dim_target(&self) -> DimTarget {
        match self.mode {
            Some(PreviewMode::Click) => DimTarget::Affected,
            _ => DimTarget::Rest,
        }
    }
}

// ============================================================================
// Affected paths
// ============================================================================

/// Paths an identifier refers to.
///
/// - `group-<color>` / `group-UNSPECIFIED_GROUP`: paths with a channel
///   originally of that color (a bare `#…` color works too)
/// - `group-<gradient>` or a bare gradient id: paths painted with it
/// - `stop-<gradient>:<index>`: same as its gradient
/// - `slot-<path>:<channel>`: that path
/// - anything else: a literal path
pub fn affected_paths(
    identifier: &str,
    map: &ElementColorMap,
    gradients: &GradientDefinitions,
) -> BTreeSet<ElementPath> {
    let key = if identifier.starts_with('#') {
        match normalize(identifier) {
            Some(NormalizedColor::Hex(color)) => MemberKey::Group(ImplicitKey::Solid(color)),
            _ => MemberKey::Path(identifier.to_string()),
        }
    } else if gradients.contains_key(identifier) {
        MemberKey::Group(ImplicitKey::Gradient(identifier.to_string()))
    } else {
        identifier
            .parse()
            .unwrap_or_else(|_| MemberKey::Path(identifier.to_string()))
    };
    affected_by_member(&key, map)
}

pub(crate) fn affected_by_member(key: &MemberKey, map: &ElementColorMap) -> BTreeSet<ElementPath> {
    let paths_where = |keep: &dyn Fn(OriginalColor) -> bool| {
        map.iter()
            .filter(|(_, colors)| colors.entries().any(|(_, entry)| keep(entry.original())))
            .map(|(path, _)| path.clone())
            .collect::<BTreeSet<_>>()
    };
    let painted_with = |id: &str| {
        map.iter()
            .filter(|(_, colors)| colors.references(id))
            .map(|(path, _)| path.clone())
            .collect::<BTreeSet<_>>()
    };

    match key {
        MemberKey::Group(ImplicitKey::Solid(color)) => {
            paths_where(&|original| original == OriginalColor::Solid(*color))
        }
        MemberKey::Group(ImplicitKey::Unspecified) => {
            paths_where(&|original| original == OriginalColor::Unspecified)
        }
        MemberKey::Group(ImplicitKey::Gradient(id)) => painted_with(id),
        MemberKey::Stop { gradient_id, .. } => painted_with(gradient_id),
        MemberKey::Slot { path, .. } | MemberKey::Path(path) => BTreeSet::from([path.clone()]),
    }
}

// ============================================================================
// Render hints
// ============================================================================

/// Render `state` onto a copy of `svg` with its default dim side.
pub fn apply_preview(svg: &str, state: &PreviewState) -> String {
    render_hints(svg, state, state.dim_target())
}

/// Multiply the opacity of every shape on the `dim` side of the affected set
/// by `state.opacity`, attaching a transition when the state has a duration.
///
/// Returns the source unchanged for an inactive state or unparseable markup.
pub fn render_hints(svg: &str, state: &PreviewState, dim: DimTarget) -> String {
    if !state.active {
        return svg.to_string();
    }
    let mut doc = match Document::parse(svg) {
        Ok(doc) => doc,
        Err(err) => {
            debug!("preview"; "cannot render hints: {}", err);
            return svg.to_string();
        }
    };

    let targets: Vec<_> = svg::path::index(&doc)
        .into_iter()
        .filter(|(node, path)| {
            let is_shape = doc.element(*node).is_some_and(|e| svg::is_shape(&e.tag()));
            let affected = state.affected_paths.contains(path);
            is_shape && (affected == (dim == DimTarget::Affected))
        })
        .map(|(node, _)| node)
        .collect();

    for node in targets {
        let Some(element) = doc.element_mut(node) else {
            continue;
        };
        let style = element.attr("style").unwrap_or("").to_string();
        let inline = inline_property(&style, "opacity");
        let current = inline
            .as_deref()
            .or(element.attr("opacity"))
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .unwrap_or(1.0);
        let value = format_number(current * state.opacity);

        let mut style = if inline.is_some() {
            set_inline_property(&style, "opacity", &value)
        } else {
            element.set_attr("opacity", value);
            style
        };
        if let Some(ms) = state.duration_ms {
            style = set_inline_property(&style, "transition", &format!("opacity {ms}ms"));
        }
        if !style.is_empty() {
            element.set_attr("style", style);
        }
    }

    doc.to_xml()
}

/// Shortest decimal form with at most three fraction digits.
pub(crate) fn format_number(value: f64) -> String {
    let text = format!("{value:.3}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    match text {
        "" | "-0" => "0".to_string(),
        other => other.to_string(),
    }
}

// ============================================================================
// Pulse
// ============================================================================

/// One step of an affected-pulse animation. `dim: None` clears the preview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PulseFrame {
    pub at_ms: u64,
    pub dim: Option<DimTarget>,
}

/// Alternate between dimming the rest and dimming the affected set for
/// `half_cycles` steps of `interval_ms`, then clear.
pub fn pulse_frames(half_cycles: u32, interval_ms: u64) -> Vec<PulseFrame> {
    let mut frames: Vec<PulseFrame> = (0..half_cycles)
        .map(|step| PulseFrame {
            at_ms: u64::from(step) * interval_ms,
            dim: Some(if step % 2 == 0 {
                DimTarget::Rest
            } else {
                DimTarget::Affected
            }),
        })
        .collect();
    frames.push(PulseFrame {
        at_ms: u64::from(half_cycles) * interval_ms,
        dim: None,
    });
    frames
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::builder::build;

    const ICON: &str = r##"<svg><path fill="#F00"/><g><path fill="red" opacity=".5"/><rect fill="url(#g)"/></g><circle stroke="blue"/><linearGradient id="g"><stop stop-color="red"/></linearGradient></svg>"##;

    fn set(paths: &[&str]) -> BTreeSet<ElementPath> {
        paths.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn test_affected_paths_by_identifier() {
        let state = build(ICON).unwrap().unwrap();
        let map = &state.element_color_map;
        let defs = &state.gradient_definitions;

        let reds = set(&["g[0]/path[0]", "path[0]"]);
        assert_eq!(affected_paths("group-#FF0000FF", map, defs), reds);
        assert_eq!(affected_paths("#ff0000", map, defs), reds);
        assert_eq!(affected_paths("group-g", map, defs), set(&["g[0]/rect[0]"]));
        assert_eq!(affected_paths("g", map, defs), set(&["g[0]/rect[0]"]));
        assert_eq!(affected_paths("stop-g:0", map, defs), set(&["g[0]/rect[0]"]));
        assert_eq!(affected_paths("slot-circle[0]:stroke", map, defs), set(&["circle[0]"]));
        assert_eq!(
            affected_paths("group-UNSPECIFIED_GROUP", map, defs),
            set(&["circle[0]"])
        );
        assert_eq!(affected_paths("g[0]/path[0]", map, defs), set(&["g[0]/path[0]"]));
    }

    #[test]
    fn test_hover_dims_the_rest() {
        let state = PreviewState::hover(set(&["path[0]"]), 0.3);
        let out = apply_preview(ICON, &state);
        assert!(out.contains(r##"<path fill="#F00"/>"##), "{out}");
        assert!(out.contains(r#"<path fill="red" opacity="0.15"/>"#), "{out}");
        assert!(out.contains(r#"<rect fill="url(#g)" opacity="0.3"/>"#), "{out}");
        assert!(out.contains(r#"<circle stroke="blue" opacity="0.3"/>"#), "{out}");
        assert!(out.starts_with("<svg>"));
    }

    #[test]
    fn test_click_dims_affected_with_transition() {
        let state = PreviewState::click(set(&["circle[0]"]), 0.5, 150);
        let out = apply_preview(ICON, &state);
        assert!(
            out.contains(r#"<circle stroke="blue" opacity="0.5" style="transition: opacity 150ms"/>"#),
            "{out}"
        );
        assert!(out.contains(r##"<path fill="#F00"/>"##));
    }

    #[test]
    fn test_inline_opacity_multiplied_in_place() {
        let svg = r#"<svg><path style="opacity: 0.8; fill: red"/></svg>"#;
        let out = render_hints(svg, &PreviewState::hover(BTreeSet::new(), 0.5), DimTarget::Rest);
        assert!(out.contains(r#"style="opacity: 0.4; fill: red""#), "{out}");
    }

    #[test]
    fn test_inactive_or_invalid_is_passthrough() {
        assert_eq!(apply_preview(ICON, &PreviewState::clear()), ICON);
        let state = PreviewState::hover(BTreeSet::new(), 0.3);
        assert_eq!(apply_preview("<svg", &state), "<svg");
    }

    #[test]
    fn test_pulse_frames() {
        let frames = pulse_frames(4, 250);
        let schedule: Vec<(u64, Option<DimTarget>)> = frames.iter().map(|f| (f.at_ms, f.dim)).collect();
        assert_eq!(
            schedule,
            [
                (0, Some(DimTarget::Rest)),
                (250, Some(DimTarget::Affected)),
                (500, Some(DimTarget::Rest)),
                (750, Some(DimTarget::Affected)),
                (1000, None),
            ]
        );
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0.3), "0.3");
        assert_eq!(format_number(1.0), "1");
        assert_eq!(format_number(0.15), "0.15");
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(0.1 * 0.3), "0.03");
    }

    #[test]
    fn test_stop_preview_state() {
        let state = PreviewState::stop("g", 1, set(&["rect[0]"]), 0.3);
        assert_eq!(state.mode, Some(PreviewMode::Hover));
        assert_eq!(
            state.gradient_stop_preview,
            Some(StopPreview {
                gradient_id: "g".into(),
                stop_index: 1
            })
        );
        let json = serde_json::to_value(PreviewState::pulse(BTreeSet::new(), 0.3, 250)).unwrap();
        assert_eq!(json["mode"], "affected-pulse");
    }
}
