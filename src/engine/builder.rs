//! Color Map Builder: document text to [`ColorState`].

use std::collections::BTreeMap;

use crate::color::{Hex8, NormalizedColor, normalize};
use crate::debug;
use crate::error::Result;
use crate::svg::style::inline_property;
use crate::svg::{self, ClassRules, Document, Element, NodeId};

use super::map::{
    Channel, ColorEntry, ColorState, ElementColorMap, ElementColors, GradientDefinition,
    GradientDefinitions, GradientKind, GradientStop,
};

/// Geometry attributes copied into a [`GradientDefinition`].
const GEOMETRY_ATTRS: &[&str] = &[
    "x1",
    "y1",
    "x2",
    "y2",
    "cx",
    "cy",
    "r",
    "fx",
    "fy",
    "fr",
    "gradientTransform",
    "spreadMethod",
];

/// Where a paint property was found on an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PaintSource {
    Attribute,
    InlineStyle,
    ClassRule,
}

/// Raw value of `name` on an element: direct attribute, then inline style,
/// then class rules. First match wins.
pub(crate) fn lookup_property(
    element: &Element,
    class_decls: &BTreeMap<String, String>,
    name: &str,
) -> Option<(String, PaintSource)> {
    if let Some(value) = element.attr(name) {
        return Some((value.to_string(), PaintSource::Attribute));
    }
    if let Some(value) = element.attr("style").and_then(|style| inline_property(style, name)) {
        return Some((value, PaintSource::InlineStyle));
    }
    class_decls
        .get(name)
        .map(|value| (value.clone(), PaintSource::ClassRule))
}

/// Class declarations that apply to `element`.
pub(crate) fn class_declarations(rules: &ClassRules, element: &Element) -> BTreeMap<String, String> {
    match element.attr("class") {
        Some(class) if !rules.is_empty() => rules.declarations_for(class),
        _ => BTreeMap::new(),
    }
}

/// Build the color state of `svg`.
///
/// `Ok(None)` when the document has nothing customizable; `Err` only when
/// the text is not well-formed markup.
pub fn build(svg: &str) -> Result<Option<ColorState>> {
    let doc = Document::parse(svg)?;
    Ok(build_from_document(&doc))
}

pub fn build_from_document(doc: &Document) -> Option<ColorState> {
    let rules = ClassRules::from_document(doc);
    let gradient_definitions = collect_gradients(doc, &rules);
    let element_color_map = collect_elements(doc, &rules);

    debug!(
        "builder";
        "{} paintable elements, {} gradients",
        element_color_map.len(),
        gradient_definitions.len()
    );

    if element_color_map.is_empty() {
        return None;
    }
    Some(ColorState {
        element_color_map,
        gradient_definitions,
    })
}

fn collect_elements(doc: &Document, rules: &ClassRules) -> ElementColorMap {
    let mut map = ElementColorMap::new();

    for (node, path) in svg::path::index(doc) {
        let Some(element) = doc.element(node) else {
            continue;
        };
        let tag = element.tag();
        if node != doc.root() && !svg::is_shape(&tag) {
            continue;
        }

        let class_decls = class_declarations(rules, element);
        let mut colors = ElementColors::default();

        for channel in Channel::ALL {
            let Some((raw, _)) = lookup_property(element, &class_decls, channel.as_str()) else {
                continue;
            };
            match normalize(&raw) {
                Some(color) => colors.set_channel(channel, ColorEntry::from_normalized(color)),
                None => debug!("builder"; "{}: no usable {} in `{}`", path, channel, raw),
            }
        }

        if colors.fill.is_none() && svg::FILL_SHAPES.contains(&tag.as_str()) {
            colors.fill = Some(ColorEntry::unspecified());
        }
        if colors.stroke.is_none() && svg::STROKE_SHAPES.contains(&tag.as_str()) {
            colors.stroke = Some(ColorEntry::unspecified());
        }

        if colors.is_empty() {
            continue;
        }
        if !class_decls.is_empty() {
            colors.css_properties = Some(class_decls);
        }
        map.insert(path, colors);
    }

    map
}

fn collect_gradients(doc: &Document, rules: &ClassRules) -> GradientDefinitions {
    let mut defs = GradientDefinitions::new();

    for node in doc.descendants() {
        let Some(element) = doc.element(node) else {
            continue;
        };
        let Some(kind) = GradientKind::from_tag(&element.tag()) else {
            continue;
        };
        let Some(id) = element.attr("id") else {
            debug!("builder"; "skipping <{}> without id", element.name());
            continue;
        };
        if defs.contains_key(id) {
            debug!("builder"; "duplicate gradient id `{}`, keeping the first", id);
            continue;
        }

        let geometry = GEOMETRY_ATTRS
            .iter()
            .filter_map(|name| Some((name.to_string(), element.attr(name)?.to_string())))
            .collect();

        defs.insert(
            id.to_string(),
            GradientDefinition {
                kind,
                stops: gradient_stops(doc, node, rules),
                gradient_units: element.attr("gradientUnits").map(str::to_string),
                geometry,
            },
        );
    }

    defs
}

/// `<stop>` children of a gradient, in document order.
pub(crate) fn stop_nodes(doc: &Document, gradient: NodeId) -> Vec<NodeId> {
    doc.element_children(gradient)
        .filter(|child| doc.element(*child).is_some_and(|e| e.is("stop")))
        .collect()
}

fn gradient_stops(doc: &Document, gradient: NodeId, rules: &ClassRules) -> Vec<GradientStop> {
    stop_nodes(doc, gradient)
        .into_iter()
        .filter_map(|node| doc.element(node))
        .map(|stop| read_stop(stop, &class_declarations(rules, stop)))
        .collect()
}

pub(crate) fn read_stop(stop: &Element, class_decls: &BTreeMap<String, String>) -> GradientStop {
    let value = |name: &str| lookup_property(stop, class_decls, name).map(|(raw, _)| raw);

    let color = match value("stop-color").as_deref().map(normalize) {
        Some(Some(NormalizedColor::Hex(color))) => color,
        _ => Hex8::BLACK,
    };

    GradientStop {
        offset: stop.attr("offset").unwrap_or("0").trim().to_string(),
        color,
        opacity: value("stop-opacity")
            .map(|raw| raw.trim().to_string())
            .unwrap_or_else(|| "1".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::map::{OriginalColor, Paint};

    fn state(svg: &str) -> ColorState {
        build(svg).unwrap().unwrap()
    }

    #[test]
    fn test_unspecified_fill_is_synthesized() {
        let state = state(r#"<svg><circle r="5"/></svg>"#);
        let fill = state.entry("circle[0]", Channel::Fill).unwrap();
        assert_eq!(fill.original(), OriginalColor::Unspecified);
        assert_eq!(fill.current.to_string(), "#000000FF");
        assert!(state.entry("circle[0]", Channel::Stroke).is_none());
    }

    #[test]
    fn test_stroke_only_shapes_get_stroke_placeholder() {
        let state = state(r#"<svg><line x2="5"/><polyline points="0 0 1 1"/></svg>"#);
        for path in ["line[0]", "polyline[0]"] {
            assert!(state.entry(path, Channel::Fill).is_none());
            assert_eq!(
                state.entry(path, Channel::Stroke).unwrap().original(),
                OriginalColor::Unspecified
            );
        }
    }

    #[test]
    fn test_lookup_order() {
        let state = state(
            r#"<svg><style>.c { fill: blue; stroke: lime }</style>
            <path class="c" fill="red" style="fill: yellow"/>
            <path class="c" style="stroke: #123"/>
            </svg>"#,
        );
        let first = &state.element_color_map["path[0]"];
        assert_eq!(first.fill.as_ref().unwrap().original().solid(), Some(Hex8::opaque(255, 0, 0)));
        assert_eq!(first.stroke.as_ref().unwrap().original().solid(), Some(Hex8::opaque(0, 255, 0)));

        let second = &state.element_color_map["path[1]"];
        assert_eq!(second.fill.as_ref().unwrap().original().solid(), Some(Hex8::opaque(0, 0, 255)));
        assert_eq!(
            second.stroke.as_ref().unwrap().original().solid(),
            Some(Hex8::opaque(0x11, 0x22, 0x33))
        );
        let css = second.css_properties.as_ref().unwrap();
        assert!(css.contains_key("fill"));
        assert!(css.contains_key("stroke"));
    }

    #[test]
    fn test_root_and_non_shapes() {
        let state = state(r#"<svg fill="red"><g fill="blue"><text fill="lime">x</text><rect/></g></svg>"#);
        let paths: Vec<&str> = state.element_color_map.keys().map(String::as_str).collect();
        assert_eq!(paths, ["g[0]/rect[0]", "svg"]);
    }

    #[test]
    fn test_unparseable_color_falls_back_to_placeholder() {
        let state = state(r#"<svg><rect fill="inherit"/><rect stroke="bogus"/></svg>"#);
        let rect = &state.element_color_map["rect[0]"];
        assert_eq!(rect.fill.as_ref().unwrap().original(), OriginalColor::Unspecified);
        assert!(state.element_color_map["rect[1]"].stroke.is_none());
    }

    #[test]
    fn test_gradients_collected_in_order() {
        let state = state(
            r#"<svg>
              <defs>
                <linearGradient id="g1" x1="0" x2="1" gradientUnits="userSpaceOnUse">
                  <stop offset="0" stop-color="red"/>
                  <stop offset="0.5" style="stop-color:#00ff00;stop-opacity:.5"/>
                  <stop offset="1"/>
                </linearGradient>
                <radialGradient id="g2" cx="5" r="3"><stop stop-color="url(#x)"/></radialGradient>
              </defs>
              <rect fill="url(#g1)"/>
              <circle fill="url('#g2')"/>
              <path fill="url(other.svg#p)"/>
            </svg>"#,
        );

        let g1 = &state.gradient_definitions["g1"];
        assert_eq!(g1.kind, GradientKind::LinearGradient);
        assert_eq!(g1.gradient_units.as_deref(), Some("userSpaceOnUse"));
        assert_eq!(g1.geometry.get("x2").map(String::as_str), Some("1"));
        let stops: Vec<(&str, String, &str)> = g1
            .stops
            .iter()
            .map(|s| (s.offset.as_str(), s.color.to_string(), s.opacity.as_str()))
            .collect();
        assert_eq!(
            stops,
            [
                ("0", "#FF0000FF".to_string(), "1"),
                ("0.5", "#00FF00FF".to_string(), ".5"),
                ("1", "#000000FF".to_string(), "1"),
            ]
        );

        let g2 = &state.gradient_definitions["g2"];
        assert_eq!(g2.kind, GradientKind::RadialGradient);
        assert_eq!(g2.stops[0].color, Hex8::BLACK);

        let rect = state.entry("rect[0]", Channel::Fill).unwrap();
        assert!(rect.is_gradient);
        assert_eq!(rect.gradient_id.as_deref(), Some("g1"));
        assert_eq!(rect.original(), OriginalColor::Gradient);

        let circle = state.entry("circle[0]", Channel::Fill).unwrap();
        assert_eq!(circle.gradient_id.as_deref(), Some("g2"));

        let path = state.entry("path[0]", Channel::Fill).unwrap();
        assert!(path.cannot_customize);
        assert_eq!(path.current, Paint::Url("url(other.svg#p)".into()));
    }

    #[test]
    fn test_nothing_customizable() {
        assert!(build("<svg><g/><text>hi</text></svg>").unwrap().is_none());
        assert!(build("<svg><path").is_err());
    }

    #[test]
    fn test_two_red_paths() {
        let state = state(r##"<svg><path fill="#FF0000"/><path fill="#FF0000"/></svg>"##);
        assert_eq!(state.element_color_map.len(), 2);
        for colors in state.element_color_map.values() {
            assert_eq!(colors.fill.as_ref().unwrap().original().to_string(), "#FF0000FF");
        }
    }
}
