//! Transform Engine: write a color map back into document text.
//!
//! Gradient stops are rewritten first (when definitions are supplied), then
//! every element entry. Paths that no longer resolve and paints that point at
//! missing gradients are skipped.

use crate::color::{HexStyle, normalize};
use crate::debug;
use crate::error::Result;
use crate::svg::style::{inline_property, remove_inline_property, set_inline_property};
use crate::svg::{self, ClassRules, Document, NodeId};

use super::builder::{PaintSource, class_declarations, lookup_property, read_stop, stop_nodes};
use super::map::{ColorEntry, ElementColorMap, GradientDefinitions, Paint};

/// Rewrite `svg` so its paints match `map`. Returns the source unchanged when
/// it cannot be parsed.
pub fn transform(svg: &str, map: &ElementColorMap, gradients: Option<&GradientDefinitions>) -> String {
    transform_with(svg, map, gradients, HexStyle::default())
}

pub fn transform_with(
    svg: &str,
    map: &ElementColorMap,
    gradients: Option<&GradientDefinitions>,
    style: HexStyle,
) -> String {
    match try_transform(svg, map, gradients, style) {
        Ok(out) => out,
        Err(err) => {
            debug!("transform"; "returning source unchanged: {}", err);
            svg.to_string()
        }
    }
}

/// Like [`transform`], but reports documents that cannot be parsed.
pub fn try_transform(
    svg: &str,
    map: &ElementColorMap,
    gradients: Option<&GradientDefinitions>,
    style: HexStyle,
) -> Result<String> {
    let mut doc = Document::parse(svg)?;
    let rules = ClassRules::from_document(&doc);

    if let Some(defs) = gradients {
        rewrite_gradients(&mut doc, &rules, defs, style);
    }
    apply_mappings(&mut doc, &rules, map, gradients, style);

    Ok(doc.to_xml())
}

/// Rewrite the stops of every defined gradient present in the document.
pub(crate) fn rewrite_gradients(
    doc: &mut Document,
    rules: &ClassRules,
    defs: &GradientDefinitions,
    style: HexStyle,
) {
    for (id, def) in defs {
        let Some(gradient) = doc.find_by_id(id) else {
            debug!("transform"; "gradient `{}` not in document, skipping", id);
            continue;
        };
        let stops = stop_nodes(doc, gradient);
        if stops.len() != def.stops.len() {
            debug!(
                "transform";
                "gradient `{}` has {} stops, definition has {}",
                id,
                stops.len(),
                def.stops.len()
            );
        }

        for (node, stop) in stops.into_iter().zip(&def.stops) {
            let Some(element) = doc.element(node) else {
                continue;
            };
            let decls = class_declarations(rules, element);
            let current = read_stop(element, &decls);
            let color_source = lookup_property(element, &decls, "stop-color").map(|(_, s)| s);
            let opacity_source = lookup_property(element, &decls, "stop-opacity").map(|(_, s)| s);

            if current.color != stop.color {
                write_property(doc, node, "stop-color", &stop.color.to_css(style), color_source);
            }
            if current.opacity != stop.opacity {
                write_property(doc, node, "stop-opacity", &stop.opacity, opacity_source);
            }
            if current.offset != stop.offset
                && let Some(element) = doc.element_mut(node)
            {
                element.set_attr("offset", stop.offset.as_str());
            }
        }
    }
}

fn apply_mappings(
    doc: &mut Document,
    rules: &ClassRules,
    map: &ElementColorMap,
    gradients: Option<&GradientDefinitions>,
    style: HexStyle,
) {
    for (path, colors) in map {
        let Some(node) = svg::resolve(doc, path) else {
            debug!("transform"; "skipping stale path {}", path);
            continue;
        };

        for (channel, entry) in colors.entries() {
            let Some(value) = paint_value(doc, entry, gradients, style) else {
                continue;
            };
            let Some(element) = doc.element(node) else {
                continue;
            };
            let decls = class_declarations(rules, element);
            let existing = lookup_property(element, &decls, channel.as_str());

            if let Some((raw, _)) = &existing
                && normalize(raw).is_some()
                && normalize(raw) == normalize(&value)
            {
                continue;
            }
            write_property(doc, node, channel.as_str(), &value, existing.map(|(_, s)| s));
        }
    }
}

/// Value to write for an entry, or `None` to leave the channel alone.
fn paint_value(
    doc: &Document,
    entry: &ColorEntry,
    gradients: Option<&GradientDefinitions>,
    style: HexStyle,
) -> Option<String> {
    if entry.cannot_customize || entry.is_untouched_placeholder() {
        return None;
    }
    match &entry.current {
        Paint::Solid(color) => Some(color.to_css(style)),
        Paint::Url(raw) => {
            let id = entry.current.gradient_id()?;
            let known = match gradients {
                Some(defs) => defs.contains_key(&id),
                None => doc.find_by_id(&id).is_some(),
            };
            if !known {
                debug!("transform"; "no gradient definition `{}`, leaving paint untouched", id);
                return None;
            }
            Some(raw.clone())
        }
    }
}

/// Set a presentation property.
///
/// Inline-style and class-sourced values are written into `style` (which
/// outranks both the attribute and class rules) and the attribute is dropped;
/// everything else becomes an attribute with any stale style declaration
/// stripped.
fn write_property(
    doc: &mut Document,
    node: NodeId,
    name: &str,
    value: &str,
    source: Option<PaintSource>,
) {
    let Some(element) = doc.element_mut(node) else {
        return;
    };
    let style = element.attr("style").map(str::to_string);
    let inline = style
        .as_deref()
        .is_some_and(|style| inline_property(style, name).is_some());

    if inline || source == Some(PaintSource::ClassRule) {
        let updated = set_inline_property(style.as_deref().unwrap_or(""), name, value);
        element.set_attr("style", updated);
        element.remove_attr(name);
        return;
    }

    element.set_attr(name, value);
    if let Some(style) = style {
        let stripped = remove_inline_property(&style, name);
        if stripped.is_empty() {
            element.remove_attr("style");
        } else if stripped != style {
            element.set_attr("style", stripped);
        }
    }
}
