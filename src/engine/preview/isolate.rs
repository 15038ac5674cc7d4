use crate::color::HexStyle;
use crate::debug;
use crate::engine::builder::stop_nodes;
use crate::engine::map::GradientDefinitions;
use crate::engine::transform::rewrite_gradients;
use crate::svg::style::{inline_property, set_inline_property};
use crate::svg::{ClassRules, Document};

use super::format_number;

/// Render `svg` with every stop of `gradient_id` faded to `dim_opacity`
/// except the one at `stop_index`, which is forced fully opaque.
///
/// Stops are first brought in line with the live `gradients` (written in
/// `style`), so the isolation always shows the colors being edited. Unknown
/// gradients and unparseable markup return the source unchanged.
pub fn isolate_gradient_stop(
    svg: &str,
    gradients: &GradientDefinitions,
    gradient_id: &str,
    stop_index: usize,
    dim_opacity: f64,
    style: HexStyle,
) -> String {
    let mut doc = match Document::parse(svg) {
        Ok(doc) => doc,
        Err(err) => {
            debug!("isolate"; "cannot isolate stop: {}", err);
            return svg.to_string();
        }
    };

    let rules = ClassRules::from_document(&doc);
    rewrite_gradients(&mut doc, &rules, gradients, style);

    let Some(gradient) = doc.find_by_id(gradient_id) else {
        debug!("isolate"; "no gradient `{}`", gradient_id);
        return svg.to_string();
    };

    let dimmed = format_number(dim_opacity);
    for (index, node) in stop_nodes(&doc, gradient).into_iter().enumerate() {
        let Some(stop) = doc.element_mut(node) else {
            continue;
        };
        let value = if index == stop_index { "1" } else { dimmed.as_str() };

        match stop.attr("style") {
            Some(style) if inline_property(style, "stop-opacity").is_some() => {
                let style = set_inline_property(style, "stop-opacity", value);
                stop.set_attr("style", style);
            }
            _ => stop.set_attr("stop-opacity", value),
        }
    }

    doc.to_xml()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Hex8;
    use crate::engine::builder::build;

    const GRADIENT: &str = r#"<svg><linearGradient id="g"><stop offset="0" stop-color="red"/><stop offset=".5" stop-color="lime" stop-opacity=".7"/><stop offset="1" style="stop-color:blue;stop-opacity:.9"/></linearGradient><rect fill="url(#g)"/></svg>"#;

    #[test]
    fn test_isolates_one_stop() {
        let state = build(GRADIENT).unwrap().unwrap();
        let out = isolate_gradient_stop(GRADIENT, &state.gradient_definitions, "g", 1, 0.1, HexStyle::Auto);
        assert!(out.contains(r#"<stop offset="0" stop-color="red" stop-opacity="0.1"/>"#), "{out}");
        assert!(out.contains(r#"<stop offset=".5" stop-color="lime" stop-opacity="1"/>"#), "{out}");
        assert!(out.contains(r#"<stop offset="1" style="stop-color:blue;stop-opacity: 0.1"/>"#), "{out}");
    }

    #[test]
    fn test_isolation_uses_live_definitions() {
        let mut state = build(GRADIENT).unwrap().unwrap();
        state.stop_mut("g", 0).unwrap().color = Hex8::opaque(0, 0, 0);
        let out = isolate_gradient_stop(GRADIENT, &state.gradient_definitions, "g", 0, 0.1, HexStyle::Auto);
        assert!(out.contains(r##"<stop offset="0" stop-color="#000000" stop-opacity="1"/>"##), "{out}");
    }

    #[test]
    fn test_unknown_gradient_is_passthrough() {
        let state = build(GRADIENT).unwrap().unwrap();
        assert_eq!(
            isolate_gradient_stop(GRADIENT, &state.gradient_definitions, "missing", 0, 0.1, HexStyle::Auto),
            GRADIENT
        );
    }
}
