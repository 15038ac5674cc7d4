//! tinct - recolor SVG icons without breaking their structure.
//!
//! The engine reads every paintable node of an icon into a color map keyed
//! by structural element paths, lets callers edit it (single slots, implicit
//! same-color groups, explicit groups, HSL/alpha adjustments) and writes the
//! result back onto the original markup.
//!
//! The functions at the crate root are the boundary offered to surrounding
//! application code; [`engine::EditSession`] bundles them for one icon.

pub mod cli;
pub mod color;
pub mod config;
pub mod engine;
pub mod error;
pub mod logger;
pub mod svg;

use std::collections::BTreeSet;

use color::NormalizedColor;
use engine::{AdjustmentState, ColorState, ElementColorMap, GradientDefinitions, GroupBook, Scope};
use error::Result;
use svg::ElementPath;

/// Build the color state of `svg`.
///
/// `Ok(None)` when the icon has nothing customizable; an error only for
/// markup that cannot be parsed at all.
pub fn load_document(svg: &str) -> Result<Option<ColorState>> {
    engine::build(svg)
}

/// Write `map` (and, when given, gradient stops) back onto `svg`.
///
/// Unparseable markup comes back unchanged.
pub fn transform(
    svg: &str,
    map: &ElementColorMap,
    gradients: Option<&GradientDefinitions>,
) -> String {
    engine::transform(svg, map, gradients)
}

/// Canonical form of a raw paint value, or `None` for unsupported syntax.
pub fn normalize_color(raw: &str) -> Option<NormalizedColor> {
    color::normalize(raw)
}

/// Element paths an identifier (group key, gradient id, slot, stop or path)
/// refers to.
pub fn compute_affected_paths(
    identifier: &str,
    map: &ElementColorMap,
    gradients: &GradientDefinitions,
) -> BTreeSet<ElementPath> {
    engine::affected_paths(identifier, map, gradients)
}

/// Apply the change between two slider states of `scope` to `state`.
///
/// Returns how many colors changed.
pub fn apply_group_delta(
    scope: &Scope,
    groups: &GroupBook,
    prev: AdjustmentState,
    next: AdjustmentState,
    state: &mut ColorState,
) -> usize {
    let targets = engine::group::adjust::resolve_targets(scope, groups, state);
    engine::group::adjust::apply_delta(&targets, prev, next, state)
}
