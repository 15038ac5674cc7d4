//! SVG document layer.
//!
//! - [`tree`]: parse to an in-memory tree, mutate, serialize back
//! - [`path`]: structural `tag[index]` addressing of elements
//! - [`style`]: inline `style` declarations and `<style>` class rules

pub mod path;
pub mod style;
pub mod tree;

pub use path::{ElementPath, ROOT_PATH, path_of, resolve};
pub use style::ClassRules;
pub use tree::{Document, Element, NodeId};

/// Elements that carry paint and are offered for customization.
pub const SHAPE_TAGS: &[&str] = &[
    "path", "circle", "rect", "ellipse", "polygon", "line", "polyline",
];

/// Shapes that render a fill; they get a placeholder fill entry when none is set.
pub const FILL_SHAPES: &[&str] = &["path", "circle", "rect", "ellipse", "polygon"];

/// Shapes that only render a stroke; they get a placeholder stroke entry instead.
pub const STROKE_SHAPES: &[&str] = &["line", "polyline"];

pub fn is_shape(tag: &str) -> bool {
    SHAPE_TAGS.contains(&tag)
}

pub fn is_gradient(tag: &str) -> bool {
    matches!(tag, "lineargradient" | "radialgradient")
}
