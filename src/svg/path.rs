//! Structural element addressing.
//!
//! A path is built from `tag[index]` segments joined by `/`, where `index`
//! counts preceding siblings with the same (lowercase) tag name. The root
//! element is always `svg` and is not part of its descendants' paths:
//!
//! ```text
//! <svg>                 svg
//!   <g>                 g[0]
//!     <path/>           g[0]/path[0]
//!     <rect/>           g[0]/rect[0]
//!     <path/>           g[0]/path[1]
//!   </g>
//!   <path/>             path[0]
//! </svg>
//! ```
//!
//! Paths survive color edits (which never change structure) and go stale on
//! structural edits; resolving a stale path yields `None`.

use rustc_hash::FxHashMap;

use super::tree::{Document, NodeId};

/// Stable structural address of an element.
pub type ElementPath = String;

/// Path of the document root.
pub const ROOT_PATH: &str = "svg";

/// Compute the path of `node`. `None` for non-elements.
pub fn path_of(doc: &Document, node: NodeId) -> Option<ElementPath> {
    if node == doc.root() {
        return Some(ROOT_PATH.to_string());
    }

    let mut segments = Vec::new();
    let mut current = node;
    while current != doc.root() {
        let tag = doc.element(current)?.tag();
        let parent = doc.parent(current)?;
        let index = doc
            .element_children(parent)
            .take_while(|sibling| *sibling != current)
            .filter(|sibling| doc.element(*sibling).is_some_and(|e| e.is(&tag)))
            .count();
        segments.push(format!("{tag}[{index}]"));
        current = parent;
    }

    segments.reverse();
    Some(segments.join("/"))
}

/// Resolve a path back to its element, or `None` when it no longer exists.
pub fn resolve(doc: &Document, path: &str) -> Option<NodeId> {
    if path == ROOT_PATH {
        return Some(doc.root());
    }

    let mut current = doc.root();
    for segment in path.split('/') {
        let (tag, index) = parse_segment(segment)?;
        current = doc
            .element_children(current)
            .filter(|child| doc.element(*child).is_some_and(|e| e.is(tag)))
            .nth(index)?;
    }
    Some(current)
}

/// Paths of the root and every element below it, in document order.
///
/// Computed in one walk rather than calling [`path_of`] per node.
pub fn index(doc: &Document) -> Vec<(NodeId, ElementPath)> {
    let mut out = vec![(doc.root(), ROOT_PATH.to_string())];
    index_children(doc, doc.root(), "", &mut out);
    out
}

fn index_children(doc: &Document, parent: NodeId, prefix: &str, out: &mut Vec<(NodeId, ElementPath)>) {
    let mut seen: FxHashMap<String, usize> = FxHashMap::default();
    for child in doc.element_children(parent) {
        let Some(element) = doc.element(child) else {
            continue;
        };
        let tag = element.tag();
        let counter = seen.entry(tag.clone()).or_insert(0);
        let path = format!("{prefix}{tag}[{counter}]");
        *counter += 1;

        out.push((child, path.clone()));
        index_children(doc, child, &format!("{path}/"), out);
    }
}

fn parse_segment(segment: &str) -> Option<(&str, usize)> {
    let (tag, index) = segment.strip_suffix(']')?.split_once('[')?;
    if tag.is_empty() {
        return None;
    }
    Some((tag, index.parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ICON: &str = "<svg><g><path/><rect/><path/></g><path/><circle/></svg>";

    #[test]
    fn test_root_path() {
        let doc = Document::parse(ICON).unwrap();
        assert_eq!(path_of(&doc, doc.root()).unwrap(), "svg");
        assert_eq!(resolve(&doc, "svg"), Some(doc.root()));
    }

    #[test]
    fn test_paths_count_same_tag_siblings() {
        let doc = Document::parse(ICON).unwrap();
        let paths: Vec<String> = index(&doc).into_iter().map(|(_, p)| p).collect();
        assert_eq!(
            paths,
            ["svg", "g[0]", "g[0]/path[0]", "g[0]/rect[0]", "g[0]/path[1]", "path[0]", "circle[0]"]
        );
    }

    #[test]
    fn test_path_of_matches_index_and_is_stable() {
        let doc = Document::parse(ICON).unwrap();
        for (node, path) in index(&doc) {
            assert_eq!(path_of(&doc, node).unwrap(), path);
            assert_eq!(path_of(&doc, node), path_of(&doc, node));
            assert_eq!(resolve(&doc, &path), Some(node));
        }
    }

    #[test]
    fn test_sibling_paths_differ_only_in_index() {
        let doc = Document::parse("<svg><path/><path/></svg>").unwrap();
        let nodes: Vec<_> = doc.element_children(doc.root()).collect();
        assert_eq!(path_of(&doc, nodes[0]).unwrap(), "path[0]");
        assert_eq!(path_of(&doc, nodes[1]).unwrap(), "path[1]");
    }

    #[test]
    fn test_structurally_identical_documents_share_paths() {
        let a = Document::parse(r#"<svg><g><path fill="red"/></g></svg>"#).unwrap();
        let b = Document::parse(r#"<svg><g><path fill="blue"/></g></svg>"#).unwrap();
        let pa: Vec<String> = index(&a).into_iter().map(|(_, p)| p).collect();
        let pb: Vec<String> = index(&b).into_iter().map(|(_, p)| p).collect();
        assert_eq!(pa, pb);
    }

    #[test]
    fn test_stale_paths_resolve_to_none() {
        let doc = Document::parse(ICON).unwrap();
        assert_eq!(resolve(&doc, "g[0]/path[2]"), None);
        assert_eq!(resolve(&doc, "ellipse[0]"), None);
        assert_eq!(resolve(&doc, "g[1]/path[0]"), None);
        assert_eq!(resolve(&doc, "garbage"), None);
        assert_eq!(resolve(&doc, "path[x]"), None);
        assert_eq!(resolve(&doc, ""), None);
    }

    #[test]
    fn test_tag_matching_is_case_insensitive() {
        let doc = Document::parse(r#"<svg><defs><linearGradient id="a"/></defs></svg>"#).unwrap();
        let node = resolve(&doc, "defs[0]/lineargradient[0]").unwrap();
        assert_eq!(doc.element(node).unwrap().attr("id"), Some("a"));
    }
}
