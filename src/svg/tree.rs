//! In-memory SVG document tree.
//!
//! Parsed with quick-xml into an arena of nodes, mutated in place, then
//! serialized back to text. Everything that is not an element (text,
//! comments, CDATA, processing instructions, the prolog) is kept verbatim so
//! a parse/serialize cycle only touches what the caller edits.

use quick_xml::Reader;
use quick_xml::escape::{escape, unescape};
use quick_xml::events::{BytesStart, Event};

use crate::error::{EngineError, Result};

/// Index of a node inside its [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone)]
pub struct Element {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<NodeId>,
    /// Written as `<name/>` when it still has no children.
    self_closing: bool,
}

impl Element {
    /// Qualified name as written in the source.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lowercase tag name, used for structural addressing.
    pub fn tag(&self) -> String {
        self.name.to_ascii_lowercase()
    }

    pub fn is(&self, tag: &str) -> bool {
        self.name.eq_ignore_ascii_case(tag)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Replace an attribute in place, or append it.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(key, _)| key == name) {
            Some(slot) => slot.1 = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let pos = self.attrs.iter().position(|(key, _)| key == name)?;
        Some(self.attrs.remove(pos).1)
    }
}

#[derive(Debug, Clone)]
enum NodeKind {
    Element(Element),
    /// Escaped text as it appeared in the source.
    Text(String),
    /// CDATA section content (without delimiters).
    CData(String),
    /// Comments, declarations, processing instructions, doctype.
    Verbatim(String),
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    kind: NodeKind,
}

#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    /// Top-level nodes in source order (prolog, root element, trailing comments).
    top: Vec<NodeId>,
    root: NodeId,
}

impl Document {
    /// Parse SVG markup. Fails only when the text is not well-formed XML or
    /// has no root element.
    pub fn parse(text: &str) -> Result<Self> {
        let mut reader = Reader::from_str(text);
        let mut builder = TreeBuilder::default();

        loop {
            let event = reader.read_event().map_err(|err| {
                EngineError::invalid(format!("{err} at byte {}", reader.error_position()))
            })?;

            match event {
                Event::Start(start) => {
                    let id = builder.element(&start, false)?;
                    builder.stack.push(id);
                }
                Event::Empty(start) => {
                    builder.element(&start, true)?;
                }
                Event::End(_) => {
                    builder.stack.pop();
                }
                Event::Text(text) => {
                    builder.push(NodeKind::Text(utf8(&text)?.to_string()));
                }
                Event::GeneralRef(reference) => {
                    builder.push(NodeKind::Text(format!("&{};", utf8(&reference)?)));
                }
                Event::CData(data) => {
                    builder.push(NodeKind::CData(utf8(&data)?.to_string()));
                }
                Event::Comment(comment) => {
                    builder.push(NodeKind::Verbatim(format!("<!--{}-->", utf8(&comment)?)));
                }
                Event::Decl(decl) => {
                    builder.push(NodeKind::Verbatim(format!("<?{}?>", utf8(&decl)?)));
                }
                Event::PI(pi) => {
                    builder.push(NodeKind::Verbatim(format!("<?{}?>", utf8(&pi)?)));
                }
                Event::DocType(doctype) => {
                    let doctype = utf8(&doctype)?.trim().to_string();
                    builder.push(NodeKind::Verbatim(format!("<!DOCTYPE {doctype}>")));
                }
                Event::Eof => break,
            }
        }

        builder.finish()
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.nodes.get(id.0)?.kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes.get_mut(id.0)?.kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0)?.parent
    }

    /// Element children of `id`, in document order.
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.element(id)
            .map(|element| element.children.as_slice())
            .unwrap_or_default()
            .iter()
            .copied()
            .filter(|child| self.element(*child).is_some())
    }

    /// All elements below the root (root excluded), depth-first in document order.
    pub fn descendants(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.element_children(self.root).collect();
        stack.reverse();
        while let Some(id) = stack.pop() {
            out.push(id);
            let mut children: Vec<NodeId> = self.element_children(id).collect();
            children.reverse();
            stack.extend(children);
        }
        out
    }

    /// First element whose `id` attribute equals `value`.
    pub fn find_by_id(&self, value: &str) -> Option<NodeId> {
        std::iter::once(self.root)
            .chain(self.descendants())
            .find(|id| self.element(*id).and_then(|e| e.attr("id")) == Some(value))
    }

    /// Concatenated, unescaped text of the direct children of `id`.
    pub fn text_content(&self, id: NodeId) -> String {
        let Some(element) = self.element(id) else {
            return String::new();
        };
        let mut out = String::new();
        for child in &element.children {
            match &self.nodes[child.0].kind {
                NodeKind::Text(raw) => match unescape(raw) {
                    Ok(text) => out.push_str(&text),
                    Err(_) => out.push_str(raw),
                },
                NodeKind::CData(data) => out.push_str(data),
                _ => {}
            }
        }
        out
    }

    /// Serialize back to markup.
    pub fn to_xml(&self) -> String {
        let mut out = String::with_capacity(1024);
        for id in &self.top {
            self.write_node(*id, &mut out);
        }
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        match &self.nodes[id.0].kind {
            NodeKind::Element(element) => {
                out.push('<');
                out.push_str(&element.name);
                for (key, value) in &element.attrs {
                    out.push(' ');
                    out.push_str(key);
                    out.push_str("=\"");
                    out.push_str(&escape(value.as_str()));
                    out.push('"');
                }
                if element.children.is_empty() && element.self_closing {
                    out.push_str("/>");
                    return;
                }
                out.push('>');
                for child in &element.children {
                    self.write_node(*child, out);
                }
                out.push_str("</");
                out.push_str(&element.name);
                out.push('>');
            }
            NodeKind::Text(raw) | NodeKind::Verbatim(raw) => out.push_str(raw),
            NodeKind::CData(data) => {
                out.push_str("<![CDATA[");
                out.push_str(data);
                out.push_str("]]>");
            }
        }
    }
}

// ============================================================================
// Parsing
// ============================================================================

#[derive(Default)]
struct TreeBuilder {
    nodes: Vec<Node>,
    top: Vec<NodeId>,
    stack: Vec<NodeId>,
}

impl TreeBuilder {
    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        let parent = self.stack.last().copied();
        self.nodes.push(Node { parent, kind });
        match parent {
            Some(parent) => {
                if let NodeKind::Element(element) = &mut self.nodes[parent.0].kind {
                    element.children.push(id);
                }
            }
            None => self.top.push(id),
        }
        id
    }

    fn element(&mut self, start: &BytesStart<'_>, self_closing: bool) -> Result<NodeId> {
        let name = utf8(start.name().as_ref())?.to_string();
        let mut attrs = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(EngineError::invalid)?;
            let key = utf8(attr.key.as_ref())?.to_string();
            let raw = utf8(&attr.value)?;
            let value = unescape(raw)
                .map(|value| value.into_owned())
                .unwrap_or_else(|_| raw.to_string());
            attrs.push((key, value));
        }
        Ok(self.push(NodeKind::Element(Element {
            name,
            attrs,
            children: Vec::new(),
            self_closing,
        })))
    }

    fn finish(self) -> Result<Document> {
        if let Some(open) = self.stack.last() {
            let name = match &self.nodes[open.0].kind {
                NodeKind::Element(element) => element.name.clone(),
                _ => String::new(),
            };
            return Err(EngineError::invalid(format!("unclosed element <{name}>")));
        }

        let root = self
            .top
            .iter()
            .copied()
            .find(|id| matches!(self.nodes[id.0].kind, NodeKind::Element(_)))
            .ok_or(EngineError::MissingRoot)?;

        Ok(Document {
            nodes: self.nodes,
            top: self.top,
            root,
        })
    }
}

fn utf8(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(EngineError::invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_serialize_preserves_structure() {
        let src = r#"<?xml version="1.0"?>
<!-- icon -->
<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><g><path d="M0 0h24" fill="red"/></g><text>a &amp; b</text></svg>"#;
        let doc = Document::parse(src).unwrap();
        assert_eq!(doc.to_xml(), src);
    }

    #[test]
    fn test_processing_instructions_kept() {
        let src = r#"<svg><?editor keep?><path fill="red"/>text</svg>"#;
        assert_eq!(Document::parse(src).unwrap().to_xml(), src);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(Document::parse("<svg><path></svg>").is_err());
        assert!(Document::parse("<svg><g>").is_err());
        assert!(matches!(
            Document::parse("just text"),
            Err(EngineError::MissingRoot)
        ));
    }

    #[test]
    fn test_attribute_roundtrip_escapes() {
        let mut doc = Document::parse(r#"<svg><rect title="a &lt; b"/></svg>"#).unwrap();
        let rect = doc.element_children(doc.root()).next().unwrap();
        assert_eq!(doc.element(rect).unwrap().attr("title"), Some("a < b"));

        doc.element_mut(rect).unwrap().set_attr("fill", "#FF0000");
        let out = doc.to_xml();
        assert!(out.contains(r#"title="a &lt; b""#));
        assert!(out.contains(r##"fill="#FF0000""##));
    }

    #[test]
    fn test_descendants_in_document_order() {
        let doc = Document::parse("<svg><g><circle/><rect/></g><path/></svg>").unwrap();
        let tags: Vec<String> = doc
            .descendants()
            .into_iter()
            .map(|id| doc.element(id).unwrap().tag())
            .collect();
        assert_eq!(tags, ["g", "circle", "rect", "path"]);
    }

    #[test]
    fn test_text_content_reads_cdata() {
        let doc =
            Document::parse("<svg><style><![CDATA[.a { fill: red; }]]></style></svg>").unwrap();
        let style = doc.element_children(doc.root()).next().unwrap();
        assert_eq!(doc.text_content(style), ".a { fill: red; }");
    }

    #[test]
    fn test_find_by_id() {
        let doc = Document::parse(r#"<svg><defs><linearGradient id="g1"/></defs></svg>"#).unwrap();
        let found = doc.find_by_id("g1").unwrap();
        assert!(doc.element(found).unwrap().is("lineargradient"));
        assert!(doc.find_by_id("missing").is_none());
    }
}
