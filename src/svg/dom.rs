//! Arena-based tree for SVG documents.
//!
//! All nodes live in one vector; parent/child/sibling links are indices into
//! it. Every walk uses an explicit stack so deeply nested markup cannot
//! exhaust the call stack.

use std::fmt;

/// Namespace of the legacy `xlink:href` attribute.
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

/// Namespace of SVG elements.
pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Namespace implicitly bound to the `xml` prefix.
pub const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// Unique identifier for a node in the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Sentinel value for no node.
    pub const NONE: NodeId = NodeId(u32::MAX);

    pub fn is_some(&self) -> bool {
        self.0 != u32::MAX
    }

    pub fn is_none(&self) -> bool {
        self.0 == u32::MAX
    }
}

/// A possibly prefixed element or attribute name, kept as written.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualName {
    pub prefix: Option<String>,
    pub local: String,
}

impl QualName {
    pub fn new(prefix: Option<&str>, local: &str) -> Self {
        Self {
            prefix: prefix.map(str::to_string),
            local: local.to_string(),
        }
    }

    pub fn local(local: &str) -> Self {
        Self::new(None, local)
    }

    /// Split `prefix:local` at the first colon.
    pub fn parse(raw: &str) -> Self {
        match raw.split_once(':') {
            Some((prefix, local)) if !prefix.is_empty() && !local.is_empty() => {
                Self::new(Some(prefix), local)
            }
            _ => Self::local(raw),
        }
    }

    pub fn is(&self, prefix: Option<&str>, local: &str) -> bool {
        self.prefix.as_deref() == prefix && self.local == local
    }
}

impl fmt::Display for QualName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{prefix}:{}", self.local),
            None => f.write_str(&self.local),
        }
    }
}

/// Attribute with an unescaped value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: QualName,
    pub value: String,
}

impl Attribute {
    pub fn new(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: QualName::parse(name),
            value: value.into(),
        }
    }
}

/// Node payload.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    /// Document root.
    Document,
    /// Element with name and attributes.
    Element { name: QualName, attrs: Vec<Attribute> },
    /// Unescaped character data.
    Text(String),
    /// `<![CDATA[...]]>` content, written back verbatim.
    CData(String),
    /// Comment body without the delimiters.
    Comment(String),
    /// `<?target ...?>` markup, verbatim.
    ProcessingInstruction(String),
    /// `<?xml ...?>` declaration, verbatim.
    Declaration(String),
    /// `<!DOCTYPE ...>` markup, verbatim.
    Doctype(String),
}

/// A node in the arena.
#[derive(Debug)]
pub struct Node {
    pub data: NodeData,
    pub parent: NodeId,
    pub first_child: NodeId,
    pub last_child: NodeId,
    pub prev_sibling: NodeId,
    pub next_sibling: NodeId,
}

impl Node {
    fn new(data: NodeData) -> Self {
        Self {
            data,
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
        }
    }
}

/// Parsed SVG document, exclusively owned by whoever transforms it.
#[derive(Debug)]
pub struct SvgDom {
    nodes: Vec<Node>,
    document: NodeId,
}

impl SvgDom {
    /// Create a new empty tree with a document root.
    pub fn new() -> Self {
        let mut dom = Self {
            nodes: Vec::new(),
            document: NodeId::NONE,
        };
        dom.document = dom.alloc(NodeData::Document);
        dom
    }

    fn alloc(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(data));
        id
    }

    pub fn document(&self) -> NodeId {
        self.document
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if id.is_none() {
            return None;
        }
        self.nodes.get_mut(id.0 as usize)
    }

    pub fn create_element(&mut self, name: QualName, attrs: Vec<Attribute>) -> NodeId {
        self.alloc(NodeData::Element { name, attrs })
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeData::Text(text.into()))
    }

    /// Allocate a detached node of any kind.
    pub fn create_node(&mut self, data: NodeData) -> NodeId {
        self.alloc(data)
    }

    /// Append a child to a parent node.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        let last_child = self
            .get(parent)
            .map(|n| n.last_child)
            .unwrap_or(NodeId::NONE);

        if let Some(child_node) = self.get_mut(child) {
            child_node.parent = parent;
            child_node.prev_sibling = last_child;
            child_node.next_sibling = NodeId::NONE;
        }

        if let Some(last_node) = self.get_mut(last_child) {
            last_node.next_sibling = child;
        }

        if let Some(parent_node) = self.get_mut(parent) {
            if parent_node.first_child.is_none() {
                parent_node.first_child = child;
            }
            parent_node.last_child = child;
        }
    }

    /// Insert a node before a sibling.
    pub fn insert_before(&mut self, sibling: NodeId, new_node: NodeId) {
        let (parent, prev) = match self.get(sibling) {
            Some(n) => (n.parent, n.prev_sibling),
            None => return,
        };

        if let Some(new) = self.get_mut(new_node) {
            new.parent = parent;
            new.prev_sibling = prev;
            new.next_sibling = sibling;
        }

        if let Some(sib) = self.get_mut(sibling) {
            sib.prev_sibling = new_node;
        }

        if prev.is_some() {
            if let Some(p) = self.get_mut(prev) {
                p.next_sibling = new_node;
            }
        } else if let Some(par) = self.get_mut(parent) {
            par.first_child = new_node;
        }
    }

    /// Make `child` the first child of `parent`.
    pub fn prepend(&mut self, parent: NodeId, child: NodeId) {
        match self.get(parent).map(|n| n.first_child) {
            Some(first) if first.is_some() => self.insert_before(first, child),
            _ => self.append(parent, child),
        }
    }

    /// Iterate over children of a node.
    pub fn children(&self, parent: NodeId) -> ChildrenIter<'_> {
        let first = self
            .get(parent)
            .map(|n| n.first_child)
            .unwrap_or(NodeId::NONE);
        ChildrenIter {
            dom: self,
            current: first,
        }
    }

    /// All descendants of `id` in document order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).collect();
        stack.reverse();
        while let Some(current) = stack.pop() {
            out.push(current);
            let first_len = stack.len();
            stack.extend(self.children(current));
            stack[first_len..].reverse();
        }
        out
    }

    /// Every element in document order.
    pub fn elements(&self) -> Vec<NodeId> {
        self.descendants(self.document)
            .into_iter()
            .filter(|&id| self.is_element(id))
            .collect()
    }

    /// The outermost element.
    pub fn root_element(&self) -> Option<NodeId> {
        self.children(self.document).find(|&id| self.is_element(id))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the tree is empty (only has the document root).
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }
}

impl Default for SvgDom {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over children of a node.
pub struct ChildrenIter<'a> {
    dom: &'a SvgDom,
    current: NodeId,
}

impl Iterator for ChildrenIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current.is_none() {
            return None;
        }
        let id = self.current;
        self.current = self
            .dom
            .get(id)
            .map(|n| n.next_sibling)
            .unwrap_or(NodeId::NONE);
        Some(id)
    }
}

/// Convenience methods for element and text nodes.
impl SvgDom {
    pub fn element_name(&self, id: NodeId) -> Option<&QualName> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Element { name, .. } => Some(name),
            _ => None,
        })
    }

    /// Local part of the element name.
    pub fn local_name(&self, id: NodeId) -> Option<&str> {
        self.element_name(id).map(|n| n.local.as_str())
    }

    pub fn attrs(&self, id: NodeId) -> &[Attribute] {
        self.get(id)
            .and_then(|n| match &n.data {
                NodeData::Element { attrs, .. } => Some(attrs.as_slice()),
                _ => None,
            })
            .unwrap_or(&[])
    }

    pub fn attrs_mut(&mut self, id: NodeId) -> Option<&mut Vec<Attribute>> {
        self.get_mut(id).and_then(|n| match &mut n.data {
            NodeData::Element { attrs, .. } => Some(attrs),
            _ => None,
        })
    }

    /// Get an attribute value by qualified name as written (`href`, `xlink:href`).
    pub fn get_attr(&self, id: NodeId, name: &str) -> Option<&str> {
        let name = QualName::parse(name);
        self.attrs(id)
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Set an attribute, replacing an existing one with the same qualified name.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        let name = QualName::parse(name);
        let value = value.into();
        if let Some(attrs) = self.attrs_mut(id) {
            match attrs.iter_mut().find(|a| a.name == name) {
                Some(attr) => attr.value = value,
                None => attrs.push(Attribute { name, value }),
            }
        }
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        self.get(id)
            .is_some_and(|n| matches!(n.data, NodeData::Element { .. }))
    }

    pub fn is_text(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(|n| matches!(n.data, NodeData::Text(_)))
    }

    pub fn text_content(&self, id: NodeId) -> Option<&str> {
        self.get(id).and_then(|n| match &n.data {
            NodeData::Text(s) => Some(s.as_str()),
            _ => None,
        })
    }

    pub fn text_mut(&mut self, id: NodeId) -> Option<&mut String> {
        self.get_mut(id).and_then(|n| match &mut n.data {
            NodeData::Text(s) => Some(s),
            _ => None,
        })
    }

    /// Namespace URI bound to `prefix` (or the default namespace) at `id`.
    ///
    /// Walks the ancestor chain looking for the nearest declaration.
    pub fn lookup_namespace(&self, id: NodeId, prefix: Option<&str>) -> Option<&str> {
        if prefix == Some("xml") {
            return Some(XML_NS);
        }
        let mut current = id;
        while let Some(node) = self.get(current) {
            if let NodeData::Element { attrs, .. } = &node.data {
                let found = attrs.iter().find(|a| match prefix {
                    Some(p) => a.name.is(Some("xmlns"), p),
                    None => a.name.is(None, "xmlns"),
                });
                if let Some(attr) = found {
                    return Some(attr.value.as_str());
                }
            }
            current = node.parent;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qualname_parse() {
        assert_eq!(QualName::parse("xlink:href"), QualName::new(Some("xlink"), "href"));
        assert_eq!(QualName::parse("href"), QualName::local("href"));
        assert_eq!(QualName::parse(":odd"), QualName::local(":odd"));
        assert_eq!(QualName::parse("xlink:href").to_string(), "xlink:href");
    }

    #[test]
    fn test_append_and_prepend() {
        let mut dom = SvgDom::new();
        let svg = dom.create_element(QualName::local("svg"), vec![]);
        dom.append(dom.document(), svg);

        let a = dom.create_element(QualName::local("g"), vec![]);
        let b = dom.create_element(QualName::local("rect"), vec![]);
        dom.append(svg, a);
        dom.prepend(svg, b);

        let children: Vec<_> = dom.children(svg).collect();
        assert_eq!(children, vec![b, a]);
        assert_eq!(dom.root_element(), Some(svg));
    }

    #[test]
    fn test_descendants_in_document_order() {
        let mut dom = SvgDom::new();
        let svg = dom.create_element(QualName::local("svg"), vec![]);
        let g = dom.create_element(QualName::local("g"), vec![]);
        let t = dom.create_text("hi");
        let r = dom.create_element(QualName::local("rect"), vec![]);
        dom.append(dom.document(), svg);
        dom.append(svg, g);
        dom.append(g, t);
        dom.append(svg, r);

        assert_eq!(dom.descendants(svg), vec![g, t, r]);
        assert_eq!(dom.elements(), vec![svg, g, r]);
    }

    #[test]
    fn test_deep_nesting_does_not_recurse() {
        let mut dom = SvgDom::new();
        let mut parent = dom.document();
        for _ in 0..100_000 {
            let g = dom.create_element(QualName::local("g"), vec![]);
            dom.append(parent, g);
            parent = g;
        }
        assert_eq!(dom.elements().len(), 100_000);
    }

    #[test]
    fn test_attributes() {
        let mut dom = SvgDom::new();
        let img = dom.create_element(
            QualName::local("image"),
            vec![Attribute::new("xlink:href", "a.png")],
        );
        assert_eq!(dom.get_attr(img, "xlink:href"), Some("a.png"));
        assert_eq!(dom.get_attr(img, "href"), None);

        dom.set_attr(img, "xlink:href", "b.png");
        dom.set_attr(img, "width", "10");
        assert_eq!(dom.get_attr(img, "xlink:href"), Some("b.png"));
        assert_eq!(dom.attrs(img).len(), 2);
    }

    #[test]
    fn test_lookup_namespace() {
        let mut dom = SvgDom::new();
        let svg = dom.create_element(
            QualName::local("svg"),
            vec![
                Attribute::new("xmlns", SVG_NS),
                Attribute::new("xmlns:xlink", XLINK_NS),
            ],
        );
        let img = dom.create_element(QualName::local("image"), vec![]);
        dom.append(dom.document(), svg);
        dom.append(svg, img);

        assert_eq!(dom.lookup_namespace(img, Some("xlink")), Some(XLINK_NS));
        assert_eq!(dom.lookup_namespace(img, None), Some(SVG_NS));
        assert_eq!(dom.lookup_namespace(img, Some("x")), None);
    }
}
