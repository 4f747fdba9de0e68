//! [`SvgDom`] → markup text.

use super::dom::{NodeData, NodeId, SvgDom};

enum Step {
    Open(NodeId),
    Close(NodeId),
}

/// Serialize the whole tree back to text.
pub fn serialize(dom: &SvgDom) -> String {
    let mut out = String::new();
    let mut stack = vec![Step::Open(dom.document())];

    while let Some(step) = stack.pop() {
        match step {
            Step::Open(id) => {
                let Some(node) = dom.get(id) else { continue };
                match &node.data {
                    NodeData::Document => push_children(dom, id, &mut stack),
                    NodeData::Element { name, attrs } => {
                        out.push('<');
                        out.push_str(&name.to_string());
                        for attr in attrs {
                            out.push(' ');
                            out.push_str(&attr.name.to_string());
                            out.push('=');
                            write_attr_value(&mut out, &attr.value);
                        }
                        if node.first_child.is_none() {
                            out.push_str("/>");
                        } else {
                            out.push('>');
                            stack.push(Step::Close(id));
                            push_children(dom, id, &mut stack);
                        }
                    }
                    NodeData::Text(text) => escape_text(&mut out, text),
                    NodeData::CData(text) => {
                        out.push_str("<![CDATA[");
                        out.push_str(text);
                        out.push_str("]]>");
                    }
                    NodeData::Comment(text) => {
                        out.push_str("<!--");
                        out.push_str(text);
                        out.push_str("-->");
                    }
                    NodeData::ProcessingInstruction(markup)
                    | NodeData::Declaration(markup)
                    | NodeData::Doctype(markup) => out.push_str(markup),
                }
            }
            Step::Close(id) => {
                if let Some(name) = dom.element_name(id) {
                    out.push_str("</");
                    out.push_str(&name.to_string());
                    out.push('>');
                }
            }
        }
    }

    out
}

fn push_children(dom: &SvgDom, id: NodeId, stack: &mut Vec<Step>) {
    let start = stack.len();
    stack.extend(dom.children(id).map(Step::Open));
    stack[start..].reverse();
}

fn escape_text(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

/// Quote an attribute value, picking the delimiter that needs no escaping.
///
/// `url("a.png")` inside a style attribute stays readable as
/// `style='fill:url("a.png")'` instead of turning into `&quot;` soup.
fn write_attr_value(out: &mut String, value: &str) {
    let quote = if value.contains('"') && !value.contains('\'') {
        '\''
    } else {
        '"'
    };

    out.push(quote);
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\t' => out.push_str("&#9;"),
            '"' if quote == '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out.push(quote);
}
