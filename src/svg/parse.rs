//! `quick-xml` event stream → [`SvgDom`].

use std::collections::HashMap;
use std::sync::LazyLock;

use quick_xml::Reader;
use quick_xml::escape::{resolve_predefined_entity, unescape_with};
use quick_xml::events::{BytesStart, Event};
use regex_lite::Regex;

use super::dom::{Attribute, NodeData, NodeId, QualName, SvgDom};
use crate::error::ParseError;

/// Internal general entity declarations with a quoted literal value.
static ENTITY_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<!ENTITY\s+([A-Za-z_:][\w.:-]*)\s+(?:"([^"]*)"|'([^']*)')\s*>"#)
        .expect("entity declaration pattern is valid")
});

/// Entities declared in a DOCTYPE internal subset, by name.
type Entities = HashMap<String, String>;

/// Parse markup text into an owned tree.
///
/// Text and attribute values are stored unescaped. Entities declared in the
/// DOCTYPE internal subset are expanded alongside the predefined ones. Any
/// structural problem (bad syntax, mismatched or unclosed tags, no root, stray
/// content outside the root, undeclared entities) is reported as a
/// [`ParseError`].
pub fn parse(text: &str) -> Result<SvgDom, ParseError> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(false);

    let mut dom = SvgDom::new();
    let document = dom.document();
    let mut open: Vec<NodeId> = Vec::new();
    let mut seen_root = false;
    let mut entities = Entities::new();

    loop {
        let start = reader.buffer_position() as usize;
        let event = reader.read_event().map_err(|source| ParseError::Xml {
            position: reader.buffer_position() as u64,
            source,
        })?;
        let end = reader.buffer_position() as usize;
        let parent = open.last().copied().unwrap_or(document);

        match event {
            Event::Start(e) => {
                if open.is_empty() && seen_root {
                    return Err(ParseError::ContentOutsideRoot);
                }
                let position = reader.buffer_position() as u64;
                let id = create_element(&mut dom, &e, &entities, position)?;
                dom.append(parent, id);
                open.push(id);
                seen_root = true;
            }
            Event::Empty(e) => {
                if open.is_empty() && seen_root {
                    return Err(ParseError::ContentOutsideRoot);
                }
                let position = reader.buffer_position() as u64;
                let id = create_element(&mut dom, &e, &entities, position)?;
                dom.append(parent, id);
                seen_root = true;
            }
            Event::End(e) => {
                let found = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                let Some(id) = open.pop() else {
                    return Err(ParseError::UnmatchedEnd(found));
                };
                let expected = dom
                    .element_name(id)
                    .map(ToString::to_string)
                    .unwrap_or_default();
                if expected != found {
                    return Err(ParseError::MismatchedEnd { expected, found });
                }
            }
            Event::Text(e) => {
                let raw = String::from_utf8_lossy(e.as_ref());
                push_text(&mut dom, parent, document, &raw)?;
            }
            Event::GeneralRef(e) => {
                let entity = String::from_utf8_lossy(e.as_ref());
                let resolved = resolve_entity(&entity, &entities)
                    .ok_or_else(|| ParseError::UnknownEntity(entity.to_string()))?;
                push_text(&mut dom, parent, document, &resolved)?;
            }
            Event::CData(e) => {
                if parent == document {
                    return Err(ParseError::ContentOutsideRoot);
                }
                let content = String::from_utf8_lossy(e.as_ref()).into_owned();
                let id = dom.create_node(NodeData::CData(content));
                dom.append(parent, id);
            }
            Event::Comment(e) => {
                let content = String::from_utf8_lossy(e.as_ref()).into_owned();
                let id = dom.create_node(NodeData::Comment(content));
                dom.append(parent, id);
            }
            Event::Decl(_) => {
                let id = dom.create_node(NodeData::Declaration(text[start..end].to_string()));
                dom.append(parent, id);
            }
            Event::PI(_) => {
                let markup = text[start..end].to_string();
                let id = dom.create_node(NodeData::ProcessingInstruction(markup));
                dom.append(parent, id);
            }
            Event::DocType(_) => {
                let markup = &text[start..end];
                collect_entities(markup, &mut entities);
                let id = dom.create_node(NodeData::Doctype(markup.to_string()));
                dom.append(parent, id);
            }
            Event::Eof => break,
        }
    }

    if let Some(&unclosed) = open.last() {
        let name = dom
            .element_name(unclosed)
            .map(ToString::to_string)
            .unwrap_or_default();
        return Err(ParseError::Unclosed(name));
    }
    if !seen_root {
        return Err(ParseError::NoRoot);
    }

    Ok(dom)
}

fn create_element(
    dom: &mut SvgDom,
    e: &BytesStart<'_>,
    entities: &Entities,
    position: u64,
) -> Result<NodeId, ParseError> {
    let name = QualName::parse(&String::from_utf8_lossy(e.name().as_ref()));

    let mut attrs = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| ParseError::Xml {
            position,
            source: err.into(),
        })?;
        let key = String::from_utf8_lossy(attr.key.as_ref());
        let raw = String::from_utf8_lossy(&attr.value);
        let value = unescape_with(&raw, |name| {
            resolve_predefined_entity(name).or_else(|| entities.get(name).map(String::as_str))
        })?
        .into_owned();
        attrs.push(Attribute {
            name: QualName::parse(&key),
            value,
        });
    }

    Ok(dom.create_element(name, attrs))
}

/// Append character data, merging with a preceding text node.
///
/// Only whitespace may appear outside the root element.
fn push_text(
    dom: &mut SvgDom,
    parent: NodeId,
    document: NodeId,
    text: &str,
) -> Result<(), ParseError> {
    if parent == document && !text.trim().is_empty() {
        return Err(ParseError::ContentOutsideRoot);
    }

    let last = dom.get(parent).map(|n| n.last_child).unwrap_or(NodeId::NONE);
    if let Some(existing) = dom.text_mut(last) {
        existing.push_str(text);
        return Ok(());
    }

    let id = dom.create_text(text);
    dom.append(parent, id);
    Ok(())
}

/// Record the general entities declared in a DOCTYPE.
///
/// Parameter and external entities are not matched. The first declaration of
/// a name wins.
fn collect_entities(doctype: &str, entities: &mut Entities) {
    for cap in ENTITY_DECL.captures_iter(doctype) {
        let value = cap.get(2).or_else(|| cap.get(3)).map_or("", |m| m.as_str());
        entities
            .entry(cap[1].to_string())
            .or_insert_with(|| value.to_string());
    }
}

/// Resolve a named or numeric reference found in character data.
fn resolve_entity(entity: &str, entities: &Entities) -> Option<String> {
    if let Some(value) = resolve_predefined_entity(entity) {
        return Some(value.to_string());
    }
    if let Some(value) = entities.get(entity) {
        return Some(value.clone());
    }

    let code = if let Some(hex) = entity
        .strip_prefix("#x")
        .or_else(|| entity.strip_prefix("#X"))
    {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        entity.strip_prefix('#')?.parse::<u32>().ok()?
    };

    char::from_u32(code).map(|c| c.to_string())
}
