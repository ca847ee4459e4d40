use std::collections::BTreeMap;

use ov_core::{OdeError, ParseOptions, SourceLocation, SourceSpan};
use roxmltree::{Document, Node, NodeType};

const NOT_WELL_FORMED: &str = "XML document is not well-formed.";

#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    pub root: XmlElementNode,
}

#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElementNode),
    Text(XmlTextNode),
}

#[derive(Debug, Clone, PartialEq)]
pub struct XmlElementNode {
    /// Local name; namespace prefixes and URIs are dropped.
    pub name: String,
    pub attributes: BTreeMap<String, String>,
    pub children: Vec<XmlNode>,
    pub location: SourceSpan,
}

#[derive(Debug, Clone, PartialEq)]
pub struct XmlTextNode {
    pub value: String,
    pub location: SourceSpan,
}

impl XmlDocument {
    // Root included.
    pub fn descendants_named(&self, name: &str) -> Vec<&XmlElementNode> {
        let mut found = Vec::new();
        if self.root.name == name {
            found.push(&self.root);
        }
        self.root.collect_named(name, &mut found);
        found
    }
}

impl XmlElementNode {
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn element_children(&self) -> impl Iterator<Item = &XmlElementNode> {
        self.children.iter().filter_map(|entry| match entry {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) => None,
        })
    }

    pub fn child_named(&self, name: &str) -> Option<&XmlElementNode> {
        self.element_children().find(|child| child.name == name)
    }

    pub fn has_child_named(&self, name: &str) -> bool {
        self.child_named(name).is_some()
    }

    pub fn descendants_named(&self, name: &str) -> Vec<&XmlElementNode> {
        let mut found = Vec::new();
        self.collect_named(name, &mut found);
        found
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.push_text(&mut out);
        out
    }

    pub fn child_text(&self, name: &str) -> Option<String> {
        let text = self.child_named(name)?.text_content();
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    fn collect_named<'a>(&'a self, name: &str, found: &mut Vec<&'a XmlElementNode>) {
        for child in self.element_children() {
            if child.name == name {
                found.push(child);
            }
            child.collect_named(name, found);
        }
    }

    fn push_text(&self, out: &mut String) {
        for entry in &self.children {
            match entry {
                XmlNode::Text(text) => out.push_str(&text.value),
                XmlNode::Element(element) => element.push_text(out),
            }
        }
    }
}

pub fn parse_xml_document(source: &str) -> Result<XmlDocument, OdeError> {
    parse_xml_document_with(source, &ParseOptions::default())
}

// Nesting is checked before roxmltree runs; neither parser recurses past the bound.
pub fn parse_xml_document_with(
    source: &str,
    options: &ParseOptions,
) -> Result<XmlDocument, OdeError> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    if nesting_exceeds(source, options.max_depth) {
        return Err(OdeError::too_deep(options.max_depth));
    }
    let document = Document::parse(source).map_err(|error| {
        let position = error.pos();
        let detail = error.to_string();
        let message = if detail.trim().is_empty() {
            NOT_WELL_FORMED.to_string()
        } else {
            format!("XML document is not well-formed: {}", detail)
        };
        OdeError::with_span(
            "XML_PARSE_ERROR",
            message,
            SourceSpan::point(position.row as usize, position.col as usize),
        )
    })?;

    let Some(root) = document.root().children().find(|node| node.is_element()) else {
        return Err(OdeError::new("XML_PARSE_ERROR", NOT_WELL_FORMED));
    };

    Ok(XmlDocument {
        root: parse_element(&document, root),
    })
}

pub fn parse_xml_bytes(bytes: &[u8]) -> Result<XmlDocument, OdeError> {
    let source = std::str::from_utf8(bytes).map_err(|error| {
        OdeError::new(
            "XML_PARSE_ERROR",
            format!("Manifest payload is not text: {}", error),
        )
    })?;
    parse_xml_document(source)
}

// Malformed markup stops the scan; roxmltree reports it.
fn nesting_exceeds(source: &str, limit: usize) -> bool {
    let mut depth = 0usize;
    let mut index = 0;
    while let Some(offset) = source[index..].find('<') {
        let start = index + offset;
        let rest = &source[start..];
        let end = if rest.starts_with("<!--") {
            skip_past(source, start, "-->")
        } else if rest.starts_with("<![CDATA[") {
            skip_past(source, start, "]]>")
        } else if rest.starts_with("<?") {
            skip_past(source, start, "?>")
        } else if rest.starts_with("<!") {
            declaration_end(source, start)
        } else if rest.starts_with("</") {
            depth = depth.saturating_sub(1);
            tag_end(source, start).map(|end| end + 1)
        } else {
            let end = tag_end(source, start);
            if let Some(end) = end {
                if source.as_bytes()[end - 1] != b'/' {
                    depth += 1;
                    if depth > limit {
                        return true;
                    }
                }
            }
            end.map(|end| end + 1)
        };
        let Some(end) = end else {
            break;
        };
        index = end;
    }
    false
}

fn skip_past(source: &str, from: usize, terminator: &str) -> Option<usize> {
    source[from..]
        .find(terminator)
        .map(|offset| from + offset + terminator.len())
}

fn tag_end(source: &str, from: usize) -> Option<usize> {
    let mut quote = None;
    for (offset, byte) in source.as_bytes()[from..].iter().enumerate() {
        match quote {
            Some(open) if *byte == open => quote = None,
            Some(_) => {}
            None if *byte == b'"' || *byte == b'\'' => quote = Some(*byte),
            None if *byte == b'>' => return Some(from + offset),
            None => {}
        }
    }
    None
}

// DOCTYPE may carry an internal subset in brackets.
fn declaration_end(source: &str, from: usize) -> Option<usize> {
    let mut brackets = 0usize;
    for (offset, byte) in source.as_bytes()[from..].iter().enumerate() {
        match byte {
            b'[' => brackets += 1,
            b']' => brackets = brackets.saturating_sub(1),
            b'>' if brackets == 0 => return Some(from + offset + 1),
            _ => {}
        }
    }
    None
}

fn parse_element(document: &Document<'_>, node: Node<'_, '_>) -> XmlElementNode {
    let mut attributes = BTreeMap::new();
    for attribute in node.attributes() {
        attributes.insert(attribute.name().to_string(), attribute.value().to_string());
    }

    let mut children = Vec::new();
    for child in node.children() {
        match child.node_type() {
            NodeType::Element => children.push(XmlNode::Element(parse_element(document, child))),
            NodeType::Text => {
                let value = child.text().unwrap_or_default().to_string();
                if value.is_empty() {
                    continue;
                }
                children.push(XmlNode::Text(XmlTextNode {
                    value,
                    location: node_span(document, child.range().start, child.range().end),
                }));
            }
            _ => {}
        }
    }

    XmlElementNode {
        name: node.tag_name().name().to_string(),
        attributes,
        children,
        location: node_span(document, node.range().start, node.range().end),
    }
}

fn node_span(document: &Document<'_>, start: usize, end: usize) -> SourceSpan {
    let start_pos = document.text_pos_at(start);
    let end_pos = document.text_pos_at(end);
    SourceSpan {
        start: SourceLocation {
            line: start_pos.row as usize,
            column: start_pos.col as usize,
        },
        end: SourceLocation {
            line: end_pos.row as usize,
            column: end_pos.col as usize,
        },
    }
}
