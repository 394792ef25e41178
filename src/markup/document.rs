//! Parsed chart markup: a kuchikiki tree plus the XML prolog it came with

use kuchikiki::traits::*;
use kuchikiki::{NodeData, NodeRef};
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use roxmltree::ParsingOptions;

use crate::cleaner::errors::{CleanError, Result};
use crate::cleaner::ChartTree;
use crate::markup::compile_selectors;
use crate::markup::prolog::Prolog;

/// Markup loaded for cleaning
///
/// Standalone SVG files must be well-formed XML; HTML pages and fragments
/// go straight to html5ever. Fragments are written back without the
/// `html`/`head`/`body` wrappers the parser adds.
pub struct ChartDocument {
    prolog: Prolog,
    document: NodeRef,
    fragment: bool,
}

impl ChartDocument {
    pub fn parse(markup: &str) -> Result<ChartDocument> {
        let (prolog, body) = Prolog::split(markup);

        if prolog.is_xml_document() {
            let options = ParsingOptions {
                allow_dtd: true,
                ..ParsingOptions::default()
            };
            roxmltree::Document::parse_with_options(markup, options)
                .map_err(|e| CleanError::InvalidXml(e.to_string()))?;
        }

        let fragment = !prolog
            .root_name()
            .is_some_and(|name| name.eq_ignore_ascii_case("html"));

        Ok(ChartDocument {
            prolog,
            document: kuchikiki::parse_html().one(body),
            fragment,
        })
    }

    pub fn prolog(&self) -> &Prolog {
        &self.prolog
    }

    /// Attached elements matching a CSS selector list, in document order
    pub fn select(&self, selector: &str) -> Result<Vec<NodeRef>> {
        let selectors = compile_selectors(selector)?;
        Ok(self
            .document
            .descendants()
            .elements()
            .filter(|element| selectors.matches(element))
            .map(|element| element.as_node().clone())
            .collect())
    }

    pub fn attribute(&self, node: &NodeRef, name: &str) -> Option<String> {
        let element = node.as_element()?;
        let attributes = element.attributes.borrow();
        attributes.get(name).map(str::to_string)
    }

    pub fn has_attribute(&self, node: &NodeRef, name: &str) -> bool {
        node.as_element()
            .is_some_and(|element| element.attributes.borrow().contains(name))
    }

    pub fn is_attached(&self, node: &NodeRef) -> bool {
        node.inclusive_ancestors().last().as_ref() == Some(&self.document)
    }

    /// Number of attached nodes, document node included
    pub fn node_count(&self) -> usize {
        self.document.inclusive_descendants().count()
    }

    /// Detach `node` and its subtree
    ///
    /// Returns `Ok(false)` when the node is no longer in this document.
    pub fn remove(&mut self, node: &NodeRef) -> Result<bool> {
        if *node == self.document {
            return Err(CleanError::InvalidInput(
                "cannot remove the document node".to_string(),
            ));
        }
        if !self.is_attached(node) {
            return Ok(false);
        }
        node.detach();
        Ok(true)
    }

    /// Serialise back to XML-style markup, prolog first
    pub fn to_markup(&self) -> Result<String> {
        let mut writer = Writer::new(Vec::new());
        self.prolog.write(&mut writer)?;
        for node in self.content_nodes() {
            write_node(&node, &mut writer)?;
        }
        String::from_utf8(writer.into_inner()).map_err(|e| CleanError::Write(e.to_string()))
    }

    fn content_nodes(&self) -> Vec<NodeRef> {
        if !self.fragment {
            return self.document.children().collect();
        }

        // html5ever wraps fragments in html/head/body; unwrap both sections
        let mut nodes = Vec::new();
        for html in self.document.children() {
            if html.as_element().is_none() {
                nodes.push(html);
                continue;
            }
            for section in html.children() {
                if section.as_element().is_some() {
                    nodes.extend(section.children());
                } else {
                    nodes.push(section);
                }
            }
        }
        nodes
    }
}

impl ChartTree for ChartDocument {
    type Node = NodeRef;

    fn select_all(&self, selector: &str) -> Result<Vec<NodeRef>> {
        self.select(selector)
    }

    fn has_attribute(&self, node: &NodeRef, name: &str) -> bool {
        ChartDocument::has_attribute(self, node, name)
    }

    fn remove(&mut self, node: &NodeRef) -> Result<bool> {
        ChartDocument::remove(self, node)
    }
}

fn qualified_name(prefix: Option<&str>, local: &str) -> String {
    match prefix {
        Some(prefix) if !prefix.is_empty() => format!("{}:{}", prefix, local),
        _ => local.to_string(),
    }
}

fn write_event(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| CleanError::Write(e.to_string()))
}

fn write_node(node: &NodeRef, writer: &mut Writer<Vec<u8>>) -> Result<()> {
    match node.data() {
        NodeData::Element(element) => {
            let name = qualified_name(element.name.prefix.as_deref(), &element.name.local);
            let mut start = BytesStart::new(name.as_str());
            for (expanded, attr) in element.attributes.borrow().map.iter() {
                let key = qualified_name(attr.prefix.as_deref(), &expanded.local);
                start.push_attribute((key.as_str(), attr.value.as_str()));
            }

            if node.first_child().is_none() {
                write_event(writer, Event::Empty(start))?;
            } else {
                write_event(writer, Event::Start(start))?;
                for child in node.children() {
                    write_node(&child, writer)?;
                }
                write_event(writer, Event::End(BytesEnd::new(name.as_str())))?;
            }
        }
        NodeData::Text(text) => {
            let text = text.borrow();
            write_event(writer, Event::Text(BytesText::from_escaped(partial_escape(&text))))?;
        }
        NodeData::Comment(text) => {
            let text = text.borrow();
            write_event(writer, Event::Comment(BytesText::from_escaped(text.as_str())))?;
        }
        NodeData::ProcessingInstruction(pi) => {
            let pi = pi.borrow();
            let (target, data) = &*pi;
            let content = if data.is_empty() {
                target.clone()
            } else {
                format!("{} {}", target, data)
            };
            write_event(writer, Event::PI(BytesText::from_escaped(content)))?;
        }
        // DOCTYPE travels with the prolog
        NodeData::Doctype(_) | NodeData::Document(_) | NodeData::DocumentFragment => {}
    }
    Ok(())
}
