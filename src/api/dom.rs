//! `ChartTree` over the live browser DOM

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Node};

use crate::api::helpers::js_error_message;
use crate::cleaner::errors::{CleanError, Result};
use crate::cleaner::ChartTree;

/// Where queries are rooted
#[derive(Clone, Debug)]
pub enum DomRoot {
    Document(Document),
    Element(Element),
}

#[derive(Clone, Debug)]
pub struct DomTree {
    root: DomRoot,
}

impl DomTree {
    pub fn from_document(document: Document) -> Self {
        Self {
            root: DomRoot::Document(document),
        }
    }

    pub fn from_element(element: Element) -> Self {
        Self {
            root: DomRoot::Element(element),
        }
    }

    /// The page's `window.document`; fails when there is none (workers, node)
    pub fn from_window() -> Result<Self> {
        let window = web_sys::window()
            .ok_or_else(|| CleanError::InvalidInput("no global window".to_string()))?;
        let document = window
            .document()
            .ok_or_else(|| CleanError::InvalidInput("window has no document".to_string()))?;
        Ok(Self::from_document(document))
    }
}

impl ChartTree for DomTree {
    type Node = Element;

    fn select_all(&self, selector: &str) -> Result<Vec<Element>> {
        let list = match &self.root {
            DomRoot::Document(document) => document.query_selector_all(selector),
            DomRoot::Element(element) => element.query_selector_all(selector),
        }
        .map_err(|e| CleanError::Dom(js_error_message(&e)))?;

        // querySelectorAll returns a static NodeList
        Ok((0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect())
    }

    fn has_attribute(&self, node: &Element, name: &str) -> bool {
        node.has_attribute(name)
    }

    fn remove(&mut self, node: &Element) -> Result<bool> {
        // Anything no longer under the root (including inside an already
        // removed subtree) counts as detached
        let target: &Node = node;
        let attached = match &self.root {
            DomRoot::Document(document) => document.contains(Some(target)),
            DomRoot::Element(element) => element.contains(Some(target)),
        };
        if !attached {
            return Ok(false);
        }
        node.remove();
        Ok(true)
    }
}
