//! Chord chart cleaner WASM API
//!
//! JavaScript-facing entry points. Call `cleanChordCharts()` after abc2svg
//! has rendered into the page, or `cleanChordChartMarkup()` on SVG text
//! before it is embedded.
//!
//! # Module Structure
//!
//! - `helpers`: console logging macros and JS conversions
//! - `dom`: `ChartTree` over `web_sys` elements

pub mod dom;
pub mod helpers;

use wasm_bindgen::prelude::*;
use web_sys::Element;

use crate::api::dom::DomTree;
use crate::api::helpers::{cleaner_from_js, serialize, to_js_error};
use crate::{wasm_info, wasm_log, wasm_warn};

/// Remove chord chart junk from the live DOM
///
/// # Arguments
/// * `root` - element to search under; the page's document when omitted
/// * `config` - optional `CleanerConfig` object (camelCase keys)
///
/// # Returns
/// `CleanReport` object with removal counts
#[wasm_bindgen(js_name = cleanChordCharts)]
pub fn clean_chord_charts_in_dom(
    root: Option<Element>,
    config: JsValue,
) -> Result<JsValue, JsValue> {
    let cleaner = cleaner_from_js(config)?;

    let mut tree = match root {
        Some(element) => DomTree::from_element(element),
        None => DomTree::from_window().map_err(to_js_error)?,
    };

    let report = cleaner.clean(&mut tree);
    wasm_log!("{} triple marks to remove", report.texts_removed);
    wasm_info!(
        "cleanChordCharts: {} slurs removed from chord charts, {} skipped, {} failures",
        report.slurs_removed,
        report.skipped,
        report.failures
    );
    for error in &report.errors {
        wasm_warn!("cleanChordCharts: {}", error);
    }

    serialize(&report, "Failed to serialize clean report")
}

/// Clean SVG/XHTML markup and return the cleaned markup
#[wasm_bindgen(js_name = cleanChordChartMarkup)]
pub fn clean_chord_chart_markup(markup: &str, config: JsValue) -> Result<String, JsValue> {
    let cleaner = cleaner_from_js(config)?;
    let cleaned = cleaner.clean_markup(markup).map_err(to_js_error)?;
    for error in &cleaned.report.errors {
        wasm_warn!("cleanChordChartMarkup: {}", error);
    }

    wasm_info!(
        "cleanChordChartMarkup: removed {} nodes ({} bytes in, {} bytes out)",
        cleaned.report.total_removed(),
        markup.len(),
        cleaned.markup.len()
    );

    Ok(cleaned.markup)
}
