//! Chord Chart Cleaner WASM Module
//!
//! Removes the leftovers abc2svg's `%%gchord2 1` mode draws into chord
//! chart groups: "third" marks (`text.f6`) and unclassified slur paths.
//! Works on the live DOM from JavaScript, or on SVG/HTML markup from Rust.

pub mod api;
pub mod cleaner;
pub mod markup;

pub use cleaner::errors::CleanError;
pub use cleaner::{
    clean_chord_charts, ChartCleaner, ChartTree, CleanReport, CleanedMarkup, CleanerConfig,
    DEFAULT_PATH_SELECTOR, DEFAULT_TEXT_SELECTOR,
};
pub use markup::ChartDocument;

use wasm_bindgen::prelude::*;

// This is like the `main` function, but for WASM modules.
#[wasm_bindgen(start)]
pub fn main() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(feature = "console_log")]
    {
        if let Err(e) = console_log::init_with_level(log::Level::Debug) {
            web_sys::console::warn_1(&format!("logger already initialized: {}", e).into());
        }
    }

    log::info!("Chord chart cleaner WASM module initialized");
}
