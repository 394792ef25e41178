//! Chart markup backend
//!
//! Offline counterpart of the browser DOM: markup is parsed with
//! kuchikiki (html5ever), queried with its `selectors`-based engine and
//! written back out with quick-xml so SVG stays XML.

mod document;
mod prolog;

pub use document::ChartDocument;
pub use prolog::Prolog;

use kuchikiki::Selectors;

use crate::cleaner::errors::{CleanError, Result};

/// Compile a CSS selector list, mapping failures to `InvalidSelector`
pub fn compile_selectors(selector: &str) -> Result<Selectors> {
    Selectors::compile(selector)
        .map_err(|()| CleanError::invalid_selector(selector, "not a valid CSS selector list"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compiles_full_css_selector_lists() {
        for selector in [
            "svg g text.f6",
            "svg > g path",
            "svg g text.f6, svg g text.f7",
            "svg g path:not([class])",
            "svg g text[class=f6]",
        ] {
            assert!(compile_selectors(selector).is_ok(), "{} should compile", selector);
        }
    }

    #[test]
    fn test_rejects_broken_selectors() {
        for bad in ["", "svg >", "svg g text[", "svg g ."] {
            match compile_selectors(bad) {
                Err(CleanError::InvalidSelector { .. }) => {}
                Err(other) => panic!("expected InvalidSelector for {:?}, got {:?}", bad, other),
                Ok(_) => panic!("expected {:?} to be rejected", bad),
            }
        }
    }
}
