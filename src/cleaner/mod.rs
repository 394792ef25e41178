//! Chord chart cleanup
//!
//! abc2svg's `%%gchord2 1` mode leaves junk inside the chord diagram groups:
//! small "third" marks drawn as `text.f6`, and slur curves drawn as bare
//! `path` elements with no class. Noteheads, stems and frets are always
//! classified, so "unclassified path inside a group" identifies the slurs.
//!
//! The pass works on anything implementing [`ChartTree`]: parsed markup
//! ([`ChartDocument`](crate::markup::ChartDocument)) or the live browser DOM
//! (see `api::dom`). Selectors are CSS selector lists.

pub mod errors;

use serde::{Deserialize, Serialize};

use crate::markup::{compile_selectors, ChartDocument};
use errors::{CleanError, Result};

/// Default selector for the stray "third" marks
pub const DEFAULT_TEXT_SELECTOR: &str = "svg g text.f6";

/// Default selector for slur candidates
pub const DEFAULT_PATH_SELECTOR: &str = "svg g path";

/// A mutable tree the cleaner can query and prune
pub trait ChartTree {
    type Node;

    /// All elements matching the CSS selector list, in document order
    fn select_all(&self, selector: &str) -> Result<Vec<Self::Node>>;

    fn has_attribute(&self, node: &Self::Node, name: &str) -> bool;

    /// Detach `node`; `Ok(false)` if it was no longer in the tree
    fn remove(&mut self, node: &Self::Node) -> Result<bool>;
}

/// Cleaner settings, as supplied from JS, JSON or YAML
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct CleanerConfig {
    /// Selector for junk text marks (renderer-specific style class)
    pub text_selector: String,
    /// Selector for paths that may be slurs; only unclassified ones are removed
    pub path_selector: String,
    pub remove_marker_text: bool,
    pub remove_unclassified_paths: bool,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            text_selector: DEFAULT_TEXT_SELECTOR.to_string(),
            path_selector: DEFAULT_PATH_SELECTOR.to_string(),
            remove_marker_text: true,
            remove_unclassified_paths: true,
        }
    }
}

impl CleanerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| CleanError::InvalidConfig(e.to_string()))
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| CleanError::InvalidConfig(e.to_string()))
    }
}

/// What a single pass did
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CleanReport {
    pub texts_removed: usize,
    pub slurs_removed: usize,
    pub classified_paths_kept: usize,
    /// Matches that were already detached when their turn came
    pub skipped: usize,
    /// Queries or removals that failed; the pass carried on
    pub failures: usize,
    pub errors: Vec<String>,
}

impl CleanReport {
    pub fn total_removed(&self) -> usize {
        self.texts_removed + self.slurs_removed
    }

    pub fn is_noop(&self) -> bool {
        self.total_removed() == 0 && self.failures == 0
    }

    fn record_failure(&mut self, context: &str, err: &CleanError) {
        log::warn!("{}: {}", context, err);
        self.failures += 1;
        self.errors.push(format!("{}: {}", context, err));
    }
}

/// Cleanup outcome for a markup string
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CleanedMarkup {
    pub markup: String,
    pub report: CleanReport,
}

/// Validated cleaner settings, reusable across renders
#[derive(Clone, Debug)]
pub struct ChartCleaner {
    text_selector: String,
    path_selector: String,
    remove_marker_text: bool,
    remove_unclassified_paths: bool,
}

impl Default for ChartCleaner {
    fn default() -> Self {
        Self {
            text_selector: DEFAULT_TEXT_SELECTOR.to_string(),
            path_selector: DEFAULT_PATH_SELECTOR.to_string(),
            remove_marker_text: true,
            remove_unclassified_paths: true,
        }
    }
}

impl ChartCleaner {
    /// Validate the config's selectors and build a cleaner
    pub fn new(config: &CleanerConfig) -> Result<Self> {
        compile_selectors(&config.text_selector)?;
        compile_selectors(&config.path_selector)?;
        Ok(Self {
            text_selector: config.text_selector.clone(),
            path_selector: config.path_selector.clone(),
            remove_marker_text: config.remove_marker_text,
            remove_unclassified_paths: config.remove_unclassified_paths,
        })
    }

    pub fn text_selector(&self) -> &str {
        &self.text_selector
    }

    pub fn path_selector(&self) -> &str {
        &self.path_selector
    }

    /// Remove junk text marks and unclassified slur paths from `tree`
    ///
    /// Matches are snapshotted before anything is removed and removed in
    /// reverse document order. A failure on one node never stops the rest.
    pub fn clean<T: ChartTree>(&self, tree: &mut T) -> CleanReport {
        let mut report = CleanReport::default();

        if self.remove_marker_text {
            self.remove_marker_text(tree, &mut report);
            log::debug!("{} triple marks removed", report.texts_removed);
        }

        if self.remove_unclassified_paths {
            self.remove_slurs(tree, &mut report);
            log::debug!(
                "{} slurs removed from chord charts ({} classified paths kept)",
                report.slurs_removed,
                report.classified_paths_kept
            );
        }

        report
    }

    fn remove_marker_text<T: ChartTree>(&self, tree: &mut T, report: &mut CleanReport) {
        let matches = match tree.select_all(&self.text_selector) {
            Ok(matches) => matches,
            Err(e) => {
                report.record_failure(&format!("query '{}'", self.text_selector), &e);
                return;
            }
        };

        for node in matches.iter().rev() {
            if remove_node(tree, node, report) {
                report.texts_removed += 1;
            }
        }
    }

    fn remove_slurs<T: ChartTree>(&self, tree: &mut T, report: &mut CleanReport) {
        let matches = match tree.select_all(&self.path_selector) {
            Ok(matches) => matches,
            Err(e) => {
                report.record_failure(&format!("query '{}'", self.path_selector), &e);
                return;
            }
        };

        for node in matches.iter().rev() {
            if tree.has_attribute(node, "class") {
                report.classified_paths_kept += 1;
                continue;
            }
            if remove_node(tree, node, report) {
                report.slurs_removed += 1;
            }
        }
    }

    /// Parse, clean and re-serialise SVG, XHTML or HTML markup
    pub fn clean_markup(&self, markup: &str) -> Result<CleanedMarkup> {
        let mut document = ChartDocument::parse(markup)?;
        let report = self.clean(&mut document);
        Ok(CleanedMarkup {
            markup: document.to_markup()?,
            report,
        })
    }
}

fn remove_node<T: ChartTree>(tree: &mut T, node: &T::Node, report: &mut CleanReport) -> bool {
    match tree.remove(node) {
        Ok(true) => true,
        Ok(false) => {
            report.skipped += 1;
            false
        }
        Err(e) => {
            report.record_failure("remove", &e);
            false
        }
    }
}

/// Clean `tree` with the default abc2svg selectors
pub fn clean_chord_charts<T: ChartTree>(tree: &mut T) -> CleanReport {
    ChartCleaner::default().clean(tree)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Tree double whose removals can be made to fail
    struct FlakyTree {
        nodes: Vec<(&'static str, bool, bool)>, // (kind, has class, attached)
        fail_on: Option<usize>,
        fail_query: bool,
    }

    impl ChartTree for FlakyTree {
        type Node = usize;

        fn select_all(&self, selector: &str) -> Result<Vec<usize>> {
            if self.fail_query && selector.ends_with("path") {
                return Err(CleanError::Dom("query blew up".to_string()));
            }
            let wanted = selector
                .split_whitespace()
                .last()
                .and_then(|last| last.split('.').next())
                .unwrap_or_default();
            Ok((0..self.nodes.len())
                .filter(|i| self.nodes[*i].0 == wanted)
                .collect())
        }

        fn has_attribute(&self, node: &usize, name: &str) -> bool {
            name == "class" && self.nodes[*node].1
        }

        fn remove(&mut self, node: &usize) -> Result<bool> {
            if self.fail_on == Some(*node) {
                return Err(CleanError::Dom(format!("cannot remove {}", node)));
            }
            let attached = self.nodes[*node].2;
            self.nodes[*node].2 = false;
            Ok(attached)
        }
    }

    #[test]
    fn test_default_config_matches_default_cleaner() {
        let from_config = ChartCleaner::new(&CleanerConfig::default()).unwrap();
        let default = ChartCleaner::default();
        assert_eq!(from_config.text_selector(), default.text_selector());
        assert_eq!(from_config.path_selector(), default.path_selector());
        assert_eq!(default.text_selector(), DEFAULT_TEXT_SELECTOR);
        assert_eq!(default.path_selector(), DEFAULT_PATH_SELECTOR);
    }

    #[test]
    fn test_failed_removal_does_not_stop_pass() {
        let mut tree = FlakyTree {
            nodes: vec![("path", false, true), ("path", false, true), ("path", false, true)],
            fail_on: Some(1),
            fail_query: false,
        };
        let report = clean_chord_charts(&mut tree);
        assert_eq!(report.slurs_removed, 2);
        assert_eq!(report.failures, 1);
        assert_eq!(report.errors.len(), 1);
        assert!(!tree.nodes[0].2);
        assert!(tree.nodes[1].2);
        assert!(!tree.nodes[2].2);
    }

    #[test]
    fn test_detached_matches_are_skipped() {
        let mut tree = FlakyTree {
            nodes: vec![("text", false, false), ("text", false, true)],
            fail_on: None,
            fail_query: false,
        };
        let report = clean_chord_charts(&mut tree);
        assert_eq!(report.texts_removed, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.failures, 0);
    }

    #[test]
    fn test_failed_query_only_aborts_its_phase() {
        let mut tree = FlakyTree {
            nodes: vec![("text", false, true), ("path", false, true)],
            fail_on: None,
            fail_query: true,
        };
        let report = clean_chord_charts(&mut tree);
        assert_eq!(report.texts_removed, 1);
        assert_eq!(report.slurs_removed, 0);
        assert_eq!(report.failures, 1);
        assert!(tree.nodes[1].2);
    }

    #[test]
    fn test_classified_paths_are_counted_not_removed() {
        let mut tree = FlakyTree {
            nodes: vec![("path", true, true), ("path", false, true)],
            fail_on: None,
            fail_query: false,
        };
        let report = clean_chord_charts(&mut tree);
        assert_eq!(report.classified_paths_kept, 1);
        assert_eq!(report.slurs_removed, 1);
        assert!(tree.nodes[0].2);
    }

    #[test]
    fn test_disabled_phases_do_nothing() {
        let config = CleanerConfig {
            remove_marker_text: false,
            remove_unclassified_paths: false,
            ..CleanerConfig::default()
        };
        let cleaner = ChartCleaner::new(&config).unwrap();
        let mut tree = FlakyTree {
            nodes: vec![("text", false, true), ("path", false, true)],
            fail_on: None,
            fail_query: false,
        };
        let report = cleaner.clean(&mut tree);
        assert!(report.is_noop());
        assert!(tree.nodes.iter().all(|n| n.2));
    }

    #[test]
    fn test_selector_lists_are_accepted() {
        let config = CleanerConfig {
            text_selector: "svg g text.f6, svg g text.f7".to_string(),
            path_selector: "svg g path:not([class])".to_string(),
            ..CleanerConfig::default()
        };
        let cleaner = ChartCleaner::new(&config).unwrap();
        assert_eq!(cleaner.text_selector(), "svg g text.f6, svg g text.f7");
    }

    #[test]
    fn test_config_from_json_and_yaml() {
        let json = CleanerConfig::from_json(r#"{"textSelector": "svg g text.f5"}"#).unwrap();
        assert_eq!(json.text_selector, "svg g text.f5");
        assert_eq!(json.path_selector, DEFAULT_PATH_SELECTOR);
        assert!(json.remove_unclassified_paths);

        let yaml =
            CleanerConfig::from_yaml("removeMarkerText: false\npathSelector: svg > g path\n")
                .unwrap();
        assert!(!yaml.remove_marker_text);
        assert_eq!(yaml.path_selector, "svg > g path");
        assert_eq!(yaml.text_selector, DEFAULT_TEXT_SELECTOR);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        assert!(matches!(
            CleanerConfig::from_json("{\"removeMarkerText\": \"yes\"}"),
            Err(CleanError::InvalidConfig(_))
        ));
        let bad = CleanerConfig {
            text_selector: "svg g text[".to_string(),
            ..CleanerConfig::default()
        };
        assert!(matches!(
            ChartCleaner::new(&bad),
            Err(CleanError::InvalidSelector { .. })
        ));
    }
}
