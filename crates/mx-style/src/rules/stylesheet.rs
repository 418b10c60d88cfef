//! Stylesheet collection and management.

use std::borrow::Cow;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::parser::{ParseError, parse_css};
use crate::rules::DeclarationTable;
use crate::selector::{
    SelectorArena, SelectorId, SelectorMatch, SelectorMatcher, StyleNode, describe_node,
    sort_matches,
};
use crate::{Error, Result, targets};

/// Where a block of rules came from, kept so the sheet can be rebuilt.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Source {
    File(PathBuf),
    Data { name: PathBuf, css: Arc<str> },
}

/// The accumulated rules of every stylesheet loaded so far.
///
/// Loading is additive: each file adds its rules to the ones already present.
/// The rightmost selector of every parsed chain is kept in a list with the
/// most recently parsed selector at the head; matching walks that list in
/// order.
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    arena: SelectorArena,
    selectors: VecDeque<SelectorId>,
    tables: Vec<Arc<DeclarationTable>>,
    sources: Vec<Source>,
}

impl StyleSheet {
    /// Create an empty stylesheet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a CSS file and add its rules.
    ///
    /// On a grammar error, rules before the error are kept and the file is
    /// still recorded. On an I/O error nothing changes. Bytes that are not
    /// valid UTF-8 are replaced rather than rejecting the file.
    pub fn add_from_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| Error::io(path, e))?;
        let content = String::from_utf8_lossy(&bytes);
        if let Cow::Owned(_) = content {
            tracing::warn!(
                "Stylesheet '{}' is not valid UTF-8; invalid bytes were replaced",
                path.display()
            );
        }

        self.sources.push(Source::File(path.to_path_buf()));
        self.add_parsed(&content, path)
            .map_err(|e| Error::parse(path, e))
    }

    /// Parse CSS text and add its rules.
    ///
    /// `name` stands in for a file path: it becomes the declarations' source
    /// and is used to resolve relative image paths.
    pub fn add_from_str(&mut self, css: &str, name: impl AsRef<Path>) -> Result<()> {
        let name = name.as_ref();

        self.sources.push(Source::Data {
            name: name.to_path_buf(),
            css: Arc::from(css),
        });
        self.add_parsed(css, name)
            .map_err(|e| Error::parse(name, e))
    }

    fn add_parsed(&mut self, css: &str, origin: &Path) -> std::result::Result<(), ParseError> {
        let outcome = parse_css(css, Some(Arc::from(origin)), &mut self.arena);

        for rule in outcome.rules {
            for id in rule.selectors {
                self.selectors.push_front(id);
            }
            self.tables.push(rule.declarations);
        }

        match outcome.error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Build a fresh stylesheet from every source loaded into this one.
    ///
    /// Sources are re-read in load order. Errors are returned after all
    /// sources have been tried, the first one winning.
    pub fn rebuild(&self) -> (StyleSheet, Option<Error>) {
        let mut sheet = StyleSheet::new();
        let mut first_error = None;

        for source in &self.sources {
            let result = match source {
                Source::File(path) => sheet.add_from_file(path),
                Source::Data { name, css } => sheet.add_from_str(css, name),
            };
            if let Err(e) = result {
                tracing::warn!("Failed to reload stylesheet: {}", e);
                first_error.get_or_insert(e);
            }
        }

        (sheet, first_error)
    }

    /// Merge the declarations of every selector that matches `node`.
    ///
    /// Matching selectors are applied in ascending specificity order, so on
    /// each property the most specific selector wins. On equal specificity
    /// the selector parsed first wins.
    pub fn properties_for<N: StyleNode + ?Sized>(&self, node: &N) -> DeclarationTable {
        let start = Instant::now();
        tracing::debug!(target: targets::CSS, "Matching style for {}", describe_node(node));

        let mut matches: Vec<SelectorMatch> = self
            .selectors
            .iter()
            .filter_map(|&selector| {
                let specificity = SelectorMatcher::score(&self.arena, selector, node);
                specificity.is_match().then_some(SelectorMatch {
                    selector,
                    specificity,
                })
            })
            .collect();
        sort_matches(&mut matches);

        let mut table = DeclarationTable::new();
        for m in &matches {
            tracing::trace!(
                target: targets::CSS,
                "{:5}: {}",
                m.specificity.value(),
                self.arena.display(m.selector)
            );
            if let Some(declarations) = &self.arena.get(m.selector).declarations {
                table.extend_from(declarations);
            }
        }

        tracing::debug!(
            target: targets::CSS,
            matched = matches.len(),
            elapsed_us = start.elapsed().as_micros() as u64,
            "Style matching finished"
        );

        table
    }

    /// Files loaded into this sheet, in load order.
    pub fn filenames(&self) -> impl Iterator<Item = &Path> {
        self.sources.iter().filter_map(|source| match source {
            Source::File(path) => Some(path.as_path()),
            Source::Data { .. } => None,
        })
    }

    /// Selectors that take part in matching, most recently parsed first.
    pub fn selectors(&self) -> impl Iterator<Item = SelectorId> + '_ {
        self.selectors.iter().copied()
    }

    /// The arena owning every selector of this sheet.
    pub fn arena(&self) -> &SelectorArena {
        &self.arena
    }

    /// Number of selectors taking part in matching.
    pub fn len(&self) -> usize {
        self.selectors.len()
    }

    /// Check if the stylesheet has no rules.
    pub fn is_empty(&self) -> bool {
        self.selectors.is_empty()
    }

    /// Number of declaration blocks.
    pub fn table_count(&self) -> usize {
        self.tables.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::DeclarationValue;
    use crate::selector::WidgetMatchContext;

    fn sheet(css: &str) -> StyleSheet {
        let mut sheet = StyleSheet::new();
        sheet.add_from_str(css, "test.css").unwrap();
        sheet
    }

    fn color(sheet: &StyleSheet, node: &WidgetMatchContext<'_>) -> Option<String> {
        sheet
            .properties_for(node)
            .get("color")
            .map(|v| v.value.clone())
    }

    #[test]
    fn specificity_order_wins() {
        let sheet = sheet(
            r#"
            Button { color: red; }
            Button.danger { color: crimson; }
            #submit { color: blue; }
            "#,
        );

        let node = WidgetMatchContext::new("Button")
            .with_class("danger")
            .with_name("submit");
        assert_eq!(color(&sheet, &node).as_deref(), Some("blue"));

        let node = WidgetMatchContext::new("Button").with_class("danger");
        assert_eq!(color(&sheet, &node).as_deref(), Some("crimson"));

        let node = WidgetMatchContext::new("Button");
        assert_eq!(color(&sheet, &node).as_deref(), Some("red"));
    }

    #[test]
    fn properties_merge_across_selectors() {
        let sheet = sheet(
            r#"
            MxLabel { color: red; font-size: 12; }
            .title { font-size: 20; }
            "#,
        );

        let node = WidgetMatchContext::new("MxLabel").with_class("title");
        let table = sheet.properties_for(&node);
        assert_eq!(table.get("color").map(DeclarationValue::as_str), Some("red"));
        assert_eq!(table.get("font-size").map(DeclarationValue::as_str), Some("20"));
    }

    #[test]
    fn earliest_parsed_wins_ties() {
        let sheet = sheet(
            r#"
            MxLabel { color: red; }
            MxLabel { color: green; }
            "#,
        );

        let node = WidgetMatchContext::new("MxLabel");
        assert_eq!(color(&sheet, &node).as_deref(), Some("red"));
    }

    #[test]
    fn universal_selector_is_excluded() {
        let sheet = sheet("* { color: red; }");

        let node = WidgetMatchContext::new("MxLabel");
        assert_eq!(color(&sheet, &node), None);
    }

    #[test]
    fn selectors_are_most_recent_first() {
        let sheet = sheet("A { x: 1; } B, C { x: 2; }");

        let names: Vec<_> = sheet
            .selectors()
            .filter_map(|id| sheet.arena().get(id).type_name().map(str::to_string))
            .collect();
        assert_eq!(names, vec!["C", "B", "A"]);
        assert_eq!(sheet.table_count(), 2);
    }

    #[test]
    fn loading_is_additive() {
        let mut sheet = StyleSheet::new();
        sheet.add_from_str("MxLabel { color: red; }", "a.css").unwrap();
        sheet.add_from_str("MxButton { color: blue; }", "b.css").unwrap();

        assert_eq!(sheet.len(), 2);
        let label = WidgetMatchContext::new("MxLabel");
        let button = WidgetMatchContext::new("MxButton");
        assert_eq!(color(&sheet, &label).as_deref(), Some("red"));
        assert_eq!(color(&sheet, &button).as_deref(), Some("blue"));
    }

    #[test]
    fn parse_error_keeps_earlier_rules() {
        let mut sheet = StyleSheet::new();
        let err = sheet
            .add_from_str("MxLabel { color: red; } MxButton { color }", "bad.css")
            .unwrap_err();

        assert!(err.is_partial());
        assert_eq!(sheet.len(), 1);
    }

    #[test]
    fn missing_file_adds_nothing() {
        let mut sheet = StyleSheet::new();
        let err = sheet.add_from_file("/nonexistent/mx-style/missing.css").unwrap_err();

        assert!(matches!(err, Error::Io { .. }));
        assert!(sheet.is_empty());
        assert_eq!(sheet.filenames().count(), 0);
    }

    #[test]
    fn non_utf8_bytes_do_not_reject_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.css");
        std::fs::write(&path, b"/* caf\xe9 */ MxLabel { color: red; }").unwrap();

        let mut sheet = StyleSheet::new();
        sheet.add_from_file(&path).unwrap();

        assert_eq!(sheet.len(), 1);
        let label = WidgetMatchContext::new("MxLabel");
        assert_eq!(color(&sheet, &label).as_deref(), Some("red"));
    }

    #[test]
    fn rebuild_from_data() {
        let mut sheet = StyleSheet::new();
        sheet.add_from_str("MxLabel { color: red; }", "a.css").unwrap();
        sheet.add_from_str("MxButton { color: blue; }", "b.css").unwrap();

        let (rebuilt, error) = sheet.rebuild();
        assert!(error.is_none());
        assert_eq!(rebuilt.len(), 2);
        assert_eq!(rebuilt.filenames().count(), 0);
    }
}
