use engine_logging::engine_debug;
use regex::Regex;
use scraper::{Html, Selector};
use serde_json::Value;

use crate::ItemError;

/// Left-hand side of the script assignment that carries the play info.
pub const PLAYINFO_MARKER: &str = "window.__playinfo__";

/// Parsed play info payload. Always has a top-level `data` key.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayInfo {
    root: Value,
}

impl PlayInfo {
    /// Accepts `value` only when it carries a `data` key.
    pub fn from_value(value: Value) -> Option<Self> {
        value.get("data")?;
        Some(Self { root: value })
    }

    pub fn data(&self) -> &Value {
        &self.root["data"]
    }
}

/// One way of locating the payload inside a page.
pub trait ExtractionStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// `None` means "no match here"; the next strategy gets a turn.
    fn attempt(&self, doc: &Html) -> Option<Value>;
}

/// Scans every `<script>` in document order for `marker = {...};`.
#[derive(Debug, Clone)]
pub struct MarkerSearch {
    marker: String,
    assignment: Regex,
}

impl MarkerSearch {
    pub fn new(marker: &str) -> Self {
        let pattern = format!(r"(?s){}\s*=\s*(\{{.+?\}});", regex::escape(marker));
        Self {
            marker: marker.to_string(),
            assignment: Regex::new(&pattern).expect("escaped marker forms a valid pattern"),
        }
    }
}

impl Default for MarkerSearch {
    fn default() -> Self {
        Self::new(PLAYINFO_MARKER)
    }
}

impl ExtractionStrategy for MarkerSearch {
    fn name(&self) -> &'static str {
        "marker-search"
    }

    fn attempt(&self, doc: &Html) -> Option<Value> {
        let selector = Selector::parse("script").ok()?;
        for script in doc.select(&selector) {
            let text = script.text().collect::<String>();
            if !text.contains(&self.marker) {
                continue;
            }
            let Some(captures) = self.assignment.captures(&text) else {
                continue;
            };
            match serde_json::from_str(&captures[1]) {
                Ok(value) => return Some(value),
                Err(err) => engine_debug!("marker block is not valid JSON: {}", err),
            }
        }
        None
    }
}

/// Older fixed layout: the payload is the `index`-th `<script>` in `<head>`,
/// starting with `prefix` and followed by the JSON after `skip` bytes.
#[derive(Debug, Clone)]
pub struct PositionalScript {
    index: usize,
    prefix: String,
    skip: usize,
}

impl PositionalScript {
    pub fn new(index: usize, prefix: &str, skip: usize) -> Self {
        Self {
            index,
            prefix: prefix.to_string(),
            skip,
        }
    }
}

impl Default for PositionalScript {
    fn default() -> Self {
        // Fourth head script, `window.__playinfo__=` stripped.
        Self::new(3, PLAYINFO_MARKER, PLAYINFO_MARKER.len() + 1)
    }
}

impl ExtractionStrategy for PositionalScript {
    fn name(&self) -> &'static str {
        "positional"
    }

    fn attempt(&self, doc: &Html) -> Option<Value> {
        let selector = Selector::parse("head > script").ok()?;
        let text = doc
            .select(&selector)
            .nth(self.index)?
            .text()
            .collect::<String>();
        if !text.starts_with(&self.prefix) {
            return None;
        }
        serde_json::from_str(text.get(self.skip..)?).ok()
    }
}

/// Tries each strategy in order; the first match wins.
pub struct PayloadExtractor {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl PayloadExtractor {
    pub fn new(strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn extract(&self, id: &str, markup: &str) -> Result<PlayInfo, ItemError> {
        let doc = Html::parse_document(markup);
        let found = self
            .strategies
            .iter()
            .find_map(|strategy| strategy.attempt(&doc).map(|value| (strategy.name(), value)));

        let unavailable = || ItemError::DataUnavailable { id: id.to_string() };
        let (name, value) = found.ok_or_else(unavailable)?;
        engine_debug!("{}: play info located by {} strategy", id, name);
        PlayInfo::from_value(value).ok_or_else(unavailable)
    }
}

impl Default for PayloadExtractor {
    fn default() -> Self {
        Self::new(vec![
            Box::new(MarkerSearch::default()),
            Box::new(PositionalScript::default()),
        ])
    }
}
