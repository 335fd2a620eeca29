use thiserror::Error;

use crate::naming::is_forbidden;

/// One video to fetch, keyed by its external identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub id: String,
    pub title: Option<String>,
}

/// The identifier cannot be used as a file name stem inside the output directory.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid identifier {id:?}: {reason}")]
pub struct InvalidId {
    pub id: String,
    pub reason: &'static str,
}

impl WorkItem {
    pub fn new(id: impl Into<String>, title: Option<&str>) -> Self {
        Self {
            id: id.into(),
            title: title.map(ToOwned::to_owned),
        }
    }

    /// Title when one was given and is non-empty.
    pub fn display_title(&self) -> Option<&str> {
        self.title.as_deref().filter(|t| !t.is_empty())
    }

    /// Human-readable label: the title, or the identifier when untitled.
    pub fn label(&self) -> &str {
        self.display_title().unwrap_or(&self.id)
    }

    /// Every artifact path is `<output dir>/<id>...`, so the id must stay a plain name.
    pub fn validate_id(&self) -> Result<(), InvalidId> {
        let reason = if self.id.trim().is_empty() {
            Some("empty")
        } else if self.id.contains("..") {
            Some("contains `..`")
        } else if self.id.chars().any(|c| is_forbidden(c) || c.is_control()) {
            Some("contains a path separator or reserved character")
        } else {
            None
        };
        match reason {
            Some(reason) => Err(InvalidId {
                id: self.id.clone(),
                reason,
            }),
            None => Ok(()),
        }
    }
}
