//! Worklist loading: RON file, command-line overrides and the built-in list.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use bvget_core::WorkItem;
use bvget_engine::EngineConfig;
use engine_logging::{engine_info, engine_warn};
use serde::Deserialize;

use crate::cli::Args;

const DEFAULT_OUTPUT_DIR: &str = "video";

const DEFAULT_ITEMS: &[(&str, &str)] = &[
    ("BV1tz4y1Z7wr", "中国发展成就"),
    (
        "BV1PV411w7UX",
        "China's development achievements over the last three years",
    ),
    ("BV1t6K8zFEnH", "打开数字之门，链接虚实空间，实现文化共建"),
];

#[derive(Debug, Clone, Deserialize, Default)]
struct PersistedWorklist {
    #[serde(default)]
    output_dir: Option<PathBuf>,
    #[serde(default)]
    page_url_template: Option<String>,
    #[serde(default)]
    items: Vec<PersistedItem>,
}

#[derive(Debug, Clone, Deserialize)]
struct PersistedItem {
    id: String,
    #[serde(default)]
    title: Option<String>,
}

pub struct RunConfig {
    pub engine: EngineConfig,
    pub items: Vec<WorkItem>,
    pub ffmpeg: PathBuf,
    pub audio_codec: String,
}

pub fn default_worklist() -> Vec<WorkItem> {
    DEFAULT_ITEMS
        .iter()
        .map(|(id, title)| WorkItem::new(*id, Some(*title)))
        .collect()
}

fn load_worklist(path: &Path) -> anyhow::Result<PersistedWorklist> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading worklist {}", path.display()))?;
    let worklist: PersistedWorklist = ron::from_str(&content)
        .with_context(|| format!("parsing worklist {}", path.display()))?;
    engine_info!(
        "Loaded {} item(s) from worklist {:?}",
        worklist.items.len(),
        path
    );
    Ok(worklist)
}

/// Command line beats the worklist file, which beats the built-in defaults.
pub fn resolve(args: &Args) -> anyhow::Result<RunConfig> {
    let file = match &args.worklist {
        Some(path) => Some(load_worklist(path)?),
        None => None,
    };
    let (file_dir, file_template, file_items) = match file {
        Some(worklist) => (
            worklist.output_dir,
            worklist.page_url_template,
            Some(worklist.items),
        ),
        None => (None, None, None),
    };

    let output_dir = args
        .output_dir
        .clone()
        .or(file_dir)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));
    let mut engine = EngineConfig::default_with_output(output_dir);
    if let Some(template) = args.page_url_template.clone().or(file_template) {
        engine.page_url_template = template;
    }
    engine.fetch.connect_timeout = args.connect_timeout.map(Duration::from_secs);
    engine.fetch.request_timeout = args.timeout.map(Duration::from_secs);

    let items = if !args.ids.is_empty() {
        args.ids.iter().map(|id| WorkItem::new(id.as_str(), None)).collect()
    } else if let Some(items) = file_items {
        items
            .into_iter()
            .map(|item| WorkItem::new(item.id, item.title.as_deref()))
            .collect()
    } else {
        default_worklist()
    };
    for item in &items {
        item.validate_id().context("checking worklist")?;
    }
    if items.is_empty() {
        engine_warn!("Worklist is empty; nothing to do");
    }

    Ok(RunConfig {
        engine,
        items,
        ffmpeg: args.ffmpeg.clone(),
        audio_codec: args.audio_codec.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn args(extra: &[&str]) -> Args {
        Args::parse_from(std::iter::once("bvget").chain(extra.iter().copied()))
    }

    #[test]
    fn defaults_use_built_in_list() {
        let run = resolve(&args(&[])).unwrap();
        assert_eq!(run.items.len(), 3);
        assert_eq!(run.items[0].id, "BV1tz4y1Z7wr");
        assert_eq!(run.engine.layout.output_dir, PathBuf::from("video"));
        assert_eq!(
            run.engine.page_url("BV1tz4y1Z7wr"),
            "https://www.bilibili.com/video/BV1tz4y1Z7wr"
        );
        assert_eq!(run.engine.fetch.request_timeout, None);
        assert_eq!(run.ffmpeg, PathBuf::from("ffmpeg"));
        assert_eq!(run.audio_codec, "aac");
    }

    #[test]
    fn worklist_file_supplies_items_and_output_dir() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("worklist.ron");
        fs::write(
            &path,
            r#"(
                output_dir: Some("archive"),
                items: [
                    (id: "X1", title: Some("Title One")),
                    (id: "X2"),
                ],
            )"#,
        )
        .unwrap();

        let run = resolve(&args(&["--worklist", path.to_str().unwrap()])).unwrap();
        assert_eq!(
            run.items,
            vec![
                WorkItem::new("X1", Some("Title One")),
                WorkItem::new("X2", None)
            ]
        );
        assert_eq!(run.engine.layout.output_dir, PathBuf::from("archive"));
    }

    #[test]
    fn command_line_overrides_worklist_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("worklist.ron");
        fs::write(
            &path,
            r#"(output_dir: Some("archive"), page_url_template: Some("https://a/{id}"), items: [(id: "X1")])"#,
        )
        .unwrap();

        let run = resolve(&args(&[
            "--worklist",
            path.to_str().unwrap(),
            "-o",
            "elsewhere",
            "--page-url-template",
            "https://b/{id}",
            "--timeout",
            "30",
            "Y1",
            "Y2",
        ]))
        .unwrap();
        let ids: Vec<_> = run.items.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(ids, vec!["Y1", "Y2"]);
        assert_eq!(run.engine.layout.output_dir, PathBuf::from("elsewhere"));
        assert_eq!(run.engine.page_url("Y1"), "https://b/Y1");
        assert_eq!(
            run.engine.fetch.request_timeout,
            Some(Duration::from_secs(30))
        );
    }

    #[test]
    fn identifier_with_path_components_is_rejected() {
        let err = resolve(&args(&["BV1ok", "../outside/BV1"]))
            .err()
            .expect("invalid identifier");
        assert_eq!(err.to_string(), "checking worklist");
        assert!(format!("{err:#}").contains("../outside/BV1"));
    }

    #[test]
    fn worklist_file_identifiers_are_checked_too() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("worklist.ron");
        fs::write(&path, r#"(items: [(id: "X1"), (id: "sub/X2")])"#).unwrap();

        let err = resolve(&args(&["--worklist", path.to_str().unwrap()]))
            .err()
            .expect("invalid identifier");
        assert!(format!("{err:#}").contains("sub/X2"));
    }

    #[test]
    fn malformed_worklist_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("worklist.ron");
        fs::write(&path, "(items: [oops])").unwrap();

        let err = resolve(&args(&["--worklist", path.to_str().unwrap()]))
            .err()
            .expect("parse failure");
        assert!(err.to_string().contains("parsing worklist"));
    }
}
