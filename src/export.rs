//! Document export.
//!
//! The export collaborator consumes the final retained list and produces a
//! file, or fails with a descriptive error. Failures never touch session
//! state; retrying is simply exporting again.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::catalog::Item;
use crate::config::ExportConfig;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("the review is still in progress")]
    SessionActive,
    #[error("no items were kept, nothing to export")]
    NothingKept,
    #[error("failed to render document: {0}")]
    Render(#[from] serde_json::Error),
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Markdown,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Markdown => "md",
            ExportFormat::Json => "json",
        }
    }
}

/// Render the retained items to document text.
pub fn render(format: ExportFormat, title: &str, items: &[&Item]) -> Result<String, ExportError> {
    match format {
        ExportFormat::Markdown => Ok(render_markdown(title, items)),
        ExportFormat::Json => {
            let mut out = serde_json::to_string_pretty(items)?;
            out.push('\n');
            Ok(out)
        }
    }
}

/// Markdown table of id and label, one row per kept item, with a count line.
fn render_markdown(title: &str, items: &[&Item]) -> String {
    let mut out = String::new();
    out.push_str(&format!("# {title}\n\n"));
    out.push_str("| Id | Label |\n");
    out.push_str("| --- | --- |\n");
    for item in items {
        out.push_str(&format!(
            "| {} | {} |\n",
            escape_cell(&item.id),
            escape_cell(&item.label)
        ));
    }
    out.push_str(&format!("\n{} item(s) kept.\n", items.len()));
    out
}

fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|").replace('\n', " ")
}

/// Render and write the document under the configured output directory.
/// Returns the path of the written file.
pub async fn export_document(cfg: &ExportConfig, items: &[&Item]) -> Result<PathBuf, ExportError> {
    if items.is_empty() {
        return Err(ExportError::NothingKept);
    }

    let content = render(cfg.format, &cfg.title, items)?;

    let dir = cfg.resolve_output_dir();
    tokio::fs::create_dir_all(&dir).await.map_err(|source| ExportError::Io {
        path: dir.clone(),
        source,
    })?;

    let path = dir.join(format!("{}.{}", cfg.file_stem, cfg.format.extension()));
    tokio::fs::write(&path, content)
        .await
        .map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;

    tracing::info!("Exported {} items to {}", items.len(), path.display());
    Ok(path)
}
