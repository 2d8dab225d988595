// ABOUTME: Output-mode handling for command payloads
// ABOUTME: Renders text, pretty JSON, or line-delimited JSON, to stdout or a file

use anyhow::Context as _;
use serde_json::Value;
use std::path::PathBuf;

/// How the invocation wants its output rendered.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    /// Emit the full JSON payload
    pub json: bool,
    /// Emit one JSON record per line
    pub jsonl: bool,
    /// Write to this file instead of stdout
    pub output: Option<PathBuf>,
}

impl RenderOptions {
    /// Whether any machine-readable mode was requested.
    #[must_use]
    pub fn is_json_mode(&self) -> bool {
        self.json || self.jsonl
    }
}

/// Write a command payload.
///
/// `text` is the human rendering used when no JSON mode is active; commands
/// that are JSON-only pass `None`.
pub async fn write_payload(
    payload: &Value,
    options: &RenderOptions,
    text: Option<String>,
) -> anyhow::Result<()> {
    if options.jsonl {
        let records = payload
            .get("records")
            .and_then(Value::as_array)
            .cloned()
            .or_else(|| payload.as_array().cloned())
            .unwrap_or_default();
        let mut content = records
            .iter()
            .map(|record| serde_json::to_string(record))
            .collect::<Result<Vec<_>, _>>()
            .context("serializing jsonl records")?
            .join("\n");
        if !content.is_empty() {
            content.push('\n');
        }
        return emit(&content, options, "JSONL").await;
    }

    if options.json || text.is_none() {
        let mut content =
            serde_json::to_string_pretty(payload).context("serializing json payload")?;
        content.push('\n');
        return emit(&content, options, "JSON").await;
    }

    let mut rendered = text.unwrap_or_default();
    rendered.push('\n');
    emit(&rendered, options, "text").await
}

async fn emit(content: &str, options: &RenderOptions, label: &str) -> anyhow::Result<()> {
    match &options.output {
        Some(path) => {
            tokio::fs::write(path, content)
                .await
                .with_context(|| format!("writing {} to {}", label, path.display()))?;
            println!("Wrote {label} to {}", path.display());
        }
        None => print!("{content}"),
    }
    Ok(())
}
