//! `notes render` command implementation.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use notes_config::{CliSettings, Config};
use notes_renderer::{MarkdownPipeline, Rendered};
use rayon::prelude::*;
use serde::Serialize;

use super::{Source, pipeline_config};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown files to render (default: read stdin).
    files: Vec<PathBuf>,

    /// Include a plain-text preview in JSON output.
    #[arg(long, requires = "json")]
    preview: bool,

    /// Print one JSON object per input instead of HTML.
    #[arg(long)]
    json: bool,

    /// Path to configuration file (default: auto-discover notes.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Storage base URL for image tags (overrides config).
    #[arg(long, env = "NOTES_STORAGE_BASE_URL")]
    storage_base_url: Option<String>,

    /// Enable GFM tables and task lists (overrides config).
    #[arg(long)]
    gfm: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

/// JSON shape of a single rendered input.
#[derive(Debug, Serialize)]
struct RenderedJson<'a> {
    html: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    preview: Option<&'a str>,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid or an input cannot be read.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            storage_base_url: self.storage_base_url,
            gfm: self.gfm.then_some(true),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        if let Some(path) = &config.config_path {
            output.status(&format!("Using config: {}", path.display()));
        }

        let pipeline = MarkdownPipeline::new(pipeline_config(&config)?)?;
        let sources = Source::from_paths(&self.files);
        tracing::info!(inputs = sources.len(), "Rendering markdown");

        let rendered = render_sources(&pipeline, &sources)?;

        let mut stdout = std::io::stdout().lock();
        for item in &rendered {
            if self.json {
                writeln!(stdout, "{}", to_json(item, self.preview)?)?;
            } else {
                writeln!(stdout, "{}", item.html)?;
            }
        }
        Ok(())
    }
}

/// Render all sources in parallel, returning results in input order.
fn render_sources(
    pipeline: &MarkdownPipeline,
    sources: &[Source],
) -> Result<Vec<Rendered>, CliError> {
    sources
        .par_iter()
        .map(|source| {
            let markdown = source.read()?;
            Ok(pipeline.render_with_preview(&markdown))
        })
        .collect()
}

fn to_json(rendered: &Rendered, include_preview: bool) -> Result<String, CliError> {
    let json = RenderedJson {
        html: &rendered.html,
        preview: include_preview.then_some(rendered.preview.as_str()),
    };
    Ok(serde_json::to_string(&json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use notes_renderer::PipelineConfig;
    use pretty_assertions::assert_eq;

    fn pipeline() -> MarkdownPipeline {
        MarkdownPipeline::new(PipelineConfig::with_storage_base_url("https://cdn.example")).unwrap()
    }

    #[test]
    fn test_render_sources_in_input_order() {
        let dir = tempfile::tempdir().unwrap();
        let paths: Vec<PathBuf> = (0..8)
            .map(|i| {
                let path = dir.path().join(format!("{i}.md"));
                std::fs::write(&path, format!("Post {i} [img]{i}.jpg[/img]")).unwrap();
                path
            })
            .collect();

        let rendered = render_sources(&pipeline(), &Source::from_paths(&paths)).unwrap();

        assert_eq!(rendered.len(), 8);
        for (i, item) in rendered.iter().enumerate() {
            assert!(item.html.starts_with(&format!("<p>Post {i} ")));
            assert!(item.html.contains(&format!("https://cdn.example/{i}_preview.jpg")));
        }
    }

    #[test]
    fn test_render_sources_missing_file() {
        let sources = vec![Source::File(PathBuf::from("does-not-exist.md"))];
        let err = render_sources(&pipeline(), &sources).unwrap_err();
        assert!(matches!(err, CliError::Read { .. }));
    }

    #[test]
    fn test_to_json_without_preview() {
        let rendered = Rendered {
            html: "<p>hi</p>".to_owned(),
            preview: "hi".to_owned(),
        };
        assert_eq!(to_json(&rendered, false).unwrap(), r#"{"html":"<p>hi</p>"}"#);
    }

    #[test]
    fn test_to_json_with_preview() {
        let rendered = Rendered {
            html: "<p>hi</p>".to_owned(),
            preview: "hi".to_owned(),
        };
        assert_eq!(
            to_json(&rendered, true).unwrap(),
            r#"{"html":"<p>hi</p>","preview":"hi"}"#
        );
    }
}
