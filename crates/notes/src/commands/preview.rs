//! `notes preview` command implementation.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;
use notes_config::{CliSettings, Config};
use notes_renderer::MarkdownPipeline;

use super::{Source, pipeline_config};
use crate::error::CliError;

/// Arguments for the preview command.
#[derive(Args)]
pub(crate) struct PreviewArgs {
    /// Markdown file (default: read stdin).
    file: Option<PathBuf>,

    /// Maximum preview length in characters (overrides config).
    #[arg(long)]
    max_chars: Option<usize>,

    /// Maximum number of leading blocks (overrides config).
    #[arg(long)]
    max_blocks: Option<usize>,

    /// Path to configuration file (default: auto-discover notes.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Storage base URL for image tags (overrides config).
    #[arg(long, env = "NOTES_STORAGE_BASE_URL")]
    storage_base_url: Option<String>,
}

impl PreviewArgs {
    /// Execute the preview command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid or the input cannot be read.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            storage_base_url: self.storage_base_url,
            max_chars: self.max_chars,
            max_blocks: self.max_blocks,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let pipeline = MarkdownPipeline::new(pipeline_config(&config)?)?;

        let source = self.file.map_or(Source::Stdin, Source::File);
        let markdown = source.read()?;
        let preview = pipeline.preview(&markdown);
        tracing::debug!(chars = preview.chars().count(), "Extracted preview");

        writeln!(std::io::stdout().lock(), "{preview}")?;
        Ok(())
    }
}
