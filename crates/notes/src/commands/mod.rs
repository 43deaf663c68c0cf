//! CLI command implementations.

pub(crate) mod preview;
pub(crate) mod render;

pub(crate) use preview::PreviewArgs;
pub(crate) use render::RenderArgs;

use std::path::{Path, PathBuf};

use notes_config::Config;
use notes_renderer::{PipelineConfig, PreviewOptions};

use crate::error::CliError;

/// Markdown input: a file, or stdin when no file is given.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Source {
    Stdin,
    File(PathBuf),
}

impl Source {
    /// Sources for the given paths, falling back to stdin for an empty list.
    pub(crate) fn from_paths(paths: &[PathBuf]) -> Vec<Self> {
        if paths.is_empty() {
            vec![Self::Stdin]
        } else {
            paths.iter().cloned().map(Self::File).collect()
        }
    }

    /// Read the whole source into a string.
    pub(crate) fn read(&self) -> Result<String, CliError> {
        match self {
            Self::Stdin => Ok(std::io::read_to_string(std::io::stdin())?),
            Self::File(path) => read_file(path),
        }
    }
}

fn read_file(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.display().to_string(),
        source,
    })
}

/// Map loaded configuration onto renderer pipeline configuration.
///
/// # Errors
///
/// Returns an error if `storage.base_url` is not configured.
pub(crate) fn pipeline_config(config: &Config) -> Result<PipelineConfig, CliError> {
    let base_url = config.require_storage_base_url()?;
    Ok(PipelineConfig {
        storage_base_url: Some(base_url.to_owned()),
        gfm: config.markdown.gfm,
        strikethrough: config.markdown.strikethrough,
        preview: PreviewOptions {
            max_chars: config.preview.max_chars,
            max_blocks: config.preview.max_blocks,
        },
    })
}
