//! Notes CLI - markdown renderer with inline image tags.
//!
//! Provides commands for:
//! - `render`: Render markdown files to HTML (or JSON)
//! - `preview`: Print the plain-text preview of a markdown file

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{PreviewArgs, RenderArgs};
use output::Output;

/// Notes - markdown renderer with inline image tags.
#[derive(Parser)]
#[command(name = "notes", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render markdown to HTML.
    Render(RenderArgs),
    /// Print the plain-text preview of a post.
    Preview(PreviewArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let verbose = matches!(&cli.command, Commands::Render(args) if args.verbose);

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(),
        Commands::Preview(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_render_defaults() {
        let cli = Cli::try_parse_from(["notes", "render"]).unwrap();
        assert!(matches!(cli.command, Commands::Render(ref args) if !args.verbose));
    }

    #[test]
    fn test_parse_render_files_and_flags() {
        let cli = Cli::try_parse_from([
            "notes",
            "render",
            "a.md",
            "b.md",
            "--json",
            "--preview",
            "--storage-base-url",
            "https://cdn.example",
            "-v",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Render(ref args) if args.verbose));
    }

    #[test]
    fn test_parse_render_preview_requires_json() {
        assert!(Cli::try_parse_from(["notes", "render", "--preview"]).is_err());
    }

    #[test]
    fn test_parse_preview_limits() {
        let cli =
            Cli::try_parse_from(["notes", "preview", "post.md", "--max-chars", "80"]).unwrap();
        assert!(matches!(cli.command, Commands::Preview(_)));
    }

    #[test]
    fn test_parse_preview_rejects_non_numeric_limit() {
        assert!(Cli::try_parse_from(["notes", "preview", "--max-blocks", "two"]).is_err());
    }
}
