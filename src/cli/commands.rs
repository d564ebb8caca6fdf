//! CLI commands and argument parsing

use crate::types::Category;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// News headline feed
#[derive(Parser, Debug)]
#[command(name = "headline-feed")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// API key (overrides the config file)
    #[arg(long, global = true, env = "NEWS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// API base URL (overrides the config file)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load and print top headlines
    Headlines {
        /// Category to page through
        #[arg(short, long, default_value = "general")]
        category: Category,

        /// Number of pages to load (at least 1)
        #[arg(short, long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
        pages: u32,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        format: OutputFormat,
    },

    /// List headline categories
    Categories,

    /// Start HTTP server mode
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON feed view
    Json,
    /// Human-readable output
    Pretty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_headlines_defaults() {
        let cli = Cli::try_parse_from(["headline-feed", "headlines"]).unwrap();
        match cli.command {
            Commands::Headlines {
                category,
                pages,
                format,
            } => {
                assert_eq!(category, Category::General);
                assert_eq!(pages, 1);
                assert_eq!(format, OutputFormat::Pretty);
            }
            other => panic!("Expected Headlines, got {other:?}"),
        }
    }

    #[test]
    fn parses_headlines_flags() {
        let cli = Cli::try_parse_from([
            "headline-feed",
            "headlines",
            "--category",
            "technology",
            "--pages",
            "3",
            "--format",
            "json",
            "--api-key",
            "k",
        ])
        .unwrap();
        assert_eq!(cli.api_key.as_deref(), Some("k"));
        assert!(matches!(
            cli.command,
            Commands::Headlines {
                category: Category::Technology,
                pages: 3,
                format: OutputFormat::Json
            }
        ));
    }

    #[test]
    fn rejects_unknown_category() {
        assert!(Cli::try_parse_from(["headline-feed", "headlines", "-c", "weather"]).is_err());
    }

    #[test]
    fn rejects_zero_pages() {
        assert!(Cli::try_parse_from(["headline-feed", "headlines", "--pages", "0"]).is_err());
        assert!(Cli::try_parse_from(["headline-feed", "headlines", "-p", "1"]).is_ok());
    }

    #[test]
    fn parses_serve_port() {
        let cli = Cli::try_parse_from(["headline-feed", "serve", "--port", "9000"]).unwrap();
        assert!(matches!(cli.command, Commands::Serve { port: 9000 }));
    }
}
