//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::feed::{ArticleLayout, FeedEntry, HeadlineFeed};
use crate::fetch::NewsApiFetcher;
use crate::pagination::{LoadOutcome, PaginationController};
use crate::types::Category;
use tracing::warn;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Headlines {
                category,
                pages,
                format,
            } => self.headlines(*category, *pages, *format).await,
            Commands::Categories => {
                self.categories();
                Ok(())
            }
            Commands::Serve { port } => {
                let config = self.app_config()?;
                crate::cli::serve(config, *port).await
            }
        }
    }

    /// Resolve configuration: file, then environment, then flags
    pub fn app_config(&self) -> Result<AppConfig> {
        let mut config = AppConfig::load(self.cli.config.as_deref())?.with_env();

        if let Some(key) = &self.cli.api_key {
            config = config.with_api_key(key);
        }
        if let Some(url) = &self.cli.base_url {
            config = config.with_base_url(url);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load `pages` pages of a category and print them
    async fn headlines(&self, category: Category, pages: u32, format: OutputFormat) -> Result<()> {
        let config = self.app_config()?;
        let fetcher = NewsApiFetcher::from_config(&config)?;
        let feed = HeadlineFeed::new(
            PaginationController::new(category.as_str(), fetcher),
            config.date_converter()?,
        )
        .with_prefetch_distance(config.prefetch_distance);

        for _ in 0..pages {
            // loads run one after another here, so the controller is never busy
            if let LoadOutcome::Failed(err) = feed.load_more().await {
                if feed.controller().is_empty() {
                    return Err(Error::Other(format!("Failed to load headlines: {err}")));
                }
                warn!("Stopped early: {}", err);
                break;
            }

            if !feed.controller().has_more() {
                break;
            }
        }

        match format {
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(&feed.view())?);
            }
            OutputFormat::Pretty => {
                print!("{}", render_pretty(&feed.entries()));
            }
        }

        Ok(())
    }

    /// Print all categories
    fn categories(&self) {
        for category in Category::ALL {
            println!("{category}");
        }
    }
}

/// Render entries for a terminal
pub fn render_pretty(entries: &[FeedEntry]) -> String {
    let mut out = String::new();

    for entry in entries {
        let article = &entry.article;
        let meta = if article.published_at.is_empty() {
            article.source.name.clone()
        } else {
            format!("{} · {}", article.source.name, article.published_at)
        };

        let block = match entry.layout {
            ArticleLayout::Large => format!(
                "━━ {} ━━\n   {}\n   [image] {}\n   {}\n\n",
                article.title,
                meta,
                article.url_to_image.as_deref().unwrap_or_default(),
                article.url
            ),
            ArticleLayout::Medium => format!(
                "{:>3}. {}\n     {}\n     {}\n",
                entry.index + 1,
                article.title,
                meta,
                article.url
            ),
        };
        out.push_str(&block);
    }

    if entries.is_empty() {
        out.push_str("No headlines.\n");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Article, Source};
    use clap::Parser;

    fn entry(index: usize, layout: ArticleLayout) -> FeedEntry {
        FeedEntry {
            index,
            layout,
            article: Article {
                source: Source {
                    id: None,
                    name: "NHK".to_string(),
                },
                title: format!("Title {index}"),
                url: format!("https://example.com/{index}"),
                url_to_image: Some("https://example.com/img.jpg".to_string()),
                published_at: "2021-08-01 12:15:00".to_string(),
                ..Default::default()
            },
        }
    }

    #[test]
    fn renders_large_then_medium() {
        let out = render_pretty(&[
            entry(0, ArticleLayout::Large),
            entry(1, ArticleLayout::Medium),
        ]);
        assert!(out.starts_with("━━ Title 0 ━━"));
        assert!(out.contains("[image] https://example.com/img.jpg"));
        assert!(out.contains("  2. Title 1"));
        assert!(out.contains("NHK · 2021-08-01 12:15:00"));
    }

    #[test]
    fn renders_medium_entry_exactly() {
        let out = render_pretty(&[entry(4, ArticleLayout::Medium)]);
        assert_eq!(
            out,
            "  5. Title 4\n     NHK · 2021-08-01 12:15:00\n     https://example.com/4\n"
        );
    }

    #[test]
    fn renders_empty_feed() {
        assert_eq!(render_pretty(&[]), "No headlines.\n");
    }

    #[test]
    fn flags_override_config() {
        let cli = Cli::try_parse_from([
            "headline-feed",
            "--api-key",
            "flag-key",
            "--base-url",
            "http://localhost:1234/",
            "categories",
        ])
        .unwrap();
        let config = Runner::new(cli).app_config().unwrap();
        assert_eq!(config.api_key.as_deref(), Some("flag-key"));
        assert_eq!(config.base_url, "http://localhost:1234/");
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let cli =
            Cli::try_parse_from(["headline-feed", "--base-url", "nope", "categories"]).unwrap();
        assert!(Runner::new(cli).app_config().is_err());
    }
}
