pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::error::Result;
use crate::news::query::SortBy;
use crate::news::{Category, Country, Language};

#[derive(Parser)]
#[command(name = "newsdesk")]
#[command(about = "Personalized news aggregation with response caching")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(short, long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fetch top headlines
    Headlines {
        /// News category
        #[arg(long)]
        category: Option<Category>,

        /// Two-letter country code
        #[arg(long)]
        country: Option<Country>,

        /// Comma-separated source identifiers
        #[arg(long)]
        sources: Option<String>,

        /// Keyword filter
        #[arg(short, long)]
        query: Option<String>,

        /// Result page
        #[arg(long)]
        page: Option<u32>,

        /// Results per page (1-100)
        #[arg(long)]
        page_size: Option<u32>,
    },

    /// Search all indexed articles
    Search {
        /// Search phrase
        query: String,

        /// Comma-separated source identifiers
        #[arg(long)]
        sources: Option<String>,

        /// Comma-separated domains to restrict results to
        #[arg(long)]
        domains: Option<String>,

        /// Earliest publication date (ISO 8601)
        #[arg(long)]
        from: Option<String>,

        /// Latest publication date (ISO 8601)
        #[arg(long)]
        to: Option<String>,

        /// Article language
        #[arg(long)]
        language: Option<Language>,

        /// Sort order: relevancy, popularity, or publishedAt
        #[arg(long)]
        sort_by: Option<SortBy>,

        /// Result page
        #[arg(long)]
        page: Option<u32>,

        /// Results per page (1-100)
        #[arg(long)]
        page_size: Option<u32>,
    },

    /// List available news sources
    Sources {
        /// News category
        #[arg(long)]
        category: Option<Category>,

        /// Article language
        #[arg(long)]
        language: Option<Language>,

        /// Two-letter country code
        #[arg(long)]
        country: Option<Country>,
    },

    /// Merged headlines for a preference set
    Personalized {
        /// Preferred categories (comma-separated; first 3 are used)
        #[arg(long, value_delimiter = ',')]
        categories: Vec<Category>,

        /// Preferred countries (comma-separated; first 2 are used)
        #[arg(long, value_delimiter = ',')]
        countries: Vec<Country>,

        /// Preferred language
        #[arg(long)]
        language: Option<Language>,

        /// Result page (personalized results always return the top slice)
        #[arg(long)]
        page: Option<u32>,

        /// Results per page (1-100)
        #[arg(long)]
        page_size: Option<u32>,
    },

    /// Show resolved configuration and check upstream connectivity
    Status,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let config = commands::load_config(self.config.as_deref())?;
        commands::init_logging(self.debug, self.verbose, &config.logging)?;

        match self.command {
            Commands::Headlines {
                category,
                country,
                sources,
                query,
                page,
                page_size,
            } => {
                commands::headlines(&config, category, country, sources, query, page, page_size)
                    .await
            }
            Commands::Search {
                query,
                sources,
                domains,
                from,
                to,
                language,
                sort_by,
                page,
                page_size,
            } => {
                commands::search(
                    &config, query, sources, domains, from, to, language, sort_by, page, page_size,
                )
                .await
            }
            Commands::Sources {
                category,
                language,
                country,
            } => commands::sources(&config, category, language, country).await,
            Commands::Personalized {
                categories,
                countries,
                language,
                page,
                page_size,
            } => {
                commands::personalized(&config, categories, countries, language, page, page_size)
                    .await
            }
            Commands::Status => commands::status(&config).await,
        }
    }
}
