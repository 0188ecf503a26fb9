use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

use crate::config::{Config, LoggingConfig};
use crate::error::{Error, Result};
use crate::news::client::NewsClient;
use crate::news::query::{HeadlinesQuery, PersonalQuery, SearchQuery, SortBy, SourcesQuery};
use crate::news::{Category, Country, Language, Preferences};
use crate::service::NewsService;

/// Load configuration from an explicit path, the default config file,
/// or built-in defaults, with environment overrides applied last.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return Config::load_with_env(path);
    }

    if let Ok(dir) = Config::config_dir() {
        let default_file = dir.join("config.toml");
        if default_file.exists() {
            return Config::load_with_env(default_file);
        }
    }

    let mut config = Config::default();
    config.apply_env_overrides();
    config.validate()?;
    Ok(config)
}

/// Initialize logging based on verbosity flags and configuration.
pub fn init_logging(debug: bool, verbose: bool, logging: &LoggingConfig) -> Result<()> {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = if debug {
        EnvFilter::new("debug")
    } else if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::new(logging.level.clone())
    };

    if logging.json_format {
        fmt().with_env_filter(filter).json().init();
    } else {
        fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_file(debug)
            .with_line_number(debug)
            .init();
    }

    debug!("Logging initialized");
    Ok(())
}

fn build_service(config: &Config) -> Result<NewsService> {
    if config.api.api_key.is_empty() {
        return Err(Error::Config(
            "News API key is not configured. Set NEWSDESK_API_KEY or api.api_key in config.toml"
                .to_string(),
        ));
    }

    let client = NewsClient::new(&config.api.base_url, config.api.api_key.clone())?
        .with_timeout(config.request_timeout());

    Ok(NewsService::with_ttl(client, config.cache_ttl()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub async fn headlines(
    config: &Config,
    category: Option<Category>,
    country: Option<Country>,
    sources: Option<String>,
    query: Option<String>,
    page: Option<u32>,
    page_size: Option<u32>,
) -> Result<()> {
    let service = build_service(config)?;
    let query = HeadlinesQuery {
        category,
        country,
        sources,
        q: query,
        page,
        page_size: page_size.or(Some(config.api.page_size)),
    };

    let response = service.top_headlines(&query).await?;
    info!(
        "Fetched {} headline(s), {} total upstream",
        response.articles.len(),
        response.total_results.unwrap_or_default()
    );
    print_json(&response)
}

#[allow(clippy::too_many_arguments)]
pub async fn search(
    config: &Config,
    query: String,
    sources: Option<String>,
    domains: Option<String>,
    from: Option<String>,
    to: Option<String>,
    language: Option<Language>,
    sort_by: Option<SortBy>,
    page: Option<u32>,
    page_size: Option<u32>,
) -> Result<()> {
    let service = build_service(config)?;
    let query = SearchQuery {
        q: query,
        sources,
        domains,
        from,
        to,
        language,
        sort_by,
        page,
        page_size: page_size.or(Some(config.api.page_size)),
    };

    let response = service.search_everything(&query).await?;
    print_json(&response)
}

pub async fn sources(
    config: &Config,
    category: Option<Category>,
    language: Option<Language>,
    country: Option<Country>,
) -> Result<()> {
    let service = build_service(config)?;
    let query = SourcesQuery {
        category,
        language,
        country,
    };

    let response = service.get_sources(&query).await?;
    print_json(&response)
}

pub async fn personalized(
    config: &Config,
    categories: Vec<Category>,
    countries: Vec<Country>,
    language: Option<Language>,
    page: Option<u32>,
    page_size: Option<u32>,
) -> Result<()> {
    let service = build_service(config)?;

    let defaults = Preferences::default();
    let preferences = Preferences {
        categories: if categories.is_empty() {
            defaults.categories
        } else {
            categories
        },
        countries: if countries.is_empty() {
            defaults.countries
        } else {
            countries
        },
        language: language.unwrap_or(defaults.language),
    };

    let query = PersonalQuery {
        page,
        page_size: page_size.or(Some(config.api.page_size)),
    };

    let response = service.personalized(&preferences, &query).await?;
    print_json(&response)
}

/// Print the resolved configuration and probe upstream connectivity
/// with a minimal headline query.
pub async fn status(config: &Config) -> Result<()> {
    println!("newsdesk {}", env!("CARGO_PKG_VERSION"));
    println!("  Base URL:   {}", config.api.base_url);
    println!(
        "  API key:    {}",
        if config.api.api_key.is_empty() {
            "(not set)"
        } else {
            "(set)"
        }
    );
    println!("  Timeout:    {}s", config.api.timeout);
    println!("  Cache TTL:  {}s", config.cache.ttl);
    println!("  Page size:  {}", config.api.page_size);

    let service = build_service(config)?;
    let probe = HeadlinesQuery {
        country: Some(Country::Us),
        page_size: Some(1),
        ..Default::default()
    };

    match service.top_headlines(&probe).await {
        Ok(_) => {
            println!("  Upstream:   ✅ reachable");
            Ok(())
        }
        Err(e) => {
            println!("  Upstream:   ❌ {}", e);
            Err(e)
        }
    }
}
