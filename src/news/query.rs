use crate::error::{Error, Result};
use crate::news::{Category, Country, Language};
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Upstream rejects pageSize above 100.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Sort order for search queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortBy {
    Relevancy,
    Popularity,
    #[default]
    PublishedAt,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Relevancy => "relevancy",
            SortBy::Popularity => "popularity",
            SortBy::PublishedAt => "publishedAt",
        }
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortBy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "relevancy" => Ok(SortBy::Relevancy),
            "popularity" => Ok(SortBy::Popularity),
            "publishedAt" => Ok(SortBy::PublishedAt),
            other => Err(Error::Validation(format!("Invalid sort order: {}", other))),
        }
    }
}

/// Options for a top-headlines request.
#[derive(Debug, Clone, Default)]
pub struct HeadlinesQuery {
    pub category: Option<Category>,
    pub country: Option<Country>,
    pub sources: Option<String>,
    pub q: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// Options for a full-text search request. `q` is required.
#[derive(Debug, Clone, Default)]
pub struct SearchQuery {
    pub q: String,
    pub sources: Option<String>,
    pub domains: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub language: Option<Language>,
    pub sort_by: Option<SortBy>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// Options for a source-listing request. No pagination upstream.
#[derive(Debug, Clone, Default)]
pub struct SourcesQuery {
    pub category: Option<Category>,
    pub language: Option<Language>,
    pub country: Option<Country>,
}

/// Pagination options for a personalized request.
#[derive(Debug, Clone, Default)]
pub struct PersonalQuery {
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

fn clamp_page(page: Option<u32>) -> u32 {
    page.unwrap_or(DEFAULT_PAGE).max(1)
}

fn clamp_page_size(page_size: Option<u32>) -> u32 {
    page_size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl HeadlinesQuery {
    /// Canonical parameter list for the top-headlines endpoint.
    ///
    /// Blank optional fields are omitted entirely, never sent as empty
    /// strings, so logically identical requests share one cache key.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("pageSize".to_string(), clamp_page_size(self.page_size).to_string()),
            ("page".to_string(), clamp_page(self.page).to_string()),
        ];

        if let Some(category) = self.category {
            params.push(("category".to_string(), category.to_string()));
        }
        if let Some(country) = self.country {
            params.push(("country".to_string(), country.to_string()));
        }
        if let Some(sources) = non_blank(&self.sources) {
            params.push(("sources".to_string(), sources.to_string()));
        }
        if let Some(q) = non_blank(&self.q) {
            params.push(("q".to_string(), q.to_string()));
        }

        params
    }
}

impl SearchQuery {
    /// Canonical parameter list for the everything endpoint.
    ///
    /// Fails with a validation error when `q` is blank; no upstream
    /// call is made in that case.
    pub fn to_params(&self) -> Result<Vec<(String, String)>> {
        let q = self.q.trim();
        if q.is_empty() {
            return Err(Error::Validation("Search query is required".to_string()));
        }

        let mut params = vec![
            ("q".to_string(), q.to_string()),
            ("pageSize".to_string(), clamp_page_size(self.page_size).to_string()),
            ("page".to_string(), clamp_page(self.page).to_string()),
            ("sortBy".to_string(), self.sort_by.unwrap_or_default().to_string()),
        ];

        if let Some(sources) = non_blank(&self.sources) {
            params.push(("sources".to_string(), sources.to_string()));
        }
        if let Some(domains) = non_blank(&self.domains) {
            params.push(("domains".to_string(), domains.to_string()));
        }
        if let Some(from) = non_blank(&self.from) {
            params.push(("from".to_string(), from.to_string()));
        }
        if let Some(to) = non_blank(&self.to) {
            params.push(("to".to_string(), to.to_string()));
        }
        if let Some(language) = self.language {
            params.push(("language".to_string(), language.to_string()));
        }

        Ok(params)
    }
}

impl SourcesQuery {
    /// Canonical parameter list for the sources endpoint.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();

        if let Some(category) = self.category {
            params.push(("category".to_string(), category.to_string()));
        }
        if let Some(language) = self.language {
            params.push(("language".to_string(), language.to_string()));
        }
        if let Some(country) = self.country {
            params.push(("country".to_string(), country.to_string()));
        }

        params
    }
}

impl PersonalQuery {
    pub fn effective_page_size(&self) -> usize {
        clamp_page_size(self.page_size) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params_map(params: &[(String, String)]) -> std::collections::HashMap<&str, &str> {
        params.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
    }

    #[test]
    fn test_headlines_defaults() {
        let params = HeadlinesQuery::default().to_params();
        let map = params_map(&params);

        assert_eq!(params.len(), 2);
        assert_eq!(map["pageSize"], "20");
        assert_eq!(map["page"], "1");
    }

    #[test]
    fn test_headlines_full() {
        let query = HeadlinesQuery {
            category: Some(Category::Technology),
            country: Some(Country::Gb),
            sources: Some("bbc-news".to_string()),
            q: Some("ai".to_string()),
            page: Some(3),
            page_size: Some(50),
        };

        let map_owned = query.to_params();
        let map = params_map(&map_owned);
        assert_eq!(map["category"], "technology");
        assert_eq!(map["country"], "gb");
        assert_eq!(map["sources"], "bbc-news");
        assert_eq!(map["q"], "ai");
        assert_eq!(map["page"], "3");
        assert_eq!(map["pageSize"], "50");
    }

    #[test]
    fn test_headlines_blank_optionals_are_omitted() {
        let query = HeadlinesQuery {
            sources: Some("   ".to_string()),
            q: Some(String::new()),
            ..Default::default()
        };

        let params = query.to_params();
        assert!(params.iter().all(|(k, _)| k != "sources" && k != "q"));
    }

    #[test]
    fn test_page_and_size_are_clamped() {
        let query = HeadlinesQuery {
            page: Some(0),
            page_size: Some(10_000),
            ..Default::default()
        };

        let params = query.to_params();
        let map = params_map(&params);
        assert_eq!(map["page"], "1");
        assert_eq!(map["pageSize"], "100");
    }

    #[test]
    fn test_search_requires_query() {
        let err = SearchQuery::default().to_params().unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let err = SearchQuery {
            q: "  ".to_string(),
            ..Default::default()
        }
        .to_params()
        .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_search_defaults() {
        let query = SearchQuery {
            q: "rust".to_string(),
            ..Default::default()
        };

        let params = query.to_params().unwrap();
        let map = params_map(&params);
        assert_eq!(map["q"], "rust");
        assert_eq!(map["sortBy"], "publishedAt");
        assert_eq!(map["pageSize"], "20");
        assert_eq!(map["page"], "1");
        assert!(!map.contains_key("language"));
    }

    #[test]
    fn test_search_full() {
        let query = SearchQuery {
            q: "climate".to_string(),
            sources: Some("reuters".to_string()),
            domains: Some("reuters.com".to_string()),
            from: Some("2024-01-01".to_string()),
            to: Some("2024-02-01".to_string()),
            language: Some(Language::Fr),
            sort_by: Some(SortBy::Popularity),
            page: Some(2),
            page_size: Some(25),
        };

        let params = query.to_params().unwrap();
        let map = params_map(&params);
        assert_eq!(map["domains"], "reuters.com");
        assert_eq!(map["from"], "2024-01-01");
        assert_eq!(map["to"], "2024-02-01");
        assert_eq!(map["language"], "fr");
        assert_eq!(map["sortBy"], "popularity");
    }

    #[test]
    fn test_sources_has_no_pagination() {
        let query = SourcesQuery {
            category: Some(Category::Science),
            language: Some(Language::En),
            country: Some(Country::Us),
        };

        let params = query.to_params();
        assert_eq!(params.len(), 3);
        assert!(params.iter().all(|(k, _)| k != "page" && k != "pageSize"));

        assert!(SourcesQuery::default().to_params().is_empty());
    }

    #[test]
    fn test_sort_by_parse() {
        assert_eq!("publishedAt".parse::<SortBy>().unwrap(), SortBy::PublishedAt);
        assert!("newest".parse::<SortBy>().is_err());
    }

    #[test]
    fn test_personal_query_page_size() {
        assert_eq!(PersonalQuery::default().effective_page_size(), 20);

        let query = PersonalQuery {
            page: None,
            page_size: Some(5),
        };
        assert_eq!(query.effective_page_size(), 5);
    }
}
