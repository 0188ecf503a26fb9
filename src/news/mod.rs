pub mod client;
pub mod query;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// A single article as returned by the upstream news API.
///
/// The `url` is the article's identity: merged result sets are
/// deduplicated on exact url equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub source: ArticleSource,
    pub author: Option<String>,
    pub title: String,
    pub description: Option<String>,
    pub url: String,
    #[serde(rename = "urlToImage")]
    pub url_to_image: Option<String>,
    #[serde(rename = "publishedAt")]
    pub published_at: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArticleSource {
    pub id: Option<String>,
    pub name: Option<String>,
}

/// Response envelope for the headline and search endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsResponse {
    pub status: String,
    #[serde(rename = "totalResults")]
    pub total_results: Option<u64>,
    #[serde(default)]
    pub articles: Vec<Article>,
}

/// Response envelope for the sources endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcesResponse {
    pub status: String,
    #[serde(default)]
    pub sources: Vec<SourceInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceInfo {
    pub id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub category: Option<String>,
    pub language: Option<String>,
    pub country: Option<String>,
}

impl Article {
    /// Publication timestamp parsed from the upstream string.
    ///
    /// Upstream normally sends RFC 3339; a plain date is accepted as
    /// midnight UTC. Anything else yields `None`, which sorts as the
    /// oldest possible article.
    pub fn published_ts(&self) -> Option<DateTime<Utc>> {
        let raw = self.published_at.as_deref()?;

        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Some(ts.with_timezone(&Utc));
        }

        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
    }
}

/// News category, as accepted by the headline and sources endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    General,
    Business,
    Entertainment,
    Health,
    Science,
    Sports,
    Technology,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::General,
        Category::Business,
        Category::Entertainment,
        Category::Health,
        Category::Science,
        Category::Sports,
        Category::Technology,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::General => "general",
            Category::Business => "business",
            Category::Entertainment => "entertainment",
            Category::Health => "health",
            Category::Science => "science",
            Category::Sports => "sports",
            Category::Technology => "technology",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .iter()
            .find(|c| c.as_str() == s)
            .copied()
            .ok_or_else(|| Error::Validation(format!("Invalid category: {}", s)))
    }
}

/// Two-letter country code for headline queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Country {
    Us,
    Gb,
    Ca,
    Au,
    In,
    De,
    Fr,
    Jp,
    Cn,
    Br,
}

impl Country {
    pub const ALL: [Country; 10] = [
        Country::Us,
        Country::Gb,
        Country::Ca,
        Country::Au,
        Country::In,
        Country::De,
        Country::Fr,
        Country::Jp,
        Country::Cn,
        Country::Br,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Country::Us => "us",
            Country::Gb => "gb",
            Country::Ca => "ca",
            Country::Au => "au",
            Country::In => "in",
            Country::De => "de",
            Country::Fr => "fr",
            Country::Jp => "jp",
            Country::Cn => "cn",
            Country::Br => "br",
        }
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Country {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Country::ALL
            .iter()
            .find(|c| c.as_str() == s)
            .copied()
            .ok_or_else(|| Error::Validation(format!("Invalid country code: {}", s)))
    }
}

/// Article language for search and sources queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Es,
    Fr,
    De,
    It,
    Pt,
    Ru,
    Zh,
    Ja,
    Ar,
}

impl Language {
    pub const ALL: [Language; 10] = [
        Language::En,
        Language::Es,
        Language::Fr,
        Language::De,
        Language::It,
        Language::Pt,
        Language::Ru,
        Language::Zh,
        Language::Ja,
        Language::Ar,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
            Language::Fr => "fr",
            Language::De => "de",
            Language::It => "it",
            Language::Pt => "pt",
            Language::Ru => "ru",
            Language::Zh => "zh",
            Language::Ja => "ja",
            Language::Ar => "ar",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::ALL
            .iter()
            .find(|l| l.as_str() == s)
            .copied()
            .ok_or_else(|| Error::Validation(format!("Invalid language code: {}", s)))
    }
}

/// A user's news preferences, driving the personalized fan-out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preferences {
    pub categories: Vec<Category>,
    pub countries: Vec<Country>,
    pub language: Language,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            categories: vec![Category::General, Category::Technology, Category::Business],
            countries: vec![Country::Us],
            language: Language::En,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_category_round_trip() {
        for category in Category::ALL {
            let parsed: Category = category.as_str().parse().unwrap();
            assert_eq!(parsed, category);
        }
    }

    #[test]
    fn test_unknown_category_is_validation_error() {
        let err = "politics".parse::<Category>().unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(err.to_string().contains("politics"));
    }

    #[test]
    fn test_unknown_country_is_validation_error() {
        let err = "zz".parse::<Country>().unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_enum_serde_uses_lowercase() {
        assert_eq!(serde_json::to_string(&Category::Technology).unwrap(), "\"technology\"");
        assert_eq!(serde_json::to_string(&Country::Gb).unwrap(), "\"gb\"");
        assert_eq!(serde_json::to_string(&Language::En).unwrap(), "\"en\"");
    }

    #[test]
    fn test_article_wire_names() {
        let json = r#"{
            "source": {"id": null, "name": "BBC News"},
            "author": "Jane Doe",
            "title": "Sample headline",
            "description": "A description",
            "url": "https://example.com/a",
            "urlToImage": "https://example.com/a.jpg",
            "publishedAt": "2024-03-01T12:00:00Z",
            "content": "Body text"
        }"#;

        let article: Article = serde_json::from_str(json).unwrap();
        assert_eq!(article.url_to_image.as_deref(), Some("https://example.com/a.jpg"));
        assert_eq!(article.source.name.as_deref(), Some("BBC News"));

        let ts = article.published_ts().unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_published_ts_accepts_plain_date() {
        let article = Article {
            source: ArticleSource { id: None, name: None },
            author: None,
            title: "t".to_string(),
            description: None,
            url: "https://example.com".to_string(),
            url_to_image: None,
            published_at: Some("2024-02-15".to_string()),
            content: None,
        };

        let ts = article.published_ts().unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2024, 2, 15, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_published_ts_garbage_is_none() {
        let article = Article {
            source: ArticleSource { id: None, name: None },
            author: None,
            title: "t".to_string(),
            description: None,
            url: "https://example.com".to_string(),
            url_to_image: None,
            published_at: Some("yesterday-ish".to_string()),
            content: None,
        };

        assert!(article.published_ts().is_none());
    }

    #[test]
    fn test_default_preferences() {
        let prefs = Preferences::default();
        assert_eq!(
            prefs.categories,
            vec![Category::General, Category::Technology, Category::Business]
        );
        assert_eq!(prefs.countries, vec![Country::Us]);
        assert_eq!(prefs.language, Language::En);
    }
}
