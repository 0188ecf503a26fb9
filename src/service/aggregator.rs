use futures::future::join_all;
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::error::Result;
use crate::news::query::{HeadlinesQuery, PersonalQuery};
use crate::news::{Article, NewsResponse, Preferences};
use crate::service::NewsService;

/// Fan-out caps: at most the first 3 categories and 2 countries are
/// combined, bounding one personalized call at 6 upstream requests.
pub const MAX_CATEGORIES: usize = 3;
pub const MAX_COUNTRIES: usize = 2;

/// Every combination fetches the same fixed first page; pagination is
/// applied after the merge, never pushed upstream.
const COMBINATION_PAGE_SIZE: u32 = 10;

/// Fan out headline requests across the user's preference combinations
/// and merge the results into one deduplicated, recency-sorted list.
///
/// All combinations are awaited regardless of outcome: a failed
/// combination contributes zero articles and is logged, never
/// propagated. The requested page is ignored; every page returns the
/// top slice, matching the behavior personalized clients already
/// depend on.
pub(super) async fn personalized(
    service: &NewsService,
    preferences: &Preferences,
    query: &PersonalQuery,
) -> Result<NewsResponse> {
    let combinations: Vec<_> = preferences
        .categories
        .iter()
        .take(MAX_CATEGORIES)
        .flat_map(|&category| {
            preferences
                .countries
                .iter()
                .take(MAX_COUNTRIES)
                .map(move |&country| (category, country))
        })
        .collect();

    debug!("Personalized fan-out across {} combinations", combinations.len());
    if let Some(page) = query.page {
        if page > 1 {
            debug!("Requested page {} is ignored for personalized results", page);
        }
    }

    let requests = combinations.into_iter().map(|(category, country)| async move {
        let headlines = HeadlinesQuery {
            category: Some(category),
            country: Some(country),
            page: Some(1),
            page_size: Some(COMBINATION_PAGE_SIZE),
            ..Default::default()
        };
        (category, country, service.top_headlines(&headlines).await)
    });

    let mut collected = Vec::new();
    for (category, country, outcome) in join_all(requests).await {
        match outcome {
            Ok(response) => collected.extend(response.articles),
            Err(error) => {
                warn!(
                    "Skipping failed combination {}/{}: {}",
                    category, country, error
                );
            }
        }
    }

    let mut articles = dedup_and_rank(collected);
    let total = articles.len();
    articles.truncate(query.effective_page_size());

    Ok(NewsResponse {
        status: "ok".to_string(),
        total_results: Some(total as u64),
        articles,
    })
}

/// Collapse duplicate urls (first occurrence wins) and sort by
/// publication time, newest first. Articles without a parseable date
/// rank as the oldest; ties keep their first-seen order.
fn dedup_and_rank(articles: Vec<Article>) -> Vec<Article> {
    let mut seen = HashSet::new();
    let mut unique: Vec<Article> = articles
        .into_iter()
        .filter(|article| seen.insert(article.url.clone()))
        .collect();

    unique.sort_by(|a, b| b.published_ts().cmp(&a.published_ts()));
    unique
}
