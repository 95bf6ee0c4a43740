//! Home screen: the news carousel and the category list.

use tracing::instrument;

use super::filters::NavigationSeed;
use super::{CatalogSource, Category, NewsPost};

/// News posts shown in the carousel.
pub const NEWS_LIMIT: u32 = 5;

/// Loaded home screen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HomeScreen {
    /// Latest news, newest first.
    pub news: Vec<NewsPost>,
    pub categories: Vec<Category>,
}

impl HomeScreen {
    /// Fetch news and categories concurrently. A failed fetch is logged and
    /// leaves that part empty.
    #[instrument(skip_all)]
    pub async fn load<S: CatalogSource>(source: &S) -> Self {
        let (news, categories) = tokio::join!(source.latest_news(NEWS_LIMIT), source.categories());

        Self {
            news: news
                .inspect_err(|e| tracing::error!(error = %e, "Error fetching news"))
                .unwrap_or_default(),
            categories: categories
                .inspect_err(|e| tracing::error!(error = %e, "Error fetching categories"))
                .unwrap_or_default(),
        }
    }

    /// Navigation seeds for the category tiles, in display order.
    #[must_use]
    pub fn category_links(&self) -> Vec<(&str, NavigationSeed)> {
        self.categories
            .iter()
            .map(|c| (c.name.as_str(), NavigationSeed::category(c.id)))
            .collect()
    }
}
