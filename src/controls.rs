//! Non-search URL controls
//!
//! Selects and pills that rewrite a single query parameter and reload the
//! page: sort order, rows per page, currency and category. Each one touches
//! its own key and, where the listing changes, resets pagination.

use crate::params::{NavigationParams, SEARCH_KEY};
use crate::types::PageReset;
use url::Url;

pub const SORT_KEY: &str = "sort";
pub const SORT_BY_KEY: &str = "sort_by";
pub const ROWS_KEY: &str = "rows";
pub const CURRENCY_KEY: &str = "currency";
pub const CATEGORY_KEY: &str = "category";

/// Category value meaning "no category filter"
pub const ALL_CATEGORIES: &str = "all";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlControl {
    Sort {
        key: &'static str,
        page_reset: PageReset,
    },
    Rows,
    Currency,
    Category,
}

impl UrlControl {
    /// Storefront sort select: `sort`, pagination dropped
    pub fn storefront_sort() -> Self {
        UrlControl::Sort {
            key: SORT_KEY,
            page_reset: PageReset::Remove,
        }
    }

    /// Admin table sort select: `sort_by`, back to page 1
    pub fn admin_sort() -> Self {
        UrlControl::Sort {
            key: SORT_BY_KEY,
            page_reset: PageReset::First,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            UrlControl::Sort { key, .. } => *key,
            UrlControl::Rows => ROWS_KEY,
            UrlControl::Currency => CURRENCY_KEY,
            UrlControl::Category => CATEGORY_KEY,
        }
    }

    pub fn page_reset(&self) -> PageReset {
        match self {
            UrlControl::Sort { page_reset, .. } => *page_reset,
            UrlControl::Rows => PageReset::Remove,
            UrlControl::Currency => PageReset::Keep,
            UrlControl::Category => PageReset::Remove,
        }
    }

    fn clears_with(&self, value: &str) -> bool {
        match self {
            UrlControl::Category => value.is_empty() || value == ALL_CATEGORIES,
            _ => false,
        }
    }

    /// URL after this control changes to `value`
    pub fn apply(&self, url: &Url, value: &str) -> Url {
        let mut params = NavigationParams::from_url(url);
        if self.clears_with(value) {
            params.delete(self.key());
        } else {
            params.set(self.key(), value);
        }
        params.reset_page(self.page_reset());
        params.to_url(url)
    }
}

/// Drop the search term and pagination (clear-search button)
pub fn clear_search(url: &Url) -> Url {
    let mut params = NavigationParams::from_url(url);
    params.delete(SEARCH_KEY);
    params.reset_page(PageReset::Remove);
    params.to_url(url)
}

/// Admin dashboard: both selects are written together, pagination untouched
pub fn dashboard_view(url: &Url, sort_by: &str, rows: &str) -> Url {
    let mut params = NavigationParams::from_url(url);
    params.set(SORT_BY_KEY, sort_by);
    params.set(ROWS_KEY, rows);
    params.to_url(url)
}

/// Category pill that should be marked active for `url`
pub fn active_category(url: &Url) -> String {
    NavigationParams::from_url(url)
        .get(CATEGORY_KEY)
        .filter(|category| !category.is_empty())
        .unwrap_or(ALL_CATEGORIES)
        .to_string()
}
