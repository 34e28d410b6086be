use serde::{Deserialize, Serialize};
use std::fmt;

/// Which result channel a search input drives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// Suggestion dropdown: fetch JSON results into a panel
    Dropdown,
    /// Full-page filter: rewrite the URL and navigate
    PageFilter,
}

impl SearchMode {
    /// Shortest trimmed query that counts as a query in this mode
    pub fn default_min_length(self) -> usize {
        match self {
            SearchMode::Dropdown => 2,
            SearchMode::PageFilter => 0,
        }
    }
}

/// What happens to the `page` parameter when a filter changes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum PageReset {
    /// Drop `page` entirely (storefront pages)
    #[default]
    Remove,
    /// Set `page=1` (admin table views)
    First,
    /// Leave `page` alone (currency switch)
    Keep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    Idle,
    Pending,
}

/// Body of `GET /search/ajax/?q=<query>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    #[serde(default)]
    pub results: Vec<ProductHit>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductHit {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default)]
    pub currency_symbol: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub product_url: String,
}

/// Prices arrive as decimal strings from the backend, but plain numbers are accepted too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Text(String),
    Number(f64),
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Price::Text(text) => write!(f, "{}", text),
            Price::Number(value) => write!(f, "{:.2}", value),
        }
    }
}
