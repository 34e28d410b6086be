//! Result channels
//!
//! What a settled query turns into: an in-page fetch rendered into the
//! results panel, or a full navigation to a rewritten URL. A page picks one
//! per search input.

use crate::params::NavigationParams;
use crate::query::QueryState;
use crate::render;
use crate::surface::{Navigator, SearchClient, SearchSurface};
use crate::types::PageReset;
use std::sync::Arc;
use tokio::task::JoinHandle;
use url::Url;

/// Outcome of firing a strategy for a settled query.
#[derive(Debug)]
pub enum Settlement {
    /// A request is in flight; the handle resolves once its response is rendered
    Fetching(JoinHandle<()>),
    /// The browser was sent to this URL
    Navigated(Url),
    /// Nothing to do (query below threshold); the panel was hidden
    Hidden,
}

/// Fetch JSON results and render them into the panel.
///
/// Responses are rendered in the order they resolve, not the order they were
/// requested: a slow response for an older query overwrites a newer one.
#[derive(Clone)]
pub struct InPageFetch {
    client: Arc<dyn SearchClient>,
    surface: Arc<dyn SearchSurface>,
}

impl InPageFetch {
    pub fn new(client: Arc<dyn SearchClient>, surface: Arc<dyn SearchSurface>) -> Self {
        Self { client, surface }
    }

    /// Show the loading placeholder now and spawn the request for `query`.
    pub fn fire(&self, query: &str) -> JoinHandle<()> {
        self.surface.show_panel(render::LOADING_HTML);

        let client = self.client.clone();
        let surface = self.surface.clone();
        let query = query.to_string();
        tokio::spawn(async move {
            match client.search(&query).await {
                Ok(response) => {
                    log::debug!(
                        "Rendering {} results for {:?}",
                        response.results.len(),
                        query
                    );
                    surface.show_panel(&render::results(&response));
                }
                Err(e) => {
                    log::warn!("Search for {:?} failed: {}", query, e);
                    surface.show_panel(render::UNAVAILABLE_HTML);
                }
            }
        })
    }

    pub fn hide(&self) {
        self.surface.hide_panel();
    }
}

/// Rewrite one query parameter of the current location and navigate.
#[derive(Clone)]
pub struct FullNavigation {
    navigator: Arc<dyn Navigator>,
    key: String,
    page_reset: PageReset,
}

impl FullNavigation {
    pub fn new(navigator: Arc<dyn Navigator>, key: impl Into<String>, page_reset: PageReset) -> Self {
        Self {
            navigator,
            key: key.into(),
            page_reset,
        }
    }

    /// URL the page should load for `state`, without navigating.
    pub fn target(&self, state: &QueryState) -> Url {
        let location = self.navigator.location();
        let mut params = NavigationParams::from_url(&location);
        match state.search_term() {
            Some(term) => params.set(&self.key, term),
            None => {
                params.delete(&self.key);
            }
        }
        params.reset_page(self.page_reset);
        params.to_url(&location)
    }

    pub fn fire(&self, state: &QueryState) -> Url {
        let url = self.target(state);
        log::info!("Navigating to {}", url);
        self.navigator.navigate(url.clone());
        url
    }
}

#[derive(Clone)]
pub enum Strategy {
    InPage(InPageFetch),
    Navigate(FullNavigation),
}

impl Strategy {
    /// Act on a settled query.
    pub fn settle(&self, state: &QueryState) -> Settlement {
        match self {
            Strategy::InPage(fetch) => match state.search_term() {
                Some(term) => Settlement::Fetching(fetch.fire(term)),
                None => {
                    fetch.hide();
                    Settlement::Hidden
                }
            },
            Strategy::Navigate(navigation) => Settlement::Navigated(navigation.fire(state)),
        }
    }

    /// Act on a cleared input: hide the panel, or navigate without the query.
    pub fn clear(&self) -> Settlement {
        match self {
            Strategy::InPage(fetch) => {
                fetch.hide();
                Settlement::Hidden
            }
            Strategy::Navigate(navigation) => {
                Settlement::Navigated(navigation.fire(&QueryState::new("", 0)))
            }
        }
    }
}
