//! Page-level wiring
//!
//! Pages differ in which controls they carry. [`PageControls::init`] starts a
//! controller for every search input that is present and skips the rest, so
//! a missing element never stops the other controls from coming up.

use crate::config::{ControllerConfig, QsyncConfig};
use crate::controller::{ControlEvent, ControlHandle, QuerySyncController};
use crate::controls::{self, UrlControl};
use crate::core::Message;
use crate::surface::{Navigator, SearchClient, SearchSurface};
use crate::types::SearchMode;
use std::sync::Arc;
use tokio::sync::mpsc;
use url::Url;

/// Elements found on the current page.
#[derive(Default)]
pub struct PageElements {
    pub navbar_search: Option<Arc<dyn SearchSurface>>,
    pub page_search: Option<Arc<dyn SearchSurface>>,
}

pub struct PageControls {
    navbar: Option<ControlHandle>,
    search: Option<ControlHandle>,
    navigator: Arc<dyn Navigator>,
}

impl PageControls {
    /// Start a controller for each search input on the page.
    ///
    /// Notifications from every controller are delivered on `outbound`.
    /// Must be called from within a tokio runtime.
    pub fn init(
        elements: PageElements,
        navigator: Arc<dyn Navigator>,
        client: Option<Arc<dyn SearchClient>>,
        config: &QsyncConfig,
        outbound: mpsc::UnboundedSender<Message<ControlEvent>>,
    ) -> Self {
        let navbar = match elements.navbar_search {
            Some(surface) => {
                log::debug!("Initializing navbar search");
                build(surface, &navigator, client.clone(), config.navbar.clone())
                    .map(|controller| controller.spawn(outbound.clone()))
            }
            None => {
                log::debug!("No navbar search on this page");
                None
            }
        };

        let search = match elements.page_search {
            Some(surface) => {
                log::debug!("Initializing page search");
                build(surface, &navigator, client, config.search.clone())
                    .map(|controller| controller.spawn(outbound.clone()))
            }
            None => {
                log::debug!("No page search on this page");
                None
            }
        };

        Self {
            navbar,
            search,
            navigator,
        }
    }

    pub fn navbar(&self) -> Option<&ControlHandle> {
        self.navbar.as_ref()
    }

    pub fn search(&self) -> Option<&ControlHandle> {
        self.search.as_ref()
    }

    /// Apply a select/pill change and navigate.
    pub fn change(&self, control: &UrlControl, value: &str) -> Url {
        let target = control.apply(&self.navigator.location(), value);
        log::info!("{} changed, navigating to {}", control.key(), target);
        self.navigator.navigate(target.clone());
        target
    }

    pub fn clear_search(&self) -> Url {
        let target = controls::clear_search(&self.navigator.location());
        self.navigator.navigate(target.clone());
        target
    }

    pub fn shutdown(&mut self) {
        for handle in [self.navbar.as_mut(), self.search.as_mut()].into_iter().flatten() {
            handle.shutdown();
        }
    }
}

fn build(
    surface: Arc<dyn SearchSurface>,
    navigator: &Arc<dyn Navigator>,
    client: Option<Arc<dyn SearchClient>>,
    config: ControllerConfig,
) -> Option<QuerySyncController> {
    match config.mode {
        SearchMode::Dropdown => match client {
            Some(client) => Some(QuerySyncController::dropdown(surface, client, config)),
            None => {
                log::warn!("Dropdown search present but no search client configured, skipping");
                None
            }
        },
        SearchMode::PageFilter => Some(QuerySyncController::page_filter(
            surface,
            navigator.clone(),
            config,
        )),
    }
}
