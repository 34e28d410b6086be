//! Capability interfaces the controller talks to instead of a document.
//!
//! A host page provides a [`SearchSurface`] per search input, a [`Navigator`]
//! for the current location and, for dropdown search, a [`SearchClient`].
//! The in-memory implementations back the CLI and the tests.

use crate::error::FetchError;
use crate::types::SearchResponse;
use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard};
use url::Url;

/// A search input together with its (optional) results panel.
#[cfg_attr(test, mockall::automock)]
pub trait SearchSurface: Send + Sync {
    /// Current value of the input
    fn value(&self) -> String;

    fn set_value(&self, value: &str);

    /// Replace the panel content and make it visible
    fn show_panel(&self, html: &str);

    /// Make the panel visible without touching its content
    fn reveal_panel(&self);

    fn hide_panel(&self);
}

/// Access to the page location. Navigation is a full page load.
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    fn location(&self) -> Url;

    fn navigate(&self, url: Url);
}

/// Backend answering in-page search requests.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchClient: Send + Sync {
    async fn search(&self, query: &str) -> Result<SearchResponse, FetchError>;
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Debug, Default)]
struct SurfaceState {
    value: String,
    panel: String,
    visible: bool,
    renders: Vec<String>,
}

/// Search surface kept in memory; records every panel render.
#[derive(Debug, Default)]
pub struct MemorySurface {
    state: Mutex<SurfaceState>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: &str) -> Self {
        let surface = Self::default();
        surface.set_value(value);
        surface
    }

    /// Panel content, if the panel is currently visible
    pub fn panel(&self) -> Option<String> {
        let state = lock(&self.state);
        state.visible.then(|| state.panel.clone())
    }

    pub fn is_panel_visible(&self) -> bool {
        lock(&self.state).visible
    }

    /// Every html fragment passed to `show_panel`, oldest first
    pub fn renders(&self) -> Vec<String> {
        lock(&self.state).renders.clone()
    }
}

impl SearchSurface for MemorySurface {
    fn value(&self) -> String {
        lock(&self.state).value.clone()
    }

    fn set_value(&self, value: &str) {
        lock(&self.state).value = value.to_string();
    }

    fn show_panel(&self, html: &str) {
        let mut state = lock(&self.state);
        state.panel = html.to_string();
        state.visible = true;
        state.renders.push(html.to_string());
    }

    fn reveal_panel(&self) {
        lock(&self.state).visible = true;
    }

    fn hide_panel(&self) {
        lock(&self.state).visible = false;
    }
}

#[derive(Debug)]
struct NavigatorState {
    location: Url,
    history: Vec<Url>,
}

/// Navigator that moves an in-memory location and keeps the history.
#[derive(Debug)]
pub struct MemoryNavigator {
    state: Mutex<NavigatorState>,
}

impl MemoryNavigator {
    pub fn new(location: Url) -> Self {
        Self {
            state: Mutex::new(NavigatorState {
                location,
                history: Vec::new(),
            }),
        }
    }

    /// Every url navigated to, oldest first
    pub fn history(&self) -> Vec<Url> {
        lock(&self.state).history.clone()
    }
}

impl Navigator for MemoryNavigator {
    fn location(&self) -> Url {
        lock(&self.state).location.clone()
    }

    fn navigate(&self, url: Url) {
        let mut state = lock(&self.state);
        state.history.push(url.clone());
        state.location = url;
    }
}
