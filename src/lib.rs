//! qsync - debounced query-sync controller
//!
//! Live search for storefront and admin pages: wait for typing to settle,
//! then either fetch suggestions into a dropdown or rewrite the page URL
//! (keeping every unrelated parameter) and navigate.

pub mod client;
pub mod config;
pub mod controller;
pub mod controls;
pub mod core;
pub mod debounce;
pub mod error;
pub mod page;
pub mod params;
pub mod query;
pub mod render;
pub mod strategy;
pub mod surface;
pub mod types;

// 公開API
pub use client::HttpSearchClient;
pub use config::{ControllerConfig, QsyncConfig};
pub use controller::{ControlEvent, ControlHandle, QuerySyncController};
pub use controls::UrlControl;
pub use debounce::Debouncer;
pub use error::{FetchError, QsyncError};
pub use page::{PageControls, PageElements};
pub use params::{delete_param, set_param, NavigationParams};
pub use query::{normalize, QueryState};
pub use strategy::{FullNavigation, InPageFetch, Settlement, Strategy};
pub use surface::{MemoryNavigator, MemorySurface, Navigator, SearchClient, SearchSurface};
pub use types::*;
