//! Controller configuration
//!
//! Defaults follow the two page families: the navbar dropdown settles after
//! 400ms and needs two characters, page filters settle after 500ms and act
//! on any input, including an empty one.

use crate::client::DEFAULT_SEARCH_PATH;
use crate::error::QsyncError;
use crate::params::SEARCH_KEY;
use crate::types::{PageReset, SearchMode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub mode: SearchMode,
    pub delay_ms: u64,
    pub min_length: usize,
    /// Query parameter written by page-filter navigation
    pub param_key: String,
    pub page_reset: PageReset,
}

impl ControllerConfig {
    pub fn dropdown() -> Self {
        Self {
            mode: SearchMode::Dropdown,
            delay_ms: 400,
            min_length: SearchMode::Dropdown.default_min_length(),
            param_key: SEARCH_KEY.to_string(),
            page_reset: PageReset::Remove,
        }
    }

    /// Storefront products page: `page` is dropped on every search
    pub fn page_filter() -> Self {
        Self {
            mode: SearchMode::PageFilter,
            delay_ms: 500,
            min_length: SearchMode::PageFilter.default_min_length(),
            param_key: SEARCH_KEY.to_string(),
            page_reset: PageReset::Remove,
        }
    }

    /// Admin table view: `page` is pinned to 1 on every search
    pub fn table_view() -> Self {
        Self {
            page_reset: PageReset::First,
            ..Self::page_filter()
        }
    }

    pub fn for_mode(mode: SearchMode) -> Self {
        match mode {
            SearchMode::Dropdown => Self::dropdown(),
            SearchMode::PageFilter => Self::page_filter(),
        }
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self::page_filter()
    }
}

/// Settings for every control on a page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QsyncConfig {
    pub navbar: ControllerConfig,
    pub search: ControllerConfig,
    /// Path of the JSON search endpoint, relative to the site root
    pub search_path: String,
}

impl Default for QsyncConfig {
    fn default() -> Self {
        Self {
            navbar: ControllerConfig::dropdown(),
            search: ControllerConfig::page_filter(),
            search_path: DEFAULT_SEARCH_PATH.to_string(),
        }
    }
}

impl QsyncConfig {
    /// Load from a JSON file; missing fields keep their defaults.
    ///
    /// The file is layered over the serialized defaults so that a partial
    /// `navbar` section keeps the dropdown values rather than the page-filter
    /// ones a field-level default would give it.
    pub fn load(path: &Path) -> Result<Self, QsyncError> {
        let parse_error = |source: serde_json::Error| QsyncError::ConfigParse {
            path: path.to_path_buf(),
            source,
        };

        let content = std::fs::read_to_string(path).map_err(|source| QsyncError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let overrides: Value = serde_json::from_str(&content).map_err(parse_error)?;
        let mut merged = serde_json::to_value(Self::default()).map_err(parse_error)?;
        merge(&mut merged, overrides);

        let config = serde_json::from_value(merged).map_err(parse_error)?;
        log::debug!("Loaded config from {:?}", path);
        Ok(config)
    }
}

fn merge(base: &mut Value, overrides: Value) {
    match (base, overrides) {
        (Value::Object(base), Value::Object(overrides)) => {
            for (key, value) in overrides {
                match base.get_mut(&key) {
                    Some(existing) => merge(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overrides) => *base = overrides,
    }
}
