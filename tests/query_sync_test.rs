//! End-to-end behaviour of the query-sync controller under a paused clock.

use async_trait::async_trait;
use qsync::{
    ControllerConfig, ControllerState, FetchError, MemoryNavigator, MemorySurface, Navigator,
    PageReset, Price, ProductHit, QuerySyncController, SearchClient, SearchResponse, SearchSurface,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;
use url::Url;

/// Search backend with a fixed latency per query; records every request.
#[derive(Default)]
struct FakeClient {
    latency: HashMap<String, Duration>,
    failing: Vec<String>,
    requests: Mutex<Vec<String>>,
}

impl FakeClient {
    fn with_latency(mut self, query: &str, latency: Duration) -> Self {
        self.latency.insert(query.to_string(), latency);
        self
    }

    fn failing(mut self, query: &str) -> Self {
        self.failing.push(query.to_string());
        self
    }

    fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SearchClient for FakeClient {
    async fn search(&self, query: &str) -> Result<SearchResponse, FetchError> {
        self.requests.lock().unwrap().push(query.to_string());
        let latency = self
            .latency
            .get(query)
            .copied()
            .unwrap_or(Duration::from_millis(10));
        sleep(latency).await;

        if self.failing.iter().any(|q| q == query) {
            return Err(FetchError::Unavailable("boom".to_string()));
        }
        Ok(SearchResponse {
            query: query.to_string(),
            results: vec![ProductHit {
                name: format!("[{}]", query),
                description: String::new(),
                price: Price::Text("1.00".to_string()),
                currency_symbol: "$".to_string(),
                category: None,
                image_url: None,
                product_url: "/p/1/".to_string(),
            }],
        })
    }
}

fn page_filter(
    location: &str,
    config: ControllerConfig,
) -> (QuerySyncController, Arc<MemoryNavigator>) {
    let surface = Arc::new(MemorySurface::new());
    let navigator = Arc::new(MemoryNavigator::new(Url::parse(location).unwrap()));
    let controller = QuerySyncController::page_filter(surface, navigator.clone(), config);
    (controller, navigator)
}

fn dropdown(client: Arc<FakeClient>) -> (QuerySyncController, Arc<MemorySurface>) {
    let surface = Arc::new(MemorySurface::new());
    let controller =
        QuerySyncController::dropdown(surface.clone(), client, ControllerConfig::dropdown());
    (controller, surface)
}

#[tokio::test(start_paused = true)]
async fn test_only_last_keystroke_in_window_fires() {
    let (mut controller, navigator) = page_filter(
        "https://shop.test/products/",
        ControllerConfig::page_filter(),
    );

    controller.on_input("a");
    sleep(Duration::from_millis(40)).await;
    controller.on_input("ab");
    sleep(Duration::from_millis(40)).await;
    controller.on_input("abc");

    sleep(Duration::from_millis(499)).await;
    assert!(navigator.history().is_empty());
    assert_eq!(controller.state(), ControllerState::Pending);

    sleep(Duration::from_millis(100)).await;
    let history = navigator.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].query(), Some("search=abc"));
    assert_eq!(controller.state(), ControllerState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_clearing_input_removes_search_param() {
    let (mut controller, navigator) = page_filter(
        "https://shop.test/products/?search=lamp&rows=20",
        ControllerConfig::page_filter(),
    );

    controller.on_input("   ");
    sleep(Duration::from_millis(600)).await;

    let location = navigator.location();
    assert_eq!(location.query(), Some("rows=20"));
    assert!(!location.as_str().contains("search="));
}

#[tokio::test(start_paused = true)]
async fn test_search_resets_page() {
    let (mut controller, navigator) = page_filter(
        "https://shop.test/products/?page=5&rows=20&search=x",
        ControllerConfig::page_filter(),
    );

    controller.on_input("y");
    sleep(Duration::from_millis(600)).await;
    assert_eq!(navigator.location().query(), Some("rows=20&search=y"));

    let (mut controller, navigator) = page_filter(
        "https://shop.test/admin/?page=5&rows=20&search=x",
        ControllerConfig::table_view(),
    );

    controller.on_input("y");
    sleep(Duration::from_millis(600)).await;
    assert_eq!(navigator.location().query(), Some("page=1&rows=20&search=y"));
}

#[tokio::test(start_paused = true)]
async fn test_unrelated_params_survive_byte_for_byte() {
    let start = "https://shop.test/products/?rows=20&sort_by=-price&category=home%20%26%20garden&currency=EUR&search=old";
    let (mut controller, navigator) = page_filter(start, ControllerConfig::page_filter());

    controller.on_input("desk lamp");
    sleep(Duration::from_millis(600)).await;

    assert_eq!(
        navigator.location().query(),
        Some("rows=20&sort_by=-price&category=home%20%26%20garden&currency=EUR&search=desk+lamp")
    );
}

#[tokio::test(start_paused = true)]
async fn test_page_reset_keep_leaves_page_alone() {
    let config = ControllerConfig {
        page_reset: PageReset::Keep,
        ..ControllerConfig::page_filter()
    };
    let (mut controller, navigator) = page_filter("https://shop.test/products/?page=3", config);

    controller.on_input("mug");
    sleep(Duration::from_millis(600)).await;
    assert_eq!(navigator.location().query(), Some("page=3&search=mug"));
}

#[tokio::test(start_paused = true)]
async fn test_dropdown_threshold() {
    let client = Arc::new(FakeClient::default());
    let (mut controller, surface) = dropdown(client.clone());

    controller.on_input("a");
    assert_eq!(controller.state(), ControllerState::Idle);
    sleep(Duration::from_millis(1000)).await;
    assert!(client.requests().is_empty());
    assert!(!surface.is_panel_visible());

    controller.on_input("ab");
    sleep(Duration::from_millis(1000)).await;
    assert_eq!(client.requests(), vec!["ab".to_string()]);
    assert!(surface.panel().unwrap().contains("[ab]"));
}

#[tokio::test(start_paused = true)]
async fn test_shrinking_below_threshold_cancels_pending_fetch() {
    let client = Arc::new(FakeClient::default());
    let (mut controller, surface) = dropdown(client.clone());

    controller.on_input("ab");
    sleep(Duration::from_millis(100)).await;
    controller.on_input("a");

    sleep(Duration::from_millis(1000)).await;
    assert!(client.requests().is_empty());
    assert!(!surface.is_panel_visible());
}

#[tokio::test(start_paused = true)]
async fn test_loading_placeholder_shown_on_settle() {
    let client = Arc::new(FakeClient::default().with_latency("lamp", Duration::from_millis(300)));
    let (mut controller, surface) = dropdown(client.clone());

    controller.on_input("lamp");
    sleep(Duration::from_millis(450)).await;
    assert!(surface.panel().unwrap().contains("Searching..."));

    sleep(Duration::from_millis(300)).await;
    let panel = surface.panel().unwrap();
    assert!(panel.contains("[lamp]"));
    assert!(!panel.contains("Searching..."));
}

#[tokio::test(start_paused = true)]
async fn test_stale_response_wins_when_it_resolves_last() {
    let client = Arc::new(
        FakeClient::default()
            .with_latency("ab", Duration::from_millis(1000))
            .with_latency("abc", Duration::from_millis(10)),
    );
    let (mut controller, surface) = dropdown(client.clone());

    // "ab" settles at 400ms and resolves at 1400ms
    controller.on_input("ab");
    sleep(Duration::from_millis(450)).await;
    // "abc" settles at 850ms and resolves at 860ms
    controller.on_input("abc");
    sleep(Duration::from_millis(420)).await;
    assert!(surface.panel().unwrap().contains("[abc]"));

    sleep(Duration::from_millis(1000)).await;
    assert_eq!(client.requests(), vec!["ab".to_string(), "abc".to_string()]);
    let panel = surface.panel().unwrap();
    assert!(panel.contains("[ab]"));
    assert!(!panel.contains("[abc]"));
}

#[tokio::test(start_paused = true)]
async fn test_fetch_failure_renders_inline_error() {
    let client = Arc::new(FakeClient::default().failing("lamp"));
    let (mut controller, surface) = dropdown(client);

    controller.on_input("lamp");
    sleep(Duration::from_millis(1000)).await;
    assert!(surface
        .panel()
        .unwrap()
        .contains("Search temporarily unavailable"));
}

#[tokio::test(start_paused = true)]
async fn test_focus_and_blur_toggle_panel() {
    let client = Arc::new(FakeClient::default());
    let (mut controller, surface) = dropdown(client.clone());

    surface.set_value("ab");
    controller.on_input("ab");
    sleep(Duration::from_millis(1000)).await;

    controller.blur_outside();
    assert!(!surface.is_panel_visible());

    controller.focus();
    assert!(surface.panel().unwrap().contains("[ab]"));
    assert_eq!(client.requests().len(), 1);

    surface.set_value("a");
    controller.blur_outside();
    controller.focus();
    assert!(!surface.is_panel_visible());
}
