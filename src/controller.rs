//! Debounced query-sync controller
//!
//! One controller per search input. Input events restart the debounce timer;
//! when the input settles the configured [`Strategy`] fires.
//!
//! ```text
//! Idle --input--> Pending --input--> Pending
//!                    |--below threshold (dropdown)--> Idle
//!                    `--delay elapsed--> Settled (strategy fires) --> Idle
//! ```

use crate::config::ControllerConfig;
use crate::core::{Actor, ActorSendError, ActorSender, Message, MessageHandler};
use crate::debounce::Debouncer;
use crate::query::QueryState;
use crate::strategy::{FullNavigation, InPageFetch, Settlement, Strategy};
use crate::surface::{Navigator, SearchClient, SearchSurface};
use crate::types::{ControllerState, SearchMode};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Events into and notifications out of a controller actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlEvent {
    // Inbound
    Input(String),
    Submit,
    Clear,
    Focus,
    BlurOutside,

    // Outbound
    /// The debounce elapsed (or submit/clear fired) with this trimmed query
    Settled(String),
    /// A fetch for this query resolved and was rendered
    Resolved(String),
    Navigated(String),
}

impl ControlEvent {
    pub fn method(&self) -> &'static str {
        match self {
            ControlEvent::Input(_) => "input",
            ControlEvent::Submit => "submit",
            ControlEvent::Clear => "clear",
            ControlEvent::Focus => "focus",
            ControlEvent::BlurOutside => "blur",
            ControlEvent::Settled(_) => "settled",
            ControlEvent::Resolved(_) => "resolved",
            ControlEvent::Navigated(_) => "navigated",
        }
    }

    pub fn into_message(self) -> Message<ControlEvent> {
        Message::new(self.method(), self)
    }
}

pub struct QuerySyncController {
    config: ControllerConfig,
    surface: Arc<dyn SearchSurface>,
    strategy: Arc<Strategy>,
    debouncer: Debouncer,
    notifier: Option<ActorSender<ControlEvent>>,
}

impl QuerySyncController {
    pub fn new(
        surface: Arc<dyn SearchSurface>,
        strategy: Strategy,
        config: ControllerConfig,
    ) -> Self {
        Self {
            config,
            surface,
            strategy: Arc::new(strategy),
            debouncer: Debouncer::new(),
            notifier: None,
        }
    }

    /// Suggestion dropdown backed by `client`
    pub fn dropdown(
        surface: Arc<dyn SearchSurface>,
        client: Arc<dyn SearchClient>,
        config: ControllerConfig,
    ) -> Self {
        let strategy = Strategy::InPage(InPageFetch::new(client, surface.clone()));
        Self::new(surface, strategy, config)
    }

    /// Full-page filter navigating through `navigator`
    pub fn page_filter(
        surface: Arc<dyn SearchSurface>,
        navigator: Arc<dyn Navigator>,
        config: ControllerConfig,
    ) -> Self {
        let strategy = Strategy::Navigate(FullNavigation::new(
            navigator,
            config.param_key.clone(),
            config.page_reset,
        ));
        Self::new(surface, strategy, config)
    }

    /// Send settle notifications to `notifier` as well
    pub fn with_notifier(mut self, notifier: ActorSender<ControlEvent>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn state(&self) -> ControllerState {
        if self.debouncer.is_pending() {
            ControllerState::Pending
        } else {
            ControllerState::Idle
        }
    }

    fn query_state(&self, raw: &str) -> QueryState {
        QueryState::new(raw, self.config.min_length)
    }

    /// Handle a change of the input value.
    ///
    /// The surface is brought in line with `raw`, so a later [`submit`]
    /// sees the text that arrived with the event.
    ///
    /// [`submit`]: QuerySyncController::submit
    pub fn on_input(&mut self, raw: &str) {
        if self.surface.value() != raw {
            self.surface.set_value(raw);
        }
        let state = self.query_state(raw);

        if self.config.mode == SearchMode::Dropdown && state.search_term().is_none() {
            log::trace!("Query {:?} below threshold, hiding panel", state.trimmed_query);
            self.debouncer.cancel();
            self.strategy.clear();
            return;
        }

        log::trace!("Scheduling {:?} in {:?}", state.trimmed_query, self.config.delay());
        let action = run_strategy(self.strategy.clone(), state, self.notifier.clone());
        self.debouncer.schedule(action, self.config.delay());
    }

    /// Fire immediately with the current value (Enter key).
    pub fn submit(&mut self) {
        self.debouncer.cancel();
        let state = self.query_state(&self.surface.value());
        log::debug!("Submitting {:?}", state.trimmed_query);
        tokio::spawn(run_strategy(
            self.strategy.clone(),
            state,
            self.notifier.clone(),
        ));
    }

    /// Empty the input and drop the query.
    pub fn clear(&mut self) {
        self.debouncer.cancel();
        self.surface.set_value("");
        let settlement = self.strategy.clear();
        if let (Some(notifier), Settlement::Navigated(url)) = (&self.notifier, settlement) {
            let _ = notifier.send(ControlEvent::Navigated(url.to_string()).into_message());
        }
    }

    /// Re-show the dropdown when the input regains focus with a usable query.
    pub fn focus(&mut self) {
        if self.config.mode != SearchMode::Dropdown {
            return;
        }
        if self.query_state(&self.surface.value()).search_term().is_some() {
            self.surface.reveal_panel();
        }
    }

    /// A click landed outside the search box.
    pub fn blur_outside(&mut self) {
        if self.config.mode == SearchMode::Dropdown {
            self.surface.hide_panel();
        }
    }

    /// Run this controller as an actor. Inbound events go through the
    /// returned handle; notifications arrive on `outbound`.
    pub fn spawn(self, outbound: mpsc::UnboundedSender<Message<ControlEvent>>) -> ControlHandle {
        ControlHandle::spawn(self, outbound)
    }
}

async fn run_strategy(
    strategy: Arc<Strategy>,
    state: QueryState,
    notifier: Option<ActorSender<ControlEvent>>,
) {
    let settlement = strategy.settle(&state);
    let notify = |event: ControlEvent| {
        if let Some(notifier) = &notifier {
            let _ = notifier.send(event.into_message());
        }
    };

    notify(ControlEvent::Settled(state.trimmed_query.clone()));
    match settlement {
        Settlement::Fetching(handle) => {
            if let Err(e) = handle.await {
                log::warn!("Search task for {:?} ended abnormally: {}", state.trimmed_query, e);
            }
            notify(ControlEvent::Resolved(state.trimmed_query));
        }
        Settlement::Navigated(url) => notify(ControlEvent::Navigated(url.to_string())),
        Settlement::Hidden => {}
    }
}

#[async_trait]
impl MessageHandler<ControlEvent> for QuerySyncController {
    async fn on_message(&mut self, message: Message<ControlEvent>, sender: &ActorSender<ControlEvent>) {
        if self.notifier.is_none() {
            self.notifier = Some(sender.clone());
        }

        match message.payload {
            ControlEvent::Input(text) => self.on_input(&text),
            ControlEvent::Submit => self.submit(),
            ControlEvent::Clear => self.clear(),
            ControlEvent::Focus => self.focus(),
            ControlEvent::BlurOutside => self.blur_outside(),
            other => log::warn!("Ignoring outbound event sent to controller: {:?}", other),
        }
    }
}

/// Inbound side of a running controller actor.
pub struct ControlHandle {
    inbound: ActorSender<ControlEvent>,
    actor: Actor<ControlEvent, QuerySyncController>,
}

impl ControlHandle {
    pub fn spawn(
        controller: QuerySyncController,
        outbound: mpsc::UnboundedSender<Message<ControlEvent>>,
    ) -> Self {
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        let actor = Actor::new(inbound_rx, outbound, controller);
        Self {
            inbound: ActorSender::new(inbound_tx),
            actor,
        }
    }

    pub fn send(&self, event: ControlEvent) -> Result<(), ActorSendError> {
        self.inbound.send(event.into_message())
    }

    pub fn input(&self, text: impl Into<String>) -> Result<(), ActorSendError> {
        self.send(ControlEvent::Input(text.into()))
    }

    pub fn submit(&self) -> Result<(), ActorSendError> {
        self.send(ControlEvent::Submit)
    }

    pub fn clear(&self) -> Result<(), ActorSendError> {
        self.send(ControlEvent::Clear)
    }

    pub fn focus(&self) -> Result<(), ActorSendError> {
        self.send(ControlEvent::Focus)
    }

    pub fn blur_outside(&self) -> Result<(), ActorSendError> {
        self.send(ControlEvent::BlurOutside)
    }

    pub fn shutdown(&mut self) {
        self.actor.shutdown();
    }
}
