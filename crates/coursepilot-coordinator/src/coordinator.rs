//! The coordinator: message routing and page initialization.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use coursepilot_protocols::{
    Feature, IncomingMessage, PageEvent, PageRequest, PageResponse, SessionState, parse_incoming,
};
use coursepilot_runloop::{
    LessonSnapshotProvider, NavigationActuator, retry_with_delay,
};
use coursepilot_settings::{SettingsHandle, keys};

use crate::bus::{CoordinatorBus, FeatureToggle};
use crate::error::CoordinatorError;
use crate::init_tracker::{InitDecision, InitTracker};
use crate::single_flight::SingleFlight;

#[cfg(test)]
#[path = "coordinator_tests.rs"]
mod tests;

/// Coordinator configuration.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    /// Extraction attempts when answering `getLessons`.
    pub extract_attempts: u32,
    /// Delay between those attempts.
    pub extract_retry_delay: Duration,
    /// Per-page initialization cooldown.
    pub init_cooldown: Duration,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            extract_attempts: 2,
            extract_retry_delay: Duration::from_millis(1000),
            init_cooldown: Duration::from_secs(5),
        }
    }
}

/// Outcome of a guarded page initialization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageInitResult {
    /// Initialization ran (or was joined mid-flight) and finished.
    Completed { auto_learn: bool },
    /// A recent attempt is still inside the cooldown window; nothing ran.
    Throttled,
    /// Initialization ran and failed.
    Failed(String),
}

/// Relays commands and snapshots between the popup, the background process,
/// and page instances, answering every message with structured data.
pub struct Coordinator {
    config: CoordinatorConfig,
    provider: Arc<dyn LessonSnapshotProvider>,
    actuator: Arc<dyn NavigationActuator>,
    settings: SettingsHandle,
    bus: CoordinatorBus,
    init_tracker: InitTracker,
    boots: DashMap<String, Arc<SingleFlight<Result<bool, String>>>>,
}

impl Coordinator {
    pub fn new(
        provider: Arc<dyn LessonSnapshotProvider>,
        actuator: Arc<dyn NavigationActuator>,
        settings: SettingsHandle,
    ) -> Self {
        Self::with_config(CoordinatorConfig::default(), provider, actuator, settings)
    }

    pub fn with_config(
        config: CoordinatorConfig,
        provider: Arc<dyn LessonSnapshotProvider>,
        actuator: Arc<dyn NavigationActuator>,
        settings: SettingsHandle,
    ) -> Self {
        let init_tracker = InitTracker::new(config.init_cooldown);
        Self {
            config,
            provider,
            actuator,
            settings,
            bus: CoordinatorBus::default(),
            init_tracker,
            boots: DashMap::new(),
        }
    }

    /// The toggle/snapshot channels.
    pub fn bus(&self) -> &CoordinatorBus {
        &self.bus
    }

    pub fn init_tracker(&self) -> &InitTracker {
        &self.init_tracker
    }

    /// Persisted flags for session resumption at page startup.
    pub async fn initial_state(&self) -> Result<SessionState, CoordinatorError> {
        Ok(SessionState {
            auto_learn: self.settings.get_or(keys::AUTO_LEARN, false).await?,
            background_browser: self
                .settings
                .get_or(keys::BACKGROUND_BROWSER, false)
                .await?,
        })
    }

    /// Route one raw bus message from a page or popup.
    ///
    /// Always produces a response value; parse failures and unknown actions
    /// come back as `{success: false, error}`.
    pub async fn handle_message(&self, page_id: &str, raw: Value) -> Value {
        let message = match parse_incoming(raw) {
            Ok(message) => message,
            Err(err) => {
                warn!(page_id, error = %err, "rejecting bus message");
                return response_value(err.to_response());
            }
        };

        let response = match message {
            IncomingMessage::Request(request) => self.handle_request(page_id, request).await,
            IncomingMessage::Event(event) => self.handle_event(page_id, event).await,
        };
        response_value(response)
    }

    async fn handle_request(&self, page_id: &str, request: PageRequest) -> PageResponse {
        debug!(page_id, action = request.action(), "handling request");
        match request {
            PageRequest::GetLessons => self.get_lessons().await,
            PageRequest::ClickLesson { lesson } => match self.actuator.navigate(&lesson).await {
                Ok(success) => PageResponse::Ack { success },
                Err(err) => PageResponse::failure(format!("Lesson click failed: {err}")),
            },
            PageRequest::UpdateState { feature, enabled } => {
                self.update_feature(feature, enabled).await
            }
            PageRequest::InitializeState { state } => {
                self.bus.publish_toggle(FeatureToggle {
                    feature: Feature::AutoLearn,
                    enabled: state.auto_learn,
                });
                self.bus.publish_toggle(FeatureToggle {
                    feature: Feature::BackgroundBrowser,
                    enabled: state.background_browser,
                });
                PageResponse::ok()
            }
            PageRequest::KeepAlive => PageResponse::alive(),
        }
    }

    async fn handle_event(&self, page_id: &str, event: PageEvent) -> PageResponse {
        match event {
            PageEvent::ContentChanged { lessons } => {
                debug!(page_id, count = lessons.len(), "relaying lesson snapshot");
                self.bus.publish_snapshot(lessons);
                PageResponse::ok()
            }
            PageEvent::ContentScriptReady => {
                debug!(page_id, "content script ready");
                PageResponse::ok()
            }
            PageEvent::ContentScriptInitialized => {
                self.init_tracker.complete(page_id);
                PageResponse::ok()
            }
        }
    }

    async fn get_lessons(&self) -> PageResponse {
        let provider = self.provider.clone();
        let result = retry_with_delay(
            self.config.extract_attempts,
            self.config.extract_retry_delay,
            move |_| {
                let provider = provider.clone();
                async move {
                    let lessons = provider.extract().await?;
                    if lessons.is_empty() {
                        Err(coursepilot_runloop::ControllerError::Extraction(
                            "no lessons on this page".to_string(),
                        ))
                    } else {
                        Ok(lessons)
                    }
                }
            },
        )
        .await;

        match result {
            Ok(lessons) => PageResponse::lessons(lessons),
            Err(err) => PageResponse::failure(format!("Lesson extraction failed: {err}")),
        }
    }

    async fn update_feature(&self, feature: Feature, enabled: bool) -> PageResponse {
        if let Err(err) = self.settings.set(feature.key(), &enabled).await {
            return PageResponse::failure(format!("Could not persist {feature}: {err}"));
        }
        let delivered = self.bus.publish_toggle(FeatureToggle { feature, enabled });
        info!(%feature, enabled, delivered, "feature toggled");
        PageResponse::ok()
    }

    /// Run page initialization at most once concurrently per page.
    ///
    /// A caller that arrives while another initialization of the same page
    /// is in flight joins that run; one that arrives inside the cooldown
    /// window after a finished run is throttled.
    pub async fn initialize_page<F, Fut>(&self, page_id: &str, boot: F) -> PageInitResult
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<bool, String>> + Send + 'static,
    {
        match self.init_tracker.begin(page_id) {
            InitDecision::CoolingDown => return PageInitResult::Throttled,
            InitDecision::Proceed | InitDecision::AlreadyInFlight => {}
        }

        let flight = self
            .boots
            .entry(page_id.to_string())
            .or_insert_with(|| Arc::new(SingleFlight::new()))
            .clone();

        let result = flight.run(boot).await;
        self.init_tracker.complete(page_id);

        match result {
            Ok(auto_learn) => PageInitResult::Completed { auto_learn },
            Err(message) => PageInitResult::Failed(message),
        }
    }

    /// Drop all per-page bookkeeping (tab closed or navigated away).
    pub fn forget_page(&self, page_id: &str) {
        self.init_tracker.forget(page_id);
        self.boots.remove(page_id);
    }
}

fn response_value(response: PageResponse) -> Value {
    serde_json::to_value(&response).unwrap_or_else(|_| {
        json!({"success": false, "error": "response serialization failed"})
    })
}
