//! The auto-learn controller.
//!
//! Owns the enable/disable lifecycle and the poll loop, and translates
//! engine decisions into page side effects. All collaborators are injected;
//! there are no process-wide singletons and no state outlives `dispose`.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};
use std::time::Instant;

use tokio::sync::{Mutex, broadcast};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use coursepilot_core::{Action, ProgressionEngine, ProgressionState};
use coursepilot_protocols::LessonRecord;
use coursepilot_settings::{SettingsHandle, keys};

use crate::config::AutoLearnConfig;
use crate::error::{ControllerError, ControllerResult};
use crate::events::{ControllerEvent, StopReason};
use crate::metrics::ControllerMetrics;
use crate::retry::retry_with_delay;
use crate::traits::{LessonSnapshotProvider, NavigationActuator, PlaybackDriver};

#[cfg(test)]
#[path = "controller_tests.rs"]
mod tests;

const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Controller lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ControllerState {
    /// Constructed or disabled; no loop task running.
    Idle = 0,
    /// Poll loop active.
    Running = 1,
    /// Loop paused after exhausting the error budget; resumes by itself.
    CoolingDown = 2,
    /// Disable in progress; waiting for a mid-flight tick.
    Stopping = 3,
    /// Permanently torn down.
    Disposed = 4,
}

impl From<u8> for ControllerState {
    fn from(v: u8) -> Self {
        match v {
            1 => ControllerState::Running,
            2 => ControllerState::CoolingDown,
            3 => ControllerState::Stopping,
            4 => ControllerState::Disposed,
            _ => ControllerState::Idle,
        }
    }
}

impl std::fmt::Display for ControllerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ControllerState::Idle => write!(f, "idle"),
            ControllerState::Running => write!(f, "running"),
            ControllerState::CoolingDown => write!(f, "cooling_down"),
            ControllerState::Stopping => write!(f, "stopping"),
            ControllerState::Disposed => write!(f, "disposed"),
        }
    }
}

/// Outcome of one poll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TickOutcome {
    /// The cycle ran; nothing special to report.
    Progressed,
    /// The cycle was skipped (extraction failed, or disabled mid-flight).
    Skipped,
    /// Consecutive failures reached the budget; the loop should pause.
    BudgetExhausted,
    /// The engine decided auto-learn is done.
    Stopped,
}

/// Everything the spawned poll task needs, cheaply cloneable.
#[derive(Clone)]
struct LoopCore {
    config: AutoLearnConfig,
    engine: ProgressionEngine,
    provider: Arc<dyn LessonSnapshotProvider>,
    actuator: Arc<dyn NavigationActuator>,
    playback: Arc<dyn PlaybackDriver>,
    settings: SettingsHandle,
    metrics: Arc<ControllerMetrics>,
    events: broadcast::Sender<ControllerEvent>,
    state: Arc<Mutex<ProgressionState>>,
    lifecycle: Arc<AtomicU8>,
}

struct LoopHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

/// The stateful driver for auto-learn.
pub struct AutoLearnController {
    core: LoopCore,
    loop_handle: Mutex<Option<LoopHandle>>,
}

impl AutoLearnController {
    /// Create a controller with the default engine.
    pub fn new(
        config: AutoLearnConfig,
        provider: Arc<dyn LessonSnapshotProvider>,
        actuator: Arc<dyn NavigationActuator>,
        playback: Arc<dyn PlaybackDriver>,
        settings: SettingsHandle,
    ) -> Self {
        Self::with_engine(
            config,
            ProgressionEngine::new(),
            provider,
            actuator,
            playback,
            settings,
        )
    }

    /// Create a controller around a specific engine (fixed clock in tests).
    pub fn with_engine(
        config: AutoLearnConfig,
        engine: ProgressionEngine,
        provider: Arc<dyn LessonSnapshotProvider>,
        actuator: Arc<dyn NavigationActuator>,
        playback: Arc<dyn PlaybackDriver>,
        settings: SettingsHandle,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            core: LoopCore {
                config,
                engine,
                provider,
                actuator,
                playback,
                settings,
                metrics: Arc::new(ControllerMetrics::new()),
                events,
                state: Arc::new(Mutex::new(ProgressionState::new())),
                lifecycle: Arc::new(AtomicU8::new(ControllerState::Idle as u8)),
            },
            loop_handle: Mutex::new(None),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ControllerState {
        ControllerState::from(self.core.lifecycle.load(Ordering::SeqCst))
    }

    /// Whether auto-learn is currently on.
    pub async fn is_enabled(&self) -> bool {
        self.core.state.lock().await.enabled
    }

    /// Activity counters.
    pub fn metrics(&self) -> Arc<ControllerMetrics> {
        self.core.metrics.clone()
    }

    /// Subscribe to the read-only event feed.
    pub fn subscribe(&self) -> broadcast::Receiver<ControllerEvent> {
        self.core.events.subscribe()
    }

    pub fn config(&self) -> &AutoLearnConfig {
        &self.core.config
    }

    /// Toggle auto-learn. Enabling when already on (or disabling when
    /// already off) is a no-op; the persisted flag is only written on an
    /// actual change.
    pub async fn set_enabled(&self, enabled: bool) -> ControllerResult<()> {
        if self.state() == ControllerState::Disposed {
            return Err(ControllerError::Disposed);
        }
        if enabled {
            self.enable().await
        } else {
            self.disable().await
        }
    }

    async fn enable(&self) -> ControllerResult<()> {
        let mut handle_guard = self.loop_handle.lock().await;

        {
            let mut state = self.core.state.lock().await;
            if state.enabled {
                debug!("auto-learn already enabled");
                return Ok(());
            }
            // A manual enable starts a fresh session; in particular the
            // re-study exit guard comes down again here and only here.
            state.reset();
            state.enabled = true;
        }
        self.core.settings.set(keys::AUTO_LEARN, &true).await?;

        // Clear out a loop task left over from a previous run.
        if let Some(old) = handle_guard.take() {
            old.cancel.cancel();
            old.task.abort();
        }

        self.core.metrics.mark_start();
        self.core
            .lifecycle
            .store(ControllerState::Running as u8, Ordering::SeqCst);
        info!("auto-learn enabled");

        let cancel = CancellationToken::new();

        // One immediate cycle so the toggle feels responsive.
        match self.core.run_tick(&cancel).await {
            Ok(TickOutcome::Stopped) => {
                // Nothing to drive; the engine already switched us back off.
                self.core
                    .lifecycle
                    .store(ControllerState::Idle as u8, Ordering::SeqCst);
                return Ok(());
            }
            Err(err) if err.is_fatal() => {
                let mut state = self.core.state.lock().await;
                state.reset();
                self.core
                    .lifecycle
                    .store(ControllerState::Idle as u8, Ordering::SeqCst);
                return Err(err);
            }
            Ok(_) | Err(_) => {}
        }

        let core = self.core.clone();
        let loop_cancel = cancel.clone();
        let task = tokio::spawn(async move { core.run(loop_cancel).await });
        *handle_guard = Some(LoopHandle { cancel, task });
        Ok(())
    }

    async fn disable(&self) -> ControllerResult<()> {
        let mut handle_guard = self.loop_handle.lock().await;

        let was_enabled = self.core.state.lock().await.enabled;
        if !was_enabled && handle_guard.is_none() {
            debug!("auto-learn already disabled");
            return Ok(());
        }

        self.core
            .lifecycle
            .store(ControllerState::Stopping as u8, Ordering::SeqCst);

        if let Some(handle) = handle_guard.take() {
            handle.cancel.cancel();
            // Let a mid-flight tick finish; its action is discarded behind
            // the cancellation checks inside the loop.
            if let Err(err) = handle.task.await {
                if !err.is_cancelled() {
                    warn!(error = %err, "poll task ended abnormally");
                }
            }
        }

        {
            let mut state = self.core.state.lock().await;
            state.reset();
        }
        self.core.settings.set(keys::AUTO_LEARN, &false).await?;
        self.core
            .lifecycle
            .store(ControllerState::Idle as u8, Ordering::SeqCst);
        info!("auto-learn disabled");
        Ok(())
    }

    /// Resume a prior session: wait for the page to yield lessons, re-read
    /// the persisted flag, and re-enable if it was on. Returns the flag.
    pub async fn initialize_from_settings(&self) -> ControllerResult<bool> {
        let startup = self.core.config.startup.clone();
        let attempts = startup.max_init_retries.max(1);
        let mut last_error = None;

        for attempt in 1..=attempts {
            match self.try_initialize().await {
                Ok(enabled) => return Ok(enabled),
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => {
                    warn!(attempt, attempts, error = %err, "initialization attempt failed");
                    last_error = Some(err);
                    if attempt < attempts {
                        tokio::time::sleep(startup.init_retry_delay()).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| {
            ControllerError::Internal("initialization made no attempts".to_string())
        }))
    }

    async fn try_initialize(&self) -> ControllerResult<bool> {
        self.wait_for_lessons().await?;
        let enabled = self.core.settings.get_or(keys::AUTO_LEARN, false).await?;
        if enabled {
            info!("auto-learn was enabled in storage, resuming");
            self.set_enabled(true).await?;
        }
        Ok(enabled)
    }

    async fn wait_for_lessons(&self) -> ControllerResult<()> {
        let startup = &self.core.config.startup;
        let deadline = Instant::now() + startup.lesson_wait_timeout();
        loop {
            match self.core.provider.extract().await {
                Ok(lessons) if !lessons.is_empty() => return Ok(()),
                Ok(_) => {}
                Err(err) if err.is_fatal() => return Err(err),
                Err(err) => debug!(error = %err, "lesson check failed while waiting"),
            }
            if Instant::now() >= deadline {
                return Err(ControllerError::Extraction(
                    "lessons not available before timeout".to_string(),
                ));
            }
            tokio::time::sleep(startup.lesson_wait_poll()).await;
        }
    }

    /// Permanent teardown. Stops the loop, clears all state, and rejects
    /// any further `set_enabled` with [`ControllerError::Disposed`].
    pub async fn dispose(&self) {
        let mut handle_guard = self.loop_handle.lock().await;
        self.core
            .lifecycle
            .store(ControllerState::Disposed as u8, Ordering::SeqCst);

        if let Some(handle) = handle_guard.take() {
            handle.cancel.cancel();
            let _ = handle.task.await;
        }

        let mut state = self.core.state.lock().await;
        state.reset();
        info!("controller disposed");
    }
}

impl LoopCore {
    /// The poll loop. Runs until cancelled, the engine stops, or a fatal
    /// error tears the instance down.
    async fn run(self, cancel: CancellationToken) {
        let interval = self.config.poll_interval();

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(interval) => {}
            }

            match self.run_tick(&cancel).await {
                Ok(TickOutcome::Progressed) | Ok(TickOutcome::Skipped) => {}
                Ok(TickOutcome::BudgetExhausted) => {
                    self.metrics.record_cooldown();
                    self.lifecycle
                        .store(ControllerState::CoolingDown as u8, Ordering::SeqCst);
                    warn!(
                        cooldown_ms = self.config.error_cooldown_ms,
                        "error budget exhausted, pausing auto-learn loop"
                    );
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = tokio::time::sleep(self.config.error_cooldown()) => {}
                    }
                    {
                        let mut state = self.state.lock().await;
                        state.clear_errors();
                    }
                    self.lifecycle
                        .store(ControllerState::Running as u8, Ordering::SeqCst);
                    info!("resuming auto-learn loop after cooldown");
                }
                Ok(TickOutcome::Stopped) => break,
                Err(err) if err.is_fatal() => {
                    error!(error = %err, "fatal error, tearing down auto-learn loop");
                    {
                        let mut state = self.state.lock().await;
                        state.reset();
                    }
                    let _ = self.events.send(ControllerEvent::AutoLearnStopped {
                        reason: StopReason::ContextInvalidated,
                    });
                    break;
                }
                Err(err) => warn!(error = %err, "poll cycle failed"),
            }
        }

        // Dispose wins over the loop's own exit.
        if self.lifecycle.load(Ordering::SeqCst) != ControllerState::Disposed as u8 {
            self.lifecycle
                .store(ControllerState::Idle as u8, Ordering::SeqCst);
        }
        debug!("auto-learn loop exited");
    }

    /// One poll cycle: extract, publish, decide, act.
    async fn run_tick(&self, cancel: &CancellationToken) -> ControllerResult<TickOutcome> {
        self.metrics.record_tick();

        if !self.state.lock().await.enabled {
            return Ok(TickOutcome::Skipped);
        }

        let lessons = match self.extract_with_retry().await {
            Ok(lessons) => lessons,
            Err(err) if err.is_fatal() => return Err(err),
            Err(err) => {
                self.metrics.record_extraction_failure();
                let mut state = self.state.lock().await;
                let consecutive = state.record_error();
                debug!(error = %err, consecutive, "no usable snapshot this tick");
                return Ok(if consecutive >= self.config.max_consecutive_errors {
                    TickOutcome::BudgetExhausted
                } else {
                    TickOutcome::Skipped
                });
            }
        };

        if cancel.is_cancelled() {
            return Ok(TickOutcome::Skipped);
        }

        self.metrics.record_snapshot();
        if self
            .events
            .send(ControllerEvent::SnapshotUpdated(lessons.clone()))
            .is_ok()
        {
            self.metrics.record_broadcast();
        }

        let action = {
            let mut state = self.state.lock().await;
            if !state.enabled {
                return Ok(TickOutcome::Skipped);
            }
            state.clear_errors();
            self.engine.decide(&lessons, &mut state)
        };

        self.apply_action(action, cancel).await
    }

    async fn extract_with_retry(&self) -> ControllerResult<Vec<LessonRecord>> {
        let provider = self.provider.clone();
        retry_with_delay(
            self.config.extract_attempts,
            self.config.extract_retry_delay(),
            move |attempt| {
                let provider = provider.clone();
                async move {
                    let lessons = provider.extract().await?;
                    if lessons.is_empty() {
                        debug!(attempt, "extraction returned no lessons");
                        Err(ControllerError::Extraction(
                            "snapshot contained no lessons".to_string(),
                        ))
                    } else {
                        Ok(lessons)
                    }
                }
            },
        )
        .await
    }

    async fn apply_action(
        &self,
        action: Action,
        cancel: &CancellationToken,
    ) -> ControllerResult<TickOutcome> {
        match action {
            Action::NavigateTo(lesson) => {
                {
                    let mut state = self.state.lock().await;
                    if !state.enabled {
                        return Ok(TickOutcome::Skipped);
                    }
                    if is_duplicate_navigation(&state, &lesson) {
                        debug!(
                            lesson = %lesson.display_name,
                            "same target as last navigation, waiting for status change"
                        );
                        self.metrics.record_duplicate_skipped();
                        return Ok(TickOutcome::Progressed);
                    }
                    state.last_processed = Some(lesson.display_name.clone());
                }

                if cancel.is_cancelled() {
                    return Ok(TickOutcome::Skipped);
                }

                match self.actuator.navigate(&lesson).await {
                    Ok(true) => {
                        self.metrics.record_navigation();
                        info!(lesson = %lesson.display_name, "navigated to lesson");
                        Ok(TickOutcome::Progressed)
                    }
                    Ok(false) => {
                        warn!(
                            lesson = %lesson.display_name,
                            "navigation click had no effect, retrying next tick"
                        );
                        self.note_failure().await
                    }
                    Err(err) if err.is_fatal() => Err(err),
                    Err(err) => {
                        warn!(
                            lesson = %lesson.display_name,
                            error = %err,
                            "navigation failed, retrying next tick"
                        );
                        self.note_failure().await
                    }
                }
            }
            Action::ResumePlayback(lesson) => {
                if cancel.is_cancelled() {
                    return Ok(TickOutcome::Skipped);
                }
                match self.playback.resume().await {
                    Ok(()) => {
                        if let Err(err) = self.playback.set_rate(self.config.playback_rate).await {
                            debug!(error = %err, "playback rate not applied");
                        }
                        self.metrics.record_playback_resume();
                        debug!(lesson = %lesson.display_name, "playback resumed");
                        Ok(TickOutcome::Progressed)
                    }
                    Err(err) if err.is_fatal() => Err(err),
                    Err(err) => {
                        warn!(error = %err, "playback resume failed, retrying next tick");
                        self.note_failure().await
                    }
                }
            }
            Action::NoOp => Ok(TickOutcome::Progressed),
            Action::Stop => {
                self.finish_stop(StopReason::NoTrackableContent).await;
                Ok(TickOutcome::Stopped)
            }
        }
    }

    async fn note_failure(&self) -> ControllerResult<TickOutcome> {
        let mut state = self.state.lock().await;
        let consecutive = state.record_error();
        Ok(if consecutive >= self.config.max_consecutive_errors {
            TickOutcome::BudgetExhausted
        } else {
            TickOutcome::Progressed
        })
    }

    async fn finish_stop(&self, reason: StopReason) {
        info!(%reason, "auto-learn stopping itself");
        {
            let mut state = self.state.lock().await;
            state.reset();
        }
        if let Err(err) = self.settings.set(keys::AUTO_LEARN, &false).await {
            warn!(error = %err, "could not persist disabled flag");
        }
        let _ = self
            .events
            .send(ControllerEvent::AutoLearnStopped { reason });
    }
}

/// A navigation is a duplicate when it targets the lesson we last clicked
/// and that lesson is a tracked unit still waiting to complete. Completed
/// targets (re-study steering) and untracked interactive items are always
/// re-clickable.
fn is_duplicate_navigation(state: &ProgressionState, lesson: &LessonRecord) -> bool {
    state.last_processed.as_deref() == Some(lesson.display_name.as_str())
        && lesson.study_time.is_some()
        && !lesson.status.is_complete()
}
