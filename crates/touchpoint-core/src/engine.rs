//! Per-visit attribution engine

use crate::channel::{evaluate, Channel};
use crate::config::Config;
use crate::error::ConfigError;
use crate::model::{AttributionModel, LastTouchAttributionModel};
use crate::touchpoint::Touchpoint;
use crate::types::{EngineState, PageContext, StoredState};
use std::collections::HashMap;
use std::sync::Arc;
use touchpoint_storage::TieredStorage;

/// Thirty minutes of inactivity ends a session
pub const DEFAULT_VISIT_DURATION: i64 = 60 * 30;

pub const DEFAULT_STORAGE_KEY: &str = "gktp";

/// Orchestrates channel evaluation, history merging and persistence.
///
/// The engine assumes it is the only writer of its storage key. Two
/// processes sharing a store race with last-writer-wins semantics.
#[derive(Debug)]
pub struct AttributionEngine {
    model: Box<dyn AttributionModel>,
    channels: Vec<Arc<Channel>>,
    by_id: HashMap<String, Arc<Channel>>,
    visit_duration: i64,
    storage_key: String,
    storage: TieredStorage,
}

impl AttributionEngine {
    /// Channels are tried in the given order; ids must be unique
    pub fn new(
        model: Box<dyn AttributionModel>,
        channels: Vec<Channel>,
        storage: TieredStorage,
    ) -> Result<Self, ConfigError> {
        let channels: Vec<Arc<Channel>> = channels.into_iter().map(Arc::new).collect();
        let mut by_id = HashMap::new();
        for channel in &channels {
            if by_id
                .insert(channel.id().to_string(), Arc::clone(channel))
                .is_some()
            {
                return Err(ConfigError::DuplicateChannel(channel.id().to_string()));
            }
        }

        Ok(Self {
            model,
            channels,
            by_id,
            visit_duration: DEFAULT_VISIT_DURATION,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            storage,
        })
    }

    /// Build a last-touch engine from configuration
    pub fn from_config(config: &Config, storage: TieredStorage) -> Result<Self, ConfigError> {
        let model = Box::new(LastTouchAttributionModel::new(config.lifetime));
        Ok(Self::new(model, config.build_channels()?, storage)?
            .with_visit_duration(config.visit_duration)
            .with_storage_key(&config.storage_key))
    }

    pub fn with_visit_duration(mut self, seconds: i64) -> Self {
        self.visit_duration = seconds;
        self
    }

    pub fn with_storage_key(mut self, key: &str) -> Self {
        self.storage_key = key.to_string();
        self
    }

    pub fn channels(&self) -> &[Arc<Channel>] {
        &self.channels
    }

    pub fn channel(&self, id: &str) -> Option<&Arc<Channel>> {
        self.by_id.get(id)
    }

    pub fn model(&self) -> &dyn AttributionModel {
        self.model.as_ref()
    }

    pub fn visit_duration(&self) -> i64 {
        self.visit_duration
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn storage(&self) -> &TieredStorage {
        &self.storage
    }

    /// Persisted state; absent or corrupt state reads as empty
    pub fn load_state(&self) -> EngineState {
        let stored: StoredState = self.storage.read_or_default(&self.storage_key);
        EngineState::from_stored(stored, &self.by_id)
    }

    fn save_state(&mut self, state: &EngineState) {
        if let Err(e) = self.storage.write(&self.storage_key, &state.to_stored()) {
            tracing::error!(key = %self.storage_key, error = %e, "failed to persist attribution state");
        }
    }

    /// Pure state transition for one page view.
    ///
    /// Every view except a suppressed one moves the session clock to
    /// `now`. The first matching channel in configuration order wins. A
    /// first-view-only channel that already holds the latest history entry
    /// is suppressed while the session is live and refreshes that entry once
    /// the session has expired.
    pub fn step(&self, mut state: EngineState, context: &PageContext) -> (EngineState, Option<Touchpoint>) {
        let now = context.now;
        let session_expired = state
            .last_touch_timestamp
            .is_some_and(|last| now.saturating_sub(last) > self.visit_duration);

        let Some(candidate) = self
            .channels
            .iter()
            .find_map(|channel| evaluate(channel, context))
        else {
            // unattributed views still count as session activity
            state.last_touch_timestamp = Some(now);
            return (state, None);
        };

        let channel = Arc::clone(candidate.channel());
        if channel.is_first_view_only() {
            if let Some(last) = state
                .history
                .last_mut()
                .filter(|last| last.channel().id() == channel.id())
            {
                if !session_expired {
                    tracing::debug!(channel = channel.id(), "repeat view within session suppressed");
                    return (state, None);
                }
                last.refresh(now);
                let refreshed = last.clone();
                state.last_touch_timestamp = Some(now);
                tracing::debug!(channel = channel.id(), "first view of new session refreshed");
                return (state, Some(refreshed));
            }
        }

        state.history.push(candidate.clone());
        state.last_touch_timestamp = Some(now);
        tracing::debug!(channel = channel.id(), value = candidate.value(), "touchpoint recorded");
        (state, Some(candidate))
    }

    /// Process one page view: load, evaluate, merge, persist.
    ///
    /// Never fails; storage problems are logged and the visit still yields
    /// its touchpoint.
    pub fn execute(&mut self, context: &PageContext) -> Option<Touchpoint> {
        let state = self.load_state();
        let (state, touchpoint) = self.step(state, context);
        self.save_state(&state);
        touchpoint
    }

    /// Persisted history, oldest first
    pub fn touchpoint_history(&self) -> Vec<Touchpoint> {
        self.load_state().history
    }

    pub fn last_touch_timestamp(&self) -> Option<i64> {
        self.load_state().last_touch_timestamp
    }

    /// Touchpoints credited right now
    pub fn attributed_touchpoints(&self) -> Vec<Touchpoint> {
        self.attributed_touchpoints_at(chrono::Utc::now().timestamp())
    }

    pub fn attributed_touchpoints_at(&self, now: i64) -> Vec<Touchpoint> {
        let history = self.touchpoint_history();
        self.model.attributed_touchpoints(&history, now)
    }

    /// Forget all recorded touchpoints
    pub fn reset(&mut self) {
        if let Err(e) = self.storage.remove(&self.storage_key) {
            tracing::warn!(key = %self.storage_key, error = %e, "failed to clear stored state, overwriting");
            self.save_state(&EngineState::new());
        }
    }
}
