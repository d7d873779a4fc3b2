//! Core types for per-visit evaluation

use crate::channel::Channel;
use crate::touchpoint::{Touchpoint, TouchpointRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// The page view being evaluated
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageContext {
    pub url: String,
    #[serde(default)]
    pub referrer: String,
    /// Seconds since epoch
    pub now: i64,
}

impl PageContext {
    pub fn new(url: &str, referrer: &str, now: i64) -> Self {
        Self {
            url: url.to_string(),
            referrer: referrer.to_string(),
            now,
        }
    }
}

/// In-memory engine state
#[derive(Debug, Clone, Default)]
pub struct EngineState {
    pub last_touch_timestamp: Option<i64>,
    pub history: Vec<Touchpoint>,
}

impl EngineState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve stored records against the live channel set.
    ///
    /// Records for channels that are no longer configured are dropped.
    pub fn from_stored(stored: StoredState, channels: &HashMap<String, Arc<Channel>>) -> Self {
        let total = stored.history.len();
        let history: Vec<Touchpoint> = stored
            .history
            .into_iter()
            .filter_map(|record| Touchpoint::from_record(record, channels))
            .collect();

        if history.len() < total {
            tracing::debug!(
                dropped = total - history.len(),
                "dropped history entries for unknown channels"
            );
        }

        Self {
            last_touch_timestamp: stored.last_touch_timestamp,
            history,
        }
    }

    pub fn to_stored(&self) -> StoredState {
        StoredState {
            last_touch_timestamp: self.last_touch_timestamp,
            history: self.history.iter().map(Touchpoint::to_record).collect(),
        }
    }
}

/// Persisted engine state (one JSON document per storage key)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredState {
    #[serde(rename = "lastTouchTimestamp", default)]
    pub last_touch_timestamp: Option<i64>,
    #[serde(default)]
    pub history: Vec<TouchpointRecord>,
}
