//! Recorded visits credited to a channel

use crate::channel::Channel;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// A visit credited to a channel.
///
/// Touchpoints do not implement `PartialEq`: two entries with the same
/// channel, value and time are still distinct history entries. Compare
/// [`TouchpointRecord`]s when value equality is wanted.
#[derive(Debug, Clone)]
pub struct Touchpoint {
    channel: Arc<Channel>,
    value: String,
    timestamp: i64,
}

impl Touchpoint {
    pub fn new(channel: Arc<Channel>, value: String, timestamp: i64) -> Self {
        Self {
            channel,
            value,
            timestamp,
        }
    }

    pub fn channel(&self) -> &Arc<Channel> {
        &self.channel
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Seconds since epoch
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Move the timestamp forward for a re-confirmed first view
    pub(crate) fn refresh(&mut self, now: i64) {
        self.timestamp = now;
    }

    pub fn to_record(&self) -> TouchpointRecord {
        TouchpointRecord {
            channel_id: self.channel.id().to_string(),
            value: self.value.clone(),
            timestamp: self.timestamp,
        }
    }

    /// Rebuild from a stored record; `None` when the channel is not configured
    pub fn from_record(
        record: TouchpointRecord,
        channels: &HashMap<String, Arc<Channel>>,
    ) -> Option<Self> {
        let channel = channels.get(&record.channel_id)?;
        Some(Self::new(Arc::clone(channel), record.value, record.timestamp))
    }
}

/// Persisted form of a touchpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TouchpointRecord {
    #[serde(rename = "channelId")]
    pub channel_id: String,
    pub value: String,
    pub timestamp: i64,
}
