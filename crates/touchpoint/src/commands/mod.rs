pub mod attributed;
pub mod channels;
pub mod execute;
pub mod history;
pub mod hooks;
pub mod init;
pub mod reset;
pub mod status;
pub mod version;

use anyhow::Context;
use serde_json::Value;
use touchpoint_core::{AttributionEngine, Config, Touchpoint};
use touchpoint_storage::{CookieJar, FileStore, Paths, TieredStorage};

/// Primary file store with the cookie jar as fallback
pub fn open_storage(paths: &Paths) -> TieredStorage {
    TieredStorage::new(vec![
        Box::new(FileStore::new(paths.store_dir())),
        Box::new(CookieJar::new(paths.cookie_jar())),
    ])
}

pub fn load_config(paths: &Paths) -> anyhow::Result<Config> {
    let path = paths.config_file();
    Config::load(&path).with_context(|| format!("invalid configuration in {}", path.display()))
}

pub fn open_engine(paths: &Paths) -> anyhow::Result<AttributionEngine> {
    let config = load_config(paths)?;
    Ok(AttributionEngine::from_config(&config, open_storage(paths))?)
}

pub fn now_or(now: Option<i64>) -> i64 {
    now.unwrap_or_else(|| chrono::Utc::now().timestamp())
}

pub fn touchpoint_json(touchpoint: &Touchpoint) -> Value {
    serde_json::json!({
        "channel": touchpoint.channel().id(),
        "label": touchpoint.channel().label(),
        "value": touchpoint.value(),
        "timestamp": touchpoint.timestamp(),
    })
}

/// Human-readable UTC time, falling back to the raw seconds
pub fn format_timestamp(seconds: i64) -> String {
    chrono::DateTime::from_timestamp(seconds, 0)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| seconds.to_string())
}

pub fn touchpoint_line(touchpoint: &Touchpoint) -> String {
    format!(
        "  {} | {} ({}) | {}",
        format_timestamp(touchpoint.timestamp()),
        touchpoint.channel().id(),
        touchpoint.channel().label(),
        touchpoint.value()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use touchpoint_core::Channel;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00:00");
        assert_eq!(format_timestamp(1_700_000_000), "2023-11-14 22:13:20");
    }

    #[test]
    fn test_touchpoint_json() {
        let channel = Arc::new(Channel::search_engine("seo", "SEO").unwrap());
        let tp = Touchpoint::new(channel, "www.bing.com".to_string(), 42);
        let json = touchpoint_json(&tp);
        assert_eq!(json["channel"], "seo");
        assert_eq!(json["label"], "SEO");
        assert_eq!(json["value"], "www.bing.com");
        assert_eq!(json["timestamp"], 42);
    }

    #[test]
    fn test_now_or() {
        assert_eq!(now_or(Some(5)), 5);
        assert!(now_or(None) > 1_600_000_000);
    }
}
