#![allow(dead_code)]

use std::path::Path;
use touchpoint_core::{
    AttributionEngine, Channel, ChannelOptions, LastTouchAttributionModel, ParamExpectation,
    ReferrerRule, UrlRule,
};
use touchpoint_storage::{CookieJar, FileStore, MemoryStore, TieredStorage};

pub const THIRTY_DAYS: i64 = 60 * 60 * 24 * 30;

pub fn memory_storage() -> TieredStorage {
    TieredStorage::new(vec![
        Box::new(MemoryStore::new("local")),
        Box::new(MemoryStore::new("cookie")),
    ])
}

pub fn disk_storage(root: &Path) -> TieredStorage {
    TieredStorage::new(vec![
        Box::new(FileStore::new(root.join("store"))),
        Box::new(CookieJar::new(root.join("cookies.txt"))),
    ])
}

pub fn sea() -> Channel {
    Channel::url("sea", "SEA (adwords)", UrlRule::param("adword"), Some("adword")).unwrap()
}

/// `emsrc=<id>` affiliate-style channel extracting `refID`
pub fn emsrc_channel(id: &str, can_overwrite: bool) -> Channel {
    Channel::url(
        id,
        id,
        UrlRule::params([("emsrc", ParamExpectation::Equals(id.to_string()))]),
        Some("refID"),
    )
    .unwrap()
    .with_options(ChannelOptions {
        can_overwrite,
        is_first_view_only: false,
    })
}

pub fn seo(can_overwrite: bool) -> Channel {
    Channel::search_engine("seo", "SEO")
        .unwrap()
        .with_options(ChannelOptions {
            can_overwrite,
            is_first_view_only: false,
        })
}

pub fn referrer_channel(id: &str, pattern: &str, options: ChannelOptions) -> Channel {
    Channel::referrer(id, id, ReferrerRule::pattern(pattern).unwrap())
        .unwrap()
        .with_options(options)
}

pub fn engine_with(channels: Vec<Channel>, lifetime: i64, storage: TieredStorage) -> AttributionEngine {
    AttributionEngine::new(
        Box::new(LastTouchAttributionModel::new(lifetime)),
        channels,
        storage,
    )
    .unwrap()
}

pub fn memory_engine(channels: Vec<Channel>) -> AttributionEngine {
    engine_with(channels, THIRTY_DAYS, memory_storage())
}

/// Shop URL tagged with `emsrc`/`refID`
pub fn emsrc_url(source: &str, ref_id: &str) -> String {
    format!("http://shop.com?emsrc={}&refID={}", source, ref_id)
}

pub fn ids(touchpoints: &[touchpoint_core::Touchpoint]) -> Vec<String> {
    touchpoints
        .iter()
        .map(|tp| tp.channel().id().to_string())
        .collect()
}
