//! Marketing attribution: channel matching, touchpoint history and crediting

mod channel;
mod config;
mod engine;
mod error;
mod model;
pub mod query;
mod search_engines;
mod touchpoint;
mod types;

pub use channel::{
    evaluate, Channel, ChannelOptions, Matcher, ParamExpectation, ReferrerPredicate,
    ReferrerRule, UrlRule,
};
pub use config::{ChannelDescriptor, ChannelKind, Config};
pub use engine::{AttributionEngine, DEFAULT_STORAGE_KEY, DEFAULT_VISIT_DURATION};
pub use error::ConfigError;
pub use model::{AttributionModel, LastTouchAttributionModel, DEFAULT_LIFETIME};
pub use search_engines::{is_search_engine_host, SEARCH_ENGINES};
pub use touchpoint::{Touchpoint, TouchpointRecord};
pub use types::{EngineState, PageContext, StoredState};
