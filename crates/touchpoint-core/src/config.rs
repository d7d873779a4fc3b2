//! Configuration for the attribution engine

use crate::channel::{compile, Channel, ChannelOptions, ParamExpectation, ReferrerRule, UrlRule};
use crate::engine::{DEFAULT_STORAGE_KEY, DEFAULT_VISIT_DURATION};
use crate::error::ConfigError;
use crate::model::DEFAULT_LIFETIME;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// Matching strategy named in a channel descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    Url,
    Referrer,
    SearchEngine,
}

/// Channel as written in `touchpoint.json`.
///
/// `match` accepts a string, a `/pattern/flags` literal, an array of
/// patterns or a parameter map; which shapes are valid depends on `type`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelDescriptor {
    pub id: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(rename = "type")]
    pub kind: ChannelKind,
    #[serde(rename = "match", default)]
    pub matcher: Value,
    #[serde(default)]
    pub extract: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub options: ChannelOptions,
}

impl ChannelDescriptor {
    pub fn build(&self) -> Result<Channel, ConfigError> {
        let id = self.id.as_str();
        let label = self.label.as_deref().unwrap_or(id);

        let channel = match self.kind {
            ChannelKind::Url => {
                let rule = url_rule(id, &self.matcher)?;
                Channel::url(id, label, rule, self.extract.as_deref())?
            }
            ChannelKind::Referrer => {
                let rule = referrer_rule(id, &self.matcher)?;
                let channel = Channel::referrer(id, label, rule)?;
                match &self.value {
                    Some(constant) => channel.with_value(constant),
                    None => channel,
                }
            }
            ChannelKind::SearchEngine => Channel::search_engine(id, label)?,
        };

        Ok(channel.with_options(self.options))
    }
}

fn url_rule(id: &str, matcher: &Value) -> Result<UrlRule, ConfigError> {
    match matcher {
        Value::String(s) => match parse_literal(id, s)? {
            Some(regex) => Ok(UrlRule::Pattern(regex)),
            None => Ok(UrlRule::Param(s.clone())),
        },
        Value::Object(map) => {
            let entries = map
                .iter()
                .map(|(key, expected)| {
                    let expectation = match expected {
                        Value::Bool(true) => ParamExpectation::Present,
                        Value::Bool(false) => ParamExpectation::Absent,
                        Value::String(s) => ParamExpectation::Equals(s.clone()),
                        other => {
                            return Err(ConfigError::malformed(
                                id,
                                format!("parameter '{}' expects true, false or a string, got {}", key, other),
                            ))
                        }
                    };
                    Ok((key.clone(), expectation))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(UrlRule::Params(entries))
        }
        Value::Array(_) => Err(ConfigError::malformed(
            id,
            "pattern lists are only supported for referrer channels",
        )),
        other => Err(ConfigError::malformed(id, format!("unsupported matcher {}", other))),
    }
}

fn referrer_rule(id: &str, matcher: &Value) -> Result<ReferrerRule, ConfigError> {
    match matcher {
        Value::String(s) => Ok(ReferrerRule::Pattern(pattern(id, s)?)),
        Value::Array(items) => {
            let regexes = items
                .iter()
                .map(|item| match item {
                    Value::String(s) => pattern(id, s),
                    other => Err(ConfigError::malformed(
                        id,
                        format!("pattern list entries must be strings, got {}", other),
                    )),
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(ReferrerRule::AnyOf(regexes))
        }
        Value::Object(_) => Err(ConfigError::malformed(
            id,
            "parameter maps are only supported for URL channels",
        )),
        other => Err(ConfigError::malformed(id, format!("unsupported matcher {}", other))),
    }
}

/// A literal if `s` is `/…/flags`, otherwise a bare (case-insensitive) pattern
fn pattern(id: &str, s: &str) -> Result<Regex, ConfigError> {
    match parse_literal(id, s)? {
        Some(regex) => Ok(regex),
        None => compile(id, s, true),
    }
}

/// Parse a `/pattern/flags` literal. Flags `i`, `m`, `s` map to regex
/// options; `g`, `u`, `y` are accepted and have no effect.
fn parse_literal(id: &str, s: &str) -> Result<Option<Regex>, ConfigError> {
    let Some(body) = s.strip_prefix('/') else {
        return Ok(None);
    };
    let Some(end) = body.rfind('/') else {
        return Ok(None);
    };
    let (source, flags) = (&body[..end], &body[end + 1..]);
    if source.is_empty() {
        return Ok(None);
    }

    let mut builder = regex::RegexBuilder::new(source);
    for flag in flags.chars() {
        match flag {
            'i' => builder.case_insensitive(true),
            'm' => builder.multi_line(true),
            's' => builder.dot_matches_new_line(true),
            'g' | 'u' | 'y' => &mut builder,
            other => {
                return Err(ConfigError::malformed(
                    id,
                    format!("unknown regex flag '{}' in {}", other, s),
                ))
            }
        };
    }

    builder
        .build()
        .map(Some)
        .map_err(|source| ConfigError::InvalidPattern {
            id: id.to_string(),
            pattern: s.to_string(),
            source,
        })
}

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Inactivity window (seconds) for first-view deduplication
    pub visit_duration: i64,

    /// Maximum touchpoint age (seconds) eligible for credit
    pub lifetime: i64,

    /// Key the engine state is stored under
    pub storage_key: String,

    /// Channels in priority order
    pub channels: Vec<ChannelDescriptor>,
}

impl Config {
    pub fn new() -> Self {
        Self {
            visit_duration: DEFAULT_VISIT_DURATION,
            lifetime: DEFAULT_LIFETIME,
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            channels: Vec::new(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.visit_duration <= 0 {
            return Err(ConfigError::InvalidDuration {
                field: "visit_duration",
                value: self.visit_duration,
            });
        }
        if self.lifetime <= 0 {
            return Err(ConfigError::InvalidDuration {
                field: "lifetime",
                value: self.lifetime,
            });
        }
        Ok(())
    }

    /// Build every configured channel, failing on the first malformed one
    pub fn build_channels(&self) -> Result<Vec<Channel>, ConfigError> {
        self.channels.iter().map(ChannelDescriptor::build).collect()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
