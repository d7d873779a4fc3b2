//! Channels: named matchers that turn a page context into a touchpoint

use crate::error::ConfigError;
use crate::query::{decode, host_of, query_of, query_param};
use crate::search_engines::is_search_engine_host;
use crate::touchpoint::Touchpoint;
use crate::types::PageContext;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Per-channel attribution flags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ChannelOptions {
    /// Yield credit to an earlier, non-overwritable touchpoint
    #[serde(alias = "can_overwrite")]
    pub can_overwrite: bool,
    /// Only the first view of a session counts
    #[serde(alias = "is_first_view_only")]
    pub is_first_view_only: bool,
}

impl ChannelOptions {
    pub fn can_overwrite() -> Self {
        Self {
            can_overwrite: true,
            ..Self::default()
        }
    }

    pub fn first_view_only() -> Self {
        Self {
            is_first_view_only: true,
            ..Self::default()
        }
    }
}

/// Expected state of one query parameter in a predicate map
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamExpectation {
    Present,
    Absent,
    /// Compared against the raw, still-encoded value
    Equals(String),
}

impl ParamExpectation {
    fn holds(&self, raw: Option<&str>) -> bool {
        match self {
            ParamExpectation::Present => raw.is_some(),
            ParamExpectation::Absent => raw.is_none(),
            ParamExpectation::Equals(expected) => raw == Some(expected.as_str()),
        }
    }
}

/// Gate for URL channels
#[derive(Debug, Clone)]
pub enum UrlRule {
    /// Parameter must be present; also the default extraction key
    Param(String),
    /// Tested against the raw query string
    Pattern(Regex),
    /// Every entry must hold
    Params(Vec<(String, ParamExpectation)>),
}

impl UrlRule {
    pub fn param(key: &str) -> Self {
        UrlRule::Param(key.to_string())
    }

    /// Compile a case-insensitive pattern, like the `/.../i` literals most
    /// channel definitions use
    pub fn pattern(pattern: &str) -> Result<Self, ConfigError> {
        Ok(UrlRule::Pattern(compile("", pattern, true)?))
    }

    pub fn params<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, ParamExpectation)>,
    {
        UrlRule::Params(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    fn holds(&self, query: &str) -> bool {
        match self {
            UrlRule::Param(key) => query_param(key, query).is_some(),
            UrlRule::Pattern(regex) => regex.is_match(query),
            UrlRule::Params(entries) => entries
                .iter()
                .all(|(key, expected)| expected.holds(query_param(key, query))),
        }
    }
}

/// Custom referrer test
#[derive(Clone)]
pub struct ReferrerPredicate(Arc<dyn Fn(&str) -> bool + Send + Sync>);

impl ReferrerPredicate {
    pub fn new(f: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    fn call(&self, referrer: &str) -> bool {
        (self.0)(referrer)
    }
}

impl fmt::Debug for ReferrerPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ReferrerPredicate(..)")
    }
}

/// Gate for referrer channels
#[derive(Debug, Clone)]
pub enum ReferrerRule {
    Pattern(Regex),
    /// First matching pattern wins
    AnyOf(Vec<Regex>),
    Predicate(ReferrerPredicate),
}

impl ReferrerRule {
    pub fn pattern(pattern: &str) -> Result<Self, ConfigError> {
        Ok(ReferrerRule::Pattern(compile("", pattern, true)?))
    }

    pub fn any_of(patterns: &[&str]) -> Result<Self, ConfigError> {
        let regexes = patterns
            .iter()
            .map(|p| compile("", p, true))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ReferrerRule::AnyOf(regexes))
    }

    pub fn predicate(f: impl Fn(&str) -> bool + Send + Sync + 'static) -> Self {
        ReferrerRule::Predicate(ReferrerPredicate::new(f))
    }

    fn holds(&self, referrer: &str) -> bool {
        match self {
            ReferrerRule::Pattern(regex) => regex.is_match(referrer),
            ReferrerRule::AnyOf(regexes) => regexes.iter().any(|r| r.is_match(referrer)),
            ReferrerRule::Predicate(predicate) => predicate.call(referrer),
        }
    }
}

/// Matching strategy of a channel
#[derive(Debug, Clone)]
pub enum Matcher {
    Url { rule: UrlRule, extract: String },
    Referrer { rule: ReferrerRule, value: Option<String> },
    SearchEngine,
}

/// A configured marketing source
#[derive(Debug, Clone)]
pub struct Channel {
    id: String,
    label: String,
    options: ChannelOptions,
    matcher: Matcher,
}

impl Channel {
    /// Channel gated on the page URL's query string.
    ///
    /// `extract` names the parameter whose decoded value becomes the
    /// touchpoint value; it defaults to the key of a [`UrlRule::Param`] rule
    /// and is required for every other rule.
    pub fn url(
        id: &str,
        label: &str,
        rule: UrlRule,
        extract: Option<&str>,
    ) -> Result<Self, ConfigError> {
        check_id(id)?;
        if let UrlRule::Params(entries) = &rule {
            if entries.is_empty() {
                return Err(ConfigError::malformed(id, "empty parameter map"));
            }
        }
        let extract = match (extract, &rule) {
            (Some(key), _) if !key.is_empty() => key.to_string(),
            (_, UrlRule::Param(key)) if !key.is_empty() => key.clone(),
            _ => return Err(ConfigError::MissingExtractKey(id.to_string())),
        };
        Ok(Self::build(id, label, Matcher::Url { rule, extract }))
    }

    /// Channel gated on the referrer; the value is the referrer itself
    pub fn referrer(id: &str, label: &str, rule: ReferrerRule) -> Result<Self, ConfigError> {
        check_id(id)?;
        if let ReferrerRule::AnyOf(regexes) = &rule {
            if regexes.is_empty() {
                return Err(ConfigError::malformed(id, "empty pattern list"));
            }
        }
        Ok(Self::build(id, label, Matcher::Referrer { rule, value: None }))
    }

    /// Channel matching referrers from known search engines
    pub fn search_engine(id: &str, label: &str) -> Result<Self, ConfigError> {
        check_id(id)?;
        Ok(Self::build(id, label, Matcher::SearchEngine))
    }

    fn build(id: &str, label: &str, matcher: Matcher) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            options: ChannelOptions::default(),
            matcher,
        }
    }

    pub fn with_options(mut self, options: ChannelOptions) -> Self {
        self.options = options;
        self
    }

    /// Report a constant instead of the referrer (referrer channels only)
    pub fn with_value(mut self, constant: &str) -> Self {
        if let Matcher::Referrer { value, .. } = &mut self.matcher {
            *value = Some(constant.to_string());
        }
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn options(&self) -> ChannelOptions {
        self.options
    }

    pub fn can_overwrite(&self) -> bool {
        self.options.can_overwrite
    }

    pub fn is_first_view_only(&self) -> bool {
        self.options.is_first_view_only
    }

    pub fn matcher(&self) -> &Matcher {
        &self.matcher
    }

    /// Short strategy name for listings
    pub fn kind(&self) -> &'static str {
        match self.matcher {
            Matcher::Url { .. } => "url",
            Matcher::Referrer { .. } => "referrer",
            Matcher::SearchEngine => "search_engine",
        }
    }

    /// Value this channel extracts from `context`, `None` when it does not match
    pub fn extract(&self, context: &PageContext) -> Option<String> {
        match &self.matcher {
            Matcher::Url { rule, extract } => {
                let query = query_of(&context.url)?;
                if !rule.holds(&query) {
                    return None;
                }
                query_param(extract, &query).map(decode)
            }
            Matcher::Referrer { rule, value } => {
                let referrer = context.referrer.trim();
                if referrer.is_empty() || !rule.holds(referrer) {
                    return None;
                }
                Some(value.clone().unwrap_or_else(|| referrer.to_string()))
            }
            Matcher::SearchEngine => {
                let referrer = context.referrer.trim();
                if referrer.is_empty() {
                    return None;
                }
                host_of(referrer).filter(|host| is_search_engine_host(host))
            }
        }
    }
}

/// Evaluate a shared channel against `context`
pub fn evaluate(channel: &Arc<Channel>, context: &PageContext) -> Option<Touchpoint> {
    let value = channel.extract(context)?;
    Some(Touchpoint::new(Arc::clone(channel), value, context.now))
}

fn check_id(id: &str) -> Result<(), ConfigError> {
    if id.trim().is_empty() {
        return Err(ConfigError::EmptyId);
    }
    Ok(())
}

pub(crate) fn compile(id: &str, pattern: &str, case_insensitive: bool) -> Result<Regex, ConfigError> {
    RegexBuilder::new(pattern)
        .case_insensitive(case_insensitive)
        .build()
        .map_err(|source| ConfigError::InvalidPattern {
            id: id.to_string(),
            pattern: pattern.to_string(),
            source,
        })
}
