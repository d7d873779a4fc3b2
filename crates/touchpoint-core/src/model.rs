//! Attribution models: which touchpoints receive credit

use crate::touchpoint::Touchpoint;
use std::fmt;

/// Thirty days
pub const DEFAULT_LIFETIME: i64 = 60 * 60 * 24 * 30;

/// Policy selecting credited touchpoints from a history
pub trait AttributionModel: fmt::Debug + Send + Sync {
    /// Model name (for listings)
    fn name(&self) -> &str;

    /// Maximum touchpoint age in seconds
    fn lifetime(&self) -> i64;

    /// Touchpoints credited at `now`; never fails, empty when nothing qualifies
    fn attributed_touchpoints(&self, history: &[Touchpoint], now: i64) -> Vec<Touchpoint>;
}

/// Last qualifying touch wins, with `canOverwrite` channels yielding credit
/// back to the most recent earlier touchpoint that is not overwritable.
///
/// Walking back from the newest touchpoint inside the lifetime, every
/// `canOverwrite` touchpoint is skipped unless it is the only one left; when
/// the whole window is overwritable the oldest entry in it is credited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LastTouchAttributionModel {
    lifetime: i64,
}

impl LastTouchAttributionModel {
    pub fn new(lifetime: i64) -> Self {
        Self { lifetime }
    }

    fn is_within_lifetime(&self, touchpoint: &Touchpoint, now: i64) -> bool {
        now.saturating_sub(touchpoint.timestamp()) <= self.lifetime
    }
}

impl Default for LastTouchAttributionModel {
    fn default() -> Self {
        Self::new(DEFAULT_LIFETIME)
    }
}

impl AttributionModel for LastTouchAttributionModel {
    fn name(&self) -> &str {
        "last_touch"
    }

    fn lifetime(&self) -> i64 {
        self.lifetime
    }

    fn attributed_touchpoints(&self, history: &[Touchpoint], now: i64) -> Vec<Touchpoint> {
        let mut qualifying = history
            .iter()
            .rev()
            .filter(|tp| self.is_within_lifetime(tp, now));

        let Some(mut credited) = qualifying.next() else {
            return Vec::new();
        };

        if credited.channel().can_overwrite() {
            for earlier in qualifying {
                credited = earlier;
                if !earlier.channel().can_overwrite() {
                    break;
                }
            }
        }

        vec![credited.clone()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::{Channel, ChannelOptions};
    use std::sync::Arc;

    fn channel(id: &str, can_overwrite: bool) -> Arc<Channel> {
        let options = ChannelOptions {
            can_overwrite,
            ..ChannelOptions::default()
        };
        Arc::new(
            Channel::search_engine(id, id)
                .unwrap()
                .with_options(options),
        )
    }

    fn tp(channel: &Arc<Channel>, timestamp: i64) -> Touchpoint {
        Touchpoint::new(Arc::clone(channel), format!("{}-value", channel.id()), timestamp)
    }

    fn credited_ids(model: &LastTouchAttributionModel, history: &[Touchpoint], now: i64) -> Vec<String> {
        model
            .attributed_touchpoints(history, now)
            .iter()
            .map(|tp| tp.channel().id().to_string())
            .collect()
    }

    #[test]
    fn test_empty_history() {
        let model = LastTouchAttributionModel::default();
        assert!(model.attributed_touchpoints(&[], 1000).is_empty());
    }

    #[test]
    fn test_single_entry_wins_regardless_of_flag() {
        let model = LastTouchAttributionModel::new(1000);
        let seo = channel("seo", true);
        assert_eq!(credited_ids(&model, &[tp(&seo, 100)], 200), vec!["seo"]);
    }

    #[test]
    fn test_overwritable_yields_to_earlier() {
        let model = LastTouchAttributionModel::new(1000);
        let aff = channel("aff", false);
        let seo = channel("seo", true);
        let history = [tp(&aff, 100), tp(&seo, 200)];
        assert_eq!(credited_ids(&model, &history, 300), vec!["aff"]);
    }

    #[test]
    fn test_non_overwritable_latest_keeps_credit() {
        let model = LastTouchAttributionModel::new(1000);
        let foo = channel("foo", true);
        let dis = channel("dis", false);
        let history = [tp(&foo, 100), tp(&dis, 200)];
        assert_eq!(credited_ids(&model, &history, 300), vec!["dis"]);
    }

    #[test]
    fn test_all_overwritable_oldest_wins() {
        let model = LastTouchAttributionModel::new(1000);
        let foo = channel("foo", true);
        let seo = channel("seo", true);
        let history = [tp(&foo, 100), tp(&seo, 200)];
        assert_eq!(credited_ids(&model, &history, 300), vec!["foo"]);
    }

    #[test]
    fn test_three_entry_chains() {
        let model = LastTouchAttributionModel::new(1000);
        let aff = channel("aff", false);
        let dis = channel("dis", false);
        let seo = channel("seo", true);
        let foo = channel("foo", true);

        // most recent non-overwritable entry behind the overwritable tail
        let history = [tp(&aff, 100), tp(&dis, 200), tp(&seo, 300)];
        assert_eq!(credited_ids(&model, &history, 400), vec!["dis"]);

        // several overwritable entries are skipped
        let history = [tp(&aff, 100), tp(&seo, 200), tp(&foo, 300)];
        assert_eq!(credited_ids(&model, &history, 400), vec!["aff"]);

        // non-adjacent: overwritable entry before the credited one is ignored
        let history = [tp(&seo, 100), tp(&aff, 200), tp(&foo, 300)];
        assert_eq!(credited_ids(&model, &history, 400), vec!["aff"]);

        // three overwritable entries: oldest wins by elimination
        let history = [tp(&seo, 100), tp(&foo, 200), tp(&seo, 300)];
        let credited = model.attributed_touchpoints(&history, 400);
        assert_eq!(credited.len(), 1);
        assert_eq!(credited[0].timestamp(), 100);
    }

    #[test]
    fn test_lifetime_excludes_sole_entry() {
        let model = LastTouchAttributionModel::new(1000);
        let aff = channel("aff", false);
        assert!(model.attributed_touchpoints(&[tp(&aff, 100)], 100_000).is_empty());
    }

    #[test]
    fn test_expired_entry_cannot_take_credit_back() {
        let model = LastTouchAttributionModel::new(1000);
        let aff = channel("aff", false);
        let seo = channel("seo", true);
        let history = [tp(&aff, 100), tp(&seo, 100_000)];
        assert_eq!(credited_ids(&model, &history, 100_000), vec!["seo"]);
    }

    #[test]
    fn test_extreme_timestamps_saturate() {
        let model = LastTouchAttributionModel::new(1000);
        let aff = channel("aff", false);
        assert!(model.attributed_touchpoints(&[tp(&aff, i64::MIN)], i64::MAX).is_empty());
        assert_eq!(credited_ids(&model, &[tp(&aff, i64::MAX)], i64::MIN), vec!["aff"]);
    }

    #[test]
    fn test_lifetime_boundary_is_inclusive() {
        let model = LastTouchAttributionModel::new(1000);
        let aff = channel("aff", false);
        assert_eq!(credited_ids(&model, &[tp(&aff, 0)], 1000), vec!["aff"]);
        assert!(credited_ids(&model, &[tp(&aff, 0)], 1001).is_empty());
    }
}
