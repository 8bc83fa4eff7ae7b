use tracing::warn;

use crate::interval::TimedInterval;

/// A rendered state that can be compared across samples.
///
/// Blank states ("nothing interesting") never open an interval: absence of
/// an interval means "render nothing".
pub trait VisualState: Clone + PartialEq {
    fn is_blank(&self) -> bool;
}

/// Append-only visibility history of one visual unit.
///
/// Intervals are ordered by `begin`, never overlap, and at most the last one
/// is open.
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline<V> {
    intervals: Vec<TimedInterval<V>>,
}

impl<V> Default for Timeline<V> {
    fn default() -> Self {
        Self {
            intervals: Vec::new(),
        }
    }
}

impl<V: VisualState> Timeline<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `value` is the unit's state at `now`.
    pub fn observe(&mut self, value: &V, now: f64) {
        let now = self.clamp(now);
        match self.intervals.last_mut() {
            Some(last) if last.is_open() => {
                if last.value == *value {
                    return;
                }
                last.close(now);
            }
            // Nothing recorded yet, or the last interval was already closed
            // (only after an early finalize): start afresh.
            _ => {}
        }
        if !value.is_blank() {
            self.intervals.push(TimedInterval::open(value.clone(), now));
        }
    }

    /// Closes the open interval, if any, at `now`. Returns whether one was
    /// closed.
    pub fn finalize(&mut self, now: f64) -> bool {
        let now = self.clamp(now);
        match self.intervals.last_mut() {
            Some(last) if last.is_open() => {
                last.close(now);
                true
            }
            _ => false,
        }
    }

    pub fn intervals(&self) -> &[TimedInterval<V>] {
        &self.intervals
    }

    pub fn open_interval(&self) -> Option<&TimedInterval<V>> {
        self.intervals.last().filter(|i| i.is_open())
    }

    pub fn is_finalized(&self) -> bool {
        self.open_interval().is_none()
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// The state visible at `t`, if any.
    pub fn value_at(&self, t: f64) -> Option<&V> {
        // Intervals are sorted by begin, so the candidate is the last one
        // starting at or before `t`.
        let idx = self.intervals.partition_point(|i| i.begin <= t);
        idx.checked_sub(1)
            .and_then(|i| self.intervals.get(i))
            .filter(|i| i.contains(t))
            .map(|i| &i.value)
    }

    fn clamp(&self, now: f64) -> f64 {
        let floor = match self.intervals.last() {
            Some(last) => last.end.unwrap_or(last.begin),
            None => return now,
        };
        if now < floor {
            warn!(now, floor, "timeline observed out of order; clamping");
            floor
        } else {
            now
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    impl VisualState for &'static str {
        fn is_blank(&self) -> bool {
            self.trim().is_empty()
        }
    }

    #[test]
    fn test_blank_value_opens_nothing() {
        let mut timeline: Timeline<&str> = Timeline::new();
        timeline.observe(&"", 0.0);
        timeline.observe(&"   ", 1.0);
        assert!(timeline.is_empty());
    }

    #[test]
    fn test_same_value_is_noop() {
        let mut timeline = Timeline::new();
        timeline.observe(&"a", 0.0);
        timeline.observe(&"a", 1.0);
        timeline.observe(&"a", 2.0);
        assert_eq!(timeline.len(), 1);
        assert!(timeline.open_interval().is_some());
    }

    #[test]
    fn test_change_closes_and_reopens() {
        let mut timeline = Timeline::new();
        timeline.observe(&"a", 0.0);
        timeline.observe(&"b", 0.5);
        let intervals = timeline.intervals();
        assert_eq!(intervals.len(), 2);
        assert_eq!(intervals[0].end, Some(0.5));
        assert_eq!(intervals[1].value, "b");
        assert_eq!(intervals[1].begin, 0.5);
        assert!(intervals[1].is_open());
    }

    #[test]
    fn test_change_to_blank_only_closes() {
        let mut timeline = Timeline::new();
        timeline.observe(&"a", 0.0);
        timeline.observe(&"", 0.5);
        timeline.observe(&"", 0.7);
        assert_eq!(timeline.len(), 1);
        assert_eq!(timeline.intervals()[0].end, Some(0.5));
        assert!(timeline.is_finalized());
    }

    #[test]
    fn test_finalize_closes_once() {
        let mut timeline = Timeline::new();
        timeline.observe(&"a", 0.0);
        assert!(timeline.finalize(1.0));
        assert!(!timeline.finalize(2.0));
        assert_eq!(timeline.intervals()[0].end, Some(1.0));
    }

    #[test]
    fn test_reopens_after_early_finalize() {
        let mut timeline = Timeline::new();
        timeline.observe(&"a", 0.0);
        timeline.finalize(1.0);
        timeline.observe(&"a", 2.0);
        assert_eq!(timeline.len(), 2);
        assert_eq!(timeline.intervals()[1].begin, 2.0);
    }

    #[test]
    fn test_out_of_order_time_is_clamped() {
        let mut timeline = Timeline::new();
        timeline.observe(&"a", 1.0);
        timeline.observe(&"b", 0.5);
        let intervals = timeline.intervals();
        assert_eq!(intervals[0].end, Some(1.0));
        assert_eq!(intervals[1].begin, 1.0);
    }

    #[test]
    fn test_value_at() {
        let mut timeline = Timeline::new();
        timeline.observe(&"a", 0.0);
        timeline.observe(&"", 1.0);
        timeline.observe(&"b", 2.0);
        timeline.finalize(3.0);
        assert_eq!(timeline.value_at(0.5), Some(&"a"));
        assert_eq!(timeline.value_at(1.5), None);
        assert_eq!(timeline.value_at(2.0), Some(&"b"));
        assert_eq!(timeline.value_at(3.0), None);
        assert_eq!(timeline.value_at(-1.0), None);
    }

    mod prop_tests {
        use super::*;
        use proptest::prelude::*;

        fn arb_value() -> impl Strategy<Value = &'static str> {
            prop_oneof![Just(""), Just("a"), Just("b"), Just("c")]
        }

        fn arb_observations() -> impl Strategy<Value = Vec<(&'static str, f64)>> {
            prop::collection::vec((arb_value(), 0.0f64..2.0), 0..40).prop_map(|steps| {
                let mut now = 0.0;
                steps
                    .into_iter()
                    .map(|(value, delta)| {
                        now += delta;
                        (value, now)
                    })
                    .collect()
            })
        }

        proptest! {
            #[test]
            fn intervals_are_ordered_and_disjoint(observations in arb_observations()) {
                let mut timeline = Timeline::new();
                for (value, now) in &observations {
                    timeline.observe(value, *now);
                }
                let last = observations.last().map(|(_, t)| *t).unwrap_or(0.0);
                timeline.finalize(last + 1.0);

                for pair in timeline.intervals().windows(2) {
                    let end = pair[0].end;
                    prop_assert!(end.is_some(), "non-final interval left open");
                    prop_assert!(pair[0].begin <= pair[1].begin);
                    prop_assert!(end.unwrap_or(f64::INFINITY) <= pair[1].begin);
                }
            }

            #[test]
            fn finalize_leaves_nothing_open(observations in arb_observations()) {
                let mut timeline = Timeline::new();
                for (value, now) in &observations {
                    timeline.observe(value, *now);
                }
                let last = observations.last().map(|(_, t)| *t).unwrap_or(0.0);
                timeline.finalize(last + 1.0);

                prop_assert!(timeline.is_finalized());
                for interval in timeline.intervals() {
                    prop_assert!(!interval.value.is_blank());
                    prop_assert!(interval.duration().is_some_and(|d| d >= 0.0));
                }
            }

            #[test]
            fn value_at_matches_last_observation(observations in arb_observations()) {
                let mut timeline = Timeline::new();
                let mut last_at: Vec<(f64, &'static str)> = Vec::new();
                for (value, now) in &observations {
                    timeline.observe(value, *now);
                    match last_at.last_mut() {
                        Some(entry) if entry.0 == *now => entry.1 = value,
                        _ => last_at.push((*now, value)),
                    }
                }
                let last = observations.last().map(|(_, t)| *t).unwrap_or(0.0);
                timeline.finalize(last + 1.0);

                for (t, value) in last_at {
                    let expected = if value.is_blank() { None } else { Some(&value) };
                    prop_assert_eq!(timeline.value_at(t), expected);
                }
            }
        }
    }
}
