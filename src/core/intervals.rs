//! Kilometre interval arithmetic.
//!
//! Tested stretches of track arrive as raw `(KmFrom, KmTo)` pairs that may
//! overlap, touch, duplicate, or run past the segment's plan bounds. This
//! module provides the three pure operations the coverage computation is
//! built from: merge into a canonical disjoint set, clip to bounds, and
//! complement gaps within bounds.

use std::cmp::Ordering;

use serde::{Deserialize, Deserializer, Serialize};

/// A closed kilometre interval `[start, end]`.
///
/// Inputs are assumed to satisfy `start <= end`; a degenerate interval
/// (`start == end`) is legal as input but is never produced by [`clip`] or
/// [`IntervalSet::gaps`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    /// Lower kilometre endpoint.
    pub start: f64,
    /// Upper kilometre endpoint.
    pub end: f64,
}

impl Interval {
    /// Create an interval from already-ordered endpoints.
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Create an interval from endpoints supplied in either order.
    ///
    /// Plan rows occasionally record `KmFrom > KmTo`; bounds built through
    /// this constructor always satisfy `start <= end`.
    pub fn from_endpoints(a: f64, b: f64) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// Kilometre length of the interval.
    pub fn length(&self) -> f64 {
        self.end - self.start
    }
}

/// An ordered set of non-overlapping, non-touching intervals.
///
/// Values are built by [`IntervalSet::merge`], and deserialization
/// re-merges its payload, so no path yields a set violating the invariant
/// `intervals[i].end < intervals[i + 1].start`. Touching inputs
/// (`next.start == prev.end`) are coalesced because coverage is continuous
/// track distance.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct IntervalSet {
    intervals: Vec<Interval>,
}

impl IntervalSet {
    /// Merge arbitrary intervals into a canonical disjoint set.
    ///
    /// Sorts by start (stable on ties), then sweeps: an interval whose start
    /// is `<=` the running interval's end extends it to
    /// `max(current_end, next_end)`, which also handles one interval fully
    /// containing another. Empty input yields an empty set.
    pub fn merge(intervals: &[Interval]) -> Self {
        if intervals.is_empty() {
            return Self::default();
        }

        let mut sorted = intervals.to_vec();
        sorted.sort_by(|a, b| a.start.partial_cmp(&b.start).unwrap_or(Ordering::Equal));

        let mut merged: Vec<Interval> = Vec::with_capacity(sorted.len());
        for current in sorted {
            match merged.last_mut() {
                Some(last) if current.start <= last.end => {
                    last.end = last.end.max(current.end);
                }
                _ => merged.push(current),
            }
        }

        Self { intervals: merged }
    }

    /// The merged intervals, sorted by start.
    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// Whether the set contains no intervals.
    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Number of disjoint intervals in the set.
    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    /// Summed kilometre length of all intervals.
    pub fn total_length(&self) -> f64 {
        self.intervals.iter().map(Interval::length).sum()
    }

    /// Complement of the set within `bounds`.
    ///
    /// An empty set yields the full bounds as the single gap. Otherwise a
    /// leading gap is emitted when the first interval starts after `bounds`,
    /// one gap between each strictly separated pair, and a trailing gap when
    /// the last interval ends before `bounds`. The strict comparisons keep
    /// zero-length gaps out of the result.
    pub fn gaps(&self, bounds: Interval) -> Vec<Interval> {
        let Some(first) = self.intervals.first() else {
            return vec![bounds];
        };

        let mut gaps = Vec::new();
        if first.start > bounds.start {
            gaps.push(Interval::new(bounds.start, first.start));
        }
        for pair in self.intervals.windows(2) {
            if pair[1].start > pair[0].end {
                gaps.push(Interval::new(pair[0].end, pair[1].start));
            }
        }
        // first() returned Some, so last() does too.
        let last = self.intervals.last().unwrap_or(first);
        if last.end < bounds.end {
            gaps.push(Interval::new(last.end, bounds.end));
        }
        gaps
    }
}

impl<'de> Deserialize<'de> for IntervalSet {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            intervals: Vec<Interval>,
        }
        let raw = Raw::deserialize(deserializer)?;
        Ok(Self::merge(&raw.intervals))
    }
}

/// Clip intervals to `bounds`, keeping only strict overlaps.
///
/// Each interval is reduced to `(max(start, lo), min(end, hi))` and kept
/// only when the result has positive length. Intervals that merely touch a
/// bound are dropped, and so is any interval with a non-finite endpoint:
/// `f64::max` and `f64::min` ignore `NaN`, which would clamp such an
/// interval to the full bounds. Input order is preserved and the output is
/// not merged; callers needing a canonical set merge afterwards.
pub fn clip(intervals: &[Interval], bounds: Interval) -> Vec<Interval> {
    intervals
        .iter()
        .filter(|interval| interval.start.is_finite() && interval.end.is_finite())
        .filter_map(|interval| {
            let start = interval.start.max(bounds.start);
            let end = interval.end.min(bounds.end);
            (start < end).then_some(Interval::new(start, end))
        })
        .collect()
}
