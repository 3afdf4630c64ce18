//! Coverage computation for a single segment.
//!
//! Takes the raw tested and untested intervals for one identifier together
//! with the segment's plan bounds and total length, and produces the merged
//! valid coverage, the coverage percentage, and the uncovered gaps.

use serde::{Deserialize, Serialize};

use crate::core::intervals::{clip, Interval, IntervalSet};

/// Round to a fixed number of decimal places.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// An uncovered stretch within a segment's bounds, ready for reporting.
///
/// Endpoints and length are each rounded to three decimals; the length is
/// rounded from the unrounded endpoints, so it can differ from the
/// difference of the rounded ones in the last digit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Gap {
    /// Lower kilometre endpoint of the gap.
    pub start_km: f64,
    /// Upper kilometre endpoint of the gap.
    pub end_km: f64,
    /// Kilometre length of the gap.
    pub length_km: f64,
}

impl Gap {
    /// Convert an unrounded gap interval into its reporting form.
    pub fn from_interval(interval: Interval) -> Self {
        Self {
            start_km: round_to(interval.start, 3),
            end_km: round_to(interval.end, 3),
            length_km: round_to(interval.length(), 3),
        }
    }
}

/// Result of the per-segment coverage computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageSummary {
    /// Tested intervals that survived the exclusion filter, in input order
    /// with duplicates preserved.
    pub valid: Vec<Interval>,
    /// Valid intervals clipped to the segment bounds and merged.
    pub covered: IntervalSet,
    /// Summed kilometre length of `covered`, unrounded.
    pub tested_length: f64,
    /// Covered share of the total length in percent, rounded to two
    /// decimals. Exactly 0.0 when the total length is missing or zero.
    pub coverage_pct: f64,
    /// Uncovered stretches within the bounds, sorted by start.
    pub gaps: Vec<Gap>,
}

/// Compute a segment's coverage from its raw interval rows.
///
/// A tested interval is excluded when it equals an untested interval in
/// both endpoints. Equality is exact, not overlap: the untested report
/// retracts specific measurement records, it does not subtract track. Every
/// duplicate occurrence of a retracted pair is dropped.
///
/// The survivors are clipped to `bounds`, merged, and measured. The
/// percentage divides by `total_length` only when it is present and
/// non-zero; otherwise coverage reports as 0.0 rather than failing.
pub fn compute_coverage(
    tested: &[Interval],
    untested: &[Interval],
    bounds: Interval,
    total_length: Option<f64>,
) -> CoverageSummary {
    let valid: Vec<Interval> = tested
        .iter()
        .filter(|interval| !untested.contains(interval))
        .copied()
        .collect();

    let covered = IntervalSet::merge(&clip(&valid, bounds));
    let tested_length = covered.total_length();

    let coverage_pct = match total_length {
        Some(total) if total != 0.0 => round_to(tested_length / total * 100.0, 2),
        _ => 0.0,
    };

    let gaps = covered
        .gaps(bounds)
        .into_iter()
        .map(Gap::from_interval)
        .collect();

    CoverageSummary {
        valid,
        covered,
        tested_length,
        coverage_pct,
        gaps,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn iv(start: f64, end: f64) -> Interval {
        Interval::new(start, end)
    }

    #[test]
    fn contiguous_intervals_cover_fully() {
        let summary = compute_coverage(
            &[iv(0.0, 5.0), iv(5.0, 10.0)],
            &[],
            iv(0.0, 10.0),
            Some(10.0),
        );
        assert_eq!(summary.covered.intervals(), &[iv(0.0, 10.0)]);
        assert_eq!(summary.coverage_pct, 100.0);
        assert_relative_eq!(summary.tested_length, 10.0);
        assert!(summary.gaps.is_empty());
    }

    #[test]
    fn partial_coverage_reports_the_gap() {
        let summary = compute_coverage(
            &[iv(0.0, 3.0), iv(6.0, 10.0)],
            &[],
            iv(0.0, 10.0),
            Some(10.0),
        );
        assert_eq!(summary.coverage_pct, 70.0);
        assert_eq!(
            summary.gaps,
            vec![Gap {
                start_km: 3.0,
                end_km: 6.0,
                length_km: 3.0
            }]
        );
    }

    #[test]
    fn exact_untested_match_is_excluded() {
        let summary = compute_coverage(&[iv(2.0, 8.0)], &[iv(2.0, 8.0)], iv(0.0, 10.0), Some(10.0));
        assert!(summary.valid.is_empty());
        assert_eq!(summary.coverage_pct, 0.0);
        assert_eq!(
            summary.gaps,
            vec![Gap {
                start_km: 0.0,
                end_km: 10.0,
                length_km: 10.0
            }]
        );
    }

    #[test]
    fn exclusion_removes_every_duplicate_occurrence() {
        let summary = compute_coverage(
            &[iv(2.0, 8.0), iv(0.0, 1.0), iv(2.0, 8.0)],
            &[iv(2.0, 8.0)],
            iv(0.0, 10.0),
            Some(10.0),
        );
        assert_eq!(summary.valid, vec![iv(0.0, 1.0)]);
        assert_eq!(summary.coverage_pct, 10.0);
    }

    #[test]
    fn overlapping_but_unequal_untested_excludes_nothing() {
        let summary = compute_coverage(&[iv(2.0, 8.0)], &[iv(2.0, 7.0)], iv(0.0, 10.0), Some(10.0));
        assert_eq!(summary.valid, vec![iv(2.0, 8.0)]);
        assert_eq!(summary.coverage_pct, 60.0);
    }

    #[test]
    fn missing_or_zero_total_length_yields_zero_percent() {
        let summary = compute_coverage(&[iv(0.0, 10.0)], &[], iv(0.0, 10.0), None);
        assert_eq!(summary.coverage_pct, 0.0);
        assert_relative_eq!(summary.tested_length, 10.0);

        let summary = compute_coverage(&[iv(0.0, 10.0)], &[], iv(0.0, 10.0), Some(0.0));
        assert_eq!(summary.coverage_pct, 0.0);
    }

    #[test]
    fn intervals_outside_bounds_do_not_count() {
        let summary = compute_coverage(
            &[iv(-5.0, -1.0), iv(12.0, 15.0), iv(8.0, 14.0)],
            &[],
            iv(0.0, 10.0),
            Some(10.0),
        );
        assert_eq!(summary.covered.intervals(), &[iv(8.0, 10.0)]);
        assert_eq!(summary.coverage_pct, 20.0);
    }

    #[test]
    fn non_finite_intervals_contribute_no_coverage() {
        let summary = compute_coverage(
            &[iv(f64::NAN, f64::NAN), iv(f64::NAN, 10.0)],
            &[],
            iv(0.0, 10.0),
            Some(10.0),
        );
        assert!(summary.covered.is_empty());
        assert_eq!(summary.coverage_pct, 0.0);
        assert_eq!(
            summary.gaps,
            vec![Gap {
                start_km: 0.0,
                end_km: 10.0,
                length_km: 10.0
            }]
        );
    }

    #[test]
    fn gap_length_is_rounded_independently_of_endpoints() {
        let summary = compute_coverage(
            &[iv(0.0, 1.2344)],
            &[],
            iv(0.0, 2.3456),
            Some(2.3456),
        );
        let gap = summary.gaps[0];
        assert_eq!(gap.start_km, 1.234);
        assert_eq!(gap.end_km, 2.346);
        // 2.3456 - 1.2344 = 1.1112, rounded on its own.
        assert_eq!(gap.length_km, 1.111);
    }

    #[test]
    fn coverage_percent_is_rounded_to_two_decimals() {
        let summary = compute_coverage(
            &[iv(0.0, 1.2344)],
            &[],
            iv(0.0, 2.3456),
            Some(2.3456),
        );
        assert_eq!(summary.coverage_pct, 52.63);
    }

    #[test]
    fn round_to_clamps_decimal_noise() {
        assert_eq!(round_to(70.00000000000001, 2), 70.0);
        assert_eq!(round_to(1.1112, 3), 1.111);
        assert_eq!(round_to(2.3456, 3), 2.346);
    }
}
