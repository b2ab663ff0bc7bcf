// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Date-interval overlays.
//!
//! This module provides:
//! - [`DateInterval<M>`]: a closed, inclusive calendar-day interval carrying
//!   opaque caller metadata `M` (color, opacity, label, ...)
//! - [`overlays_for_date`]: the order-preserving resolver that selects every
//!   interval containing a given date
//!
//! All comparisons are at calendar-date granularity: time-of-day never
//! participates.  Intervals built from timestamped bounds are normalized to
//! their calendar date (midnight) on construction, see
//! [`DateInterval::from_datetimes`].

use chrono::{NaiveDate, NaiveDateTime};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A closed calendar-day interval `[start, end]` with caller metadata.
///
/// Both bounds are inclusive.  The metadata type `M` is opaque to this
/// module: overlays typically carry presentation data (a color, an opacity,
/// a tooltip label) that the resolver hands back untouched.
///
/// A degenerate interval with `start > end` is accepted but never contains
/// any date — a caller contract violation, not a runtime error.
///
/// # Examples
///
/// ```
/// use calgrid::DateInterval;
/// use chrono::NaiveDate;
///
/// let promo = DateInterval::new(
///     NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
///     NaiveDate::from_ymd_opt(2025, 1, 12).unwrap(),
///     "#e5484d",
/// );
/// assert!(promo.contains(NaiveDate::from_ymd_opt(2025, 1, 11).unwrap()));
/// assert!(!promo.contains(NaiveDate::from_ymd_opt(2025, 1, 13).unwrap()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DateInterval<M = ()> {
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Opaque presentation metadata carried for the caller.
    pub meta: M,
}

impl<M> DateInterval<M> {
    /// Creates a new closed interval `[start, end]`.
    pub const fn new(start: NaiveDate, end: NaiveDate, meta: M) -> Self {
        DateInterval { start, end, meta }
    }

    /// Creates an interval from timestamped bounds, stripping the
    /// time-of-day from each bound independently.
    ///
    /// # Examples
    ///
    /// ```
    /// use calgrid::DateInterval;
    /// use chrono::NaiveDate;
    ///
    /// let start = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap().and_hms_opt(23, 59, 0).unwrap();
    /// let end = NaiveDate::from_ymd_opt(2025, 1, 12).unwrap().and_hms_opt(0, 1, 0).unwrap();
    /// let interval = DateInterval::from_datetimes(start, end, ());
    ///
    /// // Both endpoint dates are included regardless of time-of-day.
    /// assert!(interval.contains(NaiveDate::from_ymd_opt(2025, 1, 10).unwrap()));
    /// assert!(interval.contains(NaiveDate::from_ymd_opt(2025, 1, 12).unwrap()));
    /// ```
    pub fn from_datetimes(start: NaiveDateTime, end: NaiveDateTime, meta: M) -> Self {
        DateInterval {
            start: start.date(),
            end: end.date(),
            meta,
        }
    }

    /// Returns `true` if `date` falls within `[start, end]` (both bounds
    /// inclusive).
    #[inline]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Returns `true` when `start > end`, i.e. the interval can never
    /// contain a date.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.start > self.end
    }

    /// Returns `true` if the two closed intervals share at least one day.
    ///
    /// Unlike half-open conventions, intervals that merely touch at an
    /// endpoint do overlap.
    pub fn overlaps<N>(&self, other: &DateInterval<N>) -> bool {
        let start = self.start.max(other.start);
        let end = self.end.min(other.end);
        start <= end
    }

    /// Number of days the interval covers, counting both endpoints.
    ///
    /// Degenerate intervals report 0.
    ///
    /// # Examples
    ///
    /// ```
    /// use calgrid::DateInterval;
    /// use chrono::NaiveDate;
    ///
    /// let d = |day| NaiveDate::from_ymd_opt(2025, 1, day).unwrap();
    /// assert_eq!(DateInterval::new(d(10), d(12), ()).duration_days(), 3);
    /// assert_eq!(DateInterval::new(d(10), d(10), ()).duration_days(), 1);
    /// assert_eq!(DateInterval::new(d(12), d(10), ()).duration_days(), 0);
    /// ```
    pub fn duration_days(&self) -> i64 {
        if self.is_degenerate() {
            0
        } else {
            (self.end - self.start).num_days() + 1
        }
    }
}

impl<M> fmt::Display for DateInterval<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

/// Returns every interval that contains `date`, preserving input order.
///
/// No deduplication and no re-sorting happens: overlapping intervals all
/// surface, in the order the caller declared them, so "first declared wins"
/// downstream decisions (e.g. picking a single label color) are stable and
/// deterministic.  An empty input yields an empty result for every date.
///
/// Callers that fade out the neighbor-month cells of a
/// [`MonthGrid`](crate::MonthGrid) simply skip querying those cells — the
/// resolver treats every date uniformly and knows nothing about grids.
///
/// # Examples
///
/// ```
/// use calgrid::{overlays_for_date, DateInterval};
/// use chrono::NaiveDate;
///
/// let d = |m, day| NaiveDate::from_ymd_opt(2025, m, day).unwrap();
/// let intervals = vec![
///     DateInterval::new(d(6, 10), d(6, 20), "sale"),
///     DateInterval::new(d(6, 15), d(6, 15), "stocktake"),
/// ];
///
/// let hits = overlays_for_date(d(6, 15), &intervals);
/// assert_eq!(hits.len(), 2);
/// assert_eq!(hits[0].meta, "sale");
/// ```
pub fn overlays_for_date<M>(date: NaiveDate, intervals: &[DateInterval<M>]) -> Vec<&DateInterval<M>> {
    intervals.iter().filter(|iv| iv.contains(date)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_closed_interval_includes_both_endpoints() {
        let iv = DateInterval::new(date(2025, 1, 10), date(2025, 1, 12), ());

        assert!(!iv.contains(date(2025, 1, 9)));
        assert!(iv.contains(date(2025, 1, 10)));
        assert!(iv.contains(date(2025, 1, 11)));
        assert!(iv.contains(date(2025, 1, 12)));
        assert!(!iv.contains(date(2025, 1, 13)));
    }

    #[test]
    fn test_overlapping_intervals_all_match_in_input_order() {
        let intervals = vec![
            DateInterval::new(date(2025, 6, 1), date(2025, 6, 30), "june"),
            DateInterval::new(date(2025, 6, 10), date(2025, 6, 20), "mid"),
            DateInterval::new(date(2025, 7, 1), date(2025, 7, 31), "july"),
        ];

        let hits = overlays_for_date(date(2025, 6, 15), &intervals);
        let labels: Vec<&str> = hits.iter().map(|iv| iv.meta).collect();
        assert_eq!(labels, vec!["june", "mid"]);
    }

    #[test]
    fn test_degenerate_interval_never_matches() {
        let iv = DateInterval::new(date(2025, 1, 12), date(2025, 1, 10), ());
        assert!(iv.is_degenerate());
        assert!(!iv.contains(date(2025, 1, 10)));
        assert!(!iv.contains(date(2025, 1, 11)));
        assert!(!iv.contains(date(2025, 1, 12)));
    }

    #[test]
    fn test_empty_interval_list_yields_empty_result() {
        let intervals: Vec<DateInterval> = Vec::new();
        assert!(overlays_for_date(date(2025, 6, 15), &intervals).is_empty());
    }

    #[test]
    fn test_duplicate_intervals_are_not_deduplicated() {
        let iv = DateInterval::new(date(2025, 3, 1), date(2025, 3, 31), ());
        let intervals = vec![iv, iv];
        assert_eq!(overlays_for_date(date(2025, 3, 15), &intervals).len(), 2);
    }

    #[test]
    fn test_from_datetimes_strips_time_of_day() {
        let start = date(2025, 1, 10).and_hms_opt(23, 59, 59).unwrap();
        let end = date(2025, 1, 12).and_hms_opt(0, 0, 1).unwrap();
        let iv = DateInterval::from_datetimes(start, end, ());

        assert_eq!(iv.start, date(2025, 1, 10));
        assert_eq!(iv.end, date(2025, 1, 12));
        assert!(iv.contains(date(2025, 1, 10)));
        assert!(iv.contains(date(2025, 1, 12)));
    }

    #[test]
    fn test_overlaps_is_closed_on_both_ends() {
        let a = DateInterval::new(date(2025, 1, 1), date(2025, 1, 10), ());
        let b = DateInterval::new(date(2025, 1, 10), date(2025, 1, 20), ());
        let c = DateInterval::new(date(2025, 1, 11), date(2025, 1, 20), ());

        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_single_day_interval() {
        let iv = DateInterval::new(date(2025, 5, 5), date(2025, 5, 5), "audit");
        assert!(iv.contains(date(2025, 5, 5)));
        assert!(!iv.contains(date(2025, 5, 4)));
        assert!(!iv.contains(date(2025, 5, 6)));
        assert_eq!(iv.duration_days(), 1);
    }

    #[test]
    fn test_display_formats_both_bounds() {
        let iv = DateInterval::new(date(2025, 1, 10), date(2025, 1, 12), ());
        assert_eq!(format!("{iv}"), "2025-01-10 to 2025-01-12");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_interval_roundtrip() {
        let iv = DateInterval::new(date(2025, 1, 10), date(2025, 1, 12), "promo".to_string());
        let json = serde_json::to_string(&iv).unwrap();
        let back: DateInterval<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, iv);
    }
}
