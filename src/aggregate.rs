// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Temporal aggregation of daily metric series.
//!
//! [`aggregate`] re-buckets an ascending sequence of [`DailyRecord`]s into
//! one [`AggregateBucket`] per day / ISO week / month / quarter / year.
//! Grouping is driven by a structured per-granularity key held in an
//! ordered map, so output order is deterministic and ascends by anchor
//! date; metric values are summed additively.
//!
//! Each granularity keeps its own anchor-date convention (the ISO week's
//! Monday, the 15th of a month, the 15th of a quarter's second month,
//! July 1st of a year).  The anchors are representative dates *inside* the
//! bucket used by downstream date-range filters — deliberately not the
//! bucket's first day, and deliberately not unified across granularities.
//!
//! Aggregation must always start from the raw daily series: feeding the
//! output of one granularity into another is lossy and unsupported.

use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════════
// Public data model
// ═══════════════════════════════════════════════════════════════════════════

/// Target bucket size for [`aggregate`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Granularity {
    /// Identity transform: one bucket per input record.
    Day,
    /// Monday-starting ISO-8601 weeks.
    Week,
    /// Calendar months.
    Month,
    /// Calendar quarters (Jan–Mar = Q1, ...).
    Quarter,
    /// Calendar years.
    Year,
}

/// One day of input data: a date plus named numeric metrics.
///
/// Records are expected in ascending date order with no duplicate dates.
/// The metric map is ordered so iteration and serialization are
/// deterministic.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub metrics: BTreeMap<String, f64>,
}

impl DailyRecord {
    /// Creates a record with no metrics.
    pub fn new(date: NaiveDate) -> Self {
        DailyRecord {
            date,
            metrics: BTreeMap::new(),
        }
    }

    /// Adds one named metric, builder style.
    ///
    /// # Examples
    ///
    /// ```
    /// use calgrid::DailyRecord;
    /// use chrono::NaiveDate;
    ///
    /// let rec = DailyRecord::new(NaiveDate::from_ymd_opt(2025, 6, 9).unwrap())
    ///     .with_metric("sales", 1250.0)
    ///     .with_metric("returns", 17.0);
    /// assert_eq!(rec.metrics.len(), 2);
    /// ```
    pub fn with_metric(mut self, name: &str, value: f64) -> Self {
        self.metrics.insert(name.to_string(), value);
        self
    }
}

/// One output bucket of [`aggregate`].
///
/// With the `serde` feature the bucket serializes in the record shape the
/// charting layer consumes: `{"id", "name", "date", <metric>: <number>,
/// ...}` — `label` is renamed to `name`, `anchor_date` to `date`, and the
/// metric map is flattened into the top level.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AggregateBucket {
    /// Stable bucket identifier (`2025-06-09`, `2026-W01`, `2025-06`,
    /// `2025-Q3`, `2025`).
    pub id: String,
    /// Human-readable short label.
    #[cfg_attr(feature = "serde", serde(rename = "name"))]
    pub label: String,
    /// Representative date inside the bucket, used by downstream
    /// date-range filters.
    #[cfg_attr(feature = "serde", serde(rename = "date"))]
    pub anchor_date: NaiveDate,
    /// Per-metric sums (rounded to the nearest integer for every
    /// granularity except [`Granularity::Day`]).
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub metrics: BTreeMap<String, f64>,
}

// ═══════════════════════════════════════════════════════════════════════════
// Bucket keys
// ═══════════════════════════════════════════════════════════════════════════

/// Structured grouping key: one variant per granularity, ordered
/// chronologically within a variant.  Used as the key of the ordered
/// grouping map, never a concatenated string.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum BucketKey {
    Day(NaiveDate),
    Week { iso_year: i32, week: u32 },
    Month { year: i32, month0: u32 },
    Quarter { year: i32, quarter: u32 },
    Year(i32),
}

impl BucketKey {
    fn of(date: NaiveDate, granularity: Granularity) -> Self {
        match granularity {
            Granularity::Day => BucketKey::Day(date),
            Granularity::Week => {
                let iso = date.iso_week();
                BucketKey::Week {
                    iso_year: iso.year(),
                    week: iso.week(),
                }
            }
            Granularity::Month => BucketKey::Month {
                year: date.year(),
                month0: date.month0(),
            },
            Granularity::Quarter => BucketKey::Quarter {
                year: date.year(),
                quarter: date.month0() / 3 + 1,
            },
            Granularity::Year => BucketKey::Year(date.year()),
        }
    }

    fn id(&self) -> String {
        match *self {
            BucketKey::Day(date) => date.format("%Y-%m-%d").to_string(),
            BucketKey::Week { iso_year, week } => format!("{iso_year}-W{week:02}"),
            BucketKey::Month { year, month0 } => format!("{year}-{:02}", month0 + 1),
            BucketKey::Quarter { year, quarter } => format!("{year}-Q{quarter}"),
            BucketKey::Year(year) => year.to_string(),
        }
    }

    /// Representative date inside the bucket.  Each granularity keeps its
    /// own convention (see the module docs).
    fn anchor_date(&self) -> NaiveDate {
        match *self {
            BucketKey::Day(date) => date,
            BucketKey::Week { iso_year, week } => {
                NaiveDate::from_isoywd_opt(iso_year, week, Weekday::Mon)
                    .expect("ISO week key out of chrono::NaiveDate representable range")
            }
            BucketKey::Month { year, month0 } => NaiveDate::from_ymd_opt(year, month0 + 1, 15)
                .expect("month key out of chrono::NaiveDate representable range"),
            // The 15th of the quarter's second month.
            BucketKey::Quarter { year, quarter } => {
                NaiveDate::from_ymd_opt(year, (quarter - 1) * 3 + 2, 15)
                    .expect("quarter key out of chrono::NaiveDate representable range")
            }
            BucketKey::Year(year) => NaiveDate::from_ymd_opt(year, 7, 1)
                .expect("year key out of chrono::NaiveDate representable range"),
        }
    }

    fn label(&self) -> String {
        match *self {
            BucketKey::Day(date) => date.format("%d %b").to_string(),
            BucketKey::Week { .. } => self.anchor_date().format("%d %b").to_string(),
            BucketKey::Month { .. } => self.anchor_date().format("%y/%b").to_string(),
            BucketKey::Quarter { .. } | BucketKey::Year(_) => self.id(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Metric rollup
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    sum: f64,
    contributions: u32,
}

/// Running per-metric sums for one bucket.
///
/// The metric-name set is fixed by the first record that opens the bucket;
/// later records only contribute to names already in the set.  Non-finite
/// values are treated as absent, so partial sums are still produced from
/// whatever finite values exist.
struct MetricSums {
    tallies: BTreeMap<String, Tally>,
}

impl MetricSums {
    fn seeded_from(metrics: &BTreeMap<String, f64>) -> Self {
        MetricSums {
            tallies: metrics
                .keys()
                .map(|name| (name.clone(), Tally::default()))
                .collect(),
        }
    }

    fn absorb(&mut self, metrics: &BTreeMap<String, f64>) {
        for (name, tally) in self.tallies.iter_mut() {
            if let Some(value) = metrics.get(name) {
                if value.is_finite() {
                    tally.sum += value;
                    tally.contributions += 1;
                }
            }
        }
    }

    /// Final rounded sums; names that never received a finite contribution
    /// are omitted rather than emitted as zero.
    fn into_rounded(self) -> BTreeMap<String, f64> {
        self.tallies
            .into_iter()
            .filter(|(_, tally)| tally.contributions > 0)
            .map(|(name, tally)| (name, tally.sum.round()))
            .collect()
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Aggregation
// ═══════════════════════════════════════════════════════════════════════════

/// Groups an ascending daily series into one bucket per `granularity`
/// period, summing metric values.
///
/// - [`Granularity::Day`] is the identity transform: one bucket per input
///   record with the metrics copied unchanged (no rounding).
/// - For every other granularity, the bucket's metric-name set comes from
///   the first record falling into the bucket; each record contributes its
///   finite values and the final sums are rounded to the nearest integer.
///   A seeded name with zero contributing records is omitted.
/// - Output is ordered by ascending anchor date.  An empty input yields an
///   empty output for any granularity.
///
/// # Examples
///
/// ```
/// use calgrid::{aggregate, DailyRecord, Granularity};
/// use chrono::NaiveDate;
///
/// let daily: Vec<DailyRecord> = (9..=15)
///     .map(|day| {
///         DailyRecord::new(NaiveDate::from_ymd_opt(2025, 6, day).unwrap())
///             .with_metric("sales", 10.0)
///     })
///     .collect();
///
/// // 2025-06-09 is a Monday, so the seven records span one ISO week.
/// let weekly = aggregate(&daily, Granularity::Week);
/// assert_eq!(weekly.len(), 1);
/// assert_eq!(weekly[0].id, "2025-W24");
/// assert_eq!(weekly[0].metrics["sales"], 70.0);
/// ```
pub fn aggregate(daily: &[DailyRecord], granularity: Granularity) -> Vec<AggregateBucket> {
    if granularity == Granularity::Day {
        return daily
            .iter()
            .map(|rec| {
                let key = BucketKey::Day(rec.date);
                AggregateBucket {
                    id: key.id(),
                    label: key.label(),
                    anchor_date: rec.date,
                    metrics: rec.metrics.clone(),
                }
            })
            .collect();
    }

    let mut buckets: BTreeMap<BucketKey, MetricSums> = BTreeMap::new();
    for rec in daily {
        let key = BucketKey::of(rec.date, granularity);
        buckets
            .entry(key)
            .or_insert_with(|| MetricSums::seeded_from(&rec.metrics))
            .absorb(&rec.metrics);
    }

    buckets
        .into_iter()
        .map(|(key, sums)| AggregateBucket {
            id: key.id(),
            label: key.label(),
            anchor_date: key.anchor_date(),
            metrics: sums.into_rounded(),
        })
        .collect()
}
