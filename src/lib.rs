// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Calendar Primitives
//!
//! Pure, framework-free building blocks for calendar-centric analytics UIs:
//! month grids, fiscal-year sequencing, date-interval overlays, and
//! temporal aggregation of daily metric series.
//!
//! # Core types
//!
//! - [`MonthGrid`] — fixed 42-cell (6 × 7, Sunday-first) view of one month.
//! - [`DayCell`] — one grid position, tagged with month membership.
//! - [`FiscalYearConfig`] / [`MonthSlot`] — fiscal-year month sequencing.
//! - [`DateInterval<M>`] — closed calendar-day interval with caller metadata.
//! - [`DailyRecord`] / [`AggregateBucket`] — temporal aggregation in/out.
//! - [`Granularity`] — day / week / month / quarter / year bucket sizes.
//!
//! # Operations
//!
//! | Function | Purpose |
//! |----------|---------|
//! | [`MonthGrid::build`] | 42-cell grid with neighbor-month padding |
//! | [`fiscal_year_sequence`] | 12 `(month, year)` slots from a start month |
//! | [`overlays_for_date`] | order-preserving interval matches for a date |
//! | [`aggregate`] | bucket + sum a daily series at a granularity |
//!
//! Everything is a pure, synchronous function over immutable inputs: no
//! shared state, no I/O, no locks.  Concurrent calls on disjoint inputs
//! need no coordination.
//!
//! # Typical flow
//!
//! ```
//! use calgrid::{overlays_for_date, DateInterval, MonthGrid};
//! use chrono::NaiveDate;
//!
//! let grid = MonthGrid::build(2025, 0); // January 2025
//! let promos = vec![DateInterval::new(
//!     NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
//!     NaiveDate::from_ymd_opt(2025, 1, 12).unwrap(),
//!     "winter-sale",
//! )];
//!
//! let highlighted = grid
//!     .dates()
//!     .zip(grid.cells())
//!     .filter(|(_, cell)| cell.in_current_month)
//!     .filter(|(date, _)| !overlays_for_date(*date, &promos).is_empty())
//!     .count();
//! assert_eq!(highlighted, 3);
//! ```
//!
//! # Serde
//!
//! With the optional `serde` cargo feature the data types serialize for the
//! consuming UI layers; [`AggregateBucket`] in particular serializes in the
//! chart-record shape `{"id", "name", "date", ...metrics}`.

mod aggregate;
mod grid;
mod overlay;

// ── Re-exports ────────────────────────────────────────────────────────────

pub use aggregate::{aggregate, AggregateBucket, DailyRecord, Granularity};
pub use grid::{
    days_in_month, fiscal_year_sequence, is_leap_year, DayCell, FiscalYearConfig, MonthGrid,
    MonthSlot,
};
pub use overlay::{overlays_for_date, DateInterval};
