// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Month-grid construction and fiscal-year sequencing.
//!
//! This module provides:
//! - [`MonthGrid`]: a fixed 42-cell (6 × 7, Sunday-first) view of one month,
//!   padded with the trailing days of the previous month and the leading
//!   days of the next.
//! - [`DayCell`]: one grid position.
//! - [`fiscal_year_sequence`]: the 12 `(month, year)` slots of a fiscal year
//!   that starts on an arbitrary month.
//! - [`is_leap_year`] / [`days_in_month`]: Gregorian calendar helpers.
//!
//! Months are indexed **0-based** throughout (January = 0), matching
//! chrono's `month0` accessor.

use chrono::{Datelike, Duration, NaiveDate};
use std::fmt;
use std::ops::Index;

#[cfg(feature = "serde")]
use serde::{ser::SerializeStruct, Deserialize, Serialize, Serializer};

const GRID_CELLS: usize = 42;

/// Returns `true` if `year` is a Gregorian leap year.
///
/// A year is a leap year iff it is divisible by 4 and either not divisible
/// by 100 or divisible by 400.
///
/// # Examples
///
/// ```
/// use calgrid::is_leap_year;
///
/// assert!(is_leap_year(2024));
/// assert!(is_leap_year(2000));
/// assert!(!is_leap_year(2023));
/// assert!(!is_leap_year(1900));
/// ```
#[inline]
pub const fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Number of days in the given month (0-based index, January = 0).
///
/// February reports 29 days in leap years and 28 otherwise.
///
/// # Panics
///
/// Panics if `month0 >= 12`.
///
/// # Examples
///
/// ```
/// use calgrid::days_in_month;
///
/// assert_eq!(days_in_month(2024, 1), 29); // February, leap year
/// assert_eq!(days_in_month(2023, 1), 28);
/// assert_eq!(days_in_month(2025, 0), 31); // January
/// assert_eq!(days_in_month(2025, 3), 30); // April
/// ```
pub const fn days_in_month(year: i32, month0: u32) -> u32 {
    assert!(month0 < 12, "month index out of range (expected 0..=11)");
    match month0 {
        0 | 2 | 4 | 6 | 7 | 9 | 11 => 31,
        3 | 5 | 8 | 10 => 30,
        _ => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

/// One position of a [`MonthGrid`].
///
/// `day` is the day-of-month in whichever month the cell actually belongs
/// to (current, previous, or next) — not necessarily the displayed month.
/// Cells are rebuilt on every grid build and never mutated.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DayCell {
    /// Day-of-month, `1..=31`.
    pub day: u32,
    /// `true` when the cell belongs to the displayed month, `false` for
    /// the padding days of the neighboring months.
    pub in_current_month: bool,
}

/// A 42-cell (6 rows × 7 columns, Sunday-first) calendar view of one month.
///
/// The first `leading()` cells are the last days of the previous month, the
/// next `current()` cells are days `1..=days_in_month` of the displayed
/// month, and the remaining `trailing()` cells are the first days of the
/// next month.  `leading() + current() + trailing() == 42` always holds.
///
/// The grid remembers which `(year, month)` it was built for, so every cell
/// index can be resolved back to a concrete calendar date with
/// [`date_at`](MonthGrid::date_at) — this is what overlay-querying callers
/// use to decorate cells.
///
/// # Examples
///
/// ```
/// use calgrid::MonthGrid;
///
/// // March 2025 starts on a Saturday, so six February days lead the grid.
/// let grid = MonthGrid::build(2025, 2);
/// assert_eq!(grid.cells().len(), 42);
/// assert_eq!(grid.leading(), 6);
/// assert_eq!(grid.current(), 31);
/// assert_eq!(grid[0].day, 23);
/// assert!(!grid[0].in_current_month);
/// assert!(grid[6].in_current_month);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthGrid {
    year: i32,
    month0: u32,
    leading: u32,
    cells: [DayCell; GRID_CELLS],
}

impl MonthGrid {
    /// Total number of grid cells.
    pub const CELLS: usize = GRID_CELLS;
    /// Number of week rows.
    pub const ROWS: usize = 6;
    /// Number of weekday columns (Sunday-first).
    pub const COLS: usize = 7;

    /// Builds the grid for the given month (0-based index, January = 0).
    ///
    /// Leading cells are the last days of the previous month (January wraps
    /// to December of `year - 1`); trailing cells are days `1..` of the next
    /// month (December wraps to January of `year + 1`).
    ///
    /// # Panics
    ///
    /// Panics if `month0 >= 12`.  Out-of-range input is rejected at the
    /// boundary rather than silently wrapped.
    pub fn build(year: i32, month0: u32) -> Self {
        assert!(month0 < 12, "month index out of range (expected 0..=11)");

        let first = NaiveDate::from_ymd_opt(year, month0 + 1, 1)
            .expect("first of month out of chrono::NaiveDate representable range");
        let leading = first.weekday().num_days_from_sunday();
        let in_month = days_in_month(year, month0);
        let prev_days = match month0 {
            0 => days_in_month(year - 1, 11),
            m => days_in_month(year, m - 1),
        };

        let cells = std::array::from_fn(|i| {
            let i = i as u32;
            if i < leading {
                DayCell {
                    day: prev_days - leading + 1 + i,
                    in_current_month: false,
                }
            } else if i < leading + in_month {
                DayCell {
                    day: i - leading + 1,
                    in_current_month: true,
                }
            } else {
                DayCell {
                    day: i - leading - in_month + 1,
                    in_current_month: false,
                }
            }
        });

        MonthGrid {
            year,
            month0,
            leading,
            cells,
        }
    }

    /// The year this grid displays.
    #[inline]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// The month this grid displays (0-based, January = 0).
    #[inline]
    pub const fn month0(&self) -> u32 {
        self.month0
    }

    /// All 42 cells in row-major order.
    #[inline]
    pub const fn cells(&self) -> &[DayCell; Self::CELLS] {
        &self.cells
    }

    /// Number of leading previous-month cells.
    #[inline]
    pub const fn leading(&self) -> usize {
        self.leading as usize
    }

    /// Number of displayed-month cells (the month's day count).
    #[inline]
    pub fn current(&self) -> usize {
        days_in_month(self.year, self.month0) as usize
    }

    /// Number of trailing next-month cells.
    #[inline]
    pub fn trailing(&self) -> usize {
        Self::CELLS - self.leading() - self.current()
    }

    /// Resolves a cell index (`0..42`) to the concrete calendar date the
    /// cell represents, crossing month boundaries as needed.
    ///
    /// # Examples
    ///
    /// ```
    /// use calgrid::MonthGrid;
    /// use chrono::NaiveDate;
    ///
    /// let grid = MonthGrid::build(2025, 2); // March 2025
    /// assert_eq!(grid.date_at(0), NaiveDate::from_ymd_opt(2025, 2, 23).unwrap());
    /// assert_eq!(grid.date_at(6), NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
    /// ```
    ///
    /// # Panics
    ///
    /// Panics if `index >= 42`.
    pub fn date_at(&self, index: usize) -> NaiveDate {
        assert!(index < Self::CELLS, "cell index out of range");
        let first = NaiveDate::from_ymd_opt(self.year, self.month0 + 1, 1)
            .expect("first of month out of chrono::NaiveDate representable range");
        first + Duration::days(index as i64 - self.leading as i64)
    }

    /// Iterator over the concrete dates of all 42 cells, in grid order.
    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        (0..Self::CELLS).map(|i| self.date_at(i))
    }

    /// Iterator over the six week rows, each a 7-cell slice.
    pub fn weeks(&self) -> impl Iterator<Item = &[DayCell]> {
        self.cells.chunks_exact(Self::COLS)
    }
}

impl Index<usize> for MonthGrid {
    type Output = DayCell;

    #[inline]
    fn index(&self, index: usize) -> &DayCell {
        &self.cells[index]
    }
}

impl<'a> IntoIterator for &'a MonthGrid {
    type Item = &'a DayCell;
    type IntoIter = std::slice::Iter<'a, DayCell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

impl fmt::Display for MonthGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:04}-{:02}", self.year, self.month0 + 1)?;
        for week in self.weeks() {
            for cell in week {
                if cell.in_current_month {
                    write!(f, " {:>2} ", cell.day)?;
                } else {
                    write!(f, "({:>2})", cell.day)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
impl Serialize for MonthGrid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut s = serializer.serialize_struct("MonthGrid", 3)?;
        s.serialize_field("year", &self.year)?;
        s.serialize_field("month", &self.month0)?;
        s.serialize_field("cells", &self.cells[..])?;
        s.end()
    }
}

/// Fiscal-year configuration: the 0-based month the fiscal year starts on.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FiscalYearConfig {
    /// First month of the fiscal year, `0..=11` (January = 0).
    pub start_month0: u32,
}

/// One slot of a fiscal-year sequence: a concrete `(month, year)` pair.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MonthSlot {
    /// Month index, `0..=11` (January = 0).
    pub month0: u32,
    /// Calendar year the month falls in.
    pub year: i32,
}

/// Produces the 12 `(month, year)` slots of the fiscal year anchored at
/// `anchor_year`.
///
/// The sequence starts at `(config.start_month0, anchor_year)` and advances
/// month by month; months that wrap past December carry `anchor_year + 1`.
/// The function holds no iteration state — callers feed each slot into
/// [`MonthGrid::build`] themselves.
///
/// # Panics
///
/// Panics if `config.start_month0 >= 12`.
///
/// # Examples
///
/// ```
/// use calgrid::{fiscal_year_sequence, FiscalYearConfig, MonthSlot};
///
/// // Fiscal year starting in April 2025 runs through March 2026.
/// let seq = fiscal_year_sequence(FiscalYearConfig { start_month0: 3 }, 2025);
/// assert_eq!(seq[0], MonthSlot { month0: 3, year: 2025 });
/// assert_eq!(seq[8], MonthSlot { month0: 11, year: 2025 });
/// assert_eq!(seq[9], MonthSlot { month0: 0, year: 2026 });
/// assert_eq!(seq[11], MonthSlot { month0: 2, year: 2026 });
/// ```
pub fn fiscal_year_sequence(config: FiscalYearConfig, anchor_year: i32) -> [MonthSlot; 12] {
    assert!(
        config.start_month0 < 12,
        "fiscal start month out of range (expected 0..=11)"
    );
    std::array::from_fn(|i| {
        let month0 = (config.start_month0 + i as u32) % 12;
        let year = if month0 < config.start_month0 {
            anchor_year + 1
        } else {
            anchor_year
        };
        MonthSlot { month0, year }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn current_flags(grid: &MonthGrid) -> Vec<bool> {
        grid.cells().iter().map(|c| c.in_current_month).collect()
    }

    #[test]
    fn test_grid_always_has_42_cells() {
        for year in [1999, 2000, 2023, 2024, 2025] {
            for month0 in 0..12 {
                let grid = MonthGrid::build(year, month0);
                assert_eq!(grid.cells().len(), 42);
                assert_eq!(
                    grid.leading() + grid.current() + grid.trailing(),
                    42,
                    "{year}-{month0}"
                );
            }
        }
    }

    #[test]
    fn test_current_cell_count_matches_days_in_month() {
        let feb_leap = MonthGrid::build(2024, 1);
        assert_eq!(current_flags(&feb_leap).iter().filter(|f| **f).count(), 29);

        let feb_common = MonthGrid::build(2023, 1);
        assert_eq!(
            current_flags(&feb_common).iter().filter(|f| **f).count(),
            28
        );
    }

    #[test]
    fn test_current_flags_form_single_contiguous_run() {
        for year in [2023, 2024, 2025] {
            for month0 in 0..12 {
                let flags = current_flags(&MonthGrid::build(year, month0));
                let transitions = flags.windows(2).filter(|w| w[0] != w[1]).count();
                // false* true* false* has at most two flips, and the true
                // run is never empty.
                assert!(transitions <= 2, "{year}-{month0}: {flags:?}");
                assert!(flags.contains(&true));
                let first_true = flags.iter().position(|f| *f).unwrap();
                let last_true = flags.iter().rposition(|f| *f).unwrap();
                assert!(flags[first_true..=last_true].iter().all(|f| *f));
            }
        }
    }

    #[test]
    fn test_march_2025_leading_cells_are_late_february() {
        // 2025-03-01 is a Saturday: six leading cells, Feb 23..28.
        let grid = MonthGrid::build(2025, 2);
        assert_eq!(grid.leading(), 6);
        let days: Vec<u32> = grid.cells()[..6].iter().map(|c| c.day).collect();
        assert_eq!(days, vec![23, 24, 25, 26, 27, 28]);
        assert!(grid.cells()[..6].iter().all(|c| !c.in_current_month));
        assert_eq!(grid[6].day, 1);
        assert!(grid[6].in_current_month);
    }

    #[test]
    fn test_january_leading_cells_wrap_to_previous_december() {
        // 2025-01-01 is a Wednesday: three leading cells, Dec 29..31 2024.
        let grid = MonthGrid::build(2025, 0);
        assert_eq!(grid.leading(), 3);
        let days: Vec<u32> = grid.cells()[..3].iter().map(|c| c.day).collect();
        assert_eq!(days, vec![29, 30, 31]);
        assert_eq!(
            grid.date_at(0),
            NaiveDate::from_ymd_opt(2024, 12, 29).unwrap()
        );
    }

    #[test]
    fn test_december_trailing_cells_wrap_to_next_january() {
        // 2025-12-01 is a Monday: one leading cell, ten trailing cells.
        let grid = MonthGrid::build(2025, 11);
        assert_eq!(grid.leading(), 1);
        assert_eq!(grid.trailing(), 10);
        assert_eq!(grid[41].day, 10);
        assert!(!grid[41].in_current_month);
        assert_eq!(
            grid.date_at(41),
            NaiveDate::from_ymd_opt(2026, 1, 10).unwrap()
        );
    }

    #[test]
    fn test_month_starting_on_sunday_has_no_leading_cells() {
        // 2025-06-01 is a Sunday.
        let grid = MonthGrid::build(2025, 5);
        assert_eq!(grid.leading(), 0);
        assert!(grid[0].in_current_month);
        assert_eq!(grid[0].day, 1);
        assert_eq!(grid.trailing(), 12);
    }

    #[test]
    fn test_date_at_is_continuous() {
        let grid = MonthGrid::build(2024, 1); // leap February
        let base = grid.date_at(0);
        for i in 0..MonthGrid::CELLS {
            assert_eq!(grid.date_at(i), base + Duration::days(i as i64));
        }
    }

    #[test]
    fn test_dates_match_cell_days() {
        let grid = MonthGrid::build(2025, 7); // August
        for (cell, date) in grid.into_iter().zip(grid.dates()) {
            assert_eq!(cell.day, date.day());
            assert_eq!(cell.in_current_month, date.month0() == 7);
        }
    }

    #[test]
    fn test_weeks_yields_six_rows_of_seven() {
        let grid = MonthGrid::build(2025, 0);
        let rows: Vec<&[DayCell]> = grid.weeks().collect();
        assert_eq!(rows.len(), 6);
        assert!(rows.iter().all(|r| r.len() == 7));
    }

    #[test]
    #[should_panic(expected = "month index out of range")]
    fn test_month_out_of_range_is_rejected() {
        MonthGrid::build(2025, 12);
    }

    #[test]
    fn test_fiscal_sequence_february_start_rolls_january() {
        let seq = fiscal_year_sequence(FiscalYearConfig { start_month0: 1 }, 2025);
        assert_eq!(seq.len(), 12);
        assert_eq!(seq[0], MonthSlot { month0: 1, year: 2025 });
        assert_eq!(
            seq[10],
            MonthSlot {
                month0: 11,
                year: 2025
            }
        );
        assert_eq!(seq[11], MonthSlot { month0: 0, year: 2026 });
    }

    #[test]
    fn test_fiscal_sequence_january_start_stays_in_anchor_year() {
        let seq = fiscal_year_sequence(FiscalYearConfig { start_month0: 0 }, 2030);
        assert!(seq.iter().all(|slot| slot.year == 2030));
        let months: Vec<u32> = seq.iter().map(|slot| slot.month0).collect();
        assert_eq!(months, (0..12).collect::<Vec<u32>>());
    }

    #[test]
    #[should_panic(expected = "fiscal start month out of range")]
    fn test_fiscal_start_out_of_range_is_rejected() {
        fiscal_year_sequence(FiscalYearConfig { start_month0: 12 }, 2025);
    }

    #[test]
    fn test_display_marks_neighbor_days() {
        let rendered = format!("{}", MonthGrid::build(2025, 2));
        assert!(rendered.starts_with("2025-03"));
        assert!(rendered.contains("(23)"));
        assert!(rendered.contains(" 31 "));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_grid_serializes_cells() {
        let grid = MonthGrid::build(2025, 2);
        let json = serde_json::to_string(&grid).unwrap();
        assert!(json.contains("\"year\":2025"));
        assert!(json.contains("\"month\":2"));
        assert!(json.contains("\"in_current_month\""));
    }
}
