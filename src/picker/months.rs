use std::collections::HashMap;
use std::num::NonZeroUsize;
use thiserror::Error;
use time::{util::days_in_month, Date, Month, Weekday};

const DAYS_IN_WEEK: u8 = 7;

/// One visible calendar page, anchored at the first day of its month.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct ActiveMonth {
    first: Date,
}

impl ActiveMonth {
    pub(crate) fn containing(date: Date) -> ActiveMonth {
        // Day 1 exists in every month, so replace_day(1) cannot fail.
        ActiveMonth {
            first: date.replace_day(1).unwrap_or(date),
        }
    }

    pub(crate) fn year(self) -> i32 {
        self.first.year()
    }

    pub(crate) fn month(self) -> Month {
        self.first.month()
    }

    pub(crate) fn first_day(self) -> Date {
        self.first
    }

    /// Returns `None` when the result falls outside the calendar the `time`
    /// crate can represent.
    pub(crate) fn checked_add_months(self, delta: i32) -> Option<ActiveMonth> {
        let index = i64::from(self.year()) * 12 + i64::from(u8::from(self.month())) - 1;
        let index = index.checked_add(i64::from(delta))?;
        let year = i32::try_from(index.div_euclid(12)).ok()?;
        let month = Month::try_from(u8::try_from(index.rem_euclid(12) + 1).ok()?).ok()?;
        Date::from_calendar_date(year, month, 1)
            .ok()
            .map(|first| ActiveMonth { first })
    }
}

/// The day cells of one month, aligned under weekday columns: leading `None`
/// cells pad day 1 over to its weekday, and trailing `None` cells fill out
/// the last week.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct MonthGrid {
    cells: Vec<Option<Date>>,
}

impl MonthGrid {
    fn build(month: ActiveMonth, first_day_of_week: Weekday) -> MonthGrid {
        let first = month.first_day();
        let blanks = weekday_column(first.weekday(), first_day_of_week);
        let length = days_in_month(month.month(), month.year());
        let mut cells = Vec::with_capacity(42);
        cells.resize(usize::from(blanks), None);
        let mut day = Some(first);
        for _ in 0..length {
            cells.push(day);
            day = day.and_then(Date::next_day);
        }
        while cells.len() % usize::from(DAYS_IN_WEEK) != 0 {
            cells.push(None);
        }
        MonthGrid { cells }
    }

    pub(crate) fn weeks(&self) -> impl Iterator<Item = &[Option<Date>]> {
        self.cells.chunks(DAYS_IN_WEEK.into())
    }
}

/// Zero-based column of `weekday` in a week that starts on `first_day_of_week`.
fn weekday_column(weekday: Weekday, first_day_of_week: Weekday) -> u8 {
    (weekday.number_days_from_monday() + DAYS_IN_WEEK
        - first_day_of_week.number_days_from_monday())
        % DAYS_IN_WEEK
}

/// The ordered set of consecutive months currently on screen.  Always holds
/// exactly the configured number of months; navigation that would run off
/// either end of the representable calendar fails without changing the
/// window.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct MonthWindow {
    months: Vec<ActiveMonth>,
    first_day_of_week: Weekday,
    grids: HashMap<(i32, u8), MonthGrid>,
}

impl MonthWindow {
    pub(crate) fn new(
        month_qty: NonZeroUsize,
        anchor: Date,
        first_day_of_week: Weekday,
    ) -> MonthWindow {
        let mut first = ActiveMonth::containing(anchor);
        let months = loop {
            if let Some(months) = consecutive(first, month_qty) {
                break months;
            }
            // Anchored too close to the end of the calendar; slide the
            // window back until it fits.
            match first.checked_add_months(-1) {
                Some(prev) => first = prev,
                None => break vec![first],
            }
        };
        MonthWindow {
            months,
            first_day_of_week,
            grids: HashMap::new(),
        }
    }

    pub(crate) fn months(&self) -> &[ActiveMonth] {
        &self.months
    }

    pub(crate) fn first_day_of_week(&self) -> Weekday {
        self.first_day_of_week
    }

    /// Rebuilds the window so that `anchor`'s month is the first visible one.
    pub(crate) fn reseed(&mut self, anchor: Date) {
        let month_qty = NonZeroUsize::new(self.months.len()).unwrap_or(NonZeroUsize::MIN);
        let seeded = MonthWindow::new(month_qty, anchor, self.first_day_of_week);
        self.months = seeded.months;
    }

    /// Shifts the window by `delta` months.  Forward shifts are anchored at
    /// the last visible month and backward shifts at the first, which makes
    /// a shift by `-delta` undo a shift by `delta` exactly.
    pub(crate) fn shift(&mut self, delta: i32) -> Result<(), OutOfTimeError> {
        let Some(month_qty) = NonZeroUsize::new(self.months.len()) else {
            return Ok(());
        };
        let span = i32::try_from(month_qty.get()).unwrap_or(i32::MAX);
        let first = if delta > 0 {
            self.months.last().and_then(|m| m.checked_add_months(delta))
        } else {
            self.months
                .first()
                .and_then(|m| m.checked_add_months(delta))
                .and_then(|m| m.checked_add_months(1 - span))
        };
        let months = first.and_then(|first| consecutive(first, month_qty));
        match months {
            Some(months) => {
                self.months = months;
                Ok(())
            }
            None => Err(OutOfTimeError),
        }
    }

    /// The day grid for one visible month, computed on first use and reused
    /// thereafter.  The first day of the week is fixed per window, so the
    /// `(year, month)` pair fully keys the cache.
    pub(crate) fn grid(&mut self, month: ActiveMonth) -> &MonthGrid {
        self.grids
            .entry((month.year(), u8::from(month.month())))
            .or_insert_with(|| MonthGrid::build(month, self.first_day_of_week))
    }
}

fn consecutive(first: ActiveMonth, month_qty: NonZeroUsize) -> Option<Vec<ActiveMonth>> {
    (0..month_qty.get())
        .map(|i| {
            i32::try_from(i)
                .ok()
                .and_then(|i| first.checked_add_months(i))
        })
        .collect()
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("reached the end of the calendar")]
pub(crate) struct OutOfTimeError;

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn qty(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn window_months(window: &MonthWindow) -> Vec<(i32, Month)> {
        window.months().iter().map(|m| (m.year(), m.month())).collect()
    }

    #[test]
    fn test_seed_from_mid_month() {
        let window = MonthWindow::new(qty(2), date!(2024 - 11 - 15), Weekday::Monday);
        assert_eq!(
            window_months(&window),
            vec![(2024, Month::November), (2024, Month::December)]
        );
    }

    #[test]
    fn test_shift_forward_pages_past_window() {
        let mut window = MonthWindow::new(qty(2), date!(2024 - 11 - 15), Weekday::Monday);
        window.shift(1).unwrap();
        assert_eq!(
            window_months(&window),
            vec![(2025, Month::January), (2025, Month::February)]
        );
    }

    #[test]
    fn test_shift_is_invertible() {
        let mut window = MonthWindow::new(qty(3), date!(2024 - 11 - 15), Weekday::Monday);
        let before = window_months(&window);
        window.shift(1).unwrap();
        window.shift(-1).unwrap();
        assert_eq!(window_months(&window), before);
    }

    #[test]
    fn test_year_delta_lands_on_same_month() {
        // The year jump used by the picker: 12 * years - number_of_months + 1.
        let mut window = MonthWindow::new(qty(2), date!(2024 - 11 - 15), Weekday::Monday);
        window.shift(12 - 2 + 1).unwrap();
        assert_eq!(
            window_months(&window),
            vec![(2025, Month::November), (2025, Month::December)]
        );
        window.shift(-(12 - 2 + 1)).unwrap();
        assert_eq!(
            window_months(&window),
            vec![(2024, Month::November), (2024, Month::December)]
        );
    }

    #[test]
    fn test_shift_off_the_calendar_fails_and_leaves_window() {
        let mut window = MonthWindow::new(qty(2), date!(9999 - 10 - 01), Weekday::Monday);
        let before = window_months(&window);
        assert_eq!(window.shift(1), Err(OutOfTimeError));
        assert_eq!(window_months(&window), before);
    }

    #[test]
    fn test_reseed_moves_first_month() {
        let mut window = MonthWindow::new(qty(2), date!(2024 - 11 - 15), Weekday::Monday);
        window.reseed(date!(2031 - 06 - 07));
        assert_eq!(
            window_months(&window),
            vec![(2031, Month::June), (2031, Month::July)]
        );
    }

    #[test]
    fn test_checked_add_months_across_year() {
        let month = ActiveMonth::containing(date!(2024 - 11 - 15));
        let next = month.checked_add_months(2).unwrap();
        assert_eq!((next.year(), next.month()), (2025, Month::January));
        let prev = month.checked_add_months(-11).unwrap();
        assert_eq!((prev.year(), prev.month()), (2023, Month::December));
    }

    #[test]
    fn test_grid_alignment_week_starts_monday() {
        // 2023-11-01 was a Wednesday.
        let mut window = MonthWindow::new(qty(1), date!(2023 - 11 - 01), Weekday::Monday);
        let month = window.months()[0];
        let grid = window.grid(month).clone();
        let weeks = grid.weeks().collect::<Vec<_>>();
        assert_eq!(weeks.len(), 5);
        assert_eq!(weeks[0][0], None);
        assert_eq!(weeks[0][1], None);
        assert_eq!(weeks[0][2], Some(date!(2023 - 11 - 01)));
        assert_eq!(weeks[4][3], Some(date!(2023 - 11 - 30)));
        assert_eq!(weeks[4][4], None);
    }

    #[test]
    fn test_grid_alignment_week_starts_sunday() {
        let mut window = MonthWindow::new(qty(1), date!(2023 - 11 - 01), Weekday::Sunday);
        let month = window.months()[0];
        let grid = window.grid(month).clone();
        let weeks = grid.weeks().collect::<Vec<_>>();
        assert_eq!(weeks[0][3], Some(date!(2023 - 11 - 01)));
    }
}
