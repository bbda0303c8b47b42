mod months;
pub(crate) mod policy;
mod selection;
pub(crate) use self::months::{ActiveMonth, MonthGrid, OutOfTimeError};
pub(crate) use self::policy::{DateBlocker, PickerOptions};
pub(crate) use self::selection::{FocusedInput, Selection};
use self::months::MonthWindow;
use time::{Date, Duration, Weekday};

/// One date-picking session: the selection, the transient hover and focus
/// cursors, and the visible month window, all driven by the configured
/// options.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct DatePicker<B> {
    today: Date,
    opts: PickerOptions<B>,
    selection: Selection,
    hovered: Option<Date>,
    focused: Option<Date>,
    window: MonthWindow,
}

impl<B: DateBlocker> DatePicker<B> {
    pub(crate) fn new(today: Date, opts: PickerOptions<B>) -> DatePicker<B> {
        let selection = Selection {
            start_date: opts.start_date,
            end_date: opts.end_date,
            focused_input: opts.focused_input,
        };
        let anchor = opts
            .start_date
            .or(opts.initial_visible_month)
            .unwrap_or(today);
        let window = MonthWindow::new(opts.number_of_months, anchor, opts.first_day_of_week);
        DatePicker {
            today,
            selection,
            hovered: None,
            focused: None,
            window,
            opts,
        }
    }

    pub(crate) fn today(&self) -> Date {
        self.today
    }

    pub(crate) fn selection(&self) -> Selection {
        self.selection
    }

    pub(crate) fn active_months(&self) -> &[ActiveMonth] {
        self.window.months()
    }

    pub(crate) fn first_day_of_week(&self) -> Weekday {
        self.window.first_day_of_week()
    }

    pub(crate) fn focused_date(&self) -> Option<Date> {
        self.focused
    }

    pub(crate) fn month_grid(&mut self, month: ActiveMonth) -> &MonthGrid {
        self.window.grid(month)
    }

    // Predicates, one call per rendered day cell.

    pub(crate) fn is_date_selected(&self, date: Date) -> bool {
        match (self.selection.start_date, self.selection.end_date) {
            (Some(start), Some(end)) => start <= date && date <= end,
            _ => false,
        }
    }

    pub(crate) fn is_first_or_last_selected_date(&self, date: Date) -> bool {
        self.selection.start_date == Some(date) || self.selection.end_date == Some(date)
    }

    /// Whether the cell should be painted as unavailable: out of bounds,
    /// blocked by caller policy, or sitting inside the reserved minimum-stay
    /// window right after a pending start date.
    pub(crate) fn is_date_blocked(&self, date: Date) -> bool {
        if !self.opts.within_bounds(date) || self.opts.is_unavailable(date) {
            return true;
        }
        let min_days = i64::from(self.opts.min_booking_days.get());
        if let (Some(start), None) = (self.selection.start_date, self.selection.end_date) {
            if min_days > 1
                && !self.opts.exact_min_booking_days
                && date != start
                && !self.is_date_hovered(date)
            {
                let reserved = start
                    .next_day()
                    .zip(start.checked_add(Duration::days(min_days - 2)));
                if reserved.is_some_and(|(lo, hi)| lo <= date && date <= hi) {
                    return true;
                }
            }
        }
        false
    }

    /// Whether the cell falls inside the current hover preview.
    pub(crate) fn is_date_hovered(&self, date: Date) -> bool {
        let Some(hovered) = self.hovered else {
            return false;
        };
        let min_days = i64::from(self.opts.min_booking_days.get());
        if self.opts.exact_min_booking_days && min_days > 1 {
            return hovered
                .checked_add(Duration::days(min_days - 1))
                .is_some_and(|end| hovered <= date && date <= end)
                && !self.opts.is_unavailable(date);
        }
        if let (Some(start), None) = (self.selection.start_date, self.selection.end_date) {
            if hovered > start && start <= date && date <= hovered {
                return !self.opts.is_unavailable(date);
            }
            if hovered == start && min_days > 1 {
                return start
                    .checked_add(Duration::days(min_days - 2))
                    .is_some_and(|reach| start <= date && date <= reach);
            }
        }
        false
    }

    pub(crate) fn is_date_focused(&self, date: Date) -> bool {
        self.focused == Some(date)
    }

    // Mutators.

    pub(crate) fn on_date_select(&mut self, date: Date) {
        if let Some(t) = selection::select_date(&self.selection, date, &self.opts) {
            self.selection = t.selection;
            if t.reseed {
                self.on_date_focus(date);
            }
        }
    }

    pub(crate) fn on_date_hover(&mut self, date: Option<Date>) {
        self.hovered = date.filter(|&d| selection::accept_hover(&self.selection, d, &self.opts));
    }

    pub(crate) fn on_date_focus(&mut self, date: Date) {
        let moved_month = self
            .focused
            .map_or(true, |f| ActiveMonth::containing(f) != ActiveMonth::containing(date));
        self.focused = Some(date);
        if moved_month {
            self.window.reseed(date);
        }
    }

    pub(crate) fn on_reset_dates(&mut self) {
        self.selection = Selection::default();
        self.hovered = None;
    }

    pub(crate) fn go_to_next_months(&mut self) -> Result<(), OutOfTimeError> {
        self.shift_window(1)
    }

    pub(crate) fn go_to_previous_months(&mut self) -> Result<(), OutOfTimeError> {
        self.shift_window(-1)
    }

    pub(crate) fn go_to_next_year(&mut self, years: i32) -> Result<(), OutOfTimeError> {
        self.shift_window(self.year_delta(years))
    }

    pub(crate) fn go_to_previous_year(&mut self, years: i32) -> Result<(), OutOfTimeError> {
        self.shift_window(-self.year_delta(years))
    }

    /// Moves the keyboard cursor by a day count (±1 for left/right, ±7 for
    /// up/down).  The first press with no cursor lands on the first day of
    /// the first visible month.
    pub(crate) fn move_focus(&mut self, days: i64) {
        match self.focused {
            None => {
                if let Some(&first) = self.window.months().first() {
                    let date = first.first_day();
                    self.focused = Some(date);
                    self.window.reseed(date);
                }
            }
            Some(cursor) => {
                if let Some(next) = cursor.checked_add(Duration::days(days)) {
                    if ActiveMonth::containing(next) != ActiveMonth::containing(cursor) {
                        self.window.reseed(next);
                    }
                    self.focused = Some(next);
                }
            }
        }
    }

    /// Month delta that moves the first visible month by whole years while
    /// keeping the window the same length.
    fn year_delta(&self, years: i32) -> i32 {
        let months = i32::try_from(self.opts.number_of_months.get()).unwrap_or(i32::MAX);
        (12 * years).saturating_sub(months) + 1
    }

    fn shift_window(&mut self, delta: i32) -> Result<(), OutOfTimeError> {
        self.window.shift(delta)?;
        // Navigation buttons reprogram the window; the keyboard cursor no
        // longer matches what is on screen.
        self.focused = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::policy::NeverBlocked;
    use super::*;
    use std::num::{NonZeroU32, NonZeroUsize};
    use time::macros::date;
    use time::Month;

    fn picker() -> DatePicker<NeverBlocked> {
        DatePicker::new(date!(2024 - 03 - 15), PickerOptions::default())
    }

    fn first_visible(picker: &DatePicker<NeverBlocked>) -> (i32, Month) {
        let month = picker.active_months()[0];
        (month.year(), month.month())
    }

    #[test]
    fn test_window_seeds_around_today() {
        let picker = picker();
        assert_eq!(first_visible(&picker), (2024, Month::March));
        assert_eq!(picker.active_months().len(), 2);
    }

    #[test]
    fn test_window_seeds_around_start_date() {
        let mut opts = PickerOptions::default();
        opts.start_date = Some(date!(2024 - 06 - 10));
        opts.initial_visible_month = Some(date!(2024 - 09 - 01));
        let picker = DatePicker::new(date!(2024 - 03 - 15), opts);
        assert_eq!(first_visible(&picker), (2024, Month::June));
    }

    #[test]
    fn test_selected_range_predicates() {
        let mut picker = picker();
        picker.on_date_select(date!(2024 - 03 - 05));
        picker.on_date_select(date!(2024 - 03 - 08));
        assert!(picker.is_date_selected(date!(2024 - 03 - 05)));
        assert!(picker.is_date_selected(date!(2024 - 03 - 06)));
        assert!(picker.is_date_selected(date!(2024 - 03 - 08)));
        assert!(!picker.is_date_selected(date!(2024 - 03 - 09)));
        assert!(picker.is_first_or_last_selected_date(date!(2024 - 03 - 05)));
        assert!(picker.is_first_or_last_selected_date(date!(2024 - 03 - 08)));
        assert!(!picker.is_first_or_last_selected_date(date!(2024 - 03 - 06)));
    }

    #[test]
    fn test_reset_returns_to_empty_start_focus() {
        let mut picker = picker();
        picker.on_date_select(date!(2024 - 03 - 05));
        picker.on_date_select(date!(2024 - 03 - 08));
        picker.on_reset_dates();
        assert_eq!(picker.selection(), Selection::default());
    }

    #[test]
    fn test_reserved_minimum_stay_window_paints_blocked() {
        let mut opts = PickerOptions::default();
        opts.min_booking_days = NonZeroU32::new(4).unwrap();
        let mut picker = DatePicker::new(date!(2024 - 03 - 15), opts);
        picker.on_date_select(date!(2024 - 03 - 05));
        assert!(!picker.is_date_blocked(date!(2024 - 03 - 05)));
        assert!(picker.is_date_blocked(date!(2024 - 03 - 06)));
        assert!(picker.is_date_blocked(date!(2024 - 03 - 07)));
        // First date that can complete the four-day minimum.
        assert!(!picker.is_date_blocked(date!(2024 - 03 - 08)));
    }

    #[test]
    fn test_hover_preview_paints_span() {
        let mut picker = picker();
        picker.on_date_select(date!(2024 - 03 - 05));
        picker.on_date_hover(Some(date!(2024 - 03 - 08)));
        assert!(picker.is_date_hovered(date!(2024 - 03 - 05)));
        assert!(picker.is_date_hovered(date!(2024 - 03 - 07)));
        assert!(picker.is_date_hovered(date!(2024 - 03 - 08)));
        assert!(!picker.is_date_hovered(date!(2024 - 03 - 09)));
    }

    #[test]
    fn test_hover_before_start_paints_nothing() {
        let mut picker = picker();
        picker.on_date_select(date!(2024 - 03 - 10));
        picker.on_date_hover(Some(date!(2024 - 03 - 04)));
        for day in 1..=15 {
            let date = Date::from_calendar_date(2024, Month::March, day).unwrap();
            assert!(!picker.is_date_hovered(date), "day {day} must not preview");
        }
    }

    #[test]
    fn test_first_arrow_press_focuses_first_visible_day() {
        let mut picker = picker();
        picker.move_focus(7);
        assert_eq!(picker.focused_date(), Some(date!(2024 - 03 - 01)));
    }

    #[test]
    fn test_focus_movement_reseeds_on_month_change() {
        let mut picker = picker();
        picker.move_focus(-1);
        picker.move_focus(-1);
        assert_eq!(picker.focused_date(), Some(date!(2024 - 02 - 29)));
        assert_eq!(first_visible(&picker), (2024, Month::February));
    }

    #[test]
    fn test_month_navigation_clears_focus() {
        let mut picker = picker();
        picker.move_focus(1);
        picker.go_to_next_months().unwrap();
        assert_eq!(picker.focused_date(), None);
        assert_eq!(first_visible(&picker), (2024, Month::May));
    }

    #[test]
    fn test_year_navigation_round_trip() {
        let mut picker = picker();
        picker.go_to_next_year(1).unwrap();
        assert_eq!(first_visible(&picker), (2025, Month::March));
        picker.go_to_previous_year(1).unwrap();
        assert_eq!(first_visible(&picker), (2024, Month::March));
    }

    #[test]
    fn test_start_pick_reseeds_window_but_end_pick_does_not() {
        let mut opts = PickerOptions::default();
        opts.number_of_months = NonZeroUsize::new(1).unwrap();
        let mut picker = DatePicker::new(date!(2024 - 03 - 15), opts);
        picker.on_date_select(date!(2024 - 06 - 10));
        assert_eq!(first_visible(&picker), (2024, Month::June));
        // Completing the range in a later month must not move the window.
        picker.on_date_select(date!(2024 - 07 - 02));
        assert_eq!(first_visible(&picker), (2024, Month::June));
        assert_eq!(
            picker.selection().end_date,
            Some(date!(2024 - 07 - 02))
        );
    }
}
