use super::selection::FocusedInput;
use std::collections::BTreeSet;
use std::iter::successors;
use std::num::{NonZeroU32, NonZeroUsize};
use time::{Date, Duration, Weekday};

/// Caller-supplied availability policy.  Dates for which this returns `true`
/// can never be picked or included in a range.  Implementations must be pure;
/// the picker may call this many times per rendered frame.
pub(crate) trait DateBlocker {
    fn is_blocked(&self, date: Date) -> bool;
}

/// The default blocker: every date is available.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct NeverBlocked;

impl DateBlocker for NeverBlocked {
    fn is_blocked(&self, _date: Date) -> bool {
        false
    }
}

/// Everything configurable about a picker, fixed for the lifetime of the
/// selection session.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct PickerOptions<B> {
    pub(crate) start_date: Option<Date>,
    pub(crate) end_date: Option<Date>,
    pub(crate) focused_input: Option<FocusedInput>,
    pub(crate) min_booking_date: Option<Date>,
    pub(crate) max_booking_date: Option<Date>,
    pub(crate) number_of_months: NonZeroUsize,
    pub(crate) min_booking_days: NonZeroU32,
    pub(crate) exact_min_booking_days: bool,
    pub(crate) first_day_of_week: Weekday,
    pub(crate) initial_visible_month: Option<Date>,
    pub(crate) unavailable_dates: BTreeSet<Date>,
    pub(crate) blocker: B,
}

impl<B: DateBlocker> PickerOptions<B> {
    pub(crate) fn new(blocker: B) -> PickerOptions<B> {
        PickerOptions {
            start_date: None,
            end_date: None,
            focused_input: Some(FocusedInput::StartDate),
            min_booking_date: None,
            max_booking_date: None,
            number_of_months: NonZeroUsize::MIN.saturating_add(1),
            min_booking_days: NonZeroU32::MIN,
            exact_min_booking_days: false,
            first_day_of_week: Weekday::Monday,
            initial_visible_month: None,
            unavailable_dates: BTreeSet::new(),
            blocker,
        }
    }

    /// Whether the date is blocked by caller policy (unavailable list or
    /// blocker predicate).  Min/max bounds are a separate concern.
    pub(crate) fn is_unavailable(&self, date: Date) -> bool {
        self.unavailable_dates.contains(&date) || self.blocker.is_blocked(date)
    }

    pub(crate) fn within_bounds(&self, date: Date) -> bool {
        !self.min_booking_date.is_some_and(|min| date < min)
            && !self.max_booking_date.is_some_and(|max| date > max)
    }

    /// Whether a booking may span `[start, end]`.  `end = None` means "an
    /// open range of minimum length starting at `start`": the dates the
    /// minimum stay will need must be free, but no end commitment is made
    /// yet.
    pub(crate) fn can_select_range(&self, start: Date, end: Option<Date>) -> bool {
        if self.min_booking_date.is_some_and(|min| start < min) {
            return false;
        }
        let min_days = i64::from(self.min_booking_days.get());
        match end {
            Some(end) => {
                if self.max_booking_date.is_some_and(|max| end > max) {
                    return false;
                }
                let Some(min_end) = start.checked_add(Duration::days(min_days - 1)) else {
                    return false;
                };
                end >= min_end && date_span(start, end).all(|d| !self.is_unavailable(d))
            }
            None => {
                let Some(reach) = start.checked_add(Duration::days((min_days - 2).max(0))) else {
                    return false;
                };
                date_span(start, reach).all(|d| !self.is_unavailable(d))
            }
        }
    }
}

impl Default for PickerOptions<NeverBlocked> {
    fn default() -> PickerOptions<NeverBlocked> {
        PickerOptions::new(NeverBlocked)
    }
}

/// All dates from `start` through `end`, inclusive.  Empty if `end < start`.
pub(crate) fn date_span(start: Date, end: Date) -> impl Iterator<Item = Date> {
    successors(Some(start), |&d| d.next_day()).take_while(move |&d| d <= end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_date_span() {
        let dates = date_span(date!(2024 - 01 - 30), date!(2024 - 02 - 02)).collect::<Vec<_>>();
        assert_eq!(
            dates,
            vec![
                date!(2024 - 01 - 30),
                date!(2024 - 01 - 31),
                date!(2024 - 02 - 01),
                date!(2024 - 02 - 02),
            ]
        );
    }

    #[test]
    fn test_date_span_backwards_is_empty() {
        assert_eq!(
            date_span(date!(2024 - 02 - 02), date!(2024 - 01 - 30)).count(),
            0
        );
    }

    #[test]
    fn test_closed_range_selectable() {
        let opts = PickerOptions::default();
        assert!(opts.can_select_range(date!(2024 - 01 - 10), Some(date!(2024 - 01 - 15))));
    }

    #[test]
    fn test_closed_range_rejects_unavailable_interior() {
        let mut opts = PickerOptions::default();
        opts.unavailable_dates.insert(date!(2024 - 01 - 12));
        assert!(!opts.can_select_range(date!(2024 - 01 - 10), Some(date!(2024 - 01 - 15))));
    }

    #[test]
    fn test_closed_range_shorter_than_min_stay() {
        let mut opts = PickerOptions::default();
        opts.min_booking_days = NonZeroU32::new(3).unwrap();
        assert!(!opts.can_select_range(date!(2024 - 01 - 10), Some(date!(2024 - 01 - 11))));
        assert!(opts.can_select_range(date!(2024 - 01 - 10), Some(date!(2024 - 01 - 12))));
    }

    #[test]
    fn test_min_booking_date_bound() {
        let mut opts = PickerOptions::default();
        opts.min_booking_date = Some(date!(2024 - 01 - 10));
        assert!(!opts.can_select_range(date!(2024 - 01 - 05), None));
        assert!(opts.can_select_range(date!(2024 - 01 - 10), None));
    }

    #[test]
    fn test_max_booking_date_bound() {
        let mut opts = PickerOptions::default();
        opts.max_booking_date = Some(date!(2024 - 01 - 20));
        assert!(!opts.can_select_range(date!(2024 - 01 - 18), Some(date!(2024 - 01 - 21))));
        assert!(opts.can_select_range(date!(2024 - 01 - 18), Some(date!(2024 - 01 - 20))));
    }

    #[test]
    fn test_open_range_reserves_minimum_stay() {
        let mut opts = PickerOptions::default();
        opts.min_booking_days = NonZeroU32::new(3).unwrap();
        opts.unavailable_dates.insert(date!(2024 - 01 - 11));
        // A three-night stay starting on the 10th would cover the blocked
        // 11th, so the 10th cannot open a range.
        assert!(!opts.can_select_range(date!(2024 - 01 - 10), None));
        assert!(opts.can_select_range(date!(2024 - 01 - 12), None));
    }

    #[test]
    fn test_open_range_min_one_checks_start_only() {
        let mut opts = PickerOptions::default();
        opts.unavailable_dates.insert(date!(2024 - 01 - 11));
        assert!(opts.can_select_range(date!(2024 - 01 - 10), None));
        assert!(!opts.can_select_range(date!(2024 - 01 - 11), None));
    }
}
