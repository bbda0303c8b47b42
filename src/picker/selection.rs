use super::policy::{DateBlocker, PickerOptions};
use time::{Date, Duration};

/// Which endpoint the next pick will set.  `None` on the picker means the
/// range is complete.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum FocusedInput {
    StartDate,
    EndDate,
}

/// The logical selection: at most one booking window plus the endpoint the
/// next pick targets.  Whenever both dates are set, `start_date <= end_date`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Selection {
    pub(crate) start_date: Option<Date>,
    pub(crate) end_date: Option<Date>,
    pub(crate) focused_input: Option<FocusedInput>,
}

impl Default for Selection {
    fn default() -> Selection {
        Selection {
            start_date: None,
            end_date: None,
            focused_input: Some(FocusedInput::StartDate),
        }
    }
}

/// Outcome of an accepted pick.  `reseed` tells the caller whether the month
/// window may follow the picked date; end-date picks never disturb the
/// window.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Transition {
    pub(crate) selection: Selection,
    pub(crate) reseed: bool,
}

/// Applies a date pick to the selection.  Returns `None` when the pick is
/// disallowed, in which case nothing changes.
///
/// A pick made while the range is already complete (`focused_input` of
/// `None`) behaves as a start-date pick, opening a fresh range.
pub(crate) fn select_date<B: DateBlocker>(
    selection: &Selection,
    date: Date,
    opts: &PickerOptions<B>,
) -> Option<Transition> {
    use FocusedInput::{EndDate, StartDate};
    let focus = selection.focused_input.unwrap_or(StartDate);
    let reseed = focus != EndDate;
    let min_days = i64::from(opts.min_booking_days.get());

    // A single pick commits the whole fixed-length stay, or nothing.
    if opts.exact_min_booking_days {
        if let Some(end) = date.checked_add(Duration::days(min_days - 1)) {
            if opts.can_select_range(date, Some(end)) {
                return Some(Transition {
                    selection: Selection {
                        start_date: Some(date),
                        end_date: Some(end),
                        focused_input: None,
                    },
                    reseed,
                });
            }
        }
        return None;
    }

    // Out-of-order pick: re-anchor the range at the picked date.
    let out_of_order = (focus == EndDate && selection.start_date.is_some_and(|s| date < s))
        || (focus == StartDate && selection.end_date.is_some_and(|e| date > e));
    if out_of_order && opts.can_select_range(date, None) {
        return Some(Transition {
            selection: Selection {
                start_date: Some(date),
                end_date: None,
                focused_input: Some(EndDate),
            },
            reseed,
        });
    }

    if focus == StartDate {
        // Move the start while keeping a compatible end...
        if let Some(end) = selection.end_date {
            if opts.can_select_range(date, Some(end)) {
                return Some(Transition {
                    selection: Selection {
                        start_date: Some(date),
                        end_date: Some(end),
                        focused_input: Some(EndDate),
                    },
                    reseed,
                });
            }
        }
        // ...or open a fresh range.
        if opts.can_select_range(date, None) {
            return Some(Transition {
                selection: Selection {
                    start_date: Some(date),
                    end_date: None,
                    focused_input: Some(EndDate),
                },
                reseed,
            });
        }
        return None;
    }

    // End-date pick completing the range.
    if let Some(start) = selection.start_date {
        if date >= start && opts.can_select_range(start, Some(date)) {
            return Some(Transition {
                selection: Selection {
                    start_date: Some(start),
                    end_date: Some(date),
                    focused_input: None,
                },
                reseed,
            });
        }
    }
    None
}

/// Whether a hover on `date` should be stored for preview painting.  Hovers
/// are advisory: they never change the selection, and a hover that fails
/// this test clears the stored hover instead.
pub(crate) fn accept_hover<B: DateBlocker>(
    selection: &Selection,
    date: Date,
    opts: &PickerOptions<B>,
) -> bool {
    let min_days = i64::from(opts.min_booking_days.get());
    // The current start date stays hoverable even if blocked, so the user
    // can re-anchor from it.
    if opts.is_unavailable(date) && selection.start_date != Some(date) {
        return false;
    }
    if opts.exact_min_booking_days && min_days > 1 {
        if let Some(end) = date.checked_add(Duration::days(min_days - 1)) {
            if opts.within_bounds(date)
                && opts.within_bounds(end)
                && super::policy::date_span(date, end).all(|d| !opts.is_unavailable(d))
            {
                return true;
            }
        }
    }
    if selection.start_date.is_some()
        && selection.end_date.is_none()
        && !opts.exact_min_booking_days
        && opts.within_bounds(date)
    {
        return true;
    }
    // Re-hovering the start itself previews the minimum stay.  Kept without
    // a max-bound check to match the selection rules above.
    if selection.start_date == Some(date) && min_days > 1 {
        if let Some(reach) = date.checked_add(Duration::days(min_days - 2)) {
            if super::policy::date_span(date, reach).all(|d| !opts.is_unavailable(d)) {
                return true;
            }
        }
    }
    false
}
