use crate::theme::{
    jump::{READY_ENTER_STYLE, UNFILLED_CELL_STYLE},
    BASE_STYLE,
};
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Flex, Layout, Margin, Rect},
    text::{Line, Span, Text},
    widgets::{Block, Clear, StatefulWidget, Widget},
};

const OUTER_WIDTH: u16 = 16;
const OUTER_HEIGHT: u16 = 8;
const ENTER_POS: usize = 8;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct JumpPrompt;

impl StatefulWidget for JumpPrompt {
    type State = JumpState;

    /*
     * ................
     * .┌─ Go To… ───┐.
     * .│            │.
     * .│ YYYY-MM-DD │.
     * .│            │.
     * .│  [ENTER]   │.
     * .└────────────┘.
     * ................
     */

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let [outer_area] = Layout::horizontal([OUTER_WIDTH])
            .flex(Flex::Center)
            .areas(area);
        let [outer_area] = Layout::vertical([OUTER_HEIGHT])
            .flex(Flex::Center)
            .areas(outer_area);
        Clear.render(outer_area, buf);
        Block::new().style(BASE_STYLE).render(outer_area, buf);
        let block_area = outer_area.inner(Margin::new(1, 1));
        Block::bordered()
            .title(" Go To… ")
            .title_alignment(Alignment::Center)
            .render(block_area, buf);
        let text_area = block_area.inner(Margin::new(1, 1));
        state.to_text().render(text_area, buf);
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) struct JumpState {
    year: [Option<u8>; 4],
    month: [Option<u8>; 2],
    day: [Option<u8>; 2],
    pos: usize,
}

impl JumpState {
    pub(crate) fn new() -> JumpState {
        JumpState::default()
    }

    fn to_text(self) -> Text<'static> {
        Text::from_iter([
            Line::styled("", BASE_STYLE),
            self.to_line(),
            Line::styled("", BASE_STYLE),
            // Style a span and convert it to a line rather than creating a
            // styled line directly so that only the "[ENTER]" text and not any
            // of its centering padding will be underlined:
            Line::from(Span::styled(
                "[ENTER]",
                if self.pos == ENTER_POS {
                    READY_ENTER_STYLE
                } else {
                    BASE_STYLE
                },
            )),
        ])
        .centered()
    }

    fn to_line(self) -> Line<'static> {
        let mut spans = Vec::new();
        let mut first = true;
        for (fallback, digits) in [
            ("Y", self.year.as_slice()),
            ("M", self.month.as_slice()),
            ("D", self.day.as_slice()),
        ] {
            if !std::mem::replace(&mut first, false) {
                spans.push(Span::styled("-", BASE_STYLE));
            }
            for dg in digits {
                spans.push(match dg {
                    Some(d) => Span::styled(format!("{d}"), BASE_STYLE),
                    None => Span::styled(fallback, UNFILLED_CELL_STYLE),
                });
            }
        }
        Line::from_iter(spans)
    }

    pub(crate) fn handle_input(&mut self, input: JumpInput) -> JumpOutcome {
        match (input, self.pos) {
            (JumpInput::Digit(d), 0..ENTER_POS) => {
                match self.pos {
                    0..4 => self.year[self.pos] = Some(d),
                    4..6 => self.month[self.pos - 4] = Some(d),
                    6..8 => self.day[self.pos - 6] = Some(d),
                    _ => unreachable!(),
                }
                self.pos += 1;
                JumpOutcome::Handled
            }
            (JumpInput::Backspace, 1..) => {
                self.pos -= 1;
                match self.pos {
                    0..4 => self.year[self.pos] = None,
                    4..6 => self.month[self.pos - 4] = None,
                    6..8 => self.day[self.pos - 6] = None,
                    _ => unreachable!(),
                }
                JumpOutcome::Handled
            }
            (JumpInput::Enter, ENTER_POS) => {
                let mut year = 0i32;
                for d in self.year {
                    let d = d.expect("All year digits should be set");
                    year = year * 10 + i32::from(d);
                }
                let mut month = 0u8;
                for d in self.month {
                    let d = d.expect("All month digits should be set");
                    month = month * 10 + d;
                }
                let Ok(month) = time::Month::try_from(month) else {
                    return JumpOutcome::Invalid;
                };
                let mut day = 0u8;
                for d in self.day {
                    let d = d.expect("All day digits should be set");
                    day = day * 10 + d;
                }
                match time::Date::from_calendar_date(year, month, day) {
                    Ok(date) => JumpOutcome::Jump(date),
                    Err(_) => JumpOutcome::Invalid,
                }
            }
            _ => JumpOutcome::Invalid,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum JumpInput {
    Digit(u8),
    Backspace,
    Enter,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum JumpOutcome {
    Handled,
    Invalid,
    Jump(time::Date),
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn type_digits(state: &mut JumpState, digits: &[u8]) {
        for &d in digits {
            assert_eq!(state.handle_input(JumpInput::Digit(d)), JumpOutcome::Handled);
        }
    }

    #[test]
    fn test_full_entry_jumps() {
        let mut state = JumpState::new();
        type_digits(&mut state, &[2, 0, 2, 5, 0, 4, 1, 7]);
        assert_eq!(
            state.handle_input(JumpInput::Enter),
            JumpOutcome::Jump(date!(2025 - 04 - 17))
        );
    }

    #[test]
    fn test_enter_before_complete_is_invalid() {
        let mut state = JumpState::new();
        type_digits(&mut state, &[2, 0, 2, 5]);
        assert_eq!(state.handle_input(JumpInput::Enter), JumpOutcome::Invalid);
    }

    #[test]
    fn test_invalid_month_rejected() {
        let mut state = JumpState::new();
        type_digits(&mut state, &[2, 0, 2, 5, 1, 3, 0, 1]);
        assert_eq!(state.handle_input(JumpInput::Enter), JumpOutcome::Invalid);
    }

    #[test]
    fn test_backspace_reopens_slot() {
        let mut state = JumpState::new();
        type_digits(&mut state, &[2, 0, 2, 5, 0, 4, 3, 1]);
        assert_eq!(
            state.handle_input(JumpInput::Backspace),
            JumpOutcome::Handled
        );
        assert_eq!(state.handle_input(JumpInput::Digit(0)), JumpOutcome::Handled);
        assert_eq!(
            state.handle_input(JumpInput::Enter),
            JumpOutcome::Jump(date!(2025 - 04 - 30))
        );
    }

    #[test]
    fn test_digits_after_full_are_invalid() {
        let mut state = JumpState::new();
        type_digits(&mut state, &[2, 0, 2, 5, 0, 4, 1, 7]);
        assert_eq!(state.handle_input(JumpInput::Digit(9)), JumpOutcome::Invalid);
    }
}
