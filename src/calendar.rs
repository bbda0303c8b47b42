use crate::picker::{ActiveMonth, DateBlocker, DatePicker};
use crate::theme;
use ratatui::{prelude::*, widgets::Paragraph};
use std::marker::PhantomData;
use time::{Date, Weekday};

/// Number of columns per day cell
const DAY_WIDTH: u16 = 4;

/// Width of one month panel
const PANEL_WIDTH: u16 = DAY_WIDTH * 7;

/// Columns between adjacent month panels
const PANEL_GUTTER: u16 = 3;

/// Lines taken up by the panel title, the weekday header, and its rule
const HEADER_LINES: u16 = 3;

/// Tallest possible month: six week rows
const PANEL_HEIGHT: u16 = HEADER_LINES + 6;

const ACS_HLINE: char = '─';

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Calendar<B> {
    _data: PhantomData<B>,
}

impl<B> Calendar<B> {
    pub(crate) fn new() -> Calendar<B> {
        Calendar { _data: PhantomData }
    }
}

impl<B: DateBlocker> StatefulWidget for Calendar<B> {
    type State = DatePicker<B>;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        let months = state.active_months().to_vec();
        let month_qty = u16::try_from(months.len()).unwrap_or(u16::MAX);
        let per_row = ((area.width + PANEL_GUTTER) / (PANEL_WIDTH + PANEL_GUTTER)).max(1);
        let columns = per_row.min(month_qty);
        let total_width = columns * PANEL_WIDTH + columns.saturating_sub(1) * PANEL_GUTTER;
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(area.width.saturating_sub(total_width) / 2),
                Constraint::Length(total_width.min(area.width)),
                Constraint::Min(0),
            ])
            .split(area);
        let mut canvas = BufferCanvas::new(chunks[1], buf);
        for (i, &month) in std::iter::zip(0u16.., &months) {
            let x0 = (i % columns) * (PANEL_WIDTH + PANEL_GUTTER);
            let y0 = (i / columns) * (PANEL_HEIGHT + 1);
            draw_month(&mut canvas, state, month, x0, y0);
        }
    }
}

fn draw_month<B: DateBlocker>(
    canvas: &mut BufferCanvas<'_>,
    state: &mut DatePicker<B>,
    month: ActiveMonth,
    x0: u16,
    y0: u16,
) {
    let title = format!("{} {}", month.month(), month.year());
    let indent = PANEL_WIDTH.saturating_sub(u16::try_from(title.len()).unwrap_or(u16::MAX)) / 2;
    canvas.mvprint(y0, x0 + indent, title, Some(Style::new().bold()));
    canvas.mvprint(
        y0 + 1,
        x0,
        weekday_header(state.first_day_of_week()),
        Some(Style::new().bold()),
    );
    canvas.hline(y0 + 2, x0, ACS_HLINE, PANEL_WIDTH);
    let grid = state.month_grid(month).clone();
    for (row, week) in std::iter::zip(0u16.., grid.weeks()) {
        for (col, cell) in std::iter::zip(0u16.., week) {
            if let Some(date) = *cell {
                let span = day_span(state, date);
                canvas.mvprint(
                    y0 + HEADER_LINES + row,
                    x0 + col * DAY_WIDTH,
                    span.content,
                    Some(span.style),
                );
            }
        }
    }
}

fn day_span<B: DateBlocker>(state: &DatePicker<B>, date: Date) -> Span<'static> {
    let style = if state.is_first_or_last_selected_date(date) {
        theme::ENDPOINT_STYLE
    } else if state.is_date_selected(date) {
        theme::SELECTED_STYLE
    } else if state.is_date_hovered(date) {
        theme::PREVIEW_STYLE
    } else if state.is_date_blocked(date) {
        theme::BLOCKED_STYLE
    } else if date == state.today() {
        theme::TODAY_STYLE
    } else {
        Style::new()
    };
    let s = if state.is_date_focused(date) {
        format!("[{:2}]", date.day())
    } else {
        format!(" {:2} ", date.day())
    };
    Span::styled(s, style)
}

fn weekday_header(first_day_of_week: Weekday) -> String {
    let mut header = String::new();
    let mut weekday = first_day_of_week;
    for _ in 0..7 {
        header.push(' ');
        header.push_str(weekday_label(weekday));
        header.push(' ');
        weekday = weekday.next();
    }
    header
}

fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Monday => "Mo",
        Weekday::Tuesday => "Tu",
        Weekday::Wednesday => "We",
        Weekday::Thursday => "Th",
        Weekday::Friday => "Fr",
        Weekday::Saturday => "Sa",
        Weekday::Sunday => "Su",
    }
}

#[derive(Debug, Eq, PartialEq)]
struct BufferCanvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl<'a> BufferCanvas<'a> {
    fn new(area: Rect, buf: &'a mut Buffer) -> Self {
        Self { area, buf }
    }

    fn mvprint<S: AsRef<str>>(&mut self, y: u16, x: u16, s: S, style: Option<Style>) {
        if y < self.area.height && x < self.area.width {
            let text = Text::styled(s.as_ref(), style.unwrap_or_default());
            let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
            // Using a Paragraph lets us truncate text that extends beyond the
            // calendar's area, though we need to be sure that the Rect passed
            // to the Paragraph is entirely within the frame lest a panic
            // result.
            Paragraph::new(text).render(
                Rect {
                    x: x + self.area.x,
                    y: y + self.area.y,
                    width: (self.area.width - x).min(width),
                    height: 1,
                },
                self.buf,
            );
        }
    }

    fn hline(&mut self, y: u16, x: u16, ch: char, length: u16) {
        self.mvprint(y, x, String::from(ch).repeat(length.into()), None);
    }
}
