use crate::calendar::Calendar;
use crate::help::Help;
use crate::jump::{JumpInput, JumpOutcome, JumpPrompt, JumpState};
use crate::picker::{DateBlocker, DatePicker, FocusedInput, Selection};
use crate::theme::{BASE_STYLE, FOOTER_STYLE};
use crossterm::event::{read, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block, Paragraph, StatefulWidget, Widget},
    DefaultTerminal,
};
use std::io::{self, Write};

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct App<B> {
    picker: DatePicker<B>,
    state: AppState,
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum AppState {
    Calendar,
    Helping,
    Jumping(JumpState),
    Quitting,
}

impl<B: DateBlocker> App<B> {
    pub(crate) fn new(picker: DatePicker<B>) -> App<B> {
        App {
            picker,
            state: AppState::Calendar,
        }
    }

    pub(crate) fn run(mut self, mut terminal: DefaultTerminal) -> io::Result<Selection> {
        while self.state != AppState::Quitting {
            self.draw(&mut terminal)?;
            self.handle_input()?;
        }
        Ok(self.picker.selection())
    }

    fn draw(&mut self, terminal: &mut DefaultTerminal) -> io::Result<()> {
        terminal.draw(|frame| frame.render_widget(&mut *self, frame.area()))?;
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        let normal = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if let Event::Key(KeyEvent {
            kind: KeyEventKind::Press,
            modifiers,
            code,
            ..
        }) = read()?
        {
            if code == KeyCode::Char('c') && modifiers == KeyModifiers::CONTROL {
                self.state = AppState::Quitting;
            } else if normal.contains(modifiers) && !self.handle_key(code) {
                beep()?;
            }
        }
        Ok(())
    }

    /// Handles a keypress.  Returns `false` if the key did nothing, in which
    /// case the terminal will beep.
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match &mut self.state {
            AppState::Calendar => match key {
                KeyCode::Char('l') | KeyCode::Right => {
                    self.move_focus(1);
                    true
                }
                KeyCode::Char('h') | KeyCode::Left => {
                    self.move_focus(-1);
                    true
                }
                KeyCode::Char('j') | KeyCode::Down => {
                    self.move_focus(7);
                    true
                }
                KeyCode::Char('k') | KeyCode::Up => {
                    self.move_focus(-7);
                    true
                }
                KeyCode::Enter | KeyCode::Char(' ') => self.pick_focused(),
                KeyCode::Char('n') | KeyCode::PageDown => {
                    self.picker.go_to_next_months().is_ok()
                }
                KeyCode::Char('p') | KeyCode::PageUp => {
                    self.picker.go_to_previous_months().is_ok()
                }
                KeyCode::Char('N') => self.picker.go_to_next_year(1).is_ok(),
                KeyCode::Char('P') => self.picker.go_to_previous_year(1).is_ok(),
                KeyCode::Char('t') => {
                    self.picker.on_date_focus(self.picker.today());
                    self.hover_focused();
                    true
                }
                KeyCode::Char('r') | KeyCode::Home => {
                    self.picker.on_reset_dates();
                    true
                }
                KeyCode::Char('g') => {
                    self.state = AppState::Jumping(JumpState::new());
                    true
                }
                KeyCode::Char('?') => {
                    self.state = AppState::Helping;
                    true
                }
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.state = AppState::Quitting;
                    true
                }
                _ => false,
            },
            AppState::Helping => {
                // the Any Key
                self.state = AppState::Calendar;
                true
            }
            AppState::Jumping(jump) => {
                let input = match key {
                    KeyCode::Char(ch @ '0'..='9') => {
                        let Some(d) = ch.to_digit(10) else {
                            return false;
                        };
                        JumpInput::Digit(u8::try_from(d).unwrap_or_default())
                    }
                    KeyCode::Backspace => JumpInput::Backspace,
                    KeyCode::Enter => JumpInput::Enter,
                    KeyCode::Char('q' | 'g') | KeyCode::Esc => {
                        self.state = AppState::Calendar;
                        return true;
                    }
                    _ => return false,
                };
                match jump.handle_input(input) {
                    JumpOutcome::Handled => true,
                    JumpOutcome::Invalid => false,
                    JumpOutcome::Jump(date) => {
                        self.picker.on_date_focus(date);
                        self.hover_focused();
                        self.state = AppState::Calendar;
                        true
                    }
                }
            }
            AppState::Quitting => true,
        }
    }

    fn move_focus(&mut self, days: i64) {
        self.picker.move_focus(days);
        self.hover_focused();
    }

    fn hover_focused(&mut self) {
        self.picker.on_date_hover(self.picker.focused_date());
    }

    fn pick_focused(&mut self) -> bool {
        let Some(date) = self.picker.focused_date() else {
            return false;
        };
        self.picker.on_date_select(date);
        self.hover_focused();
        // A rejected pick is a deliberate no-op rather than an unrecognized
        // key, so no beep.
        true
    }

    fn footer_line(&self) -> Line<'static> {
        let selection = self.picker.selection();
        let start = selection
            .start_date
            .map_or_else(|| String::from("-"), ymd);
        let end = selection.end_date.map_or_else(|| String::from("-"), ymd);
        let phase = match (selection.start_date, selection.end_date) {
            (Some(start), Some(end)) => {
                let nights = (end - start).whole_days();
                format!("{nights} night(s)")
            }
            _ => match selection.focused_input {
                Some(FocusedInput::EndDate) => String::from("pick check-out"),
                _ => String::from("pick check-in"),
            },
        };
        Line::from(format!("{start} .. {end}  {phase}  (? for help)")).style(FOOTER_STYLE)
    }
}

impl<B: DateBlocker> Widget for &mut App<B> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        Block::new().style(BASE_STYLE).render(area, buf);
        let [calendar_area, footer_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(1)]).areas(area);
        Calendar::new().render(calendar_area, buf, &mut self.picker);
        Paragraph::new(self.footer_line()).render(footer_area, buf);
        match &mut self.state {
            AppState::Helping => Help.render(area, buf),
            AppState::Jumping(jump) => JumpPrompt.render(area, buf, jump),
            AppState::Calendar | AppState::Quitting => (),
        }
    }
}

fn ymd(date: time::Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

fn beep() -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(b"\x07")?;
    stdout.flush()
}
