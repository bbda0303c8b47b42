mod app;
mod calendar;
mod help;
mod jump;
mod picker;
mod theme;
use crate::app::App;
use crate::picker::{DateBlocker, DatePicker, FocusedInput, PickerOptions};
use anyhow::Context;
use lexopt::{Arg, Parser, ValueExt};
use ratatui::DefaultTerminal;
use time::{
    format_description::FormatItem, macros::format_description, Date, OffsetDateTime, Weekday,
};

static YMD_FMT: &[FormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Built-in availability policies selectable from the command line.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Availability {
    Open,
    WeekendsBlocked,
}

impl DateBlocker for Availability {
    fn is_blocked(&self, date: Date) -> bool {
        match self {
            Availability::Open => false,
            Availability::WeekendsBlocked => {
                matches!(date.weekday(), Weekday::Saturday | Weekday::Sunday)
            }
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run {
        options: PickerOptions<Availability>,
    },
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut options = PickerOptions::new(Availability::Open);
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Long("date") => options.initial_visible_month = Some(parse_date(&mut parser)?),
                Arg::Long("months") => options.number_of_months = parser.value()?.parse()?,
                Arg::Long("start") => options.start_date = Some(parse_date(&mut parser)?),
                Arg::Long("end") => options.end_date = Some(parse_date(&mut parser)?),
                Arg::Long("min") => options.min_booking_date = Some(parse_date(&mut parser)?),
                Arg::Long("max") => options.max_booking_date = Some(parse_date(&mut parser)?),
                Arg::Long("min-days") => options.min_booking_days = parser.value()?.parse()?,
                Arg::Long("exact") => options.exact_min_booking_days = true,
                Arg::Long("unavailable") => {
                    options.unavailable_dates.insert(parse_date(&mut parser)?);
                }
                Arg::Long("block-weekends") => options.blocker = Availability::WeekendsBlocked,
                Arg::Long("week-start") => {
                    options.first_day_of_week = parse_weekday(&mut parser)?;
                }
                _ => return Err(arg.unexpected()),
            }
        }
        options.focused_input = match (options.start_date, options.end_date) {
            (Some(_), Some(_)) => None,
            (Some(_), None) => Some(FocusedInput::EndDate),
            (None, _) => Some(FocusedInput::StartDate),
        };
        Ok(Command::Run { options })
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run { options } => {
                if let (Some(start), Some(end)) = (options.start_date, options.end_date) {
                    anyhow::ensure!(start <= end, "--start must not be after --end");
                }
                if let (Some(min), Some(max)) =
                    (options.min_booking_date, options.max_booking_date)
                {
                    anyhow::ensure!(min <= max, "--min must not be after --max");
                }
                let today = OffsetDateTime::now_local()
                    .context("failed to determine local date")?
                    .date();
                let selection = with_terminal(|mut terminal| {
                    terminal.hide_cursor().context("failed to hide cursor")?;
                    let picker = DatePicker::new(today, options);
                    let selection = App::new(picker).run(terminal)?;
                    Ok(selection)
                })?;
                match (selection.start_date, selection.end_date) {
                    (Some(start), Some(end)) => {
                        let nights = (end - start).whole_days();
                        println!(
                            "{} .. {} ({nights} night(s))",
                            start.format(&YMD_FMT)?,
                            end.format(&YMD_FMT)?,
                        );
                    }
                    (Some(start), None) => println!("{}", start.format(&YMD_FMT)?),
                    (None, _) => println!("no dates selected"),
                }
                Ok(())
            }
            Command::Help => {
                println!("Usage: rangecal [<options>]");
                println!();
                println!("Interactive terminal date-range picker");
                println!();
                println!("Options:");
                println!("  --date <YYYY-MM-DD>         Month to show on startup");
                println!("  --months <N>                Number of months shown at once [default: 2]");
                println!("  --start <YYYY-MM-DD>        Preset check-in date");
                println!("  --end <YYYY-MM-DD>          Preset check-out date");
                println!("  --min <YYYY-MM-DD>          Earliest selectable date");
                println!("  --max <YYYY-MM-DD>          Latest selectable date");
                println!("  --min-days <N>              Minimum stay length in days [default: 1]");
                println!("  --exact                     Stays must be exactly --min-days long;");
                println!("                              with --min-days 1 this picks single dates");
                println!("  --unavailable <YYYY-MM-DD>  Mark a date as booked (may be repeated)");
                println!("  --block-weekends            Mark Saturdays & Sundays as booked");
                println!("  --week-start <DAY>          First day of the week [default: monday]");
                println!("  -h, --help                  Display this help message and exit");
                println!("  -V, --version               Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn parse_date(parser: &mut Parser) -> Result<Date, lexopt::Error> {
    let value = parser.value()?.string()?;
    match Date::parse(&value, &YMD_FMT) {
        Ok(d) => Ok(d),
        Err(e) => Err(lexopt::Error::ParsingFailed {
            value,
            error: Box::new(e),
        }),
    }
}

fn parse_weekday(parser: &mut Parser) -> Result<Weekday, lexopt::Error> {
    let value = parser.value()?.string()?;
    match value.to_ascii_lowercase().as_str() {
        "monday" | "mon" => Ok(Weekday::Monday),
        "tuesday" | "tue" => Ok(Weekday::Tuesday),
        "wednesday" | "wed" => Ok(Weekday::Wednesday),
        "thursday" | "thu" => Ok(Weekday::Thursday),
        "friday" | "fri" => Ok(Weekday::Friday),
        "saturday" | "sat" => Ok(Weekday::Saturday),
        "sunday" | "sun" => Ok(Weekday::Sunday),
        _ => Err(lexopt::Error::ParsingFailed {
            value,
            error: "expected a weekday name".into(),
        }),
    }
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = func(terminal);
    ratatui::restore();
    r
}
