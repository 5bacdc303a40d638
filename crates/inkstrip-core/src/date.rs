use std::fmt;
use std::str::FromStr;

use snafu::{OptionExt as _, ResultExt as _, Snafu};
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{Date, Month, OffsetDateTime};

/// Long form used on the post page, e.g. `05 March '24`
const LONG_FORMAT: &[FormatItem<'static>] =
    format_description!("[day] [month repr:long] '[year repr:last_two]");

#[derive(Debug, Snafu)]
pub enum InvalidDateError {
    #[snafu(display("Date must be in day/month/year form"))]
    Shape,
    #[snafu(display("Invalid date number: {part}"))]
    Number {
        part: String,
        source: std::num::ParseIntError,
    },
    #[snafu(display("Not a calendar date"))]
    Calendar { source: time::error::ComponentRange },
}

/// Publication date of a post
///
/// Stored as plain components so the record encoding does not depend on
/// `time` internals.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "bincode", derive(::bincode::Encode, ::bincode::Decode))]
#[cfg_attr(feature = "serde", derive(::serde::Serialize, ::serde::Deserialize))]
pub struct PostDate {
    year: i32,
    month: u8,
    day: u8,
}

impl PostDate {
    pub fn today() -> Self {
        OffsetDateTime::now_utc().date().into()
    }

    pub fn to_date(self) -> Option<Date> {
        let month = Month::try_from(self.month).ok()?;
        Date::from_calendar_date(self.year, month, self.day).ok()
    }

    /// Format for the post page
    pub fn fmt_long(self) -> String {
        self.to_date()
            .and_then(|date| date.format(LONG_FORMAT).ok())
            .unwrap_or_else(|| self.to_string())
    }
}

impl From<Date> for PostDate {
    fn from(date: Date) -> Self {
        Self {
            year: date.year(),
            month: u8::from(date.month()),
            day: date.day(),
        }
    }
}

/// `dd/mm/yyyy`, the same form accepted by [`FromStr`]
impl fmt::Display for PostDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:02}/{:04}", self.day, self.month, self.year)
    }
}

/// Parses `day/month/year`
///
/// Day and month take one or two digits, year takes four. The result must
/// be a real calendar date, so `31/02/2024` is rejected.
impl FromStr for PostDate {
    type Err = InvalidDateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split('/');
        let (Some(day), Some(month), Some(year), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return ShapeSnafu.fail();
        };

        let is_digits = |p: &str, max_len: usize| {
            !p.is_empty() && p.len() <= max_len && p.bytes().all(|b| b.is_ascii_digit())
        };
        if !is_digits(day, 2) || !is_digits(month, 2) || !is_digits(year, 4) || year.len() != 4 {
            return ShapeSnafu.fail();
        }

        let parse = |p: &str| p.parse::<u16>().context(NumberSnafu { part: p });
        let day = u8::try_from(parse(day)?).ok().context(ShapeSnafu)?;
        let month = u8::try_from(parse(month)?).ok().context(ShapeSnafu)?;
        let year = i32::from(parse(year)?);
        if year == 0 {
            return ShapeSnafu.fail();
        }

        let month = Month::try_from(month).context(CalendarSnafu)?;
        let date = Date::from_calendar_date(year, month, day).context(CalendarSnafu)?;

        Ok(date.into())
    }
}
