//! Calendar helpers: Russian date cells, day tokens and week parity.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::error::ScheduleError;

/// Genitive month names, January first.
pub const RUS_MONTHS: [&str; 12] = [
    "января", "февраля", "марта", "апреля", "мая", "июня",
    "июля", "августа", "сентября", "октября", "ноября", "декабря",
];

/// Weekday abbreviations, Monday first.
pub const RUS_DAYS_SHORT: [&str; 7] = ["Пн", "Вт", "Ср", "Чт", "Пт", "Сб", "Вс"];

#[allow(clippy::unwrap_used)]
static DAY_MONTH: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{1,2})\s+(\p{L}+)").unwrap());

#[allow(clippy::unwrap_used)]
static NUMERIC_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,2})[./](\d{1,2})(?:[./](\d{2}|\d{4}))?$").unwrap());

/// Which of the two alternating timetables a week uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekParity {
    Odd,
    Even,
}

impl WeekParity {
    /// Scan order used everywhere: odd table first.
    pub const ALL: [WeekParity; 2] = [WeekParity::Odd, WeekParity::Even];

    /// Parity derived from the ISO week number.
    pub fn of(date: NaiveDate) -> Self {
        if date.iso_week().week() % 2 == 0 {
            WeekParity::Even
        } else {
            WeekParity::Odd
        }
    }

    pub fn is_even(self) -> bool {
        matches!(self, WeekParity::Even)
    }

    pub fn label(self) -> &'static str {
        match self {
            WeekParity::Odd => "Нечетная неделя",
            WeekParity::Even => "Четная неделя",
        }
    }
}

impl fmt::Display for WeekParity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn month_from_word(word: &str) -> Option<u32> {
    RUS_MONTHS
        .iter()
        .position(|name| word.contains(name))
        .map(|idx| idx as u32 + 1)
}

/// Year for a day/month with no year: this year, unless that day has
/// already passed relative to `today`, in which case next year.
pub fn infer_year(month: u32, day: u32, today: NaiveDate) -> i32 {
    if (month, day) < (today.month(), today.day()) {
        today.year() + 1
    } else {
        today.year()
    }
}

/// Parses cell text such as `8 декабря` or `"8 декабря понедельник"`.
///
/// Returns `None` for anything that is not a day followed by a Russian
/// month name, and for impossible dates like `31 февраля`.
pub fn parse_russian_date(text: &str, today: NaiveDate) -> Option<NaiveDate> {
    let lower = text.trim().to_lowercase();
    if lower.is_empty() {
        return None;
    }

    DAY_MONTH.captures_iter(&lower).find_map(|caps| {
        let day: u32 = caps.get(1)?.as_str().parse().ok()?;
        let month = month_from_word(caps.get(2)?.as_str())?;
        NaiveDate::from_ymd_opt(infer_year(month, day, today), month, day)
    })
}

/// `Пн 8 декабря`
pub fn format_day_header(date: NaiveDate) -> String {
    format!(
        "{} {} {}",
        RUS_DAYS_SHORT[date.weekday().num_days_from_monday() as usize],
        date.day(),
        RUS_MONTHS[date.month0() as usize]
    )
}

/// A day the user asked for from the schedule keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayToken {
    Today,
    Tomorrow,
    Weekday(Weekday),
}

impl DayToken {
    /// The calendar date this token denotes. Weekday tokens pick the
    /// nearest such day from `today` on, including `today` itself.
    pub fn resolve(self, today: NaiveDate) -> NaiveDate {
        match self {
            DayToken::Today => today,
            DayToken::Tomorrow => today + Duration::days(1),
            DayToken::Weekday(target) => {
                let shift = (target.num_days_from_monday() + 7
                    - today.weekday().num_days_from_monday())
                    % 7;
                today + Duration::days(i64::from(shift))
            }
        }
    }
}

impl FromStr for DayToken {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "сегодня" => Ok(DayToken::Today),
            "завтра" => Ok(DayToken::Tomorrow),
            "пн" => Ok(DayToken::Weekday(Weekday::Mon)),
            "вт" => Ok(DayToken::Weekday(Weekday::Tue)),
            "ср" => Ok(DayToken::Weekday(Weekday::Wed)),
            "чт" => Ok(DayToken::Weekday(Weekday::Thu)),
            "пт" => Ok(DayToken::Weekday(Weekday::Fri)),
            "сб" => Ok(DayToken::Weekday(Weekday::Sat)),
            "вс" => Ok(DayToken::Weekday(Weekday::Sun)),
            _ => Err(ScheduleError::UnknownDayToken(s.to_string())),
        }
    }
}

/// Date typed by a user in the teacher search: a day token, `дд.мм`,
/// `дд.мм.гггг` or `8 декабря`.
///
/// Timetable cells carry no year, so the result always takes the year
/// [`infer_year`] gives. A typed year only has to make the day valid.
pub fn parse_user_date(input: &str, today: NaiveDate) -> Result<NaiveDate, ScheduleError> {
    let input = input.trim();
    if let Ok(token) = input.parse::<DayToken>() {
        return Ok(token.resolve(today));
    }

    let invalid = || ScheduleError::InvalidDate(input.to_string());
    if let Some(caps) = NUMERIC_DATE.captures(input) {
        let day: u32 = caps[1].parse().map_err(|_| invalid())?;
        let month: u32 = caps[2].parse().map_err(|_| invalid())?;
        if let Some(typed) = caps.get(3) {
            let year: i32 = typed.as_str().parse().map_err(|_| invalid())?;
            let year = if typed.as_str().len() == 2 { 2000 + year } else { year };
            NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)?;
        }
        return NaiveDate::from_ymd_opt(infer_year(month, day, today), month, day)
            .ok_or_else(invalid);
    }

    parse_russian_date(input, today).ok_or_else(|| ScheduleError::InvalidDate(input.to_string()))
}

/// `(hour, minute)` of the start of a `HH:MM-HH:MM` label.
pub fn parse_start_time(label: &str) -> Option<(u32, u32)> {
    let start = label.split(['-', '–']).next()?.trim();
    let (hours, minutes) = start.split_once(':').or_else(|| start.split_once('.'))?;
    Some((hours.trim().parse().ok()?, minutes.trim().parse().ok()?))
}

/// Sort key for time labels; labels that do not parse sort first.
pub fn start_time_key(label: &str) -> (u32, u32) {
    parse_start_time(label).unwrap_or((0, 0))
}
