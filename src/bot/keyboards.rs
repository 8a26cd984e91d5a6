//! Reply keyboards shown during registration and afterwards.

use teloxide::types::{KeyboardButton, KeyboardMarkup, KeyboardRemove};

use crate::schedule::sources::Faculty;
use crate::utils::validation::{MAX_COURSE, MIN_COURSE};

/// Splits labels into rows of at most `per_row` buttons.
pub fn chunk_rows<S: AsRef<str>>(labels: &[S], per_row: usize) -> Vec<Vec<KeyboardButton>> {
    labels
        .chunks(per_row.max(1))
        .map(|row| row.iter().map(|l| KeyboardButton::new(l.as_ref())).collect())
        .collect()
}

fn one_time(rows: Vec<Vec<KeyboardButton>>) -> KeyboardMarkup {
    KeyboardMarkup::new(rows)
        .resize_keyboard(true)
        .one_time_keyboard(true)
}

pub fn faculties_keyboard() -> KeyboardMarkup {
    let names: Vec<&str> = Faculty::all().iter().map(|f| f.name).collect();
    one_time(chunk_rows(&names, 2))
}

/// `1 2 3` / `4 5`
pub fn courses_keyboard() -> KeyboardMarkup {
    let courses: Vec<String> = (MIN_COURSE..=MAX_COURSE).map(|c| c.to_string()).collect();
    one_time(chunk_rows(&courses, 3))
}

pub fn groups_keyboard(groups: &[String]) -> KeyboardMarkup {
    one_time(chunk_rows(groups, 3))
}

/// Persistent day picker for registered users.
pub fn schedule_keyboard() -> KeyboardMarkup {
    const DAYS: [&[&str]; 3] = [&["Сегодня", "Завтра"], &["Пн", "Вт", "Ср"], &["Чт", "Пт", "Сб"]];
    KeyboardMarkup::new(DAYS.map(|row| row.iter().map(|d| KeyboardButton::new(*d)).collect::<Vec<_>>()))
        .resize_keyboard(true)
        .one_time_keyboard(false)
}

pub fn remove_keyboard() -> KeyboardRemove {
    KeyboardRemove::new()
}
