//! MarkdownV2 rendering of day schedules and teacher findings.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::date::{format_day_header, start_time_key, WeekParity};
use super::extractor::Lesson;
use super::teacher::Finding;
use crate::utils::markdown::{bold, escape_markdown};

pub const NO_CLASSES: &str = "🎉 *Пар нет, можно отдыхать\\!*";
pub const TEACHER_NOT_FOUND: &str = "❌ *На указанную дату пары не найдены\\.*";
pub const DATE_NOT_FOUND: &str = "❌ *Расписание на эту дату не найдено\\.*";
pub const SOURCES_UNAVAILABLE: &str =
    "⚠️ *Не удалось загрузить расписание\\.* Попробуйте позже\\.";

fn parity_line(parity: WeekParity) -> String {
    format!("*📅 {}*", parity.label())
}

fn date_line(date: NaiveDate) -> String {
    format!("\n🟢__*{}*__\n", escape_markdown(&format_day_header(date)))
}

fn day_header(parity: WeekParity, date: NaiveDate, group: &str) -> Vec<String> {
    vec![
        parity_line(parity),
        bold(&format!("👥 {}", group)),
        date_line(date),
    ]
}

fn push_lines(out: &mut Vec<String>, lines: &[String]) {
    out.extend(lines.iter().map(|line| format!("• {}", escape_markdown(line))));
}

/// Lessons of one group on one date.
///
/// Lessons are ordered by start time (stable, unparseable labels first);
/// identical lessons are shown once. An empty list renders the "no
/// classes" line under the usual header.
pub fn format_day_schedule(
    lessons: &[Lesson],
    parity: WeekParity,
    date: NaiveDate,
    group: &str,
) -> String {
    let mut out = day_header(parity, date, group);

    if lessons.is_empty() {
        out.push(NO_CLASSES.to_string());
        return out.join("\n");
    }

    let mut unique: Vec<&Lesson> = Vec::with_capacity(lessons.len());
    for lesson in lessons {
        if !unique.contains(&lesson) {
            unique.push(lesson);
        }
    }
    unique.sort_by_key(|lesson| start_time_key(&lesson.time));

    for lesson in unique {
        out.push(format!("*⏰ {}*", escape_markdown(&lesson.time)));
        push_lines(&mut out, &lesson.lines);
        out.push(String::new());
    }
    out.join("\n")
}

/// The date is in neither parity table for this group.
pub fn format_date_not_found(parity: WeekParity, date: NaiveDate, group: &str) -> String {
    let mut out = day_header(parity, date, group);
    out.push(DATE_NOT_FOUND.to_string());
    out.join("\n")
}

pub fn format_group_not_found(group: &str) -> String {
    format!(
        "❌ *Группа {} не найдена в расписании\\.*\nПройдите регистрацию заново: /start",
        escape_markdown(group)
    )
}

pub fn format_sources_unavailable() -> String {
    SOURCES_UNAVAILABLE.to_string()
}

/// Findings of a teacher search.
///
/// When every finding comes from the same parity table, that parity is shown
/// once under the title; otherwise each block carries its own parity line.
pub fn format_teacher_schedule(name: &str, date: NaiveDate, findings: &[Finding]) -> String {
    let mut out = vec![
        bold("🧑‍🏫 Расписание для преподавателя:"),
        bold(name.trim()),
        date_line(date),
    ];

    if findings.is_empty() {
        out.push(TEACHER_NOT_FOUND.to_string());
        return out.join("\n");
    }

    let parities: BTreeSet<WeekParity> = findings.iter().map(|f| f.parity).collect();
    let shared_parity = match parities.len() {
        1 => parities.into_iter().next(),
        _ => None,
    };
    if let Some(parity) = shared_parity {
        out.insert(1, parity_line(parity));
    }

    let mut sorted: Vec<&Finding> = findings.iter().collect();
    sorted.sort_by_key(|f| start_time_key(&f.time));

    for finding in sorted {
        out.push(format!("*⏰ {}*", escape_markdown(&finding.time)));
        if shared_parity.is_none() {
            out.push(format!("📅 _{}_", finding.parity.label()));
        }
        out.push(format!("👥 *Группа:* {}", escape_markdown(&finding.group)));
        push_lines(&mut out, &finding.lines);
        out.push(String::new());
    }
    out.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 8).unwrap()
    }

    #[test]
    fn test_day_schedule_layout() {
        let lessons = vec![Lesson::new("08:30-10:05", vec!["Матем.".into(), "лекция".into()])];
        let text = format_day_schedule(&lessons, WeekParity::Even, monday(), "ГР-1");
        assert_eq!(
            text,
            "*📅 Четная неделя*\n*👥 ГР\\-1*\n\n🟢__*Пн 8 декабря*__\n\n*⏰ 08:30\\-10:05*\n• Матем\\.\n• лекция\n"
        );
    }

    #[test]
    fn test_day_schedule_sorted_by_start_time() {
        let lessons = vec![
            Lesson::new("13:55-15:30", vec!["Физика".into()]),
            Lesson::new("08:30-10:05", vec!["Матем.".into()]),
            Lesson::new("по выбору", vec!["Спорт".into()]),
            Lesson::new("08:30-10:05", vec!["Матем.".into()]),
        ];
        let text = format_day_schedule(&lessons, WeekParity::Odd, monday(), "ГР-1");
        let sport = text.find("Спорт").unwrap();
        let math = text.find("Матем").unwrap();
        let physics = text.find("Физика").unwrap();
        assert!(sport < math && math < physics);
        assert_eq!(text.matches("Матем").count(), 1);
    }

    #[test]
    fn test_empty_day_renders_no_classes() {
        let text = format_day_schedule(&[], WeekParity::Odd, monday(), "ГР-2");
        assert!(text.starts_with("*📅 Нечетная неделя*"));
        assert!(text.ends_with(NO_CLASSES));
    }

    #[test]
    fn test_date_not_found_differs_from_no_classes() {
        let text = format_date_not_found(WeekParity::Even, monday(), "ГР-1");
        assert!(text.contains("Пн 8 декабря"));
        assert!(text.ends_with(DATE_NOT_FOUND));
        assert!(!text.contains(NO_CLASSES));
    }

    #[test]
    fn test_group_not_found_escapes_name() {
        assert!(format_group_not_found("ГР-9").contains("ГР\\-9"));
    }

    #[test]
    fn test_teacher_schedule_single_parity() {
        let findings = vec![Finding {
            time: "10:15-11:50".into(),
            group: "ГР-2".into(),
            lines: vec!["Матем.".into(), "Иванов И.И.".into()],
            parity: WeekParity::Odd,
        }];
        let text = format_teacher_schedule("Иванов", monday(), &findings);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "*🧑‍🏫 Расписание для преподавателя:*");
        assert_eq!(lines[1], "*📅 Нечетная неделя*");
        assert_eq!(lines[2], "*Иванов*");
        assert!(text.contains("👥 *Группа:* ГР\\-2"));
        assert!(text.contains("• Иванов И\\.И\\."));
        assert!(!text.contains("📅 _"));
    }

    #[test]
    fn test_teacher_schedule_mixed_parity_tags_each_block() {
        let finding = |group: &str, parity| Finding {
            time: "08:30-10:05".into(),
            group: group.into(),
            lines: vec!["Матем.".into()],
            parity,
        };
        let findings = vec![finding("ГР-1", WeekParity::Odd), finding("ГР-2", WeekParity::Even)];
        let text = format_teacher_schedule("Иванов", monday(), &findings);
        assert!(text.contains("📅 _Нечетная неделя_"));
        assert!(text.contains("📅 _Четная неделя_"));
        assert!(!text.contains("*📅"));
    }

    #[test]
    fn test_teacher_not_found() {
        let text = format_teacher_schedule("Сидоров", monday(), &[]);
        assert!(text.ends_with(TEACHER_NOT_FOUND));
    }
}
