use anyhow::{anyhow, Result};

use crate::schedule::sources::Faculty;

pub const MIN_COURSE: u8 = 1;
pub const MAX_COURSE: u8 = 5;
pub const MIN_TEACHER_NAME_CHARS: usize = 2;
pub const MAX_TEACHER_NAME_CHARS: usize = 64;

/// A faculty button press must name one of the known faculties exactly.
pub fn validate_faculty(text: &str) -> Result<Faculty> {
    Faculty::by_name(text).ok_or_else(|| anyhow!("Unknown faculty '{}'", text.trim()))
}

pub fn validate_course(text: &str) -> Result<u8> {
    let text = text.trim();
    let course: u8 = text
        .parse()
        .map_err(|_| anyhow!("Course must be a number from {} to {}", MIN_COURSE, MAX_COURSE))?;

    if !(MIN_COURSE..=MAX_COURSE).contains(&course) {
        return Err(anyhow!("Course must be a number from {} to {}", MIN_COURSE, MAX_COURSE));
    }

    Ok(course)
}

/// The chosen group must be one offered on the keyboard.
pub fn validate_group_choice<'a>(text: &str, groups: &'a [String]) -> Result<&'a str> {
    let text = text.trim();
    groups
        .iter()
        .find(|g| g.as_str() == text)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("Group '{}' is not in the list", text))
}

/// Returns the trimmed name.
pub fn validate_teacher_name(name: &str) -> Result<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(anyhow!("Teacher name cannot be empty"));
    }

    let chars = name.chars().count();
    if chars < MIN_TEACHER_NAME_CHARS {
        return Err(anyhow!(
            "Teacher name must be at least {} characters long",
            MIN_TEACHER_NAME_CHARS
        ));
    }

    if chars > MAX_TEACHER_NAME_CHARS {
        return Err(anyhow!(
            "Teacher name cannot be longer than {} characters",
            MAX_TEACHER_NAME_CHARS
        ));
    }

    if name.contains('\n') || name.contains('\r') {
        return Err(anyhow!("Teacher name cannot contain line breaks"));
    }

    if name.starts_with('/') {
        return Err(anyhow!("Teacher name cannot be a command"));
    }

    Ok(name.to_string())
}

pub fn validate_telegram_chat_id(chat_id: i64) -> Result<()> {
    if chat_id == 0 {
        return Err(anyhow!("Chat ID cannot be zero"));
    }

    // user ids fit in 52 bits
    if chat_id >= 1 << 52 {
        return Err(anyhow!("Invalid user chat ID range"));
    }

    // supergroups go down to about -10^12
    if chat_id < -2000000000000 {
        return Err(anyhow!("Chat ID out of valid range"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_faculty() {
        assert_eq!(validate_faculty("ДиА").unwrap().abbreviation, "ДиА");
        assert_eq!(
            validate_faculty(" Электротехнический факультет").unwrap().abbreviation,
            "ЭТФ"
        );
        assert!(validate_faculty("ЭТФ").is_err());
        assert!(validate_faculty("").is_err());
    }

    #[test]
    fn test_validate_course_valid() {
        for (text, course) in [("1", 1), ("3", 3), (" 5 ", 5)] {
            assert_eq!(validate_course(text).unwrap(), course);
        }
    }

    #[test]
    fn test_validate_course_invalid() {
        for text in ["0", "6", "-1", "один", "", "1.5", "300"] {
            assert!(validate_course(text).is_err(), "should reject {text:?}");
        }
    }

    #[test]
    fn test_validate_group_choice() {
        let groups = vec!["ГР-1".to_string(), "ГР-11".to_string()];
        assert_eq!(validate_group_choice("ГР-1", &groups).unwrap(), "ГР-1");
        assert_eq!(validate_group_choice(" ГР-11 ", &groups).unwrap(), "ГР-11");
        assert!(validate_group_choice("ГР-", &groups).is_err());
        assert!(validate_group_choice("гр-1", &groups).is_err());
    }

    #[test]
    fn test_validate_teacher_name() {
        assert_eq!(validate_teacher_name("  Иванов ").unwrap(), "Иванов");
        assert_eq!(validate_teacher_name("Ли").unwrap(), "Ли");
        assert!(validate_teacher_name("И").is_err());
        assert!(validate_teacher_name("   ").is_err());
        assert!(validate_teacher_name("Иванов\nПетров").is_err());
        assert!(validate_teacher_name("/start").is_err());
        assert!(validate_teacher_name(&"я".repeat(65)).is_err());
        assert!(validate_teacher_name(&"я".repeat(64)).is_ok());
    }

    #[test]
    fn test_validate_telegram_chat_id() {
        assert!(validate_telegram_chat_id(123456789).is_ok());
        assert!(validate_telegram_chat_id(-4940561857).is_ok());
        assert!(validate_telegram_chat_id(-1001234567890).is_ok());
        assert!(validate_telegram_chat_id(0).is_err());
        assert!(validate_telegram_chat_id(6_000_000_000).is_ok());
        assert!(validate_telegram_chat_id(1 << 52).is_err());
        assert!(validate_telegram_chat_id(-3000000000000).is_err());
    }
}
