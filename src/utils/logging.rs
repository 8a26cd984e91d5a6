//! Log lines with fixed prefixes (`CMD_START`, `DB_ERROR`, `SOURCE_ERROR`, ...)
//! so they can be grepped out of the combined bot output.

use tracing::{debug, error, info, warn};

/// ` - details`, or nothing.
fn tail(details: Option<&str>) -> String {
    details.map(|d| format!(" - {}", d)).unwrap_or_default()
}

fn who(command: &str, user: &str, user_id: i64, chat_id: i64) -> String {
    format!("{} by {}({}) in chat {}", command, user, user_id, chat_id)
}

pub fn log_command_start(command: &str, user: &str, user_id: i64, chat_id: i64, details: Option<&str>) {
    info!("CMD_START: {}{}", who(command, user, user_id, chat_id), tail(details));
}

pub fn log_command_success(command: &str, user: &str, user_id: i64, chat_id: i64, details: Option<&str>) {
    info!("CMD_SUCCESS: {}{}", who(command, user, user_id, chat_id), tail(details));
}

pub fn log_command_error(command: &str, user: &str, user_id: i64, chat_id: i64, error: &str) {
    error!("CMD_ERROR: {} - {}", who(command, user, user_id, chat_id), error);
}

/// Dialogue input that was rejected and asked for again.
pub fn log_validation_error(step: &str, value: &str, error: &str, user_id: i64) {
    warn!("VALIDATION_ERROR: {} '{}' from {}: {}", step, value, user_id, error);
}

pub fn log_database_operation(operation: &str, table: &str, details: Option<&str>) {
    debug!("DB_OP: {} on {}{}", operation, table, tail(details));
}

pub fn log_database_error(operation: &str, table: &str, error: &str, details: Option<&str>) {
    error!("DB_ERROR: {} on {} failed: {}{}", operation, table, error, tail(details));
}

/// `event` is `hit` or `miss`.
pub fn log_cache_event(event: &str, source_key: &str) {
    debug!("CACHE: {} {}", event, source_key);
}

/// A schedule document that could not be used.
pub fn log_source_error(source_key: &str, error: &str) {
    warn!("SOURCE_ERROR: {} - {}", source_key, error);
}

pub fn log_timeout(operation: &str, duration_secs: u64, details: Option<&str>) {
    warn!("TIMEOUT: {} after {}s{}", operation, duration_secs, tail(details));
}

pub fn log_system_event(event: &str, details: Option<&str>) {
    info!("SYSTEM: {}{}", event, tail(details));
}
