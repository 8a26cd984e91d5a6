use std::env;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use uni_schedule_bot::config::Config;

// Config reads process-wide environment variables
static CONFIG_TEST_MUTEX: Mutex<()> = Mutex::new(());

const OPTIONAL_VARS: [&str; 10] = [
    "DATABASE_URL",
    "HTTP_PORT",
    "ADMIN_CHAT_ID",
    "SCHEDULE_SOURCES",
    "SCHEDULE_BASE_DIR",
    "CACHE_TTL_SECS",
    "UTC_OFFSET_HOURS",
    "FETCH_TIMEOUT_SECS",
    "SCAN_CONCURRENCY",
    "PREFETCH_CRON",
];

fn clear_optional_vars() {
    for name in OPTIONAL_VARS {
        env::remove_var(name);
    }
}

#[test]
fn test_config_from_env_with_all_vars() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    clear_optional_vars();

    env::set_var("TELEGRAM_BOT_TOKEN", "test_token_123");
    env::set_var("DATABASE_URL", "sqlite:test.db");
    env::set_var("HTTP_PORT", "8080");
    env::set_var("ADMIN_CHAT_ID", "123456789");
    env::set_var("SCHEDULE_SOURCES", "/etc/bot/sources.json");
    env::set_var("SCHEDULE_BASE_DIR", "/srv/schedules");
    env::set_var("CACHE_TTL_SECS", "600");
    env::set_var("UTC_OFFSET_HOURS", "3");
    env::set_var("FETCH_TIMEOUT_SECS", "10");
    env::set_var("SCAN_CONCURRENCY", "8");
    env::set_var("PREFETCH_CRON", "0 0 * * * *");

    let config = Config::from_env().unwrap();

    assert_eq!(config.telegram_bot_token, "test_token_123");
    assert_eq!(config.database_url, "sqlite:test.db");
    assert_eq!(config.http_port, 8080);
    assert_eq!(config.admin_chat_id, Some(123456789));
    assert_eq!(config.schedule_sources, PathBuf::from("/etc/bot/sources.json"));
    assert_eq!(config.schedule_base_dir, PathBuf::from("/srv/schedules"));
    assert_eq!(config.cache_ttl, Duration::from_secs(600));
    assert_eq!(config.utc_offset_hours, 3);
    assert_eq!(config.utc_offset().unwrap().local_minus_utc(), 3 * 3600);
    assert_eq!(config.fetch_timeout, Duration::from_secs(10));
    assert_eq!(config.scan_concurrency, 8);
    assert_eq!(config.prefetch_cron.as_deref(), Some("0 0 * * * *"));

    env::remove_var("TELEGRAM_BOT_TOKEN");
    clear_optional_vars();
}

#[test]
fn test_config_from_env_with_defaults() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    clear_optional_vars();

    env::set_var("TELEGRAM_BOT_TOKEN", "required_token");

    let config = Config::from_env().unwrap();

    assert_eq!(config.telegram_bot_token, "required_token");
    assert_eq!(config.database_url, "sqlite:./data/users.db");
    assert_eq!(config.http_port, 3000);
    assert_eq!(config.admin_chat_id, None);
    assert_eq!(config.schedule_sources, PathBuf::from("./schedule_sources.json"));
    assert_eq!(config.schedule_base_dir, PathBuf::from("./schedules"));
    assert_eq!(config.cache_ttl, Duration::from_secs(3600));
    assert_eq!(config.utc_offset_hours, 5);
    assert_eq!(config.fetch_timeout, Duration::from_secs(30));
    assert_eq!(config.scan_concurrency, 4);
    assert!(config.prefetch_cron.is_none());

    env::remove_var("TELEGRAM_BOT_TOKEN");
}

#[test]
fn test_config_missing_required_token() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();

    env::remove_var("TELEGRAM_BOT_TOKEN");

    let result = Config::from_env();
    assert!(result.is_err());

    let error_msg = result.unwrap_err().to_string();
    assert!(error_msg.contains("TELEGRAM_BOT_TOKEN must be set"));
}

#[test]
fn test_blank_token_counts_as_missing() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();

    env::set_var("TELEGRAM_BOT_TOKEN", "   ");
    assert!(Config::from_env().is_err());

    env::remove_var("TELEGRAM_BOT_TOKEN");
}

#[test]
fn test_config_invalid_values_are_rejected() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    clear_optional_vars();
    env::set_var("TELEGRAM_BOT_TOKEN", "test_token");

    let cases = [
        ("HTTP_PORT", "invalid_port"),
        ("HTTP_PORT", "70000"),
        ("ADMIN_CHAT_ID", "not_a_number"),
        ("ADMIN_CHAT_ID", "0"),
        ("CACHE_TTL_SECS", "0"),
        ("UTC_OFFSET_HOURS", "15"),
        ("FETCH_TIMEOUT_SECS", "-1"),
        ("SCAN_CONCURRENCY", "many"),
    ];

    for (name, value) in cases {
        env::set_var(name, value);
        let result = Config::from_env();
        assert!(result.is_err(), "{}={} should be rejected", name, value);
        assert!(result.unwrap_err().to_string().contains(name));
        env::remove_var(name);
    }

    env::remove_var("TELEGRAM_BOT_TOKEN");
}

#[test]
fn test_scan_concurrency_is_at_least_one() {
    let _guard = CONFIG_TEST_MUTEX.lock().unwrap();
    clear_optional_vars();
    env::set_var("TELEGRAM_BOT_TOKEN", "test_token");
    env::set_var("SCAN_CONCURRENCY", "0");

    let config = Config::from_env().unwrap();
    assert_eq!(config.scan_concurrency, 1);

    env::remove_var("SCAN_CONCURRENCY");
    env::remove_var("TELEGRAM_BOT_TOKEN");
}
