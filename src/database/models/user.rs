use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};

use crate::utils::logging::{log_database_error, log_database_operation};

/// A registered student. One row per Telegram user.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct User {
    pub user_id: i64,
    pub full_name: String,
    pub username: Option<String>,
    pub faculty: String,
    pub course: i64,
    pub user_group: String,
    pub registered_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        user_id: i64,
        full_name: impl Into<String>,
        username: Option<String>,
        faculty: impl Into<String>,
        course: u8,
        user_group: impl Into<String>,
    ) -> Self {
        Self {
            user_id,
            full_name: full_name.into(),
            username,
            faculty: faculty.into(),
            course: i64::from(course),
            user_group: user_group.into(),
            registered_at: Utc::now(),
        }
    }

    /// Course as stored, clamped into the keyboard range.
    pub fn course(&self) -> u8 {
        self.course.clamp(1, 5) as u8
    }

    /// `@username`, or a placeholder for users without one.
    pub fn handle(&self) -> String {
        match &self.username {
            Some(name) if !name.is_empty() => format!("@{}", name),
            _ => "нет username".to_string(),
        }
    }

    /// Multi-line summary used in profile replies and admin notices.
    pub fn summary(&self) -> String {
        format!(
            "Имя: {}\nUsername: {}\nФакультет: {}\nКурс: {}\nГруппа: {}",
            self.full_name,
            self.handle(),
            self.faculty,
            self.course,
            self.user_group
        )
    }

    /// Inserts the user or replaces the registration of an existing one.
    pub async fn upsert(&self, pool: &SqlitePool) -> Result<(), sqlx::Error> {
        log_database_operation("UPSERT", "users", Some(&format!("user_id={}", self.user_id)));
        sqlx::query(
            r#"
            INSERT INTO users (user_id, full_name, username, faculty, course, user_group, registered_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (user_id) DO UPDATE SET
                full_name = excluded.full_name,
                username = excluded.username,
                faculty = excluded.faculty,
                course = excluded.course,
                user_group = excluded.user_group,
                registered_at = excluded.registered_at
            "#,
        )
        .bind(self.user_id)
        .bind(&self.full_name)
        .bind(&self.username)
        .bind(&self.faculty)
        .bind(self.course)
        .bind(&self.user_group)
        .bind(self.registered_at)
        .execute(pool)
        .await
        .map_err(|e| {
            log_database_error("UPSERT", "users", &e.to_string(), None);
            e
        })?;
        Ok(())
    }

    pub async fn find(pool: &SqlitePool, user_id: i64) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT user_id, full_name, username, faculty, course, user_group, registered_at FROM users WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// Deletes the registration; `true` if there was one.
    pub async fn remove(pool: &SqlitePool, user_id: i64) -> Result<bool, sqlx::Error> {
        log_database_operation("DELETE", "users", Some(&format!("user_id={}", user_id)));
        let result = sqlx::query("DELETE FROM users WHERE user_id = ?")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT user_id, full_name, username, faculty, course, user_group, registered_at FROM users ORDER BY registered_at",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn count(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }
}
