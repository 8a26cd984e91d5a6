use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::types::User as TelegramUser;

use crate::database::connection::DatabaseManager;
use crate::schedule::ScheduleService;

/// Shared state handed to every handler through the dispatcher.
#[derive(Clone)]
pub struct BotContext {
    pub db: DatabaseManager,
    pub schedule: Arc<ScheduleService>,
    pub admin_chat: Option<ChatId>,
}

impl BotContext {
    pub fn new(db: DatabaseManager, schedule: Arc<ScheduleService>, admin_chat: Option<i64>) -> Self {
        Self {
            db,
            schedule,
            admin_chat: admin_chat.map(ChatId),
        }
    }

    /// Sends a plain-text notice to the admin chat, if one is configured.
    /// Failures are logged and otherwise ignored.
    pub async fn notify_admin(&self, bot: &Bot, text: String) {
        let Some(chat) = self.admin_chat else {
            return;
        };
        if let Err(e) = bot.send_message(chat, text).await {
            tracing::warn!("Failed to notify admin chat {}: {}", chat, e);
        }
    }
}

/// Who sent a message, in the shape the log helpers want.
pub struct Sender {
    pub id: i64,
    pub display: String,
    pub full_name: String,
    pub username: Option<String>,
}

impl Sender {
    pub fn from_message(msg: &Message) -> Option<Self> {
        msg.from().map(Self::from_user)
    }

    pub fn from_user(user: &TelegramUser) -> Self {
        let full_name = user.full_name();
        Self {
            id: user.id.0 as i64,
            display: user.username.clone().unwrap_or_else(|| full_name.clone()),
            full_name: if full_name.trim().is_empty() {
                "Неизвестно".to_string()
            } else {
                full_name
            },
            username: user.username.clone(),
        }
    }
}
