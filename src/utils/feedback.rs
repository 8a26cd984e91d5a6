use teloxide::prelude::*;
use teloxide::types::{MessageId, ParseMode};

use crate::utils::markdown::escape_markdown;

/// Tone of a short status reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackType {
    Error,
    Info,
    Processing,
}

impl FeedbackType {
    pub fn emoji(&self) -> &'static str {
        match self {
            FeedbackType::Error => "❌",
            FeedbackType::Info => "ℹ️",
            FeedbackType::Processing => "⏳",
        }
    }
}

/// Plain-text status line with its emoji, escaped for MarkdownV2.
pub fn format_feedback(feedback_type: FeedbackType, message: &str) -> String {
    format!("{} {}", feedback_type.emoji(), escape_markdown(message))
}

/// Status replies for one chat
pub struct CommandFeedback {
    bot: Bot,
    chat_id: ChatId,
}

impl CommandFeedback {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }

    pub async fn send(&self, feedback_type: FeedbackType, message: &str) -> ResponseResult<Message> {
        self.bot
            .send_message(self.chat_id, format_feedback(feedback_type, message))
            .parse_mode(ParseMode::MarkdownV2)
            .await
    }

    /// A placeholder to be replaced by [`Self::replace_with_markdown`] once a slow
    /// operation completes.
    pub async fn send_processing(&self, message: &str) -> ResponseResult<Message> {
        self.send(FeedbackType::Processing, message).await
    }

    /// Swaps a placeholder for already-escaped MarkdownV2 text.
    pub async fn replace_with_markdown(&self, message_id: MessageId, text: String) -> ResponseResult<Message> {
        self.bot
            .edit_message_text(self.chat_id, message_id, text)
            .parse_mode(ParseMode::MarkdownV2)
            .await
    }

    pub async fn error(&self, message: &str) -> ResponseResult<Message> {
        self.send(FeedbackType::Error, message).await
    }

    pub async fn info(&self, message: &str) -> ResponseResult<Message> {
        self.send(FeedbackType::Info, message).await
    }

    /// Rejected input with a hint on what to send instead
    pub async fn validation_error(&self, error: &str, suggestion: &str) -> ResponseResult<Message> {
        let text = format!(
            "{}\n\n💡 *Подсказка:* {}",
            format_feedback(FeedbackType::Error, error),
            escape_markdown(suggestion)
        );
        self.bot
            .send_message(self.chat_id, text)
            .parse_mode(ParseMode::MarkdownV2)
            .await
    }
}
