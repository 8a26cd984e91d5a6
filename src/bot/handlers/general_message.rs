use teloxide::prelude::*;

use crate::bot::commands::schedule::{handle_day, is_day_token};
use crate::bot::context::BotContext;
use crate::bot::state::HandlerResult;
use crate::utils::feedback::CommandFeedback;

/// Text outside of any dialogue: day buttons, or a nudge towards /help.
pub async fn handle_general_message(bot: Bot, msg: Message, ctx: BotContext) -> HandlerResult {
    let Some(text) = msg.text().map(str::trim) else {
        return Ok(());
    };

    if is_day_token(text) {
        return handle_day(bot, msg.clone(), text, &ctx).await;
    }

    let feedback = CommandFeedback::new(bot, msg.chat.id);
    if text.starts_with('/') {
        let command = text.split_whitespace().next().unwrap_or(text);
        feedback
            .validation_error(
                &format!("Неизвестная команда: {}", command),
                "Список команд: /help",
            )
            .await?;
    } else if text.to_lowercase().contains("расписан") {
        feedback
            .info("Выберите день на клавиатуре или начните регистрацию: /start")
            .await?;
    }
    // anything else is ignored so group chats are not spammed
    Ok(())
}
