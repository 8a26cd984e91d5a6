use teloxide::prelude::*;

use crate::bot::context::{BotContext, Sender};
use crate::bot::keyboards::remove_keyboard;
use crate::bot::state::{HandlerResult, ScheduleDialogue};
use crate::database::models::User;
use crate::utils::feedback::CommandFeedback;
use crate::utils::logging::{log_command_error, log_command_start, log_command_success};

pub async fn handle_me(bot: Bot, msg: Message, ctx: &BotContext) -> HandlerResult {
    let Some(sender) = Sender::from_message(&msg) else {
        return Ok(());
    };
    log_command_start("me", &sender.display, sender.id, msg.chat.id.0, None);

    let text = match User::find(&ctx.db.pool, sender.id).await {
        Ok(Some(user)) => format!(
            "Ваши данные:\nФакультет: {}\nКурс: {}\nГруппа: {}",
            user.faculty, user.course, user.user_group
        ),
        Ok(None) => "Вы ещё не зарегистрированы. Используйте /start.".to_string(),
        Err(e) => {
            log_command_error("me", &sender.display, sender.id, msg.chat.id.0, &e.to_string());
            CommandFeedback::new(bot.clone(), msg.chat.id)
                .error("Не удалось получить ваши данные, попробуйте позже.")
                .await?;
            return Ok(());
        }
    };
    bot.send_message(msg.chat.id, text).await?;

    log_command_success("me", &sender.display, sender.id, msg.chat.id.0, None);
    Ok(())
}

pub async fn handle_reset(bot: Bot, msg: Message, dialogue: ScheduleDialogue, ctx: &BotContext) -> HandlerResult {
    let Some(sender) = Sender::from_message(&msg) else {
        return Ok(());
    };
    log_command_start("reset", &sender.display, sender.id, msg.chat.id.0, None);
    dialogue.exit().await?;

    let text = match User::remove(&ctx.db.pool, sender.id).await {
        Ok(true) => "Регистрация сброшена. Используйте /start заново.",
        Ok(false) => "Вы ещё не зарегистрированы.",
        Err(e) => {
            log_command_error("reset", &sender.display, sender.id, msg.chat.id.0, &e.to_string());
            "Не удалось сбросить регистрацию, попробуйте позже."
        }
    };
    bot.send_message(msg.chat.id, text)
        .reply_markup(remove_keyboard())
        .await?;

    log_command_success("reset", &sender.display, sender.id, msg.chat.id.0, None);
    Ok(())
}
