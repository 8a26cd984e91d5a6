use teloxide::prelude::*;
use teloxide::types::ParseMode;

use crate::bot::context::{BotContext, Sender};
use crate::bot::keyboards::{remove_keyboard, schedule_keyboard};
use crate::bot::state::HandlerResult;
use crate::database::models::User;
use crate::schedule::DayToken;
use crate::utils::feedback::CommandFeedback;
use crate::utils::logging::{log_command_error, log_command_start, log_command_success};

/// Whether a free-text message is one of the day buttons.
pub fn is_day_token(text: &str) -> bool {
    text.parse::<DayToken>().is_ok()
}

/// Replies with the registered user's schedule for the chosen day.
pub async fn handle_day(bot: Bot, msg: Message, token: &str, ctx: &BotContext) -> HandlerResult {
    let Some(sender) = Sender::from_message(&msg) else {
        return Ok(());
    };
    let chat_id = msg.chat.id.0;
    log_command_start("day", &sender.display, sender.id, chat_id, Some(token));

    let user = match User::find(&ctx.db.pool, sender.id).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            bot.send_message(msg.chat.id, "Сначала зарегистрируйтесь с помощью /start")
                .reply_markup(remove_keyboard())
                .await?;
            return Ok(());
        }
        Err(e) => {
            log_command_error("day", &sender.display, sender.id, chat_id, &e.to_string());
            CommandFeedback::new(bot.clone(), msg.chat.id)
                .error("Не удалось получить ваши данные, попробуйте позже.")
                .await?;
            return Ok(());
        }
    };

    let today = ctx.schedule.today();
    let text = match ctx
        .schedule
        .render_day_schedule(&user.faculty, user.course(), &user.user_group, token, today)
        .await
    {
        Ok(text) => text,
        Err(e) => {
            log_command_error("day", &sender.display, sender.id, chat_id, &e.to_string());
            CommandFeedback::new(bot.clone(), msg.chat.id)
                .error("Выберите день на клавиатуре.")
                .await?;
            return Ok(());
        }
    };

    bot.send_message(msg.chat.id, text)
        .parse_mode(ParseMode::MarkdownV2)
        .reply_markup(schedule_keyboard())
        .await?;

    log_command_success("day", &sender.display, sender.id, chat_id, Some(&user.user_group));
    Ok(())
}
