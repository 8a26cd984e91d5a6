use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::bot::commands::{profile, registration, teacher, Command};
use crate::bot::context::BotContext;
use crate::bot::keyboards::remove_keyboard;
use crate::bot::state::{HandlerResult, ScheduleDialogue};

pub async fn command_handler(
    bot: Bot,
    msg: Message,
    cmd: Command,
    dialogue: ScheduleDialogue,
    ctx: BotContext,
) -> HandlerResult {
    match cmd {
        Command::Help => {
            bot.send_message(msg.chat.id, Command::descriptions().to_string()).await?;
        }
        Command::Start => {
            registration::handle_start(bot, msg, dialogue, &ctx).await?;
        }
        Command::Me => {
            profile::handle_me(bot, msg, &ctx).await?;
        }
        Command::Reset => {
            profile::handle_reset(bot, msg, dialogue, &ctx).await?;
        }
        Command::Teacher => {
            teacher::handle_teacher(bot, msg, dialogue).await?;
        }
        Command::Cancel => {
            dialogue.exit().await?;
            bot.send_message(msg.chat.id, "Действие отменено.")
                .reply_markup(remove_keyboard())
                .await?;
        }
    }
    Ok(())
}
