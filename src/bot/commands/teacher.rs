use teloxide::prelude::*;

use crate::bot::context::{BotContext, Sender};
use crate::bot::keyboards::{remove_keyboard, schedule_keyboard};
use crate::bot::state::{HandlerResult, ScheduleDialogue, State};
use crate::schedule::date::parse_user_date;
use crate::utils::feedback::CommandFeedback;
use crate::utils::logging::{
    log_command_error, log_command_start, log_command_success, log_validation_error,
};
use crate::utils::validation::validate_teacher_name;

pub async fn handle_teacher(bot: Bot, msg: Message, dialogue: ScheduleDialogue) -> HandlerResult {
    if let Some(sender) = Sender::from_message(&msg) {
        log_command_start("teacher", &sender.display, sender.id, msg.chat.id.0, None);
    }
    bot.send_message(
        msg.chat.id,
        "Введите фамилию преподавателя (можно с инициалами).\nОтмена: /cancel",
    )
    .reply_markup(remove_keyboard())
    .await?;
    dialogue.update(State::TeacherName).await?;
    Ok(())
}

pub async fn receive_teacher_name(bot: Bot, msg: Message, dialogue: ScheduleDialogue) -> HandlerResult {
    let text = msg.text().unwrap_or_default();
    match validate_teacher_name(text) {
        Ok(name) => {
            bot.send_message(
                msg.chat.id,
                "На какую дату искать? Напишите «сегодня», «завтра», день недели (пн…вс) или дату вида 09.12.",
            )
            .await?;
            dialogue.update(State::TeacherDate { name }).await?;
        }
        Err(e) => {
            log_validation_error("teacher_name", text, &e.to_string(), msg.chat.id.0);
            CommandFeedback::new(bot.clone(), msg.chat.id)
                .validation_error(&e.to_string(), "Например: Иванов или Иванов И.И.")
                .await?;
        }
    }
    Ok(())
}

/// Runs the scan. A placeholder is sent first since a cold scan loads every
/// timetable document.
pub async fn receive_teacher_date(
    bot: Bot,
    msg: Message,
    dialogue: ScheduleDialogue,
    name: String,
    ctx: &BotContext,
) -> HandlerResult {
    let text = msg.text().unwrap_or_default();
    let feedback = CommandFeedback::new(bot.clone(), msg.chat.id);
    let today = ctx.schedule.today();

    if let Err(e) = parse_user_date(text, today) {
        log_validation_error("teacher_date", text, &e.to_string(), msg.chat.id.0);
        feedback
            .validation_error(
                "Не удалось распознать дату.",
                "Напишите «сегодня», «завтра», пн…вс или дату вида 09.12.",
            )
            .await?;
        return Ok(());
    }

    let placeholder = feedback.send_processing("Ищу пары преподавателя…").await?;
    let rendered = ctx.schedule.render_teacher_schedule(&name, text, today).await;
    dialogue.exit().await?;

    match rendered {
        Ok(rendered) => {
            feedback.replace_with_markdown(placeholder.id, rendered).await?;
            bot.send_message(msg.chat.id, "Выберите день, чтобы посмотреть своё расписание.")
                .reply_markup(schedule_keyboard())
                .await?;
            if let Some(sender) = Sender::from_message(&msg) {
                log_command_success("teacher", &sender.display, sender.id, msg.chat.id.0, Some(&name));
            }
        }
        Err(e) => {
            if let Some(sender) = Sender::from_message(&msg) {
                log_command_error("teacher", &sender.display, sender.id, msg.chat.id.0, &e.to_string());
            }
            feedback.error("Поиск не удался, попробуйте ещё раз: /teacher").await?;
        }
    }
    Ok(())
}
