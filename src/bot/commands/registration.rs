use teloxide::prelude::*;

use crate::bot::context::{BotContext, Sender};
use crate::bot::keyboards::{courses_keyboard, faculties_keyboard, groups_keyboard, schedule_keyboard};
use crate::bot::state::{HandlerResult, ScheduleDialogue, State};
use crate::database::models::User;
use crate::utils::feedback::CommandFeedback;
use crate::utils::logging::{
    log_command_error, log_command_start, log_command_success, log_database_error,
    log_validation_error,
};
use crate::utils::validation::{validate_course, validate_faculty, validate_group_choice};

/// `/start`: drops any previous registration and asks for the faculty.
pub async fn handle_start(bot: Bot, msg: Message, dialogue: ScheduleDialogue, ctx: &BotContext) -> HandlerResult {
    let Some(sender) = Sender::from_message(&msg) else {
        return Ok(());
    };
    let chat_id = msg.chat.id.0;
    log_command_start("start", &sender.display, sender.id, chat_id, None);

    match User::find(&ctx.db.pool, sender.id).await {
        Ok(Some(old)) => {
            match User::remove(&ctx.db.pool, sender.id).await {
                Ok(_) => {
                    ctx.notify_admin(&bot, format!("🗑 Удалена старая запись пользователя:\n{}", old.summary()))
                        .await;
                }
                Err(e) => log_database_error("DELETE", "users", &e.to_string(), Some("on /start")),
            }
        }
        Ok(None) => {}
        Err(e) => {
            // registration can still proceed, the upsert at the end replaces the row
            log_database_error("SELECT", "users", &e.to_string(), Some("on /start"));
        }
    }

    bot.send_message(msg.chat.id, "Добро пожаловать! Выберите ваш факультет:")
        .reply_markup(faculties_keyboard())
        .await?;
    dialogue.update(State::ChoosingFaculty).await?;

    log_command_success("start", &sender.display, sender.id, chat_id, None);
    Ok(())
}

pub async fn receive_faculty(bot: Bot, msg: Message, dialogue: ScheduleDialogue) -> HandlerResult {
    let text = msg.text().unwrap_or_default();
    match validate_faculty(text) {
        Ok(faculty) => {
            bot.send_message(msg.chat.id, "Теперь выберите ваш курс:")
                .reply_markup(courses_keyboard())
                .await?;
            dialogue
                .update(State::ChoosingCourse {
                    faculty: faculty.name.to_string(),
                })
                .await?;
        }
        Err(e) => {
            log_validation_error("faculty", text, &e.to_string(), msg.chat.id.0);
            bot.send_message(msg.chat.id, "Выберите факультет из предложенных:")
                .reply_markup(faculties_keyboard())
                .await?;
        }
    }
    Ok(())
}

pub async fn receive_course(
    bot: Bot,
    msg: Message,
    dialogue: ScheduleDialogue,
    faculty: String,
    ctx: &BotContext,
) -> HandlerResult {
    let text = msg.text().unwrap_or_default();
    let course = match validate_course(text) {
        Ok(course) => course,
        Err(e) => {
            log_validation_error("course", text, &e.to_string(), msg.chat.id.0);
            bot.send_message(msg.chat.id, "Выберите курс от 1 до 5:")
                .reply_markup(courses_keyboard())
                .await?;
            return Ok(());
        }
    };

    let groups = ctx.schedule.available_groups(&faculty, course).await;
    if groups.is_empty() {
        bot.send_message(
            msg.chat.id,
            format!(
                "Для {} {} курса не найдено расписания.\nПопробуйте другой курс.",
                faculty, course
            ),
        )
        .reply_markup(courses_keyboard())
        .await?;
        return Ok(());
    }

    bot.send_message(msg.chat.id, "Выберите вашу группу:")
        .reply_markup(groups_keyboard(&groups))
        .await?;
    dialogue
        .update(State::ChoosingGroup {
            faculty,
            course,
            groups,
        })
        .await?;
    Ok(())
}

pub async fn receive_group(
    bot: Bot,
    msg: Message,
    dialogue: ScheduleDialogue,
    (faculty, course, groups): (String, u8, Vec<String>),
    ctx: &BotContext,
) -> HandlerResult {
    let Some(sender) = Sender::from_message(&msg) else {
        return Ok(());
    };
    let text = msg.text().unwrap_or_default();
    let group = match validate_group_choice(text, &groups) {
        Ok(group) => group.to_string(),
        Err(e) => {
            log_validation_error("group", text, &e.to_string(), sender.id);
            bot.send_message(msg.chat.id, "Пожалуйста, выберите группу из предложенных.")
                .reply_markup(groups_keyboard(&groups))
                .await?;
            return Ok(());
        }
    };

    let user = User::new(
        sender.id,
        sender.full_name.clone(),
        sender.username.clone(),
        faculty,
        course,
        group,
    );
    if let Err(e) = user.upsert(&ctx.db.pool).await {
        log_command_error("register", &sender.display, sender.id, msg.chat.id.0, &e.to_string());
        CommandFeedback::new(bot.clone(), msg.chat.id)
            .error("Не удалось сохранить регистрацию. Попробуйте ещё раз: /start")
            .await?;
        dialogue.exit().await?;
        return Ok(());
    }

    ctx.notify_admin(&bot, format!("✅ Новый пользователь зарегистрирован:\n{}", user.summary()))
        .await;

    bot.send_message(
        msg.chat.id,
        format!(
            "✅ Регистрация завершена!\nФакультет: {}\nКурс: {}\nГруппа: {}\n\nТеперь можно посмотреть расписание:",
            user.faculty, user.course, user.user_group
        ),
    )
    .reply_markup(schedule_keyboard())
    .await?;
    dialogue.exit().await?;

    log_command_success(
        "register",
        &sender.display,
        sender.id,
        msg.chat.id.0,
        Some(&format!("{} / {} / {}", user.faculty, user.course, user.user_group)),
    );
    Ok(())
}
