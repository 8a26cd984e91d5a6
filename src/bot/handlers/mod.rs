pub mod general_message;
pub mod message;

use teloxide::dispatching::dialogue::{self, InMemStorage};
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;

use crate::bot::commands::{registration, teacher, Command};
use crate::bot::context::BotContext;
use crate::bot::state::{HandlerError, ScheduleDialogue, State};

pub struct BotHandler {
    pub ctx: BotContext,
}

impl BotHandler {
    pub fn new(ctx: BotContext) -> Self {
        Self { ctx }
    }

    /// Values injected into every endpoint.
    pub fn dependencies(&self) -> DependencyMap {
        dptree::deps![InMemStorage::<State>::new(), self.ctx.clone()]
    }

    /// Commands are matched in every state so that `/start` and `/cancel`
    /// always get the user out of a half-finished dialogue.
    pub fn schema(&self) -> UpdateHandler<HandlerError> {
        use dptree::case;

        let command_handler = teloxide::filter_command::<Command, _>().endpoint(message::command_handler);

        let message_handler = Update::filter_message()
            .branch(command_handler)
            .branch(case![State::ChoosingFaculty].endpoint(registration::receive_faculty))
            .branch(case![State::ChoosingCourse { faculty }].endpoint(
                |bot: Bot, msg: Message, dialogue: ScheduleDialogue, faculty: String, ctx: BotContext| async move {
                    registration::receive_course(bot, msg, dialogue, faculty, &ctx).await
                },
            ))
            .branch(case![State::ChoosingGroup { faculty, course, groups }].endpoint(
                |bot: Bot,
                 msg: Message,
                 dialogue: ScheduleDialogue,
                 choice: (String, u8, Vec<String>),
                 ctx: BotContext| async move {
                    registration::receive_group(bot, msg, dialogue, choice, &ctx).await
                },
            ))
            .branch(case![State::TeacherName].endpoint(teacher::receive_teacher_name))
            .branch(case![State::TeacherDate { name }].endpoint(
                |bot: Bot, msg: Message, dialogue: ScheduleDialogue, name: String, ctx: BotContext| async move {
                    teacher::receive_teacher_date(bot, msg, dialogue, name, &ctx).await
                },
            ))
            .branch(case![State::Idle].endpoint(general_message::handle_general_message));

        dialogue::enter::<Update, InMemStorage<State>, State, _>().branch(message_handler)
    }
}

