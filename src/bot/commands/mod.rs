pub mod profile;
pub mod registration;
pub mod schedule;
pub mod teacher;

use teloxide::utils::command::BotCommands;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Команды бота расписания:")]
pub enum Command {
    #[command(description = "показать это сообщение")]
    Help,
    #[command(description = "регистрация: факультет, курс, группа")]
    Start,
    #[command(description = "мои данные")]
    Me,
    #[command(description = "сбросить регистрацию")]
    Reset,
    #[command(description = "найти пары преподавателя")]
    Teacher,
    #[command(description = "отменить текущее действие")]
    Cancel,
}
