use teloxide::dispatching::dialogue::{Dialogue, InMemStorage};

/// Per-chat dialogue position.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum State {
    /// Not in a dialogue; day buttons and commands are handled.
    #[default]
    Idle,
    ChoosingFaculty,
    ChoosingCourse {
        faculty: String,
    },
    ChoosingGroup {
        faculty: String,
        course: u8,
        groups: Vec<String>,
    },
    TeacherName,
    TeacherDate {
        name: String,
    },
}

pub type ScheduleDialogue = Dialogue<State, InMemStorage<State>>;
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;
pub type HandlerResult = Result<(), HandlerError>;
