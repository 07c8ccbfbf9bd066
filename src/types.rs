use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use std::{fmt, io};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("Huh?? Did you say \"{0}\"? I don't know that one")]
    InvalidCommand(String),

    #[error("You can't add an empty {0} item. Try again.")]
    EmptyTask(&'static str),

    #[error(
        "Please add a date you want your task done by\n Example: \"deadline return book /by YYYY-MM-DD\""
    )]
    EmptyDeadlineTime,

    #[error(
        "Please add a start and end time for your event\n Example: \"event project meeting /from YYYY-MM-DDTHH:MM /to YYYY-MM-DDTHH:MM\""
    )]
    EmptyEventTime,

    #[error("Cannot search nothing: please add a keyword you want to search")]
    EmptyKeyword,

    #[error("{0}")]
    InvalidTaskIndex(String),

    #[error("Unable to parse '{input}'. Expected {expected}")]
    InvalidDateFormat {
        input: String,
        expected: &'static str,
    },

    #[error("Couldn't save tasks after {action}: {source}")]
    StorageWrite {
        action: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskKind {
    ToDo,
    Deadline {
        due: NaiveDate,
    },
    Event {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

impl TaskKind {
    /// Single-letter tag used in both the display and storage forms.
    pub fn tag(&self) -> char {
        match self {
            TaskKind::ToDo => 'T',
            TaskKind::Deadline { .. } => 'D',
            TaskKind::Event { .. } => 'E',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    description: String,
    done: bool,
    kind: TaskKind,
}

impl Task {
    fn new(description: impl Into<String>, kind: TaskKind) -> Self {
        Task {
            description: description.into(),
            done: false,
            kind,
        }
    }

    pub fn todo(description: impl Into<String>) -> Self {
        Task::new(description, TaskKind::ToDo)
    }

    pub fn deadline(description: impl Into<String>, due: NaiveDate) -> Self {
        Task::new(description, TaskKind::Deadline { due })
    }

    pub fn event(
        description: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Self {
        Task::new(description, TaskKind::Event { start, end })
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn kind(&self) -> &TaskKind {
        &self.kind
    }

    pub fn status_icon(&self) -> char {
        if self.done { 'X' } else { ' ' }
    }

    pub fn mark_done(&mut self) {
        self.done = true;
    }

    pub fn mark_undone(&mut self) {
        self.done = false;
    }

    /// Whether the task falls on `date`. To-dos have no date and never do.
    pub fn occurs_on(&self, date: NaiveDate) -> bool {
        match self.kind {
            TaskKind::ToDo => false,
            TaskKind::Deadline { due } => due == date,
            TaskKind::Event { start, end } => {
                let day_start = date.and_time(NaiveTime::MIN);
                let day_end = date.and_time(end_of_day());
                start <= day_end && end >= day_start
            }
        }
    }

    /// Moment used to order tasks sharing a day: end of day for deadlines,
    /// the start time for events.
    pub fn schedule_time(&self, _date: NaiveDate) -> Option<NaiveDateTime> {
        match self.kind {
            TaskKind::ToDo => None,
            TaskKind::Deadline { due } => Some(due.and_time(deadline_time())),
            TaskKind::Event { start, .. } => Some(start),
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&crate::display::format_task(
            self,
            crate::display::DateStyle::Display,
        ))
    }
}

/// Time of day a deadline falls at when placed on a schedule.
pub fn deadline_time() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 0).unwrap_or(NaiveTime::MIN)
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999).unwrap_or(NaiveTime::MIN)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    Bye,
    Todo {
        description: String,
    },
    Deadline {
        description: String,
        due: NaiveDate,
    },
    Event {
        description: String,
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
    Mark {
        number: usize,
    },
    Unmark {
        number: usize,
    },
    Delete {
        number: usize,
    },
    Find {
        keyword: String,
    },
    View {
        date: NaiveDate,
    },
}
