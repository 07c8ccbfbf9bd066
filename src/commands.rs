use crate::display::{
    added_message, deleted_message, farewell, list_message, marked_message, matches_message,
    schedule_message, unmarked_message,
};
use crate::manager::TaskManager;
use crate::parser::parse_command;
use crate::storage::{Storage, load_tasks, save_tasks};
use crate::types::{BotError, Command};
use crate::utils::resolve_index;
use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, error, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub text: String,
    pub exit: bool,
}

impl Response {
    fn say(text: String) -> Self {
        Response { text, exit: false }
    }
}

/// Everything one chat session owns: the task list and where it is saved.
pub struct Session<S: Storage> {
    manager: TaskManager,
    storage: S,
}

impl<S: Storage> Session<S> {
    pub fn new(storage: S) -> Self {
        Session {
            manager: TaskManager::new(),
            storage,
        }
    }

    /// Fills the task list from storage. Malformed lines are dropped.
    pub fn load(&mut self) -> Result<usize, BotError> {
        let tasks = load_tasks(&self.storage)?;
        let count = tasks.len();
        self.manager.add_all(tasks);
        Ok(count)
    }

    /// Parses and runs one line of input.
    pub fn respond(&mut self, input: &str, today: NaiveDate) -> Result<Response, BotError> {
        let command = parse_command(input, today)?;
        debug!(?command, "parsed command");
        execute_command(self, command)
    }

    pub fn manager(&self) -> &TaskManager {
        &self.manager
    }

    #[cfg(test)]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn persist(&mut self, action: &'static str) -> Result<(), BotError> {
        save_tasks(&mut self.storage, self.manager.tasks()).map_err(|source| {
            error!(action, error = %source, "failed to save tasks");
            BotError::StorageWrite { action, source }
        })
    }
}

pub fn execute_command<S: Storage>(
    session: &mut Session<S>,
    command: Command,
) -> Result<Response, BotError> {
    match command {
        Command::List => Ok(Response::say(list_message(session.manager.tasks()))),

        Command::Bye => Ok(Response {
            text: farewell(),
            exit: true,
        }),

        Command::Todo { description } => {
            session.manager.add_todo(&description);
            handle_added(session)
        }

        Command::Deadline { description, due } => {
            session.manager.add_deadline(&description, due);
            handle_added(session)
        }

        Command::Event {
            description,
            start,
            end,
        } => handle_add_event(session, &description, start, end),

        Command::Mark { number } => handle_mark(session, number),

        Command::Unmark { number } => handle_unmark(session, number),

        Command::Delete { number } => handle_delete(session, number),

        Command::Find { keyword } => {
            let found = session.manager.find(&keyword);
            Ok(Response::say(matches_message(&keyword, &found)))
        }

        Command::View { date } => {
            let schedule = session.manager.schedule_for(date);
            Ok(Response::say(schedule_message(date, &schedule)))
        }
    }
}

/// Persists after an append and confirms the newest task.
fn handle_added<S: Storage>(session: &mut Session<S>) -> Result<Response, BotError> {
    session.persist("adding")?;

    let tasks = session.manager.tasks();
    let added = &tasks[tasks.len() - 1];
    Ok(Response::say(added_message(added, tasks.len())))
}

fn handle_add_event<S: Storage>(
    session: &mut Session<S>,
    description: &str,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<Response, BotError> {
    if start > end {
        warn!(%start, %end, "event ends before it starts");
    }
    session.manager.add_event(description, start, end);
    handle_added(session)
}

fn handle_mark<S: Storage>(session: &mut Session<S>, number: usize) -> Result<Response, BotError> {
    let index = resolve_index(number, session.manager.len())?;
    let text = marked_message(session.manager.mark_done(index));
    session.persist("marking")?;
    Ok(Response::say(text))
}

fn handle_unmark<S: Storage>(
    session: &mut Session<S>,
    number: usize,
) -> Result<Response, BotError> {
    let index = resolve_index(number, session.manager.len())?;
    let text = unmarked_message(session.manager.mark_undone(index));
    session.persist("unmarking")?;
    Ok(Response::say(text))
}

fn handle_delete<S: Storage>(
    session: &mut Session<S>,
    number: usize,
) -> Result<Response, BotError> {
    let index = resolve_index(number, session.manager.len())?;
    let removed = session.manager.delete_task(index);
    session.persist("deleting")?;
    Ok(Response::say(deleted_message(
        &removed,
        session.manager.len(),
    )))
}
