use crate::types::{BotError, Task, TaskKind};
use chrono::NaiveDate;
use colored::*;
use terminal_size::{Width, terminal_size};
use textwrap::wrap;

const WRAP_COLUMN: usize = 80;
const DIVIDER_CHARACTER: char = '─';

pub const DISPLAY_DATE: &str = "%b %-d %Y";
pub const DISPLAY_DATE_TIME: &str = "%b %-d %Y %H:%M";
pub const STORAGE_DATE: &str = "%Y-%m-%d";
pub const STORAGE_DATE_TIME: &str = "%Y-%m-%dT%H:%M";

const LOGO: &str = r#"
  .-.
 (o o)   boo!
 | O \
  \   \
   `~~~'
"#;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DateStyle {
    /// Human-facing, e.g. `Dec 31 2025`.
    Display,
    /// ISO-8601, stable across versions.
    Storage,
}

/// Renders `[<tag>][<status>] <description> <extra>` with dates in the
/// requested style.
pub fn format_task(task: &Task, style: DateStyle) -> String {
    let (date_fmt, date_time_fmt) = match style {
        DateStyle::Display => (DISPLAY_DATE, DISPLAY_DATE_TIME),
        DateStyle::Storage => (STORAGE_DATE, STORAGE_DATE_TIME),
    };

    let head = format!(
        "[{}][{}] {}",
        task.kind().tag(),
        task.status_icon(),
        task.description()
    );

    match task.kind() {
        TaskKind::ToDo => head,
        TaskKind::Deadline { due } => format!("{} (by: {})", head, due.format(date_fmt)),
        TaskKind::Event { start, end } => format!(
            "{} (from: {}, to: {})",
            head,
            start.format(date_time_fmt),
            end.format(date_time_fmt)
        ),
    }
}

pub fn storage_line(task: &Task) -> String {
    format_task(task, DateStyle::Storage)
}

pub fn format_numbered<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> String {
    tasks
        .into_iter()
        .enumerate()
        .map(|(idx, task)| format!("{}. {}", idx + 1, task))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn task_count(count: usize) -> String {
    let noun = if count == 1 { "task" } else { "tasks" };
    format!("Now you have {} {} in the list", count, noun)
}

pub fn greeting() -> String {
    format!(
        "{}\nBoo! I'm Bingy\nWHAT caaan't I dooOoo for yoou?",
        LOGO.trim_matches('\n')
    )
}

pub fn farewell() -> String {
    "bbbYEE. Hope to scaaare you again sooOOon!".to_string()
}

pub fn list_message(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "Your list is as empty as a haunted house. Add something!".to_string();
    }
    format!(
        "Here's the list of chores you will NOT complete MUAHAHA\n{}",
        format_numbered(tasks)
    )
}

pub fn added_message(task: &Task, count: usize) -> String {
    let intro = match task.kind() {
        TaskKind::ToDo => "Another chore for the pile:",
        TaskKind::Deadline { .. } => "Tick tock, the clock is haunting you:",
        TaskKind::Event { .. } => "Ooooh, somewhere to be:",
    };
    format!("{}\n  {}\n{}", intro, task, task_count(count))
}

pub fn marked_message(task: &Task) -> String {
    format!("Hopefully you did it properly... marked it for you:\n  {}", task)
}

pub fn unmarked_message(task: &Task) -> String {
    format!("Ha! I knew you couldn't do it. Unmarked:\n  {}", task)
}

pub fn deleted_message(task: &Task, count: usize) -> String {
    format!(
        "Removing it from the list doesn't make it go away. Removed:\n  {}\n{}",
        task,
        task_count(count)
    )
}

pub fn matches_message(keyword: &str, tasks: &[&Task]) -> String {
    if tasks.is_empty() {
        return format!("No matching tasks found for: {}", keyword);
    }
    format!(
        "I found what you were looking for:\n{}",
        format_numbered(tasks.iter().copied())
    )
}

pub fn schedule_message(date: NaiveDate, tasks: &[&Task]) -> String {
    let day = date.format(DISPLAY_DATE);
    if tasks.is_empty() {
        return format!("Nothing is haunting you on {}.", day);
    }
    format!(
        "Here's what's haunting you on {}:\n{}",
        day,
        format_numbered(tasks.iter().copied())
    )
}

pub fn print_greeting() {
    let text = greeting();
    print_framed(&text, |line| line.bright_magenta().to_string());
}

pub fn print_response(text: &str) {
    print_framed(text, |line| line.to_string());
}

pub fn print_error(err: &BotError) {
    print_framed(&err.to_string(), |line| line.bright_red().to_string());
}

fn print_framed(text: &str, paint: impl Fn(&str) -> String) {
    let width = term_width().min(WRAP_COLUMN);
    let divider = DIVIDER_CHARACTER.to_string().repeat(width);

    println!("{}", divider.dimmed());
    for raw in text.lines() {
        if raw.is_empty() {
            println!();
            continue;
        }
        for line in wrap(raw, width) {
            println!("{}", paint(&line));
        }
    }
    println!("{}", divider.dimmed());
}

fn term_width() -> usize {
    terminal_size()
        .map(|(Width(w), _)| w as usize)
        .unwrap_or(WRAP_COLUMN)
}
