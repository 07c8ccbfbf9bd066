//! Turns raw text into typed values.
//!
//! Live input is strict and reports what went wrong. Storage lines are
//! lenient: anything that does not reconstruct cleanly is dropped.

use crate::types::{BotError, Command, Task, deadline_time};
use crate::utils::{is_number, parse_date, parse_date_time};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

const BY_SEPARATOR: &str = " /by ";
const FROM_SEPARATOR: &str = " /from ";
const TO_SEPARATOR: &str = " /to ";

const STORAGE_PREFIX_LEN: usize = 7;
const STORAGE_TAG_OFFSET: usize = 1;
const STORAGE_STATUS_OFFSET: usize = 4;

pub fn parse_command(input: &str, today: NaiveDate) -> Result<Command, BotError> {
    let line = input.trim();
    let verb = line.split_whitespace().next().unwrap_or("");
    // Keep the leading whitespace so separators right after the verb still match.
    let rest = &line[verb.len()..];

    match verb.to_lowercase().as_str() {
        "list" => no_argument(line, rest, Command::List),
        "bye" | "exit" => no_argument(line, rest, Command::Bye),
        "todo" => parse_todo(rest),
        "deadline" => parse_deadline(rest),
        "event" => parse_event(rest),
        "mark" => parse_number(rest, "mark").map(|number| Command::Mark { number }),
        "unmark" => parse_number(rest, "unmark").map(|number| Command::Unmark { number }),
        "delete" => parse_number(rest, "delete").map(|number| Command::Delete { number }),
        "find" => parse_find(rest),
        "view" => parse_view(rest, today),
        _ => Err(BotError::InvalidCommand(verb.to_string())),
    }
}

fn no_argument(line: &str, rest: &str, command: Command) -> Result<Command, BotError> {
    if rest.trim().is_empty() {
        Ok(command)
    } else {
        Err(BotError::InvalidCommand(line.to_string()))
    }
}

fn parse_todo(rest: &str) -> Result<Command, BotError> {
    let description = rest.trim();
    if description.is_empty() {
        return Err(BotError::EmptyTask("todo"));
    }
    Ok(Command::Todo {
        description: description.to_string(),
    })
}

fn parse_deadline(rest: &str) -> Result<Command, BotError> {
    let (description, due) = match rest.split_once(BY_SEPARATOR) {
        Some((description, due)) => (description.trim(), due.trim()),
        None => (rest.trim(), ""),
    };

    if description.is_empty() {
        return Err(BotError::EmptyTask("deadline"));
    }
    if due.is_empty() {
        return Err(BotError::EmptyDeadlineTime);
    }

    Ok(Command::Deadline {
        description: description.to_string(),
        due: parse_date(due)?,
    })
}

fn parse_event(rest: &str) -> Result<Command, BotError> {
    let Some((description, times)) = rest.split_once(FROM_SEPARATOR) else {
        return Err(if rest.trim().is_empty() {
            BotError::EmptyTask("event")
        } else {
            BotError::EmptyEventTime
        });
    };

    let description = description.trim();
    if description.is_empty() {
        return Err(BotError::EmptyTask("event"));
    }

    let (start, end) = times
        .split_once(TO_SEPARATOR)
        .map(|(start, end)| (start.trim(), end.trim()))
        .ok_or(BotError::EmptyEventTime)?;
    if start.is_empty() || end.is_empty() {
        return Err(BotError::EmptyEventTime);
    }

    Ok(Command::Event {
        description: description.to_string(),
        start: parse_date_time(start)?,
        end: parse_date_time(end)?,
    })
}

fn parse_number(rest: &str, verb: &str) -> Result<usize, BotError> {
    let raw = rest.trim();
    if raw.is_empty() {
        return Err(BotError::InvalidTaskIndex(format!(
            "Please provide a task number after the command. Example: {} 2",
            verb
        )));
    }

    if !is_number(raw) {
        return Err(BotError::InvalidTaskIndex(format!(
            "Give me a task number, like 1 or 2. '{}' won't do.",
            raw
        )));
    }

    match raw.parse::<usize>() {
        Ok(0) => Err(BotError::InvalidTaskIndex(
            "Task numbers start at 1. Try 'list' to see them.".to_string(),
        )),
        Ok(n) => Ok(n),
        Err(_) => Err(BotError::InvalidTaskIndex(format!(
            "Index {} is out of bounds. Try 'list' to see your tasks.",
            raw
        ))),
    }
}

fn parse_find(rest: &str) -> Result<Command, BotError> {
    let keyword = rest.trim();
    if keyword.is_empty() {
        return Err(BotError::EmptyKeyword);
    }
    Ok(Command::Find {
        keyword: keyword.to_string(),
    })
}

fn parse_view(rest: &str, today: NaiveDate) -> Result<Command, BotError> {
    let raw = rest.trim();
    let date = if raw.is_empty() {
        today
    } else {
        parse_date(raw)?
    };
    Ok(Command::View { date })
}

/// Rebuilds a task from one line of the storage file. Returns `None` for
/// anything malformed.
pub fn parse_storage_line(line: &str) -> Option<Task> {
    let bytes = line.as_bytes();
    if bytes.len() < STORAGE_PREFIX_LEN {
        return None;
    }

    let tag = bytes[STORAGE_TAG_OFFSET];
    let done = bytes[STORAGE_STATUS_OFFSET] == b'X';
    let rest = line.get(STORAGE_PREFIX_LEN..)?.trim();

    let mut task = match tag {
        b'T' => parse_stored_todo(rest)?,
        b'D' => parse_stored_deadline(rest)?,
        b'E' => parse_stored_event(rest)?,
        _ => return None,
    };

    if done {
        task.mark_done();
    }
    Some(task)
}

fn parse_stored_todo(rest: &str) -> Option<Task> {
    if rest.is_empty() {
        return None;
    }
    Some(Task::todo(rest))
}

fn parse_stored_deadline(rest: &str) -> Option<Task> {
    let by_idx = rest.rfind("(by:")?;
    let description = rest[..by_idx].trim();
    let when = rest[by_idx..].trim();

    let by = when.strip_prefix("(by:")?.strip_suffix(')')?.trim();
    if description.is_empty() || by.is_empty() {
        return None;
    }

    let due = parse_date(by).ok()?;
    Some(Task::deadline(description, due))
}

fn parse_stored_event(rest: &str) -> Option<Task> {
    let from_idx = rest.rfind("(from:")?;
    let description = rest[..from_idx].trim();
    let times = rest[from_idx + "(from:".len()..].strip_suffix(')')?.trim();

    let to_idx = times.rfind(", to:")?;
    let start = times[..to_idx].trim();
    let end = times[to_idx + ", to:".len()..].trim();
    if description.is_empty() || start.is_empty() || end.is_empty() {
        return None;
    }

    let start = stored_date_time(start, NaiveTime::MIN)?;
    let end = stored_date_time(end, deadline_time())?;
    Some(Task::event(description, start, end))
}

/// Full date-time first, then a bare date at `fallback`.
fn stored_date_time(raw: &str, fallback: NaiveTime) -> Option<NaiveDateTime> {
    parse_date_time(raw)
        .ok()
        .or_else(|| parse_date(raw).ok().map(|date| date.and_time(fallback)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::storage_line;
    use crate::types::TaskKind;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 25).unwrap()
    }

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        day(y, m, d).and_hms_opt(h, min, 0).unwrap()
    }

    fn parse(input: &str) -> Result<Command, BotError> {
        parse_command(input, today())
    }

    #[test]
    fn test_verbs_are_case_insensitive() {
        assert_eq!(parse("LIST").unwrap(), Command::List);
        assert_eq!(parse("  Bye ").unwrap(), Command::Bye);
        assert_eq!(parse("exit").unwrap(), Command::Bye);
        assert_eq!(
            parse("ToDo buy milk").unwrap(),
            Command::Todo {
                description: "buy milk".into()
            }
        );
    }

    #[test]
    fn test_unknown_verb_carries_token() {
        match parse("dance wildly") {
            Err(BotError::InvalidCommand(token)) => assert_eq!(token, "dance"),
            other => panic!("unexpected: {:?}", other),
        }
        assert!(matches!(parse("   "), Err(BotError::InvalidCommand(_))));
    }

    #[test]
    fn test_list_rejects_arguments() {
        assert!(matches!(
            parse("list everything"),
            Err(BotError::InvalidCommand(_))
        ));
    }

    #[test]
    fn test_todo_requires_description() {
        assert!(matches!(parse("todo"), Err(BotError::EmptyTask("todo"))));
        assert!(matches!(parse("todo    "), Err(BotError::EmptyTask("todo"))));
    }

    #[test]
    fn test_deadline_parses_iso_date() {
        assert_eq!(
            parse("deadline return book /by 2025-09-25").unwrap(),
            Command::Deadline {
                description: "return book".into(),
                due: day(2025, 9, 25),
            }
        );
    }

    #[test]
    fn test_deadline_missing_parts() {
        assert!(matches!(
            parse("deadline"),
            Err(BotError::EmptyTask("deadline"))
        ));
        assert!(matches!(
            parse("deadline /by 2025-09-25"),
            Err(BotError::EmptyTask("deadline"))
        ));
        assert!(matches!(
            parse("deadline just text no by"),
            Err(BotError::EmptyDeadlineTime)
        ));
        assert!(matches!(
            parse("deadline desc /by   "),
            Err(BotError::EmptyDeadlineTime)
        ));
    }

    #[test]
    fn test_deadline_bad_date() {
        assert!(matches!(
            parse("deadline report /by notadate"),
            Err(BotError::InvalidDateFormat { .. })
        ));
    }

    #[test]
    fn test_deadline_splits_on_first_separator() {
        assert!(matches!(
            parse("deadline a /by 2025-01-01 /by 2025-02-02"),
            Err(BotError::InvalidDateFormat { .. })
        ));
    }

    #[test]
    fn test_event_parses_iso_date_times() {
        assert_eq!(
            parse("event party /from 2025-09-25T18:00 /to 2025-09-25T21:00").unwrap(),
            Command::Event {
                description: "party".into(),
                start: at(2025, 9, 25, 18, 0),
                end: at(2025, 9, 25, 21, 0),
            }
        );
    }

    #[test]
    fn test_event_missing_parts() {
        assert!(matches!(parse("event"), Err(BotError::EmptyTask("event"))));
        assert!(matches!(
            parse("event /from 2025-09-25T18:00 /to 2025-09-25T21:00"),
            Err(BotError::EmptyTask("event"))
        ));
        assert!(matches!(
            parse("event party"),
            Err(BotError::EmptyEventTime)
        ));
        assert!(matches!(
            parse("event party /from 2025-09-25T18:00"),
            Err(BotError::EmptyEventTime)
        ));
        assert!(matches!(
            parse("event party /from 2025-09-25T18:00 /to   "),
            Err(BotError::EmptyEventTime)
        ));
    }

    #[test]
    fn test_event_bad_time() {
        assert!(matches!(
            parse("event party /from 6pm /to 9pm"),
            Err(BotError::InvalidDateFormat { .. })
        ));
    }

    #[test]
    fn test_event_end_before_start_is_accepted() {
        assert!(parse("event odd /from 2025-09-25T21:00 /to 2025-09-25T18:00").is_ok());
    }

    #[test]
    fn test_index_commands() {
        assert_eq!(parse("mark 2").unwrap(), Command::Mark { number: 2 });
        assert_eq!(parse("unmark 1").unwrap(), Command::Unmark { number: 1 });
        assert_eq!(parse("DELETE 3").unwrap(), Command::Delete { number: 3 });
    }

    #[test]
    fn test_index_commands_reject_bad_numbers() {
        for input in ["mark", "mark two", "unmark -1", "delete 0", "mark 1.5"] {
            assert!(
                matches!(parse(input), Err(BotError::InvalidTaskIndex(_))),
                "{input}"
            );
        }
    }

    #[test]
    fn test_huge_index_reads_as_out_of_bounds() {
        match parse("mark 99999999999999999999") {
            Err(BotError::InvalidTaskIndex(msg)) => {
                assert!(msg.contains("out of bounds"), "{msg}");
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_dates_need_padding() {
        assert!(matches!(
            parse("deadline x /by 2025-9-5"),
            Err(BotError::InvalidDateFormat { .. })
        ));
        assert!(matches!(
            parse("event x /from 2025-09-25T9:00 /to 2025-09-25T10:00"),
            Err(BotError::InvalidDateFormat { .. })
        ));
    }

    #[test]
    fn test_find_requires_keyword() {
        assert!(matches!(parse("find"), Err(BotError::EmptyKeyword)));
        assert_eq!(
            parse("find  milk ").unwrap(),
            Command::Find {
                keyword: "milk".into()
            }
        );
    }

    #[test]
    fn test_view_defaults_to_today() {
        assert_eq!(parse("view").unwrap(), Command::View { date: today() });
        assert_eq!(
            parse("view 2025-12-31").unwrap(),
            Command::View {
                date: day(2025, 12, 31)
            }
        );
        assert!(matches!(
            parse("view tomorrow"),
            Err(BotError::InvalidDateFormat { .. })
        ));
    }

    #[test]
    fn test_storage_lines_for_each_kind() {
        let todo = parse_storage_line("[T][ ] read book").unwrap();
        assert_eq!(todo, Task::todo("read book"));

        let deadline = parse_storage_line("[D][X] submit (by: 2025-12-31)").unwrap();
        assert!(deadline.is_done());
        assert_eq!(
            deadline.kind(),
            &TaskKind::Deadline {
                due: day(2025, 12, 31)
            }
        );

        let event =
            parse_storage_line("[E][ ] party (from: 2025-09-25T18:00, to: 2025-09-25T21:00)")
                .unwrap();
        assert_eq!(
            event,
            Task::event("party", at(2025, 9, 25, 18, 0), at(2025, 9, 25, 21, 0))
        );
    }

    #[test]
    fn test_storage_uses_last_marker() {
        let task = parse_storage_line("[D][ ] read (by: chapter 3) (by: 2025-12-31)").unwrap();
        assert_eq!(task.description(), "read (by: chapter 3)");

        let task = parse_storage_line(
            "[E][ ] meet (from: hq, to: lab) (from: 2025-09-25T18:00, to: 2025-09-25T21:00)",
        )
        .unwrap();
        assert_eq!(task.description(), "meet (from: hq, to: lab)");
    }

    #[test]
    fn test_storage_event_falls_back_to_dates() {
        let task = parse_storage_line("[E][ ] trip (from: 2025-09-25, to: 2025-09-27)").unwrap();
        assert_eq!(
            task.kind(),
            &TaskKind::Event {
                start: at(2025, 9, 25, 0, 0),
                end: at(2025, 9, 27, 23, 59),
            }
        );
    }

    #[test]
    fn test_storage_rejects_malformed_lines() {
        for line in [
            "",
            "garbage",
            "[T][ ]",
            "[T][ ]    ",
            "[Q][ ] mystery",
            "[D][ ] no date",
            "[D][ ] (by: 2025-12-31)",
            "[D][ ] bad (by: someday)",
            "[D][ ] open (by: 2025-12-31",
            "[E][ ] party (from: 2025-09-25T18:00)",
            "[E][ ] party (from: , to: 2025-09-25T21:00)",
            "[E][ ] party (from: later, to: never)",
            "[T][é]x",
            "[T][éé] x",
            "[T][ ]éclair",
            "[D][ ] pay (by: 2025-9-5)",
        ] {
            assert!(parse_storage_line(line).is_none(), "{line:?}");
        }
    }

    #[test]
    fn test_storage_round_trip_all_kinds() {
        let mut done = Task::deadline("file taxes", day(2026, 4, 15));
        done.mark_done();
        let tasks = vec![
            Task::todo("buy milk"),
            done,
            Task::event(
                "conference",
                at(2025, 9, 25, 9, 30),
                at(2025, 9, 26, 17, 0),
            ),
        ];

        for task in tasks {
            let line = storage_line(&task);
            assert_eq!(parse_storage_line(&line), Some(task), "{line}");
        }
    }
}
