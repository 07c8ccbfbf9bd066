use crate::display::{STORAGE_DATE, STORAGE_DATE_TIME};
use crate::types::BotError;
use chrono::{NaiveDate, NaiveDateTime};
use std::io::{self, BufRead};
use std::path::PathBuf;
use std::{env, fs};

const DATA_DIR_NAME: &str = ".bingy";
const DATA_FILE_NAME: &str = "tasks.txt";

// '9' stands for any ASCII digit; every other byte must match exactly.
const DATE_SHAPE: &str = "9999-99-99";
const DATE_TIME_SHAPE: &str = "9999-99-99T99:99";

/// chrono accepts unpadded fields, so the fixed layout is checked first.
fn has_shape(input: &str, shape: &str) -> bool {
    input.len() == shape.len()
        && input
            .bytes()
            .zip(shape.bytes())
            .all(|(c, s)| if s == b'9' { c.is_ascii_digit() } else { c == s })
}

pub fn parse_date(input: &str) -> Result<NaiveDate, BotError> {
    let trimmed = input.trim();
    let invalid = || BotError::InvalidDateFormat {
        input: input.to_string(),
        expected: "a date like YYYY-MM-DD",
    };

    if !has_shape(trimmed, DATE_SHAPE) {
        return Err(invalid());
    }
    NaiveDate::parse_from_str(trimmed, STORAGE_DATE).map_err(|_| invalid())
}

pub fn parse_date_time(input: &str) -> Result<NaiveDateTime, BotError> {
    let trimmed = input.trim();
    let invalid = || BotError::InvalidDateFormat {
        input: input.to_string(),
        expected: "a date and time like YYYY-MM-DDTHH:MM",
    };

    if !has_shape(trimmed, DATE_TIME_SHAPE) {
        return Err(invalid());
    }
    NaiveDateTime::parse_from_str(trimmed, STORAGE_DATE_TIME).map_err(|_| invalid())
}

/// Reads one line without its terminator, replacing invalid UTF-8 rather
/// than failing. `None` at end of input.
pub fn read_lossy_line(reader: &mut impl BufRead) -> io::Result<Option<String>> {
    let mut buf = Vec::new();
    if reader.read_until(b'\n', &mut buf)? == 0 {
        return Ok(None);
    }

    let raw: &[u8] = &buf;
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    Ok(Some(String::from_utf8_lossy(raw).into_owned()))
}

pub fn is_number(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// Turns a user-facing task number into a 0-based index, checking it
/// against the current list length.
pub fn resolve_index(number: usize, len: usize) -> Result<usize, BotError> {
    if number == 0 || number > len {
        return Err(BotError::InvalidTaskIndex(format!(
            "Index {} is out of bounds (valid range: 1 to {})",
            number, len
        )));
    }
    Ok(number - 1)
}

fn get_bingy_dir() -> Result<PathBuf, BotError> {
    let home = env::var("HOME").map_err(|_| {
        BotError::Io(io::Error::new(
            io::ErrorKind::NotFound,
            "HOME environment variable not found",
        ))
    })?;

    let bingy_dir = PathBuf::from(home).join(DATA_DIR_NAME);
    if !bingy_dir.exists() {
        fs::create_dir_all(&bingy_dir)?;
    }
    Ok(bingy_dir)
}

pub fn get_data_path() -> Result<PathBuf, BotError> {
    Ok(get_bingy_dir()?.join(DATA_FILE_NAME))
}
