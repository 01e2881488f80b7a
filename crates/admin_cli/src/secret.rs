//! Masked password entry for `create-admin`.

use std::io::Write;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    terminal,
};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

const ATTEMPTS: usize = 3;

#[derive(Debug, PartialEq, Eq)]
enum Step {
    Echo(&'static str),
    Done,
    Cancel,
}

/// Apply one key press to the buffer and say what the terminal should show.
fn step(buf: &mut String, key: KeyEvent) -> Step {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Enter => Step::Done,
        KeyCode::Esc => Step::Cancel,
        KeyCode::Char('c' | 'd') if ctrl => Step::Cancel,
        KeyCode::Backspace => match buf.pop() {
            Some(_) => Step::Echo("\x08 \x08"),
            None => Step::Echo(""),
        },
        KeyCode::Char(ch) if !ctrl => {
            buf.push(ch);
            Step::Echo("*")
        }
        _ => Step::Echo(""),
    }
}

fn read_keys(label: &str) -> Result<String, BoxError> {
    let mut err = std::io::stderr();
    write!(err, "{label}")?;
    err.flush()?;

    let mut buf = String::new();
    loop {
        let Event::Key(key) = event::read()? else {
            continue;
        };
        match step(&mut buf, key) {
            Step::Echo(text) => {
                write!(err, "{text}")?;
                err.flush()?;
            }
            Step::Done => break,
            Step::Cancel => {
                write!(err, "\r\n")?;
                return Err("cancelled".into());
            }
        }
    }
    write!(err, "\r\n")?;
    Ok(buf)
}

/// Read one line without echoing it; raw mode is always restored.
fn read_secret(label: &str) -> Result<String, BoxError> {
    terminal::enable_raw_mode()?;
    let secret = read_keys(label);
    terminal::disable_raw_mode()?;
    secret
}

/// Accept a pair of entries or explain why not.
fn confirm(first: String, second: &str) -> Result<String, &'static str> {
    if first.is_empty() {
        Err("password must not be empty")
    } else if first != second {
        Err("passwords do not match")
    } else {
        Ok(first)
    }
}

/// Ask for a new password and its confirmation, allowing a few retries.
pub fn new_password() -> Result<String, BoxError> {
    for _ in 0..ATTEMPTS {
        let first = read_secret("Password: ")?;
        let second = read_secret("Confirm password: ")?;
        match confirm(first, &second) {
            Ok(password) => return Ok(password),
            Err(reason) => eprintln!("{reason}, try again"),
        }
    }
    Err(format!("no matching password after {ATTEMPTS} attempts").into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn typing_masks_and_backspace_erases() {
        let mut buf = String::new();
        assert_eq!(step(&mut buf, key(KeyCode::Char('h'))), Step::Echo("*"));
        assert_eq!(step(&mut buf, key(KeyCode::Char('i'))), Step::Echo("*"));
        assert_eq!(step(&mut buf, key(KeyCode::Backspace)), Step::Echo("\x08 \x08"));
        assert_eq!(buf, "h");
        step(&mut buf, key(KeyCode::Backspace));
        assert_eq!(step(&mut buf, key(KeyCode::Backspace)), Step::Echo(""));
        assert_eq!(step(&mut buf, key(KeyCode::Enter)), Step::Done);
    }

    #[test]
    fn control_keys_cancel_instead_of_typing() {
        let mut buf = String::new();
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(step(&mut buf, ctrl_c), Step::Cancel);
        assert_eq!(step(&mut buf, key(KeyCode::Esc)), Step::Cancel);
        assert!(buf.is_empty());
    }

    #[test]
    fn confirmation_needs_a_matching_non_empty_pair() {
        assert_eq!(confirm(String::new(), ""), Err("password must not be empty"));
        assert_eq!(confirm("hunter22".into(), "hunter2"), Err("passwords do not match"));
        assert_eq!(confirm("hunter22".into(), "hunter22"), Ok("hunter22".to_string()));
    }
}
