use std::collections::VecDeque;
use std::io::{self, Write};
use std::path::Path;
use std::process::Command;

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{self, ClearType},
};
use log::debug;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::error::AppError;

/// Keeps the terminal in raw mode while alive.
///
/// Dropping the guard restores cooked mode, so every exit path out of a raw
/// read (return, `?`, panic unwind) leaves the terminal usable.
pub struct RawModeGuard {
    _private: (),
}

impl RawModeGuard {
    pub fn acquire() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self { _private: () })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            log::error!("failed to restore terminal mode: {e}");
        }
    }
}

/// A single keystroke as the name entry editor sees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Tab,
    Enter,
    Backspace,
    Esc,
    Other,
}

impl Key {
    fn from_event(ev: KeyEvent) -> Self {
        match ev.code {
            KeyCode::Char('c') if ev.modifiers.contains(KeyModifiers::CONTROL) => Key::Esc,
            KeyCode::Char(c) if !ev.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
                Key::Char(c)
            }
            KeyCode::Tab => Key::Tab,
            KeyCode::Enter => Key::Enter,
            KeyCode::Backspace => Key::Backspace,
            KeyCode::Esc => Key::Esc,
            _ => Key::Other,
        }
    }
}

/// Source of raw keystrokes. Blocks until a key arrives.
pub trait KeySource {
    fn next_key(&mut self) -> io::Result<Key>;
}

/// Keys read from the real terminal. Callers must hold a [`RawModeGuard`].
pub struct TerminalKeys;

impl KeySource for TerminalKeys {
    fn next_key(&mut self) -> io::Result<Key> {
        loop {
            if let Event::Key(ev) = event::read()? {
                if ev.kind == KeyEventKind::Press {
                    return Ok(Key::from_event(ev));
                }
            }
        }
    }
}

/// Scripted keys, for tests and replays. Runs out as `Esc`.
impl KeySource for VecDeque<Key> {
    fn next_key(&mut self) -> io::Result<Key> {
        Ok(self.pop_front().unwrap_or(Key::Esc))
    }
}

/// Source of whole input lines. `Ok(None)` means end of input.
pub trait LineSource {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, AppError>;
}

impl LineSource for DefaultEditor {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, AppError> {
        match self.readline(prompt) {
            Ok(line) => Ok(Some(line)),
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl LineSource for VecDeque<String> {
    fn read_line(&mut self, _prompt: &str) -> Result<Option<String>, AppError> {
        Ok(self.pop_front())
    }
}

/// Opens a card file for editing and waits until the user is done.
pub trait CardEditor {
    fn edit(&mut self, path: &Path) -> Result<(), AppError>;
}

/// Runs an external editor process on the card file.
pub struct ExternalEditor {
    command: Vec<String>,
}

impl ExternalEditor {
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }
}

impl CardEditor for ExternalEditor {
    fn edit(&mut self, path: &Path) -> Result<(), AppError> {
        let Some((program, args)) = self.command.split_first() else {
            return Err(AppError::EditorFailed {
                editor: String::new(),
                status: "no editor configured".to_string(),
            });
        };
        debug!("running {program} on {}", path.display());

        let status = Command::new(program)
            .args(args)
            .arg(path)
            .status()
            .map_err(|e| AppError::EditorFailed {
                editor: program.clone(),
                status: e.to_string(),
            })?;
        if !status.success() {
            return Err(AppError::EditorFailed {
                editor: program.clone(),
                status: status.to_string(),
            });
        }
        Ok(())
    }
}

/// Clear the screen and home the cursor.
pub fn clear_screen(out: &mut impl Write) -> io::Result<()> {
    crossterm::queue!(
        out,
        terminal::Clear(ClearType::All),
        cursor::MoveTo(0, 0)
    )?;
    out.flush()
}

/// Center `text` in a field of `width` columns.
pub fn center(text: &str, width: usize) -> String {
    format!("{text:^width$}")
}
