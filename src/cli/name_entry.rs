use std::io::Write;

use crossterm::{
    cursor,
    terminal::{self, ClearType},
};

use crate::cli::terminal::{Key, KeySource, RawModeGuard, TerminalKeys};
use crate::error::AppError;

const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

const PROMPT: &str = "Topic (Tab completes, Esc cancels): ";

/// How a name prompt ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    Accepted(String),
    Cancelled,
}

/// Result of feeding one key to the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    Continue,
    Done(Prompt),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Editing,
    /// Tab was pressed; `index` points into the candidate list.
    Cycling { index: usize },
}

/// Existing topics starting with `prefix` (case-sensitive), sorted.
pub fn filter_candidates(topics: &[String], prefix: &str) -> Vec<String> {
    let mut matches: Vec<String> = topics
        .iter()
        .filter(|t| t.starts_with(prefix))
        .cloned()
        .collect();
    matches.sort();
    matches
}

/// Line editor for a new card topic with Tab completion over existing topics.
///
/// While cycling, the candidate list stays the one computed for the text typed
/// before the first Tab. The first non-Tab key commits the highlighted
/// candidate as the text and is then handled normally.
pub struct NameEntry<'a> {
    topics: &'a [String],
    input: String,
    candidates: Vec<String>,
    mode: Mode,
}

impl<'a> NameEntry<'a> {
    pub fn new(topics: &'a [String]) -> Self {
        Self {
            topics,
            input: String::new(),
            candidates: filter_candidates(topics, ""),
            mode: Mode::Editing,
        }
    }

    /// Text as currently shown: the highlighted candidate while cycling.
    pub fn buffer(&self) -> &str {
        match self.mode {
            Mode::Cycling { index } => &self.candidates[index],
            Mode::Editing => &self.input,
        }
    }

    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    pub fn selection(&self) -> Option<usize> {
        match self.mode {
            Mode::Cycling { index } => Some(index),
            Mode::Editing => None,
        }
    }

    pub fn handle(&mut self, key: Key) -> Step {
        if key == Key::Tab {
            self.cycle();
            return Step::Continue;
        }

        if let Mode::Cycling { index } = self.mode {
            self.input = self.candidates[index].clone();
            self.mode = Mode::Editing;
            self.refresh();
        }

        match key {
            Key::Esc => Step::Done(Prompt::Cancelled),
            Key::Enter => Step::Done(Prompt::Accepted(self.input.clone())),
            Key::Backspace => {
                if self.input.pop().is_some() {
                    self.refresh();
                }
                Step::Continue
            }
            Key::Char(c) if !c.is_control() => {
                self.input.push(c);
                self.refresh();
                Step::Continue
            }
            Key::Char(_) | Key::Other | Key::Tab => Step::Continue,
        }
    }

    fn cycle(&mut self) {
        if self.candidates.is_empty() {
            return;
        }
        self.mode = match self.mode {
            Mode::Editing => Mode::Cycling { index: 0 },
            Mode::Cycling { index } => Mode::Cycling {
                index: (index + 1) % self.candidates.len(),
            },
        };
    }

    fn refresh(&mut self) {
        self.candidates = filter_candidates(self.topics, &self.input);
    }

    /// Redraw the prompt from the top of the screen.
    ///
    /// The candidate under the cycle cursor is faded and the rest are
    /// highlighted. `notice` is shown above the prompt (validation errors).
    pub fn render(&self, out: &mut impl Write, notice: Option<&str>) -> std::io::Result<()> {
        crossterm::queue!(
            out,
            cursor::MoveTo(0, 0),
            terminal::Clear(ClearType::FromCursorDown)
        )?;

        let mut prompt_row: u16 = 0;
        if let Some(notice) = notice {
            write!(out, "{RED}{notice}{RESET}\r\n")?;
            prompt_row = 1;
        }
        write!(out, "{PROMPT}{}\r\n", self.buffer())?;

        let selected = self.selection();
        for (i, candidate) in self.candidates.iter().enumerate() {
            if Some(i) == selected {
                write!(out, "  {DIM}{candidate}{RESET}\r\n")?;
            } else {
                write!(out, "  {GREEN}{candidate}{RESET}\r\n")?;
            }
        }

        let column = (PROMPT.chars().count() + self.buffer().chars().count()) as u16;
        crossterm::queue!(out, cursor::MoveTo(column, prompt_row))?;
        out.flush()
    }
}

/// Run the editor until the user accepts or cancels.
pub fn read_topic(
    keys: &mut impl KeySource,
    out: &mut impl Write,
    topics: &[String],
    notice: Option<&str>,
) -> Result<Prompt, AppError> {
    let mut entry = NameEntry::new(topics);
    entry.render(out, notice)?;

    loop {
        let key = keys.next_key()?;
        match entry.handle(key) {
            Step::Continue => entry.render(out, notice)?,
            Step::Done(prompt) => {
                crossterm::queue!(out, terminal::Clear(ClearType::FromCursorDown))?;
                write!(out, "\r\n")?;
                out.flush()?;
                return Ok(prompt);
            }
        }
    }
}

/// [`read_topic`] against the real terminal, in raw mode for the duration.
pub fn prompt_topic(
    out: &mut impl Write,
    topics: &[String],
    notice: Option<&str>,
) -> Result<Prompt, AppError> {
    let _raw = RawModeGuard::acquire()?;
    read_topic(&mut TerminalKeys, out, topics, notice)
}
