use std::io::{Write, stdout};

use chrono::Local;
use log::error;
use rustyline::DefaultEditor;

use crate::Leitner;
use crate::cli::review::ReviewSession;
use crate::cli::terminal::{ExternalEditor, LineSource};
use crate::cli::{create, name_entry, stats};
use crate::config::Config;
use crate::error::AppError;

const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Create,
    Review,
    Overview,
    Exit,
    Unknown,
}

impl MenuChoice {
    pub fn parse(input: &str) -> Self {
        match input.trim().to_ascii_lowercase().as_str() {
            "1" | "c" => MenuChoice::Create,
            "2" | "r" => MenuChoice::Review,
            "3" | "s" => MenuChoice::Overview,
            "q" | "x" | "4" | "exit" | "quit" => MenuChoice::Exit,
            _ => MenuChoice::Unknown,
        }
    }
}

/// Print the main menu. `due` is `None` when the cards could not be listed.
pub fn render_menu(out: &mut impl Write, due: Option<usize>) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{BOLD}What would you like to do?{RESET}")?;
    writeln!(out, "1) Create a card")?;
    match due {
        Some(n) => writeln!(out, "2) Review your cards ({n} cards to review)")?,
        None => writeln!(out, "2) Review your cards")?,
    }
    writeln!(out, "3) Show box overview")?;
    writeln!(out, "q) Exit")?;
    out.flush()
}

fn report(out: &mut impl Write, e: &AppError) -> std::io::Result<()> {
    error!("{e}");
    writeln!(out, "{RED}{e}{RESET}")
}

/// Main loop of the interactive program. Returns when the user exits or
/// input ends.
pub fn run(app: &Leitner, config: &Config) -> Result<(), AppError> {
    let mut lines = DefaultEditor::new()?;
    let mut editor = ExternalEditor::new(config.editor_command());
    let mut out = stdout();

    writeln!(out, "Welcome to the flashcard program")?;

    loop {
        let today = Local::now().date_naive();
        let due = match app.count_due(today) {
            Ok(n) => Some(n),
            Err(e) => {
                report(&mut out, &e)?;
                None
            }
        };
        render_menu(&mut out, due)?;

        let Some(input) = lines.read_line("> ")? else {
            break;
        };

        let result = match MenuChoice::parse(&input) {
            MenuChoice::Create => create::run(
                app,
                |topics, notice| name_entry::prompt_topic(&mut stdout(), topics, notice),
                &mut editor,
                &mut out,
                today,
            )
            .map(|_| ()),
            MenuChoice::Review => app.list_due(today).and_then(|cards| {
                if cards.is_empty() {
                    writeln!(out, "Nothing to review today.")?;
                    return Ok(());
                }
                ReviewSession::new(app, &mut lines, &mut editor, &mut out, today)
                    .rule_width(config.rule_width)
                    .run(cards, &mut rand::rng())
                    .map(|_| ())
            }),
            MenuChoice::Overview => app.list_cards().and_then(|cards| {
                write!(out, "{}", stats::render(&cards, today))?;
                Ok(())
            }),
            MenuChoice::Exit => break,
            MenuChoice::Unknown => {
                writeln!(out, "Please pick 1, 2, 3 or q.")?;
                Ok(())
            }
        };

        match result {
            Err(e @ AppError::Readline(_)) => return Err(e),
            Err(e) => report(&mut out, &e)?,
            Ok(()) => {}
        }
    }

    writeln!(out, "Bye!")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_menu_input() {
        assert_eq!(MenuChoice::parse("1"), MenuChoice::Create);
        assert_eq!(MenuChoice::parse(" 2\n"), MenuChoice::Review);
        assert_eq!(MenuChoice::parse("3"), MenuChoice::Overview);
        assert_eq!(MenuChoice::parse("Q"), MenuChoice::Exit);
        assert_eq!(MenuChoice::parse(""), MenuChoice::Unknown);
        assert_eq!(MenuChoice::parse("7"), MenuChoice::Unknown);
    }

    #[test]
    fn menu_shows_due_count() {
        let mut out: Vec<u8> = Vec::new();
        render_menu(&mut out, Some(4)).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("1) Create a card"));
        assert!(text.contains("2) Review your cards (4 cards to review)"));
        assert!(text.contains("q) Exit"));

        let mut out: Vec<u8> = Vec::new();
        render_menu(&mut out, None).unwrap();
        assert!(!String::from_utf8(out).unwrap().contains("to review"));
    }
}
