use std::io::Write;

use chrono::NaiveDate;
use log::{info, warn};
use rand::Rng;
use rand::seq::SliceRandom;

use crate::Leitner;
use crate::cli::markdown::format_code_blocks;
use crate::cli::terminal::{CardEditor, LineSource, center, clear_screen};
use crate::error::AppError;
use crate::model::{Card, Outcome, Reschedule};

const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";

const REVEAL_PROMPT: &str = "Ready to see the back? Press Enter";
const OUTCOME_PROMPT: &str = "Previous box ('P') // Next box ('N') // This box ('T') // Edit ('E')";

/// What the user answered after seeing the back of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Edit,
    Grade(Outcome),
}

impl Choice {
    /// `p` demotes, `n` promotes, `e` edits, anything else keeps the box.
    pub fn parse(input: &str) -> Self {
        match input.trim().to_ascii_lowercase().as_str() {
            "e" => Choice::Edit,
            "p" => Choice::Grade(Outcome::Demote),
            "n" => Choice::Grade(Outcome::Promote),
            _ => Choice::Grade(Outcome::Repeat),
        }
    }
}

/// How a single card's turn ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Turn {
    Rescheduled(Outcome, Reschedule),
    EditRequested,
    InputEnded,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub promoted: usize,
    pub demoted: usize,
    pub repeated: usize,
    pub edited: usize,
    pub failed: usize,
    /// Cards never reached because input ended.
    pub remaining: usize,
}

impl SessionSummary {
    pub fn reviewed(&self) -> usize {
        self.promoted + self.demoted + self.repeated
    }
}

/// Study loop over a set of due cards.
///
/// Each card goes front → back → outcome. A failure on one card (bad content,
/// rename race, editor error) is reported and the session moves on; only a
/// failing input source ends it with an error.
pub struct ReviewSession<'a, L, E, W> {
    app: &'a Leitner,
    lines: &'a mut L,
    editor: &'a mut E,
    out: &'a mut W,
    today: NaiveDate,
    rule_width: usize,
}

impl<'a, L, E, W> ReviewSession<'a, L, E, W>
where
    L: LineSource,
    E: CardEditor,
    W: Write,
{
    pub fn new(
        app: &'a Leitner,
        lines: &'a mut L,
        editor: &'a mut E,
        out: &'a mut W,
        today: NaiveDate,
    ) -> Self {
        Self {
            app,
            lines,
            editor,
            out,
            today,
            rule_width: 80,
        }
    }

    pub fn rule_width(mut self, width: usize) -> Self {
        self.rule_width = width;
        self
    }

    /// Review `cards` in random order.
    pub fn run<R>(&mut self, mut cards: Vec<Card>, rng: &mut R) -> Result<SessionSummary, AppError>
    where
        R: Rng + ?Sized,
    {
        cards.shuffle(rng);
        let mut summary = SessionSummary::default();
        let total = cards.len();

        for (i, card) in cards.iter().enumerate() {
            match self.review_card(card) {
                Ok(Turn::Rescheduled(outcome, _)) => match outcome {
                    Outcome::Promote => summary.promoted += 1,
                    Outcome::Demote => summary.demoted += 1,
                    Outcome::Repeat => summary.repeated += 1,
                },
                Ok(Turn::EditRequested) => summary.edited += 1,
                Ok(Turn::InputEnded) => {
                    summary.remaining = total - i;
                    break;
                }
                Err(e @ AppError::Readline(_)) => return Err(e),
                Err(e) => {
                    summary.failed += 1;
                    if e.is_commit_race() {
                        warn!("{} left unchanged: {e}", card.file_name());
                    } else {
                        warn!("skipping {}: {e}", card.file_name());
                    }
                    writeln!(self.out, "{RED}{}: {e}{RESET}", card.file_name())?;
                }
            }
        }

        info!(
            "session done: {} reviewed, {} edited, {} failed, {} left",
            summary.reviewed(),
            summary.edited,
            summary.failed,
            summary.remaining
        );
        writeln!(
            self.out,
            "{GREEN}Reviewed {} card(s): {} promoted, {} demoted, {} kept, {} edited, {} failed{RESET}",
            summary.reviewed(),
            summary.promoted,
            summary.demoted,
            summary.repeated,
            summary.edited,
            summary.failed
        )?;
        Ok(summary)
    }

    fn review_card(&mut self, card: &Card) -> Result<Turn, AppError> {
        let content = self.app.load_content(card)?;
        let rule = "_".repeat(self.rule_width);

        clear_screen(&mut *self.out)?;
        writeln!(self.out, "{DIM}{}{RESET}\n", card.file_name())?;
        writeln!(self.out, "{}", format_code_blocks(&content.front))?;
        writeln!(self.out, "{rule}")?;
        writeln!(self.out, "{}", center(REVEAL_PROMPT, self.rule_width))?;
        self.out.flush()?;
        if self.lines.read_line("")?.is_none() {
            return Ok(Turn::InputEnded);
        }

        writeln!(self.out, "{}", format_code_blocks(&content.back))?;
        writeln!(self.out, "{rule}")?;
        writeln!(self.out, "{}", center(OUTCOME_PROMPT, self.rule_width))?;
        self.out.flush()?;
        let Some(answer) = self.lines.read_line("")? else {
            return Ok(Turn::InputEnded);
        };

        match Choice::parse(&answer) {
            Choice::Edit => {
                self.editor.edit(&card.path)?;
                Ok(Turn::EditRequested)
            }
            Choice::Grade(outcome) => {
                let (_, next) = self.app.reschedule(card, outcome, self.today)?;
                Ok(Turn::Rescheduled(outcome, next))
            }
        }
    }
}
