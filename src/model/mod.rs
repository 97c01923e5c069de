use std::path::PathBuf;

use chrono::NaiveDate;

/// Lowest and highest Leitner box a card can sit in.
pub const MIN_BOX: u8 = 1;
pub const MAX_BOX: u8 = 7;

/// A card as seen in the cards directory.
///
/// The path is the card's identity: due date, box and topic are all decoded
/// from the file name and nothing else is stored about a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    pub path: PathBuf,
    pub due_date: NaiveDate,
    pub box_number: u8,
    pub topic: String,
}

impl Card {
    pub fn is_due(&self, today: NaiveDate) -> bool {
        self.due_date <= today
    }

    /// File name without the directory, for display.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Front and back of a card, loaded for a single review turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardContent {
    pub front: String,
    pub back: String,
}

/// How well the card was recalled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Promote,
    Demote,
    Repeat,
}

/// Where a card goes after a review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reschedule {
    pub box_number: u8,
    pub due_date: NaiveDate,
}

/// Number of cards per box, index 0 is box 1.
pub type BoxCounts = [usize; MAX_BOX as usize];
