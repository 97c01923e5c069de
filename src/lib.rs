pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod storage;

use std::path::Path;

use chrono::NaiveDate;

use error::AppError;
use model::{Card, CardContent, Outcome, Reschedule};
use storage::CardStore;

/// Main entry point for the leitner library.
///
/// Wraps the cards directory and exposes every scheduling operation.
/// The interactive menu, review session and card creator all go through it.
pub struct Leitner {
    store: CardStore,
}

impl Leitner {
    /// Open the cards directory at the given path, creating it if needed.
    pub fn new(cards_dir: &Path) -> Result<Self, AppError> {
        Ok(Self {
            store: CardStore::open(cards_dir)?,
        })
    }

    pub fn store(&self) -> &CardStore {
        &self.store
    }

    // ── Listing ──────────────────────────────────────────────────────────

    pub fn list_cards(&self) -> Result<Vec<Card>, AppError> {
        self.store.list_all()
    }

    /// Cards due on or before `today`.
    pub fn list_due(&self, today: NaiveDate) -> Result<Vec<Card>, AppError> {
        self.store.list_due(today)
    }

    pub fn count_due(&self, today: NaiveDate) -> Result<usize, AppError> {
        Ok(self.store.list_due(today)?.len())
    }

    pub fn topics(&self) -> Result<Vec<String>, AppError> {
        self.store.topics()
    }

    // ── Card operations ──────────────────────────────────────────────────

    pub fn load_content(&self, card: &Card) -> Result<CardContent, AppError> {
        self.store.load_content(card)
    }

    /// Create a card in box 1, due today.
    pub fn create_card(&self, topic: &str, today: NaiveDate) -> Result<Card, AppError> {
        self.store.create(topic, today)
    }

    // ── Review operations ────────────────────────────────────────────────

    /// Apply a review outcome: pick the new box and due date, then rename the card.
    pub fn reschedule(
        &self,
        card: &Card,
        outcome: Outcome,
        today: NaiveDate,
    ) -> Result<(Card, Reschedule), AppError> {
        let next = engine::advance(card.box_number, outcome, today);
        let moved = self
            .store
            .commit_reschedule(card, next.box_number, next.due_date)?;
        Ok((moved, next))
    }
}
