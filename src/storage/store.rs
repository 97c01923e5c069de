use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use log::debug;

use crate::error::AppError;
use crate::model::{Card, CardContent, MIN_BOX};
use crate::storage::codec;

/// The cards directory. Its listing is the whole scheduling state.
#[derive(Debug, Clone)]
pub struct CardStore {
    root: PathBuf,
}

/// Check that a topic can be used for a new card (ASCII letters and digits only).
pub fn validate_topic(topic: &str) -> Result<(), AppError> {
    if topic.is_empty() || !topic.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AppError::InvalidTopicCharacters(topic.to_string()));
    }
    Ok(())
}

impl CardStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Open a store, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, AppError> {
        let store = Self::new(root);
        fs::create_dir_all(&store.root)?;
        Ok(store)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    // ── Listing ──────────────────────────────────────────────────────────

    /// Every card in the directory, sorted by due date then topic.
    ///
    /// Directories and hidden files are ignored; any other entry that does
    /// not decode fails the whole listing.
    pub fn list_all(&self) -> Result<Vec<Card>, AppError> {
        let mut cards = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() || entry.file_name().to_string_lossy().starts_with('.')
            {
                continue;
            }
            let path = entry.path();
            let (due_date, box_number, topic) = codec::decode_identity(&path)?;
            cards.push(Card {
                path,
                due_date,
                box_number,
                topic,
            });
        }
        cards.sort_by(|a, b| (a.due_date, &a.topic).cmp(&(b.due_date, &b.topic)));
        Ok(cards)
    }

    /// Cards whose due date is today or earlier.
    pub fn list_due(&self, today: NaiveDate) -> Result<Vec<Card>, AppError> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|c| c.is_due(today))
            .collect())
    }

    /// All topics, sorted. Used for autocomplete and duplicate checks.
    pub fn topics(&self) -> Result<Vec<String>, AppError> {
        let mut topics: Vec<String> = self.list_all()?.into_iter().map(|c| c.topic).collect();
        topics.sort();
        Ok(topics)
    }

    // ── Content ──────────────────────────────────────────────────────────

    pub fn load_content(&self, card: &Card) -> Result<CardContent, AppError> {
        let raw = fs::read_to_string(&card.path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => AppError::NotFound(card.path.clone()),
            _ => AppError::Io(e),
        })?;
        codec::decode_content(&raw, &card.path)
    }

    // ── Mutation ─────────────────────────────────────────────────────────

    /// Rename a card to its new box and due date.
    ///
    /// The rename is a single `rename(2)`: a concurrent reader sees either the
    /// old name or the new one. An existing destination is never overwritten.
    pub fn commit_reschedule(
        &self,
        card: &Card,
        new_box: u8,
        new_due_date: NaiveDate,
    ) -> Result<Card, AppError> {
        let new_path = codec::encode_identity(&self.root, new_due_date, new_box, &card.topic);

        if !card.path.exists() {
            return Err(AppError::NotFound(card.path.clone()));
        }
        if new_path != card.path && new_path.exists() {
            return Err(AppError::RenameConflict(new_path));
        }

        fs::rename(&card.path, &new_path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => AppError::NotFound(card.path.clone()),
            _ => AppError::Io(e),
        })?;
        debug!(
            "renamed {} -> {}",
            card.path.display(),
            new_path.display()
        );

        Ok(Card {
            path: new_path,
            due_date: new_due_date,
            box_number: new_box,
            topic: card.topic.clone(),
        })
    }

    /// Create a new card in box 1, due `today`, with an empty front and back.
    pub fn create(&self, topic: &str, today: NaiveDate) -> Result<Card, AppError> {
        validate_topic(topic)?;
        if self.list_all()?.iter().any(|c| c.topic == topic) {
            return Err(AppError::DuplicateTopic(topic.to_string()));
        }

        let path = codec::encode_identity(&self.root, today, MIN_BOX, topic);
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => AppError::DuplicateTopic(topic.to_string()),
                _ => AppError::Io(e),
            })?;
        file.write_all(codec::encode_new_card_content().as_bytes())?;
        debug!("created {}", path.display());

        Ok(Card {
            path,
            due_date: today,
            box_number: MIN_BOX,
            topic: topic.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    /// Helper: a store over an empty temporary directory.
    fn test_store() -> (TempDir, CardStore) {
        let dir = TempDir::new().unwrap();
        let store = CardStore::open(dir.path()).unwrap();
        (dir, store)
    }

    fn touch(store: &CardStore, name: &str) {
        fs::write(store.root().join(name), "Q\n<card_bottom_flag>\nA\n").unwrap();
    }

    #[test]
    fn list_due_includes_today_and_past_but_not_tomorrow() {
        let (_dir, store) = test_store();
        touch(&store, "2024-01-09_1_Yesterday.md");
        touch(&store, "2024-01-10_2_Today.md");
        touch(&store, "2024-01-11_3_Tomorrow.md");

        let due: Vec<String> = store
            .list_due(day(2024, 1, 10))
            .unwrap()
            .into_iter()
            .map(|c| c.topic)
            .collect();
        assert_eq!(due, vec!["Yesterday".to_string(), "Today".to_string()]);
    }

    #[test]
    fn list_all_skips_hidden_files_and_directories() {
        let (_dir, store) = test_store();
        touch(&store, "2024-01-01_1_Real.md");
        touch(&store, ".2024-01-01_1_Real.md.swp");
        fs::create_dir(store.root().join("archive")).unwrap();

        let cards = store.list_all().unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].topic, "Real");
        assert_eq!(cards[0].box_number, 1);
    }

    #[test]
    fn malformed_entry_fails_listing_with_its_name() {
        let (_dir, store) = test_store();
        touch(&store, "2024-01-01_1_Fine.md");
        touch(&store, "todo.txt");

        match store.list_all() {
            Err(AppError::MalformedIdentity { name, .. }) => assert_eq!(name, "todo.txt"),
            other => panic!("expected MalformedIdentity, got {other:?}"),
        }
    }

    #[test]
    fn create_writes_sentinel_only_card() {
        let (_dir, store) = test_store();
        let card = store.create("Test1", day(2024, 1, 1)).unwrap();

        assert_eq!(card.file_name(), "2024-01-01_1_Test1.md");
        assert_eq!(
            fs::read_to_string(&card.path).unwrap(),
            "<card_bottom_flag>\n"
        );
    }

    #[test]
    fn create_rejects_duplicates_and_bad_characters() {
        let (_dir, store) = test_store();
        touch(&store, "2024-03-01_5_Ownership.md");

        assert!(matches!(
            store.create("Ownership", day(2024, 1, 1)),
            Err(AppError::DuplicateTopic(t)) if t == "Ownership"
        ));
        assert!(matches!(
            store.create("two words", day(2024, 1, 1)),
            Err(AppError::InvalidTopicCharacters(_))
        ));
        assert!(matches!(
            store.create("snake_case", day(2024, 1, 1)),
            Err(AppError::InvalidTopicCharacters(_))
        ));
        // Topics are compared case-sensitively.
        assert!(store.create("ownership", day(2024, 1, 1)).is_ok());
    }

    #[test]
    fn commit_reschedule_renames_card() {
        let (_dir, store) = test_store();
        let card = store.create("Lifetimes", day(2024, 1, 1)).unwrap();

        let moved = store.commit_reschedule(&card, 2, day(2024, 1, 3)).unwrap();

        assert_eq!(moved.file_name(), "2024-01-03_2_Lifetimes.md");
        assert!(!card.path.exists());
        assert!(moved.path.exists());
        assert_eq!(store.list_all().unwrap(), vec![moved]);
    }

    #[test]
    fn commit_reschedule_refuses_to_overwrite() {
        let (_dir, store) = test_store();
        let card = store.create("Traits", day(2024, 1, 1)).unwrap();
        touch(&store, "2024-01-03_2_Traits.md");

        let err = store
            .commit_reschedule(&card, 2, day(2024, 1, 3))
            .unwrap_err();
        assert!(matches!(err, AppError::RenameConflict(_)));
        assert!(err.is_commit_race());
        assert!(card.path.exists(), "source must be left in place");
    }

    #[test]
    fn commit_reschedule_reports_vanished_card() {
        let (_dir, store) = test_store();
        let card = store.create("Gone", day(2024, 1, 1)).unwrap();
        fs::remove_file(&card.path).unwrap();

        let err = store
            .commit_reschedule(&card, 2, day(2024, 1, 3))
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn load_content_splits_front_and_back() {
        let (_dir, store) = test_store();
        touch(&store, "2024-01-01_1_Split.md");
        let card = store.list_all().unwrap().remove(0);

        let content = store.load_content(&card).unwrap();
        assert_eq!(content.front, "Q\n");
        assert_eq!(content.back, "A\n");
    }
}
