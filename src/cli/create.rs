use std::io::Write;

use chrono::NaiveDate;
use log::{info, warn};

use crate::Leitner;
use crate::cli::name_entry::Prompt;
use crate::cli::terminal::CardEditor;
use crate::error::AppError;
use crate::model::Card;
use crate::storage::store::validate_topic;

/// Ask for a topic until a valid, unused one is entered, then create the card
/// and open it in the editor.
///
/// `prompt` runs the name entry editor with the current topics and an optional
/// notice explaining why the previous attempt was rejected. Returns `None` when
/// the user cancels.
pub fn run<F>(
    app: &Leitner,
    mut prompt: F,
    editor: &mut impl CardEditor,
    out: &mut impl Write,
    today: NaiveDate,
) -> Result<Option<Card>, AppError>
where
    F: FnMut(&[String], Option<&str>) -> Result<Prompt, AppError>,
{
    let mut notice: Option<String> = None;

    let card = loop {
        let topics = app.topics()?;
        let topic = match prompt(&topics, notice.as_deref())? {
            Prompt::Cancelled => return Ok(None),
            Prompt::Accepted(topic) => topic,
        };

        let checked = validate_topic(&topic).and_then(|_| {
            if topics.contains(&topic) {
                Err(AppError::DuplicateTopic(topic.clone()))
            } else {
                Ok(())
            }
        });
        if let Err(e) = checked {
            notice = Some(e.to_string());
            continue;
        }

        match app.create_card(&topic, today) {
            Ok(card) => break card,
            Err(e @ (AppError::DuplicateTopic(_) | AppError::InvalidTopicCharacters(_))) => {
                notice = Some(e.to_string());
            }
            Err(e) => return Err(e),
        }
    };

    info!("created card {}", card.file_name());
    writeln!(out, "Created {}", card.file_name())?;

    if let Err(e) = editor.edit(&card.path) {
        warn!("editing {} failed: {e}", card.path.display());
        writeln!(out, "{e}")?;
    }
    Ok(Some(card))
}
