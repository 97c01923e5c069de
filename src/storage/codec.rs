use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::error::AppError;
use crate::model::{CardContent, MAX_BOX, MIN_BOX};

/// Line separating the front of a card from its back.
pub const SENTINEL: &str = "<card_bottom_flag>";

const SEPARATOR: char = '_';
const EXTENSION: &str = ".md";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Decode `<YYYY-MM-DD>_<box>_<topic>.md` into its three fields.
pub fn decode_identity(path: &Path) -> Result<(NaiveDate, u8, String), AppError> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| AppError::malformed(&path.to_string_lossy(), "not a UTF-8 file name"))?;

    let stem = name
        .strip_suffix(EXTENSION)
        .ok_or_else(|| AppError::malformed(name, "missing .md extension"))?;

    let parts: Vec<&str> = stem.splitn(3, SEPARATOR).collect();
    let [date, box_str, topic] = parts[..] else {
        return Err(AppError::malformed(
            name,
            "expected <date>_<box>_<topic>.md",
        ));
    };

    let date = NaiveDate::parse_from_str(date, DATE_FORMAT)
        .map_err(|e| AppError::malformed(name, format!("bad date '{date}': {e}")))?;

    let box_number: u8 = box_str
        .parse()
        .map_err(|_| AppError::malformed(name, format!("box '{box_str}' is not a number")))?;
    if !(MIN_BOX..=MAX_BOX).contains(&box_number) {
        return Err(AppError::malformed(
            name,
            format!("box {box_number} is outside {MIN_BOX}-{MAX_BOX}"),
        ));
    }

    if topic.is_empty() {
        return Err(AppError::malformed(name, "empty topic"));
    }

    Ok((date, box_number, topic.to_string()))
}

/// Path of the card with the given fields under `root`.
pub fn encode_identity(root: &Path, date: NaiveDate, box_number: u8, topic: &str) -> PathBuf {
    root.join(format!(
        "{}{SEPARATOR}{box_number}{SEPARATOR}{topic}{EXTENSION}",
        date.format(DATE_FORMAT)
    ))
}

/// Split raw card text at the sentinel line.
///
/// The line break that ends the sentinel line is not part of the back.
/// Text around it is kept byte for byte. `path` is only used for the error.
pub fn decode_content(raw: &str, path: &Path) -> Result<CardContent, AppError> {
    if raw.matches(SENTINEL).count() != 1 {
        return Err(AppError::MissingSentinel(path.to_path_buf()));
    }
    let Some((front, rest)) = raw.split_once(SENTINEL) else {
        return Err(AppError::MissingSentinel(path.to_path_buf()));
    };
    let back = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))
        .unwrap_or(rest);

    Ok(CardContent {
        front: front.to_string(),
        back: back.to_string(),
    })
}

/// Content of a freshly created card: just the sentinel line.
pub fn encode_new_card_content() -> String {
    format!("{SENTINEL}\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn malformed(name: &str) -> bool {
        matches!(
            decode_identity(Path::new(name)),
            Err(AppError::MalformedIdentity { .. })
        )
    }

    #[test]
    fn identity_round_trips() {
        let root = Path::new("/cards");
        for (date, b, topic) in [
            (day(2024, 1, 1), 1, "Test1"),
            (day(1999, 12, 31), 7, "closures"),
            (day(2024, 2, 29), 4, "X"),
        ] {
            let path = encode_identity(root, date, b, topic);
            assert_eq!(
                decode_identity(&path).unwrap(),
                (date, b, topic.to_string())
            );
        }
    }

    #[test]
    fn encodes_expected_file_name() {
        let path = encode_identity(Path::new("cards"), day(2024, 1, 1), 1, "Test1");
        assert_eq!(path, PathBuf::from("cards/2024-01-01_1_Test1.md"));
    }

    #[test]
    fn rejects_malformed_names() {
        assert!(malformed("2024-01-01_1.md"));
        assert!(malformed("2024-01-01_one_Topic.md"));
        assert!(malformed("2024-13-01_1_Topic.md"));
        assert!(malformed("2023-02-29_1_Topic.md"));
        assert!(malformed("2024-01-01_0_Topic.md"));
        assert!(malformed("2024-01-01_8_Topic.md"));
        assert!(malformed("2024-01-01_1_.md"));
        assert!(malformed("2024-01-01_1_Topic.txt"));
        assert!(malformed("notes.md"));
    }

    #[test]
    fn malformed_error_names_the_file() {
        let err = decode_identity(Path::new("/cards/garbage.md")).unwrap_err();
        assert!(err.to_string().contains("garbage.md"), "{err}");
    }

    #[test]
    fn new_card_content_decodes_to_empty_sides() {
        let raw = encode_new_card_content();
        assert_eq!(raw, "<card_bottom_flag>\n");
        let content = decode_content(&raw, Path::new("x.md")).unwrap();
        assert_eq!(content.front, "");
        assert_eq!(content.back, "");
    }

    #[test]
    fn content_keeps_surrounding_whitespace() {
        let raw = "  What is `Box`?\n\n<card_bottom_flag>\nA heap pointer.\n\n";
        let content = decode_content(raw, Path::new("x.md")).unwrap();
        assert_eq!(content.front, "  What is `Box`?\n\n");
        assert_eq!(content.back, "A heap pointer.\n\n");
    }

    #[test]
    fn missing_or_repeated_sentinel_is_rejected() {
        for raw in ["front only", "a<card_bottom_flag>b<card_bottom_flag>c"] {
            assert!(matches!(
                decode_content(raw, Path::new("x.md")),
                Err(AppError::MissingSentinel(_))
            ));
        }
    }
}
