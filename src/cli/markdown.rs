/// Start of a highlighted code span: black background.
const CODE_ON: &str = "\x1b[40m";
const CODE_OFF: &str = "\x1b[0m";

const FENCE: &str = "```";
const TICK: &str = "`";

/// Highlight fenced blocks, then inline code spans.
///
/// Delimiters are paired left to right. An odd one out at the end is left
/// as literal text.
pub fn format_code_blocks(text: &str) -> String {
    let fenced = highlight_pairs(text, FENCE);
    highlight_pairs(&fenced, TICK)
}

fn highlight_pairs(text: &str, delimiter: &str) -> String {
    let pairs = text.matches(delimiter).count() / 2;
    let mut remaining = pairs * 2;
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while remaining > 0 {
        let Some(idx) = rest.find(delimiter) else {
            break;
        };
        out.push_str(&rest[..idx]);
        out.push_str(if remaining % 2 == 0 { CODE_ON } else { CODE_OFF });
        rest = &rest[idx + delimiter.len()..];
        remaining -= 1;
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highlights_inline_spans() {
        assert_eq!(
            format_code_blocks("use `Vec` or `Box`"),
            "use \x1b[40mVec\x1b[0m or \x1b[40mBox\x1b[0m"
        );
    }

    #[test]
    fn highlights_fences_before_inline_ticks() {
        assert_eq!(
            format_code_blocks("```\nlet x = `a`;\n```"),
            "\x1b[40m\nlet x = \x1b[40ma\x1b[0m;\n\x1b[0m"
        );
    }

    #[test]
    fn unpaired_delimiter_stays_literal() {
        assert_eq!(
            format_code_blocks("`a` and a stray `"),
            "\x1b[40ma\x1b[0m and a stray `"
        );
        assert_eq!(format_code_blocks("no code"), "no code");
    }
}
