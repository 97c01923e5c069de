use std::fmt::Write;

use chrono::{Days, NaiveDate};

use crate::engine;
use crate::model::{BoxCounts, Card, MIN_BOX};

// ── ANSI colors ──────────────────────────────────────────────────────────

const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

const BAR_FULL: &str = "█";
const BAR_SEVEN: &str = "▉";
const BAR_SIX: &str = "▊";
const BAR_FIVE: &str = "▋";
const BAR_FOUR: &str = "▌";
const BAR_THREE: &str = "▍";
const BAR_TWO: &str = "▎";
const BAR_ONE: &str = "▏";

const BAR_CHARS: [&str; 8] = [
    BAR_ONE, BAR_TWO, BAR_THREE, BAR_FOUR, BAR_FIVE, BAR_SIX, BAR_SEVEN, BAR_FULL,
];

const BAR_WIDTH: usize = 30;
const FORECAST_DAYS: u64 = 7;

// ── Bar chart rendering ─────────────────────────────────────────────────

fn render_bar(value: usize, max_value: usize, max_width: usize, color: &str) -> String {
    if max_value == 0 {
        return String::new();
    }
    let ratio = value as f64 / max_value as f64;
    let full_width = ratio * max_width as f64;
    let full_blocks = full_width as usize;
    let remainder = ((full_width - full_blocks as f64) * 8.0) as usize;

    let mut bar = String::new();
    bar.push_str(color);
    for _ in 0..full_blocks {
        bar.push_str(BAR_FULL);
    }
    if remainder > 0 && full_blocks < max_width {
        bar.push_str(BAR_CHARS[remainder - 1]);
    }
    bar.push_str(RESET);
    bar
}

// ── Aggregation ─────────────────────────────────────────────────────────

fn box_counts(cards: &[Card]) -> BoxCounts {
    let mut counts = BoxCounts::default();
    for card in cards {
        counts[(card.box_number - MIN_BOX) as usize] += 1;
    }
    counts
}

/// Cards due per day over the next week. The first bucket also holds overdue cards.
fn due_forecast(cards: &[Card], today: NaiveDate) -> Vec<(NaiveDate, usize)> {
    (0..FORECAST_DAYS)
        .filter_map(|offset| today.checked_add_days(Days::new(offset)))
        .enumerate()
        .map(|(i, date)| {
            let count = cards
                .iter()
                .filter(|c| {
                    if i == 0 {
                        c.due_date <= date
                    } else {
                        c.due_date == date
                    }
                })
                .count();
            (date, count)
        })
        .collect()
}

// ── Printing ────────────────────────────────────────────────────────────

fn header(out: &mut String, title: &str) {
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{BOLD}{CYAN}── {title} ─────────────────────────────────────────{RESET}"
    );
    let _ = writeln!(out);
}

/// Box overview and due forecast for a card listing.
pub fn render(cards: &[Card], today: NaiveDate) -> String {
    let mut out = String::new();

    header(&mut out, "Boxes");
    if cards.is_empty() {
        let _ = writeln!(out, "  {DIM}No cards yet.{RESET}");
        return out;
    }

    let counts = box_counts(cards);
    let max = counts.iter().copied().max().unwrap_or(0);
    let _ = writeln!(out, "  {BOLD}Box  Every  Cards{RESET}");
    for (i, count) in counts.iter().enumerate() {
        let box_number = i as u8 + MIN_BOX;
        let _ = writeln!(
            out,
            "  {box_number:>3}  {:>3}d  {count:>5}  {}",
            engine::interval_days(box_number),
            render_bar(*count, max, BAR_WIDTH, GREEN)
        );
    }
    let _ = writeln!(out, "  {DIM}{} cards in total{RESET}", cards.len());

    header(&mut out, "Due");
    let forecast = due_forecast(cards, today);
    let max = forecast.iter().map(|(_, c)| *c).max().unwrap_or(0);
    for (i, (date, count)) in forecast.iter().enumerate() {
        let label = if i == 0 {
            "today".to_string()
        } else {
            date.format("%a %d").to_string()
        };
        let _ = writeln!(
            out,
            "  {label:<8} {count:>5}  {}",
            render_bar(*count, max, BAR_WIDTH, YELLOW)
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;
    use pretty_assertions::assert_eq;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn card(due: NaiveDate, box_number: u8, topic: &str) -> Card {
        Card {
            path: PathBuf::from(format!("{topic}.md")),
            due_date: due,
            box_number,
            topic: topic.to_string(),
        }
    }

    #[test]
    fn bar_scales_to_max() {
        assert_eq!(render_bar(0, 0, 10, ""), "");
        assert_eq!(render_bar(10, 10, 4, ""), format!("{}{RESET}", BAR_FULL.repeat(4)));
        assert_eq!(render_bar(1, 2, 3, ""), format!("{BAR_FULL}{BAR_FOUR}{RESET}"));
    }

    #[test]
    fn counts_cards_per_box() {
        let today = day(2024, 1, 1);
        let cards = vec![
            card(today, 1, "A"),
            card(today, 1, "B"),
            card(today, 7, "C"),
        ];
        assert_eq!(box_counts(&cards), [2, 0, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn forecast_folds_overdue_into_today() {
        let today = day(2024, 1, 10);
        let cards = vec![
            card(day(2024, 1, 2), 3, "Overdue"),
            card(today, 1, "Today"),
            card(day(2024, 1, 12), 2, "Later"),
            card(day(2024, 3, 1), 6, "Far"),
        ];
        let forecast = due_forecast(&cards, today);
        assert_eq!(forecast.len(), 7);
        assert_eq!(forecast[0], (today, 2));
        assert_eq!(forecast[2], (day(2024, 1, 12), 1));
        assert_eq!(forecast.iter().map(|(_, c)| c).sum::<usize>(), 3);
    }

    #[test]
    fn render_handles_empty_collection() {
        assert!(render(&[], day(2024, 1, 1)).contains("No cards yet."));
    }

    #[test]
    fn render_lists_every_box() {
        let today = day(2024, 1, 1);
        let text = render(&[card(today, 5, "A")], today);
        assert!(text.contains("16d"));
        assert!(text.contains("64d"));
        assert!(text.contains("1 cards in total"));
    }
}
