use chrono::{Days, NaiveDate};

use crate::model::{MAX_BOX, MIN_BOX, Outcome, Reschedule};

/// Review interval in days for boxes 1 through 7.
pub const SCHEDULE: [u64; MAX_BOX as usize] = [1, 2, 4, 8, 16, 32, 64];

/// Interval for a box. Boxes outside the valid range are clamped first.
pub fn interval_days(box_number: u8) -> u64 {
    let clamped = box_number.clamp(MIN_BOX, MAX_BOX);
    SCHEDULE[(clamped - MIN_BOX) as usize]
}

/// Date a card sitting in `box_number` becomes due again, counting from `today`.
pub fn next_due(box_number: u8, today: NaiveDate) -> NaiveDate {
    today
        .checked_add_days(Days::new(interval_days(box_number)))
        .unwrap_or(NaiveDate::MAX)
}

/// Move a card one box up or down (or keep it) and compute its next due date.
///
/// A move past box 1 or box 7 is dropped: the card stays in its current box
/// and is rescheduled with that box's interval.
pub fn advance(current_box: u8, outcome: Outcome, today: NaiveDate) -> Reschedule {
    let candidate = match outcome {
        Outcome::Promote => current_box.checked_add(1),
        Outcome::Demote => current_box.checked_sub(1),
        Outcome::Repeat => Some(current_box),
    };

    let box_number = match candidate {
        Some(b) if (MIN_BOX..=MAX_BOX).contains(&b) => b,
        _ => current_box,
    };

    Reschedule {
        box_number,
        due_date: next_due(box_number, today),
    }
}
