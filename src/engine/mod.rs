mod leitner;

pub use leitner::{SCHEDULE, advance, interval_days, next_due};
