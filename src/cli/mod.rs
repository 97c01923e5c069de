pub mod create;
pub mod markdown;
pub mod menu;
pub mod name_entry;
pub mod review;
pub mod stats;
pub mod terminal;
