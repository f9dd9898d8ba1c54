pub mod colors;
pub mod date;
pub mod formatting;

pub use formatting::{secs2hms, snapshot_line};
