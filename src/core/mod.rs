pub mod calculator;
pub mod clock;
pub mod config;
pub mod history;
pub mod log;
pub mod machine;
pub mod punch;
pub mod report;
pub mod scheduler;
pub mod tracker;

pub use calculator::accumulator::{Accumulation, accumulate};
pub use clock::{Clock, ManualClock, SystemClock};
pub use history::{HistoryTotals, SessionHistory};
pub use machine::SessionStateMachine;
pub use scheduler::TickScheduler;
pub use tracker::AttendanceTracker;
