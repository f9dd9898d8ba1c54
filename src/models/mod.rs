pub mod break_category;
pub mod location;
pub mod session;
pub mod snapshot;
pub mod status;
pub mod transition;

pub use break_category::BreakCategory;
pub use location::WorkLocation;
pub use session::{AttendanceSession, BreakInterval, SealedSession, Timestamp};
pub use snapshot::SessionSnapshot;
pub use status::{SessionState, SessionStatus};
pub use transition::{Transition, TransitionEvent};
