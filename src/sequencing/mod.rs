pub mod clock;
pub mod pattern;
pub mod scheduler;
pub mod snapshot;
pub mod templates;

pub use clock::{Clock, ManualClock, SystemClock};
pub use pattern::{Pattern, PatternStore, Steps};
pub use scheduler::{step_interval, step_interval_ms, PendingTimer, Scheduler, TimerKind, Transport};
pub use snapshot::Snapshot;
pub use templates::Template;
