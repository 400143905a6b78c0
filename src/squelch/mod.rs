pub mod controller;
pub mod executor;
pub mod geometry;
pub mod guard;
pub mod luminance;

pub use controller::SquelchController;
pub use executor::{AbortReason, AttemptContext, AttemptFlags, AttemptOutcome};
pub use geometry::{probe_layout, ProbeLayout};
pub use guard::{GuardState, SquelchGuard};
pub use luminance::average_luminance;
