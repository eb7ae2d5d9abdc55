//! Turn flow on the authority: collecting submissions, the countdown, and
//! resolving a turn exactly once.
//!
//! - `SubmissionCollector`: Who has submitted what this turn
//! - `TimerController`: Per-turn countdown, driven by external ticks
//! - `TurnResolver`: Turn lifecycle and resolution

pub mod submission;
pub mod timer;
pub mod resolver;

pub use submission::SubmissionCollector;
pub use timer::{TimerController, TimerStep};
pub use resolver::{ParticipantTurn, TurnReport, TurnResolver};
