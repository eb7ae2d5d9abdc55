//! Duel rules: affordability trimming, ability interactions, and the
//! end-of-match determination.
//!
//! Everything here is pure. The turn resolver feeds it catalog data and
//! the participants' submissions and applies what comes back.

pub mod abilities;
pub mod outcome;

pub use abilities::{trim_submission, AbilityEngine, AbilityOutcome, TrimmedSubmission, GAIN_POINTS_BONUS};
pub use outcome::{FinalScores, MatchOutcome};
