//! Affordability trimming and cross-participant ability application.
//!
//! Both halves are pure: they read the catalog and the inputs they are given
//! and return what should change. The turn resolver applies the result to
//! the match state.
//!
//! ## Trimming
//!
//! A submission is trimmed last-in-first-out: while its total cost exceeds
//! the participant's energy, the final card is dropped together with exactly
//! the cost, power and ability tags that card contributed. Submission order
//! therefore decides which cards survive.
//!
//! ## Application order
//!
//! 1. Power finalization (`DoublePower` doubles base power once)
//! 2. Blocking (`BlockNextAttack` zeroes every opponent's finalized power)
//! 3. Finalized power added to score
//! 4. Secondary tags, participant by participant, tag by tag:
//!    `GainPoints`, `StealPoints`, `DrawExtraCard`

use serde::{Deserialize, Serialize};

use crate::cards::{AbilityTag, CardCatalog, CardId};
use crate::core::{ParticipantId, ParticipantMap};

/// Points granted per `GainPoints` tag.
pub const GAIN_POINTS_BONUS: i32 = 2;

/// A submission after affordability trimming.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrimmedSubmission {
    /// Cards that take effect: a prefix of the submitted list.
    pub played: Vec<CardId>,

    /// Total cost of `played`.
    pub cost: u32,

    /// Summed base power of `played`.
    pub base_power: i32,

    /// Ability tags contributed by `played`, duplicates kept.
    pub abilities: Vec<AbilityTag>,
}

impl TrimmedSubmission {
    /// Check whether the submission carries a tag at least once.
    #[must_use]
    pub fn has(&self, tag: &AbilityTag) -> bool {
        self.abilities.contains(tag)
    }
}

/// Trim a raw submission to what the participant can afford.
///
/// Unknown card ids contribute nothing but still occupy their position, so
/// trimming may drop them like any other card.
///
/// ```
/// use duel_ccg::cards::{AbilityTag, CardCatalog, CardDefinition, CardId};
/// use duel_ccg::rules::trim_submission;
///
/// let catalog = CardCatalog::new()
///     .with_card(CardDefinition::new(CardId::new(1), "Spark", 2, 3))
///     .with_card(CardDefinition::new(CardId::new(2), "Surge", 5, 4).with_ability(AbilityTag::DoublePower));
///
/// let trimmed = trim_submission(&catalog, &[CardId::new(1), CardId::new(2)], 4);
/// assert_eq!(trimmed.played, vec![CardId::new(1)]);
/// assert_eq!(trimmed.cost, 2);
/// assert_eq!(trimmed.base_power, 3);
/// assert!(trimmed.abilities.is_empty());
/// ```
#[must_use]
pub fn trim_submission(catalog: &CardCatalog, submitted: &[CardId], energy: u32) -> TrimmedSubmission {
    // u64 so a run of u32 costs never overflows
    let mut cost: u64 = submitted
        .iter()
        .filter_map(|id| catalog.get(*id))
        .map(|card| u64::from(card.cost))
        .sum();

    let mut kept = submitted.len();
    while cost > u64::from(energy) && kept > 0 {
        kept -= 1;
        if let Some(card) = catalog.get(submitted[kept]) {
            cost -= u64::from(card.cost);
        }
    }

    let played = submitted[..kept].to_vec();
    let cards: Vec<_> = played.iter().filter_map(|id| catalog.get(*id)).collect();
    let base_power = cards.iter().fold(0i32, |sum, card| sum.saturating_add(card.power));
    let abilities = cards.iter().flat_map(|card| card.abilities.iter().cloned()).collect();

    TrimmedSubmission {
        played,
        // At most `energy` once the loop ends
        cost: u32::try_from(cost).unwrap_or(energy),
        base_power,
        abilities,
    }
}

/// What ability application decided for one participant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityOutcome {
    /// Power after doubling and blocking.
    pub final_power: i32,

    /// Whether an opponent's block zeroed this participant's power.
    pub blocked: bool,

    /// Net score change: power plus every secondary effect.
    pub score_delta: i32,

    /// Extra cards to draw from `DrawExtraCard`.
    pub extra_draws: u32,
}

/// Applies ability interactions across all participants of a turn.
pub struct AbilityEngine;

impl AbilityEngine {
    /// Compute every participant's outcome for one turn.
    ///
    /// `scores` are the scores before this turn's resolution; participants
    /// missing from it count as 0. Steals pick the first opponent, in
    /// ascending id order, whose running score is positive.
    #[must_use]
    pub fn apply(
        submissions: &ParticipantMap<TrimmedSubmission>,
        scores: &ParticipantMap<i32>,
    ) -> ParticipantMap<AbilityOutcome> {
        let mut outcomes = submissions.map(|_, sub| {
            let doubled = sub.has(&AbilityTag::DoublePower);
            AbilityOutcome {
                final_power: if doubled {
                    sub.base_power.saturating_mul(2)
                } else {
                    sub.base_power
                },
                ..AbilityOutcome::default()
            }
        });

        // Blocking
        let blockers: Vec<ParticipantId> = submissions
            .iter()
            .filter(|(_, sub)| sub.has(&AbilityTag::BlockNextAttack))
            .map(|(id, _)| id)
            .collect();
        for blocker in &blockers {
            for (id, outcome) in outcomes.iter_mut() {
                if id != *blocker {
                    outcome.final_power = 0;
                    outcome.blocked = true;
                }
            }
        }

        // Score application
        let start = submissions.map(|id, _| scores.get(id).copied().unwrap_or(0));
        let mut running = start.clone();
        for (id, outcome) in outcomes.iter() {
            running[id] = running[id].saturating_add(outcome.final_power);
        }

        // Secondary abilities
        for (actor, sub) in submissions.iter() {
            for tag in &sub.abilities {
                match tag {
                    AbilityTag::GainPoints => {
                        running[actor] = running[actor].saturating_add(GAIN_POINTS_BONUS);
                    }
                    AbilityTag::StealPoints => {
                        let victim = running
                            .iter()
                            .find(|(id, score)| *id != actor && **score > 0)
                            .map(|(id, _)| id);
                        if let Some(victim) = victim {
                            running[victim] -= 1;
                            running[actor] = running[actor].saturating_add(1);
                        }
                    }
                    AbilityTag::DrawExtraCard => outcomes[actor].extra_draws += 1,
                    AbilityTag::BlockNextAttack | AbilityTag::DoublePower | AbilityTag::Other(_) => {}
                }
            }
        }

        for (id, outcome) in outcomes.iter_mut() {
            outcome.score_delta = running[id].saturating_sub(start[id]);
        }
        outcomes
    }
}
