//! Replication tests.
//!
//! These exercise what the replica does with what it receives: reconnects,
//! duplicated and reordered deliveries, incompatible payloads, and the
//! notifications the presentation layer sees.

mod common;

use common::*;
use duel_ccg::context::Role;
use duel_ccg::core::{DuelError, MatchConfig};
use duel_ccg::events::Notification;
use duel_ccg::replication::{Envelope, FullStateSnapshot, Message, Recipients, SNAPSHOT_VERSION};
use duel_ccg::rules::MatchOutcome;
use duel_ccg::turn::TimerStep;

fn config() -> MatchConfig {
    MatchConfig::default().with_total_turns(5)
}

/// Collect the host's outbox after both sides submit, without delivering it.
fn resolve_held(duel: &mut Duel, host_cards: Vec<duel_ccg::cards::CardId>) -> Vec<Envelope> {
    duel.host.play_cards(host_cards);
    duel.guest.play_cards(vec![]);
    duel.pump_guest();
    duel.take_host_outbox()
}

/// Test that a participant joining mid-match catches up with a full state request.
#[test]
fn test_reconnect_restores_full_state() {
    let mut duel = Duel::new(config());
    duel.start();
    duel.play(vec![SPARK], vec![BOON]);
    duel.play(vec![BOON], vec![]);

    duel.reconnect_guest();
    assert!(!duel.guest.is_initialized());

    duel.guest.request_full_state();
    duel.pump();

    assert!(duel.guest.is_initialized());
    assert_eq!(duel.guest.state(), duel.host.state());
    assert_eq!(duel.guest.turn(), 3);

    // Play continues normally after the reconnect
    duel.play(vec![], vec![]);
    assert_eq!(duel.guest.state(), duel.host.state());
}

/// Test that a full state addressed to someone else is informational only.
#[test]
fn test_full_state_for_other_participant_ignored() {
    let mut duel = Duel::new(config());
    duel.host.start();
    duel.take_host_outbox();

    let snapshot = FullStateSnapshot::capture(duel.host.state(), duel.host.turn());
    duel.guest.handle_message(Message::FullState {
        target: HOST,
        snapshot,
    });

    assert!(!duel.guest.is_initialized());
}

/// Test that a replica which missed the start is rebuilt from a turn result.
#[test]
fn test_turn_result_initializes_fresh_replica() {
    let mut duel = Duel::new(config());
    duel.host.start();
    // Drop the start-of-match full state
    duel.take_host_outbox();

    duel.play(vec![SPARK], vec![]);

    assert!(duel.guest.is_initialized());
    assert_eq!(duel.guest.state(), duel.host.state());
}

/// Test that a duplicated turn result is ignored.
#[test]
fn test_duplicate_turn_result_ignored() {
    let mut duel = Duel::new(config());
    duel.start();

    let first = resolve_held(&mut duel, vec![SPARK]);
    for envelope in &first {
        duel.route(envelope);
    }
    let second = resolve_held(&mut duel, vec![BOON]);
    for envelope in &second {
        duel.route(envelope);
    }
    assert_eq!(duel.guest.state(), duel.host.state());

    for envelope in first.iter().chain(&second) {
        duel.route(envelope);
    }
    assert_eq!(duel.guest.state(), duel.host.state());
}

/// Test that an older turn result arriving late never rewinds state.
#[test]
fn test_out_of_order_results_do_not_rewind() {
    let mut duel = Duel::new(config());
    duel.start();

    let first = resolve_held(&mut duel, vec![SPARK]);
    let second = resolve_held(&mut duel, vec![BOON]);

    for envelope in &second {
        duel.route(envelope);
    }
    for envelope in &first {
        duel.route(envelope);
    }

    assert_eq!(duel.guest.turn(), 3);
    assert_eq!(duel.guest.state(), duel.host.state());
}

/// Test that snapshots of another version are refused at the codec.
#[test]
fn test_version_mismatch_refused() {
    let mut duel = Duel::new(config());
    duel.host.start();
    duel.take_host_outbox();

    let mut snapshot = FullStateSnapshot::capture(duel.host.state(), 1);
    snapshot.version = SNAPSHOT_VERSION + 1;
    let message = Message::FullState {
        target: GUEST,
        snapshot,
    };

    let err = duel.guest.handle_bytes(&message.encode().unwrap()).unwrap_err();
    assert_eq!(
        err,
        DuelError::UnsupportedVersion {
            expected: SNAPSHOT_VERSION,
            got: SNAPSHOT_VERSION + 1,
        }
    );

    // Handed over already decoded, it is still not applied
    duel.guest.handle_message(message);
    assert!(!duel.guest.is_initialized());
}

/// Test that the replica's submissions go to the authority only.
#[test]
fn test_replica_submission_addressing() {
    let mut duel = Duel::new(config());
    duel.start();

    duel.guest.play_cards(vec![BOON]);
    duel.guest.request_full_state();

    // Play and request go to the host; only the answer comes back
    assert_eq!(duel.pump(), 3);
    assert_eq!(duel.host.turn(), 1);
}

/// Test the notifications a replica emits over a turn.
#[test]
fn test_replica_notifications() {
    let mut duel = Duel::new(config());
    let events = duel.guest.notifications();
    duel.start();
    assert_eq!(drain(&events), vec![Notification::RefreshRequested]);

    duel.play(vec![], vec![]);

    assert_eq!(
        drain(&events),
        vec![
            Notification::SubmissionRecorded { participant: GUEST },
            Notification::TurnResolved { turn: 1 },
            Notification::RefreshRequested,
        ]
    );
}

/// Test the notifications the authority emits over a turn.
#[test]
fn test_authority_notifications() {
    let mut duel = Duel::new(config());
    let events = duel.host.notifications();
    duel.start();
    drain(&events);

    duel.play(vec![], vec![]);

    assert_eq!(
        drain(&events),
        vec![
            Notification::SubmissionRecorded { participant: HOST },
            Notification::SubmissionRecorded { participant: GUEST },
            Notification::TurnResolved { turn: 1 },
            Notification::RefreshRequested,
        ]
    );
}

/// Test that the end-of-match message follows the final turn result.
#[test]
fn test_end_game_follows_final_result() {
    let mut duel = Duel::new(MatchConfig::default().with_total_turns(1));
    duel.start();

    let outbox = resolve_held(&mut duel, vec![SPARK]);
    let codes: Vec<u8> = outbox.iter().map(|e| e.message.event_code()).collect();
    assert_eq!(codes, vec![2, 5]);
    assert!(outbox.iter().all(|e| e.recipients == Recipients::Others));

    for envelope in &outbox {
        duel.route(envelope);
    }
    assert!(duel.guest.is_finished());
    assert_eq!(duel.guest.participant(HOST).unwrap().score, 3);
}

/// Test that a promoted replica takes over resolution.
#[test]
fn test_authority_handover() {
    let mut duel = Duel::new(config());
    duel.start();
    duel.play(vec![SPARK], vec![]);

    duel.guest.set_role(Role::Authority);
    assert!(duel.guest.is_authority());

    duel.guest.play_cards(vec![BOON]);
    duel.guest.handle_message(Message::PlayCards {
        participant: HOST,
        cards: vec![],
    });

    assert_eq!(duel.guest.turn(), 3);
    assert_eq!(duel.guest.participant(GUEST).unwrap().score, 2);
    assert_eq!(duel.guest.participant(HOST).unwrap().score, 3);
}

/// Test that a replica promoted after the final result, with the end of match lost, ends it instead of replaying the turn.
#[test]
fn test_handover_after_final_result() {
    let mut duel = Duel::new(MatchConfig::default().with_total_turns(1));
    duel.start();

    let outbox = resolve_held(&mut duel, vec![BOON]);
    // Only the turn result arrives; the end of match is lost
    duel.route(&outbox[0]);
    assert!(!duel.guest.is_finished());
    assert_eq!(duel.guest.participant(HOST).unwrap().score, 2);

    duel.guest.set_role(Role::Authority);
    assert!(duel.guest.is_finished());
    assert_eq!(duel.guest.outcome(), Some(MatchOutcome::Loss));

    let sent = duel.take_guest_outbox();
    assert!(sent.iter().any(|e| matches!(e.message, Message::EndGame(_))));

    duel.guest.play_cards(vec![BOON]);
    duel.guest.handle_message(Message::PlayCards {
        participant: HOST,
        cards: vec![BOON],
    });
    assert_eq!(duel.guest.advance_timer(), TimerStep::Idle);

    assert_eq!(duel.guest.participant(HOST).unwrap().score, 2);
    assert_eq!(duel.guest.participant(GUEST).unwrap().score, 0);
    assert_eq!(duel.guest.turn(), 1);
}

/// Test that a replica promoted right after a mid-match result resolves the next turn once.
#[test]
fn test_handover_between_turns() {
    let mut duel = Duel::new(MatchConfig::default().with_total_turns(2));
    duel.start();

    let outbox = resolve_held(&mut duel, vec![BOON]);
    for envelope in &outbox {
        duel.route(envelope);
    }
    assert_eq!(duel.guest.turn(), 2);

    duel.guest.set_role(Role::Authority);
    assert!(!duel.guest.is_finished());

    duel.guest.play_cards(vec![]);
    duel.guest.handle_message(Message::PlayCards {
        participant: HOST,
        cards: vec![],
    });

    assert!(duel.guest.is_finished());
    assert_eq!(duel.guest.turn(), 2);
    assert_eq!(duel.guest.participant(HOST).unwrap().score, 2);
    assert_eq!(duel.guest.outcome(), Some(MatchOutcome::Loss));
}

/// Test that reconnecting after the match ended delivers the final scores too.
#[test]
fn test_reconnect_after_match_end() {
    let mut duel = Duel::new(MatchConfig::default().with_total_turns(1));
    duel.start();
    duel.play(vec![SPARK], vec![]);
    assert!(duel.host.is_finished());

    duel.reconnect_guest();
    duel.guest.request_full_state();
    duel.pump();

    assert!(duel.guest.is_finished());
    assert_eq!(duel.guest.state(), duel.host.state());
    assert_eq!(duel.guest.outcome(), Some(MatchOutcome::Loss));
    assert_eq!(duel.guest.final_scores(), duel.host.final_scores());
}

/// Test that an applied turn result resets the replica's countdown for the new turn.
#[test]
fn test_turn_result_resets_countdown() {
    let mut duel = Duel::new(config().with_turn_duration(3));
    duel.start();

    duel.tick(2);
    assert_eq!(duel.guest.time_remaining(), Some(2));

    duel.play(vec![], vec![]);
    assert_eq!(duel.guest.turn(), 2);
    assert_eq!(duel.guest.time_remaining(), Some(3));
    assert_eq!(duel.guest.time_remaining(), duel.host.time_remaining());
}
