//! Integration tests for the command dispatcher
//!
//! These tests drive the dispatcher with symbolic commands and observe both
//! the recording bridge and the emitted control events:
//! - Session gating for start, stop and channel commands
//! - Digit selection and wrap-around next/previous
//! - The actor loop's exit paths

use tokio::sync::mpsc;
use waytv_control::profile::{EON, SVT};
use waytv_control::{
    run_dispatcher, ControlEvent, Dispatcher, DriverConfig, Flow, SessionManager, Switchboard,
};
use waytv_core::{AppFamily, Command, DigitMap, Direction, KeyCode, LogicalChannel, PositionTable};
use waytv_sim::{RecordingBridge, ScriptedSession};

// ============================================================================
// Helper Functions
// ============================================================================

mod helpers {
    use super::*;

    pub type SimDispatcher = Dispatcher<RecordingBridge, ScriptedSession>;

    /// Positions for the EON channels in the default digit map
    pub fn config() -> DriverConfig {
        let positions: PositionTable = [
            (LogicalChannel::EonRts1, 1),
            (LogicalChannel::EonPrva, 2),
            (LogicalChannel::EonHappy, 3),
            (LogicalChannel::EonPink, 4),
            (LogicalChannel::EonBn, 6),
            (LogicalChannel::EonBnMuzika, 7),
        ]
        .into_iter()
        .collect();
        DriverConfig {
            positions,
            ..DriverConfig::instant()
        }
    }

    pub fn dispatcher_with(
        session: ScriptedSession,
        digits: DigitMap,
    ) -> (SimDispatcher, RecordingBridge, ScriptedSession) {
        let bridge = RecordingBridge::new();
        let switchboard = Switchboard::new(bridge.clone(), config());
        let dispatcher = Dispatcher::new(switchboard, session.clone(), digits);
        (dispatcher, bridge, session)
    }

    /// Dispatcher on a live session with the default digit map
    pub fn live_dispatcher() -> (SimDispatcher, RecordingBridge, ScriptedSession) {
        dispatcher_with(ScriptedSession::running(), DigitMap::default())
    }

    pub fn notices(events: &[ControlEvent]) -> Vec<String> {
        events
            .iter()
            .filter_map(|e| match e {
                ControlEvent::Notice { message } => Some(message.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn selected(events: &[ControlEvent]) -> Vec<(LogicalChannel, Option<u8>)> {
        events
            .iter()
            .filter_map(|e| match e {
                ControlEvent::ChannelChanged { channel, digit, .. } => Some((*channel, *digit)),
                _ => None,
            })
            .collect()
    }
}

use helpers::*;

// ============================================================================
// Session gating
// ============================================================================

#[tokio::test]
async fn test_start_launches_session_once() {
    let (mut dispatcher, _bridge, session) =
        dispatcher_with(ScriptedSession::stopped(), DigitMap::default());

    assert_eq!(dispatcher.dispatch(Command::Start).await, Flow::Continue);
    assert_eq!(dispatcher.dispatch(Command::Start).await, Flow::Continue);

    assert_eq!(session.launch_count(), 1);
    let events = dispatcher.drain_events();
    assert_eq!(
        notices(&events),
        vec!["Session started", "Session already running"]
    );
}

#[tokio::test]
async fn test_start_with_half_up_session_relaunches() {
    let session = ScriptedSession::stopped();
    session.set_state(true, false);
    let (mut dispatcher, _bridge, session) = dispatcher_with(session, DigitMap::default());

    dispatcher.dispatch(Command::Start).await;

    assert_eq!(session.launch_count(), 1);
    assert!(dispatcher.session().is_bridge_connected());
}

#[tokio::test]
async fn test_failed_start_reports_error() {
    let session = ScriptedSession::stopped();
    session.set_fail_launch(true);
    let (mut dispatcher, _bridge, _session) = dispatcher_with(session, DigitMap::default());

    dispatcher.dispatch(Command::Start).await;

    let events = dispatcher.drain_events();
    assert!(matches!(
        &events[..],
        [ControlEvent::Error { source, .. }] if source == "Session"
    ));
}

#[tokio::test]
async fn test_stop_when_not_running_is_a_notice() {
    let (mut dispatcher, bridge, session) =
        dispatcher_with(ScriptedSession::stopped(), DigitMap::default());

    dispatcher.dispatch(Command::Stop).await;

    assert_eq!(session.stop_count(), 0);
    assert!(bridge.calls().is_empty());
    assert_eq!(notices(&dispatcher.drain_events()), vec!["Session not running"]);
}

#[tokio::test]
async fn test_stop_shuts_down_application_then_session() {
    let (mut dispatcher, bridge, session) = live_dispatcher();
    dispatcher.dispatch(Command::SelectDigit(2)).await;
    dispatcher.drain_events();

    dispatcher.dispatch(Command::Stop).await;

    assert_eq!(bridge.force_stops(), vec![SVT.package.to_string()]);
    assert_eq!(session.stop_count(), 1);
    assert_eq!(dispatcher.switchboard().active_family(), None);
    let events = dispatcher.drain_events();
    assert_eq!(
        events[0],
        ControlEvent::ActiveFamilyChanged {
            from: Some(AppFamily::Svt),
            to: None
        }
    );
    assert_eq!(notices(&events), vec!["Session stopped"]);
}

#[tokio::test]
async fn test_channel_commands_need_live_session() {
    let (mut dispatcher, bridge, _session) =
        dispatcher_with(ScriptedSession::stopped(), DigitMap::default());

    for command in [
        Command::SelectDigit(1),
        Command::NextChannel,
        Command::PreviousChannel,
    ] {
        dispatcher.dispatch(command).await;
    }

    assert!(bridge.calls().is_empty());
    assert_eq!(notices(&dispatcher.drain_events()).len(), 3);
}

#[tokio::test]
async fn test_raw_keys_need_connected_bridge() {
    let (mut dispatcher, bridge, _session) =
        dispatcher_with(ScriptedSession::stopped(), DigitMap::default());

    dispatcher.dispatch(Command::Confirm).await;

    assert!(bridge.calls().is_empty());
    assert_eq!(notices(&dispatcher.drain_events()).len(), 1);
}

// ============================================================================
// Channel selection
// ============================================================================

#[tokio::test]
async fn test_two_adjacent_digits_one_advance_one_confirm() {
    let mut digits = DigitMap::new();
    digits.insert(1, LogicalChannel::Svt1).unwrap();
    digits.insert(2, LogicalChannel::Svt2).unwrap();
    let (mut dispatcher, bridge, _session) = dispatcher_with(ScriptedSession::running(), digits);

    dispatcher.dispatch(Command::SelectDigit(1)).await;
    bridge.clear();
    dispatcher.dispatch(Command::SelectDigit(2)).await;

    assert_eq!(bridge.count_key(SVT.forward), 1);
    assert_eq!(bridge.count_key(SVT.backward), 0);
    assert_eq!(bridge.count_key(SVT.confirm), 1);
    assert_eq!(
        selected(&dispatcher.drain_events()),
        vec![
            (LogicalChannel::Svt1, Some(1)),
            (LogicalChannel::Svt2, Some(2))
        ]
    );
}

#[tokio::test]
async fn test_unmapped_digit_is_a_notice() {
    let mut digits = DigitMap::new();
    digits.insert(1, LogicalChannel::Svt1).unwrap();
    let (mut dispatcher, bridge, _session) = dispatcher_with(ScriptedSession::running(), digits);

    dispatcher.dispatch(Command::SelectDigit(7)).await;

    assert!(bridge.calls().is_empty());
    assert_eq!(
        notices(&dispatcher.drain_events()),
        vec!["No channel mapped to 7"]
    );
}

#[tokio::test]
async fn test_cross_family_selection_reports_switch() {
    let (mut dispatcher, bridge, _session) = live_dispatcher();

    dispatcher.dispatch(Command::SelectDigit(4)).await;
    dispatcher.dispatch(Command::SelectDigit(9)).await;

    assert_eq!(bridge.force_stops(), vec![SVT.package.to_string()]);
    assert_eq!(
        bridge.launches(),
        vec![SVT.component.to_string(), EON.component.to_string()]
    );
    let events = dispatcher.drain_events();
    assert!(events.contains(&ControlEvent::ActiveFamilyChanged {
        from: Some(AppFamily::Svt),
        to: Some(AppFamily::Eon),
    }));
    assert_eq!(
        selected(&events),
        vec![
            (LogicalChannel::Svt24, Some(4)),
            (LogicalChannel::EonPink, Some(9))
        ]
    );
}

#[tokio::test]
async fn test_next_on_last_entry_wraps_to_first() {
    let (mut dispatcher, _bridge, _session) = live_dispatcher();
    // Digit order runs 0..=9, so 9 is the last entry
    dispatcher.dispatch(Command::SelectDigit(9)).await;
    dispatcher.drain_events();

    dispatcher.dispatch(Command::NextChannel).await;

    let events = dispatcher.drain_events();
    assert!(!events
        .iter()
        .any(|e| matches!(e, ControlEvent::Error { .. })));
    assert_eq!(selected(&events), vec![(LogicalChannel::EonRts1, Some(0))]);
}

#[tokio::test]
async fn test_previous_on_first_entry_wraps_to_last() {
    let (mut dispatcher, _bridge, _session) = live_dispatcher();
    dispatcher.dispatch(Command::SelectDigit(0)).await;
    dispatcher.drain_events();

    dispatcher.dispatch(Command::PreviousChannel).await;

    assert_eq!(
        selected(&dispatcher.drain_events()),
        vec![(LogicalChannel::EonPink, Some(9))]
    );
}

#[tokio::test]
async fn test_next_without_current_channel_starts_at_first() {
    let (mut dispatcher, _bridge, _session) = live_dispatcher();

    dispatcher.dispatch(Command::NextChannel).await;

    assert_eq!(
        selected(&dispatcher.drain_events()),
        vec![(LogicalChannel::EonRts1, Some(0))]
    );
}

#[tokio::test]
async fn test_unpositioned_channel_reports_error() {
    let mut digits = DigitMap::new();
    digits.insert(5, LogicalChannel::EonNature).unwrap();
    let (mut dispatcher, _bridge, _session) = dispatcher_with(ScriptedSession::running(), digits);

    assert_eq!(dispatcher.dispatch(Command::SelectDigit(5)).await, Flow::Continue);

    let events = dispatcher.drain_events();
    assert!(events.iter().any(
        |e| matches!(e, ControlEvent::Error { source, .. } if source == "Switchboard")
    ));
    assert!(selected(&events).is_empty());
}

#[tokio::test]
async fn test_nudge_confirm_back_send_single_keys() {
    let (mut dispatcher, bridge, _session) = live_dispatcher();

    dispatcher.dispatch(Command::Nudge(Direction::Up)).await;
    dispatcher.dispatch(Command::Nudge(Direction::Right)).await;
    dispatcher.dispatch(Command::Confirm).await;
    dispatcher.dispatch(Command::Back).await;

    assert_eq!(
        bridge.keys(),
        vec![
            KeyCode::DpadUp,
            KeyCode::DpadRight,
            KeyCode::DpadCenter,
            KeyCode::Back
        ]
    );
    assert!(dispatcher.drain_events().is_empty());
}

// ============================================================================
// Actor
// ============================================================================

#[tokio::test]
async fn test_actor_quit_shuts_down_application() {
    let (dispatcher, bridge, _session) = live_dispatcher();
    let (cmd_tx, cmd_rx) = mpsc::channel(16);
    let (event_tx, mut event_rx) = mpsc::channel(64);
    let actor = tokio::spawn(run_dispatcher(dispatcher, cmd_rx, event_tx));

    cmd_tx.send(Command::SelectDigit(3)).await.unwrap();
    cmd_tx.send(Command::Quit).await.unwrap();
    // Commands after quit are never handled
    let _ = cmd_tx.send(Command::SelectDigit(9)).await;

    let dispatcher = actor.await.unwrap();
    assert_eq!(dispatcher.switchboard().active_family(), None);
    assert_eq!(bridge.force_stops(), vec![SVT.package.to_string()]);
    assert_eq!(bridge.launches().len(), 1);

    let mut events = Vec::new();
    while let Ok(event) = event_rx.try_recv() {
        events.push(event);
    }
    assert_eq!(
        selected(&events),
        vec![(LogicalChannel::Kunskapskanalen, Some(3))]
    );
}

#[tokio::test]
async fn test_actor_stops_when_senders_are_gone() {
    let (dispatcher, bridge, _session) = live_dispatcher();
    let (cmd_tx, cmd_rx) = mpsc::channel(16);
    let (event_tx, _event_rx) = mpsc::channel(64);
    let terminal_tx = cmd_tx.clone();

    let actor = tokio::spawn(run_dispatcher(dispatcher, cmd_rx, event_tx));
    cmd_tx.send(Command::SelectDigit(0)).await.unwrap();
    drop(cmd_tx);
    terminal_tx.send(Command::SelectDigit(6)).await.unwrap();
    drop(terminal_tx);

    let dispatcher = actor.await.unwrap();
    assert_eq!(dispatcher.switchboard().active_family(), None);
    assert_eq!(bridge.force_stops(), vec![EON.package.to_string()]);
}

#[tokio::test]
async fn test_actor_survives_without_event_receiver() {
    let (dispatcher, _bridge, _session) = live_dispatcher();
    let (cmd_tx, cmd_rx) = mpsc::channel(16);
    let (event_tx, event_rx) = mpsc::channel(1);
    drop(event_rx);

    let actor = tokio::spawn(run_dispatcher(dispatcher, cmd_rx, event_tx));
    cmd_tx.send(Command::Start).await.unwrap();
    cmd_tx.send(Command::SelectDigit(1)).await.unwrap();
    cmd_tx.send(Command::Quit).await.unwrap();

    let dispatcher = actor.await.unwrap();
    assert_eq!(dispatcher.switchboard().active_family(), None);
}
