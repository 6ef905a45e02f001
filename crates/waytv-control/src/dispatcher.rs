//! Command dispatcher
//!
//! Maps one decoded [`Command`] to one switchboard or session action. The
//! keypad and the terminal feed the same [`run_dispatcher`] actor, so both
//! input paths go through identical handling and the switchboard has a
//! single writer.
//!
//! # Example
//!
//! ```rust,ignore
//! use tokio::sync::mpsc;
//! use waytv_control::{run_dispatcher, Dispatcher, Switchboard};
//!
//! let (cmd_tx, cmd_rx) = mpsc::channel(64);
//! let (event_tx, mut event_rx) = mpsc::channel(64);
//! let dispatcher = Dispatcher::new(Switchboard::new(bridge, config), session, digits);
//! tokio::spawn(run_dispatcher(dispatcher, cmd_rx, event_tx));
//! ```

use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use waytv_core::{AppFamily, Command, DigitMap, KeyCode, LogicalChannel};

use crate::bridge::Bridge;
use crate::events::ControlEvent;
use crate::session::SessionManager;
use crate::switchboard::Switchboard;

/// Whether the dispatcher keeps accepting commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Owner of the switchboard and the session
#[derive(Debug)]
pub struct Dispatcher<B, S> {
    switchboard: Switchboard<B>,
    session: S,
    digits: DigitMap,
    /// Events emitted since the last drain
    event_buffer: Vec<ControlEvent>,
}

impl<B, S> Dispatcher<B, S>
where
    B: Bridge,
    S: SessionManager + Send,
{
    pub fn new(switchboard: Switchboard<B>, session: S, digits: DigitMap) -> Self {
        Self {
            switchboard,
            session,
            digits,
            event_buffer: Vec::new(),
        }
    }

    pub fn switchboard(&self) -> &Switchboard<B> {
        &self.switchboard
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn digits(&self) -> &DigitMap {
        &self.digits
    }

    /// Session up and bridge connected
    pub fn is_live(&self) -> bool {
        self.session.is_running() && self.session.is_bridge_connected()
    }

    /// Handle one command
    ///
    /// Failures never escape: they are logged and reported as
    /// [`ControlEvent::Error`].
    pub async fn dispatch(&mut self, command: Command) -> Flow {
        debug!("Dispatching {:?}", command);

        if command.needs_bridge() && !self.is_live() {
            self.notice("Session not running; start it first");
            return Flow::Continue;
        }

        match command {
            Command::Start => self.start().await,
            Command::Stop => self.stop().await,
            Command::SelectDigit(digit) => match self.digits.get(digit) {
                Some(channel) => self.select(channel).await,
                None => self.notice(format!("No channel mapped to {}", digit)),
            },
            Command::NextChannel => {
                let current = self.switchboard.get_channel();
                match self.digits.next_after(current) {
                    Some((_, channel)) => self.select(channel).await,
                    None => self.notice("No channels mapped"),
                }
            }
            Command::PreviousChannel => {
                let current = self.switchboard.get_channel();
                match self.digits.previous_before(current) {
                    Some((_, channel)) => self.select(channel).await,
                    None => self.notice("No channels mapped"),
                }
            }
            Command::Nudge(direction) => self.press(direction.key()).await,
            Command::Confirm => self.press(KeyCode::DpadCenter).await,
            Command::Back => self.press(KeyCode::Back).await,
            Command::Quit => {
                info!("Quit requested");
                self.shutdown().await;
                return Flow::Quit;
            }
        }
        Flow::Continue
    }

    /// Shut down the active application
    pub async fn shutdown(&mut self) {
        let before = self.switchboard.active_family();
        self.switchboard.shutdown().await;
        self.note_family_change(before);
    }

    /// Take every event emitted since the last call
    pub fn drain_events(&mut self) -> Vec<ControlEvent> {
        std::mem::take(&mut self.event_buffer)
    }

    async fn start(&mut self) {
        if self.is_live() {
            self.notice("Session already running");
            return;
        }
        match self.session.launch_session().await {
            Ok(()) => self.notice("Session started"),
            Err(e) => {
                warn!("Session start failed: {}", e);
                self.event_buffer.push(ControlEvent::error("Session", e));
            }
        }
    }

    async fn stop(&mut self) {
        if !self.session.is_running() && !self.session.is_bridge_connected() {
            self.notice("Session not running");
            return;
        }
        self.shutdown().await;
        match self.session.stop_session().await {
            Ok(()) => self.notice("Session stopped"),
            Err(e) => {
                warn!("Session stop failed: {}", e);
                self.event_buffer.push(ControlEvent::error("Session", e));
            }
        }
    }

    async fn select(&mut self, channel: LogicalChannel) {
        let before = self.switchboard.active_family();
        let result = self.switchboard.set_channel(channel).await;
        self.note_family_change(before);

        match result {
            Ok(_) => self.event_buffer.push(ControlEvent::ChannelChanged {
                channel,
                family: self
                    .switchboard
                    .active_family()
                    .unwrap_or(AppFamily::Unknown),
                digit: self.digits.digit_of(channel),
            }),
            Err(e) => {
                warn!("Cannot select {}: {}", channel, e);
                self.event_buffer
                    .push(ControlEvent::error("Switchboard", e));
            }
        }
    }

    async fn press(&mut self, key: KeyCode) {
        if !self.session.is_bridge_connected() {
            self.notice("Bridge not connected; start the session first");
            return;
        }
        if let Err(e) = self.switchboard.nudge(key).await {
            warn!("Key {} failed: {}", key, e);
            self.event_buffer.push(ControlEvent::error("Bridge", e));
        }
    }

    fn note_family_change(&mut self, before: Option<AppFamily>) {
        let after = self.switchboard.active_family();
        if before != after {
            self.event_buffer.push(ControlEvent::ActiveFamilyChanged {
                from: before,
                to: after,
            });
        }
    }

    fn notice(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!("{}", message);
        self.event_buffer.push(ControlEvent::notice(message));
    }
}

/// Run the dispatcher actor
///
/// Consumes commands until [`Command::Quit`] or until every sender is
/// gone, forwarding emitted events after each command. The active
/// application is shut down on both exits. Returns the dispatcher so the
/// caller can inspect its final state.
pub async fn run_dispatcher<B, S>(
    mut dispatcher: Dispatcher<B, S>,
    mut cmd_rx: mpsc::Receiver<Command>,
    event_tx: mpsc::Sender<ControlEvent>,
) -> Dispatcher<B, S>
where
    B: Bridge,
    S: SessionManager + Send,
{
    info!("Dispatcher started");

    let mut quit = false;
    while let Some(command) = cmd_rx.recv().await {
        let flow = dispatcher.dispatch(command).await;
        forward_events(&mut dispatcher, &event_tx).await;
        if flow == Flow::Quit {
            quit = true;
            break;
        }
    }

    if !quit {
        info!("All command sources closed");
        dispatcher.shutdown().await;
        forward_events(&mut dispatcher, &event_tx).await;
    }

    info!("Dispatcher stopped");
    dispatcher
}

async fn forward_events<B, S>(dispatcher: &mut Dispatcher<B, S>, event_tx: &mpsc::Sender<ControlEvent>)
where
    B: Bridge,
    S: SessionManager + Send,
{
    for event in dispatcher.drain_events() {
        // Receiver gone just means nobody is watching
        let _ = event_tx.send(event).await;
    }
}
