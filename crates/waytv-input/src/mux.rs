//! Device poll loop
//!
//! [`DeviceMux`] registers every open device once with a [`mio::Poll`],
//! keyed by its slot index, and waits with a bounded timeout so the shared
//! [`CancelFlag`] is seen within one timeout even when no key is pressed.
//! Readiness is edge-triggered: each wakeup drains every ready device until
//! the kernel reports nothing more, forwarding one command per key press.
//!
//! The loop blocks its thread; run it with `spawn_blocking` or a dedicated
//! thread.

use std::io;
use std::os::fd::AsRawFd;
use std::path::PathBuf;
use std::time::Duration;

use mio::unix::SourceFd;
use mio::{Events, Interest, Poll, Registry, Token};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use waytv_core::Command;

use crate::cancel::CancelFlag;
use crate::device::{InputDevice, ReadOutcome};
use crate::error::InputError;
use crate::keymap::decode_event;

/// Default readiness timeout
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_millis(500);

const EVENTS_CAPACITY: usize = 16;

/// Lifecycle of the device loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MuxPhase {
    /// Created, not polling yet
    Idle,
    /// Blocked waiting for readiness
    AwaitingReadiness,
    /// Reading and forwarding ready devices
    Dispatching,
    /// Releasing device grabs
    Draining,
    /// Finished; every device dropped
    Stopped,
}

/// Multiplexes key presses from several input devices
#[derive(Debug)]
pub struct DeviceMux {
    // Slot index doubles as the readiness token; closed devices leave `None`
    devices: Vec<Option<InputDevice>>,
    tx: mpsc::Sender<Command>,
    cancel: CancelFlag,
    poll_timeout: Duration,
    phase: MuxPhase,
}

impl DeviceMux {
    pub fn new(
        devices: Vec<InputDevice>,
        tx: mpsc::Sender<Command>,
        cancel: CancelFlag,
        poll_timeout: Duration,
    ) -> Self {
        Self {
            devices: devices.into_iter().map(Some).collect(),
            tx,
            cancel,
            poll_timeout,
            phase: MuxPhase::Idle,
        }
    }

    /// Open every path, skipping the ones that fail
    ///
    /// Fails with [`InputError::NoInputSources`] when nothing opens.
    pub fn open_all(paths: &[PathBuf]) -> Result<Vec<InputDevice>, InputError> {
        let devices: Vec<InputDevice> = paths
            .iter()
            .filter_map(|path| match InputDevice::open(path) {
                Ok(device) => Some(device),
                Err(e) => {
                    warn!("{}", e);
                    None
                }
            })
            .collect();

        if devices.is_empty() {
            return Err(InputError::NoInputSources);
        }
        Ok(devices)
    }

    pub fn phase(&self) -> MuxPhase {
        self.phase
    }

    /// Devices still being polled
    pub fn device_count(&self) -> usize {
        self.devices.iter().flatten().count()
    }

    /// Poll until quit, cancellation, or every device closing
    ///
    /// Quit and the loss of the last device set the cancel flag so the
    /// terminal loop stops too. Grabs are released before returning on
    /// every path.
    pub fn run(&mut self) -> Result<(), InputError> {
        info!("Polling {} input device(s)", self.device_count());

        let result = self.register().and_then(|mut poll| {
            self.phase = MuxPhase::AwaitingReadiness;
            self.poll_loop(&mut poll)
        });

        self.phase = MuxPhase::Draining;
        self.devices.clear();
        self.phase = MuxPhase::Stopped;
        info!("Device loop stopped");
        result
    }

    /// Register every device once; one that cannot be watched is dropped
    fn register(&mut self) -> Result<Poll, InputError> {
        let poll = Poll::new().map_err(|e| InputError::Poll(e.to_string()))?;
        for (index, slot) in self.devices.iter_mut().enumerate() {
            let Some(device) = slot else {
                continue;
            };
            let fd = device.as_raw_fd();
            if let Err(e) = poll.registry().register(
                &mut SourceFd(&fd),
                Token(index),
                Interest::READABLE,
            ) {
                warn!("Cannot watch {}: {}", device.path().display(), e);
                *slot = None;
            }
        }
        Ok(poll)
    }

    fn poll_loop(&mut self, poll: &mut Poll) -> Result<(), InputError> {
        let mut events = Events::with_capacity(EVENTS_CAPACITY);

        loop {
            if self.cancel.is_cancelled() {
                debug!("Device loop cancelled");
                return Ok(());
            }
            if self.device_count() == 0 {
                info!("No input devices left");
                self.cancel.cancel();
                return Ok(());
            }

            if let Err(e) = poll.poll(&mut events, Some(self.poll_timeout)) {
                if e.kind() == io::ErrorKind::Interrupted {
                    continue;
                }
                return Err(InputError::Poll(e.to_string()));
            }
            if events.is_empty() {
                continue;
            }

            self.phase = MuxPhase::Dispatching;
            let ready: Vec<(Token, bool)> = events
                .iter()
                .map(|event| (event.token(), event.is_error() || event.is_read_closed()))
                .collect();

            for (Token(index), hung_up) in ready {
                if self.drain(poll.registry(), index, hung_up) {
                    return Ok(());
                }
            }
            self.phase = MuxPhase::AwaitingReadiness;
        }
    }

    /// Read a ready device until it has nothing buffered; `true` to stop
    fn drain(&mut self, registry: &Registry, index: usize, hung_up: bool) -> bool {
        loop {
            let Some(device) = self.devices.get_mut(index).and_then(Option::as_mut) else {
                return false;
            };
            match read_one(device) {
                ReadOutcome::Event(event) => {
                    if let Some(command) = decode_event(&event) {
                        if forward(&self.tx, &self.cancel, command) {
                            return true;
                        }
                    }
                }
                ReadOutcome::Incomplete(_) => {}
                ReadOutcome::Pending => {
                    if hung_up {
                        self.remove(registry, index);
                    }
                    return false;
                }
                ReadOutcome::Closed => {
                    self.remove(registry, index);
                    return false;
                }
            }
        }
    }

    fn remove(&mut self, registry: &Registry, index: usize) {
        let Some(device) = self.devices.get_mut(index).and_then(Option::take) else {
            return;
        };
        let fd = device.as_raw_fd();
        if let Err(e) = registry.deregister(&mut SourceFd(&fd)) {
            debug!("Deregistering {}: {}", device.path().display(), e);
        }
        warn!("Input device {} went away", device.path().display());
    }
}

/// Read one record, treating read errors as a closed device
fn read_one(device: &mut InputDevice) -> ReadOutcome {
    match device.read_event() {
        Ok(ReadOutcome::Incomplete(n)) => {
            debug!("Short read of {} bytes from {}", n, device.path().display());
            ReadOutcome::Incomplete(n)
        }
        Ok(outcome) => outcome,
        Err(e) => {
            warn!("Read error on {}: {}", device.path().display(), e);
            ReadOutcome::Closed
        }
    }
}

/// Send a command on; `true` when the loop should stop
fn forward(tx: &mpsc::Sender<Command>, cancel: &CancelFlag, command: Command) -> bool {
    debug!("Keypad {:?}", command);
    if tx.blocking_send(command).is_err() {
        info!("Command receiver gone");
        return true;
    }
    if command.is_quit() {
        cancel.cancel();
        return true;
    }
    false
}
