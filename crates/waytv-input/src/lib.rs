//! waytv input multiplexing
//!
//! This crate turns keypad presses and terminal lines into
//! [`waytv_core::Command`] values on one `mpsc` channel:
//!
//! - **Device loop**: [`DeviceMux`] grabs evdev nodes and waits on them
//!   through one `mio` poller with a bounded timeout, decoding key presses
//!   only
//! - **Terminal loop**: [`run_terminal_loop`] reads lines with the same
//!   timeout
//! - **Cancellation**: both loops share one [`CancelFlag`]; quit from either
//!   side stops the other within one poll timeout
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use tokio::sync::mpsc;
//! use waytv_input::{discover_devices, CancelFlag, DeviceMux, DEFAULT_POLL_TIMEOUT};
//!
//! let (tx, mut rx) = mpsc::channel(64);
//! let cancel = CancelFlag::new();
//! let paths = discover_devices(Path::new("/dev/input")).unwrap();
//! let devices = DeviceMux::open_all(&paths).unwrap();
//! let mut mux = DeviceMux::new(devices, tx, cancel.clone(), DEFAULT_POLL_TIMEOUT);
//! std::thread::spawn(move || mux.run());
//! while let Some(command) = rx.blocking_recv() {
//!     println!("{:?}", command);
//! }
//! ```

pub mod cancel;
pub mod device;
pub mod error;
pub mod event;
pub mod keymap;
pub mod mux;
pub mod terminal;

pub use cancel::CancelFlag;
pub use device::{discover_devices, InputDevice, ReadOutcome, DEFAULT_INPUT_DIR};
pub use error::{InputError, LineError};
pub use event::RawInputEvent;
pub use keymap::{decode_event, decode_key};
pub use mux::{DeviceMux, MuxPhase, DEFAULT_POLL_TIMEOUT};
pub use terminal::{parse_line, run_terminal_loop};
