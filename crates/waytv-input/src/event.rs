//! Raw evdev records
//!
//! The kernel delivers `struct input_event`: a timestamp followed by
//! `type: u16`, `code: u16` and `value: i32` in native byte order. Only the
//! three trailing fields matter here.

use std::mem::size_of;

/// Size of one kernel input event record
pub const EVENT_SIZE: usize = size_of::<libc::input_event>();

const TIME_SIZE: usize = size_of::<libc::timeval>();

/// Event type for key and button state changes
pub const EV_KEY: u16 = 0x01;

/// Key values carried by `EV_KEY` events
pub const KEY_RELEASED: i32 = 0;
pub const KEY_PRESSED: i32 = 1;
pub const KEY_REPEATED: i32 = 2;

/// Decoded input event without its timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawInputEvent {
    pub kind: u16,
    pub code: u16,
    pub value: i32,
}

impl RawInputEvent {
    /// `EV_KEY` event for `code`
    pub fn key(code: u16, value: i32) -> Self {
        Self {
            kind: EV_KEY,
            code,
            value,
        }
    }

    /// Decode one record; `None` if `buf` is shorter than a record
    pub fn from_bytes(buf: &[u8]) -> Option<Self> {
        if buf.len() < EVENT_SIZE {
            return None;
        }
        let fields = &buf[TIME_SIZE..];
        Some(Self {
            kind: u16::from_ne_bytes([fields[0], fields[1]]),
            code: u16::from_ne_bytes([fields[2], fields[3]]),
            value: i32::from_ne_bytes([fields[4], fields[5], fields[6], fields[7]]),
        })
    }

    /// Encode as a kernel record with a zero timestamp
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = vec![0u8; EVENT_SIZE];
        buf[TIME_SIZE..TIME_SIZE + 2].copy_from_slice(&self.kind.to_ne_bytes());
        buf[TIME_SIZE + 2..TIME_SIZE + 4].copy_from_slice(&self.code.to_ne_bytes());
        buf[TIME_SIZE + 4..TIME_SIZE + 8].copy_from_slice(&self.value.to_ne_bytes());
        buf
    }

    /// Key going down; releases and auto-repeats are not presses
    pub fn is_key_press(&self) -> bool {
        self.kind == EV_KEY && self.value == KEY_PRESSED
    }
}
