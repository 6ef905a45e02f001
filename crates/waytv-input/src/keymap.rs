//! Keypad key codes to commands
//!
//! Numeric keypad layout: digits select channels, `+`/`-` step through the
//! digit map, enter starts the session, backspace stops it and escape quits.
//! Arrow keys nudge the on-screen focus by one.

use waytv_core::{Command, Direction};

use crate::event::RawInputEvent;

pub const KEY_ESC: u16 = 1;
pub const KEY_BACKSPACE: u16 = 14;
pub const KEY_ENTER: u16 = 28;
pub const KEY_KP7: u16 = 71;
pub const KEY_KP8: u16 = 72;
pub const KEY_KP9: u16 = 73;
pub const KEY_KPMINUS: u16 = 74;
pub const KEY_KP4: u16 = 75;
pub const KEY_KP5: u16 = 76;
pub const KEY_KP6: u16 = 77;
pub const KEY_KPPLUS: u16 = 78;
pub const KEY_KP1: u16 = 79;
pub const KEY_KP2: u16 = 80;
pub const KEY_KP3: u16 = 81;
pub const KEY_KP0: u16 = 82;
pub const KEY_KPENTER: u16 = 96;
pub const KEY_UP: u16 = 103;
pub const KEY_LEFT: u16 = 105;
pub const KEY_RIGHT: u16 = 106;
pub const KEY_DOWN: u16 = 108;

/// Command bound to a key code, if any
pub fn decode_key(code: u16) -> Option<Command> {
    let command = match code {
        KEY_KP0 => Command::SelectDigit(0),
        KEY_KP1 => Command::SelectDigit(1),
        KEY_KP2 => Command::SelectDigit(2),
        KEY_KP3 => Command::SelectDigit(3),
        KEY_KP4 => Command::SelectDigit(4),
        KEY_KP5 => Command::SelectDigit(5),
        KEY_KP6 => Command::SelectDigit(6),
        KEY_KP7 => Command::SelectDigit(7),
        KEY_KP8 => Command::SelectDigit(8),
        KEY_KP9 => Command::SelectDigit(9),
        KEY_KPENTER | KEY_ENTER => Command::Start,
        KEY_BACKSPACE => Command::Stop,
        KEY_KPPLUS => Command::NextChannel,
        KEY_KPMINUS => Command::PreviousChannel,
        KEY_ESC => Command::Quit,
        KEY_UP => Command::Nudge(Direction::Up),
        KEY_DOWN => Command::Nudge(Direction::Down),
        KEY_LEFT => Command::Nudge(Direction::Left),
        KEY_RIGHT => Command::Nudge(Direction::Right),
        _ => return None,
    };
    Some(command)
}

/// Command for a raw event; only key presses decode
pub fn decode_event(event: &RawInputEvent) -> Option<Command> {
    if !event.is_key_press() {
        return None;
    }
    decode_key(event.code)
}
