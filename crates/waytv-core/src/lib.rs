//! waytv core types
//!
//! This crate holds the static, side-effect free part of the remote:
//!
//! - **Channel Registry**: [`LogicalChannel`] and the owning [`AppFamily`]
//! - **Position tables**: per-family, sparse `channel -> position` maps
//!   (see [`svt`] and [`eon`]), plus operator-supplied entries in a
//!   [`PositionTable`]
//! - **Digit map**: the configurable keypad digit to channel table that also
//!   defines the "registry order" used for next/previous channel
//! - **Commands**: the symbolic [`Command`] both input paths decode into
//! - **Key codes**: the Android key events the drivers synthesize
//!
//! # Example
//!
//! ```rust
//! use waytv_core::{AppFamily, LogicalChannel};
//!
//! let family = AppFamily::owner_of(LogicalChannel::Svt24);
//! assert_eq!(family, AppFamily::Svt);
//!
//! let target = family.position_of(LogicalChannel::Svt24).unwrap();
//! let current = family.position_of(LogicalChannel::Svt1).unwrap();
//! assert_eq!(target.delta_from(current), 4);
//! ```

pub mod channel;
pub mod command;
pub mod digit_map;
pub mod eon;
pub mod error;
pub mod family;
pub mod key;
pub mod positions;
pub mod svt;

pub use channel::LogicalChannel;
pub use command::Command;
pub use digit_map::DigitMap;
pub use error::CoreError;
pub use family::{AppFamily, PositionCode};
pub use key::{Direction, KeyCode};
pub use positions::PositionTable;
