//! SVT Play channel list
//!
//! The live row in SVT Play is horizontal.

use crate::channel::LogicalChannel;
use crate::family::PositionCode;

/// Channel selected by the entry macro
pub const HOME_CHANNEL: LogicalChannel = LogicalChannel::Svt1;

/// Whether SVT Play serves this channel
pub fn serves(channel: LogicalChannel) -> bool {
    matches!(
        channel,
        LogicalChannel::Svt1
            | LogicalChannel::Svt2
            | LogicalChannel::Kunskapskanalen
            | LogicalChannel::Svt24
    )
}

/// Position in the live row
///
/// Kunskapskanalen is served but has no built-in position.
pub fn position_of(channel: LogicalChannel) -> Option<PositionCode> {
    let pos = match channel {
        LogicalChannel::Svt1 => 1,
        LogicalChannel::Svt2 => 2,
        LogicalChannel::Svt24 => 5,
        _ => return None,
    };
    Some(PositionCode(pos))
}
