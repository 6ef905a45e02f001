//! EON channel list

use crate::channel::LogicalChannel;
use crate::family::PositionCode;

/// Channel shown when the EON live view opens
pub const HOME_CHANNEL: LogicalChannel = LogicalChannel::EonRts1;

/// Whether EON serves this channel
pub fn serves(channel: LogicalChannel) -> bool {
    matches!(
        channel,
        LogicalChannel::EonRts1
            | LogicalChannel::EonPink
            | LogicalChannel::EonPrva
            | LogicalChannel::EonHappy
            | LogicalChannel::EonBn
            | LogicalChannel::EonBnMuzika
            | LogicalChannel::EonNature
    )
}

/// Position in the vertical channel list
///
/// No EON position is built in. Navigation is refused unless the operator
/// supplies positions through a [`PositionTable`](crate::PositionTable).
pub fn position_of(_channel: LogicalChannel) -> Option<PositionCode> {
    None
}
