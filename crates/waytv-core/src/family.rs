//! Application families and their position codes

use std::fmt;

use crate::channel::LogicalChannel;
use crate::{eon, svt};

/// Ordinal position of a channel inside one application's on-screen list
///
/// Positions are only comparable within the same family. Tables are
/// hand-curated and may skip numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PositionCode(pub i32);

impl PositionCode {
    /// Get the raw position value
    pub fn as_i32(&self) -> i32 {
        self.0
    }

    /// Signed number of list steps needed to move from `current` to `self`
    pub fn delta_from(&self, current: PositionCode) -> i32 {
        self.0 - current.0
    }
}

impl fmt::Display for PositionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Group of channels served by one streaming application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AppFamily {
    /// SVT Play
    Svt,
    /// EON TV
    Eon,
    /// No application serves the channel
    Unknown,
}

impl AppFamily {
    /// Families that have a driver
    pub const SERVED: [AppFamily; 2] = [AppFamily::Svt, AppFamily::Eon];

    /// Family owning a channel
    ///
    /// Total: channels that no application serves map to [`AppFamily::Unknown`].
    pub fn owner_of(channel: LogicalChannel) -> AppFamily {
        if svt::serves(channel) {
            AppFamily::Svt
        } else if eon::serves(channel) {
            AppFamily::Eon
        } else {
            AppFamily::Unknown
        }
    }

    /// Built-in position of a channel in this family's list
    ///
    /// Returns `None` for channels the family does not list, including
    /// channels it owns but has no curated position for. Operator-supplied
    /// positions are layered on top by [`PositionTable`](crate::PositionTable).
    pub fn position_of(&self, channel: LogicalChannel) -> Option<PositionCode> {
        match self {
            AppFamily::Svt => svt::position_of(channel),
            AppFamily::Eon => eon::position_of(channel),
            AppFamily::Unknown => None,
        }
    }

    /// Channel the application shows right after its live view is entered
    pub fn home_channel(&self) -> Option<LogicalChannel> {
        match self {
            AppFamily::Svt => Some(svt::HOME_CHANNEL),
            AppFamily::Eon => Some(eon::HOME_CHANNEL),
            AppFamily::Unknown => None,
        }
    }

    /// Get human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            AppFamily::Svt => "SVT Play",
            AppFamily::Eon => "EON",
            AppFamily::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for AppFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_channel_has_one_owner() {
        for ch in LogicalChannel::ALL {
            let owners = AppFamily::SERVED
                .iter()
                .filter(|f| AppFamily::owner_of(ch) == **f)
                .count();
            assert!(owners <= 1, "{ch} owned by {owners} families");
        }
    }

    #[test]
    fn test_positions_only_within_owner() {
        for ch in LogicalChannel::ALL {
            for family in AppFamily::SERVED {
                if family.position_of(ch).is_some() {
                    assert_eq!(AppFamily::owner_of(ch), family);
                }
            }
        }
    }

    #[test]
    fn test_unmapped_channel_is_none_not_zero() {
        assert_eq!(AppFamily::Eon.position_of(LogicalChannel::EonNature), None);
        assert_eq!(AppFamily::Eon.position_of(LogicalChannel::Svt1), None);
        assert_eq!(AppFamily::Unknown.position_of(LogicalChannel::Svt1), None);
    }

    #[test]
    fn test_home_channel_belongs_to_family() {
        for family in AppFamily::SERVED {
            let home = family.home_channel().unwrap();
            assert_eq!(AppFamily::owner_of(home), family);
        }
        assert!(AppFamily::Svt.position_of(svt::HOME_CHANNEL).is_some());
        assert_eq!(AppFamily::Unknown.home_channel(), None);
    }

    #[test]
    fn test_delta_sign() {
        assert_eq!(PositionCode(5).delta_from(PositionCode(1)), 4);
        assert_eq!(PositionCode(1).delta_from(PositionCode(5)), -4);
        assert_eq!(PositionCode(3).delta_from(PositionCode(3)), 0);
    }
}
