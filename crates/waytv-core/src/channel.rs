//! Logical channel identifiers

use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::family::AppFamily;

/// A user-facing selectable channel
///
/// The set is fixed at build time. Which application serves a channel is
/// answered by [`AppFamily::owner_of`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum LogicalChannel {
    /// SVT1
    Svt1,
    /// SVT2
    Svt2,
    /// Kunskapskanalen
    Kunskapskanalen,
    /// SVT24
    Svt24,
    /// RTS 1 on EON
    #[cfg_attr(feature = "serde", serde(rename = "EON_RTS_1"))]
    EonRts1,
    /// Pink on EON
    EonPink,
    /// Prva on EON
    EonPrva,
    /// Happy on EON
    EonHappy,
    /// BN on EON
    EonBn,
    /// BN Muzika on EON
    EonBnMuzika,
    /// Nature on EON
    EonNature,
}

impl LogicalChannel {
    /// Every channel, in declaration order
    pub const ALL: [LogicalChannel; 11] = [
        LogicalChannel::Svt1,
        LogicalChannel::Svt2,
        LogicalChannel::Kunskapskanalen,
        LogicalChannel::Svt24,
        LogicalChannel::EonRts1,
        LogicalChannel::EonPink,
        LogicalChannel::EonPrva,
        LogicalChannel::EonHappy,
        LogicalChannel::EonBn,
        LogicalChannel::EonBnMuzika,
        LogicalChannel::EonNature,
    ];

    /// Identifier used in settings files and on the command line
    pub fn config_name(&self) -> &'static str {
        match self {
            Self::Svt1 => "SVT1",
            Self::Svt2 => "SVT2",
            Self::Kunskapskanalen => "KUNSKAPSKANALEN",
            Self::Svt24 => "SVT24",
            Self::EonRts1 => "EON_RTS_1",
            Self::EonPink => "EON_PINK",
            Self::EonPrva => "EON_PRVA",
            Self::EonHappy => "EON_HAPPY",
            Self::EonBn => "EON_BN",
            Self::EonBnMuzika => "EON_BN_MUZIKA",
            Self::EonNature => "EON_NATURE",
        }
    }

    /// Human-readable channel name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Svt1 => "SVT1",
            Self::Svt2 => "SVT2",
            Self::Kunskapskanalen => "Kunskapskanalen",
            Self::Svt24 => "SVT24",
            Self::EonRts1 => "RTS 1",
            Self::EonPink => "Pink",
            Self::EonPrva => "Prva",
            Self::EonHappy => "Happy",
            Self::EonBn => "BN",
            Self::EonBnMuzika => "BN Muzika",
            Self::EonNature => "Nature",
        }
    }

    /// Application family that serves this channel
    pub fn family(&self) -> AppFamily {
        AppFamily::owner_of(*self)
    }
}

impl fmt::Display for LogicalChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for LogicalChannel {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|ch| ch.config_name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CoreError::UnknownChannelName(wanted.to_string()))
    }
}
