//! Channel position lookup
//!
//! The built-in tables behind [`AppFamily::position_of`] only list positions
//! that have been checked against the applications. A [`PositionTable`]
//! adds operator-supplied entries on top, loaded once from settings and
//! never changed afterwards.

use std::collections::BTreeMap;

use crate::channel::LogicalChannel;
use crate::family::{AppFamily, PositionCode};

/// Operator-supplied positions layered over the built-in tables
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PositionTable {
    entries: BTreeMap<LogicalChannel, PositionCode>,
}

impl PositionTable {
    /// Table with no supplied entries; only built-in positions resolve
    pub fn new() -> Self {
        Self::default()
    }

    /// Supply the position of `channel` in its owner's list
    ///
    /// Returns the entry it replaced, if any.
    pub fn insert(&mut self, channel: LogicalChannel, position: PositionCode) -> Option<PositionCode> {
        self.entries.insert(channel, position)
    }

    /// Whether no entry was supplied
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Position of `channel` in `family`'s list
    ///
    /// A supplied entry wins over the built-in one. Channels owned by another
    /// family never resolve, so positions are only compared within a family.
    pub fn position_of(&self, family: AppFamily, channel: LogicalChannel) -> Option<PositionCode> {
        if family == AppFamily::Unknown || AppFamily::owner_of(channel) != family {
            return None;
        }
        self.entries
            .get(&channel)
            .copied()
            .or_else(|| family.position_of(channel))
    }
}

impl FromIterator<(LogicalChannel, i32)> for PositionTable {
    fn from_iter<I: IntoIterator<Item = (LogicalChannel, i32)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(channel, pos)| (channel, PositionCode(pos)))
                .collect(),
        }
    }
}
