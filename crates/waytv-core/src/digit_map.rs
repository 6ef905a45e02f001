//! Keypad digit to channel table
//!
//! The map doubles as the registry order: next/previous channel walk the
//! entries in ascending digit order and wrap at both ends.

use std::collections::BTreeMap;

use crate::channel::LogicalChannel;
use crate::error::CoreError;

/// Configured `digit -> channel` table
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(
        try_from = "BTreeMap<u8, LogicalChannel>",
        into = "BTreeMap<u8, LogicalChannel>"
    )
)]
pub struct DigitMap {
    entries: BTreeMap<u8, LogicalChannel>,
}

impl DigitMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Map a digit to a channel, returning the channel it replaced
    pub fn insert(
        &mut self,
        digit: u8,
        channel: LogicalChannel,
    ) -> Result<Option<LogicalChannel>, CoreError> {
        if digit > 9 {
            return Err(CoreError::InvalidDigit(digit));
        }
        Ok(self.entries.insert(digit, channel))
    }

    /// Channel mapped to a digit
    pub fn get(&self, digit: u8) -> Option<LogicalChannel> {
        self.entries.get(&digit).copied()
    }

    /// Lowest digit mapped to a channel
    pub fn digit_of(&self, channel: LogicalChannel) -> Option<u8> {
        self.entries
            .iter()
            .find(|(_, ch)| **ch == channel)
            .map(|(digit, _)| *digit)
    }

    /// Iterate entries in registry order
    pub fn iter(&self) -> impl Iterator<Item = (u8, LogicalChannel)> + '_ {
        self.entries.iter().map(|(d, ch)| (*d, *ch))
    }

    /// Number of mapped digits
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no digit is mapped
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Wrap-around successor of `current`
    ///
    /// A missing or unmapped current channel starts at the first entry.
    pub fn next_after(&self, current: Option<LogicalChannel>) -> Option<(u8, LogicalChannel)> {
        let first = self.iter().next();
        let Some(digit) = current.and_then(|ch| self.digit_of(ch)) else {
            return first;
        };
        self.entries
            .range(digit + 1..)
            .next()
            .map(|(d, ch)| (*d, *ch))
            .or(first)
    }

    /// Wrap-around predecessor of `current`
    ///
    /// A missing or unmapped current channel starts at the last entry.
    pub fn previous_before(
        &self,
        current: Option<LogicalChannel>,
    ) -> Option<(u8, LogicalChannel)> {
        let last = self.entries.iter().next_back().map(|(d, ch)| (*d, *ch));
        let Some(digit) = current.and_then(|ch| self.digit_of(ch)) else {
            return last;
        };
        self.entries
            .range(..digit)
            .next_back()
            .map(|(d, ch)| (*d, *ch))
            .or(last)
    }
}

impl Default for DigitMap {
    fn default() -> Self {
        let entries = BTreeMap::from([
            (1, LogicalChannel::Svt1),
            (2, LogicalChannel::Svt2),
            (3, LogicalChannel::Kunskapskanalen),
            (4, LogicalChannel::Svt24),
            (5, LogicalChannel::EonBnMuzika),
            (6, LogicalChannel::EonBn),
            (7, LogicalChannel::EonHappy),
            (8, LogicalChannel::EonPrva),
            (9, LogicalChannel::EonPink),
            (0, LogicalChannel::EonRts1),
        ]);
        Self { entries }
    }
}

impl TryFrom<BTreeMap<u8, LogicalChannel>> for DigitMap {
    type Error = CoreError;

    fn try_from(entries: BTreeMap<u8, LogicalChannel>) -> Result<Self, Self::Error> {
        if let Some(bad) = entries.keys().find(|d| **d > 9) {
            return Err(CoreError::InvalidDigit(*bad));
        }
        Ok(Self { entries })
    }
}

impl From<DigitMap> for BTreeMap<u8, LogicalChannel> {
    fn from(map: DigitMap) -> Self {
        map.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn two_entry_map() -> DigitMap {
        let mut map = DigitMap::new();
        map.insert(1, LogicalChannel::Svt1).unwrap();
        map.insert(2, LogicalChannel::Svt2).unwrap();
        map
    }

    #[test]
    fn test_default_covers_all_digits() {
        let map = DigitMap::default();
        assert_eq!(map.len(), 10);
        assert_eq!(map.get(0), Some(LogicalChannel::EonRts1));
        assert_eq!(map.get(9), Some(LogicalChannel::EonPink));
    }

    #[test]
    fn test_insert_rejects_non_digit() {
        let mut map = DigitMap::new();
        assert_eq!(
            map.insert(10, LogicalChannel::Svt1),
            Err(CoreError::InvalidDigit(10))
        );
        assert!(map.is_empty());
    }

    #[test]
    fn test_next_wraps_from_last_to_first() {
        let map = DigitMap::default();
        // 9 is the last digit in registry order
        assert_eq!(
            map.next_after(Some(LogicalChannel::EonPink)),
            Some((0, LogicalChannel::EonRts1))
        );
        assert_eq!(
            map.next_after(Some(LogicalChannel::EonRts1)),
            Some((1, LogicalChannel::Svt1))
        );
    }

    #[test]
    fn test_previous_wraps_from_first_to_last() {
        let map = DigitMap::default();
        assert_eq!(
            map.previous_before(Some(LogicalChannel::EonRts1)),
            Some((9, LogicalChannel::EonPink))
        );
        assert_eq!(
            map.previous_before(Some(LogicalChannel::Svt2)),
            Some((1, LogicalChannel::Svt1))
        );
    }

    #[test]
    fn test_unmapped_current_starts_at_ends() {
        let map = two_entry_map();
        assert_eq!(map.next_after(None), Some((1, LogicalChannel::Svt1)));
        assert_eq!(
            map.next_after(Some(LogicalChannel::EonNature)),
            Some((1, LogicalChannel::Svt1))
        );
        assert_eq!(map.previous_before(None), Some((2, LogicalChannel::Svt2)));
    }

    #[test]
    fn test_empty_map_has_no_neighbours() {
        let map = DigitMap::new();
        assert_eq!(map.next_after(Some(LogicalChannel::Svt1)), None);
        assert_eq!(map.previous_before(None), None);
    }

    #[test]
    fn test_digit_of_prefers_lowest_digit() {
        let mut map = two_entry_map();
        map.insert(7, LogicalChannel::Svt1).unwrap();
        assert_eq!(map.digit_of(LogicalChannel::Svt1), Some(1));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_rejects_out_of_range_digit() {
        let err = serde_json::from_str::<DigitMap>(r#"{"12": "SVT1"}"#);
        assert!(err.is_err());

        let map: DigitMap = serde_json::from_str(r#"{"3": "EON_RTS_1"}"#).unwrap();
        assert_eq!(map.get(3), Some(LogicalChannel::EonRts1));
    }

    proptest! {
        #[test]
        fn prop_next_walk_visits_every_entry_once(mapped in prop::collection::vec(any::<bool>(), 10)) {
            let mut map = DigitMap::new();
            for (digit, on) in mapped.iter().enumerate() {
                if *on {
                    map.insert(digit as u8, LogicalChannel::ALL[digit]).unwrap();
                }
            }

            let mut seen = Vec::new();
            let mut current = None;
            for _ in 0..map.len() {
                let (digit, channel) = map.next_after(current).unwrap();
                seen.push(digit);
                current = Some(channel);
            }
            let expected: Vec<u8> = map.iter().map(|(d, _)| d).collect();
            prop_assert_eq!(seen, expected);

            for (digit, channel) in map.iter() {
                let (_, before) = map.previous_before(Some(channel)).unwrap();
                prop_assert_eq!(map.next_after(Some(before)), Some((digit, channel)));
            }
        }
    }
}
