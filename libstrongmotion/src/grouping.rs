//! Consolidation of partial recordings of the same event.
//!
//! Several input collections may hold channels of one station and event (one
//! file per channel is typical), and the same channel may be supplied more
//! than once. [`group_channels`] pools every record, drops exact copies, and
//! regroups the rest by event identity.
//!
//! The partition is order dependent: records are addressed by their position
//! in the pooled list, and duplicate marks made while scanning earlier
//! positions change what later positions may do. A record marked early can no
//! longer seed a group. Permuting the input may therefore change which record
//! seeds a group and the member order, but not the number of surviving
//! records.
use bit_set::BitSet;
use std::fmt;
use time::PrimitiveDateTime;

use super::collection::RecordCollection;
use super::record::{Channel, WaveformRecord};

/// How two records relate to each other
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pairing {
    /// Same channel, same timing, identical samples
    Duplicate,
    /// Same station and event, possibly different channel or end time
    EventMatch,
    Unrelated,
}

/// Classify a pair of records. The duplicate test takes precedence.
///
/// Duplicates must agree on end time; event matches need not, since channels
/// of one event can differ in their trailing samples.
pub fn pairing(a: &WaveformRecord, b: &WaveformRecord) -> Pairing {
    let same_event = a.network == b.network
        && a.station == b.station
        && a.start_time == b.start_time
        && a.location == b.location
        && a.units() == b.units()
        && a.process_level() == b.process_level();
    if !same_event {
        return Pairing::Unrelated;
    }

    // Start times are equal here, so equal offsets mean equal end times. The
    // offset is compared since the end time may fall past the calendar.
    // NaN never compares equal, so records with gaps are never duplicates.
    if a.end_offset() == b.end_offset() && a.channel == b.channel && a.data == b.data {
        Pairing::Duplicate
    } else {
        Pairing::EventMatch
    }
}

/// A non-fatal observation made while grouping
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupWarning {
    /// A record matched nothing and was emitted on its own
    SingleChannel {
        id: String,
        channel: Channel,
        start_time: PrimitiveDateTime,
    },
}

impl fmt::Display for GroupWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SingleChannel { id, start_time, .. } => {
                write!(f, "One channel stream: {id} starting {start_time}")
            }
        }
    }
}

/// Consolidate collections, logging a warning for each single-channel group
pub fn group_channels(collections: Vec<RecordCollection>) -> Vec<RecordCollection> {
    let (grouped, warnings) = group_channels_with_warnings(collections);
    for warning in warnings.iter() {
        log::warn!("{warning}");
    }
    grouped
}

/// Consolidate collections, returning the warnings instead of logging them.
///
/// Zero or one collection is returned untouched.
pub fn group_channels_with_warnings(
    collections: Vec<RecordCollection>,
) -> (Vec<RecordCollection>, Vec<GroupWarning>) {
    if collections.len() <= 1 {
        return (collections, vec![]);
    }

    let records: Vec<WaveformRecord> = collections.into_iter().flatten().collect();
    let (matches, mut marked) = classify(&records);

    let mut pool: Vec<Option<WaveformRecord>> = records.into_iter().map(Some).collect();
    let mut grouped: Vec<RecordCollection> = Vec::new();

    for (seed, seed_matches) in matches.iter().enumerate() {
        let mut collection = RecordCollection::new();
        let mut is_grouped = false;
        for &member in seed_matches {
            if !marked.contains(member) && !marked.contains(seed) {
                if let Some(record) = pool[member].take() {
                    collection.push(record);
                }
                marked.insert(member);
                is_grouped = true;
            }
        }
        if is_grouped {
            if let Some(record) = pool[seed].take() {
                collection.push(record);
            }
            marked.insert(seed);
            grouped.push(collection);
        }
    }

    let mut warnings = Vec::new();
    for (idx, slot) in pool.iter_mut().enumerate() {
        if marked.contains(idx) {
            continue;
        }
        if let Some(record) = slot.take() {
            warnings.push(GroupWarning::SingleChannel {
                id: record.id(),
                channel: record.channel,
                start_time: record.start_time,
            });
            grouped.push(RecordCollection::from(record));
        }
    }

    (grouped, warnings)
}

/// Single forward pass over the pool.
///
/// Returns the event matches of every position and the set of positions
/// marked as duplicates. A position already marked when its turn comes is
/// skipped and keeps no matches.
fn classify(records: &[WaveformRecord]) -> (Vec<Vec<usize>>, BitSet) {
    let mut marked = BitSet::with_capacity(records.len());
    let mut matches: Vec<Vec<usize>> = vec![Vec::new(); records.len()];

    for (i, record) in records.iter().enumerate() {
        if marked.contains(i) {
            continue;
        }
        for (j, other) in records.iter().enumerate() {
            if i == j {
                continue;
            }
            match pairing(record, other) {
                Pairing::Duplicate => {
                    marked.insert(j);
                }
                Pairing::EventMatch => matches[i].push(j),
                Pairing::Unrelated => (),
            }
        }
    }

    (matches, marked)
}

//Unit tests
#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{ProcessLevel, Units};
    use ndarray::Array1;
    use time::macros::datetime;

    fn record(station: &str, channel: Channel, npts: usize, offset: f64) -> WaveformRecord {
        let data = Array1::from_iter((0..npts).map(|i| i as f64 * 0.5 + offset));
        WaveformRecord::new(
            "KNET",
            station,
            channel,
            datetime!(2011-03-11 14:46:19),
            100.0,
            data,
        )
    }

    fn single(rec: WaveformRecord) -> RecordCollection {
        RecordCollection::from(rec)
    }

    fn total_records(collections: &[RecordCollection]) -> usize {
        collections.iter().map(|c| c.len()).sum()
    }

    #[test]
    fn test_pairing() {
        let a = record("MYG004", Channel::H1, 10, 0.0);
        assert_eq!(pairing(&a, &a.clone()), Pairing::Duplicate);

        let other_data = record("MYG004", Channel::H1, 10, 1.0);
        assert_eq!(pairing(&a, &other_data), Pairing::EventMatch);

        let other_channel = record("MYG004", Channel::Z, 10, 0.0);
        assert_eq!(pairing(&a, &other_channel), Pairing::EventMatch);

        let longer = record("MYG004", Channel::H1, 12, 0.0);
        assert_eq!(pairing(&a, &longer), Pairing::EventMatch);

        let other_station = record("MYG005", Channel::H1, 10, 0.0);
        assert_eq!(pairing(&a, &other_station), Pairing::Unrelated);

        let velocity = a.clone().with_units(Units::Velocity);
        assert_eq!(pairing(&a, &velocity), Pairing::Unrelated);

        let corrected = a.clone().with_process_level(ProcessLevel::V2);
        assert_eq!(pairing(&a, &corrected), Pairing::Unrelated);

        let located = a.clone().with_location("10");
        assert_eq!(pairing(&a, &located), Pairing::Unrelated);
    }

    #[test]
    fn test_nan_samples_are_not_duplicates() {
        let mut a = record("MYG004", Channel::H1, 10, 0.0);
        a.data[3] = f64::NAN;
        assert_eq!(pairing(&a, &a.clone()), Pairing::EventMatch);
    }

    #[test]
    fn test_end_of_calendar_records() {
        let late = |channel, offset| {
            WaveformRecord::new(
                "KNET",
                "MYG004",
                channel,
                datetime!(9999-12-31 23:59:59),
                4.0,
                Array1::from_iter((0..12).map(|i| i as f64 + offset)),
            )
        };
        let input = vec![
            single(late(Channel::H1, 0.0)),
            single(late(Channel::H1, 0.0)),
            single(late(Channel::Z, 1.0)),
        ];
        let (out, warnings) = group_channels_with_warnings(input);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].channels(), vec![Channel::Z, Channel::H1]);
        assert!(warnings.is_empty());

        let (out, warnings) = group_channels_with_warnings(vec![
            single(late(Channel::H1, 0.0)),
            single(late(Channel::H1, 0.0)),
        ]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].len(), 1);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_noop_for_zero_or_one() {
        let (out, warnings) = group_channels_with_warnings(vec![]);
        assert!(out.is_empty());
        assert!(warnings.is_empty());

        let mut lone = RecordCollection::new();
        lone.push(record("MYG004", Channel::H1, 10, 0.0));
        lone.push(record("MYG004", Channel::H1, 10, 0.0));
        let expected = vec![lone.clone()];
        let (out, warnings) = group_channels_with_warnings(vec![lone]);
        assert_eq!(out, expected);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_duplicate_elimination() {
        let a = record("MYG004", Channel::H1, 10, 0.0);
        let (out, warnings) = group_channels_with_warnings(vec![single(a.clone()), single(a.clone())]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].len(), 1);
        assert_eq!(out[0].records()[0], a);
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_three_channels_grouped() {
        let input = vec![
            single(record("MYG004", Channel::H1, 10, 0.0)),
            single(record("MYG004", Channel::H2, 11, 1.0)),
            single(record("MYG004", Channel::Z, 12, 2.0)),
        ];
        let (out, warnings) = group_channels_with_warnings(input);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].channels(), vec![Channel::H2, Channel::Z, Channel::H1]);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_repeated_full_collections() {
        let full = RecordCollection::from(vec![
            record("MYG004", Channel::H1, 10, 0.0),
            record("MYG004", Channel::H2, 10, 1.0),
            record("MYG004", Channel::Z, 10, 2.0),
        ]);
        let (out, warnings) = group_channels_with_warnings(vec![full.clone(), full]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].channels(), vec![Channel::H2, Channel::Z, Channel::H1]);
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_singleton_sweep() {
        let input = vec![
            single(record("MYG004", Channel::H1, 10, 0.0)),
            single(record("MYG004", Channel::H2, 10, 1.0)),
            single(record("IWT010", Channel::Z, 10, 0.0)),
        ];
        let (out, warnings) = group_channels_with_warnings(input);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].channels(), vec![Channel::H2, Channel::H1]);
        assert_eq!(out[1].len(), 1);
        assert_eq!(out[1].records()[0].station, "IWT010");
        assert_eq!(warnings.len(), 1);
        match &warnings[0] {
            GroupWarning::SingleChannel { id, channel, .. } => {
                assert_eq!(id, "KNET.IWT010.--.Z");
                assert_eq!(*channel, Channel::Z);
            }
        }
    }

    #[test]
    fn test_order_sensitivity_preserves_counts() {
        let h1 = record("MYG004", Channel::H1, 10, 0.0);
        let h2 = record("MYG004", Channel::H2, 10, 1.0);
        let z = record("MYG004", Channel::Z, 10, 2.0);
        let lone = record("IWT010", Channel::Z, 10, 0.0);

        let first = vec![
            single(h1.clone()),
            single(h2.clone()),
            single(h1.clone()),
            single(z.clone()),
            single(lone.clone()),
        ];
        let second = vec![
            single(lone),
            single(z),
            single(h1.clone()),
            single(h2),
            single(h1),
        ];

        let (out_first, warn_first) = group_channels_with_warnings(first);
        let (out_second, warn_second) = group_channels_with_warnings(second);

        assert_eq!(total_records(&out_first), 4);
        assert_eq!(total_records(&out_second), 4);
        assert_eq!(warn_first.len(), 1);
        assert_eq!(warn_second.len(), 1);

        // Seeds differ with the ordering
        assert_eq!(out_first[0].channels(), vec![Channel::H2, Channel::Z, Channel::H1]);
        assert_eq!(out_second[0].channels(), vec![Channel::H1, Channel::H2, Channel::Z]);
        assert_eq!(out_first.last().unwrap().records()[0].station, "IWT010");
        assert_eq!(out_second.last().unwrap().records()[0].station, "IWT010");
    }

    #[test]
    fn test_marked_seed_cannot_group() {
        // The second copy of H1 is marked while scanning position 0, so it
        // never seeds a group of its own.
        let h1 = record("MYG004", Channel::H1, 10, 0.0);
        let h2 = record("MYG004", Channel::H2, 10, 1.0);
        let (matches, marked) = classify(&[h1.clone(), h1, h2]);
        assert!(marked.contains(1));
        assert!(matches[1].is_empty());
        assert_eq!(matches[0], vec![2]);
        assert_eq!(matches[2], vec![0, 1]);
    }
}
