use std::fmt;

use super::record::{Channel, WaveformRecord};

/// An ordered set of records believed to share one station and event.
///
/// A collection has no identity of its own; grouping compares the metadata of
/// its members. Records are owned by exactly one collection at a time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordCollection {
    records: Vec<WaveformRecord>,
}

impl RecordCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: WaveformRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WaveformRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[WaveformRecord] {
        &self.records
    }

    pub fn first(&self) -> Option<&WaveformRecord> {
        self.records.first()
    }

    /// Channel codes of the members, in member order
    pub fn channels(&self) -> Vec<Channel> {
        self.records.iter().map(|r| r.channel).collect()
    }
}

impl From<WaveformRecord> for RecordCollection {
    fn from(record: WaveformRecord) -> Self {
        Self {
            records: vec![record],
        }
    }
}

impl From<Vec<WaveformRecord>> for RecordCollection {
    fn from(records: Vec<WaveformRecord>) -> Self {
        Self { records }
    }
}

impl IntoIterator for RecordCollection {
    type Item = WaveformRecord;
    type IntoIter = std::vec::IntoIter<WaveformRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a RecordCollection {
    type Item = &'a WaveformRecord;
    type IntoIter = std::slice::Iter<'a, WaveformRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl fmt::Display for RecordCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} record(s) in collection:", self.len())?;
        for record in &self.records {
            write!(f, "\n{record}")?;
        }
        Ok(())
    }
}
