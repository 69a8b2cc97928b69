use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

use super::collection::RecordCollection;
use super::error::SummaryError;
use super::imt::{imts_for_units, Imt};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelSummary {
    pub channel: String,
    pub sampling_rate: f64,
    pub npts: usize,
    pub declared_npts: usize,
    /// None when the end falls past the representable date range
    pub end_time: Option<String>,
}

/// Metadata of one consolidated collection, as written to the summary file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionSummary {
    pub network: String,
    pub station: String,
    pub location: String,
    pub station_name: String,
    pub source: String,
    pub source_format: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
    pub start_time: String,
    pub units: String,
    pub process_level: String,
    pub channels: Vec<ChannelSummary>,
    /// Measures the peak ground motion stage may compute for these units
    pub imts: Vec<String>,
}

impl CollectionSummary {
    /// Summarize a collection. Returns None for an empty collection.
    pub fn new(collection: &RecordCollection, imts: &[Imt]) -> Option<Self> {
        let first = collection.first()?;
        let channels = collection
            .iter()
            .map(|r| ChannelSummary {
                channel: r.channel.to_string(),
                sampling_rate: r.sampling_rate,
                npts: r.npts(),
                declared_npts: r.sample_count,
                end_time: r.end_time().map(|t| t.to_string()),
            })
            .collect();
        Some(Self {
            network: first.network.clone(),
            station: first.station.clone(),
            location: first.location.clone(),
            station_name: first.standard.station_name.clone(),
            source: first.standard.source.clone(),
            source_format: first.standard.source_format.clone(),
            latitude: first.coordinates.latitude,
            longitude: first.coordinates.longitude,
            elevation: first.coordinates.elevation,
            start_time: first.start_time.to_string(),
            units: first.units().to_string(),
            process_level: first.process_level().to_string(),
            channels,
            imts: imts_for_units(imts, first.units())
                .iter()
                .map(|imt| imt.to_string())
                .collect(),
        })
    }
}

pub fn summarize(collections: &[RecordCollection], imts: &[Imt]) -> Vec<CollectionSummary> {
    collections
        .iter()
        .filter_map(|c| CollectionSummary::new(c, imts))
        .collect()
}

/// Write the summaries as a YAML sequence
pub fn write_summary(path: &Path, summaries: &[CollectionSummary]) -> Result<(), SummaryError> {
    let yaml_str = serde_yaml::to_string(summaries)?;
    let mut file = File::create(path)?;
    file.write_all(yaml_str.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imt::default_imts;
    use crate::record::{Channel, Units, WaveformRecord};
    use ndarray::Array1;
    use time::macros::datetime;

    fn collection(units: Units) -> RecordCollection {
        let start = datetime!(2011-03-11 14:46:19);
        RecordCollection::from(vec![
            WaveformRecord::new("KNET", "MYG004", Channel::H1, start, 100.0, Array1::zeros(101))
                .with_units(units),
            WaveformRecord::new("KNET", "MYG004", Channel::Z, start, 100.0, Array1::zeros(201))
                .with_units(units),
        ])
    }

    #[test]
    fn test_summary_fields() {
        let summary = CollectionSummary::new(&collection(Units::Acceleration), &default_imts())
            .unwrap();
        assert_eq!(summary.station, "MYG004");
        assert_eq!(summary.units, "acc");
        assert_eq!(summary.channels.len(), 2);
        assert_eq!(summary.channels[1].channel, "Z");
        assert_eq!(summary.channels[1].npts, 201);
        assert_eq!(summary.imts.len(), 5);

        let velocity = CollectionSummary::new(&collection(Units::Velocity), &default_imts())
            .unwrap();
        assert_eq!(velocity.imts, vec![String::from("PGV")]);

        assert!(CollectionSummary::new(&RecordCollection::new(), &default_imts()).is_none());
    }

    #[test]
    fn test_write_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.yml");
        let summaries = summarize(&[collection(Units::Acceleration)], &default_imts());
        write_summary(&path, &summaries).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let back: Vec<CollectionSummary> = serde_yaml::from_str(&text).unwrap();
        assert_eq!(back, summaries);
    }
}
