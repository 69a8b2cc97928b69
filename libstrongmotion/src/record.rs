//! Single-channel strong motion records.
//!
//! [`WaveformRecord`] is one instrument axis of one recording: identity codes,
//! timing, physical units, station coordinates, provenance, and the calibrated
//! sample payload.

use ndarray::Array1;
use std::fmt;
use time::{Duration, PrimitiveDateTime};

use super::constants::NO_LOCATION;

// Well inside the range of time::Duration, and beyond any calendar date
const MAX_OFFSET_SECONDS: f64 = 1e15;

/// Axis of motion recorded by a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Channel {
    /// Horizontal, north-south
    H1,
    /// Horizontal, east-west
    H2,
    /// Vertical, up-down
    Z,
}

impl Channel {
    /// Map a K-NET direction label onto a channel
    pub fn from_direction(direction: &str) -> Option<Self> {
        match direction {
            "N-S" => Some(Self::H1),
            "E-W" => Some(Self::H2),
            "U-D" => Some(Self::Z),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::H1 => "H1",
            Self::H2 => "H2",
            Self::Z => "Z",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Physical units of the samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Units {
    /// cm/s^2
    Acceleration,
    /// cm/s
    Velocity,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Acceleration => "acc",
            Self::Velocity => "vel",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Degree of processing applied before the record reached us.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcessLevel {
    /// Raw counts
    V0,
    /// Uncorrected, converted to physical units
    V1,
    /// Corrected
    V2,
    /// Derived products (e.g. response spectra)
    V3,
}

impl ProcessLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V0 => "V0",
            Self::V1 => "V1",
            Self::V2 => "V2",
            Self::V3 => "V3",
        }
    }
}

impl fmt::Display for ProcessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Coordinates {
    /// Decimal degrees
    pub latitude: f64,
    /// Decimal degrees
    pub longitude: f64,
    /// Meters
    pub elevation: f64,
}

/// Provenance and descriptive metadata shared by every supported format.
///
/// Fields a format does not provide are `None` (or empty for text).
#[derive(Debug, Clone, PartialEq)]
pub struct StandardMetadata {
    pub units: Units,
    pub process_level: ProcessLevel,
    pub station_name: String,
    /// Long-form name of the agency providing the data
    pub source: String,
    /// Short tag of the file format the record was read from
    pub source_format: String,
    pub horizontal_orientation: Option<f64>,
    pub instrument_period: Option<f64>,
    pub instrument_damping: Option<f64>,
    pub processing_time: Option<String>,
    pub sensor_serial_number: Option<String>,
    pub instrument: Option<String>,
    pub comments: Option<String>,
    pub structure_type: Option<String>,
    pub corner_frequency: Option<f64>,
}

impl Default for StandardMetadata {
    fn default() -> Self {
        Self {
            units: Units::Acceleration,
            process_level: ProcessLevel::V1,
            station_name: String::new(),
            source: String::new(),
            source_format: String::new(),
            horizontal_orientation: None,
            instrument_period: None,
            instrument_damping: None,
            processing_time: None,
            sensor_serial_number: None,
            instrument: None,
            comments: None,
            structure_type: None,
            corner_frequency: None,
        }
    }
}

/// One channel of a strong motion recording.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveformRecord {
    pub network: String,
    pub station: String,
    /// Two character location code, `--` when the format has none
    pub location: String,
    pub channel: Channel,
    /// Second resolution, as given by the source
    pub start_time: PrimitiveDateTime,
    /// Hz, always positive
    pub sampling_rate: f64,
    /// Sample count declared by the header. May differ from `data.len()`.
    pub sample_count: usize,
    pub coordinates: Coordinates,
    pub standard: StandardMetadata,
    pub data: Array1<f64>,
}

impl WaveformRecord {
    /// Create a record with default metadata. The declared sample count is
    /// taken from the data.
    pub fn new(
        network: &str,
        station: &str,
        channel: Channel,
        start_time: PrimitiveDateTime,
        sampling_rate: f64,
        data: Array1<f64>,
    ) -> Self {
        Self {
            network: network.into(),
            station: station.into(),
            location: NO_LOCATION.into(),
            channel,
            start_time,
            sampling_rate,
            sample_count: data.len(),
            coordinates: Coordinates::default(),
            standard: StandardMetadata::default(),
            data,
        }
    }

    pub fn with_location(mut self, location: &str) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_units(mut self, units: Units) -> Self {
        self.standard.units = units;
        self
    }

    pub fn with_process_level(mut self, level: ProcessLevel) -> Self {
        self.standard.process_level = level;
        self
    }

    pub fn with_coordinates(mut self, coordinates: Coordinates) -> Self {
        self.coordinates = coordinates;
        self
    }

    /// Number of materialized samples
    pub fn npts(&self) -> usize {
        self.data.len()
    }

    /// Sample interval in seconds
    pub fn delta(&self) -> f64 {
        1.0 / self.sampling_rate
    }

    /// Seconds from the first to the last materialized sample
    pub fn end_offset(&self) -> f64 {
        if self.npts() < 2 {
            return 0.0;
        }
        (self.npts() - 1) as f64 / self.sampling_rate
    }

    /// Time of the last materialized sample.
    ///
    /// None if it falls outside the representable date range.
    pub fn end_time(&self) -> Option<PrimitiveDateTime> {
        let offset = self.end_offset();
        if !offset.is_finite() || offset.abs() >= MAX_OFFSET_SECONDS {
            return None;
        }
        self.start_time.checked_add(Duration::seconds_f64(offset))
    }

    pub fn units(&self) -> Units {
        self.standard.units
    }

    pub fn process_level(&self) -> ProcessLevel {
        self.standard.process_level
    }

    /// Identifier in the usual NET.STA.LOC.CHA form
    pub fn id(&self) -> String {
        format!(
            "{}.{}.{}.{}",
            self.network, self.station, self.location, self.channel
        )
    }
}

impl fmt::Display for WaveformRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {} - ", self.id(), self.start_time)?;
        match self.end_time() {
            Some(end) => write!(f, "{end}")?,
            None => write!(f, "+{}s", self.end_offset())?,
        }
        write!(f, " | {} Hz, {} samples", self.sampling_rate, self.npts())
    }
}
