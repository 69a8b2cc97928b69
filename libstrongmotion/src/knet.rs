//! Reader for the K-NET ASCII strong motion format.
//!
//! A K-NET file holds one channel: a 17 line positional header followed by
//! the raw counts, at most 8 values per line. Counts are calibrated to gal
//! (cm/s^2) using the header scale factor, then linearly detrended and
//! demeaned.
use ndarray::Array1;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use super::collection::RecordCollection;
use super::constants::*;
use super::error::FormatError;
use super::header::*;
use super::record::{Coordinates, ProcessLevel, StandardMetadata, Units, WaveformRecord};
use super::signal::{demean, detrend_linear};

/// Check to see if a file is a K-NET file.
///
/// This is a probe; any failure to read the file means "not K-NET".
pub fn is_knet(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }
    let file = match File::open(path) {
        Ok(f) => f,
        Err(_) => return false,
    };
    let mut lines = Vec::with_capacity(TEXT_HDR_ROWS);
    for line in BufReader::new(file).lines().take(TEXT_HDR_ROWS) {
        match line {
            Ok(l) => lines.push(l),
            Err(_) => return false,
        }
    }
    lines.len() == TEXT_HDR_ROWS && has_knet_labels(lines.as_slice())
}

fn has_knet_labels<S: AsRef<str>>(lines: &[S]) -> bool {
    lines.len() > 5
        && lines[0].as_ref().starts_with(ORIGIN_TIME_LABEL)
        && lines[5].as_ref().starts_with(STATION_CODE_LABEL)
}

/// Parse a K-NET file into a single calibrated record
pub fn parse_knet(path: &Path) -> Result<WaveformRecord, FormatError> {
    if !path.exists() {
        return Err(FormatError::BadFilePath(path.to_path_buf()));
    }

    // Recognized from the same read that is parsed
    let contents = std::fs::read_to_string(path)?;
    let lines: Vec<&str> = contents.lines().collect();
    if !has_knet_labels(lines.as_slice()) {
        return Err(FormatError::NotRecognized(path.to_path_buf()));
    }
    if lines.len() < TEXT_HDR_ROWS {
        return Err(FormatError::ShortHeader {
            path: path.to_path_buf(),
            found: lines.len(),
        });
    }
    let header = HeaderLines::new(path, &lines[..TEXT_HDR_ROWS]);

    let station = header.token(&STATION_CODE)?;
    let coordinates = Coordinates {
        latitude: header.float(&STATION_LAT)?,
        longitude: header.float(&STATION_LON)?,
        elevation: header.float(&STATION_HEIGHT)?,
    };
    let sampling_rate = header.sampling_rate(&SAMPLING_FREQ)?;
    let start_time = header.timestamp(&RECORD_TIME)?;
    let channel = header.channel(&DIRECTION)?;
    let calib = header.calibration(&SCALE_FACTOR)?;

    let sample_count = header.sample_count(&DURATION, sampling_rate)?;

    let mut data = read_samples(&lines[TEXT_HDR_ROWS..], sample_count);
    data.mapv_inplace(|v| v * calib);

    // Always applied, including to data which was already corrected
    detrend_linear(&mut data);
    demean(&mut data);

    let standard = StandardMetadata {
        units: Units::Acceleration,
        process_level: ProcessLevel::V1,
        station_name: String::new(),
        source: KNET_SOURCE.to_string(),
        source_format: KNET_SOURCE_FORMAT.to_string(),
        ..Default::default()
    };

    log::debug!(
        "Parsed {} channel {} with {} samples at {} Hz",
        path.to_string_lossy(),
        channel,
        data.len(),
        sampling_rate
    );

    Ok(WaveformRecord {
        network: KNET_NETWORK.to_string(),
        station: station.to_string(),
        location: NO_LOCATION.to_string(),
        channel,
        start_time,
        sampling_rate,
        sample_count,
        coordinates,
        standard,
        data,
    })
}

/// Read a K-NET file as a single-record collection
pub fn read_knet(path: &Path) -> Result<RecordCollection, FormatError> {
    Ok(RecordCollection::from(parse_knet(path)?))
}

/// Read up to `count` values laid out row-major, `COLS_PER_LINE` to a row
/// with a possibly short final row.
///
/// Only rows present in the file are materialized, so a truncated body yields
/// fewer samples than declared. Missing or malformed values within a present
/// row become NaN so the sample positions stay aligned.
fn read_samples(body: &[&str], count: usize) -> Array1<f64> {
    let full_rows = count / COLS_PER_LINE;
    let tail = count % COLS_PER_LINE;
    let n_rows = full_rows + usize::from(tail != 0);

    let mut rows = body.iter().filter(|line| !line.trim().is_empty());
    let mut data = Vec::new();
    for row in 0..n_rows {
        let mut tokens = match rows.next() {
            Some(line) => line.split_whitespace(),
            None => break,
        };
        let width = if row < full_rows { COLS_PER_LINE } else { tail };
        for _ in 0..width {
            let value = tokens
                .next()
                .and_then(|t| t.parse::<f64>().ok())
                .unwrap_or(f64::NAN);
            data.push(value);
        }
    }
    Array1::from_vec(data)
}
