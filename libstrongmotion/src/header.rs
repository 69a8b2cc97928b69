//! Positional header decoding for fixed-layout text formats.
//!
//! Header values are addressed by line number and whitespace token index
//! rather than by key. The positions used by the K-NET reader are collected
//! below so the layout can be audited in one place.
use std::path::{Path, PathBuf};
use time::macros::format_description;
use time::PrimitiveDateTime;

use super::constants::GAL_SUFFIX;
use super::error::{FieldError, FormatError};
use super::record::Channel;

/// Location of a header value. Lines are 1-based, tokens 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPos {
    pub name: &'static str,
    pub line: usize,
    pub token: usize,
}

impl FieldPos {
    pub const fn new(name: &'static str, line: usize, token: usize) -> Self {
        Self { name, line, token }
    }
}

pub const STATION_CODE: FieldPos = FieldPos::new("station code", 6, 2);
pub const STATION_LAT: FieldPos = FieldPos::new("station latitude", 7, 2);
pub const STATION_LON: FieldPos = FieldPos::new("station longitude", 8, 2);
pub const STATION_HEIGHT: FieldPos = FieldPos::new("station height", 9, 2);
/// Date and time occupy two adjacent tokens
pub const RECORD_TIME: FieldPos = FieldPos::new("record time", 10, 2);
pub const SAMPLING_FREQ: FieldPos = FieldPos::new("sampling frequency", 11, 2);
pub const DURATION: FieldPos = FieldPos::new("duration", 12, 2);
pub const DIRECTION: FieldPos = FieldPos::new("direction", 13, 1);
pub const SCALE_FACTOR: FieldPos = FieldPos::new("scale factor", 14, 2);

/// Tokenized cache of the header lines of one file
#[derive(Debug)]
pub struct HeaderLines<'a> {
    path: PathBuf,
    lines: Vec<Vec<&'a str>>,
}

impl<'a> HeaderLines<'a> {
    pub fn new(path: &Path, lines: &[&'a str]) -> Self {
        Self {
            path: path.to_path_buf(),
            lines: lines
                .iter()
                .map(|line| line.split_whitespace().collect())
                .collect(),
        }
    }

    fn field_error(&self, pos: &FieldPos, source: FieldError) -> FormatError {
        FormatError::BadField {
            path: self.path.clone(),
            field: pos.name,
            source,
        }
    }

    fn token_at(&self, line: usize, token: usize) -> Option<&'a str> {
        self.lines
            .get(line.wrapping_sub(1))
            .and_then(|tokens| tokens.get(token))
            .copied()
    }

    /// Raw token at a position
    pub fn token(&self, pos: &FieldPos) -> Result<&'a str, FormatError> {
        self.token_at(pos.line, pos.token)
            .ok_or_else(|| self.field_error(pos, FieldError::MissingToken(pos.token, pos.line)))
    }

    /// `count` tokens starting at a position, joined with single spaces
    pub fn joined(&self, pos: &FieldPos, count: usize) -> Result<String, FormatError> {
        let mut parts = Vec::with_capacity(count);
        for offset in 0..count {
            let token = self.token_at(pos.line, pos.token + offset).ok_or_else(|| {
                self.field_error(
                    pos,
                    FieldError::MissingToken(pos.token + offset, pos.line),
                )
            })?;
            parts.push(token);
        }
        Ok(parts.join(" "))
    }

    pub fn float(&self, pos: &FieldPos) -> Result<f64, FormatError> {
        let token = self.token(pos)?;
        parse_float(token).map_err(|e| self.field_error(pos, e))
    }

    /// Sampling rate from a unit-suffixed token such as `100Hz`
    pub fn sampling_rate(&self, pos: &FieldPos) -> Result<f64, FormatError> {
        let token = self.token(pos)?;
        parse_sampling_rate(token).map_err(|e| self.field_error(pos, e))
    }

    /// Declared sample count, `floor(duration * sampling_rate)`
    pub fn sample_count(&self, pos: &FieldPos, sampling_rate: f64) -> Result<usize, FormatError> {
        let duration = self.float(pos)?;
        sample_count(duration, sampling_rate).map_err(|e| self.field_error(pos, e))
    }

    pub fn channel(&self, pos: &FieldPos) -> Result<Channel, FormatError> {
        let token = self.token(pos)?;
        Channel::from_direction(token)
            .ok_or_else(|| self.field_error(pos, FieldError::BadDirection(token.to_string())))
    }

    pub fn calibration(&self, pos: &FieldPos) -> Result<f64, FormatError> {
        let token = self.token(pos)?;
        parse_scale_factor(token).map_err(|e| self.field_error(pos, e))
    }

    /// Timestamp spread over a date token and a time token
    pub fn timestamp(&self, pos: &FieldPos) -> Result<PrimitiveDateTime, FormatError> {
        let text = self.joined(pos, 2)?;
        parse_timestamp(&text).map_err(|e| self.field_error(pos, e))
    }
}

fn parse_float(token: &str) -> Result<f64, FieldError> {
    token
        .parse::<f64>()
        .map_err(|e| FieldError::BadFloat(token.to_string(), e))
}

/// Leading run of digits found in the token
pub fn parse_sampling_rate(token: &str) -> Result<f64, FieldError> {
    let digits: String = token
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    if digits.is_empty() {
        return Err(FieldError::NoDigits(token.to_string()));
    }
    let rate = parse_float(&digits)?;
    if rate <= 0.0 {
        return Err(FieldError::NonPositiveRate(rate));
    }
    Ok(rate)
}

/// Number of samples in `duration` seconds. Rejects durations which are not
/// finite, are negative, or give a count beyond `usize`.
pub fn sample_count(duration: f64, sampling_rate: f64) -> Result<usize, FieldError> {
    let count = (duration * sampling_rate).floor();
    if !duration.is_finite() || duration < 0.0 || !count.is_finite() || count >= usize::MAX as f64 {
        return Err(FieldError::BadDuration(duration));
    }
    Ok(count as usize)
}

/// Calibration from a `NUM(gal)/DEN` token
pub fn parse_scale_factor(token: &str) -> Result<f64, FieldError> {
    let (num, den) = token
        .split_once('/')
        .ok_or_else(|| FieldError::BadCalibration(token.to_string()))?;
    let num = parse_float(&num.replace(GAL_SUFFIX, ""))?;
    let den = parse_float(den)?;
    Ok(num / den)
}

pub fn parse_timestamp(text: &str) -> Result<PrimitiveDateTime, FieldError> {
    PrimitiveDateTime::parse(
        text,
        format_description!("[year]/[month]/[day] [hour]:[minute]:[second]"),
    )
    .map_err(|e| FieldError::BadTimestamp(text.to_string(), e))
}
