use std::path::PathBuf;
use thiserror::Error;

use super::worker_status::WorkerStatus;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FieldError {
    #[error("Token {0} is missing from header line {1}")]
    MissingToken(usize, usize),
    #[error("Could not parse {0:?} as a number: {1}")]
    BadFloat(String, std::num::ParseFloatError),
    #[error("Could not find a numeric prefix in {0:?}")]
    NoDigits(String),
    #[error("Sampling rate must be positive, found {0}")]
    NonPositiveRate(f64),
    #[error("Duration {0} does not give a representable sample count")]
    BadDuration(f64),
    #[error("Could not parse direction {0}")]
    BadDirection(String),
    #[error("Scale factor {0:?} is not of the form NUM(gal)/DEN")]
    BadCalibration(String),
    #[error("Could not parse timestamp {0:?}: {1}")]
    BadTimestamp(String, time::error::Parse),
}

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("Could not open file {0:?} because it does not exist")]
    BadFilePath(PathBuf),
    #[error("Format reader failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("File {0:?} is not a valid K-NET file")]
    NotRecognized(PathBuf),
    #[error("File {path:?} has {found} header lines; expected at least {exp}", exp=crate::constants::TEXT_HDR_ROWS)]
    ShortHeader { path: PathBuf, found: usize },
    #[error("File {path:?} failed to parse header field '{field}': {source}")]
    BadField {
        path: PathBuf,
        field: &'static str,
        source: FieldError,
    },
}

#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("No format reader recognized file {0:?}")]
    UnknownFormat(PathBuf),
    #[error("Reader failed due to format error: {0}")]
    Format(#[from] FormatError),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ImtError {
    #[error("Found invalid intensity measure specification: {0}")]
    InvalidSpec(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration as file {0:?} does not exist")]
    BadFilePath(PathBuf),
    #[error("Config failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Config failed to parse YAML: {0}")]
    ParsingError(#[from] serde_yaml::Error),
    #[error("Config did not resolve to any input files")]
    NoInputFiles,
    #[error("Config requested {0} worker threads; at least 1 is required")]
    BadThreadCount(i32),
}

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("Summary writer failed due to IO error: {0}")]
    IOError(#[from] std::io::Error),
    #[error("Summary writer failed to convert to yaml: {0}")]
    ParsingError(#[from] serde_yaml::Error),
}

#[derive(Debug, Error)]
pub enum ProcessorError {
    #[error("Processor failed due to Config error: {0}")]
    ConfigError(#[from] ConfigError),
    #[error("Processor failed due to Reader error: {0}")]
    ReaderError(#[from] ReaderError),
    #[error("Processor failed due to Summary error: {0}")]
    SummaryError(#[from] SummaryError),
    #[error("Processor failed due to Send error: {0}")]
    SendError(#[from] std::sync::mpsc::SendError<WorkerStatus>),
    #[error("Processor failed because worker {0} panicked")]
    WorkerPanicked(usize),
    #[error("Processor failed due to IO error: {0}")]
    IoError(#[from] std::io::Error),
}
