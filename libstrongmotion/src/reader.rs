use std::path::Path;

use super::collection::RecordCollection;
use super::error::{FormatError, ReaderError};
use super::knet::{is_knet, read_knet};

/// An ingestion adapter for one file format.
///
/// `is_format` is a cheap probe and never fails; `read` may assume the probe
/// has already succeeded but must still reject malformed content.
pub trait FormatReader {
    fn name(&self) -> &'static str;
    fn is_format(&self, path: &Path) -> bool;
    fn read(&self, path: &Path) -> Result<RecordCollection, FormatError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct KnetReader;

impl FormatReader for KnetReader {
    fn name(&self) -> &'static str {
        "KNET"
    }

    fn is_format(&self, path: &Path) -> bool {
        is_knet(path)
    }

    fn read(&self, path: &Path) -> Result<RecordCollection, FormatError> {
        read_knet(path)
    }
}

/// All known format readers, in probe order
pub fn readers() -> Vec<Box<dyn FormatReader + Send + Sync>> {
    vec![Box::new(KnetReader)]
}

/// Read a file with the first reader that recognizes it
pub fn read_data(path: &Path) -> Result<RecordCollection, ReaderError> {
    for reader in readers() {
        if reader.is_format(path) {
            log::debug!("Reading {} as {}", path.to_string_lossy(), reader.name());
            return Ok(reader.read(path)?);
        }
    }
    Err(ReaderError::UnknownFormat(path.to_path_buf()))
}
