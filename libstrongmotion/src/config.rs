use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::constants::DEFAULT_IMTS;
use super::error::ConfigError;

/// Structure representing the application configuration. Contains the input
/// data locations, output locations and processing options.
/// Configs are seralizable and deserializable to YAML using serde and serde_yaml
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Files and/or directories of strong motion data
    pub input_paths: Vec<PathBuf>,
    /// Only files with these extensions are taken from directories. Empty
    /// means every file.
    pub file_extensions: Vec<String>,
    pub summary_path: Option<PathBuf>,
    pub imts: Vec<String>,
    /// Skip files which fail to parse instead of aborting the batch
    pub skip_bad_files: bool,
    pub n_threads: i32,
}

impl Default for Config {
    /// Generate a new Config object. Input paths will be empty
    fn default() -> Self {
        Self {
            input_paths: vec![],
            file_extensions: vec![],
            summary_path: None,
            imts: DEFAULT_IMTS.iter().map(|s| s.to_string()).collect(),
            skip_bad_files: true,
            n_threads: 1,
        }
    }
}

impl Config {
    /// Read the configuration in a YAML file
    /// Returns a Config if successful
    pub fn read_config_file(config_path: &Path) -> Result<Self, ConfigError> {
        if !config_path.exists() {
            return Err(ConfigError::BadFilePath(config_path.to_path_buf()));
        }

        let yaml_str = std::fs::read_to_string(config_path)?;

        Ok(serde_yaml::from_str::<Self>(&yaml_str)?)
    }

    /// Resolve the input paths into a list of files.
    ///
    /// Explicit files keep the order they were given in; directories are
    /// expanded (non-recursively) in sorted order. This order is the order
    /// records are handed to consolidation.
    pub fn collect_input_files(&self) -> Result<Vec<PathBuf>, ConfigError> {
        let mut files: Vec<PathBuf> = Vec::new();
        for path in self.input_paths.iter() {
            if path.is_dir() {
                let mut dir_files: Vec<PathBuf> = Vec::new();
                for item in path.read_dir()? {
                    let item_path = item?.path();
                    if item_path.is_file() && self.is_extension_accepted(&item_path) {
                        dir_files.push(item_path);
                    }
                }
                dir_files.sort();
                files.append(&mut dir_files);
            } else if path.is_file() {
                files.push(path.clone());
            } else {
                return Err(ConfigError::BadFilePath(path.clone()));
            }
        }

        if files.is_empty() {
            return Err(ConfigError::NoInputFiles);
        }
        Ok(files)
    }

    fn is_extension_accepted(&self, path: &Path) -> bool {
        if self.file_extensions.is_empty() {
            return true;
        }
        match path.extension() {
            Some(ext) => self
                .file_extensions
                .iter()
                .any(|e| ext.to_string_lossy().eq_ignore_ascii_case(e.trim_start_matches('.'))),
            None => false,
        }
    }

    pub fn is_n_threads_valid(&self) -> bool {
        self.n_threads >= 1
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.is_n_threads_valid() {
            return Err(ConfigError::BadThreadCount(self.n_threads));
        }
        Ok(())
    }

    pub fn has_summary_path(&self) -> bool {
        self.summary_path.is_some()
    }
}
