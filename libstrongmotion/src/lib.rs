//! # libstrongmotion
//!
//! libstrongmotion ingests strong motion (accelerometer) recordings and
//! consolidates them into one collection of channels per station and event.
//! It reads the fixed-layout K-NET ASCII format distributed by the Japanese
//! national network, converts the raw counts to acceleration in gal, and
//! removes the linear trend and mean from every channel.
//!
//! K-NET distributes one file per channel, and data sets assembled from
//! several deliveries often contain the same channel more than once. The
//! grouping stage pools all records, drops exact copies, and regroups the rest
//! by network, station, start time, location, units and processing level.
//!
//! ## Use
//!
//! ```no_run
//! use std::path::Path;
//! use libstrongmotion::grouping::group_channels;
//! use libstrongmotion::reader::read_data;
//!
//! let mut collections = Vec::new();
//! for name in ["MYG0041103111446.NS", "MYG0041103111446.EW", "MYG0041103111446.UD"] {
//!     collections.push(read_data(Path::new(name)).unwrap());
//! }
//! let grouped = group_channels(collections);
//! assert_eq!(grouped.len(), 1);
//! ```
//!
//! ## Grouping order
//!
//! Grouping is order dependent. Records are addressed by their position in
//! the pooled input, and a record marked as a duplicate while an earlier
//! position is examined can no longer seed a group. Reordering the input can
//! change which record seeds a group and the order of members within it. The
//! number of records that survive is unaffected.
//!
//! ## Configuration
//!
//! The CLI is driven by a YAML configuration file:
//!
//! ```yml
//! input_paths:
//! - /data/knet/20110311
//! file_extensions: [NS, EW, UD]
//! summary_path: /data/knet/summary.yml
//! imts: [PGA, PGV, SA(0.3), SA(1.0), SA(3.0)]
//! skip_bad_files: true
//! n_threads: 4
//! ```
//!
//! Directories are scanned non-recursively and their files taken in sorted
//! order; explicit files are taken in the order given. That order is the
//! grouping order. Files are parsed in parallel across `n_threads` workers,
//! but results are put back in input order before grouping.
//!
//! ## Output
//!
//! When `summary_path` is set a YAML summary of every consolidated
//! collection is written: station metadata, the channels it holds, and the
//! intensity measures which apply to its units.
pub mod collection;
pub mod config;
pub mod constants;
pub mod error;
pub mod grouping;
pub mod header;
pub mod imt;
pub mod knet;
pub mod process;
pub mod reader;
pub mod record;
pub mod signal;
pub mod summary;
pub mod worker_status;
