// Fixed layout of the K-NET ASCII format
pub const TEXT_HDR_ROWS: usize = 17;
pub const COLS_PER_LINE: usize = 8;

pub const ORIGIN_TIME_LABEL: &str = "Origin Time";
pub const STATION_CODE_LABEL: &str = "Station Code";

// The K-NET format does not carry a location code, so we flag it with the
// standard "no location" value
pub const NO_LOCATION: &str = "--";

pub const KNET_NETWORK: &str = "KNET";
pub const KNET_SOURCE: &str =
    "Japan National Research Institute for Earth Science and Disaster Resilience";
pub const KNET_SOURCE_FORMAT: &str = "KNET";

// Suffix of the scale factor numerator, i.e. 3920(gal)/6182761
pub const GAL_SUFFIX: &str = "(gal)";

pub const DEFAULT_IMTS: [&str; 5] = ["PGA", "PGV", "SA(0.3)", "SA(1.0)", "SA(3.0)"];
