//! Intensity measure specifications handed to the peak ground motion stage.
//!
//! Nothing here computes an intensity measure; it only decides which measures
//! are requested and which of them make sense for a record's units.
use std::fmt;
use std::str::FromStr;

use super::constants::DEFAULT_IMTS;
use super::error::ImtError;
use super::record::Units;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Imt {
    /// Peak ground acceleration
    Pga,
    /// Peak ground velocity
    Pgv,
    /// Pseudo-spectral acceleration at a period in seconds
    Sa(f64),
}

impl FromStr for Imt {
    type Err = ImtError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        if upper == "PGA" {
            Ok(Self::Pga)
        } else if upper == "PGV" {
            Ok(Self::Pgv)
        } else if let Some(period) = upper
            .strip_prefix("SA(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            match period.parse::<f64>() {
                Ok(p) if p > 0.0 => Ok(Self::Sa(p)),
                _ => Err(ImtError::InvalidSpec(s.to_string())),
            }
        } else {
            Err(ImtError::InvalidSpec(s.to_string()))
        }
    }
}

impl fmt::Display for Imt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pga => write!(f, "PGA"),
            Self::Pgv => write!(f, "PGV"),
            Self::Sa(period) => write!(f, "SA({period:?})"),
        }
    }
}

impl Imt {
    /// Whether the measure can be computed from records in these units.
    /// Velocity records only yield PGV.
    pub fn supports(&self, units: Units) -> bool {
        match units {
            Units::Acceleration => true,
            Units::Velocity => matches!(self, Self::Pgv),
        }
    }
}

pub fn default_imts() -> Vec<Imt> {
    DEFAULT_IMTS
        .iter()
        .filter_map(|s| Imt::from_str(s).ok())
        .collect()
}

/// Split a list of specifications into valid measures and invalid strings.
///
/// Invalid entries are skipped with a warning, never treated as an error.
pub fn validate_imt_list<S: AsRef<str>>(specs: &[S]) -> (Vec<Imt>, Vec<String>) {
    let mut valid = Vec::new();
    let mut invalid = Vec::new();
    for spec in specs {
        match Imt::from_str(spec.as_ref()) {
            Ok(imt) => valid.push(imt),
            Err(ImtError::InvalidSpec(s)) => invalid.push(s),
        }
    }
    if !invalid.is_empty() {
        log::warn!("IMTs {invalid:?} are invalid specifications. Skipping.");
    }
    (valid, invalid)
}

/// The subset of `imts` that apply to records in `units`
pub fn imts_for_units(imts: &[Imt], units: Units) -> Vec<Imt> {
    imts.iter().copied().filter(|imt| imt.supports(units)).collect()
}
