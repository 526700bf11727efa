//! Solution quality flag
use crate::ParsingError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// [Quality] describes how a solution was obtained,
/// which is also a rough indication of its confidence.
/// It is the "Q" column of solution files.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Quality {
    /// Carrier phase solution with resolved ambiguities
    Fix,
    /// Carrier phase solution with float ambiguities
    Float,
    /// SBAS corrected solution
    Sbas,
    /// Code differential solution
    Dgps,
    /// Standalone solution
    Single,
    /// Precise Point Positioning
    Ppp,
    /// No solution or unspecified
    #[default]
    Unknown,
}

impl Quality {
    /// All qualities, following the file code order
    pub const ALL: [Self; 7] = [
        Self::Unknown,
        Self::Fix,
        Self::Float,
        Self::Sbas,
        Self::Dgps,
        Self::Single,
        Self::Ppp,
    ];

    /// Builds [Quality] from the numerical "Q" code
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Unknown),
            1 => Some(Self::Fix),
            2 => Some(Self::Float),
            3 => Some(Self::Sbas),
            4 => Some(Self::Dgps),
            5 => Some(Self::Single),
            6 => Some(Self::Ppp),
            _ => None,
        }
    }
    /// Returns the numerical "Q" code
    pub fn code(&self) -> u8 {
        match self {
            Self::Unknown => 0,
            Self::Fix => 1,
            Self::Float => 2,
            Self::Sbas => 3,
            Self::Dgps => 4,
            Self::Single => 5,
            Self::Ppp => 6,
        }
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Fix => f.write_str("fix"),
            Self::Float => f.write_str("float"),
            Self::Sbas => f.write_str("sbas"),
            Self::Dgps => f.write_str("dgps"),
            Self::Single => f.write_str("single"),
            Self::Ppp => f.write_str("ppp"),
            Self::Unknown => f.write_str("unknown"),
        }
    }
}

impl std::str::FromStr for Quality {
    type Err = ParsingError;
    /// Parses either the numerical code or the label
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(code) = s.parse::<u8>() {
            return Self::from_code(code).ok_or(ParsingError::Quality(s.to_string()));
        }
        match s.to_lowercase().as_str() {
            "fix" => Ok(Self::Fix),
            "float" => Ok(Self::Float),
            "sbas" => Ok(Self::Sbas),
            "dgps" => Ok(Self::Dgps),
            "single" => Ok(Self::Single),
            "ppp" => Ok(Self::Ppp),
            "unknown" | "none" => Ok(Self::Unknown),
            _ => Err(ParsingError::Quality(s.to_string())),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::str::FromStr;
    #[test]
    fn quality_codes() {
        for quality in Quality::ALL {
            assert_eq!(Quality::from_code(quality.code()), Some(quality));
        }
        assert_eq!(Quality::from_code(7), None);
    }
    #[test]
    fn quality_parsing() {
        assert_eq!(Quality::from_str("1"), Ok(Quality::Fix));
        assert_eq!(Quality::from_str("5"), Ok(Quality::Single));
        assert_eq!(Quality::from_str("Float"), Ok(Quality::Float));
        assert_eq!(Quality::from_str(" ppp "), Ok(Quality::Ppp));
        assert!(Quality::from_str("9").is_err());
        assert!(Quality::from_str("rtk").is_err());
    }
}
