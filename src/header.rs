//! Solution file header
use crate::{position::GeodeticPosition, time::TimeSystem, ParsingError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Coordinates representation of the position columns
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum CoordinateSystem {
    /// Latitude, longitude in decimal degrees and ellipsoidal height
    #[default]
    Geodetic,
    /// Latitude, longitude as (degrees, minutes, seconds) and ellipsoidal height
    GeodeticDms,
    /// ECEF WGS84 coordinates in meters
    Ecef,
    /// East, north, up baseline in meters, from the reference position
    Enu,
}

impl CoordinateSystem {
    /// Number of fields the position occupies on each data line
    pub fn nb_fields(&self) -> usize {
        match self {
            Self::GeodeticDms => 7,
            _ => 3,
        }
    }
}

/// Time format of the epoch columns.
/// It is identified on each line, this is only informative.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TimeFormat {
    /// "yyyy/mm/dd hh:mm:ss.sss"
    #[default]
    Calendar,
    /// "week tow"
    WeekTow,
}

/// [SolutionHeader] describes the layout of a solution file.
/// When a file has no column header, [SolutionHeader::default]
/// applies: GPST calendar datetimes and geodetic coordinates
/// in decimal degrees.
#[derive(Default, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolutionHeader {
    /// [TimeSystem] of all epochs
    pub time_system: TimeSystem,
    /// Coordinates representation
    pub coordinates: CoordinateSystem,
    /// Epoch format, as identified on the first data line
    pub time_format: TimeFormat,
    /// Reference (base station) position, if described
    pub ref_position: Option<GeodeticPosition>,
    /// Header comments, stored as is
    pub comments: Vec<String>,
}

pub(crate) fn is_comment(line: &str) -> bool {
    line.starts_with('%') || line.starts_with('#')
}

/*
 * Column header line: first token is the time system,
 * then column labels including "Q" and "ns"
 */
pub(crate) fn is_column_header(line: &str) -> bool {
    if !line.starts_with('%') {
        return false;
    }
    let mut has_q = false;
    let mut has_ns = false;
    for item in line[1..].split_ascii_whitespace() {
        match item {
            "Q" => has_q = true,
            "ns" => has_ns = true,
            _ => {},
        }
    }
    has_q && has_ns
}

pub(crate) fn is_ref_position(line: &str) -> bool {
    line.starts_with('%') && line[1..].trim_start().starts_with("ref pos")
}

/*
 * Identifies time system and coordinates from column labels
 */
pub(crate) fn parse_column_header(
    line: &str,
) -> Result<(TimeSystem, CoordinateSystem), ParsingError> {
    let mut items = line[1..].split_ascii_whitespace();
    let time_system = items
        .next()
        .ok_or(ParsingError::UnknownTimeSystem(line.to_string()))?
        .parse::<TimeSystem>()?;

    let labels = items.collect::<Vec<_>>();
    let coordinates = if labels.iter().any(|l| l.starts_with("latitude(d'")) {
        CoordinateSystem::GeodeticDms
    } else if labels.iter().any(|l| l.starts_with("latitude(deg)")) {
        CoordinateSystem::Geodetic
    } else if labels.iter().any(|l| l.starts_with("x-ecef")) {
        CoordinateSystem::Ecef
    } else if labels.iter().any(|l| l.starts_with("e-baseline")) {
        CoordinateSystem::Enu
    } else {
        let position_labels = labels
            .iter()
            .take_while(|l| **l != "Q")
            .copied()
            .collect::<Vec<_>>()
            .join(" ");
        return Err(ParsingError::UnknownCoordinates(position_labels));
    };
    Ok((time_system, coordinates))
}

/*
 * "% ref pos   :  35.123456789  139.123456789   50.1234"
 */
pub(crate) fn parse_ref_position(line: &str) -> Result<GeodeticPosition, ParsingError> {
    let content = line
        .split_once(':')
        .map(|(_, content)| content)
        .ok_or(ParsingError::ReferencePosition(line.to_string()))?;

    let values = content
        .split_ascii_whitespace()
        .map(|item| item.parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .or(Err(ParsingError::ReferencePosition(content.trim().to_string())))?;

    if values.len() != 3 || !(-90.0..=90.0).contains(&values[0]) {
        return Err(ParsingError::ReferencePosition(content.trim().to_string()));
    }
    Ok(GeodeticPosition::new(values[0], values[1], values[2]))
}
