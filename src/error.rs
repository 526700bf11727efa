use thiserror::Error;

use crate::converter::ConversionStatus;

/// Errors that may rise when parsing a single line of a solution file
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParsingError {
    #[error("expecting {expected} fields, got {found}")]
    ColumnCount { expected: String, found: usize },
    #[error("failed to parse date from \"{0}\"")]
    Date(String),
    #[error("failed to parse time of day from \"{0}\"")]
    TimeOfDay(String),
    #[error("failed to parse gps week from \"{0}\"")]
    Week(String),
    #[error("failed to parse time of week from \"{0}\"")]
    TimeOfWeek(String),
    #[error("invalid calendar datetime")]
    InvalidDatetime,
    #[error("failed to parse coordinates from \"{0}\"")]
    Coordinates(String),
    #[error("latitude {0} is out of range")]
    LatitudeRange(f64),
    #[error("invalid quality flag \"{0}\"")]
    Quality(String),
    #[error("failed to parse number of satellites from \"{0}\"")]
    NbSat(String),
    #[error("failed to parse standard deviation from \"{0}\"")]
    StdDev(String),
    #[error("failed to parse differential age from \"{0}\"")]
    Age(String),
    #[error("failed to parse ratio from \"{0}\"")]
    Ratio(String),
    #[error("unknown time system \"{0}\"")]
    UnknownTimeSystem(String),
    #[error("unknown coordinates representation \"{0}\"")]
    UnknownCoordinates(String),
    #[error("malformed reference position \"{0}\"")]
    ReferencePosition(String),
    #[error("baseline solutions require a reference position")]
    MissingReferencePosition,
    #[error("line is not valid utf-8 text")]
    Encoding,
    #[error("unknown time format \"{0}\"")]
    UnknownTimeFormat(String),
    #[error("invalid offset \"{0}\", expecting \"north,east,up\"")]
    Offset(String),
    #[error("unknown color \"{0}\"")]
    Color(String),
    #[error("unknown altitude mode \"{0}\"")]
    AltitudeMode(String),
    #[error("unknown output format \"{0}\"")]
    Format(String),
}

/// Library errors. Each of them is classified
/// by [Error::status], which is the only information
/// the caller needs to report the outcome of a conversion.
#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to read solution file")]
    Io(#[source] std::io::Error),
    #[error("line {line}: {error} (\"{content}\")")]
    Parsing {
        line: usize,
        content: String,
        #[source]
        error: ParsingError,
    },
    #[error("no solutions to convert")]
    NoData,
    #[error("failed to write output file")]
    Write(#[source] std::io::Error),
    #[error("failed to generate kml content")]
    Kml(#[from] ::kml::Error),
    #[error("failed to generate gpx content")]
    Gpx(#[from] ::gpx::errors::GpxError),
    #[error("failed to express gpx timestamp")]
    Time(#[from] ::time::error::ComponentRange),
    #[error("mean sea level altitude requires a geoid model")]
    MissingGeoid,
    #[error("geoid model does not cover ({0:.6}, {1:.6})")]
    GeoidCoverage(f64, f64),
    #[error("malformed geoid model: {0}")]
    GeoidModel(String),
    #[error("conversion cancelled")]
    Cancelled,
}

impl Error {
    /// Classifies this error into the [ConversionStatus] taxonomy
    pub fn status(&self) -> ConversionStatus {
        match self {
            Self::Io(_) => ConversionStatus::ReadError,
            Self::Parsing { .. } => ConversionStatus::FormatError,
            Self::NoData => ConversionStatus::NoDataError,
            Self::Write(_) | Self::Kml(_) | Self::Gpx(_) | Self::Time(_) => {
                ConversionStatus::WriteError
            },
            Self::MissingGeoid | Self::GeoidCoverage(..) | Self::GeoidModel(_) => {
                ConversionStatus::ConfigError
            },
            Self::Cancelled => ConversionStatus::Cancelled,
        }
    }
}
