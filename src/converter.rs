//! Conversion pipeline: parsing, filtering, styling and emission
use log::{error, info};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use tempfile::NamedTempFile;

use crate::{
    emitter::{Emitter, SharedGeoid},
    filter::FilterConfig,
    gpx::{GpxAnnotation, GpxEmitter, QualityAnnotation},
    kml::KmlEmitter,
    solution::Solutions,
    style::{AltitudeMode, QualityPalette, StyleConfig},
    Error, ParsingError,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Output format
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Format {
    #[default]
    Kml,
    Gpx,
}

impl Format {
    /// Identifies the [Format] from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        extension.parse::<Self>().ok()
    }
    /// Returns the usual file extension
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Kml => "kml",
            Self::Gpx => "gpx",
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Kml => f.write_str("KML"),
            Self::Gpx => f.write_str("GPX"),
        }
    }
}

impl std::str::FromStr for Format {
    type Err = ParsingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "kml" => Ok(Self::Kml),
            "gpx" => Ok(Self::Gpx),
            _ => Err(ParsingError::Format(s.to_string())),
        }
    }
}

/// Conversion outcome, as reported to the caller
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ConversionStatus {
    Success,
    /// Input file could not be read
    ReadError,
    /// Input file is not a valid solution file
    FormatError,
    /// No solutions to convert, either in the file or after filtering
    NoDataError,
    /// Output file could not be written
    WriteError,
    /// Invalid conversion setup
    ConfigError,
    /// Conversion was cancelled by the caller
    Cancelled,
}

impl ConversionStatus {
    /// Returns the status code: 0 on success, negative on failure
    pub fn code(&self) -> i32 {
        match self {
            Self::Success => 0,
            Self::ReadError => -1,
            Self::FormatError => -2,
            Self::NoDataError => -3,
            Self::WriteError => -4,
            Self::ConfigError => -5,
            Self::Cancelled => -6,
        }
    }
    pub fn is_success(&self) -> bool {
        *self == Self::Success
    }
}

impl<T> From<&Result<T, Error>> for ConversionStatus {
    fn from(result: &Result<T, Error>) -> Self {
        match result {
            Ok(_) => Self::Success,
            Err(e) => e.status(),
        }
    }
}

impl std::fmt::Display for ConversionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Success => f.write_str("success"),
            Self::ReadError => f.write_str("read error"),
            Self::FormatError => f.write_str("format error"),
            Self::NoDataError => f.write_str("no data"),
            Self::WriteError => f.write_str("write error"),
            Self::ConfigError => f.write_str("configuration error"),
            Self::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// Conversion [Stage]s, in order. No stage is ever retried.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
pub enum Stage {
    #[default]
    Idle,
    Parsing,
    Filtering,
    Emitting,
    Done,
    Failed(ConversionStatus),
}

/// Successful conversion summary
#[derive(Clone, Debug, PartialEq)]
pub struct ConversionReport {
    /// Output [Format]
    pub format: Format,
    /// Generated file
    pub output: PathBuf,
    /// Number of solutions in the input file
    pub parsed: usize,
    /// Number of solutions that were emitted
    pub retained: usize,
}

/// [Converter] runs one conversion at a time.
/// It may be reused, each conversion starts from [Stage::Idle].
#[derive(Clone)]
pub struct Converter {
    format: Format,
    filter: FilterConfig,
    style: StyleConfig,
    palette: QualityPalette,
    geoid: Option<SharedGeoid>,
    annotation: Arc<dyn GpxAnnotation + Send + Sync>,
    cancel: Option<Arc<AtomicBool>>,
    stage: Stage,
}

impl Converter {
    /// Builds a [Converter] with default filter and style
    pub fn new(format: Format) -> Self {
        Self {
            format,
            filter: FilterConfig::default(),
            style: StyleConfig::default(),
            palette: QualityPalette::default(),
            geoid: None,
            annotation: Arc::new(QualityAnnotation),
            cancel: None,
            stage: Stage::default(),
        }
    }
    /// Copies and returns [Self] with given [FilterConfig]
    pub fn with_filter(&self, filter: FilterConfig) -> Self {
        let mut s = self.clone();
        s.filter = filter;
        s
    }
    /// Copies and returns [Self] with given [StyleConfig]
    pub fn with_style(&self, style: StyleConfig) -> Self {
        let mut s = self.clone();
        s.style = style;
        s
    }
    /// Copies and returns [Self] with a custom [QualityPalette]
    pub fn with_palette(&self, palette: QualityPalette) -> Self {
        let mut s = self.clone();
        s.palette = palette;
        s
    }
    /// Copies and returns [Self] with a geoid model
    pub fn with_geoid(&self, geoid: SharedGeoid) -> Self {
        let mut s = self.clone();
        s.geoid = Some(geoid);
        s
    }
    /// Copies and returns [Self] with a custom [GpxAnnotation]
    pub fn with_gpx_annotation(&self, annotation: Arc<dyn GpxAnnotation + Send + Sync>) -> Self {
        let mut s = self.clone();
        s.annotation = annotation;
        s
    }
    /// Copies and returns [Self] with a cancellation flag,
    /// checked prior each stage.
    pub fn with_cancellation(&self, cancel: Arc<AtomicBool>) -> Self {
        let mut s = self.clone();
        s.cancel = Some(cancel);
        s
    }
    /// Returns current [Stage]
    pub fn stage(&self) -> Stage {
        self.stage
    }
    fn enter(&mut self, stage: Stage) -> Result<(), Error> {
        if let Some(cancel) = &self.cancel {
            if cancel.load(Ordering::Relaxed) {
                return Err(Error::Cancelled);
            }
        }
        info!("{:?}", stage);
        self.stage = stage;
        Ok(())
    }
    fn emitter(&self) -> Box<dyn Emitter> {
        match self.format {
            Format::Kml => {
                let mut emitter = KmlEmitter::new().with_palette(self.palette);
                if let Some(geoid) = &self.geoid {
                    emitter = emitter.with_geoid(geoid.clone());
                }
                Box::new(emitter)
            },
            Format::Gpx => {
                let mut emitter = GpxEmitter::new().with_annotation(self.annotation.clone());
                if let Some(geoid) = &self.geoid {
                    emitter = emitter.with_geoid(geoid.clone());
                }
                Box::new(emitter)
            },
        }
    }
    /// Converts `input` solution file to `output` file.
    /// The output file only exists if the conversion succeeded.
    pub fn convert<P: AsRef<Path>, Q: AsRef<Path>>(
        &mut self,
        input: P,
        output: Q,
    ) -> Result<ConversionReport, Error> {
        self.stage = Stage::Idle;
        let result = self.run(input.as_ref(), output.as_ref());
        match &result {
            Ok(report) => {
                self.stage = Stage::Done;
                info!(
                    "{} generated: {} solutions out of {}",
                    report.output.display(),
                    report.retained,
                    report.parsed
                );
            },
            Err(e) => {
                self.stage = Stage::Failed(e.status());
                error!("conversion failed: {}", e);
            },
        }
        result
    }
    fn run(&mut self, input: &Path, output: &Path) -> Result<ConversionReport, Error> {
        if self.style.altitude == AltitudeMode::MeanSeaLevel && self.geoid.is_none() {
            return Err(Error::MissingGeoid);
        }

        self.enter(Stage::Parsing)?;
        let solutions = Solutions::from_path(input)?;

        self.enter(Stage::Filtering)?;
        let records = self.filter.apply(solutions.records());
        if records.is_empty() {
            return Err(Error::NoData);
        }

        self.enter(Stage::Emitting)?;
        let mut buf = Vec::<u8>::new();
        self.emitter().emit(&records, &self.style, &mut buf)?;
        write_file(output, &buf)?;

        Ok(ConversionReport {
            format: self.format,
            output: output.to_path_buf(),
            parsed: solutions.len(),
            retained: records.len(),
        })
    }
}

/// Writes the whole content into a temporary file of the output
/// directory, which is only renamed to `path` once complete.
/// Any pre-existing `path` is left untouched on failure.
fn write_file(path: &Path, content: &[u8]) -> Result<(), Error> {
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut fd = NamedTempFile::new_in(directory).map_err(Error::Write)?;
    fd.write_all(content).map_err(Error::Write)?;
    fd.flush().map_err(Error::Write)?;
    fd.persist(path).map_err(|e| Error::Write(e.error))?;
    Ok(())
}

/// Converts `input` solution file to `output`, in given [Format].
/// Use [ConversionStatus::from] to obtain the status code.
pub fn convert<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    filter: &FilterConfig,
    style: &StyleConfig,
    format: Format,
) -> Result<ConversionReport, Error> {
    Converter::new(format)
        .with_filter(*filter)
        .with_style(*style)
        .convert(input, output)
}

#[cfg(test)]
mod test {
    use super::*;
    use std::str::FromStr;
    #[test]
    fn status_codes() {
        assert_eq!(ConversionStatus::Success.code(), 0);
        assert_eq!(ConversionStatus::ReadError.code(), -1);
        assert_eq!(ConversionStatus::FormatError.code(), -2);
        assert_eq!(ConversionStatus::NoDataError.code(), -3);
        assert_eq!(ConversionStatus::WriteError.code(), -4);
        assert_eq!(ConversionStatus::ConfigError.code(), -5);
        assert_eq!(ConversionStatus::Cancelled.code(), -6);
    }
    #[test]
    fn status_from_result() {
        let ok: Result<(), Error> = Ok(());
        assert_eq!(ConversionStatus::from(&ok), ConversionStatus::Success);
        let nodata: Result<(), Error> = Err(Error::NoData);
        assert_eq!(ConversionStatus::from(&nodata), ConversionStatus::NoDataError);
        let geoid: Result<(), Error> = Err(Error::MissingGeoid);
        assert_eq!(ConversionStatus::from(&geoid), ConversionStatus::ConfigError);
    }
    #[test]
    fn formats() {
        assert_eq!(Format::from_str("GPX"), Ok(Format::Gpx));
        assert!(Format::from_str("kmz").is_err());
        assert_eq!(Format::from_path(Path::new("/tmp/a.kml")), Some(Format::Kml));
        assert_eq!(Format::from_path(Path::new("/tmp/a.gpx")), Some(Format::Gpx));
        assert_eq!(Format::from_path(Path::new("/tmp/a")), None);
        assert_eq!(Format::Gpx.extension(), "gpx");
    }
}
