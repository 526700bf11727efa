//! Solution records and solution files
use hifitime::Epoch;
use log::{debug, error};
use std::io::{BufRead, ErrorKind};
use std::path::Path;

use crate::{
    header::{
        is_column_header, is_comment, is_ref_position, parse_column_header, parse_ref_position,
        SolutionHeader,
    },
    parsing::parse_record,
    position::GeodeticPosition,
    quality::Quality,
    reader::BufferedReader,
    Error, ParsingError,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Solution uncertainty, in meters. Components are expressed in the
/// same frame as the solution file (north/east/up, or x/y/z for ECEF files).
#[derive(Default, Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StdDev {
    pub sdn: f64,
    pub sde: f64,
    pub sdu: f64,
    /// Signed square root of the north/east covariance
    pub sdne: Option<f64>,
    /// Signed square root of the east/up covariance
    pub sdeu: Option<f64>,
    /// Signed square root of the up/north covariance
    pub sdun: Option<f64>,
}

impl StdDev {
    pub fn new(sdn: f64, sde: f64, sdu: f64) -> Self {
        Self {
            sdn,
            sde,
            sdu,
            sdne: None,
            sdeu: None,
            sdun: None,
        }
    }
    /// Copies and returns [Self] with given correlation terms
    pub fn with_correlations(&self, sdne: f64, sdeu: f64, sdun: f64) -> Self {
        let mut s = *self;
        s.sdne = Some(sdne);
        s.sdeu = Some(sdeu);
        s.sdun = Some(sdun);
        s
    }
}

/// [SolutionRecord] is one timestamped position fix
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SolutionRecord {
    /// Sampling [Epoch], always expressed in GPST
    pub epoch: Epoch,
    /// Position of the fix
    pub position: GeodeticPosition,
    /// Solution [Quality]
    pub quality: Quality,
    /// Number of satellites used in the solution
    pub nb_sat: Option<u16>,
    /// Solution uncertainty
    pub std_dev: Option<StdDev>,
    /// Age of differential corrections, in seconds
    pub age_s: Option<f64>,
    /// Ambiguity validation ratio
    pub ratio: Option<f64>,
}

impl SolutionRecord {
    /// Builds a new [SolutionRecord], all optional fields are unknown
    pub fn new(epoch: Epoch, position: GeodeticPosition, quality: Quality) -> Self {
        Self {
            epoch,
            position,
            quality,
            nb_sat: None,
            std_dev: None,
            age_s: None,
            ratio: None,
        }
    }
    /// Copies and returns [Self] with given number of satellites
    pub fn with_nb_sat(&self, nb_sat: u16) -> Self {
        let mut s = self.clone();
        s.nb_sat = Some(nb_sat);
        s
    }
    /// Copies and returns [Self] with given uncertainty
    pub fn with_std_dev(&self, std_dev: StdDev) -> Self {
        let mut s = self.clone();
        s.std_dev = Some(std_dev);
        s
    }
    /// Copies and returns [Self] with given differential age
    pub fn with_age(&self, age_s: f64) -> Self {
        let mut s = self.clone();
        s.age_s = Some(age_s);
        s
    }
    /// Copies and returns [Self] with given ratio
    pub fn with_ratio(&self, ratio: f64) -> Self {
        let mut s = self.clone();
        s.ratio = Some(ratio);
        s
    }
    /// Copies and returns [Self] with given position
    pub fn with_position(&self, position: GeodeticPosition) -> Self {
        let mut s = self.clone();
        s.position = position;
        s
    }
}

/// [Solutions] is the content of a solution file:
/// its [SolutionHeader] and the [SolutionRecord]s, in file order.
/// Content cannot be modified once parsed.
#[derive(Default, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Solutions {
    header: SolutionHeader,
    records: Vec<SolutionRecord>,
}

impl Solutions {
    /// Parses given solution file, with possible seamless
    /// .gz decompression, if compiled with the "flate2" feature.
    /// Any malformed data line aborts the whole file.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let reader = BufferedReader::new(path).map_err(Error::Io)?;
        Self::from_reader(reader)
    }
    /// See [Self::from_path]
    pub fn from_file(path: &str) -> Result<Self, Error> {
        Self::from_path(Path::new(path))
    }
    /// Parses solutions from any buffered stream.
    /// A stream without data lines is not an error,
    /// it results in empty [Solutions].
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut header = SolutionHeader::default();
        let mut records = Vec::<SolutionRecord>::new();

        for (index, line) in reader.lines().enumerate() {
            let line = match line {
                Ok(line) => line,
                Err(e) if e.kind() == ErrorKind::InvalidData => {
                    error!("line {}: {}", index + 1, ParsingError::Encoding);
                    return Err(Error::Parsing {
                        line: index + 1,
                        content: String::new(),
                        error: ParsingError::Encoding,
                    });
                },
                Err(e) => return Err(Error::Io(e)),
            };
            let content = line.trim();
            if content.is_empty() {
                continue;
            }
            let wrap = |error| Error::Parsing {
                line: index + 1,
                content: content.to_string(),
                error,
            };
            if is_comment(content) {
                if is_column_header(content) {
                    let (time_system, coordinates) = parse_column_header(content).map_err(wrap)?;
                    debug!(
                        "line {}: {} solutions, {:?} coordinates",
                        index + 1,
                        time_system,
                        coordinates
                    );
                    header.time_system = time_system;
                    header.coordinates = coordinates;
                } else if is_ref_position(content) {
                    let ref_position = parse_ref_position(content).map_err(wrap)?;
                    debug!("line {}: reference position {}", index + 1, ref_position);
                    header.ref_position = Some(ref_position);
                } else {
                    let comment = content[1..].trim();
                    if !comment.is_empty() {
                        header.comments.push(comment.to_string());
                    }
                }
                continue;
            }
            match parse_record(content, &header) {
                Ok((record, time_format)) => {
                    if records.is_empty() {
                        header.time_format = time_format;
                    }
                    records.push(record);
                },
                Err(e) => {
                    error!("line {}: {}", index + 1, e);
                    return Err(wrap(e));
                },
            }
        }
        debug!("parsed {} solutions", records.len());
        Ok(Self { header, records })
    }
    /// Returns the [SolutionHeader]
    pub fn header(&self) -> &SolutionHeader {
        &self.header
    }
    /// Returns all [SolutionRecord]s, in file order
    pub fn records(&self) -> &[SolutionRecord] {
        &self.records
    }
    /// Returns a [SolutionRecord] iterator, in file order
    pub fn iter(&self) -> std::slice::Iter<'_, SolutionRecord> {
        self.records.iter()
    }
    /// Returns number of [SolutionRecord]s
    pub fn len(&self) -> usize {
        self.records.len()
    }
    /// Returns true if no [SolutionRecord] was parsed
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
    /// Returns first [Epoch] in file order
    pub fn first_epoch(&self) -> Option<Epoch> {
        self.records.first().map(|r| r.epoch)
    }
    /// Returns last [Epoch] in file order
    pub fn last_epoch(&self) -> Option<Epoch> {
        self.records.last().map(|r| r.epoch)
    }
}

impl<'a> IntoIterator for &'a Solutions {
    type Item = &'a SolutionRecord;
    type IntoIter = std::slice::Iter<'a, SolutionRecord>;
    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
