//! Solution records filtering: time window, quality mask,
//! decimation and local offset.
use hifitime::{Duration, Epoch};
use log::debug;

use crate::{quality::Quality, solution::SolutionRecord, ParsingError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Local displacement, in meters, in the tangent plane of each record
#[derive(Default, Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EnuOffset {
    pub north: f64,
    pub east: f64,
    pub up: f64,
}

impl EnuOffset {
    pub fn new(north: f64, east: f64, up: f64) -> Self {
        Self { north, east, up }
    }
    /// Returns true if this offset does not move anything
    pub fn is_null(&self) -> bool {
        self.north == 0.0 && self.east == 0.0 && self.up == 0.0
    }
}

impl std::str::FromStr for EnuOffset {
    type Err = ParsingError;
    /// Parses "north,east,up" (meters)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(',')
            .map(|item| item.trim().parse::<f64>())
            .collect::<Result<Vec<_>, _>>()
            .or(Err(ParsingError::Offset(s.to_string())))?;
        if values.len() != 3 || values.iter().any(|v| !v.is_finite()) {
            return Err(ParsingError::Offset(s.to_string()));
        }
        Ok(Self::new(values[0], values[1], values[2]))
    }
}

/// [FilterConfig] describes which records are retained
/// and how they are moved, prior to any emission.
/// Default configuration retains everything untouched.
#[derive(Default, Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FilterConfig {
    /// Records prior this instant are dropped
    pub start: Option<Epoch>,
    /// Records after this instant are dropped
    pub end: Option<Epoch>,
    /// Minimal spacing between retained records.
    /// Null or negative interval disables decimation.
    pub interval: Option<Duration>,
    /// Retain this solution [Quality] only
    pub quality: Option<Quality>,
    /// Local displacement applied to every retained record
    pub offset: Option<EnuOffset>,
}

impl FilterConfig {
    /// Copies and returns [Self] with given time window
    pub fn with_time_window(&self, start: Option<Epoch>, end: Option<Epoch>) -> Self {
        let mut s = *self;
        s.start = start;
        s.end = end;
        s
    }
    /// Copies and returns [Self] with given decimation interval
    pub fn with_interval(&self, interval: Duration) -> Self {
        let mut s = *self;
        s.interval = Some(interval);
        s
    }
    /// Copies and returns [Self] with given quality mask
    pub fn with_quality(&self, quality: Quality) -> Self {
        let mut s = *self;
        s.quality = Some(quality);
        s
    }
    /// Copies and returns [Self] with given local offset
    pub fn with_offset(&self, offset: EnuOffset) -> Self {
        let mut s = *self;
        s.offset = Some(offset);
        s
    }
    /// Returns true if `epoch` lies within the (inclusive) time window
    pub fn contains(&self, epoch: Epoch) -> bool {
        let after_start = self.start.map(|start| epoch >= start).unwrap_or(true);
        let before_end = self.end.map(|end| epoch <= end).unwrap_or(true);
        after_start && before_end
    }
    /// Applies all filters, in this order: time window, quality mask,
    /// decimation and offset. Input order is preserved.
    /// An empty result is not an error at this stage.
    pub fn apply(&self, records: &[SolutionRecord]) -> Vec<SolutionRecord> {
        let mut retained = self.time_window(records);
        self.quality_mask(&mut retained);
        self.decimate(&mut retained);
        self.offset(&mut retained);
        debug!(
            "filtering: {} records retained out of {}",
            retained.len(),
            records.len()
        );
        retained
    }
    /// Retains records within the time window
    pub fn time_window(&self, records: &[SolutionRecord]) -> Vec<SolutionRecord> {
        records
            .iter()
            .filter(|r| self.contains(r.epoch))
            .cloned()
            .collect()
    }
    /// Retains records of the selected [Quality], if any
    pub fn quality_mask(&self, records: &mut Vec<SolutionRecord>) {
        if let Some(quality) = self.quality {
            records.retain(|r| r.quality == quality);
        }
    }
    /// Decimates records, in file order. First record is always retained.
    pub fn decimate(&self, records: &mut Vec<SolutionRecord>) {
        let interval = match self.interval {
            Some(interval) if interval > Duration::ZERO => interval,
            _ => return,
        };
        let mut last_retained = Option::<Epoch>::None;
        records.retain(|r| {
            if let Some(last) = last_retained {
                let dt = r.epoch - last;
                if dt >= interval {
                    last_retained = Some(r.epoch);
                    true
                } else {
                    false
                }
            } else {
                last_retained = Some(r.epoch);
                true // always retain 1st record
            }
        });
    }
    /// Moves every record by the local offset, if any
    pub fn offset(&self, records: &mut [SolutionRecord]) {
        let offset = match self.offset {
            Some(offset) if !offset.is_null() => offset,
            _ => return,
        };
        for record in records.iter_mut() {
            record.position = record
                .position
                .displaced(offset.north, offset.east, offset.up);
        }
    }
}
