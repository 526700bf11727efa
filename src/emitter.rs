//! Output document emission, shared by all output formats
use std::io::Write;
use std::sync::Arc;

use crate::{
    geoid::GeoidModel, position::GeodeticPosition, solution::SolutionRecord,
    style::{AltitudeMode, StyleConfig},
    Error,
};

/// Read only geoid model, shareable between concurrent conversions
pub type SharedGeoid = Arc<dyn GeoidModel + Send + Sync>;

/// [Emitter] serializes already filtered records into one output document
pub trait Emitter {
    /// Emits all records, in order, into `writer`.
    /// Configuration is verified prior writing anything.
    fn emit(
        &self,
        records: &[SolutionRecord],
        style: &StyleConfig,
        writer: &mut dyn Write,
    ) -> Result<(), Error>;
}

/// Rounds decimal degrees to 1E-9 degree
pub(crate) fn round_ddeg(value: f64) -> f64 {
    (value * 1.0E9).round() / 1.0E9
}

/// Rounds meters to 1E-4 m
pub(crate) fn round_m(value: f64) -> f64 {
    (value * 1.0E4).round() / 1.0E4
}

/// Resolves emitted altitudes
#[derive(Clone)]
pub(crate) struct Altitudes<'a> {
    mode: AltitudeMode,
    geoid: Option<&'a SharedGeoid>,
}

impl<'a> Altitudes<'a> {
    /// Mean sea level altitudes require a geoid model
    pub fn new(mode: AltitudeMode, geoid: Option<&'a SharedGeoid>) -> Result<Self, Error> {
        if mode == AltitudeMode::MeanSeaLevel && geoid.is_none() {
            return Err(Error::MissingGeoid);
        }
        Ok(Self { mode, geoid })
    }
    /// Returns the altitude to emit, None when altitude is dropped
    pub fn altitude(&self, position: &GeodeticPosition) -> Result<Option<f64>, Error> {
        match (self.mode, self.geoid) {
            (AltitudeMode::None, _) => Ok(None),
            (AltitudeMode::Ellipsoidal, _) => Ok(Some(round_m(position.altitude_m))),
            (AltitudeMode::MeanSeaLevel, Some(geoid)) => {
                let msl = geoid.msl_altitude(
                    position.latitude_ddeg,
                    position.longitude_ddeg,
                    position.altitude_m,
                )?;
                Ok(Some(round_m(msl)))
            },
            (AltitudeMode::MeanSeaLevel, None) => Err(Error::MissingGeoid),
        }
    }
    /// Returns the geoid undulation at this position, if mean sea level
    /// altitudes are being emitted
    pub fn undulation(&self, position: &GeodeticPosition) -> Option<f64> {
        match (self.mode, self.geoid) {
            (AltitudeMode::MeanSeaLevel, Some(geoid)) => geoid
                .undulation(position.latitude_ddeg, position.longitude_ddeg)
                .map(round_m),
            _ => None,
        }
    }
}
