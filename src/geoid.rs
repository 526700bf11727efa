//! Geoid models, for mean sea level altitudes
use log::debug;
use std::io::BufRead;
use std::path::Path;

use crate::{reader::BufferedReader, Error};

/// Grid value marking a missing undulation
const NO_DATA: f64 = 999.0;

/// A [GeoidModel] provides the geoid undulation N, in meters,
/// so that mean sea level altitude = ellipsoidal height - N.
pub trait GeoidModel {
    /// Returns the undulation at given coordinates (decimal degrees),
    /// or None if the model does not cover this location.
    fn undulation(&self, latitude_ddeg: f64, longitude_ddeg: f64) -> Option<f64>;

    /// Converts an ellipsoidal height to mean sea level
    fn msl_altitude(
        &self,
        latitude_ddeg: f64,
        longitude_ddeg: f64,
        altitude_m: f64,
    ) -> Result<f64, Error> {
        let n = self
            .undulation(latitude_ddeg, longitude_ddeg)
            .ok_or(Error::GeoidCoverage(latitude_ddeg, longitude_ddeg))?;
        Ok(altitude_m - n)
    }
}

/// Regular latitude/longitude undulation grid, interpolated bilinearly.
/// Rows are ordered from south to north, each row from west to east.
#[derive(Clone, Debug, PartialEq)]
pub struct GeoidGrid {
    /// South-west corner latitude (ddeg)
    lat0: f64,
    /// South-west corner longitude (ddeg)
    lon0: f64,
    /// Latitude step (ddeg)
    dlat: f64,
    /// Longitude step (ddeg)
    dlon: f64,
    nlat: usize,
    nlon: usize,
    /// Undulations (m), row major
    values: Vec<f64>,
}

impl GeoidGrid {
    /// Builds a [GeoidGrid] from its south-west corner, steps and values.
    pub fn new(
        lat0: f64,
        lon0: f64,
        dlat: f64,
        dlon: f64,
        nlat: usize,
        nlon: usize,
        values: Vec<f64>,
    ) -> Result<Self, Error> {
        if nlat < 2 || nlon < 2 {
            return Err(Error::GeoidModel(format!(
                "grid is too small ({}x{})",
                nlat, nlon
            )));
        }
        if dlat <= 0.0 || dlon <= 0.0 {
            return Err(Error::GeoidModel(format!(
                "invalid grid steps ({}, {})",
                dlat, dlon
            )));
        }
        let size = nlat.checked_mul(nlon).ok_or(Error::GeoidModel(format!(
            "grid is too large ({}x{})",
            nlat, nlon
        )))?;
        if values.len() != size {
            return Err(Error::GeoidModel(format!(
                "expecting {} values, got {}",
                size,
                values.len()
            )));
        }
        Ok(Self {
            lat0,
            lon0,
            dlat,
            dlon,
            nlat,
            nlon,
            values,
        })
    }
    /// Parses a GSI ascii grid: a header line
    /// "glamn glomn dgla dglo nla nlo ikind vern"
    /// followed by nla x nlo undulations, 999.0000 meaning no data.
    pub fn from_gsi_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut lines = reader.lines();
        let header = loop {
            match lines.next() {
                Some(line) => {
                    let line = line.map_err(|e| Error::GeoidModel(e.to_string()))?;
                    if !line.trim().is_empty() {
                        break line;
                    }
                },
                None => return Err(Error::GeoidModel("missing header".to_string())),
            }
        };
        let items = header.split_ascii_whitespace().collect::<Vec<_>>();
        if items.len() < 6 {
            return Err(Error::GeoidModel(format!("invalid header \"{}\"", header)));
        }
        let float = |item: &str| {
            item.parse::<f64>()
                .or(Err(Error::GeoidModel(format!("invalid header \"{}\"", header))))
        };
        let integer = |item: &str| {
            item.parse::<usize>()
                .or(Err(Error::GeoidModel(format!("invalid header \"{}\"", header))))
        };
        let (lat0, lon0) = (float(items[0])?, float(items[1])?);
        let (dlat, dlon) = (float(items[2])?, float(items[3])?);
        let (nlat, nlon) = (integer(items[4])?, integer(items[5])?);

        // dimensions are only trusted once all values are counted
        let mut values = Vec::new();
        for line in lines {
            let line = line.map_err(|e| Error::GeoidModel(e.to_string()))?;
            for item in line.split_ascii_whitespace() {
                let value = item
                    .parse::<f64>()
                    .or(Err(Error::GeoidModel(format!("invalid value \"{}\"", item))))?;
                values.push(value);
            }
        }
        debug!(
            "geoid grid: {}x{} from ({}, {}), steps ({}, {})",
            nlat, nlon, lat0, lon0, dlat, dlon
        );
        Self::new(lat0, lon0, dlat, dlon, nlat, nlon, values)
    }
    /// Parses a GSI ascii grid file, see [Self::from_gsi_reader].
    /// An unreadable file is a [Error::GeoidModel] error.
    pub fn from_gsi_file(path: &Path) -> Result<Self, Error> {
        let reader = BufferedReader::new(path)
            .map_err(|e| Error::GeoidModel(format!("{}: {}", path.display(), e)))?;
        Self::from_gsi_reader(reader)
    }
    fn value(&self, i: usize, j: usize) -> Option<f64> {
        let value = self.values[i * self.nlon + j];
        if (value - NO_DATA).abs() < 1.0E-3 {
            None
        } else {
            Some(value)
        }
    }
}

impl GeoidModel for GeoidGrid {
    fn undulation(&self, latitude_ddeg: f64, longitude_ddeg: f64) -> Option<f64> {
        let y = (latitude_ddeg - self.lat0) / self.dlat;
        let x = (longitude_ddeg - self.lon0) / self.dlon;
        let (ymax, xmax) = ((self.nlat - 1) as f64, (self.nlon - 1) as f64);
        if !(0.0..=ymax).contains(&y) || !(0.0..=xmax).contains(&x) {
            return None;
        }
        // stay within the last cell on the north and east edges
        let i = (y.floor() as usize).min(self.nlat - 2);
        let j = (x.floor() as usize).min(self.nlon - 2);
        let (a, b) = (y - i as f64, x - j as f64);

        let mut n = 0.0;
        for (di, dj, weight) in [
            (0, 0, (1.0 - a) * (1.0 - b)),
            (0, 1, (1.0 - a) * b),
            (1, 0, a * (1.0 - b)),
            (1, 1, a * b),
        ] {
            if weight > 0.0 {
                n += weight * self.value(i + di, j + dj)?;
            }
        }
        Some(n)
    }
}
