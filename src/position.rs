//! Geodetic positions and WGS84 conversions
use map_3d::{deg2rad, ecef2geodetic, enu2geodetic, geodetic2ecef, rad2deg, Ellipsoid};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Geodetic position on the WGS84 ellipsoid, which is the canonical
/// representation of all solutions, whatever the input coordinates.
#[derive(Default, Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GeodeticPosition {
    /// Latitude in decimal degrees, within [-90, 90]
    pub latitude_ddeg: f64,
    /// Longitude in decimal degrees, within [-180, 180[
    pub longitude_ddeg: f64,
    /// Ellipsoidal height in meters
    pub altitude_m: f64,
}

/// Wraps any longitude into [-180, 180[
pub(crate) fn normalize_longitude(longitude_ddeg: f64) -> f64 {
    let wrapped = (longitude_ddeg + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped >= 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

impl GeodeticPosition {
    /// Builds [GeodeticPosition] from coordinates in decimal degrees
    /// and ellipsoidal height. Longitude is normalized, latitude is
    /// expected to be valid already.
    pub fn new(latitude_ddeg: f64, longitude_ddeg: f64, altitude_m: f64) -> Self {
        Self {
            latitude_ddeg,
            longitude_ddeg: normalize_longitude(longitude_ddeg),
            altitude_m,
        }
    }
    /// Builds [GeodeticPosition] from ECEF WGS84 coordinates in meters
    pub fn from_ecef(ecef: (f64, f64, f64)) -> Self {
        let (lat, lon, alt) = ecef2geodetic(ecef.0, ecef.1, ecef.2, Ellipsoid::WGS84);
        Self::new(rad2deg(lat), rad2deg(lon), alt)
    }
    /// Builds [GeodeticPosition] from a local (east, north, up) baseline
    /// in meters, expressed in the tangent plane of `reference`.
    pub fn from_enu(enu: (f64, f64, f64), reference: &Self) -> Self {
        let (lat, lon, alt) = enu2geodetic(
            enu.0,
            enu.1,
            enu.2,
            deg2rad(reference.latitude_ddeg),
            deg2rad(reference.longitude_ddeg),
            reference.altitude_m,
            Ellipsoid::WGS84,
        );
        Self::new(rad2deg(lat), rad2deg(lon), alt)
    }
    /// Converts Self to ECEF WGS84 coordinates in meters
    pub fn to_ecef(&self) -> (f64, f64, f64) {
        geodetic2ecef(
            deg2rad(self.latitude_ddeg),
            deg2rad(self.longitude_ddeg),
            self.altitude_m,
            Ellipsoid::WGS84,
        )
    }
    /// Returns a copy of Self displaced by (north, east, up) meters
    /// in the local tangent plane of Self.
    pub fn displaced(&self, north_m: f64, east_m: f64, up_m: f64) -> Self {
        if north_m == 0.0 && east_m == 0.0 && up_m == 0.0 {
            return *self;
        }
        Self::from_enu((east_m, north_m, up_m), self)
    }
    /// Returns true if latitude and longitude are within valid range
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude_ddeg)
            && (-180.0..180.0).contains(&self.longitude_ddeg)
    }
}

impl std::fmt::Display for GeodeticPosition {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "WGS84 ({:.9}°, {:.9}°, {:.4}m)",
            self.latitude_ddeg, self.longitude_ddeg, self.altitude_m
        )
    }
}
