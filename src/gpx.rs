//! GPX emission
use log::debug;
use std::io::Write;
use std::sync::Arc;

use ::gpx::{Fix, Gpx, GpxVersion, Track, TrackSegment, Waypoint};
use geo_types::Point;

use crate::{
    emitter::{round_ddeg, Altitudes, Emitter, SharedGeoid},
    quality::Quality,
    solution::SolutionRecord,
    style::{AltitudeMode, StyleConfig},
    time::{decompose, TimeSystem},
    Error,
};

/// Default GPX creator and track name
const CREATOR: &str = concat!("posconv ", env!("CARGO_PKG_VERSION"));

/// GPX has no notion of color: [GpxAnnotation] lets the caller
/// decide what solution metadata is attached to each track point.
pub trait GpxAnnotation {
    fn annotate(&self, record: &SolutionRecord, waypoint: &mut Waypoint);
}

/// Attaches nothing
#[derive(Debug, Default, Copy, Clone)]
pub struct NoAnnotation;

impl GpxAnnotation for NoAnnotation {
    fn annotate(&self, _: &SolutionRecord, _: &mut Waypoint) {}
}

/// Describes the solution [Quality] with the standard
/// `fix` and `sat` fields, and the quality label as `type`.
#[derive(Debug, Default, Copy, Clone)]
pub struct QualityAnnotation;

impl GpxAnnotation for QualityAnnotation {
    fn annotate(&self, record: &SolutionRecord, waypoint: &mut Waypoint) {
        waypoint.fix = match record.quality {
            Quality::Fix | Quality::Float | Quality::Single | Quality::Ppp => {
                Some(Fix::ThreeDimensional)
            },
            Quality::Dgps | Quality::Sbas => Some(Fix::DGPS),
            Quality::Unknown => None,
        };
        waypoint.sat = record.nb_sat.map(u64::from);
        waypoint.type_ = Some(record.quality.to_string());
        waypoint.dgps_age = record.age_s;
    }
}

/// Converts an [Epoch] to the UTC [::gpx::Time] representation,
/// rounded to the millisecond.
pub(crate) fn gpx_time(epoch: hifitime::Epoch) -> Result<::gpx::Time, Error> {
    let epoch = epoch.round(hifitime::Duration::from_milliseconds(1.0));
    let (y, m, d, hh, mm, ss, ns) = decompose(epoch, TimeSystem::Utc);
    let date = ::time::Date::from_calendar_date(y, ::time::Month::try_from(m)?, d)?;
    let time = ::time::Time::from_hms_nano(hh, mm, ss, ns)?;
    let datetime = ::time::PrimitiveDateTime::new(date, time).assume_utc();
    Ok(datetime.into())
}

/// [GpxEmitter] generates a single track, made of a single
/// segment, with one point per record. Timestamps are always UTC.
#[derive(Clone)]
pub struct GpxEmitter {
    geoid: Option<SharedGeoid>,
    annotation: Arc<dyn GpxAnnotation + Send + Sync>,
}

impl Default for GpxEmitter {
    fn default() -> Self {
        Self {
            geoid: None,
            annotation: Arc::new(QualityAnnotation),
        }
    }
}

impl GpxEmitter {
    pub fn new() -> Self {
        Self::default()
    }
    /// Copies and returns [Self] with a geoid model,
    /// required by mean sea level altitudes
    pub fn with_geoid(&self, geoid: SharedGeoid) -> Self {
        let mut s = self.clone();
        s.geoid = Some(geoid);
        s
    }
    /// Copies and returns [Self] with a custom [GpxAnnotation]
    pub fn with_annotation(&self, annotation: Arc<dyn GpxAnnotation + Send + Sync>) -> Self {
        let mut s = self.clone();
        s.annotation = annotation;
        s
    }
    /// Builds the [Gpx] structure, without writing anything
    pub fn document(&self, records: &[SolutionRecord], style: &StyleConfig) -> Result<Gpx, Error> {
        let altitudes = Altitudes::new(style.altitude, self.geoid.as_ref())?;

        let mut segment = TrackSegment::new();
        for record in records {
            let mut waypoint = Waypoint::new(Point::new(
                round_ddeg(record.position.longitude_ddeg),
                round_ddeg(record.position.latitude_ddeg),
            ));
            waypoint.elevation = altitudes.altitude(&record.position)?;
            if style.altitude == AltitudeMode::MeanSeaLevel {
                waypoint.geoidheight = altitudes.undulation(&record.position);
            }
            waypoint.time = Some(gpx_time(record.epoch)?);
            self.annotation.annotate(record, &mut waypoint);
            segment.points.push(waypoint);
        }
        debug!("gpx: {} track points", segment.points.len());

        let mut track = Track::new();
        track.name = Some(CREATOR.to_string());
        track.segments.push(segment);

        let mut gpx = Gpx::default();
        gpx.version = GpxVersion::Gpx11;
        gpx.creator = Some(CREATOR.to_string());
        gpx.tracks.push(track);
        Ok(gpx)
    }
}

impl Emitter for GpxEmitter {
    fn emit(
        &self,
        records: &[SolutionRecord],
        style: &StyleConfig,
        writer: &mut dyn Write,
    ) -> Result<(), Error> {
        let gpx = self.document(records, style)?;
        ::gpx::write(&gpx, writer)?;
        Ok(())
    }
}
