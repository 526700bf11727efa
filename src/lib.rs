#![doc(html_logo_url = "https://raw.githubusercontent.com/georust/meta/master/logo/logo.png")]
#![cfg_attr(docsrs, feature(doc_cfg))]

/*
 * posconv is part of the Geo-Rust framework.
 * Authors: Guillaume W. Bres <guillaume.bressaix@gmail.com> et al.
 * (cf. https://github.com/georust/rinex/graphs/contributors)
 * This framework is shipped under both Apache-2.0 and MIT License.
 *
 * Documentation: https://github.com/georust/rinex
 */

//! Positioning solution files (.pos) conversion to KML and GPX.
//!
//! A solution file is a text log of already computed position fixes,
//! one per line, with a quality flag. This crate parses such files
//! into [Solutions], applies time span, quality and decimation filters
//! and a local offset ([FilterConfig]), resolves the visual styling
//! ([StyleConfig]) and emits either a KML or a GPX document.
//!
//! ```no_run
//! use posconv::prelude::*;
//!
//! let status = ConversionStatus::from(&convert(
//!     "test_resources/POS/kinematic_llh.pos",
//!     "/tmp/kinematic.kml",
//!     &FilterConfig::default(),
//!     &StyleConfig::default(),
//!     Format::Kml,
//! ));
//! assert_eq!(status, ConversionStatus::Success);
//! ```

pub mod converter;
pub mod emitter;
pub mod filter;
pub mod geoid;
pub mod gpx;
pub mod header;
pub mod kml;
pub mod position;
pub mod quality;
pub mod solution;
pub mod style;
pub mod time;

mod error;
mod parsing;
mod reader;

#[cfg(test)]
mod tests;

pub use error::{Error, ParsingError};
pub use solution::{SolutionRecord, Solutions};

/// Package to include all basic structures
pub mod prelude {
    pub use crate::converter::{
        convert, ConversionReport, ConversionStatus, Converter, Format, Stage,
    };
    pub use crate::emitter::Emitter;
    pub use crate::error::{Error, ParsingError};
    pub use crate::filter::{EnuOffset, FilterConfig};
    pub use crate::geoid::{GeoidGrid, GeoidModel};
    pub use crate::gpx::{GpxAnnotation, GpxEmitter, NoAnnotation, QualityAnnotation};
    pub use crate::header::{CoordinateSystem, SolutionHeader, TimeFormat as InputTimeFormat};
    pub use crate::kml::KmlEmitter;
    pub use crate::position::GeodeticPosition;
    pub use crate::quality::Quality;
    pub use crate::solution::{SolutionRecord, Solutions, StdDev};
    pub use crate::style::{
        AltitudeMode, Color, ColorMode, QualityPalette, ResolvedStyle, StyleConfig,
        StyleResolver,
    };
    pub use crate::time::{DisplaySystem, TimeDisplay, TimeFormat, TimeSystem};

    // pub re-export
    pub use hifitime::{Duration, Epoch, TimeScale};
}
