use clap::{value_parser, Arg, ArgAction, ArgMatches, ColorChoice, Command};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use posconv::prelude::{
    AltitudeMode, ColorMode, ConversionStatus, DisplaySystem, Duration, EnuOffset, Epoch,
    FilterConfig, Format, GeoidGrid, Quality, StyleConfig, TimeFormat,
};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid epoch \"{0}\"")]
    Epoch(String),
    #[error("invalid argument: {0}")]
    Argument(#[from] posconv::ParsingError),
    #[error("{0}")]
    Conversion(#[from] posconv::Error),
    #[error("failed to compress output file")]
    Compression(#[source] std::io::Error),
}

impl CliError {
    /// Command line errors are configuration errors
    pub fn status(&self) -> ConversionStatus {
        match self {
            Self::Conversion(e) => e.status(),
            Self::Compression(_) => ConversionStatus::WriteError,
            _ => ConversionStatus::ConfigError,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Cli {
    matches: ArgMatches,
}

impl Cli {
    pub fn new() -> Self {
        Self {
            matches: {
                Command::new("pos2kml")
                    .author("Guillaume W. Bres, <guillaume.bressaix@gmail.com>")
                    .version(env!("CARGO_PKG_VERSION"))
                    .about("Positioning solution files to KML and GPX converter")
                    .long_about("pos2kml converts positioning solution files (.pos)
to KML or GPX tracks. The exit code is the conversion status:
0 on success, -1 read error, -2 format error, -3 no data,
-4 write error, -5 configuration error.")
                    .arg_required_else_help(true)
                    .color(ColorChoice::Always)
                    .arg(
                        Arg::new("input")
                            .short('i')
                            .long("input")
                            .value_name("FILEPATH")
                            .help("Input solution file, possibly gzip compressed")
                            .required(true),
                    )
                    .arg(
                        Arg::new("output")
                            .short('o')
                            .long("output")
                            .value_name("FILEPATH")
                            .help("Output file. Defaults to input file with updated extension"),
                    )
                    .arg(
                        Arg::new("gpx")
                            .long("gpx")
                            .action(ArgAction::SetTrue)
                            .help("Generate GPX instead of KML"),
                    )
                    .arg(
                        Arg::new("gzip")
                            .long("gzip")
                            .action(ArgAction::SetTrue)
                            .help("Compress the generated file (.gz)"),
                    )
                    .next_help_heading("Filtering")
                    .arg(
                        Arg::new("start")
                            .long("start")
                            .value_name("EPOCH")
                            .help("Discard solutions prior this epoch, for example \"2024-03-01T12:00:00 GPST\""),
                    )
                    .arg(
                        Arg::new("end")
                            .long("end")
                            .value_name("EPOCH")
                            .help("Discard solutions after this epoch"),
                    )
                    .arg(
                        Arg::new("interval")
                            .long("interval")
                            .value_name("SECONDS")
                            .value_parser(value_parser!(f64))
                            .help("Minimal interval between two retained solutions"),
                    )
                    .arg(
                        Arg::new("quality")
                            .short('q')
                            .long("quality")
                            .value_name("QUALITY")
                            .help("Only retain this solution quality (code or label)"),
                    )
                    .arg(
                        Arg::new("offset")
                            .long("offset")
                            .value_name("N,E,U")
                            .help("Apply a local north, east, up offset (m) to all positions"),
                    )
                    .next_help_heading("Styling")
                    .arg(
                        Arg::new("track-color")
                            .long("track-color")
                            .value_name("COLOR")
                            .help("Track color: \"off\", \"quality\", a color name or aabbggrr"),
                    )
                    .arg(
                        Arg::new("point-color")
                            .long("point-color")
                            .value_name("COLOR")
                            .help("Point color: \"off\", \"quality\", a color name or aabbggrr"),
                    )
                    .arg(
                        Arg::new("altitude")
                            .short('a')
                            .long("altitude")
                            .value_name("MODE")
                            .help("Altitude: \"none\", \"ellipsoidal\" or \"msl\""),
                    )
                    .arg(
                        Arg::new("geoid")
                            .long("geoid")
                            .value_name("FILEPATH")
                            .help("Geoid grid (GSI ascii format), required by \"msl\" altitudes"),
                    )
                    .arg(
                        Arg::new("time")
                            .short('t')
                            .long("time")
                            .value_name("SYSTEM")
                            .help("Time labels: \"off\", \"gpst\", \"utc\" or \"jst\""),
                    )
                    .arg(
                        Arg::new("time-format")
                            .long("time-format")
                            .value_name("FORMAT")
                            .help("Time labels format: \"iso8601\" or \"calendar\""),
                    )
                    .get_matches()
            },
        }
    }
    /// Returns input file path
    pub fn input(&self) -> PathBuf {
        self.matches
            .get_one::<String>("input")
            .map(PathBuf::from)
            .unwrap_or_default()
    }
    /// Returns output [Format]
    pub fn format(&self) -> Format {
        if self.matches.get_flag("gpx") {
            Format::Gpx
        } else {
            Format::Kml
        }
    }
    /// Returns true if the generated file should be compressed
    pub fn gzip(&self) -> bool {
        self.matches.get_flag("gzip")
    }
    /// Returns output file path
    pub fn output(&self) -> PathBuf {
        match self.matches.get_one::<String>("output") {
            Some(output) => PathBuf::from(output),
            None => default_output(&self.input(), self.format()),
        }
    }
    fn epoch(&self, key: &str) -> Result<Option<Epoch>, CliError> {
        match self.matches.get_one::<String>(key) {
            Some(s) => {
                let epoch = Epoch::from_str(s.trim()).or(Err(CliError::Epoch(s.to_string())))?;
                Ok(Some(epoch))
            },
            None => Ok(None),
        }
    }
    /// Builds the [FilterConfig] from command line options
    pub fn filter(&self) -> Result<FilterConfig, CliError> {
        let mut filter =
            FilterConfig::default().with_time_window(self.epoch("start")?, self.epoch("end")?);
        if let Some(interval) = self.matches.get_one::<f64>("interval") {
            filter = filter.with_interval(Duration::from_seconds(*interval));
        }
        if let Some(quality) = self.matches.get_one::<String>("quality") {
            filter = filter.with_quality(Quality::from_str(quality)?);
        }
        if let Some(offset) = self.matches.get_one::<String>("offset") {
            filter = filter.with_offset(EnuOffset::from_str(offset)?);
        }
        Ok(filter)
    }
    /// Builds the [StyleConfig] from command line options
    pub fn style(&self) -> Result<StyleConfig, CliError> {
        let mut style = StyleConfig::default();
        if let Some(track) = self.matches.get_one::<String>("track-color") {
            style = style.with_track(ColorMode::from_str(track)?);
        }
        if let Some(points) = self.matches.get_one::<String>("point-color") {
            style = style.with_points(ColorMode::from_str(points)?);
        }
        if let Some(altitude) = self.matches.get_one::<String>("altitude") {
            style = style.with_altitude(AltitudeMode::from_str(altitude)?);
        }
        let mut time = style.time;
        if let Some(system) = self.matches.get_one::<String>("time") {
            time.system = DisplaySystem::from_str(system)?;
        }
        if let Some(format) = self.matches.get_one::<String>("time-format") {
            time.format = TimeFormat::from_str(format)?;
        }
        Ok(style.with_time(time))
    }
    /// Loads the geoid grid, if any
    pub fn geoid(&self) -> Result<Option<GeoidGrid>, CliError> {
        match self.matches.get_one::<String>("geoid") {
            Some(path) => Ok(Some(load_geoid(Path::new(path))?)),
            None => Ok(None),
        }
    }
}

/// Geoid grid loading failures are configuration errors,
/// not solution file read errors.
fn load_geoid(path: &Path) -> Result<GeoidGrid, CliError> {
    Ok(GeoidGrid::from_gsi_file(path)?)
}

/// Replaces the input extension, ignoring a possible .gz suffix
fn default_output(input: &Path, format: Format) -> PathBuf {
    let stem = match input.extension().and_then(|ext| ext.to_str()) {
        Some("gz") => input.with_extension(""),
        _ => input.to_path_buf(),
    };
    stem.with_extension(format.extension())
}
