//! Visual styling: colors, quality palette and altitude representation
use crate::{quality::Quality, solution::SolutionRecord, time::TimeDisplay, ParsingError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// KML color, stored as 32 bit aabbggrr (alpha, blue, green, red)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Color(pub u32);

impl Color {
    pub const WHITE: Self = Self(0xffffffff);
    pub const GREEN: Self = Self(0xff008800);
    pub const ORANGE: Self = Self(0xff00aaff);
    pub const RED: Self = Self(0xff0000ff);
    pub const YELLOW: Self = Self(0xff00ffff);
    pub const MAGENTA: Self = Self(0xffff00ff);
    pub const CYAN: Self = Self(0xffffff00);
    pub const GRAY: Self = Self(0xff808080);

    const NAMED: [(&'static str, Self); 8] = [
        ("white", Self::WHITE),
        ("green", Self::GREEN),
        ("orange", Self::ORANGE),
        ("red", Self::RED),
        ("yellow", Self::YELLOW),
        ("magenta", Self::MAGENTA),
        ("cyan", Self::CYAN),
        ("gray", Self::GRAY),
    ];

    /// Returns the "aabbggrr" hex representation
    pub fn to_hex(&self) -> String {
        format!("{:08x}", self.0)
    }
    /// Returns the style identifier associated to this color
    pub fn style_id(&self) -> String {
        format!("c{}", self.to_hex())
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl std::str::FromStr for Color {
    type Err = ParsingError;
    /// Parses a color name or an "aabbggrr" hex string
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let content = s.trim().to_lowercase();
        if let Some((_, color)) = Self::NAMED
            .iter()
            .find(|(name, _)| *name == content || (*name == "gray" && content == "grey"))
        {
            return Ok(*color);
        }
        let hex = content.trim_start_matches('#');
        if hex.len() == 8 {
            if let Ok(value) = u32::from_str_radix(hex, 16) {
                return Ok(Self(value));
            }
        }
        Err(ParsingError::Color(s.to_string()))
    }
}

/// How a layer (track or points) is colored
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ColorMode {
    /// Layer is not emitted
    Off,
    /// Same color for every record
    Fixed(Color),
    /// Color follows the solution [Quality]
    #[default]
    ByQuality,
}

impl std::str::FromStr for ColorMode {
    type Err = ParsingError;
    /// "off", "quality" or any [Color] description
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "off" | "none" => Ok(Self::Off),
            "quality" | "q" => Ok(Self::ByQuality),
            _ => Ok(Self::Fixed(s.parse::<Color>()?)),
        }
    }
}

/// Altitude representation
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum AltitudeMode {
    /// Altitude is dropped, positions are clamped to the ground
    None,
    /// WGS84 ellipsoidal height
    #[default]
    Ellipsoidal,
    /// Height above mean sea level, requires a geoid model
    MeanSeaLevel,
}

impl std::str::FromStr for AltitudeMode {
    type Err = ParsingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "off" | "ground" => Ok(Self::None),
            "ellipsoidal" | "wgs84" => Ok(Self::Ellipsoidal),
            "msl" | "geoid" => Ok(Self::MeanSeaLevel),
            _ => Err(ParsingError::AltitudeMode(s.to_string())),
        }
    }
}

/// Immutable [Quality] to [Color] lookup table
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct QualityPalette {
    /// Colors indexed by quality code
    colors: [Color; 7],
}

impl QualityPalette {
    /// Default palette
    pub const DEFAULT: Self = Self {
        colors: [
            Color::GRAY,    // unknown
            Color::GREEN,   // fix
            Color::ORANGE,  // float
            Color::MAGENTA, // sbas
            Color::YELLOW,  // dgps
            Color::RED,     // single
            Color::CYAN,    // ppp
        ],
    };

    /// Copies and returns [Self] with a custom color for given [Quality]
    pub fn with_color(&self, quality: Quality, color: Color) -> Self {
        let mut s = *self;
        s.colors[quality.code() as usize] = color;
        s
    }
    /// Returns [Color] of given [Quality]
    pub fn color(&self, quality: Quality) -> Color {
        self.colors[quality.code() as usize]
    }
}

impl Default for QualityPalette {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// User styling preferences
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StyleConfig {
    /// Track (line) coloring
    pub track: ColorMode,
    /// Points coloring
    pub point: ColorMode,
    /// Altitude representation
    pub altitude: AltitudeMode,
    /// Human facing time representation
    pub time: TimeDisplay,
}

impl Default for StyleConfig {
    /// White track, points colored by quality,
    /// ellipsoidal heights and GPST time labels.
    fn default() -> Self {
        Self {
            track: ColorMode::Fixed(Color::WHITE),
            point: ColorMode::ByQuality,
            altitude: AltitudeMode::default(),
            time: TimeDisplay::default(),
        }
    }
}

impl StyleConfig {
    /// Copies and returns [Self] with given track [ColorMode]
    pub fn with_track(&self, track: ColorMode) -> Self {
        let mut s = *self;
        s.track = track;
        s
    }
    /// Copies and returns [Self] with given points [ColorMode]
    pub fn with_points(&self, point: ColorMode) -> Self {
        let mut s = *self;
        s.point = point;
        s
    }
    /// Copies and returns [Self] with given [AltitudeMode]
    pub fn with_altitude(&self, altitude: AltitudeMode) -> Self {
        let mut s = *self;
        s.altitude = altitude;
        s
    }
    /// Copies and returns [Self] with given [TimeDisplay]
    pub fn with_time(&self, time: TimeDisplay) -> Self {
        let mut s = *self;
        s.time = time;
        s
    }
}

/// Colors resolved for one record. None means the layer is not emitted.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq)]
pub struct ResolvedStyle {
    pub track: Option<Color>,
    pub point: Option<Color>,
}

/// [StyleResolver] maps each record to its track and point colors
#[derive(Copy, Clone, Debug)]
pub struct StyleResolver<'a> {
    config: &'a StyleConfig,
    palette: &'a QualityPalette,
}

impl<'a> StyleResolver<'a> {
    pub fn new(config: &'a StyleConfig, palette: &'a QualityPalette) -> Self {
        Self { config, palette }
    }
    fn color(&self, mode: ColorMode, quality: Quality) -> Option<Color> {
        match mode {
            ColorMode::Off => None,
            ColorMode::Fixed(color) => Some(color),
            ColorMode::ByQuality => Some(self.palette.color(quality)),
        }
    }
    /// Resolves track and point colors independently
    pub fn resolve(&self, record: &SolutionRecord) -> ResolvedStyle {
        ResolvedStyle {
            track: self.color(self.config.track, record.quality),
            point: self.color(self.config.point, record.quality),
        }
    }
}
