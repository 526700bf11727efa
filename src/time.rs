//! Time systems and datetime formatting
use hifitime::{Duration, Epoch, Unit};

use crate::ParsingError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// JST is UTC + 9h
const JST_UTC_OFFSET_HOURS: i64 = 9;

/// Jitter tolerated around whole minutes, for minute labels
const MINUTE_LABEL_TOLERANCE_NS: u32 = 5_000_000;

/// TAI - GPST, constant
const TAI_GPST_OFFSET_SECONDS: i64 = 19;

/// Time system a solution file may be expressed in.
/// Whatever the input, [crate::SolutionRecord]s are always
/// stored in GPST.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TimeSystem {
    #[default]
    Gpst,
    Utc,
    /// Japan Standard Time
    Jst,
}

impl std::fmt::Display for TimeSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Gpst => f.write_str("GPST"),
            Self::Utc => f.write_str("UTC"),
            Self::Jst => f.write_str("JST"),
        }
    }
}

impl std::str::FromStr for TimeSystem {
    type Err = ParsingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "GPST" => Ok(Self::Gpst),
            "UTC" => Ok(Self::Utc),
            "JST" => Ok(Self::Jst),
            _ => Err(ParsingError::UnknownTimeSystem(s.to_string())),
        }
    }
}

/// Human facing time representation.
/// [DisplaySystem::Off] disables time labels entirely.
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum DisplaySystem {
    Off,
    #[default]
    Gpst,
    Utc,
    Jst,
}

impl DisplaySystem {
    /// Returns the [TimeSystem] this display system expresses,
    /// if any.
    pub fn time_system(&self) -> Option<TimeSystem> {
        match self {
            Self::Off => None,
            Self::Gpst => Some(TimeSystem::Gpst),
            Self::Utc => Some(TimeSystem::Utc),
            Self::Jst => Some(TimeSystem::Jst),
        }
    }
}

impl std::str::FromStr for DisplaySystem {
    type Err = ParsingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "off" | "none" => Ok(Self::Off),
            "gpst" => Ok(Self::Gpst),
            "utc" => Ok(Self::Utc),
            "jst" => Ok(Self::Jst),
            _ => Err(ParsingError::UnknownTimeSystem(s.to_string())),
        }
    }
}

/// Datetime text format variants
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TimeFormat {
    /// "2024-03-01T12:00:00.00Z"
    #[default]
    Iso8601,
    /// "2024/03/01 12:00:00.000 GPST"
    Calendar,
}

impl std::str::FromStr for TimeFormat {
    type Err = ParsingError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "iso" | "iso8601" => Ok(Self::Iso8601),
            "cal" | "calendar" => Ok(Self::Calendar),
            _ => Err(ParsingError::UnknownTimeFormat(s.to_string())),
        }
    }
}

/// Time display configuration
#[derive(Default, Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimeDisplay {
    pub system: DisplaySystem,
    pub format: TimeFormat,
}

impl TimeDisplay {
    /// Time display is disabled
    pub fn off() -> Self {
        Self {
            system: DisplaySystem::Off,
            format: TimeFormat::default(),
        }
    }
    /// Returns true if time should be displayed
    pub fn enabled(&self) -> bool {
        self.system != DisplaySystem::Off
    }
    /// Formats given [Epoch] in the human facing representation
    pub fn format(&self, epoch: Epoch) -> Option<String> {
        let system = self.system.time_system()?;
        Some(match self.format {
            TimeFormat::Iso8601 => iso8601(epoch, system),
            TimeFormat::Calendar => calendar(epoch, system),
        })
    }
    /// Formats given [Epoch] as an xsd:dateTime in the display system
    pub fn timestamp(&self, epoch: Epoch) -> Option<String> {
        let system = self.system.time_system()?;
        Some(iso8601(epoch, system))
    }
    /// Returns the "hh:mm" label for epochs that fall on a whole minute
    pub fn minute_label(&self, epoch: Epoch) -> Option<String> {
        let system = self.system.time_system()?;
        let (_, _, _, hh, mm, ss, ns) = decompose(epoch, system);
        if ss == 0 && ns <= MINUTE_LABEL_TOLERANCE_NS {
            Some(format!("{:02}:{:02}", hh, mm))
        } else if ss == 59 && ns >= 1_000_000_000 - MINUTE_LABEL_TOLERANCE_NS {
            let tolerance = Duration::from_nanoseconds(f64::from(MINUTE_LABEL_TOLERANCE_NS));
            let (_, _, _, hh, mm, _, _) = decompose(epoch + tolerance, system);
            Some(format!("{:02}:{:02}", hh, mm))
        } else {
            None
        }
    }
}

/*
 * Decomposes an epoch into calendar fields in requested time system.
 * GPST is TAI - 19s exactly, so the GPST calendar of an instant
 * is the TAI calendar of that instant shifted by 19s.
 */
pub(crate) fn decompose(epoch: Epoch, system: TimeSystem) -> (i32, u8, u8, u8, u8, u8, u32) {
    match system {
        TimeSystem::Gpst => (epoch - TAI_GPST_OFFSET_SECONDS * Unit::Second).to_gregorian_tai(),
        TimeSystem::Utc => epoch.to_gregorian_utc(),
        TimeSystem::Jst => (epoch + JST_UTC_OFFSET_HOURS * Unit::Hour).to_gregorian_utc(),
    }
}

/*
 * Builds an Epoch from calendar fields expressed in given time system.
 */
pub(crate) fn compose(
    ymd: (i32, u8, u8),
    hhmm: (u8, u8),
    seconds: f64,
    system: TimeSystem,
) -> Result<Epoch, ParsingError> {
    let (y, m, d) = ymd;
    let (hh, mm) = hhmm;
    let scale = match system {
        TimeSystem::Gpst => hifitime::TimeScale::GPST,
        TimeSystem::Utc | TimeSystem::Jst => hifitime::TimeScale::UTC,
    };
    let t0 = Epoch::maybe_from_gregorian(y, m, d, hh, mm, 0, 0, scale)
        .or(Err(ParsingError::InvalidDatetime))?;
    let t = t0 + Duration::from_seconds(seconds);
    let t = match system {
        TimeSystem::Jst => t - JST_UTC_OFFSET_HOURS * Unit::Hour,
        _ => t,
    };
    Ok(t.to_time_scale(hifitime::TimeScale::GPST))
}

/// "yyyy-mm-ddThh:mm:ss.ssZ" in given time system
pub(crate) fn iso8601(epoch: Epoch, system: TimeSystem) -> String {
    // round to the hundredth of second first, so carries propagate
    let epoch = epoch.round(10 * Unit::Millisecond);
    let (y, m, d, hh, mm, ss, ns) = decompose(epoch, system);
    format!(
        "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:02}Z",
        y,
        m,
        d,
        hh,
        mm,
        ss,
        ns / 10_000_000
    )
}

/// "yyyy/mm/dd hh:mm:ss.sss SYS" in given time system
pub(crate) fn calendar(epoch: Epoch, system: TimeSystem) -> String {
    let epoch = epoch.round(Duration::from_milliseconds(1.0));
    let (y, m, d, hh, mm, ss, ns) = decompose(epoch, system);
    format!(
        "{:04}/{:02}/{:02} {:02}:{:02}:{:02}.{:03} {}",
        y,
        m,
        d,
        hh,
        mm,
        ss,
        ns / 1_000_000,
        system
    )
}
