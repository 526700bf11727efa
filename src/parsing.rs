//! Solution (data) line parsing
use hifitime::{Duration, Epoch, Unit};

use crate::{
    header::{CoordinateSystem, SolutionHeader, TimeFormat},
    position::GeodeticPosition,
    quality::Quality,
    solution::{SolutionRecord, StdDev},
    time::{compose, decompose, TimeSystem},
    ParsingError,
};

/// Number of seconds in one GPS week
const WEEK_SECONDS: f64 = 604_800.0;

/// Accepted number of trailing fields, after "Q" and "ns":
/// none, 3 std deviations, + 3 correlations, + age, + ratio.
const TAIL_LENGTHS: [usize; 5] = [0, 3, 6, 7, 8];

/// Splits a data line into fields, delimited by whitespaces and/or commas
pub(crate) fn fields(line: &str) -> Vec<&str> {
    line.split(|c: char| c.is_ascii_whitespace() || c == ',')
        .filter(|item| !item.is_empty())
        .collect()
}

fn parse_f64<F: Fn(String) -> ParsingError>(item: &str, err: F) -> Result<f64, ParsingError> {
    let value = item.parse::<f64>().or(Err(err(item.to_string())))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(err(item.to_string()))
    }
}

/*
 * "yyyy/mm/dd" "hh:mm:ss.sss"
 */
fn parse_calendar(date: &str, tod: &str, system: TimeSystem) -> Result<Epoch, ParsingError> {
    let ymd = date.split('/').collect::<Vec<_>>();
    if ymd.len() != 3 {
        return Err(ParsingError::Date(date.to_string()));
    }
    let y = ymd[0]
        .parse::<i32>()
        .or(Err(ParsingError::Date(date.to_string())))?;
    let m = ymd[1]
        .parse::<u8>()
        .or(Err(ParsingError::Date(date.to_string())))?;
    let d = ymd[2]
        .parse::<u8>()
        .or(Err(ParsingError::Date(date.to_string())))?;

    let hms = tod.split(':').collect::<Vec<_>>();
    if hms.len() != 3 {
        return Err(ParsingError::TimeOfDay(tod.to_string()));
    }
    let hh = hms[0]
        .parse::<u8>()
        .or(Err(ParsingError::TimeOfDay(tod.to_string())))?;
    let mm = hms[1]
        .parse::<u8>()
        .or(Err(ParsingError::TimeOfDay(tod.to_string())))?;
    let ss = parse_f64(hms[2], ParsingError::TimeOfDay)?;

    if hh > 23 || mm > 59 || !(0.0..61.0).contains(&ss) {
        return Err(ParsingError::TimeOfDay(tod.to_string()));
    }
    compose((y, m, d), (hh, mm), ss, system)
}

/*
 * "week" "tow": always counted in GPST,
 * re-interpreted in the file time system.
 */
fn parse_week_tow(week: &str, tow: &str, system: TimeSystem) -> Result<Epoch, ParsingError> {
    let week = week
        .parse::<u32>()
        .or(Err(ParsingError::Week(week.to_string())))?;
    let tow_s = parse_f64(tow, ParsingError::TimeOfWeek)?;
    if !(0.0..WEEK_SECONDS).contains(&tow_s) {
        return Err(ParsingError::TimeOfWeek(tow.to_string()));
    }
    let epoch =
        Epoch::from_gpst_duration(i64::from(week) * Unit::Week + Duration::from_seconds(tow_s));
    match system {
        TimeSystem::Gpst => Ok(epoch),
        _ => {
            let (y, m, d, hh, mm, ss, ns) = decompose(epoch, TimeSystem::Gpst);
            let seconds = f64::from(ss) + f64::from(ns) * 1.0E-9;
            compose((y, m, d), (hh, mm), seconds, system)
        },
    }
}

fn parse_epoch(
    first: &str,
    second: &str,
    system: TimeSystem,
) -> Result<(Epoch, TimeFormat), ParsingError> {
    if first.contains('/') {
        Ok((parse_calendar(first, second, system)?, TimeFormat::Calendar))
    } else {
        Ok((parse_week_tow(first, second, system)?, TimeFormat::WeekTow))
    }
}

/*
 * "ddd mm ss.ssss", sign is carried by degrees
 */
fn parse_dms(items: &[&str]) -> Result<f64, ParsingError> {
    let content = items.join(" ");
    let d = parse_f64(items[0], |_| ParsingError::Coordinates(content.clone()))?;
    let m = parse_f64(items[1], |_| ParsingError::Coordinates(content.clone()))?;
    let s = parse_f64(items[2], |_| ParsingError::Coordinates(content.clone()))?;
    if !(0.0..60.0).contains(&m) || !(0.0..60.0).contains(&s) {
        return Err(ParsingError::Coordinates(content));
    }
    let magnitude = d.abs() + m / 60.0 + s / 3600.0;
    if items[0].starts_with('-') {
        Ok(-magnitude)
    } else {
        Ok(magnitude)
    }
}

fn geodetic(lat: f64, lon: f64, alt: f64) -> Result<GeodeticPosition, ParsingError> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err(ParsingError::LatitudeRange(lat));
    }
    Ok(GeodeticPosition::new(lat, lon, alt))
}

/*
 * ECEF and baseline conversions may not converge (ECEF origin for instance)
 */
fn converted(
    position: GeodeticPosition,
    items: &[&str],
) -> Result<GeodeticPosition, ParsingError> {
    let finite = position.latitude_ddeg.is_finite()
        && position.longitude_ddeg.is_finite()
        && position.altitude_m.is_finite();
    if finite && position.is_valid() {
        Ok(position)
    } else {
        Err(ParsingError::Coordinates(items.join(" ")))
    }
}

fn parse_position(
    items: &[&str],
    header: &SolutionHeader,
) -> Result<GeodeticPosition, ParsingError> {
    match header.coordinates {
        CoordinateSystem::GeodeticDms => {
            let lat = parse_dms(&items[0..3])?;
            let lon = parse_dms(&items[3..6])?;
            let alt = parse_f64(items[6], ParsingError::Coordinates)?;
            geodetic(lat, lon, alt)
        },
        coordinates => {
            let a = parse_f64(items[0], ParsingError::Coordinates)?;
            let b = parse_f64(items[1], ParsingError::Coordinates)?;
            let c = parse_f64(items[2], ParsingError::Coordinates)?;
            match coordinates {
                CoordinateSystem::Ecef => converted(GeodeticPosition::from_ecef((a, b, c)), items),
                CoordinateSystem::Enu => {
                    let reference = header
                        .ref_position
                        .as_ref()
                        .ok_or(ParsingError::MissingReferencePosition)?;
                    converted(GeodeticPosition::from_enu((a, b, c), reference), items)
                },
                _ => geodetic(a, b, c),
            }
        },
    }
}

/// Parses one data line, described by given [SolutionHeader].
/// Returns the [SolutionRecord] and the epoch format that was identified.
pub(crate) fn parse_record(
    line: &str,
    header: &SolutionHeader,
) -> Result<(SolutionRecord, TimeFormat), ParsingError> {
    let items = fields(line);
    let nb_pos = header.coordinates.nb_fields();
    let nb_min = 2 + nb_pos + 2;

    let tail = items.len().checked_sub(nb_min);
    if !tail.map(|n| TAIL_LENGTHS.contains(&n)).unwrap_or(false) {
        let expected = TAIL_LENGTHS
            .iter()
            .map(|n| (nb_min + n).to_string())
            .collect::<Vec<_>>()
            .join("|");
        return Err(ParsingError::ColumnCount {
            expected,
            found: items.len(),
        });
    }

    let (epoch, time_format) = parse_epoch(items[0], items[1], header.time_system)?;
    let position = parse_position(&items[2..2 + nb_pos], header)?;

    let q = items[2 + nb_pos];
    let quality = q
        .parse::<u8>()
        .ok()
        .and_then(Quality::from_code)
        .ok_or(ParsingError::Quality(q.to_string()))?;

    let ns = items[3 + nb_pos];
    let nb_sat = ns
        .parse::<u16>()
        .or(Err(ParsingError::NbSat(ns.to_string())))?;

    let tail = &items[nb_min..];
    let mut record = SolutionRecord::new(epoch, position, quality).with_nb_sat(nb_sat);

    if tail.len() >= 3 {
        let mut std_dev = StdDev::new(
            parse_f64(tail[0], ParsingError::StdDev)?,
            parse_f64(tail[1], ParsingError::StdDev)?,
            parse_f64(tail[2], ParsingError::StdDev)?,
        );
        if tail.len() >= 6 {
            std_dev = std_dev.with_correlations(
                parse_f64(tail[3], ParsingError::StdDev)?,
                parse_f64(tail[4], ParsingError::StdDev)?,
                parse_f64(tail[5], ParsingError::StdDev)?,
            );
        }
        record = record.with_std_dev(std_dev);
    }
    if tail.len() >= 7 {
        record = record.with_age(parse_f64(tail[6], ParsingError::Age)?);
    }
    if tail.len() >= 8 {
        record = record.with_ratio(parse_f64(tail[7], ParsingError::Ratio)?);
    }
    Ok((record, time_format))
}
