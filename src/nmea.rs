//! NMEA 0183 `RMC` sentence parsing.
//!
//! Only `$GPRMC` / `$GNRMC` sentences with an active (`A`) fix status are
//! used. Everything else in the log is ignored.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, trace};

use crate::error::{Result, TraceError};
use crate::TrackPoint;

const RMC_PREFIXES: [&str; 2] = ["$GPRMC", "$GNRMC"];
const MIN_RMC_FIELDS: usize = 10;

/// Parse one `RMC` sentence into a fix.
///
/// Returns `None` for other sentence types, void fixes, and missing or
/// malformed coordinates. An unparsable speed reads as 0 knots and an
/// unparsable time leaves the timestamp empty.
///
/// # Example
/// ```
/// use trace_landmarks::parse_rmc_sentence;
///
/// let fix = parse_rmc_sentence(
///     "$GPRMC,123519,A,4807.038,N,01131.000,E,022.4,084.4,230394,003.1,W*6A",
/// )
/// .unwrap();
/// assert!((fix.latitude - 48.1173).abs() < 1e-9);
/// assert_eq!(fix.speed_knots, 22.4);
/// assert!(fix.timestamp.is_some());
/// ```
pub fn parse_rmc_sentence(line: &str) -> Option<TrackPoint> {
    let line = line.trim();
    if !RMC_PREFIXES.iter().any(|prefix| line.starts_with(prefix)) {
        return None;
    }

    // Drop the "*hh" checksum so it can't leak into the last field.
    let body = line.split_once('*').map_or(line, |(body, _)| body);
    let fields: Vec<&str> = body.split(',').collect();
    if fields.len() < MIN_RMC_FIELDS {
        return None;
    }

    if fields[2] != "A" {
        return None;
    }

    let latitude = nmea_coord_to_decimal(fields[3], fields[4])?;
    let longitude = nmea_coord_to_decimal(fields[5], fields[6])?;
    let speed_knots = fields[7].trim().parse::<f64>().unwrap_or(0.0);
    let timestamp = parse_rmc_timestamp(fields[1], fields[9]);

    let point = TrackPoint {
        latitude,
        longitude,
        speed_knots,
        timestamp,
    };
    point.is_valid().then_some(point)
}

/// Convert an NMEA `ddmm.mmmm` / `dddmm.mmmm` coordinate to decimal degrees.
///
/// Latitude (`N`/`S`) uses two degree digits, anything else three.
/// `S` and `W` are negative.
pub fn nmea_coord_to_decimal(value: &str, direction: &str) -> Option<f64> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    let (integer_part, frac_part) = match value.split_once('.') {
        Some((int, frac)) => (int, frac),
        None => (value, "0"),
    };

    let direction = direction.trim();
    let degree_digits = if matches!(direction, "N" | "S") { 2 } else { 3 };
    if integer_part.len() <= degree_digits || !integer_part.is_ascii() {
        return None;
    }

    let degrees: u32 = integer_part[..degree_digits].parse().ok()?;
    let minutes: f64 = format!("{}.{}", &integer_part[degree_digits..], frac_part)
        .parse()
        .ok()?;

    let decimal = degrees as f64 + minutes / 60.0;
    if matches!(direction, "S" | "W") {
        Some(-decimal)
    } else {
        Some(decimal)
    }
}

/// Combine `hhmmss[.sss]` and `ddmmyy` fields into a UTC timestamp.
///
/// Two-digit years map to 2000-2099. Fractional seconds are dropped.
pub fn parse_rmc_timestamp(time: &str, date: &str) -> Option<DateTime<Utc>> {
    let field = |s: &str, start: usize| -> Option<u32> {
        let digits = s.get(start..start + 2)?;
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        digits.parse().ok()
    };

    let (hour, minute, second) = (field(time, 0)?, field(time, 2)?, field(time, 4)?);
    let (day, month, year) = (field(date, 0)?, field(date, 2)?, field(date, 4)?);

    NaiveDate::from_ymd_opt(2000 + year as i32, month, day)?
        .and_hms_opt(hour, minute, second)
        .map(|naive| naive.and_utc())
}

/// Parse every usable `RMC` fix from a reader, in log order.
///
/// Lines are decoded lossily, so binary noise between sentences is skipped
/// rather than failing the whole log.
pub fn parse_nmea_reader<R: BufRead>(reader: R) -> Result<Vec<TrackPoint>> {
    let mut points = Vec::new();
    let mut lines = 0usize;
    let mut rejected = 0usize;

    for raw in reader.split(b'\n') {
        let raw = raw?;
        lines += 1;
        let line = String::from_utf8_lossy(&raw);
        let trimmed = line.trim();
        if !RMC_PREFIXES.iter().any(|prefix| trimmed.starts_with(prefix)) {
            continue;
        }
        match parse_rmc_sentence(trimmed) {
            Some(point) => points.push(point),
            None => {
                rejected += 1;
                trace!("[nmea] rejected sentence: {}", trimmed);
            }
        }
    }

    debug!(
        "[nmea] parsed {} fixes from {} lines ({} RMC sentences rejected)",
        points.len(),
        lines,
        rejected
    );
    Ok(points)
}

/// Parse every usable `RMC` fix from a file.
pub fn parse_nmea_file(path: impl AsRef<Path>) -> Result<Vec<TrackPoint>> {
    let file = File::open(path.as_ref())?;
    parse_nmea_reader(BufReader::new(file))
}

/// Parse a file and require at least one fix.
pub fn load_track(path: impl AsRef<Path>) -> Result<Vec<TrackPoint>> {
    let path = path.as_ref();
    let points = parse_nmea_file(path)?;
    if points.is_empty() {
        return Err(TraceError::NoValidPoints {
            source_name: path.display().to_string(),
        });
    }
    Ok(points)
}
