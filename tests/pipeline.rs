//! End-to-end tests: NMEA log -> analysis -> KML / JSON summary.

use std::fs;
use std::io::Write;

use trace_landmarks::{
    load_track, parse_nmea_reader, write_kml_file, AnalysisConfig, ElapsedTime, KmlOptions,
    TraceAnalysis, TraceError, TraceSummary,
};

/// Render a decimal coordinate as NMEA `ddmm.mmmm` plus hemisphere.
fn nmea_coord(value: f64, degree_digits: usize, pos: char, neg: char) -> (String, char) {
    let abs = value.abs();
    let degrees = abs.trunc();
    let minutes = (abs - degrees) * 60.0;
    let text = format!(
        "{:0width$}{:07.4}",
        degrees as u32,
        minutes,
        width = degree_digits
    );
    (text, if value < 0.0 { neg } else { pos })
}

/// One `$GPRMC` sentence, `t` seconds after 14:50:00 on 2025-05-01.
fn rmc(t: u32, lat: f64, lon: f64, speed: f64) -> String {
    let (lat_text, ns) = nmea_coord(lat, 2, 'N', 'S');
    let (lon_text, ew) = nmea_coord(lon, 3, 'E', 'W');
    let secs = 14 * 3600 + 50 * 60 + t;
    format!(
        "$GPRMC,{:02}{:02}{:02}.00,A,{},{},{},{},{:.1},90.0,010525,,,A*00",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60,
        lat_text,
        ns,
        lon_text,
        ew,
        speed
    )
}

fn jitter(t: u32) -> f64 {
    if t % 2 == 0 {
        2e-5
    } else {
        -2e-5
    }
}

/// A drive with a parked start, an eastbound leg, a left turn north,
/// a four-second stop, more northbound driving and a parked finish.
///
/// Lateral jitter alternates every fix so no three consecutive fixes are
/// collinear, like a real receiver.
fn drive_log() -> String {
    let mut lines = vec!["$GPGSA,A,3,04,05,,09,12,,,24,,,,,2.5,1.3,2.1*39".to_string()];
    let mut t = 0;
    let mut push = |lines: &mut Vec<String>, lat: f64, lon: f64, speed: f64| {
        lines.push(rmc(t, lat, lon, speed));
        t += 1;
    };

    for _ in 0..3 {
        push(&mut lines, 47.0, 8.0, 0.0);
    }
    for k in 1..=10 {
        let tt = 2 + k;
        push(&mut lines, 47.0 + jitter(tt), 8.0 + k as f64 * 1e-4, 20.0);
    }
    for k in 1..=10 {
        let tt = 12 + k;
        push(&mut lines, 47.0 + k as f64 * 1e-4, 8.001 + jitter(tt), 20.0);
    }
    for _ in 0..4 {
        push(&mut lines, 47.0011, 8.001, 0.0);
    }
    for k in 12..=19 {
        let tt = 15 + k;
        push(&mut lines, 47.0 + k as f64 * 1e-4, 8.001 + jitter(tt), 20.0);
    }
    for _ in 0..3 {
        push(&mut lines, 47.0019, 8.001, 0.0);
    }

    lines.join("\n")
}

fn analyze_drive() -> TraceAnalysis {
    let points = parse_nmea_reader(drive_log().as_bytes()).unwrap();
    assert_eq!(points.len(), 38);
    TraceAnalysis::from_points(&points, &AnalysisConfig::default())
}

#[test]
fn test_drive_is_cleaned() {
    let analysis = analyze_drive();

    // Three parked fixes dropped at each end, nothing thinned.
    assert_eq!(analysis.raw_point_count, 38);
    assert_eq!(analysis.cleaned.len(), 32);
    assert!(analysis.cleaned.first().unwrap().speed_knots > 5.0);
    assert!(analysis.cleaned.last().unwrap().speed_knots > 5.0);
}

#[test]
fn test_drive_landmarks() {
    let analysis = analyze_drive();

    assert_eq!(analysis.landmarks.stops.len(), 1);
    let stop = analysis.landmarks.stops[0];
    assert!((stop.latitude - 47.0011).abs() < 1e-6);
    assert!((stop.longitude - 8.001).abs() < 1e-6);

    assert_eq!(analysis.landmarks.turns.len(), 1);
    let turn = analysis.landmarks.turns[0];
    assert!((turn.latitude - 47.0).abs() < 3e-4);
    assert!((turn.longitude - 8.001).abs() < 3e-4);
}

#[test]
fn test_drive_durations() {
    let analysis = analyze_drive();

    assert_eq!(analysis.durations.total, ElapsedTime::Seconds(31));
    // Three stop-to-stop pairs don't count as moving.
    assert_eq!(analysis.durations.moving, ElapsedTime::Seconds(28));
    assert_eq!(analysis.durations.total.to_string(), "00:00:31");
}

#[test]
fn test_kml_and_summary_files() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("drive.txt");
    let kml_path = dir.path().join("drive.kml");
    let summary_path = dir.path().join("drive.json");
    fs::write(&log_path, drive_log()).unwrap();

    let points = load_track(&log_path).unwrap();
    let analysis = TraceAnalysis::from_points(&points, &AnalysisConfig::default());
    write_kml_file(&kml_path, &analysis, &KmlOptions::default()).unwrap();
    analysis.write_summary_json(&summary_path).unwrap();

    let kml = fs::read_to_string(&kml_path).unwrap();
    assert_eq!(kml.matches("<Placemark>").count(), 3);
    assert!(kml.contains("<name>Stop 1</name>"));
    assert!(kml.contains("<name>Left turn 1</name>"));
    assert!(kml.contains("Total duration: 00:00:31, moving duration: 00:00:28"));

    let summary: TraceSummary =
        serde_json::from_str(&fs::read_to_string(&summary_path).unwrap()).unwrap();
    assert_eq!(summary, analysis.summary());
    assert_eq!(summary.cleaned_points, 32);
    assert_eq!(summary.moving_duration.as_deref(), Some("00:00:28"));
}

#[test]
fn test_log_without_fixes() {
    let dir = tempfile::tempdir().unwrap();
    let log_path = dir.path().join("empty.txt");
    let mut file = fs::File::create(&log_path).unwrap();
    writeln!(file, "$GPRMC,145019,V,,,,,,,010525,,*00").unwrap();
    writeln!(file, "$GPGGA,145019,,,,,0,00,,,M,,M,,*66").unwrap();
    drop(file);

    let err = load_track(&log_path).unwrap_err();
    assert!(matches!(err, TraceError::NoValidPoints { .. }));
    assert!(err.to_string().contains("empty.txt"));
}

#[test]
fn test_missing_file() {
    let err = load_track("/nonexistent/drive.txt").unwrap_err();
    assert!(matches!(err, TraceError::Io(_)));
}

#[test]
fn test_custom_config_changes_detection() {
    let points = parse_nmea_reader(drive_log().as_bytes()).unwrap();
    let config = AnalysisConfig {
        min_turn_sine: 0.999,
        ..AnalysisConfig::default()
    };
    let analysis = TraceAnalysis::from_points(&points, &config);
    // Only the sharpest fix would qualify; none bends that hard with jitter.
    assert!(analysis.landmarks.turns.is_empty());
    assert_eq!(analysis.landmarks.stops.len(), 1);
}
