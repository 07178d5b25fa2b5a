//! KML 2.2 export of an analyzed trace.
//!
//! The document carries a yellow path for the cleaned trajectory, red pins
//! for stops and yellow pins for left turns.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::debug;

use crate::error::Result;
use crate::{Landmark, TraceAnalysis};

const ROUTE_COLOR: &str = "ff00ffff";
const STOP_ICON: &str = "http://maps.google.com/mapfiles/kml/paddle/red-circle.png";
const TURN_ICON: &str = "http://maps.google.com/mapfiles/kml/paddle/ylw-circle.png";

/// Document-level settings.
#[derive(Debug, Clone, PartialEq)]
pub struct KmlOptions {
    /// Document name shown in the viewer
    pub name: String,
    /// Altitude in meters written with every coordinate
    pub altitude: f64,
}

impl Default for KmlOptions {
    fn default() -> Self {
        Self {
            name: "GPS Route".to_string(),
            altitude: 3.0,
        }
    }
}

/// Write the analysis as a KML document.
pub fn write_kml<W: Write>(
    mut writer: W,
    analysis: &TraceAnalysis,
    options: &KmlOptions,
) -> Result<()> {
    writeln!(writer, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(writer, r#"<kml xmlns="http://www.opengis.net/kml/2.2">"#)?;
    writeln!(writer, "  <Document>")?;
    writeln!(writer, "    <name>{}</name>", escape_xml(&options.name))?;
    writeln!(
        writer,
        "    <description>Total duration: {}, moving duration: {}</description>",
        analysis.durations.total, analysis.durations.moving
    )?;

    writeln!(writer, r#"    <Style id="routeStyle">"#)?;
    writeln!(writer, "      <LineStyle>")?;
    writeln!(writer, "        <color>{}</color>", ROUTE_COLOR)?;
    writeln!(writer, "        <width>3</width>")?;
    writeln!(writer, "      </LineStyle>")?;
    writeln!(writer, "    </Style>")?;
    write_icon_style(&mut writer, "stopStyle", STOP_ICON)?;
    write_icon_style(&mut writer, "turnStyle", TURN_ICON)?;

    writeln!(writer, "    <Placemark>")?;
    writeln!(writer, "      <name>Route</name>")?;
    writeln!(writer, "      <styleUrl>#routeStyle</styleUrl>")?;
    writeln!(writer, "      <LineString>")?;
    writeln!(writer, "        <tessellate>1</tessellate>")?;
    writeln!(writer, "        <coordinates>")?;
    for p in &analysis.cleaned {
        writeln!(
            writer,
            "          {:.6},{:.6},{}",
            p.longitude, p.latitude, options.altitude
        )?;
    }
    writeln!(writer, "        </coordinates>")?;
    writeln!(writer, "      </LineString>")?;
    writeln!(writer, "    </Placemark>")?;

    write_landmarks(&mut writer, "Stop", "stopStyle", &analysis.landmarks.stops, options)?;
    write_landmarks(
        &mut writer,
        "Left turn",
        "turnStyle",
        &analysis.landmarks.turns,
        options,
    )?;

    writeln!(writer, "  </Document>")?;
    writeln!(writer, "</kml>")?;
    writer.flush()?;
    Ok(())
}

/// Write the analysis to a KML file.
pub fn write_kml_file(
    path: impl AsRef<Path>,
    analysis: &TraceAnalysis,
    options: &KmlOptions,
) -> Result<()> {
    let path = path.as_ref();
    let writer = BufWriter::new(File::create(path)?);
    write_kml(writer, analysis, options)?;
    debug!("[kml] wrote {}", path.display());
    Ok(())
}

fn write_icon_style<W: Write>(writer: &mut W, id: &str, icon: &str) -> Result<()> {
    writeln!(writer, r#"    <Style id="{}">"#, id)?;
    writeln!(writer, "      <IconStyle>")?;
    writeln!(writer, "        <Icon><href>{}</href></Icon>", icon)?;
    writeln!(writer, "      </IconStyle>")?;
    writeln!(writer, "    </Style>")?;
    Ok(())
}

fn write_landmarks<W: Write>(
    writer: &mut W,
    label: &str,
    style: &str,
    landmarks: &[Landmark],
    options: &KmlOptions,
) -> Result<()> {
    for (i, landmark) in landmarks.iter().enumerate() {
        writeln!(writer, "    <Placemark>")?;
        writeln!(writer, "      <name>{} {}</name>", label, i + 1)?;
        writeln!(writer, "      <styleUrl>#{}</styleUrl>", style)?;
        writeln!(
            writer,
            "      <Point><coordinates>{:.6},{:.6},{}</coordinates></Point>",
            landmark.longitude, landmark.latitude, options.altitude
        )?;
        writeln!(writer, "    </Placemark>")?;
    }
    Ok(())
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{detect_landmarks, AnalysisConfig, TrackPoint, TripDurations};

    fn corner_analysis() -> TraceAnalysis {
        let points = vec![
            TrackPoint::new(0.000, 0.000, 20.0),
            TrackPoint::new(0.000, 0.001, 20.0),
            TrackPoint::new(0.000, 0.002, 20.0),
            TrackPoint::new(0.000, 0.003, 20.0),
            TrackPoint::new(0.001, 0.003, 20.0),
            TrackPoint::new(0.002, 0.003, 20.0),
            TrackPoint::new(0.003, 0.003, 20.0),
        ];
        // Built directly: the cleaner would thin this corner to three points.
        let config = AnalysisConfig::default();
        TraceAnalysis {
            raw_point_count: points.len(),
            landmarks: detect_landmarks(&points, &config),
            durations: TripDurations::from_trajectory(&points, &config),
            distance_m: 0.0,
            cleaned: points,
        }
    }

    fn render(analysis: &TraceAnalysis, options: &KmlOptions) -> String {
        let mut buf = Vec::new();
        write_kml(&mut buf, analysis, options).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_document_structure() {
        let kml = render(&corner_analysis(), &KmlOptions::default());

        assert!(kml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(kml.contains("<name>GPS Route</name>"));
        assert!(kml.contains("<color>ff00ffff</color>"));
        assert!(kml.contains("          0.003000,0.003000,3\n"));
        assert_eq!(kml.matches("<name>Left turn").count(), 1);
        assert_eq!(kml.matches("<name>Stop").count(), 0);
        assert!(kml.contains("Total duration: n/a"));
        assert!(kml.trim_end().ends_with("</kml>"));
    }

    #[test]
    fn test_name_is_escaped() {
        let options = KmlOptions {
            name: "Home <-> Work & back".to_string(),
            altitude: 0.5,
        };
        let kml = render(&corner_analysis(), &options);
        assert!(kml.contains("<name>Home &lt;-&gt; Work &amp; back</name>"));
        assert!(kml.contains(",0.5\n"));
    }
}
