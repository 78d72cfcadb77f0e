// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! AceXML `.PLN` export.

use crate::coord::format_position;
use crate::plan::{FlightPlan, UserWaypoint, AIRPORT_ELEVATION};
use crate::strips::Strip;
use crate::PlanError;
use log::info;
use quick_xml::escape::escape;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

fn airport_waypoint(strip: &Strip) -> String {
    let icao = escape(strip.icao.as_str());
    format!(
        r#"        <ATCWaypoint id="{icao}">
            <ATCWaypointType>Airport</ATCWaypointType>
            <WorldPosition>{}</WorldPosition>
            <RunwayNumberFP>1</RunwayNumberFP>
            <ICAO>
                <ICAOIdent>{icao}</ICAOIdent>
            </ICAO>
        </ATCWaypoint>
"#,
        format_position(strip.position(), AIRPORT_ELEVATION),
    )
}

fn user_waypoint(waypoint: &UserWaypoint) -> String {
    format!(
        r#"        <ATCWaypoint id="{}">
            <ATCWaypointType>User</ATCWaypointType>
            <WorldPosition>{}</WorldPosition>
        </ATCWaypoint>
"#,
        escape(waypoint.name.as_str()),
        format_position(waypoint.position, waypoint.elevation),
    )
}

fn airport_header(tag: &str, strip: &Strip) -> String {
    format!(
        "        <{tag}ID>{}</{tag}ID>\n        <{tag}LLA>{}</{tag}LLA>\n        <{tag}Name>{}</{tag}Name>\n",
        escape(strip.icao.as_str()),
        format_position(strip.position(), AIRPORT_ELEVATION),
        escape(strip.name_short.as_str()),
    )
}

/// Renders the complete flight plan document.
pub fn render_pln(plan: &FlightPlan) -> String {
    let title = escape(plan.title.as_str());
    let mut doc = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>

<SimBase.Document Type="AceXML" version="1,0">
    <Descr>AceXML Document</Descr>
    <FlightPlan.FlightPlan>
        <Title>{title}</Title>
        <FPType>IFR</FPType>
        <RouteType>LowAlt</RouteType>
        <CruisingAlt>11000.000</CruisingAlt>
"#
    );
    doc.push_str(&airport_header("Departure", &plan.departure));
    doc.push_str(&airport_header("Destination", &plan.destination));
    doc.push_str(&format!(
        r#"        <Descr>{title}</Descr>
        <AppVersion>
            <AppVersionMajor>11</AppVersionMajor>
            <AppVersionBuild>282174</AppVersionBuild>
        </AppVersion>
"#
    ));
    doc.push_str(&airport_waypoint(&plan.departure));
    for waypoint in &plan.waypoints {
        doc.push_str(&user_waypoint(waypoint));
    }
    doc.push_str(&airport_waypoint(&plan.destination));
    doc.push_str("    </FlightPlan.FlightPlan>\n</SimBase.Document>\n");
    doc
}

/// Writes the plan next to `path` and renames it into place, so a failed
/// write never leaves a partial file behind.
///
/// A new file gets the usual umask-derived mode; a replaced file keeps its
/// permissions.
pub fn write_plan<P: AsRef<Path>>(plan: &FlightPlan, path: P) -> Result<(), PlanError> {
    let path = path.as_ref();
    let document = render_pln(plan);

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let existing = fs::metadata(path).ok().map(|meta| meta.permissions());

    let mut tmp = tempfile::Builder::new().make_in(dir, |tmp_path| {
        OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(tmp_path)
    })?;
    tmp.write_all(document.as_bytes())?;
    tmp.flush()?;
    if let Some(permissions) = existing {
        tmp.as_file().set_permissions(permissions)?;
    }
    tmp.persist(path).map_err(|e| PlanError::Io(e.error))?;

    info!(
        "Flight plan written — path={} bytes={}",
        path.display(),
        document.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::GeoPoint;

    fn sample_plan() -> FlightPlan {
        FlightPlan {
            title: "Alps & lakes".to_string(),
            departure: Strip {
                icao: "LSGG".to_string(),
                name_short: "Geneva".to_string(),
                lat: 46.25,
                lon: 6.125,
            },
            waypoints: vec![UserWaypoint {
                name: "MONT <BLANC>".to_string(),
                position: GeoPoint::new(6.875, 45.75),
                elevation: 15_800.0,
            }],
            destination: Strip {
                icao: "LSZH".to_string(),
                name_short: "Zurich".to_string(),
                lat: 47.5,
                lon: 8.5,
            },
        }
    }

    #[test]
    fn test_render_header() {
        let doc = render_pln(&sample_plan());
        assert!(doc.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\n<SimBase.Document"));
        assert!(doc.contains("        <Title>Alps &amp; lakes</Title>\n"));
        assert!(doc.contains("        <Descr>Alps &amp; lakes</Descr>\n"));
        assert!(doc.contains("        <DepartureID>LSGG</DepartureID>\n"));
        assert!(doc.contains(
            "        <DepartureLLA>N46\u{00B0} 15' 0.000\",E6\u{00B0} 7' 30.000\",+000050.00</DepartureLLA>\n"
        ));
        assert!(doc.contains("        <DestinationName>Zurich</DestinationName>\n"));
        assert!(doc.ends_with("    </FlightPlan.FlightPlan>\n</SimBase.Document>\n"));
    }

    #[test]
    fn test_render_waypoint_order_and_shape() {
        let doc = render_pln(&sample_plan());

        let departure = doc.find("<ATCWaypoint id=\"LSGG\">").unwrap();
        let user = doc.find("<ATCWaypoint id=\"MONT &lt;BLANC&gt;\">").unwrap();
        let destination = doc.find("<ATCWaypoint id=\"LSZH\">").unwrap();
        assert!(departure < user && user < destination);

        assert_eq!(doc.matches("<RunwayNumberFP>1</RunwayNumberFP>").count(), 2);
        assert_eq!(doc.matches("<ICAOIdent>").count(), 2);
        assert!(doc.contains(
            "<WorldPosition>N45\u{00B0} 45' 0.000\",E6\u{00B0} 52' 30.000\",+015800.00</WorldPosition>"
        ));
    }

    #[test]
    fn test_write_plan_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("route.pln");
        std::fs::write(&path, "stale").unwrap();

        write_plan(&sample_plan(), &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, render_pln(&sample_plan()));
        // Only the plan itself is left behind
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_plan_uses_default_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let plain = dir.path().join("plain.txt");
        std::fs::write(&plain, "x").unwrap();
        let path = dir.path().join("route.pln");

        write_plan(&sample_plan(), &path).unwrap();

        let mode = |p: &Path| std::fs::metadata(p).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode(&path), mode(&plain));
    }

    #[cfg(unix)]
    #[test]
    fn test_write_plan_keeps_existing_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("route.pln");
        std::fs::write(&path, "stale").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o640)).unwrap();

        write_plan(&sample_plan(), &path).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode, 0o640);
    }

    #[test]
    fn test_write_plan_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("route.pln");
        let err = write_plan(&sample_plan(), &path).unwrap_err();
        assert!(matches!(err, PlanError::Io(_)));
        assert!(!path.exists());
    }
}
