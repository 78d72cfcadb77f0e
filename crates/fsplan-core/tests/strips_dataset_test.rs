// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz
//
// Strips datasets loaded from disk, and coordinates the spatial index must
// never see.

use fsplan_core::{
    make_flight_plan, FeatureSource, GeoPoint, NoFeedback, PlanError, PlanOptions, SourceOptions,
    StripIndex,
};
use std::fs;

#[test]
fn test_load_csv_from_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("strips.csv");
    fs::write(
        &path,
        "icao,nameshort,lat,lon\nZZAA,Alpha Field,10.0,10.0\nZZBB,Bravo Field,20.0,20.0\nZZNN,Broken,NaN,5.0\n",
    )
    .unwrap();

    let index = StripIndex::load_csv(&path).unwrap();
    assert_eq!(index.len(), 2);
    assert_eq!(index.find_icao("zzbb").unwrap().name_short, "Bravo Field");
    assert_eq!(index.nearest(GeoPoint::new(11.0, 9.0)).unwrap().icao, "ZZAA");
    assert!(index.find_icao("LFPO").is_none());
}

#[test]
fn test_load_csv_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = StripIndex::load_csv(dir.path().join("missing.csv")).unwrap_err();
    assert!(matches!(err, PlanError::InvalidSource(ref m) if m.contains("missing.csv")));
}

#[test]
fn test_non_finite_waypoint_is_skipped() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("route.csv");
    let output = dir.path().join("route.pln");
    fs::write(&input, "name,lon,lat\nA,NaN,48.7\nB,6.0,46.3\nC,inf,47.0\n").unwrap();

    let source = FeatureSource::open(&input, &SourceOptions::default()).unwrap();
    let options = PlanOptions {
        name_field: Some("name".to_string()),
        ..PlanOptions::default()
    };
    let plan = make_flight_plan(
        &source,
        &StripIndex::bundled().unwrap(),
        &options,
        &output,
        &mut NoFeedback,
    )
    .unwrap();

    assert_eq!(plan.waypoints.len(), 1);
    assert_eq!(plan.waypoints[0].name, "B");
    assert_eq!(plan.departure.icao, "LSGG");
    assert_eq!(plan.destination.icao, "LSGG");
    assert!(output.exists());
}
