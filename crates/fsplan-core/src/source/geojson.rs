// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use super::{AttrValue, Feature, FeatureSource};
use crate::coord::GeoPoint;
use crate::PlanError;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::io::Read;

#[derive(Deserialize)]
#[serde(tag = "type")]
enum Document {
    FeatureCollection { features: Vec<RawFeature> },
    Feature(RawFeature),
}

#[derive(Deserialize)]
struct RawFeature {
    #[serde(default)]
    geometry: Option<RawGeometry>,
    #[serde(default)]
    properties: Option<Map<String, Value>>,
}

#[derive(Deserialize)]
struct RawGeometry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    coordinates: Value,
}

/// Reads a GeoJSON `FeatureCollection` (or a lone `Feature`) of points.
pub fn read_geojson<R: Read>(reader: R) -> Result<FeatureSource, PlanError> {
    let document: Document = serde_json::from_reader(reader)?;
    let raw_features = match document {
        Document::FeatureCollection { features } => features,
        Document::Feature(feature) => vec![feature],
    };

    let mut fields: Vec<String> = Vec::new();
    let mut features = Vec::with_capacity(raw_features.len());

    for (i, raw) in raw_features.into_iter().enumerate() {
        let geometry = match raw.geometry {
            Some(geometry) => Some(point_from_geometry(i, &geometry)?),
            None => None,
        };

        let mut attributes = HashMap::new();
        for (key, value) in raw.properties.unwrap_or_default() {
            if !fields.contains(&key) {
                fields.push(key.clone());
            }
            attributes.insert(key, attr_from_json(value));
        }

        features.push(Feature {
            geometry,
            attributes,
        });
    }

    Ok(FeatureSource::new(fields, features))
}

fn point_from_geometry(index: usize, geometry: &RawGeometry) -> Result<GeoPoint, PlanError> {
    if geometry.kind != "Point" {
        return Err(PlanError::InvalidSource(format!(
            "feature {} has a {} geometry, expected Point",
            index, geometry.kind
        )));
    }

    let position = |i: usize| {
        geometry
            .coordinates
            .as_array()
            .and_then(|coords| coords.get(i))
            .and_then(Value::as_f64)
    };
    match (position(0), position(1)) {
        (Some(lon), Some(lat)) => Ok(GeoPoint::new(lon, lat)),
        _ => Err(PlanError::InvalidSource(format!(
            "feature {} has invalid Point coordinates: {}",
            index, geometry.coordinates
        ))),
    }
}

fn attr_from_json(value: Value) -> AttrValue {
    match value {
        Value::Null => AttrValue::Null,
        Value::Number(n) => match n.as_f64() {
            Some(value) => AttrValue::Number {
                value,
                text: n.to_string(),
            },
            None => AttrValue::Null,
        },
        Value::String(s) => AttrValue::Text(s),
        Value::Bool(b) => AttrValue::Text(b.to_string()),
        other => AttrValue::Text(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_feature_collection() {
        let data = r#"{
  "type": "FeatureCollection",
  "features": [
    { "type": "Feature", "geometry": { "type": "Point", "coordinates": [6.1, 46.2] },
      "properties": { "name": "GVA", "elev": 1411, "seq": 2 } },
    { "type": "Feature", "geometry": null,
      "properties": { "name": "nowhere", "extra": true } },
    { "type": "Feature", "geometry": { "type": "Point", "coordinates": [7.5, 47.0, 900] },
      "properties": { "name": null } }
  ]
}"#;
        let source = read_geojson(Cursor::new(data)).unwrap();

        assert_eq!(source.feature_count(), 3);
        assert_eq!(source.fields(), &["elev", "name", "seq", "extra"]);

        let first = &source.features()[0];
        assert_eq!(first.geometry, Some(GeoPoint::new(6.1, 46.2)));
        assert_eq!(first.attribute("elev").as_f64(), Some(1411.0));
        assert_eq!(first.attribute("elev").as_text(), Some("1411".to_string()));

        assert!(source.features()[1].geometry.is_none());
        assert_eq!(
            source.features()[1].attribute("extra"),
            &AttrValue::Text("true".to_string())
        );

        assert_eq!(
            source.features()[2].geometry,
            Some(GeoPoint::new(7.5, 47.0))
        );
        assert!(source.features()[2].attribute("name").is_null());
    }

    #[test]
    fn test_read_single_feature() {
        let data = r#"{ "type": "Feature", "geometry": { "type": "Point", "coordinates": [1, 2] } }"#;
        let source = read_geojson(Cursor::new(data)).unwrap();
        assert_eq!(source.feature_count(), 1);
        assert!(source.fields().is_empty());
    }

    #[test]
    fn test_rejects_non_point_geometry() {
        let data = r#"{ "type": "FeatureCollection", "features": [
            { "type": "Feature", "geometry": { "type": "LineString", "coordinates": [[0, 0], [1, 1]] } }
        ] }"#;
        let err = read_geojson(Cursor::new(data)).unwrap_err();
        assert!(matches!(err, PlanError::InvalidSource(ref m) if m.contains("LineString")));
    }

    #[test]
    fn test_rejects_invalid_point_coordinates() {
        for coordinates in ["[]", r#"["6.1", "46.2"]"#, "[6.1]"] {
            let data = format!(
                r#"{{ "type": "Feature", "geometry": {{ "type": "Point", "coordinates": {coordinates} }} }}"#
            );
            let err = read_geojson(Cursor::new(data)).unwrap_err();
            assert!(
                matches!(err, PlanError::InvalidSource(ref m) if m.contains("invalid Point coordinates")),
                "unexpected error for {coordinates}: {err}"
            );
        }
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = read_geojson(Cursor::new("{ not json")).unwrap_err();
        assert!(matches!(err, PlanError::Json(_)));
    }
}
