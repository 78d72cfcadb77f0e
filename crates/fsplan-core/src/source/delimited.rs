// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use super::{AttrValue, Feature, FeatureSource, SourceOptions};
use crate::coord::GeoPoint;
use crate::PlanError;
use log::debug;
use std::collections::HashMap;
use std::io::Read;

/// Reads a headed CSV file where two columns hold the point coordinates.
/// Rows with an empty, unparsable or non-finite coordinate become features
/// without geometry.
pub fn read_csv<R: Read>(reader: R, options: &SourceOptions) -> Result<FeatureSource, PlanError> {
    let mut rdr = ::csv::ReaderBuilder::new()
        .flexible(true)
        .trim(::csv::Trim::All)
        .from_reader(reader);

    let fields: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    let column = |name: &str| {
        fields
            .iter()
            .position(|f| f.eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                PlanError::InvalidSource(format!("missing coordinate column '{}'", name))
            })
    };
    let idx_lon = column(&options.lon_field)?;
    let idx_lat = column(&options.lat_field)?;

    let mut features = Vec::new();
    for record in rdr.records() {
        let record = record?;

        let coordinate = |idx: usize| {
            record
                .get(idx)
                .and_then(|s| s.parse::<f64>().ok())
                .filter(|v| v.is_finite())
        };
        let geometry = match (coordinate(idx_lon), coordinate(idx_lat)) {
            (Some(lon), Some(lat)) => Some(GeoPoint::new(lon, lat)),
            _ => {
                debug!(
                    "CSV row has no usable coordinates — line={:?}",
                    record.position().map(|p| p.line())
                );
                None
            }
        };

        let attributes: HashMap<String, AttrValue> = fields
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), parse_cell(record.get(i).unwrap_or(""))))
            .collect();

        features.push(Feature {
            geometry,
            attributes,
        });
    }

    Ok(FeatureSource::new(fields, features))
}

fn parse_cell(cell: &str) -> AttrValue {
    if cell.is_empty() {
        AttrValue::Null
    } else if let Some(value) = cell.parse::<f64>().ok().filter(|v| v.is_finite()) {
        AttrValue::Number {
            value,
            text: cell.to_string(),
        }
    } else {
        AttrValue::Text(cell.to_string())
    }
}
