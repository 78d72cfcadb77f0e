// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::coord::GeoPoint;
use crate::PlanError;
use log::{debug, warn};
use rstar::{PointDistance, RTree, RTreeObject, AABB};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Airport reference data shipped with the crate.
const BUNDLED_STRIPS: &str = include_str!("../data/strips.csv");

/// An airport reference record.
#[derive(Debug, Clone, PartialEq)]
pub struct Strip {
    pub icao: String,
    pub name_short: String,
    pub lat: f64,
    pub lon: f64,
}

impl Strip {
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.lon, self.lat)
    }
}

#[derive(Deserialize)]
struct StripRecord {
    #[serde(default)]
    icao: String,
    #[serde(default)]
    nameshort: String,
    #[serde(deserialize_with = "csv::invalid_option")]
    lat: Option<f64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    lon: Option<f64>,
}

/// A strip's slot in the R-tree.
#[derive(Debug, Clone, Copy)]
struct IndexedStrip {
    idx: usize,
    lon: f64,
    lat: f64,
}

impl RTreeObject for IndexedStrip {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.lon, self.lat])
    }
}

impl PointDistance for IndexedStrip {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlon = self.lon - point[0];
        let dlat = self.lat - point[1];
        dlon * dlon + dlat * dlat
    }
}

/// Airport strips with a spatial index for nearest-neighbour lookups.
///
/// Distances are planar in degrees, which is what a spatial index over a
/// geographic layer measures.
#[derive(Debug)]
pub struct StripIndex {
    strips: Vec<Strip>,
    tree: RTree<IndexedStrip>,
}

impl StripIndex {
    pub fn new(strips: Vec<Strip>) -> Self {
        let indexed: Vec<IndexedStrip> = strips
            .iter()
            .enumerate()
            .map(|(idx, s)| IndexedStrip {
                idx,
                lon: s.lon,
                lat: s.lat,
            })
            .collect();
        Self {
            strips,
            tree: RTree::bulk_load(indexed),
        }
    }

    /// The dataset compiled into the crate.
    pub fn bundled() -> Result<Self, PlanError> {
        Self::from_reader(BUNDLED_STRIPS.as_bytes())
    }

    pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Self, PlanError> {
        let file = File::open(path.as_ref()).map_err(|e| {
            PlanError::InvalidSource(format!(
                "cannot open strips dataset {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Self::from_reader(BufReader::new(file))
    }

    /// Parses `icao,nameshort,lat,lon` rows. Rows without an id or finite
    /// coordinates are skipped.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, PlanError> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut strips = Vec::new();
        for (line, record) in rdr.deserialize::<StripRecord>().enumerate() {
            let record = record?;
            match (record.lat, record.lon) {
                (Some(lat), Some(lon))
                    if !record.icao.is_empty() && lat.is_finite() && lon.is_finite() =>
                {
                    strips.push(Strip {
                        icao: record.icao,
                        name_short: record.nameshort,
                        lat,
                        lon,
                    })
                }
                _ => warn!(
                    "Skipping strip without id or coordinates — row={} icao={}",
                    line + 1,
                    record.icao
                ),
            }
        }

        debug!("Built strips index — strips={}", strips.len());
        Ok(Self::new(strips))
    }

    pub fn len(&self) -> usize {
        self.strips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strips.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Strip> {
        self.strips.iter()
    }

    /// Case-insensitive identifier lookup; the first match wins.
    pub fn find_icao(&self, icao: &str) -> Option<&Strip> {
        let wanted = icao.trim();
        self.strips
            .iter()
            .find(|s| s.icao.eq_ignore_ascii_case(wanted))
    }

    pub fn nearest(&self, point: GeoPoint) -> Option<&Strip> {
        self.tree
            .nearest_neighbor(&[point.lon, point.lat])
            .map(|entry| &self.strips[entry.idx])
    }
}
