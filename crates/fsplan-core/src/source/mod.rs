// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

pub mod delimited;
pub mod geojson;

use crate::coord::GeoPoint;
use crate::PlanError;
use log::info;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// An attribute cell. Numbers keep the text they were read from, so a
/// numeric-looking name such as `0042` is written back unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Null,
    Number { value: f64, text: String },
    Text(String),
}

static NULL_VALUE: AttrValue = AttrValue::Null;

impl AttrValue {
    pub fn number(value: f64) -> Self {
        AttrValue::Number {
            value,
            text: value.to_string(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttrValue::Null)
    }

    /// Finite numeric view of the value. Text is parsed, so `"1500"` reads as
    /// 1500 while `"nan"` reads as nothing.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Number { value, .. } => Some(*value),
            AttrValue::Text(s) => s.trim().parse::<f64>().ok(),
            AttrValue::Null => None,
        }
        .filter(|v| v.is_finite())
    }

    pub fn as_text(&self) -> Option<String> {
        match self {
            AttrValue::Number { text, .. } | AttrValue::Text(text) => Some(text.clone()),
            AttrValue::Null => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub geometry: Option<GeoPoint>,
    pub attributes: HashMap<String, AttrValue>,
}

impl Feature {
    /// Value of `field`, or `Null` when the feature has no such attribute.
    pub fn attribute(&self, field: &str) -> &AttrValue {
        self.attributes.get(field).unwrap_or(&NULL_VALUE)
    }
}

/// Column names used to pull point geometry out of tabular sources.
#[derive(Debug, Clone)]
pub struct SourceOptions {
    pub lon_field: String,
    pub lat_field: String,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            lon_field: "lon".to_string(),
            lat_field: "lat".to_string(),
        }
    }
}

/// A point layer: ordered features plus the attribute field names they carry.
#[derive(Debug, Clone, Default)]
pub struct FeatureSource {
    fields: Vec<String>,
    features: Vec<Feature>,
}

impl FeatureSource {
    pub fn new(fields: Vec<String>, features: Vec<Feature>) -> Self {
        Self { fields, features }
    }

    /// Opens a waypoint file, picking the reader from its extension.
    pub fn open<P: AsRef<Path>>(path: P, options: &SourceOptions) -> Result<Self, PlanError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        let file = File::open(path).map_err(|e| {
            PlanError::InvalidSource(format!("cannot open {}: {}", path.display(), e))
        })?;
        let reader = BufReader::new(file);

        let source = match extension.as_str() {
            "csv" => delimited::read_csv(reader, options)?,
            "geojson" | "json" => geojson::read_geojson(reader)?,
            other => {
                return Err(PlanError::InvalidSource(format!(
                    "unsupported file type '{}' for {}",
                    other,
                    path.display()
                )))
            }
        };

        info!(
            "Loaded waypoint source — path={} features={} fields={}",
            path.display(),
            source.features.len(),
            source.fields.len()
        );
        Ok(source)
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    /// Resolves a field name, exact match first, then ignoring case.
    pub fn lookup_field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.as_str() == name)
            .or_else(|| self.fields.iter().find(|f| f.eq_ignore_ascii_case(name)))
            .map(String::as_str)
    }
}
