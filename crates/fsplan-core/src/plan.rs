// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use crate::coord::GeoPoint;
use crate::feedback::Feedback;
use crate::order_by::OrderBy;
use crate::source::{Feature, FeatureSource};
use crate::strips::{Strip, StripIndex};
use crate::{PlanError, Role};
use log::{info, warn};

pub const DEFAULT_TITLE: &str = "Flight plan";
pub const DEFAULT_WAYPOINT_NAME: &str = "UNTITLED";
pub const DEFAULT_WAYPOINT_ELEVATION: f64 = 1000.0;
/// Elevation written for departure and destination airports.
pub const AIRPORT_ELEVATION: f64 = 50.0;

#[derive(Debug, Clone)]
pub struct PlanOptions {
    pub title: String,
    pub name_field: Option<String>,
    pub elevation_field: Option<String>,
    pub order_by: Option<String>,
    /// ICAO id overriding the nearest airport to the first waypoint.
    pub departure: Option<String>,
    /// ICAO id overriding the nearest airport to the last waypoint.
    pub destination: Option<String>,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            name_field: None,
            elevation_field: None,
            order_by: None,
            departure: None,
            destination: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserWaypoint {
    pub name: String,
    pub position: GeoPoint,
    pub elevation: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlightPlan {
    pub title: String,
    pub departure: Strip,
    pub waypoints: Vec<UserWaypoint>,
    pub destination: Strip,
}

/// Treats `None`, empty and blank strings alike.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn resolve_field<'a>(source: &'a FeatureSource, wanted: Option<&str>, what: &str) -> Option<&'a str> {
    let wanted = non_blank(wanted)?;
    let resolved = source.lookup_field(wanted);
    if resolved.is_none() {
        warn!(
            "Waypoint {} field not found, using defaults — field={}",
            what, wanted
        );
    }
    resolved
}

/// Assembles a flight plan from a waypoint source.
///
/// The first and last waypoints with a geometry pick the departure and
/// destination airports (nearest strip) unless an ICAO override is given.
/// Cancelling through `feedback` drops the remaining waypoints without error.
pub fn build_plan(
    source: &FeatureSource,
    strips: &StripIndex,
    options: &PlanOptions,
    feedback: &mut dyn Feedback,
) -> Result<FlightPlan, PlanError> {
    let name_field = resolve_field(source, options.name_field.as_deref(), "name");
    let elevation_field = resolve_field(source, options.elevation_field.as_deref(), "elevation");

    let mut ordered: Vec<&Feature> = source.features().iter().collect();
    if let Some(expression) = non_blank(options.order_by.as_deref()) {
        OrderBy::parse(expression)?.bind(source)?.sort(&mut ordered);
    }

    let total = if ordered.is_empty() {
        0.0
    } else {
        100.0 / ordered.len() as f64
    };

    let mut departure_point: Option<GeoPoint> = None;
    let mut destination_point: Option<GeoPoint> = None;
    let mut waypoints = Vec::with_capacity(ordered.len());

    for (current, feature) in ordered.iter().enumerate() {
        if feedback.is_canceled() {
            info!(
                "Flight plan build canceled — kept={} dropped={}",
                waypoints.len(),
                ordered.len() - current
            );
            break;
        }
        let Some(point) = feature.geometry else {
            continue;
        };

        departure_point.get_or_insert(point);
        destination_point = Some(point);

        let name = name_field
            .and_then(|f| feature.attribute(f).as_text())
            .unwrap_or_else(|| DEFAULT_WAYPOINT_NAME.to_string());

        let elevation = match elevation_field {
            Some(field) => feature.attribute(field).as_f64().unwrap_or_else(|| {
                warn!(
                    "Waypoint elevation is not a number, using default — waypoint={} default={}",
                    name, DEFAULT_WAYPOINT_ELEVATION
                );
                DEFAULT_WAYPOINT_ELEVATION
            }),
            None => DEFAULT_WAYPOINT_ELEVATION,
        };

        waypoints.push(UserWaypoint {
            name,
            position: point,
            elevation,
        });
        feedback.set_progress((current as f64 * total) as u32);
    }

    let departure_point = departure_point.ok_or(PlanError::MissingDeparture)?;
    let destination_point = destination_point.ok_or(PlanError::MissingDestination)?;

    let departure = resolve_airport(
        strips,
        Role::Departure,
        options.departure.as_deref(),
        departure_point,
    )?;
    let destination = resolve_airport(
        strips,
        Role::Destination,
        options.destination.as_deref(),
        destination_point,
    )?;

    info!(
        "Flight plan assembled — departure={} destination={} waypoints={}",
        departure.icao,
        destination.icao,
        waypoints.len()
    );

    Ok(FlightPlan {
        title: options.title.clone(),
        departure: departure.clone(),
        waypoints,
        destination: destination.clone(),
    })
}

/// Override id when given, nearest strip to `point` otherwise.
fn resolve_airport<'a>(
    strips: &'a StripIndex,
    role: Role,
    override_icao: Option<&str>,
    point: GeoPoint,
) -> Result<&'a Strip, PlanError> {
    if let Some(icao) = non_blank(override_icao) {
        return strips
            .find_icao(icao)
            .ok_or_else(|| PlanError::AirportNotFound {
                role,
                icao: icao.to_string(),
            });
    }
    strips.nearest(point).ok_or(PlanError::NoStrips)
}
