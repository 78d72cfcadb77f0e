// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

pub mod coord;
pub mod feedback;
pub mod order_by;
pub mod plan;
pub mod pln;
pub mod source;
pub mod strips;

use std::fmt;
use std::path::Path;
use thiserror::Error;

pub use coord::GeoPoint;
pub use feedback::{Feedback, LogFeedback, NoFeedback};
pub use plan::{build_plan, FlightPlan, PlanOptions, UserWaypoint};
pub use pln::{render_pln, write_plan};
pub use source::{AttrValue, Feature, FeatureSource, SourceOptions};
pub use strips::{Strip, StripIndex};

/// Which end of the route an airport belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Departure,
    Destination,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Departure => write!(f, "departure"),
            Role::Destination => write!(f, "destination"),
        }
    }
}

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("Invalid waypoint source: {0}")]
    InvalidSource(String),
    #[error("Departure point is missing")]
    MissingDeparture,
    #[error("Destination point is missing")]
    MissingDestination,
    #[error("Custom {role} airport ICAO ID not found: {icao}")]
    AirportNotFound { role: Role, icao: String },
    #[error("Strips dataset contains no airports")]
    NoStrips,
    #[error("Invalid ordering expression: {0}")]
    InvalidOrderBy(String),
    #[error("Unknown field in ordering expression: {0}")]
    UnknownField(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("GeoJSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reads the waypoint source, resolves both airports and writes the `.PLN`
/// file. Nothing is written unless every step before it succeeded.
pub fn make_flight_plan<P: AsRef<Path>>(
    source: &FeatureSource,
    strips: &StripIndex,
    options: &PlanOptions,
    output: P,
    feedback: &mut dyn Feedback,
) -> Result<FlightPlan, PlanError> {
    let plan = build_plan(source, strips, options, feedback)?;
    write_plan(&plan, output)?;
    Ok(plan)
}
