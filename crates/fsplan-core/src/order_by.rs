// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

//! Waypoint ordering: a small `ORDER BY` clause over attribute fields.
//!
//! ```text
//! seq
//! leg DESC, "Waypoint Order" ASC NULLS FIRST
//! ```

use crate::source::{AttrValue, Feature, FeatureSource};
use crate::PlanError;
use nom::{
    branch::alt,
    bytes::complete::{is_not, tag_no_case, take_while1},
    character::complete::{char, multispace0, multispace1},
    combinator::{all_consuming, map, opt, value},
    multi::separated_list1,
    sequence::{delimited, preceded, tuple},
    IResult,
};
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq)]
pub struct SortKey {
    pub field: String,
    pub ascending: bool,
    pub nulls_first: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderBy {
    keys: Vec<SortKey>,
}

fn identifier(input: &str) -> IResult<&str, String> {
    alt((
        map(delimited(char('"'), is_not("\""), char('"')), String::from),
        map(
            take_while1(|c: char| c.is_alphanumeric() || c == '_'),
            String::from,
        ),
    ))(input)
}

fn direction(input: &str) -> IResult<&str, bool> {
    preceded(
        multispace1,
        alt((
            value(true, tag_no_case("ASC")),
            value(false, tag_no_case("DESC")),
        )),
    )(input)
}

fn nulls(input: &str) -> IResult<&str, bool> {
    preceded(
        tuple((multispace1, tag_no_case("NULLS"), multispace1)),
        alt((
            value(true, tag_no_case("FIRST")),
            value(false, tag_no_case("LAST")),
        )),
    )(input)
}

fn sort_key(input: &str) -> IResult<&str, SortKey> {
    map(
        tuple((identifier, opt(direction), opt(nulls))),
        |(field, direction, nulls)| {
            let ascending = direction.unwrap_or(true);
            SortKey {
                field,
                ascending,
                // Nulls sort as the largest value unless told otherwise
                nulls_first: nulls.unwrap_or(!ascending),
            }
        },
    )(input)
}

fn order_by(input: &str) -> IResult<&str, Vec<SortKey>> {
    all_consuming(delimited(
        multispace0,
        separated_list1(delimited(multispace0, char(','), multispace0), sort_key),
        multispace0,
    ))(input)
}

impl OrderBy {
    pub fn parse(input: &str) -> Result<Self, PlanError> {
        match order_by(input) {
            Ok((_, keys)) => Ok(Self { keys }),
            Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(PlanError::InvalidOrderBy(
                format!("'{}' (unexpected input at '{}')", input.trim(), e.input),
            )),
            Err(nom::Err::Incomplete(_)) => {
                Err(PlanError::InvalidOrderBy(format!("'{}' is incomplete", input.trim())))
            }
        }
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    /// Resolves each key against the source's fields, ignoring case.
    pub fn bind(mut self, source: &FeatureSource) -> Result<Self, PlanError> {
        for key in &mut self.keys {
            let resolved = source
                .lookup_field(&key.field)
                .ok_or_else(|| PlanError::UnknownField(key.field.clone()))?;
            key.field = resolved.to_string();
        }
        Ok(self)
    }

    /// Stable sort: features with equal keys keep their source order.
    pub fn sort(&self, features: &mut [&Feature]) {
        features.sort_by(|a, b| self.compare(a, b));
    }

    fn compare(&self, a: &Feature, b: &Feature) -> Ordering {
        self.keys
            .iter()
            .map(|key| compare_values(a.attribute(&key.field), b.attribute(&key.field), key))
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }
}

fn compare_values(a: &AttrValue, b: &AttrValue, key: &SortKey) -> Ordering {
    let null_side = if key.nulls_first {
        Ordering::Less
    } else {
        Ordering::Greater
    };

    match (a, b) {
        (AttrValue::Null, AttrValue::Null) => Ordering::Equal,
        (AttrValue::Null, _) => null_side,
        (_, AttrValue::Null) => null_side.reverse(),
        _ => {
            let ord = match (a, b) {
                (AttrValue::Number { value: x, .. }, AttrValue::Number { value: y, .. }) => {
                    x.total_cmp(y)
                }
                (AttrValue::Text(x), AttrValue::Text(y)) => x.cmp(y),
                (AttrValue::Number { .. }, _) => Ordering::Less,
                _ => Ordering::Greater,
            };
            if key.ascending {
                ord
            } else {
                ord.reverse()
            }
        }
    }
}
