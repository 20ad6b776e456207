/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Text form of an enumeration mode schedule, e.g.
//! `0:ALL, 2:HINTED(3,HJ,left), 3:CHEAPEST`.

use super::mode::{JoinHint, PerSubsetLevelEnumerationMode, PlanEnumerationMode, SubsetLevelMode};
use crate::error::ScheduleParseError;
use nom::{
    branch::alt,
    bytes::complete::tag_no_case,
    character::complete::{char, digit1, multispace0},
    combinator::{map, map_res, value},
    multi::separated_list1,
    IResult,
};
use shared::JoinMethod;

fn number(input: &str) -> IResult<&str, usize> {
    map_res(digit1, |digits: &str| digits.parse::<usize>())(input)
}

fn join_method(input: &str) -> IResult<&str, JoinMethod> {
    // INLJ before NLJ so the longer name wins
    alt((
        value(JoinMethod::IndexedNestedLoop, tag_no_case("INLJ")),
        value(JoinMethod::NestedLoop, tag_no_case("NLJ")),
        value(JoinMethod::Hash, tag_no_case("HJ")),
    ))(input)
}

fn side(input: &str) -> IResult<&str, bool> {
    alt((
        value(true, tag_no_case("left")),
        value(false, tag_no_case("right")),
    ))(input)
}

fn separator(c: char) -> impl FnMut(&str) -> IResult<&str, char> {
    move |input| {
        let (input, _) = multispace0(input)?;
        let (input, found) = char(c)(input)?;
        let (input, _) = multispace0(input)?;
        Ok((input, found))
    }
}

// HINTED(node, method, side)
fn hinted(input: &str) -> IResult<&str, JoinHint> {
    let (input, _) = tag_no_case("HINTED")(input)?;
    let (input, _) = separator('(')(input)?;
    let (input, node) = number(input)?;
    let (input, _) = separator(',')(input)?;
    let (input, method) = join_method(input)?;
    let (input, _) = separator(',')(input)?;
    let (input, is_left_child) = side(input)?;
    let (input, _) = separator(')')(input)?;
    Ok((input, JoinHint::new(node, method, is_left_child)))
}

fn level_mode(input: &str) -> IResult<&str, SubsetLevelMode> {
    let (input, _) = multispace0(input)?;
    let (input, level) = number(input)?;
    let (input, _) = separator(':')(input)?;
    let (input, entry) = alt((
        map(hinted, move |hint| SubsetLevelMode::hinted(level, hint)),
        map(
            alt((
                value(PlanEnumerationMode::All, tag_no_case("ALL")),
                value(PlanEnumerationMode::Cheapest, tag_no_case("CHEAPEST")),
            )),
            move |mode| SubsetLevelMode::new(level, mode),
        ),
    ))(input)?;
    let (input, _) = multispace0(input)?;
    Ok((input, entry))
}

fn schedule(input: &str) -> IResult<&str, Vec<SubsetLevelMode>> {
    separated_list1(char(','), level_mode)(input)
}

/// Parses a comma separated schedule. A bare mode name (`ALL`, `CHEAPEST`) is
/// accepted as shorthand for a single level-0 entry.
pub fn parse_schedule(input: &str) -> Result<PerSubsetLevelEnumerationMode, ScheduleParseError> {
    let trimmed = input.trim();
    if trimmed.eq_ignore_ascii_case("ALL") {
        return Ok(PerSubsetLevelEnumerationMode::from_mode(PlanEnumerationMode::All)?);
    }
    if trimmed.eq_ignore_ascii_case("CHEAPEST") {
        return Ok(PerSubsetLevelEnumerationMode::from_mode(
            PlanEnumerationMode::Cheapest,
        )?);
    }

    match schedule(trimmed) {
        Ok(("", entries)) => Ok(PerSubsetLevelEnumerationMode::new(entries)?),
        Ok((rest, _)) => Err(ScheduleParseError::Syntax(rest.to_string())),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            Err(ScheduleParseError::Syntax(e.input.to_string()))
        }
        Err(nom::Err::Incomplete(_)) => Err(ScheduleParseError::Syntax(trimmed.to_string())),
    }
}
