/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

//! Per-level enumeration mode schedule.
//!
//! A schedule is validated once, when it is built, and afterwards only read through
//! a [`ModeCursor`] that moves forward one level boundary at a time.

use crate::error::{ScheduleError, ScheduleResult};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use shared::{JoinMethod, NodeId};
use std::fmt;

/// How many plans the enumerator keeps for the subsets of one level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanEnumerationMode {
    /// Keep every valid plan
    All,
    /// Keep only plans that improve on the running best
    Cheapest,
    /// Only build the join described by the level's hint
    Hinted,
}

impl PlanEnumerationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanEnumerationMode::All => "ALL",
            PlanEnumerationMode::Cheapest => "CHEAPEST",
            PlanEnumerationMode::Hinted => "HINTED",
        }
    }
}

impl fmt::Display for PlanEnumerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pins one level of enumeration to joining `node` with `method`, on the given side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinHint {
    pub node: NodeId,
    pub method: JoinMethod,
    pub is_left_child: bool,
}

impl JoinHint {
    pub fn new(node: NodeId, method: JoinMethod, is_left_child: bool) -> Self {
        Self {
            node,
            method,
            is_left_child,
        }
    }
}

impl fmt::Display for JoinHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = if self.is_left_child { "left" } else { "right" };
        write!(f, "HINTED({},{},{})", self.node, self.method, side)
    }
}

/// One schedule entry: starting at `level`, enumerate with `mode`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubsetLevelMode {
    pub level: usize,
    pub mode: PlanEnumerationMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<JoinHint>,
}

impl SubsetLevelMode {
    pub fn new(level: usize, mode: PlanEnumerationMode) -> Self {
        Self {
            level,
            mode,
            hint: None,
        }
    }

    pub fn hinted(level: usize, hint: JoinHint) -> Self {
        Self {
            level,
            mode: PlanEnumerationMode::Hinted,
            hint: Some(hint),
        }
    }

    pub fn is_hinted(&self) -> bool {
        self.mode == PlanEnumerationMode::Hinted
    }

    fn has_required_hint(&self) -> bool {
        !self.is_hinted() || self.hint.is_some()
    }
}

impl fmt::Display for SubsetLevelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.mode, &self.hint) {
            (PlanEnumerationMode::Hinted, Some(hint)) => write!(f, "{}:{}", self.level, hint),
            (mode, _) => write!(f, "{}:{}", self.level, mode),
        }
    }
}

/// Validated, immutable schedule of enumeration modes per subset level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ScheduleRepr", into = "Vec<SubsetLevelMode>")]
pub struct PerSubsetLevelEnumerationMode {
    modes: Vec<SubsetLevelMode>,
}

impl PerSubsetLevelEnumerationMode {
    /// Single-entry schedule applying `mode` to every level.
    ///
    /// Fails for [`PlanEnumerationMode::Hinted`], which needs a hint per level.
    pub fn from_mode(mode: PlanEnumerationMode) -> ScheduleResult<Self> {
        if mode == PlanEnumerationMode::Hinted {
            return Err(ScheduleError::MissingHint { level: 0 });
        }
        Ok(Self {
            modes: vec![SubsetLevelMode::new(0, mode)],
        })
    }

    /// Builds a schedule from explicit entries, validating every invariant eagerly
    pub fn new(modes: Vec<SubsetLevelMode>) -> ScheduleResult<Self> {
        validate_schedule(&modes)?;
        Ok(Self { modes })
    }

    pub fn entries(&self) -> &[SubsetLevelMode] {
        &self.modes
    }

    /// Hints of the HINTED entries, with the level each applies to. A hint attached to
    /// an ALL or CHEAPEST entry is never consulted and is not listed.
    pub fn hints(&self) -> impl Iterator<Item = (usize, &JoinHint)> {
        self.modes
            .iter()
            .filter(|m| m.is_hinted())
            .filter_map(|m| m.hint.as_ref().map(|hint| (m.level, hint)))
    }

    pub fn cursor(&self) -> ModeCursor<'_> {
        ModeCursor {
            modes: &self.modes,
            position: 0,
        }
    }
}

impl fmt::Display for PerSubsetLevelEnumerationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, mode) in self.modes.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", mode)?;
        }
        Ok(())
    }
}

/// Accepted serialized forms: a bare mode name or a list of entries
#[derive(Deserialize)]
#[serde(untagged)]
enum ScheduleRepr {
    Single(PlanEnumerationMode),
    Levels(Vec<SubsetLevelMode>),
}

impl TryFrom<ScheduleRepr> for PerSubsetLevelEnumerationMode {
    type Error = ScheduleError;

    fn try_from(repr: ScheduleRepr) -> Result<Self, Self::Error> {
        match repr {
            ScheduleRepr::Single(mode) => Self::from_mode(mode),
            ScheduleRepr::Levels(modes) => Self::new(modes),
        }
    }
}

impl From<PerSubsetLevelEnumerationMode> for Vec<SubsetLevelMode> {
    fn from(schedule: PerSubsetLevelEnumerationMode) -> Self {
        schedule.modes
    }
}

fn validate_schedule(modes: &[SubsetLevelMode]) -> ScheduleResult<()> {
    let first = modes.first().ok_or(ScheduleError::Empty)?;
    if first.level != 0 {
        return Err(ScheduleError::FirstLevelNotZero(first.level));
    }
    if !first.has_required_hint() {
        return Err(ScheduleError::MissingHint { level: 0 });
    }

    let mut hinted_nodes: FxHashSet<NodeId> = FxHashSet::default();
    if let (PlanEnumerationMode::Hinted, Some(hint)) = (first.mode, &first.hint) {
        hinted_nodes.insert(hint.node);
    }

    for pair in modes.windows(2) {
        let (previous, current) = (&pair[0], &pair[1]);

        if !current.has_required_hint() {
            return Err(ScheduleError::MissingHint {
                level: current.level,
            });
        }

        if previous.level >= current.level {
            return Err(ScheduleError::NonAscendingLevels {
                previous: previous.level,
                current: current.level,
            });
        }

        if previous.is_hinted() && current.level - previous.level != 1 {
            return Err(ScheduleError::GapAfterHint {
                hinted: previous.level,
                current: current.level,
            });
        }

        if let (PlanEnumerationMode::Hinted, Some(hint)) = (current.mode, &current.hint) {
            if !hinted_nodes.insert(hint.node) {
                return Err(ScheduleError::RepeatedHintNode {
                    node: hint.node,
                    level: current.level,
                });
            }
            continue;
        }

        if previous.mode == current.mode {
            return Err(ScheduleError::RepeatedMode {
                mode: current.mode.as_str(),
                previous: previous.level,
                current: current.level,
            });
        }
    }
    Ok(())
}

/// Forward-only view over a validated schedule
#[derive(Debug, Clone)]
pub struct ModeCursor<'a> {
    modes: &'a [SubsetLevelMode],
    position: usize,
}

impl<'a> ModeCursor<'a> {
    pub fn current(&self) -> &'a SubsetLevelMode {
        &self.modes[self.position]
    }

    /// The entry following the current one, if any
    pub fn upcoming(&self) -> Option<&'a SubsetLevelMode> {
        self.modes.get(self.position + 1)
    }

    /// Moves to the next entry when it starts exactly at `level`, then returns the
    /// entry in effect. Must be called once per level, in increasing level order.
    pub fn advance_to(&mut self, level: usize) -> &'a SubsetLevelMode {
        if let Some(next) = self.upcoming() {
            if next.level == level {
                self.position += 1;
            }
        }
        self.current()
    }
}
