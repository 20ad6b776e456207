/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Physical join algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JoinMethod {
    /// Nested loop join
    #[serde(rename = "NLJ")]
    NestedLoop,
    /// Hash join, left child is the build side
    #[serde(rename = "HJ")]
    Hash,
    /// Indexed nested loop join, right child is an index probe
    #[serde(rename = "INLJ")]
    IndexedNestedLoop,
}

impl JoinMethod {
    /// Order in which the generator tries methods for one join pair
    pub const ENUMERATION_ORDER: [JoinMethod; 3] = [
        JoinMethod::IndexedNestedLoop,
        JoinMethod::Hash,
        JoinMethod::NestedLoop,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JoinMethod::NestedLoop => "NLJ",
            JoinMethod::Hash => "HJ",
            JoinMethod::IndexedNestedLoop => "INLJ",
        }
    }
}

impl fmt::Display for JoinMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JoinMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "NLJ" => Ok(JoinMethod::NestedLoop),
            "HJ" => Ok(JoinMethod::Hash),
            "INLJ" => Ok(JoinMethod::IndexedNestedLoop),
            other => Err(format!("unknown join method '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("hj".parse::<JoinMethod>(), Ok(JoinMethod::Hash));
        assert_eq!("INLJ".parse::<JoinMethod>(), Ok(JoinMethod::IndexedNestedLoop));
        assert!("merge".parse::<JoinMethod>().is_err());
    }

    #[test]
    fn test_serde_uses_short_names() {
        let json = serde_json::to_string(&JoinMethod::NestedLoop).unwrap();
        assert_eq!(json, "\"NLJ\"");
        let method: JoinMethod = serde_json::from_str("\"HJ\"").unwrap();
        assert_eq!(method, JoinMethod::Hash);
    }
}
