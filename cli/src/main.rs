/*
 * Copyright © 2025 Volodymyr Kadzhaia
 * Copyright © 2025 Pieter Bonte
 * KU Leuven — Stream Intelligence Lab, Belgium
 *
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this file,
 * you can obtain one at https://mozilla.org/MPL/2.0/.
 */

use clap::Parser;
use joinorder::{parse_schedule, EnumerationStrategy, LoadedQuery, PlanTreeShape};
use rayon::prelude::*;
use serde_json::json;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "joinorder-cli",
    version = "0.1.0",
    author = "Volodymyr Kadzhaia <vkadzhaia@gmail.com>",
    author = "Pieter Bonte <pieter.bonte@kuleuven.be>",
    about = "Enumerate join orders for JSON query descriptions",
    long_about = "Join order CLI - loads one or more JSON query descriptions (collections, cardinalities, indexes and join predicates), runs the dynamic-programming join enumerator on each and prints the resulting plan table."
)]
struct Args {
    #[arg(short, long = "query", help = "Query description file, may be repeated", value_name = "FILE", required = true)]
    queries: Vec<String>,

    #[arg(short, long, help = "Plan tree shape: left-deep, right-deep or zig-zag", value_name = "SHAPE")]
    shape: Option<PlanTreeShape>,

    #[arg(short, long, help = "Enumeration mode schedule, e.g. \"0:ALL,2:CHEAPEST\"", value_name = "SCHEDULE")]
    modes: Option<String>,

    #[arg(long, help = "Enable or disable hash join build side pruning", value_name = "BOOL")]
    prune_hj: Option<bool>,

    #[arg(long, help = "Enumerate without a cost model")]
    no_cost: bool,

    #[arg(long, help = "Print a JSON summary instead of the plan table")]
    json: bool,
}

impl Args {
    /// The query file's strategy with command line overrides applied
    fn strategy_for(&self, query: &LoadedQuery) -> Result<EnumerationStrategy, String> {
        let mut strategy = query.strategy.clone().unwrap_or_default();
        if let Some(shape) = self.shape {
            strategy = strategy.with_plan_shape(shape);
        }
        if let Some(modes) = &self.modes {
            strategy = strategy.with_mode(parse_schedule(modes).map_err(|e| e.to_string())?);
        }
        if let Some(prune) = self.prune_hj {
            strategy = strategy.with_hj_order_pruning(prune);
        }
        Ok(strategy)
    }

    fn run(&self, path: &str) -> Result<String, String> {
        let query = LoadedQuery::from_file(path).map_err(|e| e.to_string())?;
        let strategy = self.strategy_for(&query)?;
        let table = query
            .enumerate(&strategy, !self.no_cost)
            .map_err(|e| e.to_string())?;

        if self.json {
            let output = json!({ "query": path, "summary": table.summary() });
            serde_json::to_string_pretty(&output).map_err(|e| e.to_string())
        } else {
            Ok(format!("== {} ({})\n{}", path, strategy, table))
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Each run owns its own plan registry, so files are enumerated independently
    let results: Vec<Result<String, String>> =
        args.queries.par_iter().map(|path| args.run(path)).collect();

    let mut failed = false;
    for (path, result) in args.queries.iter().zip(results) {
        match result {
            Ok(output) => println!("{}", output),
            Err(e) => {
                eprintln!("{}: {}", path, e);
                failed = true;
            }
        }
    }

    if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}
