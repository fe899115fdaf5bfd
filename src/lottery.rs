use log::{debug, info, warn};

use project_lottery::builder::Builder;
use project_lottery::lottery::SeededDraws;
use project_lottery::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::Path;

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::lottery::config_reader::*;

mod config_reader;
mod io_common;
mod io_csv;
mod io_json;
mod io_xlsx;
mod io_yaml;

#[derive(Debug, Snafu)]
pub enum LotteryCliError {
    #[snafu(display("Error opening file {path}"))]
    OpeningFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing file {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error opening spreadsheet {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("No usable worksheet in {path}"))]
    EmptyExcel { path: String },
    #[snafu(display("Could not parse the YAML content of {path}"))]
    ParsingYaml {
        source: serde_yaml::Error,
        path: String,
    },
    #[snafu(display("Could not parse the JSON content of {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error reading CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno} of the CSV file"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("Line {lineno}: missing player name"))]
    MissingPlayer { lineno: usize },
    #[snafu(display("No configuration found in {path} (use the --config option)"))]
    MissingConfig { path: String },
    #[snafu(display("{source}"))]
    Lottery { source: LotteryErrors },
    #[snafu(display("{count} violation(s) detected"))]
    ValidationFailed { count: usize },
    #[snafu(display("Difference detected between calculated summary and reference summary"))]
    ReferenceMismatch {},

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

type LResult<T> = Result<T, LotteryCliError>;

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
enum InputType {
    Yaml,
    Json,
    Csv,
    Xlsx,
}

fn input_type(args: &Args) -> LResult<InputType> {
    let name = match args.input_type.as_deref() {
        Some(x) => x.to_lowercase(),
        None => Path::new(&args.input)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_else(|| "yaml".to_string()),
    };
    match name.as_str() {
        "yaml" | "yml" => Ok(InputType::Yaml),
        "json" => Ok(InputType::Json),
        "csv" => Ok(InputType::Csv),
        "xlsx" => Ok(InputType::Xlsx),
        x if args.input_type.is_none() => {
            debug!("input_type: unknown extension {:?}, reading as yaml", x);
            Ok(InputType::Yaml)
        }
        x => whatever!("Input type not implemented: {:?}", x),
    }
}

/// Reads the ballots, and the configuration if the file carries one.
fn read_vote_data(
    args: &Args,
    raw: &[u8],
) -> LResult<(Option<FileConfigs>, Vec<Ballot>)> {
    let path = args.input.clone();
    info!("Attempting to read vote file {:?}", path);
    match input_type(args)? {
        InputType::Yaml => io_yaml::parse_yaml_votes(raw, &path),
        InputType::Json => io_json::parse_json_votes(raw, &path),
        InputType::Csv => Ok((None, io_csv::parse_csv_votes(raw, &path)?)),
        InputType::Xlsx => Ok((
            None,
            io_xlsx::read_xlsx_votes(&path, args.excel_worksheet_name.as_deref())?,
        )),
    }
}

fn print_preamble(rules: &LotteryRules, ballots: &[Ballot], seed: &str) {
    println!("Total votes per player: {}", rules.votes_per_person);
    println!("Counting type: {}", rules.counting_type);
    println!("Contested projects: {:?}", rules.contested_projects);
    let players: Vec<&str> = ballots.iter().map(|b| b.player.as_str()).collect();
    println!("Players: {:?}", players);
    println!("Seed: {}", seed);
    println!();
}

fn print_violations(violations: &[Violation]) {
    println!("#{}", "=".repeat(21));
    println!("# Violations detected");
    println!("#{}", "-".repeat(21));
    for v in violations.iter() {
        println!("{}", v);
    }
    println!();
    println!("Exiting...");
}

fn print_round(round: &ProjectRound) {
    println!("Project: {}", round.project);
    println!("Votes: {:?}", round.votes);
    match (&round.winner, round.winning_number) {
        (Some(winner), Some(number)) => {
            println!("Intervals: {:?}", round.intervals);
            println!("Winning Number: {}", number);
            println!(
                "Winner: {} [{}]",
                winner,
                round
                    .winner_index()
                    .map(|idx| idx.to_string())
                    .unwrap_or_default()
            );
        }
        _ => {
            println!("No one voted for this project :( Skipping...");
        }
    }
    println!();
}

fn print_outcome(res: &LotteryResult) {
    println!("Winners");
    println!("=======");
    for (player, project) in res.winners.iter() {
        println!("{} -> {}", player, project);
    }
    println!();
    println!("Unallocated");
    println!("===========");
    println!("Players: {:?}", res.unallocated_players);
    println!("Projects: {:?}", res.unallocated_projects);
}

fn rounds_to_json(res: &LotteryResult) -> Vec<JSValue> {
    let mut l: Vec<JSValue> = Vec::new();
    for round in res.rounds.iter() {
        let mut tally: JSMap<String, JSValue> = JSMap::new();
        for (name, count) in round.votes.iter() {
            tally.insert(name.clone(), json!(count.to_string()));
        }
        let intervals: Vec<JSValue> = round
            .intervals
            .iter()
            .map(|c| json!(c.to_string()))
            .collect();
        let mut js = json!({
            "round": round.round,
            "project": round.project,
            "tally": tally,
            "intervals": intervals,
        });
        if let Some(number) = round.winning_number {
            js["winningNumber"] = json!(number.to_string());
        }
        js["winner"] = json!(round.winner);
        l.push(js);
    }
    l
}

fn build_summary_js(rules: &LotteryRules, seed: &str, res: &LotteryResult) -> JSValue {
    let c = OutputConfig {
        votes_per_person: rules.votes_per_person,
        counting_type: rules.counting_type.to_string(),
        contested_projects: rules.contested_projects.clone(),
        seed: seed.to_string(),
    };
    let mut winners: JSMap<String, JSValue> = JSMap::new();
    for (player, project) in res.winners.iter() {
        winners.insert(player.clone(), json!(project));
    }
    json!({
        "config": c,
        "results": rounds_to_json(res),
        "winners": winners,
        "unallocated": {
            "players": res.unallocated_players,
            "projects": res.unallocated_projects,
        }
    })
}

fn write_summary(out: &str, pretty_js: &str) -> LResult<()> {
    if out == "stdout" {
        println!("{}", pretty_js);
    } else {
        info!("Writing summary to {:?}", out);
        fs::write(out, pretty_js).context(WritingFileSnafu {
            path: out.to_string(),
        })?;
    }
    Ok(())
}

fn check_reference(reference_path: &str, pretty_js: &str) -> LResult<()> {
    let summary_ref = read_summary(reference_path)?;
    debug!("reference summary: {:?}", summary_ref);
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {
            path: reference_path.to_string(),
        })?;
    if pretty_js_summary_ref != pretty_js {
        warn!("Found differences with the reference summary");
        print_diff(pretty_js_summary_ref.as_str(), pretty_js, "\n");
        return ReferenceMismatchSnafu {}.fail();
    }
    Ok(())
}

/// Runs the lottery as described by the command line.
///
/// A run that stops on violations returns `ValidationFailed`, after printing
/// all the violations.
pub fn run_lottery_file(args: &Args) -> LResult<LotteryResult> {
    let raw = fs::read(&args.input).context(OpeningFileSnafu {
        path: args.input.clone(),
    })?;

    let (embedded_configs, ballots) = read_vote_data(args, &raw)?;
    let configs = match &args.config {
        Some(config_path) => read_config_file(config_path)?,
        None => embedded_configs.context(MissingConfigSnafu {
            path: args.input.clone(),
        })?,
    };
    info!("configs: {:?}", configs);

    // The rules are checked before looking at any vote.
    let rules = configs.rules()?;

    // The only source of randomness for this run.
    let mut draws = SeededDraws::from_input(&raw);
    let seed = draws.seed().to_string();
    print_preamble(&rules, &ballots, &seed);

    let mut builder = Builder::new(&rules);
    for b in ballots.iter() {
        builder
            .add_ballot(&b.player, &b.votes)
            .context(LotterySnafu {})?;
    }

    let result = match builder.run(&mut draws) {
        Ok(x) => x,
        Err(LotteryErrors::Violations(vs)) => {
            print_violations(&vs);
            return ValidationFailedSnafu { count: vs.len() }.fail();
        }
        Err(e) => return Err(LotteryCliError::Lottery { source: e }),
    };

    for round in result.rounds.iter() {
        print_round(round);
    }
    print_outcome(&result);

    let result_js = build_summary_js(&rules, &seed, &result);
    let pretty_js = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {
        path: args.input.clone(),
    })?;

    if let Some(out) = &args.out {
        write_summary(out, &pretty_js)?;
    }

    // The reference summary, if provided for comparison
    if let Some(reference_path) = &args.reference {
        check_reference(reference_path, &pretty_js)?;
    }

    Ok(result)
}
