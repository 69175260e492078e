#![deny(clippy::all)]

use clap::{App, Arg, ArgMatches};

use lazy_static::lazy_static;
use thiserror::Error;

use std::collections::HashMap;
use std::fs::File;
use std::io;

mod cartesian;
pub mod puzzles;
mod settings;

pub use settings::Settings;

type Error = anyhow::Error;
type Actor = Box<dyn (Fn(Box<dyn std::io::Read>, &Settings) -> Result<(), Error>) + Send + Sync + 'static>;

macro_rules! lab {
    ($name:ident) => {
        (stringify!($name), Box::new(puzzles::$name::main) as Actor)
    };
}

lazy_static! {
    static ref SOLVERS: HashMap<&'static str, Actor> = {
        let mut s: HashMap<&'static str, Actor> = HashMap::new();
        let labs: Vec<(&'static str, Actor)> = vec![
            lab!(rabbit_leap),
            lab!(missionaries),
            lab!(eight_puzzle),
            lab!(marble_solitaire),
            lab!(sat),
            lab!(melody),
            lab!(grid_world),
            lab!(plagiarism),
        ];

        for (name, func) in labs.into_iter() {
            s.insert(name, func);
        }

        s
    };
}

/// Names of every lab which can be run.
pub fn labs() -> Vec<&'static str> {
    let mut names: Vec<_> = SOLVERS.keys().copied().collect();
    names.sort_unstable();
    names
}

fn app() -> App<'static, 'static> {
    App::new("AI Search Labs")
        .version("1.0")
        .author("Alex Rudy <opensource@alexrudy.net>")
        .about("Solve classic search and local search exercises")
        .arg(
            Arg::with_name("lab")
                .value_name("LAB")
                .required(true)
                .takes_value(true),
        )
        .arg(
            Arg::with_name("input")
                .value_name("INPUT")
                .required(false)
                .takes_value(true),
        )
        .arg(
            Arg::with_name("seed")
                .long("seed")
                .value_name("SEED")
                .help("Seed for the random number generator")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("beam-width")
                .long("beam-width")
                .short("w")
                .value_name("WIDTH")
                .help("Number of candidates kept by beam search")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("limit")
                .long("limit")
                .short("l")
                .value_name("STEPS")
                .help("Maximum number of expansions or iterations")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("verbose")
                .long("verbose")
                .short("v")
                .value_name("EVERY")
                .help("Log progress every EVERY steps")
                .takes_value(true),
        )
}

fn settings(matches: &ArgMatches<'_>) -> Result<Settings, Error> {
    let mut settings = Settings::default();
    if let Some(seed) = matches.value_of("seed") {
        settings.seed = Some(seed.parse()?);
    }
    if let Some(width) = matches.value_of("beam-width") {
        settings.beam_width = width.parse()?;
    }
    if let Some(limit) = matches.value_of("limit") {
        settings.limit = Some(limit.parse()?);
    }
    if let Some(verbose) = matches.value_of("verbose") {
        settings.verbose = Some(verbose.parse()?);
    }
    Ok(settings)
}

pub fn solver() -> Result<(), Error> {
    let matches = app().get_matches();

    let lab = matches
        .value_of("lab")
        .map(|l| l.replace('-', "_"))
        .unwrap_or_default();
    let settings = settings(&matches)?;
    println!("Lab {}", lab);

    let actor = SOLVERS
        .get(lab.as_str())
        .ok_or_else(|| LabError::LabNotFound(lab.clone()))?;
    let reader = get_input_reader(&lab, matches.value_of("input"))?;

    actor(reader, &settings)
}

type IOResult<T> = std::io::Result<T>;
type BoxedRead = Box<dyn ::std::io::Read + 'static>;

pub fn get_input_reader(lab: &str, filename: Option<&str>) -> Result<BoxedRead, Error> {
    let reader: Box<dyn ::std::io::Read + 'static> = match filename {
        Some("-") => Box::new(::std::io::stdin()),
        Some(path) => {
            let f: File = File::open(path).map_err(LabError::InputNotFound)?;
            Box::new(f)
        }
        None => get_default_input(lab).map_err(|e| LabError::DefaultInputNotFound(lab.to_string(), e))?,
    };
    Ok(reader)
}

pub fn get_default_input(lab: &str) -> IOResult<BoxedRead> {
    let mut p = ::std::path::PathBuf::from("puzzles");
    p.push(lab);
    p.push("input.txt");

    let f = File::open(p)?;

    Ok(Box::new(f))
}

#[derive(Debug, Error)]
pub enum LabError {
    #[error("No lab named {0}")]
    LabNotFound(String),

    #[error("Input not found: puzzles/{0}/input.txt")]
    DefaultInputNotFound(String, #[source] io::Error),

    #[error("Input not readable")]
    InputNotFound(#[from] io::Error),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
