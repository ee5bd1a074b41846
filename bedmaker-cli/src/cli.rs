use std::path::PathBuf;

use clap::builder::{BoolishValueParser, PossibleValuesParser};
use clap::{Arg, ArgAction, Command, value_parser};

use bedmaker_core::consts::DEFAULT_OUTFOLDER;

use crate::consts::{BIN_NAME, VERSION};

pub const VERBOSITY_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

pub fn build_parser() -> Command {
    Command::new(BIN_NAME)
        .bin_name(BIN_NAME)
        .version(VERSION)
        .author("Databio")
        .about("A pipeline to convert bigWig, bedGraph or bigBed files into BED format.")
        .arg(
            Arg::new("input-file")
                .long("input-file")
                .short('f')
                .required(true)
                .value_parser(value_parser!(PathBuf))
                .help("Path to the input file"),
        )
        .arg(
            Arg::new("chip-exp")
                .long("chip-exp")
                .short('c')
                .required(true)
                .action(ArgAction::Set)
                .value_parser(BoolishValueParser::new())
                .help("Is it a ChIP-Seq TF experiment (true) or a histone modification ChIP-Seq experiment (false)"),
        )
        .arg(
            Arg::new("input-type")
                .long("input-type")
                .short('t')
                .required(true)
                .help("Type of the input file: bedGraph, bigWig or bigBed"),
        )
        .arg(
            Arg::new("outfolder")
                .long("outfolder")
                .short('o')
                .default_value(DEFAULT_OUTFOLDER)
                .value_parser(value_parser!(PathBuf))
                .help("Folder to put the converted BED files in"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_parser(value_parser!(PathBuf))
                .help("TOML file with paths to the external conversion tools"),
        )
        .arg(
            Arg::new("new-start")
                .long("new-start")
                .short('N')
                .action(ArgAction::SetTrue)
                .help("Rerun the conversion even if the target BED file already exists"),
        )
        .arg(
            Arg::new("recover")
                .long("recover")
                .short('R')
                .action(ArgAction::SetTrue)
                .help("Override lock files left behind by a previous run"),
        )
        .arg(
            Arg::new("silent")
                .long("silent")
                .action(ArgAction::SetTrue)
                .conflicts_with("verbosity")
                .help("Only report warnings and errors"),
        )
        .arg(
            Arg::new("verbosity")
                .long("verbosity")
                .value_parser(PossibleValuesParser::new(VERBOSITY_LEVELS))
                .default_value("info")
                .help("Logging level"),
        )
}
