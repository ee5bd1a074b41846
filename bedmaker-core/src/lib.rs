//! # bedmaker-core
//!
//! Core types for turning genomic signal tracks (bedGraph, bigWig, bigBed) into BED files.
//!
//! ## Purpose
//!
//! bedmaker does not parse or convert any genomic data itself. Conversion is delegated
//! to external tools (`macs2`, `bigWigToBedGraph`, `bigBedToBed`). This crate decides
//! *which* tool to run, with *which* arguments, and *where* the output should land:
//!
//! - **`ConversionRequest`**: the immutable description of one conversion
//! - **`derive_target`**: deterministic `<outfolder>/<stem>.bed` naming
//! - **`CommandSelector`**: maps input type and experiment type to a `CommandKind`
//! - **`Dispatcher`**: drives a request through an [`Executor`](dispatch::Executor)
//!
//! Running the command (and skipping it when the target already exists) is the job of
//! an executor; `bedmaker-pipeline` provides the one used by the CLI.
//!
//! ## Example
//!
//! ```rust
//! use std::path::Path;
//! use bedmaker_core::{CommandSelector, ConversionRequest, ExperimentType, ToolPaths, derive_target};
//!
//! let request = ConversionRequest::parse(
//!     "/data/sample1.bedgraph",
//!     "bedGraph",
//!     ExperimentType::TfExperiment,
//!     "out",
//! ).unwrap();
//!
//! let target = derive_target(request.input_path(), request.output_dir()).unwrap();
//! assert_eq!(target, Path::new("out/sample1.bed"));
//!
//! let command = CommandSelector::new(ToolPaths::default()).select(&request, &target);
//! assert_eq!(
//!     command.to_string(),
//!     "macs2 bdgpeakcall -i /data/sample1.bedgraph -o out/sample1.bed"
//! );
//! ```
pub mod command;
pub mod config;
pub mod consts;
pub mod dispatch;
pub mod errors;
pub mod models;
pub mod target;

pub use command::{CommandKind, CommandSelector, Invocation};
pub use config::{BedmakerConfig, ToolPaths};
pub use dispatch::{DispatchError, DispatchPlan, DispatchState, Dispatcher, Executor, RunOutcome};
pub use errors::{BedmakerError, Result};
pub use models::{ConversionRequest, ExperimentType, InputType};
pub use target::derive_target;
