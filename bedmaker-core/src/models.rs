use std::fmt::{self, Display};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::consts::{BDG_BROAD_CALL, BDG_PEAK_CALL};
use crate::errors::{BedmakerError, Result};

/// Signal track formats bedmaker knows how to turn into BED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputType {
    BedGraph,
    BigWig,
    BigBed,
}

impl InputType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InputType::BedGraph => "bedGraph",
            InputType::BigWig => "bigWig",
            InputType::BigBed => "bigBed",
        }
    }
}

impl FromStr for InputType {
    type Err = BedmakerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "bedGraph" => Ok(InputType::BedGraph),
            "bigWig" => Ok(InputType::BigWig),
            "bigBed" => Ok(InputType::BigBed),
            _ => Err(BedmakerError::UnsupportedConversion(s.to_string())),
        }
    }
}

impl Display for InputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of ChIP-Seq experiment the signal comes from. Decides the macs2 calling mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExperimentType {
    /// Transcription factor ChIP-Seq: narrow peaks.
    TfExperiment,
    /// Histone modification ChIP-Seq: broad regions.
    HistoneExperiment,
}

impl ExperimentType {
    /// The macs2 sub-command matching this experiment.
    pub fn peak_call_mode(&self) -> &'static str {
        match self {
            ExperimentType::TfExperiment => BDG_PEAK_CALL,
            ExperimentType::HistoneExperiment => BDG_BROAD_CALL,
        }
    }
}

impl From<bool> for ExperimentType {
    fn from(is_tf: bool) -> Self {
        if is_tf {
            ExperimentType::TfExperiment
        } else {
            ExperimentType::HistoneExperiment
        }
    }
}

impl Display for ExperimentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExperimentType::TfExperiment => f.write_str("TF ChIP-Seq"),
            ExperimentType::HistoneExperiment => f.write_str("histone ChIP-Seq"),
        }
    }
}

/// One conversion to perform. Built once from user input and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionRequest {
    input_path: PathBuf,
    input_type: InputType,
    experiment: ExperimentType,
    output_dir: PathBuf,
}

impl ConversionRequest {
    pub fn new(
        input_path: impl Into<PathBuf>,
        input_type: InputType,
        experiment: ExperimentType,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        ConversionRequest {
            input_path: input_path.into(),
            input_type,
            experiment,
            output_dir: output_dir.into(),
        }
    }

    ///
    /// Build a request from a user supplied input type string.
    ///
    /// # Arguments
    /// - input_path: file to convert
    /// - input_type: one of `bedGraph`, `bigWig` or `bigBed`
    /// - experiment: TF or histone experiment
    /// - output_dir: folder the BED file is written to
    ///
    /// # Returns
    /// - the request, or `UnsupportedConversion` for an unknown input type
    ///
    pub fn parse(
        input_path: impl Into<PathBuf>,
        input_type: &str,
        experiment: ExperimentType,
        output_dir: impl Into<PathBuf>,
    ) -> Result<Self> {
        let input_type = InputType::from_str(input_type)?;
        Ok(Self::new(input_path, input_type, experiment, output_dir))
    }

    pub fn input_path(&self) -> &Path {
        &self.input_path
    }

    pub fn input_type(&self) -> InputType {
        self.input_type
    }

    pub fn experiment(&self) -> ExperimentType {
        self.experiment
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}
