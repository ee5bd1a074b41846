use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::ArgMatches;
use env_logger::Env;
use log::{info, warn};

use bedmaker_core::{
    BedmakerConfig, ConversionRequest, DispatchError, Dispatcher, ExperimentType, InputType,
    RunOutcome, ToolPaths,
};
use bedmaker_pipeline::{PipelineError, PipelineManager};

/// How a run ended, when it did not end in an error.
#[derive(Debug, PartialEq, Eq)]
pub enum Completion {
    Completed,
    Aborted,
}

/// Set up `env_logger` from `--silent`/`--verbosity`. `RUST_LOG` still takes precedence.
pub fn init_logging(matches: &ArgMatches) {
    let level = if matches.get_flag("silent") {
        "warn"
    } else {
        matches
            .get_one::<String>("verbosity")
            .map(String::as_str)
            .unwrap_or("info")
    };

    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

/// Tool locations from the optional config file, with environment overrides applied.
pub fn load_tools(config: Option<&Path>) -> Result<ToolPaths> {
    let tools = match config {
        Some(path) => {
            BedmakerConfig::try_from(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?
                .tools
        }
        None => ToolPaths::default(),
    };
    Ok(tools.with_env_overrides())
}

/// Matches items from CLAP args and runs a single conversion through the pipeline manager.
pub fn run_bedmaker(matches: &ArgMatches) -> Result<Completion> {
    let input_file = matches
        .get_one::<PathBuf>("input-file")
        .expect("input file is required");

    let is_tf = *matches
        .get_one::<bool>("chip-exp")
        .expect("experiment type is required");

    let input_type = matches
        .get_one::<String>("input-type")
        .expect("input type is required");

    let outfolder = matches
        .get_one::<PathBuf>("outfolder")
        .expect("outfolder has a default");

    // unsupported types fail before anything is written
    let input_type = InputType::from_str(input_type)?;
    let tools = load_tools(matches.get_one::<PathBuf>("config").map(PathBuf::as_path))?;

    println!("Got input type: {}", input_type);
    println!("Converting {} to BED format", input_file.display());

    let mut manager = PipelineManager::bed_maker()
        .with_outfolder(outfolder.clone())
        .new_start(matches.get_flag("new-start"))
        .recover(matches.get_flag("recover"))
        .finish()
        .context("Failed to start the pipeline")?;

    let request = ConversionRequest::new(
        input_file,
        input_type,
        ExperimentType::from(is_tf),
        manager.outfolder(),
    );
    let mut dispatcher = Dispatcher::new(request, tools);

    match dispatcher.dispatch(&mut manager) {
        Ok(RunOutcome::Executed) => info!("Conversion finished"),
        Ok(RunOutcome::Skipped) => info!("BED file already present, nothing to convert"),
        Err(DispatchError::Execution(PipelineError::Interrupted)) => {
            if let Err(flag_err) = manager.abort_pipeline() {
                warn!("Failed to record the aborted status: {}", flag_err);
            }
            return Ok(Completion::Aborted);
        }
        Err(err) => return Err(record_failure(&mut manager, err.into())),
    }

    manager.stop_pipeline()?;
    Ok(Completion::Completed)
}

/// Mark the pipeline failed and hand back `err`, even if the status could not be written.
fn record_failure(manager: &mut PipelineManager, err: anyhow::Error) -> anyhow::Error {
    if let Err(flag_err) = manager.fail_pipeline(&err) {
        warn!("Failed to record the failed status: {}", flag_err);
    }
    err
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::cli::build_parser;
    use bedmaker_core::BedmakerError;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};
    use std::fs::{read_to_string, write};
    use tempfile::TempDir;

    #[fixture]
    fn workdir() -> TempDir {
        tempfile::tempdir().unwrap()
    }

    /// A config that swaps `bigBedToBed` for `cp`, so conversions can run anywhere.
    fn copy_config(dir: &Path) -> PathBuf {
        let path = dir.join("bedmaker.toml");
        write(&path, "[tools]\nbigbed_to_bed = \"cp\"\n").unwrap();
        path
    }

    fn matches_for(args: &[&str]) -> ArgMatches {
        let mut argv = vec!["bedmaker"];
        argv.extend_from_slice(args);
        build_parser().try_get_matches_from(argv).unwrap()
    }

    #[rstest]
    fn test_load_tools_default() {
        let tools = load_tools(None).unwrap();
        assert_eq!(tools.macs2, ToolPaths::default().with_env_overrides().macs2);
    }

    #[rstest]
    fn test_load_tools_missing_file() {
        let result = load_tools(Some(Path::new("/nonexistent/bedmaker.toml")));
        assert!(result.is_err());
    }

    #[rstest]
    fn test_run_bedmaker_converts_and_completes(workdir: TempDir) {
        let input = workdir.path().join("sample1.bb");
        write(&input, "chr1\t1\t2\n").unwrap();
        let config = copy_config(workdir.path());
        let outfolder = workdir.path().join("out");

        let matches = matches_for(&[
            "-f",
            input.to_str().unwrap(),
            "-c",
            "false",
            "-t",
            "bigBed",
            "-o",
            outfolder.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ]);

        assert_eq!(run_bedmaker(&matches).unwrap(), Completion::Completed);
        assert_eq!(read_to_string(outfolder.join("sample1.bed")).unwrap(), "chr1\t1\t2\n");
        assert!(outfolder.join("bed_maker_completed.flag").exists());

        // second invocation skips and still completes
        assert_eq!(run_bedmaker(&matches).unwrap(), Completion::Completed);
    }

    #[rstest]
    fn test_run_bedmaker_unsupported_type(workdir: TempDir) {
        let outfolder = workdir.path().join("out");
        let matches = matches_for(&[
            "-f",
            "/data/sample1.bam",
            "-c",
            "true",
            "-t",
            "bam",
            "-o",
            outfolder.to_str().unwrap(),
        ]);

        let err = run_bedmaker(&matches).unwrap_err();

        assert_eq!(
            err.downcast_ref::<BedmakerError>(),
            Some(&BedmakerError::UnsupportedConversion("bam".to_string()))
        );
        assert!(!outfolder.exists());
    }

    #[rstest]
    fn test_record_failure_keeps_error_when_flag_cannot_be_written(workdir: TempDir) {
        let outfolder = workdir.path().join("out");
        let mut manager = PipelineManager::bed_maker()
            .with_outfolder(outfolder.clone())
            .finish()
            .unwrap();
        std::fs::remove_dir_all(&outfolder).unwrap();

        let original = PipelineError::MissingTarget(outfolder.join("sample1.bed"));
        let err = record_failure(&mut manager, original.into());

        assert!(matches!(
            err.downcast_ref::<PipelineError>(),
            Some(PipelineError::MissingTarget(_))
        ));
    }

    #[rstest]
    fn test_run_bedmaker_tool_failure_marks_failed(workdir: TempDir) {
        let input = workdir.path().join("missing.bb");
        let config = copy_config(workdir.path());
        let outfolder = workdir.path().join("out");

        let matches = matches_for(&[
            "-f",
            input.to_str().unwrap(),
            "-c",
            "true",
            "-t",
            "bigBed",
            "-o",
            outfolder.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ]);

        let err = run_bedmaker(&matches).unwrap_err();

        assert!(err.to_string().contains("`cp` failed"));
        assert!(outfolder.join("bed_maker_failed.flag").exists());
        assert!(!outfolder.join("sample1.bed").exists());
    }
}
