//! The run-or-skip pipeline manager.
//!
//! This module provides [`PipelineManager`] and its builder. The manager owns the pipeline
//! output folder and everything bookkeeping-related inside it.

use std::fmt::Display;
use std::fs::{File, OpenOptions, create_dir_all, remove_file};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use bedmaker_core::consts::{DEFAULT_OUTFOLDER, PIPELINE_NAME};
use bedmaker_core::{CommandKind, Executor, RunOutcome};
use chrono::Local;
use log::{debug, info, warn};

use crate::consts::{COMMANDS_SUFFIX, LOCK_PREFIX, LOG_SUFFIX, TIMESTAMP_FORMAT};
use crate::errors::{PipelineError, Result};
use crate::flags::{PipelineStatus, set_flag};
use crate::process::supervise;

/// Builder for constructing a [`PipelineManager`].
///
/// # Examples
///
/// ```rust,no_run
/// use bedmaker_pipeline::PipelineManager;
/// use std::path::PathBuf;
///
/// # fn main() -> bedmaker_pipeline::Result<()> {
/// let manager = PipelineManager::builder("bed_maker")
///     .with_outfolder(PathBuf::from("$HOME/converted"))
///     .recover(true)
///     .finish()?;
/// # Ok(())
/// # }
/// ```
pub struct PipelineManagerBuilder {
    name: String,
    outfolder: Option<PathBuf>,
    new_start: bool,
    recover: bool,
}

impl PipelineManagerBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        PipelineManagerBuilder {
            name: name.into(),
            outfolder: None,
            new_start: false,
            recover: false,
        }
    }

    /// Sets the output folder. Environment variables in the path are expanded.
    pub fn with_outfolder(mut self, path: PathBuf) -> Self {
        self.outfolder = Some(path);
        self
    }

    /// Run commands even when their target already exists.
    pub fn new_start(mut self, new_start: bool) -> Self {
        self.new_start = new_start;
        self
    }

    /// Override lock files left behind by an earlier run.
    pub fn recover(mut self, recover: bool) -> Self {
        self.recover = recover;
        self
    }

    /// Creates the output folder, marks the pipeline as running and opens the log.
    pub fn finish(self) -> Result<PipelineManager> {
        let raw_outfolder = self
            .outfolder
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTFOLDER));
        let raw_str = raw_outfolder.to_string_lossy().into_owned();
        let expanded = shellexpand::env(&raw_str)
            .unwrap_or_else(|_| raw_str.clone().into())
            .into_owned();
        let outfolder = PathBuf::from(expanded);
        create_dir_all(&outfolder)?;

        let log = OpenOptions::new()
            .create(true)
            .append(true)
            .open(outfolder.join(format!("{}{}", self.name, LOG_SUFFIX)))?;

        let commands_path = outfolder.join(format!("{}{}", self.name, COMMANDS_SUFFIX));
        let fresh_record = !commands_path.exists();
        let mut commands = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&commands_path)?;
        if fresh_record {
            writeln!(commands, "#!/usr/bin/env bash")?;
        }

        set_flag(&outfolder, &self.name, PipelineStatus::Running)?;

        let mut manager = PipelineManager {
            name: self.name,
            outfolder,
            new_start: self.new_start,
            recover: self.recover,
            status: PipelineStatus::Running,
            started: Instant::now(),
            log,
            commands,
        };

        manager.log_line(&format!("### Pipeline run: {}", manager.name))?;
        manager.log_line(&format!("*   Started: {}", timestamp()))?;
        manager.log_line(&format!("*   Output folder: {}", manager.outfolder.display()))?;
        info!("Pipeline '{}' running in {}", manager.name, manager.outfolder.display());

        Ok(manager)
    }
}

/// Runs commands only when their targets are missing and records the pipeline's progress.
pub struct PipelineManager {
    name: String,
    outfolder: PathBuf,
    new_start: bool,
    recover: bool,
    status: PipelineStatus,
    started: Instant,
    log: File,
    commands: File,
}

impl PipelineManager {
    pub fn builder(name: impl Into<String>) -> PipelineManagerBuilder {
        PipelineManagerBuilder::new(name)
    }

    /// A builder for the default `bed_maker` pipeline.
    pub fn bed_maker() -> PipelineManagerBuilder {
        PipelineManagerBuilder::new(PIPELINE_NAME)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn outfolder(&self) -> &Path {
        &self.outfolder
    }

    pub fn status(&self) -> PipelineStatus {
        self.status
    }

    /// Lock file guarding `target` while it is produced.
    pub fn lock_path(&self, target: &Path) -> PathBuf {
        let file_name = target
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| target.to_string_lossy().replace('/', "__"));
        self.outfolder.join(format!("{}{}", LOCK_PREFIX, file_name))
    }

    ///
    /// Run `command` unless `target` already exists.
    ///
    /// A lock file marks a target as in progress. It is removed only once the command has
    /// succeeded, so a failed or interrupted run leaves its lock (and any partial target)
    /// behind, and later runs refuse that target until `recover` is set.
    ///
    /// # Arguments
    /// - command: the converter command
    /// - target: the file the command produces
    ///
    /// # Returns
    /// - `Executed` or `Skipped`
    ///
    pub fn run(&mut self, command: &CommandKind, target: &Path) -> Result<RunOutcome> {
        self.run_with(command, target, supervise)
    }

    fn run_with<S>(&mut self, command: &CommandKind, target: &Path, supervisor: S) -> Result<RunOutcome>
    where
        S: FnOnce(&CommandKind) -> Result<()>,
    {
        let lock = self.lock_path(target);
        let recovering = lock.exists();
        if recovering {
            if !self.recover {
                return Err(PipelineError::Locked(lock));
            }
            warn!("Overriding stale lock: {}", lock.display());
            remove_file(&lock)?;
        }

        if target.exists() && !self.new_start && !recovering {
            info!("Target exists: {}. Skipping.", target.display());
            self.log_line(&format!("> Target exists: `{}`, skipping `{}`", target.display(), command))?;
            return Ok(RunOutcome::Skipped);
        }

        File::create(&lock)?;
        self.execute(command, target, supervisor)?;

        match remove_file(&lock) {
            Ok(()) => {}
            Err(err) if err.kind() == ErrorKind::NotFound => {}
            Err(err) => warn!("Failed to remove lock {}: {}", lock.display(), err),
        }

        Ok(RunOutcome::Executed)
    }

    fn execute<S>(&mut self, command: &CommandKind, target: &Path, supervisor: S) -> Result<()>
    where
        S: FnOnce(&CommandKind) -> Result<()>,
    {
        let command_started = Instant::now();
        info!("Running: {}", command);
        self.log_line(&format!("> `{}` ({})", command, timestamp()))?;
        writeln!(self.commands, "{}", command)?;

        supervisor(command)?;

        if !target.exists() {
            return Err(PipelineError::MissingTarget(target.to_path_buf()));
        }

        let elapsed = command_started.elapsed();
        debug!("Command finished in {:.2?}", elapsed);
        self.log_line(&format!("  Produced `{}` in {:.2?}", target.display(), elapsed))?;
        Ok(())
    }

    /// Mark the pipeline as successfully completed.
    pub fn stop_pipeline(&mut self) -> Result<()> {
        self.finalize(PipelineStatus::Completed, None::<&str>)
    }

    /// Mark the pipeline as failed with `reason`.
    pub fn fail_pipeline(&mut self, reason: impl Display) -> Result<()> {
        self.finalize(PipelineStatus::Failed, Some(reason))
    }

    /// Mark the pipeline as aborted by the user.
    pub fn abort_pipeline(&mut self) -> Result<()> {
        self.finalize(PipelineStatus::Aborted, None::<&str>)
    }

    fn finalize(&mut self, status: PipelineStatus, reason: Option<impl Display>) -> Result<()> {
        set_flag(&self.outfolder, &self.name, status)?;
        self.status = status;

        if let Some(reason) = reason {
            self.log_line(&format!("*   Reason: {}", reason))?;
        }
        self.log_line(&format!(
            "### Pipeline {}. Elapsed time: {:.2?} ({})",
            status,
            self.started.elapsed(),
            timestamp()
        ))?;
        info!("Pipeline '{}' {}", self.name, status);
        Ok(())
    }

    fn log_line(&mut self, line: &str) -> Result<()> {
        writeln!(self.log, "{}", line)?;
        Ok(())
    }
}

impl Executor for PipelineManager {
    type Error = PipelineError;

    fn run(&mut self, command: &CommandKind, target: &Path) -> Result<RunOutcome> {
        PipelineManager::run(self, command, target)
    }
}

impl Drop for PipelineManager {
    fn drop(&mut self) {
        if !self.status.is_final() {
            if let Err(err) = self.fail_pipeline("pipeline exited without being stopped") {
                warn!("Failed to record pipeline failure: {}", err);
            }
        }
    }
}

fn timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}
