//! Drives a [`ConversionRequest`] from target derivation to execution.
//!
//! The dispatcher owns no process handling. It hands the selected command and the target
//! path to an [`Executor`], which decides whether the command has to run at all.

use std::path::{Path, PathBuf};

use log::{debug, info};
use thiserror::Error;

use crate::command::{CommandKind, CommandSelector};
use crate::config::ToolPaths;
use crate::errors::{BedmakerError, Result};
use crate::models::ConversionRequest;
use crate::target::derive_target;

/// What an executor did with a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The command ran and produced the target.
    Executed,
    /// The target was already present, nothing ran.
    Skipped,
}

/// Runs converter commands on behalf of the dispatcher.
///
/// Implementations are expected to:
/// - skip the command when `target` already exists
/// - otherwise run it, and treat any nonzero exit as an error
/// - record `target` as produced on success
pub trait Executor {
    type Error: std::error::Error + 'static;

    fn run(&mut self, command: &CommandKind, target: &Path) -> std::result::Result<RunOutcome, Self::Error>;
}

/// Lifecycle of a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchState {
    Initialized,
    TargetDerived,
    CommandSelected,
    Dispatched,
    Completed,
    Failed,
}

/// The target path and the command that produces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchPlan {
    pub target: PathBuf,
    pub command: CommandKind,
}

#[derive(Error, Debug)]
pub enum DispatchError<E: std::error::Error + 'static> {
    #[error(transparent)]
    Plan(#[from] BedmakerError),

    #[error(transparent)]
    Execution(E),
}

pub struct Dispatcher {
    request: ConversionRequest,
    selector: CommandSelector,
    state: DispatchState,
}

impl Dispatcher {
    pub fn new(request: ConversionRequest, tools: ToolPaths) -> Self {
        Dispatcher {
            request,
            selector: CommandSelector::new(tools),
            state: DispatchState::Initialized,
        }
    }

    pub fn request(&self) -> &ConversionRequest {
        &self.request
    }

    pub fn state(&self) -> DispatchState {
        self.state
    }

    /// Derive the target and select the command without running anything.
    pub fn plan(&mut self) -> Result<DispatchPlan> {
        let target = match derive_target(self.request.input_path(), self.request.output_dir()) {
            Ok(target) => target,
            Err(err) => {
                self.state = DispatchState::Failed;
                return Err(err);
            }
        };
        self.state = DispatchState::TargetDerived;
        debug!("Target path: {}", target.display());

        let command = self.selector.select(&self.request, &target);
        self.state = DispatchState::CommandSelected;

        Ok(DispatchPlan { target, command })
    }

    ///
    /// Plan the conversion and hand it to `executor`.
    ///
    /// # Arguments
    /// - executor: the collaborator that runs (or skips) the command
    ///
    /// # Returns
    /// - whether the command was executed or skipped
    ///
    pub fn dispatch<E: Executor>(
        &mut self,
        executor: &mut E,
    ) -> std::result::Result<RunOutcome, DispatchError<E::Error>> {
        let plan = self.plan()?;

        info!("Dispatching: {}", plan.command);
        self.state = DispatchState::Dispatched;

        match executor.run(&plan.command, &plan.target) {
            Ok(outcome) => {
                self.state = DispatchState::Completed;
                Ok(outcome)
            }
            Err(err) => {
                self.state = DispatchState::Failed;
                Err(DispatchError::Execution(err))
            }
        }
    }
}
