//! Supervised execution of converter commands.
//!
//! Processes are started directly (no shell). A streamed command connects the producer's
//! stdout to the consumer's stdin with an OS pipe. While waiting, an interrupt kills every
//! child and surfaces as [`PipelineError::Interrupted`].

use std::future::Future;
use std::io;
use std::process::{ExitStatus, Stdio};

use bedmaker_core::{CommandKind, Invocation};
use log::{debug, warn};
use tokio::process::{Child, Command};
use tokio::runtime;

use crate::errors::{PipelineError, Result};

struct RunningProcess<'a> {
    invocation: &'a Invocation,
    child: Child,
}

/// Run `command` to completion on a single-threaded runtime, stopping it on ctrl-c.
pub(crate) fn supervise(command: &CommandKind) -> Result<()> {
    supervise_until(command, interrupted())
}

/// Run `command` to completion, or until `interrupt` resolves.
pub(crate) fn supervise_until<F>(command: &CommandKind, interrupt: F) -> Result<()>
where
    F: Future<Output = ()>,
{
    let runtime = runtime::Builder::new_current_thread().enable_all().build()?;
    runtime.block_on(run_until_interrupted(command, interrupt))
}

async fn run_until_interrupted<F>(command: &CommandKind, interrupt: F) -> Result<()>
where
    F: Future<Output = ()>,
{
    let mut processes = spawn(command)?;

    let finished = tokio::select! {
        biased;
        _ = interrupt => None,
        statuses = wait_all(&mut processes) => Some(statuses),
    };

    match finished {
        Some(statuses) => check_statuses(command, &processes, &statuses?),
        None => {
            kill_all(&mut processes).await;
            Err(PipelineError::Interrupted)
        }
    }
}

fn spawn(command: &CommandKind) -> Result<Vec<RunningProcess<'_>>> {
    match command {
        CommandKind::DirectCall(invocation) | CommandKind::DirectConvert(invocation) => {
            let child = start(invocation, Stdio::null(), Stdio::inherit())?;
            Ok(vec![RunningProcess { invocation, child }])
        }
        CommandKind::StreamedCall { producer, consumer } => {
            let mut upstream = start(producer, Stdio::null(), Stdio::piped())?;

            let pipe: Stdio = upstream
                .stdout
                .take()
                .ok_or_else(|| io::Error::other("producer stdout was not captured"))?
                .try_into()?;

            let downstream = match start(consumer, pipe, Stdio::inherit()) {
                Ok(child) => child,
                Err(err) => {
                    if let Err(kill_err) = upstream.start_kill() {
                        warn!("Failed to stop `{}`: {}", producer.program, kill_err);
                    }
                    return Err(err);
                }
            };

            Ok(vec![
                RunningProcess {
                    invocation: producer,
                    child: upstream,
                },
                RunningProcess {
                    invocation: consumer,
                    child: downstream,
                },
            ])
        }
    }
}

fn start(invocation: &Invocation, stdin: Stdio, stdout: Stdio) -> Result<Child> {
    debug!("Starting: {}", invocation);
    Command::new(&invocation.program)
        .args(&invocation.args)
        .stdin(stdin)
        .stdout(stdout)
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| PipelineError::Spawn {
            program: invocation.program.clone(),
            source,
        })
}

async fn wait_all(processes: &mut [RunningProcess<'_>]) -> io::Result<Vec<ExitStatus>> {
    let mut statuses = Vec::with_capacity(processes.len());
    for process in processes.iter_mut() {
        statuses.push(process.child.wait().await?);
    }
    Ok(statuses)
}

async fn interrupted() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for interrupts: {}", err);
        std::future::pending::<()>().await;
    }
}

async fn kill_all(processes: &mut [RunningProcess<'_>]) {
    for process in processes.iter_mut() {
        if let Err(err) = process.child.kill().await {
            debug!("Failed to kill `{}`: {}", process.invocation.program, err);
        }
    }
}

fn check_statuses(command: &CommandKind, processes: &[RunningProcess<'_>], statuses: &[ExitStatus]) -> Result<()> {
    for (process, status) in processes.iter().zip(statuses) {
        if !status.success() {
            return Err(PipelineError::CommandFailed {
                command: command.to_string(),
                program: process.invocation.program.clone(),
                status: describe(status),
            });
        }
    }
    Ok(())
}

fn describe(status: &ExitStatus) -> String {
    match status.code() {
        Some(code) => format!("exit code {}", code),
        None => "termination by signal".to_string(),
    }
}
