//! # bedmaker-pipeline
//!
//! A small run-or-skip pipeline manager. It runs converter commands only when their target
//! is missing, and keeps bookkeeping in the output folder:
//!
//! - `<name>_<status>.flag`: exactly one of `running`, `completed`, `failed`, `aborted`
//! - `<name>_log.md`: timestamped record of the run
//! - `<name>_commands.sh`: every command that was executed
//! - `lock.<target>`: present while a target is being produced
//!
//! [`PipelineManager`] implements [`bedmaker_core::Executor`], so it can be handed straight
//! to a [`bedmaker_core::Dispatcher`].
pub mod consts;
pub mod errors;
pub mod flags;
pub mod manager;
mod process;

pub use errors::{PipelineError, Result};
pub use flags::PipelineStatus;
pub use manager::{PipelineManager, PipelineManagerBuilder};
