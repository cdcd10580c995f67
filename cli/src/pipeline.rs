//! Step runner for the binaries.
//!
//! A utility is a fixed sequence of steps: parse args, validate args, exec
//! command.
//! The first failing step aborts the rest and is reported as one log line
//! `<step>: <cause>`; a clean run ends with the request count.

use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::{debug, error, info};

/// Run one named step, tagging its error with the step name.
pub fn step<T>(name: &'static str, f: impl FnOnce() -> Result<T>) -> Result<T> {
    debug!("start {name:?} step");
    f().context(name)
}

/// Report the outcome of a run. `Ok` carries the number of API requests made.
pub fn finish(outcome: Result<u64>) -> ExitCode {
    match outcome {
        Ok(requests) => {
            info!("made {requests} API requests");
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}
