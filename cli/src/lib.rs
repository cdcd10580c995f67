//! Host side of the VK utilities.
//!
//! # Overview
//! Wires `vk-core` to the real world: clap flags become `Credentials`, a
//! ureq agent becomes the `Transport`, and the `friends` / `storage`
//! commands write their reports to any `io::Write`. The binaries in
//! `src/bin` are thin pipelines over this library.

pub mod args;
pub mod friends;
pub mod logging;
pub mod pipeline;
pub mod storage;
pub mod transport;

use vk_core::{ApiError, IntervalGate, Session};

pub use args::ApiArgs;
pub use transport::UreqTransport;

/// Session against the configured host, paced for a user token.
pub fn open_session(api: &ApiArgs) -> Result<Session<UreqTransport>, ApiError> {
    let client = api.client()?;
    Ok(Session::new(client, UreqTransport::new()).with_limiter(IntervalGate::default()))
}
