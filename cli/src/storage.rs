//! `vk-storage get <key> | set <key> <value>`.

use std::io::Write;

use anyhow::Result;
use vk_core::{methods, Session, Transport};

use crate::args::StorageCommand;

pub fn run<T: Transport>(session: &mut Session<T>, command: &StorageCommand, out: &mut impl Write) -> Result<()> {
    match command {
        StorageCommand::Get { key } => {
            let resp = session.call(&methods::storage_get(key)?)?;
            writeln!(out, "{}", methods::storage_value(&resp, key)?)?;
        }
        StorageCommand::Set { key, value } => {
            let resp = session.call(&methods::storage_set(key, value)?)?;
            writeln!(out, "{}", methods::render(resp.payload()?))?;
        }
    }
    Ok(())
}
