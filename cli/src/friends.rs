//! `vk-friends online | list`.
//!
//! Fetches friend ids, resolves display names with `users.get`, and prints
//! a numbered roster in the order the ids arrived. Nothing is written
//! unless every lookup succeeds.

use std::collections::HashMap;
use std::io::Write;

use anyhow::Result;
use tracing::debug;
use vk_core::methods::{self, USERS_GET_BATCH};
use vk_core::{ApiError, Session, Transport, User};

use crate::args::FriendsCommand;

/// How display names are looked up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Resolution {
    /// One `users.get` call per `USERS_GET_BATCH` ids.
    #[default]
    Batch,
    /// One `users.get` call per id. Only sensible with a paced session.
    PerItem,
}

impl Resolution {
    fn chunk_size(self) -> usize {
        match self {
            Resolution::Batch => USERS_GET_BATCH,
            Resolution::PerItem => 1,
        }
    }
}

pub fn run<T: Transport>(
    session: &mut Session<T>,
    command: FriendsCommand,
    resolution: Resolution,
    out: &mut impl Write,
) -> Result<()> {
    let (descriptor, title) = match command {
        FriendsCommand::List => (methods::friends_get(), "friends"),
        FriendsCommand::Online => (methods::friends_get_online(), "friends online"),
    };
    let ids = methods::friend_ids(&session.call(&descriptor)?)?;
    let roster = resolve_all(session, &ids, resolution)?;

    writeln!(out, "{title} ({}):", ids.len())?;
    for (n, user) in roster.iter().enumerate() {
        writeln!(out, "\t{:4} {} (ID={})", n + 1, user.display_name(), user.id)?;
    }
    Ok(())
}

/// Every id resolved before anything is printed, so a failed lookup leaves
/// no half-written roster behind.
fn resolve_all<T: Transport>(
    session: &mut Session<T>,
    ids: &[u64],
    resolution: Resolution,
) -> Result<Vec<User>, ApiError> {
    let mut roster = Vec::with_capacity(ids.len());
    for chunk in ids.chunks(resolution.chunk_size()) {
        roster.extend(resolve(session, chunk, resolution)?);
    }
    Ok(roster)
}

/// Users for `chunk`, in the same order as `chunk`.
fn resolve<T: Transport>(
    session: &mut Session<T>,
    chunk: &[u64],
    resolution: Resolution,
) -> Result<Vec<User>, ApiError> {
    let descriptor = match resolution {
        Resolution::Batch => methods::users_get(chunk)?,
        Resolution::PerItem => methods::user_get(chunk[0]),
    };
    debug!(ids = chunk.len(), "resolving names");
    let by_id: HashMap<u64, User> = methods::users(&session.call(&descriptor)?)?
        .into_iter()
        .map(|user| (user.id, user))
        .collect();

    chunk
        .iter()
        .map(|id| {
            by_id
                .get(id)
                .cloned()
                .ok_or_else(|| ApiError::Decode(format!("users.get returned nothing for id {id}")))
        })
        .collect()
}
