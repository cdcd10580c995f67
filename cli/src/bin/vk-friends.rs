use std::io;
use std::process::ExitCode;

use anyhow::Result;
use vk_cli::args::{self, FriendsCli};
use vk_cli::friends::{self, Resolution};
use vk_cli::pipeline::{finish, step};
use vk_cli::{logging, open_session};

fn main() -> ExitCode {
    let cli = match step("parse args", || Ok(args::parse::<FriendsCli, _, _>(std::env::args_os())?)) {
        Ok(cli) => cli,
        Err(err) => {
            logging::init(false);
            return finish(Err(err));
        }
    };
    logging::init(cli.api.verbose);
    finish(run(&cli))
}

fn run(cli: &FriendsCli) -> Result<u64> {
    let mut session = step("validate args", || Ok(open_session(&cli.api)?))?;
    let resolution = if cli.per_item {
        Resolution::PerItem
    } else {
        Resolution::Batch
    };
    step("exec command", || {
        friends::run(&mut session, cli.command, resolution, &mut io::stdout().lock())
    })?;
    Ok(session.requests())
}
