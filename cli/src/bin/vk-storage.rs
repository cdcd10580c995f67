use std::io;
use std::process::ExitCode;

use anyhow::Result;
use vk_cli::args::{self, StorageCli};
use vk_cli::pipeline::{finish, step};
use vk_cli::{logging, open_session, storage};

fn main() -> ExitCode {
    let cli = match step("parse args", || Ok(args::parse::<StorageCli, _, _>(std::env::args_os())?)) {
        Ok(cli) => cli,
        Err(err) => {
            logging::init(false);
            return finish(Err(err));
        }
    };
    logging::init(cli.api.verbose);
    finish(run(&cli))
}

fn run(cli: &StorageCli) -> Result<u64> {
    let mut session = step("validate args", || Ok(open_session(&cli.api)?))?;
    step("exec command", || {
        storage::run(&mut session, &cli.command, &mut io::stdout().lock())
    })?;
    Ok(session.requests())
}
