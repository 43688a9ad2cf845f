use std::process::ExitCode;

use anyhow::Result;

use crate::args::{Cli, Command};

mod sign;
mod verify;

pub fn dispatch(cli: &Cli) -> Result<ExitCode> {
    match &cli.command {
        Command::Sign {
            key_path,
            input_csv_path,
            output,
            identity,
        } => sign::run(cli.json, key_path, input_csv_path, output, identity),
        Command::Verify {
            artifact,
            key,
            identity,
        } => verify::run(cli.json, artifact, key, identity),
    }
}
