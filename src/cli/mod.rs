use clap::Parser;
use error_stack::{Result, ResultExt};
use thiserror::Error;

mod server;

#[derive(Debug, Error)]
#[error("Failed to run command")]
pub struct CommandError;

/// Command line options for authuser.
#[derive(Debug, Parser)]
#[command(about = "User account service", version, author, long_about)]
pub struct Cli {
    #[clap(subcommand)]
    pub subcommand: Subcommand,
}

impl Cli {
    pub fn run(self) -> Result<(), CommandError> {
        match self.subcommand {
            Subcommand::Server(args) => self::server::run(&args).change_context(CommandError),
        }
    }
}

#[derive(Debug, Parser)]
pub enum Subcommand {
    Server(self::server::ServerCommand),
}
