use authuser::{config::Server as Config, http::StartServerError, logging};
use clap::Parser;
use error_stack::{Result, ResultExt};
use std::net::IpAddr;
use std::num::NonZeroUsize;

/// Expose the user account HTTP server
#[derive(Debug, Parser)]
pub struct ServerCommand {
    #[clap(long)]
    pub address: Option<IpAddr>,
    #[clap(long)]
    pub port: Option<u16>,
    #[clap(long)]
    pub workers: Option<NonZeroUsize>,
}

pub fn run(args: &ServerCommand) -> Result<(), StartServerError> {
    let mut config = Config::load().change_context(StartServerError)?;
    args.override_config(&mut config);

    logging::init(&config.logging).change_context(StartServerError)?;
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .change_context(StartServerError)
        .attach_printable("could not build tokio runtime")?
        .block_on(authuser::http::run(config))
}

impl ServerCommand {
    fn override_config(&self, config: &mut Config) {
        // override server configurations if set by the cli
        if let Some(address) = self.address {
            config.http.address = address;
        }

        if let Some(port) = self.port {
            config.http.port = port;
        }

        if let Some(workers) = self.workers {
            config.http.workers = Some(workers.get());
        }
    }
}
