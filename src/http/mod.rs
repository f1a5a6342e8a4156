use actix_cors::Cors;
use actix_web::{web, HttpServer};
use error_stack::{Result, ResultExt};
use thiserror::Error;
use tracing_actix_web::TracingLogger;

use crate::{config, App};

pub mod controllers;
pub mod error;
pub mod util;

pub use error::Error;

#[derive(Debug, Error)]
#[error("Failed to start HTTP server")]
pub struct StartServerError;

const CORS_MAX_AGE_SECS: usize = 3600;

/// Registers every route along with the extractor error handlers.
pub fn configure(cfg: &mut web::ServiceConfig) {
    util::configure_extractors(cfg);
    controllers::configure(cfg);
}

#[tracing::instrument(skip_all)]
pub async fn run(config: config::Server) -> Result<(), StartServerError> {
    let app = App::new(&config).await.change_context(StartServerError)?;
    let address = (config.http.address, config.http.port);

    let mut server = HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header()
            .max_age(CORS_MAX_AGE_SECS);

        actix_web::App::new()
            .app_data(web::Data::new(app.clone()))
            .wrap(cors)
            .wrap(TracingLogger::default())
            .configure(configure)
    });

    if let Some(workers) = config.http.workers {
        server = server.workers(workers);
    }

    let server = server
        .bind(address)
        .change_context(StartServerError)
        .attach_printable_lazy(|| format!("could not bind to {}:{}", address.0, address.1))?;

    tracing::info!(address = %address.0, port = address.1, "listening for requests");
    server.run().await.change_context(StartServerError)
}
