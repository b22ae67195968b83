mod config;
mod db;
mod error;
mod job_controller;
mod services;

use crate::config::Config;
use crate::job_controller::state::{start_job_updater, JobsState};
use actix_web::{web, App, HttpServer};
use env_logger::Env;
use log::info;
use std::io;

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    // Create the schema up front so the first import does not race on it.
    db::open(&config.database).map_err(io::Error::other)?;
    info!("Using database {}", config.database.display());

    let (jobs_state, rx) = JobsState::new(100);
    let updater_state = jobs_state.clone();
    tokio::spawn(async move {
        start_job_updater(updater_state, rx).await;
    });

    info!("Server running at {}", config.url());

    let bind = (config.host.clone(), config.port);
    let payload_limit = config.max_payload_bytes;
    HttpServer::new(move || {
        App::new()
            .app_data(web::JsonConfig::default().limit(payload_limit))
            .app_data(web::Data::new(jobs_state.clone()))
            .app_data(web::Data::new(config.clone()))
            .service(services::import::configure_routes())
    })
    .bind(bind)?
    .run()
    .await
}
