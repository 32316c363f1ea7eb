use std::{fs::OpenOptions, io};

use actix_web::{web, App, HttpServer};
use sea_orm::Database;
use tracing::{info, Level};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{filter, fmt, layer::SubscriberExt, EnvFilter, Layer, Registry};

use crate::auth::Authority;

mod config;
mod consts;
mod utils;

mod entity;
mod error;
mod auth;
mod intake;
mod payroll;
mod pages;

#[actix_web::main]
async fn main() -> io::Result<()> {
    let _ = dotenvy::dotenv();

    let log_path = config::log_file();
    let log_file = OpenOptions::new()
        .append(true)
        .create(true)
        .open(&log_path)?;

    let subscriber = Registry::default()
        .with(
            fmt::layer()
                .with_ansi(true)
                .with_line_number(true)
                .with_filter(EnvFilter::from_default_env())
        )
        .with(
            fmt::layer()
                .with_ansi(false)
                .with_writer(log_file)
                .with_filter(filter::LevelFilter::from_level(Level::TRACE))
        );

    tracing::subscriber::set_global_default(subscriber).map_err(io::Error::other)?;

    info!("Loaded environment `LOG_FILE`, appending trace log to `{log_path}`");

    let config::Config {
        host_address,
        database_opt,
        jwt_key
    } = config::load().map_err(io::Error::other)?;

    let database = web::Data::new(Database::connect(database_opt).await.map_err(io::Error::other)?);
    let authority = web::Data::new(Authority::new(jwt_key.as_bytes()));

    let server = HttpServer::new(move || {
        App::new()
            .app_data(database.clone())
            .app_data(authority.clone())
            .wrap(TracingLogger::default())
            .configure(pages::config)
    })
    .bind(host_address)?;

    for address in server.addrs() {
        info!(%address, "payroll service listening");
    }

    server.run().await
}
