use actix_web::web;

use crate::error::PayrollError;

mod period;
mod record;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg
        .app_data(json_config())
        .service(web::scope("/period")
            .configure(period::config))
        .configure(record::config);
}

/// Malformed bodies are rejected like any other bad input
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _| PayrollError::bad_input(err.to_string()).into())
}
