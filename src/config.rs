use std::{env, net::{SocketAddr, ToSocketAddrs as _}};

use sea_orm::ConnectOptions;
use thiserror::Error;
use tracing::info;

pub struct Config {
    pub host_address: SocketAddr,

    pub database_opt: ConnectOptions,

    pub jwt_key: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment `{0}` is required to be set")]
    Missing(&'static str),

    #[error("`{0}` is not in a valid format")]
    Invalid(&'static str),
}

pub fn load() -> Result<Config, ConfigError> {
    Ok(Config {
        host_address: load_host_address()?,
        database_opt: load_database_opt()?.into(),
        jwt_key: load_jwt_key()?,
    })
}

/// Where the TRACE-level log is appended to
///
/// Read before the subscriber exists, so the caller reports it once logging is up
pub fn log_file() -> String {
    resolve_log_file(env::var("LOG_FILE").ok())
}

fn resolve_log_file(var: Option<String>) -> String {
    var.filter(|path| !path.trim().is_empty())
        .unwrap_or_else(|| "trace.log".to_string())
}

fn load_host_address() -> Result<SocketAddr, ConfigError> {
    info!("Loading environment `HOST_ADDRESS`");

    let var = env::var("HOST_ADDRESS").unwrap_or_else(|_| "127.0.0.1:0".to_string());

    parse_host_address(&var)
}

fn parse_host_address(var: &str) -> Result<SocketAddr, ConfigError> {
    var.to_socket_addrs()
        .map_err(|_| ConfigError::Invalid("HOST_ADDRESS"))?
        .next()
        .ok_or(ConfigError::Invalid("HOST_ADDRESS"))
}

fn load_database_opt() -> Result<String, ConfigError> {
    info!("Loading environment `DATABASE_URL`");

    env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))
}

fn load_jwt_key() -> Result<String, ConfigError> {
    info!("Loading environment `JWT_SECRET`");

    let var = env::var("JWT_SECRET").map_err(|_| ConfigError::Missing("JWT_SECRET"))?;
    if var.is_empty() {
        return Err(ConfigError::Invalid("JWT_SECRET"))
    }

    Ok(var)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_host_address() {
        assert_eq!(parse_host_address("127.0.0.1:8080").unwrap(), "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(parse_host_address("127.0.0.1:0").unwrap().port(), 0);

        assert!(matches!(parse_host_address("127.0.0.1"), Err(ConfigError::Invalid("HOST_ADDRESS"))));
        assert!(matches!(parse_host_address("not an address"), Err(ConfigError::Invalid("HOST_ADDRESS"))));
    }

    #[test]
    fn test_resolve_log_file() {
        assert_eq!(resolve_log_file(None), "trace.log");
        assert_eq!(resolve_log_file(Some("  ".to_string())), "trace.log");
        assert_eq!(resolve_log_file(Some("/var/log/payroll.log".to_string())), "/var/log/payroll.log");
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(ConfigError::Missing("DATABASE_URL").to_string(), "environment `DATABASE_URL` is required to be set");
        assert_eq!(ConfigError::Invalid("HOST_ADDRESS").to_string(), "`HOST_ADDRESS` is not in a valid format");
    }
}
