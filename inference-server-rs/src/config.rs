//! Server configuration from the environment

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::error::ServerError;

pub const MODEL_DIR_VAR: &str = "SM_MODEL_DIR";
pub const BIND_ADDR_VAR: &str = "INFERENCE_SERVER_ADDR";
pub const DEFAULT_MODEL_DIR: &str = "/opt/ml/model";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Request bodies above this size are refused
pub const MAX_BODY_BYTES: usize = 64 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub model_dir: PathBuf,
    pub bind_addr: SocketAddr,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ServerError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ServerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let model_dir = lookup(MODEL_DIR_VAR).unwrap_or_else(|| DEFAULT_MODEL_DIR.to_string());
        let addr = lookup(BIND_ADDR_VAR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = addr
            .parse()
            .map_err(|_| ServerError::InvalidAddress(addr.clone()))?;

        Ok(Self {
            model_dir: PathBuf::from(model_dir),
            bind_addr,
        })
    }
}
