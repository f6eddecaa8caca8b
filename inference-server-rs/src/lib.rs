//! Model-hosting container for the workforce cost model
//!
//! `GET /ping` answers once artifacts are loaded; `POST /invocations` runs
//! one prediction and answers `{"prediction": <number>}`.

pub mod config;
pub mod error;
pub mod server;

pub use config::ServerConfig;
pub use error::ServerError;
pub use server::InferenceServer;
