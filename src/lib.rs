pub mod apis;
pub mod config;
pub mod constants;
pub mod error;
pub mod http_client;
pub mod logging;
pub mod pipeline;
pub mod ports;
pub mod progress;
pub mod storage;
pub mod transform;
pub mod types;

pub use config::EtlConfig;
pub use error::{ErrorKind, EtlError, Result};
pub use pipeline::{Pipeline, PipelineReport};
