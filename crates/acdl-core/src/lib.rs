pub mod config;
pub mod logging;

pub mod batch;
pub mod downloader;
pub mod fetch;
pub mod http;
pub mod resolver;
pub mod retry;
pub mod url_model;

pub use batch::{BatchReport, BatchRunner, ItemOutcome};
pub use config::AcdlConfig;
