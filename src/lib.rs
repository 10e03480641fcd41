pub mod command;
pub mod config;
pub mod driver;
pub mod extsort;

use config::ConfigError;
use extsort::SortError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Derived IO error
    #[error("Io error: {0}")]
    Io(#[from] std::io::Error),

    /// Command line arguments could not be parsed
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Sort error: {0}")]
    Sort(#[from] SortError),
}
