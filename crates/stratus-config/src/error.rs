use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "Could not determine a data directory on this platform.\n\
        Set the STRATUS_DATA_DIR environment variable to choose one explicitly"
    )]
    DataDirNotFound,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
