use std::path::PathBuf;

/// Errors that can stop the game from starting or keep the terminal from
/// being driven.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Terminal or file I/O failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid TOML or has unknown keys.
    #[error("parse error in {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// The configuration parsed but describes an unplayable game.
    #[error("invalid configuration: {detail}")]
    InvalidConfig { detail: String },
}

pub type Result<T> = std::result::Result<T, Error>;
