use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while building or showing a wheel.
#[derive(Debug, Error)]
pub enum WheelError {
    #[error("prize list is empty, a wheel needs at least one segment")]
    EmptyPrizeList,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("failed to read config file {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("failed to read font {}: {source}", path.display())]
    FontRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not a usable TrueType/OpenType font", .0.display())]
    FontParse(PathBuf),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("framebuffer error: {0}")]
    Pixels(#[from] pixels::Error),
}

pub type Result<T> = std::result::Result<T, WheelError>;
