pub mod blastdb;
pub mod cli;
pub mod command;
pub mod config;
pub mod dispatch;
pub mod merge;
pub mod pipeline;
pub mod split;
pub mod workspace;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParablastError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("\"--{0}\" should be specified or found on $PATH")]
    ToolMissing(String),

    #[error("{tool} exited with {status}: {stderr}")]
    ToolFailed {
        tool: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}
