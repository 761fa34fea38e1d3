use std::io;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unable to read terminal size: {0}")]
    TerminalSize(#[source] io::Error),

    #[error("terminal i/o failed: {0}")]
    Terminal(#[from] io::Error),

    #[error("input device failed: {0}")]
    Input(#[source] io::Error),

    #[error("food catalog must contain at least one kind")]
    EmptyCatalog,
}

pub type Result<T> = std::result::Result<T, Error>;
