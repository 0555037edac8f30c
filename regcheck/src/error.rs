use std::io;

/// Central error type.
#[derive(Debug)]
pub enum Error {
    /// a file path without a usable module name
    Module,
    Io(io::Error),
    Reguli(reguli::Error),
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<reguli::Error> for Error {
    fn from(err: reguli::Error) -> Self {
        Self::Reguli(err)
    }
}
