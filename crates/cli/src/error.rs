use std::fmt::Display;
use std::io;

use mrlens_series::error::StoreError;
use mrlens_vis::error::VisError;

use crate::fetch::error::FetchError;

#[derive(Debug)]
pub(crate) enum CliError {
    Vis(VisError),
    Store(StoreError),
    Fetch(FetchError),
    Io(io::Error),
    Csv(csv::Error),
    Path(String),
    Argument(String),
    NotFound(String),
}

impl From<VisError> for CliError {
    fn from(error: VisError) -> Self {
        CliError::Vis(error)
    }
}

impl From<StoreError> for CliError {
    fn from(error: StoreError) -> Self {
        CliError::Store(error)
    }
}

impl From<FetchError> for CliError {
    fn from(error: FetchError) -> Self {
        CliError::Fetch(error)
    }
}

impl From<io::Error> for CliError {
    fn from(error: io::Error) -> Self {
        CliError::Io(error)
    }
}

impl From<csv::Error> for CliError {
    fn from(error: csv::Error) -> Self {
        CliError::Csv(error)
    }
}

impl Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cli_error = "CLI error:";

        match self {
            CliError::Vis(error) => write!(f, "{cli_error} {error}"),
            CliError::Store(error) => write!(f, "{cli_error} {error}"),
            CliError::Fetch(error) => write!(f, "{cli_error} {error}"),
            CliError::Io(error) => write!(f, "{cli_error} I/O error: {error}"),
            CliError::Csv(error) => write!(f, "{cli_error} CSV error: {error}"),
            CliError::Path(error) => write!(f, "{cli_error} {error}"),
            CliError::Argument(error) => write!(f, "{cli_error} invalid argument: {error}"),
            CliError::NotFound(error) => write!(f, "{cli_error} {error}"),
        }
    }
}

impl std::error::Error for CliError {}
