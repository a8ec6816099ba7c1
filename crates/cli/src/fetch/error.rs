use std::fmt::Display;
use std::io;

use reqwest::StatusCode;

pub(crate) type Result<T> = std::result::Result<T, FetchError>;

#[derive(Debug)]
pub(crate) enum FetchError {
    Http(reqwest::Error),
    Response {
        status_code: StatusCode,
        message: String,
    },
    Io(io::Error),
    Url(String),
}

impl Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let fetch_error = "fetch error:";

        match self {
            FetchError::Http(error) => write!(f, "{fetch_error} HTTP request error: {error}"),
            FetchError::Response {
                status_code,
                message,
            } => write!(
                f,
                "{fetch_error} HTTP response error: status = {status_code}, message = {message}"
            ),
            FetchError::Io(error) => {
                write!(f, "{fetch_error} saving the page failed: {error}")
            }
            FetchError::Url(error) => write!(f, "{fetch_error} invalid page URL: {error}"),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(error: reqwest::Error) -> Self {
        FetchError::Http(error)
    }
}

impl From<io::Error> for FetchError {
    fn from(error: io::Error) -> Self {
        FetchError::Io(error)
    }
}
