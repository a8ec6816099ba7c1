//! Defines the `Error` and `Result` types that this crate uses.

use std::error::Error;
use std::fmt::Display;
use std::io::Error as IoError;

use mrlens_series::error::StoreError;
use tinytemplate::error::Error as TinyTemplateError;

/// The result type that uses [VisError] as the error type.
pub type Result<T> = std::result::Result<T, VisError>;

/// The error type for rendering the overlay chart and the matchup table.
#[derive(Debug)]
pub enum VisError {
    /// A [std::io::Error] encountered while writing the rendered files.
    Io(IoError),

    /// A [tinytemplate::error::Error] encountered while registering or
    /// rendering a page template.
    TemplateError(TinyTemplateError),

    /// A [serde_json::Error] encountered while serializing a chart
    /// specification.
    Json(serde_json::Error),

    /// A [StoreError] encountered while saving the overlay settings.
    Store(StoreError),

    /// The chart canvas failed to create or destroy a chart.
    Canvas(String),
}

impl Error for VisError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            VisError::Io(error) => Some(error),
            VisError::TemplateError(error) => Some(error),
            VisError::Json(error) => Some(error),
            VisError::Store(error) => Some(error),
            VisError::Canvas(_) => None,
        }
    }
}

impl Display for VisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let vis_error = "vis error:";

        match self {
            VisError::Io(error) => write!(f, "{vis_error} I/O error: {error}"),
            VisError::TemplateError(error) => write!(f, "{vis_error} template error: {error}"),
            VisError::Json(error) => write!(f, "{vis_error} JSON serialization error: {error}"),
            VisError::Store(error) => write!(f, "{vis_error} {error}"),
            VisError::Canvas(message) => write!(f, "{vis_error} chart canvas error: {message}"),
        }
    }
}

impl From<TinyTemplateError> for VisError {
    fn from(error: TinyTemplateError) -> Self {
        VisError::TemplateError(error)
    }
}

impl From<IoError> for VisError {
    fn from(error: IoError) -> Self {
        VisError::Io(error)
    }
}

impl From<serde_json::Error> for VisError {
    fn from(error: serde_json::Error) -> Self {
        VisError::Json(error)
    }
}

impl From<StoreError> for VisError {
    fn from(error: StoreError) -> Self {
        VisError::Store(error)
    }
}
