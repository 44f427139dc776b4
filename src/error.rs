//! Error types for the Domo API client.
//!
//! Every fallible operation in this crate returns [`Error`]. Variants map
//! onto the failure classes a caller has to tell apart: authentication,
//! resource calls answered with an unexpected status, caller input rejected
//! before any request is made, and chunked-upload planning defects.

use thiserror::Error;

/// A specialized `Result` type for Domo operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for all Domo API operations.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed before a response was received
    #[error("HTTP error: {0}")]
    Http(#[source] reqwest::Error),

    /// Request exceeded the configured timeout
    #[error("Request timeout")]
    Timeout,

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV encoding or decoding failed
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Local I/O failed (reading or writing CSV files)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Token exchange failed, or a request was rejected twice in a row
    /// after a token renewal.
    #[error("Authentication failed (status={status:?}): {message}")]
    Authentication {
        /// HTTP status of the failing response, if one was received
        status: Option<u16>,
        /// Response body or description of the failure
        message: String,
    },

    /// A resource call answered with a status the operation does not accept
    #[error("Error {operation} {resource}: status={status}, body={body}")]
    Resource {
        /// What was being attempted ("creating", "retrieving", ...)
        operation: &'static str,
        /// Human-readable resource description
        resource: String,
        /// HTTP status code
        status: u16,
        /// Raw response body
        body: String,
    },

    /// Caller input was rejected before any network call
    #[error("Validation error: {0}")]
    Validation(String),

    /// Planned chunk ranges do not partition the source rows.
    ///
    /// This indicates a defect in chunk planning, not a recoverable
    /// condition.
    #[error("Upload integrity violated: {0}")]
    UploadIntegrity(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Error::Timeout
        } else {
            Error::Http(err)
        }
    }
}

impl Error {
    /// Returns `true` if this error is potentially transient and the
    /// operation could be retried by the caller.
    ///
    /// The client itself never retries beyond the single renew-and-retry
    /// on a 401 response.
    ///
    /// # Example
    ///
    /// ```
    /// use domo_rs::Error;
    ///
    /// assert!(Error::Timeout.is_retryable());
    /// assert!(!Error::Validation("page size".into()).is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(_) | Error::Timeout => true,
            Error::Resource { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// Returns `true` if this is an authentication-related error.
    pub fn is_auth_error(&self) -> bool {
        matches!(self, Error::Authentication { .. })
    }

    /// Returns `true` if this error indicates a client-side issue
    /// (invalid input, bad request, etc.).
    pub fn is_client_error(&self) -> bool {
        match self {
            Error::Resource { status, .. } => *status >= 400 && *status < 500,
            Error::Validation(_) | Error::Config(_) => true,
            _ => false,
        }
    }

    /// Returns `true` if this error indicates a server-side issue.
    pub fn is_server_error(&self) -> bool {
        match self {
            Error::Resource { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Resource { status, .. } => Some(*status),
            Error::Authentication { status, .. } => *status,
            Error::Http(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub(crate) fn resource(
        operation: &'static str,
        resource: impl Into<String>,
        status: u16,
        body: impl Into<String>,
    ) -> Self {
        Error::Resource {
            operation,
            resource: resource.into(),
            status,
            body: body.into(),
        }
    }
}
