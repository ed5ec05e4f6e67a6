use std::io;
use std::time::Duration;

/// A specialized `Result` for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while sending a request or reading its response.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Connecting, writing the request, or reading the response failed.
    #[error("io error: {0}")]
    Io(#[from] io::Error),

    /// The wire did not produce a response before its deadline.
    #[error("no response within {0:?}")]
    Timeout(Duration),

    /// The response head, a header, or a cookie directive is malformed.
    #[error("malformed response: {0}")]
    Format(String),

    /// The target or a redirect location can not be used.
    #[error("invalid url: {0}")]
    Url(String),

    /// The TLS layer could not be set up.
    #[error("tls error: {0}")]
    Tls(String),
}

impl Error {
    /// Whether the failure may go away when the request is sent again.
    ///
    /// Only socket failures and timeouts qualify; a malformed response or a
    /// bad URL fails the same way every time.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Io(_) | Error::Timeout(_))
    }
}

impl From<httparse::Error> for Error {
    fn from(err: httparse::Error) -> Self {
        Error::Format(err.to_string())
    }
}

impl From<http_types::url::ParseError> for Error {
    fn from(err: http_types::url::ParseError) -> Self {
        Error::Url(err.to_string())
    }
}
