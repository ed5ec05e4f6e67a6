use std::fmt;
use std::sync::Arc;

/// The bytes of an HTTP request, ready to be written to a socket.
///
/// Cloning is cheap, so a request can be sent again by a retrying wire or
/// moved onto another task by a timed one.
#[derive(Clone, PartialEq, Eq)]
pub struct Request {
    bytes: Arc<[u8]>,
}

impl Request {
    /// Create a request from raw bytes.
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        let bytes: Vec<u8> = bytes.into();
        Self {
            bytes: bytes.into(),
        }
    }

    /// The bytes to send.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of bytes in the request.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the request has no bytes at all.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl From<&str> for Request {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Request {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<Vec<u8>> for Request {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Request")
            .field(&String::from_utf8_lossy(&self.bytes))
            .finish()
    }
}
