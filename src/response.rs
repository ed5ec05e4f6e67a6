use futures_lite::io::{AsyncRead, AsyncReadExt, Cursor};

use std::fmt;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::{Error, Result};

type Source = Box<dyn AsyncRead + Send + Unpin + 'static>;

/// The raw bytes of an HTTP response, as returned by a [`Wire`](crate::Wire).
///
/// The crate never looks inside a response beyond the head boundary; it is
/// just a byte source to be read through a [`HeadReader`](crate::HeadReader)
/// or collected whole.
pub struct Response {
    source: Source,
}

impl Response {
    /// Create a response streaming from `reader`.
    pub fn from_reader<R>(reader: R) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        Self {
            source: Box::new(reader),
        }
    }

    /// Create a response from bytes already in memory.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        let bytes: Vec<u8> = bytes.into();
        Self::from_reader(Cursor::new(bytes))
    }

    /// Read the whole response into memory.
    pub async fn into_bytes(mut self) -> io::Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.source.read_to_end(&mut bytes).await?;
        Ok(bytes)
    }

    /// Read the whole response as UTF-8 text.
    pub async fn into_string(self) -> Result<String> {
        let bytes = self.into_bytes().await?;
        String::from_utf8(bytes).map_err(|e| Error::Format(e.to_string()))
    }
}

impl AsyncRead for Response {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut [u8],
    ) -> Poll<io::Result<usize>> {
        Pin::new(&mut self.source).poll_read(cx, buf)
    }
}

impl fmt::Debug for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Response").finish()
    }
}
