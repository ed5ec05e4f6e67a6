use futures_lite::io::{AsyncRead, AsyncReadExt};
use pin_project::pin_project;

use std::fmt;
use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

/// A streaming HTTP body.
///
/// Yields the bytes already pulled off the source while looking for the
/// head boundary, then whatever the source still has to give.
#[pin_project]
pub struct Body<R> {
    leftover: Vec<u8>,
    cursor: usize,
    #[pin]
    reader: Option<R>,
}

impl<R> fmt::Debug for Body<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Body")
            .field("leftover", &(self.leftover.len() - self.cursor))
            .field("exhausted", &self.reader.is_none())
            .finish()
    }
}

impl<R: AsyncRead> Body<R> {
    /// Create a body that yields `leftover` followed by the rest of `reader`.
    pub fn new(leftover: Vec<u8>, reader: R) -> Self {
        Self {
            leftover,
            cursor: 0,
            reader: Some(reader),
        }
    }

    /// Create a new empty body.
    pub fn empty() -> Self {
        Self {
            leftover: Vec::new(),
            cursor: 0,
            reader: None,
        }
    }

    /// Put `prefix` in front of the bytes this body has not yielded yet.
    pub(crate) fn prepend(mut self, prefix: &[u8]) -> Self {
        let mut leftover = prefix.to_vec();
        leftover.extend_from_slice(&self.leftover[self.cursor..]);
        self.leftover = leftover;
        self.cursor = 0;
        self
    }

    /// Read the remainder of the body into memory.
    pub async fn into_bytes(mut self) -> io::Result<Vec<u8>>
    where
        R: Unpin,
    {
        let mut bytes = Vec::new();
        self.read_to_end(&mut bytes).await?;
        Ok(bytes)
    }
}

impl<R: AsyncRead> AsyncRead for Body<R> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut [u8],
    ) -> Poll<io::Result<usize>> {
        let this = self.project();
        if *this.cursor < this.leftover.len() {
            let len = std::cmp::min(this.leftover.len() - *this.cursor, buf.len());
            buf[..len].copy_from_slice(&this.leftover[*this.cursor..*this.cursor + len]);
            *this.cursor += len;
            return Poll::Ready(Ok(len));
        }
        match this.reader.as_pin_mut() {
            None => Poll::Ready(Ok(0)),
            Some(reader) => reader.poll_read(cx, buf),
        }
    }
}
