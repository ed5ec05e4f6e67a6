//! Lazily splits an HTTP response into its head and its body.
//!
//! The source is read in chunks of [`READ_BUFFER_LEN`] bytes and every chunk
//! goes through a [`Scanner`] looking for the `\r\n\r\n` boundary. Bytes that
//! may be the start of a boundary completed by the next chunk are carried
//! over; everything else is handed out as head as soon as it is known not to
//! be part of the boundary.

use futures_lite::io::{AsyncRead, AsyncReadExt};
use futures_lite::ready;
use pin_project::pin_project;

use std::fmt;
use std::io;
use std::mem;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::{Body, Scanner, READ_BUFFER_LEN};

/// What a single chunk contributed.
#[derive(Debug, PartialEq)]
enum Step {
    /// Bytes known to belong to the head; the boundary is still ahead.
    Head(Vec<u8>),
    /// The boundary was found: the last head bytes and the first body bytes.
    Boundary { head: Vec<u8>, rest: Vec<u8> },
}

/// Feed `chunk` through `scanner`, moving pending bytes in and out of `carry`.
///
/// `carry` always holds the bytes of a partially matched boundary, and
/// nothing else, between two calls.
fn step(scanner: Scanner, carry: &mut Vec<u8>, chunk: &[u8]) -> (Scanner, Step) {
    let scanner = scanner.process(chunk);
    let mut head = mem::take(carry);
    if scanner.found() {
        let index = scanner.index();
        if index >= 0 {
            head.extend_from_slice(&chunk[..index as usize]);
        } else {
            head.truncate((head.len() as isize + index) as usize);
        }
        let body_start = (index + scanner.pattern().len() as isize) as usize;
        let rest = chunk[body_start..].to_vec();
        (scanner, Step::Boundary { head, rest })
    } else {
        head.extend_from_slice(chunk);
        *carry = head.split_off(head.len() - scanner.progress());
        (scanner, Step::Head(head))
    }
}

/// Reads the head of an HTTP response, stopping at the boundary.
///
/// The reader itself yields the head bytes, without the boundary. Once it
/// reports end of stream, [`HeadReader::into_body`] hands out the rest.
#[pin_project]
pub struct HeadReader<R> {
    #[pin]
    reader: R,
    scanner: Scanner,
    buf: Box<[u8]>,
    /// Possible start of the boundary, held back until the next chunk.
    carry: Vec<u8>,
    /// Head bytes ready to be handed out.
    ready: Vec<u8>,
    cursor: usize,
    /// Body bytes that came in with the last head chunk.
    rest: Vec<u8>,
    done: bool,
}

impl<R> fmt::Debug for HeadReader<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HeadReader")
            .field("scanner", &self.scanner)
            .field("carry", &self.carry.len())
            .field("done", &self.done)
            .finish()
    }
}

impl<R: AsyncRead> HeadReader<R> {
    /// Create a new instance reading from `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            scanner: Scanner::boundary(),
            buf: vec![0; READ_BUFFER_LEN].into_boxed_slice(),
            carry: Vec::new(),
            ready: Vec::new(),
            cursor: 0,
            rest: Vec::new(),
            done: false,
        }
    }

    /// Whether the head/body boundary has been seen so far.
    pub fn found(&self) -> bool {
        self.scanner.found()
    }
}

impl<R: AsyncRead + Unpin> HeadReader<R> {
    /// Read whatever is left of the head and return it along with the body.
    ///
    /// Head bytes already pulled through [`AsyncRead`] are not repeated.
    pub async fn into_parts(mut self) -> io::Result<Parts<R>> {
        let mut head = Vec::new();
        self.read_to_end(&mut head).await?;
        let HeadReader {
            reader,
            scanner,
            rest,
            ..
        } = self;
        let found = scanner.found();
        let body = if found {
            Body::new(rest, reader)
        } else {
            Body::empty()
        };
        log::trace!("< head: {} bytes, boundary found: {}", head.len(), found);
        Ok(Parts { head, found, body })
    }

    /// Skip the rest of the head and return the body.
    pub async fn into_body(self) -> io::Result<Body<R>> {
        Ok(self.into_parts().await?.body)
    }
}

impl<R: AsyncRead> AsyncRead for HeadReader<R> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut [u8],
    ) -> Poll<io::Result<usize>> {
        let mut this = self.project();
        loop {
            if *this.cursor < this.ready.len() {
                let len = std::cmp::min(this.ready.len() - *this.cursor, buf.len());
                buf[..len].copy_from_slice(&this.ready[*this.cursor..*this.cursor + len]);
                *this.cursor += len;
                return Poll::Ready(Ok(len));
            }
            if *this.done {
                return Poll::Ready(Ok(0));
            }

            let len = ready!(this.reader.as_mut().poll_read(cx, &mut this.buf[..]))?;
            *this.cursor = 0;
            if len == 0 {
                // No boundary before the end: everything read is head.
                *this.ready = mem::take(this.carry);
                *this.done = true;
                continue;
            }

            let (scanner, outcome) = step(*this.scanner, this.carry, &this.buf[..len]);
            *this.scanner = scanner;
            match outcome {
                Step::Head(head) => *this.ready = head,
                Step::Boundary { head, rest } => {
                    *this.ready = head;
                    *this.rest = rest;
                    *this.done = true;
                }
            }
        }
    }
}

/// A response taken apart at the head boundary.
#[derive(Debug)]
pub struct Parts<R> {
    /// The head, without the boundary.
    pub head: Vec<u8>,
    /// Whether a boundary was found. When it was not, the whole input is head.
    pub found: bool,
    /// Everything after the boundary.
    pub body: Body<R>,
}

impl<R: AsyncRead> Parts<R> {
    /// Put the pieces back together into the original byte stream.
    pub fn rejoin(self) -> Body<R> {
        let mut prefix = self.head;
        if self.found {
            prefix.extend_from_slice(crate::BOUNDARY);
        }
        self.body.prepend(&prefix)
    }
}

/// Split `reader` into the head bytes and the body stream.
pub async fn split<R>(reader: R) -> io::Result<(Vec<u8>, Body<R>)>
where
    R: AsyncRead + Unpin,
{
    let parts = HeadReader::new(reader).into_parts().await?;
    Ok((parts.head, parts.body))
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_lite::io::Cursor;

    const SIZE: usize = READ_BUFFER_LEN;

    async fn head_of(bytes: Vec<u8>) -> Vec<u8> {
        let mut head = Vec::new();
        HeadReader::new(Cursor::new(bytes))
            .read_to_end(&mut head)
            .await
            .unwrap();
        head
    }

    fn fill(bytes: &mut Vec<u8>, until: usize) {
        bytes.resize(until, b'a');
    }

    #[test]
    fn step_carries_a_partial_boundary() {
        let mut carry = Vec::new();
        let (scanner, outcome) = step(Scanner::boundary(), &mut carry, b"abc\r\n");
        assert_eq!(outcome, Step::Head(b"abc".to_vec()));
        assert_eq!(carry, b"\r\n");

        let (_, outcome) = step(scanner, &mut carry, b"\r\nxyz");
        assert_eq!(
            outcome,
            Step::Boundary {
                head: Vec::new(),
                rest: b"xyz".to_vec()
            }
        );
        assert!(carry.is_empty());
    }

    #[test]
    fn step_releases_a_false_start() {
        let mut carry = Vec::new();
        let (scanner, _) = step(Scanner::boundary(), &mut carry, b"ab\r\n\r");
        let (_, outcome) = step(scanner, &mut carry, b"x");
        assert_eq!(outcome, Step::Head(b"\r\n\rx".to_vec()));
        assert!(carry.is_empty());
    }

    #[async_std::test]
    async fn takes_head_out_of_response() {
        let head = head_of(b"HTTP/1.1 200 OK\r\nContent-type: text/plain\r\n\r\nHello, dude!".to_vec()).await;
        assert_eq!(head, b"HTTP/1.1 200 OK\r\nContent-type: text/plain".to_vec());
    }

    #[async_std::test]
    async fn empty_head() {
        assert!(head_of(b"\r\n\r\nBody".to_vec()).await.is_empty());
    }

    #[async_std::test]
    async fn empty_input() {
        assert!(head_of(Vec::new()).await.is_empty());
    }

    #[async_std::test]
    async fn large_body() {
        let mut bytes = b"HTTP/1.1 200 OK\r\nContent-type: text/plain\r\n\r\n".to_vec();
        bytes.extend((0..18000).map(|i| (i % 251) as u8));
        assert!(head_of(bytes).await.ends_with(b"text/plain"));
    }

    #[async_std::test]
    async fn boundary_split_by_two_buffers() {
        let mut bytes = Vec::new();
        fill(&mut bytes, SIZE - 4);
        bytes.extend_from_slice(b"b\r\n\r\n");
        fill(&mut bytes, 2 * SIZE);
        let head = head_of(bytes).await;
        assert_eq!(head.len(), SIZE - 3);
        assert!(head.ends_with(b"b"));
    }

    #[async_std::test]
    async fn boundary_at_buffer_start() {
        let mut bytes = Vec::new();
        fill(&mut bytes, SIZE - 1);
        bytes.extend_from_slice(b"b\r\n\r\n");
        fill(&mut bytes, 2 * SIZE);
        let head = head_of(bytes).await;
        assert_eq!(head.len(), SIZE);
        assert!(head.ends_with(b"b"));
    }

    #[async_std::test]
    async fn fake_separator_at_buffer_end() {
        let mut bytes = Vec::new();
        fill(&mut bytes, SIZE - 2);
        bytes.extend_from_slice(b"\r\n");
        fill(&mut bytes, 2 * SIZE - 5);
        bytes.extend_from_slice(b"b\r\n\r\n");
        let head = head_of(bytes).await;
        assert_eq!(head.len(), 2 * SIZE - 4);
        assert!(head.ends_with(b"b"));
    }

    #[async_std::test]
    async fn rolls_back_after_a_false_start() {
        let mut bytes = Vec::new();
        fill(&mut bytes, 2 * SIZE - 2);
        bytes.extend_from_slice(b"\r\n");
        fill(&mut bytes, 4 * SIZE - 5);
        bytes.extend_from_slice(b"b\r\n\r\n");
        let head = head_of(bytes).await;
        assert_eq!(head.len(), 4 * SIZE - 4);
        assert!(head.ends_with(b"b"));
    }

    #[async_std::test]
    async fn no_boundary_means_all_head() {
        let (head, body) = split(Cursor::new(b"HTTP/1.1 200 OK\r\n".to_vec()))
            .await
            .unwrap();
        assert_eq!(head, b"HTTP/1.1 200 OK\r\n".to_vec());
        assert!(body.into_bytes().await.unwrap().is_empty());
    }

    #[async_std::test]
    async fn body_continues_past_the_buffer() {
        let mut bytes = b"HTTP/1.1 200 OK\r\n\r\n".to_vec();
        bytes.extend(std::iter::repeat(b'z').take(3 * SIZE));
        let (head, body) = split(Cursor::new(bytes)).await.unwrap();
        assert_eq!(head, b"HTTP/1.1 200 OK".to_vec());
        assert_eq!(body.into_bytes().await.unwrap().len(), 3 * SIZE);
    }

    #[async_std::test]
    async fn rejoins_into_the_original() {
        let bytes = b"HTTP/1.1 301 Moved\r\nLocation: http://x/\r\n\r\nmoved".to_vec();
        let parts = HeadReader::new(Cursor::new(bytes.clone()))
            .into_parts()
            .await
            .unwrap();
        assert!(parts.found);
        assert_eq!(parts.rejoin().into_bytes().await.unwrap(), bytes);
    }
}
