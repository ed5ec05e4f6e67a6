//! HTTP/1.x client built from composable transport decorators.
//!
//! A [`Wire`] sends request bytes and hands back the response as a byte
//! source. Wires wrap one another, each adding a single concern:
//!
//! ```txt
//!  TimedWire ─> RetryWire ─> KeepAliveWire ─> RawWire / SecureWire ─> socket
//!   deadline     attempts     reuse window      connect, write, read
//! ```
//!
//! The response that comes back is split lazily into head and body by
//! [`HeadReader`], which finds the `\r\n\r\n` boundary no matter how the
//! bytes are chunked on arrival. [`client::AutoRedirect`] peeks at the head
//! and re-issues the request when the server answers with a redirect.
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> h1_wire::Result<()> { async_global_executor::block_on(async {
//! use h1_wire::client::{AutoRedirect, ResponseReader};
//! use h1_wire::{Request, RetryWire, RawWire, TimedWire};
//! use http_types::Url;
//! use std::time::Duration;
//!
//! let url = Url::parse("http://example.com/").unwrap();
//! let wire = TimedWire::new(RetryWire::new(RawWire::from_url(&url)?, 3), Duration::from_secs(5));
//! let reader = ResponseReader::new(wire, Request::get(&url)?);
//! let response = AutoRedirect::new(reader).stream().await?;
//! println!("{}", response.into_string().await?);
//! # Ok(()) }) }
//! ```

#![forbid(unsafe_code, future_incompatible)]
#![deny(rust_2018_idioms)]
#![deny(missing_debug_implementations, nonstandard_style)]
#![warn(missing_docs, unreachable_pub)]

/// Size of the chunks read from a response while looking for the head boundary.
pub const READ_BUFFER_LEN: usize = 16384;

/// The bytes separating the head of an HTTP message from its body.
pub const BOUNDARY: &[u8; 4] = b"\r\n\r\n";

mod body;
mod error;
mod head;
mod request;
mod response;
mod scanner;
mod stream;
mod timeout;

pub mod client;
pub mod wire;

pub use body::Body;
pub use error::{Error, Result};
pub use head::{split, HeadReader, Parts};
pub use request::Request;
pub use response::Response;
pub use scanner::Scanner;
pub use timeout::{TimeoutError, TimeoutFuture};
pub use wire::{KeepAliveWindow, KeepAliveWire, RawWire, RetryWire, SecureWire, TimedWire, Wire};
