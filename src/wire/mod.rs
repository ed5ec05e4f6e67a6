//! Transports that carry a request to a server and bring back its response.
//!
//! [`RawWire`] and [`SecureWire`] talk to sockets; [`RetryWire`],
//! [`TimedWire`] and [`KeepAliveWire`] wrap any other wire and add one
//! concern each. A wire graph is an ordinary value built by the caller:
//!
//! ```no_run
//! # fn main() -> h1_wire::Result<()> {
//! use h1_wire::{RawWire, RetryWire, TimedWire};
//! use std::time::Duration;
//!
//! let wire = TimedWire::new(RetryWire::new(RawWire::new("localhost", 8080), 3), Duration::from_secs(1));
//! # Ok(()) }
//! ```

use std::future::Future;

use crate::{Request, Response, Result};

mod keep_alive;
mod raw;
mod retry;
mod secure;
mod timed;

pub use futures_rustls::rustls::ClientConfig;
pub use keep_alive::{KeepAliveWindow, KeepAliveWire};
pub use raw::{RawWire, HTTPS_PORT, HTTP_PORT};
pub use retry::RetryWire;
pub use secure::SecureWire;
pub use timed::TimedWire;

/// Sends a request and returns the response as a byte source.
pub trait Wire: Send + Sync {
    /// Send `request` and wait for the response.
    fn send(&self, request: Request) -> impl Future<Output = Result<Response>> + Send;
}

impl<F, Fut> Wire for F
where
    F: Fn(Request) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Response>> + Send,
{
    fn send(&self, request: Request) -> impl Future<Output = Result<Response>> + Send {
        self(request)
    }
}
