use std::fmt;

use super::Wire;
use crate::{Request, Response, Result};

type Exit = Box<dyn Fn(u32) -> bool + Send + Sync>;

/// Sends again, right away, when the wire below fails.
///
/// Only transient failures (socket errors and timeouts) are retried; the
/// exit condition is asked after every failed attempt, numbered from 1.
pub struct RetryWire<W> {
    origin: W,
    exit: Exit,
}

impl<W: Wire> RetryWire<W> {
    /// Make at most `attempts` attempts. At least one attempt is always made.
    pub fn new(origin: W, attempts: u32) -> Self {
        Self::with_exit(origin, move |attempt| attempt >= attempts)
    }

    /// Keep trying until `exit` returns `true` for the number of the attempt
    /// that just failed.
    pub fn with_exit<F>(origin: W, exit: F) -> Self
    where
        F: Fn(u32) -> bool + Send + Sync + 'static,
    {
        Self {
            origin,
            exit: Box::new(exit),
        }
    }
}

impl<W: Wire> Wire for RetryWire<W> {
    async fn send(&self, request: Request) -> Result<Response> {
        let mut attempt = 1;
        loop {
            match self.origin.send(request.clone()).await {
                Ok(response) => return Ok(response),
                Err(err) if err.is_transient() && !(self.exit)(attempt) => {
                    log::debug!("attempt {} failed, trying again: {}", attempt, err);
                    attempt += 1;
                }
                Err(err) => {
                    log::debug!("giving up after attempt {}: {}", attempt, err);
                    return Err(err);
                }
            }
        }
    }
}

impl<W: fmt::Debug> fmt::Debug for RetryWire<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryWire")
            .field("origin", &self.origin)
            .finish()
    }
}
