use std::sync::Arc;
use std::time::Duration;

use super::Wire;
use crate::timeout::timeout;
use crate::{Request, Response, Result};

/// Gives up on the wire below when it takes longer than a deadline.
///
/// The call runs as a task on the global executor. When the deadline passes
/// first, [`Error::Timeout`](crate::Error::Timeout) is returned at once and
/// the task is left to finish on its own: it is no longer awaited, but its
/// socket stays open until the call completes or fails.
#[derive(Debug)]
pub struct TimedWire<W> {
    origin: Arc<W>,
    timeout: Duration,
}

impl<W: Wire + 'static> TimedWire<W> {
    /// Wrap `origin`, allowing each request `timeout` to complete.
    pub fn new(origin: W, timeout: Duration) -> Self {
        Self {
            origin: Arc::new(origin),
            timeout,
        }
    }

    /// The deadline for a single request.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl<W: Wire + 'static> Wire for TimedWire<W> {
    async fn send(&self, request: Request) -> Result<Response> {
        let origin = Arc::clone(&self.origin);
        let mut task = async_global_executor::spawn(async move { origin.send(request).await });
        match timeout(self.timeout, &mut task).await {
            Ok(result) => result,
            Err(err) => {
                log::warn!("no response within {:?}, abandoning the call", self.timeout);
                task.detach();
                Err(err.into())
            }
        }
    }
}
