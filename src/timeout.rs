use std::error::Error;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use async_io::Timer;
use pin_project::pin_project;

/// Await `f`, giving up after `dur`.
pub(crate) async fn timeout<F, T>(dur: Duration, f: F) -> Result<T, TimeoutError>
where
    F: Future<Output = T>,
{
    TimeoutFuture::new(f, dur).await
}

/// A future that times out after a duration of time.
#[pin_project]
#[derive(Debug)]
pub struct TimeoutFuture<F> {
    #[pin]
    future: F,
    #[pin]
    delay: Timer,
    dur: Duration,
}

impl<F> TimeoutFuture<F> {
    /// Race `future` against a timer of `dur`.
    pub fn new(future: F, dur: Duration) -> TimeoutFuture<F> {
        TimeoutFuture {
            future,
            delay: Timer::after(dur),
            dur,
        }
    }
}

impl<F: Future> Future for TimeoutFuture<F> {
    type Output = Result<F::Output, TimeoutError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();
        match this.future.poll(cx) {
            Poll::Ready(v) => Poll::Ready(Ok(v)),
            Poll::Pending => match this.delay.poll(cx) {
                Poll::Ready(_) => Poll::Ready(Err(TimeoutError { dur: *this.dur })),
                Poll::Pending => Poll::Pending,
            },
        }
    }
}

/// An error returned when a future times out.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TimeoutError {
    dur: Duration,
}

impl TimeoutError {
    /// How long the future was given.
    pub fn duration(&self) -> Duration {
        self.dur
    }
}

impl Error for TimeoutError {}

impl fmt::Display for TimeoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "future has timed out after {:?}", self.dur)
    }
}

impl From<TimeoutError> for crate::Error {
    fn from(err: TimeoutError) -> Self {
        crate::Error::Timeout(err.dur)
    }
}
