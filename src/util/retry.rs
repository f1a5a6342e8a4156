use error_stack::Report;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Re-runs a fallible async operation until it succeeds, the error is
/// not retryable, or the attempt budget is spent.
pub struct Retry<C, P> {
    builder: RetryBuilder<C, P>,
    tries: usize,
}

#[derive(Debug, Error)]
#[error("operation {name:?} failed after {tries} attempt(s)")]
pub struct RetryFailed {
    pub name: &'static str,
    pub tries: usize,
}

impl<O, E, F, C> Retry<C, fn(&E) -> bool>
where
    E: Display + std::fmt::Debug + Send + Sync + 'static,
    F: Future<Output = Result<O, E>>,
    C: FnMut() -> F,
{
    #[must_use]
    #[inline(always)]
    pub fn builder(name: &'static str, callback: C) -> RetryBuilder<C, fn(&E) -> bool> {
        RetryBuilder::new(name, callback)
    }
}

impl<O, E, F, C, P> Retry<C, P>
where
    E: Display + std::fmt::Debug + Send + Sync + 'static,
    F: Future<Output = Result<O, E>>,
    C: FnMut() -> F,
    P: Fn(&E) -> bool,
{
    pub async fn run(mut self) -> error_stack::Result<O, RetryFailed> {
        let mut wait = self.builder.wait;
        loop {
            self.tries += 1;
            debug!(tries = %self.tries, "(re)trying task {:?}...", self.builder.name);

            let error = match (self.builder.callback)().await {
                Ok(output) => return Ok(output),
                Err(error) => error,
            };

            let retryable = (self.builder.retry_if)(&error);
            if !retryable || self.tries >= self.builder.max_attempts {
                let context = RetryFailed {
                    name: self.builder.name,
                    tries: self.tries,
                };
                return Err(Report::new(context).attach_printable(error.to_string()));
            }

            warn!(
                tries = %self.tries,
                %error,
                "operation {:?} failed. retrying in {:?}...",
                self.builder.name, wait
            );

            tokio::time::sleep(wait).await;
            wait = wait.mul_f64(self.builder.multiplier);
        }
    }
}

#[must_use]
pub struct RetryBuilder<C, P> {
    callback: C,
    max_attempts: usize,
    multiplier: f64,
    name: &'static str,
    retry_if: P,
    wait: Duration,
}

impl<C, E> RetryBuilder<C, fn(&E) -> bool> {
    const DEFAULT_MAX_ATTEMPTS: usize = 3;
    const DEFAULT_WAIT: Duration = Duration::from_millis(500);

    pub fn new(name: &'static str, callback: C) -> Self {
        fn always<E>(_: &E) -> bool {
            true
        }

        Self {
            callback,
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            multiplier: 1.0,
            name,
            retry_if: always::<E>,
            wait: Self::DEFAULT_WAIT,
        }
    }
}

impl<C, P> RetryBuilder<C, P> {
    /// Total number of attempts, including the first one. Zero is
    /// treated as one.
    pub fn max_attempts(self, max_attempts: usize) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            ..self
        }
    }

    pub fn wait(self, duration: Duration) -> Self {
        Self {
            wait: duration,
            ..self
        }
    }

    /// Factor applied to the wait duration after every failed attempt.
    /// Values below `1.0` are clamped to a fixed backoff.
    pub fn multiplier(self, multiplier: f64) -> Self {
        Self {
            multiplier: multiplier.max(1.0),
            ..self
        }
    }

    pub fn retry_if<Q>(self, retry_if: Q) -> RetryBuilder<C, Q> {
        RetryBuilder {
            callback: self.callback,
            max_attempts: self.max_attempts,
            multiplier: self.multiplier,
            name: self.name,
            retry_if,
            wait: self.wait,
        }
    }

    pub fn build(self) -> Retry<C, P> {
        Retry {
            builder: self,
            tries: 0,
        }
    }
}
