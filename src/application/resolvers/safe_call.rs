use crate::shared::Result;
use std::fmt;
use std::future::Future;
use std::time::Duration;

/// Why a gateway call produced its default value instead of a result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchFailure {
    /// The call did not finish within the per-call timeout
    TimedOut(Duration),
    /// The call returned an error (not found, throttled, malformed, ...)
    Error(String),
}

impl fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchFailure::TimedOut(limit) => write!(f, "timed out after {}ms", limit.as_millis()),
            FetchFailure::Error(message) => f.write_str(message),
        }
    }
}

/// Outcome of one guarded gateway call.
#[derive(Debug, Clone, PartialEq)]
pub enum Fetched<T> {
    Ok(T),
    Degraded { value: T, reason: FetchFailure },
}

impl<T> Fetched<T> {
    pub fn succeeded(&self) -> bool {
        matches!(self, Fetched::Ok(_))
    }

    pub fn value(&self) -> &T {
        match self {
            Fetched::Ok(value) | Fetched::Degraded { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Fetched::Ok(value) | Fetched::Degraded { value, .. } => value,
        }
    }

    /// `(value, succeeded)`
    pub fn into_parts(self) -> (T, bool) {
        let succeeded = self.succeeded();
        (self.into_value(), succeeded)
    }

    /// The value only if the call succeeded.
    pub fn ok(self) -> Option<T> {
        match self {
            Fetched::Ok(value) => Some(value),
            Fetched::Degraded { .. } => None,
        }
    }

    pub fn failure(&self) -> Option<&FetchFailure> {
        match self {
            Fetched::Ok(_) => None,
            Fetched::Degraded { reason, .. } => Some(reason),
        }
    }
}

/// Runs gateway calls under a timeout and converts every failure into a
/// caller-supplied default. Nothing raised by the call escapes.
#[derive(Debug, Clone, Copy)]
pub struct SafeCaller {
    timeout: Duration,
}

impl SafeCaller {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn call<T, F>(&self, operation: &str, future: F, default: T) -> Fetched<T>
    where
        F: Future<Output = Result<T>>,
    {
        let reason = match tokio::time::timeout(self.timeout, future).await {
            Ok(Ok(value)) => return Fetched::Ok(value),
            Ok(Err(error)) => FetchFailure::Error(format!("{:#}", error)),
            Err(_) => FetchFailure::TimedOut(self.timeout),
        };

        tracing::warn!(operation, error = %reason, "gateway call failed, using default");
        Fetched::Degraded {
            value: default,
            reason,
        }
    }
}
