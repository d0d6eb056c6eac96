//! Execution substrate for background poll cycles.

use std::time::Duration;

#[cfg(feature = "tokio-runtime")]
use crate::error::{ConfigError, Result};
#[cfg(feature = "tokio-runtime")]
use tracing::warn;

/// A unit of background work handed to a [`Scheduler`].
///
/// Tasks may block (they perform the configuration load), so schedulers must run
/// them somewhere blocking is allowed.
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Handle to a task registered with a [`Scheduler`].
pub trait PollHandle: Send + Sync {
    /// Returns `true` once the task body has run to completion.
    ///
    /// A task that is still waiting for its delay, or is currently executing,
    /// is not done.
    fn is_done(&self) -> bool;
}

/// Fire-once delayed task execution.
///
/// Implementations must run each task exactly once, no earlier than `delay`
/// after it was scheduled. There is no cancellation. `schedule_after` is called
/// while the informant holds its scheduling lock, so it must return promptly and
/// must never run `task` inline (debug builds panic if it does).
pub trait Scheduler: Send + Sync {
    /// Register `task` to run after `delay` and return a handle to it.
    fn schedule_after(&self, delay: Duration, task: Task) -> Box<dyn PollHandle>;
}

impl Scheduler for Box<dyn Scheduler> {
    fn schedule_after(&self, delay: Duration, task: Task) -> Box<dyn PollHandle> {
        (**self).schedule_after(delay, task)
    }
}

/// [`Scheduler`] backed by a tokio runtime.
///
/// The delay is a `tokio::time::sleep` on the runtime; the task body then runs on
/// the blocking pool via `spawn_blocking`, so a slow loader never stalls the
/// runtime's async workers.
///
/// # Examples
///
/// ```rust
/// use config_reload_informant::core::TokioScheduler;
///
/// # #[tokio::main]
/// # async fn main() -> config_reload_informant::error::Result<()> {
/// let scheduler = TokioScheduler::try_current()?;
/// # let _ = scheduler;
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "tokio-runtime")]
#[derive(Debug, Clone)]
pub struct TokioScheduler {
    runtime: tokio::runtime::Handle,
}

#[cfg(feature = "tokio-runtime")]
impl TokioScheduler {
    /// Create a scheduler that spawns onto the given runtime.
    pub fn new(runtime: tokio::runtime::Handle) -> Self {
        Self { runtime }
    }

    /// Create a scheduler for the runtime the caller is currently running inside.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::SchedulerUnavailable`] when called outside a tokio runtime.
    pub fn try_current() -> Result<Self> {
        tokio::runtime::Handle::try_current()
            .map(Self::new)
            .map_err(|e| ConfigError::SchedulerUnavailable(e.to_string()))
    }
}

#[cfg(feature = "tokio-runtime")]
impl Scheduler for TokioScheduler {
    fn schedule_after(&self, delay: Duration, task: Task) -> Box<dyn PollHandle> {
        let handle = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(e) = tokio::task::spawn_blocking(task).await {
                warn!(error = %e, "Configuration poll task did not complete");
            }
        });
        Box::new(handle)
    }
}

#[cfg(feature = "tokio-runtime")]
impl PollHandle for tokio::task::JoinHandle<()> {
    fn is_done(&self) -> bool {
        self.is_finished()
    }
}
