//! The reload informant: answers "should I reload?" without blocking.

use crate::core::builder::InformantBuilder;
use crate::core::loader::Loader;
use crate::core::scheduler::{PollHandle, Scheduler};
use arc_swap::ArcSwapOption;
use parking_lot::Mutex;
use std::cell::Cell;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tracing::{debug, info};

thread_local! {
    /// Set while this thread is inside `Scheduler::schedule_after` with the guard held.
    static SCHEDULING: Cell<bool> = const { Cell::new(false) };
}

/// Polling interval used unless overridden with `with_interval`.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(60);

/// Something a server consults, per unit of work, to decide whether to reload.
///
/// `Display` gives a short identity for diagnostics.
pub trait ReloadInformant: fmt::Display + Send + Sync {
    /// Whether the server should reload. Must not block.
    fn should_reload(&self) -> bool;
}

/// Reload informant that polls configuration data in the background.
///
/// Polling starts lazily on the first call to [`should_reload`](Self::should_reload).
/// Each poll cycle loads a fresh snapshot, compares it with the baseline, and
/// either schedules the next cycle after `interval` (no change) or latches the
/// change flag (change). Once the flag is set the informant is dormant: it
/// answers `true` forever and never schedules another poll. At most one cycle
/// is outstanding at any time.
///
/// A failed load is swallowed: the flag is untouched and that cycle does not
/// reschedule. The next call to `should_reload` arms a fresh poll.
///
/// # Examples
///
/// ```rust
/// use config_reload_informant::prelude::*;
/// use config_reload_informant::core::TokioScheduler;
/// use serde_json::json;
/// use std::time::Duration;
///
/// # #[tokio::main]
/// # async fn main() -> Result<()> {
/// let informant = ConfigDataReloadInformant::new(
///     json!({ "port": 8080 }),
///     || -> Result<_> { Ok(json!({ "port": 8080 })) },
///     TokioScheduler::try_current()?,
/// )
/// .with_interval(Duration::from_secs(5));
///
/// // First query arms the poller; nothing has changed yet.
/// assert!(!informant.should_reload());
/// # Ok(())
/// # }
/// ```
pub struct ConfigDataReloadInformant<T> {
    shared: Arc<Shared<T>>,
    interval: Duration,
}

struct Shared<T> {
    baseline: T,
    changed: AtomicBool,
    loader: Box<dyn Loader<T>>,
    scheduler: Box<dyn Scheduler>,
    /// Outstanding poll, read lock-free on the fast path.
    poll: ArcSwapOption<Box<dyn PollHandle>>,
    /// Serializes "check, schedule, store handle".
    guard: Mutex<()>,
}

impl ConfigDataReloadInformant<()> {
    /// Create a builder that loads the baseline from configuration sources.
    pub fn builder() -> InformantBuilder {
        InformantBuilder::new()
    }
}

impl<T> ConfigDataReloadInformant<T>
where
    T: PartialEq + Send + Sync + 'static,
{
    /// Create an informant comparing fresh loads against `baseline`.
    ///
    /// Nothing is scheduled until the first call to `should_reload`.
    pub fn new<L, S>(baseline: T, loader: L, scheduler: S) -> Self
    where
        L: Loader<T> + 'static,
        S: Scheduler + 'static,
    {
        Self {
            shared: Arc::new(Shared {
                baseline,
                changed: AtomicBool::new(false),
                loader: Box::new(loader),
                scheduler: Box::new(scheduler),
                poll: ArcSwapOption::empty(),
                guard: Mutex::new(()),
            }),
            interval: DEFAULT_INTERVAL,
        }
    }

    /// Set the polling interval.
    ///
    /// Configuration-time only: call it before the first `should_reload`. Taking
    /// `self` by value means it cannot race with queries on the same instance.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Whether the configuration has changed since the baseline was loaded.
    ///
    /// Ensures a poll cycle is scheduled if none is outstanding, then returns the
    /// change flag. Never blocks on I/O; the lock is only taken when no poll is
    /// outstanding, and only for as long as it takes to register a timer.
    pub fn should_reload(&self) -> bool {
        self.schedule_poll_if_not_running();
        self.shared.changed.load(Ordering::Acquire)
    }

    /// The snapshot fresh loads are compared against.
    pub fn baseline(&self) -> &T {
        &self.shared.baseline
    }

    /// The configured polling interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    fn schedule_poll_if_not_running(&self) {
        if self.shared.should_skip_poll() {
            return;
        }

        let _guard = self.shared.guard.lock();
        if !self.shared.should_skip_poll() {
            Shared::schedule_poll(&self.shared, self.interval);
        }
    }
}

impl<T> Shared<T>
where
    T: PartialEq + Send + Sync + 'static,
{
    /// A poll is outstanding, or a change was already detected.
    fn should_skip_poll(&self) -> bool {
        if self.changed.load(Ordering::Acquire) {
            return true;
        }
        let current = self.poll.load();
        matches!(&*current, Some(handle) if !handle.is_done())
    }

    /// Callers must hold `guard`.
    fn schedule_poll(this: &Arc<Self>, interval: Duration) {
        debug!(?interval, "Scheduling configuration poll");
        let shared = Arc::downgrade(this);
        SCHEDULING.with(|flag| flag.set(true));
        let handle = this
            .scheduler
            .schedule_after(interval, Box::new(move || Self::poll(shared, interval)));
        SCHEDULING.with(|flag| flag.set(false));
        this.poll.store(Some(Arc::new(handle)));
    }

    fn poll(shared: Weak<Self>, interval: Duration) {
        // The guard is not reentrant; an inline task would deadlock on it.
        debug_assert!(
            !SCHEDULING.with(Cell::get),
            "Scheduler ran a poll task inline from schedule_after"
        );

        let Some(shared) = shared.upgrade() else {
            debug!("Reload informant dropped; stopping configuration poll");
            return;
        };

        let snapshot = match shared.loader.load() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                debug!(error = %e, "Configuration poll failed to load data");
                return;
            }
        };

        if snapshot == shared.baseline {
            debug!("No difference in configuration data");
            let _guard = shared.guard.lock();
            Self::schedule_poll(&shared, interval);
        } else {
            info!("Configuration data difference detected; next request should reload");
            shared.changed.store(true, Ordering::Release);
        }
    }
}

impl<T> ReloadInformant for ConfigDataReloadInformant<T>
where
    T: PartialEq + Send + Sync + 'static,
{
    fn should_reload(&self) -> bool {
        ConfigDataReloadInformant::should_reload(self)
    }
}

impl<T> fmt::Display for ConfigDataReloadInformant<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("configuration data reload informant")
    }
}

impl<T> fmt::Debug for ConfigDataReloadInformant<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigDataReloadInformant")
            .field("interval", &self.interval)
            .field("changed", &self.shared.changed.load(Ordering::Acquire))
            .finish_non_exhaustive()
    }
}
