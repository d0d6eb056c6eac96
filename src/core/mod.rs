//! Reload informant, its collaborators, and the source-backed builder.

mod builder;
mod informant;
mod loader;
mod scheduler;

pub use builder::InformantBuilder;
pub use informant::{ConfigDataReloadInformant, DEFAULT_INTERVAL, ReloadInformant};
pub use loader::{Loader, SourceLoader};
pub use scheduler::{PollHandle, Scheduler, Task};

#[cfg(feature = "tokio-runtime")]
pub use scheduler::TokioScheduler;
