//! Configuration source trait.

use crate::error::Result;
use std::collections::HashMap;

/// A place configuration data is read from.
///
/// A [`SourceLoader`](crate::core::SourceLoader) re-reads every source on each
/// poll cycle, so `load` must return the source's *current* contents rather than
/// a cached copy. It runs on a background worker and may block.
pub trait ConfigSource: Send + Sync {
    /// Read the source into top-level keys and their (possibly nested) values.
    ///
    /// # Errors
    ///
    /// Returns an error if the source is unreachable or cannot be parsed.
    fn load(&self) -> Result<HashMap<String, config::Value>>;

    /// Human-readable name, used in error messages and logs.
    fn name(&self) -> String;

    /// Merge priority; higher values override lower ones.
    ///
    /// Built-in sources use 100 (files, +10 per additional file) and 300
    /// (environment variables).
    fn priority(&self) -> i32 {
        100
    }
}
