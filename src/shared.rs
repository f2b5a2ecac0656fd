use crate::schedule::Schedule;
use crate::Error;
use std::path::Path;
use std::sync::{Arc, RwLock};

/// Shared handle to the current [Schedule] snapshot
///
/// The schedule itself never mutates. A load builds a brand-new store off to
/// the side and then swaps the shared reference in one step; queries running
/// against the previous snapshot keep their [Arc] and finish against a
/// consistent view. Until the first successful load every query entry point
/// reports [Error::DataNotLoaded].
#[derive(Default)]
pub struct SharedSchedule {
    current: RwLock<Option<Arc<Schedule>>>,
}

impl SharedSchedule {
    /// An empty handle, with no schedule published yet
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a schedule has been published
    pub fn is_loaded(&self) -> bool {
        self.current.read().unwrap().is_some()
    }

    /// The current snapshot, or [Error::DataNotLoaded] before the first
    /// successful load
    pub fn snapshot(&self) -> Result<Arc<Schedule>, Error> {
        self.current
            .read()
            .unwrap()
            .clone()
            .ok_or(Error::DataNotLoaded)
    }

    /// Loads (or reloads) a feed directory and publishes it
    ///
    /// The build happens outside the lock. On failure the error is returned
    /// and the previously published snapshot, if any, stays in place; there
    /// is no retry.
    pub fn load<P>(&self, path: P) -> Result<Arc<Schedule>, Error>
    where
        P: AsRef<Path> + std::fmt::Display,
    {
        let schedule = Arc::new(Schedule::from_path(path)?);
        *self.current.write().unwrap() = Some(Arc::clone(&schedule));
        Ok(schedule)
    }
}
