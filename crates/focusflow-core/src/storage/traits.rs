use std::rc::Rc;

use crate::breaks::BreakActivity;
use crate::error::StoreError;
use crate::session::StudySession;
use crate::settings::TimerSettings;

/// Where [`TimerSettings`] live between runs.
pub trait SettingsStore {
    fn read(&self) -> Result<TimerSettings, StoreError>;
    fn write(&self, settings: &TimerSettings) -> Result<(), StoreError>;
}

/// Append-only session log. Entries keep insertion order and are never
/// deduplicated or rewritten.
pub trait SessionLog {
    fn append(&self, session: &StudySession) -> Result<(), StoreError>;

    /// All entries, oldest first.
    fn list(&self) -> Result<Vec<StudySession>, StoreError>;
}

/// Persisted count of fully completed study blocks.
pub trait StreakStore {
    fn read(&self) -> Result<u32, StoreError>;
    fn write(&self, value: u32) -> Result<(), StoreError>;
}

/// User-maintained list of break activities.
pub trait BreakActivityCatalog {
    fn activities(&self) -> Result<Vec<BreakActivity>, StoreError>;
    fn add(&self, activity: &BreakActivity) -> Result<(), StoreError>;

    /// Returns whether an entry with `id` existed.
    fn remove(&self, id: &str) -> Result<bool, StoreError>;
}

// One `Database` usually backs several of these roles at once.

impl<T: SettingsStore + ?Sized> SettingsStore for Rc<T> {
    fn read(&self) -> Result<TimerSettings, StoreError> {
        (**self).read()
    }
    fn write(&self, settings: &TimerSettings) -> Result<(), StoreError> {
        (**self).write(settings)
    }
}

impl<T: SessionLog + ?Sized> SessionLog for Rc<T> {
    fn append(&self, session: &StudySession) -> Result<(), StoreError> {
        (**self).append(session)
    }
    fn list(&self) -> Result<Vec<StudySession>, StoreError> {
        (**self).list()
    }
}

impl<T: StreakStore + ?Sized> StreakStore for Rc<T> {
    fn read(&self) -> Result<u32, StoreError> {
        (**self).read()
    }
    fn write(&self, value: u32) -> Result<(), StoreError> {
        (**self).write(value)
    }
}

impl<T: BreakActivityCatalog + ?Sized> BreakActivityCatalog for Rc<T> {
    fn activities(&self) -> Result<Vec<BreakActivity>, StoreError> {
        (**self).activities()
    }
    fn add(&self, activity: &BreakActivity) -> Result<(), StoreError> {
        (**self).add(activity)
    }
    fn remove(&self, id: &str) -> Result<bool, StoreError> {
        (**self).remove(id)
    }
}
