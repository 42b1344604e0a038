//! In-process store adapters.
//!
//! Clones share state, so a test can hand one clone to the timer and keep
//! another to inspect what was written.

use std::sync::{Arc, Mutex, MutexGuard};

use super::traits::{BreakActivityCatalog, SessionLog, StreakStore};
use crate::breaks::BreakActivity;
use crate::error::StoreError;
use crate::session::StudySession;

fn lock<T>(m: &Mutex<T>) -> Result<MutexGuard<'_, T>, StoreError> {
    m.lock()
        .map_err(|_| StoreError::Unavailable("memory store poisoned".into()))
}

#[derive(Debug, Default, Clone)]
pub struct MemorySessionLog {
    entries: Arc<Mutex<Vec<StudySession>>>,
    fail_writes: bool,
}

impl MemorySessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// A log whose appends always fail.
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn entries(&self) -> Vec<StudySession> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl SessionLog for MemorySessionLog {
    fn append(&self, session: &StudySession) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Unavailable("session log is read-only".into()));
        }
        lock(&self.entries)?.push(session.clone());
        Ok(())
    }

    fn list(&self) -> Result<Vec<StudySession>, StoreError> {
        Ok(lock(&self.entries)?.clone())
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStreak {
    value: Arc<Mutex<u32>>,
}

impl MemoryStreak {
    pub fn new(value: u32) -> Self {
        Self {
            value: Arc::new(Mutex::new(value)),
        }
    }

    pub fn get(&self) -> u32 {
        self.value.lock().map(|v| *v).unwrap_or(0)
    }
}

impl StreakStore for MemoryStreak {
    fn read(&self) -> Result<u32, StoreError> {
        Ok(*lock(&self.value)?)
    }

    fn write(&self, value: u32) -> Result<(), StoreError> {
        *lock(&self.value)? = value;
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemoryCatalog {
    activities: Arc<Mutex<Vec<BreakActivity>>>,
}

impl MemoryCatalog {
    pub fn new(activities: Vec<BreakActivity>) -> Self {
        Self {
            activities: Arc::new(Mutex::new(activities)),
        }
    }
}

impl BreakActivityCatalog for MemoryCatalog {
    fn activities(&self) -> Result<Vec<BreakActivity>, StoreError> {
        Ok(lock(&self.activities)?.clone())
    }

    fn add(&self, activity: &BreakActivity) -> Result<(), StoreError> {
        lock(&self.activities)?.push(activity.clone());
        Ok(())
    }

    fn remove(&self, id: &str) -> Result<bool, StoreError> {
        let mut activities = lock(&self.activities)?;
        let before = activities.len();
        activities.retain(|a| a.id != id);
        Ok(activities.len() != before)
    }
}
