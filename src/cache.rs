//! Memo tables for holiday windows and yearly schedules.
//!
//! Entries are keyed by configuration version, so a snapshot swap never
//! serves stale data. [`CalendarCache::retire_before`] drops older versions
//! and stops calculations still running on an old snapshot from storing new
//! entries under it. A failed computation stores nothing.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::error::EngineResult;
use crate::models::{HolidayWindow, PersonId, ShiftAssignment};

/// A year's scheduled assignments, indexed by `ordinal0()`.
pub type YearSchedule = Arc<Vec<Option<ShiftAssignment>>>;

/// Shared, injectable cache used by [`crate::engine::Engine`].
#[derive(Debug, Default)]
pub struct CalendarCache {
    /// Lowest version still stored.
    floor: AtomicU64,
    holidays: RwLock<HashMap<(u64, i32), Arc<Vec<HolidayWindow>>>>,
    schedules: RwLock<HashMap<(u64, PersonId, i32), YearSchedule>>,
}

impl CalendarCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Holiday windows for `year` under `version`, computing them on a miss.
    pub fn holidays<F>(&self, version: u64, year: i32, compute: F) -> EngineResult<Arc<Vec<HolidayWindow>>>
    where
        F: FnOnce() -> EngineResult<Vec<HolidayWindow>>,
    {
        self.get_or_insert_with(&self.holidays, version, (version, year), || {
            compute().map(Arc::new)
        })
    }

    /// The scheduled assignments of `person` for `year` under `version`.
    pub fn schedule<F>(&self, version: u64, person: PersonId, year: i32, compute: F) -> EngineResult<YearSchedule>
    where
        F: FnOnce() -> EngineResult<Vec<Option<ShiftAssignment>>>,
    {
        self.get_or_insert_with(&self.schedules, version, (version, person, year), || {
            compute().map(Arc::new)
        })
    }

    /// Number of cached holiday years and schedules.
    pub fn entry_counts(&self) -> (usize, usize) {
        let holidays = self.holidays.read().unwrap_or_else(PoisonError::into_inner).len();
        let schedules = self.schedules.read().unwrap_or_else(PoisonError::into_inner).len();
        (holidays, schedules)
    }

    /// Drops every entry older than `version` and refuses to store any from
    /// now on. Lookups under an older version still compute their value.
    pub fn retire_before(&self, version: u64) {
        let floor = self.floor.fetch_max(version, Ordering::SeqCst).max(version);
        self.holidays
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(v, _), _| *v >= floor);
        self.schedules
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|(v, _, _), _| *v >= floor);
        debug!(floor, "Calendar cache retired older versions");
    }

    /// Drops every entry.
    pub fn clear(&self) {
        self.holidays.write().unwrap_or_else(PoisonError::into_inner).clear();
        self.schedules.write().unwrap_or_else(PoisonError::into_inner).clear();
        debug!("Calendar cache cleared");
    }

    fn get_or_insert_with<K, V, F>(
        &self,
        table: &RwLock<HashMap<K, V>>,
        version: u64,
        key: K,
        compute: F,
    ) -> EngineResult<V>
    where
        K: Hash + Eq,
        V: Clone,
        F: FnOnce() -> EngineResult<V>,
    {
        if let Some(hit) = table.read().unwrap_or_else(PoisonError::into_inner).get(&key) {
            return Ok(hit.clone());
        }
        // Computed outside the lock; a racing writer may insert first, in which
        // case its value is kept.
        let value = compute()?;
        let mut table = table.write().unwrap_or_else(PoisonError::into_inner);
        // Checked under the write lock so a concurrent retire either sees
        // this entry or this insert sees the new floor.
        if version < self.floor.load(Ordering::SeqCst) {
            return Ok(value);
        }
        Ok(table.entry(key).or_insert(value).clone())
    }
}
