use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use chrono::NaiveDate;
use tokio::sync::{OwnedRwLockReadGuard, OwnedRwLockWriteGuard, RwLock};

/// Number of lock slots kept before idle ones are dropped.
const PRUNE_ABOVE: usize = 256;

/// Read/write locks keyed by ledger date.
///
/// Every `(date, source)` key of a date shares the date's lock. Writers hold
/// it exclusively, readers share it.
#[derive(Debug, Default)]
pub struct KeyLocks {
    slots: Mutex<HashMap<NaiveDate, Arc<RwLock<()>>>>,
}

impl KeyLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self, date: NaiveDate) -> Arc<RwLock<()>> {
        // A poisoned map only means another thread panicked while holding the
        // std mutex; the map itself is still consistent.
        let mut slots = self
            .slots
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if slots.len() > PRUNE_ABOVE {
            slots.retain(|_, lock| Arc::strong_count(lock) > 1);
        }
        slots.entry(date).or_default().clone()
    }

    pub async fn read(&self, date: NaiveDate) -> OwnedRwLockReadGuard<()> {
        self.slot(date).read_owned().await
    }

    pub async fn write(&self, date: NaiveDate) -> OwnedRwLockWriteGuard<()> {
        self.slot(date).write_owned().await
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[tokio::test]
    async fn readers_share_a_date() {
        let locks = KeyLocks::new();
        let _a = locks.read(day(1)).await;
        let _b = locks.read(day(1)).await;
    }

    #[tokio::test]
    async fn writer_excludes_readers_of_the_same_date() {
        let locks = Arc::new(KeyLocks::new());
        let guard = locks.write(day(1)).await;

        let blocked = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.read(day(1)).await;
                true
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!blocked.is_finished());

        let _other_day = locks.read(day(2)).await;
        drop(guard);
        assert!(blocked.await.unwrap());
    }

    #[tokio::test]
    async fn idle_slots_are_pruned() {
        let locks = KeyLocks::new();
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        for offset in 0..(PRUNE_ABOVE as u64 + 10) {
            let date = start + chrono::Days::new(offset);
            drop(locks.write(date).await);
        }
        assert!(locks.len() <= PRUNE_ABOVE + 1);
    }
}
