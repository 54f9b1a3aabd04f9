// ABOUTME: Thread-safe handle around a RecordStore for callers that serve several requests at once.
// ABOUTME: Every mutation runs and persists under one lock, so readers never see a half-applied change.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::store::{RecordStore, StoreError};

/// Cloneable handle to one [`RecordStore`]. Clones share the same store.
#[derive(Clone)]
pub struct SharedStore {
    inner: Arc<Mutex<RecordStore>>,
}

impl SharedStore {
    pub fn new(store: RecordStore) -> Self {
        Self {
            inner: Arc::new(Mutex::new(store)),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, RecordStore>, StoreError> {
        self.inner.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Run `f` with shared access to the store.
    pub fn read<T>(&self, f: impl FnOnce(&RecordStore) -> T) -> Result<T, StoreError> {
        let guard = self.lock()?;
        Ok(f(&*guard))
    }

    /// Run `f` and, if it succeeds, persist the store before releasing the lock.
    /// A failing `f` leaves the file untouched.
    pub fn mutate<T>(
        &self,
        f: impl FnOnce(&mut RecordStore) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut guard = self.lock()?;
        let value = f(&mut *guard)?;
        guard.persist()?;
        Ok(value)
    }

    /// Re-read the backing file.
    pub fn reload(&self) -> Result<(), StoreError> {
        self.lock()?.reload()
    }
}
