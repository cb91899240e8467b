// src/workflows/snapshots.rs
//
// Records loaded by one listing page visit. Search, hover, focus and close
// requests work on this copy; only the page load reads the store.

use crate::domain::PropertyRecord;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Open pages kept before the oldest snapshot is dropped.
pub const MAX_OPEN_PAGES: usize = 256;

#[derive(Debug, Default)]
struct Registry {
    next: u64,
    pages: HashMap<u64, Arc<Vec<PropertyRecord>>>,
    order: VecDeque<u64>,
}

/// Shared by every astra worker.
#[derive(Debug)]
pub struct ListingSnapshots {
    capacity: usize,
    inner: Mutex<Registry>,
}

impl Default for ListingSnapshots {
    fn default() -> Self {
        Self::with_capacity(MAX_OPEN_PAGES)
    }
}

impl ListingSnapshots {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            inner: Mutex::new(Registry::default()),
        }
    }

    /// Keep `records` for a new page and return its token.
    pub fn open(&self, records: Vec<PropertyRecord>) -> u64 {
        let mut reg = self.lock();
        reg.next += 1;
        let token = reg.next;

        while reg.order.len() >= self.capacity {
            if let Some(oldest) = reg.order.pop_front() {
                reg.pages.remove(&oldest);
                warn!("dropping listing snapshot {oldest}, too many open pages");
            }
        }
        reg.pages.insert(token, Arc::new(records));
        reg.order.push_back(token);
        debug!("listing snapshot {token} opened");
        token
    }

    pub fn get(&self, token: u64) -> Option<Arc<Vec<PropertyRecord>>> {
        self.lock().pages.get(&token).cloned()
    }

    /// Forget a page; returns its records when it was still open.
    pub fn close(&self, token: u64) -> Option<Arc<Vec<PropertyRecord>>> {
        let mut reg = self.lock();
        reg.order.retain(|t| *t != token);
        reg.pages.remove(&token)
    }

    pub fn open_pages(&self) -> usize {
        self.lock().pages.len()
    }

    // a worker that panicked while holding the lock leaves the map intact
    fn lock(&self) -> std::sync::MutexGuard<'_, Registry> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}
