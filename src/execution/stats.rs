use crate::prelude::*;

use std::sync::atomic::{AtomicI64, Ordering::Relaxed};

#[derive(Default, Serialize)]
pub struct Counter(pub AtomicI64);

impl Counter {
    pub fn inc(&self, by: i64) {
        self.0.fetch_add(by, Relaxed);
    }

    pub fn get(&self) -> i64 {
        self.0.load(Relaxed)
    }
}

impl Clone for Counter {
    fn clone(&self) -> Self {
        Self(AtomicI64::new(self.get()))
    }
}

impl std::fmt::Display for Counter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.get())
    }
}

impl std::fmt::Debug for Counter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.get())
    }
}

#[derive(Debug, Serialize, Default, Clone)]
pub struct ExecutionStats {
    pub num_succeeded: Counter,
    /// Items that failed, whether the run was aborted or continued.
    pub num_failed: Counter,
    /// Requests handed to the transport for any item, counting each page of a list-all.
    pub num_requests: Counter,
}

impl ExecutionStats {
    pub fn num_items(&self) -> i64 {
        self.num_succeeded.get() + self.num_failed.get()
    }
}

impl std::fmt::Display for ExecutionStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} items: {} succeeded, {} failed, {} requests",
            self.num_items(),
            self.num_succeeded,
            self.num_failed,
            self.num_requests
        )
    }
}
