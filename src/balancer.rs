//! Round-robin selection over a fixed pool of workers

use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// One backend listener. Immutable once the pool is up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerTarget {
    /// Stable identifier, e.g. `app-2`
    pub id: String,
    pub host: String,
    pub port: u16,
}

impl WorkerTarget {
    pub fn new(id: impl Into<String>, host: impl Into<String>, port: u16) -> Self {
        Self {
            id: id.into(),
            host: host.into(),
            port,
        }
    }

    /// `host:port`, the value sent as the upstream `host` header.
    pub fn authority(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Display for WorkerTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "http://{}:{}", self.host, self.port)
    }
}

/// Owns the ordered target list and the rotation cursor.
///
/// The cursor is always in `[0, N)`. Selection is a single CAS, so requests
/// accepted concurrently on different runtime threads still get distinct,
/// consecutive positions.
#[derive(Debug)]
pub struct RoundRobin {
    targets: Arc<[Arc<WorkerTarget>]>,
    cursor: AtomicUsize,
}

impl RoundRobin {
    /// Returns `None` for an empty pool.
    pub fn new(targets: Vec<WorkerTarget>) -> Option<Self> {
        if targets.is_empty() {
            return None;
        }

        Some(Self {
            targets: targets.into_iter().map(Arc::new).collect(),
            cursor: AtomicUsize::new(0),
        })
    }

    /// Take the target under the cursor and advance it by one.
    pub fn next_target(&self) -> Arc<WorkerTarget> {
        let len = self.targets.len();
        let index = self
            .cursor
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |i| Some((i + 1) % len))
            .unwrap_or_else(|i| i); // closure never returns None

        self.targets[index].clone()
    }

    /// Targets in rotation order.
    pub fn targets(&self) -> &[Arc<WorkerTarget>] {
        &self.targets
    }
}
