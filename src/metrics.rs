use serde::Serialize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Request counters for monitoring
#[derive(Clone)]
pub struct Metrics {
    pub listings_served: Arc<AtomicUsize>,
    pub roms_served: Arc<AtomicUsize>,
    pub roms_not_found: Arc<AtomicUsize>,
    pub roms_failed: Arc<AtomicUsize>,
    pub bytes_served: Arc<AtomicU64>,
    pub start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            listings_served: Arc::new(AtomicUsize::new(0)),
            roms_served: Arc::new(AtomicUsize::new(0)),
            roms_not_found: Arc::new(AtomicUsize::new(0)),
            roms_failed: Arc::new(AtomicUsize::new(0)),
            bytes_served: Arc::new(AtomicU64::new(0)),
            start_time: Instant::now(),
        }
    }

    pub fn inc_listings_served(&self) {
        self.listings_served.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts a ROM response. `bytes` is the declared body length.
    pub fn inc_roms_served(&self, bytes: u64) {
        self.roms_served.fetch_add(1, Ordering::Relaxed);
        self.bytes_served.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn inc_roms_not_found(&self) {
        self.roms_not_found.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_roms_failed(&self) {
        self.roms_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            listings_served: self.listings_served.load(Ordering::Relaxed),
            roms_served: self.roms_served.load(Ordering::Relaxed),
            roms_not_found: self.roms_not_found.load(Ordering::Relaxed),
            roms_failed: self.roms_failed.load(Ordering::Relaxed),
            bytes_served: self.bytes_served.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
pub struct MetricsSnapshot {
    pub listings_served: usize,
    pub roms_served: usize,
    pub roms_not_found: usize,
    pub roms_failed: usize,
    pub bytes_served: u64,
    pub uptime_seconds: u64,
}
