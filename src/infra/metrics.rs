//! Lock-free lead-traffic counters
//!
//! NOTE: All atomics use Relaxed ordering intentionally - these are
//! statistical counters only. Do NOT use them for coordination or logic
//! decisions.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::info;

/// Lock-free metrics collector for the lead endpoints.
pub struct Metrics {
    /// Lead requests received across both endpoints (monotonic)
    leads_received: AtomicU64,
    /// Leads rejected by validation (monotonic)
    leads_rejected: AtomicU64,
    /// Requests with an unparseable body (monotonic)
    leads_malformed: AtomicU64,
    /// Leads forwarded to the CRM (monotonic)
    leads_forwarded: AtomicU64,
    /// CRM forward attempts that failed (monotonic)
    forward_failures: AtomicU64,
    /// Leads accepted and logged locally, no CRM configured (monotonic)
    leads_logged_local: AtomicU64,
    started: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            leads_received: AtomicU64::new(0),
            leads_rejected: AtomicU64::new(0),
            leads_malformed: AtomicU64::new(0),
            leads_forwarded: AtomicU64::new(0),
            forward_failures: AtomicU64::new(0),
            leads_logged_local: AtomicU64::new(0),
            started: Instant::now(),
        }
    }

    #[inline]
    pub fn record_lead_received(&self) {
        self.leads_received.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_lead_rejected(&self) {
        self.leads_rejected.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_lead_malformed(&self) {
        self.leads_malformed.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_lead_forwarded(&self) {
        self.leads_forwarded.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_forward_failure(&self) {
        self.forward_failures.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub fn record_lead_logged_local(&self) {
        self.leads_logged_local.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            leads_received: self.leads_received.load(Ordering::Relaxed),
            leads_rejected: self.leads_rejected.load(Ordering::Relaxed),
            leads_malformed: self.leads_malformed.load(Ordering::Relaxed),
            leads_forwarded: self.leads_forwarded.load(Ordering::Relaxed),
            forward_failures: self.forward_failures.load(Ordering::Relaxed),
            leads_logged_local: self.leads_logged_local.load(Ordering::Relaxed),
            uptime_secs: self.started.elapsed().as_secs(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Point-in-time view of the counters for logging and exposition.
#[derive(Debug, Clone, Copy)]
pub struct MetricsSnapshot {
    pub leads_received: u64,
    pub leads_rejected: u64,
    pub leads_malformed: u64,
    pub leads_forwarded: u64,
    pub forward_failures: u64,
    pub leads_logged_local: u64,
    pub uptime_secs: u64,
}

impl MetricsSnapshot {
    pub fn log(&self) {
        info!(
            received = self.leads_received,
            rejected = self.leads_rejected,
            malformed = self.leads_malformed,
            forwarded = self.leads_forwarded,
            forward_failures = self.forward_failures,
            logged_local = self.leads_logged_local,
            uptime_secs = self.uptime_secs,
            "metrics_report"
        );
    }
}
