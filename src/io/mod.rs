//! IO modules - external system interfaces
//!
//! This module contains all external IO operations:
//! - `http` - HTTP server for the lead endpoints, health and metrics
//! - `crm` - CRM (GoHighLevel) lead forwarding
//! - `prefs` - Currency display preference persistence

pub mod crm;
pub mod http;
pub mod prefs;

// Re-export commonly used types
pub use crm::{CrmError, GhlClient, LeadSink};
pub use prefs::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore};
