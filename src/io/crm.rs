//! CRM (GoHighLevel) lead forwarding
//!
//! Each accepted lead is forwarded once - no retries. Callers decide how
//! a failed forward is surfaced; the detail is logged here.

use crate::infra::config::Config;
use crate::services::leads::{ContactLead, SubscribeLead};
use async_trait::async_trait;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum CrmError {
    #[error("CRM request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("CRM returned status {0}")]
    Status(u16),
}

/// Seam for lead forwarding so handlers and tests can inject fakes.
#[async_trait]
pub trait LeadSink: Send + Sync {
    async fn forward_contact(&self, lead: &ContactLead) -> Result<(), CrmError>;
    async fn forward_subscribe(&self, lead: &SubscribeLead) -> Result<(), CrmError>;
}

/// GoHighLevel v1 contacts client.
pub struct GhlClient {
    endpoint: String,
    api_key: String,
    location_id: String,
    client: reqwest::Client,
}

impl GhlClient {
    /// Build the client once for connection reuse. `None` when the CRM
    /// credentials are not configured - callers then log leads locally.
    pub fn from_config(config: &Config) -> Option<Self> {
        let api_key = config.crm_api_key()?.to_string();
        let location_id = config.crm_location_id()?.to_string();

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.crm_timeout_ms()))
            .build()
            .ok()?;

        Some(Self {
            endpoint: config.crm_endpoint().to_string(),
            api_key,
            location_id,
            client,
        })
    }

    async fn post(&self, payload: serde_json::Value, kind: &'static str) -> Result<(), CrmError> {
        let start = Instant::now();

        let response = match self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!(kind = kind, error = %e, "crm_forward_failed");
                return Err(CrmError::Request(e));
            }
        };

        let status = response.status();
        let latency_ms = start.elapsed().as_millis() as u64;

        if status.is_success() {
            info!(
                kind = kind,
                status = %status.as_u16(),
                latency_ms = %latency_ms,
                "crm_forwarded"
            );
            Ok(())
        } else {
            error!(
                kind = kind,
                status = %status.as_u16(),
                latency_ms = %latency_ms,
                "crm_forward_rejected"
            );
            Err(CrmError::Status(status.as_u16()))
        }
    }
}

#[async_trait]
impl LeadSink for GhlClient {
    async fn forward_contact(&self, lead: &ContactLead) -> Result<(), CrmError> {
        // GHL contact upsert; the message rides along as a custom field
        let payload = serde_json::json!({
            "locationId": self.location_id,
            "name": lead.name,
            "email": lead.email,
            "source": lead.source.as_deref().unwrap_or("website-contact"),
            "customField": {
                "message": lead.message,
                "retreat": lead.retreat_slug,
            },
        });
        self.post(payload, "contact").await
    }

    async fn forward_subscribe(&self, lead: &SubscribeLead) -> Result<(), CrmError> {
        let payload = serde_json::json!({
            "locationId": self.location_id,
            "email": lead.email,
            "source": lead.source.as_deref().unwrap_or("website-subscribe"),
            "tags": ["newsletter"],
        });
        self.post(payload, "subscribe").await
    }
}
