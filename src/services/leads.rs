//! Lead capture payloads and validation
//!
//! Validation order is part of the public contract: the first failing
//! rule short-circuits with its specific error string, which the HTTP
//! layer returns verbatim.

use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;

pub const MAX_NAME_LEN: usize = 200;
pub const MAX_MESSAGE_LEN: usize = 5000;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_re() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex is valid")
    })
}

/// Body of `POST /api/contact`. Missing fields deserialize to their
/// defaults and are caught by validation, not by the parser.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContactLead {
    pub name: String,
    pub email: String,
    pub message: String,
    #[serde(rename = "retreatSlug")]
    pub retreat_slug: Option<String>,
    pub source: Option<String>,
}

/// Body of `POST /api/subscribe`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SubscribeLead {
    pub email: String,
    pub source: Option<String>,
}

pub fn validate_email(email: &str) -> Result<(), &'static str> {
    let email = email.trim();
    if email.is_empty() {
        return Err("Email is required");
    }
    if !email_re().is_match(email) {
        return Err("Invalid email format");
    }
    Ok(())
}

pub fn validate_contact(lead: &ContactLead) -> Result<(), &'static str> {
    if lead.name.trim().is_empty() {
        return Err("Name is required");
    }
    validate_email(&lead.email)?;
    if lead.message.trim().is_empty() {
        return Err("Message is required");
    }
    if lead.name.chars().count() > MAX_NAME_LEN {
        return Err("Name is too long");
    }
    if lead.message.chars().count() > MAX_MESSAGE_LEN {
        return Err("Message is too long");
    }
    Ok(())
}

pub fn validate_subscribe(lead: &SubscribeLead) -> Result<(), &'static str> {
    validate_email(&lead.email)
}
