use std::env;

use anyhow::{Context, Result};

/// Twilio credentials and the destination number, sourced from the process
/// environment (optionally via a `.env` file).
#[derive(Debug, Clone)]
pub struct AlertConfig {
    pub account_sid: String,
    pub auth_token: String,
    pub messaging_service_sid: String,
    pub destination_number: String,
}

impl AlertConfig {
    pub fn from_env() -> Result<Self> {
        Ok(AlertConfig {
            account_sid: require("TWILIO_ACCOUNT_SID")?,
            auth_token: require("TWILIO_AUTH_TOKEN")?,
            messaging_service_sid: require("TWILIO_MESSAGE_SERVICE_SID")?,
            destination_number: require("MY_PHONE_NUMBER")?,
        })
    }
}

fn require(key: &str) -> Result<String> {
    env::var(key).with_context(|| format!("missing required environment variable {key}"))
}
