use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::info;

use crate::config::AlertConfig;

const TWILIO_API_BASE: &str = "https://api.twilio.com/2010-04-01";
const ALERT_BODY: &str = "BOOK YOUR COVID VACCINE!!!";

/// One-shot outbound notification. At most one send per positive detection;
/// a delivery failure propagates to the caller unretried.
#[async_trait]
pub trait AlertSink {
    async fn send_alert(&self) -> Result<()>;
}

/// Delivery record returned by the Twilio message API.
#[derive(Debug, Deserialize)]
struct MessageRecord {
    sid: String,
    status: String,
}

pub struct TwilioNotifier {
    http: reqwest::Client,
    config: AlertConfig,
}

impl TwilioNotifier {
    pub fn new(config: AlertConfig) -> Self {
        TwilioNotifier {
            http: reqwest::Client::new(),
            config,
        }
    }

    fn messages_url(&self) -> String {
        format!(
            "{TWILIO_API_BASE}/Accounts/{}/Messages.json",
            self.config.account_sid
        )
    }
}

#[async_trait]
impl AlertSink for TwilioNotifier {
    async fn send_alert(&self) -> Result<()> {
        let params = [
            (
                "MessagingServiceSid",
                self.config.messaging_service_sid.as_str(),
            ),
            ("To", self.config.destination_number.as_str()),
            ("Body", ALERT_BODY),
        ];

        let record: MessageRecord = self
            .http
            .post(self.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&params)
            .send()
            .await
            .context("failed to reach the Twilio API")?
            .error_for_status()
            .context("Twilio rejected the message")?
            .json()
            .await
            .context("failed to decode the Twilio delivery record")?;

        info!("alert dispatched: sid={} status={}", record.sid, record.status);
        Ok(())
    }
}
