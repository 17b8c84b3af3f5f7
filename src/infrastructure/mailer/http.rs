use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::MailerConfig;
use crate::domain::{Mailer, OutboundEmail};

#[derive(Serialize)]
struct MailPayload<'a> {
    // ---
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    html: &'a str,
    text: &'a str,
}

/// Mailer that delivers through a Resend-compatible JSON API.
///
/// One POST per message, authenticated with a bearer key. The request
/// timeout is bounded so a slow mail provider cannot stall a signup
/// response; callers already treat delivery as fail-open.
pub struct HttpMailer {
    // ---
    http: reqwest::Client,
    api_key: String,
    api_url: String,
    from: String,
}

impl HttpMailer {
    // ---
    pub fn new(api_key: String, config: &MailerConfig) -> Result<Self> {
        // ---
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("failed to build mail HTTP client")?;

        Ok(Self {
            http,
            api_key,
            api_url: config.api_url.clone(),
            from: config.from.clone(),
        })
    }
}

#[async_trait::async_trait]
impl Mailer for HttpMailer {
    // ---
    async fn send(&self, message: &OutboundEmail) -> Result<()> {
        // ---
        let payload = MailPayload {
            from: &self.from,
            to: &message.to,
            subject: &message.subject,
            html: &message.html,
            text: &message.text,
        };

        let response = self
            .http
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await
            .context("mail API request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("mail API returned {status}: {body}");
        }

        Ok(())
    }
}
