use anyhow::Result;

use crate::domain::{Mailer, OutboundEmail};

/// Development mailer: logs the message instead of delivering it.
///
/// Selected automatically when no mail API key is configured, so local
/// runs and tests never need network access to exercise the flows. The
/// verification code lands in the log, which is how you complete a signup
/// against a dev instance.
pub struct LogMailer;

#[async_trait::async_trait]
impl Mailer for LogMailer {
    // ---
    async fn send(&self, message: &OutboundEmail) -> Result<()> {
        // ---
        let preview: String = message.text.chars().take(100).collect();
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            %preview,
            "email dev mode: delivery skipped"
        );

        Ok(())
    }
}
