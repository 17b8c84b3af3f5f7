// Gateway module - controls what is exported from mailer backends

mod http;
mod log;

pub use http::HttpMailer;
pub use log::LogMailer;

use std::sync::Arc;

use anyhow::Result;

use crate::config::MailerConfig;
use crate::domain::MailerPtr;

/// Creates the mailer the configuration calls for: HTTP delivery when an
/// API key is present, the log mailer otherwise.
pub fn create_mailer(config: &MailerConfig) -> Result<MailerPtr> {
    // ---
    match &config.api_key {
        Some(api_key) => Ok(Arc::new(HttpMailer::new(api_key.clone(), config)?)),
        None => {
            tracing::info!("no mail API key configured, emails will be logged instead of sent");
            Ok(create_log_mailer())
        }
    }
}

/// Creates the development mailer that logs messages instead of sending.
pub fn create_log_mailer() -> MailerPtr {
    // ---
    Arc::new(LogMailer)
}
