// src/notify/log.rs
//! Dry-run transport: logs the message instead of sending it.

use async_trait::async_trait;

use super::{Mailer, OutgoingEmail};
use crate::error::DeliveryError;

pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), DeliveryError> {
        tracing::info!(
            from = %email.from,
            to = ?email.to,
            subject = %email.subject,
            html_len = email.html.len(),
            "email (log transport)\n{}",
            email.text
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
