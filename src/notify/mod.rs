// src/notify/mod.rs
//! Notifier: wrap the brief into an email and hand it to a mail transport.

pub mod log;
pub mod resend;
pub mod smtp;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::config::{EmailConfig, Secrets, Transport};
use crate::error::DeliveryError;
use crate::ingest::html_to_text;
use crate::summarize::BriefDocument;

pub use self::log::LogMailer;
pub use self::resend::ResendMailer;
pub use self::smtp::SmtpMailer;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
    /// text/plain alternative derived from `html`.
    pub text: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), DeliveryError>;

    fn name(&self) -> &'static str;
}

/// Pick the transport named in config.
pub fn build_mailer(cfg: &EmailConfig, secrets: &Secrets, http: reqwest::Client) -> Arc<dyn Mailer> {
    match cfg.transport {
        Transport::Resend => Arc::new(ResendMailer::new(
            http,
            cfg.resend_base_url.clone(),
            secrets.resend_key.clone(),
        )),
        Transport::Smtp => Arc::new(SmtpMailer::from_secrets(secrets)),
        Transport::Log => Arc::new(LogMailer),
    }
}

pub struct Notifier {
    mailer: Arc<dyn Mailer>,
    from: String,
    recipients: Vec<String>,
    subject_prefix: String,
}

impl Notifier {
    pub fn new(mailer: Arc<dyn Mailer>, cfg: &EmailConfig) -> Self {
        Self {
            mailer,
            from: cfg.from.clone(),
            recipients: cfg.recipients.clone(),
            subject_prefix: cfg.subject_prefix.clone(),
        }
    }

    pub fn recipients(&self) -> &[String] {
        &self.recipients
    }

    /// `Daily Brief - 2026-10-18`
    pub fn subject_for(&self, date: NaiveDate) -> String {
        format!("{} - {}", self.subject_prefix, date.format("%Y-%m-%d"))
    }

    pub fn compose(&self, doc: &BriefDocument, date: NaiveDate) -> OutgoingEmail {
        OutgoingEmail {
            from: self.from.clone(),
            to: self.recipients.clone(),
            subject: self.subject_for(date),
            html: doc.as_str().to_string(),
            text: html_to_text(doc.as_str()),
        }
    }

    pub async fn deliver(&self, doc: &BriefDocument, date: NaiveDate) -> Result<(), DeliveryError> {
        if self.recipients.is_empty() {
            return Err(DeliveryError::NoRecipients);
        }
        let email = self.compose(doc, date);
        self.mailer.send(&email).await?;
        tracing::info!(
            transport = self.mailer.name(),
            recipients = email.to.len(),
            subject = %email.subject,
            "brief delivered"
        );
        Ok(())
    }
}
