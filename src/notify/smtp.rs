// src/notify/smtp.rs
use async_trait::async_trait;
use lettre::message::{Mailbox, Message, MultiPart};
use lettre::transport::smtp::{authentication::Credentials, AsyncSmtpTransport};
use lettre::{AsyncTransport, Tokio1Executor};

use super::{Mailer, OutgoingEmail};
use crate::config::secrets::{require, ENV_SMTP_HOST};
use crate::config::Secrets;
use crate::error::DeliveryError;

/// SMTP relay over implicit TLS. Credentials are optional (open relays exist).
pub struct SmtpMailer {
    host: Option<String>,
    user: Option<String>,
    pass: Option<String>,
}

impl SmtpMailer {
    pub fn from_secrets(secrets: &Secrets) -> Self {
        Self {
            host: secrets.smtp_host.clone(),
            user: secrets.smtp_user.clone(),
            pass: secrets.smtp_pass.clone(),
        }
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, DeliveryError> {
        let host = require(&self.host, ENV_SMTP_HOST, DeliveryError::MissingKey)?;
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(host)
            .map_err(|e| DeliveryError::Smtp(e.to_string()))?;
        if let (Some(user), Some(pass)) = (&self.user, &self.pass) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }
        Ok(builder.build())
    }
}

/// Build the multipart/alternative message (text first, html preferred).
pub fn build_message(email: &OutgoingEmail) -> Result<Message, DeliveryError> {
    let mut builder = Message::builder()
        .from(parse_mailbox(&email.from)?)
        .subject(email.subject.clone());
    for to in &email.to {
        builder = builder.to(parse_mailbox(to)?);
    }
    builder
        .multipart(MultiPart::alternative_plain_html(
            email.text.clone(),
            email.html.clone(),
        ))
        .map_err(|e| DeliveryError::Smtp(e.to_string()))
}

fn parse_mailbox(raw: &str) -> Result<Mailbox, DeliveryError> {
    raw.parse().map_err(|_| DeliveryError::Mailbox(raw.to_string()))
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), DeliveryError> {
        let msg = build_message(email)?;
        let transport = self.transport()?;
        transport
            .send(msg)
            .await
            .map_err(|e| DeliveryError::Smtp(e.to_string()))?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "smtp"
    }
}
