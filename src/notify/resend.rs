// src/notify/resend.rs
//! Resend HTTP API transport (`POST /emails`).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{Mailer, OutgoingEmail};
use crate::config::secrets::{require, ENV_RESEND};
use crate::error::DeliveryError;

const ERROR_BODY_CAP: usize = 300;

#[derive(Serialize)]
struct SendReq<'a> {
    from: &'a str,
    to: &'a [String],
    subject: &'a str,
    html: &'a str,
    text: &'a str,
}

// Success carries an id; failures carry a message, sometimes with a 2xx status.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SendResp {
    Sent {
        id: String,
    },
    Failed {
        message: String,
        #[serde(default)]
        name: Option<String>,
    },
}

pub struct ResendMailer {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl ResendMailer {
    pub fn new(http: reqwest::Client, base_url: String, api_key: Option<String>) -> Self {
        Self {
            http,
            base_url,
            api_key,
        }
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), DeliveryError> {
        let key = require(&self.api_key, ENV_RESEND, DeliveryError::MissingKey)?;
        let url = format!("{}/emails", self.base_url.trim_end_matches('/'));

        let resp = self
            .http
            .post(&url)
            .bearer_auth(key)
            .json(&SendReq {
                from: &email.from,
                to: &email.to,
                subject: &email.subject,
                html: &email.html,
                text: &email.text,
            })
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(DeliveryError::Status {
                status: status.as_u16(),
                body: body.chars().take(ERROR_BODY_CAP).collect(),
            });
        }
        interpret_response(&body)
    }

    fn name(&self) -> &'static str {
        "resend"
    }
}

fn interpret_response(body: &str) -> Result<(), DeliveryError> {
    match serde_json::from_str::<SendResp>(body) {
        Ok(SendResp::Sent { id }) => {
            tracing::debug!(%id, "resend accepted message");
            Ok(())
        }
        Ok(SendResp::Failed { message, name }) => Err(DeliveryError::Rejected(match name {
            Some(n) => format!("{n}: {message}"),
            None => message,
        })),
        Err(_) => Err(DeliveryError::Rejected(format!(
            "unrecognized response: {}",
            body.chars().take(ERROR_BODY_CAP).collect::<String>()
        ))),
    }
}
