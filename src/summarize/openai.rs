// src/summarize/openai.rs
//! OpenAI Chat Completions backend. The prompt is sent as a single user message.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::brief::BriefPrompt;
use crate::config::secrets::{require, ENV_OPENAI};
use crate::config::SummarizerConfig;
use crate::error::SummarizeError;
use crate::summarize::Summarizer;

/// Error bodies are cut to this many chars before they reach logs/responses.
const ERROR_BODY_CAP: usize = 300;

#[derive(Serialize)]
struct Msg<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct Req<'a> {
    model: &'a str,
    messages: Vec<Msg<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct Resp {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMsg,
}

#[derive(Deserialize)]
struct ChoiceMsg {
    content: Option<String>,
}

pub struct OpenAiSummarizer {
    http: reqwest::Client,
    api_key: Option<String>,
    cfg: SummarizerConfig,
}

impl OpenAiSummarizer {
    pub fn new(http: reqwest::Client, cfg: SummarizerConfig, api_key: Option<String>) -> Self {
        Self { http, api_key, cfg }
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.cfg.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    async fn generate(&self, prompt: &BriefPrompt) -> Result<Option<String>, SummarizeError> {
        let key = require(&self.api_key, ENV_OPENAI, SummarizeError::MissingKey)?;

        let req = Req {
            model: &self.cfg.model,
            messages: vec![Msg {
                role: "user",
                content: prompt.as_str(),
            }],
            temperature: self.cfg.temperature,
            max_tokens: self.cfg.max_tokens,
        };

        let resp = self
            .http
            .post(self.endpoint())
            .bearer_auth(key)
            .json(&req)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SummarizeError::Status {
                status: status.as_u16(),
                body: body.chars().take(ERROR_BODY_CAP).collect(),
            });
        }

        let body: Resp = resp.json().await?;
        tracing::debug!(model = %self.cfg.model, choices = body.choices.len(), "completion received");
        Ok(body.choices.into_iter().next().and_then(|c| c.message.content))
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}
