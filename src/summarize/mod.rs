// src/summarize/mod.rs
//! Summarizer: prompt in, HTML brief out.
//!
//! Empty content is tolerated (fallback text is sent); a failed API call is
//! not (the invocation aborts and nothing is emailed).

pub mod openai;

use std::fmt;

use async_trait::async_trait;

use crate::brief::BriefPrompt;
use crate::error::SummarizeError;

pub use openai::OpenAiSummarizer;

pub const FALLBACK_BRIEF: &str = "Failed to generate brief";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BriefDocument(String);

impl BriefDocument {
    pub fn new(html: impl Into<String>) -> Self {
        Self(html.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_fallback(&self) -> bool {
        self.0 == FALLBACK_BRIEF
    }
}

impl fmt::Display for BriefDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A generative text backend. `Ok(None)` means "call succeeded, no content".
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn generate(&self, prompt: &BriefPrompt) -> Result<Option<String>, SummarizeError>;

    fn provider_name(&self) -> &'static str;
}

pub async fn summarize(
    summarizer: &dyn Summarizer,
    prompt: &BriefPrompt,
) -> Result<BriefDocument, SummarizeError> {
    let generated = summarizer.generate(prompt).await?;
    match generated.as_deref().map(strip_code_fences) {
        Some(text) if !text.is_empty() => Ok(BriefDocument::new(text)),
        _ => {
            tracing::warn!(
                provider = summarizer.provider_name(),
                "summarizer returned no content; sending fallback"
            );
            Ok(BriefDocument::new(FALLBACK_BRIEF))
        }
    }
}

/// Models sometimes wrap HTML in ```html fences despite being told not to.
/// The fence may or may not be followed by a newline.
fn strip_code_fences(s: &str) -> String {
    let t = s.trim();
    let Some(rest) = t.strip_prefix("```") else {
        return t.to_string();
    };
    let body = rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric());
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
        .to_string()
}
