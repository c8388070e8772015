//! # Brief Engine
//! Sequences one invocation: Aggregator -> Summarizer -> Notifier.
//!
//! Per invocation: `Idle -> Running -> {Succeeded, Failed}`. Nothing survives
//! past `run`; the runner itself only holds immutable wiring.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use metrics::{counter, histogram};
use serde::Serialize;

use crate::brief::Aggregator;
use crate::config::{BriefConfig, Secrets};
use crate::error::BriefError;
use crate::listings::{ListingFetcher, ProductHunt};
use crate::market::{AlphaVantage, MarketCollector};
use crate::notify::{build_mailer, Notifier};
use crate::summarize::{summarize, OpenAiSummarizer, Summarizer};

const USER_AGENT: &str = concat!("daily-brief/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    Idle,
    Running,
    Succeeded,
    Failed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RunState::Idle => "idle",
            RunState::Running => "running",
            RunState::Succeeded => "succeeded",
            RunState::Failed => "failed",
        })
    }
}

/// What a successful invocation did.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub state: RunState,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub used_fallback: bool,
    pub recipients: usize,
}

pub struct BriefRunner {
    aggregator: Aggregator,
    summarizer: Arc<dyn Summarizer>,
    notifier: Notifier,
}

impl BriefRunner {
    pub fn new(aggregator: Aggregator, summarizer: Arc<dyn Summarizer>, notifier: Notifier) -> Self {
        Self {
            aggregator,
            summarizer,
            notifier,
        }
    }

    /// Wire the production providers from config. One HTTP client is shared
    /// by every component.
    pub fn from_config(cfg: &BriefConfig, secrets: &Secrets) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .connect_timeout(Duration::from_secs(10))
            .build()?;

        let market = MarketCollector::new(
            Arc::new(AlphaVantage::new(
                http.clone(),
                cfg.market.base_url.clone(),
                secrets.alpha_vantage_key.clone(),
            )),
            cfg.market.instruments.clone(),
        );
        let listings = ListingFetcher::new(
            Arc::new(ProductHunt::new(
                http.clone(),
                cfg.listings.endpoint.clone(),
                secrets.product_hunt_token.clone(),
            )),
            cfg.listings.limit,
            cfg.listings.window_hours,
        );
        let aggregator = Aggregator::new(
            http.clone(),
            cfg.section_set(),
            cfg.feeds.clone(),
            market,
            listings,
        );
        let summarizer = Arc::new(OpenAiSummarizer::new(
            http.clone(),
            cfg.summarizer.clone(),
            secrets.openai_key.clone(),
        ));
        let notifier = Notifier::new(build_mailer(&cfg.email, secrets, http), &cfg.email);

        tracing::info!(
            sections = ?cfg.sections,
            transport = ?cfg.email.transport,
            recipients = cfg.email.recipients.len(),
            "brief runner configured"
        );
        Ok(Self::new(aggregator, summarizer, notifier))
    }

    /// Run one invocation. Source failures are already absorbed by the
    /// aggregator; only summarization and delivery can fail here.
    pub async fn run(&self, now: DateTime<Utc>) -> Result<RunReport, BriefError> {
        let clock = Instant::now();
        let mut state = RunState::Idle;
        advance(&mut state, RunState::Running);

        let outcome = self.pipeline(now).await;
        histogram!("brief_run_ms").record(clock.elapsed().as_secs_f64() * 1000.0);

        match outcome {
            Ok(used_fallback) => {
                advance(&mut state, RunState::Succeeded);
                counter!("brief_runs_total", "outcome" => "succeeded").increment(1);
                Ok(RunReport {
                    state,
                    started_at: now,
                    finished_at: Utc::now(),
                    used_fallback,
                    recipients: self.notifier.recipients().len(),
                })
            }
            Err(e) => {
                advance(&mut state, RunState::Failed);
                counter!("brief_runs_total", "outcome" => "failed").increment(1);
                tracing::error!(error = %e, "brief run failed");
                Err(e)
            }
        }
    }

    async fn pipeline(&self, now: DateTime<Utc>) -> Result<bool, BriefError> {
        let prompt = self.aggregator.build_prompt(now).await;
        let doc = summarize(self.summarizer.as_ref(), &prompt).await?;
        self.notifier.deliver(&doc, now.date_naive()).await?;
        Ok(doc.is_fallback())
    }
}

fn advance(state: &mut RunState, next: RunState) {
    tracing::info!(from = %state, to = %next, "brief run state");
    *state = next;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brief::{BriefPrompt, Section, SectionSet};
    use crate::config::{EmailConfig, FeedsConfig, InstrumentConfig};
    use crate::error::{DeliveryError, SourceError, SummarizeError};
    use crate::listings::{Listing, ListingSource, TimeWindow};
    use crate::market::{DailyClose, QuoteSource};
    use crate::notify::{Mailer, OutgoingEmail};
    use crate::summarize::FALLBACK_BRIEF;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct NoQuotes;

    #[async_trait]
    impl QuoteSource for NoQuotes {
        async fn daily_series(&self, _i: &InstrumentConfig) -> Result<Vec<DailyClose>, SourceError> {
            Err(SourceError::MissingKey("ALPHA_VANTAGE_API_KEY"))
        }
        fn name(&self) -> &'static str {
            "none"
        }
    }

    struct OneListing;

    #[async_trait]
    impl ListingSource for OneListing {
        async fn listings(&self, _w: &TimeWindow, _l: usize) -> Result<Vec<Listing>, SourceError> {
            Ok(vec![Listing {
                name: "Widget".into(),
                tagline: "Does things".into(),
                url: "https://ph.test/widget".into(),
                score: 42,
            }])
        }
        fn name(&self) -> &'static str {
            "one"
        }
    }

    struct Scripted {
        reply: Result<Option<&'static str>, u16>,
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Summarizer for Scripted {
        async fn generate(&self, p: &BriefPrompt) -> Result<Option<String>, SummarizeError> {
            self.seen.lock().unwrap().push(p.as_str().to_string());
            match self.reply {
                Ok(c) => Ok(c.map(str::to_string)),
                Err(status) => Err(SummarizeError::Status {
                    status,
                    body: "boom".into(),
                }),
            }
        }
        fn provider_name(&self) -> &'static str {
            "scripted"
        }
    }

    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
        last: Mutex<Option<OutgoingEmail>>,
    }

    #[async_trait]
    impl Mailer for Counting {
        async fn send(&self, email: &OutgoingEmail) -> Result<(), DeliveryError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some(email.clone());
            Ok(())
        }
        fn name(&self) -> &'static str {
            "counting"
        }
    }

    fn runner(reply: Result<Option<&'static str>, u16>) -> (BriefRunner, Arc<Scripted>, Arc<Counting>) {
        let sections: SectionSet = [Section::Markets, Section::Launches].into_iter().collect();
        let aggregator = Aggregator::new(
            reqwest::Client::new(),
            sections,
            FeedsConfig::default(),
            MarketCollector::new(Arc::new(NoQuotes), crate::config::MarketConfig::default().instruments),
            ListingFetcher::new(Arc::new(OneListing), 10, 24),
        );
        let summarizer = Arc::new(Scripted {
            reply,
            seen: Mutex::new(Vec::new()),
        });
        let mailer = Arc::new(Counting::default());
        let email = EmailConfig {
            recipients: vec!["reader@example.com".into()],
            ..EmailConfig::default()
        };
        let notifier = Notifier::new(mailer.clone(), &email);
        (
            BriefRunner::new(aggregator, summarizer.clone(), notifier),
            summarizer,
            mailer,
        )
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 6, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn success_delivers_once_with_degraded_sections_in_prompt() {
        let (r, summarizer, mailer) = runner(Ok(Some("<h2>Markets</h2>")));
        let report = r.run(now()).await.unwrap();

        assert_eq!(report.state, RunState::Succeeded);
        assert!(!report.used_fallback);
        assert_eq!(report.recipients, 1);
        assert_eq!(mailer.calls.load(Ordering::SeqCst), 1);

        let prompt = summarizer.seen.lock().unwrap()[0].clone();
        assert!(prompt.contains("Market data unavailable"));
        assert!(prompt.contains("1. Widget - Does things (https://ph.test/widget) [42 votes]"));

        let email = mailer.last.lock().unwrap().clone().unwrap();
        assert_eq!(email.subject, "Daily Brief - 2026-10-18");
        assert_eq!(email.html, "<h2>Markets</h2>");
    }

    #[tokio::test]
    async fn summarizer_failure_skips_delivery() {
        let (r, _, mailer) = runner(Err(500));
        let err = r.run(now()).await.unwrap_err();
        assert!(matches!(err, BriefError::Summarization(_)));
        assert_eq!(mailer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_content_still_delivers_fallback() {
        let (r, _, mailer) = runner(Ok(None));
        let report = r.run(now()).await.unwrap();
        assert!(report.used_fallback);
        assert_eq!(mailer.calls.load(Ordering::SeqCst), 1);
        let email = mailer.last.lock().unwrap().clone().unwrap();
        assert_eq!(email.html, FALLBACK_BRIEF);
    }

    #[test]
    fn run_state_displays_snake_case() {
        assert_eq!(RunState::Succeeded.to_string(), "succeeded");
        assert_eq!(
            serde_json::to_value(RunState::Failed).unwrap(),
            serde_json::json!("failed")
        );
    }
}
