// src/brief/prompt.rs
//! The instructional template the Summarizer depends on.
//!
//! Section order and the formatting rules are a contract with the generated
//! output: changing either changes the structure of every brief.

use std::fmt;

use chrono::NaiveDate;

use crate::brief::sections::Section;

/// Max sentences per bullet requested from the generator.
pub const SENTENCES_PER_BULLET: usize = 2;

/// Max bullets per news section requested from the generator.
pub const BULLETS_PER_SECTION: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BriefPrompt(String);

impl BriefPrompt {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for BriefPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Interpolate section bodies into the template. `bodies` must already be in
/// `Section` order (the Aggregator iterates a `SectionSet`).
pub fn render_prompt(date: NaiveDate, bodies: &[(Section, String)]) -> BriefPrompt {
    let order = bodies
        .iter()
        .map(|(s, _)| s.title())
        .collect::<Vec<_>>()
        .join(", ");

    let mut out = String::with_capacity(4096);
    out.push_str(&format!(
        "You are an editor writing a daily email brief for {}.\n",
        date.format("%A, %B %-d, %Y")
    ));
    out.push_str(&format!(
        "Summarize the sections below in exactly this order: {order}.\n\n"
    ));

    out.push_str("Formatting rules:\n");
    out.push_str("- Output semantic HTML only: one <h2> heading per section followed by a <ul> of <li> bullets. No markdown, no code fences, no <html> or <body> wrapper.\n");
    out.push_str(&format!(
        "- Each bullet is at most {SENTENCES_PER_BULLET} sentences.\n"
    ));
    out.push_str(&format!(
        "- Cover at most {BULLETS_PER_SECTION} of the most significant items per news section.\n"
    ));
    out.push_str("- When an item has a source link, end its bullet with <a href=\"LINK\">source</a>. Never invent links.\n");
    if bodies.iter().any(|(s, _)| *s == Section::Markets) {
        out.push_str("- For Markets, write one bullet per instrument with its price and percent change.\n");
    }
    out.push_str("- If a section says its data is unavailable or has no items, write a single bullet saying so.\n");

    for (section, body) in bodies {
        out.push_str(&format!("\n### {}\n{}\n", section.title(), body.trim_end()));
    }

    BriefPrompt(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 18).unwrap()
    }

    #[test]
    fn names_sections_in_order_and_embeds_bodies() {
        let p = render_prompt(
            date(),
            &[
                (Section::AiNews, "ai line".into()),
                (Section::Markets, "SPY: $1.00 (+0.00%)".into()),
            ],
        );
        let s = p.as_str();
        assert!(s.contains("Sunday, October 18, 2026"));
        assert!(s.contains("in exactly this order: AI News, Markets."));
        let ai = s.find("### AI News\nai line").expect("ai section");
        let mk = s.find("### Markets\nSPY: $1.00 (+0.00%)").expect("markets section");
        assert!(ai < mk);
    }

    #[test]
    fn states_format_sentence_cap_and_link_rule() {
        let p = render_prompt(date(), &[(Section::WorldNews, "w".into())]);
        let s = p.as_str();
        assert!(s.contains("<h2>"));
        assert!(s.contains("at most 2 sentences"));
        assert!(s.contains("<a href=\"LINK\">source</a>"));
        assert!(!s.contains("For Markets"));
        assert!(!s.contains("### Markets"));
    }
}
