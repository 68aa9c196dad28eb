use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::Arc;
use tracing::{info, warn};

use crate::errors::{AppError, LlmError};
use crate::external::openai::LlmProvider;
use crate::models::{Sentiment, SummaryRequest, SummaryResult};
use crate::services::vocabulary::{self, Polarity};

pub const MAX_KEY_POINTS: usize = 5;
pub const MAX_KEYWORDS: usize = 5;
pub const MIN_SENTENCE_CHARS: usize = 10;

pub const LLM_CONFIDENCE: f64 = 0.9;
pub const HEURISTIC_CONFIDENCE: f64 = 0.75;
pub const FALLBACK_CONFIDENCE: f64 = 0.78;

const SYSTEM_INSTRUCTION: &str = "You are a professional news analyst. Produce a concise, \
informative summary of the given news article, followed by its key points and main themes. \
Format your response in markdown and list each key point as a bullet point.";

const LLM_FILLER_POINTS: [&str; 3] = [
    "Key insights and analysis provided",
    "Important developments highlighted",
    "Context and implications discussed",
];

static SENTENCE_SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]+").expect("valid sentence regex"));
static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z]+").expect("valid word regex"));
static BULLET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[•\-*]\s*(.+)$").expect("valid bullet regex"));

/// Which way the heuristic path was entered; drives confidence and labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeuristicEntry {
    /// No usable LLM key configured.
    Unconfigured,
    /// The LLM call failed for this request.
    AfterFailure,
}

impl HeuristicEntry {
    fn confidence(self) -> f64 {
        match self {
            HeuristicEntry::Unconfigured => HEURISTIC_CONFIDENCE,
            HeuristicEntry::AfterFailure => FALLBACK_CONFIDENCE,
        }
    }

    fn engine(self) -> &'static str {
        match self {
            HeuristicEntry::Unconfigured => "Enhanced Content Analysis",
            HeuristicEntry::AfterFailure => "Enhanced Content Analysis Engine",
        }
    }
}

/// Summarizes articles with an LLM when one is configured, otherwise
/// (or when the call fails) with the local keyword heuristic.
pub struct SummaryEngine {
    llm: Option<Arc<dyn LlmProvider>>,
}

impl SummaryEngine {
    pub fn new(llm: Option<Arc<dyn LlmProvider>>) -> Self {
        Self { llm }
    }

    pub fn llm_enabled(&self) -> bool {
        self.llm.is_some()
    }

    pub async fn summarize(&self, request: &SummaryRequest) -> Result<SummaryResult, AppError> {
        if !request.has_content() {
            return Err(AppError::MissingContent);
        }

        let text = request.text_parts().join("\n\n");
        info!("📝 Summarizing {} characters", text.len());

        let Some(llm) = &self.llm else {
            return Ok(heuristic_summary(request, &text, HeuristicEntry::Unconfigured, None));
        };

        match self.summarize_with_llm(llm.as_ref(), request, &text).await {
            Ok(result) => Ok(result),
            Err(e) => {
                warn!("🔄 LLM summary failed ({}), using content analysis fallback", e);
                let status = match e {
                    LlmError::InvalidKey => "Invalid OpenAI API key",
                    _ => "API temporarily unavailable",
                };
                Ok(heuristic_summary(
                    request,
                    &text,
                    HeuristicEntry::AfterFailure,
                    Some(status.to_string()),
                ))
            }
        }
    }

    async fn summarize_with_llm(
        &self,
        llm: &dyn LlmProvider,
        request: &SummaryRequest,
        text: &str,
    ) -> Result<SummaryResult, LlmError> {
        let prompt = format!(
            "Please summarize this news article:\n\nTitle: {}\n\nContent: {}",
            request.title.as_deref().unwrap_or("Untitled"),
            text
        );

        let summary = llm.generate_completion(SYSTEM_INSTRUCTION, prompt).await?;
        info!("✅ LLM summary generated");

        let mut key_points = extract_bullets(&summary);
        if key_points.is_empty() {
            key_points = LLM_FILLER_POINTS.iter().map(|s| s.to_string()).collect();
        }

        Ok(SummaryResult {
            summary,
            key_points,
            sentiment: Sentiment::Neutral,
            confidence: LLM_CONFIDENCE,
            title: request.title.clone(),
            url: request.url.clone(),
            source: llm.name(),
            word_count: word_count(text),
            generated_at: Utc::now(),
            api_key_status: None,
            article_source: request.source.as_ref().and_then(|s| s.display_name()),
            published_at: request.published_at.clone(),
        })
    }
}

/// Lines starting with `•`, `-` or `*`, max 5. `**bold**` headings are not bullets.
pub fn extract_bullets(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.starts_with("**"))
        .filter_map(|line| BULLET_RE.captures(line))
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|point| !point.is_empty())
        .take(MAX_KEY_POINTS)
        .collect()
}

pub fn split_sentences(text: &str) -> Vec<String> {
    SENTENCE_SPLIT_RE
        .split(text)
        .map(|s| s.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|s| s.chars().count() > MIN_SENTENCE_CHARS)
        .collect()
}

/// Vocabulary terms in order of first appearance, deduplicated, max 5.
pub fn extract_keywords(text: &str) -> Vec<&'static str> {
    let lower = text.to_lowercase();
    let mut keywords: Vec<&'static str> = Vec::new();

    for word in WORD_RE.find_iter(&lower).map(|m| m.as_str()) {
        if keywords.len() == MAX_KEYWORDS {
            break;
        }
        if let Some(term) = vocabulary::lookup(word) {
            if !keywords.contains(&term) {
                keywords.push(term);
            }
        }
    }

    keywords
}

pub fn topics_for(keywords: &[&str]) -> Vec<&'static str> {
    let mut topics: Vec<&'static str> = Vec::new();
    for topic in keywords.iter().filter_map(|k| vocabulary::topic_of(k)) {
        if !topics.contains(&topic) {
            topics.push(topic);
        }
    }
    topics
}

pub fn classify_sentiment(keywords: &[&str]) -> Sentiment {
    let polarities: Vec<Polarity> = keywords
        .iter()
        .filter_map(|k| vocabulary::polarity_of(k))
        .collect();

    if polarities.contains(&Polarity::Positive) {
        Sentiment::Positive
    } else if polarities.contains(&Polarity::Negative) {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

pub fn heuristic_summary(
    request: &SummaryRequest,
    text: &str,
    entry: HeuristicEntry,
    api_key_status: Option<String>,
) -> SummaryResult {
    let sentences = split_sentences(text);
    let keywords = extract_keywords(text);
    let topics = topics_for(&keywords);

    let title = request.title.as_deref().unwrap_or("Untitled article");
    let overview = sentences
        .first()
        .cloned()
        .or_else(|| request.description.clone().filter(|d| !d.trim().is_empty()))
        .unwrap_or_else(|| "Article analysis unavailable".to_string());

    let topics_line = if topics.is_empty() {
        "General news topics".to_string()
    } else {
        topics.join(", ")
    };
    let keywords_line = if keywords.is_empty() {
        "none detected".to_string()
    } else {
        keywords.join(", ")
    };

    let summary = format!(
        "**Content Analysis of \"{title}\":**\n\n\
         **Overview**: {overview}\n\n\
         **Key Topics**: {topics_line}\n\n\
         **Keywords**: {keywords_line}\n\n\
         **Analysis**: This article covers developments with potential implications for \
         stakeholders and the broader community.\n\n\
         *Generated by local content analysis. A valid OpenAI API key enables full AI summaries.*"
    );

    let mut key_points = vec![
        sentences
            .first()
            .cloned()
            .unwrap_or_else(|| "Main content analysis".to_string()),
        if topics.is_empty() {
            "Important developments covered".to_string()
        } else {
            format!("Key topics: {}", topics.iter().take(3).cloned().collect::<Vec<_>>().join(", "))
        },
        "Implications for stakeholders discussed".to_string(),
        "Broader context and significance highlighted".to_string(),
    ];
    key_points.truncate(MAX_KEY_POINTS);

    SummaryResult {
        summary,
        key_points,
        sentiment: classify_sentiment(&keywords),
        confidence: entry.confidence(),
        title: request.title.clone(),
        url: request.url.clone(),
        source: entry.engine().to_string(),
        word_count: word_count(text),
        generated_at: Utc::now(),
        api_key_status: Some(
            api_key_status.unwrap_or_else(|| "Invalid or missing OpenAI API key".to_string()),
        ),
        article_source: request.source.as_ref().and_then(|s| s.display_name()),
        published_at: request.published_at.clone(),
    }
}

fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
