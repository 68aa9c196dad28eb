use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sentiment classification for a summarized article
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sentiment::Positive => write!(f, "positive"),
            Sentiment::Neutral => write!(f, "neutral"),
            Sentiment::Negative => write!(f, "negative"),
        }
    }
}

/// The browser sends either `"source": "BBC"` or `"source": {"id": .., "name": ..}`.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SourceRef {
    Name(String),
    Object {
        id: Option<String>,
        name: Option<String>,
    },
}

impl SourceRef {
    pub fn display_name(&self) -> Option<String> {
        match self {
            SourceRef::Name(name) => Some(name.clone()),
            SourceRef::Object { name, id } => name.clone().or_else(|| id.clone()),
        }
    }
}

/// Body of `POST /summarize`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub content: Option<String>,
    pub url: Option<String>,
    pub source: Option<SourceRef>,
    pub published_at: Option<String>,
}

impl SummaryRequest {
    /// Non-empty text fields in title, description, content order.
    pub fn text_parts(&self) -> Vec<&str> {
        [&self.title, &self.description, &self.content]
            .into_iter()
            .filter_map(|field| field.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn has_content(&self) -> bool {
        !self.text_parts().is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SummaryResult {
    pub summary: String,
    /// Always 1..=5 entries
    pub key_points: Vec<String>,
    pub sentiment: Sentiment,
    pub confidence: f64,
    pub title: Option<String>,
    pub url: Option<String>,
    /// Engine that produced the summary
    pub source: String,
    pub word_count: usize,
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub article_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub published_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_ref_accepts_both_shapes() {
        let req: SummaryRequest =
            serde_json::from_str(r#"{"title":"t","source":{"id":null,"name":"CNN"}}"#).unwrap();
        assert_eq!(req.source.unwrap().display_name().as_deref(), Some("CNN"));

        let req: SummaryRequest = serde_json::from_str(r#"{"title":"t","source":"BBC"}"#).unwrap();
        assert_eq!(req.source.unwrap().display_name().as_deref(), Some("BBC"));
    }

    #[test]
    fn test_blank_fields_are_not_content() {
        let req = SummaryRequest {
            title: Some("".into()),
            description: Some("   ".into()),
            content: None,
            ..Default::default()
        };
        assert!(!req.has_content());
    }
}
