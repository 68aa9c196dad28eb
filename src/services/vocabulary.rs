//! Vocabulary tables for heuristic summaries.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Polarity {
    Positive,
    Negative,
}

/// Domain term → topic label shown in summaries.
pub const TOPICS: &[(&str, &str)] = &[
    ("technology", "technology"),
    ("tech", "technology"),
    ("ai", "technology"),
    ("artificial", "technology"),
    ("intelligence", "technology"),
    ("business", "business"),
    ("company", "business"),
    ("industry", "business"),
    ("startup", "business"),
    ("economy", "economy"),
    ("market", "economy"),
    ("trade", "economy"),
    ("investment", "economy"),
    ("crypto", "economy"),
    ("politics", "politics"),
    ("government", "politics"),
    ("election", "politics"),
    ("court", "legal"),
    ("legal", "legal"),
    ("health", "health"),
    ("science", "science"),
    ("quantum", "science"),
    ("research", "science"),
    ("study", "science"),
    ("sports", "sports"),
    ("entertainment", "entertainment"),
    ("development", "development"),
    ("innovation", "innovation"),
    ("breakthrough", "innovation"),
    ("report", "analysis"),
    ("analysis", "analysis"),
];

/// Terms that tilt the heuristic sentiment.
pub const POLARITY: &[(&str, Polarity)] = &[
    ("positive", Polarity::Positive),
    ("growth", Polarity::Positive),
    ("success", Polarity::Positive),
    ("breakthrough", Polarity::Positive),
    ("innovation", Polarity::Positive),
    ("negative", Polarity::Negative),
    ("crisis", Polarity::Negative),
    ("decline", Polarity::Negative),
    ("problem", Polarity::Negative),
    ("issue", Polarity::Negative),
];

pub fn topic_of(term: &str) -> Option<&'static str> {
    TOPICS
        .iter()
        .find(|(word, _)| *word == term)
        .map(|(_, topic)| *topic)
}

pub fn polarity_of(term: &str) -> Option<Polarity> {
    POLARITY
        .iter()
        .find(|(word, _)| *word == term)
        .map(|(_, polarity)| *polarity)
}

/// The table's own spelling of `word`, if it is a known term.
pub fn lookup(word: &str) -> Option<&'static str> {
    TOPICS
        .iter()
        .map(|(term, _)| *term)
        .chain(POLARITY.iter().map(|(term, _)| *term))
        .find(|term| *term == word)
}
