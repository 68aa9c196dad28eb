use chrono::{DateTime, Duration, Utc};

use crate::models::{Article, ArticleCollection, ArticleOrigin};

struct MockEntry {
    source: &'static str,
    author: &'static str,
    title: &'static str,
    description: &'static str,
    slug: &'static str,
    image_text: &'static str,
    minutes_ago: i64,
}

const HEADLINES: &[MockEntry] = &[
    MockEntry {
        source: "CNN",
        author: "CNN Staff",
        title: "Major Technology Breakthrough Announced",
        description: "Scientists report a significant breakthrough in quantum computing technology that could reshape the industry.",
        slug: "tech-breakthrough",
        image_text: "Tech+News",
        minutes_ago: 0,
    },
    MockEntry {
        source: "BBC News",
        author: "BBC Reporter",
        title: "Global Climate Summit Reaches Agreement",
        description: "World leaders agree on new climate policies aimed at cutting carbon emissions over the next decade.",
        slug: "climate-summit",
        image_text: "Climate+News",
        minutes_ago: 60,
    },
    MockEntry {
        source: "Reuters",
        author: "Reuters Team",
        title: "Stock Markets Climb Amid Economic Recovery",
        description: "Major indices reach new highs as economic indicators point to a steady recovery.",
        slug: "stock-markets",
        image_text: "Finance+News",
        minutes_ago: 120,
    },
];

const NEWS: &[MockEntry] = &[
    MockEntry {
        source: "Tech Daily",
        author: "Tech Desk",
        title: "New Web Framework Released",
        description: "A new framework promises faster web development with a smaller runtime footprint.",
        slug: "tech/framework",
        image_text: "Web+Dev",
        minutes_ago: 0,
    },
    MockEntry {
        source: "AI Weekly",
        author: "AI Desk",
        title: "Artificial Intelligence Research Reaches New Milestone",
        description: "Researchers report a new milestone in artificial intelligence research and development.",
        slug: "ai/milestone",
        image_text: "AI+News",
        minutes_ago: 30,
    },
    MockEntry {
        source: "Startup Times",
        author: "Startup Desk",
        title: "Startup Closes Funding Round",
        description: "A regional startup raises a significant investment round to expand its team.",
        slug: "startup/funding",
        image_text: "Startup",
        minutes_ago: 60,
    },
    MockEntry {
        source: "Crypto Report",
        author: "Markets Desk",
        title: "Cryptocurrency Market Update",
        description: "The latest developments across cryptocurrency markets and trading volumes.",
        slug: "crypto/update",
        image_text: "Crypto",
        minutes_ago: 90,
    },
    MockEntry {
        source: "Science Today",
        author: "Science Desk",
        title: "New Scientific Study Published",
        description: "A peer-reviewed study published this week reports promising results.",
        slug: "science/study",
        image_text: "Science",
        minutes_ago: 120,
    },
];

/// Fallback for `/headlines`.
pub fn mock_headlines(now: DateTime<Utc>) -> ArticleCollection {
    build(HEADLINES, now)
}

/// Fallback for `/news` and `/search`.
pub fn mock_news(now: DateTime<Utc>) -> ArticleCollection {
    build(NEWS, now)
}

fn build(entries: &[MockEntry], now: DateTime<Utc>) -> ArticleCollection {
    let articles = entries
        .iter()
        .map(|entry| Article {
            source_name: entry.source.to_string(),
            author: Some(entry.author.to_string()),
            title: entry.title.to_string(),
            description: Some(entry.description.to_string()),
            content: Some(entry.description.to_string()),
            url: format!("https://example.com/{}", entry.slug),
            image_url: Some(format!(
                "https://via.placeholder.com/400x200/0066cc/ffffff?text={}",
                entry.image_text
            )),
            published_at: now - Duration::minutes(entry.minutes_ago),
            origin: ArticleOrigin::Mock,
        })
        .collect();

    ArticleCollection::ok(articles)
}
