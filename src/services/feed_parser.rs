//! RSS payload → normalized [`Article`] list.

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use rand::Rng;
use regex::Regex;
use rss::{Channel, Item};

use crate::errors::FeedError;
use crate::models::{Article, ArticleOrigin};

pub const MAX_ITEMS_PER_FEED: usize = 20;
pub const MAX_CONTENT_CHARS: usize = 500;
pub const ELLIPSIS: &str = "...";
pub const UNTITLED: &str = "Untitled";
pub const GENERIC_SOURCE: &str = "RSS Feed";

/// Used when an item carries no image of its own.
pub const PLACEHOLDER_IMAGES: [&str; 4] = [
    "https://images.unsplash.com/photo-1504711434969-e33886168f5c?w=800&h=400&fit=crop",
    "https://images.unsplash.com/photo-1495020689067-958852a7765e?w=800&h=400&fit=crop",
    "https://images.unsplash.com/photo-1585829365295-ab7cd400c167?w=800&h=400&fit=crop",
    "https://images.unsplash.com/photo-1519389950473-47ba0277781c?w=800&h=400&fit=crop",
];

/// Substring (lowercase) → outlet display name. Best-effort only.
const KNOWN_OUTLETS: &[(&str, &str)] = &[
    ("bbci.co.uk", "BBC News"),
    ("bbc.co", "BBC News"),
    ("bbc", "BBC News"),
    ("cnn.com", "CNN"),
    ("cnn", "CNN"),
    ("reuters", "Reuters"),
    ("npr.org", "NPR"),
    ("theguardian", "The Guardian"),
    ("nytimes", "The New York Times"),
    ("aljazeera", "Al Jazeera"),
];

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));
static IMG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)<img[^>]+src="([^">]+)""#).expect("valid img regex"));
static WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace regex"));

/// Parse an RSS document.
///
/// `feed_source_hint` is usually the feed URL; it is only consulted to guess
/// the outlet name when the channel has no title.
pub fn parse(
    xml: &str,
    feed_source_hint: &str,
    rng: &mut impl Rng,
) -> Result<Vec<Article>, FeedError> {
    let channel =
        Channel::read_from(xml.as_bytes()).map_err(|e| FeedError::Malformed(e.to_string()))?;

    let fetched_at = Utc::now();

    let articles = channel
        .items()
        .iter()
        .take(MAX_ITEMS_PER_FEED)
        .map(|item| parse_item(item, &channel, feed_source_hint, fetched_at, rng))
        .collect();

    Ok(articles)
}

fn parse_item(
    item: &Item,
    channel: &Channel,
    feed_source_hint: &str,
    fetched_at: DateTime<Utc>,
    rng: &mut impl Rng,
) -> Article {
    let title = item
        .title()
        .map(strip_html)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| UNTITLED.to_string());

    let raw_description = item.description().unwrap_or_default();
    let description = Some(strip_html(raw_description)).filter(|d| !d.is_empty());

    let content = item
        .content()
        .map(strip_html)
        .filter(|c| !c.is_empty())
        .or_else(|| description.clone())
        .map(|c| truncate_chars(&c, MAX_CONTENT_CHARS));

    let url = item
        .link()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or("#")
        .to_string();

    let image_url = item
        .enclosure()
        .filter(|e| e.mime_type().starts_with("image/"))
        .map(|e| e.url().to_string())
        .or_else(|| extract_image(raw_description))
        .or_else(|| item.content().and_then(extract_image))
        .or_else(|| extract_media_thumbnail(item))
        .unwrap_or_else(|| placeholder_image(rng).to_string());

    let published_at = item
        .pub_date()
        .and_then(parse_pub_date)
        .unwrap_or(fetched_at);

    let author = item
        .author()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(str::to_string);

    Article {
        source_name: resolve_source_name(channel.title(), feed_source_hint, &url, &title),
        author,
        title,
        description,
        content,
        url,
        image_url: Some(image_url),
        published_at,
        origin: ArticleOrigin::Rss,
    }
}

/// Channel title first, then a substring guess over the hint, link and title.
pub fn resolve_source_name(channel_title: &str, hint: &str, link: &str, title: &str) -> String {
    let channel_title = strip_html(channel_title);
    if !channel_title.is_empty() {
        return channel_title;
    }

    infer_outlet(&[hint, link, title])
        .unwrap_or(GENERIC_SOURCE)
        .to_string()
}

fn infer_outlet(haystacks: &[&str]) -> Option<&'static str> {
    haystacks.iter().find_map(|haystack| {
        let lower = haystack.to_lowercase();
        KNOWN_OUTLETS
            .iter()
            .find(|(needle, _)| lower.contains(needle))
            .map(|(_, name)| *name)
    })
}

pub fn strip_html(input: &str) -> String {
    let without_tags = TAG_RE.replace_all(input, " ");
    WS_RE.replace_all(without_tags.trim(), " ").into_owned()
}

pub fn extract_image(html: &str) -> Option<String> {
    IMG_RE
        .captures(html)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
}

fn extract_media_thumbnail(item: &Item) -> Option<String> {
    let media = item.extensions().get("media")?;
    ["thumbnail", "content"]
        .iter()
        .filter_map(|name| media.get(*name))
        .flatten()
        .find_map(|ext| ext.attrs().get("url").cloned())
}

pub fn placeholder_image(rng: &mut impl Rng) -> &'static str {
    PLACEHOLDER_IMAGES[rng.random_range(0..PLACEHOLDER_IMAGES.len())]
}

pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max).collect();
    out.push_str(ELLIPSIS);
    out
}

fn parse_pub_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
