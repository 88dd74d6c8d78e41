use std::time::Duration;

use anyhow::{Context, Result};
use rand::seq::IndexedRandom;
use rand::Rng;
use reqwest::Client;
use tracing::{info, warn};

/// Fixed set of news sources. Changing sources means editing this list.
pub const RSS_FEEDS: [&str; 3] = [
    "https://feeds.bbci.co.uk/news/technology/rss.xml",
    "https://feeds.reuters.com/Reuters/worldNews",
    "https://techcrunch.com/feed/",
];

const USER_AGENT: &str = concat!("newsbot/", env!("CARGO_PKG_VERSION"));
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// One article pulled from a feed. Summary is empty when the entry has none.
#[derive(Debug, Clone, PartialEq)]
pub struct Article {
    pub title: String,
    pub link: String,
    pub summary: String,
}

/// Pick one feed URL uniformly at random.
pub fn pick_feed<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    let url = RSS_FEEDS
        .choose(rng)
        .copied()
        .expect("RSS_FEEDS is non-empty");
    info!("Fetching article from RSS feed: {}", url);
    url
}

pub fn http_client() -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(FETCH_TIMEOUT)
        .build()
        .context("Failed to build HTTP client")
}

/// Fetch a feed and extract its first entry.
///
/// A feed with zero entries is a normal outcome and yields `Ok(None)`;
/// network, HTTP and parse failures propagate as errors.
pub async fn fetch_latest_article(client: &Client, url: &str) -> Result<Option<Article>> {
    let body = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("Failed to fetch feed: {}", url))?
        .error_for_status()
        .with_context(|| format!("Feed returned an error status: {}", url))?
        .bytes()
        .await
        .with_context(|| format!("Failed to read feed body: {}", url))?;

    parse_first_entry(&body)
}

/// Parse a feed document and build an [`Article`] from its first entry,
/// trusting the feed's own entry order.
pub fn parse_first_entry(bytes: &[u8]) -> Result<Option<Article>> {
    let feed = feed_rs::parser::parse(bytes).context("Failed to parse feed")?;

    let Some(entry) = feed.entries.into_iter().next() else {
        warn!("No entries found in the RSS feed.");
        return Ok(None);
    };

    let title = entry
        .title
        .map(|t| t.content)
        .context("Feed entry has no title")?;
    let link = entry
        .links
        .first()
        .map(|l| l.href.clone())
        .context("Feed entry has no link")?;
    let summary = entry.summary.map(|s| s.content).unwrap_or_default();

    info!("Selected article: {}", title);

    Ok(Some(Article {
        title,
        link,
        summary,
    }))
}
