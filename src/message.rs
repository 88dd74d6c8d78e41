use crate::feed::Article;

/// Maximum number of summary characters carried into the message.
const SUMMARY_LIMIT: usize = 400;

/// Sent when the chosen feed had no entries.
pub const NO_NEWS_MESSAGE: &str = "No news found today.";

/// Render the outgoing message.
///
/// With an article: bold title, summary cut to at most 400 characters with a
/// trailing `...` (appended whether or not anything was cut), and the link.
/// The Markdown markup is delivered literally if the destination cannot
/// render it. Without an article: the fixed fallback text.
pub fn format_message(article: Option<&Article>) -> String {
    let Some(article) = article else {
        return NO_NEWS_MESSAGE.to_string();
    };

    format!(
        "📰 *{}*\n\n{}...\n\n🔗 Read more: {}",
        article.title,
        truncate_chars(&article.summary, SUMMARY_LIMIT),
        article.link
    )
}

/// First `max` characters of `text`. Counts chars, not bytes, so multi-byte
/// text is never split mid-scalar.
fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
