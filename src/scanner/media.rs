use std::sync::LazyLock;

use regex::Regex;

/// Any JSON attribute named `id` with an integer value. Ids that are not
/// attachments resolve to nothing downstream.
static ATTRIBUTE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""id"\s*:\s*(\d+)"#).expect("attribute id pattern"));

/// Absolute URLs ending in a media extension
static MEDIA_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)\bhttps?://[^\s"']+\.(?:png|jpe?g|gif|webp|avif|svg|mp4|webm|mov|ogg|mp3|wav|m4a)\b"#,
    )
    .expect("media url pattern")
});

pub(super) fn attribute_ids(content: &str) -> impl Iterator<Item = u64> + '_ {
    ATTRIBUTE_ID
        .captures_iter(content)
        .filter_map(|caps| caps.get(1)?.as_str().parse::<u64>().ok())
        .filter(|id| *id > 0)
}

pub(super) fn media_urls(content: &str) -> impl Iterator<Item = &str> + '_ {
    MEDIA_URL.find_iter(content).map(|m| m.as_str())
}
