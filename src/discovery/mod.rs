//! Markup scanning and entry-point discovery
//!
//! The registry site is a Next.js application. Its server-side data lives
//! under `/_next/data/<build id>/...`, and the build id is only published
//! inside the page markup. Discovery fetches the public page and scans it
//! with an ordered list of patterns; the first pattern that matches wins.

use crate::http::HttpClient;
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::{error, info, warn};

/// Build id patterns in priority order
pub static BUILD_ID_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"/_next/static/([a-zA-Z0-9_-]+)/_buildManifest\.js",
        r#""buildId":"([a-zA-Z0-9_-]+)""#,
        r"/_next/data/([a-zA-Z0-9_-]+)/",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("build id pattern is valid"))
    .collect()
});

/// Run `patterns` against `text` in order and return the first capture group
/// of the first pattern that matches.
pub fn first_capture(text: &str, patterns: &[Regex]) -> Option<String> {
    patterns.iter().find_map(|pattern| {
        pattern
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_string())
    })
}

/// Scan page markup for a Next.js build id
pub fn find_build_id(html: &str) -> Option<String> {
    first_capture(html, &BUILD_ID_PATTERNS)
}

/// Fetch `page_url` and discover the build id embedded in it.
///
/// Any fetch failure or a page without a recognizable id yields `None`.
pub async fn discover_build_id(
    client: &HttpClient,
    page_url: &str,
    timeout: Duration,
) -> Option<String> {
    info!("Fetching {page_url} to discover build ID...");

    let html = match client.get_text(page_url, timeout).await {
        Ok(html) => html,
        Err(e) => {
            error!("Error fetching website: {e}");
            return None;
        }
    };

    match find_build_id(&html) {
        Some(build_id) => {
            info!("Found Next.js build ID: {build_id}");
            Some(build_id)
        }
        None => {
            warn!("Could not find Next.js build ID in page source");
            None
        }
    }
}
