//! Utility functions for URL handling, log formatting, and file system checks.
//!
//! - URL resolution for hrefs scraped from listing pages
//! - String truncation for log fields
//! - Output directory validation before any browser work starts

use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};
use url::Url;

/// Resolve a scraped href against the site's origin.
///
/// An href that already carries a scheme is returned unchanged; anything
/// else is joined onto `origin`.
///
/// # Examples
///
/// ```ignore
/// let origin = Url::parse("https://www.anthropic.com").unwrap();
/// assert_eq!(resolve_url("/news/foo", &origin).unwrap(), "https://www.anthropic.com/news/foo");
/// assert_eq!(resolve_url("https://example.com/x", &origin).unwrap(), "https://example.com/x");
/// ```
pub fn resolve_url(href: &str, origin: &Url) -> Result<String, url::ParseError> {
    let href = href.trim();
    match Url::parse(href) {
        Ok(_) => Ok(href.to_string()),
        Err(url::ParseError::RelativeUrlWithoutBase) => Ok(origin.join(href)?.to_string()),
        Err(e) => Err(e),
    }
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut to `max` bytes (backing off to a char boundary) with
/// an ellipsis and the number of dropped bytes appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…(+{} bytes)", &s[..end], s.len() - end)
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then creates and removes a
/// probe file.
///
/// # Errors
///
/// Returns an error if:
/// - The directory cannot be created
/// - The directory is not writable (permission denied, read-only filesystem, etc.)
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}
