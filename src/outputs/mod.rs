//! Output generation.
//!
//! # Submodules
//!
//! - [`rss`]: serializes articles to an RSS 2.0 document and writes it to disk
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── anthropic_news_rss.xml
//! └── anthropic_engineering_rss.xml
//! ```
//!
//! File names come from each site's profile and must match the name used in
//! the feed's self-link, since that is where readers will fetch it from.

pub mod rss;
