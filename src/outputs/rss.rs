//! RSS 2.0 feed serialization.
//!
//! Each [`Article`] becomes one `<item>` in the order given; nothing is
//! filtered or re-sorted here. The article title doubles as the item
//! description, and the article URL is the item's permalink `guid`.
//!
//! # Document Shape
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <rss version="2.0" xmlns:atom="http://www.w3.org/2005/Atom">
//!   <channel>
//!     <title/> <link/> <description/> <atom:link rel="self"/>
//!     <docs/> <generator/> <language/> <lastBuildDate/>
//!     <item>
//!       <title/> <link/> <description/> <guid isPermaLink="true"/> <pubDate/>
//!     </item>
//!   </channel>
//! </rss>
//! ```

use crate::models::{Article, FeedMetadata};
use chrono::{DateTime, Utc};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::error::Error;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

const ATOM_NS: &str = "http://www.w3.org/2005/Atom";
const RSS_DOCS: &str = "https://www.rssboard.org/rss-specification";

/// Serialize `articles` into a pretty-printed RSS 2.0 document.
pub fn build_feed(articles: &[Article], meta: &FeedMetadata) -> Result<Vec<u8>, Box<dyn Error>> {
    render_feed(articles, meta, Utc::now())
}

/// [`build_feed`] with an explicit `lastBuildDate`.
pub fn render_feed(
    articles: &[Article],
    meta: &FeedMetadata,
    built_at: DateTime<Utc>,
) -> Result<Vec<u8>, Box<dyn Error>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut rss = BytesStart::new("rss");
    rss.push_attribute(("version", "2.0"));
    rss.push_attribute(("xmlns:atom", ATOM_NS));
    writer.write_event(Event::Start(rss))?;
    writer.write_event(Event::Start(BytesStart::new("channel")))?;

    write_text_element(&mut writer, "title", &meta.title)?;
    write_text_element(&mut writer, "link", &meta.link)?;
    write_text_element(&mut writer, "description", &meta.description)?;

    let mut self_link = BytesStart::new("atom:link");
    self_link.push_attribute(("href", meta.self_link.as_str()));
    self_link.push_attribute(("rel", "self"));
    self_link.push_attribute(("type", "application/rss+xml"));
    writer.write_event(Event::Empty(self_link))?;

    write_text_element(&mut writer, "docs", RSS_DOCS)?;
    write_text_element(
        &mut writer,
        "generator",
        concat!(env!("CARGO_PKG_NAME"), " ", env!("CARGO_PKG_VERSION")),
    )?;
    write_text_element(&mut writer, "language", &meta.language)?;
    write_text_element(&mut writer, "lastBuildDate", &built_at.to_rfc2822())?;

    for article in articles {
        writer.write_event(Event::Start(BytesStart::new("item")))?;
        write_text_element(&mut writer, "title", article.title())?;
        write_text_element(&mut writer, "link", article.url())?;
        write_text_element(&mut writer, "description", article.title())?;

        let mut guid = BytesStart::new("guid");
        guid.push_attribute(("isPermaLink", "true"));
        writer.write_event(Event::Start(guid))?;
        writer.write_event(Event::Text(BytesText::new(article.url())))?;
        writer.write_event(Event::End(BytesEnd::new("guid")))?;

        write_text_element(&mut writer, "pubDate", &article.published().to_rfc2822())?;
        writer.write_event(Event::End(BytesEnd::new("item")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("channel")))?;
    writer.write_event(Event::End(BytesEnd::new("rss")))?;

    let mut out = writer.into_inner();
    out.push(b'\n');
    Ok(out)
}

fn write_text_element<W: Write>(
    w: &mut Writer<W>,
    name: &str,
    text: &str,
) -> Result<(), Box<dyn Error>> {
    w.write_event(Event::Start(BytesStart::new(name)))?;
    w.write_event(Event::Text(BytesText::new(text)))?;
    w.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Write a serialized feed to `{output_dir}/{file_name}`, replacing any previous file.
#[instrument(level = "info", skip(bytes), fields(len = bytes.len()))]
pub async fn write_feed(
    output_dir: &str,
    file_name: &str,
    bytes: &[u8],
) -> Result<PathBuf, Box<dyn Error>> {
    let path = Path::new(output_dir).join(file_name);
    if let Err(e) = fs::write(&path, bytes).await {
        error!(path = %path.display(), error = %e, "Failed to write feed");
        return Err(e.into());
    }
    info!(path = %path.display(), "Wrote feed");
    Ok(path)
}
