//! Command-line interface definitions for the feed generator.
//!
//! Every option has a default, so a bare invocation scrapes all built-in
//! sites with a freshly launched headless Chromium and writes the feeds to
//! the current directory.

use clap::Parser;

/// Command-line arguments for `anthropic_feeds`.
///
/// # Examples
///
/// ```sh
/// # All built-in sites into ./feeds
/// anthropic_feeds -o ./feeds
///
/// # Only the engineering blog, using an already running Chromium
/// anthropic_feeds -s engineering --remote-debugging-url ws://127.0.0.1:9222/devtools/browser/<id>
///
/// # Offline, from saved pages ./pages/news.html and ./pages/engineering.html
/// anthropic_feeds --snapshot-dir ./pages
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Optional path to a YAML site profile file (defaults to the built-in profiles)
    #[arg(short, long, env = "ANTHROPIC_FEEDS_CONFIG")]
    pub config: Option<String>,

    /// Directory the RSS files are written to
    #[arg(short, long, default_value = ".")]
    pub output_dir: String,

    /// Only scrape the named site (repeatable)
    #[arg(short, long)]
    pub site: Vec<String>,

    /// Read pre-rendered pages from `<DIR>/<site>.html` instead of launching a browser
    #[arg(long, value_name = "DIR")]
    pub snapshot_dir: Option<String>,

    /// DevTools websocket URL of an already running Chromium
    #[arg(long, env = "CHROMIUM_REMOTE_DEBUGGING_URL")]
    pub remote_debugging_url: Option<String>,
}
