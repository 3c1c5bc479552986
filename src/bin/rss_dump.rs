//! rss_dump - Print the contents of an RSS feed.
//!
//! This tool decodes an RSS 2.0 document from a local file or an http(s)
//! URL and prints the channel metadata followed by one block per item.
//!
//! # Usage
//!
//! ```bash
//! rss_dump [OPTIONS] <SOURCE>
//! ```
//!
//! # Examples
//!
//! ```bash
//! # Dump a local file
//! rss_dump feed.xml
//!
//! # Fetch a feed and show only the first three items
//! rss_dump --items 3 https://example.com/rss.xml
//!
//! # Show decoder logs
//! rss_dump --verbose feed.xml
//! ```

use std::fs;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use nucleus_rs::fetch::{FeedLoader, LoaderConfig};
use nucleus_rs::objects::{Author, RssFeed, RssItem};
use nucleus_rs::{FeedParser, ParserConfig, RssParser};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Print the contents of an RSS feed.
#[derive(Parser, Debug)]
#[command(name = "rss_dump")]
#[command(version = VERSION)]
#[command(about = "Print the contents of an RSS feed")]
struct Args {
    /// File path or http(s) URL of the feed
    source: String,

    /// Print at most this many items
    #[arg(long)]
    items: Option<usize>,

    /// Locale for month and weekday names
    #[arg(long, default_value = nucleus_rs::objects::DEFAULT_LOCALE)]
    locale: String,

    /// Keep whitespace around element text
    #[arg(long)]
    no_trim: bool,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn is_remote(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

async fn load(args: &Args) -> nucleus_rs::Result<RssFeed> {
    if is_remote(&args.source) {
        let config = LoaderConfig::new()
            .with_locale(args.locale.clone())
            .with_trim_text(!args.no_trim);
        let loader = FeedLoader::new(config)?;
        return loader.load(&args.source).await;
    }

    let data = fs::read(&args.source)
        .map_err(|e| nucleus_rs::Error::InvalidData(format!("{}: {}", args.source, e)))?;
    let config = ParserConfig::new()
        .with_locale(args.locale.clone())
        .with_trim_text(!args.no_trim);
    RssParser::new(config).parse(&data)
}

fn format_author(author: &Author) -> String {
    match (&author.name, &author.email) {
        (Some(name), Some(email)) if name != email => format!("{} <{}>", name, email),
        (_, Some(email)) => email.clone(),
        (Some(name), None) => name.clone(),
        (None, None) => "-".to_string(),
    }
}

fn print_channel(feed: &RssFeed) {
    println!("Title:       {}", feed.title);
    println!("Version:     {}", feed.version().unwrap_or("-"));
    if let Some(url) = &feed.url {
        println!("Link:        {}", url);
    }
    if !feed.description.is_empty() {
        println!("Description: {}", feed.description);
    }
    if let Some(language) = &feed.language {
        println!("Language:    {}", language);
    }
    if let Some(editor) = &feed.managing_editor {
        println!("Editor:      {}", format_author(editor));
    }
    if let Some(date) = feed.publication_date {
        println!("Published:   {}", date.to_rfc2822());
    }
    if let Some(date) = feed.last_build_date {
        println!("Built:       {}", date.to_rfc2822());
    }
    if let Some(ttl) = feed.time_to_live {
        println!("TTL:         {} min", ttl);
    }
    for category in &feed.categories {
        println!(
            "Category:    {} ({})",
            category.label.as_deref().unwrap_or(""),
            category.id.as_deref().unwrap_or("-")
        );
    }
    println!("Items:       {}", feed.item_count());
}

fn print_item(index: usize, item: &RssItem) {
    println!();
    println!("[{}] {}", index + 1, item.title.as_deref().unwrap_or("(untitled)"));
    if let Some(url) = &item.url {
        println!("    link:      {}", url);
    }
    if let Some(date) = item.publication_date {
        println!("    published: {}", date.to_rfc2822());
    }
    if let Some(author) = &item.author {
        println!("    author:    {}", format_author(author));
    }
    if let Some(id) = &item.id {
        println!("    guid:      {}", id);
    }
    for media in item.media() {
        println!(
            "    enclosure: {} ({}, {} bytes)",
            media.url, media.mime_type, media.length
        );
    }
    if let Some(source) = &item.source {
        println!("    source:    {} <{}>", source.title, source.url);
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let feed = match load(&args).await {
        Ok(feed) => feed,
        Err(e) => {
            eprintln!("Error ({}): {}", e.kind(), e);
            return ExitCode::FAILURE;
        }
    };

    print_channel(&feed);
    let limit = args.items.unwrap_or(usize::MAX);
    for (index, item) in feed.iter_items().take(limit).enumerate() {
        print_item(index, item);
    }

    ExitCode::SUCCESS
}
