//! list_enclosures - List every enclosure in an RSS feed.
//!
//! This demo decodes an RSS file and prints one line per enclosure,
//! followed by a summary of how many enclosures and bytes each MIME type
//! accounts for.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example list_enclosures <feed.xml>
//! ```

use std::collections::BTreeMap;
use std::env;
use std::fs;

use nucleus_rs::parse;

/// Totals for a single MIME type.
#[derive(Default)]
struct MimeStats {
    count: u64,
    bytes: u64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <feed.xml>", args[0]);
        std::process::exit(1);
    }

    let data = fs::read(&args[1])?;
    let feed = parse(&data)?;

    println!("{:<24} {:>12}  {}", "Type", "Length", "URL");

    let mut stats: BTreeMap<&str, MimeStats> = BTreeMap::new();
    for item in feed.iter_items() {
        for media in item.media() {
            println!("{:<24} {:>12}  {}", media.mime_type, media.length, media.url);

            let entry = stats.entry(media.mime_type.as_str()).or_default();
            entry.count += 1;
            entry.bytes = entry.bytes.saturating_add(media.length);
        }
    }

    println!();
    println!("{:<24} {:>8} {:>14}", "Type", "Count", "Total bytes");
    for (mime_type, s) in &stats {
        println!("{:<24} {:>8} {:>14}", mime_type, s.count, s.bytes);
    }

    Ok(())
}
