//! Streaming RSS 2.0 decoder for Rust.
//!
//! This crate fetches syndication documents and decodes them into a
//! strongly typed feed model.
//!
//! # Features
//!
//! - **Typed Model**: Feeds, items, authors, categories, enclosures and
//!   source references with optional fields kept as `Option`.
//! - **Event-Driven Decoder**: A `quick-xml` tokenizer feeding a reducer that
//!   tracks the element stack to tell channel fields from item fields.
//! - **Fetching**: An async loader that downloads a feed and decodes it off
//!   the calling task (`fetch` feature, on by default).
//! - **Serde Support**: Optional serialization with the `serde` feature.
//!
//! # Quick Start
//!
//! ```rust
//! use nucleus_rs::parse;
//!
//! let xml = br#"<rss version="2.0"><channel>
//!     <title>Liftoff News</title>
//!     <item><title>Star City</title></item>
//!     <item><title>Sky watchers</title></item>
//! </channel></rss>"#;
//!
//! let feed = parse(xml).unwrap();
//! for item in feed.iter_items() {
//!     println!("{:?}", item.title);
//! }
//! ```
//!
//! # Choosing a Format
//!
//! Code that should work with any feed dialect takes a type implementing
//! [`WebFeed`] and asks it for a parser:
//!
//! ```rust
//! use nucleus_rs::{FeedParser, ParserConfig, RssFeed, WebFeed};
//!
//! fn title_of<T: WebFeed>(data: &[u8]) -> nucleus_rs::Result<String> {
//!     let feed = T::create_parser(ParserConfig::default()).parse(data)?;
//!     Ok(feed.title().to_string())
//! }
//!
//! let title = title_of::<RssFeed>(b"<rss><channel><title>T</title></channel></rss>").unwrap();
//! assert_eq!(title, "T");
//! ```
//!
//! # Module Structure
//!
//! - [`objects`] - Feed data structures and the [`WebFeed`] capability
//! - [`reader`] - RSS decoder
//! - [`tokenizer`] - XML event adapter
//! - [`fetch`] - HTTP loader (feature `fetch`)
//! - [`error`] - Error types
//!
//! # Optional Features
//!
//! - `fetch` (default) - Enable [`fetch::FeedLoader`]
//! - `serde` - Enable serde serialization/deserialization support
//! - `cli` - Build the `rss_dump` command line tool

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod error;
#[cfg(feature = "fetch")]
pub mod fetch;
pub mod objects;
pub mod reader;
pub mod tokenizer;

// Re-export commonly used types at the crate root
pub use error::{Error, ErrorKind, Result};
pub use objects::{
    Author, Category, FeedParser, MediaObject, RssFeed, RssItem, Source, WebFeed,
};
pub use reader::{parse, ParserConfig, RssParser};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
