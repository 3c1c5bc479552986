//! Feed object types.
//!
//! This module contains the decoded feed model:
//!
//! - [`RssFeed`] - The decoded `<rss>` channel
//! - [`RssItem`] - One entry of a channel
//! - [`MediaObject`] - An item enclosure
//! - [`Source`] - The channel an item was taken from
//!
//! Also provides types shared between dialects:
//! - [`Author`] and [`Category`]
//! - [`WebFeed`] and [`FeedParser`] - The per-format parser capability

mod common;
mod feed;
mod rss;

// Re-export common types
pub use common::{parse_rfc822_date, Author, Category, DEFAULT_LOCALE};
pub(crate) use common::is_english_locale;

// Re-export format capability and RSS types
pub use feed::{FeedParser, WebFeed};
pub use rss::{MediaObject, RssFeed, RssItem, Source};
