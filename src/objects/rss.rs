//! RSS 2.0 feed model.
//!
//! [`RssFeed`] is the decoded `<rss>` document: channel metadata plus an
//! ordered list of [`RssItem`]s. Items carry their enclosures as
//! [`MediaObject`]s and an optional [`Source`] reference.

use crate::error::{Error, Result};
use crate::objects::common::{Author, Category};
use crate::objects::feed::WebFeed;
use crate::reader::{ParserConfig, RssParser};
use chrono::{DateTime, FixedOffset};
use std::collections::HashMap;
use url::Url;

/// A media attachment of an item (`<enclosure>`).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MediaObject {
    /// Location of the media
    pub url: Url,
    /// Size in bytes
    pub length: u64,
    /// MIME type
    pub mime_type: String,
}

impl MediaObject {
    /// Creates a media object from already validated values.
    pub fn new(url: Url, length: u64, mime_type: impl Into<String>) -> Self {
        Self {
            url,
            length,
            mime_type: mime_type.into(),
        }
    }

    /// Builds a media object from raw enclosure attributes.
    ///
    /// All three attributes are required; a missing attribute, an
    /// unparsable URL or a non-numeric length is a
    /// [`Error::MalformedFeed`].
    pub fn from_attributes(
        url: Option<&str>,
        length: Option<&str>,
        mime_type: Option<&str>,
    ) -> Result<Self> {
        let url = url.ok_or_else(|| Error::malformed("enclosure is missing the url attribute"))?;
        let length =
            length.ok_or_else(|| Error::malformed("enclosure is missing the length attribute"))?;
        let mime_type =
            mime_type.ok_or_else(|| Error::malformed("enclosure is missing the type attribute"))?;

        let url = Url::parse(url.trim())
            .map_err(|e| Error::malformed(format!("enclosure url {:?}: {}", url, e)))?;
        let length = length
            .trim()
            .parse()
            .map_err(|_| Error::malformed(format!("enclosure length {:?} is not a number", length)))?;

        Ok(Self::new(url, length, mime_type))
    }
}

/// The channel an item was republished from (`<source>`).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Source {
    /// Title of the originating channel
    pub title: String,
    /// URL of the originating channel's feed
    pub url: Url,
}

impl Source {
    /// Creates a source reference.
    pub fn new(title: impl Into<String>, url: Url) -> Self {
        Self {
            title: title.into(),
            url,
        }
    }

    /// Builds a source from element text and its raw `url` attribute.
    pub fn from_parts(title: impl Into<String>, url: Option<&str>) -> Result<Self> {
        let url = url.ok_or_else(|| Error::malformed("source is missing the url attribute"))?;
        let url = Url::parse(url.trim())
            .map_err(|e| Error::malformed(format!("source url {:?}: {}", url, e)))?;
        Ok(Self::new(title, url))
    }
}

/// One entry of an RSS channel.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RssItem {
    /// Item title
    pub title: Option<String>,
    /// Item link
    pub url: Option<Url>,
    /// Synopsis
    pub description: Option<String>,
    /// Author, split from the `"email (name)"` form
    pub author: Option<Author>,
    /// Categories in document order
    pub categories: Vec<Category>,
    /// Enclosures in document order
    pub media: Vec<MediaObject>,
    /// Comments page
    pub comments: Option<Url>,
    /// Unique identifier (`<guid>`)
    pub id: Option<String>,
    /// Publication date
    pub publication_date: Option<DateTime<FixedOffset>>,
    /// Originating channel
    pub source: Option<Source>,
}

impl RssItem {
    /// Creates an empty item.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the enclosures in document order.
    pub fn media(&self) -> &[MediaObject] {
        &self.media
    }

    /// Returns the total byte length of all enclosures, saturating at
    /// `u64::MAX`.
    pub fn media_length(&self) -> u64 {
        self.media
            .iter()
            .fold(0u64, |total, m| total.saturating_add(m.length))
    }
}

/// A decoded RSS 2.0 channel.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RssFeed {
    /// Attributes of the `<rss>` element
    attributes: HashMap<String, String>,

    // === Required channel elements ===
    /// Channel title
    pub title: String,
    /// Channel website
    pub url: Option<Url>,
    /// Channel description
    pub description: String,

    // === Optional channel elements ===
    /// Language code
    pub language: Option<String>,
    /// Copyright notice
    pub copyright: Option<String>,
    /// Person responsible for editorial content
    pub managing_editor: Option<Author>,
    /// Person responsible for technical issues
    pub web_master: Option<Author>,
    /// Publication date of the content
    pub publication_date: Option<DateTime<FixedOffset>>,
    /// Last time the content changed
    pub last_build_date: Option<DateTime<FixedOffset>>,
    /// Channel categories in document order
    pub categories: Vec<Category>,
    /// Program that generated the channel
    pub generator: Option<String>,
    /// Documentation for the format used
    pub documentation: Option<Url>,
    /// Minutes the channel may be cached
    pub time_to_live: Option<u32>,

    // === Items ===
    /// Items in document order
    items: Vec<RssItem>,
}

impl RssFeed {
    /// Creates an empty feed with the given root attributes.
    pub fn new(attributes: HashMap<String, String>) -> Self {
        Self {
            attributes,
            ..Self::default()
        }
    }

    /// Returns the `version` attribute of the root element, if present.
    pub fn version(&self) -> Option<&str> {
        self.attributes.get("version").map(|s| s.as_str())
    }

    /// Returns the items in document order.
    pub fn items(&self) -> &[RssItem] {
        &self.items
    }

    /// Iterates over the items in document order.
    pub fn iter_items(&self) -> impl Iterator<Item = &RssItem> {
        self.items.iter()
    }

    /// Returns the number of items.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn append_item(&mut self, item: RssItem) {
        self.items.push(item);
    }
}

impl WebFeed for RssFeed {
    type Parser = RssParser;

    fn create_parser(config: ParserConfig) -> Self::Parser {
        RssParser::new(config)
    }

    fn title(&self) -> &str {
        &self.title
    }

    fn attributes(&self) -> &HashMap<String, String> {
        &self.attributes
    }
}
