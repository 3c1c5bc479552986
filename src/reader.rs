//! RSS 2.0 decoder.
//!
//! This module turns a byte buffer into an [`RssFeed`]. The
//! [`XmlTokenizer`](crate::tokenizer::XmlTokenizer) supplies element and
//! text events; a reducer keeps a stack of open element names and, whenever
//! an element closes, uses its parent (`channel` or `item`) to decide which
//! field the accumulated text belongs to.
//!
//! # Example
//!
//! ```rust
//! use nucleus_rs::reader::parse;
//!
//! let xml = br#"<rss version="2.0"><channel>
//!     <title>Liftoff News</title>
//!     <link>http://liftoff.msfc.nasa.gov/</link>
//!     <item><title>Star City</title></item>
//! </channel></rss>"#;
//!
//! let feed = parse(xml).unwrap();
//! assert_eq!(feed.title, "Liftoff News");
//! assert_eq!(feed.version(), Some("2.0"));
//! assert_eq!(feed.item_count(), 1);
//! ```

use crate::error::{Error, Result};
use crate::objects::{
    is_english_locale, parse_rfc822_date, Author, Category, FeedParser, MediaObject, RssFeed,
    RssItem, Source, DEFAULT_LOCALE,
};
use crate::tokenizer::{Attributes, XmlListener, XmlTokenizer};
use std::collections::HashMap;
use url::Url;

/// Configuration options for the RSS parser.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Whether to trim whitespace around an element's text when it closes
    pub trim_text: bool,
    /// Locale used for month and weekday names in dates
    pub locale: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            trim_text: true,
            locale: DEFAULT_LOCALE.to_string(),
        }
    }
}

impl ParserConfig {
    /// Creates a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether element text is trimmed.
    pub fn with_trim_text(mut self, trim_text: bool) -> Self {
        self.trim_text = trim_text;
        self
    }

    /// Sets the date locale.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }
}

// ============================================================================
// Grammar
// ============================================================================

/// Channel-level elements the reducer recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChannelField {
    Title,
    Link,
    Description,
    Language,
    Copyright,
    ManagingEditor,
    WebMaster,
    PubDate,
    LastBuildDate,
    Category,
    Generator,
    Docs,
    Ttl,
}

impl ChannelField {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "title" => ChannelField::Title,
            "link" => ChannelField::Link,
            "description" => ChannelField::Description,
            "language" => ChannelField::Language,
            "copyright" => ChannelField::Copyright,
            "managingEditor" => ChannelField::ManagingEditor,
            "webMaster" => ChannelField::WebMaster,
            "pubDate" => ChannelField::PubDate,
            "lastBuildDate" => ChannelField::LastBuildDate,
            "category" => ChannelField::Category,
            "generator" => ChannelField::Generator,
            "docs" => ChannelField::Docs,
            "ttl" => ChannelField::Ttl,
            _ => return None,
        })
    }
}

/// Item-level elements the reducer recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ItemField {
    Title,
    Link,
    Description,
    Author,
    Category,
    Comments,
    Enclosure,
    Guid,
    PubDate,
    Source,
}

impl ItemField {
    fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "title" => ItemField::Title,
            "link" => ItemField::Link,
            "description" => ItemField::Description,
            "author" => ItemField::Author,
            "category" => ItemField::Category,
            "comments" => ItemField::Comments,
            "enclosure" => ItemField::Enclosure,
            "guid" => ItemField::Guid,
            "pubDate" => ItemField::PubDate,
            "source" => ItemField::Source,
            _ => return None,
        })
    }
}

/// Parser state derived from the element one level above the one closing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserState {
    /// Not directly inside `<channel>` or `<item>`
    OutsideChannel,
    /// Directly inside `<channel>`
    InChannel,
    /// Directly inside `<item>`
    InItem,
}

// ============================================================================
// Parse context
// ============================================================================

/// The most recently opened element.
///
/// Replaced on every open tag and read when an element closes.
#[derive(Debug, Default)]
struct ParsedElement {
    attrs: Attributes,
    content: String,
}

impl ParsedElement {
    fn new(attrs: Attributes) -> Self {
        Self {
            attrs,
            content: String::new(),
        }
    }

    fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Mutable state for one call to [`RssParser::parse`].
#[derive(Debug, Default)]
struct ParseContext {
    /// Names of the currently open elements (e.g. ["rss", "channel", "item"])
    stack: Vec<String>,
    /// The current element accumulator
    element: ParsedElement,
    /// Feed under construction, once `<rss>` was seen
    feed: Option<RssFeed>,
    /// Item under construction while inside `<item>`
    item: Option<RssItem>,
}

impl ParseContext {
    fn state(&self) -> ParserState {
        match self.stack.last().map(|s| s.as_str()) {
            Some("channel") => ParserState::InChannel,
            Some("item") => ParserState::InItem,
            _ => ParserState::OutsideChannel,
        }
    }
}

/// Event listener that reduces tokenizer events into a feed.
struct RssReducer<'c> {
    config: &'c ParserConfig,
    context: ParseContext,
}

impl<'c> RssReducer<'c> {
    fn new(config: &'c ParserConfig) -> Self {
        Self {
            config,
            context: ParseContext::default(),
        }
    }

    fn finish(self) -> Result<RssFeed> {
        self.context
            .feed
            .ok_or_else(|| Error::malformed("document has no <rss> root element"))
    }

    /// Takes the text of the element that just closed.
    fn take_content(&mut self) -> String {
        let content = std::mem::take(&mut self.context.element.content);
        if self.config.trim_text {
            content.trim().to_string()
        } else {
            content
        }
    }

    fn apply_channel_field(&mut self, field: ChannelField, content: String) -> Result<()> {
        let element = &self.context.element;
        let Some(feed) = self.context.feed.as_mut() else {
            return Ok(());
        };

        match field {
            ChannelField::Title => feed.title = content,
            ChannelField::Link => {
                let url = Url::parse(&content).map_err(|e| {
                    Error::malformed(format!("channel link {:?}: {}", content, e))
                })?;
                feed.url = Some(url);
            }
            ChannelField::Description => feed.description = content,
            ChannelField::Language => feed.language = Some(content),
            ChannelField::Copyright => feed.copyright = Some(content),
            ChannelField::ManagingEditor => {
                feed.managing_editor = Some(Author::from_contact(&content))
            }
            ChannelField::WebMaster => feed.web_master = Some(Author::from_contact(&content)),
            ChannelField::PubDate => feed.publication_date = parse_rfc822_date(&content),
            ChannelField::LastBuildDate => feed.last_build_date = parse_rfc822_date(&content),
            ChannelField::Category => feed
                .categories
                .push(Category::new(element.attr("domain").map(String::from), Some(content))),
            ChannelField::Generator => feed.generator = Some(content),
            ChannelField::Docs => feed.documentation = Url::parse(&content).ok(),
            ChannelField::Ttl => feed.time_to_live = content.parse().ok(),
        }
        Ok(())
    }

    fn apply_item_field(&mut self, field: ItemField, content: String) -> Result<()> {
        let element = &self.context.element;
        let Some(item) = self.context.item.as_mut() else {
            return Ok(());
        };

        match field {
            ItemField::Title => item.title = Some(content),
            ItemField::Link => item.url = Url::parse(&content).ok(),
            ItemField::Description => item.description = Some(content),
            ItemField::Author => item.author = Some(Author::from_contact(&content)),
            ItemField::Category => item
                .categories
                .push(Category::new(element.attr("domain").map(String::from), Some(content))),
            ItemField::Comments => item.comments = Url::parse(&content).ok(),
            ItemField::Enclosure => item.media.push(MediaObject::from_attributes(
                element.attr("url"),
                element.attr("length"),
                element.attr("type"),
            )?),
            ItemField::Guid => item.id = Some(content),
            ItemField::PubDate => item.publication_date = parse_rfc822_date(&content),
            ItemField::Source => item.source = Some(Source::from_parts(content, element.attr("url"))?),
        }
        Ok(())
    }
}

impl XmlListener for RssReducer<'_> {
    fn did_start_element(&mut self, name: &str, attributes: Attributes) -> Result<()> {
        self.context.stack.push(name.to_string());

        match name.to_lowercase().as_str() {
            "rss" => {
                let attrs: HashMap<String, String> = attributes.iter().cloned().collect();
                self.context.feed = Some(RssFeed::new(attrs));
            }
            "item" => {
                self.context.item = Some(RssItem::new());
            }
            _ => {}
        }

        self.context.element = ParsedElement::new(attributes);
        Ok(())
    }

    fn did_end_element(&mut self, name: &str) -> Result<()> {
        self.context.stack.pop();
        let content = self.take_content();

        if name == "item" {
            if let Some(item) = self.context.item.take() {
                if let Some(ref mut feed) = self.context.feed {
                    feed.append_item(item);
                }
            }
            return Ok(());
        }

        match self.context.state() {
            ParserState::InChannel => match ChannelField::from_name(name) {
                Some(field) => self.apply_channel_field(field, content)?,
                None => tracing::trace!(element = name, "ignoring channel element"),
            },
            ParserState::InItem => match ItemField::from_name(name) {
                Some(field) => self.apply_item_field(field, content)?,
                None => tracing::trace!(element = name, "ignoring item element"),
            },
            ParserState::OutsideChannel => {}
        }
        Ok(())
    }

    fn found_characters(&mut self, text: &str) {
        self.context.element.content.push_str(text);
    }
}

// ============================================================================
// Public entry points
// ============================================================================

/// A reusable RSS 2.0 parser.
///
/// Every call to [`FeedParser::parse`] creates its own tokenizer and parse
/// context, so a parser holds nothing but its configuration and may be
/// shared freely.
#[derive(Debug, Clone, Default)]
pub struct RssParser {
    config: ParserConfig,
}

impl RssParser {
    /// Creates a parser with the given configuration.
    pub fn new(config: ParserConfig) -> Self {
        if !is_english_locale(&config.locale) {
            tracing::warn!(
                locale = %config.locale,
                "only English month and weekday names are recognized in dates"
            );
        }
        Self { config }
    }
}

impl FeedParser for RssParser {
    type Output = RssFeed;

    fn parse(&self, data: &[u8]) -> Result<RssFeed> {
        let mut reducer = RssReducer::new(&self.config);
        XmlTokenizer::new(data).tokenize(&mut reducer)?;
        let feed = reducer.finish()?;

        tracing::debug!(
            title = %feed.title,
            version = feed.version().unwrap_or("unknown"),
            items = feed.item_count(),
            "decoded rss feed"
        );
        Ok(feed)
    }
}

/// Convenience function to parse an RSS document with default settings.
pub fn parse(data: &[u8]) -> Result<RssFeed> {
    RssParser::default().parse(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use chrono::Datelike;

    const SIMPLE_RSS: &str = r#"<?xml version="1.0"?>
<rss version="2.0" xmlns:dc="http://purl.org/dc/elements/1.1/">
  <channel>
    <title>Liftoff News</title>
    <link>http://liftoff.msfc.nasa.gov/</link>
    <description>Liftoff to Space Exploration.</description>
    <language>en-us</language>
    <copyright>Copyright 2003, NASA</copyright>
    <managingEditor>editor@example.com (Ed Itor)</managingEditor>
    <webMaster>webmaster@example.com</webMaster>
    <pubDate>Tue, 10 Jun 2003 04:00:00 GMT</pubDate>
    <lastBuildDate>Tue, 10 Jun 2003 09:41:01 GMT</lastBuildDate>
    <category domain="Syndic8">1765</category>
    <generator>Weblog Editor 2.0</generator>
    <docs>http://blogs.law.harvard.edu/tech/rss</docs>
    <ttl>60</ttl>
    <dc:rights>ignored</dc:rights>
    <item>
      <title>Star City</title>
      <link>http://liftoff.msfc.nasa.gov/news/2003/news-starcity.asp</link>
      <description>How do Americans get ready?</description>
      <author>jane@example.com (Jane Doe)</author>
      <category domain="dmoz">Technology</category>
      <comments>http://liftoff.msfc.nasa.gov/comments/573</comments>
      <enclosure url="http://liftoff.msfc.nasa.gov/a.mp3" length="12216320" type="audio/mpeg"/>
      <guid>http://liftoff.msfc.nasa.gov/2003/06/03.html#item573</guid>
      <pubDate>Tue, 03 Jun 2003 09:39:21 GMT</pubDate>
      <source url="http://www.tomalak.org/links2.xml">Tomalak's Realm</source>
    </item>
  </channel>
</rss>"#;

    fn rss(channel_body: &str) -> String {
        format!(
            r#"<rss version="2.0"><channel><link>http://example.com/</link>{}</channel></rss>"#,
            channel_body
        )
    }

    #[test]
    fn test_parse_channel_fields() {
        let feed = parse(SIMPLE_RSS.as_bytes()).unwrap();

        assert_eq!(feed.version(), Some("2.0"));
        assert_eq!(feed.title, "Liftoff News");
        assert_eq!(feed.url.as_ref().map(|u| u.as_str()), Some("http://liftoff.msfc.nasa.gov/"));
        assert_eq!(feed.description, "Liftoff to Space Exploration.");
        assert_eq!(feed.language.as_deref(), Some("en-us"));
        assert_eq!(feed.copyright.as_deref(), Some("Copyright 2003, NASA"));
        assert_eq!(
            feed.managing_editor,
            Some(Author::with_name_and_email("Ed Itor", "editor@example.com"))
        );
        assert_eq!(
            feed.web_master.as_ref().and_then(|a| a.email.as_deref()),
            Some("webmaster@example.com")
        );
        assert_eq!(feed.publication_date.map(|d| d.day()), Some(10));
        assert!(feed.last_build_date.is_some());
        assert_eq!(
            feed.categories,
            vec![Category::new(Some("Syndic8".to_string()), Some("1765".to_string()))]
        );
        assert_eq!(feed.generator.as_deref(), Some("Weblog Editor 2.0"));
        assert!(feed.documentation.is_some());
        assert_eq!(feed.time_to_live, Some(60));
    }

    #[test]
    fn test_parse_item_fields() {
        let feed = parse(SIMPLE_RSS.as_bytes()).unwrap();
        assert_eq!(feed.item_count(), 1);

        let item = &feed.items()[0];
        assert_eq!(item.title.as_deref(), Some("Star City"));
        assert!(item.url.is_some());
        assert_eq!(item.description.as_deref(), Some("How do Americans get ready?"));
        assert_eq!(
            item.author,
            Some(Author::with_name_and_email("Jane Doe", "jane@example.com"))
        );
        assert_eq!(
            item.categories,
            vec![Category::new(Some("dmoz".to_string()), Some("Technology".to_string()))]
        );
        assert!(item.comments.is_some());
        assert_eq!(item.media.len(), 1);
        assert_eq!(item.media[0].length, 12216320);
        assert_eq!(item.media[0].mime_type, "audio/mpeg");
        assert_eq!(
            item.id.as_deref(),
            Some("http://liftoff.msfc.nasa.gov/2003/06/03.html#item573")
        );
        assert_eq!(item.publication_date.map(|d| d.day()), Some(3));

        let source = item.source.as_ref().unwrap();
        assert_eq!(source.title, "Tomalak's Realm");
        assert_eq!(source.url.as_str(), "http://www.tomalak.org/links2.xml");
    }

    #[test]
    fn test_item_title_does_not_leak_into_channel() {
        let feed = parse(rss("<title>Channel</title><item><title>Item</title></item>").as_bytes())
            .unwrap();
        assert_eq!(feed.title, "Channel");
        assert_eq!(feed.items()[0].title.as_deref(), Some("Item"));
    }

    #[test]
    fn test_root_match_is_case_insensitive() {
        let feed = parse(br#"<RSS version="0.91"><channel><title>Old</title></channel></RSS>"#)
            .unwrap();
        assert_eq!(feed.version(), Some("0.91"));
        assert_eq!(feed.title, "Old");
    }

    #[test]
    fn test_empty_channel() {
        let feed = parse(b"<rss><channel></channel></rss>").unwrap();
        assert_eq!(feed.item_count(), 0);
        assert_eq!(feed.title, "");
        assert!(feed.url.is_none());
    }

    #[test]
    fn test_missing_root_is_malformed_feed() {
        let err = parse(b"<feed><title>Atom</title></feed>").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedFeed);
    }

    #[test]
    fn test_empty_buffer_is_invalid_payload() {
        let err = parse(b"").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidPayload);
    }

    #[test]
    fn test_invalid_channel_link_is_malformed_feed() {
        let xml = r#"<rss><channel><link>not a url</link></channel></rss>"#;
        let err = parse(xml.as_bytes()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedFeed);
    }

    #[test]
    fn test_invalid_optional_urls_are_unset() {
        let feed = parse(
            rss("<docs>nope</docs><item><link>nope</link><comments>nope</comments></item>")
                .as_bytes(),
        )
        .unwrap();
        assert!(feed.documentation.is_none());
        assert!(feed.items()[0].url.is_none());
        assert!(feed.items()[0].comments.is_none());
    }

    #[test]
    fn test_bad_date_and_ttl_are_unset() {
        let feed = parse(
            rss("<pubDate>last tuesday</pubDate><ttl>soon</ttl><item><pubDate>?</pubDate></item>")
                .as_bytes(),
        )
        .unwrap();
        assert!(feed.publication_date.is_none());
        assert!(feed.time_to_live.is_none());
        assert!(feed.items()[0].publication_date.is_none());
    }

    #[test]
    fn test_enclosure_without_length_fails() {
        let xml = rss(r#"<item><enclosure url="http://e.com/a.mp3" type="audio/mpeg"/></item>"#);
        let err = parse(xml.as_bytes()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedFeed);
    }

    #[test]
    fn test_source_without_url_fails() {
        let xml = rss("<item><source>Somewhere</source></item>");
        let err = parse(xml.as_bytes()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedFeed);
    }

    #[test]
    fn test_unknown_elements_are_ignored() {
        let xml = rss("<cloud domain=\"x\"/><image><title>Logo</title></image><item><foo>bar</foo></item>");
        let feed = parse(xml.as_bytes()).unwrap();
        // <title> inside <image> is not a channel title
        assert_eq!(feed.title, "");
        assert_eq!(feed.item_count(), 1);
    }

    #[test]
    fn test_text_fragments_concatenate() {
        let xml = rss("<title>Fish &amp; <![CDATA[Chips]]></title>");
        let feed = parse(xml.as_bytes()).unwrap();
        assert_eq!(feed.title, "Fish & Chips");
    }

    #[test]
    fn test_trim_text_config() {
        let xml = rss("<title>  padded  </title>");

        let trimmed = RssParser::default().parse(xml.as_bytes()).unwrap();
        assert_eq!(trimmed.title, "padded");

        let raw = RssParser::new(ParserConfig::new().with_trim_text(false))
            .parse(xml.as_bytes())
            .unwrap();
        assert_eq!(raw.title, "  padded  ");
    }

    #[test]
    fn test_root_attributes_preserved() {
        let feed = parse(SIMPLE_RSS.as_bytes()).unwrap();
        let attrs = crate::objects::WebFeed::attributes(&feed);
        assert_eq!(attrs.get("version").map(|s| s.as_str()), Some("2.0"));
        assert_eq!(
            attrs.get("xmlns:dc").map(|s| s.as_str()),
            Some("http://purl.org/dc/elements/1.1/")
        );
    }

    #[test]
    fn test_parser_is_reusable() {
        let parser = RssParser::default();
        let first = parser.parse(SIMPLE_RSS.as_bytes()).unwrap();
        let second = parser.parse(SIMPLE_RSS.as_bytes()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_channel_field_names() {
        assert_eq!(ChannelField::from_name("managingEditor"), Some(ChannelField::ManagingEditor));
        assert_eq!(ChannelField::from_name("managingeditor"), None);
        assert_eq!(ChannelField::from_name("enclosure"), None);
        assert_eq!(ItemField::from_name("enclosure"), Some(ItemField::Enclosure));
        assert_eq!(ItemField::from_name("ttl"), None);
    }
}
