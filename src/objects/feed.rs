//! Format-agnostic feed capabilities.
//!
//! A [`WebFeed`] is any decoded feed type that knows how to create a parser
//! for its own format. The fetch layer only depends on this trait, so adding
//! a new dialect means adding a new implementor rather than touching the
//! loader.

use crate::error::Result;
use crate::reader::ParserConfig;
use std::collections::HashMap;

/// Decodes a byte buffer into a feed value.
///
/// Implementations must keep all parse state local to a single call to
/// [`FeedParser::parse`], so one parser can be reused and several parsers
/// can run on different threads at once.
pub trait FeedParser {
    /// The decoded feed type
    type Output;

    /// Decodes one complete document.
    fn parse(&self, data: &[u8]) -> Result<Self::Output>;
}

/// A feed of some concrete format.
pub trait WebFeed: Sized + Send + 'static {
    /// Parser producing this feed type
    type Parser: FeedParser<Output = Self> + Send + 'static;

    /// Creates a parser for this format.
    fn create_parser(config: ParserConfig) -> Self::Parser;

    /// The feed's title.
    fn title(&self) -> &str;

    /// Attributes of the document's root element, verbatim.
    fn attributes(&self) -> &HashMap<String, String>;
}
