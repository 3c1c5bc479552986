//! Event-driven XML tokenizer adapter.
//!
//! [`XmlTokenizer`] wraps a `quick-xml` reader over a byte buffer and pushes
//! three kinds of events to an [`XmlListener`]: element open, element close
//! and text. It is the only place the crate touches the XML library; grammar
//! code works purely in terms of these callbacks.
//!
//! The tokenizer never resolves external entities. Only the predefined XML
//! entities and character references are expanded, and DOCTYPE declarations
//! are skipped. Names, attribute values and text are decoded in the
//! encoding the document declares, UTF-8 by default. Any lexical problem
//! (mismatched tags, bad escapes, undecodable bytes, unclosed elements,
//! stray text outside the root) ends the parse with an error and no
//! further callbacks are made.
//!
//! # Example
//!
//! ```rust
//! use nucleus_rs::tokenizer::{Attributes, XmlListener, XmlTokenizer};
//!
//! #[derive(Default)]
//! struct Names(Vec<String>);
//!
//! impl XmlListener for Names {
//!     fn did_start_element(&mut self, name: &str, _: Attributes) -> nucleus_rs::Result<()> {
//!         self.0.push(name.to_string());
//!         Ok(())
//!     }
//!     fn did_end_element(&mut self, _: &str) -> nucleus_rs::Result<()> {
//!         Ok(())
//!     }
//!     fn found_characters(&mut self, _: &str) {}
//! }
//!
//! let mut names = Names::default();
//! XmlTokenizer::new(b"<a><b/></a>").tokenize(&mut names).unwrap();
//! assert_eq!(names.0, ["a", "b"]);
//! ```

use crate::error::{Error, Result};
use quick_xml::encoding::Decoder;
use quick_xml::events::BytesStart;
use quick_xml::events::Event as XmlEvent;
use quick_xml::Reader;

/// Attributes of an element as `(name, value)` pairs in document order.
pub type Attributes = Vec<(String, String)>;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Receives tokenizer events.
///
/// Text between markup may arrive in several fragments (for example around a
/// CDATA section); listeners must concatenate them.
pub trait XmlListener {
    /// Called when an element opens. Self-closing elements open and then
    /// close immediately.
    fn did_start_element(&mut self, name: &str, attributes: Attributes) -> Result<()>;

    /// Called when an element closes.
    fn did_end_element(&mut self, name: &str) -> Result<()>;

    /// Called with a fragment of character data.
    fn found_characters(&mut self, text: &str);
}

/// Intermediate parsed event data (owned, to avoid borrow conflicts).
enum ParsedEvent {
    Start { name: String, attrs: Attributes },
    End { name: String },
    Empty { name: String, attrs: Attributes },
    Text { text: String },
    Eof,
}

/// Tokenizer over one in-memory XML document.
///
/// A tokenizer is consumed by [`XmlTokenizer::tokenize`], so each document
/// gets its own reader instance.
pub struct XmlTokenizer<'a> {
    reader: Reader<&'a [u8]>,
    buf: Vec<u8>,
    depth: usize,
    seen_element: bool,
}

impl<'a> XmlTokenizer<'a> {
    /// Creates a tokenizer over `data`.
    pub fn new(data: &'a [u8]) -> Self {
        let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
        let mut reader = Reader::from_reader(data);
        reader.config_mut().check_end_names = true;

        Self {
            reader,
            buf: Vec::with_capacity(1024),
            depth: 0,
            seen_element: false,
        }
    }

    /// Runs the tokenizer to completion, feeding `listener`.
    ///
    /// Returns the first error raised by either the XML reader or the
    /// listener.
    pub fn tokenize<L: XmlListener>(mut self, listener: &mut L) -> Result<()> {
        loop {
            match self.next_event()? {
                ParsedEvent::Start { name, attrs } => {
                    self.open(&name, attrs, listener)?;
                }
                ParsedEvent::End { name } => {
                    self.close(&name, listener)?;
                }
                ParsedEvent::Empty { name, attrs } => {
                    self.open(&name, attrs, listener)?;
                    self.close(&name, listener)?;
                }
                ParsedEvent::Text { text } => {
                    if self.depth > 0 {
                        listener.found_characters(&text);
                    } else if !text.trim().is_empty() {
                        return Err(Error::InvalidData(
                            "text outside the root element".to_string(),
                        ));
                    }
                }
                ParsedEvent::Eof => break,
            }
        }

        if !self.seen_element {
            return Err(Error::InvalidData(
                "document contains no root element".to_string(),
            ));
        }
        if self.depth > 0 {
            return Err(Error::InvalidData(format!(
                "document ended with {} unclosed element(s)",
                self.depth
            )));
        }
        Ok(())
    }

    fn open<L: XmlListener>(&mut self, name: &str, attrs: Attributes, listener: &mut L) -> Result<()> {
        if self.depth == 0 && self.seen_element {
            return Err(Error::InvalidData(format!(
                "unexpected second root element <{}>",
                name
            )));
        }
        self.depth += 1;
        self.seen_element = true;
        listener.did_start_element(name, attrs)
    }

    fn close<L: XmlListener>(&mut self, name: &str, listener: &mut L) -> Result<()> {
        if self.depth == 0 {
            return Err(Error::InvalidData(format!("unmatched closing tag </{}>", name)));
        }
        self.depth -= 1;
        listener.did_end_element(name)
    }

    /// Reads the next event we care about from the underlying reader.
    fn next_event(&mut self) -> Result<ParsedEvent> {
        loop {
            self.buf.clear();

            let event = self.reader.read_event_into(&mut self.buf)?;
            // Follows the encoding of the XML declaration once it was read
            let decoder = self.reader.decoder();
            let parsed = match event {
                XmlEvent::Start(ref e) => {
                    let name = decoder.decode(e.name().as_ref())?.into_owned();
                    let attrs = Self::extract_attrs(e, decoder)?;
                    ParsedEvent::Start { name, attrs }
                }
                XmlEvent::End(ref e) => {
                    let name = decoder.decode(e.name().as_ref())?.into_owned();
                    ParsedEvent::End { name }
                }
                XmlEvent::Empty(ref e) => {
                    let name = decoder.decode(e.name().as_ref())?.into_owned();
                    let attrs = Self::extract_attrs(e, decoder)?;
                    ParsedEvent::Empty { name, attrs }
                }
                XmlEvent::Text(ref e) => {
                    let text = e.unescape()?.into_owned();
                    ParsedEvent::Text { text }
                }
                XmlEvent::CData(ref e) => {
                    let text = e.decode()?.into_owned();
                    ParsedEvent::Text { text }
                }
                XmlEvent::Eof => ParsedEvent::Eof,
                // Declarations, comments, processing instructions and DOCTYPE
                _ => continue,
            };
            return Ok(parsed);
        }
    }

    /// Extracts attributes from a BytesStart element as owned data.
    fn extract_attrs(e: &BytesStart<'_>, decoder: Decoder) -> Result<Attributes> {
        let mut attrs = Vec::new();
        for attr in e.attributes() {
            let attr = attr?;
            let key = decoder.decode(attr.key.as_ref())?.into_owned();
            let value = attr.decode_and_unescape_value(decoder)?.into_owned();
            attrs.push((key, value));
        }
        Ok(attrs)
    }
}
