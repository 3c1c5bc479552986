//! Error types for the feed decoder.

use std::fmt;
use thiserror::Error;

/// Errors that can occur while locating, fetching or decoding a feed.
#[derive(Error, Debug)]
pub enum Error {
    /// The feed location could not be interpreted as a URL
    #[error("Invalid feed URL {url:?}: {source}")]
    InvalidUrl {
        /// The location string as given
        url: String,
        /// Why the URL parser rejected it
        source: url::ParseError,
    },

    /// The feed location uses a scheme other than http or https
    #[error("Unsupported URL scheme: {0} (only http/https allowed)")]
    UnsupportedScheme(String),

    /// The payload is empty or contains no XML element at all
    #[error("Invalid feed data: {0}")]
    InvalidData(String),

    /// XML parsing error
    #[error("XML parsing error: {0}")]
    XmlParse(#[from] quick_xml::Error),

    /// XML attribute parsing error
    #[error("XML attribute error: {0}")]
    XmlAttribute(#[from] quick_xml::events::attributes::AttrError),

    /// Bytes that do not decode in the document's declared encoding
    #[error("Encoding error: {0}")]
    Encoding(#[from] quick_xml::encoding::EncodingError),

    /// Well-formed XML that does not describe a usable feed
    #[error("Malformed feed: {0}")]
    MalformedFeed(String),

    /// Network-level failure
    #[cfg(feature = "fetch")]
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// HTTP response with a non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),

    /// Response body exceeded the configured limit
    #[error("Response too large (limit {0} bytes)")]
    ResponseTooLarge(usize),

    /// The background decoding task did not complete
    #[error("Decoding task failed: {0}")]
    Join(String),
}

/// Coarse classification of an [`Error`].
///
/// Callers that only need to know *which stage* failed can match on this
/// instead of on individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The feed location is not a usable URL
    InvalidUrl,
    /// The payload is absent or not well-formed XML
    InvalidPayload,
    /// The XML is well-formed but is not a valid feed
    MalformedFeed,
    /// The fetch itself failed
    Transport,
}

impl Error {
    /// Returns the stage at which this error occurred.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidUrl { .. } | Error::UnsupportedScheme(_) => ErrorKind::InvalidUrl,
            Error::InvalidData(_)
            | Error::XmlParse(_)
            | Error::XmlAttribute(_)
            | Error::Encoding(_) => ErrorKind::InvalidPayload,
            Error::MalformedFeed(_) => ErrorKind::MalformedFeed,
            #[cfg(feature = "fetch")]
            Error::Http(_) => ErrorKind::Transport,
            Error::HttpStatus(_) | Error::ResponseTooLarge(_) | Error::Join(_) => {
                ErrorKind::Transport
            }
        }
    }

    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Error::MalformedFeed(reason.into())
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::InvalidUrl => "invalid url",
            ErrorKind::InvalidPayload => "invalid payload",
            ErrorKind::MalformedFeed => "malformed feed",
            ErrorKind::Transport => "transport",
        };
        f.write_str(s)
    }
}

/// Result type alias for feed operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        assert_eq!(
            Error::InvalidData("empty".to_string()).kind(),
            ErrorKind::InvalidPayload
        );
        assert_eq!(
            Error::malformed("no rss element").kind(),
            ErrorKind::MalformedFeed
        );
        assert_eq!(
            Error::UnsupportedScheme("ftp".to_string()).kind(),
            ErrorKind::InvalidUrl
        );
        assert_eq!(Error::HttpStatus(404).kind(), ErrorKind::Transport);
    }

    #[test]
    fn test_invalid_url_kind() {
        let source = url::Url::parse("not a url").unwrap_err();
        let err = Error::InvalidUrl {
            url: "not a url".to_string(),
            source,
        };
        assert_eq!(err.kind(), ErrorKind::InvalidUrl);
        assert!(err.to_string().contains("not a url"));
    }
}
