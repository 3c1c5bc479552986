//! Common types shared across feed formats.
//!
//! This module contains the building blocks every feed dialect uses:
//! - [`Author`] - A person credited by a feed or item
//! - [`Category`] - A classification label with an optional scheme
//! - [`parse_rfc822_date`] - The fixed publication date pattern

use chrono::{DateTime, FixedOffset};

// ============================================================================
// Constants
// ============================================================================

/// Locale assumed when none is configured.
pub const DEFAULT_LOCALE: &str = "en_US_POSIX";

// ============================================================================
// Authors
// ============================================================================

/// A person credited by a feed or one of its items.
///
/// Authors are built either from explicitly known fields with
/// [`Author::new`], or from a single contact string such as
/// `"jane@example.com (Jane Doe)"` with [`Author::from_contact`]. The two
/// constructors are intentionally distinct: the contact form never fails and
/// yields a partially populated author for strings of an unexpected shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Author {
    /// Display name
    pub name: Option<String>,
    /// Email address
    pub email: Option<String>,
    /// Home page
    pub home_page: Option<String>,
}

impl Author {
    /// Creates an author from explicitly known fields.
    pub fn new(name: Option<String>, email: Option<String>, home_page: Option<String>) -> Self {
        Self {
            name,
            email,
            home_page,
        }
    }

    /// Creates an author with a name and email and no home page.
    pub fn with_name_and_email(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self::new(Some(name.into()), Some(email.into()), None)
    }

    /// Splits an `"email (name)"` contact string into an author.
    ///
    /// The string is split on whitespace and parentheses into at most two
    /// tokens. The first token is the email; the rest of the string, with
    /// surrounding whitespace and parentheses removed, is the display name.
    /// A single token becomes both the email and the name. A string with no
    /// tokens at all yields an empty author.
    pub fn from_contact(contact: &str) -> Self {
        let rest = contact.trim_start_matches(is_contact_separator);
        if rest.is_empty() {
            return Self::default();
        }

        let (first, remainder) = match rest.find(is_contact_separator) {
            Some(idx) => rest.split_at(idx),
            None => (rest, ""),
        };
        let remainder = remainder.trim_matches(is_contact_separator);

        let email = first.to_string();
        let name = if remainder.is_empty() {
            email.clone()
        } else {
            remainder.to_string()
        };

        Self {
            name: Some(name),
            email: Some(email),
            home_page: None,
        }
    }

    /// Returns true if no field is set.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.home_page.is_none()
    }
}

fn is_contact_separator(c: char) -> bool {
    c.is_whitespace() || c == '(' || c == ')'
}

// ============================================================================
// Categories
// ============================================================================

/// A category assigned to a feed or item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Category {
    /// Classification scheme, from the `domain` attribute
    pub id: Option<String>,
    /// The category text
    pub label: Option<String>,
}

impl Category {
    /// Creates a category from its scheme and label.
    pub fn new(id: Option<String>, label: Option<String>) -> Self {
        Self { id, label }
    }
}

// ============================================================================
// Dates
// ============================================================================

/// Parses a date in the RSS pattern `EEE, dd MMM yyyy HH:mm:ss z`.
///
/// Accepts named zones (`GMT`, `UT`, `EST`, `PDT`, ...) as well as numeric
/// offsets such as `+0200`. The weekday, a four-digit year and the seconds
/// are all required, and the weekday must agree with the calendar date.
/// Returns `None` for anything else; callers treat an unparsable date as
/// absent rather than as an error.
pub fn parse_rfc822_date(s: &str) -> Option<DateTime<FixedOffset>> {
    let s = s.trim();
    if !has_rss_date_shape(s) {
        return None;
    }
    DateTime::parse_from_rfc2822(s).ok()
}

/// Checks the token layout chrono's RFC 2822 parser is lenient about.
fn has_rss_date_shape(s: &str) -> bool {
    let tokens: Vec<&str> = s.split_whitespace().collect();
    let &[weekday, day, month, year, time, _zone] = tokens.as_slice() else {
        return false;
    };

    let all_digits = |t: &str| t.bytes().all(|b| b.is_ascii_digit());
    let all_alpha = |t: &str| t.bytes().all(|b| b.is_ascii_alphabetic());

    let weekday_ok = weekday
        .strip_suffix(',')
        .is_some_and(|w| w.len() == 3 && all_alpha(w));
    let day_ok = (1..=2).contains(&day.len()) && all_digits(day);
    let month_ok = month.len() == 3 && all_alpha(month);
    let year_ok = year.len() == 4 && all_digits(year);
    let time_ok = {
        let parts: Vec<&str> = time.split(':').collect();
        parts.len() == 3 && parts.iter().all(|&p| p.len() == 2 && all_digits(p))
    };

    weekday_ok && day_ok && month_ok && year_ok && time_ok
}

/// Returns true if month and weekday names for `locale` are English.
pub(crate) fn is_english_locale(locale: &str) -> bool {
    let lang = locale
        .split(|c| c == '_' || c == '-' || c == '.')
        .next()
        .unwrap_or("");
    lang.eq_ignore_ascii_case("en") || locale == "C" || locale.eq_ignore_ascii_case("POSIX")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_author_from_contact() {
        let author = Author::from_contact("jane@x.com (Jane Doe)");
        assert_eq!(author.email.as_deref(), Some("jane@x.com"));
        assert_eq!(author.name.as_deref(), Some("Jane Doe"));
        assert_eq!(author.home_page, None);
    }

    #[test]
    fn test_author_contact_matches_explicit() {
        let explicit = Author::with_name_and_email("Jane Doe", "jane@x.com");
        let split = Author::from_contact("jane@x.com (Jane Doe)");
        assert_eq!(explicit.email, split.email);
        assert_eq!(explicit.name, split.name);
    }

    #[test]
    fn test_author_single_token() {
        let author = Author::from_contact("editor@example.com");
        assert_eq!(author.email.as_deref(), Some("editor@example.com"));
        assert_eq!(author.name.as_deref(), Some("editor@example.com"));
    }

    #[test]
    fn test_author_malformed_contact() {
        assert!(Author::from_contact("").is_empty());
        assert!(Author::from_contact(" () ").is_empty());

        let author = Author::from_contact("  (Jane)  ");
        assert_eq!(author.email.as_deref(), Some("Jane"));
        assert_eq!(author.name.as_deref(), Some("Jane"));
    }

    #[test]
    fn test_parse_rfc822_date() {
        let dt = parse_rfc822_date("Tue, 10 Jun 2003 04:00:00 GMT").unwrap();
        assert_eq!(dt.year(), 2003);
        assert_eq!(dt.month(), 6);
        assert_eq!(dt.day(), 10);
        assert_eq!(dt.hour(), 4);
        assert_eq!(dt.offset().local_minus_utc(), 0);

        let dt = parse_rfc822_date("Sun, 19 May 2002 15:21:36 EST").unwrap();
        assert_eq!(dt.offset().local_minus_utc(), -5 * 3600);

        let dt = parse_rfc822_date("Sun, 19 May 2002 15:21:36 +0200").unwrap();
        assert_eq!(dt.offset().local_minus_utc(), 2 * 3600);
    }

    #[test]
    fn test_parse_rfc822_date_rejects() {
        assert!(parse_rfc822_date("").is_none());
        assert!(parse_rfc822_date("yesterday").is_none());
        assert!(parse_rfc822_date("2003-06-10T04:00:00Z").is_none());
        // Weekday is part of the pattern
        assert!(parse_rfc822_date("10 Jun 2003 04:00:00 GMT").is_none());
        // 10 June 2003 was a Tuesday
        assert!(parse_rfc822_date("Wed, 10 Jun 2003 04:00:00 GMT").is_none());
        // Seconds and a four-digit year are part of the pattern
        assert!(parse_rfc822_date("Tue, 10 Jun 2003 04:00 GMT").is_none());
        assert!(parse_rfc822_date("Tue, 10 Jun 03 04:00:00 GMT").is_none());
        // So is the zone
        assert!(parse_rfc822_date("Tue, 10 Jun 2003 04:00:00").is_none());
        assert!(parse_rfc822_date("Tuesday, 10 Jun 2003 04:00:00 GMT").is_none());
        assert!(parse_rfc822_date("Tue, 10 June 2003 04:00:00 GMT").is_none());
    }

    #[test]
    fn test_parse_rfc822_date_single_digit_day() {
        let dt = parse_rfc822_date("Mon, 2 Jun 2003 04:00:00 GMT").unwrap();
        assert_eq!(dt.day(), 2);
    }

    #[test]
    fn test_is_english_locale() {
        assert!(is_english_locale(DEFAULT_LOCALE));
        assert!(is_english_locale("en-GB"));
        assert!(is_english_locale("C"));
        assert!(!is_english_locale("fr_FR"));
    }
}
