//! Content slugs

use std::fmt;

/// Maximum accepted slug length in bytes
pub const MAX_SLUG_LEN: usize = 200;

/// Names taken by fixed routes under `/views/`
pub const RESERVED_SLUGS: &[&str] = &["eligibility", "policy", "visitor"];

/// Slug validation error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlugError {
    /// Slug was empty after trimming
    Empty,
    /// Slug longer than [`MAX_SLUG_LEN`]
    TooLong(usize),
    /// Slug contains a character outside `[a-z0-9-_.]`
    InvalidChar(char),
    /// Slug collides with a fixed route, see [`RESERVED_SLUGS`]
    Reserved(String),
}

impl fmt::Display for SlugError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlugError::Empty => write!(f, "slug cannot be empty"),
            SlugError::TooLong(len) => {
                write!(f, "slug is {} bytes, limit is {}", len, MAX_SLUG_LEN)
            }
            SlugError::InvalidChar(c) => write!(f, "slug contains invalid character {:?}", c),
            SlugError::Reserved(s) => write!(f, "slug {:?} is reserved", s),
        }
    }
}

impl std::error::Error for SlugError {}

/// Stable identifier of a content item
///
/// Slugs are trimmed and must be lowercase ASCII alphanumerics, `-`, `_` or `.`.
/// The names in [`RESERVED_SLUGS`] are refused because fixed routes own them.
/// They reference content items by value; nothing in the ledger owns the item.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Slug(String);

impl Slug {
    /// Parse and validate a slug
    ///
    /// # Examples
    ///
    /// ```
    /// use inkwell_domain::Slug;
    ///
    /// let slug = Slug::parse(" hello-world ").unwrap();
    /// assert_eq!(slug.as_str(), "hello-world");
    /// assert!(Slug::parse("Hello World").is_err());
    /// assert!(Slug::parse("policy").is_err());
    /// ```
    pub fn parse(value: &str) -> Result<Self, SlugError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(SlugError::Empty);
        }
        if trimmed.len() > MAX_SLUG_LEN {
            return Err(SlugError::TooLong(trimmed.len()));
        }
        if let Some(c) = trimmed
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '-' | '_' | '.')))
        {
            return Err(SlugError::InvalidChar(c));
        }
        if RESERVED_SLUGS.contains(&trimmed) {
            return Err(SlugError::Reserved(trimmed.to_string()));
        }

        Ok(Self(trimmed.to_string()))
    }

    /// Get slug as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
