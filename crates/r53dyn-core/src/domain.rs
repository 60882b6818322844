//! Fully-qualified domain names and zone identifiers

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// Maximum length of a name without its trailing dot (RFC 1035)
const MAX_NAME_LEN: usize = 253;

/// Maximum length of a single label (RFC 1035)
const MAX_LABEL_LEN: usize = 63;

/// A fully-qualified domain name
///
/// Always stored in normalized form: ASCII lowercase with a trailing `.`.
/// Two names compare equal exactly when they are equal label-for-label,
/// ignoring case.
///
/// ```
/// use r53dyn_core::DomainName;
///
/// let name: DomainName = "Host.Example.com".parse().unwrap();
/// assert_eq!(name.as_str(), "host.example.com.");
/// assert_eq!(name.label_count(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DomainName(String);

impl DomainName {
    /// Parse and normalize a domain name
    ///
    /// Accepts names with or without the trailing root separator.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let bare = trimmed.strip_suffix('.').unwrap_or(trimmed);

        if bare.is_empty() {
            return Err(Error::invalid_input(format!(
                "Domain name must have at least one label: '{}'",
                input
            )));
        }

        if bare.len() > MAX_NAME_LEN {
            return Err(Error::invalid_input(format!(
                "Domain name too long: {} chars (max {})",
                bare.len(),
                MAX_NAME_LEN
            )));
        }

        for label in bare.split('.') {
            if label.is_empty() {
                return Err(Error::invalid_input(format!(
                    "Domain name has empty label: '{}'",
                    input
                )));
            }

            if label.len() > MAX_LABEL_LEN {
                return Err(Error::invalid_input(format!(
                    "Domain label too long: {} chars (max {}). Label: '{}'",
                    label.len(),
                    MAX_LABEL_LEN,
                    label
                )));
            }

            if !label
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
            {
                return Err(Error::invalid_input(format!(
                    "Domain label contains invalid characters: '{}'",
                    label
                )));
            }
        }

        Ok(Self(format!("{}.", bare.to_ascii_lowercase())))
    }

    /// The normalized name, including the trailing `.`
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Labels from leftmost to rightmost, excluding the root label
    pub fn labels(&self) -> impl DoubleEndedIterator<Item = &str> {
        self.0[..self.0.len() - 1].split('.')
    }

    /// Number of labels, excluding the root label
    pub fn label_count(&self) -> usize {
        self.labels().count()
    }

    /// The suffix made of the rightmost `count` labels
    ///
    /// Returns `None` when `count` is zero or exceeds the label count.
    pub fn suffix(&self, count: usize) -> Option<DomainName> {
        let total = self.label_count();
        if count == 0 || count > total {
            return None;
        }

        let labels: Vec<&str> = self.labels().skip(total - count).collect();
        Some(Self(format!("{}.", labels.join("."))))
    }

    /// Suffixes with at least `min_labels` labels, longest first
    ///
    /// `a.b.example.com.` with a minimum of 2 yields `a.b.example.com.`,
    /// `b.example.com.` and `example.com.`.
    pub fn suffixes(&self, min_labels: usize) -> Vec<DomainName> {
        let min_labels = min_labels.max(1);
        (min_labels..=self.label_count())
            .rev()
            .filter_map(|count| self.suffix(count))
            .collect()
    }
}

impl fmt::Display for DomainName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for DomainName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl AsRef<str> for DomainName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Opaque identifier of a hosted zone, as issued by the provider
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ZoneId(String);

impl ZoneId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
