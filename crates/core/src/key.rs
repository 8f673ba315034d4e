//! Custom item identifiers.
//!
//! Identifiers are case-preserving strings (e.g. `Sword_Of_Fire`). They are
//! compared case-insensitively unless a caller explicitly asks for an exact
//! match. Callers may also address an item through a recognized namespace
//! alias (`customitems:sword_of_fire`); the alias is stripped before lookup.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Namespace aliases recognized in front of an identifier when no override is configured.
pub const DEFAULT_NAMESPACE_ALIASES: &[&str] = &["customitem", "customitems", "cui", "cuis"];

/// Maximum identifier length accepted at registration.
pub const MAX_ID_LEN: usize = 128;

/// Error returned when parsing an invalid [`ItemId`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// The identifier was empty or whitespace only.
    #[error("item id cannot be empty")]
    Empty,
    /// The identifier exceeded [`MAX_ID_LEN`].
    #[error("item id too long ({0} > {MAX_ID_LEN})")]
    TooLong(usize),
    /// The identifier contained a character outside `A-Za-z0-9_./-`.
    #[error("item id has invalid character {0:?} (allowed: A-Za-z0-9_./-)")]
    InvalidChar(char),
}

/// A validated, case-preserving custom item identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(String);

impl ItemId {
    /// Parse and validate an identifier. Surrounding whitespace is trimmed.
    pub fn parse(input: &str) -> Result<Self, KeyError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(KeyError::Empty);
        }
        if input.len() > MAX_ID_LEN {
            return Err(KeyError::TooLong(input.len()));
        }
        if let Some(c) = input
            .chars()
            .find(|c| !matches!(c, 'a'..='z' | 'A'..='Z' | '0'..='9' | '_' | '-' | '.' | '/'))
        {
            return Err(KeyError::InvalidChar(c));
        }
        Ok(Self(input.to_string()))
    }

    /// Identifier exactly as registered.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Case-folded form used as the store's map key.
    pub fn folded(&self) -> String {
        fold(&self.0)
    }

    /// Compare against a raw identifier.
    pub fn matches(&self, other: &str, case_sensitive: bool) -> bool {
        ids_match(&self.0, other, case_sensitive)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ItemId {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Case-fold an identifier for map keys.
pub fn fold(id: &str) -> String {
    id.trim().to_lowercase()
}

/// Compare two identifiers, optionally ignoring case.
pub fn ids_match(a: &str, b: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        a == b
    } else {
        a.to_lowercase() == b.to_lowercase()
    }
}

/// The set of namespace tokens that may prefix an identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceAliases {
    aliases: Vec<String>,
}

impl Default for NamespaceAliases {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE_ALIASES.iter().copied())
    }
}

impl NamespaceAliases {
    /// Build an alias set. Aliases are matched ignoring ASCII case.
    pub fn new<I, S>(aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            aliases: aliases
                .into_iter()
                .map(|a| a.as_ref().trim().to_string())
                .filter(|a| !a.is_empty())
                .collect(),
        }
    }

    /// Registered alias tokens.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Strip a recognized `alias:` prefix.
    ///
    /// Returns `None` when the input carries no recognized alias, or when
    /// nothing follows the colon.
    pub fn strip<'a>(&self, input: &'a str) -> Option<&'a str> {
        let (namespace, rest) = input.trim().split_once(':')?;
        if rest.is_empty() {
            return None;
        }
        self.aliases
            .iter()
            .any(|alias| alias.eq_ignore_ascii_case(namespace))
            .then_some(rest)
    }
}
