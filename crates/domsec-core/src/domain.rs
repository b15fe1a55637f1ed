//! Registered domain names
//!
//! A [`Domain`] can only be built through [`Domain::parse`], which applies the
//! hostname grammar accepted by the registry. Deserialization goes through
//! the same check, so a stored or received name that fails it is an error.
//!
//! The grammar:
//!
//! - one or more labels of ASCII letters and digits, 1-63 characters, with
//!   hyphens allowed only in the interior, each followed by a dot
//! - a final label of at least two ASCII letters
//!
//! The check is purely syntactic. No DNS resolution happens here and the name
//! is stored exactly as given (no case folding).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Maximum length of a non-final label
const MAX_LABEL_LEN: usize = 63;

/// Minimum length of the final (alphabetic) label
const MIN_TLD_LEN: usize = 2;

/// A syntactically valid, registered hostname
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Domain(String);

impl Domain {
    /// Validate `candidate` against the hostname grammar
    ///
    /// # Returns
    ///
    /// - `Ok(Domain)`: The candidate, unchanged
    /// - `Err(Error::InvalidFormat)`: The candidate does not match the grammar
    pub fn parse(candidate: &str) -> Result<Self> {
        validate(candidate)?;
        Ok(Self(candidate.to_string()))
    }

    /// The domain as stored
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the inner string
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Domain {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Domain {
    type Error = Error;

    fn try_from(candidate: String) -> Result<Self> {
        validate(&candidate)?;
        Ok(Self(candidate))
    }
}

impl From<Domain> for String {
    fn from(domain: Domain) -> Self {
        domain.0
    }
}

impl std::str::FromStr for Domain {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Check whether `candidate` matches the hostname grammar
pub fn is_valid(candidate: &str) -> bool {
    validate(candidate).is_ok()
}

fn validate(candidate: &str) -> Result<()> {
    let Some((head, tld)) = candidate.rsplit_once('.') else {
        return Err(Error::invalid_format(format!(
            "'{}' has no dot separating a top-level label",
            candidate
        )));
    };

    if tld.len() < MIN_TLD_LEN || !tld.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(Error::invalid_format(format!(
            "'{}' must end in an alphabetic label of at least {} characters",
            candidate, MIN_TLD_LEN
        )));
    }

    for label in head.split('.') {
        validate_label(candidate, label)?;
    }

    Ok(())
}

fn validate_label(candidate: &str, label: &str) -> Result<()> {
    if label.is_empty() || label.len() > MAX_LABEL_LEN {
        return Err(Error::invalid_format(format!(
            "'{}' has a label of {} characters (expected 1-{})",
            candidate,
            label.len(),
            MAX_LABEL_LEN
        )));
    }

    if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(Error::invalid_format(format!(
            "'{}' label '{}' contains characters other than letters, digits and hyphens",
            candidate, label
        )));
    }

    if label.starts_with('-') || label.ends_with('-') {
        return Err(Error::invalid_format(format!(
            "'{}' label '{}' starts or ends with a hyphen",
            candidate, label
        )));
    }

    Ok(())
}
