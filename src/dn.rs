//! Distinguished name handling.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while parsing a distinguished name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DnError {
    #[error("distinguished name is empty")]
    Empty,

    #[error("malformed relative distinguished name `{0}`")]
    MalformedRdn(String),
}

/// A validated LDAP distinguished name, e.g. `CN=Users,DC=skola,DC=local`.
///
/// Parsed once at construction; afterwards the inner text is trusted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Dn(String);

impl Dn {
    /// Raw textual form, exactly as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Relative distinguished names, outermost last.
    pub fn components(&self) -> Vec<&str> {
        split_rdns(&self.0).into_iter().map(str::trim).collect()
    }
}

impl fmt::Display for Dn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Dn {
    type Err = DnError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        if input.trim().is_empty() {
            return Err(DnError::Empty);
        }

        for rdn in split_rdns(input) {
            check_rdn(rdn.trim())?;
        }

        Ok(Self(input.to_owned()))
    }
}

impl TryFrom<String> for Dn {
    type Error = DnError;

    fn try_from(input: String) -> Result<Self, Self::Error> {
        input.parse()
    }
}

impl From<Dn> for String {
    fn from(dn: Dn) -> Self {
        dn.0
    }
}

/// Split on commas, honoring `\,` escapes inside attribute values.
fn split_rdns(input: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut escaped = false;

    for (index, c) in input.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }

        match c {
            '\\' => escaped = true,
            ',' => {
                parts.push(&input[start..index]);
                start = index + 1;
            },
            _ => {},
        }
    }

    parts.push(&input[start..]);
    parts
}

/// An RDN must read `attribute=value`, with an alphabetic attribute name.
fn check_rdn(rdn: &str) -> Result<(), DnError> {
    let malformed = || DnError::MalformedRdn(rdn.to_owned());

    let (attribute, value) = rdn.split_once('=').ok_or_else(malformed)?;

    let mut chars = attribute.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {},
        _ => return Err(malformed()),
    }
    if !chars.all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(malformed());
    }

    if value.trim().is_empty() {
        return Err(malformed());
    }

    Ok(())
}
