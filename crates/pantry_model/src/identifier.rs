//! Namespaced identifiers.
//!
//! Every registered thing in Pantry (items, fluids, ingredient kinds,
//! categories, recipes, and plugins) is named by an [`Identifier`] of the
//! form `namespace:path`.
//!
//! # Example
//!
//! ```
//! use pantry_model::Identifier;
//!
//! let id: Identifier = "examplemod:copper_press".parse().unwrap();
//! assert_eq!(id.namespace(), "examplemod");
//! assert_eq!(id.path(), "copper_press");
//!
//! // A bare path lands in the host's default namespace.
//! let stick = Identifier::parse("stick").unwrap();
//! assert_eq!(stick.to_string(), "minecraft:stick");
//! ```

use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Namespace used when an identifier is written without one.
pub const DEFAULT_NAMESPACE: &str = "minecraft";

/// Errors produced while parsing an [`Identifier`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// The namespace part was empty (`":path"`).
    #[error("identifier '{0}' has an empty namespace")]
    EmptyNamespace(String),

    /// The path part was empty (`"namespace:"` or `""`).
    #[error("identifier '{0}' has an empty path")]
    EmptyPath(String),

    /// The identifier contained more than one `:` separator.
    #[error("identifier '{0}' contains more than one ':'")]
    TooManySeparators(String),

    /// A character outside the allowed set was found.
    #[error("identifier '{input}' contains invalid character '{ch}'")]
    InvalidCharacter {
        /// The full input.
        input: String,
        /// The offending character.
        ch: char,
    },
}

/// A namespaced `namespace:path` identifier.
///
/// Namespaces allow `[a-z0-9_.-]`; paths additionally allow `/`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier {
    namespace: String,
    path: String,
}

impl Identifier {
    /// Creates an identifier from its two parts, validating both.
    ///
    /// # Errors
    ///
    /// Returns an error if either part is empty or contains a character
    /// outside the allowed set.
    pub fn new(namespace: impl Into<String>, path: impl Into<String>) -> Result<Self, IdentifierError> {
        let namespace = namespace.into();
        let path = path.into();
        let display = format!("{namespace}:{path}");

        if namespace.is_empty() {
            return Err(IdentifierError::EmptyNamespace(display));
        }
        if path.is_empty() {
            return Err(IdentifierError::EmptyPath(display));
        }
        if let Some(ch) = namespace.chars().find(|c| !is_namespace_char(*c)) {
            return Err(IdentifierError::InvalidCharacter { input: display, ch });
        }
        if let Some(ch) = path.chars().find(|c| !is_path_char(*c)) {
            return Err(IdentifierError::InvalidCharacter { input: display, ch });
        }

        Ok(Self { namespace, path })
    }

    /// Parses `namespace:path`, or a bare `path` in [`DEFAULT_NAMESPACE`].
    ///
    /// # Errors
    ///
    /// See [`Identifier::new`]. Also fails on more than one `:`.
    pub fn parse(input: &str) -> Result<Self, IdentifierError> {
        let mut parts = input.split(':');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(path), None, _) => {
                if path.is_empty() {
                    return Err(IdentifierError::EmptyPath(input.to_string()));
                }
                Self::new(DEFAULT_NAMESPACE, path)
            }
            (Some(namespace), Some(path), None) => Self::new(namespace, path),
            _ => Err(IdentifierError::TooManySeparators(input.to_string())),
        }
    }

    /// Creates an identifier in the default namespace.
    ///
    /// # Errors
    ///
    /// See [`Identifier::new`].
    pub fn vanilla(path: impl Into<String>) -> Result<Self, IdentifierError> {
        Self::new(DEFAULT_NAMESPACE, path)
    }

    /// Returns the namespace part.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the path part.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Builds an identifier from parts known at compile time.
    ///
    /// Intended for well-known ids (built-in categories, vanilla items).
    /// Validity is only checked in debug builds.
    #[must_use]
    pub fn from_static(namespace: &'static str, path: &'static str) -> Self {
        debug_assert!(namespace.chars().all(is_namespace_char));
        debug_assert!(path.chars().all(is_path_char));
        Self {
            namespace: namespace.to_string(),
            path: path.to_string(),
        }
    }
}

fn is_namespace_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '_' | '.' | '-')
}

fn is_path_char(c: char) -> bool {
    is_namespace_char(c) || c == '/'
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}

impl FromStr for Identifier {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Identifier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_namespaced() {
        let id = Identifier::parse("examplemod:machines/press").unwrap();
        assert_eq!(id.namespace(), "examplemod");
        assert_eq!(id.path(), "machines/press");
        assert_eq!(id.to_string(), "examplemod:machines/press");
    }

    #[test]
    fn parse_bare_path_uses_default_namespace() {
        let id = Identifier::parse("stick").unwrap();
        assert_eq!(id.namespace(), DEFAULT_NAMESPACE);
    }

    #[test]
    fn parse_rejects_empty_parts() {
        assert!(matches!(
            Identifier::parse(":stick"),
            Err(IdentifierError::EmptyNamespace(_))
        ));
        assert!(matches!(
            Identifier::parse("minecraft:"),
            Err(IdentifierError::EmptyPath(_))
        ));
        assert!(matches!(Identifier::parse(""), Err(IdentifierError::EmptyPath(_))));
    }

    #[test]
    fn parse_rejects_extra_separator() {
        assert!(matches!(
            Identifier::parse("a:b:c"),
            Err(IdentifierError::TooManySeparators(_))
        ));
    }

    #[test]
    fn parse_rejects_uppercase_and_slash_in_namespace() {
        assert!(matches!(
            Identifier::parse("Example:stick"),
            Err(IdentifierError::InvalidCharacter { ch: 'E', .. })
        ));
        assert!(matches!(
            Identifier::parse("a/b:stick"),
            Err(IdentifierError::InvalidCharacter { ch: '/', .. })
        ));
    }

    #[test]
    fn serde_as_string() {
        let id = Identifier::parse("examplemod:press").unwrap();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"examplemod:press\"");

        let back: Identifier = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);

        let bad: Result<Identifier, _> = serde_json::from_str("\"A:b\"");
        assert!(bad.is_err());
    }
}
