//! Parsing of `language/package` references.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::language::Language;

/// A validated `language/package` pair.
///
/// The package name is opaque here; path safety is enforced where names are
/// turned into directories.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PackageReference {
    pub language: Language,
    pub name: String,
}

impl PackageReference {
    pub fn new(language: Language, name: impl Into<String>) -> Self {
        Self {
            language,
            name: name.into(),
        }
    }
}

impl fmt::Display for PackageReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.language, self.name)
    }
}

impl FromStr for PackageReference {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('/').collect();
        if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() {
            return Err(Error::MalformedReference);
        }

        let language =
            Language::from_token(parts[0]).ok_or_else(|| Error::UnknownLanguage(parts[0].into()))?;
        Ok(PackageReference::new(language, parts[1]))
    }
}

/// Parse a single reference token.
pub fn parse_reference(token: &str) -> Result<PackageReference, Error> {
    token.parse()
}
