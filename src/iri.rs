//! Namespace IRI values

use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::error::{RdfXmlError, Result};

/// A validated absolute IRI, kept exactly as written.
///
/// The default value is the empty IRI, used for the unbound default
/// namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Iri(String);

impl Iri {
    /// Validate `value` as an absolute URI
    pub fn parse(value: &str) -> Result<Self> {
        Url::parse(value).map_err(|source| RdfXmlError::InvalidIri {
            value: value.to_string(),
            source,
        })?;
        Ok(Iri(value.to_string()))
    }

    /// Wrap a constant known to be a valid IRI
    pub(crate) fn from_static(value: &'static str) -> Self {
        Iri(value.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append a local name to this base.
    ///
    /// Bases ending in `#` or `/` are extended directly, any other base
    /// gets a `#` separator. The empty IRI yields the bare fragment.
    pub fn with_fragment(&self, fragment: &str) -> Iri {
        if self.is_empty() {
            Iri(fragment.to_string())
        } else if self.0.ends_with('#') || self.0.ends_with('/') {
            Iri(format!("{}{}", self.0, fragment))
        } else {
            Iri(format!("{}#{}", self.0, fragment))
        }
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Iri {
    type Err = RdfXmlError;

    fn from_str(s: &str) -> Result<Self> {
        Iri::parse(s)
    }
}

impl AsRef<str> for Iri {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let iri = Iri::parse("http://ex.org/").unwrap();
        assert_eq!(iri.as_str(), "http://ex.org/");
        assert!("urn:example:thing".parse::<Iri>().is_ok());
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!(
            Iri::parse("not a uri"),
            Err(RdfXmlError::InvalidIri { .. })
        ));
        assert!(Iri::parse("").is_err());
    }

    #[test]
    fn test_with_fragment() {
        let rdf = Iri::parse("http://www.w3.org/1999/02/22-rdf-syntax-ns#").unwrap();
        assert_eq!(
            rdf.with_fragment("type").as_str(),
            "http://www.w3.org/1999/02/22-rdf-syntax-ns#type"
        );
        let slash = Iri::parse("http://ex.org/").unwrap();
        assert_eq!(slash.with_fragment("Thing").as_str(), "http://ex.org/Thing");
        let bare = Iri::parse("http://ex.org/ns").unwrap();
        assert_eq!(bare.with_fragment("Thing").as_str(), "http://ex.org/ns#Thing");
        assert_eq!(Iri::default().with_fragment("Thing").as_str(), "Thing");
    }
}
