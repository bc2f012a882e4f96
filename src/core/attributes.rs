//! Attribute Parsing
//!
//! Reads `prefix:name="value"` pairs inside an opening tag.

use std::fmt;
use std::io::BufRead;

use super::scanner::WHITESPACE;
use super::tokenizer::Tokenizer;
use crate::error::{RdfXmlError, Result};

/// A parsed attribute
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attribute {
    /// Namespace prefix; empty when the name was unprefixed
    pub schema_name: String,
    pub name: String,
    /// Exact text between the quotes
    pub value: String,
}

impl Attribute {
    /// Create a new attribute
    pub fn new(
        schema_name: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Attribute {
            schema_name: schema_name.into(),
            name: name.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.schema_name.is_empty() {
            write!(f, "{}:", self.schema_name)?;
        }
        write!(f, "{}=\"{}\"", self.name, self.value)
    }
}

impl<R: BufRead> Tokenizer<R> {
    /// Read one attribute; the cursor must be on the attribute name.
    ///
    /// The value runs to the matching quote and may not contain whitespace.
    pub fn read_attribute(&mut self) -> Result<Attribute> {
        let qname = self.read_colon_pair(WHITESPACE.with('='))?;
        if qname.local_name.is_empty() {
            return Err(self.syntax_error("expected an attribute name"));
        }
        let (schema_name, name) = qname.into_parts();

        self.scanner().skip_whitespace()?;
        let assign = self.scanner().read_char()?;
        if assign != '=' {
            return Err(self.syntax_error(format!(
                "expected an assignment sign (=) after attribute {name}, found {assign:?}"
            )));
        }

        let quote = self.scanner().read_char()?;
        if quote != '"' && quote != '\'' {
            return Err(self.syntax_error(
                "assignment operator must be followed by a value enclosed within quotes",
            ));
        }

        let value = self.scanner().read_until(WHITESPACE.with(quote))?;
        let closing = self.scanner().read_char()?;
        if closing != quote {
            return Err(RdfXmlError::QuoteMismatch {
                position: self.position(),
                expected: quote,
                found: closing,
            });
        }

        Ok(Attribute {
            schema_name,
            name,
            value,
        })
    }
}
