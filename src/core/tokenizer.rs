//! Tag tokenizer
//!
//! Reads the tag grammar on top of the scanner:
//! - Qualified names (`prefix:local` or `local`)
//! - Opening tags with attributes, self-closing tags and prologs
//! - Closing tags

use std::fmt;
use std::io::BufRead;

use memchr::memchr;
use tracing::trace;

use super::attributes::Attribute;
use super::scanner::{Delimiters, Scanner, WHITESPACE};
use crate::error::{RdfXmlError, Result};

/// End of an element name inside an opening tag
const TAG_NAME_END: Delimiters = WHITESPACE.with('>').with('/');

/// End of an element name inside a closing tag
const CLOSING_NAME_END: Delimiters = WHITESPACE.with('>');

/// A possibly prefixed name, split at its first colon
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QName {
    /// Text before the colon; None when the word had no colon
    pub prefix: Option<String>,
    /// Text after the colon, or the whole word
    pub local_name: String,
}

impl QName {
    /// Split a word at its first colon.
    ///
    /// A colon with nothing after it is an error.
    pub fn split(word: String) -> Result<Self> {
        match memchr(b':', word.as_bytes()) {
            Some(colon) => {
                let local_name = word[colon + 1..].to_string();
                if local_name.is_empty() {
                    return Err(RdfXmlError::EmptyLocalName(word));
                }
                let mut prefix = word;
                prefix.truncate(colon);
                Ok(QName {
                    prefix: Some(prefix),
                    local_name,
                })
            }
            None => Ok(QName {
                prefix: None,
                local_name: word,
            }),
        }
    }

    /// Whether the word contained a colon
    pub fn colon_found(&self) -> bool {
        self.prefix.is_some()
    }

    /// Break into `(schema_name, name)`, using an empty schema name when
    /// there was no prefix
    pub fn into_parts(self) -> (String, String) {
        (self.prefix.unwrap_or_default(), self.local_name)
    }
}

/// An element tag
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tag {
    /// Namespace prefix; empty when the name was unprefixed
    pub schema_name: String,
    pub name: String,
    pub attrs: Vec<Attribute>,
}

impl Tag {
    /// Create a tag without attributes
    pub fn new(schema_name: impl Into<String>, name: impl Into<String>) -> Self {
        Tag {
            schema_name: schema_name.into(),
            name: name.into(),
            attrs: Vec::new(),
        }
    }

    fn from_qname(qname: QName) -> Self {
        let (schema_name, name) = qname.into_parts();
        Tag::new(schema_name, name)
    }

    /// True when both tags carry the same prefix and local name
    pub fn same_name(&self, other: &Tag) -> bool {
        self.schema_name == other.schema_name && self.name == other.name
    }

    /// Name as written, `prefix:name` or `name`
    pub fn qualified_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.schema_name.is_empty() {
            f.write_str(&self.name)
        } else {
            write!(f, "{}:{}", self.schema_name, self.name)
        }
    }
}

/// Result of reading an opening tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpeningTag {
    /// `<? ... ?>` was skipped, no tag produced
    Prolog,
    /// `<name attrs...>`: text or children follow, then a closing tag
    Open(Tag),
    /// `<name attrs.../>`: the block is already complete
    SelfClosing(Tag),
}

/// Tag tokenizer over a character scanner
pub struct Tokenizer<R> {
    scanner: Scanner<R>,
}

impl<R: BufRead> Tokenizer<R> {
    /// Create a new tokenizer for the given reader
    pub fn new(reader: R) -> Self {
        Tokenizer {
            scanner: Scanner::new(reader),
        }
    }

    /// Access the underlying scanner
    pub fn scanner(&mut self) -> &mut Scanner<R> {
        &mut self.scanner
    }

    /// Current position in characters
    pub fn position(&self) -> usize {
        self.scanner.position()
    }

    pub(crate) fn syntax_error(&self, message: impl Into<String>) -> RdfXmlError {
        RdfXmlError::syntax(self.scanner.position(), message)
    }

    /// Consume one character and require it to be `expected`
    pub(crate) fn expect_char(&mut self, expected: char, message: &str) -> Result<()> {
        let found = self.scanner.read_char()?;
        if found != expected {
            return Err(self.syntax_error(format!("{message}, found {found:?}")));
        }
        Ok(())
    }

    /// Read a word up to `delimiters` and split it at its first colon
    pub fn read_colon_pair(&mut self, delimiters: Delimiters) -> Result<QName> {
        let word = self.scanner.read_until(delimiters)?;
        QName::split(word)
    }

    /// Read an opening tag, a self-closing tag or a prolog.
    ///
    /// Returns `EndOfInput` if only whitespace remains.
    pub fn read_opening_tag(&mut self) -> Result<OpeningTag> {
        self.scanner.skip_whitespace()?;

        // after the whitespace, the next character must be '<'
        match self.scanner.read_until(Delimiters::of('<')) {
            Ok(stray) if stray.is_empty() => {}
            Ok(stray) => {
                return Err(self.syntax_error(format!(
                    "found stray characters {stray:?} before tag start"
                )))
            }
            Err(RdfXmlError::UnexpectedEof { consumed }) if consumed.is_empty() => {
                return Err(RdfXmlError::EndOfInput)
            }
            Err(RdfXmlError::UnexpectedEof { consumed }) => {
                return Err(self.syntax_error(format!(
                    "found stray characters {consumed:?} at end of input"
                )))
            }
            Err(e) => return Err(e),
        }

        self.scanner.read_char()?; // '<'
        self.scanner.skip_whitespace()?;

        match self.scanner.peek_char()? {
            '/' => return Err(self.syntax_error("unexpected closing tag")),
            '?' => {
                self.skip_prolog()?;
                return Ok(OpeningTag::Prolog);
            }
            _ => {}
        }

        let qname = self.read_colon_pair(TAG_NAME_END)?;
        if qname.local_name.is_empty() {
            return Err(self.syntax_error("expected a tag name after <"));
        }
        let mut tag = Tag::from_qname(qname);

        loop {
            self.scanner.skip_whitespace()?;
            match self.scanner.peek_char()? {
                '>' => {
                    self.scanner.read_char()?;
                    return Ok(OpeningTag::Open(tag));
                }
                '/' => {
                    self.scanner.read_char()?;
                    self.expect_char('>', "expected closing angular bracket after /")?;
                    return Ok(OpeningTag::SelfClosing(tag));
                }
                _ => {
                    let attr = self.read_attribute()?;
                    tag.attrs.push(attr);
                }
            }
        }
    }

    /// Skip `?...?>`; the cursor is on the first question mark
    fn skip_prolog(&mut self) -> Result<()> {
        self.scanner.read_char()?; // '?'
        self.scanner.read_until(Delimiters::of('?'))?;
        self.scanner.read_char()?; // '?'
        self.scanner.skip_whitespace()?;

        let next = self.scanner.peek_char()?;
        if next != '>' {
            return Err(self.syntax_error(format!("expected a > char after ?, found {next:?}")));
        }
        self.scanner.read_char()?;
        trace!(position = self.scanner.position(), "skipped prolog");
        Ok(())
    }

    /// Read `</prefix:name>`; leading whitespace must already be skipped
    pub fn read_closing_tag(&mut self) -> Result<Tag> {
        let marker = self.scanner.read_chars(2)?;
        if marker != "</" {
            return Err(self.syntax_error(format!("expected a closing tag, found {marker:?}")));
        }

        let qname = self.read_colon_pair(CLOSING_NAME_END)?;
        self.scanner.skip_whitespace()?;
        self.expect_char('>', "expected a > char")?;
        Ok(Tag::from_qname(qname))
    }
}
