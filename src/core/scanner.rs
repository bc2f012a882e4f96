//! Buffered character scanner
//!
//! Decodes a UTF-8 byte stream into code points and offers one- and
//! n-character lookahead plus delimiter-driven reads. The scanner knows
//! nothing about XML; the tokenizer builds the grammar on top of it.

use std::collections::VecDeque;
use std::io::BufRead;

use super::encoding::XmlEncoding;
use crate::error::{RdfXmlError, Result};

/// Set of delimiter characters stored as a 64-bit mask.
///
/// Bit `k` set means code point `k` is a delimiter, so only characters
/// below U+0040 can be members. Every delimiter the tokenizer uses
/// (`<`, `>`, `/`, `=`, `:`, `?`, quotes and whitespace) fits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Delimiters(u64);

impl Delimiters {
    /// The empty set
    pub const NONE: Delimiters = Delimiters(0);

    /// Set holding a single character
    ///
    /// # Panics
    ///
    /// Panics if `c` is not below U+0040.
    pub const fn of(c: char) -> Self {
        Self::NONE.with(c)
    }

    /// Copy of this set with `c` added
    ///
    /// # Panics
    ///
    /// Panics if `c` is not below U+0040.
    pub const fn with(self, c: char) -> Self {
        let cp = c as u32;
        assert!(cp < 64, "delimiter outside the 64-bit mask range");
        Delimiters(self.0 | (1u64 << cp))
    }

    /// Union of two sets
    pub const fn union(self, other: Delimiters) -> Self {
        Delimiters(self.0 | other.0)
    }

    /// Check membership. Characters at or above U+0040 are never members.
    #[inline]
    pub fn contains(self, c: char) -> bool {
        let cp = c as u32;
        cp < 64 && self.0 & (1u64 << cp) != 0
    }
}

/// Characters that are insignificant between tokens
pub const WHITESPACE: Delimiters = Delimiters::of(' ')
    .with('\t')
    .with('\r')
    .with('\n');

/// Check if a character is insignificant whitespace
#[inline]
pub fn is_whitespace(c: char) -> bool {
    WHITESPACE.contains(c)
}

/// Code point cursor over a buffered byte source
pub struct Scanner<R> {
    reader: R,
    lookahead: VecDeque<char>,
    /// Bytes read while sniffing the encoding, replayed before the reader
    sniffed: VecDeque<u8>,
    /// Code points handed out by read operations
    position: usize,
    /// Bytes pulled from the reader so far
    byte_offset: usize,
}

impl<R: BufRead> Scanner<R> {
    /// Create a new scanner over the given reader
    pub fn new(reader: R) -> Self {
        Scanner {
            reader,
            lookahead: VecDeque::with_capacity(4),
            sniffed: VecDeque::new(),
            position: 0,
            byte_offset: 0,
        }
    }

    /// Number of characters consumed so far
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Consume a byte order mark if one starts the stream.
    ///
    /// Only meaningful before the first character has been decoded; later
    /// calls report UTF-8 without touching the stream. The first three bytes
    /// are gathered across as many buffer fills as the reader needs.
    pub fn strip_byte_order_mark(&mut self) -> Result<XmlEncoding> {
        if self.byte_offset > 0 || !self.sniffed.is_empty() {
            return Ok(XmlEncoding::Utf8);
        }
        let mut head = [0u8; 3];
        let mut len = 0;
        while len < head.len() {
            let buf = self.reader.fill_buf()?;
            if buf.is_empty() {
                break;
            }
            let n = buf.len().min(head.len() - len);
            head[len..len + n].copy_from_slice(&buf[..n]);
            self.reader.consume(n);
            len += n;
        }

        let encoding = XmlEncoding::detect(&head[..len]);
        match encoding {
            XmlEncoding::Utf8Bom => {
                self.byte_offset += 3;
                Ok(encoding)
            }
            XmlEncoding::Utf8 => {
                self.sniffed.extend(&head[..len]);
                Ok(encoding)
            }
            other => Err(RdfXmlError::UnsupportedEncoding(other.name())),
        }
    }

    fn next_byte(&mut self) -> Result<Option<u8>> {
        if let Some(byte) = self.sniffed.pop_front() {
            self.byte_offset += 1;
            return Ok(Some(byte));
        }
        let byte = match self.reader.fill_buf()?.first() {
            Some(&b) => b,
            None => return Ok(None),
        };
        self.reader.consume(1);
        self.byte_offset += 1;
        Ok(Some(byte))
    }

    /// Decode the next code point straight from the reader
    fn decode_char(&mut self) -> Result<Option<char>> {
        let start = self.byte_offset;
        let first = match self.next_byte()? {
            Some(b) => b,
            None => return Ok(None),
        };
        let width = match first {
            0x00..=0x7F => return Ok(Some(first as char)),
            0xC2..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF4 => 4,
            _ => return Err(RdfXmlError::InvalidUtf8 { offset: start }),
        };

        let mut buf = [first, 0, 0, 0];
        for slot in buf.iter_mut().take(width).skip(1) {
            *slot = self
                .next_byte()?
                .ok_or(RdfXmlError::InvalidUtf8 { offset: start })?;
        }
        match std::str::from_utf8(&buf[..width]) {
            Ok(s) => Ok(s.chars().next()),
            Err(_) => Err(RdfXmlError::InvalidUtf8 { offset: start }),
        }
    }

    /// Make sure `n` characters are buffered. Returns false if the stream
    /// ends first.
    fn fill(&mut self, n: usize) -> Result<bool> {
        while self.lookahead.len() < n {
            match self.decode_char()? {
                Some(c) => self.lookahead.push_back(c),
                None => return Ok(false),
            }
        }
        Ok(true)
    }

    /// Next character without consuming it, or None at end of stream
    fn try_peek(&mut self) -> Result<Option<char>> {
        self.fill(1)?;
        Ok(self.lookahead.front().copied())
    }

    /// Consume and return one character
    pub fn read_char(&mut self) -> Result<char> {
        self.fill(1)?;
        match self.lookahead.pop_front() {
            Some(c) => {
                self.position += 1;
                Ok(c)
            }
            None => Err(RdfXmlError::eof("")),
        }
    }

    /// Return the next character without consuming it
    pub fn peek_char(&mut self) -> Result<char> {
        self.try_peek()?.ok_or_else(|| RdfXmlError::eof(""))
    }

    /// Consume and return exactly `n` characters
    pub fn read_chars(&mut self, n: usize) -> Result<String> {
        if !self.fill(n)? {
            let consumed: String = self.lookahead.drain(..).collect();
            self.position += consumed.chars().count();
            return Err(RdfXmlError::eof(consumed));
        }
        self.position += n;
        Ok(self.lookahead.drain(..n).collect())
    }

    /// Return the next `n` characters without consuming them
    pub fn peek_chars(&mut self, n: usize) -> Result<String> {
        if !self.fill(n)? {
            return Err(RdfXmlError::eof(""));
        }
        Ok(self.lookahead.iter().take(n).collect())
    }

    /// Consume everything up to, not including, the first delimiter.
    ///
    /// The delimiter stays in the stream. If the stream ends first the
    /// error carries the characters read on the way.
    pub fn read_until(&mut self, delimiters: Delimiters) -> Result<String> {
        let mut word = String::new();
        loop {
            match self.try_peek()? {
                Some(c) if delimiters.contains(c) => return Ok(word),
                Some(c) => {
                    self.lookahead.pop_front();
                    self.position += 1;
                    word.push(c);
                }
                None => return Err(RdfXmlError::UnexpectedEof { consumed: word }),
            }
        }
    }

    /// Skip whitespace, stopping quietly at end of stream.
    /// Returns the number of characters skipped.
    pub fn skip_whitespace(&mut self) -> Result<usize> {
        let mut skipped = 0;
        while let Some(c) = self.try_peek()? {
            if !is_whitespace(c) {
                break;
            }
            self.lookahead.pop_front();
            self.position += 1;
            skipped += 1;
        }
        Ok(skipped)
    }
}
