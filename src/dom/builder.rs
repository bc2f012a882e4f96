//! Block tree builder
//!
//! Recursive descent over the tokenizer: an opening tag, then either a
//! text value or child blocks, then the matching closing tag. Nesting is
//! bounded so hostile input fails with a syntax error instead of
//! exhausting the stack.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use super::block::Block;
use crate::core::{Delimiters, OpeningTag, Tokenizer};
use crate::error::{RdfXmlError, Result};
use crate::options::DEFAULT_MAX_DEPTH;

/// Reads one document into a block tree.
///
/// `read` consumes the reader, so a file opened by [`XmlReader::from_path`]
/// is closed whether or not the document was well-formed. To keep control
/// of a source, pass `&mut source` to [`XmlReader::from_reader`].
pub struct XmlReader<R> {
    tokenizer: Tokenizer<R>,
    max_depth: usize,
}

impl XmlReader<BufReader<File>> {
    /// Open a file for reading
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        debug!(path = %path.display(), "opened RDF/XML document");
        Ok(Self::from_reader(BufReader::new(file)))
    }
}

impl<R: BufRead> XmlReader<R> {
    /// Read from an already open source
    pub fn from_reader(reader: R) -> Self {
        XmlReader {
            tokenizer: Tokenizer::new(reader),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Reject documents nested deeper than `depth` elements
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Read the root block. The underlying source is dropped afterwards.
    pub fn read(mut self) -> Result<Block> {
        self.tokenizer.scanner().strip_byte_order_mark()?;
        let root = self.read_block()?;
        debug!(
            root = %root.opening_tag,
            blocks = root.count(),
            depth = root.depth(),
            "built block tree"
        );
        Ok(root)
    }

    /// Read one block and, recursively, its children
    pub fn read_block(&mut self) -> Result<Block> {
        self.read_nested(1)
    }

    fn read_nested(&mut self, depth: usize) -> Result<Block> {
        if depth > self.max_depth {
            return Err(self
                .tokenizer
                .syntax_error(format!("elements nested deeper than {} levels", self.max_depth)));
        }
        let tag = loop {
            match self.tokenizer.read_opening_tag()? {
                OpeningTag::Prolog => continue,
                OpeningTag::SelfClosing(tag) => return Ok(Block::new(tag)),
                OpeningTag::Open(tag) => break tag,
            }
        };
        let mut block = Block::new(tag);

        let scanner = self.tokenizer.scanner();
        scanner.skip_whitespace()?;
        if scanner.peek_char()? != '<' {
            // <tag> value </tag>
            block.value = scanner.read_until(Delimiters::of('<'))?;
        } else {
            while self.tokenizer.scanner().peek_chars(2)? != "</" {
                let child = self.read_nested(depth + 1)?;
                block.children.push(child);
                self.tokenizer.scanner().skip_whitespace()?;
            }
        }

        let closing = self.tokenizer.read_closing_tag()?;
        if !block.opening_tag.same_name(&closing) {
            return Err(RdfXmlError::TagMismatch {
                opening: block.opening_tag.qualified_name(),
                closing: closing.qualified_name(),
            });
        }
        Ok(block)
    }

    /// Current position in characters
    pub fn position(&self) -> usize {
        self.tokenizer.position()
    }
}
