//! Core scanning primitives
//!
//! This module contains the building blocks below the tree builder:
//! - Scanner: buffered code point cursor with bitmask delimiter sets
//! - Encoding: byte order mark detection
//! - Tokenizer: qualified names, opening/closing tags and prologs
//! - Attributes: attribute grammar

pub mod attributes;
pub mod encoding;
pub mod scanner;
pub mod tokenizer;

pub use attributes::Attribute;
pub use scanner::{Delimiters, Scanner, WHITESPACE};
pub use tokenizer::{OpeningTag, QName, Tag, Tokenizer};
