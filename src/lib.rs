//! rdfloader - RDF/XML to triples
//!
//! Stages:
//! 1. Scanner: buffered code point cursor over any `BufRead`
//! 2. Tokenizer: qualified names, tags, attributes, prologs
//! 3. Tree builder: nested blocks with balanced tag checking
//! 4. Namespaces: flat prefix table from the root element
//! 5. Extraction: parallel walk emitting deduplicated triples
//!
//! # Example
//!
//! ```
//! use rdfloader::{Node, Parser};
//!
//! let doc = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#" xmlns:ex="http://ex.org/">
//!   <ex:Thing rdf:about="http://ex.org/1"><ex:name>Bob</ex:name></ex:Thing>
//! </rdf:RDF>"#;
//!
//! let triples = Parser::new().parse_reader(doc.as_bytes()).unwrap();
//! assert_eq!(triples.len(), 2);
//! assert!(triples.iter().any(|t| t.object == Node::literal("Bob")));
//! ```

pub mod core;
pub mod dom;
pub mod error;
pub mod iri;
pub mod options;
pub mod rdf;

pub use dom::{Block, XmlReader};
pub use error::{RdfXmlError, Result};
pub use iri::Iri;
pub use options::ParseOptions;
pub use rdf::{Node, Parser, Triple, TripleSet};

use std::path::Path;

/// Parse the RDF/XML file at `path` with default options
pub fn parse_file(path: impl AsRef<Path>) -> Result<TripleSet> {
    Parser::new().parse(path)
}
