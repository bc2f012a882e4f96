//! RDF Module - Triple extraction
//!
//! Turns a block tree into triples:
//! - Namespaces: prefix table from the root element
//! - BlankNodes: document-local blank node minting
//! - Parser: concurrent walk emitting into a shared TripleSet

pub mod blank;
pub mod extract;
pub mod namespace;
pub mod term;
pub mod triples;

pub use blank::BlankNodes;
pub use extract::Parser;
pub use namespace::{ns, Namespaces};
pub use term::{Node, Triple};
pub use triples::TripleSet;
