//! DOM Module - Block tree
//!
//! The tree builder turns the tag stream into nested blocks, each owning
//! its children.

pub mod block;
pub mod builder;

pub use block::Block;
pub use builder::XmlReader;
