//! Block tree representation
//!
//! A block pairs an opening tag with either text content or child blocks.
//! Children are owned by their parent; the extractor only walks downwards.

use crate::core::{Attribute, Tag};

/// An element with its content
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    pub opening_tag: Tag,
    /// Text content, empty when the block has children
    pub value: String,
    pub children: Vec<Block>,
}

impl Block {
    /// Create an empty block for a tag
    pub fn new(opening_tag: Tag) -> Self {
        Block {
            opening_tag,
            value: String::new(),
            children: Vec::new(),
        }
    }

    /// True if the block has no child blocks
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Attributes of the opening tag
    pub fn attrs(&self) -> &[Attribute] {
        &self.opening_tag.attrs
    }

    /// Number of blocks in this subtree, including this one
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Block::count).sum::<usize>()
    }

    /// Depth of the deepest block below this one (a leaf has depth 1)
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(Block::depth).max().unwrap_or(0)
    }
}
