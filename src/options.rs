//! Parser configuration

/// Label prefix for minted blank nodes
pub const DEFAULT_BLANK_NODE_PREFIX: &str = "N";

/// Deepest element nesting the tree builder accepts
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Options for [`crate::Parser`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Size of a dedicated extraction pool; None runs on rayon's global pool
    pub threads: Option<usize>,
    /// Prefix of generated blank node labels
    pub blank_node_prefix: String,
    /// Nesting limit for the tree builder; deeper documents are rejected
    pub max_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions {
            threads: None,
            blank_node_prefix: DEFAULT_BLANK_NODE_PREFIX.to_string(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run extraction on a dedicated pool of `threads` workers
    pub fn threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Use `prefix` for generated blank node labels
    pub fn blank_node_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.blank_node_prefix = prefix.into();
        self
    }

    /// Reject documents nested deeper than `depth` elements
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let options = ParseOptions::new()
            .threads(2)
            .blank_node_prefix("b")
            .max_depth(8);
        assert_eq!(options.threads, Some(2));
        assert_eq!(options.blank_node_prefix, "b");
        assert_eq!(options.max_depth, 8);
        assert_eq!(ParseOptions::default().threads, None);
        assert_eq!(ParseOptions::default().max_depth, DEFAULT_MAX_DEPTH);
    }
}
