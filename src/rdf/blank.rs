//! Blank node minting
//!
//! One minter per document. Labels come from a single counter, so named
//! (`rdf:nodeID`) and anonymous blank nodes never share a label.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use super::term::Node;

#[derive(Debug, Default)]
struct State {
    next: u64,
    named: HashMap<String, Node>,
}

/// Thread-safe source of blank nodes
#[derive(Debug)]
pub struct BlankNodes {
    prefix: String,
    state: Mutex<State>,
}

impl Default for BlankNodes {
    fn default() -> Self {
        Self::new("N")
    }
}

impl BlankNodes {
    /// Create a minter whose labels start with `prefix`
    pub fn new(prefix: impl Into<String>) -> Self {
        BlankNodes {
            prefix: prefix.into(),
            state: Mutex::new(State::default()),
        }
    }

    fn mint(&self, state: &mut State) -> Node {
        let label = format!("{}{}", self.prefix, state.next);
        state.next += 1;
        Node::Blank(label)
    }

    /// A blank node no other call returns
    pub fn fresh(&self) -> Node {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        self.mint(&mut state)
    }

    /// The blank node for an `rdf:nodeID` value, minted on first use
    pub fn named(&self, id: &str) -> Node {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(node) = state.named.get(id) {
            return node.clone();
        }
        let node = self.mint(&mut state);
        state.named.insert(id.to_string(), node.clone());
        node
    }

    /// Number of blank nodes minted so far
    pub fn minted(&self) -> u64 {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .next
    }
}
