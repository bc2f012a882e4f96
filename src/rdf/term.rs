//! RDF terms and triples

use std::fmt;

/// A triple position: resource, blank node or literal
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Node {
    /// Resource identified by an IRI
    Iri(String),
    /// Document-local node, named by `rdf:nodeID` or minted
    Blank(String),
    /// Plain text value
    Literal(String),
}

impl Node {
    pub fn iri(id: impl Into<String>) -> Self {
        Node::Iri(id.into())
    }

    pub fn blank(id: impl Into<String>) -> Self {
        Node::Blank(id.into())
    }

    pub fn literal(value: impl Into<String>) -> Self {
        Node::Literal(value.into())
    }

    /// The IRI, blank label or literal text
    pub fn value(&self) -> &str {
        match self {
            Node::Iri(s) | Node::Blank(s) | Node::Literal(s) => s,
        }
    }

    pub fn is_iri(&self) -> bool {
        matches!(self, Node::Iri(_))
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Node::Blank(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Node::Literal(_))
    }
}

/// N-Triples style: `<iri>`, `_:label`, `"text"`
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Iri(iri) => write!(f, "<{iri}>"),
            Node::Blank(label) => write!(f, "_:{label}"),
            Node::Literal(text) => {
                f.write_str("\"")?;
                for c in text.chars() {
                    match c {
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        '\n' => f.write_str("\\n")?,
                        '\r' => f.write_str("\\r")?,
                        '\t' => f.write_str("\\t")?,
                        c => write!(f, "{c}")?,
                    }
                }
                f.write_str("\"")
            }
        }
    }
}

/// A subject-predicate-object statement
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Triple {
    pub subject: Node,
    pub predicate: Node,
    pub object: Node,
}

impl Triple {
    pub fn new(subject: Node, predicate: Node, object: Node) -> Self {
        Triple {
            subject,
            predicate,
            object,
        }
    }

    /// Canonical `{subject; predicate; object}` form, unique per triple
    pub fn key(&self) -> String {
        self.to_string()
    }

    /// One N-Triples style line, without the trailing newline
    pub fn to_ntriples(&self) -> String {
        format!("{} {} {} .", self.subject, self.predicate, self.object)
    }
}

impl fmt::Display for Triple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{{}; {}; {}}}", self.subject, self.predicate, self.object)
    }
}
