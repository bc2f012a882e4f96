//! Namespace Resolution
//!
//! Flat prefix table read from the root element's `xmlns` declarations.
//! Built once before extraction and shared read-only by every worker.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::core::{Attribute, Tag};
use crate::dom::Block;
use crate::error::{RdfXmlError, Result};
use crate::iri::Iri;

/// Well-known namespace URIs
pub mod ns {
    pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
}

/// Prefix used by namespace declarations
const XMLNS: &str = "xmlns";

/// Prefix -> base IRI table
#[derive(Debug, Clone)]
pub struct Namespaces {
    bindings: HashMap<String, Iri>,
    rdf: Iri,
}

impl Default for Namespaces {
    fn default() -> Self {
        Self::new()
    }
}

impl Namespaces {
    /// Table with only the unbound default namespace
    pub fn new() -> Self {
        let mut bindings = HashMap::new();
        bindings.insert(String::new(), Iri::default());
        Namespaces {
            bindings,
            rdf: Iri::from_static(ns::RDF),
        }
    }

    /// Collect `xmlns:prefix="uri"` and `xmlns="uri"` from the root block
    pub fn from_root(root: &Block) -> Result<Self> {
        let mut namespaces = Namespaces::new();
        for attr in root.attrs() {
            if attr.schema_name == XMLNS {
                namespaces.declare(attr.name.clone(), Iri::parse(&attr.value)?);
            } else if attr.schema_name.is_empty() && attr.name == XMLNS {
                namespaces.declare(String::new(), Iri::parse(&attr.value)?);
            }
        }
        debug!(prefixes = namespaces.len(), "parsed namespace declarations");
        Ok(namespaces)
    }

    /// Bind a prefix, replacing any earlier binding
    pub fn declare(&mut self, prefix: impl Into<String>, iri: Iri) {
        self.bindings.insert(prefix.into(), iri);
    }

    /// Base IRI bound to a prefix
    pub fn get(&self, prefix: &str) -> Option<&Iri> {
        self.bindings.get(prefix)
    }

    /// Number of bound prefixes, the default namespace included
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Expand `prefix:local` against the table
    pub fn resolve(&self, prefix: &str, local: &str) -> Result<Iri> {
        let base = self
            .bindings
            .get(prefix)
            .ok_or_else(|| RdfXmlError::UndefinedSchema(prefix.to_string()))?;
        Ok(base.with_fragment(local))
    }

    /// Expand a tag's own name
    pub fn resolve_tag(&self, tag: &Tag) -> Result<Iri> {
        self.resolve(&tag.schema_name, &tag.name)
    }

    /// A term of the RDF vocabulary
    pub fn rdf(&self, local: &str) -> Iri {
        self.rdf.with_fragment(local)
    }

    /// Index of the first attribute of `tag` that resolves to `rdf:<local>`.
    ///
    /// The search stops at the first attribute with an undeclared prefix;
    /// attributes after it are not considered.
    pub fn rdf_attribute_index(&self, tag: &Tag, local: &str) -> Option<usize> {
        let target = self.rdf(local);
        for (i, attr) in tag.attrs.iter().enumerate() {
            match self.resolve(&attr.schema_name, &attr.name) {
                Ok(resolved) if resolved == target => return Some(i),
                Ok(_) => {}
                Err(_) => {
                    trace!(attr = %attr, "undeclared attribute prefix, stopping lookup");
                    return None;
                }
            }
        }
        None
    }

    /// The attribute found by [`Namespaces::rdf_attribute_index`]
    pub fn rdf_attribute<'t>(&self, tag: &'t Tag, local: &str) -> Option<&'t Attribute> {
        self.rdf_attribute_index(tag, local).map(|i| &tag.attrs[i])
    }
}
