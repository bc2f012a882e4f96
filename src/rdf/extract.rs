//! Parallel Triple Extraction
//!
//! Every RDF node below the root is processed as its own unit on a rayon
//! pool. All units of one document run inside a single `rayon::scope`,
//! which returns only when every unit, including the ones spawned by other
//! units, has finished.

use std::io::BufRead;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use rayon::{Scope, ThreadPool, ThreadPoolBuilder};
use tracing::{debug, trace, warn};

use super::blank::BlankNodes;
use super::namespace::Namespaces;
use super::term::{Node, Triple};
use super::triples::TripleSet;
use crate::core::Tag;
use crate::dom::{Block, XmlReader};
use crate::error::{RdfXmlError, Result};
use crate::options::ParseOptions;

/// RDF/XML document parser
pub struct Parser {
    options: ParseOptions,
    pool: Option<ThreadPool>,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    /// Parser running on rayon's global pool
    pub fn new() -> Self {
        Parser {
            options: ParseOptions::default(),
            pool: None,
        }
    }

    /// Parser with explicit options. Builds the dedicated pool if one was
    /// requested.
    pub fn with_options(options: ParseOptions) -> Result<Self> {
        let pool = match options.threads {
            Some(threads) => Some(
                ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .thread_name(|i| format!("rdfxml-extract-{i}"))
                    .build()?,
            ),
            None => None,
        };
        Ok(Parser { options, pool })
    }

    pub fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Parse the document at `path`. The file is closed before extraction
    /// starts.
    pub fn parse(&self, path: impl AsRef<Path>) -> Result<TripleSet> {
        let root = XmlReader::from_path(path)?
            .with_max_depth(self.options.max_depth)
            .read()?;
        self.extract(&root)
    }

    /// Parse a document from an open source. Pass `&mut source` to keep
    /// ownership of it.
    pub fn parse_reader<R: BufRead>(&self, reader: R) -> Result<TripleSet> {
        let root = XmlReader::from_reader(reader)
            .with_max_depth(self.options.max_depth)
            .read()?;
        self.extract(&root)
    }

    /// Extract triples from an already built tree
    pub fn extract(&self, root: &Block) -> Result<TripleSet> {
        let namespaces = Namespaces::from_root(root)?;
        let extraction = Extraction::new(&namespaces, &self.options.blank_node_prefix);
        debug!(
            subjects = root.children.len(),
            dedicated_pool = self.pool.is_some(),
            "starting extraction"
        );

        let run = || {
            rayon::scope(|scope| {
                for child in &root.children {
                    let node = extraction.node_from_tag(&child.opening_tag);
                    extraction.spawn(scope, child, node);
                }
            })
        };
        match &self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        }

        let blank_nodes = extraction.blank_nodes.minted();
        let triples = extraction.finish()?;
        debug!(triples = triples.len(), blank_nodes, "extraction finished");
        Ok(triples)
    }
}

/// Shared state of one document's extraction
struct Extraction<'a> {
    namespaces: &'a Namespaces,
    blank_nodes: BlankNodes,
    rdf_type: Node,
    triples: Mutex<TripleSet>,
    first_error: Mutex<Option<RdfXmlError>>,
    cancelled: AtomicBool,
}

impl<'a> Extraction<'a> {
    fn new(namespaces: &'a Namespaces, blank_node_prefix: &str) -> Self {
        Extraction {
            namespaces,
            blank_nodes: BlankNodes::new(blank_node_prefix),
            rdf_type: Node::Iri(namespaces.rdf("type").into_string()),
            triples: Mutex::new(TripleSet::new()),
            first_error: Mutex::new(None),
            cancelled: AtomicBool::new(false),
        }
    }

    /// `rdf:about` gives an IRI, `rdf:nodeID` a shared blank node, anything
    /// else a fresh blank node
    fn node_from_tag(&self, tag: &Tag) -> Node {
        if let Some(about) = self.namespaces.rdf_attribute(tag, "about") {
            return Node::Iri(about.value.clone());
        }
        match self.namespaces.rdf_attribute(tag, "nodeID") {
            Some(node_id) => self.blank_nodes.named(&node_id.value),
            None => self.blank_nodes.fresh(),
        }
    }

    fn insert(&self, triple: Triple) {
        self.triples
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(triple);
    }

    fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// Record an error; only the first one is kept. Units that have not
    /// started yet are skipped from now on.
    fn fail(&self, err: RdfXmlError) {
        let mut slot = self.first_error.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_none() {
            warn!(error = %err, "extraction failed, cancelling remaining work");
            *slot = Some(err);
        }
        self.cancelled.store(true, Ordering::Release);
    }

    /// Queue `block` for processing as the subject `node`
    fn spawn<'s>(&'s self, scope: &Scope<'s>, block: &'s Block, node: Node) {
        if self.is_cancelled() {
            return;
        }
        trace!(subject = %node, tag = %block.opening_tag, "spawning unit");
        scope.spawn(move |scope| {
            if self.is_cancelled() {
                return;
            }
            if let Err(err) = self.process(scope, block, &node) {
                self.fail(err);
            }
        });
    }

    /// Emit the triples of one subject block and spawn its object blocks
    fn process<'s>(&'s self, scope: &Scope<'s>, block: &'s Block, node: &Node) -> Result<()> {
        if block.is_leaf() {
            return Ok(());
        }
        let type_node = Node::Iri(self.namespaces.resolve_tag(&block.opening_tag)?.into_string());

        for predicate_block in &block.children {
            if self.is_cancelled() {
                return Ok(());
            }
            self.insert(Triple::new(node.clone(), self.rdf_type.clone(), type_node.clone()));

            let predicate = self.node_from_tag(&predicate_block.opening_tag);
            if predicate_block.is_leaf() {
                let object = match self
                    .namespaces
                    .rdf_attribute(&predicate_block.opening_tag, "resource")
                {
                    Some(resource) => resource.value.clone(),
                    None => predicate_block.value.clone(),
                };
                self.insert(Triple::new(node.clone(), predicate, Node::Literal(object)));
                continue;
            }

            for object_block in &predicate_block.children {
                let object = self.node_from_tag(&object_block.opening_tag);
                self.insert(Triple::new(node.clone(), predicate.clone(), object.clone()));
                self.spawn(scope, object_block, object);
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<TripleSet> {
        if let Some(err) = self
            .first_error
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
        {
            return Err(err);
        }
        Ok(self
            .triples
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rdf::namespace::ns;

    const EX_DOC: &str = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#" xmlns:ex="http://ex.org/"><ex:Thing rdf:about="http://ex.org/1"><ex:name>Bob</ex:name></ex:Thing></rdf:RDF>"#;

    fn parse(input: &str) -> Result<TripleSet> {
        Parser::new().parse_reader(input.as_bytes())
    }

    fn rdf_type() -> Node {
        Node::iri(format!("{}type", ns::RDF))
    }

    #[test]
    fn test_single_subject_document() {
        let triples = parse(EX_DOC).unwrap();
        assert_eq!(triples.len(), 2);
        assert!(triples.contains(&Triple::new(
            Node::iri("http://ex.org/1"),
            rdf_type(),
            Node::iri("http://ex.org/Thing"),
        )));

        let name = triples
            .iter()
            .find(|t| t.object == Node::literal("Bob"))
            .expect("name triple");
        assert_eq!(name.subject, Node::iri("http://ex.org/1"));
        // predicate identity comes from the predicate element's own about/nodeID
        assert!(name.predicate.is_blank());
    }

    #[test]
    fn test_type_triple_deduplicated() {
        let doc = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#" xmlns:ex="http://ex.org/">
            <ex:Thing rdf:about="http://ex.org/1">
                <ex:name rdf:about="http://ex.org/name">Bob</ex:name>
                <ex:age rdf:about="http://ex.org/age">42</ex:age>
            </ex:Thing>
        </rdf:RDF>"#;
        let triples = parse(doc).unwrap();
        let type_triples = triples.iter().filter(|t| t.predicate == rdf_type()).count();
        assert_eq!(type_triples, 1);
        assert_eq!(triples.len(), 3);
        assert!(triples.contains(&Triple::new(
            Node::iri("http://ex.org/1"),
            Node::iri("http://ex.org/age"),
            Node::literal("42"),
        )));
    }

    #[test]
    fn test_resource_attribute_becomes_literal_object() {
        let doc = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#" xmlns:ex="http://ex.org/">
            <ex:Thing rdf:about="http://ex.org/1">
                <ex:link rdf:about="http://ex.org/link" rdf:resource="http://ex.org/2"/>
            </ex:Thing>
        </rdf:RDF>"#;
        let triples = parse(doc).unwrap();
        assert!(triples.contains(&Triple::new(
            Node::iri("http://ex.org/1"),
            Node::iri("http://ex.org/link"),
            Node::literal("http://ex.org/2"),
        )));
    }

    #[test]
    fn test_nested_objects_are_processed() {
        let doc = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#" xmlns:ex="http://ex.org/">
            <ex:Person rdf:about="http://ex.org/alice">
                <ex:knows rdf:about="http://ex.org/knows">
                    <ex:Person rdf:about="http://ex.org/bob">
                        <ex:name rdf:about="http://ex.org/name">Bob</ex:name>
                    </ex:Person>
                </ex:knows>
            </ex:Person>
        </rdf:RDF>"#;
        let triples = parse(doc).unwrap();
        let alice = Node::iri("http://ex.org/alice");
        let bob = Node::iri("http://ex.org/bob");
        assert!(triples.contains(&Triple::new(alice.clone(), Node::iri("http://ex.org/knows"), bob.clone())));
        assert!(triples.contains(&Triple::new(bob.clone(), rdf_type(), Node::iri("http://ex.org/Person"))));
        assert!(triples.contains(&Triple::new(bob, Node::iri("http://ex.org/name"), Node::literal("Bob"))));
        assert!(triples.contains(&Triple::new(alice, rdf_type(), Node::iri("http://ex.org/Person"))));
        assert_eq!(triples.len(), 4);
    }

    #[test]
    fn test_node_ids_share_identity() {
        let doc = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#" xmlns:ex="http://ex.org/">
            <ex:Thing rdf:nodeID="n1">
                <ex:name rdf:about="http://ex.org/name">first</ex:name>
            </ex:Thing>
            <ex:Other rdf:nodeID="n1">
                <ex:name rdf:about="http://ex.org/name">second</ex:name>
            </ex:Other>
            <ex:Thing>
                <ex:name rdf:about="http://ex.org/name">third</ex:name>
            </ex:Thing>
            <ex:Thing>
                <ex:name rdf:about="http://ex.org/name">fourth</ex:name>
            </ex:Thing>
        </rdf:RDF>"#;
        let triples = parse(doc).unwrap();
        let subject_of = |value: &str| {
            triples
                .iter()
                .find(|t| t.object == Node::literal(value))
                .map(|t| t.subject.clone())
                .expect("literal triple")
        };
        let first = subject_of("first");
        assert!(first.is_blank());
        assert_eq!(first, subject_of("second"));
        assert_ne!(subject_of("third"), subject_of("fourth"));
        assert_ne!(subject_of("third"), first);
    }

    #[test]
    fn test_undefined_prefix_in_nested_unit_fails_parse() {
        let doc = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#" xmlns:ex="http://ex.org/">
            <ex:Person rdf:about="http://ex.org/alice">
                <ex:knows>
                    <zz:Person rdf:about="http://ex.org/bob">
                        <ex:name>Bob</ex:name>
                    </zz:Person>
                </ex:knows>
            </ex:Person>
        </rdf:RDF>"#;
        assert!(matches!(
            parse(doc),
            Err(RdfXmlError::UndefinedSchema(prefix)) if prefix == "zz"
        ));
    }

    #[test]
    fn test_first_error_wins_across_subjects() {
        let mut doc = String::from(
            r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#" xmlns:ex="http://ex.org/">"#,
        );
        for i in 0..50 {
            doc.push_str(&format!(
                "<bad{i}:Thing><ex:name>x</ex:name></bad{i}:Thing><ex:Thing><ex:name>{i}</ex:name></ex:Thing>"
            ));
        }
        doc.push_str("</rdf:RDF>");
        assert!(matches!(parse(&doc), Err(RdfXmlError::UndefinedSchema(_))));
    }

    #[test]
    fn test_childless_subjects_emit_nothing() {
        let doc = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"><zz:Thing/><zz:Other>text</zz:Other></rdf:RDF>"#;
        assert!(parse(doc).unwrap().is_empty());
    }

    #[test]
    fn test_dedicated_pool() {
        let parser = Parser::with_options(ParseOptions::new().threads(2).blank_node_prefix("b")).unwrap();
        let triples = parser.parse_reader(EX_DOC.as_bytes()).unwrap();
        assert_eq!(triples.len(), 2);
        let name = triples.iter().find(|t| t.object == Node::literal("Bob")).unwrap();
        assert!(name.predicate.value().starts_with('b'));
    }

    #[test]
    fn test_depth_limit_from_options() {
        let shallow = Parser::with_options(ParseOptions::new().max_depth(2)).unwrap();
        assert!(matches!(
            shallow.parse_reader(EX_DOC.as_bytes()),
            Err(RdfXmlError::Syntax { .. })
        ));
        let exact = Parser::with_options(ParseOptions::new().max_depth(3)).unwrap();
        assert_eq!(exact.parse_reader(EX_DOC.as_bytes()).unwrap().len(), 2);
    }

    #[test]
    fn test_malformed_document_fails() {
        assert!(matches!(
            parse("<rdf:RDF><ex:a></ex:b></rdf:RDF>"),
            Err(RdfXmlError::TagMismatch { .. })
        ));
        assert!(matches!(
            parse(r#"<rdf:RDF xmlns:ex="not-a-uri"></rdf:RDF>"#),
            Err(RdfXmlError::InvalidIri { .. })
        ));
    }

    #[test]
    fn test_extract_prebuilt_tree() {
        let root = XmlReader::from_reader(EX_DOC.as_bytes()).read().unwrap();
        let triples = Parser::default().extract(&root).unwrap();
        assert_eq!(triples.len(), 2);
    }

    #[test]
    fn test_undeclared_attribute_hides_later_about() {
        let doc = r#"<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#" xmlns:ex="http://ex.org/"><ex:Thing xml:lang="en" rdf:about="http://ex.org/1"><ex:name>Bob</ex:name></ex:Thing></rdf:RDF>"#;
        let triples = parse(doc).unwrap();
        let name = triples.iter().find(|t| t.object == Node::literal("Bob")).unwrap();
        assert!(name.subject.is_blank());
        assert!(!triples.iter().any(|t| t.subject == Node::iri("http://ex.org/1")));
    }

    #[test]
    fn test_no_units_start_after_failure() {
        let root = XmlReader::from_reader(EX_DOC.as_bytes()).read().unwrap();
        let namespaces = Namespaces::from_root(&root).unwrap();
        let extraction = Extraction::new(&namespaces, "N");

        extraction.fail(RdfXmlError::UndefinedSchema("first".to_string()));
        extraction.fail(RdfXmlError::UndefinedSchema("second".to_string()));
        rayon::scope(|scope| {
            for child in &root.children {
                let node = extraction.node_from_tag(&child.opening_tag);
                extraction.spawn(scope, child, node);
            }
        });

        assert!(extraction.triples.lock().unwrap().is_empty());
        assert!(matches!(
            extraction.finish(),
            Err(RdfXmlError::UndefinedSchema(prefix)) if prefix == "first"
        ));
    }

    #[test]
    fn test_running_unit_stops_between_predicates() {
        let root = XmlReader::from_reader(EX_DOC.as_bytes()).read().unwrap();
        let namespaces = Namespaces::from_root(&root).unwrap();
        let extraction = Extraction::new(&namespaces, "N");
        let subject = Node::iri("http://ex.org/1");

        extraction.fail(RdfXmlError::UndefinedSchema("zz".to_string()));
        let outcome = rayon::scope(|scope| extraction.process(scope, &root.children[0], &subject));

        assert!(outcome.is_ok());
        assert!(extraction.triples.lock().unwrap().is_empty());
        assert!(extraction.finish().is_err());
    }
}
