use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser as ClapParser;
use rdfloader::{ParseOptions, Parser};
use tracing::{info, Level};

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Debug, ClapParser)]
#[command(name = "rdfxml2nt")]
#[command(about = "Convert an RDF/XML document to N-Triples style lines")]
struct Cli {
    /// RDF/XML document to read
    input: PathBuf,
    /// Number of extraction threads; defaults to one per core
    #[clap(long, short)]
    threads: Option<usize>,
    /// Print only the number of triples
    #[clap(long, action)]
    count: bool,
    /// Verbose mode - log at info level, defaults to warning level
    #[clap(long, short, action)]
    verbose: bool,
    /// Debug mode - log at debug level
    #[clap(long, action)]
    debug: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.debug {
        Level::DEBUG
    } else if cli.verbose {
        Level::INFO
    } else {
        Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    let mut options = ParseOptions::new();
    if let Some(threads) = cli.threads {
        options = options.threads(threads);
    }
    let parser = Parser::with_options(options)?;
    let triples = parser
        .parse(&cli.input)
        .with_context(|| format!("failed to parse {}", cli.input.display()))?;
    info!(triples = triples.len(), input = %cli.input.display(), "parsed document");

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    if cli.count {
        writeln!(out, "{}", triples.len())?;
    } else {
        for triple in triples.sorted() {
            writeln!(out, "{}", triple.to_ntriples())?;
        }
    }
    out.flush()?;
    Ok(())
}
