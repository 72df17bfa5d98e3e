use std::io::Write;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use get_iterator::environment::Features;
use get_iterator::literal;
use get_iterator::{Resolver, ResolverConfig, Value, Variant};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "get-iterator", about = "Resolve protocol iterators for literal values")]
struct Cli {
    /// Deployment variant (`standard` or `native`); defaults to $TEST_VARIANT.
    #[arg(long, global = true)]
    variant: Option<Variant>,

    /// Behave as if symbol-keyed iteration capabilities were unsupported.
    #[arg(long, global = true)]
    no_symbols: bool,

    /// Behave as if big integers were unsupported.
    #[arg(long, global = true)]
    no_bigint: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve an iterator for a literal and print every element it yields.
    Drain {
        /// Literal value, e.g. "[1, , 3]" or "Map([[1, 'a']])".
        literal: String,
        /// Stop after this many elements.
        #[arg(long, default_value_t = 10_000)]
        limit: usize,
    },
    /// Print how a literal would be iterated, without iterating it.
    Classify {
        /// Literal value.
        literal: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = build_config(&cli, ResolverConfig::from_env());
    let resolver = Resolver::new(config);

    let mut out = std::io::stdout().lock();
    match cli.command {
        Commands::Drain { literal, limit } => run_drain(&mut out, &resolver, &literal, limit)?,
        Commands::Classify { literal } => run_classify(&mut out, &resolver, &literal)?,
    }

    Ok(())
}

/// Command-line flags layered over the probed environment. Flags can only
/// switch features off; `--variant` replaces the probed variant.
fn build_config(cli: &Cli, probed: ResolverConfig) -> ResolverConfig {
    let mut config = probed;
    if let Some(variant) = cli.variant {
        config = config.with_variant(variant);
    }
    let detected = config.features;
    config.with_features(Features {
        iteration_capability: detected.iteration_capability && !cli.no_symbols,
        big_int: detected.big_int && !cli.no_bigint,
    })
}

fn parse_literal(resolver: &Resolver, text: &str) -> Result<Value> {
    literal::parse(text, resolver.features())
        .with_context(|| format!("failed to parse literal {text:?}"))
}

fn run_drain(out: &mut impl Write, resolver: &Resolver, text: &str, limit: usize) -> Result<()> {
    let value = parse_literal(resolver, text)?;
    let Some(iterator) = resolver
        .resolve(&value)
        .with_context(|| format!("iteration capability of {value} threw"))?
    else {
        writeln!(out, "{value} is not iterable")?;
        return Ok(());
    };

    let mut count = 0;
    for item in iterator.steps() {
        if count == limit {
            bail!("stopped after {limit} elements; raise --limit to see more");
        }
        let item = item.with_context(|| format!("iteration failed at index {count}"))?;
        writeln!(out, "{count}\t{item}")?;
        count += 1;
    }
    writeln!(out, "{count} values")?;

    Ok(())
}

fn run_classify(out: &mut impl Write, resolver: &Resolver, text: &str) -> Result<()> {
    let value = parse_literal(resolver, text)?;
    let shape = resolver.classify(&value);
    writeln!(out, "{value}\t{}", shape.name())?;
    Ok(())
}
