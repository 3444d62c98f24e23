// model = "claude-opus-4-5"
// created = "2026-10-18"
// modified = "2026-10-18"
// driver = "Isaac Clayton"

use std::io::Read;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use treesort::{Index, Order};

/// Tree-sort whitespace-separated integers read from stdin.
#[derive(Parser, Debug)]
#[command(name = "treesort", version)]
struct Args {
    /// Print largest first.
    #[arg(long)]
    descending: bool,

    /// Print the balanced index instead of the sorted values.
    #[arg(long)]
    tree: bool,
}

fn parse(input: &str) -> anyhow::Result<Vec<i64>> {
    return input
        .split_whitespace()
        .map(|token| token.parse::<i64>().with_context(|| format!("not an integer: {token:?}")))
        .collect();
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut input = String::new();
    std::io::stdin().read_to_string(&mut input).context("failed to read stdin")?;
    let values = parse(&input)?;
    tracing::debug!(count = values.len(), "read values");

    let index: Index<i64> = values.into_iter().collect();
    tracing::debug!(distinct = index.distinct(), height = index.height(), "built index");

    if args.tree {
        print!("{}", index);
        return Ok(());
    }

    let order = Order::from(!args.descending);
    let line: Vec<String> = index.flatten(order).map(|value| value.to_string()).collect();
    println!("{}", line.join(" "));
    return Ok(());
}
