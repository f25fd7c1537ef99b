use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use env_logger::Env;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use overlay_search::config::load_description;
use overlay_search::report::{
    format_topology_summary, render_comparison, render_report, OutputFormat,
};
use overlay_search::search::{parse_ttl, Dispatcher, SearchParams, StrategyRegistry};
use overlay_search::shell::run_shell;
use overlay_search::topology::Topology;

/// Simulate resource discovery over a peer-to-peer overlay topology
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the network description JSON file
    #[arg(short, long)]
    input: PathBuf,

    /// Seed for the random walks (entropy when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Output format for search results
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate the topology and print a summary
    Check,

    /// Run a single search
    Search {
        /// Strategy name (flooding, informed_flooding, random_walk, informed_random_walk)
        #[arg(short, long)]
        algorithm: String,

        /// Start node id
        #[arg(short, long)]
        node: String,

        /// Resource id to look for
        #[arg(short, long)]
        resource: String,

        /// Hop budget; empty or omitted means unbounded
        #[arg(short, long)]
        ttl: Option<String>,
    },

    /// Run every strategy with the same request
    Compare {
        /// Start node id
        #[arg(short, long)]
        node: String,

        /// Resource id to look for
        #[arg(short, long)]
        resource: String,

        /// Hop budget; empty or omitted means unbounded
        #[arg(short, long)]
        ttl: Option<String>,
    },

    /// Prompt for searches interactively
    Shell,
}

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse command-line arguments
    let args = Args::parse();

    // Initialize logging, RUST_LOG takes precedence over --log-level
    env_logger::Builder::from_env(Env::default().default_filter_or(&args.log_level)).init();

    let description = load_description(&args.input).wrap_err_with(|| {
        format!("Failed to load network description '{}'", args.input.display())
    })?;
    let mut topology =
        Topology::from_description(&description).wrap_err("Failed to build topology")?;
    topology.check().wrap_err("Topology failed validation")?;
    info!("Topology loaded and validated");

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut dispatcher = Dispatcher::new(StrategyRegistry::standard(), rng);

    match args.command {
        Command::Check => {
            println!("{}", format_topology_summary(&topology));
        }
        Command::Search {
            algorithm,
            node,
            resource,
            ttl,
        } => {
            let mut params = vec![("node", node), ("resource", resource)];
            if let Some(ttl) = ttl {
                params.push(("ttl", ttl));
            }
            let report = dispatcher.execute(&mut topology, &algorithm, params)?;
            println!("{}", render_report(&report, args.format)?);
        }
        Command::Compare { node, resource, ttl } => {
            let params = SearchParams::new(node, resource, parse_ttl(ttl.as_deref())?);
            let reports = dispatcher.compare(&mut topology, &params)?;
            println!("{}", render_comparison(&reports, args.format)?);
        }
        Command::Shell => {
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            let completed = run_shell(
                &mut dispatcher,
                &mut topology,
                stdin.lock(),
                &mut stdout,
                args.format,
            )?;
            info!("Shell finished after {} searches", completed);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let args = Args::parse_from([
            "overlay-search",
            "--input", "network.json",
            "search",
            "--algorithm", "flooding",
            "--node", "n1",
            "--resource", "f",
            "--ttl", "2",
        ]);

        assert_eq!(args.input, PathBuf::from("network.json"));
        assert_eq!(args.format, OutputFormat::Text);
        assert_eq!(args.log_level, "warn");
        match args.command {
            Command::Search { algorithm, ttl, .. } => {
                assert_eq!(algorithm, "flooding");
                assert_eq!(ttl.as_deref(), Some("2"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_compare_args_without_ttl() {
        let args = Args::parse_from([
            "overlay-search",
            "-i", "network.json",
            "--seed", "9",
            "--format", "json",
            "compare",
            "-n", "n2",
            "-r", "f",
        ]);

        assert_eq!(args.seed, Some(9));
        assert_eq!(args.format, OutputFormat::Json);
        assert!(matches!(args.command, Command::Compare { ttl: None, .. }));
    }

    #[test]
    fn test_shell_and_check_commands() {
        let args = Args::parse_from(["overlay-search", "--input", "x.json", "shell"]);
        assert!(matches!(args.command, Command::Shell));

        let args = Args::parse_from(["overlay-search", "--input", "x.json", "check"]);
        assert!(matches!(args.command, Command::Check));
    }
}
