//! nodeactions - batch copy/move of content repository nodes.
//!
//! Usage:
//!   nodeactions --repo repo.json tree                     Show the repository
//!   nodeactions --repo repo.json copy --to ID IDS...      Copy nodes into a folder
//!   nodeactions --repo repo.json move --to ID IDS...      Move nodes into a folder
//!   nodeactions --help                                    Show help

use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result, bail};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use nodeactions_core::{ActionConfig, ContentAction, NodeEntry, NodeId};
use nodeactions_ops::{
    ActionEvents, AllowableOperations, BatchReport, FixedDestination, InMemoryContentApi,
    NodeActions, Outcome, RepositorySnapshot,
};

#[derive(Parser)]
#[command(
    name = "nodeactions",
    version,
    about = "Batch copy and move of content repository nodes",
    long_about = "nodeactions copies or moves nodes of a repository snapshot into a folder, \
                  merging folders and renaming files that clash with existing names."
)]
struct Cli {
    /// Repository snapshot (JSON)
    #[arg(short, long)]
    repo: PathBuf,

    /// Action configuration (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the repository as a tree
    Tree {
        /// Node to start from (defaults to every root)
        #[arg(long)]
        from: Option<String>,
    },

    /// Copy nodes into a folder
    Copy {
        #[command(flatten)]
        batch: BatchArgs,
    },

    /// Move nodes into a folder
    Move {
        #[command(flatten)]
        batch: BatchArgs,

        /// Permission required on every moved node
        #[arg(short, long, default_value = "delete")]
        permission: String,
    },
}

#[derive(clap::Args)]
struct BatchArgs {
    /// Ids of the nodes to act on
    #[arg(required = true)]
    ids: Vec<String>,

    /// Destination folder id
    #[arg(short, long)]
    to: String,

    /// Write the updated repository back to the snapshot file
    #[arg(short, long)]
    write: bool,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    setup_tracing(cli.verbose);

    let snapshot = RepositorySnapshot::load(&cli.repo).context("Failed to load repository")?;
    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ActionConfig::default(),
    };
    debug!(?config, nodes = snapshot.nodes.len(), "Loaded repository");

    match cli.command {
        Command::Tree { from } => {
            print_tree(&snapshot, from.map(NodeId::from).as_ref())?;
        }
        Command::Copy { batch } => {
            run_batch(&cli.repo, snapshot, config, ContentAction::Copy, batch, None).await?;
        }
        Command::Move { batch, permission } => {
            run_batch(
                &cli.repo,
                snapshot,
                config,
                ContentAction::Move,
                batch,
                Some(&permission),
            )
            .await?;
        }
    }

    Ok(())
}

fn setup_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with_writer(io::stderr)
        .init();
}

fn load_config(path: &Path) -> Result<ActionConfig> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    serde_json::from_str(&data).with_context(|| format!("Invalid config {}", path.display()))
}

/// Run a copy or move batch against the snapshot.
async fn run_batch(
    repo_path: &Path,
    snapshot: RepositorySnapshot,
    config: ActionConfig,
    action: ContentAction,
    args: BatchArgs,
    permission: Option<&str>,
) -> Result<()> {
    let entries = args
        .ids
        .iter()
        .map(|id| {
            snapshot
                .nodes
                .iter()
                .find(|node| node.id.as_str() == id)
                .cloned()
                .ok_or_else(|| color_eyre::eyre::eyre!("Unknown node id: {id}"))
        })
        .collect::<Result<Vec<NodeEntry>>>()?;

    let api = Arc::new(InMemoryContentApi::from_snapshot(snapshot));
    let actions = NodeActions::new(
        api.clone(),
        Arc::new(AllowableOperations),
        Arc::new(FixedDestination::new(args.to.as_str())),
        ActionEvents::default(),
    )
    .with_config(config);

    let batch = actions
        .execute(action, &entries, permission)
        .await
        .with_context(|| format!("{action} failed"))?;

    match args.format {
        OutputFormat::Text => print_report(&batch, &actions.deleted_entries().await),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&batch.outcomes)?);
        }
    }

    if args.write {
        api.snapshot()
            .await
            .save(repo_path)
            .context("Failed to write repository")?;
        eprintln!("Wrote {}", repo_path.display());
    }

    Ok(())
}

fn print_report(batch: &BatchReport, deleted: &[NodeEntry]) {
    println!("{}", batch.status);
    println!("{}", "─".repeat(60));

    for outcome in &batch.outcomes {
        print_outcome(outcome, 0);
    }

    println!("{}", "─".repeat(60));
    println!(" {}", batch.report.summary());
    if !deleted.is_empty() {
        let names: Vec<&str> = deleted.iter().map(|e| e.name.as_str()).collect();
        println!(" Removed merged source folders: {}", names.join(", "));
    }
}

fn print_outcome(outcome: &Outcome, depth: usize) {
    let indent = "  ".repeat(depth);
    match outcome {
        Outcome::Success(result) => {
            println!("{indent}✓ {} ({})", result.entry.name, result.entry.id);
        }
        Outcome::Failed(err) => {
            println!("{indent}✗ {err}");
        }
        Outcome::Aggregate(children) => {
            println!("{indent}⇢ merged into existing folder");
            for child in children {
                print_outcome(child, depth + 1);
            }
        }
    }
}

/// Print the snapshot as an indented tree.
fn print_tree(snapshot: &RepositorySnapshot, from: Option<&NodeId>) -> Result<()> {
    let roots: Vec<&NodeEntry> = match from {
        Some(id) => match snapshot.nodes.iter().find(|node| &node.id == id) {
            Some(node) => vec![node],
            None => bail!("Unknown node id: {id}"),
        },
        None => snapshot
            .nodes
            .iter()
            .filter(|node| {
                node.parent_id
                    .as_ref()
                    .is_none_or(|parent| !snapshot.nodes.iter().any(|n| &n.id == parent))
            })
            .collect(),
    };

    let mut printed = HashSet::new();
    for root in roots {
        print_node(snapshot, root, 0, &mut printed);
    }
    Ok(())
}

fn print_node<'a>(
    snapshot: &'a RepositorySnapshot,
    node: &'a NodeEntry,
    depth: usize,
    printed: &mut HashSet<&'a NodeId>,
) {
    if !printed.insert(&node.id) {
        return;
    }
    let suffix = if node.is_folder { "/" } else { "" };
    println!("{}{}{} [{}]", "  ".repeat(depth), node.name, suffix, node.id);

    for child in snapshot
        .nodes
        .iter()
        .filter(|child| child.parent_id.as_ref() == Some(&node.id))
    {
        print_node(snapshot, child, depth + 1, printed);
    }
}
