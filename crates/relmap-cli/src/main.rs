//! Relmap CLI
//!
//! Command-line front end for the relationship-map pipeline:
//! - Validating a graph workbook + style workbook pair
//! - Building the renderer's graph document (download copy and/or store insert)
//! - Listing the fixed icon options for interactive legends
//! - Reading back stored documents

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::fs;
use std::path::{Path, PathBuf};

use relmap_graph::{LegendMode, RunContext, RunError};
use relmap_ingest::{load_workbook, Workbook, WorkbookRole};
use relmap_model::{IconChoices, IconOption};
use relmap_storage::{DocumentSink, JsonLinesStore, StoreConfig};

mod config;

use config::CliConfig;

#[derive(Parser)]
#[command(name = "relmap")]
#[command(
    author,
    version,
    about = "Relmap: relationship maps from graph and style workbooks"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// JSON config file (pipeline options, store path, project).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the schema and integrity checks and summarize the tables.
    Validate(RunArgs),

    /// Build the graph document.
    ///
    /// Writes pretty JSON to `--out` (stdout when absent) and, when a project
    /// is given, inserts the document into the store.
    Build {
        #[command(flatten)]
        run: RunArgs,
        /// Output file for the downloadable JSON copy.
        #[arg(short, long)]
        out: Option<PathBuf>,
        /// Project (application) name to store the document under.
        #[arg(long)]
        project: Option<String>,
        /// JSON-lines document store.
        #[arg(long)]
        store: Option<PathBuf>,
    },

    /// List the icon options available to interactive legends.
    Icons,

    /// Stored document commands.
    Store {
        #[command(subcommand)]
        command: StoreCommands,
    },
}

#[derive(Subcommand)]
enum StoreCommands {
    /// Print the newest stored document for a project.
    Latest {
        #[arg(long)]
        project: Option<String>,
        #[arg(long)]
        store: Option<PathBuf>,
    },
}

#[derive(Args)]
struct RunArgs {
    /// Graph workbook (sheets `Node`, `Connections`).
    #[arg(long)]
    graph: PathBuf,
    /// Style workbook (sheets `Nodes`, `Edge`, `Global`).
    #[arg(long)]
    style: PathBuf,
    /// Icon choices (`{"<SubType>": "<icon name>"}`); switches to interactive legend mode.
    #[arg(long)]
    icons: Option<PathBuf>,
    /// Require at most one target entity.
    #[arg(long, conflicts_with = "allow_multiple_targets")]
    single_target: bool,
    /// Allow several target entities.
    #[arg(long)]
    allow_multiple_targets: bool,
}

impl RunArgs {
    fn single_target(&self) -> Option<bool> {
        match (self.single_target, self.allow_multiple_targets) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = CliConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Validate(args) => cmd_validate(&config, &args),
        Commands::Build {
            run,
            out,
            project,
            store,
        } => cmd_build(&config, &run, out.as_ref(), project, store),
        Commands::Icons => cmd_icons(),
        Commands::Store { command } => match command {
            StoreCommands::Latest { project, store } => cmd_store_latest(&config, project, store),
        },
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn load_inputs(args: &RunArgs) -> Result<(Workbook, Workbook)> {
    let graph = load_workbook(&args.graph, WorkbookRole::Graph).map_err(run_failure)?;
    let style = load_workbook(&args.style, WorkbookRole::Style).map_err(run_failure)?;
    Ok((graph, style))
}

fn load_icon_choices(path: &Path) -> Result<IconChoices> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading icon choices {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing icon choices {}", path.display()))
}

fn run_context(config: &CliConfig, args: &RunArgs) -> Result<RunContext> {
    let legend = match &args.icons {
        Some(path) => LegendMode::Interactive(load_icon_choices(path)?),
        None => LegendMode::StyleTable,
    };
    Ok(RunContext::new(config.pipeline_with(args.single_target()), legend))
}

/// Typed pipeline failures keep their code in the message.
fn run_failure(err: impl Into<RunError>) -> anyhow::Error {
    let err = err.into();
    anyhow!("{} [{}]", err, err.code())
}

fn open_store(config: &CliConfig, store: Option<PathBuf>) -> Result<JsonLinesStore> {
    let path = store
        .or_else(|| config.store_path.clone())
        .ok_or_else(|| anyhow!("no document store given (use --store or `store_path` in the config)"))?;
    Ok(StoreConfig::new(path).open()?)
}

// ============================================================================
// Commands
// ============================================================================

fn cmd_validate(config: &CliConfig, args: &RunArgs) -> Result<()> {
    println!(
        "{} {} + {}",
        "Validating".green().bold(),
        args.graph.display(),
        args.style.display()
    );

    let ctx = run_context(config, args)?;
    let (graph, style) = load_inputs(args)?;
    let tables = relmap_graph::validate(&ctx, &graph, &style).map_err(run_failure)?;

    let mode = if ctx.legend.is_interactive() {
        "interactive"
    } else {
        "style table"
    };
    println!("  Legend: {}", mode.cyan());
    println!(
        "  Single target entity: {}",
        ctx.integrity_options().single_target_entity
    );
    println!("  Nodes: {}", tables.graph.nodes.len());
    println!("  Connections: {}", tables.graph.connections.len());
    println!("  Node styles: {}", tables.style.node_styles.len());
    println!("  Edge styles: {}", tables.style.edge_styles.len());
    for subtype in tables.graph.distinct_subtypes() {
        let count = tables
            .graph
            .nodes
            .iter()
            .filter(|n| n.subtype == subtype)
            .count();
        println!("    {} {}", subtype.yellow(), count);
    }

    println!("{}", "Valid.".green());
    Ok(())
}

fn cmd_build(
    config: &CliConfig,
    args: &RunArgs,
    out: Option<&PathBuf>,
    project: Option<String>,
    store: Option<PathBuf>,
) -> Result<()> {
    // stdout may carry the document, so status goes to stderr.
    eprintln!(
        "{} {} + {}",
        "Building".green().bold(),
        args.graph.display(),
        args.style.display()
    );

    let ctx = run_context(config, args)?;
    // Resolve the store first; a bad store must not leave a written document behind.
    let sink = match project.or_else(|| config.project.clone()) {
        Some(project) => Some((project, open_store(config, store)?)),
        None => None,
    };
    let (graph, style) = load_inputs(args)?;
    let document = relmap_graph::run(&ctx, &graph, &style).map_err(run_failure)?;
    let json = document.to_pretty_json()?;

    match out {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, &json)?;
            eprintln!(
                "  {} {} (nodes={}, edges={})",
                "→".cyan(),
                path.display(),
                document.view.node.len(),
                document.view.node_connections.len()
            );
        }
        None => println!("{json}"),
    }

    if let Some((project, store)) = sink {
        let record = store.insert(&project, &document)?;
        eprintln!(
            "  {} {} {} ({})",
            "Stored".green().bold(),
            project.yellow(),
            record.id,
            record.digest
        );
    }
    Ok(())
}

fn cmd_icons() -> Result<()> {
    for option in IconOption::ALL {
        println!("{:<16} {}", option.name().yellow(), option.url());
    }
    Ok(())
}

fn cmd_store_latest(
    config: &CliConfig,
    project: Option<String>,
    store: Option<PathBuf>,
) -> Result<()> {
    let project = project
        .or_else(|| config.project.clone())
        .ok_or_else(|| anyhow!("no project given (use --project or `project` in the config)"))?;
    let store = open_store(config, store)?;
    let record = store
        .latest(&project)?
        .ok_or_else(|| anyhow!("no stored document for project `{project}`"))?;

    eprintln!(
        "{} {} {} at {}",
        "Latest".green().bold(),
        project.yellow(),
        record.id,
        record.stored_at.to_rfc3339()
    );
    println!("{}", record.document.to_pretty_json()?);
    Ok(())
}
