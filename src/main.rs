//! Clonelookup CLI - look up benchmark functions and clone pairs

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use clonelookup::config::{load_config, ProjectLayout};
use clonelookup::ui::{self, Icons, TableStyle};
use clonelookup::{jsonl, output, Lookup, Reporter, SourceExtractor, SqliteStore};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "clonelookup")]
#[command(version)]
#[command(about = "Query a clone benchmark for function and clone pair details")]
#[command(long_about = r#"
Clonelookup reads the benchmark database and source corpus to show:
  • The FUNCTIONS row for one or two ids
  • Every clone pair touching one id, or the pair between two ids
  • The source of both functions when they form a clone pair

Example usage:
  clonelookup 80378 --path ~/BigCloneEval
  clonelookup 80378 18548122 --path ~/BigCloneEval
  clonelookup --sql "SELECT COUNT(*) FROM CLONES"
  clonelookup func 42 --path dataset/data.jsonl
"#)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    lookup: LookupArgs,
}

#[derive(Args)]
struct LookupArgs {
    /// One or two function IDs to look up
    #[arg(value_name = "FUNCTION_ID")]
    ids: Vec<i64>,

    /// Benchmark project root (defaults to the current directory)
    #[arg(long)]
    path: Option<PathBuf>,

    /// Database file or base path, relative to the project root
    #[arg(long)]
    database: Option<PathBuf>,

    /// Source corpus root, relative to the project root
    #[arg(long)]
    corpus: Option<PathBuf>,

    /// Run a single read-only SQL query instead of the lookup
    #[arg(long, conflicts_with = "ids")]
    sql: Option<String>,

    /// Rows per table when no ids are given
    #[arg(long, default_value = "5")]
    limit: usize,

    /// Table style
    #[arg(long, value_enum)]
    style: Option<TableStyle>,

    /// Path to the config file
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the `func` field of a JSONL dataset record by index
    Func {
        /// The idx value to search for
        idx: String,

        /// Path to the JSONL file
        #[arg(long, default_value = "data.jsonl")]
        path: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging (stderr, so the report on stdout stays clean)
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let result = match cli.command {
        Some(Commands::Func { idx, path }) => run_func(&idx, &path),
        None => run_lookup(cli.lookup),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ui::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run_lookup(args: LookupArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?.unwrap_or_default();

    let root = match args.path.or_else(|| config.path.map(PathBuf::from)) {
        Some(root) => root,
        None => std::env::current_dir()?,
    };
    let database = args.database.or_else(|| config.database.map(PathBuf::from));
    let corpus = args.corpus.or_else(|| config.corpus.map(PathBuf::from));
    let style = args.style.or(config.style).unwrap_or_default();

    // Validate everything before touching the store
    let lookup = if args.ids.is_empty() {
        None
    } else {
        Some(Lookup::from_ids(&args.ids)?)
    };
    let layout = ProjectLayout::resolve(&root, database.as_deref(), corpus.as_deref())?;
    if !layout.corpus.is_dir() {
        tracing::warn!("Corpus directory {} does not exist", layout.corpus.display());
    }

    let quiet = output::is_quiet();
    if !quiet {
        ui::status(Icons::DATABASE, "Connecting to", &layout.database.display().to_string());
    }
    let store = SqliteStore::open(&layout.database)?;
    if !quiet {
        ui::success("Connection successful.");
        if let Some(lookup) = &lookup {
            ui::status(Icons::SEARCH, "Lookup", &lookup.to_string());
            ui::status(Icons::FILE, "Corpus", &layout.corpus.display().to_string());
        }
        println!();
    }

    let outcome = report(&store, &layout, lookup, args.sql.as_deref(), args.limit, style);
    let closed = store.close();
    if !quiet {
        println!();
        ui::info("Database connection", "closed");
    }

    outcome?;
    closed?;
    Ok(())
}

fn report(
    store: &SqliteStore,
    layout: &ProjectLayout,
    lookup: Option<Lookup>,
    sql: Option<&str>,
    limit: usize,
    style: TableStyle,
) -> anyhow::Result<()> {
    let stdout = std::io::stdout();
    let mut reporter = Reporter::new(store, SourceExtractor::new(layout.corpus.clone()), stdout.lock())
        .with_theme(ui::theme().clone())
        .with_style(style);

    match (lookup, sql) {
        (_, Some(sql)) => {
            let rows = reporter.run_sql(sql)?;
            tracing::debug!("Query returned {} row(s)", rows);
        }
        (Some(lookup), None) => {
            let summary = reporter.run(&lookup)?;
            tracing::debug!(
                functions = summary.functions_found,
                pairs = summary.pairs_found,
                excerpts = summary.excerpts_shown,
                failures = summary.excerpt_failures,
                "Lookup complete"
            );
        }
        (None, None) => reporter.preview(limit)?,
    }
    Ok(())
}

fn run_func(idx: &str, path: &Path) -> anyhow::Result<()> {
    let found = jsonl::find_func(path, idx)
        .with_context(|| format!("failed to scan {}", path.display()))?;

    match found {
        Some(func) => println!("{}", func),
        None => ui::warn(&format!("Index {} not found in {}", idx, path.display())),
    }
    Ok(())
}
