//! doclone command-line interface.
//!
//! Documents live as JSON files under the data directory; clone records in
//! a SQLite database next to them, scoped per user.
//!
//! Usage:
//!   doclone new "Quarterly Plan" --from body.json
//!   doclone clone <doc-id>                # new "<name> - Clone" document
//!   doclone clone <doc-id> --into <doc-id>
//!   doclone list <doc-id>                 # ancestors and descendants
//!   doclone sync <clone-id>
//!   doclone sync-all <doc-id>             # every descendant of a master
//!
//! Logs go to stderr; `RUST_LOG=doclone_kernel=trace` shows every visited node.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

use doclone_kernel::{Config, DocumentStore, Kernel, LocalDocumentStore, SqliteKv};
use doclone_types::{CloneId, DocSummary, DocumentId, Element};

type LocalKernel = Kernel<LocalDocumentStore, SqliteKv>;

/// Register document clones and mirror masters into them.
#[derive(Parser, Debug)]
#[command(name = "doclone")]
#[command(about = "Register document clones and mirror masters into them")]
struct Args {
    /// Config file (default: <config dir>/doclone/config.ron)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Data directory, overriding the config file
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Registry owner, overriding the config file
    #[arg(long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a document, optionally from a JSON body
    New {
        name: String,
        #[arg(long)]
        from: Option<PathBuf>,
    },
    /// List stored documents
    Docs,
    /// Register a clone of a document
    Clone {
        master: String,
        /// Existing document to use as the slave
        #[arg(long)]
        into: Option<String>,
    },
    /// Show a document's ancestors and descendants
    List { doc: String },
    /// Mirror a registered clone's master into its slave
    Sync { clone: String },
    /// Mirror one document into another without a registry entry
    Push { master: String, slave: String },
    /// Mirror a document into every registered descendant
    SyncAll { master: String },
    /// Print a document body as JSON
    Show { doc: String },
}

fn main() -> Result<()> {
    fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into())
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(dir) = args.data_dir {
        config.data_dir = Some(dir);
    }
    if let Some(user) = args.user {
        config.user = Some(user);
    }

    let kernel = open_kernel(&config)?;
    run(&kernel, args.command)
}

fn open_kernel(config: &Config) -> Result<LocalKernel> {
    let data_dir = config.data_dir();
    fs::create_dir_all(&data_dir)
        .with_context(|| format!("creating data directory {}", data_dir.display()))?;

    let store = LocalDocumentStore::new(config.documents_dir())?;
    let user = config.user();
    let kv = SqliteKv::open(config.registry_db(), &user)?;

    tracing::debug!(data_dir = %data_dir.display(), %user, "opened kernel");
    Ok(Kernel::with_config(store, kv, config))
}

fn run(kernel: &LocalKernel, command: Command) -> Result<()> {
    match command {
        Command::New { name, from } => {
            let body = match from {
                Some(path) => {
                    let raw = fs::read_to_string(&path)
                        .with_context(|| format!("reading {}", path.display()))?;
                    serde_json::from_str::<Element>(&raw)
                        .with_context(|| format!("parsing {}", path.display()))?
                }
                None => Element::body(),
            };
            let id = kernel.store().insert(&name, body)?;
            println!("{id}");
        }
        Command::Docs => {
            for doc in kernel.store().list()? {
                print_summary(&doc);
            }
        }
        Command::Clone { master, into } => {
            let master = doc_id(&master)?;
            let into = into.as_deref().map(doc_id).transpose()?;
            let record = kernel.create_clone(&master, into.as_ref())?;
            println!("{}", record.to_json()?);
        }
        Command::List { doc } => {
            let listing = kernel.list_clones(&doc_id(&doc)?)?;
            println!("ancestors:");
            listing.ancestors.iter().for_each(print_summary);
            println!("descendants:");
            listing.descendants.iter().for_each(print_summary);
        }
        Command::Sync { clone } => {
            let id = CloneId::parse(&clone).with_context(|| format!("invalid clone id {clone:?}"))?;
            println!("{}", kernel.sync_clone(&id)?);
        }
        Command::Push { master, slave } => {
            println!("{}", kernel.sync_with(&doc_id(&master)?, &doc_id(&slave)?)?);
        }
        Command::SyncAll { master } => {
            println!("{}", kernel.sync_descendants(&doc_id(&master)?)?);
        }
        Command::Show { doc } => {
            let doc = kernel.store().open(&doc_id(&doc)?)?;
            println!("{}", serde_json::to_string_pretty(&doc.tree.to_element())?);
            kernel.store().close(doc)?;
        }
    }
    Ok(())
}

fn doc_id(raw: &str) -> Result<DocumentId> {
    DocumentId::parse(raw).with_context(|| format!("invalid document id {raw:?}"))
}

fn print_summary(doc: &DocSummary) {
    println!("{}\t{}\t{}", doc.id, doc.name, doc.url);
}
