mod cli;
mod setup;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use fma_core::kernel::constants::{APP_NAME, APP_VERSION};
use fma_core::kernel::error::{Error, Result};
use fma_core::{IoProvider, LocalStorageProvider, ObjectId, ObjectKind, ObjectStore, StorageProvider};
use fma_io_document::DocumentProvider;
use log::debug;

use crate::setup::{Setup, document_format};

/// Inspect and export file-manager actions and menus
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Settings file (JSON, YAML or TOML); defaults to ./fma.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the loaded menus, actions and profiles
    List,
    /// Print every field of one item
    Dump {
        /// Identifier of the menu or action
        id: String,
    },
    /// Fail when any loaded item is invalid
    Check,
    /// Print the field schema of every kind
    Schema,
    /// Write an item (and a menu's descendants) as documents
    Export {
        /// Identifier of the menu or action
        id: String,
        /// Document format: json, yaml or toml
        #[arg(long, default_value = "json")]
        format: String,
        /// Target directory
        #[arg(long)]
        output: PathBuf,
    },
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_logging(args.verbose);
    debug!("{} {}", APP_NAME, APP_VERSION);

    match run(args) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("fma: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let env = env_logger::Env::default().default_filter_or(default_filter);
    if let Err(e) = env_logger::Builder::from_env(env).try_init() {
        eprintln!("fma: cannot initialize logging: {}", e);
    }
}

fn run(args: CliArgs) -> Result<ExitCode> {
    if let Commands::Schema = args.command {
        print!("{}", cli::render_schema());
        return Ok(ExitCode::SUCCESS);
    }

    let setup = Setup::load(args.config.as_deref())?;
    let mut registry = setup.registry()?;
    let mut store = ObjectStore::new();
    let loaded = registry.load_items(&mut store);
    for message in &loaded.messages {
        eprintln!("{}", message);
    }

    match args.command {
        Commands::List => {
            print!("{}", cli::render_tree(&store, &loaded.roots));
            Ok(ExitCode::SUCCESS)
        }
        Commands::Dump { id } => {
            let item = find_item(&store, &loaded.roots, &id)?;
            print!("{}", cli::render_item(&store, item));
            Ok(ExitCode::SUCCESS)
        }
        Commands::Check => {
            let invalid = cli::invalid_items(&store, &loaded.roots);
            if invalid.is_empty() {
                let counts = store.count_items(&loaded.roots, true);
                println!("{} item(s) checked, all valid", counts.menus + counts.actions);
                return Ok(ExitCode::SUCCESS);
            }
            for id in &invalid {
                let kind = store.kind(*id).map(|kind| kind.type_name()).unwrap_or("?");
                println!("invalid: {} {}", kind, store.identifier(*id));
            }
            Ok(ExitCode::FAILURE)
        }
        Commands::Export { id, format, output } => {
            let item = find_item(&store, &loaded.roots, &id)?;
            let format = document_format(Some(&format))?;
            let storage: Arc<dyn StorageProvider> = Arc::new(LocalStorageProvider::new(output.clone()));
            let mut writer = DocumentProvider::new("export", storage, PathBuf::new(), format);
            let mut messages = Vec::new();
            for target in cli::subtree_items(&store, item) {
                let status = writer.write_item(&mut store, target, &mut messages);
                for message in messages.drain(..) {
                    eprintln!("{}", message);
                }
                if !status.is_ok() {
                    return Err(Error::Other(format!(
                        "cannot export '{}': {}",
                        store.identifier(target),
                        status
                    )));
                }
                println!(
                    "exported {} to {}",
                    store.identifier(target),
                    output
                        .join(format!("{}.{}", store.identifier(target), format.extension()))
                        .display()
                );
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Schema => Ok(ExitCode::SUCCESS),
    }
}

/// A loaded menu or action by identifier
fn find_item(store: &ObjectStore, roots: &[ObjectId], id: &str) -> Result<ObjectId> {
    store
        .find_by_id(roots, id)
        .filter(|item| store.kind(*item) != Some(ObjectKind::Profile))
        .ok_or_else(|| Error::Other(format!("no menu or action with id '{}'", id)))
}
