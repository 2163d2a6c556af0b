//! floorplan - Manage buildings and their PDF floorplans.
//!
//! Usage:
//!   floorplan buildings                         List buildings
//!   floorplan create NAME                       Create a building
//!   floorplan import DIR                        Import a folder as a building
//!   floorplan documents BUILDING                List a building's floorplans
//!   floorplan import-document BUILDING FILE     Copy a floorplan into a building
//!   floorplan open BUILDING DOCUMENT            Open a floorplan in the system viewer
//!   floorplan --help                            Show help

use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{eyre, Context, Result};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use floorplan_core::{Document, Folder, LibraryConfig};
use floorplan_ops::{LibraryHandle, LibraryService};
use floorplan_registry::{Library, ReadableAccess};

#[derive(Parser)]
#[command(
    name = "floorplan",
    version,
    about = "Manage buildings and their PDF floorplans",
    long_about = "floorplan keeps a folder per building under one storage root and \
                  the building's floorplan documents inside it.\n\n\
                  The directory tree is the only state; everything listed here is \
                  read from disk on each run."
)]
struct Cli {
    /// Storage root (overrides the config file)
    #[arg(short, long, global = true)]
    root: Option<PathBuf>,

    /// Config file (defaults to the platform config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List buildings
    Buildings,

    /// Create an empty building
    Create {
        /// Building name
        name: String,
    },

    /// Rename a building
    Rename {
        /// Current building name
        building: String,
        /// New name
        new_name: String,
    },

    /// Delete a building and all its floorplans
    Delete {
        /// Building name
        building: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Import a folder as a new building (copied, not moved)
    Import {
        /// Folder to import
        source: PathBuf,
    },

    /// List the floorplans of a building
    Documents {
        /// Building name
        building: String,
    },

    /// Rename a floorplan (its extension is kept)
    RenameDocument {
        /// Building name
        building: String,
        /// Current floorplan name, without extension
        document: String,
        /// New name, without extension
        new_name: String,
    },

    /// Delete a floorplan
    DeleteDocument {
        /// Building name
        building: String,
        /// Floorplan name, without extension
        document: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Copy a floorplan into a building
    ImportDocument {
        /// Building name
        building: String,
        /// File to import
        source: PathBuf,
    },

    /// Open a floorplan with the system viewer
    Open {
        /// Building name
        building: String,
        /// Floorplan name, without extension
        document: String,
    },

    /// Print the resolved configuration
    Config,
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

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("FLOORPLAN_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref(), cli.root)?;

    tracing::debug!(root = %config.root.display(), "Opening library");
    let library = Library::with_broker(config.clone(), std::sync::Arc::new(ReadableAccess))
        .context("Failed to open storage root")?;
    let handle = LibraryService::spawn(library);
    let format = cli.format;

    match cli.command {
        Command::Buildings => {
            let folders = handle.list_buildings().await?;
            print_buildings(&folders, format)?;
        }
        Command::Create { name } => {
            let folder = handle.create_building(name).await?;
            print_building(&folder, format, "Created")?;
        }
        Command::Rename { building, new_name } => {
            let folder = find_building(&handle, &building).await?;
            let folder = handle.rename_building(folder.id, new_name).await?;
            print_building(&folder, format, "Renamed to")?;
        }
        Command::Delete { building, yes } => {
            let folder = find_building(&handle, &building).await?;
            let prompt = format!("Delete building '{}' and all its floorplans?", folder.name);
            if yes || confirm(&prompt)? {
                let folder = handle.delete_building(folder.id).await?;
                print_building(&folder, format, "Deleted")?;
            }
        }
        Command::Import { source } => {
            let folder = handle.import_building(source).await?;
            print_building(&folder, format, "Imported")?;
        }
        Command::Documents { building } => {
            let folder = find_building(&handle, &building).await?;
            let documents = handle.list_documents(folder.id).await?;
            print_documents(&documents, format)?;
        }
        Command::RenameDocument {
            building,
            document,
            new_name,
        } => {
            let doc = find_document(&handle, &building, &document).await?;
            let doc = handle.rename_document(doc.id, new_name).await?;
            print_document(&doc, format, "Renamed to")?;
        }
        Command::DeleteDocument {
            building,
            document,
            yes,
        } => {
            let doc = find_document(&handle, &building, &document).await?;
            let prompt = format!("Delete floorplan '{}'?", doc.display_name);
            if yes || confirm(&prompt)? {
                let doc = handle.delete_document(doc.id).await?;
                print_document(&doc, format, "Deleted")?;
            }
        }
        Command::ImportDocument { building, source } => {
            let folder = find_building(&handle, &building).await?;
            let doc = handle.import_document(folder.id, source).await?;
            print_document(&doc, format, "Imported")?;
        }
        Command::Open { building, document } => {
            let doc = find_document(&handle, &building, &document).await?;
            open::that(&doc.location)
                .with_context(|| format!("Failed to open {}", doc.location.display()))?;
        }
        Command::Config => print_config(&config, format)?,
    }

    Ok(())
}

/// Load the config file and apply command line overrides.
fn load_config(path: Option<&PathBuf>, root: Option<PathBuf>) -> Result<LibraryConfig> {
    let path = path.cloned().or_else(LibraryConfig::default_path);

    let mut config = match path {
        Some(path) => LibraryConfig::load(&path)
            .with_context(|| format!("Invalid config file {}", path.display()))?,
        None => LibraryConfig::default(),
    };

    if let Some(root) = root {
        config.root = root;
    }

    Ok(config)
}

async fn find_building(handle: &LibraryHandle, name: &str) -> Result<Folder> {
    handle
        .building_by_name(name)
        .await?
        .ok_or_else(|| eyre!("No building named '{}'", name.trim()))
}

async fn find_document(handle: &LibraryHandle, building: &str, name: &str) -> Result<Document> {
    let folder = find_building(handle, building).await?;
    handle
        .document_by_name(folder.id, name)
        .await?
        .ok_or_else(|| eyre!("No floorplan named '{}' in '{}'", name.trim(), folder.name))
}

/// Ask for a yes/no confirmation on stdin.
fn confirm(prompt: &str) -> Result<bool> {
    eprint!("{prompt} [y/N] ");
    std::io::stderr().flush()?;

    let mut answer = String::new();
    std::io::stdin().lock().read_line(&mut answer)?;

    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "Yes"))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_config(config: &LibraryConfig, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            println!("root:               {}", config.root.display());
            println!("document extension: {}", config.document_extension);
            println!("include hidden:     {}", config.include_hidden);
            println!("use trash:          {}", config.use_trash);
            Ok(())
        }
        OutputFormat::Json => print_json(config),
    }
}

fn print_buildings(folders: &[Folder], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            if folders.is_empty() {
                println!("No buildings.");
            }
            for folder in folders {
                println!("{}", folder.name);
            }
            Ok(())
        }
        OutputFormat::Json => print_json(folders),
    }
}

fn print_building(folder: &Folder, format: OutputFormat, action: &str) -> Result<()> {
    match format {
        OutputFormat::Text => {
            println!("{action} '{}' ({})", folder.name, folder.location.display());
            Ok(())
        }
        OutputFormat::Json => print_json(folder),
    }
}

fn print_documents(documents: &[Document], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            if documents.is_empty() {
                println!("No floorplans.");
            }
            for doc in documents {
                println!("{:<40} {:>10}", truncate(&doc.display_name, 40), format_size(doc.size));
            }
            Ok(())
        }
        OutputFormat::Json => print_json(documents),
    }
}

fn print_document(doc: &Document, format: OutputFormat, action: &str) -> Result<()> {
    match format {
        OutputFormat::Text => {
            println!("{action} '{}' ({})", doc.display_name, doc.location.display());
            Ok(())
        }
        OutputFormat::Json => print_json(doc),
    }
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}

/// Truncate a string to max length in characters.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len - 1).collect();
        format!("{kept}…")
    }
}
