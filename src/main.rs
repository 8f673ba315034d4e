//! customitems - inspect custom item packs from the command line

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use customitems::core::{DefinitionStore, GenericItem, ItemKind};
use customitems::{CustomItems, EngineConfig};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Inspect and validate custom item definition packs", long_about = None)]
struct Cli {
    /// Engine config (TOML)
    #[arg(short, long, default_value = customitems::config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Override the definition pack named in the config
    #[arg(long)]
    definitions: Option<PathBuf>,

    /// Override the native catalog named in the config
    #[arg(long)]
    natives: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List custom item ids
    List {
        /// Only list items that can be placed as blocks
        #[arg(long)]
        blocks: bool,
    },
    /// Show one custom item definition
    Show {
        /// Custom item id, optionally namespaced
        id: String,
    },
    /// Resolve an id to a custom or native item
    Resolve {
        /// Item id
        id: String,
        /// Require an exact-case match
        #[arg(long)]
        case_sensitive: bool,
    },
    /// Validate the definition pack and report every problem
    Check,
}

fn main() -> Result<()> {
    // Initialize tracing with WARN level by default (can be overridden via RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = EngineConfig::load_from_path(&cli.config);
    if let Some(path) = cli.definitions {
        config.definitions = path;
    }
    if cli.natives.is_some() {
        config.natives = cli.natives;
    }

    let (engine, report) = CustomItems::load(&config)?;
    info!(
        registered = report.registered,
        definitions = %config.definitions.display(),
        "Loaded custom items"
    );

    match cli.command {
        Command::List { blocks } => {
            let ids = if blocks {
                engine.list_block_custom_item_ids()
            } else {
                engine.list_custom_item_ids()
            };
            for id in ids {
                println!("{id}");
            }
        }
        Command::Show { id } => {
            let Some(def) = engine.definition(&id, false) else {
                bail!("Unknown custom item '{id}'");
            };
            println!("id:        {}", def.id());
            println!("name:      {}", def.name());
            println!("version:   {}", def.version());
            println!("material:  {}", def.material());
            if let Some(category) = def.category() {
                println!("category:  {category}");
            }
            if def.is_damageable() {
                println!(
                    "durability: {} (starts at {})",
                    def.max_durability(),
                    def.initial_damage()
                );
            }
            if def.is_placeable() {
                println!("block:     {}", def.block_material().unwrap_or("-"));
                for drop in def.block_drops() {
                    println!("  drops {} x{}", drop.item, drop.amount);
                }
            }
            if let Some(tool) = def.tool() {
                println!("tool:      {:?} {:?}", tool.material, tool.kind);
            }
            if !def.behavior().is_empty() {
                println!("behavior:  {:?}", def.behavior());
            }
        }
        Command::Resolve { id, case_sensitive } => {
            println!("{}", describe(&engine.generic_item(&id, case_sensitive)));
        }
        Command::Check => {
            let store = engine.snapshot();
            let problems = print_problems(&store);
            for id in &report.duplicates {
                println!("{id}: duplicate id, ignored");
            }
            if problems > 0 || !report.duplicates.is_empty() {
                bail!(
                    "{} invalid and {} duplicate definitions",
                    report.invalid.len(),
                    report.duplicates.len()
                );
            }
            println!("{} custom items OK", report.registered);
        }
    }

    Ok(())
}

fn describe(item: &GenericItem) -> String {
    match item.kind() {
        Some(ItemKind::Custom(def)) => format!("custom {} ({})", def.id(), def.name()),
        Some(ItemKind::Native(kind)) => format!("native {}", kind.name),
        None => "not found".to_string(),
    }
}

fn print_problems(store: &DefinitionStore) -> usize {
    let mut count = 0;
    for def in store.list_all() {
        for problem in def.problems() {
            println!("{}: {problem}", def.id());
            count += 1;
        }
    }
    count
}
