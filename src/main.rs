//! Craftmax - Command Line Interface
//!
//! This is the main entry point for the buy-or-craft calculator.
//! Run with `--help` to see all available options.

use clap::{Parser, Subcommand};
use std::error::Error;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use craftmax::{
    data::{load_catalog, load_default_prices, load_price_table, write_purchase_list_csv},
    display::{display_detail, display_listing, format_number, render_purchase_list},
    listing::{ListingQuery, SortKey},
    models::{ResourceType, TaxRate},
    purchase::flatten,
    resolver::Resolver,
    variants::{best_craft_variant, enumerate_variants},
};

/// Command-line arguments for Craftmax.
#[derive(Parser, Debug)]
#[command(name = "craftmax")]
#[command(author, version, about = "Decide whether to buy or craft market items", long_about = None)]
struct Args {
    /// Directory holding resources.json, recipes.json and prices.json
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// Price overrides (JSON or CSV) laid over the default prices
    #[arg(short, long)]
    prices: Option<PathBuf>,

    /// Sales tax in percent
    #[arg(short, long, default_value = "0.0")]
    tax: f64,

    /// Fail when a recipe references an unknown resource
    #[arg(long, default_value = "false")]
    strict: bool,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, default_value = "false")]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List every resource with its optimal cost and margin
    List {
        /// Only resources whose name contains this text
        #[arg(short, long)]
        search: Option<String>,

        /// Only resources of this category
        #[arg(short, long, value_enum)]
        category: Option<ResourceType>,

        /// Sort order
        #[arg(long, value_enum, default_value = "margin-desc")]
        sort: SortKey,
    },

    /// Show the cost tree, shopping list and all variants of one resource
    Show {
        /// Resource identifier (e.g., "iron_ingot")
        id: String,

        /// Maximum number of variants to print
        #[arg(long, default_value = "10")]
        variants: usize,
    },

    /// Print the shopping list of the best crafted variant
    Shop {
        /// Resource identifier
        id: String,

        /// Write CSV to stdout instead of a table
        #[arg(long, default_value = "false")]
        csv: bool,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_logging(args.verbose);

    if !args.data_dir.exists() {
        eprintln!(
            "Error: data directory '{}' not found. Please run from the project root.",
            args.data_dir.display()
        );
        std::process::exit(1);
    }

    let tax_rate = TaxRate::from_percent(args.tax)?;
    let catalog = load_catalog(&args.data_dir)?;
    if args.strict {
        catalog.validate()?;
    }
    let mut prices = load_default_prices(&args.data_dir)?;
    if let Some(path) = &args.prices {
        let overrides = load_price_table(path)?;
        tracing::debug!(overrides = overrides.len(), path = %path.display(), "loaded price overrides");
        prices.overlay(&overrides);
    }

    match args.command {
        Commands::List {
            search,
            category,
            sort,
        } => {
            let mut resolver = Resolver::new(&catalog, &prices, tax_rate);
            let nodes = resolver.resolve_all();
            let query = ListingQuery {
                search,
                category,
                sort,
            };

            println!("Craftmax - Buy or Craft");
            println!("================================================================");
            println!("  Resources:  {}", catalog.resources().len());
            println!("  Recipes:    {}", catalog.recipe_count());
            println!("  Tax:        {}%", format_number(args.tax));
            display_listing(&query.apply(&nodes));
        }

        Commands::Show { id, variants } => {
            if catalog.resource(&id).is_none() {
                println!("[WARNING] Unknown resource '{}'.", id);
            }
            let node = Resolver::new(&catalog, &prices, tax_rate).resolve(&id)?;
            let all_variants = enumerate_variants(&id, &catalog, &prices, tax_rate)?;
            display_detail(&node, &all_variants, variants);
        }

        Commands::Shop { id, csv } => {
            let all_variants = enumerate_variants(&id, &catalog, &prices, tax_rate)?;
            let entries = match best_craft_variant(&all_variants) {
                Some(variant) => flatten(&variant.node),
                None => {
                    let node = Resolver::new(&catalog, &prices, tax_rate).resolve(&id)?;
                    flatten(&node)
                }
            };

            if csv {
                write_purchase_list_csv(io::stdout().lock(), &entries)?;
            } else {
                println!("[SHOPPING LIST] {}", id);
                println!("----------------------------------------------------------------");
                print!("{}", render_purchase_list(&entries));
            }
        }
    }

    Ok(())
}
