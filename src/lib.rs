//! # Craftmax
//!
//! A command-line tool and library for deciding, per item, whether to buy it
//! on the market or craft it from ingredients.
//!
//! Given a recipe graph, a market price table and a sales tax rate, this
//! crate provides:
//!
//! - the cheapest acquisition cost of every item, comparing the market price
//!   with the recursive craft cost
//! - every distinct buy/craft combination for one item, ranked by margin
//! - the flat shopping list implied by any computed cost tree
//!
//! ## Modules
//!
//! - [`models`] - Resources, recipes, prices, tax rate and cost trees
//! - [`catalog`] - Identifier indices over resources and recipes
//! - [`resolver`] - Optimal-cost resolution with per-pass memoization
//! - [`variants`] - Enumeration of all buy/craft strategies for one item
//! - [`purchase`] - Shopping-list flattening
//! - [`listing`] - Search, filter and sort for list views
//! - [`data`] - JSON/CSV data loading
//! - [`display`] - Output formatting and display utilities
//! - [`error`] - Error types
//!
//! ## Example Usage
//!
//! ```no_run
//! use craftmax::{
//!     data::{load_catalog, load_default_prices},
//!     models::TaxRate,
//!     purchase::flatten,
//!     resolver::Resolver,
//!     variants::enumerate_variants,
//! };
//! use std::path::Path;
//!
//! let catalog = load_catalog(Path::new("data")).unwrap();
//! let prices = load_default_prices(Path::new("data")).unwrap();
//! let tax = TaxRate::from_percent(10.0).unwrap();
//!
//! // One pass over every resource
//! let mut resolver = Resolver::new(&catalog, &prices, tax);
//! let all = resolver.resolve_all();
//! println!("{} resources priced", all.len());
//!
//! // Alternatives and shopping list for one item
//! let variants = enumerate_variants("iron_tool", &catalog, &prices, tax).unwrap();
//! if let Some(best) = variants.first() {
//!     for entry in flatten(&best.node) {
//!         println!("{} x{}", entry.name(), entry.quantity);
//!     }
//! }
//! ```

pub mod catalog;
pub mod data;
pub mod display;
pub mod error;
pub mod listing;
pub mod models;
pub mod purchase;
pub mod resolver;
pub mod variants;
pub mod wasm;
