//! Data loading functionality for Craftmax.
//!
//! This module handles loading the resource list, the recipe list and the
//! price table from the `data/` directory, plus user price overrides in
//! JSON or CSV form.

use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;

use crate::catalog::Catalog;
use crate::models::{PriceTable, Recipe, Resource};
use crate::purchase::PurchaseEntry;

/// Top-level shape of `resources.json`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ResourcesFile {
    pub resources: Vec<Resource>,
}

/// Top-level shape of `recipes.json`.
#[derive(Debug, Serialize, Deserialize)]
pub struct RecipesFile {
    pub recipes: Vec<Recipe>,
}

/// Top-level shape of `prices.json`.
#[derive(Debug, Serialize, Deserialize)]
pub struct PricesFile {
    pub prices: PriceTable,
}

/// CSV row of a price file.
#[derive(Debug, Serialize, Deserialize)]
pub struct PriceRow {
    /// Resource identifier
    pub id: String,
    /// Market unit price
    pub price: f64,
}

/// Parses a `{ "resources": [...] }` document.
pub fn parse_resources(reader: impl Read) -> Result<Vec<Resource>, Box<dyn Error>> {
    let file: ResourcesFile = serde_json::from_reader(reader)?;
    Ok(file.resources)
}

/// Parses a `{ "recipes": [...] }` document.
pub fn parse_recipes(reader: impl Read) -> Result<Vec<Recipe>, Box<dyn Error>> {
    let file: RecipesFile = serde_json::from_reader(reader)?;
    Ok(file.recipes)
}

/// Parses a `{ "prices": { id: price } }` document.
pub fn parse_prices_json(reader: impl Read) -> Result<PriceTable, Box<dyn Error>> {
    let file: PricesFile = serde_json::from_reader(reader)?;
    Ok(file.prices)
}

/// Parses a price table from CSV.
///
/// # CSV Format
///
/// Expected columns: `id, price`
pub fn parse_prices_csv(reader: impl Read) -> Result<PriceTable, Box<dyn Error>> {
    let mut rdr = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut prices = PriceTable::new();
    for result in rdr.deserialize() {
        let row: PriceRow = result?;
        prices.set(row.id, row.price);
    }
    Ok(prices)
}

/// Loads a price table, picking CSV or JSON by file extension.
///
/// Files ending in `.csv` are read as CSV; anything else as JSON.
pub fn load_price_table(path: &Path) -> Result<PriceTable, Box<dyn Error>> {
    let reader = BufReader::new(File::open(path)?);
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        parse_prices_csv(reader)
    } else {
        parse_prices_json(reader)
    }
}

/// Loads the default prices shipped in `data_dir/prices.json`.
pub fn load_default_prices(data_dir: &Path) -> Result<PriceTable, Box<dyn Error>> {
    load_price_table(&data_dir.join("prices.json"))
}

/// Builds a [`Catalog`] and reports dangling references as warnings.
///
/// Dangling references are tolerated: they resolve with a zero price and
/// no resource record.
pub fn build_catalog(resources: Vec<Resource>, recipes: Vec<Recipe>) -> Catalog {
    let catalog = Catalog::new(resources, recipes);
    for problem in catalog.dangling_references() {
        tracing::warn!(%problem, "dangling catalog reference");
    }
    catalog
}

/// Loads `resources.json` and `recipes.json` from the data directory.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use craftmax::data::load_catalog;
///
/// let catalog = load_catalog(Path::new("data")).unwrap();
/// println!("Loaded {} resources", catalog.resources().len());
/// ```
pub fn load_catalog(data_dir: &Path) -> Result<Catalog, Box<dyn Error>> {
    let resources = parse_resources(BufReader::new(File::open(
        data_dir.join("resources.json"),
    )?))?;
    let recipes = parse_recipes(BufReader::new(File::open(data_dir.join("recipes.json"))?))?;
    Ok(build_catalog(resources, recipes))
}

/// Writes a shopping list as CSV.
///
/// # CSV Format
///
/// Columns: `id, name, quantity, unit_cost, total_cost`
pub fn write_purchase_list_csv(
    writer: impl Write,
    entries: &[PurchaseEntry],
) -> Result<(), Box<dyn Error>> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["id", "name", "quantity", "unit_cost", "total_cost"])?;
    for entry in entries {
        wtr.write_record([
            entry.resource_id.clone(),
            entry.name().to_string(),
            entry.quantity.to_string(),
            entry.unit_cost.to_string(),
            entry.total_cost.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}
