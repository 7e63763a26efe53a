//! Data models and structures for Craftmax.
//!
//! This module contains the reference data (resources, recipes), the
//! per-invocation inputs (price table, tax rate) and the computed cost
//! trees shared by the resolver, the variant enumerator and the
//! purchase-list flattener.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::CalcError;

/// How a resource is obtained in the game world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    /// Dug out of the ground (ores, stone, coal)
    #[serde(alias = "mined")]
    Mining,
    /// Caught with a rod
    #[serde(alias = "fished")]
    Fishing,
    /// Picked up in the field (wood, herbs)
    #[serde(alias = "gathered")]
    Gathering,
    /// Produced from other resources by a recipe
    #[serde(alias = "crafted")]
    Crafting,
}

impl ResourceType {
    /// Returns the human-readable label for this category.
    pub fn label(self) -> &'static str {
        match self {
            ResourceType::Mining => "Mining",
            ResourceType::Fishing => "Fishing",
            ResourceType::Gathering => "Gathering",
            ResourceType::Crafting => "Crafting",
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A tradeable or craftable entity.
///
/// # Example
///
/// ```
/// use craftmax::models::{Resource, ResourceType};
///
/// let ore: Resource = serde_json::from_str(
///     r#"{ "id": "iron_ore", "name": "Iron Ore", "type": "mining" }"#,
/// ).unwrap();
///
/// assert_eq!(ore.category, ResourceType::Mining);
/// assert!(ore.image.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    /// Unique identifier (e.g., "iron_ore")
    pub id: String,
    /// Display name (e.g., "Iron Ore")
    pub name: String,
    /// How the resource is obtained
    #[serde(rename = "type")]
    pub category: ResourceType,
    /// Optional image path or URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// One ingredient line of a recipe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Identifier of the required resource
    pub id: String,
    /// Units of the ingredient consumed per crafted unit
    pub quantity: u32,
}

/// Maps one output resource to its ordered ingredient list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    /// Identifier of the crafted resource
    pub output: String,
    /// Ingredients in display order
    pub ingredients: Vec<Ingredient>,
}

/// Current market unit price per resource identifier.
///
/// Lookups of unknown identifiers price at `0.0`.
///
/// # Example
///
/// ```
/// use craftmax::models::PriceTable;
///
/// let prices: PriceTable = [("iron_ore".to_string(), 10.0)].into_iter().collect();
///
/// assert_eq!(prices.price("iron_ore"), 10.0);
/// assert_eq!(prices.price("mithril"), 0.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceTable(HashMap<String, f64>);

impl PriceTable {
    /// Creates an empty price table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the market price of `id`, or `0.0` when it has none.
    pub fn price(&self, id: &str) -> f64 {
        self.0.get(id).copied().unwrap_or(0.0)
    }

    /// Returns the stored price of `id`, if any.
    pub fn get(&self, id: &str) -> Option<f64> {
        self.0.get(id).copied()
    }

    /// Sets the market price of `id`.
    pub fn set(&mut self, id: impl Into<String>, price: f64) {
        self.0.insert(id.into(), price);
    }

    /// Copies every entry of `overrides` on top of this table.
    pub fn overlay(&mut self, overrides: &PriceTable) {
        for (id, price) in &overrides.0 {
            self.0.insert(id.clone(), *price);
        }
    }

    /// Number of priced resources.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no resource is priced.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, f64)> for PriceTable {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        PriceTable(iter.into_iter().collect())
    }
}

/// Fraction of the market price lost when selling, in `[0, 1)`.
///
/// # Example
///
/// ```
/// use craftmax::models::TaxRate;
///
/// let tax = TaxRate::from_percent(10.0).unwrap();
/// assert!((tax.apply(25.0) - 22.5).abs() < 1e-9);
/// assert!(TaxRate::new(1.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TaxRate(f64);

impl TaxRate {
    /// No tax.
    pub const ZERO: TaxRate = TaxRate(0.0);

    /// Validates and wraps a fractional rate.
    pub fn new(rate: f64) -> Result<Self, CalcError> {
        if (0.0..1.0).contains(&rate) {
            Ok(TaxRate(rate))
        } else {
            Err(CalcError::InvalidTaxRate(rate))
        }
    }

    /// Builds a rate from a percentage (e.g., `10.0` for 10%).
    pub fn from_percent(percent: f64) -> Result<Self, CalcError> {
        Self::new(percent / 100.0)
    }

    /// Returns the fraction, e.g. `0.1` for 10%.
    pub fn rate(self) -> f64 {
        self.0
    }

    /// Returns the net proceeds of selling at `price`.
    pub fn apply(self, price: f64) -> f64 {
        price * (1.0 - self.0)
    }
}

/// Whether a resource is bought on the market or crafted from ingredients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Buy,
    Craft,
}

impl Decision {
    /// Returns the upper-case tag used in tree output.
    pub fn tag(self) -> &'static str {
        match self {
            Decision::Buy => "BUY",
            Decision::Craft => "CRAFT",
        }
    }
}

/// One child of a [`CostNode`]: an ingredient with its required quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct IngredientCost {
    /// Units required per unit of the parent
    pub quantity: u32,
    /// `node.cost * quantity`
    pub total_cost: f64,
    /// The ingredient's own cost node
    pub node: Rc<CostNode>,
}

/// Result of resolving or enumerating one resource.
#[derive(Debug, Clone, PartialEq)]
pub struct CostNode {
    /// Identifier that was evaluated
    pub resource_id: String,
    /// The resource record, absent when the identifier is unknown
    pub resource: Option<Resource>,
    /// Raw market price (0 when unpriced)
    pub market_price: f64,
    /// Market price net of tax; only meaningful at the root
    pub market_price_after_tax: f64,
    /// Sum of ingredient contributions, `None` when no craft path was computed
    pub craft_cost: Option<f64>,
    /// Cost of acquiring one unit under this node's decision
    pub cost: f64,
    pub decision: Decision,
    /// `market_price_after_tax - cost` for craftable resources, 0 for base ones
    pub margin: f64,
    /// `100 * margin / market_price_after_tax`, 0 when that price is 0
    pub margin_percent: f64,
    /// Ingredient breakdown in recipe order
    pub breakdown: Option<Vec<IngredientCost>>,
}

impl CostNode {
    /// Builds a node with no breakdown, priced at market.
    ///
    /// `craftable` controls whether margin is computed or pinned to 0.
    pub(crate) fn leaf(
        resource_id: &str,
        resource: Option<Resource>,
        market_price: f64,
        tax_rate: TaxRate,
        craftable: bool,
    ) -> Self {
        let market_price_after_tax = tax_rate.apply(market_price);
        let (margin, margin_percent) = if craftable {
            margin_of(market_price_after_tax, market_price)
        } else {
            (0.0, 0.0)
        };
        CostNode {
            resource_id: resource_id.to_string(),
            resource,
            market_price,
            market_price_after_tax,
            craft_cost: None,
            cost: market_price,
            decision: Decision::Buy,
            margin,
            margin_percent,
            breakdown: None,
        }
    }

    /// Builds a node for a craftable resource with its full breakdown.
    pub(crate) fn with_breakdown(
        resource_id: &str,
        resource: Option<Resource>,
        market_price: f64,
        tax_rate: TaxRate,
        decision: Decision,
        cost: f64,
        breakdown: Vec<IngredientCost>,
    ) -> Self {
        let market_price_after_tax = tax_rate.apply(market_price);
        let craft_cost = breakdown.iter().map(|line| line.total_cost).sum();
        let (margin, margin_percent) = margin_of(market_price_after_tax, cost);
        CostNode {
            resource_id: resource_id.to_string(),
            resource,
            market_price,
            market_price_after_tax,
            craft_cost: Some(craft_cost),
            cost,
            decision,
            margin,
            margin_percent,
            breakdown: Some(breakdown),
        }
    }

    /// Display name of the resource, falling back to its identifier.
    pub fn name(&self) -> &str {
        self.resource
            .as_ref()
            .map_or(self.resource_id.as_str(), |r| r.name.as_str())
    }

    /// Whether a craft path was computed for this node.
    pub fn has_craft_path(&self) -> bool {
        self.craft_cost.is_some()
    }

    /// Ingredient lines, empty for leaves.
    pub fn ingredients(&self) -> &[IngredientCost] {
        self.breakdown.as_deref().unwrap_or(&[])
    }

    /// Margin percent rounded to one decimal (e.g., "11.1").
    pub fn margin_percent_label(&self) -> String {
        format!("{:.1}", self.margin_percent)
    }
}

/// Returns `(margin, margin_percent)` for a sale at `price_after_tax`.
pub(crate) fn margin_of(price_after_tax: f64, cost: f64) -> (f64, f64) {
    let margin = price_after_tax - cost;
    let percent = if price_after_tax == 0.0 {
        0.0
    } else {
        margin / price_after_tax * 100.0
    };
    (margin, percent)
}
