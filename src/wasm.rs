//! WebAssembly bindings for Craftmax.
//!
//! This module provides JavaScript-accessible functions for the buy-or-craft
//! calculator. Every function takes and returns a JSON string.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::catalog::Catalog;
use crate::data::{parse_prices_json, parse_recipes, parse_resources};
use crate::models::{CostNode, Decision, PriceTable, Recipe, Resource, ResourceType, TaxRate};
use crate::purchase::{flatten, purchase_total, PurchaseEntry};
use crate::resolver::Resolver;
use crate::variants::{best_craft_variant, enumerate_variants, Variant};

const EMBEDDED_RESOURCES: &str = include_str!("../data/resources.json");
const EMBEDDED_RECIPES: &str = include_str!("../data/recipes.json");
const EMBEDDED_PRICES: &str = include_str!("../data/prices.json");

/// JavaScript-friendly input shared by every entry point.
///
/// Missing resources, recipes or prices fall back to the data embedded at
/// build time; given prices are laid over the embedded defaults.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct JsCalcInput {
    #[serde(default)]
    pub resources: Option<Vec<Resource>>,
    #[serde(default)]
    pub recipes: Option<Vec<Recipe>>,
    #[serde(default)]
    pub prices: Option<PriceTable>,
    /// Sales tax in percent (e.g., 10 for 10%)
    #[serde(default)]
    pub tax_percent: f64,
    /// Resource to inspect (detail view only)
    #[serde(default)]
    pub resource_id: Option<String>,
}

/// JavaScript-friendly cost tree node.
#[derive(Debug, Clone, Serialize)]
pub struct JsCostNode {
    pub resource_id: String,
    pub name: String,
    pub category: Option<ResourceType>,
    pub image: Option<String>,
    pub market_price: f64,
    pub market_price_after_tax: f64,
    pub craft_cost: Option<f64>,
    pub cost: f64,
    pub decision: Decision,
    pub margin: f64,
    pub margin_percent: String,
    /// Units required by the parent (absent at the root)
    pub quantity: Option<u32>,
    /// Contribution to the parent's cost (absent at the root)
    pub total_cost: Option<f64>,
    pub breakdown: Option<Vec<JsCostNode>>,
}

impl JsCostNode {
    fn from_node(node: &CostNode, quantity: Option<u32>, total_cost: Option<f64>) -> Self {
        JsCostNode {
            resource_id: node.resource_id.clone(),
            name: node.name().to_string(),
            category: node.resource.as_ref().map(|r| r.category),
            image: node.resource.as_ref().and_then(|r| r.image.clone()),
            market_price: node.market_price,
            market_price_after_tax: node.market_price_after_tax,
            craft_cost: node.craft_cost,
            cost: node.cost,
            decision: node.decision,
            margin: node.margin,
            margin_percent: node.margin_percent_label(),
            quantity,
            total_cost,
            breakdown: node.breakdown.as_ref().map(|lines| {
                lines
                    .iter()
                    .map(|line| {
                        JsCostNode::from_node(&line.node, Some(line.quantity), Some(line.total_cost))
                    })
                    .collect()
            }),
        }
    }
}

impl From<&CostNode> for JsCostNode {
    fn from(node: &CostNode) -> Self {
        JsCostNode::from_node(node, None, None)
    }
}

/// JavaScript-friendly shopping list line.
#[derive(Debug, Clone, Serialize)]
pub struct JsPurchaseEntry {
    pub resource_id: String,
    pub name: String,
    pub quantity: u64,
    pub unit_cost: f64,
    pub total_cost: f64,
}

impl From<&PurchaseEntry> for JsPurchaseEntry {
    fn from(entry: &PurchaseEntry) -> Self {
        JsPurchaseEntry {
            resource_id: entry.resource_id.clone(),
            name: entry.name().to_string(),
            quantity: entry.quantity,
            unit_cost: entry.unit_cost,
            total_cost: entry.total_cost,
        }
    }
}

/// JavaScript-friendly variant.
#[derive(Debug, Clone, Serialize)]
pub struct JsVariant {
    pub rank: usize,
    pub optimal: bool,
    pub total_cost: f64,
    pub margin: f64,
    pub margin_percent: String,
    pub decisions: BTreeMap<String, Decision>,
    pub tree: JsCostNode,
}

impl JsVariant {
    fn new(index: usize, variant: &Variant) -> Self {
        JsVariant {
            rank: index + 1,
            optimal: index == 0,
            total_cost: variant.total_cost(),
            margin: variant.margin(),
            margin_percent: variant.node.margin_percent_label(),
            decisions: variant.decisions.clone(),
            tree: JsCostNode::from(&variant.node),
        }
    }
}

/// JavaScript-friendly result of a full pass.
#[derive(Debug, Clone, Serialize, Default)]
pub struct JsCalculateResult {
    pub success: bool,
    pub error: Option<String>,
    pub tax_rate: f64,
    pub items: Vec<JsCostNode>,
}

/// JavaScript-friendly result of a detail request.
#[derive(Debug, Clone, Serialize, Default)]
pub struct JsDetailResult {
    pub success: bool,
    pub error: Option<String>,
    pub item: Option<JsCostNode>,
    /// Index into `variants` of the variant the shopping list is built from
    pub shown_variant: Option<usize>,
    pub purchase_list: Vec<JsPurchaseEntry>,
    pub purchase_total: f64,
    pub variants: Vec<JsVariant>,
}

struct Inputs {
    catalog: Catalog,
    prices: PriceTable,
    tax_rate: TaxRate,
}

fn log_warning(message: &str) {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&JsValue::from_str(message));
    tracing::warn!("{}", message);
}

fn prepare(input: JsCalcInput) -> Result<Inputs, String> {
    let tax_rate = TaxRate::from_percent(input.tax_percent).map_err(|e| e.to_string())?;

    let resources = match input.resources {
        Some(resources) => resources,
        None => parse_resources(EMBEDDED_RESOURCES.as_bytes()).map_err(|e| e.to_string())?,
    };
    let recipes = match input.recipes {
        Some(recipes) => recipes,
        None => parse_recipes(EMBEDDED_RECIPES.as_bytes()).map_err(|e| e.to_string())?,
    };
    let mut prices = parse_prices_json(EMBEDDED_PRICES.as_bytes()).map_err(|e| e.to_string())?;
    if let Some(overrides) = &input.prices {
        prices.overlay(overrides);
    }

    let catalog = Catalog::new(resources, recipes);
    for problem in catalog.dangling_references() {
        log_warning(&problem.to_string());
    }

    Ok(Inputs {
        catalog,
        prices,
        tax_rate,
    })
}

fn calculate_all_inner(input_json: &str) -> Result<JsCalculateResult, String> {
    let input: JsCalcInput = serde_json::from_str(input_json).map_err(|e| e.to_string())?;
    let inputs = prepare(input)?;

    let mut resolver = Resolver::new(&inputs.catalog, &inputs.prices, inputs.tax_rate);
    let nodes = resolver.resolve_all();

    Ok(JsCalculateResult {
        success: true,
        error: None,
        tax_rate: inputs.tax_rate.rate(),
        items: nodes.iter().map(|node| JsCostNode::from(node.as_ref())).collect(),
    })
}

fn item_detail_inner(input_json: &str) -> Result<JsDetailResult, String> {
    let input: JsCalcInput = serde_json::from_str(input_json).map_err(|e| e.to_string())?;
    let resource_id = input
        .resource_id
        .clone()
        .ok_or_else(|| "resource_id is required".to_string())?;
    let inputs = prepare(input)?;

    let mut resolver = Resolver::new(&inputs.catalog, &inputs.prices, inputs.tax_rate);
    let node = resolver.resolve(&resource_id).map_err(|e| e.to_string())?;
    let variants = enumerate_variants(&resource_id, &inputs.catalog, &inputs.prices, inputs.tax_rate)
        .map_err(|e| e.to_string())?;

    let shown = best_craft_variant(&variants);
    let purchases = flatten(shown.map_or(node.as_ref(), |v| &v.node));
    let shown_variant = shown.and_then(|s| variants.iter().position(|v| std::ptr::eq(v, s)));

    Ok(JsDetailResult {
        success: true,
        error: None,
        item: Some(JsCostNode::from(node.as_ref())),
        shown_variant,
        purchase_total: purchase_total(&purchases),
        purchase_list: purchases.iter().map(JsPurchaseEntry::from).collect(),
        variants: variants
            .iter()
            .enumerate()
            .map(|(i, v)| JsVariant::new(i, v))
            .collect(),
    })
}

/// Resolve every resource for the given prices and tax.
/// Returns a JSON [`JsCalculateResult`].
#[wasm_bindgen]
pub fn calculate_all(input_json: &str) -> String {
    let result = calculate_all_inner(input_json).unwrap_or_else(|error| JsCalculateResult {
        success: false,
        error: Some(error),
        ..Default::default()
    });
    serde_json::to_string(&result).unwrap_or_default()
}

/// Resolve one resource and enumerate its variants.
/// Returns a JSON [`JsDetailResult`].
#[wasm_bindgen]
pub fn item_detail(input_json: &str) -> String {
    let result = item_detail_inner(input_json).unwrap_or_else(|error| JsDetailResult {
        success: false,
        error: Some(error),
        ..Default::default()
    });
    serde_json::to_string(&result).unwrap_or_default()
}

/// Get the embedded default price table as JSON.
#[wasm_bindgen]
pub fn get_default_prices() -> String {
    EMBEDDED_PRICES.to_string()
}

/// Get the version of the calculator.
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
