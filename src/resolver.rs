//! Optimal-cost resolution.
//!
//! For every resource the resolver compares buying at market price with
//! crafting from the cheapest sub-costs, recursively. Results are memoized
//! for the lifetime of a [`Resolver`], which borrows the price table and
//! fixes the tax rate, so a cache can never outlive the inputs it was
//! computed from.

use std::collections::HashMap;
use std::rc::Rc;

use crate::catalog::Catalog;
use crate::error::CalcError;
use crate::models::{CostNode, Decision, IngredientCost, PriceTable, TaxRate};

/// Pass-scoped resolution context: inputs plus memo cache.
///
/// # Example
///
/// ```
/// use craftmax::catalog::Catalog;
/// use craftmax::models::{Decision, Ingredient, PriceTable, Recipe, Resource, ResourceType, TaxRate};
/// use craftmax::resolver::Resolver;
///
/// let catalog = Catalog::new(
///     vec![
///         Resource { id: "iron_ore".into(), name: "Iron Ore".into(), category: ResourceType::Mining, image: None },
///         Resource { id: "iron_ingot".into(), name: "Iron Ingot".into(), category: ResourceType::Crafting, image: None },
///     ],
///     vec![Recipe {
///         output: "iron_ingot".into(),
///         ingredients: vec![Ingredient { id: "iron_ore".into(), quantity: 2 }],
///     }],
/// );
/// let prices: PriceTable = [("iron_ore".to_string(), 10.0), ("iron_ingot".to_string(), 25.0)]
///     .into_iter()
///     .collect();
///
/// let mut resolver = Resolver::new(&catalog, &prices, TaxRate::new(0.1).unwrap());
/// let ingot = resolver.resolve("iron_ingot").unwrap();
///
/// assert_eq!(ingot.decision, Decision::Craft);
/// assert_eq!(ingot.cost, 20.0);
/// assert_eq!(ingot.margin_percent_label(), "11.1");
/// ```
#[derive(Debug)]
pub struct Resolver<'a> {
    catalog: &'a Catalog,
    prices: &'a PriceTable,
    tax_rate: TaxRate,
    memo: HashMap<String, Rc<CostNode>>,
}

impl<'a> Resolver<'a> {
    pub fn new(catalog: &'a Catalog, prices: &'a PriceTable, tax_rate: TaxRate) -> Self {
        Resolver {
            catalog,
            prices,
            tax_rate,
            memo: HashMap::new(),
        }
    }

    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    /// Drops every memoized node.
    pub fn clear_cache(&mut self) {
        self.memo.clear();
    }

    /// Number of resources resolved since the last clear.
    pub fn cached_len(&self) -> usize {
        self.memo.len()
    }

    /// Resolves one resource to its cheapest acquisition.
    ///
    /// The returned tree always carries the full ingredient breakdown for
    /// craftable resources, even when the decision is [`Decision::Buy`].
    pub fn resolve(&mut self, resource_id: &str) -> Result<Rc<CostNode>, CalcError> {
        let mut path = Vec::new();
        self.resolve_node(resource_id, &mut path)
    }

    /// Runs a full pass: clears the cache, then resolves every catalog
    /// resource in load order.
    ///
    /// A resource whose recipe chain is cyclic is logged and left out; every
    /// other resource is still resolved.
    pub fn resolve_all(&mut self) -> Vec<Rc<CostNode>> {
        self.clear_cache();
        let catalog = self.catalog;
        let mut nodes = Vec::with_capacity(catalog.resources().len());
        let mut skipped = 0;
        for resource in catalog.resources() {
            match self.resolve(&resource.id) {
                Ok(node) => nodes.push(node),
                Err(error) => {
                    tracing::warn!(resource_id = %resource.id, %error, "skipping resource");
                    skipped += 1;
                }
            }
        }
        tracing::debug!(
            resources = nodes.len(),
            skipped,
            tax_rate = self.tax_rate.rate(),
            "resolved full pass"
        );
        nodes
    }

    fn resolve_node(
        &mut self,
        resource_id: &str,
        path: &mut Vec<String>,
    ) -> Result<Rc<CostNode>, CalcError> {
        if let Some(node) = self.memo.get(resource_id) {
            return Ok(Rc::clone(node));
        }
        if path.iter().any(|id| id == resource_id) {
            return Err(CalcError::cyclic(path, resource_id));
        }

        let catalog = self.catalog;
        let resource = catalog.resource(resource_id).cloned();
        if resource.is_none() {
            tracing::warn!(resource_id, "unknown resource, resolving without a record");
        }
        let market_price = self.prices.get(resource_id).unwrap_or_else(|| {
            tracing::debug!(resource_id, "no market price, using 0");
            0.0
        });

        let node = match catalog.recipe(resource_id) {
            None => CostNode::leaf(resource_id, resource, market_price, self.tax_rate, false),
            Some(recipe) => {
                path.push(resource_id.to_string());
                let mut breakdown = Vec::with_capacity(recipe.ingredients.len());
                let mut craft_cost = 0.0;
                for ingredient in &recipe.ingredients {
                    let sub = self.resolve_node(&ingredient.id, path)?;
                    let total_cost = sub.cost * f64::from(ingredient.quantity);
                    craft_cost += total_cost;
                    breakdown.push(IngredientCost {
                        quantity: ingredient.quantity,
                        total_cost,
                        node: sub,
                    });
                }
                path.pop();

                let decision = if craft_cost < market_price {
                    Decision::Craft
                } else {
                    Decision::Buy
                };
                CostNode::with_breakdown(
                    resource_id,
                    resource,
                    market_price,
                    self.tax_rate,
                    decision,
                    market_price.min(craft_cost),
                    breakdown,
                )
            }
        };

        tracing::debug!(
            resource_id,
            decision = ?node.decision,
            cost = node.cost,
            "resolved resource"
        );
        let node = Rc::new(node);
        self.memo.insert(resource_id.to_string(), Rc::clone(&node));
        Ok(node)
    }
}

/// Resolves a single resource with a fresh cache.
pub fn resolve(
    resource_id: &str,
    catalog: &Catalog,
    prices: &PriceTable,
    tax_rate: TaxRate,
) -> Result<Rc<CostNode>, CalcError> {
    Resolver::new(catalog, prices, tax_rate).resolve(resource_id)
}

/// Resolves every catalog resource in one pass, leaving out cyclic ones.
pub fn resolve_all(
    catalog: &Catalog,
    prices: &PriceTable,
    tax_rate: TaxRate,
) -> Vec<Rc<CostNode>> {
    Resolver::new(catalog, prices, tax_rate).resolve_all()
}
