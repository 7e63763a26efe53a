//! Flattening of a cost tree into a shopping list.

use std::collections::HashMap;

use crate::models::{CostNode, Decision, Resource};

/// One line of a shopping list.
#[derive(Debug, Clone, PartialEq)]
pub struct PurchaseEntry {
    pub resource_id: String,
    /// The resource record, absent when the identifier is unknown
    pub resource: Option<Resource>,
    /// Units to buy, summed over every place the resource appears
    pub quantity: u64,
    /// Unit cost at which the resource is bought
    pub unit_cost: f64,
    /// `quantity * unit_cost`
    pub total_cost: f64,
}

impl PurchaseEntry {
    /// Display name of the resource, falling back to its identifier.
    pub fn name(&self) -> &str {
        self.resource
            .as_ref()
            .map_or(self.resource_id.as_str(), |r| r.name.as_str())
    }
}

/// Collects every bought leaf of `node` with aggregated quantities.
///
/// A node is bought when its decision is [`Decision::Buy`] or it has no
/// breakdown; crafted nodes recurse into their ingredients with the
/// ingredient quantity multiplied into the running multiplier. Entries keep
/// first-encountered order.
///
/// # Example
///
/// ```
/// use craftmax::catalog::Catalog;
/// use craftmax::models::{Ingredient, PriceTable, Recipe, Resource, ResourceType, TaxRate};
/// use craftmax::purchase::flatten;
/// use craftmax::resolver::resolve;
///
/// let res = |id: &str, category| Resource { id: id.into(), name: id.into(), category, image: None };
/// let catalog = Catalog::new(
///     vec![res("ore", ResourceType::Mining), res("ingot", ResourceType::Crafting)],
///     vec![Recipe { output: "ingot".into(), ingredients: vec![Ingredient { id: "ore".into(), quantity: 2 }] }],
/// );
/// let prices: PriceTable = [("ore".to_string(), 10.0), ("ingot".to_string(), 25.0)].into_iter().collect();
///
/// let ingot = resolve("ingot", &catalog, &prices, TaxRate::ZERO).unwrap();
/// let list = flatten(&ingot);
///
/// assert_eq!(list.len(), 1);
/// assert_eq!(list[0].resource_id, "ore");
/// assert_eq!(list[0].quantity, 2);
/// assert_eq!(list[0].total_cost, 20.0);
/// ```
pub fn flatten(node: &CostNode) -> Vec<PurchaseEntry> {
    let mut entries = Vec::new();
    let mut index = HashMap::new();
    collect(node, 1, &mut entries, &mut index);

    for entry in &mut entries {
        entry.total_cost = entry.quantity as f64 * entry.unit_cost;
    }
    entries
}

/// Sum of `total_cost` over a shopping list.
pub fn purchase_total(entries: &[PurchaseEntry]) -> f64 {
    entries.iter().map(|e| e.total_cost).sum()
}

fn collect(
    node: &CostNode,
    multiplier: u64,
    entries: &mut Vec<PurchaseEntry>,
    index: &mut HashMap<String, usize>,
) {
    match (&node.breakdown, node.decision) {
        (Some(lines), Decision::Craft) => {
            for line in lines {
                let quantity = multiplier.saturating_mul(u64::from(line.quantity));
                collect(&line.node, quantity, entries, index);
            }
        }
        _ => {
            if let Some(&idx) = index.get(&node.resource_id) {
                if let Some(entry) = entries.get_mut(idx) {
                    entry.quantity += multiplier;
                }
                return;
            }
            index.insert(node.resource_id.clone(), entries.len());
            entries.push(PurchaseEntry {
                resource_id: node.resource_id.clone(),
                resource: node.resource.clone(),
                quantity: multiplier,
                unit_cost: node.cost,
                total_cost: 0.0,
            });
        }
    }
}
