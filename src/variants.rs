//! Enumeration of every buy/craft combination for one resource.
//!
//! Where the resolver keeps the single cheapest decision per resource, the
//! enumerator reports every distinct decision combination over the
//! ingredient subtree, ranked by margin, so a simpler but slightly worse
//! path can still be chosen.

use std::collections::{BTreeMap, HashSet, VecDeque};
use std::rc::Rc;

use crate::catalog::Catalog;
use crate::error::CalcError;
use crate::models::{CostNode, Decision, IngredientCost, PriceTable, TaxRate};

/// Decision per craftable resource of a subtree, root excluded.
///
/// Holds exactly the craftable resources present in the tree it describes.
/// Ordered keys make equality and hashing independent of insertion order.
pub type DecisionSet = BTreeMap<String, Decision>;

/// One acquisition strategy for the enumerated resource.
#[derive(Debug, Clone, PartialEq)]
pub struct Variant {
    /// Decisions that produced this tree (empty for the buy-only variant)
    pub decisions: DecisionSet,
    /// Cost tree rebuilt under `decisions`
    pub node: CostNode,
}

impl Variant {
    pub fn total_cost(&self) -> f64 {
        self.node.cost
    }

    pub fn margin(&self) -> f64 {
        self.node.margin
    }

    /// Whether the root itself is bought rather than crafted.
    pub fn is_buy_only(&self) -> bool {
        self.node.decision == Decision::Buy
    }
}

/// Lists every distinct buy/craft strategy for `resource_id`, best margin first.
///
/// Returns an empty list for base resources. The number of variants grows as
/// `2^n` in the distinct craftable resources of the subtree.
///
/// # Example
///
/// ```
/// use craftmax::catalog::Catalog;
/// use craftmax::models::{Ingredient, PriceTable, Recipe, Resource, ResourceType, TaxRate};
/// use craftmax::variants::enumerate_variants;
///
/// let res = |id: &str, category| Resource { id: id.into(), name: id.into(), category, image: None };
/// let catalog = Catalog::new(
///     vec![res("ore", ResourceType::Mining), res("ingot", ResourceType::Crafting)],
///     vec![Recipe { output: "ingot".into(), ingredients: vec![Ingredient { id: "ore".into(), quantity: 2 }] }],
/// );
/// let prices: PriceTable = [("ore".to_string(), 10.0), ("ingot".to_string(), 25.0)].into_iter().collect();
///
/// let variants = enumerate_variants("ingot", &catalog, &prices, TaxRate::ZERO).unwrap();
///
/// // crafting (cost 20) beats buying (cost 25)
/// assert_eq!(variants.len(), 2);
/// assert_eq!(variants[0].total_cost(), 20.0);
/// assert!(variants[1].is_buy_only());
/// ```
pub fn enumerate_variants(
    resource_id: &str,
    catalog: &Catalog,
    prices: &PriceTable,
    tax_rate: TaxRate,
) -> Result<Vec<Variant>, CalcError> {
    Enumerator {
        catalog,
        prices,
        tax_rate,
    }
    .enumerate(resource_id)
}

/// Picks the variant a detail view shows by default: the best crafted
/// variant, or the first one when every variant buys the root.
pub fn best_craft_variant(variants: &[Variant]) -> Option<&Variant> {
    variants
        .iter()
        .find(|v| !v.is_buy_only())
        .or_else(|| variants.first())
}

struct Enumerator<'a> {
    catalog: &'a Catalog,
    prices: &'a PriceTable,
    tax_rate: TaxRate,
}

impl Enumerator<'_> {
    fn enumerate(&self, resource_id: &str) -> Result<Vec<Variant>, CalcError> {
        if !self.catalog.is_craftable(resource_id) {
            return Ok(Vec::new());
        }

        self.check_acyclic(resource_id, &mut Vec::new(), &mut HashSet::new())?;

        let mut sets = Vec::new();
        self.decision_sets(
            DecisionSet::new(),
            VecDeque::from(self.craftable_ingredients(resource_id)),
            &mut sets,
        );
        let generated = sets.len();

        let mut path = Vec::new();
        let mut seen: HashSet<DecisionSet> = HashSet::with_capacity(sets.len());
        let mut variants = Vec::with_capacity(sets.len() + 1);
        for decisions in sets {
            if !seen.insert(decisions.clone()) {
                continue;
            }
            let node = self.build(resource_id, Decision::Craft, &decisions, &mut path)?;
            variants.push(Variant { decisions, node });
        }

        let decisions = DecisionSet::new();
        let node = self.build(resource_id, Decision::Buy, &decisions, &mut path)?;
        variants.push(Variant { decisions, node });

        // stable: equal margins keep generation order
        variants.sort_by(|a, b| b.margin().total_cmp(&a.margin()));

        tracing::debug!(
            resource_id,
            generated,
            variants = variants.len(),
            "enumerated variants"
        );
        Ok(variants)
    }

    fn craftable_ingredients(&self, id: &str) -> Vec<String> {
        self.catalog
            .recipe(id)
            .map(|recipe| {
                recipe
                    .ingredients
                    .iter()
                    .filter(|ingredient| self.catalog.is_craftable(&ingredient.id))
                    .map(|ingredient| ingredient.id.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Fails on the first recipe chain below `id` that reaches itself.
    fn check_acyclic(
        &self,
        id: &str,
        path: &mut Vec<String>,
        done: &mut HashSet<String>,
    ) -> Result<(), CalcError> {
        if path.iter().any(|p| p == id) {
            return Err(CalcError::cyclic(path, id));
        }
        if done.contains(id) {
            return Ok(());
        }

        path.push(id.to_string());
        for ingredient in self.craftable_ingredients(id) {
            self.check_acyclic(&ingredient, path, done)?;
        }
        path.pop();
        done.insert(id.to_string());
        Ok(())
    }

    /// Branches buy/craft on every craftable resource reachable under the
    /// decisions taken so far.
    ///
    /// `pending` holds resources whose crafted parent is already decided.
    /// Each resource is decided once, wherever it is first reached, and a
    /// crafted one queues its own craftable ingredients. Every emitted set
    /// therefore names exactly the craftable resources its tree contains.
    fn decision_sets(
        &self,
        decisions: DecisionSet,
        mut pending: VecDeque<String>,
        out: &mut Vec<DecisionSet>,
    ) {
        let next = loop {
            match pending.pop_front() {
                Some(id) if decisions.contains_key(&id) => continue,
                other => break other,
            }
        };
        let Some(id) = next else {
            out.push(decisions);
            return;
        };

        let mut bought = decisions.clone();
        bought.insert(id.clone(), Decision::Buy);
        self.decision_sets(bought, pending.clone(), out);

        let mut crafted = decisions;
        pending.extend(self.craftable_ingredients(&id));
        crafted.insert(id, Decision::Craft);
        self.decision_sets(crafted, pending, out);
    }

    /// Rebuilds the cost tree with every decision fixed by `decisions`.
    ///
    /// Base resources are always leaves; craftable resources absent from the
    /// set are bought.
    fn build(
        &self,
        id: &str,
        decision: Decision,
        decisions: &DecisionSet,
        path: &mut Vec<String>,
    ) -> Result<CostNode, CalcError> {
        let resource = self.catalog.resource(id).cloned();
        let market_price = self.prices.price(id);
        let recipe = self.catalog.recipe(id);

        let Some(recipe) = recipe.filter(|_| decision == Decision::Craft) else {
            return Ok(CostNode::leaf(
                id,
                resource,
                market_price,
                self.tax_rate,
                recipe.is_some(),
            ));
        };

        if path.iter().any(|p| p == id) {
            return Err(CalcError::cyclic(path, id));
        }
        path.push(id.to_string());

        let mut breakdown = Vec::with_capacity(recipe.ingredients.len());
        let mut craft_cost = 0.0;
        for ingredient in &recipe.ingredients {
            let child_decision = decisions
                .get(&ingredient.id)
                .copied()
                .unwrap_or(Decision::Buy);
            let child = self.build(&ingredient.id, child_decision, decisions, path)?;
            let total_cost = child.cost * f64::from(ingredient.quantity);
            craft_cost += total_cost;
            breakdown.push(IngredientCost {
                quantity: ingredient.quantity,
                total_cost,
                node: Rc::new(child),
            });
        }
        path.pop();

        Ok(CostNode::with_breakdown(
            id,
            resource,
            market_price,
            self.tax_rate,
            Decision::Craft,
            craft_cost,
            breakdown,
        ))
    }
}
