//! Tests for buy/craft variant enumeration.

use std::collections::HashSet;

use craftmax::catalog::Catalog;
use craftmax::error::CalcError;
use craftmax::models::{Decision, Ingredient, PriceTable, Recipe, Resource, ResourceType, TaxRate};
use craftmax::variants::{best_craft_variant, enumerate_variants, DecisionSet, Variant};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

fn resource(id: &str, category: ResourceType) -> Resource {
    Resource {
        id: id.to_string(),
        name: id.to_string(),
        category,
        image: None,
    }
}

fn recipe(output: &str, ingredients: &[(&str, u32)]) -> Recipe {
    Recipe {
        output: output.to_string(),
        ingredients: ingredients
            .iter()
            .map(|(id, quantity)| Ingredient {
                id: id.to_string(),
                quantity: *quantity,
            })
            .collect(),
    }
}

fn prices(entries: &[(&str, f64)]) -> PriceTable {
    entries.iter().map(|(id, p)| (id.to_string(), *p)).collect()
}

fn smithy_catalog() -> Catalog {
    Catalog::new(
        vec![
            resource("iron_ore", ResourceType::Mining),
            resource("coal", ResourceType::Mining),
            resource("wood", ResourceType::Gathering),
            resource("iron_ingot", ResourceType::Crafting),
            resource("tool", ResourceType::Crafting),
            resource("steel", ResourceType::Crafting),
            resource("sword", ResourceType::Crafting),
            resource("double", ResourceType::Crafting),
        ],
        vec![
            recipe("iron_ingot", &[("iron_ore", 2)]),
            recipe("tool", &[("iron_ingot", 1), ("wood", 1)]),
            recipe("steel", &[("iron_ingot", 2), ("coal", 1)]),
            recipe("sword", &[("steel", 1), ("iron_ingot", 1)]),
            recipe("double", &[("iron_ingot", 1), ("iron_ingot", 1)]),
        ],
    )
}

fn smithy_prices() -> PriceTable {
    prices(&[
        ("iron_ore", 10.0),
        ("coal", 3.0),
        ("wood", 5.0),
        ("iron_ingot", 25.0),
        ("tool", 40.0),
        ("steel", 60.0),
        ("sword", 120.0),
        ("double", 60.0),
    ])
}

fn decision_of(variant: &Variant, id: &str) -> Option<Decision> {
    variant.decisions.get(id).copied()
}

#[test]
fn test_base_resource_has_no_variants() {
    let catalog = smithy_catalog();
    let prices = smithy_prices();

    let variants = enumerate_variants("iron_ore", &catalog, &prices, TaxRate::ZERO).unwrap();
    assert!(variants.is_empty());
}

#[test]
fn test_tool_variants_ranked_by_margin() {
    let catalog = smithy_catalog();
    let prices = smithy_prices();
    let tax = TaxRate::new(0.1).unwrap();

    let variants = enumerate_variants("tool", &catalog, &prices, tax).unwrap();
    assert_eq!(variants.len(), 3);

    // all-craft: 2*10 + 5
    assert_eq!(decision_of(&variants[0], "iron_ingot"), Some(Decision::Craft));
    assert!(approx(variants[0].total_cost(), 25.0));
    assert!(approx(variants[0].margin(), 36.0 - 25.0));

    // ingot bought: 25 + 5
    assert_eq!(decision_of(&variants[1], "iron_ingot"), Some(Decision::Buy));
    assert!(approx(variants[1].total_cost(), 30.0));

    // root bought
    assert!(variants[2].is_buy_only());
    assert!(variants[2].decisions.is_empty());
    assert!(approx(variants[2].total_cost(), 40.0));
    assert!(approx(variants[2].margin(), -4.0));
}

#[test]
fn test_margins_are_consistent_and_sorted() {
    let catalog = smithy_catalog();
    let prices = smithy_prices();
    let tax = TaxRate::new(0.15).unwrap();

    let variants = enumerate_variants("sword", &catalog, &prices, tax).unwrap();
    let after_tax = 120.0 * 0.85;

    for variant in &variants {
        assert!(approx(variant.node.market_price_after_tax, after_tax));
        assert!(approx(variant.margin(), after_tax - variant.total_cost()));
    }
    for pair in variants.windows(2) {
        assert!(pair[0].margin() >= pair[1].margin());
    }
}

#[test]
fn test_shared_resource_expanded_once_and_deduplicated() {
    let catalog = smithy_catalog();
    let prices = smithy_prices();

    let variants = enumerate_variants("sword", &catalog, &prices, TaxRate::ZERO).unwrap();

    // steel x iron_ingot choices, plus buying the sword outright
    assert_eq!(variants.len(), 5);

    let crafted: Vec<&Variant> = variants.iter().filter(|v| !v.is_buy_only()).collect();
    let distinct: HashSet<_> = crafted.iter().map(|v| v.decisions.clone()).collect();
    assert_eq!(distinct.len(), crafted.len());

    // steel crafted, ingot crafted: (2*20 + 3) + 20
    let cheapest = &variants[0];
    assert_eq!(decision_of(cheapest, "steel"), Some(Decision::Craft));
    assert_eq!(decision_of(cheapest, "iron_ingot"), Some(Decision::Craft));
    assert!(approx(cheapest.total_cost(), 63.0));
}

fn relay_catalog() -> Catalog {
    // a and b share c, which has its own craftable ingredient d
    Catalog::new(
        vec![
            resource("ore", ResourceType::Mining),
            resource("d", ResourceType::Crafting),
            resource("c", ResourceType::Crafting),
            resource("a", ResourceType::Crafting),
            resource("b", ResourceType::Crafting),
            resource("r", ResourceType::Crafting),
        ],
        vec![
            recipe("r", &[("a", 1), ("b", 1)]),
            recipe("a", &[("c", 1)]),
            recipe("b", &[("c", 1)]),
            recipe("c", &[("d", 1)]),
            recipe("d", &[("ore", 1)]),
        ],
    )
}

fn decisions(entries: &[(&str, Decision)]) -> DecisionSet {
    entries.iter().map(|(id, d)| (id.to_string(), *d)).collect()
}

#[test]
fn test_shared_resource_with_craftable_ingredient() {
    let catalog = relay_catalog();
    let prices = prices(&[
        ("ore", 1.0),
        ("d", 100.0),
        ("c", 100.0),
        ("a", 100.0),
        ("b", 100.0),
        ("r", 1000.0),
    ]);

    let variants = enumerate_variants("r", &catalog, &prices, TaxRate::ZERO).unwrap();

    // a, b both bought: 1; otherwise c bought, or c crafted with d bought or
    // crafted: 3 for each of the other 3 (a, b) pairs; plus buying r
    assert_eq!(variants.len(), 11);

    for (i, first) in variants.iter().enumerate() {
        for second in &variants[i + 1..] {
            assert_ne!(first.node, second.node);
            assert_ne!(first.decisions, second.decisions);
        }
    }

    let mixed = variants
        .iter()
        .find(|v| {
            v.decisions
                == decisions(&[
                    ("a", Decision::Buy),
                    ("b", Decision::Craft),
                    ("c", Decision::Craft),
                    ("d", Decision::Craft),
                ])
        })
        .expect("buy a, craft the rest");
    assert!(approx(mixed.total_cost(), 101.0));

    assert!(approx(variants[0].total_cost(), 2.0));
    assert!(variants.iter().all(|v| !v.decisions.contains_key("r")));
}

#[test]
fn test_decisions_only_name_resources_in_the_tree() {
    let catalog = relay_catalog();
    let prices = prices(&[("ore", 1.0), ("d", 5.0), ("c", 10.0), ("a", 20.0), ("b", 20.0), ("r", 100.0)]);

    let variants = enumerate_variants("r", &catalog, &prices, TaxRate::ZERO).unwrap();

    let both_bought = decisions(&[("a", Decision::Buy), ("b", Decision::Buy)]);
    assert!(variants.iter().any(|v| v.decisions == both_bought));

    for variant in variants.iter().filter(|v| !v.is_buy_only()) {
        if variant.decisions.get("c") == Some(&Decision::Buy) {
            assert!(!variant.decisions.contains_key("d"));
        }
    }
}

#[test]
fn test_repeated_ingredient_line_deduplicates_decision_sets() {
    let catalog = smithy_catalog();
    let prices = smithy_prices();

    let variants = enumerate_variants("double", &catalog, &prices, TaxRate::ZERO).unwrap();

    // {ingot: craft}, {ingot: buy}, buy-only
    assert_eq!(variants.len(), 3);
    assert!(approx(variants[0].total_cost(), 40.0));
    assert!(approx(variants[1].total_cost(), 50.0));
    assert!(variants[2].is_buy_only());
}

#[test]
fn test_bought_craftable_ingredient_is_a_leaf() {
    let catalog = smithy_catalog();
    let prices = smithy_prices();

    let variants = enumerate_variants("tool", &catalog, &prices, TaxRate::ZERO).unwrap();
    let bought = variants
        .iter()
        .find(|v| decision_of(v, "iron_ingot") == Some(Decision::Buy))
        .unwrap();
    let ingot = &bought.node.ingredients()[0].node;

    assert_eq!(ingot.decision, Decision::Buy);
    assert!(ingot.breakdown.is_none());
    assert_eq!(ingot.cost, 25.0);

    let crafted = &variants[0].node.ingredients()[0].node;
    assert_eq!(crafted.decision, Decision::Craft);
    assert_eq!(crafted.cost, 20.0);
}

#[test]
fn test_crafted_variant_may_cost_more_than_market() {
    let catalog = smithy_catalog();
    let mut prices = smithy_prices();
    prices.set("iron_ingot", 12.0);

    let variants = enumerate_variants("iron_ingot", &catalog, &prices, TaxRate::ZERO).unwrap();

    // crafting is forced even though it is the worse option
    assert_eq!(variants.len(), 2);
    assert!(variants[0].is_buy_only());
    assert_eq!(variants[1].node.decision, Decision::Craft);
    assert!(approx(variants[1].total_cost(), 20.0));
    assert!(approx(variants[1].margin(), -8.0));
}

#[test]
fn test_equal_margins_keep_generation_order() {
    let catalog = smithy_catalog();
    let mut prices = smithy_prices();
    prices.set("iron_ingot", 20.0);
    prices.set("tool", 25.0);

    let variants = enumerate_variants("tool", &catalog, &prices, TaxRate::ZERO).unwrap();

    assert_eq!(variants.len(), 3);
    assert_eq!(decision_of(&variants[0], "iron_ingot"), Some(Decision::Buy));
    assert_eq!(decision_of(&variants[1], "iron_ingot"), Some(Decision::Craft));
    assert!(variants[2].is_buy_only());
}

#[test]
fn test_best_craft_variant_skips_buy_only() {
    let catalog = smithy_catalog();
    let mut prices = smithy_prices();
    prices.set("tool", 10.0);

    let variants = enumerate_variants("tool", &catalog, &prices, TaxRate::ZERO).unwrap();
    assert!(variants[0].is_buy_only());

    let shown = best_craft_variant(&variants).unwrap();
    assert!(!shown.is_buy_only());
    assert!(approx(shown.total_cost(), 25.0));

    assert!(best_craft_variant(&[]).is_none());
}

#[test]
fn test_cyclic_recipe_aborts_enumeration() {
    let catalog = Catalog::new(
        vec![
            resource("a", ResourceType::Crafting),
            resource("b", ResourceType::Crafting),
        ],
        vec![recipe("a", &[("b", 1)]), recipe("b", &[("a", 2)])],
    );
    let prices = prices(&[("a", 10.0), ("b", 10.0)]);

    let err = enumerate_variants("a", &catalog, &prices, TaxRate::ZERO).unwrap_err();
    assert!(matches!(err, CalcError::CyclicRecipe { ref resource_id, .. } if resource_id == "a"));
}
