//! Tests for listing filters and sort orders.

use std::rc::Rc;

use craftmax::catalog::Catalog;
use craftmax::listing::{ListingQuery, SortKey};
use craftmax::models::{CostNode, Ingredient, PriceTable, Recipe, Resource, ResourceType, TaxRate};
use craftmax::resolver::resolve_all;

fn resource(id: &str, name: &str, category: ResourceType) -> Resource {
    Resource {
        id: id.to_string(),
        name: name.to_string(),
        category,
        image: None,
    }
}

fn market_nodes() -> Vec<Rc<CostNode>> {
    let catalog = Catalog::new(
        vec![
            resource("iron_ore", "Iron Ore", ResourceType::Mining),
            resource("iron_ingot", "Iron Ingot", ResourceType::Crafting),
            resource("carp", "Carp", ResourceType::Fishing),
            resource("wood", "Wood", ResourceType::Gathering),
            resource("plank", "Plank", ResourceType::Crafting),
        ],
        vec![
            Recipe {
                output: "iron_ingot".to_string(),
                ingredients: vec![Ingredient { id: "iron_ore".to_string(), quantity: 2 }],
            },
            Recipe {
                output: "plank".to_string(),
                ingredients: vec![Ingredient { id: "wood".to_string(), quantity: 3 }],
            },
        ],
    );
    let prices: PriceTable = [
        ("iron_ore", 10.0),
        ("iron_ingot", 25.0),
        ("carp", 30.0),
        ("wood", 5.0),
        ("plank", 18.0),
    ]
    .into_iter()
    .map(|(id, p)| (id.to_string(), p))
    .collect();

    resolve_all(&catalog, &prices, TaxRate::ZERO)
}

fn ids(nodes: &[Rc<CostNode>]) -> Vec<&str> {
    nodes.iter().map(|n| n.resource_id.as_str()).collect()
}

fn sorted(sort: SortKey) -> Vec<String> {
    let query = ListingQuery {
        sort,
        ..Default::default()
    };
    ids(&query.apply(&market_nodes()))
        .into_iter()
        .map(String::from)
        .collect()
}

#[test]
fn test_default_query_keeps_everything() {
    let nodes = market_nodes();
    let listed = ListingQuery::default().apply(&nodes);
    assert_eq!(listed.len(), nodes.len());
}

#[test]
fn test_sort_by_margin() {
    assert_eq!(
        sorted(SortKey::MarginDesc),
        vec!["iron_ingot", "plank", "iron_ore", "carp", "wood"]
    );
    assert_eq!(
        sorted(SortKey::MarginAsc),
        vec!["iron_ore", "carp", "wood", "plank", "iron_ingot"]
    );
}

#[test]
fn test_sort_by_price() {
    assert_eq!(
        sorted(SortKey::PriceDesc),
        vec!["carp", "iron_ingot", "plank", "iron_ore", "wood"]
    );
    assert_eq!(
        sorted(SortKey::PriceAsc),
        vec!["wood", "iron_ore", "plank", "iron_ingot", "carp"]
    );
}

#[test]
fn test_sort_by_name() {
    assert_eq!(
        sorted(SortKey::NameAsc),
        vec!["carp", "iron_ingot", "iron_ore", "plank", "wood"]
    );
}

#[test]
fn test_search_is_case_insensitive() {
    let nodes = market_nodes();
    let query = ListingQuery {
        search: Some("IRON".to_string()),
        sort: SortKey::NameAsc,
        ..Default::default()
    };
    assert_eq!(ids(&query.apply(&nodes)), vec!["iron_ingot", "iron_ore"]);
}

#[test]
fn test_blank_search_matches_all() {
    let nodes = market_nodes();
    let query = ListingQuery {
        search: Some("   ".to_string()),
        ..Default::default()
    };
    assert_eq!(query.apply(&nodes).len(), nodes.len());
}

#[test]
fn test_category_filter() {
    let nodes = market_nodes();
    let crafted = ListingQuery {
        category: Some(ResourceType::Crafting),
        ..Default::default()
    };
    assert_eq!(ids(&crafted.apply(&nodes)), vec!["iron_ingot", "plank"]);

    let mined_iron = ListingQuery {
        search: Some("iron".to_string()),
        category: Some(ResourceType::Mining),
        ..Default::default()
    };
    assert_eq!(ids(&mined_iron.apply(&nodes)), vec!["iron_ore"]);
}
