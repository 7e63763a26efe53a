//! Display and formatting utilities for Craftmax.
//!
//! This module provides functions for formatting numbers and margins and
//! for printing listings, cost trees, shopping lists and variant rankings.

use std::fmt::Write;
use std::rc::Rc;

use crate::models::{CostNode, Decision};
use crate::purchase::{flatten, purchase_total, PurchaseEntry};
use crate::variants::{best_craft_variant, Variant};

/// Formats a price or cost compactly.
///
/// # Returns
///
/// "1.2M" from one million up, "1.5K" from one thousand up, otherwise the
/// value with at most two decimals and no trailing zeros.
///
/// # Example
///
/// ```
/// use craftmax::display::format_number;
///
/// assert_eq!(format_number(2_300_000.0), "2.3M");
/// assert_eq!(format_number(1500.0), "1.5K");
/// assert_eq!(format_number(22.5), "22.5");
/// assert_eq!(format_number(20.0), "20");
/// ```
pub fn format_number(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude >= 1_000_000.0 {
        return format!("{:.1}M", value / 1_000_000.0);
    }
    if magnitude >= 1_000.0 {
        return format!("{:.1}K", value / 1_000.0);
    }

    let fixed = format!("{:.2}", value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    if trimmed == "-0" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Formats a margin with its percentage, e.g. "+2.5 (11.1%)".
///
/// Negative margins keep their sign: "-1.5 (-11.1%)".
pub fn format_margin(margin: f64, margin_percent: f64) -> String {
    let sign = if margin >= 0.0 { "+" } else { "" };
    format!("{}{} ({:.1}%)", sign, format_number(margin), margin_percent)
}

/// Renders the ingredient tree of `node` as indented text.
///
/// One line per ingredient with quantity, BUY/CRAFT tag and cost
/// contribution. Only crafted ingredients are expanded further.
pub fn render_craft_tree(node: &CostNode) -> String {
    let mut out = String::new();
    render_children(node, 1, &mut out);
    out
}

fn render_children(node: &CostNode, depth: usize, out: &mut String) {
    let prefix = "  ".repeat(depth);
    for line in node.ingredients() {
        let child = &line.node;
        let _ = writeln!(
            out,
            "{}- {} x{} [{}] {}",
            prefix,
            child.name(),
            line.quantity,
            child.decision.tag(),
            format_number(line.total_cost)
        );
        if child.decision == Decision::Craft {
            render_children(child, depth + 1, out);
        }
    }
}

/// Renders a shopping list with a total line.
pub fn render_purchase_list(entries: &[PurchaseEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        let _ = writeln!(
            out,
            "  {:<24} x{:<6} {:>10}",
            entry.name(),
            entry.quantity,
            format_number(entry.total_cost)
        );
    }
    let _ = writeln!(
        out,
        "  {:<32} {:>10}",
        "Total:",
        format_number(purchase_total(entries))
    );
    out
}

/// Prints the all-resources table.
pub fn display_listing(nodes: &[Rc<CostNode>]) {
    println!();
    println!(
        "{:<24} {:<10} {:>10} {:>10} {:>18}",
        "Resource", "Type", "Market", "Cost", "Margin"
    );
    println!("{}", "-".repeat(76));

    for node in nodes {
        let category = node
            .resource
            .as_ref()
            .map_or("?", |r| r.category.label());
        let (cost, margin) = if node.has_craft_path() {
            (
                format_number(node.cost),
                format_margin(node.margin, node.margin_percent),
            )
        } else {
            ("-".to_string(), "no recipe".to_string())
        };
        println!(
            "{:<24} {:<10} {:>10} {:>10} {:>18}",
            node.name(),
            category,
            format_number(node.market_price),
            cost,
            margin
        );
    }
    println!();
}

/// Prints the detail view of one resource.
///
/// Shows prices and margin, the tree and shopping list of the best crafted
/// variant, then up to `limit` ranked variants with #1 tagged optimal.
pub fn display_detail(node: &CostNode, variants: &[Variant], limit: usize) {
    println!();
    println!("+================================================================+");
    println!("  {}", node.name());
    if let Some(resource) = &node.resource {
        println!("  {}", resource.category);
    }
    println!("+================================================================+");
    println!();
    println!("  Market price:     {}", format_number(node.market_price));
    println!("  After tax:        {}", format_number(node.market_price_after_tax));
    if node.has_craft_path() {
        println!("  Optimal cost:     {}", format_number(node.cost));
        println!("  Decision:         {}", node.decision.tag());
        println!("  Margin:           {}", format_margin(node.margin, node.margin_percent));
    }

    let Some(best) = best_craft_variant(variants) else {
        println!();
        println!("  Base resource, no recipe.");
        println!();
        return;
    };

    println!();
    if best.is_buy_only() {
        println!("[OPTIMAL PATH]");
    } else {
        println!("[CRAFT RECIPE]");
    }
    println!("----------------------------------------------------------------");
    print!("{}", render_craft_tree(&best.node));

    println!();
    println!("[SHOPPING LIST]");
    println!("----------------------------------------------------------------");
    print!("{}", render_purchase_list(&flatten(&best.node)));

    if variants.len() > 1 {
        println!();
        println!("[ALL VARIANTS] ({})", variants.len());
        println!("----------------------------------------------------------------");
        for (i, variant) in variants.iter().take(limit).enumerate() {
            println!(
                "  #{:<3} {:<9} cost {:>10}  margin {}",
                i + 1,
                if i == 0 { "OPTIMAL" } else { "" },
                format_number(variant.total_cost()),
                format_margin(variant.margin(), variant.node.margin_percent)
            );
            if variant.is_buy_only() {
                println!("    (buy at market)");
            } else {
                print!("{}", render_craft_tree_indented(&variant.node));
            }
        }
        if variants.len() > limit {
            println!("  ... {} more", variants.len() - limit);
        }
    }
    println!();
}

fn render_craft_tree_indented(node: &CostNode) -> String {
    let mut out = String::new();
    render_children(node, 2, &mut out);
    out
}
