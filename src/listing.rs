//! Filtering and ordering of a resolved pass for list views.

use std::rc::Rc;

use crate::models::{CostNode, ResourceType};

/// Sort order for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum SortKey {
    /// Highest margin first
    #[default]
    MarginDesc,
    MarginAsc,
    /// Most expensive first
    PriceDesc,
    PriceAsc,
    /// Alphabetical by display name
    NameAsc,
}

/// Search, category filter and sort applied to a list of cost nodes.
#[derive(Debug, Clone, Default)]
pub struct ListingQuery {
    /// Case-insensitive substring of the display name
    pub search: Option<String>,
    /// Only resources of this category
    pub category: Option<ResourceType>,
    pub sort: SortKey,
}

impl ListingQuery {
    /// Whether `node` passes the search and category filters.
    ///
    /// Nodes without a resource record only match an unfiltered query.
    pub fn matches(&self, node: &CostNode) -> bool {
        let search = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        if search.is_none() && self.category.is_none() {
            return true;
        }
        let Some(resource) = &node.resource else {
            return false;
        };

        let matches_search = search.map_or(true, |term| {
            resource.name.to_lowercase().contains(&term.to_lowercase())
        });
        let matches_category = self.category.map_or(true, |c| resource.category == c);
        matches_search && matches_category
    }

    /// Returns the matching nodes in the requested order (stable).
    pub fn apply(&self, nodes: &[Rc<CostNode>]) -> Vec<Rc<CostNode>> {
        let mut selected: Vec<Rc<CostNode>> = nodes
            .iter()
            .filter(|node| self.matches(node))
            .cloned()
            .collect();

        match self.sort {
            SortKey::MarginDesc => selected.sort_by(|a, b| b.margin.total_cmp(&a.margin)),
            SortKey::MarginAsc => selected.sort_by(|a, b| a.margin.total_cmp(&b.margin)),
            SortKey::PriceDesc => {
                selected.sort_by(|a, b| b.market_price.total_cmp(&a.market_price))
            }
            SortKey::PriceAsc => selected.sort_by(|a, b| a.market_price.total_cmp(&b.market_price)),
            SortKey::NameAsc => {
                selected.sort_by_cached_key(|node| node.name().to_lowercase());
            }
        }
        selected
    }
}
