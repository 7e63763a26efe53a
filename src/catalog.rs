//! Lookup indices over the loaded resources and recipes.

use std::collections::HashMap;

use crate::error::CalcError;
use crate::models::{Recipe, Resource};

/// Resources and recipes indexed by identifier.
///
/// Resources keep their load order, which is the order a full pass
/// reports results in.
///
/// # Example
///
/// ```
/// use craftmax::catalog::Catalog;
/// use craftmax::models::{Ingredient, Recipe, Resource, ResourceType};
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
///
/// assert!(catalog.is_craftable("iron_ingot"));
/// assert!(!catalog.is_craftable("iron_ore"));
/// assert!(catalog.validate().is_ok());
/// ```
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    resources: Vec<Resource>,
    resource_index: HashMap<String, usize>,
    recipes: HashMap<String, Recipe>,
}

impl Catalog {
    /// Builds the indices.
    ///
    /// A duplicate resource id keeps the first record; a duplicate recipe
    /// output keeps the last recipe.
    pub fn new(resources: Vec<Resource>, recipes: Vec<Recipe>) -> Self {
        let mut kept = Vec::with_capacity(resources.len());
        let mut resource_index = HashMap::with_capacity(resources.len());
        for resource in resources {
            if resource_index.contains_key(&resource.id) {
                tracing::warn!(resource_id = %resource.id, "duplicate resource id, keeping first");
                continue;
            }
            resource_index.insert(resource.id.clone(), kept.len());
            kept.push(resource);
        }

        let mut recipe_index = HashMap::with_capacity(recipes.len());
        for recipe in recipes {
            let output = recipe.output.clone();
            if recipe_index.insert(output.clone(), recipe).is_some() {
                tracing::warn!(output = %output, "duplicate recipe output, keeping last");
            }
        }

        Catalog {
            resources: kept,
            resource_index,
            recipes: recipe_index,
        }
    }

    /// All resources in load order.
    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn resource(&self, id: &str) -> Option<&Resource> {
        self.resource_index
            .get(id)
            .and_then(|&idx| self.resources.get(idx))
    }

    pub fn recipe(&self, id: &str) -> Option<&Recipe> {
        self.recipes.get(id)
    }

    /// Whether `id` has a recipe.
    pub fn is_craftable(&self, id: &str) -> bool {
        self.recipes.contains_key(id)
    }

    pub fn recipe_count(&self) -> usize {
        self.recipes.len()
    }

    /// Lists every recipe reference that does not resolve to a known resource.
    ///
    /// Results are sorted by recipe output so the report is stable.
    pub fn dangling_references(&self) -> Vec<CalcError> {
        let mut outputs: Vec<&Recipe> = self.recipes.values().collect();
        outputs.sort_by(|a, b| a.output.cmp(&b.output));

        let mut problems = Vec::new();
        for recipe in outputs {
            if self.resource(&recipe.output).is_none() {
                problems.push(CalcError::UnknownRecipeOutput(recipe.output.clone()));
            }
            for ingredient in &recipe.ingredients {
                if self.resource(&ingredient.id).is_none() {
                    problems.push(CalcError::UnknownIngredient {
                        output: recipe.output.clone(),
                        ingredient: ingredient.id.clone(),
                    });
                }
            }
        }
        problems
    }

    /// Fails with the first dangling reference, if any.
    pub fn validate(&self) -> Result<(), CalcError> {
        match self.dangling_references().into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
