//! Error types for cost resolution and variant enumeration.

use thiserror::Error;

/// Errors produced by the calculation core.
///
/// Missing prices and unknown resources are not errors: they degrade to a
/// zero price and an absent [`Resource`](crate::models::Resource).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    /// A craftable resource requires itself, directly or transitively.
    #[error("cyclic recipe at {resource_id}: {}", .path.join(" -> "))]
    CyclicRecipe {
        /// The resource that was reached a second time
        resource_id: String,
        /// Resources on the recursion path, ending with `resource_id`
        path: Vec<String>,
    },

    /// Tax rate outside `[0, 1)`.
    #[error("tax rate {0} is outside [0, 1)")]
    InvalidTaxRate(f64),

    /// A recipe lists an ingredient that is not a known resource.
    #[error("recipe for {output} references unknown resource {ingredient}")]
    UnknownIngredient {
        /// Recipe output identifier
        output: String,
        /// The unresolved ingredient identifier
        ingredient: String,
    },

    /// A recipe produces an identifier that is not a known resource.
    #[error("recipe output {0} is not a known resource")]
    UnknownRecipeOutput(String),
}

impl CalcError {
    pub(crate) fn cyclic(path: &[String], resource_id: &str) -> Self {
        let mut path = path.to_vec();
        path.push(resource_id.to_string());
        CalcError::CyclicRecipe {
            resource_id: resource_id.to_string(),
            path,
        }
    }
}
