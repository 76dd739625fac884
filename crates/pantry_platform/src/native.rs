//! Native recipe shapes as the host hands them over.
//!
//! These are plain data: the per-platform glue that reads the host's
//! registries fills them in, and the [`RecipeNormalizer`](crate::RecipeNormalizer)
//! turns them into canonical [`Recipe`](pantry_model::Recipe)s.

use pantry_model::{GridSize, Identifier, Stack};
use serde::{Deserialize, Serialize};

/// A host ingredient: any of the listed stacks. Empty means a blank cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NativeIngredient(pub Vec<Stack>);

impl NativeIngredient {
    /// A blank cell.
    #[must_use]
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// An ingredient accepting exactly one stack.
    #[must_use]
    pub fn of(stack: Stack) -> Self {
        Self(vec![stack])
    }

    /// Returns true for a blank cell.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// How a crafting recipe matches its inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CraftingKind {
    /// Position-sensitive grid.
    Shaped,
    /// Position-insensitive; the grid is for display only.
    Shapeless,
    /// Plugin-defined mechanics, laid out by a crafting extension.
    Custom(Identifier),
}

/// A crafting-table recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCraftingRecipe {
    /// Recipe id.
    pub id: Identifier,
    /// Matching mechanics.
    pub kind: CraftingKind,
    /// Grid size the host declares, if any.
    #[serde(default)]
    pub declared_size: Option<GridSize>,
    /// Slot-ordered ingredients, row-major.
    pub ingredients: Vec<NativeIngredient>,
    /// Produced stack.
    pub result: Stack,
}

/// A smithing-table recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeSmithingRecipe {
    /// Recipe id.
    pub id: Identifier,
    /// Smithing template slot.
    pub template: NativeIngredient,
    /// Item being upgraded or decorated.
    pub base: NativeIngredient,
    /// Material added to the base.
    pub addition: NativeIngredient,
    /// Produced stack.
    pub result: Stack,
    /// Whether the host flags the recipe as mechanically supported.
    pub supported: bool,
}

/// Everything the host exposes about its recipes and item list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeRecipes {
    /// All known item stacks (one per variant).
    #[serde(default)]
    pub items: Vec<Stack>,
    /// Crafting-table recipes.
    #[serde(default)]
    pub crafting: Vec<NativeCraftingRecipe>,
    /// Smithing-table recipes.
    #[serde(default)]
    pub smithing: Vec<NativeSmithingRecipe>,
}

impl NativeRecipes {
    /// Parses a JSON dump of the host's recipes.
    ///
    /// # Errors
    ///
    /// Returns the JSON error for malformed input.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
