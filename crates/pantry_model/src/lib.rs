//! Canonical ingredient and recipe model for Pantry.
//!
//! This crate is the leaf of the workspace. It defines the platform-independent
//! types every other layer speaks:
//!
//! - [`Identifier`] - namespaced `namespace:path` names
//! - [`Stack`] - a concrete amount of one typed variant, with [`AuxData`]
//! - [`Ingredient`] - exact, subtype-aware, or synthetic matchers over stacks
//! - [`Recipe`] - categorized inputs, outputs, and an optional catalyst
//! - [`SmithingRecipeView`] and [`BrewingRecipe`] - specialized shapes that
//!   normalize into [`Recipe`]
//! - [`IngredientManager`] - registered kinds and subtype interpreters
//! - [`Diagnostics`] - non-fatal problems recorded along the way
//!
//! # Architecture
//!
//! - **Model** (`pantry_model`): canonical data (this crate)
//! - **Platform** (`pantry_platform`): native recipe normalization
//! - **Lifecycle** (`pantry_plugin`): plugin registration phases and runtime

pub mod diagnostic;
pub mod identifier;
pub mod ingredient;
pub mod manager;
pub mod recipe;
pub mod stack;

pub use diagnostic::{Diagnostic, DiagnosticKind, Diagnostics};
pub use identifier::{Identifier, IdentifierError};
pub use ingredient::{
    AuxEntryInterpreter, AuxKey, Ingredient, Slot, SubtypeInterpreter, SubtypedStack,
    SyntheticIngredient,
};
pub use manager::{IngredientError, IngredientManager};
pub use recipe::{
    BrewingRecipe, GridSize, Recipe, RecipeBuilder, RecipeCategory, RecipeError,
    SmithingRecipeView, category_ids,
};
pub use stack::{AuxData, DyeColor, IngredientKind, Stack};
