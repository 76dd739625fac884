//! Native recipe normalization for Pantry.
//!
//! The host hands over recipes in its own shapes ([`NativeRecipes`]) and
//! exposes brewing only as a [`PotionMutationTable`]. This crate turns both
//! into canonical [`Recipe`](pantry_model::Recipe)s:
//!
//! - [`RecipeNormalizer`] implements [`PlatformRecipeHelper`] and converts
//!   whole crafting and smithing recipes
//! - [`IngredientHelper`] implements [`PlatformIngredientHelper`] for
//!   synthetic and subtype-aware ingredients
//! - [`VanillaRecipeFactory`] builds brewing steps for plugins
//! - [`PlatformContext`] bundles the above for the plugin lifecycle
//!
//! Capabilities are detected once ([`PlatformCapabilities`]) and fixed for
//! the lifetime of the context.

pub mod factory;
pub mod host;
pub mod ingredient_helper;
pub mod native;
pub mod normalizer;
pub mod platform;
pub mod vanilla;

pub use factory::{DefaultRecipeFactory, VanillaRecipeFactory};
pub use host::{
    FluidHelper, HostError, MutationRule, MutationTable, PlatformFluidHelper, PotionMutationTable,
};
pub use ingredient_helper::{
    ContainerSet, IngredientHelper, PlatformCapabilities, PlatformIngredientHelper,
};
pub use native::{
    CraftingKind, NativeCraftingRecipe, NativeIngredient, NativeRecipes, NativeSmithingRecipe,
};
pub use normalizer::{
    CraftingExtension, CraftingExtensions, CraftingLayout, ExtensionError, NormalizeError,
    NormalizeOptions, NormalizedRecipes, PlatformRecipeHelper, RecipeNormalizer,
};
pub use platform::PlatformContext;
