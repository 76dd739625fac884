//! # Pantry Internal Library
//!
//! Re-exports the Pantry crates for convenience.

/// Canonical ingredient and recipe model.
pub use pantry_model;

/// Native recipe normalization.
pub use pantry_platform;

/// Plugin registration lifecycle, catalog and runtime.
pub use pantry_plugin;

/// Built-in plugins.
pub use pantry_core_plugins;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use pantry_core_plugins::{DefaultPlugins, TracingPlugin, VanillaPlugin};
    pub use pantry_model::{
        GridSize, Identifier, Ingredient, IngredientKind, Recipe, RecipeCategory, Slot, Stack,
        category_ids,
    };
    pub use pantry_platform::{NativeRecipes, PlatformCapabilities, PlatformContext};
    pub use pantry_plugin::{
        Catalog, ConfigManager, Plugin, PluginGroup, PluginHost, RecipeOrder, Runtime,
        RuntimePlugin,
    };
}
