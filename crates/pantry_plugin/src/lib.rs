//! Plugin registration lifecycle for Pantry.
//!
//! - [`plugin`] - the [`Plugin`] contract and plugin groups
//! - [`registration`] - write-only registration objects, one per phase
//! - [`host`] - [`PluginHost`], which drives phases and sessions
//! - [`catalog`] - the immutable [`Catalog`] of one session
//! - [`runtime`] - [`Runtime`] handles valid for one session
//! - [`phase`] - the [`Phase`] state machine
//! - [`config`] - JSON configuration delivered to plugins
//!
//! # Example
//!
//! ```
//! use pantry_model::{GridSize, Identifier, Ingredient, Recipe, RecipeCategory, Slot, Stack};
//! use pantry_plugin::{CategoryRegistration, Plugin, PluginHost, RecipeRegistration};
//! use pantry_platform::{MutationTable, PlatformCapabilities, PlatformContext};
//! use std::sync::Arc;
//!
//! struct PressPlugin;
//!
//! impl Plugin for PressPlugin {
//!     fn uid(&self) -> Identifier {
//!         Identifier::parse("press:main").unwrap()
//!     }
//!
//!     fn register_categories(&self, registration: &mut CategoryRegistration<'_, '_>) {
//!         let id = Identifier::parse("press:pressing").unwrap();
//!         registration.add_category(RecipeCategory::new(id, "Pressing"));
//!     }
//!
//!     fn register_recipes(&self, registration: &mut RecipeRegistration<'_, '_>) {
//!         let apple = Stack::item(Identifier::vanilla("apple").unwrap());
//!         let juice = Stack::item(Identifier::parse("press:juice").unwrap());
//!         let recipe = Recipe::builder(Identifier::parse("press:pressing").unwrap())
//!             .input(Slot::of(apple))
//!             .grid(GridSize::SINGLE)
//!             .output(Ingredient::from(juice))
//!             .build()
//!             .unwrap();
//!         registration.add_recipe(recipe);
//!     }
//! }
//!
//! let platform = PlatformContext::new(
//!     PlatformCapabilities::vanilla(),
//!     Arc::new(MutationTable::new()),
//! );
//! let mut host = PluginHost::new();
//! host.add_plugins(PressPlugin);
//! host.register(&platform).unwrap();
//!
//! let runtime = host.start_session().unwrap();
//! assert_eq!(runtime.catalog().unwrap().recipe_count(), 1);
//! ```

pub mod catalog;
pub mod config;
pub mod host;
pub mod phase;
pub mod plugin;
pub mod registration;
pub mod runtime;

pub use catalog::{Catalog, GuiRegion, RecipeLookup, RecipeOrder, RecipeTransferInfo};
pub use config::{ConfigError, ConfigManager, LogFormat, LogLevel, LoggingConfig, PantryConfig};
pub use host::{LoadReport, PluginHost};
pub use phase::{Lifecycle, LifecycleError, Phase};
pub use plugin::{Plugin, PluginGroup, PluginGroupBuilder, Plugins, RuntimePlugin};
pub use registration::{
    AdvancedRegistration, CatalystRegistration, CategoryRegistration, GuiHandlerRegistration,
    IngredientRegistration, RecipeRegistration, RecipeTransferRegistration, RuntimeRegistration,
    SubtypeRegistration, VanillaCategoryExtensionRegistration,
};
pub use runtime::{Runtime, RuntimeError};
