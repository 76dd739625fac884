//! Built-in plugins for Pantry.
//!
//! - [`VanillaPlugin`] - the host's crafting, smithing and brewing recipes
//! - [`TracingPlugin`] - logging via the `tracing` crate
//! - [`DefaultPlugins`] - both of the above
//!
//! # Example
//!
//! ```
//! use pantry_core_plugins::DefaultPlugins;
//! use pantry_platform::{MutationTable, NativeRecipes, PlatformCapabilities, PlatformContext};
//! use pantry_plugin::{PluginGroup, PluginHost};
//! use std::sync::Arc;
//!
//! let platform = PlatformContext::new(
//!     PlatformCapabilities::vanilla(),
//!     Arc::new(MutationTable::new()),
//! );
//! let mut host = PluginHost::new();
//! host.add_plugins(DefaultPlugins::new(NativeRecipes::default()).build());
//! host.register(&platform).unwrap();
//! ```

mod tracing_plugin;
mod vanilla_plugin;

pub use tracing_plugin::TracingPlugin;
pub use vanilla_plugin::{NativeRecipeSource, RecipeDump, VanillaPlugin};

use pantry_plugin::{PluginGroup, PluginGroupBuilder};

/// Default plugins for most hosts.
///
/// Includes:
/// - [`TracingPlugin`] - Logging
/// - [`VanillaPlugin`] - The host's own recipes
///
/// # Customization
///
/// ```ignore
/// host.add_plugins(
///     DefaultPlugins::new(recipes)
///         .build()
///         .disable::<TracingPlugin>(),
/// );
/// ```
#[derive(Debug)]
pub struct DefaultPlugins {
    vanilla: VanillaPlugin,
}

impl DefaultPlugins {
    /// Creates the group, reading vanilla recipes from `source`.
    #[must_use]
    pub fn new(source: impl NativeRecipeSource) -> Self {
        Self {
            vanilla: VanillaPlugin::new(source),
        }
    }
}

impl PluginGroup for DefaultPlugins {
    fn build(self) -> PluginGroupBuilder {
        PluginGroupBuilder::new()
            .add(TracingPlugin::default())
            .add(self.vanilla)
    }
}
