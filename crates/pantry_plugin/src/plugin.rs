//! The plugin contract and plugin grouping.
//!
//! A plugin contributes ingredients, categories and recipes to the catalog by
//! implementing the phase callbacks it cares about. Every callback has a
//! no-op default, so a plugin only overrides what it registers.
//!
//! # Example
//!
//! ```
//! use pantry_model::{Identifier, RecipeCategory};
//! use pantry_plugin::{CategoryRegistration, Plugin, PluginHost};
//! use pantry_platform::{MutationTable, PlatformCapabilities, PlatformContext};
//! use std::sync::Arc;
//!
//! struct CompostPlugin;
//!
//! impl Plugin for CompostPlugin {
//!     fn uid(&self) -> Identifier {
//!         Identifier::parse("compost:main").unwrap()
//!     }
//!
//!     fn register_categories(&self, registration: &mut CategoryRegistration<'_, '_>) {
//!         let id = Identifier::parse("compost:composting").unwrap();
//!         registration.add_category(RecipeCategory::new(id, "Composting"));
//!     }
//! }
//!
//! let platform = PlatformContext::new(
//!     PlatformCapabilities::vanilla(),
//!     Arc::new(MutationTable::new()),
//! );
//! let mut host = PluginHost::new();
//! host.add_plugins(CompostPlugin);
//! let report = host.register(&platform).unwrap();
//! assert_eq!(report.categories, 1);
//! ```

use crate::config::ConfigManager;
use crate::host::PluginHost;
use crate::registration::{
    AdvancedRegistration, CatalystRegistration, CategoryRegistration, GuiHandlerRegistration,
    IngredientRegistration, RecipeRegistration, RecipeTransferRegistration, RuntimeRegistration,
    SubtypeRegistration, VanillaCategoryExtensionRegistration,
};
use crate::runtime::Runtime;
use pantry_model::Identifier;
use pantry_platform::PlatformFluidHelper;

// ─────────────────────────────────────────────────────────────────────────────
// Plugin Trait
// ─────────────────────────────────────────────────────────────────────────────

/// A source of catalog content.
///
/// The host calls the registration methods once each, in phase order, and
/// every plugin finishes a phase before any plugin starts the next. A panic
/// inside any callback faults the plugin: its contributions are discarded
/// and it receives no further calls.
pub trait Plugin: Send + Sync + 'static {
    /// Unique id of this plugin.
    fn uid(&self) -> Identifier;

    /// Registers item subtype interpreters.
    fn register_item_subtypes(&self, _registration: &mut SubtypeRegistration<'_, '_>) {}

    /// Registers fluid subtype interpreters.
    fn register_fluid_subtypes(
        &self,
        _registration: &mut SubtypeRegistration<'_, '_>,
        _fluids: &dyn PlatformFluidHelper,
    ) {
    }

    /// Registers ingredient kinds and initial ingredient lists.
    fn register_ingredients(&self, _registration: &mut IngredientRegistration<'_, '_>) {}

    /// Registers recipe categories.
    fn register_categories(&self, _registration: &mut CategoryRegistration<'_, '_>) {}

    /// Registers extensions for custom crafting recipe kinds.
    fn register_vanilla_category_extensions(
        &self,
        _registration: &mut VanillaCategoryExtensionRegistration<'_, '_>,
    ) {
    }

    /// Registers recipes.
    fn register_recipes(&self, _registration: &mut RecipeRegistration<'_, '_>) {}

    /// Registers recipe transfer handlers.
    fn register_recipe_transfer_handlers(
        &self,
        _registration: &mut RecipeTransferRegistration<'_, '_>,
    ) {
    }

    /// Registers catalysts.
    fn register_recipe_catalysts(&self, _registration: &mut CatalystRegistration<'_, '_>) {}

    /// Registers GUI regions.
    fn register_gui_handlers(&self, _registration: &mut GuiHandlerRegistration<'_, '_>) {}

    /// Registers recipe lookup extensions.
    fn register_advanced(&self, _registration: &mut AdvancedRegistration<'_, '_>) {}

    /// Adjusts runtime behavior at the start of each session.
    #[deprecated(note = "implement RuntimePlugin and add it with PluginHost::add_runtime_plugin")]
    fn register_runtime(&self, _registration: &mut RuntimeRegistration<'_>) {}

    /// Called once a session's catalog is ready.
    fn on_runtime_available(&self, _runtime: &Runtime) {}

    /// Called when the session ends. Runtime handles stop working afterwards.
    fn on_runtime_unavailable(&self) {}

    /// Called once configuration is available, independent of the phase.
    fn on_config_manager_available(&self, _config: &ConfigManager) {}

    /// Returns the plugin's name for logs.
    ///
    /// Default implementation returns the type name.
    fn name(&self) -> &str {
        core::any::type_name::<Self>()
    }
}

/// A plugin that only adjusts runtime behavior.
///
/// Supersedes [`Plugin::register_runtime`]. Runtime plugins run after every
/// legacy hook, in the order they were added.
pub trait RuntimePlugin: Send + Sync + 'static {
    /// Unique id of this plugin.
    fn uid(&self) -> Identifier;

    /// Adjusts runtime behavior for the session being started.
    fn register_runtime(&self, registration: &mut RuntimeRegistration<'_>);
}

// ─────────────────────────────────────────────────────────────────────────────
// Plugins Trait (for add_plugins polymorphism)
// ─────────────────────────────────────────────────────────────────────────────

/// Types that can be added to a [`PluginHost`].
///
/// Implemented for single plugins and for [`PluginGroupBuilder`].
pub trait Plugins {
    /// Adds these plugins to the host.
    fn add_to_host(self, host: &mut PluginHost);
}

impl<P: Plugin> Plugins for P {
    fn add_to_host(self, host: &mut PluginHost) {
        host.add_plugin_boxed(Box::new(self));
    }
}

impl Plugins for PluginGroupBuilder {
    fn add_to_host(self, host: &mut PluginHost) {
        for boxed in self.plugins {
            host.add_plugin_boxed(boxed.plugin);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// PluginGroup Trait
// ─────────────────────────────────────────────────────────────────────────────

/// A bundle of plugins added together.
///
/// The builder can be customized before it is added:
///
/// ```ignore
/// host.add_plugins(DefaultPlugins.build().disable::<TracingPlugin>());
/// ```
pub trait PluginGroup {
    /// Returns the plugins in this group.
    fn build(self) -> PluginGroupBuilder;
}

/// A boxed plugin with the type name captured before boxing.
struct BoxedPlugin {
    type_name: &'static str,
    plugin: Box<dyn Plugin>,
}

// ─────────────────────────────────────────────────────────────────────────────
// PluginGroupBuilder
// ─────────────────────────────────────────────────────────────────────────────

/// Builder for customizing plugin groups.
///
/// Plugins are matched by type, so overriding [`Plugin::name`] does not
/// affect [`disable`](Self::disable) or positional inserts.
#[derive(Default)]
pub struct PluginGroupBuilder {
    plugins: Vec<BoxedPlugin>,
}

impl PluginGroupBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            plugins: Vec::new(),
        }
    }

    /// Adds a plugin to the end of the group.
    #[must_use]
    #[expect(
        clippy::should_implement_trait,
        reason = "This is a builder method, not std::ops::Add"
    )]
    pub fn add<P: Plugin>(mut self, plugin: P) -> Self {
        self.plugins.push(boxed(plugin));
        self
    }

    /// Adds a plugin before `Target`, or at the beginning if `Target` is absent.
    #[must_use]
    pub fn add_before<P: Plugin, Target: Plugin>(mut self, plugin: P) -> Self {
        let position = self.position_of::<Target>().unwrap_or(0);
        self.plugins.insert(position, boxed(plugin));
        self
    }

    /// Adds a plugin after `Target`, or at the end if `Target` is absent.
    #[must_use]
    pub fn add_after<P: Plugin, Target: Plugin>(mut self, plugin: P) -> Self {
        let position = self
            .position_of::<Target>()
            .map_or(self.plugins.len(), |index| index + 1);
        self.plugins.insert(position, boxed(plugin));
        self
    }

    /// Removes every plugin of type `P`. No-op if there is none.
    #[must_use]
    pub fn disable<P: Plugin>(mut self) -> Self {
        let target = core::any::type_name::<P>();
        self.plugins.retain(|boxed| boxed.type_name != target);
        self
    }

    /// Returns the number of plugins in the group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Returns true if the group contains no plugins.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Returns the uids of the plugins, in order.
    #[must_use]
    pub fn uids(&self) -> Vec<Identifier> {
        self.plugins.iter().map(|boxed| boxed.plugin.uid()).collect()
    }

    fn position_of<Target: Plugin>(&self) -> Option<usize> {
        let target = core::any::type_name::<Target>();
        self.plugins.iter().position(|boxed| boxed.type_name == target)
    }
}

fn boxed<P: Plugin>(plugin: P) -> BoxedPlugin {
    BoxedPlugin {
        type_name: core::any::type_name::<P>(),
        plugin: Box::new(plugin),
    }
}
