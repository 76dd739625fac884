//! The built-in plugin for the host's own recipes.
//!
//! [`VanillaPlugin`] reads the host's native recipes through a
//! [`NativeRecipeSource`], normalizes them, and synthesizes brewing recipes
//! from the host's potion-mutation table.
//!
//! | Phase | Registers |
//! |-------|-----------|
//! | Item subtypes | potion interpreters for the three potion containers |
//! | Ingredients | every item the host lists |
//! | Categories | crafting, smithing, brewing |
//! | Recipes | normalized crafting and smithing recipes, synthesized brewing |
//! | Transfer handlers | the crafting table's 3×3 grid |
//! | Catalysts | crafting table, smithing table, brewing stand |
//! | GUI handlers | the crafting screen's arrow |

use pantry_model::{
    AuxData, AuxEntryInterpreter, Diagnostic, DiagnosticKind, Diagnostics, Identifier,
    IngredientKind, RecipeCategory, Stack, SubtypeInterpreter, category_ids,
};
use pantry_platform::{HostError, NativeRecipes, NormalizeOptions, PlatformRecipeHelper, vanilla};
use pantry_plugin::{
    CatalystRegistration, CategoryRegistration, GuiHandlerRegistration, GuiRegion,
    IngredientRegistration, Plugin, RecipeRegistration, RecipeTransferInfo,
    RecipeTransferRegistration, SubtypeRegistration,
};
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

// ─────────────────────────────────────────────────────────────────────────────
// NativeRecipeSource
// ─────────────────────────────────────────────────────────────────────────────

/// Where the host's recipes come from.
pub trait NativeRecipeSource: Send + Sync + 'static {
    /// Reads the host's recipes and item list.
    ///
    /// # Errors
    ///
    /// Returns [`HostError`] if the host cannot supply them.
    fn native_recipes(&self) -> Result<NativeRecipes, HostError>;
}

impl NativeRecipeSource for NativeRecipes {
    fn native_recipes(&self) -> Result<NativeRecipes, HostError> {
        Ok(self.clone())
    }
}

/// A JSON dump of [`NativeRecipes`] on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDump {
    path: PathBuf,
}

impl RecipeDump {
    /// Reads recipes from `path` when the plugin first needs them.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl NativeRecipeSource for RecipeDump {
    fn native_recipes(&self) -> Result<NativeRecipes, HostError> {
        let unavailable = |reason: String| HostError::Unavailable {
            table: self.path.display().to_string(),
            reason,
        };
        let raw = std::fs::read_to_string(&self.path).map_err(|err| unavailable(err.to_string()))?;
        NativeRecipes::from_json_str(&raw).map_err(|err| unavailable(err.to_string()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// VanillaPlugin
// ─────────────────────────────────────────────────────────────────────────────

/// Registers the host's crafting, smithing and brewing content.
///
/// The source is read once, on first use. If it fails, the plugin records a
/// [`DiagnosticKind::HostUnavailable`] diagnostic and registers categories and
/// catalysts without recipes. A brewing table that cannot be enumerated is
/// handled the same way for brewing alone.
///
/// # Example
///
/// ```
/// use pantry_core_plugins::VanillaPlugin;
/// use pantry_platform::{MutationTable, NativeRecipes, PlatformCapabilities, PlatformContext};
/// use pantry_plugin::PluginHost;
/// use std::sync::Arc;
///
/// let platform = PlatformContext::new(
///     PlatformCapabilities::vanilla(),
///     Arc::new(MutationTable::new()),
/// );
/// let mut host = PluginHost::new();
/// host.add_plugins(VanillaPlugin::new(NativeRecipes::default()));
/// let report = host.register(&platform).unwrap();
/// assert_eq!(report.categories, 3);
/// ```
pub struct VanillaPlugin {
    source: Box<dyn NativeRecipeSource>,
    native: OnceLock<Result<NativeRecipes, HostError>>,
}

impl core::fmt::Debug for VanillaPlugin {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VanillaPlugin")
            .field("loaded", &self.native.get().is_some())
            .finish_non_exhaustive()
    }
}

impl VanillaPlugin {
    /// Creates the plugin over `source`.
    #[must_use]
    pub fn new(source: impl NativeRecipeSource) -> Self {
        Self {
            source: Box::new(source),
            native: OnceLock::new(),
        }
    }

    fn native(&self) -> Result<&NativeRecipes, &HostError> {
        self.native
            .get_or_init(|| {
                let native = self.source.native_recipes();
                match &native {
                    Ok(recipes) => tracing::debug!(
                        items = recipes.items.len(),
                        crafting = recipes.crafting.len(),
                        smithing = recipes.smithing.len(),
                        "read native recipes"
                    ),
                    Err(err) => tracing::error!(error = %err, "native recipes unavailable"),
                }
                native
            })
            .as_ref()
    }

    fn register_brewing(&self, registration: &mut RecipeRegistration<'_, '_>) {
        let synthesized = registration
            .normalizer()
            .synthesize_brewing_recipes(registration.ingredient_manager(), registration.recipe_factory());
        match synthesized {
            Ok(brewing) => {
                let admitted = registration.add_brewing_recipes(brewing);
                tracing::debug!(admitted, "brewing recipes registered");
            }
            Err(err) => {
                tracing::error!(error = %err, "brewing synthesis aborted");
                registration.report(host_unavailable(err.to_string(), category_ids::brewing()));
            }
        }
    }
}

fn host_unavailable(message: String, subject: Identifier) -> Diagnostics {
    let mut diagnostics = Diagnostics::new();
    diagnostics.push(Diagnostic::new(DiagnosticKind::HostUnavailable, message).with_subject(subject));
    diagnostics
}

fn potion_containers() -> [Identifier; 3] {
    [
        vanilla::potion(),
        vanilla::splash_potion(),
        vanilla::lingering_potion(),
    ]
}

impl Plugin for VanillaPlugin {
    fn uid(&self) -> Identifier {
        Identifier::from_static("minecraft", "vanilla")
    }

    fn register_item_subtypes(&self, registration: &mut SubtypeRegistration<'_, '_>) {
        let interpreter: Arc<dyn SubtypeInterpreter> =
            Arc::new(AuxEntryInterpreter::new(AuxData::POTION));
        for container in potion_containers() {
            registration.register_interpreter(container, Arc::clone(&interpreter));
        }
    }

    fn register_ingredients(&self, registration: &mut IngredientRegistration<'_, '_>) {
        if let Ok(native) = self.native() {
            registration.add_ingredients(&IngredientKind::item(), native.items.iter().cloned());
        }
    }

    fn register_categories(&self, registration: &mut CategoryRegistration<'_, '_>) {
        registration.add_category(
            RecipeCategory::new(category_ids::crafting(), "Crafting")
                .with_icon(Stack::item(vanilla::crafting_table())),
        );
        registration.add_category(
            RecipeCategory::new(category_ids::smithing(), "Smithing")
                .with_icon(Stack::item(vanilla::smithing_table())),
        );
        registration.add_category(
            RecipeCategory::new(category_ids::brewing(), "Brewing")
                .with_icon(Stack::item(vanilla::brewing_stand())),
        );
    }

    fn register_recipes(&self, registration: &mut RecipeRegistration<'_, '_>) {
        match self.native() {
            Ok(native) => {
                let options = NormalizeOptions {
                    report_unhandled: registration.debug_mode(),
                };
                let normalized = registration.normalizer().normalize_all_with(
                    native,
                    registration.ingredient_manager(),
                    registration.crafting_extensions(),
                    options,
                );
                let admitted = registration.add_recipes(normalized.recipes);
                registration.report(normalized.diagnostics);
                tracing::debug!(admitted, "native recipes registered");
            }
            Err(err) => {
                registration.report(host_unavailable(err.to_string(), self.uid()));
            }
        }
        self.register_brewing(registration);
    }

    fn register_recipe_transfer_handlers(
        &self,
        registration: &mut RecipeTransferRegistration<'_, '_>,
    ) {
        registration.add_transfer_handler(RecipeTransferInfo {
            category: category_ids::crafting(),
            container: vanilla::crafting_table(),
            recipe_slots: 1..10,
            inventory_slots: 10..46,
        });
    }

    fn register_recipe_catalysts(&self, registration: &mut CatalystRegistration<'_, '_>) {
        registration.add_catalyst(category_ids::crafting(), Stack::item(vanilla::crafting_table()));
        registration.add_catalyst(category_ids::smithing(), Stack::item(vanilla::smithing_table()));
        registration.add_catalyst(category_ids::brewing(), Stack::item(vanilla::brewing_stand()));
    }

    fn register_gui_handlers(&self, registration: &mut GuiHandlerRegistration<'_, '_>) {
        registration.add_gui_region(GuiRegion {
            screen: vanilla::crafting_table().to_string(),
            x: 88,
            y: 32,
            width: 28,
            height: 23,
            categories: vec![category_ids::crafting()],
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Offline;

    impl NativeRecipeSource for Offline {
        fn native_recipes(&self) -> Result<NativeRecipes, HostError> {
            Err(HostError::Unavailable {
                table: "recipes".to_owned(),
                reason: "server not started".to_owned(),
            })
        }
    }

    #[test]
    fn source_is_read_once() {
        let plugin = VanillaPlugin::new(Offline);
        assert!(plugin.native().is_err());
        assert!(format!("{plugin:?}").contains("loaded: true"));
    }

    #[test]
    fn missing_dump_is_host_unavailable() {
        let err = RecipeDump::new("/nonexistent/recipes.json")
            .native_recipes()
            .unwrap_err();
        let HostError::Unavailable { table, .. } = err;
        assert_eq!(table, "/nonexistent/recipes.json");
    }

    #[test]
    fn dump_is_parsed() {
        let path = std::env::temp_dir().join(format!("pantry-recipes-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "items": [{ "kind": "pantry:item", "id": "minecraft:stick", "amount": 1 }] }"#)
            .unwrap();

        let native = RecipeDump::new(&path).native_recipes().unwrap();
        assert_eq!(native.items.len(), 1);
        assert!(native.crafting.is_empty());

        std::fs::remove_file(&path).ok();
    }
}
