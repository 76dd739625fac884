//! Lifecycle tests for `PluginHost`.
//!
//! These drive real plugins through registration and sessions:
//! - Phases run phase-major, in add order
//! - Admission rejects recipes of unknown categories with a diagnostic
//! - A panicking plugin is withdrawn without affecting the others
//! - Configuration reaches plugins whenever it arrives
//! - Each session gets a fresh catalog and stale handles fail

use pantry_model::{
    DiagnosticKind, GridSize, Identifier, Ingredient, Recipe, RecipeCategory, Slot, Stack,
    category_ids,
};
use pantry_platform::{MutationTable, PlatformCapabilities, PlatformContext};
use pantry_plugin::{
    AdvancedRegistration, CatalystRegistration, CategoryRegistration, ConfigManager,
    IngredientRegistration, LifecycleError, Phase, Plugin, PluginHost, RecipeLookup, RecipeOrder,
    RecipeRegistration, Runtime, RuntimeError, RuntimePlugin, RuntimeRegistration,
};
use parking_lot::Mutex;
use std::sync::Arc;

// ─────────────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────────────

type Journal = Arc<Mutex<Vec<String>>>;

fn platform() -> PlatformContext {
    PlatformContext::new(PlatformCapabilities::vanilla(), Arc::new(MutationTable::new()))
}

fn id(raw: &str) -> Identifier {
    Identifier::parse(raw).unwrap()
}

fn item(path: &str) -> Stack {
    Stack::item(Identifier::vanilla(path).unwrap())
}

fn recipe(category: &str, uid: &str, input: &str, output: &str) -> Recipe {
    Recipe::builder(id(category))
        .uid(id(uid))
        .input(Slot::of(item(input)))
        .grid(GridSize::SINGLE)
        .output(Ingredient::from(item(output)))
        .build()
        .unwrap()
}

/// Configurable test plugin.
#[derive(Default)]
struct Recorder {
    uid: &'static str,
    journal: Journal,
    categories: Vec<&'static str>,
    recipes: Vec<Recipe>,
    catalysts: Vec<(&'static str, &'static str)>,
    panic_in: Option<Phase>,
}

impl Recorder {
    fn new(uid: &'static str, journal: &Journal) -> Self {
        Self {
            uid,
            journal: Arc::clone(journal),
            ..Self::default()
        }
    }

    fn with_category(mut self, category: &'static str) -> Self {
        self.categories.push(category);
        self
    }

    fn with_recipe(mut self, recipe: Recipe) -> Self {
        self.recipes.push(recipe);
        self
    }

    fn with_catalyst(mut self, category: &'static str, path: &'static str) -> Self {
        self.catalysts.push((category, path));
        self
    }

    fn panicking_in(mut self, phase: Phase) -> Self {
        self.panic_in = Some(phase);
        self
    }

    fn note(&self, event: &str, phase: Phase) {
        self.journal.lock().push(format!("{}:{event}", self.uid));
        if self.panic_in == Some(phase) {
            panic!("{} failed during {phase}", self.uid);
        }
    }
}

impl Plugin for Recorder {
    fn uid(&self) -> Identifier {
        id(self.uid)
    }

    fn register_ingredients(&self, _registration: &mut IngredientRegistration<'_, '_>) {
        self.note("ingredients", Phase::IngredientsRegistered);
    }

    fn register_categories(&self, registration: &mut CategoryRegistration<'_, '_>) {
        for category in &self.categories {
            registration.add_category(RecipeCategory::new(id(category), *category));
        }
        self.note("categories", Phase::CategoriesRegistered);
    }

    fn register_recipes(&self, registration: &mut RecipeRegistration<'_, '_>) {
        registration.add_recipes(self.recipes.iter().cloned());
        self.note("recipes", Phase::RecipesRegistered);
    }

    fn register_recipe_catalysts(&self, registration: &mut CatalystRegistration<'_, '_>) {
        for (category, path) in &self.catalysts {
            registration.add_catalyst(id(category), item(path));
        }
        self.note("catalysts", Phase::CatalystsRegistered);
    }

    fn on_runtime_available(&self, runtime: &Runtime) {
        self.note(&format!("available#{}", runtime.session()), Phase::RuntimeAvailable);
    }

    fn on_runtime_unavailable(&self) {
        self.note("unavailable", Phase::RuntimeUnavailable);
    }

    fn on_config_manager_available(&self, config: &ConfigManager) {
        let debug = config.config().debug_mode;
        self.journal.lock().push(format!("{}:config(debug={debug})", self.uid));
    }
}

fn entries(journal: &Journal) -> Vec<String> {
    journal.lock().clone()
}

// ─────────────────────────────────────────────────────────────────────────────
// Registration
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn phases_run_phase_major_in_add_order() {
    let journal = Journal::default();
    let mut host = PluginHost::new();
    host.add_plugins(Recorder::new("test:a", &journal))
        .add_plugins(Recorder::new("test:b", &journal));
    host.register(&platform()).unwrap();

    assert_eq!(
        entries(&journal),
        [
            "test:a:ingredients",
            "test:b:ingredients",
            "test:a:categories",
            "test:b:categories",
            "test:a:recipes",
            "test:b:recipes",
            "test:a:catalysts",
            "test:b:catalysts",
        ]
    );
    assert_eq!(host.phase(), Phase::AdvancedRegistered);
}

#[test]
fn smithing_recipe_without_categories_is_rejected() {
    let smithing = Recipe::builder(category_ids::smithing())
        .uid(id("minecraft:netherite_sword_smithing"))
        .inputs([
            Slot::of(item("netherite_upgrade_smithing_template")),
            Slot::of(item("diamond_sword")),
            Slot::of(item("netherite_ingot")),
        ])
        .output(Ingredient::from(item("netherite_sword")))
        .build()
        .unwrap();

    let journal = Journal::default();
    let mut host = PluginHost::new();
    host.add_plugins(Recorder::new("test:smith", &journal).with_recipe(smithing));
    let report = host.register(&platform()).unwrap();

    assert_eq!(report.recipes, 0);
    assert_eq!(report.diagnostics.len(), 1);
    let diagnostic = report.diagnostics.iter().next().unwrap();
    assert_eq!(diagnostic.kind, DiagnosticKind::UnknownCategory);
    assert_eq!(diagnostic.plugin, Some(id("test:smith")));
    assert!(diagnostic.message.contains("minecraft:smithing"));

    let runtime = host.start_session().unwrap();
    assert_eq!(runtime.catalog().unwrap().recipe_count(), 0);
}

#[test]
fn later_plugins_may_use_earlier_categories() {
    let journal = Journal::default();
    let mut host = PluginHost::new();
    host.add_plugins(Recorder::new("test:owner", &journal).with_category("test:pressing"))
        .add_plugins(
            Recorder::new("test:guest", &journal)
                .with_recipe(recipe("test:pressing", "test:cider", "apple", "honey_bottle"))
                .with_catalyst("test:pressing", "piston"),
        );
    let report = host.register(&platform()).unwrap();
    assert_eq!(report.recipes, 1);
    assert!(report.diagnostics.is_empty());

    let catalog = host.start_session().unwrap().catalog().unwrap();
    assert_eq!(catalog.recipes(&id("test:pressing")).len(), 1);
    assert_eq!(catalog.catalysts(&id("test:pressing")).len(), 1);
    assert_eq!(catalog.recipes_with_input(&item("apple")).len(), 1);
}

#[test]
fn duplicate_category_is_rejected() {
    let journal = Journal::default();
    let mut host = PluginHost::new();
    host.add_plugins(Recorder::new("test:first", &journal).with_category("test:pressing"))
        .add_plugins(Recorder::new("test:second", &journal).with_category("test:pressing"));
    let report = host.register(&platform()).unwrap();

    assert_eq!(report.categories, 1);
    assert_eq!(report.diagnostics.count(DiagnosticKind::DuplicateCategory), 1);
    let diagnostic = report.diagnostics.iter().next().unwrap();
    assert_eq!(diagnostic.plugin, Some(id("test:second")));
}

#[test]
fn registering_twice_is_a_lifecycle_error() {
    let mut host = PluginHost::new();
    host.register(&platform()).unwrap();
    assert_eq!(
        host.register(&platform()).unwrap_err(),
        LifecycleError::AlreadyRegistered
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Faults
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn panicking_plugin_is_withdrawn() {
    let journal = Journal::default();
    let mut host = PluginHost::new();
    host.add_plugins(
        Recorder::new("test:broken", &journal)
            .with_category("test:broken_category")
            .panicking_in(Phase::RecipesRegistered),
    )
    .add_plugins(
        Recorder::new("test:healthy", &journal)
            .with_category("test:pressing")
            .with_recipe(recipe("test:pressing", "test:cider", "apple", "honey_bottle")),
    );
    let report = host.register(&platform()).unwrap();

    assert_eq!(report.faulted, [id("test:broken")]);
    assert_eq!(report.recipes, 1);
    assert_eq!(report.categories, 1);
    assert_eq!(host.fault_phase(&id("test:broken")), Some(Phase::RecipesRegistered));
    assert_eq!(host.fault_phase(&id("test:healthy")), None);

    let fault = report
        .diagnostics
        .iter()
        .find(|diagnostic| diagnostic.kind == DiagnosticKind::PluginFault)
        .unwrap();
    assert_eq!(fault.plugin, Some(id("test:broken")));
    assert_eq!(fault.subject.as_deref(), Some("recipes-registered"));
    assert!(fault.message.contains("failed during recipes-registered"));

    // The faulted plugin receives no further calls.
    assert!(!entries(&journal).contains(&"test:broken:catalysts".to_owned()));
    assert!(entries(&journal).contains(&"test:healthy:catalysts".to_owned()));

    let catalog = host.start_session().unwrap().catalog().unwrap();
    assert!(catalog.category(&id("test:broken_category")).is_none());
    assert_eq!(catalog.recipe_count(), 1);
}

#[test]
fn recipes_in_a_withdrawn_category_are_dropped() {
    let journal = Journal::default();
    let mut host = PluginHost::new();
    host.add_plugins(
        Recorder::new("test:owner", &journal)
            .with_category("test:pressing")
            .panicking_in(Phase::CatalystsRegistered),
    )
    .add_plugins(
        Recorder::new("test:guest", &journal)
            .with_recipe(recipe("test:pressing", "test:cider", "apple", "honey_bottle")),
    );
    host.register(&platform()).unwrap();

    let catalog = host.start_session().unwrap().catalog().unwrap();
    assert!(catalog.category(&id("test:pressing")).is_none());
    assert_eq!(catalog.recipe_count(), 0);
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn config_reaches_current_and_late_plugins() {
    let journal = Journal::default();
    let config = ConfigManager::from_json_str(r#"{ "debug_mode": true }"#).unwrap();

    let mut host = PluginHost::new();
    host.add_plugins(Recorder::new("test:early", &journal));
    host.provide_config(config);
    host.add_plugins(Recorder::new("test:late", &journal));

    assert_eq!(
        entries(&journal),
        ["test:early:config(debug=true)", "test:late:config(debug=true)"]
    );
    assert!(host.config().unwrap().config().debug_mode);
}

#[test]
fn configured_order_sorts_by_identity() {
    let journal = Journal::default();
    let mut host = PluginHost::new();
    host.provide_config(ConfigManager::from_json_str(r#"{ "recipe_order": "by_identity" }"#).unwrap());
    host.add_plugins(
        Recorder::new("test:press", &journal)
            .with_category("test:pressing")
            .with_recipe(recipe("test:pressing", "test:zeta", "apple", "honey_bottle"))
            .with_recipe(recipe("test:pressing", "test:alpha", "melon_slice", "glistering_melon_slice")),
    );
    host.register(&platform()).unwrap();

    let catalog = host.start_session().unwrap().catalog().unwrap();
    assert_eq!(catalog.order(), RecipeOrder::ByIdentity);
    let uids: Vec<_> = catalog
        .recipes(&id("test:pressing"))
        .iter()
        .map(|recipe| recipe.uid().unwrap().to_string())
        .collect();
    assert_eq!(uids, ["test:alpha", "test:zeta"]);
}

struct RegistrationOrder;

impl RuntimePlugin for RegistrationOrder {
    fn uid(&self) -> Identifier {
        id("test:registration_order")
    }

    fn register_runtime(&self, registration: &mut RuntimeRegistration<'_>) {
        assert_eq!(registration.recipe_order(), RecipeOrder::ByIdentity);
        registration.set_recipe_order(RecipeOrder::Registration);
    }
}

#[test]
fn runtime_plugins_override_configured_order() {
    let mut host = PluginHost::new();
    host.provide_config(ConfigManager::from_json_str(r#"{ "recipe_order": "by_identity" }"#).unwrap());
    host.add_runtime_plugin(RegistrationOrder);
    host.register(&platform()).unwrap();

    let catalog = host.start_session().unwrap().catalog().unwrap();
    assert_eq!(catalog.order(), RecipeOrder::Registration);
}

// ─────────────────────────────────────────────────────────────────────────────
// Sessions
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn sessions_rebuild_the_catalog() {
    let journal = Journal::default();
    let mut host = PluginHost::new();
    host.add_plugins(
        Recorder::new("test:press", &journal)
            .with_category("test:pressing")
            .with_recipe(recipe("test:pressing", "test:cider", "apple", "honey_bottle")),
    );
    host.register(&platform()).unwrap();

    let first = host.start_session().unwrap();
    let first_catalog = first.catalog().unwrap();
    assert_eq!(host.start_session().unwrap_err(), LifecycleError::InvalidTransition {
        from: Phase::RuntimeAvailable,
        to: Phase::RuntimeAvailable,
    });
    host.end_session().unwrap();

    assert_eq!(first.catalog().unwrap_err(), RuntimeError::Unavailable { session: 1 });
    assert!(!first.is_available());

    let second = host.start_session().unwrap();
    let second_catalog = second.catalog().unwrap();
    assert_eq!(second.session(), 2);
    assert!(!Arc::ptr_eq(&first_catalog, &second_catalog));
    assert_eq!(second_catalog.recipe_count(), 1);
    assert!(first.catalog().is_err());

    let journal = entries(&journal);
    let lifecycle: Vec<_> = journal
        .iter()
        .filter(|entry| entry.contains("available"))
        .collect();
    assert_eq!(
        lifecycle,
        ["test:press:available#1", "test:press:unavailable", "test:press:available#2"]
    );
}

#[test]
fn plugin_faulting_at_runtime_is_excluded_next_session() {
    let journal = Journal::default();
    let mut host = PluginHost::new();
    host.add_plugins(
        Recorder::new("test:flaky", &journal)
            .with_category("test:pressing")
            .with_recipe(recipe("test:pressing", "test:cider", "apple", "honey_bottle"))
            .panicking_in(Phase::RuntimeUnavailable),
    );
    host.register(&platform()).unwrap();

    assert_eq!(host.start_session().unwrap().catalog().unwrap().recipe_count(), 1);
    host.end_session().unwrap();
    assert_eq!(host.fault_phase(&id("test:flaky")), Some(Phase::RuntimeUnavailable));

    assert_eq!(host.start_session().unwrap().catalog().unwrap().recipe_count(), 0);
}

// ─────────────────────────────────────────────────────────────────────────────
// Advanced lookups
// ─────────────────────────────────────────────────────────────────────────────

struct Composting;

impl RecipeLookup for Composting {
    fn recipes_with_input(&self, stack: &Stack) -> Vec<Recipe> {
        vec![
            Recipe::builder(id("test:composting"))
                .input(Slot::of(stack.clone()))
                .output(Ingredient::from(item("bone_meal")))
                .build()
                .unwrap(),
        ]
    }
}

struct CompostPlugin;

impl Plugin for CompostPlugin {
    fn uid(&self) -> Identifier {
        id("test:compost")
    }

    fn register_advanced(&self, registration: &mut AdvancedRegistration<'_, '_>) {
        registration.add_recipe_lookup(Arc::new(Composting));
    }
}

#[test]
fn lookups_extend_input_queries() {
    let mut host = PluginHost::new();
    host.add_plugins(CompostPlugin);
    host.register(&platform()).unwrap();

    let catalog = host.start_session().unwrap().catalog().unwrap();
    assert_eq!(catalog.recipe_count(), 0);
    assert_eq!(catalog.recipes_with_input(&item("wheat_seeds")).len(), 1);
    assert!(catalog.recipes_with_output(&item("bone_meal")).is_empty());
}

// ─────────────────────────────────────────────────────────────────────────────
// Property tests
// ─────────────────────────────────────────────────────────────────────────────

mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Every recipe is either admitted or reported, never both.
        #[test]
        fn prop_admission_partitions_recipes(known in proptest::collection::vec(any::<bool>(), 0..24)) {
            let journal = Journal::default();
            let mut recorder = Recorder::new("test:prop", &journal).with_category("test:known");
            for (index, is_known) in known.iter().enumerate() {
                let category = if *is_known { "test:known" } else { "test:unknown" };
                let uid = format!("test:r{index}");
                recorder = recorder.with_recipe(recipe(category, &uid, "apple", "stick"));
            }

            let mut host = PluginHost::new();
            host.add_plugins(recorder);
            let report = host.register(&platform()).unwrap();

            let expected = known.iter().filter(|is_known| **is_known).count();
            prop_assert_eq!(report.recipes, expected);
            prop_assert_eq!(
                report.diagnostics.count(DiagnosticKind::UnknownCategory),
                known.len() - expected
            );
        }
    }
}
