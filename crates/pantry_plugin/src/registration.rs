//! Phase-scoped registration objects.
//!
//! Each phase hands every plugin its own write-only registration object.
//! Writes land in a staging area owned by the host and only become visible
//! to other plugins once the callback returns without panicking. Admission
//! rules (unknown or duplicate categories, duplicate interpreters) are
//! checked at the point of registration and reported as diagnostics.

use crate::catalog::{GuiRegion, RecipeLookup, RecipeOrder, RecipeTransferInfo};
use indexmap::IndexMap;
use pantry_model::{
    BrewingRecipe, Diagnostic, DiagnosticKind, Diagnostics, Identifier, Ingredient, IngredientKind,
    IngredientManager, Recipe, RecipeCategory, Stack, SubtypeInterpreter,
};
use pantry_platform::{
    CraftingExtension, CraftingExtensions, PlatformContext, PlatformIngredientHelper,
    RecipeNormalizer, VanillaRecipeFactory,
};
use std::sync::Arc;

// ─────────────────────────────────────────────────────────────────────────────
// Contributions and shared state
// ─────────────────────────────────────────────────────────────────────────────

/// Everything one plugin registered, retained for catalog assembly.
#[derive(Default, Clone)]
pub(crate) struct Contributions {
    pub(crate) interpreters: Vec<(IngredientKind, Identifier, Arc<dyn SubtypeInterpreter>)>,
    pub(crate) kinds: Vec<IngredientKind>,
    pub(crate) ingredients: Vec<(IngredientKind, Vec<Stack>)>,
    pub(crate) categories: Vec<RecipeCategory>,
    pub(crate) extensions: Vec<(Identifier, Arc<dyn CraftingExtension>)>,
    pub(crate) recipes: Vec<Recipe>,
    pub(crate) transfer_handlers: Vec<RecipeTransferInfo>,
    pub(crate) catalysts: Vec<(Identifier, Ingredient)>,
    pub(crate) gui_regions: Vec<GuiRegion>,
    pub(crate) lookups: Vec<Arc<dyn RecipeLookup>>,
}

impl Contributions {
    /// Moves everything in `staged` into `self`.
    pub(crate) fn absorb(&mut self, staged: Contributions) {
        self.interpreters.extend(staged.interpreters);
        self.kinds.extend(staged.kinds);
        self.ingredients.extend(staged.ingredients);
        self.categories.extend(staged.categories);
        self.extensions.extend(staged.extensions);
        self.recipes.extend(staged.recipes);
        self.transfer_handlers.extend(staged.transfer_handlers);
        self.catalysts.extend(staged.catalysts);
        self.gui_regions.extend(staged.gui_regions);
        self.lookups.extend(staged.lookups);
    }
}

/// State derived from committed contributions, visible to later plugins.
#[derive(Default)]
pub(crate) struct SharedState {
    pub(crate) ingredients: IngredientManager,
    pub(crate) categories: IndexMap<Identifier, RecipeCategory>,
    pub(crate) extensions: CraftingExtensions,
}

impl SharedState {
    /// Applies one plugin's committed contributions.
    ///
    /// Registration objects validate as they go, so failures here only occur
    /// when replaying after a fault and are logged.
    pub(crate) fn apply(&mut self, contributions: &Contributions) {
        for (kind, id, interpreter) in &contributions.interpreters {
            if let Err(err) =
                self.ingredients
                    .register_interpreter(kind.clone(), id.clone(), Arc::clone(interpreter))
            {
                tracing::debug!(error = %err, "interpreter not replayed");
            }
        }
        for kind in &contributions.kinds {
            self.ingredients.register_kind(kind.clone());
        }
        for (kind, stacks) in &contributions.ingredients {
            if let Err(err) = self.ingredients.add_ingredients(kind, stacks.iter().cloned()) {
                tracing::debug!(error = %err, "ingredients not replayed");
            }
        }
        for category in &contributions.categories {
            self.categories
                .entry(category.id().clone())
                .or_insert_with(|| category.clone());
        }
        for (kind, extension) in &contributions.extensions {
            self.extensions.register(kind.clone(), Arc::clone(extension));
        }
    }
}

/// What every registration object holds: the plugin, its staging area, the
/// shared view, and the host's diagnostics.
pub(crate) struct Scope<'a> {
    pub(crate) plugin: &'a Identifier,
    pub(crate) staged: &'a mut Contributions,
    pub(crate) shared: &'a SharedState,
    pub(crate) platform: &'a PlatformContext,
    pub(crate) diagnostics: &'a mut Diagnostics,
    pub(crate) debug_mode: bool,
}

impl Scope<'_> {
    fn report(&mut self, kind: DiagnosticKind, subject: impl core::fmt::Display, message: impl Into<String>) {
        self.diagnostics.push(
            Diagnostic::new(kind, message)
                .with_plugin(self.plugin.clone())
                .with_subject(subject),
        );
    }

    fn has_category(&self, id: &Identifier) -> bool {
        self.shared.categories.contains_key(id)
            || self.staged.categories.iter().any(|category| category.id() == id)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Subtypes
// ─────────────────────────────────────────────────────────────────────────────

/// Registers subtype interpreters for one ingredient kind.
///
/// Used for both the item and the fluid subtype phases.
pub struct SubtypeRegistration<'s, 'a> {
    scope: &'s mut Scope<'a>,
    kind: IngredientKind,
}

impl<'s, 'a> SubtypeRegistration<'s, 'a> {
    pub(crate) fn new(scope: &'s mut Scope<'a>, kind: IngredientKind) -> Self {
        Self { scope, kind }
    }

    /// The kind interpreters are registered for.
    #[must_use]
    pub fn kind(&self) -> &IngredientKind {
        &self.kind
    }

    /// Registers `interpreter` for stacks with `id`.
    ///
    /// Returns `false` and records a diagnostic if one is already registered.
    pub fn register_interpreter(
        &mut self,
        id: Identifier,
        interpreter: Arc<dyn SubtypeInterpreter>,
    ) -> bool {
        let sample = Stack::new(self.kind.clone(), id.clone(), 1);
        let taken = self.scope.shared.ingredients.interpreter_for(&sample).is_some()
            || self
                .scope
                .staged
                .interpreters
                .iter()
                .any(|(kind, existing, _)| kind == &self.kind && existing == &id);
        if taken {
            self.scope.report(
                DiagnosticKind::IngredientRegistration,
                &id,
                format!("subtype interpreter already registered for {}", self.kind),
            );
            return false;
        }
        tracing::debug!(plugin = %self.scope.plugin, kind = %self.kind, id = %id, "subtype interpreter registered");
        self.scope.staged.interpreters.push((self.kind.clone(), id, interpreter));
        true
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Ingredients
// ─────────────────────────────────────────────────────────────────────────────

/// Registers ingredient kinds and their initial ingredient lists.
pub struct IngredientRegistration<'s, 'a> {
    scope: &'s mut Scope<'a>,
}

impl<'s, 'a> IngredientRegistration<'s, 'a> {
    pub(crate) fn new(scope: &'s mut Scope<'a>) -> Self {
        Self { scope }
    }

    /// Registers a new ingredient kind. Returns `false` if it already exists.
    pub fn register_kind(&mut self, kind: IngredientKind) -> bool {
        if self.is_known(&kind) {
            return false;
        }
        self.scope.staged.kinds.push(kind);
        true
    }

    /// Declares ingredients of a known kind.
    ///
    /// Ingredients of an unknown kind are rejected with a diagnostic.
    pub fn add_ingredients(&mut self, kind: &IngredientKind, stacks: impl IntoIterator<Item = Stack>) {
        if !self.is_known(kind) {
            self.scope.report(
                DiagnosticKind::IngredientRegistration,
                kind,
                "ingredient kind is not registered",
            );
            return;
        }
        let stacks: Vec<Stack> = stacks.into_iter().collect();
        tracing::debug!(plugin = %self.scope.plugin, kind = %kind, count = stacks.len(), "ingredients declared");
        self.scope.staged.ingredients.push((kind.clone(), stacks));
    }

    /// The platform's fluid helper.
    #[must_use]
    pub fn fluid_helper(&self) -> &dyn pantry_platform::PlatformFluidHelper {
        self.scope.platform.fluid_helper()
    }

    fn is_known(&self, kind: &IngredientKind) -> bool {
        self.scope.shared.ingredients.has_kind(kind) || self.scope.staged.kinds.contains(kind)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Categories
// ─────────────────────────────────────────────────────────────────────────────

/// Registers recipe categories.
pub struct CategoryRegistration<'s, 'a> {
    scope: &'s mut Scope<'a>,
}

impl<'s, 'a> CategoryRegistration<'s, 'a> {
    pub(crate) fn new(scope: &'s mut Scope<'a>) -> Self {
        Self { scope }
    }

    /// Adds a category.
    ///
    /// Returns `false` and records a diagnostic if the id is taken.
    pub fn add_category(&mut self, category: RecipeCategory) -> bool {
        if self.scope.has_category(category.id()) {
            self.scope.report(
                DiagnosticKind::DuplicateCategory,
                category.id(),
                "category is already registered",
            );
            return false;
        }
        tracing::debug!(plugin = %self.scope.plugin, category = %category.id(), "category registered");
        self.scope.staged.categories.push(category);
        true
    }

    /// The platform's ingredient helper, for building icons.
    #[must_use]
    pub fn ingredient_helper(&self) -> &dyn PlatformIngredientHelper {
        self.scope.platform.ingredient_helper()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Vanilla category extensions
// ─────────────────────────────────────────────────────────────────────────────

/// Registers crafting extensions for plugin-defined crafting kinds.
pub struct VanillaCategoryExtensionRegistration<'s, 'a> {
    scope: &'s mut Scope<'a>,
}

impl<'s, 'a> VanillaCategoryExtensionRegistration<'s, 'a> {
    pub(crate) fn new(scope: &'s mut Scope<'a>) -> Self {
        Self { scope }
    }

    /// Registers `extension` for crafting recipes of custom `kind`.
    ///
    /// Returns `false` and records a diagnostic if `kind` already has one.
    pub fn add_crafting_extension(
        &mut self,
        kind: Identifier,
        extension: Arc<dyn CraftingExtension>,
    ) -> bool {
        let taken = self.scope.shared.extensions.get(&kind).is_some()
            || self.scope.staged.extensions.iter().any(|(existing, _)| existing == &kind);
        if taken {
            self.scope.report(
                DiagnosticKind::DuplicateExtension,
                &kind,
                "crafting extension already registered",
            );
            return false;
        }
        self.scope.staged.extensions.push((kind, extension));
        true
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Recipes
// ─────────────────────────────────────────────────────────────────────────────

/// Adds recipes, and exposes read-only helpers for building them.
pub struct RecipeRegistration<'s, 'a> {
    scope: &'s mut Scope<'a>,
}

impl<'s, 'a> RecipeRegistration<'s, 'a> {
    pub(crate) fn new(scope: &'s mut Scope<'a>) -> Self {
        Self { scope }
    }

    /// Adds one recipe.
    ///
    /// Returns `false` and records a diagnostic naming the category and plugin
    /// if the recipe's category is not registered.
    pub fn add_recipe(&mut self, recipe: Recipe) -> bool {
        if !self.scope.has_category(recipe.category()) {
            let message = format!("category '{}' is not registered", recipe.category());
            self.scope.report(DiagnosticKind::UnknownCategory, &recipe, message);
            return false;
        }
        self.scope.staged.recipes.push(recipe);
        true
    }

    /// Adds several recipes. Returns how many were admitted.
    pub fn add_recipes(&mut self, recipes: impl IntoIterator<Item = Recipe>) -> usize {
        recipes
            .into_iter()
            .map(|recipe| self.add_recipe(recipe))
            .filter(|admitted| *admitted)
            .count()
    }

    /// Adds brewing steps as canonical brewing recipes. Returns how many were admitted.
    pub fn add_brewing_recipes(&mut self, recipes: impl IntoIterator<Item = BrewingRecipe>) -> usize {
        self.add_recipes(recipes.into_iter().map(|brewing| brewing.to_recipe()))
    }

    /// Records problems found while preparing recipes, attributed to this plugin.
    pub fn report(&mut self, mut diagnostics: Diagnostics) {
        diagnostics.attribute(self.scope.plugin);
        self.scope.diagnostics.append(diagnostics);
    }

    /// The ingredient manager as registered so far.
    #[must_use]
    pub fn ingredient_manager(&self) -> &IngredientManager {
        &self.scope.shared.ingredients
    }

    /// Whether the configuration asks for extra diagnostics.
    #[must_use]
    pub fn debug_mode(&self) -> bool {
        self.scope.debug_mode
    }

    /// Crafting extensions registered by all plugins.
    #[must_use]
    pub fn crafting_extensions(&self) -> &CraftingExtensions {
        &self.scope.shared.extensions
    }

    /// The platform's ingredient helper.
    #[must_use]
    pub fn ingredient_helper(&self) -> &dyn PlatformIngredientHelper {
        self.scope.platform.ingredient_helper()
    }

    /// The platform's vanilla recipe factory.
    #[must_use]
    pub fn recipe_factory(&self) -> &dyn VanillaRecipeFactory {
        self.scope.platform.recipe_factory()
    }

    /// The platform's recipe normalizer.
    #[must_use]
    pub fn normalizer(&self) -> &RecipeNormalizer {
        self.scope.platform.normalizer()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Transfer handlers, catalysts, GUI handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Registers recipe transfer handlers.
pub struct RecipeTransferRegistration<'s, 'a> {
    scope: &'s mut Scope<'a>,
}

impl<'s, 'a> RecipeTransferRegistration<'s, 'a> {
    pub(crate) fn new(scope: &'s mut Scope<'a>) -> Self {
        Self { scope }
    }

    /// Adds a transfer handler.
    ///
    /// Returns `false` and records a diagnostic if its category is unknown.
    pub fn add_transfer_handler(&mut self, info: RecipeTransferInfo) -> bool {
        if !self.scope.has_category(&info.category) {
            let message = format!("category '{}' is not registered", info.category);
            self.scope.report(DiagnosticKind::UnknownCategory, &info.container, message);
            return false;
        }
        self.scope.staged.transfer_handlers.push(info);
        true
    }
}

/// Registers catalysts.
pub struct CatalystRegistration<'s, 'a> {
    scope: &'s mut Scope<'a>,
}

impl<'s, 'a> CatalystRegistration<'s, 'a> {
    pub(crate) fn new(scope: &'s mut Scope<'a>) -> Self {
        Self { scope }
    }

    /// Adds `catalyst` to `category`.
    ///
    /// Returns `false` and records a diagnostic if the category is unknown.
    pub fn add_catalyst(&mut self, category: Identifier, catalyst: impl Into<Ingredient>) -> bool {
        let catalyst = catalyst.into();
        if !self.scope.has_category(&category) {
            let message = format!("category '{category}' is not registered");
            self.scope.report(DiagnosticKind::UnknownCategory, &catalyst, message);
            return false;
        }
        self.scope.staged.catalysts.push((category, catalyst));
        true
    }
}

/// Registers clickable screen regions.
pub struct GuiHandlerRegistration<'s, 'a> {
    scope: &'s mut Scope<'a>,
}

impl<'s, 'a> GuiHandlerRegistration<'s, 'a> {
    pub(crate) fn new(scope: &'s mut Scope<'a>) -> Self {
        Self { scope }
    }

    /// Adds a region.
    ///
    /// Returns `false` and records a diagnostic if any category is unknown.
    pub fn add_gui_region(&mut self, region: GuiRegion) -> bool {
        if let Some(unknown) = region.categories.iter().find(|id| !self.scope.has_category(id)) {
            let message = format!("category '{unknown}' is not registered");
            self.scope.report(DiagnosticKind::UnknownCategory, &region.screen, message);
            return false;
        }
        self.scope.staged.gui_regions.push(region);
        true
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Advanced and runtime
// ─────────────────────────────────────────────────────────────────────────────

/// Registers lookup extensions.
pub struct AdvancedRegistration<'s, 'a> {
    scope: &'s mut Scope<'a>,
}

impl<'s, 'a> AdvancedRegistration<'s, 'a> {
    pub(crate) fn new(scope: &'s mut Scope<'a>) -> Self {
        Self { scope }
    }

    /// Adds a recipe lookup consulted by catalog queries.
    pub fn add_recipe_lookup(&mut self, lookup: Arc<dyn RecipeLookup>) {
        self.scope.staged.lookups.push(lookup);
    }

    /// The ingredient manager as registered.
    #[must_use]
    pub fn ingredient_manager(&self) -> &IngredientManager {
        &self.scope.shared.ingredients
    }
}

/// Overrides runtime behavior for the next session.
#[derive(Debug)]
pub struct RuntimeRegistration<'a> {
    order: &'a mut RecipeOrder,
}

impl<'a> RuntimeRegistration<'a> {
    pub(crate) fn new(order: &'a mut RecipeOrder) -> Self {
        Self { order }
    }

    /// Sets the display order of recipes. The last plugin to call this wins.
    pub fn set_recipe_order(&mut self, order: RecipeOrder) {
        *self.order = order;
    }

    /// Returns the order currently in effect.
    #[must_use]
    pub fn recipe_order(&self) -> RecipeOrder {
        *self.order
    }
}
