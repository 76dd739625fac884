//! Conversion of native recipes into the canonical model.
//!
//! Three host shapes are normalized here:
//!
//! - **Crafting**: a grid of native ingredients. The declared size is used
//!   when present; otherwise the recipe is treated as a single cell, which
//!   fails closed for any recipe with more than one ingredient.
//! - **Smithing**: three named slots plus the host's support flag, surfaced
//!   as a [`SmithingRecipeView`]. Unhandled views are filtered silently
//!   unless [`NormalizeOptions::report_unhandled`] is set.
//! - **Brewing**: the host only knows `(potion, reagent) -> potion`, so the
//!   recipe list is reconstructed by querying the [`PotionMutationTable`].
//!
//! Crafting recipes with plugin-defined mechanics are laid out by a
//! [`CraftingExtension`] registered for their kind.

use crate::factory::VanillaRecipeFactory;
use crate::host::{HostError, PotionMutationTable};
use crate::ingredient_helper::PlatformIngredientHelper;
use crate::native::{
    CraftingKind, NativeCraftingRecipe, NativeIngredient, NativeRecipes, NativeSmithingRecipe,
};
use crate::vanilla;
use hashbrown::HashSet;
use indexmap::IndexMap;
use pantry_model::{
    BrewingRecipe, Diagnostic, DiagnosticKind, Diagnostics, GridSize, Identifier, Ingredient,
    IngredientError, IngredientKind, IngredientManager, Recipe, RecipeError, Slot,
    SmithingRecipeView, Stack, category_ids,
};
use std::sync::Arc;
use thiserror::Error;

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Errors raised while normalizing native recipes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// An ingredient of the recipe could not be converted.
    #[error("recipe '{recipe}': {source}")]
    Ingredient {
        /// Native recipe id.
        recipe: Identifier,
        /// Underlying error.
        source: IngredientError,
    },

    /// The recipe's geometry is inconsistent.
    #[error("recipe '{recipe}': {source}")]
    Geometry {
        /// Native recipe id.
        recipe: Identifier,
        /// Underlying error.
        source: RecipeError,
    },

    /// A custom crafting recipe has no extension to lay it out.
    #[error("recipe '{recipe}': no crafting extension registered for '{kind}'")]
    NoExtension {
        /// Native recipe id.
        recipe: Identifier,
        /// Custom crafting kind.
        kind: Identifier,
    },

    /// A crafting extension rejected the recipe.
    #[error("recipe '{recipe}': crafting extension failed: {message}")]
    Extension {
        /// Native recipe id.
        recipe: Identifier,
        /// Extension-supplied message.
        message: String,
    },

    /// The host's mutation table could not be enumerated.
    #[error(transparent)]
    HostEnumeration(#[from] HostError),
}

impl NormalizeError {
    /// Returns the native recipe the error is about, if any.
    #[must_use]
    pub fn recipe(&self) -> Option<&Identifier> {
        match self {
            NormalizeError::Ingredient { recipe, .. }
            | NormalizeError::Geometry { recipe, .. }
            | NormalizeError::NoExtension { recipe, .. }
            | NormalizeError::Extension { recipe, .. } => Some(recipe),
            NormalizeError::HostEnumeration(_) => None,
        }
    }
}

/// A crafting extension could not lay out a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ExtensionError(pub String);

// ─────────────────────────────────────────────────────────────────────────────
// Crafting extensions
// ─────────────────────────────────────────────────────────────────────────────

/// The canonical layout of one custom crafting recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CraftingLayout {
    /// Grid geometry.
    pub size: GridSize,
    /// Row-major input slots, one per cell.
    pub inputs: Vec<Slot>,
    /// Outputs.
    pub outputs: Vec<Ingredient>,
}

/// Lays out crafting recipes whose mechanics the platform does not know.
pub trait CraftingExtension: Send + Sync {
    /// Produces the canonical layout of `recipe`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtensionError`] if the recipe cannot be displayed.
    fn layout(
        &self,
        recipe: &NativeCraftingRecipe,
        ingredients: &IngredientManager,
    ) -> Result<CraftingLayout, ExtensionError>;
}

/// Crafting extensions keyed by custom crafting kind.
#[derive(Clone, Default)]
pub struct CraftingExtensions {
    extensions: IndexMap<Identifier, Arc<dyn CraftingExtension>>,
}

impl core::fmt::Debug for CraftingExtensions {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.extensions.keys()).finish()
    }
}

impl CraftingExtensions {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `extension` for `kind`. Returns `false` if `kind` is taken.
    pub fn register(&mut self, kind: Identifier, extension: Arc<dyn CraftingExtension>) -> bool {
        if self.extensions.contains_key(&kind) {
            return false;
        }
        self.extensions.insert(kind, extension);
        true
    }

    /// Returns the extension for `kind`.
    #[must_use]
    pub fn get(&self, kind: &Identifier) -> Option<&Arc<dyn CraftingExtension>> {
        self.extensions.get(kind)
    }

    /// Lists registered kinds in registration order.
    pub fn kinds(&self) -> impl Iterator<Item = &Identifier> {
        self.extensions.keys()
    }

    /// Returns the number of registered extensions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// PlatformRecipeHelper
// ─────────────────────────────────────────────────────────────────────────────

/// Platform-specific decomposition of native recipes.
pub trait PlatformRecipeHelper: Send + Sync {
    /// Returns the grid size of a crafting recipe.
    ///
    /// Never fails: an undeclared size is [`GridSize::SINGLE`].
    fn dimensions_of(&self, recipe: &NativeCraftingRecipe) -> GridSize;

    /// Extracts the three slots of a smithing recipe.
    ///
    /// Extraction happens regardless of validity; `handled` is true only when
    /// the host supports the recipe and all three slots are non-empty.
    fn decompose_smithing(
        &self,
        recipe: &NativeSmithingRecipe,
        ingredients: &IngredientManager,
    ) -> SmithingRecipeView;

    /// Reconstructs brewing recipes from the host's mutation table.
    ///
    /// Candidate reagents are those the table lists, then registered items;
    /// the table decides which are valid. Results follow host iteration order and are unique per
    /// `(reagent, input potion)`.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizeError::HostEnumeration`] if the table cannot be read.
    fn synthesize_brewing_recipes(
        &self,
        ingredients: &IngredientManager,
        factory: &dyn VanillaRecipeFactory,
    ) -> Result<Vec<BrewingRecipe>, NormalizeError>;
}

/// Result of [`RecipeNormalizer::normalize_all`].
#[derive(Debug, Clone, Default)]
pub struct NormalizedRecipes {
    /// Canonical recipes, in host order.
    pub recipes: Vec<Recipe>,
    /// Recipes that were dropped, and why.
    pub diagnostics: Diagnostics,
}

/// Switches for [`RecipeNormalizer::normalize_all_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Record a [`DiagnosticKind::UnhandledRecipe`] diagnostic for each
    /// smithing recipe the host cannot show, instead of skipping it silently.
    pub report_unhandled: bool,
}

/// The stock [`PlatformRecipeHelper`], plus whole-recipe conversions.
#[derive(Clone)]
pub struct RecipeNormalizer {
    helper: Arc<dyn PlatformIngredientHelper>,
    mutations: Arc<dyn PotionMutationTable>,
}

impl core::fmt::Debug for RecipeNormalizer {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RecipeNormalizer")
            .field("containers", &self.helper.accepted_containers().len())
            .finish_non_exhaustive()
    }
}

impl RecipeNormalizer {
    /// Creates a normalizer over the given platform collaborators.
    #[must_use]
    pub fn new(
        helper: Arc<dyn PlatformIngredientHelper>,
        mutations: Arc<dyn PotionMutationTable>,
    ) -> Self {
        Self { helper, mutations }
    }

    /// Converts a crafting recipe.
    ///
    /// Grids wider or taller than two cells need a crafting table, which is
    /// set as the recipe's catalyst.
    ///
    /// # Errors
    ///
    /// - [`NormalizeError::Ingredient`] if a stack has an unregistered kind
    /// - [`NormalizeError::Geometry`] if the grid does not fit the ingredients
    /// - [`NormalizeError::NoExtension`] / [`NormalizeError::Extension`] for
    ///   custom recipes without a working extension
    pub fn normalize_crafting(
        &self,
        recipe: &NativeCraftingRecipe,
        ingredients: &IngredientManager,
        extensions: &CraftingExtensions,
    ) -> Result<Recipe, NormalizeError> {
        let (size, inputs, outputs) = match &recipe.kind {
            CraftingKind::Shaped | CraftingKind::Shapeless => {
                let inputs = recipe
                    .ingredients
                    .iter()
                    .map(|native| slot_of(native, ingredients))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|source| NormalizeError::Ingredient {
                        recipe: recipe.id.clone(),
                        source,
                    })?;
                let output = ingredients.ingredient_for(&recipe.result).map_err(|source| {
                    NormalizeError::Ingredient {
                        recipe: recipe.id.clone(),
                        source,
                    }
                })?;
                (self.dimensions_of(recipe), inputs, vec![output])
            }
            CraftingKind::Custom(kind) => {
                let extension = extensions.get(kind).ok_or_else(|| NormalizeError::NoExtension {
                    recipe: recipe.id.clone(),
                    kind: kind.clone(),
                })?;
                let layout = extension.layout(recipe, ingredients).map_err(|err| {
                    NormalizeError::Extension {
                        recipe: recipe.id.clone(),
                        message: err.to_string(),
                    }
                })?;
                (layout.size, layout.inputs, layout.outputs)
            }
        };

        let mut builder = Recipe::builder(category_ids::crafting())
            .uid(recipe.id.clone())
            .grid(size)
            .inputs(inputs);
        for output in outputs {
            builder = builder.output(output);
        }
        if size.width > 2 || size.height > 2 {
            builder = builder.catalyst(Stack::item(vanilla::crafting_table()));
        }

        builder.build().map_err(|source| NormalizeError::Geometry {
            recipe: recipe.id.clone(),
            source,
        })
    }

    /// Converts a smithing recipe. Unhandled recipes yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`NormalizeError::Ingredient`] if a stack has an unregistered kind.
    pub fn normalize_smithing(
        &self,
        recipe: &NativeSmithingRecipe,
        ingredients: &IngredientManager,
    ) -> Result<Option<Recipe>, NormalizeError> {
        let convert = |native: &NativeIngredient| {
            slot_of(native, ingredients).map_err(|source| NormalizeError::Ingredient {
                recipe: recipe.id.clone(),
                source,
            })
        };
        let view = smithing_view(
            convert(&recipe.template)?,
            convert(&recipe.base)?,
            convert(&recipe.addition)?,
            recipe.supported,
        );
        if !view.handled {
            tracing::debug!(recipe = %recipe.id, "skipping unhandled smithing recipe");
            return Ok(None);
        }

        let result = ingredients
            .ingredient_for(&recipe.result)
            .map_err(|source| NormalizeError::Ingredient {
                recipe: recipe.id.clone(),
                source,
            })?;
        Ok(view.to_recipe(Some(recipe.id.clone()), result))
    }

    /// Converts every crafting and smithing recipe the host exposes.
    ///
    /// Malformed recipes are dropped with a diagnostic; the rest proceed.
    #[must_use]
    pub fn normalize_all(
        &self,
        native: &NativeRecipes,
        ingredients: &IngredientManager,
        extensions: &CraftingExtensions,
    ) -> NormalizedRecipes {
        self.normalize_all_with(native, ingredients, extensions, NormalizeOptions::default())
    }

    /// [`normalize_all`](Self::normalize_all) with explicit options.
    #[must_use]
    pub fn normalize_all_with(
        &self,
        native: &NativeRecipes,
        ingredients: &IngredientManager,
        extensions: &CraftingExtensions,
        options: NormalizeOptions,
    ) -> NormalizedRecipes {
        let mut normalized = NormalizedRecipes::default();

        for recipe in &native.crafting {
            match self.normalize_crafting(recipe, ingredients, extensions) {
                Ok(canonical) => normalized.recipes.push(canonical),
                Err(err) => normalized.diagnostics.push(
                    Diagnostic::new(DiagnosticKind::MalformedRecipe, err.to_string())
                        .with_subject(&recipe.id),
                ),
            }
        }

        for recipe in &native.smithing {
            match self.normalize_smithing(recipe, ingredients) {
                Ok(Some(canonical)) => normalized.recipes.push(canonical),
                Ok(None) if options.report_unhandled => normalized.diagnostics.push(
                    Diagnostic::new(
                        DiagnosticKind::UnhandledRecipe,
                        "smithing recipe is not handled by this host",
                    )
                    .with_subject(&recipe.id),
                ),
                Ok(None) => {}
                Err(err) => normalized.diagnostics.push(
                    Diagnostic::new(DiagnosticKind::MalformedRecipe, err.to_string())
                        .with_subject(&recipe.id),
                ),
            }
        }

        tracing::debug!(
            recipes = normalized.recipes.len(),
            dropped = normalized.diagnostics.len(),
            "normalized native recipes"
        );
        normalized
    }
}

impl PlatformRecipeHelper for RecipeNormalizer {
    fn dimensions_of(&self, recipe: &NativeCraftingRecipe) -> GridSize {
        recipe.declared_size.unwrap_or(GridSize::SINGLE)
    }

    fn decompose_smithing(
        &self,
        recipe: &NativeSmithingRecipe,
        ingredients: &IngredientManager,
    ) -> SmithingRecipeView {
        let lenient = |native: &NativeIngredient| {
            Slot::new(
                native
                    .0
                    .iter()
                    .map(|stack| {
                        ingredients
                            .ingredient_for(stack)
                            .unwrap_or_else(|_| Ingredient::ExactStack(stack.clone()))
                    })
                    .collect(),
            )
        };
        smithing_view(
            lenient(&recipe.template),
            lenient(&recipe.base),
            lenient(&recipe.addition),
            recipe.supported,
        )
    }

    fn synthesize_brewing_recipes(
        &self,
        ingredients: &IngredientManager,
        factory: &dyn VanillaRecipeFactory,
    ) -> Result<Vec<BrewingRecipe>, NormalizeError> {
        let potions = self.mutations.potions()?;
        let listed = self.mutations.reagents()?;
        let containers = self.helper.accepted_containers();

        // Table reagents first, then registered items.
        let registered = ingredients.ingredients(&IngredientKind::item()).cloned();
        let mut reagents: Vec<(Stack, Ingredient)> = Vec::new();
        let mut known: HashSet<Ingredient> = HashSet::new();
        for reagent in listed.into_iter().chain(registered) {
            if !self.mutations.is_reagent(&reagent) {
                continue;
            }
            match ingredients.ingredient_for(&reagent) {
                Ok(ingredient) => {
                    if known.insert(ingredient.clone()) {
                        reagents.push((reagent, ingredient));
                    }
                }
                Err(err) => tracing::warn!(reagent = %reagent, error = %err, "skipping reagent"),
            }
        }

        let mut seen: HashSet<(Ingredient, Ingredient)> = HashSet::new();
        let mut recipes = Vec::new();

        for (reagent, reagent_ingredient) in &reagents {
            for potion in &potions {
                if !containers.accepts(potion) {
                    tracing::trace!(potion = %potion, "container not accepted");
                    continue;
                }
                let Some(output) = self.mutations.mutate(potion, reagent) else {
                    continue;
                };
                if output.same_variant(potion) {
                    continue;
                }

                let (input_potion, output_potion) = match (
                    ingredients.ingredient_for(potion),
                    ingredients.ingredient_for(&output),
                ) {
                    (Ok(input), Ok(output)) => (input, output),
                    (Err(err), _) | (_, Err(err)) => {
                        tracing::warn!(potion = %potion, error = %err, "skipping potion");
                        continue;
                    }
                };
                if !seen.insert((reagent_ingredient.clone(), input_potion.clone())) {
                    continue;
                }

                recipes.push(factory.create_brewing_recipe(
                    vec![reagent_ingredient.clone()],
                    input_potion,
                    output_potion,
                ));
            }
        }

        tracing::debug!(count = recipes.len(), "synthesized brewing recipes");
        Ok(recipes)
    }
}

fn slot_of(native: &NativeIngredient, ingredients: &IngredientManager) -> Result<Slot, IngredientError> {
    native
        .0
        .iter()
        .map(|stack| ingredients.ingredient_for(stack))
        .collect::<Result<Vec<_>, _>>()
        .map(Slot::new)
}

fn smithing_view(template: Slot, base: Slot, addition: Slot, supported: bool) -> SmithingRecipeView {
    let handled = supported && !template.is_empty() && !base.is_empty() && !addition.is_empty();
    SmithingRecipeView {
        template,
        base,
        addition,
        handled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::DefaultRecipeFactory;
    use crate::host::MutationTable;
    use crate::ingredient_helper::{IngredientHelper, PlatformCapabilities};
    use pantry_model::{AuxData, AuxEntryInterpreter};

    fn item(path: &'static str) -> Stack {
        Stack::item(Identifier::from_static("minecraft", path))
    }

    fn potion(kind: &str) -> Stack {
        Stack::item(vanilla::potion()).with_aux(AuxData::POTION, kind)
    }

    fn normalizer(table: MutationTable) -> RecipeNormalizer {
        RecipeNormalizer::new(
            Arc::new(IngredientHelper::new(PlatformCapabilities::vanilla())),
            Arc::new(table),
        )
    }

    fn shaped(id: &'static str, size: Option<GridSize>, cells: usize) -> NativeCraftingRecipe {
        NativeCraftingRecipe {
            id: Identifier::from_static("minecraft", id),
            kind: CraftingKind::Shaped,
            declared_size: size,
            ingredients: (0..cells).map(|_| NativeIngredient::of(item("cobblestone"))).collect(),
            result: item("furnace"),
        }
    }

    fn manager_with_potions() -> IngredientManager {
        let mut manager = IngredientManager::new();
        manager
            .register_interpreter(
                IngredientKind::item(),
                vanilla::potion(),
                Arc::new(AuxEntryInterpreter::new(AuxData::POTION)),
            )
            .unwrap();
        manager
    }

    #[test]
    fn undeclared_size_is_single_cell() {
        let normalizer = normalizer(MutationTable::new());
        assert_eq!(normalizer.dimensions_of(&shaped("a", None, 1)), GridSize::SINGLE);
        assert_eq!(
            normalizer.dimensions_of(&shaped("b", Some(GridSize::new(3, 2)), 6)),
            GridSize::new(3, 2)
        );
    }

    #[test]
    fn crafting_grid_fits_inputs() {
        let normalizer = normalizer(MutationTable::new());
        let manager = IngredientManager::new();
        let extensions = CraftingExtensions::new();

        let recipe = normalizer
            .normalize_crafting(&shaped("furnace", Some(GridSize::new(3, 3)), 9), &manager, &extensions)
            .unwrap();
        assert_eq!(recipe.inputs().len(), 9);
        assert_eq!(recipe.catalyst(), Some(&Ingredient::from(Stack::item(vanilla::crafting_table()))));

        let err = normalizer
            .normalize_crafting(&shaped("broken", None, 4), &manager, &extensions)
            .unwrap_err();
        assert!(matches!(err, NormalizeError::Geometry { .. }));
    }

    #[test]
    fn small_grids_have_no_catalyst() {
        let normalizer = normalizer(MutationTable::new());
        let recipe = normalizer
            .normalize_crafting(
                &shaped("pair", Some(GridSize::new(1, 2)), 2),
                &IngredientManager::new(),
                &CraftingExtensions::new(),
            )
            .unwrap();
        assert_eq!(recipe.catalyst(), None);
    }

    struct MirrorExtension;

    impl CraftingExtension for MirrorExtension {
        fn layout(
            &self,
            recipe: &NativeCraftingRecipe,
            _: &IngredientManager,
        ) -> Result<CraftingLayout, ExtensionError> {
            let first = recipe
                .ingredients
                .first()
                .and_then(|native| native.0.first())
                .ok_or_else(|| ExtensionError("nothing to mirror".into()))?;
            Ok(CraftingLayout {
                size: GridSize::new(2, 1),
                inputs: vec![Slot::of(first.clone()), Slot::empty()],
                outputs: vec![recipe.result.clone().into()],
            })
        }
    }

    #[test]
    fn custom_crafting_needs_an_extension() {
        let normalizer = normalizer(MutationTable::new());
        let manager = IngredientManager::new();
        let kind = Identifier::from_static("examplemod", "mirrored");
        let mut recipe = shaped("mirror", None, 1);
        recipe.kind = CraftingKind::Custom(kind.clone());

        let err = normalizer
            .normalize_crafting(&recipe, &manager, &CraftingExtensions::new())
            .unwrap_err();
        assert!(matches!(err, NormalizeError::NoExtension { .. }));

        let mut extensions = CraftingExtensions::new();
        assert!(extensions.register(kind.clone(), Arc::new(MirrorExtension)));
        assert!(!extensions.register(kind, Arc::new(MirrorExtension)));

        let canonical = normalizer.normalize_crafting(&recipe, &manager, &extensions).unwrap();
        assert_eq!(canonical.grid(), Some(GridSize::new(2, 1)));

        recipe.ingredients.clear();
        let err = normalizer.normalize_crafting(&recipe, &manager, &extensions).unwrap_err();
        assert!(matches!(err, NormalizeError::Extension { .. }));
    }

    fn smithing(supported: bool, addition: NativeIngredient) -> NativeSmithingRecipe {
        NativeSmithingRecipe {
            id: Identifier::from_static("minecraft", "netherite_sword_smithing"),
            template: NativeIngredient::of(item("netherite_upgrade_smithing_template")),
            base: NativeIngredient::of(item("diamond_sword")),
            addition,
            result: item("netherite_sword"),
            supported,
        }
    }

    #[test]
    fn smithing_handled_requires_support_and_three_slots() {
        let normalizer = normalizer(MutationTable::new());
        let manager = IngredientManager::new();
        let ingot = NativeIngredient::of(item("netherite_ingot"));

        assert!(normalizer.decompose_smithing(&smithing(true, ingot.clone()), &manager).handled);

        let unsupported = normalizer.decompose_smithing(&smithing(false, ingot), &manager);
        assert!(!unsupported.handled);
        assert!(!unsupported.addition.is_empty());

        let missing = normalizer.decompose_smithing(&smithing(true, NativeIngredient::empty()), &manager);
        assert!(!missing.handled);
        assert!(
            normalizer
                .normalize_smithing(&smithing(true, NativeIngredient::empty()), &manager)
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn brewing_skips_no_op_and_rejected_mutations() {
        let wart = item("nether_wart");
        let sugar = item("sugar");
        let table = MutationTable::new()
            .with_rule(potion("minecraft:water"), wart.clone(), potion("minecraft:awkward"))
            .with_rule(potion("minecraft:awkward"), wart.clone(), potion("minecraft:awkward"))
            .with_potion(Stack::item(Identifier::from_static("examplemod", "flask")))
            .with_reagent(sugar.clone());

        let mut manager = manager_with_potions();
        manager
            .add_ingredients(&IngredientKind::item(), [wart.clone(), sugar, item("stick")])
            .unwrap();

        let recipes = normalizer(table)
            .synthesize_brewing_recipes(&manager, &DefaultRecipeFactory)
            .unwrap();
        assert_eq!(recipes.len(), 1);
        assert!(recipes[0].input_potion.matches(&potion("minecraft:water")));
        assert!(recipes[0].output_potion.matches(&potion("minecraft:awkward")));
        assert!(recipes[0].ingredient.matches(&wart));
    }

    #[test]
    fn table_reagents_need_no_registration() {
        let table = MutationTable::new().with_rule(
            potion("minecraft:awkward"),
            item("x"),
            potion("minecraft:mundane"),
        );

        let recipes = normalizer(table)
            .synthesize_brewing_recipes(&IngredientManager::new(), &DefaultRecipeFactory)
            .unwrap();
        assert_eq!(recipes.len(), 1);
        assert!(recipes[0].ingredient.matches(&item("x")));
        assert!(recipes[0].input_potion.matches(&potion("minecraft:awkward")));
        assert!(recipes[0].output_potion.matches(&potion("minecraft:mundane")));
    }

    struct BrokenTable;

    impl PotionMutationTable for BrokenTable {
        fn potions(&self) -> Result<Vec<Stack>, HostError> {
            Err(HostError::Unavailable {
                table: "potions".into(),
                reason: "registry frozen".into(),
            })
        }

        fn reagents(&self) -> Result<Vec<Stack>, HostError> {
            Ok(Vec::new())
        }

        fn is_reagent(&self, _: &Stack) -> bool {
            true
        }

        fn mutate(&self, _: &Stack, _: &Stack) -> Option<Stack> {
            None
        }
    }

    #[test]
    fn brewing_enumeration_failure_is_fatal() {
        let normalizer = RecipeNormalizer::new(
            Arc::new(IngredientHelper::new(PlatformCapabilities::vanilla())),
            Arc::new(BrokenTable),
        );
        let err = normalizer
            .synthesize_brewing_recipes(&IngredientManager::new(), &DefaultRecipeFactory)
            .unwrap_err();
        assert!(matches!(err, NormalizeError::HostEnumeration(_)));
        assert_eq!(err.recipe(), None);
    }

    #[test]
    fn empty_table_yields_no_brewing() {
        let recipes = normalizer(MutationTable::new())
            .synthesize_brewing_recipes(&manager_with_potions(), &DefaultRecipeFactory)
            .unwrap();
        assert!(recipes.is_empty());
    }

    #[test]
    fn normalize_all_drops_malformed_and_keeps_the_rest() {
        let native = NativeRecipes {
            items: Vec::new(),
            crafting: vec![
                shaped("furnace", Some(GridSize::new(3, 3)), 9),
                shaped("broken", Some(GridSize::new(3, 3)), 8),
            ],
            smithing: vec![
                smithing(true, NativeIngredient::of(item("netherite_ingot"))),
                smithing(false, NativeIngredient::of(item("netherite_ingot"))),
            ],
        };

        let normalized = normalizer(MutationTable::new()).normalize_all(
            &native,
            &IngredientManager::new(),
            &CraftingExtensions::new(),
        );
        assert_eq!(normalized.recipes.len(), 2);
        assert_eq!(normalized.diagnostics.count(DiagnosticKind::MalformedRecipe), 1);
        assert_eq!(
            normalized.diagnostics.iter().next().and_then(|d| d.subject.as_deref()),
            Some("minecraft:broken")
        );
    }

    #[test]
    fn unhandled_smithing_is_reported_on_request() {
        let native = NativeRecipes {
            smithing: vec![smithing(false, NativeIngredient::of(item("netherite_ingot")))],
            ..NativeRecipes::default()
        };
        let normalizer = normalizer(MutationTable::new());
        let manager = IngredientManager::new();
        let extensions = CraftingExtensions::new();

        let quiet = normalizer.normalize_all(&native, &manager, &extensions);
        assert!(quiet.recipes.is_empty());
        assert!(quiet.diagnostics.is_empty());

        let options = NormalizeOptions {
            report_unhandled: true,
        };
        let reported = normalizer.normalize_all_with(&native, &manager, &extensions, options);
        assert!(reported.recipes.is_empty());
        assert_eq!(reported.diagnostics.count(DiagnosticKind::UnhandledRecipe), 1);
        assert_eq!(
            reported.diagnostics.iter().next().and_then(|d| d.subject.as_deref()),
            Some("minecraft:netherite_sword_smithing")
        );
    }
}
