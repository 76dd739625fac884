//! The finalized, read-only recipe catalog.
//!
//! A [`Catalog`] is assembled from retained registration data each time a
//! session starts and is never mutated afterwards. It is shared through
//! [`Runtime`](crate::Runtime) handles as an `Arc<Catalog>`.

use hashbrown::HashSet;
use indexmap::IndexMap;
use pantry_model::{Identifier, Ingredient, IngredientManager, Recipe, RecipeCategory, Stack};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::ops::Range;
use std::sync::Arc;

/// Display order of recipes within a category.
///
/// Host enumeration order is not stable across platforms, so a stable order
/// must be requested explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipeOrder {
    /// Registration order (default).
    #[default]
    Registration,
    /// Sorted by recipe uid, then by first output.
    ByIdentity,
}

// ─────────────────────────────────────────────────────────────────────────────
// Registered extras
// ─────────────────────────────────────────────────────────────────────────────

/// Moves recipe inputs from a container's slots into its crafting slots.
///
/// Describes the slot layout only; executing transfers is up to the host.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecipeTransferInfo {
    /// Category whose recipes can be transferred.
    pub category: Identifier,
    /// Container (menu) type the transfer applies to.
    pub container: Identifier,
    /// Crafting slots of the container.
    pub recipe_slots: Range<usize>,
    /// Inventory slots ingredients are taken from.
    pub inventory_slots: Range<usize>,
}

/// A clickable area of a host screen that opens one or more categories.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GuiRegion {
    /// Screen the region belongs to.
    pub screen: String,
    /// Left edge, in screen pixels.
    pub x: i32,
    /// Top edge, in screen pixels.
    pub y: i32,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Categories shown when the region is clicked.
    pub categories: Vec<Identifier>,
}

/// Supplies recipes the catalog cannot enumerate up front.
///
/// Queried on every lookup; results are merged after catalog recipes.
pub trait RecipeLookup: Send + Sync {
    /// Recipes consuming `stack`.
    fn recipes_with_input(&self, stack: &Stack) -> Vec<Recipe>;

    /// Recipes producing `stack`.
    fn recipes_with_output(&self, _stack: &Stack) -> Vec<Recipe> {
        Vec::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Catalog
// ─────────────────────────────────────────────────────────────────────────────

/// One category and everything attached to it.
#[derive(Debug, Clone)]
struct CategoryEntry {
    category: RecipeCategory,
    recipes: Vec<Recipe>,
    catalysts: Vec<Ingredient>,
}

/// Everything a catalog is assembled from.
#[derive(Default)]
pub(crate) struct CatalogParts {
    pub(crate) categories: Vec<RecipeCategory>,
    pub(crate) recipes: Vec<Recipe>,
    pub(crate) catalysts: Vec<(Identifier, Ingredient)>,
    pub(crate) transfer_handlers: Vec<RecipeTransferInfo>,
    pub(crate) gui_regions: Vec<GuiRegion>,
    pub(crate) lookups: Vec<Arc<dyn RecipeLookup>>,
    pub(crate) ingredients: IngredientManager,
}

/// Recipe identity for deduplication: `(category, uid)` when a uid exists,
/// otherwise the whole recipe.
#[derive(PartialEq, Eq, Hash)]
enum RecipeKey<'a> {
    Uid(&'a Identifier, &'a Identifier),
    Structural(&'a Recipe),
}

impl<'a> RecipeKey<'a> {
    fn of(recipe: &'a Recipe) -> Self {
        match recipe.uid() {
            Some(uid) => RecipeKey::Uid(recipe.category(), uid),
            None => RecipeKey::Structural(recipe),
        }
    }
}

/// The immutable catalog of one session.
pub struct Catalog {
    categories: IndexMap<Identifier, CategoryEntry>,
    transfer_handlers: Vec<RecipeTransferInfo>,
    gui_regions: Vec<GuiRegion>,
    lookups: Vec<Arc<dyn RecipeLookup>>,
    ingredients: IngredientManager,
    order: RecipeOrder,
}

impl core::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Catalog")
            .field("categories", &self.categories.keys().collect::<Vec<_>>())
            .field("recipes", &self.recipe_count())
            .field("lookups", &self.lookups.len())
            .field("order", &self.order)
            .finish_non_exhaustive()
    }
}

impl Catalog {
    /// Assembles a catalog, dropping duplicates and anything that names a
    /// category that does not exist.
    pub(crate) fn assemble(parts: CatalogParts, order: RecipeOrder) -> Self {
        let mut categories: IndexMap<Identifier, CategoryEntry> = parts
            .categories
            .into_iter()
            .map(|category| {
                let entry = CategoryEntry {
                    category: category.clone(),
                    recipes: Vec::new(),
                    catalysts: Vec::new(),
                };
                (category.id().clone(), entry)
            })
            .collect();

        {
            let mut seen: HashSet<RecipeKey<'_>> = HashSet::new();
            for recipe in &parts.recipes {
                if !seen.insert(RecipeKey::of(recipe)) {
                    tracing::trace!(recipe = %recipe, "duplicate recipe dropped");
                    continue;
                }
                match categories.get_mut(recipe.category()) {
                    Some(entry) => entry.recipes.push(recipe.clone()),
                    None => tracing::debug!(
                        recipe = %recipe,
                        category = %recipe.category(),
                        "recipe category was withdrawn"
                    ),
                }
            }
        }

        for (category, catalyst) in parts.catalysts {
            if let Some(entry) = categories.get_mut(&category)
                && !entry.catalysts.contains(&catalyst)
            {
                entry.catalysts.push(catalyst);
            }
        }

        if order == RecipeOrder::ByIdentity {
            for entry in categories.values_mut() {
                entry.recipes.sort_by_cached_key(|recipe| {
                    (
                        recipe.uid().cloned(),
                        recipe.outputs().first().map(ToString::to_string),
                    )
                });
            }
        }

        let transfer_handlers = parts
            .transfer_handlers
            .into_iter()
            .filter(|info| categories.contains_key(&info.category))
            .collect();
        let gui_regions = parts
            .gui_regions
            .into_iter()
            .filter(|region| region.categories.iter().all(|id| categories.contains_key(id)))
            .collect();

        let catalog = Self {
            categories,
            transfer_handlers,
            gui_regions,
            lookups: parts.lookups,
            ingredients: parts.ingredients,
            order,
        };
        tracing::info!(
            categories = catalog.categories.len(),
            recipes = catalog.recipe_count(),
            order = ?order,
            "catalog assembled"
        );
        catalog
    }

    /// Lists categories in registration order.
    pub fn categories(&self) -> impl Iterator<Item = &RecipeCategory> {
        self.categories.values().map(|entry| &entry.category)
    }

    /// Returns the category with `id`.
    #[must_use]
    pub fn category(&self, id: &Identifier) -> Option<&RecipeCategory> {
        self.categories.get(id).map(|entry| &entry.category)
    }

    /// Returns the recipes of a category in display order.
    ///
    /// Unknown categories have no recipes.
    #[must_use]
    pub fn recipes(&self, category: &Identifier) -> &[Recipe] {
        self.categories
            .get(category)
            .map_or(&[], |entry| entry.recipes.as_slice())
    }

    /// Returns the catalysts of a category.
    #[must_use]
    pub fn catalysts(&self, category: &Identifier) -> &[Ingredient] {
        self.categories
            .get(category)
            .map_or(&[], |entry| entry.catalysts.as_slice())
    }

    /// Recipes producing `stack`, followed by lookup results.
    #[must_use]
    pub fn recipes_with_output(&self, stack: &Stack) -> Vec<Cow<'_, Recipe>> {
        let mut found: Vec<Cow<'_, Recipe>> = self
            .all_recipes()
            .filter(|recipe| recipe.outputs().iter().any(|output| output.matches(stack)))
            .map(Cow::Borrowed)
            .collect();
        for lookup in &self.lookups {
            found.extend(lookup.recipes_with_output(stack).into_iter().map(Cow::Owned));
        }
        found
    }

    /// Recipes consuming `stack`, followed by lookup results.
    ///
    /// A catalyst counts as an input for lookup purposes.
    #[must_use]
    pub fn recipes_with_input(&self, stack: &Stack) -> Vec<Cow<'_, Recipe>> {
        let mut found: Vec<Cow<'_, Recipe>> = self
            .all_recipes()
            .filter(|recipe| {
                recipe.inputs().iter().any(|slot| slot.matches(stack))
                    || recipe.catalyst().is_some_and(|catalyst| catalyst.matches(stack))
            })
            .map(Cow::Borrowed)
            .collect();
        for lookup in &self.lookups {
            found.extend(lookup.recipes_with_input(stack).into_iter().map(Cow::Owned));
        }
        found
    }

    /// Returns the transfer handlers.
    #[must_use]
    pub fn transfer_handlers(&self) -> &[RecipeTransferInfo] {
        &self.transfer_handlers
    }

    /// Returns the regions registered for `screen`.
    pub fn gui_regions<'a>(&'a self, screen: &'a str) -> impl Iterator<Item = &'a GuiRegion> {
        self.gui_regions
            .iter()
            .filter(move |region| region.screen == screen)
    }

    /// Returns the total number of recipes across categories.
    #[must_use]
    pub fn recipe_count(&self) -> usize {
        self.categories.values().map(|entry| entry.recipes.len()).sum()
    }

    /// Returns the ingredient manager the catalog was built with.
    #[must_use]
    pub fn ingredient_manager(&self) -> &IngredientManager {
        &self.ingredients
    }

    /// Returns the display order in effect.
    #[must_use]
    pub fn order(&self) -> RecipeOrder {
        self.order
    }

    fn all_recipes(&self) -> impl Iterator<Item = &Recipe> {
        self.categories.values().flat_map(|entry| entry.recipes.iter())
    }
}
