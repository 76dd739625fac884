//! Canonical recipes and the specialized views they are built from.
//!
//! A [`Recipe`] is immutable once built. Construction goes through
//! [`RecipeBuilder`], which enforces the grid invariant
//! `width * height == inputs.len()`.
//!
//! # Example
//!
//! ```
//! use pantry_model::{GridSize, Identifier, Ingredient, Recipe, Slot, Stack, category_ids};
//!
//! let plank = Stack::item(Identifier::from_static("minecraft", "oak_planks"));
//! let stick = Stack::item(Identifier::from_static("minecraft", "stick")).with_amount(4);
//!
//! let recipe = Recipe::builder(category_ids::crafting())
//!     .grid(GridSize::new(1, 2))
//!     .input(Slot::of(plank.clone()))
//!     .input(Slot::of(plank))
//!     .output(Ingredient::from(stick))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(recipe.inputs().len(), 2);
//! ```

use crate::identifier::Identifier;
use crate::ingredient::{Ingredient, Slot};
use core::fmt;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifiers of the built-in recipe categories.
pub mod category_ids {
    use crate::identifier::Identifier;

    /// `minecraft:crafting`
    #[must_use]
    pub fn crafting() -> Identifier {
        Identifier::from_static("minecraft", "crafting")
    }

    /// `minecraft:smithing`
    #[must_use]
    pub fn smithing() -> Identifier {
        Identifier::from_static("minecraft", "smithing")
    }

    /// `minecraft:brewing`
    #[must_use]
    pub fn brewing() -> Identifier {
        Identifier::from_static("minecraft", "brewing")
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// A recipe violated a structural invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecipeError {
    /// A grid dimension was zero.
    #[error("grid {width}x{height} has a zero dimension")]
    ZeroDimension {
        /// Declared width.
        width: u32,
        /// Declared height.
        height: u32,
    },

    /// The grid does not have one cell per input slot.
    #[error("grid {width}x{height} does not fit {inputs} input slots")]
    GeometryMismatch {
        /// Declared width.
        width: u32,
        /// Declared height.
        height: u32,
        /// Number of input slots.
        inputs: usize,
    },

    /// The recipe produces nothing.
    #[error("recipe has no outputs")]
    NoOutputs,
}

// ─────────────────────────────────────────────────────────────────────────────
// GridSize
// ─────────────────────────────────────────────────────────────────────────────

/// Declared grid geometry of a grid-shaped recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    /// Columns.
    pub width: u32,
    /// Rows.
    pub height: u32,
}

impl GridSize {
    /// The single-cell fallback used when no size is declared.
    pub const SINGLE: GridSize = GridSize { width: 1, height: 1 };

    /// Creates a grid size.
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Returns the number of cells.
    #[must_use]
    pub fn cells(self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self::SINGLE
    }
}

impl fmt::Display for GridSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// RecipeCategory
// ─────────────────────────────────────────────────────────────────────────────

/// A named kind of transformation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RecipeCategory {
    id: Identifier,
    title: String,
    icon: Option<Ingredient>,
}

impl RecipeCategory {
    /// Creates a category.
    #[must_use]
    pub fn new(id: Identifier, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            icon: None,
        }
    }

    /// Sets the icon shown for the category.
    #[must_use]
    pub fn with_icon(mut self, icon: impl Into<Ingredient>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Returns the category id.
    #[must_use]
    pub fn id(&self) -> &Identifier {
        &self.id
    }

    /// Returns the display title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the icon, if any.
    #[must_use]
    pub fn icon(&self) -> Option<&Ingredient> {
        self.icon.as_ref()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Recipe
// ─────────────────────────────────────────────────────────────────────────────

/// A canonical, platform-independent recipe.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Recipe {
    uid: Option<Identifier>,
    category: Identifier,
    inputs: Vec<Slot>,
    grid: Option<GridSize>,
    outputs: Vec<Ingredient>,
    catalyst: Option<Ingredient>,
}

impl Recipe {
    /// Starts building a recipe in `category`.
    #[must_use]
    pub fn builder(category: Identifier) -> RecipeBuilder {
        RecipeBuilder::new(category)
    }

    /// Returns the id of the native recipe this came from, if known.
    #[must_use]
    pub fn uid(&self) -> Option<&Identifier> {
        self.uid.as_ref()
    }

    /// Returns the category id.
    #[must_use]
    pub fn category(&self) -> &Identifier {
        &self.category
    }

    /// Returns the input slots in order.
    #[must_use]
    pub fn inputs(&self) -> &[Slot] {
        &self.inputs
    }

    /// Returns the grid geometry for grid-shaped recipes.
    #[must_use]
    pub fn grid(&self) -> Option<GridSize> {
        self.grid
    }

    /// Returns the outputs.
    #[must_use]
    pub fn outputs(&self) -> &[Ingredient] {
        &self.outputs
    }

    /// Returns the catalyst, used for filtering only.
    #[must_use]
    pub fn catalyst(&self) -> Option<&Ingredient> {
        self.catalyst.as_ref()
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.uid {
            Some(uid) => write!(f, "{uid} ({})", self.category),
            None => match self.outputs.first() {
                Some(output) => write!(f, "<unnamed> -> {output} ({})", self.category),
                None => write!(f, "<unnamed> ({})", self.category),
            },
        }
    }
}

/// Builder for [`Recipe`].
#[derive(Debug, Clone)]
pub struct RecipeBuilder {
    uid: Option<Identifier>,
    category: Identifier,
    inputs: Vec<Slot>,
    grid: Option<GridSize>,
    outputs: Vec<Ingredient>,
    catalyst: Option<Ingredient>,
}

impl RecipeBuilder {
    /// Creates a builder for `category`.
    #[must_use]
    pub fn new(category: Identifier) -> Self {
        Self {
            uid: None,
            category,
            inputs: Vec::new(),
            grid: None,
            outputs: Vec::new(),
            catalyst: None,
        }
    }

    /// Sets the native recipe id.
    #[must_use]
    pub fn uid(mut self, uid: Identifier) -> Self {
        self.uid = Some(uid);
        self
    }

    /// Appends an input slot.
    #[must_use]
    pub fn input(mut self, slot: impl Into<Slot>) -> Self {
        self.inputs.push(slot.into());
        self
    }

    /// Appends several input slots.
    #[must_use]
    pub fn inputs(mut self, slots: impl IntoIterator<Item = Slot>) -> Self {
        self.inputs.extend(slots);
        self
    }

    /// Declares grid geometry.
    #[must_use]
    pub fn grid(mut self, grid: GridSize) -> Self {
        self.grid = Some(grid);
        self
    }

    /// Appends an output.
    #[must_use]
    pub fn output(mut self, output: impl Into<Ingredient>) -> Self {
        self.outputs.push(output.into());
        self
    }

    /// Sets the catalyst.
    #[must_use]
    pub fn catalyst(mut self, catalyst: impl Into<Ingredient>) -> Self {
        self.catalyst = Some(catalyst.into());
        self
    }

    /// Validates and builds the recipe.
    ///
    /// # Errors
    ///
    /// - [`RecipeError::ZeroDimension`] if a declared grid dimension is zero
    /// - [`RecipeError::GeometryMismatch`] if `width * height != inputs.len()`
    /// - [`RecipeError::NoOutputs`] if no output was added
    pub fn build(self) -> Result<Recipe, RecipeError> {
        if let Some(grid) = self.grid {
            if grid.width == 0 || grid.height == 0 {
                return Err(RecipeError::ZeroDimension {
                    width: grid.width,
                    height: grid.height,
                });
            }
            if grid.cells() != self.inputs.len() {
                return Err(RecipeError::GeometryMismatch {
                    width: grid.width,
                    height: grid.height,
                    inputs: self.inputs.len(),
                });
            }
        }
        if self.outputs.is_empty() {
            return Err(RecipeError::NoOutputs);
        }

        Ok(Recipe {
            uid: self.uid,
            category: self.category,
            inputs: self.inputs,
            grid: self.grid,
            outputs: self.outputs,
            catalyst: self.catalyst,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SmithingRecipeView
// ─────────────────────────────────────────────────────────────────────────────

/// The three named slots of a smithing recipe plus its validity flag.
///
/// Extraction never depends on `handled`, so diagnostics can inspect
/// unhandled recipes. Only handled views become canonical recipes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmithingRecipeView {
    /// Smithing template slot.
    pub template: Slot,
    /// Item being upgraded or decorated.
    pub base: Slot,
    /// Material added to the base.
    pub addition: Slot,
    /// Whether the canonical model supports this recipe.
    pub handled: bool,
}

impl SmithingRecipeView {
    /// Converts the view into a smithing recipe producing `result`.
    ///
    /// Returns `None` for unhandled views.
    #[must_use]
    pub fn to_recipe(&self, uid: Option<Identifier>, result: Ingredient) -> Option<Recipe> {
        if !self.handled {
            return None;
        }
        Some(Recipe {
            uid,
            category: category_ids::smithing(),
            inputs: vec![self.template.clone(), self.base.clone(), self.addition.clone()],
            grid: None,
            outputs: vec![result],
            catalyst: None,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// BrewingRecipe
// ─────────────────────────────────────────────────────────────────────────────

/// A brewing step reconstructed from the host's potion-mutation rules.
///
/// Two brewing recipes are the same entry when [`BrewingRecipe::key`] is equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BrewingRecipe {
    /// Reagent alternatives.
    pub ingredient: Slot,
    /// Potion consumed.
    pub input_potion: Ingredient,
    /// Potion produced.
    pub output_potion: Ingredient,
}

impl BrewingRecipe {
    /// Returns the `(ingredient, input_potion)` identity pair.
    #[must_use]
    pub fn key(&self) -> (&Slot, &Ingredient) {
        (&self.ingredient, &self.input_potion)
    }

    /// Converts into a canonical brewing recipe.
    ///
    /// Inputs are `[input_potion, ingredient]`; the output is `output_potion`.
    #[must_use]
    pub fn to_recipe(&self) -> Recipe {
        Recipe {
            uid: None,
            category: category_ids::brewing(),
            inputs: vec![Slot::of(self.input_potion.clone()), self.ingredient.clone()],
            grid: None,
            outputs: vec![self.output_potion.clone()],
            catalyst: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stack::Stack;

    fn item(path: &'static str) -> Stack {
        Stack::item(Identifier::from_static("minecraft", path))
    }

    #[test]
    fn builder_accepts_matching_grid() {
        let recipe = Recipe::builder(category_ids::crafting())
            .grid(GridSize::new(2, 2))
            .inputs((0..4).map(|_| Slot::of(item("iron_ingot"))))
            .output(item("iron_block"))
            .build()
            .unwrap();

        assert_eq!(recipe.grid(), Some(GridSize::new(2, 2)));
        assert_eq!(recipe.inputs().len(), 4);
    }

    #[test]
    fn builder_rejects_mismatched_grid() {
        let err = Recipe::builder(category_ids::crafting())
            .grid(GridSize::new(3, 3))
            .inputs((0..8).map(|_| Slot::empty()))
            .output(item("chest"))
            .build()
            .unwrap_err();

        assert_eq!(
            err,
            RecipeError::GeometryMismatch {
                width: 3,
                height: 3,
                inputs: 8
            }
        );
    }

    #[test]
    fn builder_rejects_zero_dimension() {
        let err = Recipe::builder(category_ids::crafting())
            .grid(GridSize::new(0, 3))
            .output(item("chest"))
            .build()
            .unwrap_err();
        assert!(matches!(err, RecipeError::ZeroDimension { width: 0, .. }));
    }

    #[test]
    fn builder_requires_output() {
        let err = Recipe::builder(category_ids::brewing()).build().unwrap_err();
        assert_eq!(err, RecipeError::NoOutputs);
    }

    #[test]
    fn unhandled_smithing_view_yields_no_recipe() {
        let view = SmithingRecipeView {
            template: Slot::of(item("netherite_upgrade_smithing_template")),
            base: Slot::of(item("diamond_sword")),
            addition: Slot::of(item("netherite_ingot")),
            handled: false,
        };
        assert!(view.to_recipe(None, item("netherite_sword").into()).is_none());

        let handled = SmithingRecipeView { handled: true, ..view };
        let recipe = handled.to_recipe(None, item("netherite_sword").into()).unwrap();
        assert_eq!(recipe.category(), &category_ids::smithing());
        assert_eq!(recipe.inputs().len(), 3);
    }

    #[test]
    fn brewing_recipe_layout() {
        let brewing = BrewingRecipe {
            ingredient: Slot::of(item("nether_wart")),
            input_potion: item("water_bottle").into(),
            output_potion: item("awkward_potion").into(),
        };
        let recipe = brewing.to_recipe();
        assert_eq!(recipe.inputs()[0], Slot::of(item("water_bottle")));
        assert_eq!(recipe.inputs()[1], Slot::of(item("nether_wart")));
        assert_eq!(recipe.outputs(), &[Ingredient::from(item("awkward_potion"))]);
    }
}
