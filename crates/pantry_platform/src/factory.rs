//! Construction of vanilla-shaped recipes on behalf of plugins.

use pantry_model::{BrewingRecipe, Ingredient, Slot};

/// Builds vanilla recipe shapes.
///
/// Handed to plugins during recipe registration so that third-party brewing
/// steps come out exactly like the synthesized ones.
pub trait VanillaRecipeFactory: Send + Sync {
    /// Creates a brewing step.
    ///
    /// `ingredients` are the reagent alternatives.
    fn create_brewing_recipe(
        &self,
        ingredients: Vec<Ingredient>,
        input_potion: Ingredient,
        output_potion: Ingredient,
    ) -> BrewingRecipe;
}

/// The stock [`VanillaRecipeFactory`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRecipeFactory;

impl VanillaRecipeFactory for DefaultRecipeFactory {
    fn create_brewing_recipe(
        &self,
        ingredients: Vec<Ingredient>,
        input_potion: Ingredient,
        output_potion: Ingredient,
    ) -> BrewingRecipe {
        BrewingRecipe {
            ingredient: Slot::new(ingredients),
            input_potion,
            output_potion,
        }
    }
}
