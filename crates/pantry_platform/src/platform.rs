//! The bundle of platform collaborators handed to the plugin lifecycle.

use crate::factory::{DefaultRecipeFactory, VanillaRecipeFactory};
use crate::host::{PlatformFluidHelper, PotionMutationTable};
use crate::ingredient_helper::{IngredientHelper, PlatformCapabilities, PlatformIngredientHelper};
use crate::normalizer::RecipeNormalizer;
use std::sync::Arc;

/// Everything platform-specific the lifecycle needs, detected once.
///
/// # Example
///
/// ```
/// use pantry_platform::{MutationTable, PlatformCapabilities, PlatformContext, PlatformFluidHelper};
/// use std::sync::Arc;
///
/// let platform = PlatformContext::new(PlatformCapabilities::vanilla(), Arc::new(MutationTable::new()));
/// assert_eq!(platform.fluid_helper().bucket_volume(), 1000);
/// ```
#[derive(Clone)]
pub struct PlatformContext {
    capabilities: PlatformCapabilities,
    ingredient_helper: Arc<dyn PlatformIngredientHelper>,
    fluid_helper: Arc<dyn PlatformFluidHelper>,
    mutations: Arc<dyn PotionMutationTable>,
    recipe_factory: Arc<dyn VanillaRecipeFactory>,
    normalizer: RecipeNormalizer,
}

impl core::fmt::Debug for PlatformContext {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PlatformContext")
            .field("capabilities", &self.capabilities)
            .finish_non_exhaustive()
    }
}

impl PlatformContext {
    /// Builds the stock collaborators from detected capabilities.
    #[must_use]
    pub fn new(capabilities: PlatformCapabilities, mutations: Arc<dyn PotionMutationTable>) -> Self {
        let ingredient_helper: Arc<dyn PlatformIngredientHelper> =
            Arc::new(IngredientHelper::new(capabilities.clone()));
        let fluid_helper: Arc<dyn PlatformFluidHelper> = Arc::new(capabilities.fluid_helper());
        let normalizer = RecipeNormalizer::new(Arc::clone(&ingredient_helper), Arc::clone(&mutations));
        Self {
            capabilities,
            ingredient_helper,
            fluid_helper,
            mutations,
            recipe_factory: Arc::new(DefaultRecipeFactory),
            normalizer,
        }
    }

    /// Replaces the recipe factory.
    #[must_use]
    pub fn with_recipe_factory(mut self, factory: Arc<dyn VanillaRecipeFactory>) -> Self {
        self.recipe_factory = factory;
        self
    }

    /// Replaces the fluid helper.
    #[must_use]
    pub fn with_fluid_helper(mut self, helper: Arc<dyn PlatformFluidHelper>) -> Self {
        self.fluid_helper = helper;
        self
    }

    /// Returns the detected capabilities.
    #[must_use]
    pub fn capabilities(&self) -> &PlatformCapabilities {
        &self.capabilities
    }

    /// Returns the ingredient helper.
    #[must_use]
    pub fn ingredient_helper(&self) -> &dyn PlatformIngredientHelper {
        self.ingredient_helper.as_ref()
    }

    /// Returns the fluid helper.
    #[must_use]
    pub fn fluid_helper(&self) -> &dyn PlatformFluidHelper {
        self.fluid_helper.as_ref()
    }

    /// Returns the host's potion-mutation table.
    #[must_use]
    pub fn mutations(&self) -> &dyn PotionMutationTable {
        self.mutations.as_ref()
    }

    /// Returns the recipe factory.
    #[must_use]
    pub fn recipe_factory(&self) -> &dyn VanillaRecipeFactory {
        self.recipe_factory.as_ref()
    }

    /// Returns the recipe normalizer.
    #[must_use]
    pub fn normalizer(&self) -> &RecipeNormalizer {
        &self.normalizer
    }
}
