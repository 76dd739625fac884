//! Platform-specific ingredient construction.
//!
//! Some ingredients cannot be expressed by the generic model alone: the
//! dye-colored members of an item family, and stacks whose identity depends
//! on auxiliary data. [`PlatformIngredientHelper`] builds those, and exposes
//! the read-only set of accepted brewing containers.
//!
//! Platform capabilities are detected once into [`PlatformCapabilities`] and
//! fixed when the helper is constructed; nothing queries the platform later.
//!
//! # Example
//!
//! ```
//! use pantry_model::{AuxData, DyeColor, Stack};
//! use pantry_platform::{IngredientHelper, PlatformCapabilities, PlatformIngredientHelper, vanilla};
//!
//! let helper = IngredientHelper::new(PlatformCapabilities::vanilla());
//! let blue_box = helper.shulker_dye_variant(DyeColor::Blue);
//!
//! let stack = Stack::item(vanilla::shulker_box()).with_aux(AuxData::COLOR, "blue");
//! assert!(blue_box.matches(&stack));
//! ```

use crate::host::FluidHelper;
use crate::vanilla;
use pantry_model::{
    AuxKey, DyeColor, Identifier, Ingredient, Stack, SubtypeInterpreter, SubtypedStack,
    SyntheticIngredient,
};
use std::sync::Arc;

// ─────────────────────────────────────────────────────────────────────────────
// PlatformCapabilities
// ─────────────────────────────────────────────────────────────────────────────

/// What the platform can do, detected once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformCapabilities {
    /// Whether stacks can be told apart by auxiliary data.
    pub aux_data: bool,
    /// Units in one fluid bucket.
    pub bucket_volume: u32,
    /// Items accepted as potion containers by the brewing stand.
    pub potion_containers: Vec<Stack>,
}

impl PlatformCapabilities {
    /// Capabilities of the reference platform: aux-aware, 1000-unit buckets,
    /// and the three vanilla potion bottles.
    #[must_use]
    pub fn vanilla() -> Self {
        Self {
            aux_data: true,
            bucket_volume: 1000,
            potion_containers: vec![
                Stack::item(vanilla::potion()),
                Stack::item(vanilla::splash_potion()),
                Stack::item(vanilla::lingering_potion()),
            ],
        }
    }

    /// Marks the platform as unable to distinguish aux data.
    #[must_use]
    pub fn without_aux_data(mut self) -> Self {
        self.aux_data = false;
        self
    }

    /// Builds the fluid helper for these capabilities.
    #[must_use]
    pub fn fluid_helper(&self) -> FluidHelper {
        FluidHelper::new(self.bucket_volume, self.aux_data)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ContainerSet
// ─────────────────────────────────────────────────────────────────────────────

/// Immutable snapshot of the ingredients accepted as brewing containers.
///
/// Cloning shares the snapshot; there is no way to mutate it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSet {
    containers: Arc<[Ingredient]>,
}

impl ContainerSet {
    /// Builds a snapshot from container stacks.
    #[must_use]
    pub fn new(containers: impl IntoIterator<Item = Stack>) -> Self {
        let containers: Vec<Ingredient> = containers.into_iter().map(Ingredient::ExactStack).collect();
        Self {
            containers: containers.into(),
        }
    }

    /// Returns true if `stack` sits in an accepted container.
    ///
    /// Only kind and id are compared: the potion inside is aux data.
    #[must_use]
    pub fn accepts(&self, stack: &Stack) -> bool {
        self.containers.iter().any(|container| {
            let container = container.display_stack();
            container.kind() == stack.kind() && container.id() == stack.id()
        })
    }

    /// Iterates the containers.
    pub fn iter(&self) -> impl Iterator<Item = &Ingredient> {
        self.containers.iter()
    }

    /// Returns the number of containers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.containers.len()
    }

    /// Returns true if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.containers.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// PlatformIngredientHelper
// ─────────────────────────────────────────────────────────────────────────────

/// Factory for ingredients the generic model cannot express natively.
pub trait PlatformIngredientHelper: Send + Sync {
    /// Builds the member of `base`'s family selected by `key`.
    ///
    /// Total over [`AuxKey`]: every key yields an ingredient.
    fn synthetic_variant(&self, base: &Identifier, key: AuxKey) -> Ingredient;

    /// Builds an ingredient whose matching consults `interpreter`.
    ///
    /// Platforms that cannot distinguish aux data return an exact-stack
    /// ingredient instead.
    fn subtype_aware_variant(
        &self,
        stack: &Stack,
        interpreter: Arc<dyn SubtypeInterpreter>,
    ) -> Ingredient;

    /// Returns the accepted brewing containers.
    fn accepted_containers(&self) -> &ContainerSet;

    /// The dye-colored shulker box for `color`.
    fn shulker_dye_variant(&self, color: DyeColor) -> Ingredient {
        self.synthetic_variant(&vanilla::shulker_box(), AuxKey::Color(color))
    }

    /// The dye item that colors a shulker box `color`.
    fn dye_variant(&self, color: DyeColor) -> Ingredient {
        Ingredient::ExactStack(Stack::item(vanilla::dye(color)))
    }
}

/// [`PlatformIngredientHelper`] built from [`PlatformCapabilities`].
#[derive(Debug, Clone)]
pub struct IngredientHelper {
    aux_data: bool,
    containers: ContainerSet,
}

impl IngredientHelper {
    /// Creates the helper, snapshotting the container set.
    #[must_use]
    pub fn new(capabilities: PlatformCapabilities) -> Self {
        Self {
            aux_data: capabilities.aux_data,
            containers: ContainerSet::new(capabilities.potion_containers),
        }
    }
}

impl PlatformIngredientHelper for IngredientHelper {
    fn synthetic_variant(&self, base: &Identifier, key: AuxKey) -> Ingredient {
        Ingredient::Synthetic(SyntheticIngredient::new(base.clone(), key))
    }

    fn subtype_aware_variant(
        &self,
        stack: &Stack,
        interpreter: Arc<dyn SubtypeInterpreter>,
    ) -> Ingredient {
        if self.aux_data {
            Ingredient::SubtypedStack(SubtypedStack::new(stack.clone(), interpreter))
        } else {
            tracing::trace!(stack = %stack, "aux data unsupported, using exact match");
            Ingredient::ExactStack(stack.clone())
        }
    }

    fn accepted_containers(&self) -> &ContainerSet {
        &self.containers
    }
}
