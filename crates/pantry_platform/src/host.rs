//! Boundary contracts with the host engine.
//!
//! The host exposes brewing as a transformation function rather than as a
//! recipe list. [`PotionMutationTable`] is the queryable form of that
//! function; [`MutationTable`] is a data-backed implementation for hosts that
//! dump their rules, and for tests.

use pantry_model::{Identifier, IngredientKind, Stack};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A host collaborator could not be queried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The host table exists but cannot be read right now.
    #[error("host table '{table}' is unavailable: {reason}")]
    Unavailable {
        /// Table name.
        table: String,
        /// Host-supplied reason.
        reason: String,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// PotionMutationTable
// ─────────────────────────────────────────────────────────────────────────────

/// The host's potion-mutation rules: `(potion, reagent) -> potion`.
pub trait PotionMutationTable: Send + Sync {
    /// Lists every potion the host knows, each in its container.
    ///
    /// # Errors
    ///
    /// Returns [`HostError`] when the table cannot be enumerated. An empty
    /// table is `Ok(vec![])`, never an error.
    fn potions(&self) -> Result<Vec<Stack>, HostError>;

    /// Lists the reagents the host names in its rules.
    ///
    /// Items registered elsewhere may still be reagents; [`is_reagent`]
    /// decides for those.
    ///
    /// [`is_reagent`]: PotionMutationTable::is_reagent
    ///
    /// # Errors
    ///
    /// Returns [`HostError`] when the table cannot be enumerated.
    fn reagents(&self) -> Result<Vec<Stack>, HostError>;

    /// Returns true if the host accepts `reagent` in a brewing stand.
    fn is_reagent(&self, reagent: &Stack) -> bool;

    /// Applies `reagent` to `potion`. `None` means "no change".
    fn mutate(&self, potion: &Stack, reagent: &Stack) -> Option<Stack>;
}

/// One `(potion, reagent) -> output` rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationRule {
    /// Potion consumed.
    pub potion: Stack,
    /// Reagent applied.
    pub reagent: Stack,
    /// Potion produced.
    pub output: Stack,
}

/// A [`PotionMutationTable`] backed by an explicit rule list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationTable {
    potions: Vec<Stack>,
    reagents: Vec<Stack>,
    rules: Vec<MutationRule>,
}

impl MutationTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a potion.
    #[must_use]
    pub fn with_potion(mut self, potion: Stack) -> Self {
        if !self.potions.iter().any(|p| p.same_variant(&potion)) {
            self.potions.push(potion);
        }
        self
    }

    /// Declares a valid reagent without adding a rule.
    #[must_use]
    pub fn with_reagent(mut self, reagent: Stack) -> Self {
        if !self.reagents.iter().any(|r| r.same_variant(&reagent)) {
            self.reagents.push(reagent);
        }
        self
    }

    /// Adds a rule, declaring its potions and reagent.
    #[must_use]
    pub fn with_rule(self, potion: Stack, reagent: Stack, output: Stack) -> Self {
        let mut table = self
            .with_potion(potion.clone())
            .with_potion(output.clone())
            .with_reagent(reagent.clone());
        table.rules.push(MutationRule {
            potion,
            reagent,
            output,
        });
        table
    }

    /// Returns the rules.
    #[must_use]
    pub fn rules(&self) -> &[MutationRule] {
        &self.rules
    }
}

impl PotionMutationTable for MutationTable {
    fn potions(&self) -> Result<Vec<Stack>, HostError> {
        Ok(self.potions.clone())
    }

    fn reagents(&self) -> Result<Vec<Stack>, HostError> {
        Ok(self.reagents.clone())
    }

    fn is_reagent(&self, reagent: &Stack) -> bool {
        self.reagents.iter().any(|r| r.same_variant(reagent))
    }

    fn mutate(&self, potion: &Stack, reagent: &Stack) -> Option<Stack> {
        self.rules
            .iter()
            .find(|rule| rule.potion.same_variant(potion) && rule.reagent.same_variant(reagent))
            .map(|rule| rule.output.clone())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// PlatformFluidHelper
// ─────────────────────────────────────────────────────────────────────────────

/// Platform-specific fluid construction, handed to fluid subtype registration.
pub trait PlatformFluidHelper: Send + Sync {
    /// The ingredient kind fluids use on this platform.
    fn kind(&self) -> IngredientKind {
        IngredientKind::fluid()
    }

    /// Units in one bucket on this platform.
    fn bucket_volume(&self) -> u32;

    /// Creates a fluid stack.
    fn create(&self, fluid: Identifier, amount: u32) -> Stack {
        Stack::new(self.kind(), fluid, amount)
    }

    /// Whether fluids on this platform carry auxiliary data worth interpreting.
    fn supports_aux_data(&self) -> bool;
}

/// [`PlatformFluidHelper`] configured from detected capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FluidHelper {
    bucket_volume: u32,
    aux_data: bool,
}

impl FluidHelper {
    /// Creates a helper.
    #[must_use]
    pub fn new(bucket_volume: u32, aux_data: bool) -> Self {
        Self {
            bucket_volume,
            aux_data,
        }
    }
}

impl PlatformFluidHelper for FluidHelper {
    fn bucket_volume(&self) -> u32 {
        self.bucket_volume
    }

    fn supports_aux_data(&self) -> bool {
        self.aux_data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vanilla;
    use pantry_model::AuxData;

    fn potion(kind: &str) -> Stack {
        Stack::item(vanilla::potion()).with_aux(AuxData::POTION, kind)
    }

    #[test]
    fn mutation_table_lookup() {
        let wart = Stack::item(Identifier::from_static("minecraft", "nether_wart"));
        let table = MutationTable::new().with_rule(
            potion("minecraft:water"),
            wart.clone(),
            potion("minecraft:awkward"),
        );

        assert_eq!(table.potions().unwrap().len(), 2);
        assert!(table.is_reagent(&wart));
        assert_eq!(
            table.mutate(&potion("minecraft:water"), &wart),
            Some(potion("minecraft:awkward"))
        );
        assert_eq!(table.mutate(&potion("minecraft:awkward"), &wart), None);
    }

    #[test]
    fn fluid_helper_creates_fluid_stacks() {
        let helper = FluidHelper::new(81_000, true);
        let water = helper.create(Identifier::from_static("minecraft", "water"), helper.bucket_volume());
        assert_eq!(water.kind(), &IngredientKind::fluid());
        assert_eq!(water.amount(), 81_000);
        assert!(helper.supports_aux_data());
    }
}
