//! Ingredient kinds, declared ingredients, and subtype interpreters.

use crate::identifier::Identifier;
use crate::ingredient::{Ingredient, SubtypeInterpreter, SubtypedStack};
use crate::stack::{AuxData, IngredientKind, Stack};
use hashbrown::HashMap;
use indexmap::IndexMap;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised by the [`IngredientManager`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngredientError {
    /// A stack referenced a kind nobody registered.
    #[error("unknown ingredient kind '{0}'")]
    UnknownKind(IngredientKind),

    /// A second interpreter was registered for the same stack id.
    #[error("subtype interpreter already registered for {kind} '{id}'")]
    DuplicateInterpreter {
        /// Ingredient kind.
        kind: IngredientKind,
        /// Stack id.
        id: Identifier,
    },
}

/// Registry of ingredient kinds, their declared ingredients, and the
/// subtype interpreters used to build ingredients from stacks.
///
/// Mutable while plugins register, then shared read-only with the catalog.
#[derive(Clone)]
pub struct IngredientManager {
    kinds: IndexMap<IngredientKind, Declared>,
    interpreters: HashMap<(IngredientKind, Identifier), Arc<dyn SubtypeInterpreter>>,
}

/// Declared stacks of one kind, keyed by variant.
type Declared = IndexMap<(Identifier, AuxData), Stack>;

impl core::fmt::Debug for IngredientManager {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("IngredientManager")
            .field("kinds", &self.kinds.keys().collect::<Vec<_>>())
            .field("interpreters", &self.interpreters.len())
            .finish()
    }
}

impl Default for IngredientManager {
    fn default() -> Self {
        Self::new()
    }
}

impl IngredientManager {
    /// Creates a manager knowing the built-in item and fluid kinds.
    #[must_use]
    pub fn new() -> Self {
        let mut kinds = IndexMap::new();
        kinds.insert(IngredientKind::item(), Declared::new());
        kinds.insert(IngredientKind::fluid(), Declared::new());
        Self {
            kinds,
            interpreters: HashMap::new(),
        }
    }

    /// Registers a kind. Returns `false` if it was already known.
    pub fn register_kind(&mut self, kind: IngredientKind) -> bool {
        if self.kinds.contains_key(&kind) {
            return false;
        }
        self.kinds.insert(kind, Declared::new());
        true
    }

    /// Declares ingredients of a registered kind.
    ///
    /// Stacks of an already-declared variant are ignored; amounts do not
    /// distinguish variants.
    ///
    /// # Errors
    ///
    /// Returns [`IngredientError::UnknownKind`] if `kind` is not registered.
    pub fn add_ingredients(
        &mut self,
        kind: &IngredientKind,
        stacks: impl IntoIterator<Item = Stack>,
    ) -> Result<(), IngredientError> {
        let declared = self
            .kinds
            .get_mut(kind)
            .ok_or_else(|| IngredientError::UnknownKind(kind.clone()))?;
        for stack in stacks {
            declared
                .entry((stack.id().clone(), stack.aux().clone()))
                .or_insert(stack);
        }
        Ok(())
    }

    /// Registers the interpreter for stacks of `kind` with id `id`.
    ///
    /// # Errors
    ///
    /// Returns [`IngredientError::DuplicateInterpreter`] if one is already registered.
    pub fn register_interpreter(
        &mut self,
        kind: IngredientKind,
        id: Identifier,
        interpreter: Arc<dyn SubtypeInterpreter>,
    ) -> Result<(), IngredientError> {
        let key = (kind, id);
        if self.interpreters.contains_key(&key) {
            let (kind, id) = key;
            return Err(IngredientError::DuplicateInterpreter { kind, id });
        }
        self.interpreters.insert(key, interpreter);
        Ok(())
    }

    /// Returns true if `kind` is registered.
    #[must_use]
    pub fn has_kind(&self, kind: &IngredientKind) -> bool {
        self.kinds.contains_key(kind)
    }

    /// Lists registered kinds in registration order.
    #[must_use]
    pub fn kinds(&self) -> Vec<&IngredientKind> {
        self.kinds.keys().collect()
    }

    /// Returns the declared ingredients of `kind` in declaration order.
    pub fn ingredients<'m>(&'m self, kind: &IngredientKind) -> impl Iterator<Item = &'m Stack> + use<'m> {
        self.kinds.get(kind).into_iter().flat_map(IndexMap::values)
    }

    /// Returns the interpreter registered for `stack`'s id, if any.
    #[must_use]
    pub fn interpreter_for(&self, stack: &Stack) -> Option<&Arc<dyn SubtypeInterpreter>> {
        self.interpreters
            .get(&(stack.kind().clone(), stack.id().clone()))
    }

    /// Returns the subtype of `stack` according to its interpreter.
    #[must_use]
    pub fn subtype_of(&self, stack: &Stack) -> Option<String> {
        self.interpreter_for(stack)
            .and_then(|interpreter| interpreter.subtype(stack))
    }

    /// Converts a stack into an ingredient.
    ///
    /// Stacks with a registered interpreter become [`Ingredient::SubtypedStack`];
    /// others become [`Ingredient::ExactStack`].
    ///
    /// # Errors
    ///
    /// Returns [`IngredientError::UnknownKind`] for unregistered kinds.
    pub fn ingredient_for(&self, stack: &Stack) -> Result<Ingredient, IngredientError> {
        if !self.has_kind(stack.kind()) {
            return Err(IngredientError::UnknownKind(stack.kind().clone()));
        }
        Ok(match self.interpreter_for(stack) {
            Some(interpreter) => {
                Ingredient::SubtypedStack(SubtypedStack::new(stack.clone(), Arc::clone(interpreter)))
            }
            None => Ingredient::ExactStack(stack.clone()),
        })
    }
}


#[cfg(test)]
mod prop_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        /// Each variant is declared once, in first-seen order, whatever the amounts.
        #[test]
        fn prop_declarations_are_unique_per_variant(
            picks in proptest::collection::vec((0u8..6, 0u8..2, 1u32..64), 0..48),
        ) {
            let stacks: Vec<Stack> = picks
                .iter()
                .map(|(id, tagged, amount)| {
                    let stack = Stack::item(Identifier::new("test", format!("s{id}")).unwrap())
                        .with_amount(*amount);
                    if *tagged == 1 { stack.with_aux("state", "worn") } else { stack }
                })
                .collect();

            let mut manager = IngredientManager::new();
            manager.add_ingredients(&IngredientKind::item(), stacks.clone()).unwrap();

            let mut expected: Vec<&Stack> = Vec::new();
            for stack in &stacks {
                if !expected.iter().any(|seen| seen.same_variant(stack)) {
                    expected.push(stack);
                }
            }
            let declared: Vec<&Stack> = manager.ingredients(&IngredientKind::item()).collect();
            prop_assert_eq!(declared, expected);
        }
    }
}
