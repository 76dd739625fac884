//! Ingredients: matchers over acceptable stack variants.
//!
//! An [`Ingredient`] is one of three shapes:
//!
//! | Variant | Matches | Identity |
//! |---------|---------|----------|
//! | [`Ingredient::ExactStack`] | same kind, id and aux | the stack |
//! | [`Ingredient::SubtypedStack`] | same kind and id, same interpreted subtype | kind, id, subtype key |
//! | [`Ingredient::Synthetic`] | base id carrying one aux entry | base, kind, key |
//!
//! Identity never depends on where an ingredient lives in memory: recipes are
//! compared and deduplicated by ingredient value.

use crate::identifier::Identifier;
use crate::stack::{AuxData, DyeColor, IngredientKind, Stack};
use core::fmt;
use core::hash::{Hash, Hasher};
use std::sync::Arc;

// ─────────────────────────────────────────────────────────────────────────────
// SubtypeInterpreter
// ─────────────────────────────────────────────────────────────────────────────

/// Distinguishes otherwise-identical stacks by their auxiliary data.
///
/// Returning `None` means the stack has no subtype, so all such stacks of
/// the same id are interchangeable.
pub trait SubtypeInterpreter: Send + Sync + 'static {
    /// Returns the subtype key for `stack`.
    fn subtype(&self, stack: &Stack) -> Option<String>;

    /// Returns a name for debugging.
    fn name(&self) -> &str {
        core::any::type_name::<Self>()
    }
}

/// Interprets one aux entry as the subtype (e.g. `potion` for potion items).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuxEntryInterpreter {
    key: String,
}

impl AuxEntryInterpreter {
    /// Creates an interpreter reading the aux entry `key`.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

impl SubtypeInterpreter for AuxEntryInterpreter {
    fn subtype(&self, stack: &Stack) -> Option<String> {
        stack.aux().get(&self.key).map(str::to_string)
    }

    fn name(&self) -> &str {
        &self.key
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// SubtypedStack
// ─────────────────────────────────────────────────────────────────────────────

/// A stack whose identity includes a subtype computed by an interpreter.
#[derive(Clone)]
pub struct SubtypedStack {
    stack: Stack,
    subtype: Option<String>,
    interpreter: Arc<dyn SubtypeInterpreter>,
}

impl SubtypedStack {
    /// Creates a subtyped stack, computing its subtype key once.
    #[must_use]
    pub fn new(stack: Stack, interpreter: Arc<dyn SubtypeInterpreter>) -> Self {
        let subtype = interpreter.subtype(&stack);
        Self {
            stack,
            subtype,
            interpreter,
        }
    }

    /// Returns the representative stack.
    #[must_use]
    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    /// Returns the subtype key.
    #[must_use]
    pub fn subtype(&self) -> Option<&str> {
        self.subtype.as_deref()
    }

    /// Returns true if `candidate` has the same kind, id, and interpreted subtype.
    #[must_use]
    pub fn matches(&self, candidate: &Stack) -> bool {
        candidate.kind() == self.stack.kind()
            && candidate.id() == self.stack.id()
            && self.interpreter.subtype(candidate) == self.subtype
    }
}

impl fmt::Debug for SubtypedStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubtypedStack")
            .field("stack", &self.stack)
            .field("subtype", &self.subtype)
            .field("interpreter", &self.interpreter.name())
            .finish()
    }
}

impl PartialEq for SubtypedStack {
    fn eq(&self, other: &Self) -> bool {
        self.stack.kind() == other.stack.kind()
            && self.stack.id() == other.stack.id()
            && self.subtype == other.subtype
    }
}

impl Eq for SubtypedStack {}

impl Hash for SubtypedStack {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.stack.kind().hash(state);
        self.stack.id().hash(state);
        self.subtype.hash(state);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Synthetic
// ─────────────────────────────────────────────────────────────────────────────

/// The aux entry that selects one member of an indexed item family.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AuxKey {
    /// A dye color, stored under [`AuxData::COLOR`].
    Color(DyeColor),
    /// An arbitrary state entry.
    State {
        /// Aux entry name.
        key: String,
        /// Required value.
        value: String,
    },
}

impl AuxKey {
    /// Returns the `(key, value)` aux entry this key requires.
    #[must_use]
    pub fn entry(&self) -> (&str, &str) {
        match self {
            AuxKey::Color(color) => (AuxData::COLOR, color.name()),
            AuxKey::State { key, value } => (key.as_str(), value.as_str()),
        }
    }
}

/// A platform-constructed matcher for "item `base` carrying aux entry `key`".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SyntheticIngredient {
    kind: IngredientKind,
    base: Identifier,
    key: AuxKey,
}

impl SyntheticIngredient {
    /// Creates a synthetic item ingredient.
    #[must_use]
    pub fn new(base: Identifier, key: AuxKey) -> Self {
        Self {
            kind: IngredientKind::item(),
            base,
            key,
        }
    }

    /// Returns the base id.
    #[must_use]
    pub fn base(&self) -> &Identifier {
        &self.base
    }

    /// Returns the selecting aux key.
    #[must_use]
    pub fn key(&self) -> &AuxKey {
        &self.key
    }

    /// Returns true if `candidate` is `base` tagged with this key's entry.
    #[must_use]
    pub fn matches(&self, candidate: &Stack) -> bool {
        let (key, value) = self.key.entry();
        candidate.kind() == &self.kind
            && candidate.id() == &self.base
            && candidate.aux().get(key) == Some(value)
    }

    /// Builds the single stack this ingredient stands for.
    #[must_use]
    pub fn to_stack(&self) -> Stack {
        let (key, value) = self.key.entry();
        Stack::new(self.kind.clone(), self.base.clone(), 1).with_aux(key, value)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Ingredient
// ─────────────────────────────────────────────────────────────────────────────

/// A typed, matchable unit a recipe consumes or produces.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Ingredient {
    /// A concrete stack matched exactly.
    ExactStack(Stack),
    /// A stack matched through a subtype interpreter.
    SubtypedStack(SubtypedStack),
    /// A platform-constructed matcher.
    Synthetic(SyntheticIngredient),
}

impl Ingredient {
    /// Returns true if `candidate` satisfies this ingredient.
    #[must_use]
    pub fn matches(&self, candidate: &Stack) -> bool {
        match self {
            Ingredient::ExactStack(stack) => stack.same_variant(candidate),
            Ingredient::SubtypedStack(subtyped) => subtyped.matches(candidate),
            Ingredient::Synthetic(synthetic) => synthetic.matches(candidate),
        }
    }

    /// Returns the ingredient kind.
    #[must_use]
    pub fn kind(&self) -> &IngredientKind {
        match self {
            Ingredient::ExactStack(stack) => stack.kind(),
            Ingredient::SubtypedStack(subtyped) => subtyped.stack().kind(),
            Ingredient::Synthetic(synthetic) => &synthetic.kind,
        }
    }

    /// Returns a stack suitable for display and lookups.
    #[must_use]
    pub fn display_stack(&self) -> Stack {
        match self {
            Ingredient::ExactStack(stack) => stack.clone(),
            Ingredient::SubtypedStack(subtyped) => subtyped.stack().clone(),
            Ingredient::Synthetic(synthetic) => synthetic.to_stack(),
        }
    }
}

impl From<Stack> for Ingredient {
    fn from(stack: Stack) -> Self {
        Ingredient::ExactStack(stack)
    }
}

impl fmt::Display for Ingredient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ingredient::ExactStack(stack) => stack.fmt(f),
            Ingredient::SubtypedStack(subtyped) => match subtyped.subtype() {
                Some(subtype) => write!(f, "{}[{subtype}]", subtyped.stack().id()),
                None => write!(f, "{}", subtyped.stack().id()),
            },
            Ingredient::Synthetic(synthetic) => {
                let (key, value) = synthetic.key().entry();
                write!(f, "{}{{{key}={value}}}", synthetic.base())
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Slot
// ─────────────────────────────────────────────────────────────────────────────

/// One recipe input position: any of several acceptable ingredients.
///
/// An empty slot is a blank grid cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Slot(Vec<Ingredient>);

impl Slot {
    /// Creates a slot from its alternatives.
    #[must_use]
    pub fn new(alternatives: Vec<Ingredient>) -> Self {
        Self(alternatives)
    }

    /// Creates a blank slot.
    #[must_use]
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Creates a slot accepting a single ingredient.
    #[must_use]
    pub fn of(ingredient: impl Into<Ingredient>) -> Self {
        Self(vec![ingredient.into()])
    }

    /// Returns the alternatives.
    #[must_use]
    pub fn alternatives(&self) -> &[Ingredient] {
        &self.0
    }

    /// Returns true for a blank slot.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns true if any alternative accepts `candidate`.
    #[must_use]
    pub fn matches(&self, candidate: &Stack) -> bool {
        self.0.iter().any(|ingredient| ingredient.matches(candidate))
    }
}

impl From<Ingredient> for Slot {
    fn from(ingredient: Ingredient) -> Self {
        Slot::of(ingredient)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn potion(kind: &str) -> Stack {
        Stack::item(Identifier::from_static("minecraft", "potion")).with_aux(AuxData::POTION, kind)
    }

    #[test]
    fn exact_stack_ignores_amount() {
        let ingredient = Ingredient::from(potion("minecraft:awkward"));
        assert!(ingredient.matches(&potion("minecraft:awkward").with_amount(3)));
        assert!(!ingredient.matches(&potion("minecraft:mundane")));
    }

    #[test]
    fn subtyped_stack_matches_by_interpreted_key() {
        let interpreter: Arc<dyn SubtypeInterpreter> = Arc::new(AuxEntryInterpreter::new(AuxData::POTION));
        let ingredient = Ingredient::SubtypedStack(SubtypedStack::new(
            potion("minecraft:awkward"),
            interpreter,
        ));

        // Unrelated aux entries do not affect the subtype.
        let decorated = potion("minecraft:awkward").with_aux("display", "shiny");
        assert!(ingredient.matches(&decorated));
        assert!(!ingredient.matches(&potion("minecraft:thick")));
    }

    #[test]
    fn subtyped_equality_is_by_value_not_identity() {
        let a = SubtypedStack::new(
            potion("minecraft:awkward"),
            Arc::new(AuxEntryInterpreter::new(AuxData::POTION)),
        );
        let b = SubtypedStack::new(
            potion("minecraft:awkward").with_aux("display", "shiny"),
            Arc::new(AuxEntryInterpreter::new(AuxData::POTION)),
        );
        assert_eq!(Ingredient::SubtypedStack(a), Ingredient::SubtypedStack(b));
    }

    #[test]
    fn synthetic_requires_aux_entry() {
        let shulker = Identifier::from_static("minecraft", "shulker_box");
        let red = SyntheticIngredient::new(shulker.clone(), AuxKey::Color(DyeColor::Red));

        assert!(red.matches(&Stack::item(shulker.clone()).with_aux(AuxData::COLOR, "red")));
        assert!(!red.matches(&Stack::item(shulker.clone()).with_aux(AuxData::COLOR, "blue")));
        assert!(!red.matches(&Stack::item(shulker)));
        assert!(red.to_stack().aux().get(AuxData::COLOR) == Some("red"));
    }

    #[test]
    fn slot_matches_any_alternative() {
        let slot = Slot::new(vec![
            Ingredient::from(potion("minecraft:awkward")),
            Ingredient::from(potion("minecraft:thick")),
        ]);
        assert!(slot.matches(&potion("minecraft:thick")));
        assert!(!slot.matches(&potion("minecraft:mundane")));
        assert!(!Slot::empty().matches(&potion("minecraft:thick")));
    }
}
