//! Stacks: concrete, typed units of ingredients.

use crate::identifier::Identifier;
use core::fmt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ─────────────────────────────────────────────────────────────────────────────
// IngredientKind
// ─────────────────────────────────────────────────────────────────────────────

/// The type of an ingredient (item, fluid, or a plugin-registered kind).
///
/// Stacks of different kinds never match each other, even when their ids
/// are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IngredientKind(Identifier);

impl IngredientKind {
    /// Creates a kind from its identifier.
    #[must_use]
    pub fn new(id: Identifier) -> Self {
        Self(id)
    }

    /// The built-in item kind (`pantry:item`).
    #[must_use]
    pub fn item() -> Self {
        Self(Identifier::from_static("pantry", "item"))
    }

    /// The built-in fluid kind (`pantry:fluid`).
    #[must_use]
    pub fn fluid() -> Self {
        Self(Identifier::from_static("pantry", "fluid"))
    }

    /// Returns the kind's identifier.
    #[must_use]
    pub fn id(&self) -> &Identifier {
        &self.0
    }
}

impl fmt::Display for IngredientKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// AuxData
// ─────────────────────────────────────────────────────────────────────────────

/// Auxiliary data attached to a stack (color, potion, persistent state).
///
/// Ordered so that equality and hashing do not depend on insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AuxData(BTreeMap<String, String>);

impl AuxData {
    /// Well-known entry holding a [`DyeColor`] name.
    pub const COLOR: &'static str = "color";

    /// Well-known entry holding a potion identifier.
    pub const POTION: &'static str = "potion";

    /// Creates empty aux data.
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Returns the value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Sets `key` to `value`, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Returns true if no entries are present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Stack
// ─────────────────────────────────────────────────────────────────────────────

/// A concrete amount of one ingredient variant.
///
/// # Example
///
/// ```
/// use pantry_model::{AuxData, DyeColor, Identifier, Stack};
///
/// let red_box = Stack::item(Identifier::from_static("minecraft", "shulker_box"))
///     .with_aux(AuxData::COLOR, DyeColor::Red.name());
/// assert_eq!(red_box.aux().get(AuxData::COLOR), Some("red"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Stack {
    kind: IngredientKind,
    id: Identifier,
    amount: u32,
    #[serde(default, skip_serializing_if = "AuxData::is_empty")]
    aux: AuxData,
}

impl Stack {
    /// Creates a stack of any kind.
    #[must_use]
    pub fn new(kind: IngredientKind, id: Identifier, amount: u32) -> Self {
        Self {
            kind,
            id,
            amount,
            aux: AuxData::new(),
        }
    }

    /// Creates a single item.
    #[must_use]
    pub fn item(id: Identifier) -> Self {
        Self::new(IngredientKind::item(), id, 1)
    }

    /// Creates a fluid stack of `amount` units.
    #[must_use]
    pub fn fluid(id: Identifier, amount: u32) -> Self {
        Self::new(IngredientKind::fluid(), id, amount)
    }

    /// Replaces the amount.
    #[must_use]
    pub fn with_amount(mut self, amount: u32) -> Self {
        self.amount = amount;
        self
    }

    /// Adds an aux entry.
    #[must_use]
    pub fn with_aux(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.aux.insert(key, value);
        self
    }

    /// Returns the ingredient kind.
    #[must_use]
    pub fn kind(&self) -> &IngredientKind {
        &self.kind
    }

    /// Returns the item/fluid id.
    #[must_use]
    pub fn id(&self) -> &Identifier {
        &self.id
    }

    /// Returns the amount.
    #[must_use]
    pub fn amount(&self) -> u32 {
        self.amount
    }

    /// Returns the aux data.
    #[must_use]
    pub fn aux(&self) -> &AuxData {
        &self.aux
    }

    /// Returns true if `other` is the same variant (kind, id and aux), ignoring amount.
    #[must_use]
    pub fn same_variant(&self, other: &Stack) -> bool {
        self.kind == other.kind && self.id == other.id && self.aux == other.aux
    }
}

impl fmt::Display for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x {}", self.amount, self.id)?;
        if !self.aux.is_empty() {
            let entries: Vec<String> = self.aux.iter().map(|(k, v)| format!("{k}={v}")).collect();
            write!(f, "{{{}}}", entries.join(","))?;
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// DyeColor
// ─────────────────────────────────────────────────────────────────────────────

/// The host's fixed set of dye colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DyeColor {
    /// White.
    White,
    /// Orange.
    Orange,
    /// Magenta.
    Magenta,
    /// Light blue.
    LightBlue,
    /// Yellow.
    Yellow,
    /// Lime.
    Lime,
    /// Pink.
    Pink,
    /// Gray.
    Gray,
    /// Light gray.
    LightGray,
    /// Cyan.
    Cyan,
    /// Purple.
    Purple,
    /// Blue.
    Blue,
    /// Brown.
    Brown,
    /// Green.
    Green,
    /// Red.
    Red,
    /// Black.
    Black,
}

impl DyeColor {
    /// Every color, in host order.
    pub const ALL: [DyeColor; 16] = [
        DyeColor::White,
        DyeColor::Orange,
        DyeColor::Magenta,
        DyeColor::LightBlue,
        DyeColor::Yellow,
        DyeColor::Lime,
        DyeColor::Pink,
        DyeColor::Gray,
        DyeColor::LightGray,
        DyeColor::Cyan,
        DyeColor::Purple,
        DyeColor::Blue,
        DyeColor::Brown,
        DyeColor::Green,
        DyeColor::Red,
        DyeColor::Black,
    ];

    /// Returns the snake-case name used in aux data and item ids.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            DyeColor::White => "white",
            DyeColor::Orange => "orange",
            DyeColor::Magenta => "magenta",
            DyeColor::LightBlue => "light_blue",
            DyeColor::Yellow => "yellow",
            DyeColor::Lime => "lime",
            DyeColor::Pink => "pink",
            DyeColor::Gray => "gray",
            DyeColor::LightGray => "light_gray",
            DyeColor::Cyan => "cyan",
            DyeColor::Purple => "purple",
            DyeColor::Blue => "blue",
            DyeColor::Brown => "brown",
            DyeColor::Green => "green",
            DyeColor::Red => "red",
            DyeColor::Black => "black",
        }
    }
}

impl fmt::Display for DyeColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
