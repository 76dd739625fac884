//! A plugin-driven recipe catalog for block-game hosts.
//!
//! Plugins register ingredients, categories and recipes in a fixed sequence
//! of phases; the host's own crafting, smithing and brewing recipes are
//! normalized into the same canonical model and served from an immutable
//! catalog for the duration of a session.

pub use pantry_internal::*;

/// Re-export all common types for easy access.
pub mod prelude {
    pub use pantry_internal::prelude::*;
}
