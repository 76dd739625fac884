//! Registration phases and the state machine that orders them.
//!
//! The one-shot phases run exactly once, in declaration order. After
//! [`Phase::AdvancedRegistered`] the lifecycle only cycles between
//! [`Phase::RuntimeAvailable`] and [`Phase::RuntimeUnavailable`].
//!
//! ```text
//! Discovered → SubtypesRegistered → FluidSubtypesRegistered
//!   → IngredientsRegistered → CategoriesRegistered
//!   → VanillaExtensionsRegistered → RecipesRegistered
//!   → TransferHandlersRegistered → CatalystsRegistered
//!   → GuiHandlersRegistered → AdvancedRegistered
//!   → RuntimeAvailable ⇄ RuntimeUnavailable
//! ```

use core::fmt;
use thiserror::Error;

/// A point in the plugin lifecycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Phase {
    /// Plugins are known but nothing is registered.
    #[default]
    Discovered,
    /// Item subtype interpreters are registered.
    SubtypesRegistered,
    /// Fluid subtype interpreters are registered.
    FluidSubtypesRegistered,
    /// Ingredient kinds and initial ingredient lists are registered.
    IngredientsRegistered,
    /// Recipe categories are registered.
    CategoriesRegistered,
    /// Crafting category extensions are registered.
    VanillaExtensionsRegistered,
    /// Recipes are registered.
    RecipesRegistered,
    /// Recipe transfer handlers are registered.
    TransferHandlersRegistered,
    /// Catalysts are registered.
    CatalystsRegistered,
    /// GUI handlers are registered.
    GuiHandlersRegistered,
    /// Advanced lookups are registered; registration is complete.
    AdvancedRegistered,
    /// A catalog is assembled and may be queried.
    RuntimeAvailable,
    /// The catalog has been discarded.
    RuntimeUnavailable,
}

impl Phase {
    /// The one-shot registration phases, in order.
    pub const REGISTRATION: [Phase; 10] = [
        Phase::SubtypesRegistered,
        Phase::FluidSubtypesRegistered,
        Phase::IngredientsRegistered,
        Phase::CategoriesRegistered,
        Phase::VanillaExtensionsRegistered,
        Phase::RecipesRegistered,
        Phase::TransferHandlersRegistered,
        Phase::CatalystsRegistered,
        Phase::GuiHandlersRegistered,
        Phase::AdvancedRegistered,
    ];

    /// Returns the phase that legally follows this one.
    #[must_use]
    pub fn successor(self) -> Phase {
        match self {
            Phase::Discovered => Phase::SubtypesRegistered,
            Phase::SubtypesRegistered => Phase::FluidSubtypesRegistered,
            Phase::FluidSubtypesRegistered => Phase::IngredientsRegistered,
            Phase::IngredientsRegistered => Phase::CategoriesRegistered,
            Phase::CategoriesRegistered => Phase::VanillaExtensionsRegistered,
            Phase::VanillaExtensionsRegistered => Phase::RecipesRegistered,
            Phase::RecipesRegistered => Phase::TransferHandlersRegistered,
            Phase::TransferHandlersRegistered => Phase::CatalystsRegistered,
            Phase::CatalystsRegistered => Phase::GuiHandlersRegistered,
            Phase::GuiHandlersRegistered => Phase::AdvancedRegistered,
            Phase::AdvancedRegistered | Phase::RuntimeUnavailable => Phase::RuntimeAvailable,
            Phase::RuntimeAvailable => Phase::RuntimeUnavailable,
        }
    }

    /// Returns true once every one-shot phase has run.
    #[must_use]
    pub fn is_registered(self) -> bool {
        self >= Phase::AdvancedRegistered
    }

    /// Returns the kebab-case phase name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Phase::Discovered => "discovered",
            Phase::SubtypesRegistered => "subtypes-registered",
            Phase::FluidSubtypesRegistered => "fluid-subtypes-registered",
            Phase::IngredientsRegistered => "ingredients-registered",
            Phase::CategoriesRegistered => "categories-registered",
            Phase::VanillaExtensionsRegistered => "vanilla-extensions-registered",
            Phase::RecipesRegistered => "recipes-registered",
            Phase::TransferHandlersRegistered => "transfer-handlers-registered",
            Phase::CatalystsRegistered => "catalysts-registered",
            Phase::GuiHandlersRegistered => "gui-handlers-registered",
            Phase::AdvancedRegistered => "advanced-registered",
            Phase::RuntimeAvailable => "runtime-available",
            Phase::RuntimeUnavailable => "runtime-unavailable",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// A lifecycle operation was attempted out of order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LifecycleError {
    /// The requested phase does not follow the current one.
    #[error("cannot move from phase '{from}' to '{to}'")]
    InvalidTransition {
        /// Current phase.
        from: Phase,
        /// Requested phase.
        to: Phase,
    },

    /// Registration has already run.
    #[error("plugins are already registered")]
    AlreadyRegistered,
}

// ─────────────────────────────────────────────────────────────────────────────
// Lifecycle
// ─────────────────────────────────────────────────────────────────────────────

/// Tracks the current [`Phase`] and rejects illegal transitions.
///
/// # Example
///
/// ```
/// use pantry_plugin::{Lifecycle, LifecycleError, Phase};
///
/// let mut lifecycle = Lifecycle::new();
/// lifecycle.advance(Phase::SubtypesRegistered).unwrap();
///
/// let err = lifecycle.advance(Phase::RecipesRegistered).unwrap_err();
/// assert!(matches!(err, LifecycleError::InvalidTransition { .. }));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Lifecycle {
    phase: Phase,
}

impl Lifecycle {
    /// Creates a lifecycle in [`Phase::Discovered`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Moves to `next`.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::InvalidTransition`] unless `next` is the
    /// successor of the current phase.
    pub fn advance(&mut self, next: Phase) -> Result<(), LifecycleError> {
        if self.phase.successor() != next {
            return Err(LifecycleError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        tracing::trace!(from = %self.phase, to = %next, "lifecycle advanced");
        self.phase = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_phases_run_in_order() {
        let mut lifecycle = Lifecycle::new();
        for phase in Phase::REGISTRATION {
            lifecycle.advance(phase).unwrap();
        }
        assert!(lifecycle.phase().is_registered());
    }

    #[test]
    fn skipping_a_phase_is_rejected() {
        let mut lifecycle = Lifecycle::new();
        let err = lifecycle.advance(Phase::FluidSubtypesRegistered).unwrap_err();
        assert_eq!(
            err,
            LifecycleError::InvalidTransition {
                from: Phase::Discovered,
                to: Phase::FluidSubtypesRegistered
            }
        );
        assert_eq!(lifecycle.phase(), Phase::Discovered);
    }

    #[test]
    fn phases_are_not_reentered() {
        let mut lifecycle = Lifecycle::new();
        lifecycle.advance(Phase::SubtypesRegistered).unwrap();
        assert!(lifecycle.advance(Phase::SubtypesRegistered).is_err());
    }

    #[test]
    fn runtime_cycles() {
        let mut lifecycle = Lifecycle::new();
        for phase in Phase::REGISTRATION {
            lifecycle.advance(phase).unwrap();
        }
        for _ in 0..3 {
            lifecycle.advance(Phase::RuntimeAvailable).unwrap();
            assert!(lifecycle.advance(Phase::RuntimeAvailable).is_err());
            lifecycle.advance(Phase::RuntimeUnavailable).unwrap();
        }
        assert!(lifecycle.advance(Phase::RecipesRegistered).is_err());
    }

    #[test]
    fn display_names() {
        assert_eq!(Phase::VanillaExtensionsRegistered.to_string(), "vanilla-extensions-registered");
    }
}
