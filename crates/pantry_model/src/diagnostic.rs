//! Non-fatal problems found while normalizing and registering recipes.
//!
//! A diagnostic is logged at `warn` when recorded and kept so that hosts and
//! tests can inspect what was dropped and why.

use crate::identifier::Identifier;
use core::fmt;

/// What went wrong.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// A native recipe could not be decomposed.
    MalformedRecipe,
    /// A well-formed native recipe the host marks as unsupported.
    UnhandledRecipe,
    /// A recipe, catalyst or transfer handler named an unregistered category.
    UnknownCategory,
    /// A category id was registered twice.
    DuplicateCategory,
    /// A crafting extension was registered twice for the same kind.
    DuplicateExtension,
    /// An ingredient kind or interpreter registration was rejected.
    IngredientRegistration,
    /// A plugin broke the lifecycle contract and was unloaded.
    PluginFault,
    /// A plugin uid was already taken.
    DuplicatePlugin,
    /// A host table could not be read.
    HostUnavailable,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticKind::MalformedRecipe => "malformed-recipe",
            DiagnosticKind::UnhandledRecipe => "unhandled-recipe",
            DiagnosticKind::UnknownCategory => "unknown-category",
            DiagnosticKind::DuplicateCategory => "duplicate-category",
            DiagnosticKind::DuplicateExtension => "duplicate-extension",
            DiagnosticKind::IngredientRegistration => "ingredient-registration",
            DiagnosticKind::PluginFault => "plugin-fault",
            DiagnosticKind::DuplicatePlugin => "duplicate-plugin",
            DiagnosticKind::HostUnavailable => "host-unavailable",
        };
        f.write_str(name)
    }
}

/// One recorded problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// What went wrong.
    pub kind: DiagnosticKind,
    /// The plugin responsible, when known.
    pub plugin: Option<Identifier>,
    /// The recipe or registration involved, when known.
    pub subject: Option<String>,
    /// Human-readable detail.
    pub message: String,
}

impl Diagnostic {
    /// Creates a diagnostic.
    #[must_use]
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            plugin: None,
            subject: None,
            message: message.into(),
        }
    }

    /// Attributes the diagnostic to a plugin.
    #[must_use]
    pub fn with_plugin(mut self, plugin: Identifier) -> Self {
        self.plugin = Some(plugin);
        self
    }

    /// Names the recipe or registration involved.
    #[must_use]
    pub fn with_subject(mut self, subject: impl fmt::Display) -> Self {
        self.subject = Some(subject.to_string());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.kind)?;
        if let Some(plugin) = &self.plugin {
            write!(f, " plugin={plugin}")?;
        }
        if let Some(subject) = &self.subject {
            write!(f, " subject={subject}")?;
        }
        write!(f, ": {}", self.message)
    }
}

/// An append-only list of diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a diagnostic and logs it.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        tracing::warn!(
            kind = %diagnostic.kind,
            plugin = diagnostic.plugin.as_ref().map(tracing::field::display),
            subject = diagnostic.subject.as_deref(),
            "{}",
            diagnostic.message
        );
        self.entries.push(diagnostic);
    }

    /// Moves all entries of `other` into this list without logging them again.
    pub fn append(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    /// Attributes every unattributed entry to `plugin`.
    pub fn attribute(&mut self, plugin: &Identifier) {
        for entry in self.entries.iter_mut().filter(|d| d.plugin.is_none()) {
            entry.plugin = Some(plugin.clone());
        }
    }

    /// Iterates recorded diagnostics.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// Counts diagnostics of `kind`.
    #[must_use]
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.entries.iter().filter(|d| d.kind == kind).count()
    }

    /// Returns the number of diagnostics.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
