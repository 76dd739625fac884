//! The plugin host: discovery, phase-major registration and sessions.
//!
//! # Lifecycle
//!
//! 1. **Discovery** - plugins are added with [`PluginHost::add_plugins`]
//! 2. **Registration** - [`PluginHost::register`] runs every one-shot phase,
//!    each plugin finishing a phase before any plugin starts the next
//! 3. **Sessions** - [`PluginHost::start_session`] assembles a catalog and
//!    [`PluginHost::end_session`] discards it; sessions may repeat
//!
//! Configuration may arrive at any point via [`PluginHost::provide_config`].
//!
//! # Faults
//!
//! A panic inside a plugin callback faults that plugin. The host records a
//! [`DiagnosticKind::PluginFault`], withdraws everything the plugin
//! registered, and skips it from then on. Other plugins are unaffected.

use crate::catalog::{Catalog, CatalogParts, RecipeOrder};
use crate::config::ConfigManager;
use crate::phase::{Lifecycle, LifecycleError, Phase};
use crate::plugin::{Plugin, Plugins, RuntimePlugin};
use crate::registration::{
    AdvancedRegistration, CatalystRegistration, CategoryRegistration, Contributions,
    GuiHandlerRegistration, IngredientRegistration, RecipeRegistration, RecipeTransferRegistration,
    RuntimeRegistration, Scope, SharedState, SubtypeRegistration,
    VanillaCategoryExtensionRegistration,
};
use crate::runtime::{CatalogSlot, Runtime};
use core::any::Any;
use hashbrown::HashSet;
use pantry_model::{Diagnostic, DiagnosticKind, Diagnostics, Identifier, IngredientKind};
use pantry_platform::PlatformContext;
use parking_lot::RwLock;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

/// Internal entry for an added plugin.
struct PluginEntry {
    uid: Identifier,
    /// Cached for log fields.
    name: String,
    plugin: Box<dyn Plugin>,
    /// Phase in which the plugin faulted.
    faulted: Option<Phase>,
    /// Everything committed so far.
    contributions: Contributions,
}

struct RuntimeEntry {
    uid: Identifier,
    plugin: Box<dyn RuntimePlugin>,
    faulted: bool,
}

/// Summary of a completed registration.
#[derive(Debug, Clone)]
pub struct LoadReport {
    /// Plugins that took part.
    pub plugins: usize,
    /// Plugins that faulted, in add order.
    pub faulted: Vec<Identifier>,
    /// Categories registered by healthy plugins.
    pub categories: usize,
    /// Recipes admitted from healthy plugins, before deduplication.
    pub recipes: usize,
    /// Everything recorded during discovery and registration.
    pub diagnostics: Diagnostics,
}

/// Drives plugins through registration and runtime sessions.
///
/// # Example
///
/// ```
/// use pantry_plugin::{Phase, PluginHost};
/// use pantry_platform::{MutationTable, PlatformCapabilities, PlatformContext};
/// use std::sync::Arc;
///
/// let platform = PlatformContext::new(
///     PlatformCapabilities::vanilla(),
///     Arc::new(MutationTable::new()),
/// );
/// let mut host = PluginHost::new();
/// host.register(&platform).unwrap();
///
/// let runtime = host.start_session().unwrap();
/// assert_eq!(runtime.catalog().unwrap().recipe_count(), 0);
///
/// host.end_session().unwrap();
/// assert!(runtime.catalog().is_err());
/// assert_eq!(host.phase(), Phase::RuntimeUnavailable);
/// ```
pub struct PluginHost {
    plugins: Vec<PluginEntry>,
    runtime_plugins: Vec<RuntimeEntry>,
    uids: HashSet<Identifier>,
    lifecycle: Lifecycle,
    config: Option<ConfigManager>,
    shared: SharedState,
    diagnostics: Diagnostics,
    session: u64,
    slot: Option<CatalogSlot>,
}

impl Default for PluginHost {
    fn default() -> Self {
        Self::new()
    }
}

impl PluginHost {
    /// Creates a host with no plugins.
    #[must_use]
    pub fn new() -> Self {
        Self {
            plugins: Vec::new(),
            runtime_plugins: Vec::new(),
            uids: HashSet::new(),
            lifecycle: Lifecycle::new(),
            config: None,
            shared: SharedState::default(),
            diagnostics: Diagnostics::new(),
            session: 0,
            slot: None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Discovery
    // ─────────────────────────────────────────────────────────────────────────

    /// Adds one plugin or a plugin group.
    ///
    /// Plugins added after registration has started, or whose uid is taken,
    /// are rejected with a diagnostic.
    pub fn add_plugins<P: Plugins>(&mut self, plugins: P) -> &mut Self {
        plugins.add_to_host(self);
        self
    }

    /// Called by [`Plugins::add_to_host`] implementations.
    pub(crate) fn add_plugin_boxed(&mut self, plugin: Box<dyn Plugin>) {
        let uid = plugin.uid();
        if !self.admit(&uid) {
            return;
        }
        let name = plugin.name().to_owned();
        tracing::debug!(plugin = %uid, name = %name, "plugin discovered");
        self.plugins.push(PluginEntry {
            uid,
            name,
            plugin,
            faulted: None,
            contributions: Contributions::default(),
        });

        if let Some(config) = self.config.take() {
            let index = self.plugins.len() - 1;
            self.deliver_config(index, &config);
            self.config = Some(config);
        }
    }

    /// Adds a runtime-only plugin.
    ///
    /// Runtime plugins may be added at any time; they take effect from the
    /// next session.
    pub fn add_runtime_plugin<R: RuntimePlugin>(&mut self, plugin: R) -> &mut Self {
        let uid = plugin.uid();
        if self.uids.insert(uid.clone()) {
            tracing::debug!(plugin = %uid, "runtime plugin discovered");
            self.runtime_plugins.push(RuntimeEntry {
                uid,
                plugin: Box::new(plugin),
                faulted: false,
            });
        } else {
            self.reject_duplicate(uid);
        }
        self
    }

    fn admit(&mut self, uid: &Identifier) -> bool {
        let phase = self.lifecycle.phase();
        if phase != Phase::Discovered {
            self.diagnostics.push(
                Diagnostic::new(
                    DiagnosticKind::PluginFault,
                    format!("plugin added in phase '{phase}' after registration started"),
                )
                .with_plugin(uid.clone()),
            );
            return false;
        }
        if !self.uids.insert(uid.clone()) {
            self.reject_duplicate(uid.clone());
            return false;
        }
        true
    }

    fn reject_duplicate(&mut self, uid: Identifier) {
        self.diagnostics.push(
            Diagnostic::new(DiagnosticKind::DuplicatePlugin, "plugin uid is already taken")
                .with_plugin(uid),
        );
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Configuration
    // ─────────────────────────────────────────────────────────────────────────

    /// Makes configuration available.
    ///
    /// Current plugins are notified immediately and plugins added later are
    /// notified when they are added. Providing configuration again replaces it
    /// and notifies everyone again.
    pub fn provide_config(&mut self, config: ConfigManager) -> &mut Self {
        tracing::debug!(source = ?config.source(), "config available");
        for index in 0..self.plugins.len() {
            self.deliver_config(index, &config);
        }
        self.config = Some(config);
        self
    }

    /// Returns the configuration, once provided.
    #[must_use]
    pub fn config(&self) -> Option<&ConfigManager> {
        self.config.as_ref()
    }

    fn deliver_config(&mut self, index: usize, config: &ConfigManager) {
        let phase = self.lifecycle.phase();
        self.guarded(index, phase, |plugin| plugin.on_config_manager_available(config));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Registration
    // ─────────────────────────────────────────────────────────────────────────

    /// Runs every one-shot registration phase.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::AlreadyRegistered`] if registration already ran.
    pub fn register(&mut self, platform: &PlatformContext) -> Result<LoadReport, LifecycleError> {
        if self.lifecycle.phase() != Phase::Discovered {
            return Err(LifecycleError::AlreadyRegistered);
        }
        tracing::info!(plugins = self.plugins.len(), "registering plugins");

        for phase in Phase::REGISTRATION {
            self.lifecycle.advance(phase)?;
            let _span = tracing::debug_span!("phase", phase = %phase).entered();
            for index in 0..self.plugins.len() {
                self.run_phase(index, phase, platform);
            }
        }

        let report = self.report();
        tracing::info!(
            plugins = report.plugins,
            faulted = report.faulted.len(),
            categories = report.categories,
            recipes = report.recipes,
            diagnostics = report.diagnostics.len(),
            "registration complete"
        );
        Ok(report)
    }

    fn run_phase(&mut self, index: usize, phase: Phase, platform: &PlatformContext) {
        let entry = &self.plugins[index];
        if entry.faulted.is_some() {
            return;
        }

        let debug_mode = self
            .config
            .as_ref()
            .is_some_and(|config| config.config().debug_mode);
        let mut staged = Contributions::default();
        let outcome = {
            let mut scope = Scope {
                plugin: &entry.uid,
                staged: &mut staged,
                shared: &self.shared,
                platform,
                diagnostics: &mut self.diagnostics,
                debug_mode,
            };
            let plugin = entry.plugin.as_ref();
            catch_unwind(AssertUnwindSafe(|| {
                dispatch(plugin, phase, &mut scope, platform);
            }))
        };

        match outcome {
            Ok(()) => {
                self.shared.apply(&staged);
                self.plugins[index].contributions.absorb(staged);
            }
            Err(payload) => self.fault(index, phase, payload.as_ref()),
        }
    }

    fn report(&self) -> LoadReport {
        let healthy = || self.plugins.iter().filter(|entry| entry.faulted.is_none());
        LoadReport {
            plugins: self.plugins.len(),
            faulted: self
                .plugins
                .iter()
                .filter(|entry| entry.faulted.is_some())
                .map(|entry| entry.uid.clone())
                .collect(),
            categories: healthy().map(|entry| entry.contributions.categories.len()).sum(),
            recipes: healthy().map(|entry| entry.contributions.recipes.len()).sum(),
            diagnostics: self.diagnostics.clone(),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Sessions
    // ─────────────────────────────────────────────────────────────────────────

    /// Starts a session: applies runtime registration, assembles a fresh
    /// catalog, and notifies plugins.
    ///
    /// The recipe order defaults to the configured one and may be overridden
    /// by legacy [`Plugin::register_runtime`] hooks, then by runtime plugins.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::InvalidTransition`] before registration or
    /// while a session is running.
    pub fn start_session(&mut self) -> Result<Runtime, LifecycleError> {
        self.lifecycle.advance(Phase::RuntimeAvailable)?;
        self.session += 1;
        let _span = tracing::info_span!("session", session = self.session).entered();

        let mut order = self
            .config
            .as_ref()
            .map_or(RecipeOrder::default(), |config| config.config().recipe_order);
        for index in 0..self.plugins.len() {
            let mut proposed = order;
            #[expect(deprecated, reason = "The legacy hook still runs before runtime plugins")]
            let committed = self.guarded(index, Phase::RuntimeAvailable, |plugin| {
                plugin.register_runtime(&mut RuntimeRegistration::new(&mut proposed));
            });
            if committed {
                order = proposed;
            }
        }
        for entry in self.runtime_plugins.iter_mut().filter(|entry| !entry.faulted) {
            let mut proposed = order;
            let plugin = entry.plugin.as_ref();
            let outcome = catch_unwind(AssertUnwindSafe(|| {
                plugin.register_runtime(&mut RuntimeRegistration::new(&mut proposed));
            }));
            match outcome {
                Ok(()) => order = proposed,
                Err(payload) => {
                    entry.faulted = true;
                    let message = panic_message(payload.as_ref());
                    tracing::error!(plugin = %entry.uid, error = %message, "runtime plugin panicked");
                    self.diagnostics.push(
                        Diagnostic::new(DiagnosticKind::PluginFault, message)
                            .with_plugin(entry.uid.clone())
                            .with_subject(Phase::RuntimeAvailable),
                    );
                }
            }
        }

        let catalog = Catalog::assemble(self.catalog_parts(), order);
        let slot: CatalogSlot = Arc::new(RwLock::new(Some(Arc::new(catalog))));
        self.slot = Some(Arc::clone(&slot));
        let runtime = Runtime::new(self.session, slot);

        for index in 0..self.plugins.len() {
            self.guarded(index, Phase::RuntimeAvailable, |plugin| {
                plugin.on_runtime_available(&runtime);
            });
        }
        tracing::info!(session = self.session, order = ?order, "runtime available");
        Ok(runtime)
    }

    /// Ends the session: notifies plugins and discards the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::InvalidTransition`] if no session is running.
    pub fn end_session(&mut self) -> Result<(), LifecycleError> {
        self.lifecycle.advance(Phase::RuntimeUnavailable)?;
        for index in 0..self.plugins.len() {
            self.guarded(index, Phase::RuntimeUnavailable, |plugin| {
                plugin.on_runtime_unavailable();
            });
        }
        if let Some(slot) = self.slot.take() {
            slot.write().take();
        }
        tracing::info!(session = self.session, "runtime unavailable");
        Ok(())
    }

    fn catalog_parts(&self) -> CatalogParts {
        let mut parts = CatalogParts {
            ingredients: self.shared.ingredients.clone(),
            ..CatalogParts::default()
        };
        for entry in self.plugins.iter().filter(|entry| entry.faulted.is_none()) {
            let contributions = &entry.contributions;
            parts.categories.extend(contributions.categories.iter().cloned());
            parts.recipes.extend(contributions.recipes.iter().cloned());
            parts.catalysts.extend(contributions.catalysts.iter().cloned());
            parts
                .transfer_handlers
                .extend(contributions.transfer_handlers.iter().cloned());
            parts.gui_regions.extend(contributions.gui_regions.iter().cloned());
            parts.lookups.extend(contributions.lookups.iter().cloned());
        }
        parts
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.lifecycle.phase()
    }

    /// Returns every diagnostic recorded so far.
    #[must_use]
    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Returns the uids of accepted plugins, in add order.
    #[must_use]
    pub fn plugin_uids(&self) -> Vec<&Identifier> {
        self.plugins.iter().map(|entry| &entry.uid).collect()
    }

    /// Returns the phase in which `uid` faulted, if it did.
    #[must_use]
    pub fn fault_phase(&self, uid: &Identifier) -> Option<Phase> {
        self.plugins
            .iter()
            .find(|entry| &entry.uid == uid)
            .and_then(|entry| entry.faulted)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal: Fault isolation
    // ─────────────────────────────────────────────────────────────────────────

    /// Runs `callback` against a healthy plugin, faulting it on panic.
    ///
    /// Returns true if the callback ran to completion.
    fn guarded(&mut self, index: usize, phase: Phase, callback: impl FnOnce(&dyn Plugin)) -> bool {
        let entry = &self.plugins[index];
        if entry.faulted.is_some() {
            return false;
        }
        let plugin = entry.plugin.as_ref();
        match catch_unwind(AssertUnwindSafe(|| callback(plugin))) {
            Ok(()) => true,
            Err(payload) => {
                self.fault(index, phase, payload.as_ref());
                false
            }
        }
    }

    fn fault(&mut self, index: usize, phase: Phase, payload: &(dyn Any + Send)) {
        let message = panic_message(payload);
        let entry = &mut self.plugins[index];
        entry.faulted = Some(phase);
        entry.contributions = Contributions::default();
        tracing::error!(
            plugin = %entry.uid,
            name = %entry.name,
            phase = %phase,
            error = %message,
            "plugin panicked; withdrawing its registrations"
        );
        let diagnostic = Diagnostic::new(DiagnosticKind::PluginFault, message)
            .with_plugin(entry.uid.clone())
            .with_subject(phase);
        self.diagnostics.push(diagnostic);

        let mut shared = SharedState::default();
        for entry in self.plugins.iter().filter(|entry| entry.faulted.is_none()) {
            shared.apply(&entry.contributions);
        }
        self.shared = shared;
    }
}

fn dispatch(plugin: &dyn Plugin, phase: Phase, scope: &mut Scope<'_>, platform: &PlatformContext) {
    match phase {
        Phase::SubtypesRegistered => plugin.register_item_subtypes(&mut SubtypeRegistration::new(
            scope,
            IngredientKind::item(),
        )),
        Phase::FluidSubtypesRegistered => plugin.register_fluid_subtypes(
            &mut SubtypeRegistration::new(scope, IngredientKind::fluid()),
            platform.fluid_helper(),
        ),
        Phase::IngredientsRegistered => {
            plugin.register_ingredients(&mut IngredientRegistration::new(scope));
        }
        Phase::CategoriesRegistered => {
            plugin.register_categories(&mut CategoryRegistration::new(scope));
        }
        Phase::VanillaExtensionsRegistered => plugin
            .register_vanilla_category_extensions(&mut VanillaCategoryExtensionRegistration::new(
                scope,
            )),
        Phase::RecipesRegistered => plugin.register_recipes(&mut RecipeRegistration::new(scope)),
        Phase::TransferHandlersRegistered => {
            plugin.register_recipe_transfer_handlers(&mut RecipeTransferRegistration::new(scope));
        }
        Phase::CatalystsRegistered => {
            plugin.register_recipe_catalysts(&mut CatalystRegistration::new(scope));
        }
        Phase::GuiHandlersRegistered => {
            plugin.register_gui_handlers(&mut GuiHandlerRegistration::new(scope));
        }
        Phase::AdvancedRegistered => plugin.register_advanced(&mut AdvancedRegistration::new(scope)),
        Phase::Discovered | Phase::RuntimeAvailable | Phase::RuntimeUnavailable => {}
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "plugin panicked with a non-string payload".to_owned())
}
