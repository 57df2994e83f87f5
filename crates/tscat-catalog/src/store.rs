//! Publish-once holder for a process-wide [`Catalog`].
//!
//! A store has two states: *unloaded* and *loaded*. Loading builds the whole
//! catalog locally and installs it with a single atomic compare-and-swap, so
//! a reader either sees no catalog or a complete one. Once loaded, the store
//! never changes again.
//!
//! Reads go through `arc-swap`, so they are wait-free and never contend with
//! each other.
//!
//! Components that can take the catalog by reference should prefer an
//! `Arc<Catalog>` handed in at construction; the store exists for the
//! start-up boundary where the catalog is not yet available.
//!
//! # Example
//!
//! ```
//! use tscat_catalog::{CatalogError, CatalogStore, LoadOptions};
//!
//! static TRANSLATIONS: CatalogStore = CatalogStore::new();
//!
//! assert!(matches!(
//!     TRANSLATIONS.resolve("QObject", "Error", None),
//!     Err(CatalogError::NotLoaded)
//! ));
//!
//! TRANSLATIONS
//!     .load(
//!         r#"<TS version="2.1" language="fr"><context><name>QObject</name>
//!            <message><source>Error</source><translation>Erreur</translation></message>
//!            </context></TS>"#,
//!         &LoadOptions::default(),
//!     )
//!     .unwrap();
//!
//! assert_eq!(TRANSLATIONS.resolve("QObject", "Error", None).unwrap(), "Erreur");
//! ```

use std::sync::Arc;

use arc_swap::ArcSwapOption;

use crate::catalog::{Catalog, LoadOptions, LoadReport};
use crate::error::{CatalogError, Result};

/// Two-state catalog slot: unloaded until the first successful publish.
pub struct CatalogStore {
    slot: ArcSwapOption<Catalog>,
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CatalogStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogStore")
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

impl CatalogStore {
    /// An unloaded store. Usable in `static` items.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slot: ArcSwapOption::const_empty(),
        }
    }

    /// Parse `data` and publish the result.
    ///
    /// Parsing finishes before anything is installed; on error the store
    /// stays unloaded.
    ///
    /// # Errors
    ///
    /// [`CatalogError::Parse`] for malformed documents,
    /// [`CatalogError::AlreadyLoaded`] if a catalog was published before.
    pub fn load(&self, data: &str, options: &LoadOptions) -> Result<LoadReport> {
        if self.is_loaded() {
            return Err(CatalogError::AlreadyLoaded);
        }
        let (catalog, report) = Catalog::parse(data, options)?;
        self.publish(catalog)?;
        Ok(report)
    }

    /// Install a fully built catalog.
    ///
    /// # Errors
    ///
    /// [`CatalogError::AlreadyLoaded`] if a catalog was published before;
    /// the earlier catalog stays in place.
    pub fn publish(&self, catalog: Catalog) -> Result<Arc<Catalog>> {
        let catalog = Arc::new(catalog);
        let previous = self
            .slot
            .compare_and_swap(&None::<Arc<Catalog>>, Some(Arc::clone(&catalog)));
        if previous.is_some() {
            tracing::warn!("catalog already published, ignoring second load");
            return Err(CatalogError::AlreadyLoaded);
        }
        tracing::info!(
            entries = catalog.len(),
            language = catalog.language().unwrap_or("-"),
            "catalog published"
        );
        Ok(catalog)
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.slot.load().is_some()
    }

    /// Shared handle to the published catalog.
    ///
    /// # Errors
    ///
    /// [`CatalogError::NotLoaded`] before the first publish.
    pub fn catalog(&self) -> Result<Arc<Catalog>> {
        self.slot.load_full().ok_or(CatalogError::NotLoaded)
    }

    /// Resolve through the published catalog.
    ///
    /// # Errors
    ///
    /// [`CatalogError::NotLoaded`] before the first publish. Missing keys
    /// are not errors; they resolve to `source`.
    pub fn resolve(&self, context: &str, source: &str, quantity: Option<i64>) -> Result<String> {
        self.resolve_disambiguated(context, source, None, quantity)
    }

    /// Disambiguated variant of [`CatalogStore::resolve`].
    ///
    /// # Errors
    ///
    /// [`CatalogError::NotLoaded`] before the first publish.
    pub fn resolve_disambiguated(
        &self,
        context: &str,
        source: &str,
        disambiguation: Option<&str>,
        quantity: Option<i64>,
    ) -> Result<String> {
        let guard = self.slot.load();
        let catalog = guard.as_deref().ok_or(CatalogError::NotLoaded)?;
        Ok(catalog
            .resolve_disambiguated(context, source, disambiguation, quantity)
            .to_owned())
    }
}
