#![forbid(unsafe_code)]

//! Qt `.ts` translation catalogs.
//!
//! Reads the XML catalogs produced by `lupdate`, resolves
//! `(context, source, quantity)` lookups into display strings with
//! fallback to the source text, and writes catalogs back out.
//!
//! # Role in tscat
//! `tscat-catalog` holds every piece of catalog logic; the `tscat` binary
//! is a thin command-line layer over it.
//!
//! # How it fits together
//! [`ts::read_document`] turns markup into a [`ts::TsDocument`].
//! [`Catalog::from_document`] validates and indexes it, collapsing duplicate
//! keys and flagging plural entries whose form count disagrees with the
//! locale's [`PluralRule`]. A [`Catalog`] is immutable; share it as
//! `Arc<Catalog>` or publish it once through a [`CatalogStore`].

pub mod catalog;
pub mod error;
pub mod model;
pub mod plural;
pub mod store;
pub mod ts;

pub use catalog::{
    Catalog, ContextCoverage, CoverageCounts, CoverageReport, Diagnostic, DuplicatePolicy,
    LoadOptions, LoadReport,
};
pub use error::{CatalogError, Result};
pub use model::{CatalogEntry, Location, TranslationState};
pub use plural::{PluralFamily, PluralRule};
pub use store::CatalogStore;
