//! Semantic model consumed by the import engine.
//!
//! - [`Declaration`] / [`DeclKind`] - what can be imported
//! - [`ImportPath`] - what an import directive names
//! - [`ScopeOracle`] / [`Resolution`] - what a name binds to
//! - [`FileModel`] - one file's import list and reference sites
//!
//! [`DeclarationIndex`] and [`MemoryFile`] are in-memory implementations of
//! the two host-side traits.

mod decl;
mod file;
mod import_path;
mod index;
mod resolve;

pub use decl::{Container, DeclKind, Declaration};
pub use file::{FileKind, FileModel, ImportDirective, MemoryFile, ReferenceSite, SiteRegion};
pub use import_path::ImportPath;
pub use index::{DeclarationIndex, FileScope};
pub use resolve::{Resolution, ScopeOracle};
