//! # import-assist
//!
//! Import resolution and insertion for languages with packages, wildcard
//! imports, explicit imports and aliases.
//!
//! Given a declaration a file wants to use by its short name, the engine
//! decides whether an import is needed and writes either `import pkg.*` or
//! `import pkg.Name`, without changing what any existing reference in the
//! file resolves to.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! ide     → Planning, conflict scanning, speculative edits, ensure_imported
//!   ↓
//! hir     → Declarations, import paths, scope oracle and file model
//!   ↓
//! base    → Primitives (Name, FqName, ids, text ranges)
//! ```

/// Foundation types: names, qualified names, ids
pub mod base;

/// Error types
pub mod error;

/// Semantic model: declarations, scope oracle, file model
pub mod hir;

/// Import planning and insertion
pub mod ide;

// Re-export commonly needed items
pub use base::{FqName, Name};
pub use error::{ImportError, OracleError};
pub use hir::{DeclKind, Declaration, DeclarationIndex, FileModel, ImportPath, MemoryFile, ScopeOracle};
pub use ide::{ImportInserter, ImportOutcome, ImportSettings, OverloadPolicy, Strategy};
