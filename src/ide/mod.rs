//! Import assistance: the editing side of the engine.
//!
//! This module turns "the user wants `Foo` by its short name" into edits of
//! one file's import list, using the semantic model in [`crate::hir`].
//!
//! ## Design Principles
//!
//! 1. **Never rebind silently**: an import that would change what an
//!    existing reference means is either compensated or refused
//! 2. **All or nothing**: speculative edits are rolled back exactly
//! 3. **Host agnostic**: the oracle and the file are traits
//!
//! ## Usage
//!
//! ```ignore
//! use import_assist::ide::{ImportInserter, ImportSettings};
//!
//! let inserter = ImportInserter::new(&index, ImportSettings::default().with_prefer_wildcard(true));
//! let outcome = inserter.ensure_imported(&mut file, &target)?;
//! ```

mod conflicts;
mod implied;
mod insert;
mod planner;
mod settings;
mod transaction;

pub use conflicts::ConflictScanner;
pub use implied::{is_imported_by_default, is_imported_with_default, need_import};
pub use insert::{ImportInserter, ImportOutcome};
pub use planner::{ImportPlan, ImportPlanner, Planned, Strategy, canonical_target};
pub use settings::{ImportSettings, OverloadPolicy};
pub use transaction::{CommitHandle, TransactionalEditor};
