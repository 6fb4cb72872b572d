//! Foundation types for the import engine.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`Name`], [`FqName`] - Identifiers and dotted qualified names
//! - [`DeclId`], [`DirectiveId`], [`RefId`] - Lightweight handles
//! - [`TextRange`], [`TextSize`] - Source positions of reference sites
//!
//! This module has NO dependencies on other crate modules.

mod ids;
mod name;

pub use ids::{DeclId, DirectiveId, RefId};
pub use name::{FqName, Name, NameError, is_identifier};

// Re-export text-size types for convenience
pub use text_size::{TextRange, TextSize};
