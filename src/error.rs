//! Error types for import planning and insertion.
//!
//! `AlreadyPresent` is not an error: it is a successful
//! [`ImportOutcome`](crate::ide::ImportOutcome). Everything here is a
//! reason the import list was left untouched.

use thiserror::Error;

use crate::base::{FqName, Name};

/// Failure reported by a [`ScopeOracle`](crate::hir::ScopeOracle).
///
/// During the speculative wildcard phase this is treated as a failed
/// validation; anywhere else it surfaces as [`ImportError::Oracle`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("scope oracle failure: {message}")]
pub struct OracleError {
    pub message: String,
}

impl OracleError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Why an import could not be added.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ImportError {
    /// The target is nested, local or otherwise not reachable by a
    /// top-level import. The caller has to restructure the reference.
    #[error("'{fq_name}' is not a top-level importable declaration")]
    NotImportable { fq_name: FqName },

    /// The short name is already bound to something else that the file
    /// depends on. Resolving it needs an alias, which is left to the caller.
    #[error("'{name}' is already bound to '{existing}'")]
    Ambiguous { name: Name, existing: FqName },

    /// The file has no package header to anchor a new import list (scripts).
    #[error("cannot insert an import list into '{file}': no package header")]
    NoPackageHeader { file: String },

    /// The scope oracle failed outside the speculative phase. Safe to retry
    /// once the file is otherwise unchanged.
    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl ImportError {
    /// Whether retrying the same request may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, ImportError::Oracle(_))
    }
}
