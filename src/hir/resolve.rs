//! Name resolution: the scope oracle contract.
//!
//! The import engine never decides on its own what a name means. It asks a
//! [`ScopeOracle`], which answers against the *current* state of the file,
//! including directives the engine has just inserted speculatively. That is
//! what makes probe-then-rollback possible.

use std::slice;

use super::decl::{DeclKind, Declaration};
use super::file::{FileModel, ReferenceSite};
use super::import_path::ImportPath;
use crate::base::{FqName, Name};
use crate::error::OracleError;

// ============================================================================
// RESOLUTION RESULT
// ============================================================================

/// Result of resolving a name or a reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Resolved to a single declaration.
    Found(Declaration),
    /// Resolved to several candidates (ambiguity, or an overload set).
    Ambiguous(Vec<Declaration>),
    /// Nothing visible under that name.
    NotFound,
}

impl Resolution {
    /// Build a resolution from a candidate list, dropping duplicates while
    /// keeping the first occurrence order.
    pub fn from_candidates(candidates: impl IntoIterator<Item = Declaration>) -> Self {
        let mut unique: Vec<Declaration> = Vec::new();
        for candidate in candidates {
            if !unique.contains(&candidate) {
                unique.push(candidate);
            }
        }
        match unique.len() {
            0 => Resolution::NotFound,
            1 => Resolution::Found(unique.remove(0)),
            _ => Resolution::Ambiguous(unique),
        }
    }

    /// Get the resolved declaration if unambiguous.
    pub fn declaration(&self) -> Option<&Declaration> {
        match self {
            Resolution::Found(decl) => Some(decl),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found(_))
    }

    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Resolution::Ambiguous(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Resolution::NotFound)
    }

    /// All candidate declarations.
    pub fn candidates(&self) -> &[Declaration] {
        match self {
            Resolution::Found(decl) => slice::from_ref(decl),
            Resolution::Ambiguous(decls) => decls,
            Resolution::NotFound => &[],
        }
    }

    /// Whether `decl` is among the candidates.
    pub fn contains(&self, decl: &Declaration) -> bool {
        self.candidates().contains(decl)
    }

    /// Whether the name resolves to exactly `decl` and nothing else.
    pub fn is_exactly(&self, decl: &Declaration) -> bool {
        self.declaration() == Some(decl)
    }

    /// The importable qualified name all candidates share, if there is
    /// exactly one. Overloads of one function collapse to a single name.
    pub fn single_fq_name(&self) -> Option<&FqName> {
        let mut found: Option<&FqName> = None;
        for candidate in self.candidates() {
            let fq_name = candidate.importable_fq_name()?;
            match found {
                Some(existing) if existing != fq_name => return None,
                _ => found = Some(fq_name),
            }
        }
        found
    }
}

// ============================================================================
// SCOPE ORACLE
// ============================================================================

/// Answers "what does this name mean here" for a file.
///
/// Implementations must answer against the file state they are handed, not
/// a cached snapshot: the engine re-queries after speculative edits.
pub trait ScopeOracle {
    /// Resolve a short name of the given kind in the file's top-level scope.
    ///
    /// For [`DeclKind::Type`] this is the classifier lookup, for
    /// [`DeclKind::Package`] the root package lookup; functions and
    /// properties return their whole visible overload set.
    fn resolve_short_name(
        &self,
        file: &dyn FileModel,
        name: &Name,
        kind: DeclKind,
    ) -> Result<Resolution, OracleError>;

    /// Top-level members of a package, or `None` if the package is unknown.
    fn members_of_package(&self, package: &FqName) -> Result<Option<Vec<Declaration>>, OracleError>;

    /// What a specific reference site currently resolves to.
    fn reference_target(
        &self,
        file: &dyn FileModel,
        site: &ReferenceSite,
    ) -> Result<Resolution, OracleError>;

    /// Imports every file receives without a directive (e.g. `kotlin.*`).
    ///
    /// Resolution already sees them at the lowest priority. The engine reads
    /// them to skip paths that never need writing and to find names a new
    /// wildcard import would take over.
    fn default_imports(&self) -> &[ImportPath] {
        &[]
    }
}

impl<T: ScopeOracle + ?Sized> ScopeOracle for &T {
    fn resolve_short_name(
        &self,
        file: &dyn FileModel,
        name: &Name,
        kind: DeclKind,
    ) -> Result<Resolution, OracleError> {
        (**self).resolve_short_name(file, name, kind)
    }

    fn members_of_package(&self, package: &FqName) -> Result<Option<Vec<Declaration>>, OracleError> {
        (**self).members_of_package(package)
    }

    fn reference_target(
        &self,
        file: &dyn FileModel,
        site: &ReferenceSite,
    ) -> Result<Resolution, OracleError> {
        (**self).reference_target(file, site)
    }

    fn default_imports(&self) -> &[ImportPath] {
        (**self).default_imports()
    }
}
