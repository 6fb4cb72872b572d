//! Conflict scanning for speculative wildcard imports.
//!
//! A new `import pkg.*` can take over a short name the file currently gets
//! from another wildcard import or from a default import. The scanner finds
//! which of those names the file actually uses, so they can be pinned with
//! explicit imports.

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashSet;
use tracing::trace;

use crate::base::{FqName, Name};
use crate::error::OracleError;
use crate::hir::{DeclKind, Declaration, FileModel, ScopeOracle, SiteRegion};

/// Finds declarations a file depends on that an edit could rebind.
pub struct ConflictScanner<'a, O: ScopeOracle + ?Sized> {
    oracle: &'a O,
}

impl<'a, O: ScopeOracle + ?Sized> ConflictScanner<'a, O> {
    pub fn new(oracle: &'a O) -> Self {
        Self { oracle }
    }

    /// Classifiers a wildcard import of `package` could shadow.
    ///
    /// For every classifier name in `package` that is not already bound by
    /// an import directive, the classifiers of that name visible through the
    /// file's other wildcard imports and through the default imports.
    /// Returns `None` if the oracle does not know `package`.
    ///
    /// Scopes are listed lowest priority first, so among candidates sharing
    /// a name the last one is the one a reference can currently bind to.
    pub fn wildcard_candidates(
        &self,
        file: &dyn FileModel,
        package: &FqName,
    ) -> Result<Option<Vec<Declaration>>, OracleError> {
        let Some(members) = self.oracle.members_of_package(package)? else {
            return Ok(None);
        };

        let directives = file.import_directives();
        let imported: FxHashSet<&Name> = directives.iter().filter_map(|d| d.path().imported_name()).collect();
        let names: IndexSet<&Name> = members
            .iter()
            .filter(|decl| decl.kind == DeclKind::Type && !imported.contains(&decl.name))
            .map(|decl| &decl.name)
            .collect();
        if names.is_empty() {
            return Ok(Some(Vec::new()));
        }

        let defaults = self.oracle.default_imports();
        let scopes_in_order = defaults
            .iter()
            .filter(|path| path.is_all_under())
            .chain(defaults.iter().filter(|path| !path.is_all_under()))
            .chain(directives.iter().map(|d| d.path()).filter(|path| path.is_all_under()));

        let mut scopes = Vec::new();
        for path in scopes_in_order {
            if path.fq_name() == package || path.has_alias() {
                continue;
            }
            if path.is_all_under() {
                if let Some(decls) = self.oracle.members_of_package(path.fq_name())? {
                    scopes.push(decls);
                }
            } else if let Some(decls) = self.oracle.members_of_package(&path.fq_name().parent())? {
                let named = decls
                    .into_iter()
                    .filter(|decl| decl.importable_fq_name() == Some(path.fq_name()))
                    .collect();
                scopes.push(named);
            }
        }

        let candidates = names
            .iter()
            .flat_map(|&name| {
                scopes
                    .iter()
                    .flatten()
                    .filter(move |decl| decl.kind == DeclKind::Type && decl.name == *name)
            })
            .cloned()
            .collect();
        Ok(Some(candidates))
    }

    /// The subset of `candidates` that some reference in the file currently
    /// resolves to, in discovery order.
    ///
    /// Import directives, the package header and selectors of qualified
    /// expressions are not looked at. When several candidates share a short
    /// name the last one is searched for.
    pub fn find_dependent_conflicts(
        &self,
        file: &dyn FileModel,
        candidates: &[Declaration],
    ) -> Result<IndexSet<Declaration>, OracleError> {
        let mut remaining: IndexMap<Name, Declaration> = candidates
            .iter()
            .map(|decl| (decl.name.clone(), decl.clone()))
            .collect();
        let mut found = IndexSet::new();
        if remaining.is_empty() {
            return Ok(found);
        }

        for site in file.reference_sites() {
            if site.region != SiteRegion::Body || site.is_selector {
                continue;
            }
            let Some(expected) = remaining.get(&site.name).and_then(|decl| decl.importable_fq_name()).cloned() else {
                continue;
            };

            let resolved = self.oracle.reference_target(file, &site)?;
            if resolved.single_fq_name() != Some(&expected) {
                continue;
            }

            trace!(site = ?site.id, name = %site.name, conflict = %expected, "file depends on conflict candidate");
            if let Some(decl) = remaining.shift_remove(&site.name) {
                found.insert(decl);
            }
            if remaining.is_empty() {
                break;
            }
        }
        Ok(found)
    }
}
