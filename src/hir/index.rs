//! Declaration index: an in-memory [`ScopeOracle`].
//!
//! Holds every declaration a workspace knows about and answers scope
//! queries for a file from the file's *current* import list, so it sees
//! speculative directives as soon as they are inserted.
//!
//! ## Top-level scope of a file
//!
//! Names are looked up in layers, highest priority first:
//!
//! 1. explicit imports (including aliases)
//! 2. members of the file's own package
//! 3. wildcard imports
//! 4. default imports (explicit, then wildcard)
//!
//! Classifiers take the first layer that has any candidate; several distinct
//! candidates in that layer make the name ambiguous. Functions and
//! properties accumulate over all layers, since overloads compose.

use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

use super::decl::{Container, DeclKind, Declaration};
use super::file::{FileModel, ReferenceSite};
use super::import_path::ImportPath;
use super::resolve::{Resolution, ScopeOracle};
use crate::base::{DeclId, FqName, Name, RefId};
use crate::error::OracleError;

/// Index into the declarations vector.
type DeclIdx = usize;

/// Explicit imports, own package, wildcard imports, default explicit,
/// default wildcard.
const LAYER_COUNT: usize = 5;

// ============================================================================
// DECLARATION INDEX
// ============================================================================

/// An index of all declarations visible to the files being edited.
///
/// Declarations are stored in a single vector and referenced by index from
/// all other maps.
#[derive(Clone, Debug)]
pub struct DeclarationIndex {
    /// The single source of truth for all declarations.
    decls: Vec<Declaration>,
    /// Qualified name -> declarations (overloads share a name).
    by_fq_name: FxHashMap<FqName, Vec<DeclIdx>>,
    /// Package -> its top-level members (not sub-packages).
    by_package: FxHashMap<FqName, Vec<DeclIdx>>,
    /// Package declarations by qualified name.
    packages: FxHashMap<FqName, DeclIdx>,
    /// Every package that exists, including the root.
    known_packages: FxHashSet<FqName>,
    /// Imports every file gets implicitly.
    default_imports: Vec<ImportPath>,
    /// References bound by something other than the top-level scope
    /// (locals, members, receivers).
    pinned: FxHashMap<RefId, DeclIdx>,
}

impl Default for DeclarationIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl DeclarationIndex {
    /// Create a new empty index. Only the root package exists.
    pub fn new() -> Self {
        let mut known_packages = FxHashSet::default();
        known_packages.insert(FqName::root());
        Self {
            decls: Vec::new(),
            by_fq_name: FxHashMap::default(),
            by_package: FxHashMap::default(),
            packages: FxHashMap::default(),
            known_packages,
            default_imports: Vec::new(),
            pinned: FxHashMap::default(),
        }
    }

    /// Set the imports every file receives implicitly (e.g. `kotlin.*`).
    pub fn with_default_imports(mut self, imports: impl IntoIterator<Item = ImportPath>) -> Self {
        self.default_imports = imports.into_iter().collect();
        self
    }

    /// Register a package and all of its ancestors, returning its declaration.
    ///
    /// The root package has no declaration; asking for it registers nothing
    /// and returns `None`.
    pub fn add_package(&mut self, fq_name: &FqName) -> Option<Declaration> {
        if fq_name.is_root() {
            return None;
        }
        if let Some(&idx) = self.packages.get(fq_name) {
            return Some(self.decls[idx].clone());
        }

        let parent = fq_name.parent();
        self.add_package(&parent);

        let name = fq_name.short_name().cloned()?;
        let idx = self.push(Declaration {
            id: DeclId::new(0),
            name,
            fq_name: fq_name.clone(),
            kind: DeclKind::Package,
            container: Container::Package(parent),
            is_companion: false,
        });
        self.packages.insert(fq_name.clone(), idx);
        self.known_packages.insert(fq_name.clone());
        Some(self.decls[idx].clone())
    }

    /// Add a top-level declaration to `package`.
    pub fn add_top_level(&mut self, package: &FqName, name: &str, kind: DeclKind) -> Declaration {
        self.add_package(package);
        let name = Name::new(name);
        let idx = self.push(Declaration {
            id: DeclId::new(0),
            fq_name: package.child(name.clone()),
            name,
            kind,
            container: Container::Package(package.clone()),
            is_companion: false,
        });
        self.by_package.entry(package.clone()).or_default().push(idx);
        self.decls[idx].clone()
    }

    /// Add a declaration nested in `owner` (nested class, member function).
    pub fn add_nested(&mut self, owner: &Declaration, name: &str, kind: DeclKind) -> Declaration {
        self.add_member(owner, Name::new(name), kind, false)
    }

    /// Add the companion object of `owner`.
    pub fn add_companion(&mut self, owner: &Declaration) -> Declaration {
        self.add_member(owner, Name::new("Companion"), DeclKind::Type, true)
    }

    /// Add a local declaration; it has no importable name.
    pub fn add_local(&mut self, name: &str, kind: DeclKind) -> Declaration {
        let name = Name::new(name);
        let idx = self.push(Declaration {
            id: DeclId::new(0),
            fq_name: FqName::root().child(name.clone()),
            name,
            kind,
            container: Container::Local,
            is_companion: false,
        });
        self.decls[idx].clone()
    }

    /// Bind a reference site to a declaration regardless of imports.
    pub fn bind_reference(&mut self, site: RefId, decl: &Declaration) {
        if let Some(idx) = self.position(decl) {
            self.pinned.insert(site, idx);
        }
    }

    /// Look up all declarations with a qualified name.
    pub fn lookup_qualified(&self, fq_name: &FqName) -> Vec<&Declaration> {
        self.by_fq_name
            .get(fq_name)
            .map(|indices| indices.iter().map(|&idx| &self.decls[idx]).collect())
            .unwrap_or_default()
    }

    /// Build a resolver for the top-level scope of `file`.
    pub fn file_scope<'a>(&'a self, file: &dyn FileModel) -> FileScope<'a> {
        FileScope::new(self, file)
    }

    /// Get the total number of declarations.
    pub fn len(&self) -> usize {
        self.decls.len()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    fn add_member(&mut self, owner: &Declaration, name: Name, kind: DeclKind, is_companion: bool) -> Declaration {
        let idx = self.push(Declaration {
            id: DeclId::new(0),
            fq_name: owner.fq_name.child(name.clone()),
            name,
            kind,
            container: Container::Declaration(Arc::new(owner.clone())),
            is_companion,
        });
        self.decls[idx].clone()
    }

    fn push(&mut self, mut decl: Declaration) -> DeclIdx {
        let idx = self.decls.len();
        decl.id = DeclId::new(idx as u32);
        if !matches!(decl.container, Container::Local) {
            self.by_fq_name.entry(decl.fq_name.clone()).or_default().push(idx);
        }
        self.decls.push(decl);
        idx
    }

    fn position(&self, decl: &Declaration) -> Option<DeclIdx> {
        let idx = decl.id.index() as usize;
        (self.decls.get(idx) == Some(decl)).then_some(idx)
    }

    fn members(&self, package: &FqName) -> impl Iterator<Item = &Declaration> {
        self.by_package
            .get(package)
            .into_iter()
            .flatten()
            .map(|&idx| &self.decls[idx])
    }
}

impl ScopeOracle for DeclarationIndex {
    fn resolve_short_name(
        &self,
        file: &dyn FileModel,
        name: &Name,
        kind: DeclKind,
    ) -> Result<Resolution, OracleError> {
        Ok(self.file_scope(file).resolve(name, kind))
    }

    fn members_of_package(&self, package: &FqName) -> Result<Option<Vec<Declaration>>, OracleError> {
        if !self.known_packages.contains(package) {
            return Ok(None);
        }
        Ok(Some(self.members(package).cloned().collect()))
    }

    fn reference_target(
        &self,
        file: &dyn FileModel,
        site: &ReferenceSite,
    ) -> Result<Resolution, OracleError> {
        if let Some(&idx) = self.pinned.get(&site.id) {
            return Ok(Resolution::Found(self.decls[idx].clone()));
        }
        if site.is_selector {
            // Selectors resolve through their receiver, which the index
            // does not model unless pinned.
            return Ok(Resolution::NotFound);
        }
        Ok(self.file_scope(file).resolve(&site.name, site.kind))
    }

    fn default_imports(&self) -> &[ImportPath] {
        &self.default_imports
    }
}

// ============================================================================
// FILE SCOPE
// ============================================================================

/// Resolver for the top-level scope of one file, in its current state.
#[derive(Clone, Debug)]
pub struct FileScope<'a> {
    index: &'a DeclarationIndex,
    package: FqName,
    explicit: Vec<ImportPath>,
    all_under: Vec<FqName>,
}

impl<'a> FileScope<'a> {
    fn new(index: &'a DeclarationIndex, file: &dyn FileModel) -> Self {
        let (all_under, explicit): (Vec<_>, Vec<_>) = file
            .import_directives()
            .iter()
            .map(|d| d.path().clone())
            .partition(ImportPath::is_all_under);
        Self {
            index,
            package: file.package_name().clone(),
            explicit,
            all_under: all_under.into_iter().map(|p| p.fq_name().clone()).collect(),
        }
    }

    /// Resolve a short name of the given kind.
    pub fn resolve(&self, name: &Name, kind: DeclKind) -> Resolution {
        if kind == DeclKind::Package {
            let fq_name = FqName::root().child(name.clone());
            return match self.index.packages.get(&fq_name) {
                Some(&idx) => Resolution::Found(self.index.decls[idx].clone()),
                None => Resolution::NotFound,
            };
        }

        let defaults = &self.index.default_imports;
        let default_explicit: Vec<ImportPath> = defaults.iter().filter(|p| !p.is_all_under()).cloned().collect();
        let default_all_under: Vec<FqName> = defaults
            .iter()
            .filter(|p| p.is_all_under())
            .map(|p| p.fq_name().clone())
            .collect();

        let layer = |depth: usize| -> Vec<Declaration> {
            match depth {
                0 => self.explicit_layer(&self.explicit, name, kind),
                1 => self.package_layer(std::slice::from_ref(&self.package), name, kind),
                2 => self.package_layer(&self.all_under, name, kind),
                3 => self.explicit_layer(&default_explicit, name, kind),
                _ => self.package_layer(&default_all_under, name, kind),
            }
        };

        if kind.allows_overloads() {
            return Resolution::from_candidates((0..LAYER_COUNT).flat_map(layer));
        }

        for depth in 0..LAYER_COUNT {
            let candidates = layer(depth);
            if !candidates.is_empty() {
                trace!(name = %name, depth, count = candidates.len(), "classifier resolved");
                return Resolution::from_candidates(candidates);
            }
        }
        Resolution::NotFound
    }

    fn explicit_layer(&self, imports: &[ImportPath], name: &Name, kind: DeclKind) -> Vec<Declaration> {
        imports
            .iter()
            .filter(|path| path.imported_name() == Some(name))
            .flat_map(|path| self.index.lookup_qualified(path.fq_name()))
            .filter(|decl| decl.kind == kind)
            .cloned()
            .collect()
    }

    fn package_layer(&self, packages: &[FqName], name: &Name, kind: DeclKind) -> Vec<Declaration> {
        packages
            .iter()
            .flat_map(|package| self.index.members(package))
            .filter(|decl| decl.kind == kind && decl.name == *name)
            .cloned()
            .collect()
    }
}
