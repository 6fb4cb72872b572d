//! `ensure_imported`: make a declaration usable by its short name.
//!
//! ## Flow
//!
//! 1. [`ImportPlanner`] decides whether an import is needed and whether a
//!    wildcard is worth trying.
//! 2. A wildcard is applied speculatively. The conflicts it could cause are
//!    computed against the file *before* the edit, re-added as explicit
//!    imports afterwards, and everything is re-resolved. Any failure rolls
//!    the wildcard back and moves on to the explicit import.
//! 3. An explicit import is written unless it would shadow a classifier the
//!    file depends on.

use tracing::debug;

use super::conflicts::ConflictScanner;
use super::implied;
use super::planner::{ImportPlanner, Planned, Strategy};
use super::settings::ImportSettings;
use super::transaction::TransactionalEditor;
use crate::base::FqName;
use crate::error::ImportError;
use crate::hir::{DeclKind, Declaration, FileModel, ImportDirective, ImportPath, ScopeOracle};

/// Successful result of [`ImportInserter::ensure_imported`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImportOutcome {
    /// Directives were added, in insertion order. A wildcard may be followed
    /// by explicit imports that keep existing references bound.
    Imported { strategy: Strategy, added: Vec<ImportPath> },
    /// The target was already visible; the file is unchanged.
    AlreadyPresent,
}

impl ImportOutcome {
    pub fn is_imported(&self) -> bool {
        matches!(self, ImportOutcome::Imported { .. })
    }

    /// Paths added to the file, empty for [`ImportOutcome::AlreadyPresent`].
    pub fn added(&self) -> &[ImportPath] {
        match self {
            ImportOutcome::Imported { added, .. } => added,
            ImportOutcome::AlreadyPresent => &[],
        }
    }
}

/// The import insertion engine.
///
/// Generic over the scope oracle; pass `&index` to borrow one.
pub struct ImportInserter<O: ScopeOracle> {
    oracle: O,
    settings: ImportSettings,
}

impl<O: ScopeOracle> ImportInserter<O> {
    pub fn new(oracle: O, settings: ImportSettings) -> Self {
        Self { oracle, settings }
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn settings(&self) -> &ImportSettings {
        &self.settings
    }

    /// Make `target` usable by its short name in `file`.
    ///
    /// On error the import list is exactly as it was before the call.
    pub fn ensure_imported<F: FileModel>(
        &self,
        file: &mut F,
        target: &Declaration,
    ) -> Result<ImportOutcome, ImportError> {
        let planner = ImportPlanner::new(&self.oracle, &self.settings);
        let (target, plan) = match planner.plan(target, &*file)? {
            Planned::Satisfied => return Ok(ImportOutcome::AlreadyPresent),
            Planned::Plan { target, plan } => (target, plan),
        };

        let mut editor = TransactionalEditor::new(file);
        if let Some(wildcard) = &plan.wildcard {
            match self.try_wildcard(&mut editor, &target, wildcard) {
                Ok(Some(added)) => {
                    return Ok(ImportOutcome::Imported {
                        strategy: Strategy::Wildcard,
                        added,
                    });
                }
                Ok(None) => {}
                Err(err) => {
                    debug!(decl = %target.fq_name, error = %err, "wildcard attempt failed, falling back");
                }
            }
        }
        self.add_explicit(&mut editor, &target, &plan.explicit)
    }

    /// Whether writing `path` into `file` would change anything.
    pub fn need_import(&self, path: &ImportPath, file: &dyn FileModel) -> bool {
        implied::need_import(path, file, self.oracle.default_imports())
    }

    /// Whether `path` is implied in `file` without any directive.
    pub fn is_imported_by_default(&self, path: &ImportPath, file: &dyn FileModel) -> bool {
        implied::is_imported_by_default(path, file, self.oracle.default_imports())
    }

    /// Write `import <fq_name>` unless it is already implied or covered.
    ///
    /// Unlike [`ensure_imported`](Self::ensure_imported) this looks at
    /// paths only and never consults the oracle.
    pub fn add_import_if_needed<F: FileModel>(
        &self,
        file: &mut F,
        fq_name: &FqName,
    ) -> Result<Option<ImportDirective>, ImportError> {
        let path = ImportPath::explicit(fq_name.clone());
        if !self.need_import(&path, &*file) {
            debug!(path = %path, "import already implied");
            return Ok(None);
        }
        let directive = file.insert_import_directive(path)?;
        debug!(file = file.file_name(), directive = %directive.path(), "added import");
        Ok(Some(directive))
    }

    /// Speculative wildcard step. `Ok(None)` means validation failed and
    /// the edit was rolled back.
    fn try_wildcard<F: FileModel>(
        &self,
        editor: &mut TransactionalEditor<'_, F>,
        target: &Declaration,
        path: &ImportPath,
    ) -> Result<Option<Vec<ImportPath>>, ImportError> {
        let scanner = ConflictScanner::new(&self.oracle);
        let package = path.fq_name();

        let Some(candidates) = scanner.wildcard_candidates(editor.file(), package)? else {
            debug!(package = %package, "package unknown to the oracle, skipping wildcard");
            return Ok(None);
        };
        let conflicts = scanner.find_dependent_conflicts(editor.file(), &candidates)?;

        let handle = editor.apply_wildcard(path.clone())?;
        match self.validate_wildcard(editor, target, conflicts.iter()) {
            Ok(true) => {
                let added = editor.commit(handle).iter().map(|d| d.path().clone()).collect();
                Ok(Some(added))
            }
            Ok(false) => {
                editor.rollback(handle);
                Ok(None)
            }
            Err(err) => {
                editor.rollback(handle);
                Err(err)
            }
        }
    }

    /// Checks the file after `import pkg.*` went in, pinning conflicts with
    /// explicit imports along the way.
    ///
    /// The target must count as visible afterwards by the same rule the
    /// planner uses, so a second call finds nothing to do.
    fn validate_wildcard<'c, F: FileModel>(
        &self,
        editor: &mut TransactionalEditor<'_, F>,
        target: &Declaration,
        conflicts: impl Iterator<Item = &'c Declaration> + Clone,
    ) -> Result<bool, ImportError> {
        let planner = ImportPlanner::new(&self.oracle, &self.settings);
        if !planner.is_satisfied(target, editor.file())? {
            debug!(decl = %target.fq_name, "wildcard does not bind the target");
            return Ok(false);
        }

        for conflict in conflicts.clone() {
            if let Some(fq_name) = conflict.importable_fq_name() {
                editor.append(ImportPath::explicit(fq_name.clone()))?;
            }
        }

        for conflict in conflicts {
            let resolved = self
                .oracle
                .resolve_short_name(editor.file(), &conflict.name, conflict.kind)?;
            if !resolved.is_exactly(conflict) {
                debug!(conflict = %conflict.fq_name, "wildcard rebinds an existing reference");
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn add_explicit<F: FileModel>(
        &self,
        editor: &mut TransactionalEditor<'_, F>,
        target: &Declaration,
        path: &ImportPath,
    ) -> Result<ImportOutcome, ImportError> {
        if matches!(target.kind, DeclKind::Type | DeclKind::Package) {
            let visible = self
                .oracle
                .resolve_short_name(editor.file(), &target.name, DeclKind::Type)?;
            let others: Vec<Declaration> = visible
                .candidates()
                .iter()
                .filter(|decl| *decl != target)
                .cloned()
                .collect();

            let used = ConflictScanner::new(&self.oracle).find_dependent_conflicts(editor.file(), &others)?;
            if let Some(existing) = used.first() {
                debug!(decl = %target.fq_name, existing = %existing.fq_name, "explicit import would shadow a used classifier");
                return Err(ImportError::Ambiguous {
                    name: target.name.clone(),
                    existing: existing.fq_name.clone(),
                });
            }
        }

        let handle = editor.apply_explicit(path.clone())?;
        let added = editor.commit(handle).iter().map(|d| d.path().clone()).collect();
        Ok(ImportOutcome::Imported {
            strategy: Strategy::Explicit,
            added,
        })
    }
}
