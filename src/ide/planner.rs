//! Import planning: whether an import is needed and which one to try first.

use std::iter;

use tracing::debug;

use super::settings::{ImportSettings, OverloadPolicy};
use crate::base::FqName;
use crate::error::ImportError;
use crate::hir::{DeclKind, Declaration, FileModel, ImportPath, ScopeOracle};

/// Kind of directive a plan step writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// `import pkg.*`
    Wildcard,
    /// `import pkg.Name`
    Explicit,
}

/// An import plan: an optional wildcard to try first, then the explicit
/// import that is always the last resort.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImportPlan {
    pub wildcard: Option<ImportPath>,
    pub explicit: ImportPath,
}

impl ImportPlan {
    /// Explicit import of `fq_name`, with no wildcard step.
    pub fn explicit(fq_name: FqName) -> Self {
        Self {
            wildcard: None,
            explicit: ImportPath::explicit(fq_name),
        }
    }

    /// Try `import package.*` before the explicit import.
    pub fn with_wildcard(mut self, package: FqName) -> Self {
        self.wildcard = Some(ImportPath::all_under(package));
        self
    }

    /// Strategy of the first step.
    pub fn strategy(&self) -> Strategy {
        if self.wildcard.is_some() {
            Strategy::Wildcard
        } else {
            Strategy::Explicit
        }
    }

    /// Every step in order; the explicit import is always last.
    pub fn attempts(&self) -> impl Iterator<Item = (Strategy, &ImportPath)> {
        self.wildcard
            .iter()
            .map(|path| (Strategy::Wildcard, path))
            .chain(iter::once((Strategy::Explicit, &self.explicit)))
    }
}

/// Outcome of planning.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Planned {
    /// The target is already visible by its short name.
    Satisfied,
    /// An import is needed. `target` is the canonical target, which differs
    /// from the requested one for companion objects.
    Plan { target: Declaration, plan: ImportPlan },
}

/// Decides whether a target needs an import and in which order to try
/// wildcard and explicit imports.
pub struct ImportPlanner<'a, O: ScopeOracle + ?Sized> {
    oracle: &'a O,
    settings: &'a ImportSettings,
}

impl<'a, O: ScopeOracle + ?Sized> ImportPlanner<'a, O> {
    pub fn new(oracle: &'a O, settings: &'a ImportSettings) -> Self {
        Self { oracle, settings }
    }

    /// Plan the import of `target` into `file`.
    pub fn plan(&self, target: &Declaration, file: &dyn FileModel) -> Result<Planned, ImportError> {
        let target = canonical_target(target)?;

        if !target.is_top_level() {
            return Err(not_importable(&target));
        }
        let fq_name = match target.importable_fq_name() {
            Some(fq_name) => fq_name.clone(),
            None => return Err(not_importable(&target)),
        };

        if self.is_satisfied(&target, file)? {
            debug!(decl = %fq_name, "already visible, no import needed");
            return Ok(Planned::Satisfied);
        }

        if let Some(existing) = file
            .import_directives()
            .iter()
            .find(|d| d.path().imported_name() == Some(&target.name) && d.path().fq_name() != &fq_name)
        {
            debug!(
                decl = %fq_name,
                existing = %existing.path(),
                "short name already taken by an import"
            );
            return Err(ImportError::Ambiguous {
                name: target.name.clone(),
                existing: existing.path().fq_name().clone(),
            });
        }

        let package = fq_name.parent();
        let mut plan = ImportPlan::explicit(fq_name);
        if self.wildcard_eligible(&target, &package, file)? {
            plan = plan.with_wildcard(package);
        }

        debug!(decl = %target.fq_name, strategy = ?plan.strategy(), "planned import");
        Ok(Planned::Plan { target, plan })
    }

    /// Whether the file's top-level scope already binds the target's short
    /// name to the target.
    pub fn is_satisfied(&self, target: &Declaration, file: &dyn FileModel) -> Result<bool, ImportError> {
        let resolved = self.oracle.resolve_short_name(file, &target.name, target.kind)?;
        let satisfied = match target.kind {
            DeclKind::Type | DeclKind::Package => resolved.is_exactly(target),
            DeclKind::Function | DeclKind::Property => match self.settings.overload_policy {
                OverloadPolicy::SetMembership => resolved.contains(target),
                // A plain explicit import is the strongest binding a file can
                // write; other overloads next to it do not make it missing.
                OverloadPolicy::ExactBinding => {
                    resolved.is_exactly(target) || (resolved.contains(target) && has_explicit_import(file, target))
                }
            },
        };
        Ok(satisfied)
    }

    fn wildcard_eligible(
        &self,
        target: &Declaration,
        package: &FqName,
        file: &dyn FileModel,
    ) -> Result<bool, ImportError> {
        if !self.settings.prefer_wildcard || package.is_root() {
            return Ok(false);
        }

        let wildcard = ImportPath::all_under(package.clone());
        let present = file
            .import_directives()
            .iter()
            .map(|d| d.path())
            .chain(self.oracle.default_imports())
            .any(|path| *path == wildcard);
        if present {
            return Ok(false);
        }

        let eligible = match target.kind {
            // A wildcard cannot override a classifier that is already visible.
            DeclKind::Type => self
                .oracle
                .resolve_short_name(file, &target.name, DeclKind::Type)?
                .is_not_found(),
            DeclKind::Package => false,
            DeclKind::Function | DeclKind::Property => true,
        };
        Ok(eligible)
    }
}

/// References to a companion object are imports of its owner type.
pub fn canonical_target(target: &Declaration) -> Result<Declaration, ImportError> {
    if !target.is_companion {
        return Ok(target.clone());
    }
    match target.owner() {
        Some(owner) if owner.kind == DeclKind::Type => Ok(owner.as_ref().clone()),
        _ => Err(not_importable(target)),
    }
}

/// Whether `file` has `import <target>` without an alias.
fn has_explicit_import(file: &dyn FileModel, target: &Declaration) -> bool {
    let Some(fq_name) = target.importable_fq_name() else {
        return false;
    };
    file.import_directives().iter().any(|d| {
        let path = d.path();
        !path.is_all_under() && !path.has_alias() && path.fq_name() == fq_name
    })
}

fn not_importable(target: &Declaration) -> ImportError {
    ImportError::NotImportable {
        fq_name: target.fq_name.clone(),
    }
}
