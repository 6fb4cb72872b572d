//! End-to-end tests for `ensure_imported`.
//!
//! Files are in-memory, the oracle is a `DeclarationIndex`, sometimes wrapped
//! to fail on demand so the speculative phase can be observed rolling back.

use import_assist::base::{FqName, RefId};
use import_assist::error::{ImportError, OracleError};
use import_assist::hir::{
    DeclKind, Declaration, DeclarationIndex, FileModel, ImportPath, MemoryFile, ReferenceSite, Resolution,
    ScopeOracle, SiteRegion,
};
use import_assist::ide::{ImportInserter, ImportOutcome, ImportSettings, OverloadPolicy, Strategy};
use import_assist::Name;
use rstest::rstest;

fn fq(s: &str) -> FqName {
    FqName::parse(s).unwrap()
}

fn explicit_only() -> ImportSettings {
    ImportSettings::default()
}

fn prefer_wildcard() -> ImportSettings {
    ImportSettings::default().with_prefer_wildcard(true)
}

/// What every non-selector body reference currently resolves to.
fn body_bindings(index: &DeclarationIndex, file: &MemoryFile) -> Vec<(RefId, Resolution)> {
    file.reference_sites()
        .into_iter()
        .filter(|site| site.region == SiteRegion::Body && !site.is_selector)
        .map(|site| (site.id, index.reference_target(file, &site).unwrap()))
        .collect()
}

// ============================================================================
// FAILING ORACLE
// ============================================================================

enum Trigger {
    Always,
    /// Fail while the file contains this directive.
    WhileImported(ImportPath),
}

struct FlakyOracle<'a> {
    inner: &'a DeclarationIndex,
    trigger: Trigger,
}

impl FlakyOracle<'_> {
    fn check(&self, file: &dyn FileModel) -> Result<(), OracleError> {
        let tripped = match &self.trigger {
            Trigger::Always => true,
            Trigger::WhileImported(path) => file.import_directives().iter().any(|d| d.path() == path),
        };
        if tripped {
            Err(OracleError::new("index is being rebuilt"))
        } else {
            Ok(())
        }
    }
}

impl ScopeOracle for FlakyOracle<'_> {
    fn resolve_short_name(
        &self,
        file: &dyn FileModel,
        name: &Name,
        kind: DeclKind,
    ) -> Result<Resolution, OracleError> {
        self.check(file)?;
        self.inner.resolve_short_name(file, name, kind)
    }

    fn members_of_package(&self, package: &FqName) -> Result<Option<Vec<Declaration>>, OracleError> {
        self.inner.members_of_package(package)
    }

    fn reference_target(
        &self,
        file: &dyn FileModel,
        site: &ReferenceSite,
    ) -> Result<Resolution, OracleError> {
        self.check(file)?;
        self.inner.reference_target(file, site)
    }

    fn default_imports(&self) -> &[ImportPath] {
        self.inner.default_imports()
    }
}

// ============================================================================
// SCENARIOS
// ============================================================================

#[test]
fn test_explicit_only_import_into_empty_list() {
    let mut index = DeclarationIndex::new();
    let foo = index.add_top_level(&fq("q.r"), "Foo", DeclKind::Type);
    let mut file = MemoryFile::new("main.kt", fq("p"));

    let outcome = ImportInserter::new(&index, explicit_only())
        .ensure_imported(&mut file, &foo)
        .unwrap();

    assert_eq!(
        outcome,
        ImportOutcome::Imported {
            strategy: Strategy::Explicit,
            added: vec![ImportPath::explicit(fq("q.r.Foo"))],
        }
    );
    assert_eq!(file.render_imports(), "import q.r.Foo\n");
}

#[test]
fn test_existing_wildcard_covers_target() {
    let mut index = DeclarationIndex::new();
    let foo = index.add_top_level(&fq("q.r"), "Foo", DeclKind::Type);
    let mut file = MemoryFile::new("main.kt", fq("p")).with_import(ImportPath::all_under(fq("q.r")));
    let before = file.import_directives().to_vec();

    let outcome = ImportInserter::new(&index, prefer_wildcard())
        .ensure_imported(&mut file, &foo)
        .unwrap();

    assert_eq!(outcome, ImportOutcome::AlreadyPresent);
    assert_eq!(file.import_directives(), before.as_slice());
}

#[test]
fn test_function_via_wildcard_keeps_member_reference() {
    let mut index = DeclarationIndex::new();
    let owner = index.add_top_level(&fq("p"), "A", DeclKind::Type);
    let member = index.add_nested(&owner, "bar", DeclKind::Function);
    let target = index.add_top_level(&fq("q"), "bar", DeclKind::Function);

    // `bar()` inside `A` binds to the member, not to a top-level function.
    let mut file = MemoryFile::new("main.kt", fq("p"));
    let site = file.add_reference("bar", DeclKind::Function);
    index.bind_reference(site, &member);
    let before = body_bindings(&index, &file);

    let outcome = ImportInserter::new(&index, prefer_wildcard())
        .ensure_imported(&mut file, &target)
        .unwrap();

    assert_eq!(
        outcome,
        ImportOutcome::Imported {
            strategy: Strategy::Wildcard,
            added: vec![ImportPath::all_under(fq("q"))],
        }
    );
    assert_eq!(body_bindings(&index, &file), before);
}

#[test]
fn test_wildcard_preserves_conflicting_references() {
    let mut index = DeclarationIndex::new();
    let foo = index.add_top_level(&fq("q"), "Foo", DeclKind::Type);
    index.add_top_level(&fq("q"), "Bar", DeclKind::Type);
    index.add_top_level(&fq("q"), "Qux", DeclKind::Type);
    index.add_top_level(&fq("q"), "Baz", DeclKind::Type);
    index.add_top_level(&fq("a"), "Bar", DeclKind::Type);
    index.add_top_level(&fq("a"), "Qux", DeclKind::Type);
    index.add_top_level(&fq("b"), "Baz", DeclKind::Type);

    let mut file = MemoryFile::new("main.kt", fq("app"))
        .with_import(ImportPath::all_under(fq("a")))
        .with_import(ImportPath::explicit(fq("b.Baz")));
    file.add_reference("Bar", DeclKind::Type);
    file.add_reference("Baz", DeclKind::Type);
    file.add_reference("Bar", DeclKind::Type);
    let before = body_bindings(&index, &file);

    let outcome = ImportInserter::new(&index, prefer_wildcard())
        .ensure_imported(&mut file, &foo)
        .unwrap();

    // `Qux` is not referenced, so it is left to the new wildcard.
    assert_eq!(
        outcome.added(),
        &[ImportPath::all_under(fq("q")), ImportPath::explicit(fq("a.Bar"))]
    );
    assert_eq!(body_bindings(&index, &file), before);
    assert_eq!(
        file.render_imports(),
        "import a.*\nimport b.Baz\nimport q.*\nimport a.Bar\n"
    );
}

#[rstest]
#[case::type_("Thing", DeclKind::Type)]
#[case::function("thing", DeclKind::Function)]
#[case::property("thing", DeclKind::Property)]
fn test_explicit_preference_never_writes_wildcard(#[case] name: &str, #[case] kind: DeclKind) {
    let mut index = DeclarationIndex::new();
    let target = index.add_top_level(&fq("q.lib"), name, kind);
    let mut file = MemoryFile::new("main.kt", fq("p"));

    let outcome = ImportInserter::new(&index, explicit_only())
        .ensure_imported(&mut file, &target)
        .unwrap();

    assert!(matches!(outcome, ImportOutcome::Imported { strategy: Strategy::Explicit, .. }));
    assert!(file.import_paths().iter().all(|path| !path.is_all_under()));
}

#[rstest]
#[case::type_("Thing", DeclKind::Type)]
#[case::function("thing", DeclKind::Function)]
#[case::property("thing", DeclKind::Property)]
fn test_wildcard_preference_is_tried_first(#[case] name: &str, #[case] kind: DeclKind) {
    let mut index = DeclarationIndex::new();
    let target = index.add_top_level(&fq("q.lib"), name, kind);
    let mut file = MemoryFile::new("main.kt", fq("p"));

    let outcome = ImportInserter::new(&index, prefer_wildcard())
        .ensure_imported(&mut file, &target)
        .unwrap();

    assert_eq!(outcome.added(), &[ImportPath::all_under(fq("q.lib"))]);
}

#[test]
fn test_root_package_target_gets_explicit_import() {
    let mut index = DeclarationIndex::new();
    let target = index.add_top_level(&FqName::root(), "util", DeclKind::Function);
    let mut file = MemoryFile::new("main.kt", fq("p"));

    let outcome = ImportInserter::new(&index, prefer_wildcard())
        .ensure_imported(&mut file, &target)
        .unwrap();
    assert_eq!(outcome.added(), &[ImportPath::explicit(fq("util"))]);
}

#[test]
fn test_unknown_package_falls_back_to_explicit() {
    // A declaration the oracle has never seen, e.g. from a library that is
    // still being indexed.
    let mut index = DeclarationIndex::new();
    let mut target = index.add_top_level(&fq("q"), "Foo", DeclKind::Type);
    target.fq_name = fq("ghost.Foo");
    target.container = import_assist::hir::Container::Package(fq("ghost"));

    let mut file = MemoryFile::new("main.kt", fq("p"));
    let outcome = ImportInserter::new(&index, prefer_wildcard())
        .ensure_imported(&mut file, &target)
        .unwrap();
    assert_eq!(
        outcome,
        ImportOutcome::Imported {
            strategy: Strategy::Explicit,
            added: vec![ImportPath::explicit(fq("ghost.Foo"))],
        }
    );
}

#[test]
fn test_default_imports_satisfy_target() {
    let mut index = DeclarationIndex::new().with_default_imports([ImportPath::all_under(fq("kotlin"))]);
    let pair = index.add_top_level(&fq("kotlin"), "Pair", DeclKind::Type);
    let mut file = MemoryFile::new("main.kt", fq("p"));

    let outcome = ImportInserter::new(&index, prefer_wildcard())
        .ensure_imported(&mut file, &pair)
        .unwrap();
    assert_eq!(outcome, ImportOutcome::AlreadyPresent);
    assert!(file.import_directives().is_empty());
}

#[test]
fn test_exact_binding_policy_adds_explicit_import() {
    let mut index = DeclarationIndex::new();
    index.add_top_level(&fq("p"), "bar", DeclKind::Function);
    let target = index.add_top_level(&fq("q"), "bar", DeclKind::Function);
    let mut file = MemoryFile::new("main.kt", fq("p")).with_import(ImportPath::all_under(fq("q")));

    let lenient = ImportInserter::new(&index, explicit_only());
    assert_eq!(lenient.ensure_imported(&mut file, &target).unwrap(), ImportOutcome::AlreadyPresent);

    let strict = ImportInserter::new(
        &index,
        explicit_only().with_overload_policy(OverloadPolicy::ExactBinding),
    );
    let outcome = strict.ensure_imported(&mut file, &target).unwrap();
    assert_eq!(outcome.added(), &[ImportPath::explicit(fq("q.bar"))]);
}

#[rstest]
#[case::explicit_only(explicit_only())]
#[case::prefer_wildcard(prefer_wildcard())]
fn test_exact_binding_second_call_is_already_present(#[case] settings: ImportSettings) {
    let mut index = DeclarationIndex::new();
    index.add_top_level(&fq("p"), "bar", DeclKind::Function);
    let target = index.add_top_level(&fq("q"), "bar", DeclKind::Function);
    let mut file = MemoryFile::new("main.kt", fq("p"));

    let inserter = ImportInserter::new(&index, settings.with_overload_policy(OverloadPolicy::ExactBinding));
    let first = inserter.ensure_imported(&mut file, &target).unwrap();
    // `import q.*` would leave `bar` an overload set, so only the explicit
    // import binds it.
    assert_eq!(
        first,
        ImportOutcome::Imported {
            strategy: Strategy::Explicit,
            added: vec![ImportPath::explicit(fq("q.bar"))],
        }
    );

    let second = inserter.ensure_imported(&mut file, &target).unwrap();
    assert_eq!(second, ImportOutcome::AlreadyPresent);
    assert_eq!(file.render_imports(), "import q.bar\n");
}

#[test]
fn test_wildcard_pins_name_from_default_import() {
    let mut index = DeclarationIndex::new().with_default_imports([ImportPath::all_under(fq("kotlin"))]);
    index.add_top_level(&fq("kotlin"), "Pair", DeclKind::Type);
    let foo = index.add_top_level(&fq("q"), "Foo", DeclKind::Type);
    index.add_top_level(&fq("q"), "Pair", DeclKind::Type);

    let mut file = MemoryFile::new("main.kt", fq("p"));
    file.add_reference("Pair", DeclKind::Type);
    let before = body_bindings(&index, &file);

    let outcome = ImportInserter::new(&index, prefer_wildcard())
        .ensure_imported(&mut file, &foo)
        .unwrap();

    assert_eq!(
        outcome,
        ImportOutcome::Imported {
            strategy: Strategy::Wildcard,
            added: vec![ImportPath::all_under(fq("q")), ImportPath::explicit(fq("kotlin.Pair"))],
        }
    );
    assert_eq!(body_bindings(&index, &file), before);
}

#[test]
fn test_default_imports_come_from_the_oracle() {
    let mut index = DeclarationIndex::new().with_default_imports([ImportPath::all_under(fq("kotlin"))]);
    let pair = index.add_top_level(&fq("kotlin"), "Pair", DeclKind::Type);
    let mut file = MemoryFile::new("main.kt", fq("p"));

    // Settings carry no default imports; both entry points agree anyway.
    let inserter = ImportInserter::new(&index, explicit_only());
    assert!(!inserter.need_import(&ImportPath::explicit(fq("kotlin.Pair")), &file));
    assert!(inserter.add_import_if_needed(&mut file, &fq("kotlin.Pair")).unwrap().is_none());
    assert_eq!(inserter.ensure_imported(&mut file, &pair).unwrap(), ImportOutcome::AlreadyPresent);
    assert!(file.import_directives().is_empty());
}

// ============================================================================
// REJECTIONS
// ============================================================================

#[test]
fn test_nested_declaration_is_not_importable() {
    let mut index = DeclarationIndex::new();
    let outer = index.add_top_level(&fq("q"), "Outer", DeclKind::Type);
    let inner = index.add_nested(&outer, "Inner", DeclKind::Type);
    let mut file = MemoryFile::new("main.kt", fq("p"));

    let err = ImportInserter::new(&index, prefer_wildcard())
        .ensure_imported(&mut file, &inner)
        .unwrap_err();
    assert_eq!(
        err,
        ImportError::NotImportable {
            fq_name: fq("q.Outer.Inner")
        }
    );
    assert!(file.import_directives().is_empty());
}

#[test]
fn test_local_declaration_is_not_importable() {
    let mut index = DeclarationIndex::new();
    let local = index.add_local("counter", DeclKind::Property);
    let mut file = MemoryFile::new("main.kt", fq("p"));

    let err = ImportInserter::new(&index, explicit_only())
        .ensure_imported(&mut file, &local)
        .unwrap_err();
    assert!(matches!(err, ImportError::NotImportable { .. }));
}

#[test]
fn test_companion_imports_owner() {
    let mut index = DeclarationIndex::new();
    let foo = index.add_top_level(&fq("q"), "Foo", DeclKind::Type);
    let companion = index.add_companion(&foo);
    let mut file = MemoryFile::new("main.kt", fq("p"));

    let inserter = ImportInserter::new(&index, explicit_only());
    let outcome = inserter.ensure_imported(&mut file, &companion).unwrap();
    assert_eq!(outcome.added(), &[ImportPath::explicit(fq("q.Foo"))]);

    // The owner is now visible, so the companion needs nothing more.
    assert_eq!(
        inserter.ensure_imported(&mut file, &companion).unwrap(),
        ImportOutcome::AlreadyPresent
    );
}

#[rstest]
#[case::explicit("x.Foo")]
#[case::alias("x.Other as Foo")]
fn test_name_taken_by_import_is_ambiguous(#[case] existing: &str) {
    let mut index = DeclarationIndex::new();
    index.add_top_level(&fq("x"), "Foo", DeclKind::Type);
    index.add_top_level(&fq("x"), "Other", DeclKind::Type);
    let target = index.add_top_level(&fq("q"), "Foo", DeclKind::Type);

    let existing: ImportPath = existing.parse().unwrap();
    let mut file = MemoryFile::new("main.kt", fq("p")).with_import(existing.clone());

    let err = ImportInserter::new(&index, prefer_wildcard())
        .ensure_imported(&mut file, &target)
        .unwrap_err();
    assert_eq!(
        err,
        ImportError::Ambiguous {
            name: "Foo".into(),
            existing: existing.fq_name().clone(),
        }
    );
    assert_eq!(file.import_paths(), vec![existing]);
}

#[test]
fn test_used_wildcard_classifier_blocks_explicit_import() {
    let mut index = DeclarationIndex::new();
    index.add_top_level(&fq("a"), "Foo", DeclKind::Type);
    let target = index.add_top_level(&fq("q"), "Foo", DeclKind::Type);

    let mut file = MemoryFile::new("main.kt", fq("p")).with_import(ImportPath::all_under(fq("a")));
    file.add_reference("Foo", DeclKind::Type);

    let err = ImportInserter::new(&index, prefer_wildcard())
        .ensure_imported(&mut file, &target)
        .unwrap_err();
    assert_eq!(
        err,
        ImportError::Ambiguous {
            name: "Foo".into(),
            existing: fq("a.Foo"),
        }
    );
    assert_eq!(file.import_paths(), vec![ImportPath::all_under(fq("a"))]);
}

#[test]
fn test_script_without_import_list() {
    let mut index = DeclarationIndex::new();
    let target = index.add_top_level(&fq("q"), "run", DeclKind::Function);
    let mut file = MemoryFile::script("build.kts");

    // The wildcard attempt fails first and is absorbed; the explicit one
    // surfaces the error.
    let err = ImportInserter::new(&index, prefer_wildcard())
        .ensure_imported(&mut file, &target)
        .unwrap_err();
    assert_eq!(
        err,
        ImportError::NoPackageHeader {
            file: "build.kts".into()
        }
    );
    assert!(file.import_directives().is_empty());
}

// ============================================================================
// ORACLE FAILURES
// ============================================================================

#[test]
fn test_oracle_failure_during_planning_is_surfaced() {
    let mut index = DeclarationIndex::new();
    let target = index.add_top_level(&fq("q"), "Foo", DeclKind::Type);
    let oracle = FlakyOracle {
        inner: &index,
        trigger: Trigger::Always,
    };
    let mut file = MemoryFile::new("main.kt", fq("p"));

    let err = ImportInserter::new(oracle, prefer_wildcard())
        .ensure_imported(&mut file, &target)
        .unwrap_err();
    assert!(matches!(err, ImportError::Oracle(_)));
    assert!(err.is_transient());
    assert!(file.import_directives().is_empty());
}

#[test]
fn test_failed_wildcard_validation_rolls_back_exactly() {
    let mut index = DeclarationIndex::new();
    let target = index.add_top_level(&fq("q"), "Foo", DeclKind::Type);
    let oracle = FlakyOracle {
        inner: &index,
        trigger: Trigger::WhileImported(ImportPath::all_under(fq("q"))),
    };

    let mut file = MemoryFile::new("main.kt", fq("p"))
        .with_import(ImportPath::explicit(fq("x.A")))
        .with_import(ImportPath::all_under(fq("y")));
    let before = file.import_directives().to_vec();

    let outcome = ImportInserter::new(oracle, prefer_wildcard())
        .ensure_imported(&mut file, &target)
        .unwrap();

    assert_eq!(
        outcome,
        ImportOutcome::Imported {
            strategy: Strategy::Explicit,
            added: vec![ImportPath::explicit(fq("q.Foo"))],
        }
    );
    let after = file.import_directives();
    assert_eq!(&after[..before.len()], before.as_slice());
    assert_eq!(after.len(), before.len() + 1);
}

#[test]
fn test_rollback_removes_pinned_conflicts_too() {
    let mut index = DeclarationIndex::new();
    let target = index.add_top_level(&fq("q"), "Foo", DeclKind::Type);
    index.add_top_level(&fq("q"), "Bar", DeclKind::Type);
    index.add_top_level(&fq("a"), "Bar", DeclKind::Type);
    let oracle = FlakyOracle {
        inner: &index,
        trigger: Trigger::WhileImported(ImportPath::explicit(fq("a.Bar"))),
    };

    let mut file = MemoryFile::new("main.kt", fq("p")).with_import(ImportPath::all_under(fq("a")));
    file.add_reference("Bar", DeclKind::Type);

    let outcome = ImportInserter::new(oracle, prefer_wildcard())
        .ensure_imported(&mut file, &target)
        .unwrap();

    assert_eq!(outcome.added(), &[ImportPath::explicit(fq("q.Foo"))]);
    assert_eq!(file.render_imports(), "import a.*\nimport q.Foo\n");
}
