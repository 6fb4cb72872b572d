//! Whether an import path would be redundant in a file.

use crate::hir::{FileModel, ImportPath};

/// Whether `path` is implied without any directive in the file.
///
/// True for the root package, for plain imports of a one-segment name or
/// of a declaration in the file's own package, and for anything
/// `default_imports` cover.
pub fn is_imported_by_default(path: &ImportPath, file: &dyn FileModel, default_imports: &[ImportPath]) -> bool {
    let fq_name = path.fq_name();
    if fq_name.is_root() {
        return true;
    }

    if !path.is_all_under() && !path.has_alias() {
        if fq_name.is_one_segment() {
            return true;
        }
        if fq_name.parent() == *file.package_name() {
            return true;
        }
    }

    is_imported_with_default(path, default_imports)
}

/// Whether the default imports alone cover `path`.
pub fn is_imported_with_default(path: &ImportPath, default_imports: &[ImportPath]) -> bool {
    path.is_imported_by_any(default_imports)
}

/// Whether writing `path` into `file` would change anything.
pub fn need_import(path: &ImportPath, file: &dyn FileModel, default_imports: &[ImportPath]) -> bool {
    if is_imported_by_default(path, file, default_imports) {
        return false;
    }
    !path.is_imported_by_any(file.import_directives().iter().map(|d| d.path()))
}
