//! The file model: import list and reference sites of a single source file.
//!
//! [`FileModel`] is the host's side of the contract. [`MemoryFile`] is an
//! in-memory implementation used by tests and by hosts that keep their own
//! syntax trees and only need the import list mirrored.

use std::sync::Arc;

use tracing::warn;

use super::decl::DeclKind;
use super::import_path::ImportPath;
use crate::base::{DirectiveId, FqName, Name, RefId, TextRange, TextSize};
use crate::error::ImportError;

/// A committed import path bound to a position in the file's import list.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ImportDirective {
    id: DirectiveId,
    path: ImportPath,
}

impl ImportDirective {
    pub fn new(id: DirectiveId, path: ImportPath) -> Self {
        Self { id, path }
    }

    pub fn id(&self) -> DirectiveId {
        self.id
    }

    pub fn path(&self) -> &ImportPath {
        &self.path
    }
}

/// Where in the file a reference site appears.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SiteRegion {
    /// Inside the `package` header.
    PackageHeader,
    /// Inside an import directive.
    ImportList,
    /// Anywhere else: declarations, bodies, annotations.
    Body,
}

/// A simple-name reference in the file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReferenceSite {
    pub id: RefId,
    pub name: Name,
    /// What the reference expects: a type, a call, a property access.
    pub kind: DeclKind,
    pub region: SiteRegion,
    /// Selector of a qualified expression (`Bar` in `foo.Bar`). Such names
    /// are resolved through their receiver, never through imports.
    pub is_selector: bool,
    pub range: TextRange,
}

/// Access to one file's import section, as provided by the host editor.
pub trait FileModel {
    /// Display name for diagnostics.
    fn file_name(&self) -> &str;

    /// The package declared by the file; root if none.
    fn package_name(&self) -> &FqName;

    /// Import directives in file order.
    fn import_directives(&self) -> &[ImportDirective];

    /// Simple-name reference sites in file order.
    fn reference_sites(&self) -> Vec<ReferenceSite>;

    /// Append an import directive after the last one, synthesizing an import
    /// list after the package header if the file has none.
    ///
    /// Fails with [`ImportError::NoPackageHeader`] when no import list exists
    /// and none can be synthesized.
    fn insert_import_directive(&mut self, path: ImportPath) -> Result<ImportDirective, ImportError>;

    /// Remove a directive previously returned by this file.
    fn delete_import_directive(&mut self, directive: &ImportDirective);
}

/// Kind of a [`MemoryFile`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// Regular source file; always has a (possibly implicit) package header.
    Source,
    /// Script; has no package header to anchor a new import list.
    Script,
}

/// In-memory [`FileModel`].
#[derive(Clone, Debug)]
pub struct MemoryFile {
    name: Arc<str>,
    kind: FileKind,
    package: FqName,
    imports: Vec<ImportDirective>,
    has_import_list: bool,
    header_sites: Vec<ReferenceSite>,
    import_sites: Vec<(DirectiveId, ReferenceSite)>,
    body_sites: Vec<ReferenceSite>,
    next_directive: u32,
    next_ref: u32,
    next_offset: u32,
}

impl MemoryFile {
    /// Create a source file declaring `package` (root for no header).
    pub fn new(name: impl Into<Arc<str>>, package: FqName) -> Self {
        let mut file = Self::empty(name.into(), FileKind::Source, package.clone());
        for segment in package.segments() {
            let site = file.make_site(segment.clone(), DeclKind::Package, SiteRegion::PackageHeader, false);
            file.header_sites.push(site);
        }
        file
    }

    /// Create a script file. Scripts live in the root package.
    pub fn script(name: impl Into<Arc<str>>) -> Self {
        Self::empty(name.into(), FileKind::Script, FqName::root())
    }

    fn empty(name: Arc<str>, kind: FileKind, package: FqName) -> Self {
        Self {
            name,
            kind,
            package,
            imports: Vec::new(),
            has_import_list: false,
            header_sites: Vec::new(),
            import_sites: Vec::new(),
            body_sites: Vec::new(),
            next_directive: 0,
            next_ref: 0,
            next_offset: 0,
        }
    }

    pub fn kind(&self) -> FileKind {
        self.kind
    }

    /// Seed an existing import directive. Unlike
    /// [`FileModel::insert_import_directive`] this works for scripts too:
    /// it models an import list that is already there.
    pub fn add_import(&mut self, path: ImportPath) -> DirectiveId {
        self.has_import_list = true;
        self.push_directive(path).id()
    }

    /// Builder form of [`MemoryFile::add_import`].
    pub fn with_import(mut self, path: ImportPath) -> Self {
        self.add_import(path);
        self
    }

    /// Add a simple-name reference in the body.
    pub fn add_reference(&mut self, name: &str, kind: DeclKind) -> RefId {
        let site = self.make_site(Name::new(name), kind, SiteRegion::Body, false);
        let id = site.id;
        self.body_sites.push(site);
        id
    }

    /// Add a qualified reference `qualifier.name` in the body.
    ///
    /// Returns the ids of the qualifier and of the selector site.
    pub fn add_qualified_reference(&mut self, qualifier: &str, name: &str, kind: DeclKind) -> (RefId, RefId) {
        let receiver = self.make_site(Name::new(qualifier), DeclKind::Type, SiteRegion::Body, false);
        let selector = self.make_site(Name::new(name), kind, SiteRegion::Body, true);
        let ids = (receiver.id, selector.id);
        self.body_sites.push(receiver);
        self.body_sites.push(selector);
        ids
    }

    /// Paths of all directives, in file order.
    pub fn import_paths(&self) -> Vec<ImportPath> {
        self.imports.iter().map(|d| d.path().clone()).collect()
    }

    /// Render the import list the way it would appear in source.
    pub fn render_imports(&self) -> String {
        self.imports
            .iter()
            .map(|d| format!("import {}\n", d.path()))
            .collect()
    }

    fn push_directive(&mut self, path: ImportPath) -> ImportDirective {
        let id = DirectiveId::new(self.next_directive);
        self.next_directive += 1;

        let site_name = path
            .imported_name()
            .or_else(|| path.fq_name().short_name())
            .cloned();
        if let Some(site_name) = site_name {
            let site = self.make_site(site_name, DeclKind::Type, SiteRegion::ImportList, false);
            self.import_sites.push((id, site));
        }

        let directive = ImportDirective::new(id, path);
        self.imports.push(directive.clone());
        directive
    }

    fn make_site(&mut self, name: Name, kind: DeclKind, region: SiteRegion, is_selector: bool) -> ReferenceSite {
        let id = RefId::new(self.next_ref);
        self.next_ref += 1;

        let len = name.as_str().len() as u32;
        let range = TextRange::at(TextSize::from(self.next_offset), TextSize::from(len));
        self.next_offset += len + 1;

        ReferenceSite {
            id,
            name,
            kind,
            region,
            is_selector,
            range,
        }
    }
}

impl FileModel for MemoryFile {
    fn file_name(&self) -> &str {
        &self.name
    }

    fn package_name(&self) -> &FqName {
        &self.package
    }

    fn import_directives(&self) -> &[ImportDirective] {
        &self.imports
    }

    fn reference_sites(&self) -> Vec<ReferenceSite> {
        self.header_sites
            .iter()
            .chain(self.import_sites.iter().map(|(_, site)| site))
            .chain(self.body_sites.iter())
            .cloned()
            .collect()
    }

    fn insert_import_directive(&mut self, path: ImportPath) -> Result<ImportDirective, ImportError> {
        if !self.has_import_list {
            if self.kind == FileKind::Script {
                return Err(ImportError::NoPackageHeader {
                    file: self.name.to_string(),
                });
            }
            self.has_import_list = true;
        }
        Ok(self.push_directive(path))
    }

    fn delete_import_directive(&mut self, directive: &ImportDirective) {
        let before = self.imports.len();
        self.imports.retain(|d| d.id() != directive.id());
        if self.imports.len() == before {
            warn!(
                file = %self.name,
                directive = %directive.path(),
                "deleting an import directive that is not in the file"
            );
            return;
        }
        self.import_sites.retain(|(owner, _)| *owner != directive.id());
    }
}
