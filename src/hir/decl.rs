//! Declarations that can be the target of an import.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::base::{DeclId, FqName, Name};

/// The closed set of declaration kinds the import engine distinguishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DeclKind {
    /// Classes, interfaces, objects, type aliases.
    Type,
    /// Functions; same-named functions form an overload set.
    Function,
    /// Properties; same-named properties may coexist.
    Property,
    /// A package, importable only by its full name.
    Package,
}

impl DeclKind {
    /// Whether declarations of this kind compose by overloading instead of
    /// shadowing each other.
    pub fn allows_overloads(self) -> bool {
        matches!(self, DeclKind::Function | DeclKind::Property)
    }
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DeclKind::Type => "type",
            DeclKind::Function => "function",
            DeclKind::Property => "property",
            DeclKind::Package => "package",
        })
    }
}

/// What immediately encloses a declaration.
#[derive(Clone, Debug)]
pub enum Container {
    /// Declared at the top level of a package.
    Package(FqName),
    /// Declared inside another declaration (nested class, member, companion).
    Declaration(Arc<Declaration>),
    /// Declared inside a function body or another local scope.
    Local,
}

/// A declaration known to the scope oracle.
///
/// Identity is the [`DeclId`]: two overloads of `q.bar` share a qualified
/// name but are different declarations.
#[derive(Clone, Debug)]
pub struct Declaration {
    pub id: DeclId,
    pub name: Name,
    pub fq_name: FqName,
    pub kind: DeclKind,
    pub container: Container,
    /// Companion (class) object of the enclosing type.
    pub is_companion: bool,
}

impl Declaration {
    /// Whether this declaration can be named by a top-level import.
    pub fn is_top_level(&self) -> bool {
        match self.kind {
            DeclKind::Package => true,
            _ => matches!(self.container, Container::Package(_)),
        }
    }

    /// The name an import directive would use for this declaration.
    ///
    /// Locals have no importable name.
    pub fn importable_fq_name(&self) -> Option<&FqName> {
        match self.container {
            Container::Local => None,
            _ => Some(&self.fq_name),
        }
    }

    /// The enclosing declaration, if this one is nested.
    pub fn owner(&self) -> Option<&Arc<Declaration>> {
        match &self.container {
            Container::Declaration(owner) => Some(owner),
            _ => None,
        }
    }

    /// The package this declaration lives in, walking out of nested
    /// declarations. Packages are contained by their parent package.
    pub fn package(&self) -> Option<FqName> {
        match &self.container {
            Container::Package(package) => Some(package.clone()),
            Container::Declaration(owner) => owner.package(),
            Container::Local => None,
        }
    }
}

impl PartialEq for Declaration {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Declaration {}

impl Hash for Declaration {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.fq_name)
    }
}
