//! Lightweight identifiers for declarations, import directives and references.

use std::fmt;

/// Identifier of a declaration known to a scope oracle.
///
/// Overloaded functions share a qualified name, so declarations are
/// compared by `DeclId` rather than by name.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct DeclId(pub u32);

impl DeclId {
    /// Create a new DeclId from a raw index.
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw index.
    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for DeclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeclId({})", self.0)
    }
}

/// File-local identifier of an import directive.
///
/// Assigned sequentially by the file as directives are inserted and never
/// reused, so a rolled-back directive cannot be confused with a later one.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct DirectiveId(pub u32);

impl DirectiveId {
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for DirectiveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DirectiveId({})", self.0)
    }
}

/// File-local identifier of a simple-name reference site.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
pub struct RefId(pub u32);

impl RefId {
    #[inline]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    #[inline]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for RefId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RefId({})", self.0)
    }
}

impl From<u32> for RefId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}
