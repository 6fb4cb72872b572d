//! Import paths: what an import directive names.

use std::fmt;
use std::str::FromStr;

use crate::base::{FqName, Name, NameError};

/// A qualified name plus "import everything under it" flag and optional alias.
///
/// The constructors keep the invariant that only explicit (non wildcard)
/// paths carry an alias.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ImportPath {
    fq_name: FqName,
    all_under: bool,
    alias: Option<Name>,
}

impl ImportPath {
    /// `import q.r.Foo`
    pub fn explicit(fq_name: FqName) -> Self {
        Self {
            fq_name,
            all_under: false,
            alias: None,
        }
    }

    /// `import q.r.*`
    pub fn all_under(fq_name: FqName) -> Self {
        Self {
            fq_name,
            all_under: true,
            alias: None,
        }
    }

    /// `import q.r.Foo as Bar`
    pub fn aliased(fq_name: FqName, alias: Name) -> Self {
        Self {
            fq_name,
            all_under: false,
            alias: Some(alias),
        }
    }

    pub fn fq_name(&self) -> &FqName {
        &self.fq_name
    }

    pub fn is_all_under(&self) -> bool {
        self.all_under
    }

    pub fn alias(&self) -> Option<&Name> {
        self.alias.as_ref()
    }

    pub fn has_alias(&self) -> bool {
        self.alias.is_some()
    }

    /// The simple name this directive binds in the file.
    ///
    /// The alias if there is one, the last segment for explicit imports,
    /// `None` for wildcard imports.
    pub fn imported_name(&self) -> Option<&Name> {
        if self.all_under {
            return None;
        }
        self.alias.as_ref().or_else(|| self.fq_name.short_name())
    }

    /// Whether this directive makes `fq_name` visible.
    pub fn imports_fq(&self, fq_name: &FqName) -> bool {
        if self.all_under && !fq_name.is_root() {
            fq_name.parent() == self.fq_name
        } else {
            self.fq_name == *fq_name
        }
    }

    /// Whether `already` makes this path redundant.
    ///
    /// Wildcard and aliased paths are only covered by an identical path;
    /// a plain explicit path is covered by anything that imports its name.
    pub fn is_imported_by(&self, already: &ImportPath) -> bool {
        if self.all_under || self.has_alias() {
            self == already
        } else {
            already.imports_fq(&self.fq_name)
        }
    }

    /// Whether any of `imports` makes this path redundant.
    pub fn is_imported_by_any<'a>(&self, imports: impl IntoIterator<Item = &'a ImportPath>) -> bool {
        imports.into_iter().any(|already| self.is_imported_by(already))
    }
}

impl fmt::Display for ImportPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fq_name)?;
        if self.all_under {
            if self.fq_name.is_root() {
                f.write_str("*")?;
            } else {
                f.write_str(".*")?;
            }
        }
        if let Some(alias) = &self.alias {
            write!(f, " as {}", alias)?;
        }
        Ok(())
    }
}

impl fmt::Debug for ImportPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImportPath({})", self)
    }
}

impl FromStr for ImportPath {
    type Err = NameError;

    /// Parses `a.b.C`, `a.b.*` and `a.b.C as D`; a leading `import` keyword
    /// is accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let text = text.strip_prefix("import ").map(str::trim).unwrap_or(text);
        if text.is_empty() {
            return Err(NameError::Empty);
        }

        if let Some((path, alias)) = text.split_once(" as ") {
            let fq_name = FqName::parse(path)?;
            if fq_name.is_root() {
                return Err(NameError::Empty);
            }
            return Ok(Self::aliased(fq_name, Name::parse(alias.trim())?));
        }

        if text == "*" {
            return Ok(Self::all_under(FqName::root()));
        }
        if let Some(package) = text.strip_suffix(".*") {
            return Ok(Self::all_under(FqName::parse(package)?));
        }
        Ok(Self::explicit(FqName::parse(text)?))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ImportPath {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ImportPath {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
