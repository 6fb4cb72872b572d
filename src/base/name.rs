//! Identifiers and dot-separated qualified names.

use std::fmt;
use std::str::FromStr;

use smol_str::SmolStr;
use thiserror::Error;

/// A single identifier segment, e.g. `Foo` in `q.r.Foo`.
///
/// Backed by a [`SmolStr`], so short identifiers never allocate and cloning
/// is cheap.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(SmolStr);

impl Name {
    /// Create a name without validating it.
    pub fn new(text: &str) -> Self {
        Self(SmolStr::new(text))
    }

    /// Create a name, checking that `text` is a valid identifier.
    pub fn parse(text: &str) -> Result<Self, NameError> {
        if is_identifier(text) {
            Ok(Self::new(text))
        } else {
            Err(NameError::InvalidSegment {
                segment: text.to_string(),
                path: text.to_string(),
            })
        }
    }

    /// The identifier text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({})", self.0)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Name {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl PartialEq<str> for Name {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Name {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Check whether `text` is a single identifier (XID start + XID continue).
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first == '_' || unicode_ident::is_xid_start(first) => {
            chars.all(unicode_ident::is_xid_continue)
        }
        _ => false,
    }
}

/// Errors produced when parsing names and qualified names.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum NameError {
    /// A segment is not a valid identifier.
    #[error("invalid identifier segment '{segment}' in '{path}'")]
    InvalidSegment { segment: String, path: String },

    /// An import path had nothing to import.
    #[error("empty import path")]
    Empty,
}

/// A fully qualified name such as `q.r.Foo`.
///
/// The empty sequence of segments is the root (unnamed) package.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FqName {
    segments: Vec<Name>,
}

impl FqName {
    /// The root package.
    pub const fn root() -> Self {
        Self {
            segments: Vec::new(),
        }
    }

    /// Build a qualified name from already validated segments.
    pub fn from_segments(segments: impl IntoIterator<Item = Name>) -> Self {
        Self {
            segments: segments.into_iter().collect(),
        }
    }

    /// Parse a dotted path. The empty string parses to the root package.
    pub fn parse(text: &str) -> Result<Self, NameError> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(Self::root());
        }

        let mut segments = Vec::new();
        for segment in text.split('.') {
            if !is_identifier(segment) {
                return Err(NameError::InvalidSegment {
                    segment: segment.to_string(),
                    path: text.to_string(),
                });
            }
            segments.push(Name::new(segment));
        }
        Ok(Self { segments })
    }

    /// Whether this is the root package.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether this name consists of exactly one segment.
    pub fn is_one_segment(&self) -> bool {
        self.segments.len() == 1
    }

    /// The enclosing name. `q.r.Foo` → `q.r`, `Foo` → root, root → root.
    pub fn parent(&self) -> FqName {
        match self.segments.split_last() {
            Some((_, rest)) => Self {
                segments: rest.to_vec(),
            },
            None => Self::root(),
        }
    }

    /// The last segment, if any.
    pub fn short_name(&self) -> Option<&Name> {
        self.segments.last()
    }

    /// Append a segment.
    pub fn child(&self, name: Name) -> FqName {
        let mut segments = self.segments.clone();
        segments.push(name);
        Self { segments }
    }

    /// The segments of this name.
    pub fn segments(&self) -> &[Name] {
        &self.segments
    }
}

impl fmt::Display for FqName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(segment.as_str())?;
        }
        Ok(())
    }
}

impl fmt::Debug for FqName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            f.write_str("FqName(<root>)")
        } else {
            write!(f, "FqName({})", self)
        }
    }
}

impl FromStr for FqName {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
