//! User-facing import preferences.
//!
//! Default imports are not a preference: they belong to the language setup
//! and come from [`ScopeOracle::default_imports`](crate::hir::ScopeOracle::default_imports).

/// When a function or property counts as "already imported".
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum OverloadPolicy {
    /// The target is one of the visible same-named declarations.
    /// Visibility modifiers and signatures are not compared.
    #[default]
    SetMembership,
    /// The short name must resolve to the target and nothing else.
    ExactBinding,
}

/// Preferences for [`ImportInserter`](super::ImportInserter).
///
/// The default is explicit imports only and overload-set membership.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ImportSettings {
    /// Try `import pkg.*` before `import pkg.Name`.
    pub prefer_wildcard: bool,
    /// How functions and properties are checked for being already visible.
    pub overload_policy: OverloadPolicy,
}

impl ImportSettings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefer_wildcard(mut self, prefer_wildcard: bool) -> Self {
        self.prefer_wildcard = prefer_wildcard;
        self
    }

    pub fn with_overload_policy(mut self, policy: OverloadPolicy) -> Self {
        self.overload_policy = policy;
        self
    }
}
