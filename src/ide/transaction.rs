//! Speculative edits to a file's import list.
//!
//! Every directive the editor inserts is journaled. A [`CommitHandle`] marks
//! a point in the journal; rolling it back deletes everything inserted since,
//! newest first, which restores the import list exactly.

use tracing::{debug, trace};

use super::planner::Strategy;
use crate::error::ImportError;
use crate::hir::{FileModel, ImportDirective, ImportPath};

/// A pending speculative edit. Must be either committed or rolled back.
#[must_use = "a speculative edit must be committed or rolled back"]
#[derive(Debug, PartialEq, Eq)]
pub struct CommitHandle {
    mark: usize,
    strategy: Strategy,
}

impl CommitHandle {
    pub fn strategy(&self) -> Strategy {
        self.strategy
    }
}

/// Applies import directives to a file so they can be undone.
pub struct TransactionalEditor<'f, F: FileModel + ?Sized> {
    file: &'f mut F,
    journal: Vec<ImportDirective>,
}

impl<'f, F: FileModel + ?Sized> TransactionalEditor<'f, F> {
    pub fn new(file: &'f mut F) -> Self {
        Self {
            file,
            journal: Vec::new(),
        }
    }

    /// The file in its current, possibly speculative, state.
    pub fn file(&self) -> &F {
        &*self.file
    }

    /// Insert a wildcard import and open a transaction for it.
    pub fn apply_wildcard(&mut self, path: ImportPath) -> Result<CommitHandle, ImportError> {
        self.apply(Strategy::Wildcard, path)
    }

    /// Insert an explicit import and open a transaction for it.
    pub fn apply_explicit(&mut self, path: ImportPath) -> Result<CommitHandle, ImportError> {
        self.apply(Strategy::Explicit, path)
    }

    /// Insert another directive into the transaction opened last.
    pub fn append(&mut self, path: ImportPath) -> Result<&ImportDirective, ImportError> {
        self.insert(path)
    }

    /// Undo everything inserted since `handle` was created.
    pub fn rollback(&mut self, handle: CommitHandle) {
        let mark = handle.mark.min(self.journal.len());
        let undone: Vec<ImportDirective> = self.journal.drain(mark..).collect();
        for directive in undone.iter().rev() {
            trace!(directive = %directive.path(), "rolling back import directive");
            self.file.delete_import_directive(directive);
        }
        debug!(
            file = self.file.file_name(),
            strategy = ?handle.strategy,
            count = undone.len(),
            "rolled back speculative import"
        );
    }

    /// Keep everything inserted since `handle`, returning those directives.
    pub fn commit(&mut self, handle: CommitHandle) -> Vec<ImportDirective> {
        let mark = handle.mark.min(self.journal.len());
        let committed: Vec<ImportDirective> = self.journal.drain(mark..).collect();
        debug!(
            file = self.file.file_name(),
            strategy = ?handle.strategy,
            count = committed.len(),
            "committed import"
        );
        committed
    }

    /// Directives inserted and not yet committed or rolled back.
    pub fn pending(&self) -> &[ImportDirective] {
        &self.journal
    }

    fn apply(&mut self, strategy: Strategy, path: ImportPath) -> Result<CommitHandle, ImportError> {
        let mark = self.journal.len();
        self.insert(path)?;
        Ok(CommitHandle { mark, strategy })
    }

    fn insert(&mut self, path: ImportPath) -> Result<&ImportDirective, ImportError> {
        let directive = self.file.insert_import_directive(path)?;
        trace!(directive = %directive.path(), "inserted import directive");
        self.journal.push(directive);
        Ok(&self.journal[self.journal.len() - 1])
    }
}
