//! Memo board controller.
//!
//! # Responsibility
//! - Own the memo store, the filter state and the derived view.
//! - Mirror acknowledged persistence writes into the store.
//! - Recompute the view synchronously after every filter change or mutation.
//!
//! # Invariants
//! - Store mutations happen strictly after the port returns `Ok`.
//! - A failed call leaves store, filter and view unchanged.
//! - `view()` never observes a stale state between a change and its
//!   recomputation.

use crate::model::memo::{
    normalize_tags, CategoryFilter, Memo, MemoDraft, MemoId, MemoPatch, ValidationError,
};
use crate::repo::port::{PersistenceFailure, PersistencePort};
use crate::service::filter_state::{FilterState, MemoView};
use crate::store::memo_store::{MemoStore, StoreError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type MemoResult<T> = Result<T, MemoError>;

/// Service error for memo use-cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemoError {
    /// Target memo is not in the collection.
    NotFound(MemoId),
    /// Memo id is already present in the collection.
    Conflict(MemoId),
    /// The persistence port reported failure; nothing was mirrored.
    Persistence(PersistenceFailure),
    /// Input rejected by an upstream validation helper.
    Validation(ValidationError),
}

impl Display for MemoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "memo not found: {id}"),
            Self::Conflict(id) => write!(f, "memo already exists: {id}"),
            Self::Persistence(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for MemoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Persistence(err) => Some(err),
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for MemoError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(id) => Self::NotFound(id),
            StoreError::Conflict(id) => Self::Conflict(id),
        }
    }
}

impl From<PersistenceFailure> for MemoError {
    fn from(value: PersistenceFailure) -> Self {
        Self::Persistence(value)
    }
}

impl From<ValidationError> for MemoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Filter state controller over a persistence port.
pub struct MemoService<P: PersistencePort> {
    port: P,
    store: MemoStore,
    filter: FilterState,
    view: MemoView,
}

impl<P: PersistencePort> MemoService<P> {
    /// Creates a service with an empty collection; call [`load`] to fill it.
    ///
    /// [`load`]: MemoService::load
    pub fn new(port: P) -> Self {
        Self {
            port,
            store: MemoStore::new(),
            filter: FilterState::default(),
            view: MemoView::default(),
        }
    }

    /// Replaces the collection with the port's fetch-all result.
    ///
    /// On failure the previous collection is retained. Returns the number of
    /// loaded memos.
    pub fn load(&mut self) -> MemoResult<usize> {
        let memos = self.port.fetch_all()?;
        self.store.load(memos)?;
        self.refresh();
        Ok(self.store.len())
    }

    /// Current derived view.
    pub fn view(&self) -> &MemoView {
        &self.view
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn store(&self) -> &MemoStore {
        &self.store
    }

    /// Looks a memo up in the confirmed collection.
    pub fn get_memo(&self, id: MemoId) -> Option<&Memo> {
        self.store.get(id)
    }

    pub fn set_category_filter(&mut self, category: CategoryFilter) -> &MemoView {
        self.filter.category = category;
        self.refresh();
        &self.view
    }

    pub fn set_search(&mut self, search: impl Into<String>) -> &MemoView {
        self.filter.search = search.into();
        self.refresh();
        &self.view
    }

    /// Sets category "all" and an empty search.
    pub fn reset_filters(&mut self) -> &MemoView {
        self.filter.reset();
        self.refresh();
        &self.view
    }

    /// Persists a new memo, then appends the acknowledged record.
    pub fn create_memo(&mut self, mut draft: MemoDraft) -> MemoResult<Memo> {
        draft.tags = normalize_tags(&draft.tags);
        let acknowledged = self.port.create(&draft)?;
        let id = acknowledged.id;
        self.store.insert(acknowledged)?;
        self.refresh();
        self.store.get(id).cloned().ok_or(MemoError::NotFound(id))
    }

    /// Persists a partial update, then applies the same fields locally.
    ///
    /// Unknown ids fail with `NotFound` before the port is called.
    pub fn update_memo(&mut self, id: MemoId, mut patch: MemoPatch) -> MemoResult<Memo> {
        self.ensure_known(id)?;
        if let Some(tags) = patch.tags.as_mut() {
            *tags = normalize_tags(tags);
        }

        let acknowledged = self.port.update(id, &patch)?;
        let updated = self
            .store
            .replace(id, &patch, acknowledged.updated_at)?
            .clone();
        self.refresh();
        Ok(updated)
    }

    /// Deletes a memo remotely, then removes it locally.
    ///
    /// Unknown ids fail with `NotFound` before the port is called.
    pub fn delete_memo(&mut self, id: MemoId) -> MemoResult<()> {
        self.ensure_known(id)?;
        self.port.delete(id)?;
        self.store.remove(id)?;
        self.refresh();
        Ok(())
    }

    /// Removes every memo remotely, then empties the collection.
    pub fn clear_all(&mut self) -> MemoResult<()> {
        self.port.clear_all()?;
        self.store.clear();
        self.refresh();
        Ok(())
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    /// Direct port access for callers that manage the backend themselves.
    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }

    pub fn into_port(self) -> P {
        self.port
    }

    fn ensure_known(&self, id: MemoId) -> MemoResult<()> {
        if self.store.contains(id) {
            Ok(())
        } else {
            Err(MemoError::NotFound(id))
        }
    }

    fn refresh(&mut self) {
        self.view = MemoView::derive(self.store.memos(), &self.filter);
    }
}
