//! Authoritative in-memory memo collection.
//!
//! # Responsibility
//! - Mirror acknowledged create/update/delete/clear calls.
//! - Keep insertion order, which breaks `created_at` ties in display order.
//!
//! # Invariants
//! - No two memos share an `id`.
//! - Stored tags are always normalized.
//! - A failed mutation leaves the collection untouched.

use crate::model::memo::{Memo, MemoId, MemoPatch};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Store-level mutation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Target id is not in the collection.
    NotFound(MemoId),
    /// Id is already present in the collection.
    Conflict(MemoId),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "memo not found: {id}"),
            Self::Conflict(id) => write!(f, "memo already exists: {id}"),
        }
    }
}

impl Error for StoreError {}

/// Ordered memo collection keyed by stable id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoStore {
    memos: Vec<Memo>,
}

impl MemoStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole collection with a fetch-all result.
    ///
    /// A result with duplicate ids is rejected and the current collection is
    /// kept.
    pub fn load(&mut self, memos: Vec<Memo>) -> StoreResult<()> {
        let mut seen = HashSet::with_capacity(memos.len());
        for memo in &memos {
            if !seen.insert(memo.id) {
                return Err(StoreError::Conflict(memo.id));
            }
        }

        self.memos = memos;
        self.memos.iter_mut().for_each(Memo::normalize);
        Ok(())
    }

    /// Appends one acknowledged memo.
    pub fn insert(&mut self, mut memo: Memo) -> StoreResult<()> {
        if self.contains(memo.id) {
            return Err(StoreError::Conflict(memo.id));
        }
        memo.normalize();
        self.memos.push(memo);
        Ok(())
    }

    /// Applies the provided patch fields and refreshes `updated_at`.
    pub fn replace(
        &mut self,
        id: MemoId,
        patch: &MemoPatch,
        updated_at: i64,
    ) -> StoreResult<&Memo> {
        let memo = self
            .memos
            .iter_mut()
            .find(|memo| memo.id == id)
            .ok_or(StoreError::NotFound(id))?;
        memo.apply_patch(patch, updated_at);
        Ok(memo)
    }

    /// Removes one memo and returns it.
    pub fn remove(&mut self, id: MemoId) -> StoreResult<Memo> {
        let index = self.position(id).ok_or(StoreError::NotFound(id))?;
        Ok(self.memos.remove(index))
    }

    pub fn clear(&mut self) {
        self.memos.clear();
    }

    pub fn get(&self, id: MemoId) -> Option<&Memo> {
        self.memos.iter().find(|memo| memo.id == id)
    }

    pub fn contains(&self, id: MemoId) -> bool {
        self.position(id).is_some()
    }

    /// Memos in insertion order.
    pub fn memos(&self) -> &[Memo] {
        &self.memos
    }

    pub fn len(&self) -> usize {
        self.memos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.memos.is_empty()
    }

    fn position(&self, id: MemoId) -> Option<usize> {
        self.memos.iter().position(|memo| memo.id == id)
    }
}
