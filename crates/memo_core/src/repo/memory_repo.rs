//! In-process persistence port.
//!
//! # Responsibility
//! - Provide a dependency-free `PersistencePort` for tests and scratch use.
//! - Allow deterministic failure injection per operation.
//!
//! # Invariants
//! - Timestamps are strictly increasing across writes.
//! - An injected failure leaves stored state untouched.

use crate::model::memo::{Memo, MemoDraft, MemoId, MemoPatch};
use crate::repo::port::{PersistenceFailure, PersistencePort, PortOperation, PortResult};
use std::collections::HashSet;
use uuid::Uuid;

/// Memory-backed persistence with a logical clock.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPersistence {
    memos: Vec<Memo>,
    clock: i64,
    failing: HashSet<PortOperation>,
}

impl InMemoryPersistence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds stored memos as if they had been fetched from a remote store.
    pub fn with_memos(memos: Vec<Memo>) -> Self {
        let clock = memos
            .iter()
            .map(|memo| memo.updated_at.max(memo.created_at))
            .max()
            .unwrap_or(0);
        Self {
            memos,
            clock,
            failing: HashSet::new(),
        }
    }

    /// Makes every subsequent call of `operation` fail until [`recover`].
    ///
    /// [`recover`]: InMemoryPersistence::recover
    pub fn fail_on(&mut self, operation: PortOperation) {
        self.failing.insert(operation);
    }

    pub fn recover(&mut self, operation: PortOperation) {
        self.failing.remove(&operation);
    }

    /// Stored memos in insertion order.
    pub fn memos(&self) -> &[Memo] {
        &self.memos
    }

    fn check(&self, operation: PortOperation) -> PortResult<()> {
        if self.failing.contains(&operation) {
            return Err(PersistenceFailure::new(operation, "injected failure"));
        }
        Ok(())
    }

    fn tick(&mut self) -> i64 {
        self.clock += 1;
        self.clock
    }
}

impl PersistencePort for InMemoryPersistence {
    fn fetch_all(&self) -> PortResult<Vec<Memo>> {
        self.check(PortOperation::FetchAll)?;
        Ok(self.memos.clone())
    }

    fn create(&mut self, draft: &MemoDraft) -> PortResult<Memo> {
        self.check(PortOperation::Create)?;
        let now = self.tick();
        let memo = draft.clone().into_memo(Uuid::new_v4(), now);
        self.memos.push(memo.clone());
        Ok(memo)
    }

    fn update(&mut self, id: MemoId, patch: &MemoPatch) -> PortResult<Memo> {
        self.check(PortOperation::Update)?;
        let now = self.tick();
        let memo = self
            .memos
            .iter_mut()
            .find(|memo| memo.id == id)
            .ok_or_else(|| {
                PersistenceFailure::new(PortOperation::Update, format!("memo {id} not found"))
            })?;
        memo.apply_patch(patch, now);
        Ok(memo.clone())
    }

    fn delete(&mut self, id: MemoId) -> PortResult<()> {
        self.check(PortOperation::Delete)?;
        let before = self.memos.len();
        self.memos.retain(|memo| memo.id != id);
        if self.memos.len() == before {
            return Err(PersistenceFailure::new(
                PortOperation::Delete,
                format!("memo {id} not found"),
            ));
        }
        Ok(())
    }

    fn clear_all(&mut self) -> PortResult<()> {
        self.check(PortOperation::ClearAll)?;
        self.memos.clear();
        Ok(())
    }
}
