//! SQLite-backed persistence port.
//!
//! # Responsibility
//! - Store memos in `memos` and their ordered tags in `memo_tags`.
//! - Translate storage errors into `PersistenceFailure` values.
//!
//! # Invariants
//! - Every write runs in one immediate transaction (memo row + tag rows).
//! - `fetch_all` returns memos in insertion order (`created_at, rowid`).
//! - Update/delete of an unknown id is a failure, never a silent no-op.
//! - Failure logs carry ids and error text only, never memo text.

use crate::db::DbError;
use crate::model::memo::{now_epoch_ms, Category, Memo, MemoDraft, MemoId, MemoPatch};
use crate::repo::port::{PersistenceFailure, PersistencePort, PortOperation, PortResult};
use log::{debug, warn};
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const MEMO_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    content,
    category,
    created_at,
    updated_at
FROM memos";

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage-level error for the SQLite adapter.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    NotFound(MemoId),
    InvalidData(String),
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "memo not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted memo data: {message}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "connection is missing required table `{table}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Memo persistence over a migrated SQLite connection.
pub struct SqliteMemoRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteMemoRepository<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    ///
    /// # Errors
    /// - `RepoError::MissingRequiredTable` when migrations were not applied.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        for table in ["memos", "memo_tags"] {
            if !table_exists(conn, table)? {
                return Err(RepoError::MissingRequiredTable(table));
            }
        }
        Ok(Self { conn })
    }

    fn load_all(&self) -> RepoResult<Vec<Memo>> {
        let mut tags = load_all_tags(&*self.conn)?;
        let mut stmt = self
            .conn
            .prepare(&format!("{MEMO_SELECT_SQL} ORDER BY created_at ASC, rowid ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut memos = Vec::new();
        while let Some(row) = rows.next()? {
            let mut memo = parse_memo_row(row)?;
            memo.tags = tags.remove(&memo.id).unwrap_or_default();
            memos.push(memo);
        }
        Ok(memos)
    }

    fn insert_memo(&mut self, draft: &MemoDraft) -> RepoResult<Memo> {
        let memo = draft.clone().into_memo(Uuid::new_v4(), now_epoch_ms());
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO memos (uuid, title, content, category, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                memo.id.to_string(),
                memo.title.as_str(),
                memo.content.as_str(),
                memo.category.as_str(),
                memo.created_at,
                memo.updated_at,
            ],
        )?;
        write_tags(&tx, memo.id, &memo.tags)?;
        tx.commit()?;
        Ok(memo)
    }

    fn patch_memo(&mut self, id: MemoId, patch: &MemoPatch) -> RepoResult<Memo> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let mut memo = load_one(&tx, id)?.ok_or(RepoError::NotFound(id))?;
        memo.apply_patch(patch, now_epoch_ms());

        tx.execute(
            "UPDATE memos
             SET
                title = ?2,
                content = ?3,
                category = ?4,
                updated_at = ?5
             WHERE uuid = ?1;",
            params![
                id.to_string(),
                memo.title.as_str(),
                memo.content.as_str(),
                memo.category.as_str(),
                memo.updated_at,
            ],
        )?;
        if patch.tags.is_some() {
            write_tags(&tx, id, &memo.tags)?;
        }
        tx.commit()?;
        Ok(memo)
    }

    fn delete_memo(&mut self, id: MemoId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM memos WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }
        Ok(())
    }

    fn delete_all(&mut self) -> RepoResult<usize> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute("DELETE FROM memo_tags;", [])?;
        let removed = tx.execute("DELETE FROM memos;", [])?;
        tx.commit()?;
        Ok(removed)
    }
}

impl PersistencePort for SqliteMemoRepository<'_> {
    fn fetch_all(&self) -> PortResult<Vec<Memo>> {
        let memos = self
            .load_all()
            .map_err(|err| failure(PortOperation::FetchAll, err))?;
        debug!(
            "event=memo_fetch_all module=repo status=ok count={}",
            memos.len()
        );
        Ok(memos)
    }

    fn create(&mut self, draft: &MemoDraft) -> PortResult<Memo> {
        let memo = self
            .insert_memo(draft)
            .map_err(|err| failure(PortOperation::Create, err))?;
        debug!("event=memo_create module=repo status=ok memo_id={}", memo.id);
        Ok(memo)
    }

    fn update(&mut self, id: MemoId, patch: &MemoPatch) -> PortResult<Memo> {
        let memo = self
            .patch_memo(id, patch)
            .map_err(|err| failure(PortOperation::Update, err))?;
        debug!("event=memo_update module=repo status=ok memo_id={id}");
        Ok(memo)
    }

    fn delete(&mut self, id: MemoId) -> PortResult<()> {
        self.delete_memo(id)
            .map_err(|err| failure(PortOperation::Delete, err))?;
        debug!("event=memo_delete module=repo status=ok memo_id={id}");
        Ok(())
    }

    fn clear_all(&mut self) -> PortResult<()> {
        let removed = self
            .delete_all()
            .map_err(|err| failure(PortOperation::ClearAll, err))?;
        debug!("event=memo_clear_all module=repo status=ok removed={removed}");
        Ok(())
    }
}

fn failure(operation: PortOperation, err: RepoError) -> PersistenceFailure {
    warn!(
        "event=memo_{} module=repo status=error error={}",
        operation.as_str(),
        err
    );
    PersistenceFailure::new(operation, err)
}

fn load_one(tx: &Transaction<'_>, id: MemoId) -> RepoResult<Option<Memo>> {
    let mut stmt = tx.prepare(&format!("{MEMO_SELECT_SQL} WHERE uuid = ?1;"))?;
    let mut rows = stmt.query([id.to_string()])?;
    let Some(row) = rows.next()? else {
        return Ok(None);
    };
    let mut memo = parse_memo_row(row)?;
    memo.tags = load_tags_for_memo(tx, id)?;
    Ok(Some(memo))
}

fn write_tags(tx: &Transaction<'_>, id: MemoId, tags: &[String]) -> RepoResult<()> {
    let memo_uuid = id.to_string();
    tx.execute(
        "DELETE FROM memo_tags WHERE memo_uuid = ?1;",
        [memo_uuid.as_str()],
    )?;
    for (position, tag) in tags.iter().enumerate() {
        tx.execute(
            "INSERT INTO memo_tags (memo_uuid, position, name) VALUES (?1, ?2, ?3);",
            params![memo_uuid.as_str(), position as i64, tag.as_str()],
        )?;
    }
    Ok(())
}

fn load_tags_for_memo(conn: &Connection, id: MemoId) -> RepoResult<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT name
         FROM memo_tags
         WHERE memo_uuid = ?1
         ORDER BY position ASC;",
    )?;
    let mut rows = stmt.query([id.to_string()])?;
    let mut tags = Vec::new();
    while let Some(row) = rows.next()? {
        tags.push(row.get(0)?);
    }
    Ok(tags)
}

fn load_all_tags(conn: &Connection) -> RepoResult<HashMap<MemoId, Vec<String>>> {
    let mut stmt = conn.prepare(
        "SELECT memo_uuid, name
         FROM memo_tags
         ORDER BY memo_uuid ASC, position ASC;",
    )?;
    let mut rows = stmt.query([])?;
    let mut tags: HashMap<MemoId, Vec<String>> = HashMap::new();
    while let Some(row) = rows.next()? {
        let uuid_text: String = row.get("memo_uuid")?;
        tags.entry(parse_uuid(&uuid_text)?)
            .or_default()
            .push(row.get("name")?);
    }
    Ok(tags)
}

fn parse_memo_row(row: &Row<'_>) -> RepoResult<Memo> {
    let uuid_text: String = row.get("uuid")?;
    let category_text: String = row.get("category")?;
    let category = category_text.parse::<Category>().map_err(|_| {
        RepoError::InvalidData(format!(
            "invalid category `{category_text}` in memos.category"
        ))
    })?;

    Ok(Memo {
        id: parse_uuid(&uuid_text)?,
        title: row.get("title")?,
        content: row.get("content")?,
        category,
        tags: Vec::new(),
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn parse_uuid(value: &str) -> RepoResult<MemoId> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in memos.uuid")))
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
