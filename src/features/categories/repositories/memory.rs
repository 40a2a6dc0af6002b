//! In-memory category store for tests.
//!
//! Writes are staged per transaction and applied to the shared table on
//! `commit`, so a failed or rolled-back transaction leaves the table as it
//! was. A [`FailPoint`] makes the matching call return an error until cleared.
//! `lock_by_id` takes no lock; `delete_after_lock` lets a test play the
//! concurrent writer a real row lock would have blocked.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use crate::features::categories::models::Category;
use crate::features::categories::repositories::{CategoryStore, CategoryTransaction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    Begin,
    FindById,
    FindAll,
    Insert,
    Replace,
    Delete,
    Commit,
}

#[derive(Debug, Default)]
struct Table {
    rows: Vec<Category>,
    fail_on: Option<FailPoint>,
    delete_after_lock: bool,
    commits: usize,
    rollbacks: usize,
}

impl Table {
    fn check(&self, point: FailPoint) -> Result<(), sqlx::Error> {
        if self.fail_on == Some(point) {
            return Err(sqlx::Error::Protocol(format!(
                "injected failure at {:?}",
                point
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryCategoryStore {
    table: Arc<Mutex<Table>>,
}

impl InMemoryCategoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<Category>) -> Self {
        let store = Self::new();
        store.table.lock().unwrap().rows = rows;
        store
    }

    pub fn fail_on(&self, point: FailPoint) {
        self.table.lock().unwrap().fail_on = Some(point);
    }

    pub fn clear_failure(&self) {
        self.table.lock().unwrap().fail_on = None;
    }

    /// The next `lock_by_id` hit returns the row, then the row is removed
    /// from the committed table as if another caller deleted it.
    pub fn delete_after_lock(&self) {
        self.table.lock().unwrap().delete_after_lock = true;
    }

    /// Committed rows, in storage order.
    pub fn rows(&self) -> Vec<Category> {
        self.table.lock().unwrap().rows.clone()
    }

    pub fn commits(&self) -> usize {
        self.table.lock().unwrap().commits
    }

    pub fn rollbacks(&self) -> usize {
        self.table.lock().unwrap().rollbacks
    }
}

#[async_trait]
impl CategoryStore for InMemoryCategoryStore {
    async fn begin(&self) -> Result<Box<dyn CategoryTransaction>, sqlx::Error> {
        self.table.lock().unwrap().check(FailPoint::Begin)?;
        Ok(Box::new(InMemoryTransaction {
            table: Arc::clone(&self.table),
            pending: Vec::new(),
        }))
    }
}

#[derive(Debug, Clone)]
enum PendingWrite {
    Insert(Category),
    Replace(Category),
    Delete(Uuid),
}

fn apply(rows: &mut Vec<Category>, write: &PendingWrite) {
    match write {
        PendingWrite::Insert(category) => rows.push(category.clone()),
        PendingWrite::Replace(category) => {
            if let Some(row) = rows.iter_mut().find(|row| row.id == category.id) {
                *row = category.clone();
            }
        }
        PendingWrite::Delete(id) => rows.retain(|row| row.id != *id),
    }
}

struct InMemoryTransaction {
    table: Arc<Mutex<Table>>,
    pending: Vec<PendingWrite>,
}

impl InMemoryTransaction {
    /// Committed rows with this transaction's staged writes applied.
    fn view(&self, point: FailPoint) -> Result<Vec<Category>, sqlx::Error> {
        let table = self.table.lock().unwrap();
        table.check(point)?;
        let mut rows = table.rows.clone();
        for write in &self.pending {
            apply(&mut rows, write);
        }
        Ok(rows)
    }
}

#[async_trait]
impl CategoryTransaction for InMemoryTransaction {
    async fn find_by_id(&mut self, id: Uuid) -> Result<Option<Category>, sqlx::Error> {
        Ok(self
            .view(FailPoint::FindById)?
            .into_iter()
            .find(|row| row.id == id))
    }

    async fn lock_by_id(&mut self, id: Uuid) -> Result<Option<Category>, sqlx::Error> {
        let found = self.find_by_id(id).await?;
        let mut table = self.table.lock().unwrap();
        if found.is_some() && table.delete_after_lock {
            table.delete_after_lock = false;
            table.rows.retain(|row| row.id != id);
        }
        Ok(found)
    }

    async fn find_all(&mut self) -> Result<Vec<Category>, sqlx::Error> {
        self.view(FailPoint::FindAll)
    }

    async fn insert(&mut self, category: &Category) -> Result<Category, sqlx::Error> {
        if self
            .view(FailPoint::Insert)?
            .iter()
            .any(|row| row.id == category.id)
        {
            return Err(sqlx::Error::Protocol(format!(
                "duplicate key value violates unique constraint: {}",
                category.id
            )));
        }
        self.pending.push(PendingWrite::Insert(category.clone()));
        Ok(category.clone())
    }

    async fn replace(&mut self, category: &Category) -> Result<Category, sqlx::Error> {
        if !self
            .view(FailPoint::Replace)?
            .iter()
            .any(|row| row.id == category.id)
        {
            return Err(sqlx::Error::RowNotFound);
        }
        self.pending.push(PendingWrite::Replace(category.clone()));
        Ok(category.clone())
    }

    async fn delete_by_id(&mut self, id: Uuid) -> Result<(), sqlx::Error> {
        self.view(FailPoint::Delete)?;
        self.pending.push(PendingWrite::Delete(id));
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), sqlx::Error> {
        let mut table = self.table.lock().unwrap();
        table.check(FailPoint::Commit)?;
        for write in &self.pending {
            apply(&mut table.rows, write);
        }
        table.commits += 1;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), sqlx::Error> {
        self.table.lock().unwrap().rollbacks += 1;
        Ok(())
    }
}
