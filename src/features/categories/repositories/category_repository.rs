use async_trait::async_trait;
use uuid::Uuid;

use crate::features::categories::models::Category;

/// Source of per-call transactions over the `categories` table.
#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn CategoryTransaction>, sqlx::Error>;
}

/// One open transaction. Writes become visible to other callers only after
/// `commit`; `rollback` (or dropping the handle) discards them.
#[async_trait]
pub trait CategoryTransaction: Send {
    async fn find_by_id(&mut self, id: Uuid) -> Result<Option<Category>, sqlx::Error>;

    /// Like `find_by_id`, but holds a row lock until the transaction ends so
    /// the row cannot change or disappear before a following write.
    async fn lock_by_id(&mut self, id: Uuid) -> Result<Option<Category>, sqlx::Error>;

    async fn find_all(&mut self) -> Result<Vec<Category>, sqlx::Error>;

    /// Insert a new row and return it as stored.
    async fn insert(&mut self, category: &Category) -> Result<Category, sqlx::Error>;

    /// Overwrite `name` and `seq` of the row with the same id and return it as stored.
    async fn replace(&mut self, category: &Category) -> Result<Category, sqlx::Error>;

    async fn delete_by_id(&mut self, id: Uuid) -> Result<(), sqlx::Error>;

    async fn commit(self: Box<Self>) -> Result<(), sqlx::Error>;

    async fn rollback(self: Box<Self>) -> Result<(), sqlx::Error>;
}
