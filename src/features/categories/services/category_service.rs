use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::features::categories::models::Category;
use crate::features::categories::repositories::{CategoryStore, CategoryTransaction};

/// Failures surfaced by [`CategoryService`]
#[derive(Debug, Error)]
pub enum CategoryError {
    #[error("Category '{0}' not found")]
    NotFound(String),

    #[error("Storage failure: {0}")]
    StorageFailure(#[from] sqlx::Error),
}

pub type CategoryResult<T> = std::result::Result<T, CategoryError>;

/// Service for category operations
///
/// Every call runs in its own transaction taken from the injected store. The
/// transaction is committed on success and rolled back on any failure before
/// the error is returned.
pub struct CategoryService {
    store: Arc<dyn CategoryStore>,
}

impl CategoryService {
    pub fn new(store: Arc<dyn CategoryStore>) -> Self {
        Self { store }
    }

    /// List all categories in storage order
    pub async fn list(&self) -> CategoryResult<Vec<Category>> {
        let mut tx = self.begin("list categories").await?;
        let outcome = tx.find_all().await.map_err(CategoryError::from);
        finish(tx, outcome, "list categories").await
    }

    /// Get category by id
    pub async fn get(&self, id: &str) -> CategoryResult<Category> {
        let id = parse_id(id)?;
        let mut tx = self.begin("get category").await?;
        let outcome = lookup(tx.as_mut(), id).await;
        finish(tx, outcome, "get category").await
    }

    /// Create a category under a freshly generated id
    pub async fn create(&self, name: String, seq: i32) -> CategoryResult<Category> {
        let category = Category {
            id: Uuid::new_v4(),
            name,
            seq,
        };

        let mut tx = self.begin("create category").await?;
        let outcome = tx.insert(&category).await.map_err(CategoryError::from);
        let created = finish(tx, outcome, "create category").await?;

        tracing::info!(
            "Category created: id={}, name={:?}, seq={}",
            created.id,
            created.name,
            created.seq
        );

        Ok(created)
    }

    /// Replace name and seq of an existing category
    pub async fn update(&self, id: &str, name: String, seq: i32) -> CategoryResult<Category> {
        let id = parse_id(id)?;
        let mut tx = self.begin("update category").await?;
        let outcome = replace_existing(tx.as_mut(), id, name, seq).await;
        let updated = finish(tx, outcome, "update category").await?;

        tracing::info!("Category updated: id={}", updated.id);

        Ok(updated)
    }

    /// Hard-delete a category
    pub async fn delete(&self, id: &str) -> CategoryResult<()> {
        let id = parse_id(id)?;
        let mut tx = self.begin("delete category").await?;
        let outcome = delete_existing(tx.as_mut(), id).await;
        finish(tx, outcome, "delete category").await?;

        tracing::info!("Category deleted: id={}", id);

        Ok(())
    }

    async fn begin(&self, action: &str) -> CategoryResult<Box<dyn CategoryTransaction>> {
        self.store.begin().await.map_err(|e| {
            tracing::error!("Failed to begin transaction to {}: {:?}", action, e);
            CategoryError::StorageFailure(e)
        })
    }
}

/// A string that is not a UUID cannot name any stored row.
fn parse_id(id: &str) -> CategoryResult<Uuid> {
    Uuid::parse_str(id).map_err(|_| CategoryError::NotFound(id.to_string()))
}

async fn lookup(tx: &mut dyn CategoryTransaction, id: Uuid) -> CategoryResult<Category> {
    tx.find_by_id(id)
        .await?
        .ok_or_else(|| CategoryError::NotFound(id.to_string()))
}

/// Lookup that locks the row for the write that follows.
async fn lock(tx: &mut dyn CategoryTransaction, id: Uuid) -> CategoryResult<Category> {
    tx.lock_by_id(id)
        .await?
        .ok_or_else(|| CategoryError::NotFound(id.to_string()))
}

async fn replace_existing(
    tx: &mut dyn CategoryTransaction,
    id: Uuid,
    name: String,
    seq: i32,
) -> CategoryResult<Category> {
    let mut category = lock(tx, id).await?;
    category.name = name;
    category.seq = seq;
    match tx.replace(&category).await {
        Ok(updated) => Ok(updated),
        // Row went away between lookup and write
        Err(sqlx::Error::RowNotFound) => Err(CategoryError::NotFound(id.to_string())),
        Err(e) => Err(e.into()),
    }
}

async fn delete_existing(tx: &mut dyn CategoryTransaction, id: Uuid) -> CategoryResult<()> {
    lock(tx, id).await?;
    tx.delete_by_id(id).await?;
    Ok(())
}

/// Commit on success, roll back on failure.
async fn finish<T>(
    tx: Box<dyn CategoryTransaction>,
    outcome: CategoryResult<T>,
    action: &str,
) -> CategoryResult<T> {
    match outcome {
        Ok(value) => {
            tx.commit().await.map_err(|e| {
                tracing::error!("Failed to commit {}: {:?}", action, e);
                CategoryError::StorageFailure(e)
            })?;
            Ok(value)
        }
        Err(err) => {
            if let CategoryError::StorageFailure(ref e) = err {
                tracing::error!("Failed to {}: {:?}", action, e);
            }
            if let Err(e) = tx.rollback().await {
                tracing::warn!("Failed to roll back {}: {:?}", action, e);
            }
            Err(err)
        }
    }
}
