use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::features::categories::models::Category;
use crate::features::categories::repositories::{CategoryStore, CategoryTransaction};

/// Postgres-backed category store
pub struct PgCategoryStore {
    pool: PgPool,
}

impl PgCategoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryStore for PgCategoryStore {
    async fn begin(&self) -> Result<Box<dyn CategoryTransaction>, sqlx::Error> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgCategoryTransaction { tx }))
    }
}

/// Wraps a live sqlx transaction. sqlx rolls the transaction back if the
/// handle is dropped without `commit`.
struct PgCategoryTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl CategoryTransaction for PgCategoryTransaction {
    async fn find_by_id(&mut self, id: Uuid) -> Result<Option<Category>, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, seq
            FROM categories
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await
    }

    async fn lock_by_id(&mut self, id: Uuid) -> Result<Option<Category>, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, seq
            FROM categories
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await
    }

    async fn find_all(&mut self) -> Result<Vec<Category>, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            r#"
            SELECT id, name, seq
            FROM categories
            "#,
        )
        .fetch_all(&mut *self.tx)
        .await
    }

    async fn insert(&mut self, category: &Category) -> Result<Category, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (id, name, seq)
            VALUES ($1, $2, $3)
            RETURNING id, name, seq
            "#,
        )
        .bind(category.id)
        .bind(&category.name)
        .bind(category.seq)
        .fetch_one(&mut *self.tx)
        .await
    }

    async fn replace(&mut self, category: &Category) -> Result<Category, sqlx::Error> {
        sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories
            SET name = $1, seq = $2
            WHERE id = $3
            RETURNING id, name, seq
            "#,
        )
        .bind(&category.name)
        .bind(category.seq)
        .bind(category.id)
        .fetch_one(&mut *self.tx)
        .await
    }

    async fn delete_by_id(&mut self, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&mut *self.tx)
            .await?;
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), sqlx::Error> {
        let PgCategoryTransaction { tx } = *self;
        tx.commit().await
    }

    async fn rollback(self: Box<Self>) -> Result<(), sqlx::Error> {
        let PgCategoryTransaction { tx } = *self;
        tx.rollback().await
    }
}
