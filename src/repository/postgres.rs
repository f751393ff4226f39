//! Postgres implementation of [`CrudRepository`]
//!
//! Every table mapped through [`Entity`] carries an integer `version`
//! column. Updates are conditional on the version read just before the
//! write, so a concurrent writer turns into [`UpdateOutcome::Conflict`]
//! instead of a lost update.

use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use super::{CrudRepository, Entity, UpdateOutcome};
use crate::error::AppResult;

pub struct PgRepository<T> {
    pool: Pool<Postgres>,
    _entity: PhantomData<fn() -> T>,
}

impl<T> Clone for PgRepository<T> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _entity: PhantomData,
        }
    }
}

impl<T: Entity> PgRepository<T> {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            pool,
            _entity: PhantomData,
        }
    }

    /// Version of record `id`, `None` when it does not exist
    pub async fn current_version(&self, id: i32) -> AppResult<Option<i32>> {
        let query = format!("SELECT version FROM {} WHERE id = $1", T::TABLE);
        let version = sqlx::query_scalar::<_, i32>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(version)
    }

    /// Replace record `id` only if it is still at `version`.
    ///
    /// Never returns [`UpdateOutcome::NotFound`]: a missing row and a moved
    /// version both mean the write lost, which is reported as a conflict.
    pub async fn update_at_version(
        &self,
        id: i32,
        mut entity: T,
        version: i32,
    ) -> AppResult<UpdateOutcome<T>> {
        // The path identifier always wins over whatever the caller sent
        entity.set_id(id);

        let query = update_sql::<T>();
        let row = entity
            .bind_columns(sqlx::query_as::<_, T>(&query))
            .bind(id)
            .bind(version)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(updated) => {
                tracing::info!("Updated {} id={}", T::KIND, id);
                Ok(UpdateOutcome::Updated(updated))
            }
            None => {
                tracing::warn!(
                    "Concurrent modification of {} id={} (read version {})",
                    T::KIND,
                    id,
                    version
                );
                Ok(UpdateOutcome::Conflict)
            }
        }
    }
}

/// `$from, $from+1, ...` for each column
fn placeholders(columns: &[&str], from: usize) -> String {
    (0..columns.len())
        .map(|i| format!("${}", from + i))
        .collect::<Vec<_>>()
        .join(", ")
}

/// `col_a = $1, col_b = $2, ...`
fn assignments(columns: &[&str]) -> String {
    columns
        .iter()
        .enumerate()
        .map(|(i, col)| format!("{} = ${}", col, i + 1))
        .collect::<Vec<_>>()
        .join(", ")
}

fn insert_sql<T: Entity>() -> String {
    format!(
        "INSERT INTO {} ({}) VALUES ({}) RETURNING *",
        T::TABLE,
        T::COLUMNS.join(", "),
        placeholders(T::COLUMNS, 1)
    )
}

fn update_sql<T: Entity>() -> String {
    let n = T::COLUMNS.len();
    format!(
        "UPDATE {} SET {}, version = version + 1 WHERE id = ${} AND version = ${} RETURNING *",
        T::TABLE,
        assignments(T::COLUMNS),
        n + 1,
        n + 2
    )
}

#[async_trait]
impl<T: Entity> CrudRepository<T> for PgRepository<T> {
    async fn get_all(&self) -> AppResult<Vec<T>> {
        let query = format!("SELECT * FROM {} ORDER BY id", T::TABLE);
        let rows = sqlx::query_as::<_, T>(&query)
            .fetch_all(&self.pool)
            .await?;
        tracing::debug!("Loaded {} {} records", rows.len(), T::KIND);
        Ok(rows)
    }

    async fn get_by_id(&self, id: i32) -> AppResult<Option<T>> {
        let query = format!("SELECT * FROM {} WHERE id = $1", T::TABLE);
        let row = sqlx::query_as::<_, T>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn save(&self, entity: T) -> AppResult<T> {
        let query = insert_sql::<T>();
        let row = entity
            .bind_columns(sqlx::query_as::<_, T>(&query))
            .fetch_one(&self.pool)
            .await?;
        tracing::info!("Created {} id={}", T::KIND, row.id());
        Ok(row)
    }

    async fn update(&self, id: i32, entity: T) -> AppResult<UpdateOutcome<T>> {
        let Some(version) = self.current_version(id).await? else {
            return Ok(UpdateOutcome::NotFound);
        };
        self.update_at_version(id, entity, version).await
    }

    async fn delete(&self, id: i32) -> AppResult<Option<T>> {
        let query = format!("DELETE FROM {} WHERE id = $1 RETURNING *", T::TABLE);
        let row = sqlx::query_as::<_, T>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        if row.is_some() {
            tracing::info!("Deleted {} id={}", T::KIND, id);
        }
        Ok(row)
    }
}
