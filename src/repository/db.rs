//! Storage gateway: the single database handle shared by every repository

use std::time::Duration;

use sqlx::{
    postgres::{PgArguments, PgConnectOptions, PgPoolOptions, PgRow},
    query::{Query, QueryAs},
    Execute, FromRow, Pool, Postgres,
};

use crate::{
    config::DatabaseConfig,
    error::{AppError, AppResult},
    models::{Column, FieldValue, Record, RecordSet},
};

/// Owned handle on the relational store.
///
/// Opened once at start-up and cloned into each repository; clones share the
/// same underlying pool.
#[derive(Clone)]
pub struct Database {
    pool: Pool<Postgres>,
}

impl Database {
    /// Connect using the configured parameters.
    ///
    /// Failure is reported as [`AppError::NoConnection`] so the caller can
    /// stop with a clear message instead of failing on the first statement.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let options = connect_options(config)?;

        let pool = pool_options(config)
            .connect_with(options)
            .await
            .map_err(|e| {
                tracing::error!("Database connection failed: {}", e);
                AppError::NoConnection(e.to_string())
            })?;

        tracing::info!("Database connection successful ({})", config.name);
        Ok(Self { pool })
    }

    /// Build a handle without opening a connection until first use
    pub fn connect_lazy(config: &DatabaseConfig) -> AppResult<Self> {
        let options = connect_options(config)?;
        Ok(Self {
            pool: pool_options(config).connect_lazy_with(options),
        })
    }

    pub fn from_pool(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Create the schema if it does not exist yet
    pub async fn migrate(&self) -> AppResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("Database migrations completed");
        Ok(())
    }

    /// Round-trip a trivial statement
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::NoConnection(e.to_string()))?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Run one mutating statement in its own transaction.
    ///
    /// Commits on success. On failure the statement is logged, the
    /// transaction rolled back and the driver error returned.
    pub async fn execute(&self, statement: Query<'_, Postgres, PgArguments>) -> AppResult<u64> {
        let sql = statement.sql();
        let mut tx = self.pool.begin().await.map_err(|e| report(sql, e))?;

        match statement.execute(&mut *tx).await {
            Ok(result) => {
                tx.commit().await.map_err(|e| report(sql, e))?;
                Ok(result.rows_affected())
            }
            Err(e) => {
                rollback(tx).await;
                Err(report(sql, e))
            }
        }
    }

    /// Run an `INSERT ... RETURNING <id>` in its own transaction
    pub async fn insert_returning_id(
        &self,
        statement: QueryAs<'_, Postgres, (i32,), PgArguments>,
    ) -> AppResult<i32> {
        let sql = statement.sql();
        let mut tx = self.pool.begin().await.map_err(|e| report(sql, e))?;

        match statement.fetch_one(&mut *tx).await {
            Ok((id,)) => {
                tx.commit().await.map_err(|e| report(sql, e))?;
                Ok(id)
            }
            Err(e) => {
                rollback(tx).await;
                Err(report(sql, e))
            }
        }
    }

    pub async fn fetch_all<'q, T>(&self, query: QueryAs<'q, Postgres, T, PgArguments>) -> AppResult<Vec<T>>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let sql = query.sql();
        query.fetch_all(&self.pool).await.map_err(|e| report(sql, e))
    }

    pub async fn fetch_one<'q, T>(&self, query: QueryAs<'q, Postgres, T, PgArguments>) -> AppResult<T>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let sql = query.sql();
        query.fetch_one(&self.pool).await.map_err(|e| report(sql, e))
    }

    /// `SELECT` every column of `T`'s table, optionally filtered on one column.
    ///
    /// Only a [`Column`] name is ever placed in the statement text; the value
    /// is always bound.
    pub async fn select<T>(
        &self,
        filter: Option<(T::Column, &FieldValue)>,
        fetch_one: bool,
    ) -> AppResult<RecordSet<T>>
    where
        T: Record + for<'r> FromRow<'r, PgRow> + Unpin,
    {
        let mut sql = format!("SELECT {} FROM {}", T::headers().join(", "), T::TABLE);
        if let Some((column, _)) = &filter {
            sql.push_str(&format!(" WHERE {} = $1", column.name()));
        }
        sql.push_str(&format!(" ORDER BY {}", T::KEY.name()));
        if fetch_one {
            sql.push_str(" LIMIT 1");
        }

        let mut query = sqlx::query_as::<_, T>(&sql);
        if let Some((_, value)) = filter {
            query = bind_value(query, value);
        }

        let rows = self.fetch_all(query).await?;
        Ok(RecordSet::from_rows(rows, fetch_one))
    }

    /// Delete the row of `T`'s table addressed by its primary key
    pub async fn delete_by_key<T: Record>(&self, id: i32) -> AppResult<u64> {
        let sql = format!("DELETE FROM {} WHERE {} = $1", T::TABLE, T::KEY.name());
        self.execute(sqlx::query(&sql).bind(id)).await
    }
}

fn connect_options(config: &DatabaseConfig) -> AppResult<PgConnectOptions> {
    match &config.url {
        Some(url) => url
            .parse::<PgConnectOptions>()
            .map_err(|e| AppError::NoConnection(format!("invalid database url: {}", e))),
        None => Ok(PgConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.username)
            .password(&config.password)
            .database(&config.name)),
    }
}

fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
}

pub(super) fn bind_value<'q, O>(
    query: QueryAs<'q, Postgres, O, PgArguments>,
    value: &'q FieldValue,
) -> QueryAs<'q, Postgres, O, PgArguments> {
    match value {
        FieldValue::Int(v) => query.bind(*v),
        FieldValue::Text(v) => query.bind(v.as_str()),
        FieldValue::Timestamp(v) => query.bind(*v),
    }
}

async fn rollback(tx: sqlx::Transaction<'_, Postgres>) {
    if let Err(e) = tx.rollback().await {
        tracing::warn!("Rollback failed: {}", e);
    }
}

fn report(sql: &str, error: sqlx::Error) -> AppError {
    let statement = sql.split_whitespace().collect::<Vec<_>>().join(" ");
    tracing::error!(%statement, "Statement failed: {}", error);
    AppError::Database(error)
}
