use std::time::Duration;

use async_trait::async_trait;
use sqlx::{
    postgres::{PgPool, PgPoolOptions},
    Connection,
};
use thiserror::Error;

use crate::config::{DatabaseConfig, PoolConfig};
use crate::models::User;

// -- 建立连接池或校验连接时的错误，对外统一显示为 "database connection error"
#[derive(Debug, Error)]
pub enum DbError {
    #[error("database connection error")]
    Connection(#[source] sqlx::Error),

    #[error("database connection error")]
    NoServerInfo,
}

/// 连接池句柄 -- 进程启动时打开一次，退出时调用 `close` 关闭
#[derive(Debug, Clone)]
pub struct DbPool {
    pool: PgPool,
}

impl DbPool {
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // -- 关闭连接池并等待所有连接归还
    pub async fn close(self) {
        self.pool.close().await;
        tracing::info!("database pool closed");
    }
}

/// 创建数据库连接池 -- 连接后立即 ping 并记录服务器信息
///
/// # 返回
/// - `Ok(DbPool)` -- 可用的连接池
/// - `Err(DbError)` -- 无法连接、ping 失败或无法查询服务器信息
pub async fn new_db_pool(
    db_config: &DatabaseConfig,
    pool_config: &PoolConfig,
) -> Result<DbPool, DbError> {
    tracing::debug!(dsn = %db_config.redacted_dsn(), "connecting to database");

    let pool = PgPoolOptions::new()
        .max_connections(pool_config.max_connections)
        .acquire_timeout(Duration::from_secs(pool_config.acquire_timeout_secs))
        .connect(&db_config.dsn())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "failed to open database pool");
            DbError::Connection(e)
        })?;

    validate_db_pool(&pool).await?;

    Ok(DbPool { pool })
}

// -- ping 数据库并记录当前数据库、用户和版本
async fn validate_db_pool(pool: &PgPool) -> Result<(), DbError> {
    let mut conn = pool.acquire().await.map_err(DbError::Connection)?;
    conn.ping().await.map_err(|e| {
        tracing::error!(error = %e, "database ping failed");
        DbError::Connection(e)
    })?;

    let info: Option<(String, String, String)> =
        sqlx::query_as("SELECT current_database(), current_user, version()")
            .fetch_optional(&mut *conn)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "failed to query database server info");
                DbError::Connection(e)
            })?;

    let Some((current_database, current_user, db_version)) = info else {
        tracing::error!("database server info query returned no rows");
        return Err(DbError::NoServerInfo);
    };

    tracing::info!("database version: {}", db_version);
    tracing::info!("current database user: {}", current_user);
    tracing::info!("current database: {}", current_database);

    Ok(())
}

// -- 数据库客户端，用户相关的 SQL 都在这里执行
#[derive(Debug, Clone)]
pub struct DBClient {
    pool: PgPool,
}

impl DBClient {
    pub fn new(pool: PgPool) -> Self {
        DBClient { pool }
    }
}

/// 用户表的增删改查，错误原样返回驱动的 `sqlx::Error`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserExt: Send + Sync {
    // -- 插入新用户并返回写入后的数据
    async fn save_user(&self, user: User) -> Result<User, sqlx::Error>;

    // -- 按 id 查询，没有数据时返回 RowNotFound
    async fn get_user(&self, id: i32) -> Result<User, sqlx::Error>;

    // -- 查询所有用户，空表返回空列表
    async fn get_users(&self) -> Result<Vec<User>, sqlx::Error>;

    async fn update_user(&self, id: i32, user: User) -> Result<User, sqlx::Error>;

    async fn delete_user(&self, id: i32) -> Result<User, sqlx::Error>;
}

#[async_trait]
impl UserExt for DBClient {
    async fn save_user(&self, user: User) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, firstname, lastname, email, passkey)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, firstname, lastname, email, passkey
            "#,
        )
        .bind(user.id)
        .bind(&user.firstname)
        .bind(&user.lastname)
        .bind(&user.email)
        .bind(&user.passkey)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_user(&self, id: i32) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "SELECT id, firstname, lastname, email, passkey FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
    }

    async fn get_users(&self) -> Result<Vec<User>, sqlx::Error> {
        sqlx::query_as::<_, User>("SELECT id, firstname, lastname, email, passkey FROM users")
            .fetch_all(&self.pool)
            .await
    }

    async fn update_user(&self, id: i32, user: User) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET
                firstname = $2,
                lastname = $3,
                email = $4,
                passkey = $5
            WHERE id = $1
            RETURNING id, firstname, lastname, email, passkey
            "#,
        )
        .bind(id)
        .bind(&user.firstname)
        .bind(&user.lastname)
        .bind(&user.email)
        .bind(&user.passkey)
        .fetch_one(&self.pool)
        .await
    }

    async fn delete_user(&self, id: i32) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "DELETE FROM users WHERE id = $1 RETURNING id, firstname, lastname, email, passkey",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
    }
}
