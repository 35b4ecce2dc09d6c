//! 账户服务 -- 业务层，位于 handler 和数据库之间
//!
//! 除更新前的数据校验外，所有操作都直接转发给 `UserExt`，
//! 成功时把 `User` 转换为不含 passkey 的 `UserResponse`。

use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    db::UserExt,
    dtos::{user_to_user_response, UserResponse},
    error::ServiceError,
    models::User,
};

#[async_trait]
pub trait AccountService: Send + Sync {
    async fn create(&self, user: User) -> Result<UserResponse, ServiceError>;

    async fn get(&self, id: i32) -> Result<UserResponse, ServiceError>;

    async fn gets(&self) -> Result<Vec<UserResponse>, ServiceError>;

    /// 更新前先校验数据，校验失败时不会访问数据库
    async fn update(&self, id: i32, user: User) -> Result<UserResponse, ServiceError>;

    async fn delete(&self, id: i32) -> Result<UserResponse, ServiceError>;
}

pub struct AccountManager<R: UserExt> {
    db: Arc<R>,
}

impl<R: UserExt> AccountManager<R> {
    pub fn new(db: Arc<R>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl<R: UserExt> AccountService for AccountManager<R> {
    async fn create(&self, user: User) -> Result<UserResponse, ServiceError> {
        let user = self.db.save_user(user).await?;
        Ok(user_to_user_response(&user))
    }

    async fn get(&self, id: i32) -> Result<UserResponse, ServiceError> {
        let user = self.db.get_user(id).await?;
        Ok(user_to_user_response(&user))
    }

    async fn gets(&self) -> Result<Vec<UserResponse>, ServiceError> {
        let users = self.db.get_users().await?;
        Ok(users.iter().map(user_to_user_response).collect())
    }

    async fn update(&self, id: i32, user: User) -> Result<UserResponse, ServiceError> {
        user.is_valid().map_err(ServiceError::Validation)?;

        let user = self.db.update_user(id, user).await?;
        Ok(user_to_user_response(&user))
    }

    async fn delete(&self, id: i32) -> Result<UserResponse, ServiceError> {
        let user = self.db.delete_user(id).await?;
        Ok(user_to_user_response(&user))
    }
}
