use serde::{Deserialize, Serialize};

use crate::models::User;

/// 返回给客户端的用户数据 -- 不包含 passkey
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: i32,
    pub first_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub last_name: String,
    pub email: String,
}

/// 将 `User` 转换为 `UserResponse`，丢弃 passkey
pub fn user_to_user_response(user: &User) -> UserResponse {
    UserResponse {
        id: user.id,
        first_name: user.firstname.clone(),
        last_name: user.lastname.clone(),
        email: user.email.clone(),
    }
}

// -- 错误响应体
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
