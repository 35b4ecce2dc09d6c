use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::Path,
    response::IntoResponse,
    routing::{get, MethodRouter},
    Extension, Json, Router,
};

use crate::{error::HttpError, models::User, AppState};

pub fn account_handler() -> Router {
    Router::new()
        .route("/", account_collection())
        .route("/{id}", get(get_user).put(update_user).delete(delete_user))
}

// -- 集合路由：列表和创建，同时挂在带斜杠和不带斜杠的路径上
pub fn account_collection() -> MethodRouter {
    get(get_users).post(create_user)
}

// -- 路径中的 id 必须是整数，否则返回 400
fn parse_id(raw: &str) -> Result<i32, HttpError> {
    raw.parse::<i32>().map_err(HttpError::bad_request)
}

// -- 请求体按 JSON 解析，不检查 Content-Type，解析失败时返回 400
fn bind_user(body: &Bytes) -> Result<User, HttpError> {
    serde_json::from_slice(body).map_err(HttpError::bad_request)
}

/// 创建用户
///
/// # 返回
/// - `Ok(UserResponse)` -- 创建成功，返回写入后的用户数据
/// - `Err(HttpError)`
///   - `BadRequest` -- 请求体不是合法的用户 JSON
///   - `ServerError` -- 服务层返回错误
pub async fn create_user(
    Extension(app_state): Extension<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, HttpError> {
    let user = bind_user(&body)?;

    let response = app_state.account_service.create(user).await?;

    Ok(Json(response))
}

/// 按 id 查询用户
pub async fn get_user(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    let id = parse_id(&id)?;

    let response = app_state.account_service.get(id).await?;

    Ok(Json(response))
}

/// 查询所有用户，没有数据时返回空数组
pub async fn get_users(
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    let response = app_state.account_service.gets().await?;

    Ok(Json(response))
}

/// 更新用户 -- 先校验路径 id，再绑定请求体
///
/// 服务层的校验失败同样返回 500
pub async fn update_user(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse, HttpError> {
    let id = parse_id(&id)?;
    let user = bind_user(&body)?;

    let response = app_state.account_service.update(id, user).await?;

    Ok(Json(response))
}

/// 删除用户，返回被删除的数据
pub async fn delete_user(
    Extension(app_state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HttpError> {
    let id = parse_id(&id)?;

    let response = app_state.account_service.delete(id).await?;

    Ok(Json(response))
}
