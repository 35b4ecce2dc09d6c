use std::sync::Arc;

use axum::{middleware::from_fn, Extension, Router};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::{
    handlers::account::{account_collection, account_handler},
    middleware::logging_middleware,
    AppState,
};

// -- 配置所有路由：/v1/account 下的用户增删改查
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let api_route = Router::new()
        .nest("/account", account_handler())
        .route("/account/", account_collection());

    Router::new().nest("/v1", api_route).layer(
        ServiceBuilder::new()
            .layer(Extension(app_state))
            .layer(TraceLayer::new_for_http())
            .layer(from_fn(logging_middleware)),
    )
}
