use std::{future::Future, process::ExitCode, sync::Arc};

use axum::http::{
    header::{ACCEPT, CONTENT_TYPE},
    Method,
};
use dotenvy::dotenv;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

use axum_account::{
    config::Config,
    db::{new_db_pool, DBClient},
    routes::create_router,
    service::AccountManager,
    AppState,
};

#[tokio::main]
async fn main() -> ExitCode {
    // -- 加载环境变量
    dotenv().ok();

    // -- 初始化日志，RUST_LOG 未设置时默认 info
    let (writer, _guard) = tracing_appender::non_blocking(std::io::stdout());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(writer)
        .init();

    // -- 加载配置
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            tracing::error!("invalid configuration: {}", err);
            return ExitCode::FAILURE;
        }
    };

    // -- 创建数据库连接池，失败时直接退出
    let db_pool = match new_db_pool(&config.database, &config.pool).await {
        Ok(pool) => {
            tracing::info!(dsn = %config.database.redacted_dsn(), "connected to the database");
            pool
        }
        Err(err) => {
            tracing::error!(
                "unexpected error while tried to connect to database: {}",
                err
            );
            return ExitCode::FAILURE;
        }
    };

    let db_client = DBClient::new(db_pool.pool().clone());
    let account_service = AccountManager::new(Arc::new(db_client));
    let app_state = AppState::new(Arc::new(account_service));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers([ACCEPT, CONTENT_TYPE])
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE]);

    let app = create_router(Arc::new(app_state)).layer(cors);

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(err) => {
            tracing::error!("failed to bind port {}: {}", config.server_port, err);
            db_pool.close().await;
            return ExitCode::FAILURE;
        }
    };

    tracing::info!("Server running on port {}", config.server_port);
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    // -- 进程退出前关闭连接池
    db_pool.close().await;

    match served {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("server error: {}", err);
            ExitCode::FAILURE
        }
    }
}

// -- 等待 Ctrl-C 或 SIGTERM
async fn shutdown_signal() {
    let ctrl_c = wait_for_signal(tokio::signal::ctrl_c(), "Ctrl+C");

    #[cfg(unix)]
    let terminate = wait_for_signal(
        async {
            let mut signal =
                tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
            signal.recv().await;
            Ok::<(), std::io::Error>(())
        },
        "SIGTERM",
    );

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutting down");
}

// -- 信号处理器安装失败时永远挂起，不能触发关闭
async fn wait_for_signal<F>(signal: F, name: &str)
where
    F: Future<Output = std::io::Result<()>>,
{
    if let Err(err) = signal.await {
        tracing::error!("failed to install {} handler: {}", name, err);
        std::future::pending::<()>().await;
    }
}
