pub mod config;
pub mod db;
pub mod dtos;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod service;

use std::sync::Arc;

use service::AccountService;

#[derive(Clone)]
pub struct AppState {
    pub account_service: Arc<dyn AccountService>,
}

impl AppState {
    pub fn new(account_service: Arc<dyn AccountService>) -> Self {
        Self { account_service }
    }
}
